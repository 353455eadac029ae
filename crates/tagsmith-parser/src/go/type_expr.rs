use ast_grep_core::Node;

use crate::types::{ChanDir, TypeExpr};

/// Convert a Go type node into a [`TypeExpr`].
///
/// Returns `None` for type syntax with no spelling of its own (constraint
/// unions, negated types) or when a required child is missing.
pub fn type_expr<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<TypeExpr> {
    let ty = match node.kind().as_ref() {
        "type_identifier" => TypeExpr::named(node.text()),
        "qualified_type" => TypeExpr::qualified(
            node.field("package")?.text(),
            node.field("name")?.text(),
        ),
        "pointer_type" => TypeExpr::Pointer {
            elem: Box::new(first_named_type(node)?),
        },
        "slice_type" => TypeExpr::Slice {
            elem: Box::new(type_expr(&node.field("element")?)?),
        },
        "array_type" | "implicit_length_array_type" => TypeExpr::Array {
            len: node
                .field("length")
                .map_or_else(|| "...".to_string(), |n| n.text().to_string()),
            elem: Box::new(type_expr(&node.field("element")?)?),
        },
        "map_type" => TypeExpr::Map {
            key: Box::new(type_expr(&node.field("key")?)?),
            value: Box::new(type_expr(&node.field("value")?)?),
        },
        "channel_type" => TypeExpr::Chan {
            dir: chan_dir(node),
            elem: Box::new(type_expr(&node.field("value")?)?),
        },
        "generic_type" => TypeExpr::Generic {
            base: Box::new(type_expr(&node.field("type")?)?),
            args: type_arguments(&node.field("type_arguments")?)?,
        },
        "parenthesized_type" => first_named_type(node)?,
        "function_type" => TypeExpr::Func,
        "interface_type" => TypeExpr::Interface,
        "struct_type" => TypeExpr::Struct,
        _ => return None,
    };
    Some(ty)
}

fn first_named_type<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<TypeExpr> {
    node.children()
        .filter(|c| c.is_named() && c.kind().as_ref() != "comment")
        .find_map(|c| type_expr(&c))
}

fn type_arguments<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<Vec<TypeExpr>> {
    node.children()
        .filter(|c| c.is_named() && c.kind().as_ref() != "comment")
        .map(|arg| {
            if arg.kind().as_ref() == "type_elem" {
                first_named_type(&arg)
            } else {
                type_expr(&arg)
            }
        })
        .collect()
}

fn chan_dir<D: ast_grep_core::Doc>(node: &Node<D>) -> ChanDir {
    let tokens: Vec<String> = node
        .children()
        .filter(|c| !c.is_named())
        .map(|c| c.kind().to_string())
        .collect();
    match tokens.first().map(String::as_str) {
        Some("<-") => ChanDir::Recv,
        _ if tokens.iter().any(|t| t == "<-") => ChanDir::Send,
        _ => ChanDir::Both,
    }
}
