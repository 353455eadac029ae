//! Go declaration extractor.
//!
//! Pulls the package clause, import specs and every struct declaration,
//! including those local to function bodies (with doc comments, fields, tags
//! and declared types), out of a parsed file.
//! Any `ERROR` or missing node in the tree fails the whole file.

use ast_grep_core::Node;
use ast_grep_language::SupportLang;

use crate::error::ParserError;
use crate::tag::unquote;
use crate::types::{FieldDecl, GoFile, ImportSpec, StructDecl};

mod helpers;
mod type_expr;

#[cfg(test)]
mod tests;

pub use type_expr::type_expr;

/// Parse and extract a Go source file.
///
/// # Errors
/// Returns `ParserError::ParseFailed` for syntax errors and
/// `ParserError::MissingPackageClause` when the file declares no package.
pub fn parse_go_file(source: &str) -> Result<GoFile, ParserError> {
    let root = crate::parser::parse_source(source);
    extract(&root)
}

/// Extract declarations from an already parsed Go tree.
///
/// # Errors
/// Same as [`parse_go_file`].
pub fn extract<D: ast_grep_core::Doc<Lang = SupportLang>>(
    root: &ast_grep_core::AstGrep<D>,
) -> Result<GoFile, ParserError> {
    let root = root.root();
    if let Some((line, near)) = helpers::first_error(&root) {
        return Err(ParserError::ParseFailed {
            line,
            message: format!("syntax error near `{near}`"),
        });
    }

    let package = root
        .children()
        .find(|c| c.kind().as_ref() == "package_clause")
        .and_then(|clause| {
            clause
                .children()
                .find(|c| c.kind().as_ref() == "package_identifier")
        })
        .map(|n| n.text().to_string())
        .ok_or(ParserError::MissingPackageClause)?;

    let mut imports = Vec::new();
    let mut structs = Vec::new();
    for child in root.children() {
        match child.kind().as_ref() {
            "import_declaration" => imports.extend(process_import_declaration(&child)),
            "type_declaration" => structs.extend(process_type_declaration(&child)),
            _ => collect_nested_structs(&child, &mut structs),
        }
    }

    Ok(GoFile {
        package,
        imports,
        structs,
    })
}

// ── import_declaration ────────────────────────────────────────────

fn process_import_declaration<D: ast_grep_core::Doc>(node: &Node<D>) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    for child in node.children() {
        match child.kind().as_ref() {
            "import_spec" => specs.extend(process_import_spec(&child)),
            "import_spec_list" => {
                for spec in child.children() {
                    if spec.kind().as_ref() == "import_spec"
                        && let Some(import) = process_import_spec(&spec)
                    {
                        specs.push(import);
                    }
                }
            }
            _ => {}
        }
    }
    specs
}

fn process_import_spec<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<ImportSpec> {
    let path = unquote(&node.field("path")?.text())?;
    let alias = node.field("name").map(|n| n.text().to_string());
    Some(ImportSpec {
        alias,
        path,
        line: node.start_pos().line() + 1,
    })
}

// ── type_declaration ──────────────────────────────────────────────

/// Type declarations below `node`, in source order.
fn collect_nested_structs<D: ast_grep_core::Doc>(node: &Node<D>, out: &mut Vec<StructDecl>) {
    for child in node.children() {
        if child.kind().as_ref() == "type_declaration" {
            out.extend(process_type_declaration(&child));
        } else {
            collect_nested_structs(&child, out);
        }
    }
}

fn process_type_declaration<D: ast_grep_core::Doc>(node: &Node<D>) -> Vec<StructDecl> {
    let decl_comments = helpers::doc_comments(node);
    node.children()
        .filter(|c| c.kind().as_ref() == "type_spec")
        .filter_map(|spec| process_type_spec(&spec, &decl_comments))
        .collect()
}

fn process_type_spec<D: ast_grep_core::Doc>(
    node: &Node<D>,
    decl_comments: &[String],
) -> Option<StructDecl> {
    let body = node.field("type")?;
    if body.kind().as_ref() != "struct_type" {
        return None;
    }
    let name = node.field("name")?.text().to_string();

    let mut comments = decl_comments.to_vec();
    comments.extend(helpers::doc_comments(node));

    let type_parameters = node
        .field("type_parameters")
        .map(|list| helpers::type_parameter_names(&list))
        .unwrap_or_default();

    Some(StructDecl {
        name,
        line: node.start_pos().line() + 1,
        comments,
        type_parameters,
        fields: struct_fields(&body),
    })
}

fn struct_fields<D: ast_grep_core::Doc>(body: &Node<D>) -> Vec<FieldDecl> {
    let mut fields = Vec::new();
    for list in body.children() {
        if list.kind().as_ref() != "field_declaration_list" {
            continue;
        }
        for field in list.children() {
            if field.kind().as_ref() == "field_declaration" {
                fields.push(process_field(&field));
            }
        }
    }
    fields
}

fn process_field<D: ast_grep_core::Doc>(node: &Node<D>) -> FieldDecl {
    let names = node
        .children()
        .filter(|c| c.kind().as_ref() == "field_identifier")
        .map(|n| n.text().to_string())
        .collect();
    let ty = node.field("type").and_then(|t| type_expr(&t));
    let tag = node.field("tag").and_then(|t| unquote(&t.text()));
    FieldDecl {
        names,
        ty,
        tag,
        line: node.start_pos().line() + 1,
    }
}
