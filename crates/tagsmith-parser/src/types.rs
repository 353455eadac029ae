//! Declarations extracted from a Go source file.

use serde::Serialize;
use std::fmt;

use crate::tag::StructTag;

/// Everything the engine needs from one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoFile {
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub structs: Vec<StructDecl>,
}

/// One `import` spec, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpec {
    /// Explicit name (`f`, `.`, `_`), if any.
    pub alias: Option<String>,
    pub path: String,
    pub line: usize,
}

impl ImportSpec {
    /// Identifier the importing file uses: the alias, else the last path segment.
    #[must_use]
    pub fn local_name(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// A `type Name struct { ... }` declaration, top-level or local to a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDecl {
    pub name: String,
    /// 1-based line of the type name.
    pub line: usize,
    /// Raw doc comments (markers included) attached to the declaration or spec.
    pub comments: Vec<String>,
    /// Type parameter names of a generic struct, in order.
    pub type_parameters: Vec<String>,
    pub fields: Vec<FieldDecl>,
}

/// One field declaration line. `names` is empty for embedded fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub ty: Option<TypeExpr>,
    /// Decoded tag content, without the surrounding quotes.
    pub tag: Option<String>,
    pub line: usize,
}

impl FieldDecl {
    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn struct_tag(&self) -> StructTag<'_> {
        StructTag::new(self.tag.as_deref().unwrap_or(""))
    }
}

/// Direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Syntactic shape of a declared field type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeExpr {
    /// An unqualified name: `int`, `User`, `T`.
    Named { name: String },
    /// `pkg.Name`, where `pkg` is the identifier used in the file.
    Qualified { package: String, name: String },
    Pointer { elem: Box<TypeExpr> },
    Slice { elem: Box<TypeExpr> },
    Array { len: String, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Generic { base: Box<TypeExpr>, args: Vec<TypeExpr> },
    Func,
    Interface,
    Struct,
}

impl TypeExpr {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    #[must_use]
    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name } => f.write_str(name),
            Self::Qualified { package, name } => write!(f, "{package}.{name}"),
            Self::Pointer { elem } => write!(f, "*{elem}"),
            Self::Slice { elem } => write!(f, "[]{elem}"),
            Self::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            Self::Generic { base, args } => {
                write!(f, "{base}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str("]")
            }
            Self::Func => f.write_str("func"),
            Self::Interface => f.write_str("interface{}"),
            Self::Struct => f.write_str("struct{}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn local_name_prefers_alias() {
        let aliased = ImportSpec {
            alias: Some("y".into()),
            path: "gopkg.in/yaml.v3".into(),
            line: 3,
        };
        let plain = ImportSpec {
            alias: None,
            path: "gopkg.in/yaml.v3".into(),
            line: 4,
        };
        assert_eq!(aliased.local_name(), "y");
        assert_eq!(plain.local_name(), "yaml.v3");
    }

    #[test]
    fn display_spells_nested_types() {
        let ty = TypeExpr::Map {
            key: Box::new(TypeExpr::named("string")),
            value: Box::new(TypeExpr::Slice {
                elem: Box::new(TypeExpr::Pointer {
                    elem: Box::new(TypeExpr::qualified("yaml", "Node")),
                }),
            }),
        };
        assert_eq!(ty.to_string(), "map[string][]*yaml.Node");
    }

    #[test]
    fn display_spells_generics_and_channels() {
        let ty = TypeExpr::Chan {
            dir: ChanDir::Recv,
            elem: Box::new(TypeExpr::Generic {
                base: Box::new(TypeExpr::named("Pair")),
                args: vec![TypeExpr::named("string"), TypeExpr::Array {
                    len: "4".into(),
                    elem: Box::new(TypeExpr::named("byte")),
                }],
            }),
        };
        assert_eq!(ty.to_string(), "<-chan Pair[string, [4]byte]");
    }
}
