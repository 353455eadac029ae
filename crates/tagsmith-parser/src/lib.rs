//! # tagsmith-parser
//!
//! ast-grep-based parsing of Go source files for tagsmith.
//!
//! - [`package_clause`]: cheap lexical scan of a file's package clause
//! - [`parse_go_file`]: full extraction of imports and struct declarations,
//!   with doc comments, field names, decoded tags and declared types
//! - [`StructTag`]: `key:"value"` lookup over decoded tag text

pub mod error;
pub mod go;
pub mod parser;
pub mod tag;
pub mod types;

pub use error::ParserError;
pub use go::{parse_go_file, type_expr};
pub use parser::{AstTree, is_go_file, package_clause, package_clause_of, parse_source};
pub use tag::{StructTag, unquote};
pub use types::{ChanDir, FieldDecl, GoFile, ImportSpec, StructDecl, TypeExpr};
