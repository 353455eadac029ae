use super::*;
pub(super) use crate::types::{ChanDir, TypeExpr};

mod imports;

fn parse(source: &str) -> GoFile {
    parse_go_file(source).expect("parse should succeed")
}

fn find_struct<'a>(file: &'a GoFile, name: &str) -> &'a StructDecl {
    file.structs
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("should find struct named '{name}'"))
}

fn field_type(source_type: &str) -> Option<TypeExpr> {
    let source = format!("package demo\n\ntype Holder struct {{\n\tValue {source_type}\n}}\n");
    let file = parse(&source);
    file.structs[0].fields[0].ty.clone()
}
