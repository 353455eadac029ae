use super::*;
use pretty_assertions::assert_eq;

#[test]
fn single_and_grouped_imports_in_order() {
    let source = r#"package demo

import "fmt"

import (
	f "fmt"
	. "strings"
	_ "net/http/pprof"
	yaml "gopkg.in/yaml.v3"
	"github.com/gofrs/uuid/v5"
)
"#;
    let file = parse(source);
    let seen: Vec<(Option<&str>, &str)> = file
        .imports
        .iter()
        .map(|i| (i.alias.as_deref(), i.path.as_str()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (None, "fmt"),
            (Some("f"), "fmt"),
            (Some("."), "strings"),
            (Some("_"), "net/http/pprof"),
            (Some("yaml"), "gopkg.in/yaml.v3"),
            (None, "github.com/gofrs/uuid/v5"),
        ]
    );
}

#[test]
fn import_lines_are_one_based() {
    let file = parse("package demo\n\nimport \"time\"\n");
    assert_eq!(file.imports[0].line, 3);
}

#[test]
fn local_name_falls_back_to_last_segment() {
    let file = parse("package demo\n\nimport \"github.com/gofrs/uuid/v5\"\n");
    assert_eq!(file.imports[0].local_name(), "v5");
}

#[test]
fn raw_string_import_paths_are_decoded() {
    let file = parse("package demo\n\nimport `os`\n");
    assert_eq!(file.imports[0].path, "os");
}
