//! Validation of a defaulted [`Config`]. Every problem is collected.

use std::collections::HashSet;

use globset::GlobBuilder;
use tagsmith_core::Config;

use crate::ConfigError;

const PACKAGE_PREFIX: &str = "package:";
const FIELD_PSEUDO_KEY: &str = ":field";
const VALUE_TOKEN: &str = ":value";

/// ASCII Go identifier: a letter or `_`, then letters, digits or `_`.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A `package:IDENT` entry or a syntactically valid `.go` glob.
#[must_use]
pub fn is_source_pattern(pattern: &str) -> bool {
    if let Some(name) = pattern.strip_prefix(PACKAGE_PREFIX) {
        return is_identifier(name);
    }
    pattern.ends_with(".go")
        && GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .is_ok()
}

#[derive(Default)]
struct Problems(Vec<String>);

impl Problems {
    fn push(&mut self, path: impl std::fmt::Display, message: impl std::fmt::Display) {
        self.0.push(format!("{path}: {message}"));
    }

    fn identifier(&mut self, path: impl std::fmt::Display, value: &str) {
        if !is_identifier(value) {
            self.push(path, format!("\"{value}\" is not a valid Go identifier"));
        }
    }

    fn optional_identifier(&mut self, path: impl std::fmt::Display, value: &str) {
        if !value.is_empty() {
            self.identifier(path, value);
        }
    }
}

/// Check a defaulted configuration.
///
/// # Errors
/// Returns `ConfigError::Invalid` listing every problem, each prefixed with
/// the dotted path of the offending value.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let mut problems = Problems::default();

    for (key, patterns) in [("include", &config.input.include), ("exclude", &config.input.exclude)] {
        for (i, pattern) in patterns.iter().enumerate() {
            if pattern.trim().is_empty() || !is_source_pattern(pattern) {
                problems.push(
                    format!("input.{key}[{i}]"),
                    format!("\"{pattern}\" must be a valid source pattern"),
                );
            }
        }
    }

    let file_name = &config.output.file_name;
    if file_name.trim().is_empty()
        || file_name.contains(['/', '\\'])
        || !file_name.ends_with(".go")
    {
        problems.push(
            "output.file_name",
            format!("\"{file_name}\" must be a valid Go filename"),
        );
    }

    let mut seen = HashSet::new();
    for (i, element) in config.elements.iter().enumerate() {
        let at = format!("elements[{i}]");
        problems.identifier(format!("{at}.name"), &element.name);
        if !seen.insert(element.name.as_str()) {
            problems.push(
                format!("{at}.name"),
                format!("element \"{}\" is defined more than once", element.name),
            );
        }
        if element.input.tag_priority.is_empty() {
            problems.push(format!("{at}.input.tag_priority"), "must have at least one element");
        }
        for (j, key) in element.input.tag_priority.iter().enumerate() {
            if key != FIELD_PSEUDO_KEY {
                problems.identifier(format!("{at}.input.tag_priority[{j}]"), key);
            }
        }
        let format = &element.output.format;
        problems.optional_identifier(format!("{at}.output.format.prefix"), &format.prefix);
        problems.optional_identifier(format!("{at}.output.format.suffix"), &format.suffix);
        problems.optional_identifier(
            format!("{at}.output.transform.value_separator"),
            &element.output.transform.value_separator,
        );
    }

    for (i, getter) in config.getters.iter().enumerate() {
        let at = format!("getters[{i}]");
        problems.identifier(format!("{at}.name"), &getter.name);
        if getter.returns.is_empty() {
            problems.push(format!("{at}.returns"), "must have at least one element");
        }
        for (j, token) in getter.returns.iter().enumerate() {
            if token != VALUE_TOKEN && config.element(token).is_none() {
                problems.push(
                    format!("{at}.returns[{j}]"),
                    format!("\"{token}\" is neither a configured element nor {VALUE_TOKEN}"),
                );
            }
        }
        problems.optional_identifier(format!("{at}.output.prefix"), &getter.output.prefix);
        problems.optional_identifier(format!("{at}.output.suffix"), &getter.output.suffix);
    }

    if problems.0.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { errors: problems.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_defaults;
    use crate::raw::{RawConfig, RawElement, RawGetter};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn errors(config: &Config) -> Vec<String> {
        match validate(config) {
            Ok(()) => Vec::new(),
            Err(ConfigError::Invalid { errors }) => errors,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    fn with_elements(names: &[&str]) -> RawConfig {
        RawConfig {
            elements: names
                .iter()
                .map(|n| RawElement {
                    name: (*n).to_string(),
                    ..RawElement::default()
                })
                .collect(),
            ..RawConfig::default()
        }
    }

    #[rstest]
    #[case("name", true)]
    #[case("_x9", true)]
    #[case("Field_Name", true)]
    #[case("9lives", false)]
    #[case("has-dash", false)]
    #[case("", false)]
    #[case("ñame", false)]
    fn identifiers(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(input), expected);
    }

    #[rstest]
    #[case("**/*.go", true)]
    #[case("models/{user,order}.go", true)]
    #[case("package:models", true)]
    #[case("package:my-models", false)]
    #[case("**/*.txt", false)]
    #[case("models/[.go", false)]
    fn source_patterns(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_source_pattern(input), expected);
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(errors(&apply_defaults(with_elements(&["json", "db"]))), Vec::<String>::new());
    }

    #[test]
    fn collects_every_problem() {
        let mut raw = with_elements(&["json", "json", "bad-name"]);
        raw.input.include = Some(vec!["src/*.rs".into()]);
        raw.output.file_name = Some("gen/out.go".into());
        raw.getters = vec![RawGetter {
            name: "fields".into(),
            returns: vec!["json".into(), ":value".into(), "xml".into(), ":type".into()],
            ..RawGetter::default()
        }];

        let found = errors(&apply_defaults(raw));
        assert_eq!(
            found,
            vec![
                "input.include[0]: \"src/*.rs\" must be a valid source pattern",
                "output.file_name: \"gen/out.go\" must be a valid Go filename",
                "elements[1].name: element \"json\" is defined more than once",
                "elements[2].name: \"bad-name\" is not a valid Go identifier",
                "elements[2].output.format.prefix: \"bad-name\" is not a valid Go identifier",
                "getters[0].returns[2]: \"xml\" is neither a configured element nor :value",
                "getters[0].returns[3]: \":type\" is neither a configured element nor :value",
            ]
        );
    }

    #[test]
    fn field_pseudo_key_is_allowed_in_tag_priority() {
        let mut raw = with_elements(&["name"]);
        raw.elements[0].input.tag_priority = Some(vec![":field".into(), "json".into()]);
        assert!(errors(&apply_defaults(raw)).is_empty());
    }

    #[test]
    fn getter_without_returns_is_rejected() {
        let mut raw = with_elements(&["json"]);
        raw.getters = vec![RawGetter {
            name: "empty".into(),
            ..RawGetter::default()
        }];
        assert_eq!(
            errors(&apply_defaults(raw)),
            vec!["getters[0].returns: must have at least one element"]
        );
    }
}
