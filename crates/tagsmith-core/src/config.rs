//! Resolved configuration consumed by the model-building engine.
//!
//! These values are produced by `tagsmith-config` after defaulting and
//! validation. Every field is concrete: the engine never guesses defaults.
//!
//! Enums serialize in `camelCase` (`tagThenField`, `snakeUpper`, `asIs`) to
//! match the configuration document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// InputMode
// ---------------------------------------------------------------------------

/// Where an element takes its raw value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    /// First present tag key from the priority list, nothing otherwise.
    Tag,
    /// The field identifier, always transformed.
    Field,
    /// Tag lookup first, the field identifier when no tag answers.
    TagThenField,
}

impl InputMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Field => "field",
            Self::TagThenField => "tagThenField",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OutputMode
// ---------------------------------------------------------------------------

/// Which artifact an element produces for each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputMode {
    /// No durable output; the value is only available to getters.
    None,
    /// A top-level named string constant.
    Constant,
    /// A field in the element's accessor record for the struct.
    Struct,
}

impl OutputMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Constant => "constant",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IdentFormat
// ---------------------------------------------------------------------------

/// Identifier format for generated names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentFormat {
    Camel,
    #[default]
    Pascal,
    Snake,
    SnakeUpper,
}

impl IdentFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Camel => "camel",
            Self::Pascal => "pascal",
            Self::Snake => "snake",
            Self::SnakeUpper => "snakeUpper",
        }
    }
}

impl fmt::Display for IdentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ValueCase
// ---------------------------------------------------------------------------

/// Case applied to element values by the transform step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueCase {
    #[default]
    AsIs,
    Camel,
    Pascal,
    Upper,
    Lower,
}

impl ValueCase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AsIs => "asIs",
            Self::Camel => "camel",
            Self::Pascal => "pascal",
            Self::Upper => "upper",
            Self::Lower => "lower",
        }
    }
}

impl fmt::Display for ValueCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Config tree
// ---------------------------------------------------------------------------

/// Fully resolved generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub elements: Vec<ElementConfig>,
    pub getters: Vec<GetterConfig>,
}

impl Config {
    /// Look up an element definition by name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&ElementConfig> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// Source selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Glob patterns or `package:NAME` entries, relative to `dir`.
    pub include: Vec<String>,
    /// Same syntax as `include`; excludes always win.
    pub exclude: Vec<String>,
    /// Base directory for pattern expansion.
    pub dir: PathBuf,
    /// Struct-level inclusion policy.
    #[serde(rename = "struct")]
    pub structs: SelectionPolicy,
    /// Field-level inclusion policy.
    #[serde(rename = "field")]
    pub fields: SelectionPolicy,
}

/// Inclusion policy shared by structs and fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Only items carrying an include directive are processed.
    pub explicit: bool,
    /// Items whose name is not exported are processed too.
    pub include_unexported: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Generated file name, written into each package directory.
    pub file_name: String,
}

/// One configured element: how to derive a value and what to emit for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementConfig {
    pub name: String,
    pub input: ElementInput,
    pub output: ElementOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInput {
    pub mode: InputMode,
    /// Tag keys in lookup order. `:field` stands for the field name itself.
    pub tag_priority: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementOutput {
    pub mode: OutputMode,
    pub format: ElementFormat,
    pub transform: ElementTransform,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementFormat {
    /// Format of the field name inside an accessor record.
    pub holder: IdentFormat,
    /// Format of constant and accessor record names.
    #[serde(rename = "struct")]
    pub name: IdentFormat,
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTransform {
    /// Apply the case/separator transform to values read from tags too.
    pub tag_values: bool,
    pub value_case: ValueCase,
    /// Rejoin words with this separator when non-empty.
    pub value_separator: String,
}

/// One configured getter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetterConfig {
    pub name: String,
    /// Element names, or the reserved `:value` token.
    pub returns: Vec<String>,
    pub output: GetterFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetterFormat {
    pub prefix: String,
    pub suffix: String,
    pub format: IdentFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(InputMode::TagThenField, "\"tagThenField\"")]
    #[case(InputMode::Tag, "\"tag\"")]
    #[case(InputMode::Field, "\"field\"")]
    fn input_mode_uses_document_spelling(#[case] mode: InputMode, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&mode).unwrap(), json);
        assert_eq!(format!("\"{mode}\""), json);
    }

    #[rstest]
    #[case(IdentFormat::SnakeUpper, "snakeUpper")]
    #[case(IdentFormat::Pascal, "pascal")]
    fn ident_format_parses_camel_case_names(#[case] expected: IdentFormat, #[case] raw: &str) {
        let parsed: IdentFormat = serde_json::from_str(&format!("\"{raw}\"")).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn defaults_are_pascal_and_as_is() {
        assert_eq!(IdentFormat::default(), IdentFormat::Pascal);
        assert_eq!(ValueCase::default(), ValueCase::AsIs);
    }

    #[test]
    fn value_case_rejects_unknown_spelling() {
        let parsed: Result<ValueCase, _> = serde_json::from_str("\"title\"");
        assert!(parsed.is_err());
    }
}
