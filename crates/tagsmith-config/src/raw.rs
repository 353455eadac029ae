//! The configuration document as written, before defaulting.
//!
//! Every leaf is optional so that each figment layer only contributes the keys
//! it actually sets. Unset leaves are skipped when serialized, which lets a
//! sparse `RawConfig` act as an override layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tagsmith_core::{IdentFormat, InputMode, OutputMode, ValueCase};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawConfig {
    pub input: RawInput,
    pub output: RawOutput,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<RawElement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub getters: Vec<RawGetter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(rename = "struct")]
    pub structs: RawPolicy,
    #[serde(rename = "field")]
    pub fields: RawPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_unexported: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawElement {
    pub name: String,
    pub input: RawElementInput,
    pub output: RawElementOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawElementInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<InputMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_priority: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawElementOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<OutputMode>,
    pub format: RawElementFormat,
    pub transform: RawElementTransform,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawElementFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder: Option<IdentFormat>,
    #[serde(rename = "struct", skip_serializing_if = "Option::is_none")]
    pub name: Option<IdentFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawElementTransform {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_case: Option<ValueCase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_separator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawGetter {
    pub name: String,
    pub returns: Vec<String>,
    pub output: RawGetterFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawGetterFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<IdentFormat>,
}
