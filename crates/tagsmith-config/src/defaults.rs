//! Defaulting: [`RawConfig`] → fully concrete [`Config`].
//!
//! Blank strings count as unset, as do empty include/exclude/tag-priority
//! lists.

use std::path::PathBuf;
use tagsmith_core::{
    Config, ElementConfig, ElementFormat, ElementInput, ElementOutput, ElementTransform,
    GetterConfig, GetterFormat, IdentFormat, InputConfig, InputMode, OutputConfig, OutputMode,
    SelectionPolicy, ValueCase,
};

use crate::raw::{RawConfig, RawElement, RawGetter, RawPolicy};

pub const DEFAULT_DIR: &str = ".";
pub const DEFAULT_INCLUDE: &[&str] = &["**/*.go"];
pub const DEFAULT_EXCLUDE: &[&str] = &["**/*_test.go"];
pub const DEFAULT_FILE_NAME: &str = "tagsmith_gen.go";
pub const DEFAULT_TAG_PRIORITY: &[&str] = &["field", "json", "xml", "yaml", "toml", "sql"];

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn list_or(value: Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    match value {
        Some(list) if !list.is_empty() => list,
        _ => default.iter().map(ToString::to_string).collect(),
    }
}

fn policy(raw: RawPolicy) -> SelectionPolicy {
    SelectionPolicy {
        explicit: raw.explicit.unwrap_or(false),
        include_unexported: raw.include_unexported.unwrap_or(false),
    }
}

fn element(raw: RawElement) -> ElementConfig {
    let format = raw.output.format;
    let transform = raw.output.transform;
    let prefix = non_blank(format.prefix).unwrap_or_else(|| raw.name.clone());
    ElementConfig {
        input: ElementInput {
            mode: raw.input.mode.unwrap_or(InputMode::TagThenField),
            tag_priority: list_or(raw.input.tag_priority, DEFAULT_TAG_PRIORITY),
        },
        output: ElementOutput {
            mode: raw.output.mode.unwrap_or(OutputMode::Constant),
            format: ElementFormat {
                holder: format.holder.unwrap_or(IdentFormat::Pascal),
                name: format.name.unwrap_or(IdentFormat::Pascal),
                prefix,
                suffix: non_blank(format.suffix).unwrap_or_default(),
            },
            transform: ElementTransform {
                tag_values: transform.tag_values.unwrap_or(false),
                value_case: transform.value_case.unwrap_or(ValueCase::AsIs),
                value_separator: transform.value_separator.unwrap_or_default(),
            },
        },
        name: raw.name,
    }
}

fn getter(raw: RawGetter) -> GetterConfig {
    let output = raw.output;
    GetterConfig {
        output: GetterFormat {
            prefix: non_blank(output.prefix).unwrap_or_else(|| raw.name.clone()),
            suffix: non_blank(output.suffix).unwrap_or_default(),
            format: output.format.unwrap_or(IdentFormat::Pascal),
        },
        name: raw.name,
        returns: raw.returns,
    }
}

/// Fill every unset value with its default.
#[must_use]
pub fn apply_defaults(raw: RawConfig) -> Config {
    let input = raw.input;
    let dir = input
        .dir
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
    Config {
        input: InputConfig {
            include: list_or(input.include, DEFAULT_INCLUDE),
            exclude: list_or(input.exclude, DEFAULT_EXCLUDE),
            dir,
            structs: policy(input.structs),
            fields: policy(input.fields),
        },
        output: OutputConfig {
            file_name: non_blank(raw.output.file_name)
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        },
        elements: raw.elements.into_iter().map(element).collect(),
        getters: raw.getters.into_iter().map(getter).collect(),
    }
}
