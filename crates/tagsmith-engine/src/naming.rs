//! Value derivation and identifier formatting.
//!
//! Words are split at `_ - space . /` and at an uppercase letter that follows
//! a non-uppercase one, so `HTTPServer` stays one word while `userID` splits
//! into `user` and `ID`.

use tagsmith_core::{ElementConfig, IdentFormat, InputMode, ValueCase};
use tagsmith_parser::StructTag;

/// Tag-priority pseudo-key standing for the field identifier itself.
pub const FIELD_PSEUDO_KEY: &str = ":field";

const fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | ' ' | '.' | '/')
}

/// Split a string into words.
#[must_use]
pub fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if is_separator(c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else {
            if c.is_uppercase() && !current.is_empty() && !prev.is_some_and(char::is_uppercase) {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn title(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// `first_name` → `firstName`.
#[must_use]
pub fn to_camel(s: &str) -> String {
    let mut words = split_words(s).into_iter();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out = first.to_lowercase();
    out.extend(words.map(|w| title(&w)));
    out
}

/// `first_name` → `FirstName`.
#[must_use]
pub fn to_pascal(s: &str) -> String {
    split_words(s).iter().map(|w| title(w)).collect()
}

/// Apply an identifier format to an already space-joined base.
#[must_use]
pub fn format_ident(base: &str, format: IdentFormat) -> String {
    match format {
        IdentFormat::Camel => to_camel(base),
        IdentFormat::Pascal => to_pascal(base),
        IdentFormat::Snake => split_words(base).join("_").to_lowercase(),
        IdentFormat::SnakeUpper => split_words(base).join("_").to_uppercase(),
    }
}

/// Join the non-empty parts with spaces and format the result.
#[must_use]
pub fn build_name(parts: &[&str], format: IdentFormat) -> String {
    let base = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    format_ident(&base, format)
}

/// Apply a value case, then rejoin the words with `separator` when one is set.
#[must_use]
pub fn transform_value(value: &str, case: ValueCase, separator: &str) -> String {
    let mut value = if !separator.is_empty() && case != ValueCase::AsIs {
        split_words(value).join(" ")
    } else {
        value.to_string()
    };
    value = match case {
        ValueCase::AsIs => value,
        ValueCase::Camel => to_camel(&value),
        ValueCase::Pascal => to_pascal(&value),
        ValueCase::Upper => value.to_uppercase(),
        ValueCase::Lower => value.to_lowercase(),
    };
    if separator.is_empty() {
        value
    } else {
        split_words(&value).join(separator)
    }
}

/// Value of the first present tag key in priority order.
///
/// Only the part before the first comma counts. That part may be empty
/// (`json:",omitempty"`); the key still wins and the field yields nothing.
fn tag_value(field_name: &str, tag: &StructTag<'_>, priority: &[String]) -> Option<String> {
    for key in priority {
        if key == FIELD_PSEUDO_KEY {
            return Some(field_name.to_string());
        }
        if let Some(value) = tag.get(key) {
            return Some(value.split(',').next().unwrap_or_default().to_string());
        }
    }
    None
}

/// Value of one element for one field, or `None` when it yields nothing.
#[must_use]
pub fn element_value(field_name: &str, tag: &StructTag<'_>, element: &ElementConfig) -> Option<String> {
    let transform = &element.output.transform;
    let apply = |s: &str| transform_value(s, transform.value_case, &transform.value_separator);
    let from_tag = || {
        tag_value(field_name, tag, &element.input.tag_priority)
            .map(|v| if transform.tag_values { apply(&v) } else { v })
    };

    let value = match element.input.mode {
        InputMode::Tag => from_tag(),
        InputMode::Field => Some(apply(field_name)),
        InputMode::TagThenField => from_tag().or_else(|| Some(apply(field_name))),
    };
    value.filter(|v| !v.is_empty())
}
