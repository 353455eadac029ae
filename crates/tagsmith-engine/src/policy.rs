//! Struct and field inclusion policy.
//!
//! Structs are steered by directive comments (`//tagsmith:include`,
//! `//tagsmith:exclude`), fields by the `tagsmith:"include"` /
//! `tagsmith:"exclude"` tag. Without an override, the explicit and
//! unexported settings of the matching [`SelectionPolicy`] decide.

use tagsmith_core::SelectionPolicy;
use tagsmith_parser::StructTag;

pub const INCLUDE_DIRECTIVE: &str = "tagsmith:include";
pub const EXCLUDE_DIRECTIVE: &str = "tagsmith:exclude";

/// Tag key carrying the per-field override.
pub const FIELD_TAG_KEY: &str = "tagsmith";

/// Directives found in a struct's doc comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directives {
    pub include: bool,
    pub exclude: bool,
}

/// Outcome of the struct-level policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructDecision {
    Include,
    Skip,
    /// Both directives present; reported and skipped.
    Conflict,
}

/// Go visibility: a name starting with an uppercase letter is exported.
#[must_use]
pub fn is_exported(name: &str) -> bool {
    name.starts_with(char::is_uppercase)
}

/// Scan raw comments for directives.
///
/// A directive counts only at the start of a comment line, after the comment
/// markers and any leading whitespace, and must be followed by whitespace or
/// the end of the line. Mentions inside prose are ignored.
#[must_use]
pub fn directives(comments: &[String]) -> Directives {
    let mut found = Directives::default();
    for line in comments.iter().flat_map(|c| comment_lines(c)) {
        if starts_with_token(line, INCLUDE_DIRECTIVE) {
            found.include = true;
        }
        if starts_with_token(line, EXCLUDE_DIRECTIVE) {
            found.exclude = true;
        }
    }
    found
}

/// Apply the struct-level policy to a declaration.
#[must_use]
pub fn struct_decision(name: &str, comments: &[String], policy: &SelectionPolicy) -> StructDecision {
    let found = directives(comments);
    if found.include && found.exclude {
        return StructDecision::Conflict;
    }
    if found.exclude || (policy.explicit && !found.include) {
        return StructDecision::Skip;
    }
    if !found.include && !policy.include_unexported && !is_exported(name) {
        return StructDecision::Skip;
    }
    StructDecision::Include
}

/// Apply the field-level policy. `name` is the first name of the declaration.
#[must_use]
pub fn include_field(name: &str, tag: &StructTag<'_>, policy: &SelectionPolicy) -> bool {
    let marker = tag.get(FIELD_TAG_KEY);
    match marker.as_deref() {
        Some("exclude") => return false,
        Some("include") => return true,
        _ => {}
    }
    if policy.explicit && marker.is_none() {
        return false;
    }
    policy.include_unexported || is_exported(name)
}

fn comment_lines(comment: &str) -> Vec<&str> {
    if let Some(line) = comment.strip_prefix("//") {
        return vec![line.trim_start()];
    }
    let body = comment.strip_prefix("/*").unwrap_or(comment);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix('*')
                .filter(|rest| !rest.starts_with('/'))
                .unwrap_or(line)
                .trim_start()
        })
        .collect()
}

fn starts_with_token(line: &str, token: &str) -> bool {
    line.strip_prefix(token)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}
