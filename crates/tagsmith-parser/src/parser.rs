//! ast-grep wrapper and the cheap package-clause scan.

use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::{LanguageExt, SupportLang};
use std::path::Path;

/// The concrete AST tree type returned by `parse_source`.
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// Parse Go source code into an ast-grep tree.
#[must_use]
pub fn parse_source(source: &str) -> AstTree {
    SupportLang::Go.ast_grep(source)
}

/// Whether a path names a Go source file.
#[must_use]
pub fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

/// Read only the package clause of a Go file.
///
/// Skips leading whitespace and comments, then expects `package IDENT`.
/// Nothing past the clause is looked at, so a file with a broken body still
/// reports its package. Returns `None` when the clause is absent or malformed.
#[must_use]
pub fn package_clause(source: &str) -> Option<String> {
    let rest = skip_trivia(source);
    let rest = rest.strip_prefix("package")?;
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '/') {
        return None;
    }
    let rest = skip_trivia(rest);
    let ident: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let after = &rest[ident.len()..];
    if let Some(next) = after.chars().next()
        && !(next.is_whitespace() || next == ';' || next == '/')
    {
        return None;
    }
    Some(ident)
}

/// Read the package clause of the file at `path`.
///
/// # Errors
/// Returns `ParserError::Io` when the file cannot be read and
/// `ParserError::MissingPackageClause` when no clause is found.
pub fn package_clause_of(path: &Path) -> Result<String, crate::ParserError> {
    let source = std::fs::read_to_string(path)?;
    package_clause(&source).ok_or(crate::ParserError::MissingPackageClause)
}

fn skip_trivia(mut s: &str) -> &str {
    loop {
        s = s.trim_start();
        if let Some(rest) = s.strip_prefix("//") {
            s = rest.find('\n').map_or("", |i| &rest[i + 1..]);
        } else if let Some(rest) = s.strip_prefix("/*") {
            match rest.find("*/") {
                Some(i) => s = &rest[i + 2..],
                None => return "",
            }
        } else {
            return s;
        }
    }
}
