//! Source walker: expands include/exclude entries into a concrete file set.
//!
//! An entry is either a glob relative to the base directory (`**`, `{a,b}`
//! and character classes supported, `*` never crosses `/`) or the
//! `package:NAME` pseudo-pattern, which selects every `.go` file whose package
//! clause declares `NAME`. Only `.go` files are ever selected, and excludes
//! always win.
//!
//! The base directory is walked once with every standard filter disabled
//! (hidden files and ignore files are not special).

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tagsmith_core::{CoreError, InputConfig};
use tracing::debug;

const PACKAGE_PREFIX: &str = "package:";

/// One parsed include/exclude entry.
#[derive(Debug)]
enum SourcePattern {
    Glob(GlobMatcher),
    Package(String),
}

impl SourcePattern {
    fn parse(pattern: &str) -> Result<Self, CoreError> {
        if let Some(name) = pattern.strip_prefix(PACKAGE_PREFIX) {
            return Ok(Self::Package(name.to_string()));
        }
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| CoreError::pattern(pattern, e.kind()))?;
        Ok(Self::Glob(glob.compile_matcher()))
    }
}

/// A `.go` file under the base directory, with its slash-separated relative path.
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    relative: String,
}

/// Resolve the configured include/exclude entries into a sorted file list.
///
/// Paths are the base directory joined with the matched relative path.
///
/// # Errors
/// Returns `CoreError::Pattern` for a syntactically invalid glob and
/// `CoreError::Io` when the base directory does not exist.
pub fn find_files(input: &InputConfig) -> Result<Vec<PathBuf>, CoreError> {
    let excludes = parse_all(&input.exclude)?;
    let includes = parse_all(&input.include)?;

    if !input.dir.is_dir() {
        return Err(CoreError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("source directory {} does not exist", input.dir.display()),
        )));
    }
    let candidates = go_files(&input.dir);

    let mut excluded = BTreeSet::new();
    for pattern in &excludes {
        excluded.extend(expand(pattern, &candidates));
    }

    let mut selected = BTreeSet::new();
    for pattern in &includes {
        for path in expand(pattern, &candidates) {
            if !excluded.contains(&path) {
                selected.insert(path);
            }
        }
    }

    debug!(
        candidates = candidates.len(),
        excluded = excluded.len(),
        selected = selected.len(),
        "expanded source patterns"
    );
    Ok(selected.into_iter().collect())
}

fn parse_all(patterns: &[String]) -> Result<Vec<SourcePattern>, CoreError> {
    patterns.iter().map(|p| SourcePattern::parse(p)).collect()
}

fn expand(pattern: &SourcePattern, candidates: &[Candidate]) -> Vec<PathBuf> {
    match pattern {
        SourcePattern::Glob(matcher) => candidates
            .iter()
            .filter(|c| matcher.is_match(&c.relative))
            .map(|c| c.path.clone())
            .collect(),
        SourcePattern::Package(name) => candidates
            .iter()
            .filter(|c| match tagsmith_parser::package_clause_of(&c.path) {
                Ok(declared) => declared == *name,
                Err(e) => {
                    debug!(file = %c.path.display(), error = %e, "skipping file without readable package clause");
                    false
                }
            })
            .map(|c| c.path.clone())
            .collect(),
    }
}

fn go_files(root: &Path) -> Vec<Candidate> {
    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false);
    builder.hidden(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file())
            || !tagsmith_parser::is_go_file(entry.path())
        {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(Candidate {
            path: root.join(&relative),
            relative,
        });
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tagsmith_core::SelectionPolicy;

    fn create_fixture(dir: &Path) {
        for d in ["models", "models/sub", "api", ".hidden", "vendor"] {
            fs::create_dir_all(dir.join(d)).expect("mkdir should succeed");
        }
        let files = [
            ("main.go", "package main\n"),
            ("models/user.go", "package models\n"),
            ("models/user_test.go", "package models\n"),
            ("models/sub/deep.go", "// doc\npackage models\n"),
            ("api/handler.go", "package api\n"),
            ("api/broken.go", "not go at all"),
            (".hidden/secret.go", "package models\n"),
            ("vendor/dep.go", "package dep\n"),
            ("README.md", "# readme"),
            (".gitignore", "vendor/\n"),
        ];
        for (path, content) in files {
            fs::write(dir.join(path), content).expect("write should succeed");
        }
    }

    fn input(dir: &Path, include: &[&str], exclude: &[&str]) -> InputConfig {
        InputConfig {
            include: include.iter().map(ToString::to_string).collect(),
            exclude: exclude.iter().map(ToString::to_string).collect(),
            dir: dir.to_path_buf(),
            structs: SelectionPolicy::default(),
            fields: SelectionPolicy::default(),
        }
    }

    fn relative(dir: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(dir)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn recursive_glob_with_test_exclusion() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());
        let files = find_files(&input(tmp.path(), &["**/*.go"], &["**/*_test.go"])).unwrap();
        assert_eq!(
            relative(tmp.path(), &files),
            vec![
                ".hidden/secret.go",
                "api/broken.go",
                "api/handler.go",
                "main.go",
                "models/sub/deep.go",
                "models/user.go",
                "vendor/dep.go",
            ]
        );
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());
        let files = find_files(&input(tmp.path(), &["models/*.go"], &[])).unwrap();
        assert_eq!(
            relative(tmp.path(), &files),
            vec!["models/user.go", "models/user_test.go"]
        );
    }

    #[test]
    fn brace_alternation_is_supported() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());
        let files = find_files(&input(tmp.path(), &["{api,vendor}/*.go"], &["api/broken.go"])).unwrap();
        assert_eq!(
            relative(tmp.path(), &files),
            vec!["api/handler.go", "vendor/dep.go"]
        );
    }

    #[test]
    fn package_pattern_selects_by_package_clause() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());
        let files = find_files(&input(tmp.path(), &["package:models"], &["**/*_test.go"])).unwrap();
        assert_eq!(
            relative(tmp.path(), &files),
            vec![".hidden/secret.go", "models/sub/deep.go", "models/user.go"]
        );
    }

    #[test]
    fn package_exclusion_wins_over_glob_inclusion() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());
        let files = find_files(&input(tmp.path(), &["**/*.go"], &["package:models", "package:dep"])).unwrap();
        assert_eq!(
            relative(tmp.path(), &files),
            vec!["api/broken.go", "api/handler.go", "main.go"]
        );
    }

    #[test]
    fn overlapping_includes_are_deduplicated() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());
        let files = find_files(&input(tmp.path(), &["main.go", "*.go", "**/main.go"], &[])).unwrap();
        assert_eq!(relative(tmp.path(), &files), vec!["main.go"]);
    }

    #[test]
    fn invalid_glob_is_a_pattern_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = find_files(&input(tmp.path(), &["[abc.go"], &[])).unwrap_err();
        assert!(matches!(err, CoreError::Pattern { ref pattern, .. } if pattern == "[abc.go"));
    }

    #[test]
    fn invalid_exclude_fails_even_with_valid_includes() {
        let tmp = tempfile::tempdir().unwrap();
        let err = find_files(&input(tmp.path(), &["**/*.go"], &["{a.go"])).unwrap_err();
        assert!(matches!(err, CoreError::Pattern { .. }));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = find_files(&input(&tmp.path().join("nope"), &["**/*.go"], &[])).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
