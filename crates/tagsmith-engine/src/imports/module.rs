//! `go.mod` discovery.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The module a source file belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Directory holding `go.mod`.
    pub dir: PathBuf,
    /// Module path from the `module` directive; empty when none was found.
    pub path: String,
}

impl ModuleInfo {
    /// Path of `import_path` relative to this module, if it lives inside it.
    #[must_use]
    pub fn relative(&self, import_path: &str) -> Option<String> {
        if self.path.is_empty() {
            return None;
        }
        if import_path == self.path {
            return Some(String::new());
        }
        import_path
            .strip_prefix(&self.path)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(ToString::to_string)
    }
}

/// Walks up from source files to their `go.mod`, remembering every answer.
#[derive(Debug, Default)]
pub struct ModuleLocator {
    cache: HashMap<PathBuf, Option<ModuleInfo>>,
}

impl ModuleLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Module of the file at `file`, or `None` outside any module.
    pub fn locate(&mut self, file: &Path) -> Option<ModuleInfo> {
        let start = file.parent().unwrap_or(file).to_path_buf();
        if let Some(hit) = self.cache.get(&start) {
            return hit.clone();
        }

        let mut visited = Vec::new();
        let mut dir = Some(start.as_path());
        let found = loop {
            let Some(current) = dir else {
                break None;
            };
            if let Some(hit) = self.cache.get(current) {
                break hit.clone();
            }
            visited.push(current.to_path_buf());
            let go_mod = current.join("go.mod");
            if go_mod.is_file() {
                let path = std::fs::read_to_string(&go_mod)
                    .map(|content| module_directive(&content).unwrap_or_default())
                    .unwrap_or_default();
                debug!(dir = %current.display(), module = %path, "located go.mod");
                break Some(ModuleInfo {
                    dir: current.to_path_buf(),
                    path,
                });
            }
            dir = current.parent().filter(|p| !p.as_os_str().is_empty());
        };

        for dir in visited {
            self.cache.insert(dir, found.clone());
        }
        found
    }
}

/// Argument of the first `module` directive in a `go.mod` file.
#[must_use]
pub fn module_directive(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.split("//").next().unwrap_or_default().trim();
        let path = rest.trim_matches(|c| c == '"' || c == '`');
        (!path.is_empty()).then(|| path.to_string())
    })
}
