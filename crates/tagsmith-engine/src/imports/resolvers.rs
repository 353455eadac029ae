//! Package-name resolution strategies for imports outside the current module.
//!
//! A [`ResolverChain`] asks each [`PackageNameResolver`] in turn and caches
//! every import path's outcome, hit or miss, for the rest of the run.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Environment variable naming the `go` executable.
pub const GO_BIN_ENV: &str = "TAGSMITH_GO_BIN";

/// Discovers the declared package name behind an import path.
pub trait PackageNameResolver {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Declared package name of `import_path`, or `None` when unknown.
    fn resolve(&self, import_path: &str, module_dir: Option<&Path>) -> Option<String>;
}

/// Fixed answers, for tests and offline runs.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    names: HashMap<String, String>,
}

impl StaticResolver {
    #[must_use]
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PackageNameResolver for StaticResolver {
    fn name(&self) -> &'static str {
        "static"
    }

    fn resolve(&self, import_path: &str, _module_dir: Option<&Path>) -> Option<String> {
        self.names.get(import_path).cloned()
    }
}

// ── go list ───────────────────────────────────────────────────────

/// Runs `go list -f {{.Name}} <path>` inside the module directory.
#[derive(Debug, Clone)]
pub struct GoListResolver {
    program: OsString,
}

impl GoListResolver {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uses `$TAGSMITH_GO_BIN`, falling back to `go` on the `PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(GO_BIN_ENV).unwrap_or_else(|| OsString::from("go")))
    }
}

impl PackageNameResolver for GoListResolver {
    fn name(&self) -> &'static str {
        "go list"
    }

    fn resolve(&self, import_path: &str, module_dir: Option<&Path>) -> Option<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["list", "-f", "{{.Name}}", import_path]);
        if let Some(dir) = module_dir {
            cmd.current_dir(dir);
        }
        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                debug!(program = ?self.program, error = %e, "go list unavailable");
                return None;
            }
        };
        if !output.status.success() {
            debug!(import = import_path, status = %output.status, "go list failed");
            return None;
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!name.is_empty() && name != "main").then_some(name)
    }
}

// ── module cache ──────────────────────────────────────────────────

/// Looks the import path up in local module caches.
#[derive(Debug, Clone, Default)]
pub struct ModuleCacheResolver {
    roots: Vec<PathBuf>,
}

impl ModuleCacheResolver {
    #[must_use]
    pub const fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// `$GOMODCACHE`, then `$GOPATH/pkg/mod`, then `~/go/pkg/mod`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut roots = Vec::new();
        if let Some(cache) = std::env::var_os("GOMODCACHE").filter(|v| !v.is_empty()) {
            roots.push(PathBuf::from(cache));
        }
        if let Some(gopath) = std::env::var_os("GOPATH").filter(|v| !v.is_empty()) {
            roots.extend(std::env::split_paths(&gopath).map(|p| p.join("pkg").join("mod")));
        }
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join("go").join("pkg").join("mod"));
        }
        roots.dedup();
        Self::new(roots)
    }

    fn resolve_in(root: &Path, import_path: &str) -> Option<String> {
        let segments: Vec<&str> = import_path.split('/').collect();
        if segments.len() < 2 {
            return None;
        }

        // Longest module prefix first: `a/b/c` tries `a/b/c@*`, then `a/b@*/c`.
        for split in (1..=segments.len()).rev() {
            let module = segments[..split].join("/");
            let sub = escape_path(&segments[split..].join("/"));
            for version_dir in versioned_dirs(root, &module) {
                if let Some(name) = super::read_package_name(&version_dir.join(&sub)) {
                    return Some(name);
                }
                // `<module>/vN` may live at the root of the `<module>@vN.x.y` tree.
                if split + 1 == segments.len()
                    && is_version_suffix(segments[split])
                    && let Some(name) = super::read_package_name(&version_dir)
                {
                    return Some(name);
                }
            }
        }

        super::read_package_name(&root.join(escape_path(import_path)))
    }
}

impl PackageNameResolver for ModuleCacheResolver {
    fn name(&self) -> &'static str {
        "module cache"
    }

    fn resolve(&self, import_path: &str, _module_dir: Option<&Path>) -> Option<String> {
        self.roots
            .iter()
            .filter(|root| root.is_dir())
            .find_map(|root| Self::resolve_in(root, import_path))
    }
}

/// `<root>/<module>@<version>` directories, newest name first.
fn versioned_dirs(root: &Path, module: &str) -> Vec<PathBuf> {
    let escaped = escape_path(module);
    let (parent, leaf) = match escaped.rsplit_once('/') {
        Some((parent, leaf)) => (root.join(parent), leaf.to_string()),
        None => (root.to_path_buf(), escaped.clone()),
    };
    let prefix = format!("{leaf}@");
    let Ok(entries) = std::fs::read_dir(&parent) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|ft| ft.is_dir()))
        .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs.reverse();
    dirs
}

/// `v2`, `v10`: a major-version path suffix.
#[must_use]
pub fn is_version_suffix(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Module-cache path escaping: every uppercase letter becomes `!` + lowercase.
#[must_use]
pub fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            out.push('!');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// ── chain ─────────────────────────────────────────────────────────

/// Ordered strategies with a per-import-path result cache.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn PackageNameResolver>>,
    cache: HashMap<String, Option<String>>,
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverChain")
            .field(
                "resolvers",
                &self.resolvers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl ResolverChain {
    #[must_use]
    pub fn new(resolvers: Vec<Box<dyn PackageNameResolver>>) -> Self {
        Self {
            resolvers,
            cache: HashMap::new(),
        }
    }

    /// `go list`, then the local module caches.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(vec![
            Box::new(GoListResolver::from_env()),
            Box::new(ModuleCacheResolver::from_env()),
        ])
    }

    /// Resolve through the chain, consulting each strategy at most once per path.
    pub fn resolve(&mut self, import_path: &str, module_dir: Option<&Path>) -> Option<String> {
        if let Some(hit) = self.cache.get(import_path) {
            return hit.clone();
        }
        let mut found = None;
        for resolver in &self.resolvers {
            if let Some(name) = resolver.resolve(import_path, module_dir) {
                debug!(import = import_path, package = %name, strategy = resolver.name(), "resolved package name");
                found = Some(name);
                break;
            }
        }
        if found.is_none() && !self.resolvers.is_empty() {
            warn!(import = import_path, "could not resolve package name, using path-derived name");
        }
        self.cache.insert(import_path.to_string(), found.clone());
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::cell::Cell;
    use std::fs;
    use std::rc::Rc;

    struct Counting {
        calls: Rc<Cell<usize>>,
        answer: Option<&'static str>,
    }

    impl PackageNameResolver for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn resolve(&self, _import_path: &str, _module_dir: Option<&Path>) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.answer.map(ToString::to_string)
        }
    }

    fn write_pkg(dir: &Path, package: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("doc.go"), format!("package {package}\n")).unwrap();
    }

    #[rstest]
    #[case("v2", true)]
    #[case("v10", true)]
    #[case("v", false)]
    #[case("v2a", false)]
    #[case("yaml.v3", false)]
    fn version_suffixes(#[case] segment: &str, #[case] expected: bool) {
        assert_eq!(is_version_suffix(segment), expected);
    }

    #[test]
    fn escapes_uppercase_letters() {
        assert_eq!(escape_path("github.com/BurntSushi/toml"), "github.com/!burnt!sushi/toml");
    }

    #[test]
    fn chain_caches_hits_and_misses() {
        let calls = Rc::new(Cell::new(0));
        let mut chain = ResolverChain::new(vec![Box::new(Counting {
            calls: Rc::clone(&calls),
            answer: None,
        })]);
        assert_eq!(chain.resolve("example.com/x", None), None);
        assert_eq!(chain.resolve("example.com/x", None), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn chain_stops_at_first_answer() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut chain = ResolverChain::new(vec![
            Box::new(Counting {
                calls: Rc::clone(&first),
                answer: Some("yaml"),
            }),
            Box::new(Counting {
                calls: Rc::clone(&second),
                answer: Some("other"),
            }),
        ]);
        assert_eq!(chain.resolve("gopkg.in/yaml.v3", None).as_deref(), Some("yaml"));
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn static_resolver_answers_known_paths() {
        let resolver = StaticResolver::new([("gopkg.in/yaml.v3", "yaml")]);
        assert_eq!(resolver.resolve("gopkg.in/yaml.v3", None).as_deref(), Some("yaml"));
        assert_eq!(resolver.resolve("fmt", None), None);
    }

    #[test]
    fn go_list_with_missing_binary_gives_no_answer() {
        let resolver = GoListResolver::new("/definitely/not/a/go/binary");
        assert_eq!(resolver.resolve("fmt", None), None);
    }

    #[test]
    fn module_cache_finds_versioned_subdirectory() {
        let tmp = tempfile::tempdir().unwrap();
        write_pkg(&tmp.path().join("github.com/gofrs/uuid@v5.4.0/v5"), "uuid");
        let resolver = ModuleCacheResolver::new(vec![tmp.path().to_path_buf()]);
        assert_eq!(
            resolver.resolve("github.com/gofrs/uuid/v5", None).as_deref(),
            Some("uuid")
        );
    }

    #[test]
    fn module_cache_finds_versioned_module_root() {
        let tmp = tempfile::tempdir().unwrap();
        write_pkg(&tmp.path().join("github.com/gofrs/uuid/v5@v5.4.0"), "uuid");
        let resolver = ModuleCacheResolver::new(vec![tmp.path().to_path_buf()]);
        assert_eq!(
            resolver.resolve("github.com/gofrs/uuid/v5", None).as_deref(),
            Some("uuid")
        );
    }

    #[test]
    fn module_cache_finds_subpackages_of_escaped_modules() {
        let tmp = tempfile::tempdir().unwrap();
        write_pkg(
            &tmp.path().join("github.com/!burnt!sushi/toml@v1.3.2/internal"),
            "tz",
        );
        let resolver = ModuleCacheResolver::new(vec![tmp.path().to_path_buf()]);
        assert_eq!(
            resolver
                .resolve("github.com/BurntSushi/toml/internal", None)
                .as_deref(),
            Some("tz")
        );
    }

    #[test]
    fn module_cache_falls_back_to_literal_path() {
        let tmp = tempfile::tempdir().unwrap();
        write_pkg(&tmp.path().join("example.com/plain/pkg"), "pkg");
        let resolver = ModuleCacheResolver::new(vec![tmp.path().to_path_buf()]);
        assert_eq!(resolver.resolve("example.com/plain/pkg", None).as_deref(), Some("pkg"));
    }

    #[test]
    fn module_cache_misses_unknown_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = ModuleCacheResolver::new(vec![tmp.path().to_path_buf()]);
        assert_eq!(resolver.resolve("example.com/none", None), None);
    }
}
