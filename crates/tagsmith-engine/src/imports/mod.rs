//! Import resolution: from the identifiers a file uses to real packages.
//!
//! For each file an [`ImportIndex`] maps the identifier used in code (alias or
//! last path segment) and the package's true declared name to the import. True
//! names come from the module's own source tree for local imports and from the
//! [`ResolverChain`] for everything else, falling back to the identifier.

use std::path::Path;
use tagsmith_core::TypePackageOutput;
use tagsmith_parser::GoFile;
use tracing::debug;

mod module;
mod resolvers;
mod types;

pub use module::{ModuleInfo, ModuleLocator, module_directive};
pub use resolvers::{
    GO_BIN_ENV, GoListResolver, ModuleCacheResolver, PackageNameResolver, ResolverChain,
    StaticResolver, escape_path, is_version_suffix,
};
pub use types::{ResolvedType, resolve_type, value_output};

/// Identifier → import entry, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportIndex {
    entries: Vec<(String, TypePackageOutput)>,
}

impl ImportIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `ident`, keeping its original position.
    pub fn insert(&mut self, ident: &str, entry: TypePackageOutput) {
        match self.entries.iter_mut().find(|(key, _)| key == ident) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((ident.to_string(), entry)),
        }
    }

    #[must_use]
    pub fn get(&self, ident: &str) -> Option<&TypePackageOutput> {
        self.entries
            .iter()
            .find(|(key, _)| key == ident)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypePackageOutput)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the import index for one parsed file.
///
/// Blank (`_`) and dot (`.`) imports are skipped.
pub fn build_import_index(
    file: &GoFile,
    module: Option<&ModuleInfo>,
    resolver: &mut ResolverChain,
) -> ImportIndex {
    let mut index = ImportIndex::new();
    for import in &file.imports {
        let ident = import.local_name();
        if ident == "_" || ident == "." {
            continue;
        }

        let local_dir = module.and_then(|m| {
            m.relative(&import.path)
                .map(|rel| m.dir.join(rel.replace('/', std::path::MAIN_SEPARATOR_STR)))
        });
        let resolved = match &local_dir {
            Some(dir) => read_package_name(dir),
            None => resolver.resolve(&import.path, module.map(|m| m.dir.as_path())),
        };
        let real_name = resolved.unwrap_or_else(|| ident.to_string());
        debug!(import = %import.path, ident, package = %real_name, local = local_dir.is_some(), "indexed import");

        index.insert(ident, TypePackageOutput::new(&import.path, &real_name));
        if ident != real_name {
            let keep_existing = index.get(&real_name).is_some_and(|e| !e.path.is_empty());
            if !keep_existing {
                index.insert(&real_name, TypePackageOutput::new(&import.path, &real_name));
            }
        }
    }
    index
}

/// Declared package name of the Go sources in `dir`.
///
/// Files are tried in name order, `_test.go` files last, and the first one
/// with a readable package clause wins.
#[must_use]
pub fn read_package_name(dir: &Path) -> Option<String> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut files: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|ft| ft.is_file()))
        .map(|e| e.path())
        .filter(|p| tagsmith_parser::is_go_file(p))
        .collect();
    files.sort_by_key(|p| {
        let is_test = p
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with("_test.go"));
        (is_test, p.clone())
    });
    files
        .iter()
        .find_map(|p| tagsmith_parser::package_clause_of(p).ok())
}
