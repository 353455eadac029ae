//! Output model produced by the engine and consumed by the renderer.
//!
//! One [`Model`] exists per run. Packages are keyed by directory path and
//! created lazily by [`Model::add_struct`], which also merges the imports a
//! package's getters need and assigns collision aliases.

use serde::Serialize;
use std::collections::BTreeMap;

/// Upper bound on alias rounds for a single import. Each round prefixes one
/// `_`, and a package can only hold as many colliding names as it has imports,
/// so this is never reached in practice.
const MAX_ALIAS_ROUNDS: usize = 1024;

/// Root aggregate of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Model {
    /// Packages keyed by directory path (forward slashes).
    pub packages: BTreeMap<String, PackageModel>,
    pub files_scanned: usize,
    pub packages_found: usize,
    pub structs_found: usize,
    pub fields_found: usize,
    /// Non-fatal diagnostics, in the order they were recorded.
    pub errors: Vec<ScanError>,
}

/// Generated code for one source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageModel {
    pub name: String,
    pub path: String,
    /// Imports the generated file needs, unique by path, in first-request order.
    pub imports: Vec<TypePackageOutput>,
    pub structs: Vec<StructModel>,
}

impl PackageModel {
    #[must_use]
    pub fn import(&self, path: &str) -> Option<&TypePackageOutput> {
        self.imports.iter().find(|imp| imp.path == path)
    }
}

/// Artifacts for one included struct declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructModel {
    pub name: String,
    pub file: String,
    pub line: usize,
    /// Names of the struct's type parameters, for generic receivers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    pub constants: Vec<ConstantOutput>,
    pub structs: Vec<StructOutput>,
    pub getters: Vec<GetterOutput>,
}

impl StructModel {
    #[must_use]
    pub fn new(name: impl Into<String>, file: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line,
            ..Self::default()
        }
    }

    /// True when no constant, accessor record or getter was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty() && self.structs.is_empty() && self.getters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub file: String,
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantOutput {
    pub name: String,
    pub value: String,
}

/// Accessor record shared by every field that produced a value for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructOutput {
    pub name: String,
    pub package: String,
    pub fields: Vec<FieldOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOutput {
    pub struct_name: String,
    pub name: String,
    pub value: String,
}

/// Transient value of an element with no durable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoneOutput {
    pub name: String,
    pub value: String,
}

/// Declared type of a field, for getters returning the live value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueOutput {
    pub field_name: String,
    /// Syntactic spelling, e.g. `[]*yaml.Node` or `map[string]int`.
    pub type_name: String,
    pub type_package: TypePackageOutput,
    /// Package identifier as written in `type_name`, when the type is qualified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypePackageOutput {
    pub path: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TypePackageOutput {
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            alias: None,
        }
    }

    /// Identifier the generated code uses for this package.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    fn answers_to(&self, ident: &str) -> bool {
        self.name == ident || self.alias.as_deref() == Some(ident)
    }
}

/// Exactly one facet returned by a getter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReturnOutput {
    Field(FieldOutput),
    Constant(ConstantOutput),
    None(NoneOutput),
    Value(ValueOutput),
}

impl ReturnOutput {
    #[must_use]
    pub const fn as_value(&self) -> Option<&ValueOutput> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetterOutput {
    pub name: String,
    pub returns: Vec<ReturnOutput>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a struct to its package, merging the imports its value getters need.
    ///
    /// New import paths are appended in request order. When a new import's name
    /// collides with the name or alias of another import in the same package, it
    /// receives an alias with one more leading `_`, repeated until it is unique.
    /// Every [`ValueOutput`] in the struct is rewritten to carry the registered
    /// entry, alias included.
    pub fn add_struct(&mut self, package_path: &str, package_name: &str, mut model: StructModel) {
        if !self.packages.contains_key(package_path) {
            self.packages.insert(
                package_path.to_string(),
                PackageModel {
                    name: package_name.to_string(),
                    path: package_path.to_string(),
                    imports: Vec::new(),
                    structs: Vec::new(),
                },
            );
            self.packages_found += 1;
        }
        let Some(pkg) = self.packages.get_mut(package_path) else {
            return;
        };

        for getter in &mut model.getters {
            for ret in &mut getter.returns {
                let ReturnOutput::Value(value) = ret else {
                    continue;
                };
                if value.type_package.path.is_empty() {
                    continue;
                }
                let registered = match pkg.import(&value.type_package.path) {
                    Some(existing) => existing.clone(),
                    None => register_import(&mut pkg.imports, value.type_package.clone()),
                };
                value.type_package = registered;
            }
        }

        pkg.structs.push(model);
        self.structs_found += 1;
    }

    /// Record a non-fatal diagnostic.
    pub fn add_error(&mut self, file: impl Into<String>, line: usize, message: impl Into<String>) {
        self.errors.push(ScanError {
            file: file.into(),
            line,
            message: message.into(),
        });
    }

    /// Packages that will produce a generated file.
    pub fn non_empty_packages(&self) -> impl Iterator<Item = &PackageModel> {
        self.packages.values().filter(|p| !p.structs.is_empty())
    }
}

fn register_import(imports: &mut Vec<TypePackageOutput>, mut import: TypePackageOutput) -> TypePackageOutput {
    let mut candidate = import.name.clone();
    for _ in 0..MAX_ALIAS_ROUNDS {
        let collides = imports
            .iter()
            .any(|other| other.path != import.path && other.answers_to(&candidate));
        if !collides {
            break;
        }
        candidate = format!("_{candidate}");
        import.alias = Some(candidate.clone());
    }
    imports.push(import.clone());
    import
}
