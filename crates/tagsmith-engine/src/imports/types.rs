//! Declared-type resolution against a file's [`ImportIndex`].
//!
//! Resolution is best effort: an unknown qualifier keeps its spelling and
//! yields a package with an empty path instead of failing.

use std::path::Path;
use tagsmith_core::{TypePackageOutput, ValueOutput};
use tagsmith_parser::{ChanDir, TypeExpr};

use super::{ImportIndex, ResolverChain};

/// Spelling of a type plus the package that owns its outermost named part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub spelling: String,
    pub package: Option<TypePackageOutput>,
    /// Identifier written before the `.` of the owning qualified name.
    pub qualifier: Option<String>,
}

impl ResolvedType {
    fn plain(spelling: impl Into<String>) -> Self {
        Self {
            spelling: spelling.into(),
            package: None,
            qualifier: None,
        }
    }

    fn wrap(self, prefix: &str) -> Self {
        Self {
            spelling: format!("{prefix}{}", self.spelling),
            ..self
        }
    }
}

/// Resolve a declared type expression.
///
/// A qualifier is looked up by identifier, then by true package name
/// (preferring entries with a path), then by path segment. Maps take their
/// package from the value type, generics from the base type.
#[must_use]
pub fn resolve_type(expr: &TypeExpr, index: &ImportIndex) -> ResolvedType {
    match expr {
        TypeExpr::Named { name } => ResolvedType::plain(name.as_str()),
        TypeExpr::Qualified { package, name } => resolve_qualified(package, name, index),
        TypeExpr::Pointer { elem } => resolve_type(elem, index).wrap("*"),
        TypeExpr::Slice { elem } => resolve_type(elem, index).wrap("[]"),
        TypeExpr::Array { len, elem } => resolve_type(elem, index).wrap(&format!("[{len}]")),
        TypeExpr::Map { key, value } => {
            let key = resolve_type(key, index);
            resolve_type(value, index).wrap(&format!("map[{}]", key.spelling))
        }
        TypeExpr::Chan { dir, elem } => {
            let prefix = match dir {
                ChanDir::Both => "chan ",
                ChanDir::Send => "chan<- ",
                ChanDir::Recv => "<-chan ",
            };
            resolve_type(elem, index).wrap(prefix)
        }
        TypeExpr::Func | TypeExpr::Interface | TypeExpr::Struct => ResolvedType::plain(expr.to_string()),
        TypeExpr::Generic { base, args } => {
            let base = resolve_type(base, index);
            let args: Vec<String> = args
                .iter()
                .map(|arg| resolve_type(arg, index).spelling)
                .collect();
            ResolvedType {
                spelling: format!("{}[{}]", base.spelling, args.join(", ")),
                ..base
            }
        }
    }
}

fn resolve_qualified(ident: &str, name: &str, index: &ImportIndex) -> ResolvedType {
    let found = index
        .get(ident)
        .or_else(|| {
            let mut by_name = index.iter().map(|(_, e)| e).filter(|e| e.name == ident);
            let first = by_name.next()?;
            if first.path.is_empty() {
                Some(by_name.find(|e| !e.path.is_empty()).unwrap_or(first))
            } else {
                Some(first)
            }
        })
        .or_else(|| {
            index
                .iter()
                .map(|(_, e)| e)
                .find(|e| !e.path.is_empty() && has_segment(&e.path, ident))
        });

    match found {
        Some(entry) if entry.path.is_empty() => ResolvedType {
            spelling: name.to_string(),
            package: Some(TypePackageOutput::new("", &entry.name)),
            qualifier: None,
        },
        Some(entry) => ResolvedType {
            spelling: format!("{ident}.{name}"),
            package: Some(TypePackageOutput::new(&entry.path, &entry.name)),
            qualifier: Some(ident.to_string()),
        },
        None => ResolvedType {
            spelling: format!("{ident}.{name}"),
            package: Some(TypePackageOutput::new("", ident)),
            qualifier: Some(ident.to_string()),
        },
    }
}

fn has_segment(path: &str, segment: &str) -> bool {
    !segment.is_empty() && path.split('/').any(|s| s == segment)
}

/// Build the [`ValueOutput`] for a field's declared type.
///
/// After structural resolution, a package that has a name but no path is
/// matched against the index once more by name, then by the identifier
/// written in code; a dotted identifier such as `yaml.v3` is turned into a
/// package name through the resolver, or derived from a `gopkg.in/NAME.vN`
/// path. Unqualified types belong to `package_name` with an empty path.
pub fn value_output(
    field_name: &str,
    ty: &TypeExpr,
    package_name: &str,
    index: &ImportIndex,
    resolver: &mut ResolverChain,
    module_dir: Option<&Path>,
) -> ValueOutput {
    let resolved = resolve_type(ty, index);
    let mut package = resolved.package;

    let by_name = package
        .as_ref()
        .filter(|p| p.path.is_empty() && !p.name.is_empty())
        .and_then(|p| find_named(index, &p.name));
    if by_name.is_some() {
        package = by_name;
    }

    let unresolved = package.as_ref().is_none_or(|p| p.path.is_empty());
    if unresolved && let Some(qualifier) = resolved.qualifier.as_deref() {
        if let Some(found) = find_named(index, qualifier) {
            package = Some(found);
        } else if let Some((_, entry)) = index.iter().find(|(key, e)| {
            !e.path.is_empty()
                && key.contains(qualifier)
                && (e.path.contains(qualifier) || has_segment(&e.path, qualifier))
        }) {
            let name = if entry.name.contains('.') {
                resolver
                    .resolve(&entry.path, module_dir)
                    .or_else(|| gopkg_in_name(&entry.path))
                    .unwrap_or_else(|| entry.name.clone())
            } else {
                entry.name.clone()
            };
            package = Some(TypePackageOutput::new(&entry.path, name));
        }
    }

    ValueOutput {
        field_name: field_name.to_string(),
        type_name: resolved.spelling,
        type_package: package.unwrap_or_else(|| TypePackageOutput::new("", package_name)),
        qualifier: resolved.qualifier,
    }
}

fn find_named(index: &ImportIndex, name: &str) -> Option<TypePackageOutput> {
    index
        .iter()
        .find(|(_, e)| e.name == name && !e.path.is_empty())
        .map(|(_, e)| TypePackageOutput::new(&e.path, &e.name))
}

/// `gopkg.in/yaml.v3` → `yaml`, `gopkg.in/user/pkg.v1` → `pkg`.
fn gopkg_in_name(path: &str) -> Option<String> {
    let rest = path.strip_prefix("gopkg.in/")?;
    let last = rest.rsplit('/').next()?;
    let name = last.split('.').next()?;
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn index() -> ImportIndex {
        let mut index = ImportIndex::new();
        index.insert("y", TypePackageOutput::new("gopkg.in/yaml.v3", "yaml"));
        index.insert("yaml", TypePackageOutput::new("gopkg.in/yaml.v3", "yaml"));
        index.insert("time", TypePackageOutput::new("time", "time"));
        index.insert("uuid", TypePackageOutput::new("github.com/gofrs/uuid/v5", "uuid"));
        index
    }

    fn q(package: &str, name: &str) -> TypeExpr {
        TypeExpr::qualified(package, name)
    }

    fn boxed(ty: TypeExpr) -> Box<TypeExpr> {
        Box::new(ty)
    }

    #[rstest]
    #[case(TypeExpr::named("string"), "string", None)]
    #[case(q("time", "Time"), "time.Time", Some("time"))]
    #[case(TypeExpr::Pointer { elem: boxed(q("y", "Node")) }, "*y.Node", Some("gopkg.in/yaml.v3"))]
    #[case(TypeExpr::Slice { elem: boxed(q("uuid", "UUID")) }, "[]uuid.UUID", Some("github.com/gofrs/uuid/v5"))]
    #[case(TypeExpr::Array { len: "4".into(), elem: boxed(TypeExpr::named("byte")) }, "[4]byte", None)]
    #[case(
        TypeExpr::Map { key: boxed(q("time", "Month")), value: boxed(TypeExpr::named("int")) },
        "map[time.Month]int",
        None
    )]
    #[case(
        TypeExpr::Chan { dir: ChanDir::Send, elem: boxed(q("time", "Duration")) },
        "chan<- time.Duration",
        Some("time")
    )]
    #[case(
        TypeExpr::Generic { base: boxed(TypeExpr::named("Box")), args: vec![q("y", "Node"), TypeExpr::named("int")] },
        "Box[y.Node, int]",
        None
    )]
    #[case(TypeExpr::Func, "func", None)]
    #[case(TypeExpr::Interface, "interface{}", None)]
    fn resolves_spelling_and_package(
        #[case] ty: TypeExpr,
        #[case] spelling: &str,
        #[case] path: Option<&str>,
    ) {
        let resolved = resolve_type(&ty, &index());
        assert_eq!(resolved.spelling, spelling);
        assert_eq!(resolved.package.as_ref().map(|p| p.path.as_str()), path);
    }

    #[test]
    fn reverse_lookup_by_true_name() {
        let mut index = ImportIndex::new();
        index.insert("u", TypePackageOutput::new("github.com/gofrs/uuid/v5", "uuid"));
        let resolved = resolve_type(&q("uuid", "UUID"), &index);
        assert_eq!(resolved.spelling, "uuid.UUID");
        assert_eq!(resolved.package.unwrap().path, "github.com/gofrs/uuid/v5");
    }

    #[test]
    fn segment_lookup_matches_path_components() {
        let mut index = ImportIndex::new();
        index.insert("v2", TypePackageOutput::new("example.com/chi/v2", "v2"));
        let resolved = resolve_type(&q("chi", "Router"), &index);
        assert_eq!(resolved.package.unwrap().path, "example.com/chi/v2");
    }

    #[test]
    fn unknown_qualifier_keeps_spelling_without_path() {
        let resolved = resolve_type(&q("mystery", "Thing"), &ImportIndex::new());
        assert_eq!(resolved.spelling, "mystery.Thing");
        assert_eq!(resolved.package, Some(TypePackageOutput::new("", "mystery")));
        assert_eq!(resolved.qualifier.as_deref(), Some("mystery"));
    }

    #[test]
    fn unqualified_value_belongs_to_current_package() {
        let mut resolver = ResolverChain::default();
        let value = value_output("Count", &TypeExpr::named("int"), "models", &index(), &mut resolver, None);
        assert_eq!(value.type_name, "int");
        assert_eq!(value.type_package, TypePackageOutput::new("", "models"));
        assert_eq!(value.qualifier, None);
    }

    #[test]
    fn dotted_identifier_derives_gopkg_in_name() {
        let mut index = ImportIndex::new();
        index.insert("yaml.v3", TypePackageOutput::new("gopkg.in/yaml.v3", "yaml.v3"));
        let mut resolver = ResolverChain::default();
        let value = value_output(
            "Doc",
            &TypeExpr::Pointer { elem: boxed(q("yaml", "Node")) },
            "models",
            &index,
            &mut resolver,
            None,
        );
        assert_eq!(value.type_name, "*yaml.Node");
        assert_eq!(value.type_package, TypePackageOutput::new("gopkg.in/yaml.v3", "yaml"));
    }

    #[test]
    fn dotted_identifier_prefers_resolver_answer() {
        let mut index = ImportIndex::new();
        index.insert("yaml.v3", TypePackageOutput::new("gopkg.in/yaml.v3", "yaml.v3"));
        let mut resolver = ResolverChain::new(vec![Box::new(crate::imports::StaticResolver::new([(
            "gopkg.in/yaml.v3",
            "yamlv3",
        )]))]);
        let value = value_output("Doc", &q("yaml", "Node"), "models", &index, &mut resolver, None);
        assert_eq!(value.type_package.name, "yamlv3");
    }

    #[rstest]
    #[case("gopkg.in/yaml.v3", Some("yaml"))]
    #[case("gopkg.in/check.v1", Some("check"))]
    #[case("gopkg.in/go-playground/validator.v9", Some("validator"))]
    #[case("github.com/x/y", None)]
    fn gopkg_in_names(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(gopkg_in_name(path).as_deref(), expected);
    }
}
