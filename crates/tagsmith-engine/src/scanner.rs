//! Declaration scanner and model orchestration.
//!
//! [`ModelBuilder`] walks the configured sources one file at a time, applies
//! the inclusion policy to every struct and field, runs each element and
//! getter over the surviving fields and hands non-empty structs to
//! [`Model::add_struct`]. Parse failures and directive conflicts become
//! [`ScanError`](tagsmith_core::ScanError)s; only pattern and base-directory
//! problems abort the run.

use std::path::{Path, PathBuf};

use tagsmith_core::{
    Config, ConstantOutput, CoreError, FieldOutput, Model, OutputMode, StructModel, StructOutput,
};
use tagsmith_parser::{FieldDecl, GoFile, StructDecl};
use tracing::{debug, info, warn};

use crate::getters::{Artifact, Artifacts, assemble_getter, wants_value};
use crate::imports::{ImportIndex, ModuleLocator, ResolverChain, build_import_index, value_output};
use crate::naming::{build_name, element_value};
use crate::policy::{StructDecision, include_field, struct_decision};
use crate::walker::find_files;

/// Builds a [`Model`] from the sources selected by a [`Config`].
#[derive(Debug)]
pub struct ModelBuilder<'a> {
    config: &'a Config,
    model: Model,
    resolver: ResolverChain,
    modules: ModuleLocator,
}

/// Everything a struct needs to know about the file it was declared in.
struct FileContext<'f> {
    path: &'f Path,
    file_label: String,
    package_name: &'f str,
    index: ImportIndex,
    module_dir: Option<PathBuf>,
}

impl<'a> ModelBuilder<'a> {
    /// Builder with the environment's resolver chain (`go list`, then the module cache).
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self::with_resolver(config, ResolverChain::from_env())
    }

    /// Builder with a caller-supplied resolver chain.
    #[must_use]
    pub fn with_resolver(config: &'a Config, resolver: ResolverChain) -> Self {
        Self {
            config,
            model: Model::new(),
            resolver,
            modules: ModuleLocator::new(),
        }
    }

    /// Scan every selected file and return the finished model.
    ///
    /// # Errors
    /// Returns `CoreError::Pattern` for an invalid include/exclude glob and
    /// `CoreError::Io` when the base directory is missing. Everything that
    /// goes wrong inside a file is recorded in [`Model::errors`] instead.
    pub fn build(mut self) -> Result<Model, CoreError> {
        let files = find_files(&self.config.input)?;
        debug!(count = files.len(), dir = %self.config.input.dir.display(), "selected source files");

        let config = self.config;
        let generated = config.output.file_name.as_str();
        for file in &files {
            if file.file_name().is_some_and(|name| name == generated) {
                debug!(file = %file.display(), "skipping previously generated file");
                continue;
            }
            self.scan_file(file);
        }

        info!(
            files = self.model.files_scanned,
            packages = self.model.packages_found,
            structs = self.model.structs_found,
            fields = self.model.fields_found,
            errors = self.model.errors.len(),
            "model built"
        );
        Ok(self.model)
    }

    /// Scan one file into the model. Never fails; problems become scan errors.
    pub fn scan_file(&mut self, path: &Path) {
        self.model.files_scanned += 1;
        let file_label = path.display().to_string();

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                warn!(file = %file_label, error = %e, "failed to read file");
                self.model.add_error(file_label, 0, format!("failed to read file: {e}"));
                return;
            }
        };
        let file = match tagsmith_parser::parse_go_file(&source) {
            Ok(file) => file,
            Err(e) => {
                warn!(file = %file_label, line = e.line(), error = %e, "failed to parse file");
                self.model
                    .add_error(file_label, e.line(), format!("failed to parse file: {e}"));
                return;
            }
        };

        let package_path = package_path(path);
        let module = self.modules.locate(path);
        let index = build_import_index(&file, module.as_ref(), &mut self.resolver);
        let ctx = FileContext {
            path,
            file_label,
            package_name: &file.package,
            index,
            module_dir: module.map(|m| m.dir),
        };
        self.scan_declarations(&file, &ctx, &package_path);
    }

    fn scan_declarations(&mut self, file: &GoFile, ctx: &FileContext<'_>, package_path: &str) {
        for decl in &file.structs {
            match struct_decision(&decl.name, &decl.comments, &self.config.input.structs) {
                StructDecision::Include => {}
                StructDecision::Skip => {
                    debug!(file = %ctx.file_label, name = %decl.name, "struct skipped by policy");
                    continue;
                }
                StructDecision::Conflict => {
                    warn!(file = %ctx.file_label, name = %decl.name, "conflicting struct directives");
                    self.model.add_error(
                        ctx.file_label.clone(),
                        decl.line,
                        format!(
                            "struct {} has both include and exclude directives",
                            decl.name
                        ),
                    );
                    continue;
                }
            }

            let model = self.scan_struct(decl, ctx);
            if model.is_empty() {
                debug!(file = %ctx.file_label, name = %decl.name, "struct produced no output");
                continue;
            }
            self.model.add_struct(package_path, ctx.package_name, model);
        }
    }

    fn scan_struct(&mut self, decl: &StructDecl, ctx: &FileContext<'_>) -> StructModel {
        let mut model = StructModel::new(&decl.name, &ctx.file_label, decl.line);
        model.type_parameters.clone_from(&decl.type_parameters);
        let mut artifacts = Artifacts::default();
        let mut records = RecordIndex::default();
        let needs_value = wants_value(&self.config.getters);

        for field in &decl.fields {
            if !self.keeps_field(field) {
                continue;
            }
            let tag = field.struct_tag();

            for name in &field.names {
                self.model.fields_found += 1;

                for element in &self.config.elements {
                    let Some(value) = element_value(name, &tag, element) else {
                        continue;
                    };
                    let format = &element.output.format;
                    let artifact = match element.output.mode {
                        OutputMode::Constant => {
                            let constant = ConstantOutput {
                                name: build_name(
                                    &[&format.prefix, &decl.name, name, &format.suffix],
                                    format.name,
                                ),
                                value,
                            };
                            model.constants.push(constant.clone());
                            Artifact::Constant(constant)
                        }
                        OutputMode::Struct => {
                            let record_name = build_name(
                                &[&format.prefix, &decl.name, "", &format.suffix],
                                format.name,
                            );
                            let field_output = FieldOutput {
                                struct_name: record_name.clone(),
                                name: build_name(&[name], format.holder),
                                value,
                            };
                            records
                                .record(&mut model, &element.name, &record_name, ctx.package_name)
                                .fields
                                .push(field_output.clone());
                            Artifact::Field(field_output)
                        }
                        OutputMode::None => Artifact::None(value),
                    };
                    artifacts.insert(name, &element.name, artifact);
                }

                let value = match (&field.ty, needs_value) {
                    (Some(ty), true) => Some(value_output(
                        name,
                        ty,
                        ctx.package_name,
                        &ctx.index,
                        &mut self.resolver,
                        ctx.module_dir.as_deref(),
                    )),
                    _ => None,
                };
                for getter in &self.config.getters {
                    if let Some(out) = assemble_getter(getter, name, &artifacts, value.as_ref()) {
                        model.getters.push(out);
                    } else {
                        debug!(
                            file = %ctx.path.display(),
                            field = %name,
                            getter = %getter.name,
                            "getter dropped: not every return resolved"
                        );
                    }
                }
            }
        }
        model
    }

    fn keeps_field(&self, field: &FieldDecl) -> bool {
        let Some(first) = field.names.first() else {
            return false;
        };
        include_field(first, &field.struct_tag(), &self.config.input.fields)
    }
}

/// Accessor records of one struct, keyed by the element that owns them.
#[derive(Debug, Default)]
struct RecordIndex {
    by_element: Vec<(String, usize)>,
}

impl RecordIndex {
    /// The record owned by `element`, created as `name` on first use.
    fn record<'m>(
        &mut self,
        model: &'m mut StructModel,
        element: &str,
        name: &str,
        package: &str,
    ) -> &'m mut StructOutput {
        let position = match self.by_element.iter().find(|(owner, _)| owner == element) {
            Some(&(_, position)) => position,
            None => {
                model.structs.push(StructOutput {
                    name: name.to_string(),
                    package: package.to_string(),
                    fields: Vec::new(),
                });
                let position = model.structs.len() - 1;
                self.by_element.push((element.to_string(), position));
                position
            }
        };
        &mut model.structs[position]
    }
}

/// Absolute, slash-separated directory of `file`; the key a package is stored under.
#[must_use]
pub fn package_path(file: &Path) -> String {
    let absolute = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());
    let dir = absolute.parent().unwrap_or(&absolute);
    dir.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn package_path_is_absolute_parent() {
        let path = package_path(Path::new("models/user.go"));
        assert!(path.ends_with("/models"), "{path}");
        assert!(Path::new(&path).is_absolute());
    }

    #[test]
    fn accessor_records_are_created_once_in_order() {
        let mut model = StructModel::new("User", "user.go", 1);
        let mut records = RecordIndex::default();
        records
            .record(&mut model, "field", "FieldUser", "models")
            .fields
            .push(FieldOutput {
                struct_name: "FieldUser".into(),
                name: "Name".into(),
                value: "name".into(),
            });
        records.record(&mut model, "db", "DbUser", "models");
        records.record(&mut model, "field", "FieldUser", "models");
        let names: Vec<&str> = model.structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["FieldUser", "DbUser"]);
        assert_eq!(model.structs[0].fields.len(), 1);
    }

    #[test]
    fn elements_with_identical_record_names_stay_separate() {
        let mut model = StructModel::new("User", "user.go", 1);
        let mut records = RecordIndex::default();
        records.record(&mut model, "json", "KeysUser", "models").fields.push(FieldOutput {
            struct_name: "KeysUser".into(),
            name: "Name".into(),
            value: "name".into(),
        });
        records.record(&mut model, "db", "KeysUser", "models").fields.push(FieldOutput {
            struct_name: "KeysUser".into(),
            name: "Name".into(),
            value: "user_name".into(),
        });
        assert_eq!(model.structs.len(), 2);
        assert_eq!(model.structs[0].fields[0].value, "name");
        assert_eq!(model.structs[1].fields[0].value, "user_name");
    }
}
