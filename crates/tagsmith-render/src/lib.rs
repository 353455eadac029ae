//! # tagsmith-render
//!
//! Turns a built [`Model`] into Go source files.
//!
//! One file is produced per package that has at least one struct, written
//! into the package's own directory under the configured file name. Each file
//! holds, per struct, a constants block, the accessor records with their
//! constructors, and the getter methods.

mod error;
pub mod go;

pub use error::RenderError;
pub use go::{HEADER, quote, render_package, value_type};

use std::path::PathBuf;
use tagsmith_core::Model;
use tracing::{debug, info};

/// A rendered file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub package: String,
    pub contents: String,
}

/// Render every non-empty package without touching the filesystem.
///
/// # Errors
/// Propagates [`render_package`] failures.
pub fn render_model(model: &Model, file_name: &str) -> Result<Vec<RenderedFile>, RenderError> {
    model
        .non_empty_packages()
        .map(|package| {
            Ok(RenderedFile {
                path: PathBuf::from(&package.path).join(file_name),
                package: package.name.clone(),
                contents: render_package(package)?,
            })
        })
        .collect()
}

/// Render and write every non-empty package, returning the written paths.
///
/// Package directories are created when missing. Existing files are replaced.
///
/// # Errors
/// Returns `RenderError::Io` naming the path that could not be written.
pub fn write_model(model: &Model, file_name: &str) -> Result<Vec<PathBuf>, RenderError> {
    let files = render_model(model, file_name)?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        if let Some(dir) = file.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&file.path, &file.contents).map_err(|source| RenderError::Io {
            path: file.path.clone(),
            source,
        })?;
        debug!(path = %file.path.display(), package = %file.package, "wrote generated file");
        written.push(file.path);
    }
    info!(files = written.len(), "generated files written");
    Ok(written)
}
