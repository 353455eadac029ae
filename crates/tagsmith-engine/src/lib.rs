//! # tagsmith-engine
//!
//! Model building for tagsmith: turns Go sources plus a resolved [`Config`]
//! into the output [`Model`].
//!
//! Stages, per file:
//! - [`walker`]: include/exclude expansion into a sorted file list
//! - [`policy`]: struct directives and field tag overrides
//! - [`imports`]: import index, true package names and declared-type resolution
//! - [`naming`]: element values and identifier formatting
//! - [`getters`]: getter assembly over per-field artifacts
//! - [`scanner`]: the [`ModelBuilder`] tying them together

pub mod getters;
pub mod imports;
pub mod naming;
pub mod policy;
pub mod scanner;
pub mod walker;

pub use imports::{
    GoListResolver, ModuleCacheResolver, PackageNameResolver, ResolverChain, StaticResolver,
};
pub use scanner::ModelBuilder;
pub use walker::find_files;

use tagsmith_core::{Config, CoreError, Model};

/// Build the model for `config` with the environment's resolver chain.
///
/// # Errors
/// See [`ModelBuilder::build`].
pub fn build_model(config: &Config) -> Result<Model, CoreError> {
    ModelBuilder::new(config).build()
}
