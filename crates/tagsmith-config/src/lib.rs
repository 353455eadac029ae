//! # tagsmith-config
//!
//! Layered configuration loading for tagsmith using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Command-line overrides (a sparse [`RawConfig`])
//! 2. Environment variables (`TAGSMITH_*` prefix, `__` as separator)
//! 3. The config file: an explicit path, else `tagsmith.yaml`, `tagsmith.yml`
//!    or `tagsmith.toml` in the search directory
//! 4. Built-in defaults
//!
//! After extraction the document is defaulted into a concrete
//! [`tagsmith_core::Config`] and validated; validation reports every problem
//! at once.
//!
//! # Environment Variable Mapping
//!
//! `TAGSMITH_INPUT__DIR` → `input.dir`, `TAGSMITH_OUTPUT__FILE_NAME` →
//! `output.file_name`, `TAGSMITH_INPUT__STRUCT__EXPLICIT` →
//! `input.struct.explicit`.
//!
//! # Usage
//!
//! ```no_run
//! use tagsmith_config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load().expect("config");
//! println!("scanning {}", config.input.dir.display());
//! ```

mod defaults;
mod error;
mod raw;
mod validate;

pub use defaults::{
    DEFAULT_DIR, DEFAULT_EXCLUDE, DEFAULT_FILE_NAME, DEFAULT_INCLUDE, DEFAULT_TAG_PRIORITY,
    apply_defaults,
};
pub use error::ConfigError;
pub use raw::{
    RawConfig, RawElement, RawElementFormat, RawElementInput, RawElementOutput,
    RawElementTransform, RawGetter, RawGetterFormat, RawInput, RawOutput, RawPolicy,
};
pub use validate::{is_identifier, is_source_pattern, validate};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};
use tagsmith_core::Config;
use tracing::debug;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "TAGSMITH_";

/// File names probed in the search directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["tagsmith.yaml", "tagsmith.yml", "tagsmith.toml"];

/// Builds the figment chain and resolves it into a validated [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    search_dir: PathBuf,
    overrides: RawConfig,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader that searches the working directory and has no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            search_dir: PathBuf::from("."),
            overrides: RawConfig::default(),
        }
    }

    /// Use this config file instead of searching for one. It must exist.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Directory searched for [`CONFIG_FILE_NAMES`].
    #[must_use]
    pub fn search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = dir.into();
        self
    }

    /// Highest-priority layer; only the values it sets take effect.
    #[must_use]
    pub fn overrides(mut self, overrides: RawConfig) -> Self {
        self.overrides = overrides;
        self
    }

    /// The config file that will be read, if any.
    ///
    /// # Errors
    /// Returns `ConfigError::NotFound` when an explicit file does not exist.
    pub fn config_file(&self) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigError::NotFound { path: path.clone() });
            }
            return Ok(Some(path.clone()));
        }
        Ok(CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.search_dir.join(name))
            .find(|path| path.is_file()))
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly.
    ///
    /// # Errors
    /// Returns `ConfigError::NotFound` when an explicit file does not exist.
    pub fn figment(&self) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(RawConfig::default()));

        if let Some(path) = self.config_file()? {
            debug!(path = %path.display(), "loading config file");
            figment = if is_toml(&path) {
                figment.merge(Toml::file(path))
            } else {
                figment.merge(Yaml::file(path))
            };
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(self.overrides.clone())))
    }

    /// Extract the merged document without defaulting or validation.
    ///
    /// # Errors
    /// Returns `ConfigError::NotFound` or `ConfigError::Figment`.
    pub fn load_raw(&self) -> Result<RawConfig, ConfigError> {
        Ok(self.figment()?.extract()?)
    }

    /// Extract, default and validate.
    ///
    /// # Errors
    /// Returns `ConfigError::NotFound` for a missing explicit file,
    /// `ConfigError::Figment` for unreadable or mistyped documents and
    /// `ConfigError::Invalid` with every validation problem.
    pub fn load(&self) -> Result<Config, ConfigError> {
        resolve(self.load_raw()?)
    }
}

/// Default and validate an already extracted document.
///
/// # Errors
/// Returns `ConfigError::Invalid` with every validation problem.
pub fn resolve(raw: RawConfig) -> Result<Config, ConfigError> {
    let config = apply_defaults(raw);
    validate(&config)?;
    debug!(
        elements = config.elements.len(),
        getters = config.getters.len(),
        dir = %config.input.dir.display(),
        "configuration resolved"
    );
    Ok(config)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_resolves() {
        let config = resolve(RawConfig::default()).expect("defaults are valid");
        assert_eq!(config.output.file_name, DEFAULT_FILE_NAME);
        assert!(config.elements.is_empty());
    }

    #[test]
    fn empty_overrides_serialize_to_nothing_but_sections() {
        let value = figment::value::Value::serialize(RawConfig::default()).expect("serializes");
        let dict = value.into_dict().expect("is a dict");
        assert!(!dict.contains_key("elements"));
        assert!(!dict.contains_key("getters"));
    }

    #[test]
    fn toml_detection_uses_extension() {
        assert!(is_toml(Path::new("tagsmith.toml")));
        assert!(is_toml(Path::new("conf/TAGSMITH.TOML")));
        assert!(!is_toml(Path::new("tagsmith.yaml")));
        assert!(!is_toml(Path::new("tagsmith")));
    }
}
