// crates/prompter_config/src/lib.rs

//! Layered configuration for prompter.
//!
//! Built-in defaults are overlaid by the config file, then by `PROMPTER_*`
//! environment variables, then by flags set on the command line.

mod layer;
mod paths;
mod schema;
mod validate;

pub use layer::{env_var_name, ConfigLayer, ENV_PREFIX, SCALAR_KEYS};
pub use paths::{default_config_paths, expand_path, user_config_dir, APP_DIR};
pub use schema::{
    Config, CustomTemplate, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_MAX_TOTAL_BYTES,
    FILE_TARGET_PREFIX, VALID_DIRECTORY_STRATEGIES, VALID_TARGETS,
};
pub use validate::validate_config;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("configuration is missing")]
    Missing,

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Collects the file and flag layers and merges them on demand.
#[derive(Debug, Default)]
pub struct ConfigManager {
    file: ConfigLayer,
    flags: ConfigLayer,
    source: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the file layer and returns defaults overlaid with it.
    ///
    /// An explicit `path` must exist. Without one, the first existing file from
    /// [`default_config_paths`] is used, and having none is fine.
    pub fn load(&mut self, path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => default_config_paths().into_iter().find(|p| p.is_file()),
        };

        match path {
            Some(path) => {
                self.file = read_layer(&path)?;
                log::debug!("loaded config from {}", path.display());
                self.source = Some(path);
            }
            None => {
                log::debug!("no config file found, using defaults");
                self.file = ConfigLayer::default();
                self.source = None;
            }
        }

        let mut config = Config::default();
        config.apply_layer(&self.file);
        Ok(config)
    }

    /// The file the current file layer came from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Records a command-line override; it beats every other layer.
    pub fn set_flag(&mut self, name: &str, value: impl ToString) -> Result<(), ConfigError> {
        self.flags.set(name, &value.to_string())
    }

    pub fn resolve(&self) -> Result<Config, ConfigError> {
        self.resolve_with_env(|key| std::env::var(key).ok())
    }

    /// Merges defaults, file, environment and flags, then expands `~` in paths.
    pub fn resolve_with_env<F>(&self, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = ConfigLayer::from_env(&lookup)?;
        let mut config = Config::defaults_with(&lookup);
        for layer in [&self.file, &env, &self.flags] {
            config.apply_layer(layer);
        }
        config.expand_paths();
        Ok(config)
    }

    pub fn validate(&self, config: Option<&Config>) -> Result<(), ConfigError> {
        validate_config(config)
    }
}

fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    ConfigLayer::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_explicit_path() {
        let mut manager = ConfigManager::new();
        let err = manager
            .load(Some(Path::new("/nonexistent/prompter/config.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_total_bytes = \"many\"").unwrap();

        let err = ConfigManager::new().load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_load_records_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "target = \"stdout\"").unwrap();

        let mut manager = ConfigManager::new();
        let config = manager.load(Some(&path)).unwrap();
        assert_eq!(config.target, "stdout");
        assert_eq!(manager.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn test_set_flag_accepts_typed_values() {
        let mut manager = ConfigManager::new();
        manager.set_flag("max_file_size_bytes", 10).unwrap();
        manager.set_flag("allow_oversize", true).unwrap();
        let config = manager.resolve_with_env(|_| None).unwrap();
        assert_eq!(config.max_file_size_bytes, 10);
        assert!(config.allow_oversize);
        assert!(manager.set_flag("nope", "x").is_err());
    }
}
