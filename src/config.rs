//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory
//! 3. The file passed with `--config`
//!
//! Command-line flags are applied on top by the caller. A missing user config
//! is not an error; a missing or malformed `--config` file is.
//!
//! ```toml
//! chunk_size = 65536
//! max_file_size = 4294967296
//! follow_symlinks = false
//! skip_hidden = true
//! ignored_extensions = [".tmp", ".part"]
//! use_trash = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::delete::DeleteConfig;
use crate::duplicates::{ExtensionSet, FilterError, FilterRules};
use crate::scanner::{Hasher, WalkerConfig, DEFAULT_CHUNK_SIZE};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A config file could not be parsed or has wrong value types.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// A value is well-typed but unusable.
    #[error("invalid configuration value for {key}: {reason}")]
    Value {
        /// Offending key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bytes read per hashing step.
    pub chunk_size: usize,
    /// Files larger than this many bytes are skipped during a scan.
    pub max_file_size: Option<u64>,
    /// Follow symbolic links while scanning.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories while scanning.
    pub skip_hidden: bool,
    /// Extensions never deleted, in addition to any given on the command line.
    pub ignored_extensions: Vec<String>,
    /// Send deleted files to the system trash.
    pub use_trash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_file_size: None,
            follow_symlinks: false,
            skip_hidden: false,
            ignored_extensions: Vec::new(),
            use_trash: false,
        }
    }
}

impl Config {
    /// Load defaults, then the user config, then `explicit` if given.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `explicit` does not exist, or `Invalid` / `Value`
    /// if any layer is malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_layers(Self::default_path().as_deref(), explicit)
    }

    /// Load from explicit layer paths.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_layers(user: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = user {
            if path.is_file() {
                log::debug!("Reading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            log::debug!("Reading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Platform-specific path of the user config file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "backdupe", "backdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Value {
                key: "chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }
        ExtensionSet::try_from_iter(&self.ignored_extensions).map_err(|e| ConfigError::Value {
            key: "ignored_extensions",
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Hasher with the configured chunk and size limits.
    #[must_use]
    pub fn hasher(&self) -> Hasher {
        Hasher::new()
            .with_chunk_size(self.chunk_size)
            .with_max_size(self.max_file_size)
    }

    /// Walker settings.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.follow_symlinks, self.skip_hidden)
    }

    /// Filter rules from the configured ignored extensions plus extra ones.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if an extension is invalid or would be both
    /// ignored and sought.
    pub fn filter_rules<S: AsRef<str>>(
        &self,
        extra_ignored: &[S],
        sought: &[S],
    ) -> Result<FilterRules, FilterError> {
        let mut ignored = ExtensionSet::try_from_iter(&self.ignored_extensions)?;
        for ext in extra_ignored {
            ignored.insert(ext.as_ref())?;
        }
        let sought = ExtensionSet::try_from_iter(sought)?;
        FilterRules::new(ignored, sought)
    }

    /// Deletion settings.
    #[must_use]
    pub fn delete_config(&self) -> DeleteConfig {
        if self.use_trash {
            DeleteConfig::trash()
        } else {
            DeleteConfig::permanent()
        }
    }
}
