//! Configuration types and loading.
//!
//! The main entry point is [`GitterConfig`], the contents of a
//! `.gitter.yaml` file. [`load_config`] layers built-in defaults, the YAML
//! file and `GITTER_*` environment variables; [`save_config`] writes YAML
//! back out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use gitter_git::{Client, GitError, HiddenPaths};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration could not be serialized to YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// The layered configuration could not be extracted.
    #[error("invalid configuration: {0}")]
    ExtractError(#[from] Box<figment::Error>),

    /// An explicitly requested configuration file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration names an environment variable outside the
    /// whitelist.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variables that override file values.
pub mod env {
    /// Overrides `git-binary`.
    pub const GIT_BINARY: &str = "GITTER_GIT_BINARY";
    /// Overrides `inherit-env`.
    pub const INHERIT_ENV: &str = "GITTER_INHERIT_ENV";
    /// Points at the configuration file.
    pub const CONFIG: &str = "GITTER_CONFIG";
    /// Prefix shared by every override.
    pub const PREFIX: &str = "GITTER_";
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full configuration, corresponding to `.gitter.yaml`.
///
/// Every field has a default, so a partial file deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GitterConfig {
    /// Path to the git binary.
    pub git_binary: String,

    /// Paths that discovery must never expose.
    pub hidden: Vec<PathBuf>,

    /// Whether git starts from the caller's environment.
    pub inherit_env: bool,

    /// Git-specific variables (`GIT_AUTHOR_NAME`, ...).
    pub git_env: BTreeMap<String, String>,

    /// Shell and SSH variables (`HOME`, `GIT_SSH_COMMAND`, ...).
    pub shell_env: BTreeMap<String, String>,
}

impl Default for GitterConfig {
    fn default() -> Self {
        Self {
            git_binary: gitter_git::commands::DEFAULT_GIT_BINARY.to_string(),
            hidden: Vec::new(),
            inherit_env: true,
            git_env: BTreeMap::new(),
            shell_env: BTreeMap::new(),
        }
    }
}

impl GitterConfig {
    /// Make relative `hidden` entries relative to `base` instead of the
    /// process working directory.
    #[must_use]
    pub fn with_base_dir(mut self, base: &Path) -> Self {
        for path in &mut self.hidden {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// Build a [`Client`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Git`] if `git-env` or `shell-env` names a
    /// variable outside its whitelist.
    pub fn build_client(&self) -> Result<Client> {
        let mut client = Client::with_binary(self.git_binary.clone())
            .hidden(HiddenPaths::new(&self.hidden))
            .inherit_env(self.inherit_env);
        client
            .git_env_mut()
            .set_all(self.git_env.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        client
            .shell_env_mut()
            .set_all(self.shell_env.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        Ok(client)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `path` (if given) with environment overrides.
///
/// A missing `path` means "defaults plus environment". Relative `hidden`
/// entries are resolved against the file's directory.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `path` is given but missing, or
/// [`ConfigError::ExtractError`] if the file or an override is malformed.
pub fn load_config(path: Option<&Path>) -> Result<GitterConfig> {
    let mut figment = Figment::from(Serialized::defaults(GitterConfig::default()));

    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        figment = figment.merge(Yaml::file(path));
    }

    figment = figment.merge(
        Env::prefixed(env::PREFIX)
            .only(&["git_binary", "inherit_env"])
            .map(|key| key.as_str().replace('_', "-").into()),
    );

    let config: GitterConfig = figment.extract().map_err(Box::new)?;
    let base = path.and_then(Path::parent).filter(|p| !p.as_os_str().is_empty());
    Ok(match base {
        Some(base) => config.with_base_dir(base),
        None => config,
    })
}

/// Write `config` to `path` as YAML, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] on I/O failure or
/// [`ConfigError::ParseError`] if serialization fails.
pub fn save_config(path: &Path, config: &GitterConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
