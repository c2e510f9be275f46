//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what a command handler needs: the global
//! flags and the layered configuration (file, `GITTER_*` variables, then
//! command-line overrides).

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use gitter_config::{GitterConfig, load_config, resolve_config_file};
use gitter_git::Client;
use tracing::debug;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// The configuration file that was loaded, if any.
    pub config_path: Option<PathBuf>,

    /// Effective configuration with command-line overrides applied.
    pub config: GitterConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// Priority, lowest first: built-in defaults, the configuration file,
    /// `GITTER_*` variables, command-line flags.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("cannot determine the current directory")?;
        let config_path = resolve_config_file(global.config.as_deref(), &cwd)?;
        debug!(config = ?config_path, "resolved configuration file");

        let mut config = load_config(config_path.as_deref())?;
        apply_overrides(&mut config, global);

        Ok(Self {
            config_path,
            config,
            json: global.json,
            quiet: global.quiet,
        })
    }

    /// Build a git [`Client`] from the effective configuration.
    ///
    /// Fails when a `git-env` or `shell-env` entry is outside its whitelist.
    pub fn client(&self) -> Result<Client> {
        Ok(self.config.build_client()?)
    }

    /// `path`, or the current directory when none was given.
    pub fn path_or_cwd(path: Option<&PathBuf>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(p.clone()),
            None => env::current_dir().context("cannot determine the current directory"),
        }
    }
}

/// Fold command-line flags into the loaded configuration.
fn apply_overrides(config: &mut GitterConfig, global: &GlobalArgs) {
    if let Some(binary) = &global.git_binary {
        config.git_binary.clone_from(binary);
    }
    config.hidden.extend(global.hidden.iter().cloned());
    config.git_env.extend(global.git_env.iter().cloned());
    config.shell_env.extend(global.shell_env.iter().cloned());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overrides_replace_binary_and_extend_lists() {
        let mut config = GitterConfig::default();
        config.hidden.push(PathBuf::from("/from/file"));
        config
            .git_env
            .insert("GIT_AUTHOR_NAME".to_string(), "File".to_string());

        let global = GlobalArgs {
            git_binary: Some("/opt/git".to_string()),
            hidden: vec![PathBuf::from("/from/flag")],
            git_env: vec![("GIT_AUTHOR_NAME".to_string(), "Flag".to_string())],
            shell_env: vec![("HOME".to_string(), "/h".to_string())],
            ..GlobalArgs::default()
        };
        apply_overrides(&mut config, &global);

        assert_eq!(config.git_binary, "/opt/git");
        assert_eq!(
            config.hidden,
            vec![PathBuf::from("/from/file"), PathBuf::from("/from/flag")]
        );
        assert_eq!(config.git_env["GIT_AUTHOR_NAME"], "Flag");
        assert_eq!(config.shell_env["HOME"], "/h");
    }

    #[test]
    fn no_overrides_keeps_config() {
        let mut config = GitterConfig::default();
        apply_overrides(&mut config, &GlobalArgs::default());
        assert_eq!(config, GitterConfig::default());
    }

    #[test]
    fn client_rejects_illegal_flag_variable() {
        let mut config = GitterConfig::default();
        let global = GlobalArgs {
            shell_env: vec![("LD_PRELOAD".to_string(), "x.so".to_string())],
            ..GlobalArgs::default()
        };
        apply_overrides(&mut config, &global);
        let ctx = RuntimeContext {
            config_path: None,
            config,
            json: false,
            quiet: false,
        };
        let err = ctx.client().unwrap_err();
        assert!(format!("{err:#}").contains("LD_PRELOAD"));
    }
}
