//! Configuration management for gitter.
//!
//! This crate loads `.gitter.yaml` files, layers `GITTER_*` environment
//! overrides on top, discovers the configuration file by walking up the
//! directory tree, and turns the result into a [`gitter_git::Client`].

pub mod config;
pub mod config_file;

pub use config::{ConfigError, GitterConfig, load_config, save_config};
pub use config_file::{find_config_file, resolve_config_file};
