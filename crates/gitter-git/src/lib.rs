//! A thin wrapper around the `git` binary.
//!
//! This crate builds git command lines, runs them as subprocesses with a
//! whitelisted environment, and locates repositories on disk. The
//! [`Client`] type ties the pieces together.

pub mod client;
pub mod commands;
pub mod env;
pub mod gitdir;
pub mod repository;

pub use client::Client;
pub use commands::{GitCommand, GitError, Result};
pub use env::{EnvScope, Environment};
pub use gitdir::{HiddenPaths, RepositoryKind};
pub use repository::{Repository, RepositoryDescriptor};
