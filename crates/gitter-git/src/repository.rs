//! Repository descriptors and handles.
//!
//! - [`RepositoryDescriptor`] - immutable `{name, path, description}` record
//!   produced by directory scans
//! - [`Repository`] - a located repository bound to a [`Client`], used to
//!   run commands inside it

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::client::Client;
use crate::commands::{GitCommand, GitError, Result};
use crate::gitdir::{RepositoryKind, read_description};

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// A repository found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryDescriptor {
    name: String,
    path: PathBuf,
    description: String,
    bare: bool,
}

impl RepositoryDescriptor {
    /// Build a descriptor, reading the description file from disk.
    pub fn load(name: impl Into<String>, path: PathBuf, kind: RepositoryKind) -> Self {
        let description = read_description(&path, kind);
        Self {
            name: name.into(),
            path,
            description,
            bare: kind.is_bare(),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Repository root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Contents of the description file, or the placeholder text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` for bare repositories.
    pub const fn is_bare(&self) -> bool {
        self.bare
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// A repository bound to the client that located it.
///
/// Every command runs with the repository root as working directory and
/// the client's merged environment.
#[derive(Debug, Clone)]
pub struct Repository<'c> {
    client: &'c Client,
    path: PathBuf,
    kind: RepositoryKind,
}

impl<'c> Repository<'c> {
    pub(crate) fn new(client: &'c Client, path: PathBuf, kind: RepositoryKind) -> Self {
        Self { client, path, kind }
    }

    /// Repository root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component of the root.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Returns `true` for bare repositories.
    pub const fn is_bare(&self) -> bool {
        self.kind.is_bare()
    }

    /// The metadata directory (`.git` or the root itself).
    pub fn git_dir(&self) -> PathBuf {
        self.kind.git_dir(&self.path)
    }

    /// Start a command using the client's binary.
    pub fn command(&self, subcommand: &str) -> GitCommand {
        self.client.command(subcommand)
    }

    /// Run a command inside this repository and return stdout unmodified.
    ///
    /// # Errors
    ///
    /// See [`Client::run`].
    pub fn run(&self, command: &GitCommand) -> Result<String> {
        self.client.run(&self.path, command)
    }

    /// Build and run `subcommand` with options and positional arguments.
    ///
    /// # Errors
    ///
    /// See [`Client::run`].
    pub fn execute<I, K, A, S>(&self, subcommand: &str, options: I, args: A) -> Result<String>
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = self.command(subcommand).options(options).args(args);
        self.run(&command)
    }

    /// Name of the checked-out branch (`HEAD` when detached).
    ///
    /// # Errors
    ///
    /// Fails if git cannot resolve `HEAD`, e.g. before the first commit.
    pub fn current_branch(&self) -> Result<String> {
        let out = self.run(
            &self
                .command("rev-parse")
                .flag("--abbrev-ref")
                .arg("HEAD"),
        )?;
        Ok(out.trim().to_string())
    }

    /// Local branch names.
    ///
    /// # Errors
    ///
    /// Fails if the git command fails.
    pub fn branches(&self) -> Result<Vec<String>> {
        let out = self.run(&self.command("branch").flag("--format=%(refname:short)"))?;
        Ok(non_empty_lines(&out))
    }

    /// Tag names.
    ///
    /// # Errors
    ///
    /// Fails if the git command fails.
    pub fn tags(&self) -> Result<Vec<String>> {
        let out = self.run(&self.command("tag").flag("--list"))?;
        Ok(non_empty_lines(&out))
    }

    /// Full hash of the `HEAD` commit.
    ///
    /// # Errors
    ///
    /// Fails if the repository has no commits.
    pub fn head_commit(&self) -> Result<String> {
        let out = self.run(&self.command("rev-parse").arg("HEAD"))?;
        Ok(out.trim().to_string())
    }

    /// Description file contents, or the placeholder text.
    pub fn description(&self) -> String {
        read_description(&self.path, self.kind)
    }

    /// Overwrite the description file.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Io`] if the file cannot be written.
    pub fn set_description(&self, text: &str) -> Result<()> {
        let path = self.kind.description_path(&self.path);
        fs::write(&path, format!("{}\n", text.trim_end()))
            .map_err(|source| GitError::io(&path, source))
    }

    /// Snapshot this repository as a descriptor.
    pub fn descriptor(&self) -> RepositoryDescriptor {
        RepositoryDescriptor::load(self.name(), self.path.clone(), self.kind)
    }
}

fn non_empty_lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
