//! The [`Client`] facade.
//!
//! A client owns everything a git invocation needs besides the command
//! itself: the binary path, the two whitelisted environment stores, the
//! hidden-path list, and whether the parent environment is inherited.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::commands::{DEFAULT_GIT_BINARY, GitCommand, GitError, Result, run_command};
use crate::env::{self, Environment};
use crate::gitdir::{HiddenPaths, RepositoryKind, find_repository_root, scan_repositories};
use crate::repository::{Repository, RepositoryDescriptor};

/// Entry point for running git and locating repositories.
#[derive(Debug, Clone)]
pub struct Client {
    binary: String,
    hidden: HiddenPaths,
    inherit_env: bool,
    git_env: Environment,
    shell_env: Environment,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// A client using `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_GIT_BINARY)
    }

    /// A client using a specific git binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            hidden: HiddenPaths::default(),
            inherit_env: true,
            git_env: Environment::git(),
            shell_env: Environment::shell(),
        }
    }

    /// Replace the hidden-path list.
    #[must_use]
    pub fn hidden(mut self, hidden: HiddenPaths) -> Self {
        self.hidden = hidden;
        self
    }

    /// Choose whether child processes start from the parent environment
    /// (`true`, the default) or from an empty one.
    #[must_use]
    pub const fn inherit_env(mut self, inherit: bool) -> Self {
        self.inherit_env = inherit;
        self
    }

    /// The configured git binary.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// The hidden-path list.
    pub const fn hidden_paths(&self) -> &HiddenPaths {
        &self.hidden
    }

    /// Returns `true` if child processes inherit the parent environment.
    pub const fn inherits_env(&self) -> bool {
        self.inherit_env
    }

    /// Git-specific variables.
    pub const fn git_env(&self) -> &Environment {
        &self.git_env
    }

    /// Mutable access to the git-specific variables.
    pub fn git_env_mut(&mut self) -> &mut Environment {
        &mut self.git_env
    }

    /// Shell and SSH variables.
    pub const fn shell_env(&self) -> &Environment {
        &self.shell_env
    }

    /// Mutable access to the shell and SSH variables.
    pub fn shell_env_mut(&mut self) -> &mut Environment {
        &mut self.shell_env
    }

    /// The variables applied to every child, shell store winning on
    /// collision.
    pub fn merged_env(&self) -> Vec<(String, String)> {
        env::merge(&self.git_env, &self.shell_env)
    }

    /// Start a command for `subcommand` using this client's binary.
    pub fn command(&self, subcommand: &str) -> GitCommand {
        GitCommand::new(subcommand).binary(self.binary.clone())
    }

    /// Run `command` in `cwd` with the merged environment.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ProcessSpawnFailure`] or
    /// [`GitError::CommandFailed`].
    pub fn run(&self, cwd: &Path, command: &GitCommand) -> Result<String> {
        run_command(command, cwd, &self.merged_env(), self.inherit_env)
    }

    /// The installed git version, e.g. `2.43.0`.
    ///
    /// # Errors
    ///
    /// Fails if the binary cannot be run.
    pub fn version(&self) -> Result<String> {
        let out = self.run(Path::new("."), &self.command("--version"))?;
        let out = out.trim();
        Ok(out.strip_prefix("git version ").unwrap_or(out).to_string())
    }

    /// Locate the repository containing `path` by walking up.
    ///
    /// # Errors
    ///
    /// [`GitError::PathNotFound`], [`GitError::RepositoryNotFound`] or
    /// [`GitError::AccessDenied`].
    pub fn get_repository(&self, path: &Path) -> Result<Repository<'_>> {
        let (root, kind) = find_repository_root(path, &self.hidden)?;
        Ok(Repository::new(self, root, kind))
    }

    /// List every repository below `path`, sorted by name.
    ///
    /// # Errors
    ///
    /// [`GitError::PathNotFound`] or [`GitError::RepositoryNotFound`].
    pub fn get_repositories(&self, path: &Path) -> Result<Vec<RepositoryDescriptor>> {
        scan_repositories(path, &self.hidden)
    }

    /// Initialize a new repository at `path`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RepositoryAlreadyExists`] if `path` already holds
    /// a repository, [`GitError::Io`] if the directory cannot be created, or
    /// a process error from `git init`.
    pub fn create_repository(&self, path: &Path, bare: bool) -> Result<Repository<'_>> {
        if RepositoryKind::detect(path).is_some() {
            return Err(GitError::RepositoryAlreadyExists(path.to_path_buf()));
        }
        fs::create_dir_all(path).map_err(|source| GitError::io(path, source))?;

        let mut command = self.command("init");
        if bare {
            command = command.flag("--bare");
        }
        self.run(path, &command)?;
        info!(path = %path.display(), bare, "initialized repository");

        self.open_created(path)
    }

    /// Clone `url` into `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RepositoryAlreadyExists`] if `path` exists and is
    /// not an empty directory, or a process error from `git clone`.
    pub fn clone_repository(&self, url: &str, path: &Path, bare: bool) -> Result<Repository<'_>> {
        let dest = std::path::absolute(path).map_err(|source| GitError::io(path, source))?;
        if !is_free_destination(&dest) {
            return Err(GitError::RepositoryAlreadyExists(dest));
        }
        let parent = dest.parent().map_or_else(|| PathBuf::from("/"), Path::to_path_buf);
        fs::create_dir_all(&parent).map_err(|source| GitError::io(&parent, source))?;

        let mut command = self.command("clone");
        if bare {
            command = command.flag("--bare");
        }
        // `--` keeps a URL starting with `-` from being read as an option.
        let command = command.arg("--").arg(url).arg(dest.to_string_lossy());
        self.run(&parent, &command)?;
        info!(%url, path = %dest.display(), bare, "cloned repository");

        self.open_created(&dest)
    }

    fn open_created(&self, path: &Path) -> Result<Repository<'_>> {
        let root = path
            .canonicalize()
            .map_err(|source| GitError::io(path, source))?;
        let kind = RepositoryKind::detect(&root)
            .ok_or_else(|| GitError::RepositoryNotFound(root.clone()))?;
        debug!(root = %root.display(), ?kind, "opened repository");
        Ok(Repository::new(self, root, kind))
    }
}

/// A clone target must be missing or an empty directory.
fn is_free_destination(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
