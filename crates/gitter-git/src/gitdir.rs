//! Repository discovery on the filesystem.
//!
//! Two modes are supported:
//!
//! - [`find_repository_root`] walks up from a path until it meets a
//!   directory holding `.git/HEAD` (working tree) or `HEAD` (bare).
//! - [`scan_repositories`] walks down from a directory and collects every
//!   repository below it.
//!
//! Neither shells out to `git`; both are plain filesystem checks.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::commands::{GitError, Result};
use crate::repository::RepositoryDescriptor;

/// Description used when a repository has no description file.
pub const DESCRIPTION_PLACEHOLDER: &str =
    "There is no repository description file. Please, create one to remove this message.";

// ---------------------------------------------------------------------------
// Repository kind
// ---------------------------------------------------------------------------

/// How a repository's metadata is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryKind {
    /// Metadata lives in `<root>/.git`.
    Working,
    /// Metadata lives directly in `<root>`.
    Bare,
}

impl RepositoryKind {
    /// Detect the kind of repository rooted at `path`, if any.
    ///
    /// A working tree is preferred when both markers are present.
    pub fn detect(path: &Path) -> Option<Self> {
        if path.join(".git").join("HEAD").is_file() {
            Some(Self::Working)
        } else if path.join("HEAD").is_file() {
            Some(Self::Bare)
        } else {
            None
        }
    }

    /// The metadata directory for a repository rooted at `root`.
    pub fn git_dir(self, root: &Path) -> PathBuf {
        match self {
            Self::Working => root.join(".git"),
            Self::Bare => root.to_path_buf(),
        }
    }

    /// The description file for a repository rooted at `root`.
    pub fn description_path(self, root: &Path) -> PathBuf {
        self.git_dir(root).join("description")
    }

    /// Returns `true` for bare repositories.
    pub const fn is_bare(self) -> bool {
        matches!(self, Self::Bare)
    }
}

// ---------------------------------------------------------------------------
// Hidden paths
// ---------------------------------------------------------------------------

/// Paths that discovery must never expose.
///
/// A path is hidden when it equals an entry or lies beneath one. Both sides
/// are canonicalized when possible so symlinks and `..` do not slip through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenPaths {
    entries: Vec<PathBuf>,
}

impl HiddenPaths {
    /// Build the list from raw paths.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let entries = paths
            .into_iter()
            .map(|p| canonical_or_raw(p.as_ref()))
            .collect();
        Self { entries }
    }

    /// Returns `true` if `path` is hidden.
    pub fn is_hidden(&self, path: &Path) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let path = canonical_or_raw(path);
        self.entries.iter().any(|hidden| path.starts_with(hidden))
    }
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

// ---------------------------------------------------------------------------
// Upward search
// ---------------------------------------------------------------------------

/// Walk up from `start` to the nearest repository root.
///
/// # Errors
///
/// - [`GitError::PathNotFound`] if `start` does not exist.
/// - [`GitError::RepositoryNotFound`] if the filesystem root is reached
///   without finding a marker.
/// - [`GitError::AccessDenied`] if the root found is hidden.
pub fn find_repository_root(
    start: &Path,
    hidden: &HiddenPaths,
) -> Result<(PathBuf, RepositoryKind)> {
    if !start.exists() {
        return Err(GitError::PathNotFound(start.to_path_buf()));
    }
    let start = start
        .canonicalize()
        .map_err(|source| GitError::io(start, source))?;

    let mut current = start.as_path();
    loop {
        if let Some(kind) = RepositoryKind::detect(current) {
            if hidden.is_hidden(current) {
                return Err(GitError::AccessDenied(current.to_path_buf()));
            }
            debug!(root = %current.display(), ?kind, "found repository");
            return Ok((current.to_path_buf(), kind));
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break, // Reached filesystem root.
        }
    }

    Err(GitError::RepositoryNotFound(start))
}

// ---------------------------------------------------------------------------
// Directory scan
// ---------------------------------------------------------------------------

/// Collect every repository below `root`, sorted by name.
///
/// Dot-entries are skipped, as are hidden paths. Directories that are not
/// repositories are scanned recursively; repositories are not descended
/// into. Symlinked directories are checked for markers but never followed
/// further. A repository's name is its `/`-joined path relative to `root`.
///
/// # Errors
///
/// - [`GitError::PathNotFound`] if `root` does not exist.
/// - [`GitError::Io`] if `root` itself cannot be read.
/// - [`GitError::RepositoryNotFound`] if nothing was found.
pub fn scan_repositories(root: &Path, hidden: &HiddenPaths) -> Result<Vec<RepositoryDescriptor>> {
    if !root.exists() {
        return Err(GitError::PathNotFound(root.to_path_buf()));
    }
    let root = root
        .canonicalize()
        .map_err(|source| GitError::io(root, source))?;

    let mut found = Vec::new();
    let entries = fs::read_dir(&root).map_err(|source| GitError::io(&root, source))?;
    scan_entries(&root, entries, hidden, &mut found);

    if found.is_empty() {
        return Err(GitError::RepositoryNotFound(root));
    }
    found.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(found)
}

fn scan_entries(
    root: &Path,
    entries: fs::ReadDir,
    hidden: &HiddenPaths,
    found: &mut Vec<RepositoryDescriptor>,
) {
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if hidden.is_hidden(&path) {
            debug!(path = %path.display(), "skipping hidden path");
            continue;
        }

        if let Some(kind) = RepositoryKind::detect(&path) {
            let name = relative_name(root, &path);
            found.push(RepositoryDescriptor::load(name, path, kind));
            continue;
        }

        let is_symlink = entry.file_type().is_ok_and(|t| t.is_symlink());
        if is_symlink {
            continue;
        }
        match fs::read_dir(&path) {
            Ok(children) => scan_entries(root, children, hidden, found),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable directory"),
        }
    }
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a repository's description, falling back to
/// [`DESCRIPTION_PLACEHOLDER`] when the file is missing or unreadable.
pub fn read_description(root: &Path, kind: RepositoryKind) -> String {
    let path = kind.description_path(root);
    match fs::read_to_string(&path) {
        Ok(text) => text.trim_end().to_string(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => DESCRIPTION_PLACEHOLDER.to_string(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read description file");
            DESCRIPTION_PLACEHOLDER.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
