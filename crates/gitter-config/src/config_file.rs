//! Discovery of the `.gitter.yaml` configuration file.
//!
//! Resolution order:
//! 1. an explicit path (the `--config` flag)
//! 2. the `GITTER_CONFIG` environment variable
//! 3. the nearest `.gitter.yaml` walking up from the working directory

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Result, env};

/// The name of the configuration file searched for in parent directories.
pub const CONFIG_FILE_NAME: &str = ".gitter.yaml";

/// Walk up the directory tree from `start` looking for `.gitter.yaml`.
///
/// The `GITTER_CONFIG` environment variable is checked first (highest
/// priority). Returns `None` if nothing is found before the filesystem
/// root.
///
/// # Examples
///
/// ```no_run
/// use gitter_config::config_file::find_config_file;
/// use std::path::Path;
///
/// if let Some(path) = find_config_file(Path::new(".")) {
///     println!("Using config at {}", path.display());
/// }
/// ```
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let from_env = std::env::var_os(env::CONFIG).map(PathBuf::from);
    find_config_file_with(start, from_env)
}

fn find_config_file_with(start: &Path, from_env: Option<PathBuf>) -> Option<PathBuf> {
    // 1. Environment override, if it points at a real file.
    if let Some(path) = from_env {
        if path.is_file() {
            return Some(path);
        }
    }

    // 2. Walk up from `start`.
    let start = start.canonicalize().ok()?;
    let mut current = start.as_path();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break, // Reached filesystem root.
        }
    }

    None
}

/// Pick the configuration file to load.
///
/// An explicit path wins and must exist. Otherwise falls back to
/// [`find_config_file`]; `Ok(None)` means "use defaults".
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `explicit` is given but missing.
pub fn resolve_config_file(explicit: Option<&Path>, start: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(ConfigError::NotFound(path.to_path_buf())),
        None => Ok(find_config_file(start)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_config_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&file, "git-binary: git\n").unwrap();

        let found = find_config_file_with(dir.path(), None).unwrap();
        // Canonicalize both for comparison (handles /tmp vs /private/tmp).
        assert_eq!(found.canonicalize().unwrap(), file.canonicalize().unwrap());
    }

    #[test]
    fn test_find_config_in_child() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&file, "").unwrap();
        let child = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&child).unwrap();

        let found = find_config_file_with(&child, None).unwrap();
        assert_eq!(found.canonicalize().unwrap(), file.canonicalize().unwrap());
    }

    #[test]
    fn test_env_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let other = dir.path().join("elsewhere.yaml");
        std::fs::write(&other, "").unwrap();

        let found = find_config_file_with(dir.path(), Some(other.clone())).unwrap();
        assert_eq!(found, other);
    }

    #[test]
    fn test_env_override_ignored_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&file, "").unwrap();

        let found =
            find_config_file_with(dir.path(), Some(dir.path().join("missing.yaml"))).unwrap();
        assert_eq!(found.canonicalize().unwrap(), file.canonicalize().unwrap());
    }

    #[test]
    fn test_directory_named_like_config_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        // Might find a real config above the temp dir in CI, so only check
        // that the directory itself is not returned.
        let found = find_config_file_with(dir.path(), None);
        assert_ne!(found, Some(dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_resolve_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.yaml");
        std::fs::write(&file, "").unwrap();

        let resolved = resolve_config_file(Some(&file), dir.path()).unwrap();
        assert_eq!(resolved, Some(file));
    }

    #[test]
    fn test_resolve_explicit_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_config_file(Some(&dir.path().join("nope.yaml")), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
