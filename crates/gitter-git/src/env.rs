//! Whitelisted environment variable stores.
//!
//! A client keeps two [`Environment`]s: one for git-specific variables
//! (`GIT_DIR`, author identity, ...) and one for shell and SSH variables
//! (`HOME`, `SSH_AUTH_SOCK`, `GIT_SSH_COMMAND`, ...). Each store only
//! accepts the names on its own whitelist.

use std::collections::BTreeMap;
use std::fmt;

use crate::commands::{GitError, Result, escape_arg};

/// Variables accepted by the git-specific store.
pub const GIT_WHITELIST: &[&str] = &[
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_OBJECT_DIRECTORY",
    "GIT_ALTERNATE_OBJECT_DIRECTORIES",
    "GIT_NAMESPACE",
    "GIT_CEILING_DIRECTORIES",
    "GIT_DISCOVERY_ACROSS_FILESYSTEM",
    "GIT_AUTHOR_NAME",
    "GIT_AUTHOR_EMAIL",
    "GIT_AUTHOR_DATE",
    "GIT_COMMITTER_NAME",
    "GIT_COMMITTER_EMAIL",
    "GIT_COMMITTER_DATE",
    "GIT_CONFIG_NOSYSTEM",
    "GIT_CONFIG_GLOBAL",
    "GIT_TERMINAL_PROMPT",
    "GIT_ASKPASS",
    "GIT_EDITOR",
    "GIT_PAGER",
    "GIT_TRACE",
    "GIT_HTTP_USER_AGENT",
    "GIT_SSL_NO_VERIFY",
    "GIT_FLUSH",
];

/// Variables accepted by the shell/SSH store.
pub const SHELL_WHITELIST: &[&str] = &[
    "HOME",
    "PATH",
    "USER",
    "SHELL",
    "LANG",
    "LC_ALL",
    "TMPDIR",
    "TERM",
    "DISPLAY",
    "SSH_AUTH_SOCK",
    "SSH_ASKPASS",
    "GIT_SSH",
    "GIT_SSH_COMMAND",
    "GIT_SSH_VARIANT",
];

/// Which whitelist a store enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvScope {
    /// Git-specific variables.
    Git,
    /// Shell and SSH variables.
    Shell,
}

impl EnvScope {
    /// The names this scope accepts.
    pub const fn whitelist(self) -> &'static [&'static str] {
        match self {
            Self::Git => GIT_WHITELIST,
            Self::Shell => SHELL_WHITELIST,
        }
    }

    /// Lowercase name used in messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Shell => "shell",
        }
    }

    /// Returns `true` if `key` is on this scope's whitelist.
    pub fn allows(self, key: &str) -> bool {
        self.whitelist().contains(&key)
    }
}

impl fmt::Display for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of environment variables restricted to one whitelist.
///
/// Keys are kept sorted so rendering is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    scope: EnvScope,
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Create an empty store for `scope`.
    pub fn new(scope: EnvScope) -> Self {
        Self {
            scope,
            vars: BTreeMap::new(),
        }
    }

    /// Create an empty git-specific store.
    pub fn git() -> Self {
        Self::new(EnvScope::Git)
    }

    /// Create an empty shell/SSH store.
    pub fn shell() -> Self {
        Self::new(EnvScope::Shell)
    }

    /// The whitelist this store enforces.
    pub const fn scope(&self) -> EnvScope {
        self.scope
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.scope.allows(key) {
            Ok(())
        } else {
            Err(GitError::IllegalVariable {
                key: key.to_string(),
                scope: self.scope,
            })
        }
    }

    /// Set one variable.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::IllegalVariable`] if `key` is not whitelisted.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.check(key)?;
        self.vars.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Set several variables.
    ///
    /// Every key is validated before anything is written, so a rejected
    /// batch leaves the store unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::IllegalVariable`] for the first key that is not
    /// whitelisted.
    pub fn set_all<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pending: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (key, _) in &pending {
            self.check(key)?;
        }
        self.vars.extend(pending);
        Ok(())
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Remove the named variables. Unknown names are ignored.
    pub fn clear<S: AsRef<str>>(&mut self, keys: &[S]) {
        for key in keys {
            self.vars.remove(key.as_ref());
        }
    }

    /// Remove every variable.
    pub fn clear_all(&mut self) {
        self.vars.clear();
    }

    /// Number of variables set.
    pub fn count(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` if nothing is set.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render every entry as a shell-escaped `KEY=value` token, joined by
    /// spaces.
    pub fn to_shell_string(&self) -> String {
        self.vars
            .iter()
            .map(|(k, v)| format!("{k}={}", escape_arg(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Merge the git and shell stores into the variables passed to a child
/// process. The shell store wins when both define the same name.
pub fn merge(git: &Environment, shell: &Environment) -> Vec<(String, String)> {
    let mut merged: BTreeMap<&str, &str> = git.iter().collect();
    merged.extend(shell.iter());
    merged
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
