//! Git command building and execution.
//!
//! A [`GitCommand`] describes a single invocation: binary, subcommand,
//! options and positional arguments. It renders two ways:
//!
//! - [`GitCommand::to_argv`] produces the argument vector that is actually
//!   spawned. No shell ever sees it.
//! - [`GitCommand::to_command_line`] produces a shell-escaped line used in
//!   logs, error messages and `--dry-run` output.
//!
//! [`run_command`] spawns the command and turns a nonzero exit into
//! [`GitError::CommandFailed`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::env::EnvScope;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by the git wrapper.
#[derive(Debug, Error)]
pub enum GitError {
    /// A variable outside the store's whitelist was set.
    #[error("illegal {scope} environment variable: {key}")]
    IllegalVariable {
        /// The rejected variable name.
        key: String,
        /// Which store rejected it.
        scope: EnvScope,
    },

    /// The target path does not exist.
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A repository is already present at the target path.
    #[error("a repository already exists at {}", .0.display())]
    RepositoryAlreadyExists(PathBuf),

    /// No repository markers were found.
    #[error("no repository found at {}", .0.display())]
    RepositoryNotFound(PathBuf),

    /// The path is on the hidden list.
    #[error("access denied to {}", .0.display())]
    AccessDenied(PathBuf),

    /// The git binary could not be spawned.
    #[error("process could not start ({command}): {source}")]
    ProcessSpawnFailure {
        /// The rendered command line.
        command: String,
        /// The underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The command exited with a non-zero status.
    #[error("git command failed (exit code {code:?}): {output}")]
    CommandFailed {
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// Captured stderr, or stdout when stderr was empty.
        output: String,
        /// The rendered command line.
        command: String,
    },

    /// A filesystem operation on repository metadata failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl GitError {
    /// Returns the exit code carried by a [`GitError::CommandFailed`].
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

// ---------------------------------------------------------------------------
// Command builder
// ---------------------------------------------------------------------------

/// The binary used when none is configured.
pub const DEFAULT_GIT_BINARY: &str = "git";

/// A single git invocation.
///
/// Options keep their insertion order. An option with a value renders as
/// `name value`; an option without one renders as a bare flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    binary: String,
    subcommand: String,
    options: Vec<(String, Option<String>)>,
    args: Vec<String>,
}

impl GitCommand {
    /// Create a command for `subcommand` using the default `git` binary.
    pub fn new(subcommand: impl Into<String>) -> Self {
        Self {
            binary: DEFAULT_GIT_BINARY.to_string(),
            subcommand: subcommand.into(),
            options: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Use a different binary path.
    #[must_use]
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Append a bare flag such as `--bare`.
    #[must_use]
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.options.push((name.into(), None));
        self
    }

    /// Append an option with a value, rendered as `name value`.
    #[must_use]
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((name.into(), Some(value.into())));
        self
    }

    /// Append several options at once.
    #[must_use]
    pub fn options<I, K>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        self.options
            .extend(options.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several positional arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The binary this command will spawn.
    pub fn binary_path(&self) -> &str {
        &self.binary
    }

    /// The subcommand name.
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// The argument vector passed to the binary (everything after argv[0]).
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + self.options.len() * 2 + self.args.len());
        if !self.subcommand.is_empty() {
            argv.push(self.subcommand.clone());
        }
        for (name, value) in &self.options {
            argv.push(name.clone());
            if let Some(value) = value {
                argv.push(value.clone());
            }
        }
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Render `<binary> <subcommand> <options> <args>` with every value and
    /// positional argument shell-escaped. Option names are left as-is.
    pub fn to_command_line(&self) -> String {
        let mut parts = vec![self.binary.clone()];
        if !self.subcommand.is_empty() {
            parts.push(self.subcommand.clone());
        }
        for (name, value) in &self.options {
            parts.push(name.clone());
            if let Some(value) = value {
                parts.push(escape_arg(value));
            }
        }
        parts.extend(self.args.iter().map(|a| escape_arg(a)));
        parts.join(" ")
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_line())
    }
}

/// Quote `value` for a POSIX shell.
///
/// The value is wrapped in single quotes and every embedded `'` becomes
/// `'\''`, so the result always reads back as exactly one word.
pub fn escape_arg(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for c in value.chars() {
        if c == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(c);
        }
    }
    escaped.push('\'');
    escaped
}

// ---------------------------------------------------------------------------
// Process runner
// ---------------------------------------------------------------------------

/// Execute `command` in `cwd` and return its stdout unmodified.
///
/// `env` is applied on top of the parent environment, or on top of an empty
/// one when `inherit_env` is false. Stdin is a null handle; stdout and
/// stderr are captured. The child is always waited for and every pipe is
/// closed before this returns.
///
/// # Errors
///
/// Returns [`GitError::ProcessSpawnFailure`] if the binary cannot be
/// started (missing binary, missing `cwd`), or [`GitError::CommandFailed`]
/// if it exits with a non-zero status. The failure carries stderr as
/// captured (minus the trailing newline), or stdout when stderr is empty.
pub fn run_command(
    command: &GitCommand,
    cwd: &Path,
    env: &[(String, String)],
    inherit_env: bool,
) -> Result<String> {
    let line = command.to_command_line();
    debug!(command = %line, cwd = %cwd.display(), "spawning git");

    let mut cmd = Command::new(command.binary_path());
    cmd.args(command.to_argv()).current_dir(cwd);
    if !inherit_env {
        cmd.env_clear();
    }
    cmd.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = cmd.output().map_err(|source| GitError::ProcessSpawnFailure {
        command: line.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!(code = ?output.status.code(), "git exited");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if output.stderr.is_empty() {
            stdout.as_str()
        } else {
            &*stderr
        };
        return Err(GitError::CommandFailed {
            code: output.status.code(),
            output: message.trim_end_matches(['\n', '\r']).to_string(),
            command: line,
        });
    }

    Ok(stdout)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sh(script: &str) -> GitCommand {
        GitCommand::new("-c").binary("sh").arg(script)
    }

    #[test]
    fn test_escape_arg_plain() {
        assert_eq!(escape_arg("abc"), "'abc'");
        assert_eq!(escape_arg(""), "''");
    }

    #[test]
    fn test_escape_arg_embedded_quote() {
        assert_eq!(escape_arg("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_command_line_quotes_values_not_names() {
        let cmd = GitCommand::new("log")
            .option("--foo", "bar baz")
            .arg("a b");
        let line = cmd.to_command_line();
        assert_eq!(line, "git log --foo 'bar baz' 'a b'");
        assert!(line.contains(" --foo "));
    }

    #[test]
    fn test_command_line_snapshot() {
        let cmd = GitCommand::new("clone")
            .binary("/usr/bin/git")
            .flag("--bare")
            .option("--depth", "1")
            .args(["https://example.com/r.git", "/tmp/my repo"]);
        insta::assert_snapshot!(
            cmd.to_command_line(),
            @"/usr/bin/git clone --bare --depth '1' 'https://example.com/r.git' '/tmp/my repo'"
        );
    }

    #[test]
    fn test_argv_is_unescaped() {
        let cmd = GitCommand::new("commit")
            .flag("--allow-empty")
            .option("-m", "it's done")
            .arg("a b");
        assert_eq!(
            cmd.to_argv(),
            vec!["commit", "--allow-empty", "-m", "it's done", "a b"]
        );
    }

    #[test]
    fn test_empty_subcommand_is_omitted() {
        let cmd = GitCommand::new("").flag("--version");
        assert_eq!(cmd.to_argv(), vec!["--version"]);
        assert_eq!(cmd.to_string(), "git --version");
    }

    #[test]
    fn test_options_keep_order() {
        let cmd = GitCommand::new("x").options([
            ("-b", Some("1".to_string())),
            ("-a", None),
        ]);
        assert_eq!(cmd.to_argv(), vec!["x", "-b", "1", "-a"]);
    }

    #[test]
    fn test_run_command_returns_stdout_unmodified() {
        let out = run_command(&sh("printf '  hi\\n\\n'"), Path::new("."), &[], true).unwrap();
        assert_eq!(out, "  hi\n\n");
    }

    #[test]
    fn test_run_command_failure_prefers_stderr() {
        let err = run_command(
            &sh("echo out; echo err >&2; exit 3"),
            Path::new("."),
            &[],
            true,
        )
        .unwrap_err();
        match err {
            GitError::CommandFailed { code, output, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(output, "err");
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_run_command_failure_falls_back_to_stdout() {
        let err = run_command(&sh("echo only-out; exit 1"), Path::new("."), &[], true)
            .unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
        match err {
            GitError::CommandFailed { output, .. } => assert_eq!(output, "only-out"),
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_run_command_failure_keeps_stderr_as_captured() {
        let err = run_command(&sh("printf '   ' >&2; exit 2"), Path::new("."), &[], true)
            .unwrap_err();
        match err {
            GitError::CommandFailed { output, .. } => assert_eq!(output, "   "),
            other => panic!("expected CommandFailed, got: {other:?}"),
        }

        let err = run_command(
            &sh("echo out; printf '  warning: x\\n' >&2; exit 1"),
            Path::new("."),
            &[],
            true,
        )
        .unwrap_err();
        match err {
            GitError::CommandFailed { output, .. } => assert_eq!(output, "  warning: x"),
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_run_command_applies_env() {
        let env = vec![("GIT_AUTHOR_NAME".to_string(), "Ada".to_string())];
        let out = run_command(&sh("printf %s \"$GIT_AUTHOR_NAME\""), Path::new("."), &env, true)
            .unwrap();
        assert_eq!(out, "Ada");
    }

    #[test]
    fn test_run_command_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let out = run_command(&sh("ls"), dir.path(), &[], true).unwrap();
        assert!(out.contains("marker.txt"));
    }

    #[test]
    fn test_run_command_missing_binary() {
        let cmd = GitCommand::new("status").binary("/nonexistent/bin/git-xyz");
        let err = run_command(&cmd, Path::new("."), &[], true).unwrap_err();
        assert!(matches!(err, GitError::ProcessSpawnFailure { .. }));
        assert!(err.to_string().contains("process could not start"));
    }

    #[test]
    fn test_run_command_bad_cwd() {
        let result = run_command(
            &GitCommand::new("status"),
            Path::new("/nonexistent/directory/xyz"),
            &[],
            true,
        );
        assert!(matches!(result, Err(GitError::ProcessSpawnFailure { .. })));
    }

    #[test]
    fn test_git_version() {
        // `git --version` should succeed on any system with git installed.
        let out = run_command(&GitCommand::new("--version"), Path::new("."), &[], true).unwrap();
        assert!(out.starts_with("git version"), "unexpected output: {out}");
    }

    #[test]
    fn test_git_unknown_subcommand() {
        let err = run_command(
            &GitCommand::new("not-a-real-subcommand"),
            Path::new("."),
            &[],
            true,
        )
        .unwrap_err();
        match err {
            GitError::CommandFailed { code, output, command } => {
                assert!(code.is_some());
                assert!(!output.is_empty());
                assert_eq!(command, "git not-a-real-subcommand");
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_error_helpers() {
        assert_eq!(GitError::AccessDenied(PathBuf::from("/x")).exit_code(), None);
    }
}
