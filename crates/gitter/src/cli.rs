//! Clap CLI definitions for the `gitter` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// gitter -- locate, create and drive git repositories.
#[derive(Parser, Debug)]
#[command(
    name = "gitter",
    about = "Locate, create and drive git repositories",
    long_about = "A thin wrapper around the git binary: find repositories on disk, create and clone them, and run git with a whitelisted environment.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (default: $GITTER_CONFIG, then the nearest .gitter.yaml).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the git binary.
    #[arg(long, global = true, value_name = "PATH")]
    pub git_binary: Option<String>,

    /// Hide a path from discovery (repeatable).
    #[arg(long, global = true, value_name = "PATH")]
    pub hidden: Vec<PathBuf>,

    /// Set a git-specific variable such as GIT_AUTHOR_NAME (repeatable).
    #[arg(long, global = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub git_env: Vec<(String, String)>,

    /// Set a shell or SSH variable such as GIT_SSH_COMMAND (repeatable).
    #[arg(long, global = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub shell_env: Vec<(String, String)>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// Parse `KEY=VALUE`. The value may itself contain `=`.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty variable name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print gitter and git versions.
    Version,

    /// Find the repository containing a path.
    Find(FindArgs),

    /// List repositories below a directory.
    #[command(alias = "ls")]
    List(ListArgs),

    /// Create a new repository.
    Init(InitArgs),

    /// Clone a repository.
    Clone(CloneArgs),

    /// Run a git subcommand inside a repository.
    Exec(ExecArgs),

    /// Show the environment passed to git.
    Env(EnvArgs),

    /// Generate shell completion scripts.
    Completion(CompletionArgs),
}

/// Arguments for `gitter find`.
#[derive(Args, Debug)]
pub struct FindArgs {
    /// Where to start searching (default: current directory).
    pub path: Option<PathBuf>,
}

/// Arguments for `gitter list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory to scan (default: current directory).
    pub dir: Option<PathBuf>,

    /// Print straight to stdout even when the listing is long.
    #[arg(long)]
    pub no_pager: bool,
}

/// Arguments for `gitter init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to create the repository.
    pub path: PathBuf,

    /// Create a bare repository.
    #[arg(long)]
    pub bare: bool,

    /// Write this text to the description file.
    #[arg(short = 'd', long)]
    pub description: Option<String>,
}

/// Arguments for `gitter clone`.
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Repository URL (or local path).
    pub url: String,

    /// Destination directory.
    pub path: PathBuf,

    /// Make a bare clone.
    #[arg(long)]
    pub bare: bool,
}

/// Arguments for `gitter exec`.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Repository to run in (default: the one containing the current directory).
    #[arg(short = 'C', long = "repo", value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Print the command line instead of running it.
    #[arg(long)]
    pub dry_run: bool,

    /// The git subcommand followed by its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "SUBCOMMAND [ARGS]"
    )]
    pub command: Vec<String>,
}

/// Arguments for `gitter env`.
#[derive(Args, Debug)]
pub struct EnvArgs {
    /// List the variable names each store accepts instead of the values.
    #[arg(long)]
    pub whitelist: bool,
}

/// Arguments for `gitter completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}
