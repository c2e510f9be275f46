//! `gitter exec` -- run a git subcommand inside a repository.
//!
//! Standard output from git is passed through unmodified. When git fails
//! its exit code becomes gitter's exit code.

use anyhow::{Context, Result};
use gitter_git::Client;
use gitter_ui::styles::render_error;

use crate::cli::ExecArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `gitter exec` command.
pub fn run(ctx: &RuntimeContext, args: &ExecArgs) -> Result<()> {
    let start = RuntimeContext::path_or_cwd(args.repo.as_ref())?;
    let client = ctx.client()?;
    let repo = client.get_repository(&start)?;

    let (subcommand, rest) = args
        .command
        .split_first()
        .context("missing git subcommand")?;
    let command = repo.command(subcommand).args(rest);
    let line = command.to_command_line();

    if args.dry_run {
        if ctx.json {
            output_json(&serde_json::json!({
                "cwd": repo.path(),
                "command": line,
                "argv": command.to_argv(),
            }));
        } else {
            println!("{}", dry_run_line(&client, &line));
        }
        return Ok(());
    }

    match repo.run(&command) {
        Ok(out) => {
            if ctx.json {
                output_json(&serde_json::json!({
                    "command": line,
                    "output": out,
                }));
            } else {
                print!("{out}");
            }
            Ok(())
        }
        Err(e) => match e.exit_code() {
            Some(code) if !ctx.json => {
                eprintln!("{}", render_error(&e));
                std::process::exit(code);
            }
            _ => Err(e.into()),
        },
    }
}

/// The command line prefixed with the configured environment, in the form
/// a shell would accept.
fn dry_run_line(client: &Client, line: &str) -> String {
    [
        client.git_env().to_shell_string(),
        client.shell_env().to_shell_string(),
        line.to_string(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dry_run_line_without_env() {
        let client = Client::new();
        assert_eq!(dry_run_line(&client, "git status"), "git status");
    }

    #[test]
    fn dry_run_line_prefixes_env() {
        let mut client = Client::new();
        client.git_env_mut().set("GIT_AUTHOR_NAME", "Ada L").unwrap();
        client.shell_env_mut().set("HOME", "/home/ada").unwrap();
        assert_eq!(
            dry_run_line(&client, "git status"),
            "GIT_AUTHOR_NAME='Ada L' HOME='/home/ada' git status"
        );
    }
}
