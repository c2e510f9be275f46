//! `gitter list` -- list repositories below a directory.

use anyhow::Result;
use gitter_git::GitError;
use gitter_ui::pager;

use crate::cli::ListArgs;
use crate::context::RuntimeContext;
use crate::output::{format_repositories_for_terminal, output_json};

/// Execute the `gitter list` command.
///
/// A directory without repositories is an empty listing, not an error.
pub fn run(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let dir = RuntimeContext::path_or_cwd(args.dir.as_ref())?;
    let client = ctx.client()?;
    let repos = match client.get_repositories(&dir) {
        Ok(repos) => repos,
        Err(GitError::RepositoryNotFound(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if ctx.json {
        output_json(&repos);
        return Ok(());
    }

    if repos.is_empty() {
        if !ctx.quiet {
            println!("No repositories found under {}", dir.display());
        }
        return Ok(());
    }

    let content = format_repositories_for_terminal(&repos);
    if args.no_pager {
        print!("{content}");
    } else {
        pager::page(&content);
    }
    Ok(())
}
