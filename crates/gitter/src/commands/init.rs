//! `gitter init` -- create a new repository.

use anyhow::Result;
use gitter_git::Repository;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, success_line};

/// Execute the `gitter init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let client = ctx.client()?;
    let repo = client.create_repository(&args.path, args.bare)?;
    if let Some(text) = &args.description {
        repo.set_description(text)?;
    }
    report(ctx, &repo, "Initialized empty");
    Ok(())
}

/// Print the outcome of a create or clone.
pub(crate) fn report(ctx: &RuntimeContext, repo: &Repository<'_>, verb: &str) {
    if ctx.json {
        output_json(&repo.descriptor());
    } else if !ctx.quiet {
        let kind = if repo.is_bare() { "bare repository" } else { "repository" };
        println!("{}", success_line(&format!("{verb} {kind} in"), repo.path()));
    }
}
