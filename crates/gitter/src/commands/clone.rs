//! `gitter clone` -- clone a repository.

use anyhow::Result;
use tracing::debug;

use crate::cli::CloneArgs;
use crate::commands::init::report;
use crate::context::RuntimeContext;

/// Execute the `gitter clone` command.
pub fn run(ctx: &RuntimeContext, args: &CloneArgs) -> Result<()> {
    let client = ctx.client()?;
    debug!(url = %args.url, dest = %args.path.display(), bare = args.bare, "cloning");
    let repo = client.clone_repository(&args.url, &args.path, args.bare)?;
    report(ctx, &repo, "Cloned");
    Ok(())
}
