//! `gitter find` -- locate the repository containing a path.

use anyhow::Result;

use crate::cli::FindArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `gitter find` command.
///
/// Prints the repository root, or its descriptor with `--json`.
pub fn run(ctx: &RuntimeContext, args: &FindArgs) -> Result<()> {
    let start = RuntimeContext::path_or_cwd(args.path.as_ref())?;
    let client = ctx.client()?;
    let repo = client.get_repository(&start)?;

    if ctx.json {
        output_json(&repo.descriptor());
    } else {
        println!("{}", repo.path().display());
    }
    Ok(())
}
