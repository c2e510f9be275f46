//! `gitter version` -- print gitter's version, platform, and git's version.

use anyhow::Result;
use tracing::warn;

use crate::context::RuntimeContext;
use crate::output::output_json;

/// Version string. Set at compile time via Cargo.toml (workspace version).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build identifier. Can be overridden via environment variable at build time.
const BUILD: &str = {
    match option_env!("GITTER_BUILD") {
        Some(b) => b,
        None => "dev",
    }
};

/// Execute the `gitter version` command.
///
/// A missing or broken git binary is reported but does not fail the
/// command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;

    let git = match ctx.client()?.version() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(error = %e, "could not query git version");
            None
        }
    };

    if ctx.json {
        let info = serde_json::json!({
            "version": VERSION,
            "build": BUILD,
            "os": os,
            "arch": arch,
            "git": git,
        });
        output_json(&info);
    } else {
        println!("gitter version {VERSION} ({BUILD}) {os}/{arch}");
        if !ctx.quiet {
            match git {
                Some(v) => println!("git version {v}"),
                None => println!("git version unknown ({} not runnable)", ctx.config.git_binary),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_constants_exist() {
        assert!(!VERSION.is_empty());
        assert!(!BUILD.is_empty());
    }
}
