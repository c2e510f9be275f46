//! `gitter env` -- show the environment gitter passes to git.

use std::collections::BTreeMap;

use anyhow::Result;
use gitter_git::commands::escape_arg;
use gitter_git::{EnvScope, Environment};

use crate::cli::EnvArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `gitter env` command.
pub fn run(ctx: &RuntimeContext, args: &EnvArgs) -> Result<()> {
    if args.whitelist {
        if ctx.json {
            output_json(&serde_json::json!({
                "git": EnvScope::Git.whitelist(),
                "shell": EnvScope::Shell.whitelist(),
            }));
        } else {
            for scope in [EnvScope::Git, EnvScope::Shell] {
                println!("# {scope}");
                for name in scope.whitelist() {
                    println!("{name}");
                }
            }
        }
        return Ok(());
    }

    let client = ctx.client()?;
    if ctx.json {
        output_json(&serde_json::json!({
            "config": ctx.config_path,
            "git-binary": client.binary(),
            "inherit-env": client.inherits_env(),
            "git": as_map(client.git_env()),
            "shell": as_map(client.shell_env()),
        }));
        return Ok(());
    }

    if !ctx.quiet {
        match &ctx.config_path {
            Some(path) => println!("# config: {}", path.display()),
            None => println!("# config: (defaults)"),
        }
        println!("# inherit-env: {}", client.inherits_env());
    }
    print!("{}", render_store(client.git_env()));
    print!("{}", render_store(client.shell_env()));
    Ok(())
}

fn as_map(env: &Environment) -> BTreeMap<&str, &str> {
    env.iter().collect()
}

/// `# scope` header followed by one `KEY='value'` line per entry.
fn render_store(env: &Environment) -> String {
    let mut out = format!("# {}\n", env.scope());
    for (key, value) in env.iter() {
        out.push_str(&format!("{key}={}\n", escape_arg(value)));
    }
    out
}
