//! `gitter` -- find, create and drive git repositories.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use gitter_git::GitError;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(130);
    });

    let cli = Cli::parse();

    init_logging(cli.global.verbose);

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| match &cli.command {
        Some(Commands::Version) => commands::version::run(&ctx),
        Some(Commands::Find(args)) => commands::find::run(&ctx, args),
        Some(Commands::List(args)) => commands::list::run(&ctx, args),
        Some(Commands::Init(args)) => commands::init::run(&ctx, args),
        Some(Commands::Clone(args)) => commands::clone::run(&ctx, args),
        Some(Commands::Exec(args)) => commands::exec::run(&ctx, args),
        Some(Commands::Env(args)) => commands::env_cmd::run(&ctx, args),
        Some(Commands::Completion(args)) => commands::completion::run(&ctx, args),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    });

    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{s}");
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(exit_code_for(&e));
    }
}

/// `-v` turns on debug output for the gitter crates; otherwise `RUST_LOG`
/// is honored. Logs always go to stderr.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gitter=debug,gitter_git=debug,gitter_config=debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// A failed git process passes its own exit code through; everything else
/// exits with 1.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<GitError>()
        .and_then(GitError::exit_code)
        .filter(|&code| code != 0)
        .unwrap_or(1)
}
