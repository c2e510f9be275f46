//! Pager support for long listings.
//!
//! Output taller than the terminal is piped through `$GITTER_PAGER`,
//! `$PAGER`, or `less` (with `LESS=-RFX` unless the user set `LESS`).

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::terminal::{is_tty, terminal_height};

/// Disables paging when set to any value.
pub const NO_PAGER_ENV: &str = "GITTER_NO_PAGER";

/// Overrides the pager command.
pub const PAGER_ENV: &str = "GITTER_PAGER";

/// Returns `true` if `content` should go through a pager.
pub fn should_page(content: &str) -> bool {
    if env::var_os(NO_PAGER_ENV).is_some() || !is_tty() {
        return false;
    }
    fits_height(content, terminal_height()).is_some_and(|fits| !fits)
}

/// Whether `content` fits in `height` rows, keeping one row for the prompt.
/// `None` when the height is unknown.
fn fits_height(content: &str, height: usize) -> Option<bool> {
    if height == 0 {
        return None;
    }
    Some(content.lines().count() <= height.saturating_sub(1))
}

/// Print `content`, through a pager when it is too tall for the terminal.
///
/// Falls back to plain stdout if the pager cannot be started.
pub fn page(content: &str) {
    if !should_page(content) {
        print!("{content}");
        return;
    }

    let argv = pager_command(env::var(PAGER_ENV).ok(), env::var("PAGER").ok());
    let Some((program, args)) = argv.split_first() else {
        print!("{content}");
        return;
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if env::var_os("LESS").is_none() {
        cmd.env("LESS", "-RFX");
    }

    match cmd.spawn() {
        Ok(mut child) => {
            if let Some(mut stdin) = child.stdin.take() {
                // The user may quit the pager early; a broken pipe is fine.
                let _ = stdin.write_all(content.as_bytes());
            }
            let _ = child.wait();
        }
        Err(_) => print!("{content}"),
    }
}

/// Split the first non-empty pager setting into an argument vector.
fn pager_command(gitter_pager: Option<String>, pager: Option<String>) -> Vec<String> {
    let chosen = [gitter_pager, pager]
        .into_iter()
        .flatten()
        .find(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "less".to_string());
    chosen.split_whitespace().map(String::from).collect()
}
