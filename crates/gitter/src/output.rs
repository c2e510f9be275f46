//! Output formatting helpers for the `gitter` CLI.

use std::path::Path;

use gitter_git::RepositoryDescriptor;
use gitter_ui::styles::{ICON_PASS, render_muted, render_pass, render_repository_line};
use gitter_ui::terminal::listing_width;
use serde::Serialize;

/// Prints a value as pretty JSON to stdout.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error serializing JSON: {e}"),
    }
}

/// Renders a repository listing, one line per repository.
///
/// `width` bounds each line so descriptions never wrap.
pub fn format_repositories(repos: &[RepositoryDescriptor], width: usize) -> String {
    let mut out = String::new();
    for repo in repos {
        out.push_str(&render_repository_line(repo, width));
        out.push('\n');
    }
    out
}

/// Renders a listing at the terminal width.
pub fn format_repositories_for_terminal(repos: &[RepositoryDescriptor]) -> String {
    format_repositories(repos, listing_width())
}

/// `✓ <message> <path>` line for a successful create or clone.
pub fn success_line(message: &str, path: &Path) -> String {
    format!(
        "{} {message} {}",
        render_pass(ICON_PASS),
        render_muted(&path.display().to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitter_git::RepositoryKind;

    #[test]
    fn format_repositories_one_line_each() {
        let dir = tempfile::tempdir().unwrap();
        let repos = vec![
            RepositoryDescriptor::load("alpha", dir.path().join("alpha"), RepositoryKind::Working),
            RepositoryDescriptor::load("beta", dir.path().join("beta"), RepositoryKind::Bare),
        ];
        let out = format_repositories(&repos, 80);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("alpha"));
        assert!(lines[1].contains("beta"));
    }

    #[test]
    fn format_repositories_empty() {
        assert_eq!(format_repositories(&[], 80), "");
    }

    #[test]
    fn success_line_names_path() {
        let line = success_line("Initialized repository at", Path::new("/tmp/x"));
        assert!(line.contains("Initialized repository at"));
        assert!(line.contains("/tmp/x"));
    }
}
