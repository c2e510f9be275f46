//! Ayu color theme and styling functions for gitter output.
//!
//! Uses the Ayu Dark color palette.
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Only names and failures get color; paths and descriptions stay muted
//! so a long listing is easy to scan.

use gitter_git::{GitError, RepositoryDescriptor};
use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue
const BARE: (u8, u8, u8) = (0xd2, 0xa6, 0xff); // #d2a6ff - purple

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub const ICON_PASS: &str = "\u{2713}"; // check mark
pub const ICON_FAIL: &str = "\u{2716}"; // heavy multiplication x
pub const ICON_REPO: &str = "\u{25CF}"; // filled circle
pub const ICON_BARE: &str = "\u{25CB}"; // hollow circle

/// Label shown next to bare repositories.
pub const BARE_LABEL: &str = "bare";

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

/// Renders text with pass (green) styling.
pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

/// Renders text with fail (red) styling.
pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

/// Renders secondary text (paths, descriptions).
pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

/// Renders text with accent (blue) styling.
pub fn render_accent(s: &str) -> String {
    color_bold_str(s, ACCENT)
}

// ---------------------------------------------------------------------------
// Repository rendering
// ---------------------------------------------------------------------------

/// Icon for a repository, colored by layout.
pub fn render_repo_icon(bare: bool) -> String {
    if bare {
        color_str(ICON_BARE, BARE)
    } else {
        color_str(ICON_REPO, ACCENT)
    }
}

/// One listing line: icon, name, optional `bare` badge, description.
///
/// The description is cut to fit `width` columns.
pub fn render_repository_line(repo: &RepositoryDescriptor, width: usize) -> String {
    let mut head = format!(
        "{} {}",
        render_repo_icon(repo.is_bare()),
        render_accent(repo.name())
    );
    let mut used = 2 + repo.name().chars().count();
    if repo.is_bare() {
        head.push(' ');
        head.push_str(&color_str(&format!("[{BARE_LABEL}]"), BARE));
        used += BARE_LABEL.len() + 3;
    }

    let room = width.saturating_sub(used + 3);
    let description = fit_to_width(repo.description(), room);
    if description.is_empty() {
        head
    } else {
        format!("{head}  {}", render_muted(&description))
    }
}

/// First line of `text`, shortened with an ellipsis to at most `width`
/// characters.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() <= width {
        return line.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = line.chars().take(width - 1).collect();
    cut.push('\u{2026}');
    cut
}

/// `✖ message`, with a hint for process failures that carry an exit code.
pub fn render_error(err: &GitError) -> String {
    let mut line = format!("{} {}", render_fail(ICON_FAIL), err);
    if let Some(code) = err.exit_code() {
        line.push_str(&render_muted(&format!(" (git exited with {code})")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitter_git::RepositoryKind;
    use pretty_assertions::assert_eq;

    fn descriptor(
        name: &str,
        kind: RepositoryKind,
        description: Option<&str>,
    ) -> (tempfile::TempDir, RepositoryDescriptor) {
        let dir = tempfile::tempdir().unwrap();
        if let Some(text) = description {
            let path = kind.description_path(dir.path());
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, text).unwrap();
        }
        let repo = RepositoryDescriptor::load(name, dir.path().to_path_buf(), kind);
        (dir, repo)
    }

    #[test]
    fn fit_to_width_keeps_short_text() {
        assert_eq!(fit_to_width("hello", 10), "hello");
        assert_eq!(fit_to_width("first\nsecond", 10), "first");
    }

    #[test]
    fn fit_to_width_truncates_with_ellipsis() {
        assert_eq!(fit_to_width("abcdefghij", 5), "abcd\u{2026}");
        assert_eq!(fit_to_width("abc", 0), "");
    }

    #[test]
    fn repository_line_contains_name_and_description() {
        let (_dir, repo) = descriptor("tools/cli", RepositoryKind::Working, Some("Command line"));
        let line = render_repository_line(&repo, 120);
        assert!(line.contains("tools/cli"));
        assert!(line.contains("Command line"));
        assert!(!line.contains(BARE_LABEL));
    }

    #[test]
    fn repository_line_marks_bare() {
        let (_dir, repo) = descriptor("mirror.git", RepositoryKind::Bare, None);
        let line = render_repository_line(&repo, 200);
        assert!(line.contains("mirror.git"));
        assert!(line.contains("[bare]"));
    }

    #[test]
    fn render_error_includes_exit_code() {
        let err = GitError::CommandFailed {
            code: Some(128),
            output: "fatal: not a git repository".to_string(),
            command: "git status".to_string(),
        };
        let line = render_error(&err);
        assert!(line.contains("fatal: not a git repository"));
        assert!(line.contains("128"));
    }
}
