//! Terminal detection.

use std::env;

/// Width used when the terminal size is unknown.
pub const DEFAULT_WIDTH: usize = 80;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Terminal height in rows, or 0 if unknown.
pub fn terminal_height() -> usize {
    crossterm::terminal::size().map_or(0, |(_cols, rows)| usize::from(rows))
}

/// Columns available for a repository listing.
///
/// `COLUMNS` wins when it holds a positive number; otherwise the detected
/// terminal width, or [`DEFAULT_WIDTH`] when output is not a terminal.
pub fn listing_width() -> usize {
    width_from(
        env::var("COLUMNS").ok().as_deref(),
        crossterm::terminal::size().ok().map(|(cols, _)| usize::from(cols)),
    )
}

fn width_from(columns: Option<&str>, detected: Option<usize>) -> usize {
    columns
        .and_then(|c| c.trim().parse::<usize>().ok())
        .filter(|&c| c > 0)
        .or(detected.filter(|&c| c > 0))
        .unwrap_or(DEFAULT_WIDTH)
}

/// Determines if ANSI color codes should be used.
///
/// - `NO_COLOR` (any value) disables color (<https://no-color.org/>)
/// - `CLICOLOR=0` or `TERM=dumb` disables color
/// - `CLICOLOR_FORCE` (any value) forces color even when piped
/// - otherwise color is used only on a TTY
pub fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some()
        || env::var("CLICOLOR").as_deref() == Ok("0")
        || env::var("TERM").as_deref() == Ok("dumb")
    {
        return false;
    }
    env::var_os("CLICOLOR_FORCE").is_some() || is_tty()
}
