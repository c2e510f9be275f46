//! Terminal output helpers for gitter.
//!
//! Color styling for repository listings, terminal detection, and pager
//! support for long output.

pub mod pager;
pub mod styles;
pub mod terminal;
