//! Core data types for tedit
//!
//! Shared vocabulary used by the row model, the highlighter, the renderer
//! and the search session.

/// Number of columns a tab character expands to in render space
pub const TAB_STOP: usize = 8;

/// Consecutive quit presses required to discard unsaved changes
pub const QUIT_TIMES: u32 = 3;

/// Semantic classification of one rendered character
///
/// This is a tag, not a color; the renderer decides how each class is
/// displayed. `Match` is a transient overlay applied by the search session
/// on top of whatever the highlighter produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Comment,
    String,
    Number,
    Match,
}
