//! Incremental search over the document
//!
//! One `SearchState` lives for the duration of a search prompt. Every
//! keystroke in the prompt drives `step`, which first undoes the previous
//! match overlay, then re-scans from the last match in the current
//! direction, wrapping once around the document. The matched row is pulled
//! to the top of the viewport and painted with the `Match` class; the
//! pre-overlay highlight is snapshotted so the next step (or cancellation)
//! can restore it exactly.

use memchr::memmem;
use tracing::debug;

use crate::document::Document;
use crate::input::Key;
use crate::types::Highlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

pub struct SearchState {
    last_match: Option<usize>,
    direction: Direction,
    saved_highlight: Option<(usize, Vec<Highlight>)>,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            last_match: None,
            direction: Direction::Forward,
            saved_highlight: None,
        }
    }

    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Advance the search session by one prompt keystroke
    ///
    /// `query` is the full text typed so far; `key` is the keystroke that
    /// produced this step. Enter and Escape end the session (the caller
    /// restores cursor/viewport on Escape), arrows pick a direction, any
    /// other key restarts from scratch with the edited query.
    pub fn step(&mut self, doc: &mut Document, query: &[u8], key: Key) {
        if let Some((at, saved)) = self.saved_highlight.take() {
            doc.restore_highlight(at, saved);
        }

        match key {
            Key::Enter | Key::Escape => {
                self.last_match = None;
                self.direction = Direction::Forward;
                return;
            }
            Key::Right | Key::Down => self.direction = Direction::Forward,
            Key::Left | Key::Up => self.direction = Direction::Backward,
            _ => {
                self.last_match = None;
                self.direction = Direction::Forward;
            }
        }

        if query.is_empty() || doc.num_rows() == 0 {
            return;
        }

        let mut current = self.last_match;
        for _ in 0..doc.num_rows() {
            let at = advance(current, self.direction, doc.num_rows());
            current = Some(at);

            let row = &doc.rows()[at];
            let Some(offset) = memmem::find(row.render(), query) else {
                continue;
            };

            let cx = row.rx_to_cx(offset);
            let snapshot = row.highlight().to_vec();
            debug!(row = at, offset, "search match");

            self.last_match = Some(at);
            doc.cy = at;
            doc.cx = cx;
            // Past-the-end offset: the next scroll clamps it back so the
            // matched row lands at the top of the viewport.
            doc.row_offset = doc.num_rows();

            self.saved_highlight = Some((at, snapshot));
            doc.overlay_match(at, offset, query.len());
            return;
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Next row index to probe, wrapping past either end
fn advance(current: Option<usize>, direction: Direction, num_rows: usize) -> usize {
    match (current, direction) {
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => num_rows - 1,
        (Some(i), Direction::Forward) => (i + 1) % num_rows,
        (Some(i), Direction::Backward) => i.checked_sub(1).unwrap_or(num_rows - 1),
    }
}
