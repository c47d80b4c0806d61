//! A single line of the document
//!
//! Each row keeps three parallel views of the same line: `raw` is the
//! authoritative content (no trailing newline), `render` is the tab-expanded
//! form the screen shows, and `highlight` tags every render byte with its
//! classification. `render` and `highlight` are rebuilt synchronously on
//! every mutation of `raw`, so readers never observe stale state.

use crate::types::{Highlight, TAB_STOP};

#[derive(Debug, Clone)]
pub struct Row {
    raw: Vec<u8>,
    render: Vec<u8>,
    highlight: Vec<Highlight>,
}

impl Row {
    pub fn new(raw: Vec<u8>) -> Self {
        let mut row = Self {
            raw,
            render: Vec::new(),
            highlight: Vec::new(),
        };
        row.rebuild_render();
        row
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Replace the highlight classes for this row
    ///
    /// Callers must supply exactly one class per render byte.
    pub(crate) fn set_highlight(&mut self, highlight: Vec<Highlight>) {
        debug_assert_eq!(highlight.len(), self.render.len());
        self.highlight = highlight;
    }

    /// Insert a byte at position `at` in raw space, clamped to the row end
    pub fn insert_char(&mut self, at: usize, c: u8) {
        let at = at.min(self.raw.len());
        self.raw.insert(at, c);
        self.rebuild_render();
    }

    /// Delete the byte at position `at` in raw space; out of range is a no-op
    pub fn delete_char(&mut self, at: usize) {
        if at >= self.raw.len() {
            return;
        }
        self.raw.remove(at);
        self.rebuild_render();
    }

    /// Append bytes to the end of the row (row-join on backspace)
    pub fn append(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
        self.rebuild_render();
    }

    /// Split the row at `at`, keeping `[0, at)` and returning the tail
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.raw.len());
        let tail = self.raw.split_off(at);
        self.rebuild_render();
        tail
    }

    /// Convert a raw-space column to its render-space column
    ///
    /// Every byte advances one column except tabs, which advance to the
    /// next multiple of the tab stop.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &b in &self.raw[..cx.min(self.raw.len())] {
            if b == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Convert a render-space column back to raw space
    ///
    /// Left-inverse of `cx_to_rx`: returns the first raw column whose
    /// accumulated render width exceeds `rx`.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &b) in self.raw.iter().enumerate() {
            if b == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.raw.len()
    }

    /// Recompute `render` from `raw` and reset `highlight` to match
    ///
    /// The owning document re-runs the syntax pass afterwards; the reset
    /// keeps the length invariant even for rows without a profile.
    fn rebuild_render(&mut self) {
        self.render.clear();
        for &b in &self.raw {
            if b == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }
        self.highlight = vec![Highlight::Normal; self.render.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_expands_tabs_to_tab_stop() {
        let row = Row::new(b"\tx".to_vec());
        assert_eq!(row.render(), b"        x");

        let row = Row::new(b"ab\tc".to_vec());
        assert_eq!(row.render(), b"ab      c");
    }

    #[test]
    fn test_highlight_tracks_render_length() {
        let mut row = Row::new(b"a\tb".to_vec());
        assert_eq!(row.highlight().len(), row.render().len());

        row.insert_char(0, b'\t');
        assert_eq!(row.highlight().len(), row.render().len());

        row.delete_char(0);
        assert_eq!(row.highlight().len(), row.render().len());
    }

    #[test]
    fn test_cx_rx_round_trip() {
        let row = Row::new(b"a\tbc\t\td".to_vec());
        for cx in 0..=row.raw().len() {
            assert_eq!(row.rx_to_cx(row.cx_to_rx(cx)), cx, "cx = {cx}");
        }
    }

    #[test]
    fn test_insert_then_delete_restores_raw() {
        let mut row = Row::new(b"hello".to_vec());
        row.insert_char(2, b'X');
        assert_eq!(row.raw(), b"heXllo");
        row.delete_char(2);
        assert_eq!(row.raw(), b"hello");
    }

    #[test]
    fn test_insert_clamps_out_of_range() {
        let mut row = Row::new(b"ab".to_vec());
        row.insert_char(99, b'c');
        assert_eq!(row.raw(), b"abc");
    }

    #[test]
    fn test_split_and_append_restore_row() {
        let mut row = Row::new(b"left right".to_vec());
        let tail = row.split_off(4);
        assert_eq!(row.raw(), b"left");
        assert_eq!(tail, b" right");
        row.append(&tail);
        assert_eq!(row.raw(), b"left right");
    }
}
