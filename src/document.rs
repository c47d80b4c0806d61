//! The in-memory document: rows, cursor and viewport state
//!
//! Owns every row mutation. Each operation validates before touching any
//! buffer (a rejected call is a no-op, never a partial write), re-renders
//! the affected row and re-runs the highlighter on it. `cy` may sit one
//! past the last row, the virtual line where typing appends to the file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::file;
use crate::row::Row;
use crate::syntax::{self, SyntaxProfile};
use crate::types::Highlight;

pub struct Document {
    rows: Vec<Row>,
    /// Cursor column in raw space, 0..=row length
    pub cx: usize,
    /// Cursor row, 0..=row count (== count means past EOF)
    pub cy: usize,
    /// Cursor column in render space, recomputed by `scroll`
    pub rx: usize,
    /// First visible row
    pub row_offset: usize,
    /// First visible render column
    pub col_offset: usize,
    dirty: u64,
    filename: Option<PathBuf>,
    syntax: Option<&'static SyntaxProfile>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            cx: 0,
            cy: 0,
            rx: 0,
            row_offset: 0,
            col_offset: 0,
            dirty: 0,
            filename: None,
            syntax: None,
        }
    }

    /// Load a document from disk
    pub fn open(path: &Path) -> Result<Self> {
        let lines = file::load_rows(path)?;
        let mut doc = Self::new();
        for line in lines {
            let at = doc.rows.len();
            doc.insert_row(at, line);
        }
        doc.dirty = 0;
        doc.set_filename(path.to_path_buf());
        debug!(path = %path.display(), rows = doc.rows.len(), "opened document");
        Ok(doc)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    pub fn mark_saved(&mut self) {
        self.dirty = 0;
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn syntax(&self) -> Option<&'static SyntaxProfile> {
        self.syntax
    }

    /// Set (or change) the filename and re-select the syntax profile
    ///
    /// A new profile invalidates every row's classification, so the
    /// highlighter re-runs over the whole document.
    pub fn set_filename(&mut self, path: PathBuf) {
        self.syntax = syntax::detect(&path);
        self.filename = Some(path);
        for at in 0..self.rows.len() {
            self.rehighlight(at);
        }
    }

    /// Insert a row at `at`; out of `[0, row_count]` is a no-op
    pub fn insert_row(&mut self, at: usize, text: Vec<u8>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(text));
        self.rehighlight(at);
        self.dirty += 1;
    }

    /// Delete the row at `at`; out of `[0, row_count)` is a no-op
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
    }

    /// Insert a byte at the cursor and advance it
    pub fn insert_char(&mut self, c: u8) {
        if self.cy == self.rows.len() {
            self.insert_row(self.rows.len(), Vec::new());
        }
        self.rows[self.cy].insert_char(self.cx, c);
        self.rehighlight(self.cy);
        self.cx += 1;
        self.dirty += 1;
    }

    /// Split the current row at the cursor (Enter)
    pub fn insert_newline(&mut self) {
        if self.cx == 0 {
            self.insert_row(self.cy, Vec::new());
        } else {
            let tail = self.rows[self.cy].split_off(self.cx);
            self.rehighlight(self.cy);
            self.insert_row(self.cy + 1, tail);
        }
        self.cy += 1;
        self.cx = 0;
    }

    /// Delete the byte left of the cursor (backspace)
    ///
    /// At column 0 the current row is appended onto its predecessor and
    /// removed; the cursor lands on the join point.
    pub fn delete_char(&mut self) {
        if self.cy == self.rows.len() {
            return;
        }
        if self.cx == 0 && self.cy == 0 {
            return;
        }

        if self.cx > 0 {
            self.rows[self.cy].delete_char(self.cx - 1);
            self.rehighlight(self.cy);
            self.cx -= 1;
            self.dirty += 1;
        } else {
            let current = self.rows[self.cy].raw().to_vec();
            let prev = &mut self.rows[self.cy - 1];
            self.cx = prev.raw().len();
            prev.append(&current);
            self.rehighlight(self.cy - 1);
            self.delete_row(self.cy);
            self.cy -= 1;
        }
    }

    /// Clamp the viewport so the cursor is inside it; runs before each frame
    pub fn scroll(&mut self, screen_rows: usize, screen_cols: usize) {
        self.rx = match self.rows.get(self.cy) {
            Some(row) => row.cx_to_rx(self.cx),
            None => 0,
        };

        if self.cy < self.row_offset {
            self.row_offset = self.cy;
        }
        if self.cy >= self.row_offset + screen_rows {
            self.row_offset = self.cy - screen_rows + 1;
        }
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if self.rx >= self.col_offset + screen_cols {
            self.col_offset = self.rx - screen_cols + 1;
        }
    }

    /// The byte image written on save: every row followed by a newline
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for row in &self.rows {
            out.extend_from_slice(row.raw());
            out.push(b'\n');
        }
        out
    }

    /// Snapshot a row's highlight classes (search overlay bookkeeping)
    pub fn highlight_snapshot(&self, at: usize) -> Option<Vec<Highlight>> {
        self.rows.get(at).map(|row| row.highlight().to_vec())
    }

    /// Restore a previously snapshotted highlight state
    pub fn restore_highlight(&mut self, at: usize, saved: Vec<Highlight>) {
        if let Some(row) = self.rows.get_mut(at) {
            if saved.len() == row.render().len() {
                row.set_highlight(saved);
            }
        }
    }

    /// Paint the `Match` class over a render-space byte range of one row
    pub fn overlay_match(&mut self, at: usize, start: usize, len: usize) {
        if let Some(row) = self.rows.get_mut(at) {
            let mut hl = row.highlight().to_vec();
            let end = (start + len).min(hl.len());
            let start = start.min(hl.len());
            for slot in &mut hl[start..end] {
                *slot = Highlight::Match;
            }
            row.set_highlight(hl);
        }
    }

    fn rehighlight(&mut self, at: usize) {
        if let Some(row) = self.rows.get_mut(at) {
            let hl = syntax::highlight_row(row.render(), self.syntax);
            row.set_highlight(hl);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
