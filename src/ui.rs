//! The editor application: event loop and keypress dispatch
//!
//! Thin glue over the core: read one logical key, route it to the document
//! or the search session, redraw. Strictly turn-based; every keystroke is
//! fully applied and re-highlighted before the next frame or the next read.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::document::Document;
use crate::input::{self, ctrl, Key};
use crate::render::{Renderer, StatusMessage};
use crate::search::SearchState;
use crate::terminal::{self, RawMode, StdinSource};
use crate::types::QUIT_TIMES;

pub struct App {
    doc: Document,
    renderer: Renderer,
    input: StdinSource,
    // Held for its Drop: restores cooked mode on every exit path.
    _raw: RawMode,
    screen_rows: usize,
    screen_cols: usize,
    message: Option<StatusMessage>,
    quit_times: u32,
    should_quit: bool,
}

impl App {
    /// Enter raw mode, size the screen and load the file if one was given
    ///
    /// A path that does not exist yet opens an empty buffer that will be
    /// created on first save.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let raw = RawMode::enable().context("failed to enable raw terminal mode")?;
        let mut input = StdinSource::new();
        let (rows, cols) =
            terminal::window_size(&mut input).context("failed to query terminal size")?;

        let doc = match path {
            Some(p) if p.exists() => Document::open(p)?,
            Some(p) => {
                let mut doc = Document::new();
                doc.set_filename(p.to_path_buf());
                doc
            }
            None => Document::new(),
        };

        Ok(Self {
            doc,
            renderer: Renderer::new(),
            input,
            _raw: raw,
            // Bottom two rows are the status and message bars.
            screen_rows: rows.saturating_sub(2),
            screen_cols: cols,
            message: Some(StatusMessage::new(
                "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find",
            )),
            quit_times: QUIT_TIMES,
            should_quit: false,
        })
    }

    /// Run until quit, leaving a cleared screen behind
    pub fn run(&mut self) -> Result<()> {
        while !self.should_quit {
            self.refresh_screen()?;
            self.process_keypress()?;
        }
        let mut stdout = io::stdout();
        stdout
            .write_all(b"\x1b[2J\x1b[H")
            .and_then(|_| stdout.flush())
            .context("failed to clear screen")?;
        Ok(())
    }

    fn refresh_screen(&mut self) -> Result<()> {
        self.doc.scroll(self.screen_rows, self.screen_cols);
        let frame = self.renderer.frame(
            &self.doc,
            self.screen_rows,
            self.screen_cols,
            self.message.as_ref(),
        );
        let mut stdout = io::stdout();
        stdout
            .write_all(frame)
            .and_then(|_| stdout.flush())
            .context("failed to write frame")
    }

    fn process_keypress(&mut self) -> Result<()> {
        let key = input::read_key(&mut self.input)?;

        match key {
            Key::Char(c) if c == ctrl(b'q') => {
                if self.doc.is_dirty() && self.quit_times > 0 {
                    self.set_status(format!(
                        "WARNING! File has unsaved changes. \
                         Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Ok(());
                }
                self.should_quit = true;
                return Ok(());
            }
            Key::Char(c) if c == ctrl(b's') => self.save()?,
            Key::Char(c) if c == ctrl(b'f') => self.find()?,
            Key::Enter => self.doc.insert_newline(),
            Key::Backspace => self.doc.delete_char(),
            Key::Char(c) if c == ctrl(b'h') => self.doc.delete_char(),
            Key::Delete => {
                self.move_cursor(Key::Right);
                self.doc.delete_char();
            }
            Key::Up | Key::Down | Key::Left | Key::Right => self.move_cursor(key),
            Key::Home => self.doc.cx = 0,
            Key::End => {
                if let Some(row) = self.doc.row(self.doc.cy) {
                    self.doc.cx = row.raw().len();
                }
            }
            Key::PageUp | Key::PageDown => self.page(key),
            // Refresh happens every turn anyway; swallow the redraw key.
            Key::Escape => {}
            Key::Char(c) if c == ctrl(b'l') => {}
            Key::Char(c) if !c.is_ascii_control() => self.doc.insert_char(c),
            Key::Char(_) => {}
        }

        self.quit_times = QUIT_TIMES;
        Ok(())
    }

    /// Arrow-key motion; vertical moves clamp the column to the new row
    fn move_cursor(&mut self, key: Key) {
        let doc = &mut self.doc;
        match key {
            Key::Up => doc.cy = doc.cy.saturating_sub(1),
            Key::Down => {
                if doc.cy < doc.num_rows() {
                    doc.cy += 1;
                }
            }
            Key::Left => {
                if doc.cx > 0 {
                    doc.cx -= 1;
                } else if doc.cy > 0 {
                    // Wrap to the end of the previous line.
                    doc.cy -= 1;
                    doc.cx = doc.row(doc.cy).map_or(0, |r| r.raw().len());
                }
            }
            Key::Right => match doc.row(doc.cy) {
                Some(row) if doc.cx < row.raw().len() => doc.cx += 1,
                Some(_) => {
                    doc.cy += 1;
                    doc.cx = 0;
                }
                None => {}
            },
            _ => {}
        }

        let row_len = doc.row(doc.cy).map_or(0, |r| r.raw().len());
        doc.cx = doc.cx.min(row_len);
    }

    /// Move a full screen, keeping the viewport with the cursor
    fn page(&mut self, key: Key) {
        let doc = &mut self.doc;
        match key {
            Key::PageUp => doc.cy = doc.row_offset,
            Key::PageDown => {
                doc.cy = (doc.row_offset + self.screen_rows - 1).min(doc.num_rows());
            }
            _ => return,
        }
        let step = if key == Key::PageUp { Key::Up } else { Key::Down };
        for _ in 0..self.screen_rows {
            self.move_cursor(step);
        }
    }

    /// Save the document, prompting for a name if it has none
    ///
    /// Failures here are recoverable: they become a status message and the
    /// dirty flag survives for the next attempt.
    fn save(&mut self) -> Result<()> {
        if self.doc.filename().is_none() {
            let name = self.prompt("Save as: {} (ESC to cancel)", |_, _, _| {})?;
            match name {
                Some(name) => self.doc.set_filename(PathBuf::from(name)),
                None => {
                    self.set_status("Save aborted");
                    return Ok(());
                }
            }
        }

        let Some(path) = self.doc.filename().map(Path::to_path_buf) else {
            return Ok(());
        };
        match crate::file::save(&path, &self.doc.to_bytes()) {
            Ok(bytes) => {
                self.doc.mark_saved();
                self.set_status(format!("{bytes} bytes written to disk"));
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "save failed");
                self.set_status(format!("Can't save! I/O error: {err:#}"));
            }
        }
        Ok(())
    }

    /// Incremental search; Escape restores the pre-search cursor/viewport
    fn find(&mut self) -> Result<()> {
        let saved_cx = self.doc.cx;
        let saved_cy = self.doc.cy;
        let saved_col_offset = self.doc.col_offset;
        let saved_row_offset = self.doc.row_offset;

        let mut search = SearchState::new();
        let query = self.prompt(
            "Search: {} (Use ESC/Arrows/Enter)",
            |doc, query, key| search.step(doc, query.as_bytes(), key),
        )?;

        if query.is_none() {
            self.doc.cx = saved_cx;
            self.doc.cy = saved_cy;
            self.doc.col_offset = saved_col_offset;
            self.doc.row_offset = saved_row_offset;
        } else {
            debug!(query = query.as_deref().unwrap_or(""), "search accepted");
        }
        Ok(())
    }

    /// Modal single-line prompt on the message bar
    ///
    /// `prompt` contains a `{}` placeholder for the input so far. The
    /// callback sees the document, the current input and every keystroke,
    /// which is how the search session rides along. Returns `None` on
    /// Escape, `Some` on Enter with non-empty input.
    ///
    /// The prompt is modal: the document cannot be edited while it is
    /// open, which is what lets the search session assume its highlight
    /// snapshots stay valid between steps.
    fn prompt<F>(&mut self, prompt: &str, mut callback: F) -> Result<Option<String>>
    where
        F: FnMut(&mut Document, &str, Key),
    {
        let mut buf = String::new();
        loop {
            self.message = Some(StatusMessage::new(prompt.replacen("{}", &buf, 1)));
            self.refresh_screen()?;

            let key = input::read_key(&mut self.input)?;
            match key {
                Key::Escape => {
                    self.message = None;
                    callback(&mut self.doc, &buf, key);
                    return Ok(None);
                }
                Key::Enter => {
                    if !buf.is_empty() {
                        self.message = None;
                        callback(&mut self.doc, &buf, key);
                        return Ok(Some(buf));
                    }
                }
                Key::Backspace => {
                    buf.pop();
                    callback(&mut self.doc, &buf, key);
                }
                Key::Char(c) if c == ctrl(b'h') => {
                    buf.pop();
                    callback(&mut self.doc, &buf, key);
                }
                Key::Char(c) if !c.is_ascii_control() => {
                    buf.push(c as char);
                    callback(&mut self.doc, &buf, key);
                }
                _ => callback(&mut self.doc, &buf, key),
            }
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage::new(text));
    }
}
