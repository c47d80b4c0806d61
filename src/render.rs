//! Frame assembly for the terminal
//!
//! Builds every frame into one buffer (hide cursor, redraw, reposition,
//! show cursor) so the terminal sees a single write and never a partially
//! drawn screen. Highlight classes become color escapes with run-length
//! collapsing: a color is only emitted when it differs from the one
//! already in effect.

use std::io::Write;
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::types::Highlight;

/// How long a status message stays visible
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
const CURSOR_HOME: &[u8] = b"\x1b[H";
const ERASE_LINE: &[u8] = b"\x1b[K";
const RESET_COLOR: &[u8] = b"\x1b[39m";
const INVERT: &[u8] = b"\x1b[7m";
const NORMAL: &[u8] = b"\x1b[m";

/// A transient status-bar message with its creation time
pub struct StatusMessage {
    pub text: String,
    pub time: Instant,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time: Instant::now(),
        }
    }
}

/// Owns the frame buffer so its allocation is reused across frames
pub struct Renderer {
    buf: Vec<u8>,
}

impl Renderer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Assemble one complete frame
    ///
    /// The caller must have run `Document::scroll` first so the cursor is
    /// inside the viewport and `rx` is current.
    pub fn frame(
        &mut self,
        doc: &Document,
        screen_rows: usize,
        screen_cols: usize,
        message: Option<&StatusMessage>,
    ) -> &[u8] {
        self.buf.clear();
        self.buf.extend_from_slice(HIDE_CURSOR);
        self.buf.extend_from_slice(CURSOR_HOME);

        self.draw_rows(doc, screen_rows, screen_cols);
        self.draw_status_bar(doc, screen_cols);
        self.draw_message_bar(message, screen_cols);

        let cursor_row = doc.cy - doc.row_offset + 1;
        let cursor_col = doc.rx - doc.col_offset + 1;
        let _ = write!(self.buf, "\x1b[{cursor_row};{cursor_col}H");
        self.buf.extend_from_slice(SHOW_CURSOR);

        &self.buf
    }

    fn draw_rows(&mut self, doc: &Document, screen_rows: usize, screen_cols: usize) {
        for y in 0..screen_rows {
            let file_row = y + doc.row_offset;
            match doc.row(file_row) {
                Some(row) => self.draw_text_row(
                    row.render(),
                    row.highlight(),
                    doc.col_offset,
                    screen_cols,
                ),
                None => {
                    if doc.num_rows() == 0 && y == screen_rows / 3 {
                        self.draw_welcome(screen_cols);
                    } else {
                        self.buf.push(b'~');
                    }
                }
            }
            self.buf.extend_from_slice(ERASE_LINE);
            self.buf.extend_from_slice(b"\r\n");
        }
    }

    /// Draw the visible slice of one document row with colored spans
    fn draw_text_row(
        &mut self,
        render: &[u8],
        highlight: &[Highlight],
        col_offset: usize,
        screen_cols: usize,
    ) {
        let start = col_offset.min(render.len());
        let end = (col_offset + screen_cols).min(render.len());

        let mut current_color: Option<u8> = None;
        for (&b, &hl) in render[start..end].iter().zip(&highlight[start..end]) {
            match color_of(hl) {
                None => {
                    if current_color.is_some() {
                        self.buf.extend_from_slice(RESET_COLOR);
                        current_color = None;
                    }
                }
                Some(color) => {
                    if current_color != Some(color) {
                        let _ = write!(self.buf, "\x1b[{color}m");
                        current_color = Some(color);
                    }
                }
            }
            self.buf.push(b);
        }
        self.buf.extend_from_slice(RESET_COLOR);
    }

    fn draw_welcome(&mut self, screen_cols: usize) {
        let mut banner = format!("tedit -- version {}", env!("CARGO_PKG_VERSION"));
        banner.truncate(screen_cols);
        let padding = (screen_cols - banner.len()) / 2;
        if padding > 0 {
            self.buf.push(b'~');
            for _ in 1..padding {
                self.buf.push(b' ');
            }
        }
        self.buf.extend_from_slice(banner.as_bytes());
    }

    /// Inverse-video bar: name, line count and dirty marker on the left,
    /// file type and cursor position on the right, exactly screen_cols wide
    fn draw_status_bar(&mut self, doc: &Document, screen_cols: usize) {
        self.buf.extend_from_slice(INVERT);

        let name = doc
            .filename()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("[No Name]");
        let modified = if doc.is_dirty() { " (modified)" } else { "" };
        let left: String = format!("{:.20} - {} lines{}", name, doc.num_rows(), modified)
            .chars()
            .take(screen_cols)
            .collect();

        let file_type = doc.syntax().map(|s| s.name).unwrap_or("no ft");
        let right = format!("{} | {}/{}", file_type, doc.cy + 1, doc.num_rows());

        self.buf.extend_from_slice(left.as_bytes());
        let mut used = left.len();
        while used < screen_cols {
            if screen_cols - used == right.len() {
                self.buf.extend_from_slice(right.as_bytes());
                break;
            }
            self.buf.push(b' ');
            used += 1;
        }

        self.buf.extend_from_slice(NORMAL);
        self.buf.extend_from_slice(b"\r\n");
    }

    fn draw_message_bar(&mut self, message: Option<&StatusMessage>, screen_cols: usize) {
        self.buf.extend_from_slice(ERASE_LINE);
        if let Some(msg) = message {
            if msg.time.elapsed() < MESSAGE_TIMEOUT {
                let shown: String = msg.text.chars().take(screen_cols).collect();
                self.buf.extend_from_slice(shown.as_bytes());
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// ANSI foreground color for a highlight class; `None` means default
fn color_of(hl: Highlight) -> Option<u8> {
    match hl {
        Highlight::Normal => None,
        Highlight::Number => Some(31),
        Highlight::Match => Some(34),
        Highlight::String => Some(35),
        Highlight::Comment => Some(36),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn doc_with(lines: &[&str]) -> Document {
        let mut doc = Document::new();
        for (i, line) in lines.iter().enumerate() {
            doc.insert_row(i, line.as_bytes().to_vec());
        }
        doc
    }

    fn frame_string(doc: &mut Document, rows: usize, cols: usize) -> String {
        doc.scroll(rows, cols);
        let mut renderer = Renderer::new();
        String::from_utf8_lossy(renderer.frame(doc, rows, cols, None)).into_owned()
    }

    #[test]
    fn test_frame_brackets_cursor_visibility() {
        let mut doc = doc_with(&["hello"]);
        let frame = frame_string(&mut doc, 4, 20);
        assert!(frame.starts_with("\x1b[?25l\x1b[H"));
        assert!(frame.ends_with("\x1b[?25h"));
    }

    #[test]
    fn test_filler_rows_and_erase_per_line() {
        let mut doc = doc_with(&["only"]);
        let frame = frame_string(&mut doc, 3, 20);
        assert_eq!(frame.matches("\x1b[K").count(), 4); // 3 text rows + message bar
        assert_eq!(frame.matches('~').count(), 2);
    }

    #[test]
    fn test_welcome_banner_only_when_empty() {
        let mut doc = Document::new();
        let frame = frame_string(&mut doc, 12, 60);
        assert!(frame.contains("tedit -- version"));

        let mut doc = doc_with(&["x"]);
        let frame = frame_string(&mut doc, 12, 60);
        assert!(!frame.contains("tedit -- version"));
    }

    #[test]
    fn test_color_runs_are_collapsed() {
        let mut doc = doc_with(&["abc 123 456"]);
        doc.set_filename(PathBuf::from("t.rs"));
        let frame = frame_string(&mut doc, 1, 40);
        // Two digit runs separated by a space: two color sets, not six.
        assert_eq!(frame.matches("\x1b[31m").count(), 2);
    }

    #[test]
    fn test_status_bar_reports_name_and_position() {
        let mut doc = doc_with(&["a", "b"]);
        doc.set_filename(PathBuf::from("t.rs"));
        doc.cy = 1;
        let frame = frame_string(&mut doc, 4, 60);
        assert!(frame.contains("\x1b[7m"));
        assert!(frame.contains("t.rs - 2 lines"));
        assert!(frame.contains("rust | 2/2"));
    }

    #[test]
    fn test_dirty_marker_in_status_bar() {
        let mut doc = doc_with(&["a"]);
        let frame = frame_string(&mut doc, 4, 60);
        assert!(frame.contains("(modified)"));
        doc.mark_saved();
        let frame = frame_string(&mut doc, 4, 60);
        assert!(!frame.contains("(modified)"));
    }

    #[test]
    fn test_cursor_positioned_relative_to_viewport() {
        let lines: Vec<String> = (0..50).map(|i| format!("{i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut doc = doc_with(&refs);
        doc.cy = 30;
        let frame = frame_string(&mut doc, 10, 40);
        // row_offset = 21, so the cursor sits on the last screen row.
        assert!(frame.contains("\x1b[10;1H"));
    }

    #[test]
    fn test_expired_message_is_blank() {
        let mut doc = doc_with(&["x"]);
        doc.scroll(4, 40);
        let mut renderer = Renderer::new();

        let mut msg = StatusMessage::new("hello there");
        let frame = renderer.frame(&doc, 4, 40, Some(&msg)).to_vec();
        assert!(String::from_utf8_lossy(&frame).contains("hello there"));

        msg.time = Instant::now() - MESSAGE_TIMEOUT - Duration::from_secs(1);
        let frame = renderer.frame(&doc, 4, 40, Some(&msg)).to_vec();
        assert!(!String::from_utf8_lossy(&frame).contains("hello there"));
    }
}
