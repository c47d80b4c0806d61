//! Keyboard input decoding for tedit
//!
//! Turns a stream of raw terminal bytes into logical key events. Arrow,
//! paging and editing keys arrive as multi-byte escape sequences; decoding
//! is total - any sequence that is not recognized collapses to a literal
//! `Key::Escape`, never an error.

use anyhow::Result;

/// Map a letter to its control-key byte (Ctrl-Q -> 0x11)
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// A decoded logical key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A literal byte, including control bytes that have no named variant
    Char(u8),
    Enter,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Source of raw input bytes
///
/// `Ok(None)` means the read timed out with no byte available. While an
/// escape sequence is being decoded a timeout is how "the user really
/// pressed Escape" is distinguished from "more sequence bytes coming".
pub trait ByteSource {
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// Block until a byte arrives, then decode one logical key
pub fn read_key(source: &mut impl ByteSource) -> Result<Key> {
    let byte = loop {
        if let Some(b) = source.read_byte()? {
            break b;
        }
    };

    let key = match byte {
        b'\r' => Key::Enter,
        0x7f => Key::Backspace,
        0x1b => decode_escape(source)?,
        b => Key::Char(b),
    };
    Ok(key)
}

/// Decode the bytes following an initial 0x1b
///
/// Each follow-up read uses the same timeout as a normal read; a timeout
/// mid-sequence means the sequence is incomplete and the whole thing
/// resolves to a literal Escape.
fn decode_escape(source: &mut impl ByteSource) -> Result<Key> {
    let Some(first) = source.read_byte()? else {
        return Ok(Key::Escape);
    };

    match first {
        b'[' => {
            let Some(second) = source.read_byte()? else {
                return Ok(Key::Escape);
            };
            let key = match second {
                b'A' => Key::Up,
                b'B' => Key::Down,
                b'C' => Key::Right,
                b'D' => Key::Left,
                b'H' => Key::Home,
                b'F' => Key::End,
                b'0'..=b'9' => {
                    // ESC [ <digit> ~  (vt220-style editing keys)
                    match source.read_byte()? {
                        Some(b'~') => match second {
                            b'1' | b'7' => Key::Home,
                            b'3' => Key::Delete,
                            b'4' | b'8' => Key::End,
                            b'5' => Key::PageUp,
                            b'6' => Key::PageDown,
                            _ => Key::Escape,
                        },
                        _ => Key::Escape,
                    }
                }
                _ => Key::Escape,
            };
            Ok(key)
        }
        b'O' => {
            let key = match source.read_byte()? {
                Some(b'H') => Key::Home,
                Some(b'F') => Key::End,
                _ => Key::Escape,
            };
            Ok(key)
        }
        _ => Ok(Key::Escape),
    }
}
