//! Filename-driven syntax profiles and per-row highlighting
//!
//! A profile is selected once per document from its filename and decides
//! which passes run (numbers, strings) and what starts a line comment.
//! Classification is a single left-to-right scan over a row's render text;
//! nothing spans rows, so editing one line never invalidates another.

use std::path::Path;

use crate::types::Highlight;

/// Enable the digit/number pass
pub const HIGHLIGHT_NUMBERS: u8 = 1 << 0;
/// Enable the quoted-string pass
pub const HIGHLIGHT_STRINGS: u8 = 1 << 1;

/// How a profile claims a filename
#[derive(Debug, Clone, Copy)]
pub enum FilePattern {
    /// Filename ends with this (extension match)
    Suffix(&'static str),
    /// Filename contains this anywhere
    Substring(&'static str),
}

/// A file-type description: matching rules plus highlighting parameters
#[derive(Debug)]
pub struct SyntaxProfile {
    /// Human-readable name shown in the status bar
    pub name: &'static str,
    pub patterns: &'static [FilePattern],
    /// Marker that starts a comment running to end of line
    pub comment_start: Option<&'static str>,
    pub flags: u8,
}

/// Built-in profile registry; extending it is adding an entry here
pub static SYNTAX_DB: &[SyntaxProfile] = &[
    SyntaxProfile {
        name: "c",
        patterns: &[
            FilePattern::Suffix(".c"),
            FilePattern::Suffix(".h"),
            FilePattern::Suffix(".cpp"),
        ],
        comment_start: Some("//"),
        flags: HIGHLIGHT_NUMBERS | HIGHLIGHT_STRINGS,
    },
    SyntaxProfile {
        name: "rust",
        patterns: &[FilePattern::Suffix(".rs")],
        comment_start: Some("//"),
        flags: HIGHLIGHT_NUMBERS | HIGHLIGHT_STRINGS,
    },
    SyntaxProfile {
        name: "python",
        patterns: &[FilePattern::Suffix(".py")],
        comment_start: Some("#"),
        flags: HIGHLIGHT_NUMBERS | HIGHLIGHT_STRINGS,
    },
    SyntaxProfile {
        name: "makefile",
        patterns: &[FilePattern::Substring("Makefile")],
        comment_start: Some("#"),
        flags: HIGHLIGHT_NUMBERS,
    },
];

/// Pick the profile for a filename, or `None` for plain text
pub fn detect(path: &Path) -> Option<&'static SyntaxProfile> {
    let name = path.file_name()?.to_str()?;
    SYNTAX_DB.iter().find(|profile| {
        profile.patterns.iter().any(|pattern| match pattern {
            FilePattern::Suffix(s) => name.ends_with(s),
            FilePattern::Substring(s) => name.contains(s),
        })
    })
}

/// Classify every byte of a row's render text
///
/// One pass carrying three pieces of state: whether the previous byte was a
/// separator, the quote character of an open string, and the previous
/// byte's class (for multi-byte number runs). Priority at each position:
/// comment marker, open string, string opening, number, normal.
pub fn highlight_row(render: &[u8], profile: Option<&SyntaxProfile>) -> Vec<Highlight> {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(profile) = profile else {
        return hl;
    };

    let comment_start = profile.comment_start.map(str::as_bytes);
    let mut prev_separator = true;
    let mut in_string: Option<u8> = None;
    let mut i = 0;

    while i < render.len() {
        let b = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if let Some(marker) = comment_start {
            if in_string.is_none() && render[i..].starts_with(marker) {
                for slot in &mut hl[i..] {
                    *slot = Highlight::Comment;
                }
                break;
            }
        }

        if profile.flags & HIGHLIGHT_STRINGS != 0 {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if b == b'\\' && i + 1 < render.len() {
                    // Escaped character: both bytes belong to the string
                    // and the quote stays open.
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if b == quote {
                    in_string = None;
                }
                prev_separator = true;
                i += 1;
                continue;
            }
            if b == b'"' || b == b'\'' {
                in_string = Some(b);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if profile.flags & HIGHLIGHT_NUMBERS != 0 {
            let starts_number = b.is_ascii_digit()
                && (prev_separator || prev_hl == Highlight::Number);
            let continues_number = b == b'.' && prev_hl == Highlight::Number;
            if starts_number || continues_number {
                hl[i] = Highlight::Number;
                prev_separator = false;
                i += 1;
                continue;
            }
        }

        prev_separator = is_separator(b);
        i += 1;
    }

    hl
}

/// Bytes that end an identifier-like run
fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0 || b",.()+-/*=~%<>[];".contains(&b)
}
