//! End-to-end tests over the library surface: edit, highlight, search,
//! render and save against real files.

use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use tedit::document::Document;
use tedit::input::Key;
use tedit::render::Renderer;
use tedit::search::SearchState;
use tedit::syntax;
use tedit::types::Highlight;

#[test]
fn test_open_edit_save_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "line one\nline two\n").unwrap();

    let mut doc = Document::open(&path).unwrap();
    assert_eq!(doc.num_rows(), 2);
    assert!(!doc.is_dirty());

    // Type at the end of the first line.
    doc.cy = 0;
    doc.cx = doc.row(0).unwrap().raw().len();
    for b in b" edited" {
        doc.insert_char(*b);
    }
    assert!(doc.is_dirty());

    let written = tedit::file::save(&path, &doc.to_bytes()).unwrap();
    doc.mark_saved();
    assert_eq!(written, "line one edited\nline two\n".len());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "line one edited\nline two\n"
    );

    let reloaded = Document::open(&path).unwrap();
    assert_eq!(reloaded.row(0).unwrap().raw(), b"line one edited");
}

#[test]
fn test_save_writes_exact_newline_terminated_image() {
    let mut doc = Document::new();
    doc.insert_row(0, b"a".to_vec());
    doc.insert_row(1, b"bb".to_vec());

    let dir = tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let written = tedit::file::save(&path, &doc.to_bytes()).unwrap();

    assert_eq!(written, 5);
    assert_eq!(fs::read(&path).unwrap(), b"a\nbb\n");
}

#[test]
fn test_opening_rust_file_highlights_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snippet.rs");
    fs::write(&path, "let x = 42; // answer\n").unwrap();

    let doc = Document::open(&path).unwrap();
    assert_eq!(doc.syntax().unwrap().name, "rust");

    let hl = doc.row(0).unwrap().highlight();
    let render = doc.row(0).unwrap().render();
    let digit = render.iter().position(|&b| b == b'4').unwrap();
    let slash = render.iter().position(|&b| b == b'/').unwrap();
    assert_eq!(hl[digit], Highlight::Number);
    assert!(hl[slash..].iter().all(|&h| h == Highlight::Comment));
}

#[test]
fn test_search_session_restores_highlights_on_cancel() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prog.c");
    fs::write(&path, "int a = 7;\nchar *s = \"seven\";\n").unwrap();

    let mut doc = Document::open(&path).unwrap();
    let mut search = SearchState::new();

    search.step(&mut doc, b"seven", Key::Char(b'n'));
    assert_eq!(doc.cy, 1);
    let overlaid = doc.row(1).unwrap().highlight();
    assert!(overlaid.contains(&Highlight::Match));

    search.step(&mut doc, b"seven", Key::Escape);
    let expected = syntax::highlight_row(doc.row(1).unwrap().render(), doc.syntax());
    assert_eq!(doc.row(1).unwrap().highlight(), &expected[..]);
}

#[test]
fn test_search_then_render_shows_match_color_at_top() {
    let mut doc = Document::new();
    for i in 0..40 {
        let line = if i == 25 {
            b"the needle row".to_vec()
        } else {
            format!("filler {i}").into_bytes()
        };
        doc.insert_row(i, line);
    }
    doc.set_filename(PathBuf::from("big.txt"));

    let mut search = SearchState::new();
    search.step(&mut doc, b"needle", Key::Char(b'e'));

    doc.scroll(10, 80);
    assert_eq!(doc.row_offset, 25);

    let mut renderer = Renderer::new();
    let frame = renderer.frame(&doc, 10, 80, None).to_vec();
    let text = String::from_utf8_lossy(&frame);
    // Match color (34) wraps exactly the query inside the drawn row.
    assert!(text.contains("the \x1b[34mneedle\x1b[39m row"));
}

#[test]
fn test_full_editing_session_produces_expected_file() {
    // Simulates: open empty, type two lines, split, join, save.
    let mut doc = Document::new();
    for b in b"hello world" {
        doc.insert_char(*b);
    }
    doc.cx = 5;
    doc.insert_newline();
    assert_eq!(doc.num_rows(), 2);

    // Join the halves back together.
    doc.delete_char();
    assert_eq!(doc.num_rows(), 1);
    assert_eq!(doc.row(0).unwrap().raw(), b"hello world");

    doc.insert_newline();
    doc.insert_char(b'!');

    let dir = tempdir().unwrap();
    let path = dir.path().join("session.txt");
    tedit::file::save(&path, &doc.to_bytes()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n! world\n");
}
