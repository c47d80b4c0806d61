//! tedit library - core of a small terminal text editor
//!
//! Exposes the editing and rendering engine for the binary and for tests:
//! the row/document model, the key decoder, the syntax highlighter, the
//! frame renderer and the incremental search session.

pub mod document;
pub mod file;
pub mod input;
pub mod logging;
pub mod render;
pub mod row;
pub mod search;
pub mod syntax;
pub mod terminal;
pub mod types;
pub mod ui;
