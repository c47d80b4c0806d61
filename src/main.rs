//! tedit - a small terminal text editor
//!
//! One optional positional argument: the file to open. Without it the
//! editor starts on an empty unnamed buffer.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Result;

use tedit::logging;
use tedit::ui::App;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut path = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(&args[0]);
                return;
            }
            "-v" | "--version" => {
                println!("tedit {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            other => path = Some(PathBuf::from(other)),
        }
    }

    let _log_guard = logging::init();

    if let Err(err) = run(path) {
        // Raw mode was already restored when the app dropped.
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x1b[2J\x1b[H");
        let _ = stdout.flush();
        eprintln!("tedit: {err:#}");
        process::exit(1);
    }
}

fn run(path: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(path.as_deref())?;
    app.run()
}

fn print_usage(program: &str) {
    println!(
        r#"tedit - a small terminal text editor

Usage: {program} [FILE]

Keys:
  Ctrl-S        Save (prompts for a name on a new buffer)
  Ctrl-Q        Quit (press {} times to discard unsaved changes)
  Ctrl-F        Incremental search (Arrows = next/previous, ESC = cancel)
  Arrow keys    Move cursor
  Home/End      Start/end of line
  PgUp/PgDn     Page up/down"#,
        tedit::types::QUIT_TIMES
    );
}
