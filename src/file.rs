//! File load/save collaborators
//!
//! Loading produces newline-stripped row contents; saving writes the
//! joined rows through a temp file in the target directory and renames it
//! into place, so a failed save never truncates the original.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

/// Read a file into one byte-string per line, newline (and CR) stripped
pub fn load_rows(path: &Path) -> Result<Vec<Vec<u8>>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for line in reader.split(b'\n') {
        let mut line =
            line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        rows.push(line);
    }
    Ok(rows)
}

/// Write the document image to `path`, returning the byte count written
pub fn save(path: &Path, contents: &[u8]) -> Result<usize> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;

    temp.write_all(contents)
        .context("failed to write file contents")?;
    temp.as_file()
        .sync_data()
        .context("failed to sync file contents")?;

    // Keep the target's permissions across the rename.
    if let Ok(metadata) = fs::metadata(path) {
        let _ = fs::set_permissions(temp.path(), metadata.permissions());
    }

    temp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    debug!(path = %path.display(), bytes = contents.len(), "saved");
    Ok(contents.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_load_strips_newlines() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "a\nbb\r\nccc").unwrap();
        temp.flush().unwrap();

        let rows = load_rows(temp.path()).unwrap();
        assert_eq!(rows, vec![b"a".to_vec(), b"bb".to_vec(), b"ccc".to_vec()]);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        assert!(load_rows(Path::new("/no/such/file/here")).is_err());
    }

    #[test]
    fn test_save_writes_exact_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let written = save(&path, b"a\nbb\n").unwrap();
        assert_eq!(written, 5);
        assert_eq!(fs::read(&path).unwrap(), b"a\nbb\n");
    }

    #[test]
    fn test_save_truncates_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "a much longer original file body").unwrap();

        save(&path, b"short\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short\n");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        save(&path, b"one\ntwo\n").unwrap();
        let rows = load_rows(&path).unwrap();
        assert_eq!(rows, vec![b"one".to_vec(), b"two".to_vec()]);
    }
}
