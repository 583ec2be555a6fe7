//! Small filesystem helpers shared by config and journal persistence.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Write atomically: temp file in the target directory, then persist
/// over the destination.
pub fn atomic_write(path: &Path, data: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Create `path` with `data` unless it already exists. Returns
/// whether the file was written.
pub fn write_if_missing(path: &Path, data: &str) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// Append one line, creating the file on first use.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
