//! Filesystem utilities

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{error, info};

/// Create every missing parent directory of `path`
///
/// Paths without a parent component (bare file names) are left alone.
pub fn create_parent_dirs(path: &Path) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if !parent.exists() {
        if let Err(e) = fs::create_dir_all(parent) {
            error!("Failed to create directory {}: {}", parent.display(), e);
            return Err(e);
        }
        info!("Created directory: {}", parent.display());
    }
    Ok(())
}

/// Write a snapshot file, creating parent directories as needed
pub fn write_snapshot(path: &Path, contents: &[u8]) -> io::Result<()> {
    create_parent_dirs(path)?;
    fs::write(path, contents)?;
    info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Read the first line of a text file, without the trailing newline
///
/// An empty file yields an empty string.
pub fn read_first_line(path: &Path) -> io::Result<String> {
    let file = fs::File::open(path)?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
