//! `.paths` files: one archive identifier per line.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, log_enabled, Level};

use crate::error::Error;

/// Read archive identifiers from a `.paths` file.
pub fn read_paths_file(path: &Path) -> Result<Vec<String>, Error> {
    debug!("reading paths from {:?}", path);
    let f = File::open(path)?;
    read_paths(BufReader::new(f))
}

/// Read archive identifiers, one per line.
///
/// Lines are trimmed, blank lines and lines starting with `#` are ignored.
pub fn read_paths<R: BufRead>(reader: R) -> Result<Vec<String>, Error> {
    let mut total = 0;
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        total += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        ids.push(line.to_string());
    }

    if log_enabled!(Level::Debug) {
        debug!(
            "Got {valid}/{total} archive paths",
            valid = ids.len(),
            total = total
        )
    }

    Ok(ids)
}
