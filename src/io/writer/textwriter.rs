//! One text file per archive.
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;
use crate::filtering::Segment;

/// Base name of the output file for an archive identifier.
///
/// The last path component is kept and `.gz` then `.warc` are stripped:
/// `crawl-data/CC-MAIN-2021-04/segments/x/warc/CC-MAIN-x-00000.warc.gz` gives `CC-MAIN-x-00000`.
pub fn output_name(archive_id: &str) -> String {
    let last = archive_id
        .trim_end_matches(|c: char| c == '/' || c == '\\')
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let last = last.strip_suffix(".gz").unwrap_or(last);
    let last = last.strip_suffix(".warc").unwrap_or(last);

    if last.is_empty() {
        "archive".to_string()
    } else {
        last.to_string()
    }
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Writes archive segments into `dst`.
///
/// Segments are written one per line. Files are first written under a hidden temporary name
/// then renamed, so that an existing output is never replaced by a partial one.
#[derive(Debug, Clone)]
pub struct TextWriter {
    dst: PathBuf,
}

impl TextWriter {
    /// Create a new [TextWriter].
    /// Nothing is created until a write is performed.
    pub fn new(dst: &Path) -> Self {
        Self {
            dst: dst.to_path_buf(),
        }
    }

    pub fn dst(&self) -> &Path {
        &self.dst
    }

    /// Final path for the archive `archive_id`.
    pub fn path_for(&self, archive_id: &str) -> PathBuf {
        self.dst.join(format!("{}.txt", output_name(archive_id)))
    }

    fn tmp_path_for(&self, archive_id: &str) -> PathBuf {
        self.dst
            .join(format!(".{}.txt.part", output_name(archive_id)))
    }

    /// Remove the output of `archive_id` and any leftover temporary file.
    ///
    /// Missing files are not an error, other failures are logged.
    pub fn remove(&self, archive_id: &str) {
        for path in [self.path_for(archive_id), self.tmp_path_for(archive_id)] {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("removed {:?}", path),
                Err(e) if e.kind() == ErrorKind::NotFound => (),
                Err(e) => warn!("could not remove {:?}: {}", path, e),
            }
        }
    }

    /// Write `segments`, overwriting any previous output for this archive.
    ///
    /// Returns the output path and the number of bytes written.
    pub fn write(&self, archive_id: &str, segments: &[Segment]) -> Result<(PathBuf, u64), Error> {
        let path = self.path_for(archive_id);
        let tmp_path = self.tmp_path_for(archive_id);

        std::fs::create_dir_all(&self.dst).map_err(|source| Error::WriteError {
            path: self.dst.clone(),
            source,
        })?;

        let written = match Self::write_file(&tmp_path, segments) {
            Ok(w) => w,
            Err(source) => {
                if let Err(e) = std::fs::remove_file(&tmp_path) {
                    warn!("could not remove {:?}: {}", tmp_path, e);
                }
                return Err(Error::WriteError { path, source });
            }
        };

        std::fs::rename(&tmp_path, &path).map_err(|source| Error::WriteError {
            path: path.clone(),
            source,
        })?;

        debug!("wrote {} segments ({} bytes) to {:?}", segments.len(), written, path);
        Ok((path, written))
    }

    fn write_file(path: &Path, segments: &[Segment]) -> std::io::Result<u64> {
        let mut w = BufWriter::new(File::create(path)?);
        let mut written = 0;
        for segment in segments {
            // a line is a segment
            let line = if segment.as_str().contains(is_newline) {
                Cow::Owned(segment.as_str().replace(is_newline, " "))
            } else {
                Cow::Borrowed(segment.as_str())
            };
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            written += line.len() as u64 + 1;
        }
        w.flush()?;
        Ok(written)
    }
}
