//! Reading back extracted text files.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Error;
use crate::filtering::Segment;

/// Read the segments of an output file, in order.
///
/// Empty lines are skipped.
pub fn read_segments(path: &Path) -> Result<Vec<Segment>, Error> {
    let f = BufReader::new(File::open(path)?);
    f.lines()
        .filter(|line| !matches!(line, Ok(l) if l.is_empty()))
        .map(|line| line.map(Segment::new).map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::writer::TextWriter;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let segments = vec![
            Segment::new("ഇത് ഒരു വാക്യം ആണ്".to_string()),
            Segment::new("മലയാളം".to_string()),
        ];
        let (path, _) = TextWriter::new(dir.path())
            .write("a.warc", &segments)
            .unwrap();

        let read = read_segments(&path).unwrap();
        assert_eq!(read, segments);
        assert_eq!(read[1].script_chars(), 6);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_segments(Path::new("does/not/exist.txt")),
            Err(Error::Io(_))
        ));
    }
}
