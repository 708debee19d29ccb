use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use malayalam_extract::config::{ExtractorConfig, MalformedPolicy};
use malayalam_extract::io::{read_segments, ERROR_LOG_FILE, REPORT_FILE};
use malayalam_extract::pipelines::extraction::ArchiveOutcome;
use malayalam_extract::pipelines::{MalayalamPipeline, Pipeline};
use malayalam_extract::shard::{Record, RecordType};
use malayalam_extract::sources::{read_paths_file, LocalSource};
use warc::WarcHeader;

const SENTENCE: &str = "ഇത് ഒരു വാക്യം ആണ്";

fn response(id: usize, html: &str) -> Record {
    let mut headers = HashMap::new();
    headers.insert(WarcHeader::RecordID, format!("<urn:uuid:{:08}>", id));
    headers.insert(WarcHeader::TargetURI, format!("https://ml.example/{}", id));
    let payload = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n{}",
        html
    );
    Record::new(RecordType::Response, headers, payload.into_bytes())
}

fn records() -> Vec<Record> {
    let mut warcinfo = HashMap::new();
    warcinfo.insert(WarcHeader::RecordID, "<urn:uuid:info>".to_string());
    vec![
        Record::new(RecordType::WarcInfo, warcinfo, b"software: test\r\n".to_vec()),
        response(
            1,
            "<html><body><script>var x=1;</script><p>മലയാളം text ABC</p></body></html>",
        ),
        response(2, "<p>english only</p>"),
        response(3, &format!("<div>{}</div><div>second: കേരളം</div>", SENTENCE)),
    ]
}

fn plain(records: &[Record]) -> Vec<u8> {
    let mut buf = Vec::new();
    for r in records {
        r.write_to(&mut buf).unwrap();
    }
    buf
}

/// one gzip member per record, as Common Crawl does
fn gzipped(records: &[Record]) -> Vec<u8> {
    let mut buf = Vec::new();
    for r in records {
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        r.write_to(&mut gz).unwrap();
        buf.extend(gz.finish().unwrap());
    }
    buf
}

fn setup(src: &Path, archives: &[(&str, Vec<u8>)]) -> PathBuf {
    let paths_file = src.join("warc.paths");
    let mut paths = std::fs::File::create(&paths_file).unwrap();
    writeln!(paths, "# test archives").unwrap();
    for (name, bytes) in archives {
        std::fs::write(src.join(name), bytes).unwrap();
        writeln!(paths, "{}", name).unwrap();
    }
    paths_file
}

fn run(src: &Path, dst: &Path, paths_file: &Path, config: ExtractorConfig) -> MalayalamPipeline {
    let paths = read_paths_file(paths_file).unwrap();
    MalayalamPipeline::new(
        paths,
        Box::new(LocalSource::with_base(src)),
        ExtractorConfig {
            output_dir: dst.to_path_buf(),
            ..config
        },
    )
}

fn small_pages() -> ExtractorConfig {
    ExtractorConfig {
        min_document_chars: 0,
        ..Default::default()
    }
}

#[test_log::test]
fn extract_local_archive() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let paths_file = setup(src.path(), &[("CC-MAIN-0-00000.warc", plain(&records()))]);

    let reports = run(src.path(), dst.path(), &paths_file, small_pages())
        .run()
        .unwrap();
    assert_eq!(reports.len(), 1);
    assert!(matches!(reports[0].outcome(), ArchiveOutcome::Complete));
    assert_eq!(reports[0].stats().records, 4);
    assert_eq!(reports[0].stats().responses, 3);

    let output = dst.path().join("CC-MAIN-0-00000.txt");
    assert_eq!(reports[0].output(), Some(output.as_path()));
    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content, format!("മലയാളം\n{}\nകേരളം\n", SENTENCE));
    assert!(!content.contains("var"));
    assert!(!content.contains("ABC"));

    let report = std::fs::read_to_string(dst.path().join(REPORT_FILE)).unwrap();
    assert!(report.starts_with("archive,status,output,segments"));
    assert!(report.contains("CC-MAIN-0-00000.warc,complete"));
}

#[test]
fn gzip_and_plain_give_the_same_output() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let paths_file = setup(
        src.path(),
        &[
            ("plain.warc", plain(&records())),
            ("compressed.warc.gz", gzipped(&records())),
        ],
    );

    let reports = run(src.path(), dst.path(), &paths_file, small_pages())
        .run()
        .unwrap();
    assert!(reports
        .iter()
        .all(|r| matches!(r.outcome(), ArchiveOutcome::Complete)));

    let plain_segments = read_segments(&dst.path().join("plain.txt")).unwrap();
    let gz_segments = read_segments(&dst.path().join("compressed.txt")).unwrap();
    assert_eq!(plain_segments.len(), 3);
    assert_eq!(plain_segments, gz_segments);
    // compressed size is what was read from disk
    assert!(reports[1].input_bytes() < reports[0].input_bytes());
}

#[test]
fn running_twice_is_idempotent() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let paths_file = setup(src.path(), &[("a.warc", plain(&records()))]);

    run(src.path(), dst.path(), &paths_file, small_pages())
        .run()
        .unwrap();
    let first = std::fs::read(dst.path().join("a.txt")).unwrap();
    run(src.path(), dst.path(), &paths_file, small_pages())
        .run()
        .unwrap();
    let second = std::fs::read(dst.path().join("a.txt")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn truncated_archive() {
    let src = tempfile::tempdir().unwrap();
    let mut bytes = plain(&records());
    // cut inside the last record's payload
    bytes.truncate(bytes.len() - 20);
    let paths_file = setup(src.path(), &[("t.warc", bytes)]);

    // keep what was read before the bad record
    let dst = tempfile::tempdir().unwrap();
    let reports = run(src.path(), dst.path(), &paths_file, small_pages())
        .run()
        .unwrap();
    assert!(matches!(reports[0].outcome(), ArchiveOutcome::Partial(_)));
    assert_eq!(reports[0].stats().records, 3);
    let segments = read_segments(&dst.path().join("t.txt")).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].as_str(), "മലയാളം");

    // or give up on the archive, dropping the earlier partial output
    let config = ExtractorConfig {
        on_malformed: MalformedPolicy::FailArchive,
        ..small_pages()
    };
    let reports = run(src.path(), dst.path(), &paths_file, config)
        .run()
        .unwrap();
    assert!(reports[0].outcome().is_failed());
    assert!(!dst.path().join("t.txt").exists());

    let errors = std::fs::read_to_string(dst.path().join(ERROR_LOG_FILE)).unwrap();
    assert!(errors.contains("t.warc,MalformedRecord"));
}

#[test]
fn missing_archive_does_not_stop_the_run() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let paths_file = setup(src.path(), &[("a.warc", plain(&records()))]);
    {
        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .open(&paths_file)
            .unwrap();
        writeln!(f, "missing.warc.gz").unwrap();
    }
    let config = ExtractorConfig {
        workers: 2,
        ..small_pages()
    };

    let reports = run(src.path(), dst.path(), &paths_file, config)
        .run()
        .unwrap();
    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0].outcome(), ArchiveOutcome::Complete));
    assert!(reports[1].outcome().is_failed());
    assert_eq!(reports[1].outcome().error().unwrap().kind(), "Io");
    assert!(!dst.path().join("missing.txt").exists());
}

#[test]
fn document_threshold() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let paths_file = setup(src.path(), &[("a.warc", plain(&records()))]);

    // no page has 40 malayalam chars
    let reports = run(src.path(), dst.path(), &paths_file, ExtractorConfig::default())
        .run()
        .unwrap();
    assert_eq!(reports[0].stats().documents, 0);
    assert_eq!(std::fs::read_to_string(dst.path().join("a.txt")).unwrap(), "");
}
