//! # malayalam-extract
//!
//! Extraction of Malayalam text from Common Crawl WARC archives.
//!
//! Archives are read from disk or over HTTP, their HTML responses are stripped of markup
//! and runs of Malayalam text are written to one text file per archive.
//!
//! ## Getting started
//!
//! ```sh
//! malayalam-extract 0.1.0
//! Malayalam text extraction from Common Crawl WARC archives.
//!
//! USAGE:
//!     malayalam-extract <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     extract    Extract the archives listed in a paths file
//!     help       Prints this message or the help of the given subcommand(s)
//!     strip      Print the segments of a single local archive
//! ```
//!
//! Logging is controlled by `RUST_LOG` (`RUST_LOG=info` is a good start).
use std::fs::File;
use std::io::Write;

use structopt::StructOpt;

use malayalam_extract::error::Error;
use malayalam_extract::pipelines::extraction::Extractor;
use malayalam_extract::pipelines::{MalayalamPipeline, Pipeline};
use malayalam_extract::shard::open_stream;
use malayalam_extract::sources::read_paths_file;

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::MalayalamExtract::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::MalayalamExtract::Extract(e) => {
            let config = e.extractor_config()?;
            let paths = read_paths_file(&e.paths_file)?;
            let source = e.byte_source()?;

            let p = MalayalamPipeline::new(paths, source, config);
            let reports = p.run()?;

            let failed = reports
                .iter()
                .filter(|r| r.outcome().is_failed())
                .count();
            if failed > 0 {
                warn!("{} archives failed, see the error log", failed);
            }
        }

        cli::MalayalamExtract::Strip(s) => {
            let extractor = Extractor::new(&s.extractor_config()?)?;
            let stream = open_stream(File::open(&s.file)?)?;
            let extraction = extractor.extract(stream);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for segment in &extraction.segments {
                writeln!(out, "{}", segment)?;
            }

            if let Some(e) = extraction.stopped {
                return Err(e);
            }
        }
    };
    Ok(())
}
