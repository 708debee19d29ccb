/*!
# IO utilities

Extracted text saving and loading, and extraction reports.
!*/
pub mod reader;
mod report;
pub mod writer;

pub use reader::read_segments;
pub use report::{ReportWriter, ERROR_LOG_FILE, REPORT_FILE};
pub use writer::TextWriter;
