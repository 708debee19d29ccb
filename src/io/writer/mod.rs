/*! Output writing utilities

[TextWriter] writes one file per archive. Writes are atomic: the file is written under
a temporary name and renamed on success.
!*/
mod textwriter;

pub use textwriter::{output_name, TextWriter};
