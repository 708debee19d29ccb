/*! Output reading utilities

Mirrors [crate::io::writer].
!*/
mod textreader;

pub use textreader::read_segments;
