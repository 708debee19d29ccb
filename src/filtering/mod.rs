/*! Filtering utilities

Filters operate on segment or document level, and implement [filter::Filter].

- [ScriptFilter] extracts Malayalam [Segment]s from plain text, discarding short ones (see [length::Length]),
- [document::MinContent] discards documents that have too little Malayalam content.
!*/
mod document;
mod filter;
mod length;
mod script;

pub use document::MinContent;
pub use filter::Filter;
pub use length::Length;
pub use script::{is_malayalam, is_separator, ScriptFilter, Segment, MALAYALAM};
