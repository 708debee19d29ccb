//! Segment-level filtering.
use super::script::Segment;
use super::Filter;

/// Simple length filter.
/// Returns `false` if provided segment has less than [Length::min_size] Malayalam codepoints.
///
/// [Length::min_size] is 3 by default.
#[derive(Debug, Clone)]
pub struct Length {
    min_size: usize,
}

impl Length {
    /// specify a minimum length
    pub fn with_min_size(min_size: usize) -> Self {
        Self { min_size }
    }

    /// Get a reference to the length's min size.
    pub fn min_size(&self) -> &usize {
        &self.min_size
    }
}

impl Filter<&Segment> for Length {
    fn detect(&self, segment: &Segment) -> bool {
        segment.script_chars() >= self.min_size
    }
}

impl Default for Length {
    fn default() -> Self {
        Length { min_size: 3 }
    }
}
