//! Options accepted when constructing a diff.

use compact_str::CompactString;

use crate::algo::MatchConfig;
use crate::error::{DiffError, DiffResult};
use crate::render::{ClassNames, RenderConfig};

/// Matching and rendering options for [`HtmlDiff`](crate::HtmlDiff).
///
/// # Example
///
/// ```
/// use html_token_diff::{ClassNames, HtmlDiff, HtmlDiffOptions};
///
/// let options = HtmlDiffOptions::new()
///     .min_matched_size(3)
///     .class_names(ClassNames::default().with_create_text("ins"));
/// let diff = HtmlDiff::with_options("<p>a</p>", "<p>b</p>", options).unwrap();
/// assert!(diff.unified_content().contains("class=\"ins\""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDiffOptions {
    pub matching: MatchConfig,
    pub render: RenderConfig,
}

impl HtmlDiffOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum run length counted as a match (at least 1).
    pub fn min_matched_size(mut self, size: usize) -> Self {
        self.matching.min_matched_size = size;
        self
    }

    /// Enable or disable greedy acceptance on large ranges.
    pub fn greedy_match(mut self, enabled: bool) -> Self {
        self.matching.greedy_match = enabled;
        self
    }

    /// Range size above which greedy acceptance applies.
    pub fn greedy_boundary(mut self, boundary: usize) -> Self {
        self.matching.greedy_boundary = boundary;
        self
    }

    /// Decoration class names.
    pub fn class_names(mut self, class_names: ClassNames) -> Self {
        self.render.class_names = class_names;
        self
    }

    /// Attribute name for side-by-side sequence numbers.
    pub fn seq_attr(mut self, attr_name: impl Into<CompactString>) -> Self {
        self.render.seq_attr = attr_name.into();
        self
    }

    /// Check that the options can produce a meaningful diff.
    pub fn validate(&self) -> DiffResult<()> {
        if self.matching.min_matched_size == 0 {
            return Err(DiffError::InvalidMinMatchedSize { value: 0 });
        }
        self.render.validate()
    }
}

impl From<MatchConfig> for HtmlDiffOptions {
    fn from(matching: MatchConfig) -> Self {
        Self {
            matching,
            ..Self::default()
        }
    }
}
