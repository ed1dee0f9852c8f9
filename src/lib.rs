//! html-token-diff - Token-level HTML diff with unified and side-by-side views
//!
//! ## Pipeline
//!
//! ```text
//! tokenize(old), tokenize(new)      flat token streams, lossless
//!       |
//!       v
//! align(old, new) -> MatchedBlock*  ordered runs of equal tokens
//!       |
//!       v
//! build_operations -> Operation*    gapless equal/delete/create/replace script
//!       |
//!       v
//! render_unified / render_side_by_side
//! ```
//!
//! Tokenizing, matching and building the edit script happen eagerly when an
//! [`HtmlDiff`] is constructed. Rendering happens on first access and is
//! memoized.
//!
//! ## Modules
//! - `token`: Tokenizer and tag inspection
//! - `algo`: Block matcher and operation builder
//! - `render`: Decoration policy and the two views
//! - `options`: Construction options
//! - `stats`: Edit script summary
//! - `batch`: Diffing many document pairs
//!
//! ## Usage
//!
//! ```
//! use html_token_diff::HtmlDiff;
//!
//! let diff = HtmlDiff::new("<div>hello</div>", "<div>hello world</div>");
//! assert_eq!(
//!     diff.unified_content(),
//!     "<div>hello<span class=\"html-diff-create-text-wrapper\"> world</span></div>",
//! );
//!
//! let (old, new) = diff.side_by_side_contents();
//! assert_eq!(old, "<div data-seq=\"1\">hello</div>");
//! assert!(new.starts_with("<div data-seq=\"1\">hello<span"));
//! ```

use std::sync::OnceLock;

use tracing::{debug, trace};

/// Algorithms: block matching and operation building
pub mod algo;

/// Batch diffing
pub mod batch;

/// Error types
pub mod error;

/// Construction options
pub mod options;

/// Prelude for common imports
pub mod prelude;

/// HTML rendering
pub mod render;

/// Edit script statistics
pub mod stats;

/// Tokenizer
pub mod token;

// =============================================================================
// Re-exports
// =============================================================================

// Algorithms
pub use algo::{align, build_operations, MatchConfig, MatchedBlock, OpKind, Operation};

// Batch
pub use batch::diff_batch;

// Error types
pub use error::{DiffError, DiffResult};

// Options
pub use options::HtmlDiffOptions;

// Render
pub use render::{render_side_by_side, render_unified, ClassNames, RenderConfig};

// Stats
pub use stats::DiffStats;

// Tokens
pub use token::{tokenize, TokenKind};

use token::{Interner, TokenStream};

// =============================================================================
// HtmlDiff
// =============================================================================

/// A computed diff between two HTML documents.
///
/// Borrows both inputs; tokens are slices of them.
#[derive(Debug)]
pub struct HtmlDiff<'a> {
    old_html: &'a str,
    new_html: &'a str,
    options: HtmlDiffOptions,
    old: TokenStream<'a>,
    new: TokenStream<'a>,
    matched_blocks: Vec<MatchedBlock>,
    operations: Vec<Operation>,
    identical: bool,
    unified: OnceLock<String>,
    side_by_side: OnceLock<(String, String)>,
}

impl<'a> HtmlDiff<'a> {
    /// Diff two documents with default options.
    pub fn new(old_html: &'a str, new_html: &'a str) -> Self {
        Self::build(old_html, new_html, HtmlDiffOptions::default())
    }

    /// Diff two documents with caller options.
    ///
    /// Fails only if the options are invalid; see [`HtmlDiffOptions::validate`].
    pub fn with_options(
        old_html: &'a str,
        new_html: &'a str,
        options: HtmlDiffOptions,
    ) -> DiffResult<Self> {
        options.validate()?;
        Ok(Self::build(old_html, new_html, options))
    }

    /// Construct from already validated options.
    pub(crate) fn build(old_html: &'a str, new_html: &'a str, options: HtmlDiffOptions) -> Self {
        if old_html == new_html {
            trace!(len = old_html.len(), "identical inputs, skipping diff");
            return Self {
                old_html,
                new_html,
                options,
                old: TokenStream::default(),
                new: TokenStream::default(),
                matched_blocks: Vec::new(),
                operations: Vec::new(),
                identical: true,
                unified: OnceLock::from(old_html.to_owned()),
                side_by_side: OnceLock::from((old_html.to_owned(), new_html.to_owned())),
            };
        }

        let mut interner = Interner::new();
        let old = TokenStream::new(old_html, &mut interner);
        let new = TokenStream::new(new_html, &mut interner);
        debug!(
            old_tokens = old.len(),
            new_tokens = new.len(),
            distinct = interner.len(),
            "tokenized"
        );

        let matched_blocks = algo::align(old.ids(), new.ids(), &options.matching);
        debug!(blocks = matched_blocks.len(), "matched blocks");

        let operations = algo::build_operations(&matched_blocks, old.len(), new.len());
        debug!(operations = operations.len(), "built operations");
        debug_assert!(algo::check_coverage(&operations, old.len(), new.len()));

        Self {
            old_html,
            new_html,
            options,
            old,
            new,
            matched_blocks,
            operations,
            identical: false,
            unified: OnceLock::new(),
            side_by_side: OnceLock::new(),
        }
    }

    /// The diff as one annotated document.
    pub fn unified_content(&self) -> &str {
        self.unified.get_or_init(|| {
            render::render_unified(
                self.old.tokens(),
                self.new.tokens(),
                &self.operations,
                &self.options.render,
            )
        })
    }

    /// The diff as an `(old, new)` pair of annotated documents.
    pub fn side_by_side_contents(&self) -> (&str, &str) {
        let (old, new) = self.side_by_side.get_or_init(|| {
            render::render_side_by_side(
                self.old.tokens(),
                self.new.tokens(),
                &self.operations,
                &self.options.render,
            )
        });
        (old.as_str(), new.as_str())
    }

    /// Whether the inputs were byte-identical (nothing was diffed).
    #[inline]
    pub fn is_identical(&self) -> bool {
        self.identical
    }

    /// Old document as given
    #[inline]
    pub fn old_html(&self) -> &'a str {
        self.old_html
    }

    /// New document as given
    #[inline]
    pub fn new_html(&self) -> &'a str {
        self.new_html
    }

    /// Old document tokens (empty for identical inputs)
    #[inline]
    pub fn old_tokens(&self) -> &[&'a str] {
        self.old.tokens()
    }

    /// New document tokens (empty for identical inputs)
    #[inline]
    pub fn new_tokens(&self) -> &[&'a str] {
        self.new.tokens()
    }

    /// Matched blocks in document order
    #[inline]
    pub fn matched_blocks(&self) -> &[MatchedBlock] {
        &self.matched_blocks
    }

    /// The edit script
    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Options this diff was built with
    #[inline]
    pub fn options(&self) -> &HtmlDiffOptions {
        &self.options
    }

    /// Summary of the edit script
    pub fn stats(&self) -> DiffStats {
        DiffStats::from_operations(&self.operations)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_shortcut() {
        let html = "<p>same</p>";
        let diff = HtmlDiff::new(html, html);
        assert!(diff.is_identical());
        assert!(diff.old_tokens().is_empty());
        assert!(diff.operations().is_empty());
        assert_eq!(diff.unified_content(), html);
        assert_eq!(diff.side_by_side_contents(), (html, html));
        assert!(!diff.stats().has_changes());
    }

    #[test]
    fn test_render_is_memoized() {
        let diff = HtmlDiff::new("<p>a b</p>", "<p>a c</p>");
        let first = diff.unified_content();
        let second = diff.unified_content();
        assert_eq!(first, second);
        assert!(std::ptr::eq(first, second));

        let (old1, _) = diff.side_by_side_contents();
        let (old2, _) = diff.side_by_side_contents();
        assert!(std::ptr::eq(old1, old2));
    }

    #[test]
    fn test_eager_pipeline() {
        let diff = HtmlDiff::new("<p>a b</p>", "<p>a c</p>");
        assert_eq!(diff.old_tokens(), ["<p>", "a", " ", "b", "</p>"]);
        assert_eq!(diff.matched_blocks(), [MatchedBlock::new(0, 0, 3)]);
        let kinds: Vec<_> = diff.operations().iter().map(|op| op.kind).collect();
        assert_eq!(kinds, [OpKind::Equal, OpKind::Replace]);
    }

    #[test]
    fn test_empty_old() {
        let diff = HtmlDiff::new("", "<p>x</p>");
        assert_eq!(diff.operations().len(), 1);
        assert_eq!(diff.operations()[0].kind, OpKind::Create);
        assert_eq!(
            diff.unified_content(),
            "<p><span class=\"html-diff-create-text-wrapper\">x</span></p>"
        );
    }

    #[test]
    fn test_empty_new() {
        let diff = HtmlDiff::new("x", "");
        assert_eq!(diff.operations()[0].kind, OpKind::Delete);
        assert_eq!(
            diff.side_by_side_contents(),
            ("<span class=\"html-diff-delete-text-wrapper\">x</span>", "")
        );
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = HtmlDiffOptions::new().min_matched_size(0);
        let err = HtmlDiff::with_options("a", "b", options).unwrap_err();
        assert_eq!(err, DiffError::InvalidMinMatchedSize { value: 0 });
    }

    #[test]
    fn test_html_diff_is_send_sync() {
        static_assertions::assert_impl_all!(HtmlDiff<'static>: Send, Sync);
    }
}
