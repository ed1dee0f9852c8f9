//! Prelude module for common imports.
//!
//! ```
//! use html_token_diff::prelude::*;
//!
//! let diff = HtmlDiff::new("<p>a</p>", "<p>b</p>");
//! assert!(diff.stats().has_changes());
//! ```

// Entry point
pub use crate::HtmlDiff;

// Options
pub use crate::options::HtmlDiffOptions;

// Algorithms
pub use crate::algo::{align, build_operations, MatchConfig, MatchedBlock, OpKind, Operation};

// Batch
pub use crate::batch::diff_batch;

// Error
pub use crate::error::{DiffError, DiffResult};

// Render
pub use crate::render::{
    render_side_by_side, render_unified, ClassNames, RenderConfig, DEFAULT_SEQ_ATTR,
};

// Stats
pub use crate::stats::DiffStats;

// Tokens
pub use crate::token::{tokenize, TokenKind};
