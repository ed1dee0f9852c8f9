//! Error types for html-token-diff.
//!
//! Diffing itself never fails: every input tokenizes. The only errors come
//! from caller-supplied options that would produce a meaningless match or
//! broken markup.

use thiserror::Error;

/// Errors that can occur while configuring a diff.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// `min_matched_size` must be at least 1
    #[error("invalid min_matched_size: expected at least 1, found {value}")]
    InvalidMinMatchedSize {
        /// The rejected value
        value: usize,
    },

    /// A class name or attribute name would break the generated markup
    #[error("invalid {slot} name {value:?}: must be non-empty and contain no '\"', '<' or '>'")]
    InvalidClassName {
        /// Which configuration slot was rejected (e.g. `createText`)
        slot: &'static str,
        /// The rejected value
        value: String,
    },
}

/// Result type alias for diff configuration.
pub type DiffResult<T> = Result<T, DiffError>;

impl DiffError {
    /// Create an invalid-name error for a configuration slot.
    pub fn invalid_name(slot: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidClassName {
            slot,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiffError::InvalidMinMatchedSize { value: 0 };
        assert_eq!(
            err.to_string(),
            "invalid min_matched_size: expected at least 1, found 0"
        );

        let err = DiffError::invalid_name("createText", "a\"b");
        assert_eq!(
            err.to_string(),
            "invalid createText name \"a\\\"b\": must be non-empty and contain no '\"', '<' or '>'"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        static_assertions::assert_impl_all!(DiffError: Send, Sync);
    }
}
