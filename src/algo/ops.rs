//! Operation builder: matched blocks to a gapless edit script
//!
//! Walks the matched blocks in order and fills every gap between them with a
//! change operation, so that the resulting operations partition both token
//! index spaces completely.

use std::ops::Range;

use super::matcher::MatchedBlock;

// =============================================================================
// Public Types
// =============================================================================

/// Kind of an edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Same tokens on both sides
    Equal,
    /// Tokens only in the old document
    Delete,
    /// Tokens only in the new document
    Create,
    /// Old tokens replaced by new tokens
    Replace,
}

impl OpKind {
    /// Lowercase name, as used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Delete => "delete",
            Self::Create => "create",
            Self::Replace => "replace",
        }
    }

    /// Kind of the change filling a gap, or `None` when both sides are empty.
    fn for_gap(old_lags: bool, new_lags: bool) -> Option<Self> {
        match (old_lags, new_lags) {
            (true, true) => Some(Self::Replace),
            (false, true) => Some(Self::Create),
            (true, false) => Some(Self::Delete),
            (false, false) => None,
        }
    }
}

/// One segment of the edit script.
///
/// Ranges are half-open indices into the old and new token sequences. A
/// `Create` has an empty old range and a `Delete` an empty new range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub old_start: usize,
    pub old_end: usize,
    pub new_start: usize,
    pub new_end: usize,
    pub kind: OpKind,
}

impl Operation {
    /// Old token index range
    #[inline]
    pub fn old_range(&self) -> Range<usize> {
        self.old_start..self.old_end
    }

    /// New token index range
    #[inline]
    pub fn new_range(&self) -> Range<usize> {
        self.new_start..self.new_end
    }

    /// Whether the ranges fit the kind and the given sequence lengths.
    pub fn is_consistent(&self, old_len: usize, new_len: usize) -> bool {
        let old_size = self.old_end.wrapping_sub(self.old_start);
        let new_size = self.new_end.wrapping_sub(self.new_start);
        let in_bounds = self.old_start <= self.old_end
            && self.new_start <= self.new_end
            && self.old_end <= old_len
            && self.new_end <= new_len;
        in_bounds
            && match self.kind {
                OpKind::Equal => old_size == new_size && old_size > 0,
                OpKind::Delete => old_size > 0 && new_size == 0,
                OpKind::Create => old_size == 0 && new_size > 0,
                OpKind::Replace => old_size > 0 && new_size > 0,
            }
    }
}

impl From<&MatchedBlock> for Operation {
    fn from(block: &MatchedBlock) -> Self {
        Self {
            old_start: block.old_start,
            old_end: block.old_end,
            new_start: block.new_start,
            new_end: block.new_end,
            kind: OpKind::Equal,
        }
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Convert ordered matched blocks into an edit script covering
/// `0..old_len` and `0..new_len` with no gaps and no overlaps.
pub fn build_operations(blocks: &[MatchedBlock], old_len: usize, new_len: usize) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(blocks.len() * 2 + 1);
    let mut walk_old = 0;
    let mut walk_new = 0;

    for block in blocks {
        push_gap(&mut ops, walk_old..block.old_start, walk_new..block.new_start);
        ops.push(Operation::from(block));
        walk_old = block.old_end;
        walk_new = block.new_end;
    }

    // Tail content
    push_gap(&mut ops, walk_old..old_len, walk_new..new_len);
    ops
}

fn push_gap(ops: &mut Vec<Operation>, old: Range<usize>, new: Range<usize>) {
    if let Some(kind) = OpKind::for_gap(!old.is_empty(), !new.is_empty()) {
        ops.push(Operation {
            old_start: old.start,
            old_end: old.end,
            new_start: new.start,
            new_end: new.end,
            kind,
        });
    }
}

/// Check that `ops` partition `0..old_len` and `0..new_len` in order.
pub fn check_coverage(ops: &[Operation], old_len: usize, new_len: usize) -> bool {
    let mut old_cursor = 0;
    let mut new_cursor = 0;
    for op in ops {
        if op.old_start != old_cursor || op.new_start != new_cursor {
            return false;
        }
        if !op.is_consistent(old_len, new_len) {
            return false;
        }
        old_cursor = op.old_end;
        new_cursor = op.new_end;
    }
    old_cursor == old_len && new_cursor == new_len
}

// =============================================================================
// Tests
// =============================================================================
