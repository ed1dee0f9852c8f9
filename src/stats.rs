//! Summary counts for an edit script.

use crate::algo::{OpKind, Operation};

/// Statistics from a diff
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Number of `Equal` operations
    pub equal_ops: usize,
    /// Number of `Delete` operations
    pub delete_ops: usize,
    /// Number of `Create` operations
    pub create_ops: usize,
    /// Number of `Replace` operations
    pub replace_ops: usize,
    /// Tokens shared by both documents
    pub equal_tokens: usize,
    /// Old tokens removed, including the old side of replacements
    pub deleted_tokens: usize,
    /// New tokens added, including the new side of replacements
    pub created_tokens: usize,
}

impl DiffStats {
    /// Tally an edit script.
    pub fn from_operations(ops: &[Operation]) -> Self {
        let mut stats = Self::default();
        for op in ops {
            let old_size = op.old_end - op.old_start;
            let new_size = op.new_end - op.new_start;
            match op.kind {
                OpKind::Equal => {
                    stats.equal_ops += 1;
                    stats.equal_tokens += new_size;
                }
                OpKind::Delete => stats.delete_ops += 1,
                OpKind::Create => stats.create_ops += 1,
                OpKind::Replace => stats.replace_ops += 1,
            }
            if op.kind != OpKind::Equal {
                stats.deleted_tokens += old_size;
                stats.created_tokens += new_size;
            }
        }
        stats
    }

    /// Number of change operations (not counting equal runs)
    pub fn change_count(&self) -> usize {
        self.delete_ops + self.create_ops + self.replace_ops
    }

    /// Check if the documents differ at all
    pub fn has_changes(&self) -> bool {
        self.change_count() > 0
    }
}
