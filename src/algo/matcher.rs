//! Block matcher: aligns two token sequences
//!
//! Finds an ordered list of non-overlapping runs of equal tokens shared by
//! the old and new sequences.
//!
//! # Algorithm
//!
//! 1. **Prefix sync**: the common leading run becomes a forced first block.
//! 2. **Suffix sync**: the common trailing run (never crossing the prefix)
//!    becomes a forced last block.
//! 3. **Interior**: the longest run in the remaining ranges is taken, then the
//!    ranges before and after it are searched the same way. An explicit
//!    worklist replaces recursion so adversarial inputs cannot exhaust the
//!    stack; results still come out in left, block, right order.
//!
//! The longest run in a range is found by sliding one sequence along the
//! other: every diagonal that starts on the first row or first column of the
//! range is scanned once.
//!
//! # Greedy acceptance
//!
//! With `greedy_match` enabled and a range whose shorter side exceeds
//! `greedy_boundary`, the search stops at the first run longer than a third
//! of that side. A longer run elsewhere in the range may then be missed.
//!
//! # Complexity
//!
//! - Exhaustive search: O((n + m) * min(n, m)) per range
//! - The number of ranges searched is bounded by the number of blocks found,
//!   so pathological inputs remain superlinear

use tracing::trace;

/// Default minimum run length counted as a match.
const DEFAULT_MIN_MATCHED_SIZE: usize = 2;

/// Default range size above which greedy acceptance kicks in.
const DEFAULT_GREEDY_BOUNDARY: usize = 1000;

// =============================================================================
// Public Types
// =============================================================================

/// A run of equal tokens shared by both sequences.
///
/// Ranges are half-open: `old[old_start..old_end] == new[new_start..new_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedBlock {
    pub old_start: usize,
    pub old_end: usize,
    pub new_start: usize,
    pub new_end: usize,
    /// `old_end - old_start`, equal to `new_end - new_start`
    pub size: usize,
}

impl MatchedBlock {
    /// Block of `size` tokens starting at `old_start` / `new_start`.
    #[inline]
    pub const fn new(old_start: usize, new_start: usize, size: usize) -> Self {
        Self {
            old_start,
            old_end: old_start + size,
            new_start,
            new_end: new_start + size,
            size,
        }
    }
}

/// Configuration for the block matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Minimum run length counted as a match.
    /// Default: 2 (a lone matching tag says little)
    pub min_matched_size: usize,
    /// Accept a good-enough run on large ranges instead of the longest.
    /// Default: true
    pub greedy_match: bool,
    /// Shorter-side token count above which greedy acceptance applies.
    /// Default: 1000
    pub greedy_boundary: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_matched_size: DEFAULT_MIN_MATCHED_SIZE,
            greedy_match: true,
            greedy_boundary: DEFAULT_GREEDY_BOUNDARY,
        }
    }
}

impl MatchConfig {
    /// Create config with custom settings.
    pub fn new(min_matched_size: usize, greedy_match: bool, greedy_boundary: usize) -> Self {
        Self {
            min_matched_size,
            greedy_match,
            greedy_boundary,
        }
    }

    /// Always search for the longest run, whatever the input size.
    pub fn exhaustive() -> Self {
        Self {
            greedy_match: false,
            ..Self::default()
        }
    }

    /// Acceptance threshold for a range with the given shorter side.
    fn greedy_threshold(&self, common_len: usize) -> Option<usize> {
        (self.greedy_match && common_len > self.greedy_boundary).then_some(common_len / 3)
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Align two sequences into ordered, non-overlapping matched blocks.
///
/// Every returned block has `size >= config.min_matched_size`, and blocks
/// strictly increase in both index spaces.
pub fn align<T: PartialEq>(old: &[T], new: &[T], config: &MatchConfig) -> Vec<MatchedBlock> {
    let min = config.min_matched_size.max(1);
    let (n1, n2) = (old.len(), new.len());

    // Prefix sync
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let head = (prefix >= min).then(|| MatchedBlock::new(0, 0, prefix));

    // Suffix sync, never crossing the prefix
    let mut suffix = 0;
    while suffix < n1 - prefix && suffix < n2 - prefix && old[n1 - 1 - suffix] == new[n2 - 1 - suffix]
    {
        suffix += 1;
    }
    let tail = (suffix >= min).then(|| MatchedBlock::new(n1 - suffix, n2 - suffix, suffix));

    let start = if head.is_some() { prefix } else { 0 };
    let interior = Range {
        old_start: start,
        old_end: if tail.is_some() { n1 - suffix } else { n1 },
        new_start: start,
        new_end: if tail.is_some() { n2 - suffix } else { n2 },
    };

    let mut blocks = Vec::new();
    blocks.extend(head);
    align_interior(old, new, interior, config, &mut blocks);
    blocks.extend(tail);
    blocks
}

/// Old × new index window searched for a best run.
#[derive(Debug, Clone, Copy)]
struct Range {
    old_start: usize,
    old_end: usize,
    new_start: usize,
    new_end: usize,
}

impl Range {
    #[inline]
    fn is_searchable(&self) -> bool {
        self.old_start < self.old_end && self.new_start < self.new_end
    }
}

enum Task {
    Search(Range),
    Emit(MatchedBlock),
}

/// Divide-and-conquer over the interior, in document order.
fn align_interior<T: PartialEq>(
    old: &[T],
    new: &[T],
    range: Range,
    config: &MatchConfig,
    blocks: &mut Vec<MatchedBlock>,
) {
    let mut stack = vec![Task::Search(range)];
    while let Some(task) = stack.pop() {
        let range = match task {
            Task::Emit(block) => {
                blocks.push(block);
                continue;
            }
            Task::Search(range) => range,
        };
        if !range.is_searchable() {
            continue;
        }
        let Some(block) = best_matched_block(old, new, range, config) else {
            continue;
        };

        // Pushed in reverse: left range runs first, then the block, then right.
        stack.push(Task::Search(Range {
            old_start: block.old_end,
            old_end: range.old_end,
            new_start: block.new_end,
            new_end: range.new_end,
        }));
        stack.push(Task::Emit(block));
        stack.push(Task::Search(Range {
            old_start: range.old_start,
            old_end: block.old_start,
            new_start: range.new_start,
            new_end: block.new_start,
        }));
    }
}

// =============================================================================
// Best-run search
// =============================================================================

/// Outcome of scanning one diagonal.
enum Probe {
    /// Run exceeded the greedy threshold; stop searching.
    Accepted(MatchedBlock),
    /// Longest qualifying run on the diagonal, if any.
    Best(Option<MatchedBlock>),
}

/// Longest run of equal tokens inside `range`.
///
/// Diagonals anchored on old indices are tried before those anchored on new
/// indices; on ties the first run found wins.
fn best_matched_block<T: PartialEq>(
    old: &[T],
    new: &[T],
    range: Range,
    config: &MatchConfig,
) -> Option<MatchedBlock> {
    let old_len = range.old_end - range.old_start;
    let new_len = range.new_end - range.new_start;
    let threshold = config.greedy_threshold(old_len.min(new_len));

    let old_anchored = (range.old_start..range.old_end)
        .map(|i| (i, range.new_start, (range.old_end - i).min(new_len)));
    let new_anchored = (range.new_start..range.new_end)
        .map(|j| (range.old_start, j, old_len.min(range.new_end - j)));

    let mut best: Option<MatchedBlock> = None;
    for (a, b, len) in old_anchored.chain(new_anchored) {
        match slide(old, new, a, b, len, config.min_matched_size, threshold) {
            Probe::Accepted(block) => {
                trace!(size = block.size, ?threshold, "greedy match accepted");
                return Some(block);
            }
            Probe::Best(Some(block)) if best.is_none_or(|current| block.size > current.size) => {
                best = Some(block);
            }
            Probe::Best(_) => {}
        }
    }
    best
}

/// Scan the diagonal starting at `old[a]` / `new[b]` for `len` positions.
fn slide<T: PartialEq>(
    old: &[T],
    new: &[T],
    a: usize,
    b: usize,
    len: usize,
    min_matched_size: usize,
    threshold: Option<usize>,
) -> Probe {
    let min = min_matched_size.max(1);
    let mut best: Option<MatchedBlock> = None;
    let mut run = 0;
    let mut i = 0;
    while i < len {
        if old[a + i] == new[b + i] {
            run += 1;
        } else {
            run = 0;
        }
        if run >= min && threshold.is_some_and(|t| run > t) {
            // Extend to the end of the run before accepting it.
            while i + 1 < len && old[a + i + 1] == new[b + i + 1] {
                run += 1;
                i += 1;
            }
            return Probe::Accepted(MatchedBlock::new(a + i + 1 - run, b + i + 1 - run, run));
        }
        if best.is_none_or(|block| run > block.size) && run > 0 {
            best = Some(MatchedBlock::new(a + i + 1 - run, b + i + 1 - run, run));
        }
        i += 1;
    }
    Probe::Best(best.filter(|block| block.size >= min))
}

// =============================================================================
// Tests
// =============================================================================
