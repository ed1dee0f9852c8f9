//! Alignment algorithms for token sequences.
//!
//! - `matcher`: finds matched blocks of equal tokens
//! - `ops`: turns matched blocks into a gapless edit script

mod matcher;
mod ops;

pub use matcher::{align, MatchConfig, MatchedBlock};
pub use ops::{build_operations, check_coverage, OpKind, Operation};
