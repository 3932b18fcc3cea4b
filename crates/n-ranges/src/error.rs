//! Error types for n-ranges.

use thiserror::Error;

use crate::key::Key;

/// Result type alias using [`RangeError`].
pub type Result<T> = std::result::Result<T, RangeError>;

/// Why an insert was refused.
///
/// The map itself is never left modified when one of these is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// The candidate partially overlaps an existing span.
    #[error("{key} crosses existing range {existing}")]
    Crossing { key: Key, existing: Key },

    /// `offset + length` does not fit in a `u64`.
    #[error("range {offset}+{length} overflows the 64-bit offset space")]
    Overflow { offset: u64, length: u64 },
}
