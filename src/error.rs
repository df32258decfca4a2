//! Error types reported by the skip list.

use thiserror::Error;

/// Errors returned to callers of the skip list.
///
/// These are all caller-input or caller-protocol errors. Nothing here is
/// transient, so nothing is ever retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipListError {
    /// A positional lookup used an index outside `[0, size)`.
    #[error("index {index} out of range for skip list of size {size}")]
    OutOfRange { index: usize, size: usize },

    /// A ranged read asked for `count` values from `index`, running past the end.
    #[error("range of {count} values at index {index} runs past skip list of size {size}")]
    RangeOutOfBounds {
        index: usize,
        count: usize,
        size: usize,
    },

    /// The value is not stored in the skip list.
    #[error("value not found")]
    NotFound,

    /// Construction was attempted with an unusable configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A cursor was advanced after the skip list was mutated.
    #[error("skip list modified during iteration (version {expected}, now {found})")]
    ConcurrentModification { expected: u64, found: u64 },

    /// A cursor was advanced against a list other than the one that made it.
    #[error("cursor belongs to skip list {expected}, not {found}")]
    ForeignCursor { expected: u64, found: u64 },
}

/// A broken structural invariant, found by `SkipList::check_integrity`.
///
/// Seeing one of these means the engine has a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("head has {found} levels but height is {expected}")]
    HeadHeight { expected: usize, found: usize },

    #[error("height {height} exceeds max level {max_level}")]
    ExceedsMaxLevel { height: usize, max_level: usize },

    #[error("tallest node has height {found} but list height is {expected}")]
    TallestNode { expected: usize, found: usize },

    #[error("level 0 chain holds {found} nodes but size is {expected}")]
    Size { expected: usize, found: usize },

    #[error("values out of order at level {level}, position {position}")]
    Order { level: usize, position: usize },

    #[error("span at level {level}, position {position} is {found}, expected {expected}")]
    Span {
        level: usize,
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("level {level} links {found} nodes but {expected} nodes are that tall")]
    Membership {
        level: usize,
        expected: usize,
        found: usize,
    },

    #[error("level {level} reaches a node that is not in the level 0 chain")]
    Detached { level: usize },

    #[error("cycle detected at level {level}")]
    Cycle { level: usize },

    #[error("arena holds {live} live slots but size is {size}")]
    Arena { live: usize, size: usize },
}
