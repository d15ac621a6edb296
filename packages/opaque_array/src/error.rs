use thiserror::Error;

/// Errors that can occur when constructing, growing or accessing an [`OpaqueArray`][1].
///
/// The same taxonomy is shared by the container, its growth policies, its copy handlers and the
/// checked arithmetic helpers, so a failure from any layer can be propagated unchanged.
///
/// [1]: crate::OpaqueArray
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An argument was null, zero or otherwise malformed.
    #[error("invalid input: {problem}")]
    InvalidInput {
        /// A human-readable description of the problem.
        problem: &'static str,
    },

    /// The memory allocator could not satisfy a request.
    #[error("failed to allocate {bytes} bytes")]
    Memory {
        /// Size of the allocation request that failed.
        bytes: usize,
    },

    /// The index is not backed by allocated memory and the write or read was refused.
    #[error("index {index} is out of bounds for capacity {capacity}")]
    OutOfBounds {
        /// The index that was accessed.
        index: usize,

        /// The capacity of the container at the time of the access.
        capacity: usize,
    },

    /// A size computation would exceed the range of the size type.
    #[error("size computation exceeds the representable range")]
    SizeOverflow,

    /// An internal invariant of the container was found violated.
    #[error("container is corrupted: {problem}")]
    CorruptedContainer {
        /// A human-readable description of the violated invariant.
        problem: &'static str,
    },

    /// The growth policy declined to grow because the index is outside its supported window.
    #[error("growth policy does not support index {index} for capacity {capacity}")]
    RangeRejected {
        /// The index that triggered the growth request.
        index: usize,

        /// The capacity of the container when growth was requested.
        capacity: usize,
    },

    /// An arithmetic operation has no defined result (e.g. zero raised to the power of zero).
    #[error("arithmetic result is not a number")]
    NotANumber,
}

/// A specialized `Result` type for container operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
