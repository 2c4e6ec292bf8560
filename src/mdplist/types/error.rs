//! Custom error types for the mdplist-reader crate.

use thiserror::Error;

use super::models::ContainerKind;

/// The primary error type for all operations in this crate.
///
/// Every variant is fatal for the parse that raised it: no partial tree is
/// returned. Tolerated irregularities are reported as
/// [`Diagnostic`](super::models::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum MdplistError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The buffer does not start with the `DE BA 00 01` signature.
    #[error("Invalid MDPLIST file format: bad magic {found:02x?}")]
    InvalidMagic { found: [u8; 4] },

    /// A read would run past the end of the buffer, or a length field is
    /// inconsistent with the fields around it.
    #[error("Out of bounds read at offset {offset}: needed {needed} bytes, {available} available")]
    OutOfBounds {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// A mapping footer names a key offset the key table does not contain.
    #[error("Key offset {key_offset} referenced by mapping at {container_offset} is not in the key table")]
    MissingKey { key_offset: u32, container_offset: u32 },

    /// A string payload is not valid in its declared encoding.
    #[error("Invalid {encoding} text at offset {offset}")]
    InvalidText { offset: u64, encoding: &'static str },

    /// A date value cannot be represented as an instant.
    #[error("Invalid date at offset {offset}: {seconds} seconds since 2001-01-01")]
    InvalidDate { offset: u32, seconds: f64 },

    /// A container footer does not divide into whole records.
    ///
    /// Only raised under [`StridePolicy::Strict`](super::models::StridePolicy::Strict).
    #[error("{kind} at offset {offset}: footer of {footer_len} bytes does not hold {record_count} records of {stride} bytes")]
    StrideMismatch {
        kind: ContainerKind,
        offset: u32,
        footer_len: usize,
        record_count: u16,
        stride: usize,
    },

    /// Containers nest deeper than the configured limit.
    #[error("Maximum nesting depth {max_depth} exceeded at offset {offset}")]
    DepthExceeded { max_depth: usize, offset: u32 },
}

/// A convenience `Result` type alias using the crate's `MdplistError` type.
pub type Result<T> = std::result::Result<T, MdplistError>;
