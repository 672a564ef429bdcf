//! Read-only finite state transducer engine for dictionary lookup.
//!
//! A transducer maps label sequences (Unicode scalar values) to additive
//! `i64` outputs. The serialized form is a fixed-size header followed by a
//! table of 32-byte arc records; states are contiguous runs of arcs sorted by
//! label.
//!
//! # Architecture
//!
//! - [`format`] -- Binary header parsing and validation
//! - [`arc`] -- Zero-copy arc record layout and the caller-owned [`Arc`] buffer
//! - [`outputs`] -- Output monoid (identity, composition, factoring)
//! - [`reader`] -- Traversal cursor ([`BytesReader`])
//! - [`fst`] -- Loading and arc-level traversal ([`Fst`])
//! - `compile` -- Dictionary compiler (feature `compile`)

pub mod arc;
#[cfg(feature = "compile")]
pub mod compile;
pub mod format;
pub mod fst;
pub mod outputs;
pub mod reader;

pub use arc::Arc;
pub use fst::Fst;
pub use outputs::{NO_OUTPUT, Output};
pub use reader::BytesReader;

/// Reserved label that matches the end of input at a final state.
pub const END_LABEL: u32 = u32::MAX;

/// Target of an arc whose destination has no outgoing arcs.
pub const NO_STATE: u32 = u32::MAX;

/// Error type for transducer loading and traversal.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("invalid magic number in transducer header")]
    InvalidMagic,
    #[error("data too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("arc table length is not a multiple of the record size")]
    AlignmentError,
    #[error("root state {root} is outside the arc table ({arc_count} arcs)")]
    InvalidRoot { root: u32, arc_count: usize },
    #[error("read at position {position} past the end of the arc table ({len} arcs)")]
    OutOfBounds { position: usize, len: usize },
    #[error("corrupt transducer: {0}")]
    Corrupt(String),
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("key contains the reserved end label")]
    ReservedLabel,
}
