//! Korean token dictionary transducer.
//!
//! Wraps a [`nori_fst::Fst`] with a root-arc cache: the root transition for
//! every code point of a configured contiguous range (by default the 11,172
//! Hangul syllables) is resolved once at construction, so the first step of
//! most dictionary lookups is a single array access.
//!
//! - [`config`] -- Cached code point range
//! - [`cache`] -- [`TokenInfoFst`], the caching facade
//! - [`lookup`] -- Prefix and exact dictionary lookup driven through the cache

pub mod cache;
pub mod config;
pub mod lookup;

pub use cache::TokenInfoFst;
pub use config::CacheRange;
pub use lookup::PrefixMatch;

/// Error type for dictionary construction.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    /// The transducer could not be read while loading or caching root arcs.
    #[error("transducer error: {0}")]
    Fst(#[from] nori_fst::FstError),

    #[error("invalid cache range {base:#06X}..={ceiling:#06X}")]
    InvalidCacheRange { base: u32, ceiling: u32 },
}
