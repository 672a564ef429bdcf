// Root-arc cache configuration: the contiguous label range served from the cache.

use serde::{Deserialize, Serialize};

use crate::DictError;

/// First Hangul syllable, U+AC00 (가).
pub const HANGUL_SYLLABLE_BASE: u32 = 0xAC00;

/// Last Hangul syllable, U+D7A3 (힣).
pub const HANGUL_SYLLABLE_CEILING: u32 = 0xD7A3;

/// Inclusive range of labels whose root arcs are cached.
///
/// Labels outside the range always take the transducer's normal traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRange {
    /// Lower bound, inclusive.
    pub base: u32,
    /// Upper bound, inclusive.
    pub ceiling: u32,
}

impl Default for CacheRange {
    fn default() -> Self {
        Self::HANGUL_SYLLABLES
    }
}

impl CacheRange {
    /// The Hangul syllable block (11,172 code points).
    pub const HANGUL_SYLLABLES: CacheRange = CacheRange {
        base: HANGUL_SYLLABLE_BASE,
        ceiling: HANGUL_SYLLABLE_CEILING,
    };

    pub const fn new(base: u32, ceiling: u32) -> Self {
        Self { base, ceiling }
    }

    /// Check that the range is non-empty and lies within the Unicode scalar values.
    pub fn validate(&self) -> Result<(), DictError> {
        if self.base > self.ceiling || self.ceiling > char::MAX as u32 {
            return Err(DictError::InvalidCacheRange {
                base: self.base,
                ceiling: self.ceiling,
            });
        }
        Ok(())
    }

    /// Number of labels in the range. Only meaningful for a valid range.
    #[inline]
    pub fn label_count(&self) -> usize {
        (self.ceiling - self.base) as usize + 1
    }

    #[inline]
    pub fn contains(&self, label: u32) -> bool {
        (self.base..=self.ceiling).contains(&label)
    }

    /// Offset of `label` from `base`, if it lies in the range.
    #[inline]
    pub fn index_of(&self, label: u32) -> Option<usize> {
        if self.contains(label) {
            Some((label - self.base) as usize)
        } else {
            None
        }
    }
}
