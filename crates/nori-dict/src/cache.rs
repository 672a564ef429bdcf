// TokenInfoFst: transducer facade with a dense root-arc cache.

use log::{debug, warn};
use nori_fst::{Arc, BytesReader, END_LABEL, Fst, FstError, Output};

use crate::DictError;
use crate::config::CacheRange;

/// Dictionary transducer with cached root arcs.
///
/// At construction the root transition for every label in the configured
/// [`CacheRange`] is looked up once and stored in a dense array indexed by
/// `label - base`. The array is never modified afterwards, so a
/// `TokenInfoFst` can be shared freely between threads; each traversal
/// still needs its own [`BytesReader`].
pub struct TokenInfoFst {
    fst: Fst,
    range: CacheRange,
    /// One slot per label in `range`; `None` means the root has no such arc.
    root_cache: Box<[Option<Arc>]>,
}

impl std::fmt::Debug for TokenInfoFst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInfoFst")
            .field("fst", &self.fst)
            .field("range", &self.range)
            .field("cached_arcs", &self.cached_arc_count())
            .finish()
    }
}

impl TokenInfoFst {
    /// Identity of the output monoid, for initializing accumulators.
    pub const NO_OUTPUT: Output = nori_fst::NO_OUTPUT;

    /// Wrap `fst`, caching root arcs for the Hangul syllable block.
    pub fn new(fst: Fst) -> Result<Self, DictError> {
        Self::with_range(fst, CacheRange::HANGUL_SYLLABLES)
    }

    /// Wrap `fst`, caching root arcs for every label in `range`.
    ///
    /// Fails if the range is invalid or if the transducer cannot be read while
    /// the cache is filled. No partially cached facade is ever returned.
    pub fn with_range(fst: Fst, range: CacheRange) -> Result<Self, DictError> {
        if let Err(e) = range.validate() {
            warn!("rejecting root arc cache range: {e}");
            return Err(e);
        }

        let root_cache = Self::cache_root_arcs(&fst, range)?;
        let facade = Self {
            fst,
            range,
            root_cache,
        };
        debug!(
            "cached root arcs for {:#06X}..={:#06X}: {} of {} labels present",
            range.base,
            range.ceiling,
            facade.cached_arc_count(),
            facade.cached_len()
        );
        Ok(facade)
    }

    /// Load a transducer from its serialized form and wrap it with the
    /// Hangul syllable cache.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        Self::new(Fst::from_bytes(data)?)
    }

    /// One root lookup per label in `range`, in label order.
    fn cache_root_arcs(fst: &Fst, range: CacheRange) -> Result<Box<[Option<Arc>]>, FstError> {
        let mut root = Arc::new();
        fst.first_arc(&mut root);
        let mut arc = Arc::new();
        let mut reader = fst.bytes_reader();

        let mut cache = Vec::with_capacity(range.label_count());
        for label in range.base..=range.ceiling {
            let entry = fst
                .find_target_arc(label, &root, &mut arc, &mut reader)?
                .map(|found| *found);
            cache.push(entry);
        }
        Ok(cache.into_boxed_slice())
    }

    /// Find the arc labeled `ch` leaving `follow`'s target state.
    ///
    /// With `use_cache` set and `ch` inside the cached range, the answer comes
    /// from the root cache and `follow` is not consulted: the caller must only
    /// enable the cache when `follow` is the root arc. The cached arc is
    /// copied into `arc`, so the caller may modify its buffer freely.
    /// Otherwise the lookup goes to the transducer using `reader`.
    ///
    /// `Ok(None)` means there is no such arc.
    pub fn find_target_arc<'a>(
        &self,
        ch: u32,
        follow: &Arc,
        arc: &'a mut Arc,
        use_cache: bool,
        reader: &mut BytesReader<'_>,
    ) -> Result<Option<&'a mut Arc>, FstError> {
        if let (true, Some(index)) = (use_cache, self.range.index_of(ch)) {
            // Unreachable for a validated range; states the contract for callers
            debug_assert!(ch != END_LABEL, "end label is never a cached root label");
            match &self.root_cache[index] {
                Some(master) => Ok(Some(arc.copy_from(master))),
                None => Ok(None),
            }
        } else {
            self.fst.find_target_arc(ch, follow, arc, reader)
        }
    }

    /// Fill `arc` with the pseudo-arc leading into the root state.
    pub fn first_arc<'a>(&self, arc: &'a mut Arc) -> &'a mut Arc {
        self.fst.first_arc(arc)
    }

    /// A fresh cursor for one traversal session.
    pub fn bytes_reader(&self) -> BytesReader<'_> {
        self.fst.bytes_reader()
    }

    pub fn cache_range(&self) -> CacheRange {
        self.range
    }

    /// Number of cache slots (`ceiling - base + 1`).
    pub fn cached_len(&self) -> usize {
        self.root_cache.len()
    }

    /// Number of cache slots holding an arc.
    pub fn cached_arc_count(&self) -> usize {
        self.root_cache.iter().filter(|slot| slot.is_some()).count()
    }

    /// The wrapped transducer. For tests and debugging only.
    #[doc(hidden)]
    pub fn internal_fst(&self) -> &Fst {
        &self.fst
    }
}
