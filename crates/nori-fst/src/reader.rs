// Traversal cursor over the arc table.

use crate::FstError;
use crate::arc::RawArc;

/// Positional cursor over a transducer's arc table.
///
/// A reader carries the position of one traversal session. It borrows the
/// table immutably, so any number of readers may exist at once, but a single
/// reader must be advanced through `&mut` and is therefore never shared
/// between concurrent traversals.
#[derive(Debug, Clone)]
pub struct BytesReader<'a> {
    arcs: &'a [RawArc],
    position: usize,
}

impl<'a> BytesReader<'a> {
    pub(crate) fn new(arcs: &'a [RawArc]) -> Self {
        Self { arcs, position: 0 }
    }

    /// Current table position (index of the next record to read).
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Number of records in the underlying table.
    #[inline]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Read the record at the current position and advance past it.
    #[inline]
    pub fn read_arc(&mut self) -> Result<&'a RawArc, FstError> {
        let arcs = self.arcs;
        let raw = arcs.get(self.position).ok_or(FstError::OutOfBounds {
            position: self.position,
            len: arcs.len(),
        })?;
        self.position += 1;
        Ok(raw)
    }

    /// Jump to `position`, then read the record there.
    #[inline]
    pub fn read_arc_at(&mut self, position: usize) -> Result<&'a RawArc, FstError> {
        self.position = position;
        self.read_arc()
    }
}
