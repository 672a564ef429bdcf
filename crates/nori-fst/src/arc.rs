// Arc records: the on-disk `RawArc` layout and the caller-owned `Arc` buffer.

use bytemuck::{Pod, Zeroable};

use crate::outputs::{NO_OUTPUT, Output};
use crate::{END_LABEL, NO_STATE};

/// The arc's target state accepts; stopping there adds `next_final_output`.
pub const FLAG_FINAL_ARC: u16 = 1 << 0;
/// The arc is the last one of its state.
pub const FLAG_LAST_ARC: u16 = 1 << 1;

/// Serialized arc (32 bytes).
///
/// - `label` (u32): input label (a Unicode scalar value)
/// - `target` (u32): index of the target state's first arc, `NO_STATE` if
///   the target has no outgoing arcs
/// - `output` (i64): output added when following this arc
/// - `next_final_output` (i64): output added when stopping at the target
/// - `flags` (u16): `FLAG_FINAL_ARC` and `FLAG_LAST_ARC`
/// - `state_arcs` (u32): arc count of the state, only set on its first arc
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct RawArc {
    pub label: u32,
    pub target: u32,
    pub output: i64,
    pub next_final_output: i64,
    pub flags: u16,
    pub _reserved: u16,
    pub state_arcs: u32,
}

impl RawArc {
    #[inline]
    pub fn is_last(&self) -> bool {
        self.flags & FLAG_LAST_ARC != 0
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags & FLAG_FINAL_ARC != 0
    }
}

/// A decoded transition.
///
/// `Arc` is a plain value: the engine fills a caller-supplied buffer and the
/// caller may copy or mutate it freely. Nothing else keeps a reference to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    /// Input label, or `END_LABEL` for the final pseudo-arc.
    pub label: u32,
    /// Output accumulated by following this arc.
    pub output: Output,
    /// Output added when stopping at `target` (meaningful if final).
    pub next_final_output: Output,
    /// First arc of the target state, or `NO_STATE`.
    pub target: u32,
    pub flags: u16,
    /// Table position of the next sibling arc.
    pub next_arc: u32,
}

impl Default for Arc {
    fn default() -> Self {
        Self {
            label: END_LABEL,
            output: NO_OUTPUT,
            next_final_output: NO_OUTPUT,
            target: NO_STATE,
            flags: 0,
            next_arc: 0,
        }
    }
}

impl Arc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite every field of `self` with `other`'s.
    #[inline]
    pub fn copy_from(&mut self, other: &Arc) -> &mut Self {
        *self = *other;
        self
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags & FLAG_FINAL_ARC != 0
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.flags & FLAG_LAST_ARC != 0
    }

    /// Whether the target state has any outgoing arcs.
    #[inline]
    pub fn target_has_arcs(&self) -> bool {
        self.target != NO_STATE
    }

    /// Fill this arc from the raw record found at table position `position`.
    #[inline]
    pub(crate) fn fill_from(&mut self, raw: &RawArc, position: usize) -> &mut Self {
        self.label = raw.label;
        self.output = raw.output;
        self.next_final_output = raw.next_final_output;
        self.target = raw.target;
        self.flags = raw.flags;
        self.next_arc = position as u32 + 1;
        self
    }
}

const _: () = assert!(size_of::<RawArc>() == 32);
