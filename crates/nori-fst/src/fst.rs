// Read-only transducer: loading and arc-level traversal.

use std::cmp::Ordering;

use bytemuck::Zeroable;
use log::debug;

use crate::arc::{Arc, FLAG_FINAL_ARC, FLAG_LAST_ARC, RawArc};
use crate::format::{self, FstHeader, HEADER_SIZE};
use crate::outputs::{self, NO_OUTPUT, Output};
use crate::reader::BytesReader;
use crate::{END_LABEL, FstError, NO_STATE};

/// States with at least this many arcs are searched by bisection.
pub const BINARY_SEARCH_THRESHOLD: u32 = 6;

/// A minimal acyclic transducer mapping label sequences to additive outputs.
///
/// Loaded from a `&[u8]` slice, the arc table is copied into an owned
/// `Vec<RawArc>` since the source slice may not be 8-byte aligned.
pub struct Fst {
    arcs: Vec<RawArc>,
    header: FstHeader,
}

impl std::fmt::Debug for Fst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fst")
            .field("arc_count", &self.arcs.len())
            .field("root", &self.header.root)
            .field("accepts_empty", &self.header.accepts_empty())
            .finish()
    }
}

impl Fst {
    /// Load a transducer from its serialized form.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FstError> {
        let header = format::parse_header(data)?;
        let remaining = &data[HEADER_SIZE..];

        if remaining.len() % size_of::<RawArc>() != 0 {
            return Err(FstError::AlignmentError);
        }
        let arc_count = remaining.len() / size_of::<RawArc>();

        if header.root != NO_STATE && header.root as usize >= arc_count {
            return Err(FstError::InvalidRoot {
                root: header.root,
                arc_count,
            });
        }

        // Copy into aligned Vec
        let mut arcs = vec![RawArc::zeroed(); arc_count];
        bytemuck::cast_slice_mut::<RawArc, u8>(&mut arcs).copy_from_slice(remaining);

        debug!(
            "loaded transducer: {} arcs, root {}, empty accepted {}",
            arc_count,
            header.root,
            header.accepts_empty()
        );

        Ok(Self { arcs, header })
    }

    /// The parsed header.
    pub fn header(&self) -> &FstHeader {
        &self.header
    }

    /// Total number of arc records.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Fill `arc` with the pseudo-arc leading into the root state.
    ///
    /// The returned arc is final when the empty sequence is accepted, and its
    /// `next_final_output` is then the empty sequence's output.
    pub fn first_arc<'a>(&self, arc: &'a mut Arc) -> &'a mut Arc {
        if self.header.accepts_empty() {
            arc.flags = FLAG_FINAL_ARC | FLAG_LAST_ARC;
            arc.next_final_output = self.header.empty_output;
        } else {
            arc.flags = FLAG_LAST_ARC;
            arc.next_final_output = NO_OUTPUT;
        }
        arc.label = END_LABEL;
        arc.output = NO_OUTPUT;
        arc.target = self.header.root;
        arc.next_arc = 0;
        arc
    }

    /// A fresh cursor for one traversal session.
    pub fn bytes_reader(&self) -> BytesReader<'_> {
        BytesReader::new(&self.arcs)
    }

    /// Find the arc labeled `label` leaving `follow`'s target state.
    ///
    /// On a match `arc` is filled and returned. `Ok(None)` means the state has
    /// no such arc. `END_LABEL` matches the final pseudo-arc of a final
    /// `follow`, carrying its final output.
    pub fn find_target_arc<'a>(
        &self,
        label: u32,
        follow: &Arc,
        arc: &'a mut Arc,
        reader: &mut BytesReader<'_>,
    ) -> Result<Option<&'a mut Arc>, FstError> {
        if label == END_LABEL {
            if !follow.is_final() {
                return Ok(None);
            }
            arc.label = END_LABEL;
            arc.output = follow.next_final_output;
            arc.next_final_output = NO_OUTPUT;
            arc.flags = if follow.target_has_arcs() {
                FLAG_FINAL_ARC
            } else {
                FLAG_FINAL_ARC | FLAG_LAST_ARC
            };
            arc.target = NO_STATE;
            arc.next_arc = 0;
            return Ok(Some(arc));
        }

        if !follow.target_has_arcs() {
            return Ok(None);
        }

        let state = follow.target as usize;
        let head = reader.read_arc_at(state)?;
        let count = head.state_arcs as usize;
        if count == 0 || state + count > reader.len() {
            return Err(FstError::Corrupt(format!(
                "state {state} declares {count} arcs in a table of {}",
                reader.len()
            )));
        }

        if head.state_arcs >= BINARY_SEARCH_THRESHOLD {
            let mut low = 0;
            let mut high = count;
            while low < high {
                let middle = (low + high) / 2;
                let raw = reader.read_arc_at(state + middle)?;
                match raw.label.cmp(&label) {
                    Ordering::Less => low = middle + 1,
                    Ordering::Greater => high = middle,
                    Ordering::Equal => return Ok(Some(arc.fill_from(raw, state + middle))),
                }
            }
            return Ok(None);
        }

        // Arcs are sorted by label; stop at the first larger one
        let mut position = state;
        let mut raw = head;
        loop {
            if raw.label == label {
                return Ok(Some(arc.fill_from(raw, position)));
            }
            if raw.label > label || raw.is_last() {
                return Ok(None);
            }
            position += 1;
            raw = reader.read_arc()?;
        }
    }

    /// Fill `arc` with the first real arc leaving `follow`'s target state.
    ///
    /// `follow` must have a target with arcs; otherwise the read fails with
    /// `FstError::OutOfBounds`.
    pub fn read_first_target_arc<'a>(
        &self,
        follow: &Arc,
        arc: &'a mut Arc,
        reader: &mut BytesReader<'_>,
    ) -> Result<&'a mut Arc, FstError> {
        debug_assert!(follow.target_has_arcs());
        let position = follow.target as usize;
        let raw = reader.read_arc_at(position)?;
        Ok(arc.fill_from(raw, position))
    }

    /// Advance `arc` to its next sibling. `arc` must not be the last one.
    pub fn read_next_arc<'a>(
        &self,
        arc: &'a mut Arc,
        reader: &mut BytesReader<'_>,
    ) -> Result<&'a mut Arc, FstError> {
        debug_assert!(!arc.is_last());
        let position = arc.next_arc as usize;
        let raw = reader.read_arc_at(position)?;
        Ok(arc.fill_from(raw, position))
    }

    /// Exact lookup of a whole label sequence.
    pub fn get(&self, input: &[u32]) -> Result<Option<Output>, FstError> {
        let mut reader = self.bytes_reader();
        let mut arc = Arc::new();
        self.first_arc(&mut arc);
        let mut output = NO_OUTPUT;

        for &label in input {
            let follow = arc;
            match self.find_target_arc(label, &follow, &mut arc, &mut reader)? {
                Some(found) => output = outputs::add(output, found.output),
                None => return Ok(None),
            }
        }

        if arc.is_final() {
            Ok(Some(outputs::add(output, arc.next_final_output)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::HEADER_EMPTY_ACCEPTED;

    fn make_arc(label: char, target: u32, output: i64, flags: u16, state_arcs: u32) -> RawArc {
        RawArc {
            label: label as u32,
            target,
            output,
            next_final_output: 0,
            flags,
            _reserved: 0,
            state_arcs,
        }
    }

    fn build(root: u32, header_flags: u32, empty_output: i64, arcs: &[RawArc]) -> Vec<u8> {
        let header = FstHeader {
            root,
            flags: header_flags,
            empty_output,
        };
        let mut data = header.to_bytes().to_vec();
        for arc in arcs {
            data.extend_from_slice(bytemuck::bytes_of(arc));
        }
        data
    }

    fn labels(s: &str) -> Vec<u32> {
        s.chars().map(|c| c as u32).collect()
    }

    /// "ab" -> 3, "ac" -> 5, "b" -> 1
    fn build_simple_fst() -> Vec<u8> {
        let arcs = [
            // State 0 (after 'a'): 'b' final, 'c' final
            make_arc('b', NO_STATE, 0, FLAG_FINAL_ARC, 2),
            make_arc('c', NO_STATE, 2, FLAG_FINAL_ARC | FLAG_LAST_ARC, 0),
            // State 2 (root): 'a' -> 0, 'b' final
            make_arc('a', 0, 3, 0, 2),
            make_arc('b', NO_STATE, 1, FLAG_FINAL_ARC | FLAG_LAST_ARC, 0),
        ];
        build(2, 0, 0, &arcs)
    }

    /// Root with ten final arcs 'a'..='j', output = position.
    fn build_wide_fst() -> Vec<u8> {
        let arcs: Vec<RawArc> = ('a'..='j')
            .enumerate()
            .map(|(i, c)| {
                let last = if c == 'j' { FLAG_LAST_ARC } else { 0 };
                let count = if i == 0 { 10 } else { 0 };
                make_arc(c, NO_STATE, i as i64, FLAG_FINAL_ARC | last, count)
            })
            .collect();
        build(0, 0, 0, &arcs)
    }

    #[test]
    fn load_simple_fst() {
        let fst = Fst::from_bytes(&build_simple_fst()).unwrap();
        assert_eq!(fst.arc_count(), 4);
        assert_eq!(fst.header().root, 2);
    }

    #[test]
    fn exact_lookups() {
        let fst = Fst::from_bytes(&build_simple_fst()).unwrap();
        assert_eq!(fst.get(&labels("ab")).unwrap(), Some(3));
        assert_eq!(fst.get(&labels("ac")).unwrap(), Some(5));
        assert_eq!(fst.get(&labels("b")).unwrap(), Some(1));
        assert_eq!(fst.get(&labels("a")).unwrap(), None);
        assert_eq!(fst.get(&labels("")).unwrap(), None);
        assert_eq!(fst.get(&labels("abc")).unwrap(), None);
        assert_eq!(fst.get(&labels("z")).unwrap(), None);
    }

    #[test]
    fn find_root_arc() {
        let fst = Fst::from_bytes(&build_simple_fst()).unwrap();
        let mut reader = fst.bytes_reader();
        let mut root = Arc::new();
        fst.first_arc(&mut root);
        assert!(!root.is_final());

        let mut arc = Arc::new();
        let found = fst
            .find_target_arc('a' as u32, &root, &mut arc, &mut reader)
            .unwrap()
            .unwrap();
        assert_eq!(found.label, 'a' as u32);
        assert_eq!(found.output, 3);
        assert_eq!(found.target, 0);
        assert!(!found.is_final());

        assert!(
            fst.find_target_arc('0' as u32, &root, &mut arc, &mut reader)
                .unwrap()
                .is_none()
        );
        assert!(
            fst.find_target_arc('z' as u32, &root, &mut arc, &mut reader)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn binary_search_wide_state() {
        let fst = Fst::from_bytes(&build_wide_fst()).unwrap();
        for (i, c) in ('a'..='j').enumerate() {
            assert_eq!(fst.get(&[c as u32]).unwrap(), Some(i as i64), "label {c}");
        }
        assert_eq!(fst.get(&labels("k")).unwrap(), None);
        assert_eq!(fst.get(&labels("A")).unwrap(), None);
    }

    #[test]
    fn end_label_on_final_arc() {
        let fst = Fst::from_bytes(&build_simple_fst()).unwrap();
        let mut reader = fst.bytes_reader();
        let mut root = Arc::new();
        fst.first_arc(&mut root);

        let mut b = Arc::new();
        fst.find_target_arc('b' as u32, &root, &mut b, &mut reader)
            .unwrap()
            .unwrap();
        assert!(b.is_final());

        let mut end = Arc::new();
        let found = fst
            .find_target_arc(END_LABEL, &b, &mut end, &mut reader)
            .unwrap()
            .unwrap();
        assert_eq!(found.label, END_LABEL);
        assert!(found.is_last());
        assert!(!found.target_has_arcs());

        // The root is not final, so no end pseudo-arc there
        assert!(
            fst.find_target_arc(END_LABEL, &root, &mut end, &mut reader)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn empty_sequence_accepted() {
        let arcs = [make_arc('a', NO_STATE, 4, FLAG_FINAL_ARC | FLAG_LAST_ARC, 1)];
        let data = build(0, HEADER_EMPTY_ACCEPTED, 9, &arcs);
        let fst = Fst::from_bytes(&data).unwrap();
        assert_eq!(fst.get(&[]).unwrap(), Some(9));
        assert_eq!(fst.get(&labels("a")).unwrap(), Some(4));

        let mut root = Arc::new();
        fst.first_arc(&mut root);
        assert!(root.is_final());
        assert_eq!(root.next_final_output, 9);
    }

    #[test]
    fn empty_fst() {
        let fst = Fst::from_bytes(&build(NO_STATE, 0, 0, &[])).unwrap();
        assert_eq!(fst.arc_count(), 0);
        assert_eq!(fst.get(&labels("a")).unwrap(), None);
        assert_eq!(fst.get(&[]).unwrap(), None);
    }

    #[test]
    fn enumerate_root_arcs() {
        let fst = Fst::from_bytes(&build_simple_fst()).unwrap();
        let mut reader = fst.bytes_reader();
        let mut root = Arc::new();
        fst.first_arc(&mut root);

        let mut arc = Arc::new();
        fst.read_first_target_arc(&root, &mut arc, &mut reader).unwrap();
        let mut seen = vec![arc.label];
        while !arc.is_last() {
            fst.read_next_arc(&mut arc, &mut reader).unwrap();
            seen.push(arc.label);
        }
        assert_eq!(seen, labels("ab"));
    }

    #[test]
    fn reject_invalid_root() {
        let arcs = [make_arc('a', NO_STATE, 0, FLAG_FINAL_ARC | FLAG_LAST_ARC, 1)];
        let err = Fst::from_bytes(&build(5, 0, 0, &arcs)).unwrap_err();
        assert!(matches!(
            err,
            FstError::InvalidRoot {
                root: 5,
                arc_count: 1
            }
        ));
    }

    #[test]
    fn reject_truncated_table() {
        let mut data = build_simple_fst();
        data.truncate(data.len() - 3);
        let err = Fst::from_bytes(&data).unwrap_err();
        assert!(matches!(err, FstError::AlignmentError));
    }

    #[test]
    fn corrupt_state_count() {
        // Root claims three arcs but the table only has one
        let arcs = [make_arc('a', NO_STATE, 0, FLAG_FINAL_ARC | FLAG_LAST_ARC, 3)];
        let fst = Fst::from_bytes(&build(0, 0, 0, &arcs)).unwrap();
        let err = fst.get(&labels("a")).unwrap_err();
        assert!(matches!(err, FstError::Corrupt(_)));
    }

    #[test]
    fn dangling_target() {
        // 'a' points past the end of the table
        let arcs = [make_arc('a', 40, 0, FLAG_LAST_ARC, 1)];
        let fst = Fst::from_bytes(&build(0, 0, 0, &arcs)).unwrap();
        let err = fst.get(&labels("ab")).unwrap_err();
        assert!(matches!(err, FstError::OutOfBounds { position: 40, len: 1 }));
    }
}
