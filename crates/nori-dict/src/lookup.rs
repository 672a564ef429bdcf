// Dictionary lookup: walk text from the root, one cached first step then
// ordinary transitions.

use nori_fst::outputs;
use nori_fst::{Arc, BytesReader, FstError, Output};

use crate::cache::TokenInfoFst;

/// A dictionary entry that is a prefix of the looked-up text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Entry length in characters.
    pub len: usize,
    /// Accumulated output of the entry.
    pub output: Output,
}

impl TokenInfoFst {
    /// All non-empty dictionary entries that are prefixes of `text`,
    /// shortest first.
    pub fn prefix_matches(
        &self,
        text: &[char],
        reader: &mut BytesReader<'_>,
    ) -> Result<Vec<PrefixMatch>, FstError> {
        let mut matches = Vec::new();
        self.walk(text, reader, |m| {
            if m.len > 0 {
                matches.push(m);
            }
        })?;
        Ok(matches)
    }

    /// Output of `text` if it is a dictionary entry.
    pub fn get(&self, text: &[char], reader: &mut BytesReader<'_>) -> Result<Option<Output>, FstError> {
        let mut exact = None;
        self.walk(text, reader, |m| {
            if m.len == text.len() {
                exact = Some(m.output);
            }
        })?;
        Ok(exact)
    }

    /// Follow `text` from the root until it leaves the transducer, reporting
    /// every accepting position.
    fn walk(
        &self,
        text: &[char],
        reader: &mut BytesReader<'_>,
        mut on_match: impl FnMut(PrefixMatch),
    ) -> Result<(), FstError> {
        let mut arc = Arc::new();
        self.first_arc(&mut arc);
        let mut output = Self::NO_OUTPUT;

        if arc.is_final() {
            on_match(PrefixMatch {
                len: 0,
                output: outputs::add(output, arc.next_final_output),
            });
        }

        for (i, &ch) in text.iter().enumerate() {
            let follow = arc;
            // Only the first step starts at the root, where the cache applies
            let Some(found) = self.find_target_arc(ch as u32, &follow, &mut arc, i == 0, reader)?
            else {
                break;
            };
            output = outputs::add(output, found.output);
            if found.is_final() {
                on_match(PrefixMatch {
                    len: i + 1,
                    output: outputs::add(output, found.next_final_output),
                });
            }
        }
        Ok(())
    }
}
