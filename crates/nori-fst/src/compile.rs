// Dictionary compiler: builds the serialized transducer from entries.
//
// Entries go into an in-memory trie. `finish` factors outputs toward the root,
// then writes states children first, sharing identical states through a
// register so the result is minimal. Both passes are loops over the node
// list, so key length is bounded by memory only.

use hashbrown::HashMap;
use log::debug;

use crate::arc::{FLAG_FINAL_ARC, FLAG_LAST_ARC, RawArc};
use crate::format::{FstHeader, HEADER_EMPTY_ACCEPTED};
use crate::outputs::{self, NO_OUTPUT, Output};
use crate::{END_LABEL, FstError, NO_STATE};

#[derive(Debug, Default)]
struct Node {
    /// Outgoing edges, sorted by label.
    edges: Vec<Edge>,
    /// Set if an entry ends here.
    final_output: Option<Output>,
}

#[derive(Debug)]
struct Edge {
    label: u32,
    target: usize,
    output: Output,
}

/// Accumulates dictionary entries and compiles them into a transducer.
///
/// Entries may be inserted in any order; duplicate keys are rejected.
#[derive(Debug)]
pub struct Builder {
    nodes: Vec<Node>,
    entry_count: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            entry_count: 0,
        }
    }

    /// Number of entries inserted so far.
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Insert a string key (labels are its Unicode scalar values).
    pub fn insert(&mut self, key: &str, output: Output) -> Result<(), FstError> {
        let labels: Vec<u32> = key.chars().map(u32::from).collect();
        self.insert_labels(&labels, output)
    }

    /// Insert a raw label sequence.
    pub fn insert_labels(&mut self, key: &[u32], output: Output) -> Result<(), FstError> {
        if key.contains(&END_LABEL) {
            return Err(FstError::ReservedLabel);
        }

        let mut node = 0;
        for &label in key {
            node = match self.nodes[node].edges.binary_search_by_key(&label, |e| e.label) {
                Ok(i) => self.nodes[node].edges[i].target,
                Err(i) => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].edges.insert(
                        i,
                        Edge {
                            label,
                            target: child,
                            output: NO_OUTPUT,
                        },
                    );
                    child
                }
            };
        }

        if self.nodes[node].final_output.is_some() {
            return Err(FstError::DuplicateKey(
                key.iter()
                    .map(|&l| char::from_u32(l).unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect(),
            ));
        }
        self.nodes[node].final_output = Some(output);
        self.entry_count += 1;
        Ok(())
    }

    /// Compile the entries into the serialized form read by [`crate::Fst::from_bytes`].
    pub fn finish(mut self) -> Vec<u8> {
        self.push_outputs();

        let mut register: HashMap<Vec<RawArc>, u32> = HashMap::new();
        let mut table: Vec<RawArc> = Vec::new();
        let root = self.freeze(&mut register, &mut table);

        let header = match self.nodes[0].final_output {
            Some(empty_output) => FstHeader {
                root,
                flags: HEADER_EMPTY_ACCEPTED,
                empty_output,
            },
            None => FstHeader {
                root,
                flags: 0,
                empty_output: NO_OUTPUT,
            },
        };

        debug!(
            "compiled {} entries into {} arcs ({} trie nodes, {} shared states)",
            self.entry_count,
            table.len(),
            self.nodes.len(),
            register.len()
        );

        let mut data = header.to_bytes().to_vec();
        data.extend_from_slice(bytemuck::cast_slice(table.as_slice()));
        data
    }

    /// Move the smallest output below each node onto the arc that enters it.
    ///
    /// A child is always created after its parent, so walking the nodes in
    /// reverse creation order visits every child before its parent.
    fn push_outputs(&mut self) {
        let mut pushed = vec![NO_OUTPUT; self.nodes.len()];

        for node in (0..self.nodes.len()).rev() {
            let current = &mut self.nodes[node];
            let mut shared = current.final_output;
            for edge in &mut current.edges {
                edge.output = pushed[edge.target];
                shared = Some(match shared {
                    Some(s) => outputs::common(s, edge.output),
                    None => edge.output,
                });
            }

            // The root keeps its full outputs: there is no incoming arc to move them to
            if node == 0 {
                break;
            }

            let shared = shared.unwrap_or(NO_OUTPUT);
            if let Some(f) = current.final_output.as_mut() {
                *f = outputs::subtract(*f, shared);
            }
            for edge in &mut current.edges {
                edge.output = outputs::subtract(edge.output, shared);
            }
            pushed[node] = shared;
        }
    }

    /// Write every state after its children and return the root's address.
    fn freeze(&self, register: &mut HashMap<Vec<RawArc>, u32>, table: &mut Vec<RawArc>) -> u32 {
        let mut address = vec![NO_STATE; self.nodes.len()];

        for node in (0..self.nodes.len()).rev() {
            let edges = &self.nodes[node].edges;
            if edges.is_empty() {
                continue;
            }

            let count = edges.len();
            let mut frozen = Vec::with_capacity(count);
            for (i, edge) in edges.iter().enumerate() {
                let child = &self.nodes[edge.target];

                let mut flags = 0;
                if child.final_output.is_some() {
                    flags |= FLAG_FINAL_ARC;
                }
                if i + 1 == count {
                    flags |= FLAG_LAST_ARC;
                }

                frozen.push(RawArc {
                    label: edge.label,
                    target: address[edge.target],
                    output: edge.output,
                    next_final_output: child.final_output.unwrap_or(NO_OUTPUT),
                    flags,
                    _reserved: 0,
                    state_arcs: if i == 0 { count as u32 } else { 0 },
                });
            }

            address[node] = match register.get(&frozen) {
                Some(&shared) => shared,
                None => {
                    let at = table.len() as u32;
                    table.extend_from_slice(&frozen);
                    register.insert(frozen, at);
                    at
                }
            };
        }

        address[0]
    }
}
