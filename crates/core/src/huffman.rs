//! Per-message Huffman code.
//!
//! `encode` counts symbol frequencies, builds a prefix-code tree and keeps it
//! on the instance; `decode` walks that same tree. The code table is never
//! transmitted, so a decode is only meaningful right after an encode on the
//! same instance.
//!
//! # Tree construction
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by index.
//! Leaves start ordered by weight, ties in order of first occurrence. The two
//! lightest nodes are repeatedly merged (the first one removed becomes the
//! left child) and the merged node is inserted *after* every node of equal
//! weight. This makes tree shape, and therefore every code, deterministic.
//!
//! # Degenerate inputs
//!
//! A message with a single distinct symbol gets the 1-bit code `0`, so the
//! encoded length still carries the symbol count. Empty messages are
//! rejected like in every other codec.

use crate::codec::{self, Codec, CodecKind, Outcome};
use crate::error::{Error, InvalidInputError, MalformedInputError, Result};
use std::collections::HashMap;

/// Index of a node in the tree arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { symbol: char },
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Symbol frequency for leaves, sum of children for internal nodes
    pub weight: u64,
    pub kind: NodeKind,
}

/// Huffman tree stored as an arena with a root handle.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build a tree from `(symbol, frequency)` pairs in first-occurrence order.
    ///
    /// Returns `None` when `frequencies` is empty.
    pub fn from_frequencies(frequencies: &[(char, u64)]) -> Option<Self> {
        if frequencies.is_empty() {
            return None;
        }

        let mut nodes: Vec<Node> = frequencies
            .iter()
            .map(|&(symbol, weight)| Node {
                weight,
                kind: NodeKind::Leaf { symbol },
            })
            .collect();

        // Stable sort keeps first-occurrence order among equal weights.
        let mut queue: Vec<NodeId> = (0..nodes.len()).collect();
        queue.sort_by_key(|&id| nodes[id].weight);

        while queue.len() > 1 {
            let left = queue.remove(0);
            let right = queue.remove(0);
            let weight = nodes[left].weight.saturating_add(nodes[right].weight);
            let id = nodes.len();
            nodes.push(Node {
                weight,
                kind: NodeKind::Internal { left, right },
            });
            let at = queue.partition_point(|&other| nodes[other].weight <= weight);
            queue.insert(at, id);
        }

        Some(Self {
            root: queue[0],
            nodes,
        })
    }

    /// Count symbols of `message` in first-occurrence order.
    pub fn count_frequencies(message: &str) -> Vec<(char, u64)> {
        let mut order: Vec<(char, u64)> = Vec::new();
        let mut slots: HashMap<char, usize> = HashMap::new();
        for c in message.chars() {
            match slots.get(&c) {
                Some(&slot) => order[slot].1 += 1,
                None => {
                    slots.insert(c, order.len());
                    order.push((c, 1));
                }
            }
        }
        order
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf { .. }))
            .count()
    }

    /// Derive the code table by a root-to-leaf walk (`0` left, `1` right).
    pub fn code_table(&self) -> CodeTable {
        let mut codes = HashMap::new();
        if let NodeKind::Leaf { symbol } = self.nodes[self.root].kind {
            codes.insert(symbol, "0".to_string());
            return CodeTable { codes };
        }

        let mut stack = vec![(self.root, String::new())];
        while let Some((id, prefix)) = stack.pop() {
            match self.nodes[id].kind {
                NodeKind::Leaf { symbol } => {
                    codes.insert(symbol, prefix);
                }
                NodeKind::Internal { left, right } => {
                    stack.push((right, format!("{prefix}1")));
                    stack.push((left, format!("{prefix}0")));
                }
            }
        }
        CodeTable { codes }
    }
}

/// Mapping from symbol to its bit code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: HashMap<char, String>,
}

impl CodeTable {
    pub fn get(&self, symbol: char) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `true` when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&String> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(a.as_str()))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.codes.iter().map(|(&c, code)| (c, code.as_str()))
    }
}

/// Huffman codec holding the tree and table of the last encoded message.
#[derive(Debug, Clone, Default)]
pub struct Huffman {
    tree: Option<HuffmanTree>,
    table: CodeTable,
}

impl Huffman {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree built by the last `encode`.
    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    /// Code table built by the last `encode`.
    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }
}

impl Codec for Huffman {
    fn kind(&self) -> CodecKind {
        CodecKind::Huffman
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        codec::ensure_encodable_text(self.kind(), message, false)?;

        let frequencies = HuffmanTree::count_frequencies(message);
        let tree = HuffmanTree::from_frequencies(&frequencies).ok_or(InvalidInputError::Empty)?;
        let table = tree.code_table();

        let mut encoded = String::new();
        for c in message.chars() {
            // Every symbol of the message has a leaf.
            encoded.push_str(table.get(c).unwrap_or_default());
        }

        log::debug!(
            "huffman: {} symbols ({} distinct) -> {} bits",
            message.chars().count(),
            table.len(),
            encoded.len()
        );
        self.tree = Some(tree);
        self.table = table;
        Ok(Outcome::clean(encoded))
    }

    fn decode(&mut self, bits: &str) -> Result<Outcome> {
        let tree = self.tree.as_ref().ok_or(Error::NoCodeTable)?;
        crate::bitio::ensure_decodable(bits)?;

        let mut decoded = String::new();
        let root = tree.root();

        if let NodeKind::Leaf { symbol } = tree.node(root).kind {
            for (position, c) in bits.chars().enumerate() {
                if c != '0' {
                    return Err(MalformedInputError::InvalidCode { position }.into());
                }
                decoded.push(symbol);
            }
            return Ok(Outcome::clean(decoded));
        }

        let mut current = root;
        for c in bits.chars() {
            if let NodeKind::Internal { left, right } = tree.node(current).kind {
                current = if c == '0' { left } else { right };
            }
            if let NodeKind::Leaf { symbol } = tree.node(current).kind {
                decoded.push(symbol);
                current = root;
            }
        }

        if current != root {
            return Err(MalformedInputError::Truncated {
                at: bits.len(),
                needed: 1,
            }
            .into());
        }

        log::debug!(
            "huffman: {} bits -> {} symbols",
            bits.len(),
            decoded.chars().count()
        );
        Ok(Outcome::clean(decoded))
    }

    fn validate(&self, message: &str) -> bool {
        !message.is_empty()
    }
}
