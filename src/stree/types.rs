//! Types for the compact suffix tree
//!
//! Nodes are addressed by offsets, never by pointers: a leaf is named by the
//! start of the suffix it represents and a branch node by its word offset in
//! the branch table. Both survive table growth unchanged.

use serde::{Deserialize, Serialize};

/// Word offset of a branch node in the branch table
pub type BranchOffset = u32;

/// Leaf number, equal to the start position of its suffix
pub type LeafIndex = u32;

/// A text symbol: a byte, or the terminator which sorts after every byte
pub type Symbol = u16;

/// Virtual end-of-text symbol (`$`)
pub const TERMINATOR: Symbol = 256;

/// The root is always the first (large) slot of the branch table
pub const ROOT: BranchOffset = 0;

/// Words occupied by a small branch node
pub const SMALL_WORDS: u32 = 3;

/// Words occupied by a large branch node
pub const LARGE_WORDS: u32 = 5;

/// Longest text the packed representation can index.
/// Keeps every branch offset and depth below the tag bit.
pub const MAX_TEXT_LEN: usize = (1 << 28) - 1;

/// Reference to a node of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Leaf(LeafIndex),
    Branch(BranchOffset),
}

impl NodeRef {
    pub fn is_leaf(self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }

    pub fn is_root(self) -> bool {
        self == NodeRef::Branch(ROOT)
    }

    /// Branch offset, if this is a branch node
    pub fn branch(self) -> Option<BranchOffset> {
        match self {
            NodeRef::Branch(offset) => Some(offset),
            NodeRef::Leaf(_) => None,
        }
    }
}

/// Logical fields of a branch node, independent of its physical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchInfo {
    /// Length of the string spelled from the root to this node
    pub depth: u32,
    /// Start of one occurrence of that string in the text
    pub head_position: u32,
    /// Branch node spelling the same string without its first symbol
    pub suffix_link: BranchOffset,
}

/// Physical layout of a branch slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Three words; the rest is derived from the large node `distance`
    /// slots further on. A distance of 0 marks a node still pending.
    Small { distance: u32 },
    /// Five words with every field stored
    Large { depth: u32, head: u32, link: BranchOffset },
}

impl Layout {
    pub fn words(self) -> u32 {
        match self {
            Layout::Small { .. } => SMALL_WORDS,
            Layout::Large { .. } => LARGE_WORDS,
        }
    }
}

/// Configuration for suffix tree construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Initial branch table size, in small nodes per text symbol (default: 0.5)
    pub start_factor: f64,
    /// Growth increment, in small nodes per text symbol (default: 0.05)
    pub add_factor: f64,
    /// Lower bound on the growth increment, in small nodes (default: 16)
    pub min_extra: u32,
    /// Longest run of small nodes before an artificial large node is
    /// forced (default: 255, 0 disables small nodes)
    pub max_chain: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            start_factor: 0.5,
            add_factor: 0.05,
            min_extra: 16,
            max_chain: 255,
        }
    }
}

/// Statistics gathered while building a tree
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeStats {
    /// Length of the indexed text, terminator excluded
    pub text_len: u64,
    pub leaves: u64,
    /// Branch nodes, root included
    pub branches: u64,
    pub small_nodes: u64,
    pub large_nodes: u64,
    /// Words used in the branch table
    pub table_words: u64,
    /// Number of times the branch table had to grow
    pub growths: u32,
    /// Deepest branch node
    pub max_depth: u32,
}

impl TreeStats {
    /// Approximate heap footprint of the tree in bytes
    pub fn memory_bytes(&self) -> u64 {
        (self.table_words + self.leaves + 256) * std::mem::size_of::<u32>() as u64
    }
}
