//! Compact suffix tree
//!
//! The tree indexes every suffix of a borrowed text plus a virtual
//! terminator `$`. Branch nodes are stored in one of two layouts: *large*
//! nodes keep depth, head position and suffix link explicitly, *small*
//! nodes derive them from the large node ending their chain. On typical
//! genomic input most nodes end up small.
//!
//! ```
//! use mumtree::stree::SuffixTree;
//!
//! let tree = SuffixTree::build(b"banana").unwrap();
//! let (loc, rest) = tree.scan_prefix(tree.root(), b"ana");
//! assert_eq!(rest, None);
//! assert_eq!(loc.matched_length(), 3);
//! ```

mod arena;
mod builder;
mod chain;
pub mod codec;
mod scan;
mod traverse;
pub mod types;
mod verify;

pub use scan::{Location, Position};
pub use traverse::{Descend, Visitor};
pub use types::*;
pub use verify::VerifyError;

use arena::Arena;
use builder::Builder;
use crate::utils::progress;
use thiserror::Error;

/// Failure to build a tree
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("text of {len} symbols exceeds the maximum of {max}")]
    TextTooLong { len: usize, max: usize },
}

/// A suffix tree over a borrowed text
#[derive(Debug, Clone)]
pub struct SuffixTree<'t> {
    text: &'t [u8],
    arena: Arena,
    stats: TreeStats,
}

impl<'t> SuffixTree<'t> {
    /// Build with the default configuration
    pub fn build(text: &'t [u8]) -> Result<Self, BuildError> {
        Self::build_with(text, &TreeConfig::default())
    }

    pub fn build_with(text: &'t [u8], config: &TreeConfig) -> Result<Self, BuildError> {
        check_len(text)?;
        Ok(Builder::new(text, config).run(None))
    }

    /// Build while reporting progress on a bar over the text length
    pub fn build_with_progress(text: &'t [u8], config: &TreeConfig) -> Result<Self, BuildError> {
        check_len(text)?;
        let bar = progress::symbol_bar(text.len());
        let tree = Builder::new(text, config).run(Some(&bar));
        bar.finish_and_clear();
        Ok(tree)
    }

    pub(crate) fn from_parts(text: &'t [u8], arena: Arena, stats: TreeStats) -> Self {
        Self { text, arena, stats }
    }

    pub fn root(&self) -> NodeRef {
        NodeRef::Branch(ROOT)
    }

    pub fn text(&self) -> &'t [u8] {
        self.text
    }

    /// Length of the text, terminator excluded
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Depth, head position and suffix link of a branch node
    pub fn branch_info(&self, offset: BranchOffset) -> BranchInfo {
        self.arena.resolve(offset)
    }

    /// Physical layout of a branch node
    pub fn layout(&self, offset: BranchOffset) -> Layout {
        self.arena.layout(offset)
    }

    pub fn first_child(&self, offset: BranchOffset) -> Option<NodeRef> {
        self.arena.first_child(offset)
    }

    pub fn next_sibling(&self, node: NodeRef) -> Option<NodeRef> {
        self.arena.sibling(node)
    }

    /// Children of a branch node in increasing order of first symbol
    pub fn children(&self, offset: BranchOffset) -> Children<'_, 't> {
        Children {
            tree: self,
            next: self.first_child(offset),
        }
    }

    /// Every branch node, in table order
    pub fn branches(&self) -> Branches<'_> {
        Branches {
            arena: &self.arena,
            offset: 0,
        }
    }

    /// Number of branch nodes per depth, the root included at depth 0
    pub fn depth_distribution(&self) -> Vec<u64> {
        let mut counts = vec![0u64; self.stats.max_depth as usize + 1];
        for offset in self.branches() {
            counts[self.branch_info(offset).depth as usize] += 1;
        }
        counts
    }

    /// Symbol at `pos`, with the terminator at the end of the text
    #[inline]
    pub fn symbol(&self, pos: usize) -> Symbol {
        self.text.get(pos).map_or(TERMINATOR, |&b| b as Symbol)
    }

    /// Depth of a node; a leaf is as deep as its suffix plus the terminator
    pub fn depth(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(leaf) => self.text.len() - leaf as usize + 1,
            NodeRef::Branch(offset) => self.branch_info(offset).depth as usize,
        }
    }

    /// String spelled from the root to `node`, terminator omitted
    pub fn spell(&self, node: NodeRef) -> &'t [u8] {
        match node {
            NodeRef::Leaf(leaf) => &self.text[leaf as usize..],
            NodeRef::Branch(offset) => {
                let info = self.branch_info(offset);
                let start = info.head_position as usize;
                &self.text[start..start + info.depth as usize]
            }
        }
    }
}

fn check_len(text: &[u8]) -> Result<(), BuildError> {
    if text.len() > MAX_TEXT_LEN {
        return Err(BuildError::TextTooLong {
            len: text.len(),
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

/// Iterator over the children of a branch node
pub struct Children<'a, 't> {
    tree: &'a SuffixTree<'t>,
    next: Option<NodeRef>,
}

impl Iterator for Children<'_, '_> {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Iterator over branch table slots
pub struct Branches<'a> {
    arena: &'a Arena,
    offset: BranchOffset,
}

impl Iterator for Branches<'_> {
    type Item = BranchOffset;

    fn next(&mut self) -> Option<BranchOffset> {
        if self.offset as usize >= self.arena.words().len() {
            return None;
        }
        let current = self.offset;
        self.offset += self.arena.layout(current).words();
        Some(current)
    }
}
