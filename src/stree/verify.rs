//! Structural checks of a finished tree

use super::types::*;
use super::{SuffixTree, Visitor};
use thiserror::Error;

/// First violated tree invariant found by [`SuffixTree::verify`]
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerifyError {
    #[error("leaf {0} is reached more than once")]
    LeafRepeated(LeafIndex),
    #[error("leaf {0} is not reachable from the root")]
    LeafMissing(LeafIndex),
    #[error("branch {0} is reached more than once")]
    BranchRepeated(BranchOffset),
    #[error("branch {0} is not reachable from the root")]
    BranchMissing(BranchOffset),
    #[error("small node {0} was never assigned a distance")]
    PendingSmall(BranchOffset),
    #[error("branch table ends in small node {0}")]
    TrailingSmall(BranchOffset),
    #[error("branch {branch} has {children} children")]
    TooFewChildren { branch: BranchOffset, children: usize },
    #[error("empty edge below branch {0}")]
    EmptyEdge(BranchOffset),
    #[error("children of branch {0} are not strictly ordered")]
    SiblingOrder(BranchOffset),
    #[error("child {child:?} does not extend the string of branch {parent}")]
    EdgeLabel { parent: BranchOffset, child: NodeRef },
    #[error("suffix link of branch {branch} has depth {found}, expected {expected}")]
    LinkDepth { branch: BranchOffset, expected: u32, found: u32 },
    #[error("suffix link of branch {0} spells the wrong string")]
    LinkString(BranchOffset),
}

/// Marks every reachable node and checks edges on the way
struct Walk<'a, 't> {
    tree: &'a SuffixTree<'t>,
    leaf_seen: Vec<bool>,
    branch_seen: Vec<bool>,
}

impl Walk<'_, '_> {
    fn check_children(&self, branch: BranchOffset) -> Result<(), VerifyError> {
        let tree = self.tree;
        let info = tree.branch_info(branch);
        let depth = info.depth as usize;
        let parent = &tree.text()[info.head_position as usize..][..depth];

        let mut children = 0;
        let mut last: Option<Symbol> = None;
        for child in tree.children(branch) {
            children += 1;
            let start = match child {
                NodeRef::Leaf(leaf) => leaf as usize,
                NodeRef::Branch(offset) => {
                    if tree.branch_info(offset).depth as usize <= depth {
                        return Err(VerifyError::EmptyEdge(branch));
                    }
                    tree.branch_info(offset).head_position as usize
                }
            };
            if tree.text().get(start..start + depth) != Some(parent) {
                return Err(VerifyError::EdgeLabel { parent: branch, child });
            }
            let symbol = tree.symbol(start + depth);
            if last.is_some_and(|prev| prev >= symbol) {
                return Err(VerifyError::SiblingOrder(branch));
            }
            last = Some(symbol);
        }

        // only the root of the empty text has a single child
        let needed = if branch == ROOT && tree.is_empty() { 1 } else { 2 };
        if children < needed {
            return Err(VerifyError::TooFewChildren { branch, children });
        }
        Ok(())
    }
}

impl Visitor for Walk<'_, '_> {
    type Error = VerifyError;

    fn enter(&mut self, branch: BranchOffset) -> Result<super::Descend, VerifyError> {
        let seen = &mut self.branch_seen[branch as usize];
        if *seen {
            return Err(VerifyError::BranchRepeated(branch));
        }
        *seen = true;
        self.check_children(branch)?;
        Ok(super::Descend::Continue)
    }

    fn leaf(&mut self, leaf: LeafIndex, _parent: Option<BranchOffset>) -> Result<(), VerifyError> {
        let seen = &mut self.leaf_seen[leaf as usize];
        if *seen {
            return Err(VerifyError::LeafRepeated(leaf));
        }
        *seen = true;
        Ok(())
    }
}

impl SuffixTree<'_> {
    /// Check every structural invariant of the tree
    pub fn verify(&self) -> Result<(), VerifyError> {
        let words = self.arena.words().len();

        let mut last = ROOT;
        for offset in self.branches() {
            if self.layout(offset) == (Layout::Small { distance: 0 }) {
                return Err(VerifyError::PendingSmall(offset));
            }
            last = offset;
        }
        if matches!(self.layout(last), Layout::Small { .. }) {
            return Err(VerifyError::TrailingSmall(last));
        }

        let mut walk = Walk {
            tree: self,
            leaf_seen: vec![false; self.len() + 1],
            branch_seen: vec![false; words],
        };
        self.depth_first(self.root(), &mut walk)?;

        if let Some(leaf) = walk.leaf_seen.iter().position(|seen| !seen) {
            return Err(VerifyError::LeafMissing(leaf as LeafIndex));
        }
        for offset in self.branches() {
            if !walk.branch_seen[offset as usize] {
                return Err(VerifyError::BranchMissing(offset));
            }
            if offset == ROOT {
                continue;
            }
            let info = self.branch_info(offset);
            let link = self.branch_info(info.suffix_link);
            if link.depth + 1 != info.depth {
                return Err(VerifyError::LinkDepth {
                    branch: offset,
                    expected: info.depth - 1,
                    found: link.depth,
                });
            }
            let own = &self.spell(NodeRef::Branch(offset))[1..];
            if self.spell(NodeRef::Branch(info.suffix_link)) != own {
                return Err(VerifyError::LinkString(offset));
            }
        }
        Ok(())
    }
}
