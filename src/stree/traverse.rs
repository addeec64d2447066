//! Iterative depth-first traversal

use super::types::*;
use super::SuffixTree;
use std::convert::Infallible;

/// Whether to walk below a branch node just entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Continue,
    /// Skip the subtree; `exit` is not called for this node
    Skip,
}

/// Callbacks of a depth-first walk. Returning an error aborts the walk.
pub trait Visitor {
    type Error;

    /// Called before the children of a branch node
    fn enter(&mut self, _branch: BranchOffset) -> Result<Descend, Self::Error> {
        Ok(Descend::Continue)
    }

    /// Called for each leaf, with the branch node it hangs from unless the
    /// walk started at the leaf itself
    fn leaf(&mut self, leaf: LeafIndex, parent: Option<BranchOffset>) -> Result<(), Self::Error>;

    /// Called after the children of a branch node
    fn exit(&mut self, _branch: BranchOffset) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct Frame {
    node: BranchOffset,
    next: Option<NodeRef>,
}

impl SuffixTree<'_> {
    /// Walk the subtree below `start` in sibling order, `start` included
    pub fn depth_first<V: Visitor>(&self, start: NodeRef, visitor: &mut V) -> Result<(), V::Error> {
        let root = match start {
            NodeRef::Leaf(leaf) => return visitor.leaf(leaf, None),
            NodeRef::Branch(offset) => offset,
        };
        if visitor.enter(root)? == Descend::Skip {
            return Ok(());
        }

        let mut stack = vec![Frame {
            node: root,
            next: self.first_child(root),
        }];
        while let Some(frame) = stack.last_mut() {
            let Some(child) = frame.next else {
                let node = frame.node;
                stack.pop();
                visitor.exit(node)?;
                continue;
            };
            frame.next = self.next_sibling(child);
            let parent = frame.node;

            match child {
                NodeRef::Leaf(leaf) => visitor.leaf(leaf, Some(parent))?,
                NodeRef::Branch(offset) => {
                    if visitor.enter(offset)? == Descend::Continue {
                        stack.push(Frame {
                            node: offset,
                            next: self.first_child(offset),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf numbers below `start`, in lexicographic order of their suffixes
    pub fn leaves_below(&self, start: NodeRef) -> Vec<LeafIndex> {
        struct Collect(Vec<LeafIndex>);

        impl Visitor for Collect {
            type Error = Infallible;

            fn leaf(&mut self, leaf: LeafIndex, _parent: Option<BranchOffset>) -> Result<(), Infallible> {
                self.0.push(leaf);
                Ok(())
            }
        }

        let mut collect = Collect(Vec::new());
        let Ok(()) = self.depth_first(start, &mut collect);
        collect.0
    }
}
