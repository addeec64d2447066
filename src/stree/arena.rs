//! Node storage: leaf table, branch table and root dispatch table
//!
//! Everything is addressed by offset, so growing the branch table never
//! invalidates a reference held by the builder.

use super::codec::{self, LARGE_BIT, NIL};
use super::types::*;
use tracing::trace;

/// Owns all node memory of one suffix tree
#[derive(Debug, Clone)]
pub struct Arena {
    /// Branch slots, packed back to back
    words: Vec<u32>,
    /// Next-sibling word of each leaf, indexed by leaf number
    leaves: Vec<u32>,
    /// Child of the root for each first byte
    root_children: Box<[u32; 256]>,
    /// Words added per growth
    extra: usize,
    growths: u32,
}

impl Arena {
    /// Size the tables for a text of `text_len` symbols
    pub fn new(text_len: usize, config: &TreeConfig) -> Self {
        let slots = SMALL_WORDS as usize * (text_len + 1);
        let min = SMALL_WORDS as usize * config.min_extra.max(1) as usize;

        let mut initial = (config.start_factor * slots as f64) as usize;
        if initial < min {
            initial = min;
        }
        let mut extra = (config.add_factor * slots as f64) as usize;
        if extra < min {
            extra = min;
        }

        Self {
            words: Vec::with_capacity(initial),
            leaves: Vec::with_capacity(text_len + 1),
            root_children: Box::new([NIL; 256]),
            extra,
            growths: 0,
        }
    }

    /// Make room for one more large slot
    fn reserve_slot(&mut self) {
        if self.words.capacity() - self.words.len() < LARGE_WORDS as usize {
            self.words.reserve_exact(self.extra);
            self.growths += 1;
            trace!(
                capacity = self.words.capacity(),
                growths = self.growths,
                "branch table grown"
            );
        }
    }

    /// Append a branch slot, tentatively large, and return its offset.
    /// The suffix link stays unset until the slot is committed.
    pub fn alloc_branch(&mut self, depth: u32, head: u32) -> BranchOffset {
        self.reserve_slot();
        let offset = self.words.len() as BranchOffset;
        self.words
            .extend_from_slice(&[NIL, NIL, codec::large_meta(depth), head, ROOT]);
        offset
    }

    /// Keep the most recent slot large with the given suffix link
    pub fn commit_large(&mut self, offset: BranchOffset, link: BranchOffset) {
        debug_assert_eq!(self.words.len(), (offset + LARGE_WORDS) as usize);
        self.words[(offset + codec::LINK) as usize] = link;
    }

    /// Shrink the most recent slot to a pending small node
    pub fn commit_small(&mut self, offset: BranchOffset) {
        debug_assert_eq!(self.words.len(), (offset + LARGE_WORDS) as usize);
        self.words[(offset + codec::META) as usize] = 0;
        self.words.truncate((offset + SMALL_WORDS) as usize);
    }

    pub fn set_distance(&mut self, offset: BranchOffset, distance: u32) {
        debug_assert!(distance > 0 && distance < LARGE_BIT);
        self.words[(offset + codec::META) as usize] = distance;
    }

    /// Append the next leaf with the given sibling
    pub fn push_leaf(&mut self, sibling: Option<NodeRef>) -> LeafIndex {
        let leaf = self.leaves.len() as LeafIndex;
        self.leaves.push(codec::encode_opt(sibling));
        leaf
    }

    #[inline]
    pub fn first_child(&self, offset: BranchOffset) -> Option<NodeRef> {
        codec::decode(self.words[(offset + codec::CHILD) as usize])
    }

    #[inline]
    pub fn set_first_child(&mut self, offset: BranchOffset, child: Option<NodeRef>) {
        self.words[(offset + codec::CHILD) as usize] = codec::encode_opt(child);
    }

    #[inline]
    pub fn sibling(&self, node: NodeRef) -> Option<NodeRef> {
        codec::decode(match node {
            NodeRef::Leaf(leaf) => self.leaves[leaf as usize],
            NodeRef::Branch(offset) => self.words[(offset + codec::SIBLING) as usize],
        })
    }

    #[inline]
    pub fn set_sibling(&mut self, node: NodeRef, sibling: Option<NodeRef>) {
        let word = codec::encode_opt(sibling);
        match node {
            NodeRef::Leaf(leaf) => self.leaves[leaf as usize] = word,
            NodeRef::Branch(offset) => self.words[(offset + codec::SIBLING) as usize] = word,
        }
    }

    #[inline]
    pub fn root_child(&self, byte: u8) -> Option<NodeRef> {
        codec::decode(self.root_children[byte as usize])
    }

    #[inline]
    pub fn set_root_child(&mut self, byte: u8, child: NodeRef) {
        self.root_children[byte as usize] = codec::encode(child);
    }

    #[inline]
    pub fn layout(&self, offset: BranchOffset) -> Layout {
        codec::decode_layout(&self.words, offset)
    }

    #[inline]
    pub fn resolve(&self, offset: BranchOffset) -> BranchInfo {
        codec::resolve(&self.words, offset)
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn growths(&self) -> u32 {
        self.growths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> TreeConfig {
        TreeConfig {
            start_factor: 0.0,
            add_factor: 0.0,
            min_extra: 2,
            max_chain: 255,
        }
    }

    #[test]
    fn test_alloc_and_commit() {
        let mut arena = Arena::new(10, &TreeConfig::default());
        let root = arena.alloc_branch(0, 0);
        arena.commit_large(root, ROOT);
        let small = arena.alloc_branch(3, 7);
        arena.commit_small(small);
        let large = arena.alloc_branch(2, 8);
        arena.commit_large(large, ROOT);

        assert_eq!(small, LARGE_WORDS);
        assert_eq!(large, LARGE_WORDS + SMALL_WORDS);
        assert_eq!(arena.layout(small), Layout::Small { distance: 0 });
        arena.set_distance(small, 1);
        assert_eq!(arena.resolve(small).depth, 3);
        assert_eq!(arena.resolve(small).head_position, 7);
        assert_eq!(arena.words().len(), (2 * LARGE_WORDS + SMALL_WORDS) as usize);
    }

    #[test]
    fn test_growth_keeps_offsets() {
        let mut arena = Arena::new(100, &tiny());
        let mut offsets = Vec::new();
        for depth in 0..20 {
            let offset = arena.alloc_branch(depth, depth);
            arena.commit_large(offset, ROOT);
            offsets.push(offset);
        }
        assert!(arena.growths() >= 2);
        for (depth, offset) in offsets.into_iter().enumerate() {
            assert_eq!(arena.resolve(offset).depth, depth as u32);
        }
    }

    #[test]
    fn test_sibling_words() {
        let mut arena = Arena::new(4, &TreeConfig::default());
        let root = arena.alloc_branch(0, 0);
        arena.commit_large(root, ROOT);
        let a = arena.push_leaf(None);
        let b = arena.push_leaf(Some(NodeRef::Leaf(a)));
        assert_eq!(arena.sibling(NodeRef::Leaf(b)), Some(NodeRef::Leaf(a)));
        arena.set_sibling(NodeRef::Leaf(a), Some(NodeRef::Branch(root)));
        assert_eq!(arena.sibling(NodeRef::Leaf(a)), Some(NodeRef::Branch(root)));
        arena.set_root_child(b'x', NodeRef::Leaf(b));
        assert_eq!(arena.root_child(b'x'), Some(NodeRef::Leaf(b)));
        assert_eq!(arena.root_child(b'y'), None);
    }
}
