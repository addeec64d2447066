//! McCreight's linear-time suffix tree construction
//!
//! Suffixes are inserted left to right. For each suffix the builder locates
//! its *head* (the longest prefix already in the tree) starting from the
//! head of the previous suffix, then hangs a new leaf below it, splitting an
//! edge with a new branch node when the head ends mid-edge.
//!
//! The branch node created for suffix `i` can only be classified once the
//! head of suffix `i + 1` is known: if that head is an existing node it
//! becomes the suffix link and the node is stored large; otherwise the link
//! is the very next slot and the node is stored small.

use super::arena::Arena;
use super::chain::Chain;
use super::types::*;
use super::SuffixTree;
use crate::utils::progress::ProgressBar;
use tracing::debug;

/// Inclusive text range of the part of the head that ends mid-edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: u32,
    end: u32,
}

impl Span {
    fn len(self) -> u32 {
        self.end - self.start + 1
    }
}

/// How the head of the next suffix is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Head is the root: start over one symbol further
    Descend,
    /// Head is a node: follow its suffix link, then scan
    FollowLink,
    /// Head is mid-edge below the root: drop the first symbol and rescan
    RescanFromRoot,
    /// Head is mid-edge below a node: follow the parent's link and rescan
    RescanFromLink,
}

pub(crate) struct Builder<'t> {
    text: &'t [u8],
    n: u32,
    arena: Arena,
    chain: Chain,
    /// Deepest node on the head path
    head_node: BranchOffset,
    head_depth: u32,
    /// Part of the head below `head_node`, if it ends mid-edge
    head_edge: Option<Span>,
    /// First text position not covered by the current head
    tail: u32,
    /// Node at the end of the edge `head_edge` lies on
    insert_node: Option<NodeRef>,
    /// Left neighbour of the insertion point among the head's children
    insert_prev: Option<NodeRef>,
    next_leaf: LeafIndex,
    /// Most recently allocated branch node
    last_branch: BranchOffset,
    last_depth: u32,
    last_head: u32,
    small_nodes: u64,
    large_nodes: u64,
    max_depth: u32,
}

impl<'t> Builder<'t> {
    pub fn new(text: &'t [u8], config: &TreeConfig) -> Self {
        let n = text.len() as u32;
        let mut arena = Arena::new(text.len(), config);

        let root = arena.alloc_branch(0, 0);
        arena.commit_large(root, ROOT);
        arena.push_leaf(None);
        if let Some(&first) = text.first() {
            arena.set_root_child(first, NodeRef::Leaf(0));
        }

        Self {
            text,
            n,
            arena,
            chain: Chain::new(config.max_chain),
            head_node: ROOT,
            head_depth: 0,
            head_edge: None,
            tail: 0,
            insert_node: None,
            insert_prev: None,
            next_leaf: 1,
            last_branch: ROOT,
            last_depth: 0,
            last_head: 0,
            small_nodes: 0,
            large_nodes: 1,
            max_depth: 0,
        }
    }

    /// Insert every remaining suffix and thread the root's children
    pub fn run(mut self, progress: Option<&ProgressBar>) -> SuffixTree<'t> {
        let tick = (self.n / 100).max(1);

        while self.tail < self.n || self.head_depth != 0 || self.head_edge.is_some() {
            match self.step() {
                Step::Descend => {
                    self.tail += 1;
                    self.scan_prefix();
                }
                Step::FollowLink => {
                    self.follow_link();
                    self.scan_prefix();
                }
                step @ (Step::RescanFromRoot | Step::RescanFromLink) => {
                    if step == Step::RescanFromLink {
                        self.follow_link();
                        self.rescan();
                    } else if let Some(span) = self.head_edge {
                        if span.start == span.end {
                            self.head_edge = None;
                        } else {
                            self.head_edge = Some(Span {
                                start: span.start + 1,
                                end: span.end,
                            });
                            self.rescan();
                        }
                    }
                    self.classify_last_branch();
                }
            }

            if self.head_edge.is_none() {
                self.insert_leaf();
            } else {
                self.insert_branch();
            }

            if let Some(bar) = progress {
                if self.next_leaf % tick == 0 {
                    bar.inc(tick as u64);
                }
            }
        }

        self.link_root_children();
        self.finish()
    }

    fn step(&self) -> Step {
        match (self.head_depth, self.head_edge) {
            (0, None) => Step::Descend,
            (_, None) => Step::FollowLink,
            (0, Some(_)) => Step::RescanFromRoot,
            (_, Some(_)) => Step::RescanFromLink,
        }
    }

    /// Symbol at `pos`, with the terminator at `n`
    #[inline]
    fn sym(&self, pos: u32) -> Symbol {
        if pos < self.n {
            self.text[pos as usize] as Symbol
        } else {
            TERMINATOR
        }
    }

    /// Depth and head position of a branch node, including nodes whose
    /// chain is still open. Pending nodes precede the most recent
    /// allocation, each one symbol deeper than its successor.
    fn depth_head(&self, offset: BranchOffset) -> (u32, u32) {
        if offset == self.last_branch {
            return (self.last_depth, self.last_head);
        }
        match self.arena.layout(offset) {
            Layout::Large { depth, head, .. } => (depth, head),
            Layout::Small { distance: 0 } => {
                debug_assert!(self.chain.contains(offset));
                let k = (self.last_branch - offset) / SMALL_WORDS;
                (self.last_depth + k, self.last_head - k)
            }
            Layout::Small { .. } => {
                let info = self.arena.resolve(offset);
                (info.depth, info.head_position)
            }
        }
    }

    fn follow_link(&mut self) {
        self.head_node = match self.arena.layout(self.head_node) {
            Layout::Large { link, .. } => link,
            Layout::Small { .. } => self.head_node + SMALL_WORDS,
        };
        self.head_depth -= 1;
    }

    /// Length of the common prefix of `text[from..to]` and the text after
    /// the tail symbol
    fn tail_lcp(&self, from: u32, to: u32) -> u32 {
        let edge = &self.text[from as usize..to as usize];
        let rest = &self.text[(self.tail + 1) as usize..];
        edge.iter().zip(rest).take_while(|(a, b)| a == b).count() as u32
    }

    /// Text offset where the edge into `child` starts, below a node of depth `depth`
    fn edge_start(&self, child: NodeRef, depth: u32) -> u32 {
        match child {
            NodeRef::Leaf(leaf) => depth + leaf,
            NodeRef::Branch(offset) => depth + self.depth_head(offset).1,
        }
    }

    /// Find the head location using first symbols only; the path is known
    /// to exist.
    fn rescan(&mut self) {
        let Some(mut span) = self.head_edge else {
            return;
        };

        if self.head_depth == 0 {
            let child = self.arena.root_child(self.text[span.start as usize]);
            let offset = match child {
                Some(NodeRef::Branch(offset)) => offset,
                _ => {
                    self.insert_node = child;
                    return;
                }
            };
            let (depth, _) = self.depth_head(offset);
            if depth > span.len() {
                self.insert_node = child;
                return;
            }
            self.head_node = offset;
            self.head_depth = depth;
            if depth == span.len() {
                self.head_edge = None;
                return;
            }
            span.start += depth;
        }

        loop {
            let wanted = self.sym(span.start);
            let mut prev = None;
            let mut cursor = self.arena.first_child(self.head_node);
            let offset = loop {
                let Some(child) = cursor else {
                    unreachable!("rescanned head is not in the tree");
                };
                if self.sym(self.edge_start(child, self.head_depth)) == wanted {
                    match child {
                        NodeRef::Branch(offset) => break offset,
                        NodeRef::Leaf(_) => {
                            self.insert_node = Some(child);
                            self.insert_prev = prev;
                            self.head_edge = Some(span);
                            return;
                        }
                    }
                }
                prev = Some(child);
                cursor = self.arena.sibling(child);
            };

            let (depth, _) = self.depth_head(offset);
            let edge_len = depth - self.head_depth;
            if edge_len > span.len() {
                self.insert_node = Some(NodeRef::Branch(offset));
                self.insert_prev = prev;
                self.head_edge = Some(span);
                return;
            }
            self.head_node = offset;
            self.head_depth = depth;
            if edge_len == span.len() {
                self.head_edge = None;
                return;
            }
            span.start += edge_len;
        }
    }

    /// Extend the head by comparing symbols of the tail against edge labels
    fn scan_prefix(&mut self) {
        if self.head_depth == 0 {
            if self.tail == self.n {
                self.head_edge = None;
                return;
            }
            let Some(child) = self.arena.root_child(self.text[self.tail as usize]) else {
                self.head_edge = None;
                return;
            };
            match child {
                NodeRef::Leaf(leaf) => {
                    let matched = 1 + self.tail_lcp(leaf + 1, self.n);
                    self.tail += matched;
                    self.head_edge = Some(Span {
                        start: leaf,
                        end: leaf + matched - 1,
                    });
                    self.insert_node = Some(child);
                    return;
                }
                NodeRef::Branch(offset) => {
                    let (depth, head) = self.depth_head(offset);
                    let matched = 1 + self.tail_lcp(head + 1, head + depth);
                    self.tail += matched;
                    if depth > matched {
                        self.head_edge = Some(Span {
                            start: head,
                            end: head + matched - 1,
                        });
                        self.insert_node = Some(child);
                        return;
                    }
                    self.head_node = offset;
                    self.head_depth = depth;
                }
            }
        }

        loop {
            let mut prev = None;
            let mut cursor = self.arena.first_child(self.head_node);

            if self.tail == self.n {
                // The new leaf spells only `$` below the head: it goes last
                while let Some(child) = cursor {
                    prev = Some(child);
                    cursor = self.arena.sibling(child);
                }
                self.insert_node = None;
                self.insert_prev = prev;
                self.head_edge = None;
                return;
            }

            let wanted = self.text[self.tail as usize] as Symbol;
            let mut found = None;
            while let Some(child) = cursor {
                let start = self.edge_start(child, self.head_depth);
                let symbol = self.sym(start);
                if symbol >= wanted {
                    if symbol == wanted {
                        found = Some((child, start));
                    }
                    break;
                }
                prev = Some(child);
                cursor = self.arena.sibling(child);
            }

            self.insert_prev = prev;
            let Some((child, start)) = found else {
                self.head_edge = None;
                return;
            };
            self.insert_node = Some(child);

            match child {
                NodeRef::Leaf(_) => {
                    let matched = 1 + self.tail_lcp(start + 1, self.n);
                    self.tail += matched;
                    self.head_edge = Some(Span {
                        start,
                        end: start + matched - 1,
                    });
                    return;
                }
                NodeRef::Branch(offset) => {
                    let (depth, _) = self.depth_head(offset);
                    let edge_len = depth - self.head_depth;
                    let matched = 1 + self.tail_lcp(start + 1, start + edge_len);
                    self.tail += matched;
                    if edge_len > matched {
                        self.head_edge = Some(Span {
                            start,
                            end: start + matched - 1,
                        });
                        return;
                    }
                    self.head_node = offset;
                    self.head_depth = depth;
                }
            }
        }
    }

    /// Decide the layout of the branch node inserted for the previous
    /// suffix, now that the head of the current one is known.
    fn classify_last_branch(&mut self) {
        let last = self.last_branch;
        if self.head_edge.is_none() {
            self.arena.commit_large(last, self.head_node);
            self.chain.close(&mut self.arena, last);
            self.large_nodes += 1;
            self.scan_prefix();
        } else if self.chain.is_full() {
            // The next node is created right away at the following slot
            self.arena.commit_large(last, last + LARGE_WORDS);
            self.chain.close(&mut self.arena, last);
            self.large_nodes += 1;
        } else {
            self.arena.commit_small(last);
            self.chain.begin_or_continue(last);
            self.small_nodes += 1;
        }
    }

    fn insert_leaf(&mut self) {
        let leaf = NodeRef::Leaf(self.next_leaf);
        if self.head_depth == 0 {
            if self.tail != self.n {
                self.arena.set_root_child(self.text[self.tail as usize], leaf);
            }
            self.arena.push_leaf(None);
        } else {
            let sibling = match self.insert_prev {
                None => {
                    let first = self.arena.first_child(self.head_node);
                    self.arena.set_first_child(self.head_node, Some(leaf));
                    first
                }
                Some(prev) => {
                    let next = self.arena.sibling(prev);
                    self.arena.set_sibling(prev, Some(leaf));
                    next
                }
            };
            self.arena.push_leaf(sibling);
        }
        self.next_leaf += 1;
    }

    fn insert_branch(&mut self) {
        let (Some(span), Some(old)) = (self.head_edge, self.insert_node) else {
            unreachable!("branch insertion without a split edge");
        };

        let depth = self.head_depth + span.len();
        let offset = self.arena.alloc_branch(depth, self.next_leaf);
        let branch = NodeRef::Branch(offset);

        if self.head_depth == 0 {
            self.arena.set_root_child(self.text[span.start as usize], branch);
        } else {
            match self.insert_prev {
                None => self.arena.set_first_child(self.head_node, Some(branch)),
                Some(prev) => self.arena.set_sibling(prev, Some(branch)),
            }
        }

        let leaf = NodeRef::Leaf(self.next_leaf);
        let inherited = self.arena.sibling(old);
        self.arena.set_sibling(branch, inherited);
        if self.sym(span.end + 1) < self.sym(self.tail) {
            self.arena.set_first_child(offset, Some(old));
            self.arena.set_sibling(old, Some(leaf));
            self.arena.push_leaf(None);
        } else {
            self.arena.set_first_child(offset, Some(leaf));
            self.arena.push_leaf(Some(old));
            self.arena.set_sibling(old, None);
        }

        self.last_branch = offset;
        self.last_depth = depth;
        self.last_head = self.next_leaf;
        self.max_depth = self.max_depth.max(depth);
        self.next_leaf += 1;
    }

    /// Turn the root dispatch table into an ordinary sibling list, with the
    /// `$` leaf last
    fn link_root_children(&mut self) {
        let mut prev: Option<NodeRef> = None;
        for byte in 0..=u8::MAX {
            let Some(child) = self.arena.root_child(byte) else {
                continue;
            };
            match prev {
                None => self.arena.set_first_child(ROOT, Some(child)),
                Some(p) => self.arena.set_sibling(p, Some(child)),
            }
            prev = Some(child);
        }

        let last = NodeRef::Leaf(self.n);
        match prev {
            None => self.arena.set_first_child(ROOT, Some(last)),
            Some(p) => self.arena.set_sibling(p, Some(last)),
        }
        self.arena.set_sibling(last, None);
    }

    fn finish(self) -> SuffixTree<'t> {
        debug_assert_eq!(self.chain.pending(), 0);
        let stats = TreeStats {
            text_len: self.n as u64,
            leaves: self.arena.leaf_count() as u64,
            branches: self.small_nodes + self.large_nodes,
            small_nodes: self.small_nodes,
            large_nodes: self.large_nodes,
            table_words: self.arena.words().len() as u64,
            growths: self.arena.growths(),
            max_depth: self.max_depth,
        };
        debug!(
            text_len = stats.text_len,
            branches = stats.branches,
            small = stats.small_nodes,
            large = stats.large_nodes,
            growths = stats.growths,
            "suffix tree built"
        );
        SuffixTree::from_parts(self.text, self.arena, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &[u8]) -> SuffixTree<'_> {
        Builder::new(text, &TreeConfig::default()).run(None)
    }

    #[test]
    fn test_banana_layout() {
        let tree = build(b"banana");
        let stats = tree.stats();
        assert_eq!(stats.leaves, 7);
        assert_eq!(stats.branches, 4);
        assert_eq!(stats.small_nodes, 2);

        // "ana" and "na" chain into the large node "a"
        assert_eq!(tree.layout(5), Layout::Small { distance: 2 });
        assert_eq!(tree.layout(8), Layout::Small { distance: 1 });
        assert_eq!(tree.layout(11), Layout::Large { depth: 1, head: 5, link: ROOT });
        assert_eq!(tree.branch_info(5).depth, 3);
        assert_eq!(tree.branch_info(5).head_position, 3);
        assert_eq!(tree.branch_info(8).suffix_link, 11);
    }

    #[test]
    fn test_repeated_symbol_chains() {
        let tree = build(b"aaaa");
        // "aaa", "aa" small, "a" large
        assert_eq!(tree.stats().small_nodes, 2);
        assert_eq!(tree.stats().large_nodes, 2);
        assert_eq!(tree.layout(5), Layout::Small { distance: 2 });
        assert_eq!(tree.layout(8), Layout::Small { distance: 1 });
        assert_eq!(tree.layout(11), Layout::Large { depth: 1, head: 3, link: ROOT });
        for (offset, depth) in [(5, 3), (8, 2), (11, 1)] {
            let info = tree.branch_info(offset);
            assert_eq!(info.depth, depth);
            assert_eq!(&tree.text()[info.head_position as usize..][..depth as usize], &b"aaaa"[..depth as usize]);
        }
    }

    #[test]
    fn test_chain_limit_forces_large_nodes() {
        let config = TreeConfig {
            max_chain: 1,
            ..TreeConfig::default()
        };
        let tree = Builder::new(b"aaaaaa", &config).run(None);
        let stats = tree.stats();
        assert!(stats.small_nodes > 0);
        assert!(stats.large_nodes > 2);
        tree.verify().unwrap();

        let config = TreeConfig {
            max_chain: 0,
            ..TreeConfig::default()
        };
        let tree = Builder::new(b"aaaaaa", &config).run(None);
        assert_eq!(tree.stats().small_nodes, 0);
        tree.verify().unwrap();
    }

    #[test]
    fn test_empty_and_single_symbol() {
        let tree = build(b"");
        assert_eq!(tree.stats().leaves, 1);
        assert_eq!(tree.first_child(ROOT), Some(NodeRef::Leaf(0)));

        let tree = build(b"x");
        assert_eq!(tree.stats().leaves, 2);
        let children: Vec<_> = tree.children(ROOT).collect();
        assert_eq!(children, vec![NodeRef::Leaf(0), NodeRef::Leaf(1)]);
    }
}
