//! Locations and the primitives that move them: scan, rescan and link

use super::types::*;
use super::SuffixTree;

/// Where a location sits in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Exactly at a branch node
    Node(BranchOffset),
    /// Strictly inside the edge from `parent` to `target`
    Edge {
        parent: BranchOffset,
        target: NodeRef,
        /// Text offset where the edge label starts
        first: u32,
        /// Edge label length; for leaf edges this counts the terminator
        edge_len: u32,
        /// Symbols of the label not yet matched, at least 1
        remain: u32,
    },
}

/// A possibly mid-edge position in the tree, together with the string it
/// spells: `text[start..start + length]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: u32,
    pub length: u32,
    pub pos: Position,
}

impl Location {
    fn node(offset: BranchOffset, info: &BranchInfo) -> Self {
        Self {
            start: info.head_position,
            length: info.depth,
            pos: Position::Node(offset),
        }
    }

    pub fn matched_length(&self) -> usize {
        self.length as usize
    }

    pub fn matched_start(&self) -> usize {
        self.start as usize
    }

    /// True if the location lies on an edge leading to a leaf, i.e. the
    /// spelled string occurs exactly once in the text
    pub fn is_leaf(&self) -> bool {
        matches!(self.pos, Position::Edge { target: NodeRef::Leaf(_), .. })
    }

    pub fn is_root(&self) -> bool {
        self.pos == Position::Node(ROOT)
    }

    /// Unmatched symbols left on the current edge, 0 at a node
    pub fn remain(&self) -> usize {
        match self.pos {
            Position::Node(_) => 0,
            Position::Edge { remain, .. } => remain as usize,
        }
    }

    /// The node at or just below the location
    pub fn next_node(&self) -> NodeRef {
        match self.pos {
            Position::Node(offset) => NodeRef::Branch(offset),
            Position::Edge { target, .. } => target,
        }
    }
}

/// Length of the common prefix of two byte strings
#[inline]
fn lcp(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl<'t> SuffixTree<'t> {
    fn expect_branch(node: NodeRef) -> BranchOffset {
        match node {
            NodeRef::Branch(offset) => offset,
            NodeRef::Leaf(leaf) => panic!("cannot descend from leaf {leaf}"),
        }
    }

    /// Text from `pos` on, empty past the end
    #[inline]
    fn text_from(&self, pos: usize) -> &'t [u8] {
        self.text().get(pos..).unwrap_or_default()
    }

    /// Child of `offset` (at depth `depth`) whose edge starts with `byte`,
    /// with the text offset of its edge label
    pub(crate) fn child_starting_with(
        &self,
        offset: BranchOffset,
        depth: u32,
        byte: u8,
    ) -> Option<(NodeRef, u32)> {
        if offset == ROOT {
            let child = self.arena.root_child(byte)?;
            let first = match child {
                NodeRef::Leaf(leaf) => leaf,
                NodeRef::Branch(b) => self.branch_info(b).head_position,
            };
            return Some((child, first));
        }

        let wanted = byte as Symbol;
        for child in self.children(offset) {
            let first = match child {
                NodeRef::Leaf(leaf) => depth + leaf,
                NodeRef::Branch(b) => depth + self.branch_info(b).head_position,
            };
            let symbol = self.symbol(first as usize);
            if symbol == wanted {
                return Some((child, first));
            }
            if symbol > wanted {
                break;
            }
        }
        None
    }

    /// Descend from a branch node as far as `pattern` matches.
    ///
    /// Returns the location reached and the index of the first unmatched
    /// pattern byte, or `None` if the whole pattern was matched.
    pub fn scan_prefix(&self, node: NodeRef, pattern: &[u8]) -> (Location, Option<usize>) {
        self.scan_prefix_skipping(node, pattern, 0)
    }

    /// Like [`scan_prefix`](Self::scan_prefix), with the caller vouching
    /// that the first `known` symbols of the full string (node string
    /// followed by `pattern`) occur in the text, so they are not compared.
    pub fn scan_prefix_skipping(
        &self,
        node: NodeRef,
        pattern: &[u8],
        known: usize,
    ) -> (Location, Option<usize>) {
        self.descend(node, pattern, known, None)
    }

    /// Scan loop shared by the public scans. Every branch node reached by
    /// consuming a whole edge is appended to `path`.
    fn descend(
        &self,
        node: NodeRef,
        pattern: &[u8],
        known: usize,
        mut path: Option<&mut Vec<BranchOffset>>,
    ) -> (Location, Option<usize>) {
        let mut current = Self::expect_branch(node);
        let info = self.branch_info(current);
        let mut depth = info.depth;
        let mut loc = Location::node(current, &info);
        let mut skip = known.saturating_sub(depth as usize).min(pattern.len());
        let mut p = 0;

        loop {
            if p == pattern.len() {
                return (loc, None);
            }
            let Some((child, first)) = self.child_starting_with(current, depth, pattern[p]) else {
                return (loc, Some(p));
            };
            let rest = &pattern[p..];
            let label = self.text_from(first as usize);

            let edge_len = match child {
                NodeRef::Leaf(leaf) => self.len() as u32 - (depth + leaf) + 1,
                NodeRef::Branch(b) => self.branch_info(b).depth - depth,
            } as usize;
            let label = &label[..label.len().min(edge_len)];

            let matched = if skip >= edge_len {
                skip -= edge_len;
                edge_len
            } else if skip > 0 {
                let m = skip + lcp(&rest[skip..], &label[skip..]);
                skip = 0;
                m
            } else {
                1 + lcp(&rest[1..], &label[1..])
            };

            if matched == edge_len {
                // Only branch edges can be consumed: leaf labels end in `$`
                let NodeRef::Branch(b) = child else {
                    unreachable!("pattern consumed a leaf edge");
                };
                if let Some(path) = path.as_deref_mut() {
                    path.push(b);
                }
                let info = self.branch_info(b);
                p += edge_len;
                depth = info.depth;
                current = b;
                loc = Location::node(b, &info);
                continue;
            }

            let start = match child {
                NodeRef::Leaf(leaf) => leaf,
                NodeRef::Branch(b) => self.branch_info(b).head_position,
            };
            let loc = Location {
                start,
                length: depth + matched as u32,
                pos: Position::Edge {
                    parent: current,
                    target: child,
                    first,
                    edge_len: edge_len as u32,
                    remain: (edge_len - matched) as u32,
                },
            };
            let unmatched = p + matched;
            return (loc, (unmatched < pattern.len()).then_some(unmatched));
        }
    }

    /// Continue scanning `pattern` from a location that may be mid-edge.
    /// `known` counts symbols of the full string known to occur, as in
    /// [`scan_prefix_skipping`](Self::scan_prefix_skipping).
    pub fn scan_from(&self, loc: &Location, pattern: &[u8], known: usize) -> (Location, Option<usize>) {
        self.resume(loc, pattern, known, None)
    }

    /// Like [`scan_from`](Self::scan_from), appending each branch node whose
    /// string is matched completely on the way down to `path`, in order.
    /// The node `loc` sits at is not included.
    pub fn scan_path(
        &self,
        loc: &Location,
        pattern: &[u8],
        known: usize,
        path: &mut Vec<BranchOffset>,
    ) -> (Location, Option<usize>) {
        self.resume(loc, pattern, known, Some(path))
    }

    fn resume(
        &self,
        loc: &Location,
        pattern: &[u8],
        known: usize,
        mut path: Option<&mut Vec<BranchOffset>>,
    ) -> (Location, Option<usize>) {
        let Position::Edge {
            parent,
            target,
            first,
            edge_len,
            remain,
        } = loc.pos
        else {
            return self.descend(loc.next_node(), pattern, known, path);
        };

        let skip = known.saturating_sub(loc.length as usize).min(pattern.len());
        let consumed = (edge_len - remain) as usize;
        let label = self.text_from(first as usize + consumed);
        let label = &label[..label.len().min(remain as usize)];

        let matched = if skip >= remain as usize {
            remain as usize
        } else {
            skip + lcp(&pattern[skip..], &label[skip..])
        };

        if matched < remain as usize {
            let out = Location {
                start: loc.start,
                length: loc.length + matched as u32,
                pos: Position::Edge {
                    parent,
                    target,
                    first,
                    edge_len,
                    remain: remain - matched as u32,
                },
            };
            return (out, (matched < pattern.len()).then_some(matched));
        }

        // Consuming a leaf edge is impossible, it ends in the terminator
        let NodeRef::Branch(reached) = target else {
            unreachable!("pattern consumed a leaf edge");
        };
        if let Some(path) = path.as_deref_mut() {
            path.push(reached);
        }
        let (out, unmatched) = self.descend(target, &pattern[matched..], known, path);
        (out, unmatched.map(|i| i + matched))
    }

    /// Locate `pattern` below `node` comparing only the first symbol of each
    /// edge. The caller guarantees the path exists; a missing path panics.
    pub fn rescan(&self, node: NodeRef, pattern: &[u8]) -> Location {
        let mut current = Self::expect_branch(node);
        let info = self.branch_info(current);
        let mut depth = info.depth;
        let mut loc = Location::node(current, &info);
        let mut p = 0;

        while p < pattern.len() {
            let Some((child, first)) = self.child_starting_with(current, depth, pattern[p]) else {
                panic!("rescan: no edge for symbol {:#04x} below node {current}", pattern[p]);
            };
            let rest = (pattern.len() - p) as u32;
            let (edge_len, start) = match child {
                NodeRef::Leaf(leaf) => (self.len() as u32 - (depth + leaf) + 1, leaf),
                NodeRef::Branch(b) => {
                    let info = self.branch_info(b);
                    (info.depth - depth, info.head_position)
                }
            };

            if edge_len > rest {
                return Location {
                    start,
                    length: depth + rest,
                    pos: Position::Edge {
                        parent: current,
                        target: child,
                        first,
                        edge_len,
                        remain: edge_len - rest,
                    },
                };
            }
            let NodeRef::Branch(b) = child else {
                panic!("rescan: pattern runs past the end of leaf edge");
            };
            let info = self.branch_info(b);
            p += edge_len as usize;
            depth = info.depth;
            current = b;
            loc = Location::node(b, &info);
        }
        loc
    }

    /// Location of the string of `loc` without its first symbol.
    ///
    /// At a node this is the suffix link. Mid-edge, the consumed part of the
    /// edge is rescanned from the parent's suffix link, or from the root
    /// minus one symbol when the parent is the root.
    pub fn link(&self, loc: &Location) -> Location {
        match loc.pos {
            Position::Node(offset) => {
                assert!(offset != ROOT, "the root has no suffix link");
                let target = self.branch_info(offset).suffix_link;
                debug_assert_eq!(self.branch_info(target).depth + 1, loc.length);
                Location {
                    start: loc.start + 1,
                    length: loc.length - 1,
                    pos: Position::Node(target),
                }
            }
            Position::Edge {
                parent,
                first,
                edge_len,
                remain,
                ..
            } => {
                let consumed = (edge_len - remain) as usize;
                let first = first as usize;
                let text = self.text();
                if parent == ROOT {
                    if consumed == 1 {
                        return Location {
                            start: loc.start + 1,
                            length: 0,
                            pos: Position::Node(ROOT),
                        };
                    }
                    self.rescan(self.root(), &text[first + 1..first + consumed])
                } else {
                    let link = self.branch_info(parent).suffix_link;
                    self.rescan(NodeRef::Branch(link), &text[first..first + consumed])
                }
            }
        }
    }
}
