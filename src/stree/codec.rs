//! Bit-level encoding of node references and branch slots
//!
//! A reference word is either [`NIL`], a leaf (`LEAF_BIT | leaf`) or a
//! branch offset. A branch slot starts with three words shared by both
//! layouts:
//!
//! ```text
//! small:  [first child] [next sibling] [distance]
//! large:  [first child] [next sibling] [LARGE_BIT | depth] [head] [link]
//! ```

use super::types::*;

/// Absent reference
pub const NIL: u32 = u32::MAX;

/// Tag bit marking a reference word as a leaf
pub const LEAF_BIT: u32 = 1 << 31;

/// Tag bit marking a branch slot as large
pub const LARGE_BIT: u32 = 1 << 31;

/// Slot word holding the first child
pub const CHILD: u32 = 0;
/// Slot word holding the next sibling
pub const SIBLING: u32 = 1;
/// Slot word holding the distance or the tagged depth
pub const META: u32 = 2;
/// Large-slot word holding the head position
pub const HEAD: u32 = 3;
/// Large-slot word holding the suffix link
pub const LINK: u32 = 4;

#[inline]
pub fn encode(node: NodeRef) -> u32 {
    match node {
        NodeRef::Leaf(leaf) => {
            debug_assert!(leaf < LEAF_BIT, "leaf index overflows tag bit");
            LEAF_BIT | leaf
        }
        NodeRef::Branch(offset) => {
            debug_assert!(offset < LEAF_BIT, "branch offset overflows tag bit");
            offset
        }
    }
}

#[inline]
pub fn encode_opt(node: Option<NodeRef>) -> u32 {
    node.map_or(NIL, encode)
}

#[inline]
pub fn decode(word: u32) -> Option<NodeRef> {
    if word == NIL {
        None
    } else if word & LEAF_BIT != 0 {
        Some(NodeRef::Leaf(word & !LEAF_BIT))
    } else {
        Some(NodeRef::Branch(word))
    }
}

/// Word of the tagged depth of a large node
#[inline]
pub fn large_meta(depth: u32) -> u32 {
    debug_assert!(depth < LARGE_BIT);
    LARGE_BIT | depth
}

/// Physical layout of the slot at `offset`
#[inline]
pub fn decode_layout(words: &[u32], offset: BranchOffset) -> Layout {
    let base = offset as usize;
    let meta = words[base + META as usize];
    if meta & LARGE_BIT != 0 {
        Layout::Large {
            depth: meta & !LARGE_BIT,
            head: words[base + HEAD as usize],
            link: words[base + LINK as usize],
        }
    } else {
        Layout::Small { distance: meta }
    }
}

/// Logical fields of a finished branch node.
///
/// Small nodes are resolved through the large node ending their chain.
/// Pending small nodes only exist during construction and are a
/// precondition violation here.
pub fn resolve(words: &[u32], offset: BranchOffset) -> BranchInfo {
    match decode_layout(words, offset) {
        Layout::Large { depth, head, link } => BranchInfo {
            depth,
            head_position: head,
            suffix_link: link,
        },
        Layout::Small { distance } => {
            debug_assert!(distance > 0, "pending small node at {offset}");
            let large = offset + distance * SMALL_WORDS;
            let Layout::Large { depth, head, .. } = decode_layout(words, large) else {
                panic!("small node at {offset} does not end in a large node");
            };
            BranchInfo {
                depth: depth + distance,
                head_position: head - distance,
                suffix_link: offset + SMALL_WORDS,
            }
        }
    }
}
