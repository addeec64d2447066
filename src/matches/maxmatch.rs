//! All maximal matches of a minimum length
//!
//! A seed location spelling the next `min_len` query symbols is slid along
//! the query with suffix links. Where it exists, scanning on from the seed
//! finds the longest match of the query suffix, skipping the symbols the
//! previous position already proved to occur, and records the branch nodes
//! passed. A depth-first walk below the seed then reports every leaf. The
//! common prefix of a node with the query is read off that path: nodes on
//! it are matched completely, the node just below the end of the match
//! shares the match length, and every other node inherits its parent's.

use super::{is_left_maximal, Match};
use crate::stree::{
    BranchOffset, Descend, LeafIndex, Location, NodeRef, Position, SuffixTree, Visitor,
};
use std::convert::Infallible;
use std::ops::Range;

/// Maximal matches of at least `min_len` symbols, grouped by query position
/// and ordered lexicographically by reference suffix within a group
pub fn find_maximal_matches(tree: &SuffixTree<'_>, query: &[u8], min_len: usize) -> Vec<Match> {
    maximal_matches_in(tree, query, 0..query.len(), min_len)
}

pub(crate) fn maximal_matches_in(
    tree: &SuffixTree<'_>,
    query: &[u8],
    range: Range<usize>,
    min_len: usize,
) -> Vec<Match> {
    let min_len = min_len.max(1);
    let mut found = Vec::new();
    if range.is_empty() {
        return found;
    }
    let root = tree.root();
    let seed_end = |q: usize| (q + min_len).min(query.len());
    let mut seed = tree.scan_prefix(root, &query[range.start..seed_end(range.start)]).0;
    // Query positions before this end are covered by a known match
    let mut covered = range.start;
    let mut path = Vec::new();
    let mut stack = Vec::new();

    for q in range.clone() {
        if q + min_len > query.len() {
            break;
        }
        if seed.matched_length() == min_len {
            path.clear();
            if let Position::Node(offset) = seed.pos {
                path.push(offset);
            }
            let known = covered.saturating_sub(q);
            let (best, _) = tree.scan_path(&seed, &query[q + min_len..], known, &mut path);
            covered = covered.max(q + best.matched_length());

            stack.clear();
            let mut collector = Collector {
                tree,
                query,
                q,
                best,
                path: &path,
                stack: &mut stack,
                found: &mut found,
            };
            let Ok(()) = tree.depth_first(seed.next_node(), &mut collector);
        }
        if q + 1 == range.end {
            break;
        }
        seed = if seed.is_root() {
            tree.scan_prefix(root, &query[q + 1..seed_end(q + 1)]).0
        } else {
            let linked = tree.link(&seed);
            let resume = q + 1 + linked.matched_length();
            tree.scan_from(&linked, &query[resume..seed_end(q + 1)], 0).0
        };
    }
    found
}

struct Collector<'a, 't> {
    tree: &'a SuffixTree<'t>,
    query: &'a [u8],
    q: usize,
    /// End of the longest match of `query[q..]`
    best: Location,
    /// Branch nodes matched completely, starting at the walk's root
    path: &'a [BranchOffset],
    /// `(common prefix with the query, on path)` per open branch node
    stack: &'a mut Vec<(usize, bool)>,
    found: &'a mut Vec<Match>,
}

impl Collector<'_, '_> {
    fn common(&self, node: NodeRef) -> (usize, bool) {
        let parent = self.stack.last().copied();
        if let Some((common, false)) = parent {
            return (common, false);
        }
        if let NodeRef::Branch(offset) = node {
            if self.path.get(self.stack.len()) == Some(&offset) {
                return (self.tree.depth(node), true);
            }
        }
        if self.best.next_node() == node {
            return (self.best.matched_length(), false);
        }
        let common = parent.map_or(self.best.matched_length(), |(common, _)| common);
        (common, false)
    }
}

impl Visitor for Collector<'_, '_> {
    type Error = Infallible;

    fn enter(&mut self, branch: BranchOffset) -> Result<Descend, Infallible> {
        let state = self.common(NodeRef::Branch(branch));
        self.stack.push(state);
        Ok(Descend::Continue)
    }

    fn leaf(&mut self, leaf: LeafIndex, _parent: Option<BranchOffset>) -> Result<(), Infallible> {
        let start = leaf as usize;
        if is_left_maximal(self.tree.text(), self.query, start, self.q) {
            let (length, _) = self.common(NodeRef::Leaf(leaf));
            self.found.push(Match {
                query_start: self.q,
                ref_start: start,
                length,
            });
        }
        Ok(())
    }

    fn exit(&mut self, _branch: BranchOffset) -> Result<(), Infallible> {
        self.stack.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(reference: &[u8], query: &[u8], min_len: usize) -> Vec<Match> {
        let mut out = Vec::new();
        for q in 0..query.len() {
            for i in 0..reference.len() {
                let length = reference[i..]
                    .iter()
                    .zip(&query[q..])
                    .take_while(|(a, b)| a == b)
                    .count();
                if length >= min_len.max(1) && is_left_maximal(reference, query, i, q) {
                    out.push(Match { query_start: q, ref_start: i, length });
                }
            }
        }
        out.sort();
        out
    }

    #[test]
    fn test_repeats_reported_everywhere() {
        let reference = b"acgtTacgtGacgt";
        let query = b"CacgtA";
        let tree = SuffixTree::build(reference).unwrap();
        let mut found = find_maximal_matches(&tree, query, 4);
        found.sort();
        assert_eq!(
            found,
            vec![
                Match { query_start: 1, ref_start: 0, length: 4 },
                Match { query_start: 1, ref_start: 5, length: 4 },
                Match { query_start: 1, ref_start: 10, length: 4 },
            ]
        );
    }

    #[test]
    fn test_matches_brute_force() {
        let reference = b"gattacagattacccagtgatcgattgacagtgattaca";
        let query = b"cagattgacagatcgattacagtgatcgattaca";
        let tree = SuffixTree::build(reference).unwrap();
        for min_len in 1..7 {
            let mut found = find_maximal_matches(&tree, query, min_len);
            found.sort();
            assert_eq!(found, brute_force(reference, query, min_len), "min_len {min_len}");
        }
    }

    /// Pseudo-random DNA from a linear congruential generator
    fn random_dna(len: usize, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                b"acgt"[(state >> 62) as usize]
            })
            .collect()
    }

    #[test]
    fn test_long_self_match() {
        // Every query position matches the whole rest of the text, so
        // comparing from scratch per position would be quadratic
        let text = random_dna(200_000, 3);
        let tree = SuffixTree::build(&text).unwrap();
        let found = find_maximal_matches(&tree, &text, 40);
        assert!(found.contains(&Match { query_start: 0, ref_start: 0, length: text.len() }));
        for m in &found {
            assert!(m.length >= 40);
            assert_eq!(
                &text[m.ref_start..m.ref_start + m.length],
                &text[m.query_start..m.query_start + m.length]
            );
            assert!(is_left_maximal(&text, &text, m.ref_start, m.query_start));
        }
        // Off the diagonal, only left-maximal position pairs are reported
        assert!(found.iter().all(|m| m.query_start == 0 || m.ref_start != m.query_start));
    }

    #[test]
    fn test_seed_at_branch_node() {
        // The seed "ana" ends exactly at a branch node of banana
        let tree = SuffixTree::build(b"banana").unwrap();
        let mut found = find_maximal_matches(&tree, b"xanax", 3);
        found.sort();
        assert_eq!(
            found,
            vec![
                Match { query_start: 1, ref_start: 1, length: 3 },
                Match { query_start: 1, ref_start: 3, length: 3 },
            ]
        );
    }

    #[test]
    fn test_query_shorter_than_min_len() {
        let tree = SuffixTree::build(b"acgtacgt").unwrap();
        assert!(find_maximal_matches(&tree, b"acg", 4).is_empty());
    }
}
