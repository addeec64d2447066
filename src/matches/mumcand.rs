//! MUM candidates via matching statistics
//!
//! For each query position `q` the location of the longest prefix of
//! `query[q..]` occurring in the reference is maintained incrementally:
//! from the location for `q`, the suffix link gives the location of the
//! same string minus its first symbol, and scanning resumes where the
//! previous match stopped. A match is reported when it is long enough,
//! ends inside a leaf edge (so the string occurs once in the reference)
//! and cannot be extended to the left.

use super::{is_left_maximal, Match};
use crate::stree::SuffixTree;
use std::ops::Range;

/// Maximal matches of at least `min_len` symbols that are unique in the
/// reference, in query order
pub fn find_mum_candidates(tree: &SuffixTree<'_>, query: &[u8], min_len: usize) -> Vec<Match> {
    mum_candidates_in(tree, query, 0..query.len(), min_len)
}

/// Candidates starting at query positions in `range`. Matches may extend
/// past the end of the range.
pub(crate) fn mum_candidates_in(
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

    let text = tree.text();
    let root = tree.root();
    let (mut loc, _) = tree.scan_prefix(root, &query[range.start..]);

    for q in range.clone() {
        let len = loc.matched_length();
        if len >= min_len && loc.is_leaf() && is_left_maximal(text, query, loc.matched_start(), q) {
            found.push(Match {
                query_start: q,
                ref_start: loc.matched_start(),
                length: len,
            });
        }

        if q + 1 == range.end {
            break;
        }
        loc = if loc.is_root() {
            tree.scan_prefix(root, &query[q + 1..]).0
        } else {
            let linked = tree.link(&loc);
            let resume = q + 1 + linked.matched_length();
            tree.scan_from(&linked, &query[resume..], 0).0
        };
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(reference: &[u8], query: &[u8], min_len: usize) -> Vec<Match> {
        let lcp = |i: usize, q: usize| {
            reference[i..]
                .iter()
                .zip(&query[q..])
                .take_while(|(a, b)| a == b)
                .count()
        };
        let mut out = Vec::new();
        for q in 0..query.len() {
            let best = (0..reference.len()).map(|i| lcp(i, q)).max().unwrap_or(0);
            if best < min_len.max(1) {
                continue;
            }
            let hits: Vec<usize> = (0..reference.len()).filter(|&i| lcp(i, q) >= best).collect();
            if hits.len() == 1 && is_left_maximal(reference, query, hits[0], q) {
                out.push(Match { query_start: q, ref_start: hits[0], length: best });
            }
        }
        out
    }

    #[test]
    fn test_simple_candidates() {
        let reference = b"xxacgtacgaxx";
        let query = b"ggacgtacgagg";
        let tree = SuffixTree::build(reference).unwrap();
        let found = find_mum_candidates(&tree, query, 5);
        assert_eq!(found, vec![Match { query_start: 2, ref_start: 2, length: 8 }]);
    }

    #[test]
    fn test_repeated_reference_string_is_not_unique() {
        let reference = b"acgtccacgt";
        let tree = SuffixTree::build(reference).unwrap();
        assert!(find_mum_candidates(&tree, b"tacgtg", 4).is_empty());
    }

    #[test]
    fn test_matches_brute_force() {
        let reference = b"gattacagattacccagtgatcgattgacagt";
        let query = b"cagattgacagatcgattacagtgatc";
        let tree = SuffixTree::build(reference).unwrap();
        for min_len in 1..6 {
            assert_eq!(
                find_mum_candidates(&tree, query, min_len),
                brute_force(reference, query, min_len),
                "min_len {min_len}"
            );
        }
    }

    #[test]
    fn test_empty_inputs() {
        let tree = SuffixTree::build(b"").unwrap();
        assert!(find_mum_candidates(&tree, b"acgt", 1).is_empty());
        let tree = SuffixTree::build(b"acgt").unwrap();
        assert!(find_mum_candidates(&tree, b"", 1).is_empty());
    }
}
