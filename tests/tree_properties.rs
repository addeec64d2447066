//! Property-based tests for the suffix tree and match extraction.
//!
//! Every property is checked against a brute-force oracle on short texts
//! over small alphabets, where repeats and nested chains are frequent. One
//! alphabet spans the whole byte range, separator included.

use mumtree::matches::{find_matches, find_matches_chunked, Match, MatchMode};
use mumtree::stree::{NodeRef, Position, SuffixTree, TreeConfig, TERMINATOR};
use proptest::prelude::*;

// ============================================================================
//  Strategies
// ============================================================================

/// Text over a three-letter alphabet
fn small_text(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"acg".to_vec()), 0..max)
}

/// DNA-like text, mostly `acgt` with an occasional `n`
fn dna_text(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"aaccggttn".to_vec()), 0..max)
}

/// Text over the separator byte, a letter and the top byte value, to
/// exercise root dispatch and child order at the ends of the byte range
fn byte_extremes_text(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![0x00u8, 0x61, 0xff]), 0..max)
}

fn chain_config() -> impl Strategy<Value = TreeConfig> {
    (0u32..4, prop::bool::ANY).prop_map(|(max_chain, tiny)| TreeConfig {
        max_chain,
        start_factor: if tiny { 0.0 } else { 0.5 },
        add_factor: if tiny { 0.0 } else { 0.05 },
        min_extra: if tiny { 2 } else { 16 },
    })
}

// ============================================================================
//  Oracles
// ============================================================================

/// Suffix start positions in lexicographic order, `$` sorting last
fn sorted_suffixes(text: &[u8]) -> Vec<u32> {
    let key = |i: usize| {
        let mut k: Vec<u16> = text[i..].iter().map(|&b| u16::from(b)).collect();
        k.push(TERMINATOR);
        k
    };
    let mut order: Vec<usize> = (0..=text.len()).collect();
    order.sort_by_key(|&i| key(i));
    order.into_iter().map(|i| i as u32).collect()
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Longest prefix of `pattern` occurring in `text`
fn longest_occurring_prefix(text: &[u8], pattern: &[u8]) -> usize {
    (0..=text.len())
        .map(|i| common_prefix(&text[i..], pattern))
        .max()
        .unwrap_or(0)
}

fn left_maximal(reference: &[u8], query: &[u8], r: usize, q: usize) -> bool {
    r == 0 || q == 0 || reference[r - 1] != query[q - 1]
}

fn oracle_maximal_matches(reference: &[u8], query: &[u8], min_len: usize) -> Vec<Match> {
    let mut out = Vec::new();
    for q in 0..query.len() {
        for r in 0..reference.len() {
            let length = common_prefix(&reference[r..], &query[q..]);
            if length >= min_len && left_maximal(reference, query, r, q) {
                out.push(Match { query_start: q, ref_start: r, length });
            }
        }
    }
    out
}

fn oracle_mum_candidates(reference: &[u8], query: &[u8], min_len: usize) -> Vec<Match> {
    let mut out = Vec::new();
    for q in 0..query.len() {
        let lengths: Vec<usize> = (0..reference.len())
            .map(|r| common_prefix(&reference[r..], &query[q..]))
            .collect();
        let best = lengths.iter().copied().max().unwrap_or(0);
        if best < min_len {
            continue;
        }
        let hits: Vec<usize> = (0..reference.len()).filter(|&r| lengths[r] == best).collect();
        if hits.len() == 1 && left_maximal(reference, query, hits[0], q) {
            out.push(Match { query_start: q, ref_start: hits[0], length: best });
        }
    }
    out
}

// ============================================================================
//  Construction Properties
// ============================================================================

proptest! {
    /// Every tree passes the structural checks, whatever the chain limit and
    /// growth policy.
    #[test]
    fn built_trees_verify(text in small_text(80), config in chain_config()) {
        let tree = SuffixTree::build_with(&text, &config).unwrap();
        prop_assert_eq!(tree.verify(), Ok(()));
        prop_assert_eq!(tree.stats().leaves as usize, text.len() + 1);
    }

    #[test]
    fn byte_extreme_trees_verify(text in byte_extremes_text(80), config in chain_config()) {
        let tree = SuffixTree::build_with(&text, &config).unwrap();
        prop_assert_eq!(tree.verify(), Ok(()));
        prop_assert_eq!(tree.leaves_below(tree.root()), sorted_suffixes(&text));
    }

    /// A depth-first walk yields the suffixes in sorted order.
    #[test]
    fn leaves_in_suffix_order(text in small_text(60)) {
        let tree = SuffixTree::build(&text).unwrap();
        prop_assert_eq!(tree.leaves_below(tree.root()), sorted_suffixes(&text));
    }

    /// Each leaf spells its suffix.
    #[test]
    fn leaves_spell_suffixes(text in dna_text(60)) {
        let tree = SuffixTree::build(&text).unwrap();
        for leaf in tree.leaves_below(tree.root()) {
            prop_assert_eq!(
                tree.spell(NodeRef::Leaf(leaf)),
                &text[leaf as usize..]
            );
        }
    }

    /// Chain limits and growth only change node layouts, never the strings
    /// the nodes spell.
    #[test]
    fn config_does_not_change_shape(text in small_text(60), config in chain_config()) {
        let plain = SuffixTree::build(&text).unwrap();
        let other = SuffixTree::build_with(&text, &config).unwrap();
        let spelled = |tree: &SuffixTree<'_>| {
            let mut strings: Vec<Vec<u8>> = tree
                .branches()
                .map(|b| tree.spell(NodeRef::Branch(b)).to_vec())
                .collect();
            strings.sort();
            strings
        };
        prop_assert_eq!(spelled(&plain), spelled(&other));
        prop_assert_eq!(plain.stats().branches, other.stats().branches);
    }
}

// ============================================================================
//  Query Properties
// ============================================================================

proptest! {
    /// The scanned length is the longest prefix of the pattern occurring in
    /// the text, and the location spells that prefix.
    #[test]
    fn scan_matches_brute_force(text in small_text(60), pattern in small_text(12)) {
        let tree = SuffixTree::build(&text).unwrap();
        let (loc, rest) = tree.scan_prefix(tree.root(), &pattern);
        let expected = longest_occurring_prefix(&text, &pattern);
        prop_assert_eq!(loc.matched_length(), expected);
        prop_assert_eq!(rest.is_none(), expected == pattern.len());
        prop_assert_eq!(
            &text[loc.matched_start()..loc.matched_start() + expected],
            &pattern[..expected]
        );
        if let Position::Edge { remain, .. } = loc.pos {
            prop_assert!(remain >= 1);
        }
    }

    /// Scanning the matched prefix again lands on the same location.
    #[test]
    fn scan_is_idempotent(text in small_text(60), pattern in small_text(12)) {
        let tree = SuffixTree::build(&text).unwrap();
        let (loc, _) = tree.scan_prefix(tree.root(), &pattern);
        let (again, rest) = tree.scan_prefix(tree.root(), &pattern[..loc.matched_length()]);
        prop_assert_eq!(rest, None);
        prop_assert_eq!(again.pos, loc.pos);
        prop_assert_eq!(again.matched_length(), loc.matched_length());
    }

    /// Following a link drops exactly the first symbol.
    #[test]
    fn link_drops_first_symbol(text in small_text(60), pattern in small_text(12)) {
        let tree = SuffixTree::build(&text).unwrap();
        let (loc, _) = tree.scan_prefix(tree.root(), &pattern);
        prop_assume!(!loc.is_root());
        let linked = tree.link(&loc);
        prop_assert_eq!(linked.matched_length() + 1, loc.matched_length());
        let spelled = |start: usize, len: usize| &text[start..start + len];
        prop_assert_eq!(
            spelled(linked.matched_start(), linked.matched_length()),
            spelled(loc.matched_start() + 1, linked.matched_length())
        );
        let (rescanned, _) = tree.scan_prefix(tree.root(), &pattern[1..loc.matched_length()]);
        prop_assert_eq!(linked.pos, rescanned.pos);
    }
}

// ============================================================================
//  Match Properties
// ============================================================================

proptest! {
    #[test]
    fn mum_candidates_match_oracle(
        reference in small_text(70),
        query in small_text(40),
        min_len in 1usize..6,
    ) {
        let tree = SuffixTree::build(&reference).unwrap();
        prop_assert_eq!(
            find_matches(&tree, &query, min_len, MatchMode::MumCandidates),
            oracle_mum_candidates(&reference, &query, min_len)
        );
    }

    #[test]
    fn byte_extreme_mum_candidates_match_oracle(
        reference in byte_extremes_text(70),
        query in byte_extremes_text(40),
        min_len in 1usize..6,
    ) {
        let tree = SuffixTree::build(&reference).unwrap();
        prop_assert_eq!(
            find_matches(&tree, &query, min_len, MatchMode::MumCandidates),
            oracle_mum_candidates(&reference, &query, min_len)
        );
        let mut found = find_matches(&tree, &query, min_len, MatchMode::MaxMatches);
        found.sort();
        let mut expected = oracle_maximal_matches(&reference, &query, min_len);
        expected.sort();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn maximal_matches_match_oracle(
        reference in small_text(70),
        query in small_text(40),
        min_len in 1usize..6,
    ) {
        let tree = SuffixTree::build(&reference).unwrap();
        let mut found = find_matches(&tree, &query, min_len, MatchMode::MaxMatches);
        found.sort();
        let mut expected = oracle_maximal_matches(&reference, &query, min_len);
        expected.sort();
        prop_assert_eq!(found, expected);
    }

    /// Queries sharing long stretches with the reference, where matches
    /// run past each other and scanning skips symbols already known
    #[test]
    fn maximal_matches_on_shared_text(
        reference in small_text(70),
        cut in 0usize..70,
        edit in 0usize..70,
        min_len in 1usize..6,
    ) {
        let mut query = reference[cut.min(reference.len())..].to_vec();
        query.extend_from_slice(&reference);
        if !query.is_empty() {
            let at = edit % query.len();
            query[at] = b't';
        }
        let tree = SuffixTree::build(&reference).unwrap();
        let mut found = find_matches(&tree, &query, min_len, MatchMode::MaxMatches);
        found.sort();
        let mut expected = oracle_maximal_matches(&reference, &query, min_len);
        expected.sort();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn chunked_equals_sequential(
        reference in dna_text(80),
        query in dna_text(60),
        min_len in 1usize..5,
        chunks in 1usize..9,
    ) {
        let tree = SuffixTree::build(&reference).unwrap();
        for mode in [MatchMode::MumCandidates, MatchMode::MaxMatches] {
            prop_assert_eq!(
                find_matches_chunked(&tree, &query, min_len, mode, chunks),
                find_matches(&tree, &query, min_len, mode)
            );
        }
    }
}
