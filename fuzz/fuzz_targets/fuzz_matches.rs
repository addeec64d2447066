#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mumtree::matches::{find_matches, find_matches_chunked, MatchMode};
use mumtree::stree::SuffixTree;

#[derive(Debug, Arbitrary)]
struct Input {
    reference: Vec<u8>,
    query: Vec<u8>,
    min_len: u8,
    chunks: u8,
    max_matches: bool,
}

fuzz_target!(|input: Input| {
    let tree = SuffixTree::build(&input.reference).unwrap();
    let mode = if input.max_matches {
        MatchMode::MaxMatches
    } else {
        MatchMode::MumCandidates
    };
    let min_len = usize::from(input.min_len % 16);
    let found = find_matches(&tree, &input.query, min_len, mode);
    for m in &found {
        assert!(m.length >= min_len.max(1));
        assert_eq!(
            &input.reference[m.ref_start..m.ref_start + m.length],
            &input.query[m.query_start..m.query_start + m.length]
        );
    }
    let chunked = find_matches_chunked(&tree, &input.query, min_len, mode, usize::from(input.chunks));
    assert_eq!(found, chunked);
});
