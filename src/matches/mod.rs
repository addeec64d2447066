//! Match extraction between an indexed reference and a query
//!
//! - [`find_mum_candidates`] - maximal matches unique in the reference
//! - [`find_maximal_matches`] - every maximal match of a minimum length
//!
//! Both have chunked variants that split the query positions into
//! contiguous ranges and process them on the rayon pool. The tree is
//! read-only after construction, so all workers share it.

mod maxmatch;
mod mumcand;

pub use maxmatch::find_maximal_matches;
pub use mumcand::find_mum_candidates;

use crate::stree::SuffixTree;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An exact match `reference[ref_start..][..length] == query[query_start..][..length]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Match {
    pub query_start: usize,
    pub ref_start: usize,
    pub length: usize,
}

/// Which matches to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Maximal matches whose string occurs once in the reference
    #[default]
    MumCandidates,
    /// All maximal matches
    MaxMatches,
}

/// Find matches of at least `min_len` symbols
pub fn find_matches(tree: &SuffixTree<'_>, query: &[u8], min_len: usize, mode: MatchMode) -> Vec<Match> {
    match mode {
        MatchMode::MumCandidates => find_mum_candidates(tree, query, min_len),
        MatchMode::MaxMatches => find_maximal_matches(tree, query, min_len),
    }
}

/// Like [`find_matches`], with the query positions split into `chunks`
/// ranges processed in parallel. The result is identical to the
/// sequential one.
pub fn find_matches_chunked(
    tree: &SuffixTree<'_>,
    query: &[u8],
    min_len: usize,
    mode: MatchMode,
    chunks: usize,
) -> Vec<Match> {
    let ranges = split_positions(query.len(), chunks);
    if ranges.len() <= 1 {
        return find_matches(tree, query, min_len, mode);
    }
    ranges
        .into_par_iter()
        .map(|range| match mode {
            MatchMode::MumCandidates => mumcand::mum_candidates_in(tree, query, range, min_len),
            MatchMode::MaxMatches => maxmatch::maximal_matches_in(tree, query, range, min_len),
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// Split `0..len` into at most `chunks` contiguous, nearly equal ranges
pub fn split_positions(len: usize, chunks: usize) -> Vec<Range<usize>> {
    let chunks = chunks.clamp(1, len.max(1));
    let base = len / chunks;
    let extra = len % chunks;
    let mut ranges = Vec::with_capacity(chunks);
    let mut start = 0;
    for i in 0..chunks {
        let end = start + base + usize::from(i < extra);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// The match at `query_start`/`ref_start` cannot be extended to the left
#[inline]
pub(crate) fn is_left_maximal(text: &[u8], query: &[u8], ref_start: usize, query_start: usize) -> bool {
    ref_start == 0 || query_start == 0 || text[ref_start - 1] != query[query_start - 1]
}
