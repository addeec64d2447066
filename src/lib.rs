//! # mumtree - maximal matches with a compact suffix tree
//!
//! mumtree indexes a reference sequence in a space-efficient suffix tree
//! built with McCreight's algorithm and streams query sequences against it
//! to find maximal exact matches.
//!
//! ## Architecture
//!
//! - [`stree`] - suffix tree construction, scanning, traversal and checks
//! - [`matches`] - MUM candidates and maximal matches, optionally chunked
//! - [`seq`] - FASTA loading and multi-record references
//! - [`output`] - MUMmer-style text and JSON lines output
//! - [`utils`] - reverse complement, masking and progress bars
//!
//! ## Quick Start
//!
//! ```
//! use mumtree::matches::{find_matches, MatchMode};
//! use mumtree::stree::SuffixTree;
//!
//! let tree = SuffixTree::build(b"ttgattacagg").unwrap();
//! let found = find_matches(&tree, b"ccgattacacc", 5, MatchMode::MumCandidates);
//! assert_eq!(found.len(), 1);
//! assert_eq!((found[0].ref_start, found[0].query_start, found[0].length), (2, 2, 7));
//! ```
//!
//! ## Memory layout
//!
//! Branch nodes live in one `u32` table. Nodes whose depth and head
//! position follow from the next node in a suffix-link chain use three
//! words instead of five. `mumtree stats` reports the resulting footprint.

pub mod matches;
pub mod output;
pub mod seq;
pub mod stree;
pub mod utils;
