//! Shared helpers
//!
//! - [`dna`] - reverse complement and nucleotide masking
//! - [`progress`] - progress bars, no-op without the `progress` feature

pub mod dna;
pub mod progress;

pub use dna::{mask_non_acgt, reverse_complement};
