//! Sequence input
//!
//! - [`fasta`] - memory-mapped FASTA parsing
//! - [`multiseq`] - several records concatenated into one indexable text

pub mod fasta;
pub mod multiseq;

pub use fasta::{parse_fasta, read_fasta, FastaRecord};
pub use multiseq::{MultiSeq, SeqRecord, SEPARATOR};

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load sequences
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeqError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is empty")]
    Empty(PathBuf),
    #[error("sequence data before the first header on line {line}")]
    MissingHeader { line: usize },
    #[error("no FASTA records found")]
    NoRecords,
}
