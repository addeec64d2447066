//! FASTA reader
//!
//! Files are memory mapped and split into lines with `memchr`. A record
//! starts at a line beginning with `>`; its name is the first word of that
//! line. Sequence lines are concatenated with whitespace removed and
//! letters lowercased.

use super::SeqError;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub name: String,
    pub seq: Vec<u8>,
}

impl FastaRecord {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Read every record of a FASTA file
pub fn read_fasta(path: &Path) -> Result<Vec<FastaRecord>, SeqError> {
    let io_err = |source| SeqError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    if file.metadata().map_err(io_err)?.len() == 0 {
        return Err(SeqError::Empty(path.to_path_buf()));
    }
    let mmap = unsafe { Mmap::map(&file).map_err(io_err)? };
    parse_fasta(&mmap)
}

/// Parse FASTA records from a buffer
pub fn parse_fasta(data: &[u8]) -> Result<Vec<FastaRecord>, SeqError> {
    let mut records: Vec<FastaRecord> = Vec::new();
    let mut start = 0;
    let mut line_no = 0;

    while start < data.len() {
        let end = memchr::memchr(b'\n', &data[start..]).map_or(data.len(), |i| start + i);
        let line = &data[start..end];
        start = end + 1;
        line_no += 1;

        if let Some(header) = line.strip_prefix(b">") {
            records.push(FastaRecord {
                name: record_name(header),
                seq: Vec::new(),
            });
            continue;
        }
        match records.last_mut() {
            Some(record) => append_sequence(&mut record.seq, line),
            None if line.iter().all(|b| b.is_ascii_whitespace()) => {}
            None => return Err(SeqError::MissingHeader { line: line_no }),
        }
    }

    if records.is_empty() {
        return Err(SeqError::NoRecords);
    }
    Ok(records)
}

fn record_name(header: &[u8]) -> String {
    let name = header
        .split(|b| b.is_ascii_whitespace())
        .find(|word| !word.is_empty())
        .unwrap_or_default();
    String::from_utf8_lossy(name).into_owned()
}

fn append_sequence(seq: &mut Vec<u8>, line: &[u8]) {
    // NUL is reserved as the record separator of a concatenated reference
    seq.extend(
        line.iter()
            .filter(|b| !b.is_ascii_whitespace() && **b != 0)
            .map(u8::to_ascii_lowercase),
    );
}
