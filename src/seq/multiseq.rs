//! Several sequences indexed as one text

use super::FastaRecord;
use serde::Serialize;

/// Byte placed between records. It never occurs in parsed sequences, so no
/// match crosses a record boundary.
pub const SEPARATOR: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeqRecord {
    pub name: String,
    /// Offset of the record in the concatenated text
    pub start: usize,
    pub len: usize,
}

/// Records concatenated with [`SEPARATOR`] between them
#[derive(Debug, Clone, Default)]
pub struct MultiSeq {
    text: Vec<u8>,
    records: Vec<SeqRecord>,
}

impl MultiSeq {
    pub fn from_records(records: &[FastaRecord]) -> Self {
        let total = records.iter().map(|r| r.len() + 1).sum::<usize>();
        let mut text = Vec::with_capacity(total.saturating_sub(1));
        let mut index = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                text.push(SEPARATOR);
            }
            index.push(SeqRecord {
                name: record.name.clone(),
                start: text.len(),
                len: record.len(),
            });
            text.extend_from_slice(&record.seq);
        }
        Self { text, records: index }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn records(&self) -> &[SeqRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record index and offset within that record of a text position, or
    /// `None` for separators and positions past the end
    pub fn locate(&self, pos: usize) -> Option<(usize, usize)> {
        let idx = self.records.partition_point(|r| r.start <= pos).checked_sub(1)?;
        let offset = pos - self.records[idx].start;
        (offset < self.records[idx].len).then_some((idx, offset))
    }
}
