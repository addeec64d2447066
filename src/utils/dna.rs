//! Nucleotide helpers for lowercased sequences

/// Replacement for non-`acgt` reference bytes in nucleotides-only mode
pub const REFERENCE_MASK: u8 = b'#';
/// Replacement for non-`acgt` query bytes in nucleotides-only mode
pub const QUERY_MASK: u8 = b'%';

#[inline]
pub fn complement(base: u8) -> u8 {
    match base {
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        other => other,
    }
}

/// Reverse complement; bytes other than `acgt` are kept as they are
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

#[inline]
pub fn is_nucleotide(b: u8) -> bool {
    matches!(b, b'a' | b'c' | b'g' | b't')
}

/// Overwrite every non-`acgt` byte with `mask`. Reference and query use
/// different masks so that masked positions never match each other.
pub fn mask_non_acgt(seq: &mut [u8], mask: u8) {
    for b in seq.iter_mut().filter(|b| !is_nucleotide(**b)) {
        *b = mask;
    }
}
