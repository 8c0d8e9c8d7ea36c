//! Nucleotide primitives: alphabet checks, reverse complement and codon translation.

use crate::error::{Result, UtrError};

/// Residue emitted for stop codons.
pub const STOP: char = '_';

/// Standard genetic code, indexed by `16 * b1 + 4 * b2 + b3` with T=0, C=1, A=2, G=3.
const CODON_TABLE: &[u8; 64] =
    b"FFLLSSSSYY__CC_WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

#[inline]
fn base_index(base: u8) -> Option<usize> {
    match base {
        b'T' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Returns an error naming the first byte of `seq` outside `{A,T,C,G}`.
pub fn validate_nucleotides(seq: &str) -> Result<()> {
    match seq
        .char_indices()
        .find(|(_, c)| !matches!(c, 'A' | 'T' | 'C' | 'G'))
    {
        Some((pos, c)) => Err(UtrError::InvalidAlphabet(format!(
            "'{}' at position {}; only A, T, C, G are allowed",
            c, pos
        ))),
        None => Ok(()),
    }
}

/// Reverse complement of a DNA sequence.
///
/// Applying it twice returns the input, and the output always has the input's length.
pub fn reverse_complement(seq: &str) -> Result<String> {
    validate_nucleotides(seq)?;
    Ok(seq
        .bytes()
        .rev()
        .map(|b| match b {
            b'A' => 'T',
            b'T' => 'A',
            b'C' => 'G',
            _ => 'C',
        })
        .collect())
}

/// Translate a DNA sequence into its protein sequence using the standard code.
///
/// Stop codons become [`STOP`]. The sequence must contain only `A`, `T`, `C`, `G` and
/// its length must be a multiple of three.
pub fn translate(seq: &str) -> Result<String> {
    validate_nucleotides(seq)?;
    if seq.len() % 3 != 0 {
        return Err(UtrError::InvalidLength(format!(
            "length {} is not a multiple of three",
            seq.len()
        )));
    }

    Ok(seq
        .as_bytes()
        .chunks_exact(3)
        .map(|codon| {
            let idx = codon
                .iter()
                .try_fold(0usize, |acc, &b| base_index(b).map(|i| acc * 4 + i));
            idx.and_then(|i| CODON_TABLE.get(i))
                .map_or(STOP, |&aa| aa as char)
        })
        .collect())
}
