//! Forbidden-sequence screening.
//!
//! The selection engine only needs a pass/fail answer per UTR, expressed by the
//! [`ForbiddenSequenceOracle`] trait. [`MotifBlocklist`] is the stock implementation: it
//! rejects cloning restriction sites, the polyadenylation signal and long homopolymer
//! runs.

use log::debug;

use crate::error::Result;
use crate::sequence::{reverse_complement, validate_nucleotides};

/// Pass/fail screen over a nucleotide sequence.
pub trait ForbiddenSequenceOracle: Send + Sync {
    /// One-time setup before the first [`check`](Self::check).
    fn initiate(&mut self) -> Result<()> {
        Ok(())
    }

    /// `Ok(true)` when `seq` is acceptable. Fails with `InvalidAlphabet` on anything other
    /// than `A`, `T`, `C`, `G`.
    fn check(&self, seq: &str) -> Result<bool>;
}

/// Which strands a motif is searched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strands {
    Both,
    /// Top strand only; the reverse complement of the motif is tolerated.
    Forward,
}

/// Motifs loaded by [`MotifBlocklist::initiate`].
pub const DEFAULT_FORBIDDEN_MOTIFS: &[(&str, &str, Strands)] = &[
    ("EcoRI", "GAATTC", Strands::Both),
    ("BamHI", "GGATCC", Strands::Both),
    ("HindIII", "AAGCTT", Strands::Both),
    ("PstI", "CTGCAG", Strands::Both),
    ("SpeI", "ACTAGT", Strands::Both),
    ("XbaI", "TCTAGA", Strands::Both),
    ("XhoI", "CTCGAG", Strands::Both),
    ("NotI", "GCGGCCGC", Strands::Both),
    ("BsaI", "GGTCTC", Strands::Both),
    ("BsmBI", "CGTCTC", Strands::Both),
    // GCAGGT on the top strand is accepted.
    ("BfuAI", "ACCTGC", Strands::Forward),
    ("polyA signal", "AATAAA", Strands::Both),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Motif {
    name: String,
    bases: String,
    strands: Strands,
}

/// Homopolymer runs at least this long are rejected.
pub const DEFAULT_MAX_HOMOPOLYMER: usize = 8;

#[derive(Debug, Clone)]
pub struct MotifBlocklist {
    motifs: Vec<Motif>,
    max_homopolymer: usize,
}

impl Default for MotifBlocklist {
    fn default() -> Self {
        Self {
            motifs: Vec::new(),
            max_homopolymer: DEFAULT_MAX_HOMOPOLYMER,
        }
    }
}

impl MotifBlocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add named motifs, searched on both strands, on top of whatever the blocklist
    /// already holds.
    pub fn with_motifs<I, N, M>(mut self, motifs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, M)>,
        N: Into<String>,
        M: Into<String>,
    {
        for (name, motif) in motifs {
            let motif = motif.into();
            validate_nucleotides(&motif)?;
            self.motifs.push(Motif {
                name: name.into(),
                bases: motif,
                strands: Strands::Both,
            });
        }
        Ok(self)
    }

    /// Reject homopolymer runs of `len` or more. Zero disables the rule.
    pub fn with_max_homopolymer(mut self, len: usize) -> Self {
        self.max_homopolymer = len;
        self
    }

    fn homopolymer_at_least(&self, seq: &[u8]) -> bool {
        if self.max_homopolymer == 0 {
            return false;
        }
        let mut run = 0;
        let mut prev = None;
        for &b in seq {
            run = if prev == Some(b) { run + 1 } else { 1 };
            prev = Some(b);
            if run >= self.max_homopolymer {
                return true;
            }
        }
        false
    }

    fn motif_hit<'a>(&'a self, forward: &str, reverse: &str) -> Option<&'a str> {
        self.motifs
            .iter()
            .filter(|m| !m.bases.is_empty())
            .find(|m| {
                forward.contains(m.bases.as_str())
                    || (m.strands == Strands::Both && reverse.contains(m.bases.as_str()))
            })
            .map(|m| m.name.as_str())
    }
}

impl ForbiddenSequenceOracle for MotifBlocklist {
    fn initiate(&mut self) -> Result<()> {
        for &(name, bases, strands) in DEFAULT_FORBIDDEN_MOTIFS {
            if !self.motifs.iter().any(|m| m.bases == bases) {
                self.motifs.push(Motif {
                    name: name.to_string(),
                    bases: bases.to_string(),
                    strands,
                });
            }
        }
        Ok(())
    }

    fn check(&self, seq: &str) -> Result<bool> {
        let rc = reverse_complement(seq)?;
        if self.homopolymer_at_least(seq.as_bytes()) {
            debug!("forbidden homopolymer run in {}", seq);
            return Ok(false);
        }
        if let Some(name) = self.motif_hit(seq, &rc) {
            debug!("forbidden {} site in {}", name, seq);
            return Ok(false);
        }
        Ok(true)
    }
}
