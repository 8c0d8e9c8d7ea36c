//! Kozak consensus compliance around the UTR/CDS junction.
//!
//! The junction is the last six UTR bases followed by the first six CDS bases. It is
//! compared against a twelve-letter consensus where uppercase letters are strictly
//! conserved and lowercase letters are weakly conserved. A strict mismatch fails the
//! check outright. A weak mismatch draws once from the checker's random stream and fails
//! with the configured probability.
//!
//! The stream is owned by the checker and seeded once, so a fixed seed and a fixed
//! candidate order always give the same answers.

use log::debug;
use rand::Rng;

use crate::error::{Result, UtrError};
use crate::pool::UtrOption;

/// Bases taken from each side of the UTR/CDS junction.
pub const JUNCTION_FLANK: usize = 6;

/// Consensus used when none is configured.
pub const DEFAULT_KOZAK_CONSENSUS: &str = "aAaAaAATGTCt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConsensusSite {
    base: u8,
    strict: bool,
}

fn parse_consensus(consensus: &str) -> Result<Vec<ConsensusSite>> {
    if consensus.len() != 2 * JUNCTION_FLANK {
        return Err(UtrError::InvalidConfig(format!(
            "Kozak consensus must have {} letters, got {}",
            2 * JUNCTION_FLANK,
            consensus.len()
        )));
    }
    consensus
        .bytes()
        .map(|b| match b {
            b'A' | b'C' | b'G' | b'T' => Ok(ConsensusSite { base: b, strict: true }),
            b'a' | b'c' | b'g' | b't' => Ok(ConsensusSite {
                base: b.to_ascii_uppercase(),
                strict: false,
            }),
            _ => Err(UtrError::InvalidConfig(format!(
                "Kozak consensus contains '{}'",
                b as char
            ))),
        })
        .collect()
}

pub struct KozakChecker<R> {
    sites: Vec<ConsensusSite>,
    weak_reject_probability: f64,
    rng: R,
}

impl<R: Rng> KozakChecker<R> {
    /// Build a checker over `consensus` that rejects weak mismatches with
    /// `weak_reject_probability`, drawing from `rng`.
    pub fn new(consensus: &str, weak_reject_probability: f64, rng: R) -> Result<Self> {
        if !(0.0..=1.0).contains(&weak_reject_probability) {
            return Err(UtrError::InvalidConfig(format!(
                "weak mismatch reject probability {} is outside [0, 1]",
                weak_reject_probability
            )));
        }
        Ok(Self {
            sites: parse_consensus(consensus)?,
            weak_reject_probability,
            rng,
        })
    }

    /// Check the junction formed by `option`'s UTR and the query `cds`.
    pub fn is_compliant(&mut self, option: &UtrOption, cds: &str) -> bool {
        self.check_junction(option.utr(), cds)
    }

    /// Check the junction formed by the tail of `utr` and the head of `cds`.
    ///
    /// Positions are visited left to right and the first failure ends the check, so a
    /// candidate consumes one draw per weak mismatch up to and including a rejecting one.
    pub fn check_junction(&mut self, utr: &str, cds: &str) -> bool {
        if utr.len() < JUNCTION_FLANK || cds.len() < JUNCTION_FLANK {
            debug!(
                "junction too short for Kozak check (utr {}, cds {})",
                utr.len(),
                cds.len()
            );
            return false;
        }
        let junction = utr.as_bytes()[utr.len() - JUNCTION_FLANK..]
            .iter()
            .chain(&cds.as_bytes()[..JUNCTION_FLANK]);

        for (pos, (&base, site)) in junction.zip(&self.sites).enumerate() {
            if base.to_ascii_uppercase() == site.base {
                continue;
            }
            if site.strict {
                debug!("strict Kozak mismatch at junction position {}", pos);
                return false;
            }
            if self.rng.gen_bool(self.weak_reject_probability) {
                debug!("weak Kozak mismatch at junction position {} rejected", pos);
                return false;
            }
        }
        true
    }
}
