//! Stem-loop (hairpin) detection.
//!
//! This is a density heuristic rather than a structure prediction: every start position is
//! paired with every downstream window whose loop length falls within bounds, and each
//! window whose stem is the reverse complement of the first stem is counted. Overlapping
//! hairpins that share bases are all counted.

use std::fmt::Write;

use crate::error::{Result, UtrError};
use crate::sequence::reverse_complement;

/// Stem and loop constraints for hairpin enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HairpinParams {
    /// Number of bases in each stem.
    pub min_stem: usize,
    /// Shortest loop, in bases, between the two stems.
    pub min_loop: usize,
    /// Longest loop, in bases, between the two stems.
    pub max_loop: usize,
}

impl Default for HairpinParams {
    fn default() -> Self {
        Self {
            min_stem: 3,
            min_loop: 4,
            max_loop: 9,
        }
    }
}

impl HairpinParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_stem == 0 {
            return Err(UtrError::InvalidConfig("hairpin stem length must be > 0".into()));
        }
        if self.min_loop > self.max_loop {
            return Err(UtrError::InvalidConfig(format!(
                "hairpin min_loop {} exceeds max_loop {}",
                self.min_loop, self.max_loop
            )));
        }
        Ok(())
    }
}

/// Visit every `(i, j)` where `seq[i..i+stem]` pairs with `seq[j..j+stem]`.
fn for_each_hairpin(seq: &str, params: &HairpinParams, mut f: impl FnMut(usize, usize)) -> Result<()> {
    // Reverse-complementing the whole sequence once lets each window's complement be
    // read off as a slice: rc(seq[j..j+s]) == rc_full[n-j-s..n-j].
    let rc = reverse_complement(seq)?;
    let (seq, rc) = (seq.as_bytes(), rc.as_bytes());
    let n = seq.len();
    let stem = params.min_stem;

    for i in 0..n {
        let first = i + stem + params.min_loop;
        let last = i + stem + params.max_loop;
        for j in first..=last {
            if j + stem > n {
                break;
            }
            if seq[i..i + stem] == rc[n - j - stem..n - j] {
                f(i, j);
            }
        }
    }
    Ok(())
}

/// Count hairpins in `seq`.
pub fn hairpin_count(seq: &str, params: &HairpinParams) -> Result<usize> {
    let mut count = 0;
    for_each_hairpin(seq, params, |_, _| count += 1)?;
    Ok(count)
}

/// Count hairpins in `seq` and render each as `stem1(loop)stem2`.
///
/// The report lists one `Hairpin N: ...` line per match, numbered from one, and is `None`
/// when nothing was found.
pub fn hairpin_count_and_report(
    seq: &str,
    params: &HairpinParams,
) -> Result<(usize, Option<String>)> {
    let stem = params.min_stem;
    let mut count = 0;
    let mut report = String::new();

    for_each_hairpin(seq, params, |i, j| {
        count += 1;
        let _ = writeln!(
            report,
            "Hairpin {}: {}({}){}",
            count,
            &seq[i..i + stem],
            &seq[i + stem..j],
            &seq[j..j + stem]
        );
    })?;

    Ok((count, (count > 0).then_some(report)))
}
