use std::collections::HashSet;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::ChooserConfig;
use crate::distance::edit_distance;
use crate::error::{Result, UtrError};
use crate::hairpin::hairpin_count;
use crate::kozak::KozakChecker;
use crate::oracle::ForbiddenSequenceOracle;
use crate::pool::{CandidatePool, UtrOption, PREFIX_BASES};
use crate::sequence::{translate, validate_nucleotides};
use crate::Terminus;

/// Picks the best UTR from a candidate pool for a query CDS.
///
/// The chooser owns a single Kozak random stream seeded at construction. Every 5'
/// selection consumes it in pool order, so a fixed seed, pool and call sequence always
/// reproduce the same answers. Use [`UtrChooser::select_batch`] when queries should
/// instead be independent of one another.
pub struct UtrChooser<O, R = StdRng> {
    pool: CandidatePool,
    oracle: O,
    kozak: KozakChecker<R>,
    config: ChooserConfig,
}

impl<O: ForbiddenSequenceOracle> UtrChooser<O, StdRng> {
    /// Build a chooser whose Kozak stream is seeded from `config.seed`.
    pub fn new(pool: CandidatePool, oracle: O, config: ChooserConfig) -> Result<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(pool, oracle, config, rng)
    }
}

impl<O: ForbiddenSequenceOracle, R: Rng> UtrChooser<O, R> {
    /// Build a chooser drawing Kozak tolerance decisions from `rng`.
    ///
    /// Initiates the oracle once.
    pub fn with_rng(
        pool: CandidatePool,
        mut oracle: O,
        config: ChooserConfig,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        oracle.initiate()?;
        let kozak = KozakChecker::new(
            &config.kozak_consensus,
            config.weak_mismatch_reject_probability,
            rng,
        )?;
        Ok(Self {
            pool,
            oracle,
            kozak,
            config,
        })
    }

    /// Select the best option for `cds` at `terminus`, skipping anything in `exclusions`.
    ///
    /// 3' selections return a new option carrying a poly-A tail; the pool itself is
    /// never modified.
    pub fn select(
        &mut self,
        cds: &str,
        terminus: Terminus,
        exclusions: &HashSet<UtrOption>,
    ) -> Result<UtrOption> {
        select_from(
            &self.pool,
            &self.oracle,
            &mut self.kozak,
            &self.config,
            cds,
            terminus,
            exclusions,
        )
    }

    /// Select a 5' UTR, then a 3' UTR that is not the same pool entry.
    pub fn choose_pair(&mut self, cds: &str) -> Result<(UtrOption, UtrOption)> {
        let five = self.select(cds, Terminus::Five, &HashSet::new())?;
        let exclusions = HashSet::from([five.clone()]);
        let three = self.select(cds, Terminus::Three, &exclusions)?;
        Ok((five, three))
    }
}

impl<O: ForbiddenSequenceOracle, R> UtrChooser<O, R> {
    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    pub fn config(&self) -> &ChooserConfig {
        &self.config
    }

    /// Select for many queries in parallel.
    ///
    /// Query `i` draws from its own stream seeded with `config.seed + i`, so each result
    /// depends only on its query and index, never on thread scheduling or on the
    /// chooser's own stream.
    pub fn select_batch<S: AsRef<str> + Sync>(
        &self,
        queries: &[S],
        terminus: Terminus,
        exclusions: &HashSet<UtrOption>,
    ) -> Vec<Result<UtrOption>> {
        // Borrow fields individually; the chooser's own stream need not be Sync.
        let (pool, oracle, config) = (&self.pool, &self.oracle, &self.config);
        queries
            .par_iter()
            .enumerate()
            .map(|(i, cds)| {
                let rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let mut kozak = KozakChecker::new(
                    &config.kozak_consensus,
                    config.weak_mismatch_reject_probability,
                    rng,
                )?;
                select_from(
                    pool,
                    oracle,
                    &mut kozak,
                    config,
                    cds.as_ref(),
                    terminus,
                    exclusions,
                )
            })
            .collect()
    }
}

/// Check that `cds` can be scored: non-empty, nucleotides only, whole codons and long
/// enough to yield a six-residue prefix.
pub fn validate_query(cds: &str) -> Result<()> {
    if cds.is_empty() {
        return Err(UtrError::EmptyInput("CDS sequence"));
    }
    validate_nucleotides(cds)?;
    if cds.len() % 3 != 0 {
        return Err(UtrError::InvalidLength(format!(
            "CDS length {} is not a multiple of 3",
            cds.len()
        )));
    }
    if cds.len() < PREFIX_BASES {
        return Err(UtrError::InvalidLength(format!(
            "CDS of {} bases is too short to translate the first six amino acids",
            cds.len()
        )));
    }
    Ok(())
}

/// Score `option` against the query's amino-acid prefix. Lower is better.
///
/// The weighted prefix edit distance dominates; hairpins in the option's UTR+CDS break
/// ties between options that are equally distant.
pub fn score_option(option: &UtrOption, query_prefix: &str, config: &ChooserConfig) -> Result<usize> {
    let distance = edit_distance(query_prefix, option.first_six_aas());
    let construct = [option.utr(), option.cds()].concat();
    let hairpins = hairpin_count(&construct, &config.hairpin)?;
    config
        .edit_distance_weight
        .checked_mul(distance)
        .and_then(|weighted| weighted.checked_add(hairpins))
        .ok_or_else(|| {
            UtrError::InvalidConfig(format!(
                "score overflows with edit distance weight {}",
                config.edit_distance_weight
            ))
        })
}

fn select_from<O, R>(
    pool: &CandidatePool,
    oracle: &O,
    kozak: &mut KozakChecker<R>,
    config: &ChooserConfig,
    cds: &str,
    terminus: Terminus,
    exclusions: &HashSet<UtrOption>,
) -> Result<UtrOption>
where
    O: ForbiddenSequenceOracle + ?Sized,
    R: Rng,
{
    validate_query(cds)?;
    if pool.is_empty() || pool.available(exclusions).next().is_none() {
        return Err(UtrError::NoCandidatesAvailable);
    }

    let query_prefix = translate(&cds[..PREFIX_BASES])?;
    let mut kozak_compliant = 0usize;
    let mut best: Option<(usize, &UtrOption)> = None;

    for option in pool.available(exclusions) {
        if terminus == Terminus::Five {
            if !kozak.is_compliant(option, cds) {
                debug!("{}: not Kozak compliant", option.gene_name());
                continue;
            }
            kozak_compliant += 1;
        }

        if !oracle.check(option.utr())? {
            debug!("{}: UTR contains a forbidden sequence", option.gene_name());
            continue;
        }

        let score = score_option(option, &query_prefix, config)?;
        debug!("{}: score {}", option.gene_name(), score);
        // Strictly lower only, so earlier pool entries win ties.
        if best.map_or(true, |(best_score, _)| score < best_score) {
            best = Some((score, option));
        }
    }

    if terminus == Terminus::Five && kozak_compliant == 0 {
        return Err(UtrError::NoKozakCompliantOption);
    }
    let (score, chosen) = best.ok_or(UtrError::NoValidOptionsRemaining)?;
    info!(
        "selected {:?} UTR from {} (score {})",
        terminus,
        chosen.gene_name(),
        score
    );

    Ok(match terminus {
        Terminus::Five => chosen.clone(),
        Terminus::Three => chosen.with_poly_a_tail(config.poly_a_tail_length),
    })
}
