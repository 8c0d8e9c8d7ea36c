//! Candidate UTR options and the ordered pool they are selected from.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::error::{Result, UtrError};
use crate::sequence::{translate, validate_nucleotides};

/// Number of CDS bases translated into the cached amino-acid prefix.
pub const PREFIX_BASES: usize = 18;

/// A UTR paired with the coding sequence of the gene it was taken from.
///
/// Values are immutable and compare structurally, so exclusion sets match by content.
/// Augmenting an option (see [`UtrOption::with_poly_a_tail`]) always yields a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UtrOption {
    utr: String,
    cds: String,
    gene_name: String,
    first_six_aas: String,
}

impl UtrOption {
    /// Build an option verbatim. `first_six_aas` is trusted as given.
    pub fn new(
        utr: impl Into<String>,
        cds: impl Into<String>,
        gene_name: impl Into<String>,
        first_six_aas: impl Into<String>,
    ) -> Self {
        Self {
            utr: utr.into(),
            cds: cds.into(),
            gene_name: gene_name.into(),
            first_six_aas: first_six_aas.into(),
        }
    }

    /// Build an option from gene data, deriving the amino-acid prefix from the first
    /// 18 bases of `cds`.
    pub fn from_gene(
        utr: impl Into<String>,
        cds: impl Into<String>,
        gene_name: impl Into<String>,
    ) -> Result<Self> {
        let utr = utr.into();
        let cds = cds.into();
        validate_nucleotides(&utr)?;
        validate_nucleotides(&cds)?;
        if cds.len() < PREFIX_BASES {
            return Err(UtrError::InvalidLength(format!(
                "CDS of {} bases is too short to translate the first six amino acids",
                cds.len()
            )));
        }
        let first_six_aas = translate(&cds[..PREFIX_BASES])?;
        Ok(Self::new(utr, cds, gene_name, first_six_aas))
    }

    pub fn utr(&self) -> &str {
        &self.utr
    }

    pub fn cds(&self) -> &str {
        &self.cds
    }

    pub fn gene_name(&self) -> &str {
        &self.gene_name
    }

    pub fn first_six_aas(&self) -> &str {
        &self.first_six_aas
    }

    /// A copy of this option with `len` adenines appended to the UTR.
    pub fn with_poly_a_tail(&self, len: usize) -> Self {
        let mut utr = String::with_capacity(self.utr.len() + len);
        utr.push_str(&self.utr);
        utr.extend(std::iter::repeat('A').take(len));
        Self {
            utr,
            ..self.clone()
        }
    }
}

/// Gene data as produced by the genome-parsing collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRecord {
    pub utr: String,
    pub cds: String,
    pub gene: String,
}

/// Ordered, read-only collection of candidate options.
///
/// Order is significant: when two candidates score the same, the one that appears first
/// wins. Pools therefore carry an explicit order (usually abundance ranking order) rather
/// than inheriting one from a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    options: Vec<UtrOption>,
}

impl CandidatePool {
    pub fn new(options: Vec<UtrOption>) -> Self {
        Self { options }
    }

    /// Build a pool in `ranking` order from the genes found in `genes`.
    ///
    /// Ranked identifiers missing from `genes` are ignored, repeated identifiers are
    /// added once, and genes whose CDS cannot yield a six-residue prefix are skipped with
    /// a warning.
    pub fn from_ranking(genes: &HashMap<String, GeneRecord>, ranking: &[(String, f64)]) -> Self {
        let mut seen = HashSet::new();
        let mut options = Vec::with_capacity(ranking.len());

        for (gene_id, _abundance) in ranking {
            if !seen.insert(gene_id.as_str()) {
                continue;
            }
            let Some(record) = genes.get(gene_id) else {
                continue;
            };
            match UtrOption::from_gene(
                record.utr.as_str(),
                record.cds.as_str(),
                record.gene.as_str(),
            ) {
                Ok(option) => options.push(option),
                Err(e) => warn!("skipping {}: {}", gene_id, e),
            }
        }

        Self { options }
    }

    pub fn options(&self) -> &[UtrOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UtrOption> {
        self.options.iter()
    }

    /// Options not present in `exclusions`, in pool order.
    pub fn available<'a>(
        &'a self,
        exclusions: &'a HashSet<UtrOption>,
    ) -> impl Iterator<Item = &'a UtrOption> + 'a {
        self.options.iter().filter(move |o| !exclusions.contains(o))
    }
}

impl<'a> IntoIterator for &'a CandidatePool {
    type Item = &'a UtrOption;
    type IntoIter = std::slice::Iter<'a, UtrOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

/// Keep the most abundant `fraction` of `abundances`, most abundant first.
///
/// Ties keep their input order. The kept count is `ceil(n * fraction)` with `fraction`
/// clamped to `[0, 1]`.
pub fn top_fraction(mut abundances: Vec<(String, f64)>, fraction: f64) -> Vec<(String, f64)> {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    abundances.sort_by(|a, b| b.1.total_cmp(&a.1));
    let keep = (abundances.len() as f64 * fraction).ceil() as usize;
    abundances.truncate(keep);
    abundances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(utr: &str, cds: &str, name: &str) -> GeneRecord {
        GeneRecord {
            utr: utr.into(),
            cds: cds.into(),
            gene: name.into(),
        }
    }

    #[test]
    fn test_from_gene_derives_prefix() {
        let opt = UtrOption::from_gene("AAACAC", "ATGTCTGCGGGCGCTCGTTCGAGT", "GeneA").unwrap();
        assert_eq!(opt.first_six_aas(), "MSAGAR");
        assert_eq!(opt.gene_name(), "GeneA");
    }

    #[test]
    fn test_from_gene_rejects_short_or_invalid_cds() {
        assert!(matches!(
            UtrOption::from_gene("AAA", "ATGCATG", "G"),
            Err(UtrError::InvalidLength(_))
        ));
        assert!(matches!(
            UtrOption::from_gene("AAA", "ATGTCTGCGGGCGCTCGNTC", "G"),
            Err(UtrError::InvalidAlphabet(_))
        ));
    }

    #[test]
    fn test_poly_a_tail_returns_new_value() {
        let opt = UtrOption::new("ACGT", "ATGCATG", "GeneX", "MALQ");
        let tailed = opt.with_poly_a_tail(15);
        assert_eq!(opt.utr(), "ACGT");
        assert_eq!(tailed.utr(), format!("ACGT{}", "A".repeat(15)));
        assert_eq!(tailed.cds(), opt.cds());
        assert_ne!(tailed, opt);
    }

    #[test]
    fn test_structural_equality_for_exclusions() {
        let a = UtrOption::new("ACGT", "ATG", "G", "M");
        let b = UtrOption::new("ACGT", "ATG", "G", "M");
        let exclusions: HashSet<_> = [a].into_iter().collect();
        assert!(exclusions.contains(&b));
    }

    #[test]
    fn test_from_ranking_follows_ranking_order() {
        let cds = "ATGTCTGCGGGCGCTCGTTCG";
        let genes: HashMap<String, GeneRecord> = [
            ("YAL001".to_string(), gene("AAAA", cds, "A1")),
            ("YAL002".to_string(), gene("CCCC", cds, "A2")),
            ("YAL003".to_string(), gene("GGGG", "ATGAT", "A3")),
        ]
        .into_iter()
        .collect();
        let ranking = vec![
            ("YAL002".to_string(), 90.0),
            ("MISSING".to_string(), 80.0),
            ("YAL003".to_string(), 70.0),
            ("YAL001".to_string(), 60.0),
            ("YAL002".to_string(), 50.0),
        ];

        let pool = CandidatePool::from_ranking(&genes, &ranking);
        let names: Vec<_> = pool.iter().map(|o| o.gene_name()).collect();
        assert_eq!(names, ["A2", "A1"]);
    }

    #[test]
    fn test_available_skips_exclusions() {
        let a = UtrOption::new("A", "ATG", "GA", "M");
        let b = UtrOption::new("C", "ATG", "GB", "M");
        let pool = CandidatePool::new(vec![a.clone(), b.clone()]);
        let exclusions: HashSet<_> = [a].into_iter().collect();
        let left: Vec<_> = pool.available(&exclusions).collect();
        assert_eq!(left, [&b]);
    }

    #[test]
    fn test_top_fraction() {
        let abundances: Vec<(String, f64)> = (0..40)
            .map(|i| (format!("G{}", i), (i % 7) as f64))
            .collect();
        let top = top_fraction(abundances, 0.05);
        assert_eq!(top.len(), 2);
        // Abundance 6 first appears at i = 6 and again at i = 13.
        assert_eq!(top[0].0, "G6");
        assert_eq!(top[1].0, "G13");

        assert!(top_fraction(vec![("G".into(), 1.0)], 0.0).is_empty());
        assert_eq!(top_fraction(vec![("G".into(), 1.0)], 0.05).len(), 1);
    }
}
