use crate::error::{Result, UtrError};
use crate::hairpin::HairpinParams;
use crate::kozak::DEFAULT_KOZAK_CONSENSUS;

/// Tunables for [`UtrChooser`](crate::chooser::UtrChooser).
///
/// ```rust
/// use utr_chooser::config::ChooserConfig;
///
/// let config = ChooserConfig {
///     poly_a_tail_length: 20,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChooserConfig {
    /// Seed for the Kozak compliance random stream.
    pub seed: u64,
    /// Adenines appended to a 3' selection.
    pub poly_a_tail_length: usize,
    /// Twelve-letter junction consensus; uppercase strict, lowercase weak.
    pub kozak_consensus: String,
    /// Chance that a weak-position mismatch fails the Kozak check.
    pub weak_mismatch_reject_probability: f64,
    /// Score multiplier applied to the amino-acid prefix edit distance.
    pub edit_distance_weight: usize,
    pub hairpin: HairpinParams,
}

impl Default for ChooserConfig {
    fn default() -> Self {
        Self {
            seed: 1738,
            poly_a_tail_length: 15,
            kozak_consensus: DEFAULT_KOZAK_CONSENSUS.to_string(),
            weak_mismatch_reject_probability: 0.7,
            edit_distance_weight: 1000,
            hairpin: HairpinParams::default(),
        }
    }
}

impl ChooserConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.weak_mismatch_reject_probability) {
            return Err(UtrError::InvalidConfig(format!(
                "weak mismatch reject probability {} is outside [0, 1]",
                self.weak_mismatch_reject_probability
            )));
        }
        self.hairpin.validate()
    }
}
