pub mod chooser;
pub mod config;
pub mod distance;
pub mod error;
pub mod hairpin;
pub mod io;
pub mod kozak;
pub mod oracle;
pub mod pool;
pub mod sequence;

pub use chooser::UtrChooser;
pub use config::ChooserConfig;
pub use error::{Result, UtrError};
pub use oracle::{ForbiddenSequenceOracle, MotifBlocklist};
pub use pool::{CandidatePool, GeneRecord, UtrOption};

/// Which end of the CDS a UTR is selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminus {
    /// 5' UTR: candidates must pass the Kozak check.
    Five,
    /// 3' UTR: the selected UTR receives a poly-A tail.
    Three,
}

impl TryFrom<u8> for Terminus {
    type Error = UtrError;

    /// Accepts `5` or `3`, the way ends are usually written (5', 3').
    fn try_from(end: u8) -> Result<Self> {
        match end {
            5 => Ok(Terminus::Five),
            3 => Ok(Terminus::Three),
            other => Err(UtrError::InvalidTerminus(other)),
        }
    }
}
