//! Error taxonomy for UTR selection and the sequence primitives behind it.
//!
//! Every variant is a validation or domain failure. None of them are transient, so callers
//! should never retry the same call expecting a different outcome.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtrError {
    /// Sequence contains characters outside the permitted set for its context.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// Sequence length is not a multiple of three or is below a required minimum.
    #[error("invalid length: {0}")]
    InvalidLength(String),

    /// Terminus selector was neither 5 nor 3.
    #[error("terminus must be 3 or 5 to signify a 3' or 5' UTR, got {0}")]
    InvalidTerminus(u8),

    /// A required sequence argument was empty.
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    #[error("no UTR options are available to choose from")]
    NoCandidatesAvailable,

    #[error("no Kozak-compliant UTR options found")]
    NoKozakCompliantOption,

    #[error("no valid UTR options remain after filtering")]
    NoValidOptionsRemaining,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, UtrError>;
