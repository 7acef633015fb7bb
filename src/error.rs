use std::fmt;

pub type Result<T> = std::result::Result<T, PredictError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredictError {
    /// No 48-bit state reproduces the observed values.
    NoSeed,
    /// Several states reproduce the observed values. Each entry is a seed for
    /// `JavaRandom::new`, positioned where a unique result would have been.
    MultipleSeeds(Vec<u64>),
    /// Caller-side contract violation, checked before any search.
    InvalidArgument(String),
}

impl PredictError {
    /// Candidate seeds carried by `MultipleSeeds`, empty otherwise.
    pub fn seeds(&self) -> &[u64] {
        match self {
            PredictError::MultipleSeeds(seeds) => seeds,
            _ => &[],
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::NoSeed => write!(f, "no seed reproduces the given values"),
            PredictError::MultipleSeeds(seeds) => {
                write!(f, "number sequence has {} possible seeds", seeds.len())
            }
            PredictError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for PredictError {}
