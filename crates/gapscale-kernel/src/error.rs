//! Error types for gapscale kernel operations.

/// Errors arising from invalid numeric input, malformed data files or
/// invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum GapError {
    /// The prime bound is too small to contain any gap.
    #[error("invalid bound {bound}: the prime bound must be at least 2")]
    InvalidBound { bound: u64 },

    /// The sieve table for this bound does not fit in memory.
    #[error("bound {bound} is too large to sieve in memory")]
    BoundTooLarge { bound: u64 },

    /// A modulus that cannot define a residue class partition.
    #[error("invalid modulus {modulus}: moduli must be at least 2")]
    InvalidModulus { modulus: u64 },

    /// A least-squares fit was requested over too few points.
    #[error("insufficient points for fit: need at least {needed}, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    /// Every abscissa is identical, so the slope is undetermined.
    #[error("degenerate series: all {points} x values are equal to {x}")]
    DegenerateSeries { points: usize, x: f64 },

    /// Paired series of different lengths.
    #[error("length mismatch: {left} x values vs {right} y values")]
    LengthMismatch { left: usize, right: usize },

    /// NaN or infinity in a fit input.
    #[error("non-finite value at index {index}")]
    NonFinite { index: usize },

    /// A b-file could not be read or parsed.
    #[error("b-file {path}: {message}")]
    BFile { path: String, message: String },

    /// The analysis configuration is unreadable or invalid.
    #[error("config error: {0}")]
    Config(String),
}

/// Coarse classification of a [`GapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Config,
    Io,
}

impl GapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBound { .. }
            | Self::BoundTooLarge { .. }
            | Self::InvalidModulus { .. }
            | Self::InsufficientPoints { .. }
            | Self::DegenerateSeries { .. }
            | Self::LengthMismatch { .. }
            | Self::NonFinite { .. } => ErrorKind::InvalidInput,
            Self::BFile { .. } => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, GapError>;
