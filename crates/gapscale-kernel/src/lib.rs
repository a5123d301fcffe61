//! # Gapscale Kernel
//!
//! Empirical scaling of maximal prime gaps: a record gap `g` at prime `p`
//! is normalized to `R(p) = g / ln²(p)` and `R` is fitted against `ln p`,
//! globally and inside every residue class `a mod q`. The per-class slopes
//! `β(a, q)` are then related to `log q` and contrasted with the exponent a
//! GUE random-matrix spectrum produces under the same normalization.
//!
//! Everything here is a pure function of [`AnalysisConfig`].
//!
//! ## Architecture
//!
//! ```text
//! sieve              ← primes ≤ N
//!     │
//! gaps / records     ← maximal-gap records (sieve, known table, b-files)
//!     │
//! fit                ← OLS of R against ln p
//!     │
//! rebound            ← record transitions where R grows
//! progression        ← β(a, q) per residue class, β(q) against log10 q
//! rmt                ← GUE exponent under the same normalization
//!     │
//! report             ← AnalysisReport
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod fit;
pub mod gaps;
pub mod progression;
pub mod rebound;
pub mod records;
pub mod report;
pub mod rmt;
pub mod sieve;

pub use config::{AnalysisConfig, DEFAULT_CONFIG_PATH, RecordsConfig, RmtConfig};
pub use digest::input_digest;
pub use error::{ErrorKind, GapError};
pub use fit::{LinearFit, fit_linear, fit_pairs};
pub use gaps::{GapRecord, Normalization, NormalizedGap, consecutive_gaps, maximal_gaps, normalize};
pub use progression::{ModulusBeta, ProgressionAnalysis, ProgressionSlope, analyze_progressions};
pub use rebound::{Rebound, ReboundSummary, find_rebounds};
pub use records::{KNOWN_MAXIMAL_GAPS, RecordSource};
pub use report::{AnalysisReport, run_analysis};
pub use rmt::{RmtPoint, RmtResult, simulate_gue};
pub use sieve::{is_prime, sieve_primes};
