//! Analysis configuration (`gapscale.toml`).
//!
//! Every key is optional; missing keys take the defaults below. Unknown keys
//! are rejected so that typos do not silently fall back to defaults.

use crate::error::{GapError, Result};
use crate::gaps::Normalization;
use crate::records::RecordSource;
use crate::rmt::MIN_MATRIX_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "gapscale.toml";
pub const DEFAULT_BOUND: u64 = 2_000_000;
pub const DEFAULT_MIN_RECORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Sieve bound `N`; primes `<= N` are analyzed.
    pub bound: u64,
    pub moduli: Vec<u64>,
    pub normalization: Normalization,
    /// Progressions with fewer maximal gaps than this are not fitted.
    pub min_records: usize,
    pub records: RecordsConfig,
    pub rmt: RmtConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordsConfig {
    pub source: RecordSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_bfile: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaps_bfile: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RmtConfig {
    pub matrix_sizes: Vec<usize>,
    pub samples: usize,
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bound: DEFAULT_BOUND,
            moduli: (3..=30).collect(),
            normalization: Normalization::default(),
            min_records: DEFAULT_MIN_RECORDS,
            records: RecordsConfig::default(),
            rmt: RmtConfig::default(),
        }
    }
}

impl Default for RmtConfig {
    fn default() -> Self {
        Self {
            matrix_sizes: vec![10, 20, 50, 100],
            samples: 20,
            seed: 20_240_101,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| GapError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| GapError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text).map_err(|e| match e {
            GapError::Config(message) => GapError::Config(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    /// Explicit path, else `gapscale.toml` when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bound < 2 {
            return Err(GapError::InvalidBound { bound: self.bound });
        }
        if let Some(&modulus) = self.moduli.iter().find(|&&q| q < 2) {
            return Err(GapError::InvalidModulus { modulus });
        }
        if self.min_records < 2 {
            return Err(GapError::Config(format!(
                "min_records must be at least 2, got {}",
                self.min_records
            )));
        }
        if let Some(&n) = self.rmt.matrix_sizes.iter().find(|&&n| n < MIN_MATRIX_SIZE) {
            return Err(GapError::Config(format!(
                "rmt matrix size {n} is below the minimum of {MIN_MATRIX_SIZE}"
            )));
        }
        if self.rmt.samples == 0 {
            return Err(GapError::Config("rmt samples must be at least 1".into()));
        }
        if self.records.source == RecordSource::BFile
            && (self.records.starts_bfile.is_none() || self.records.gaps_bfile.is_none())
        {
            return Err(GapError::Config(
                "records.source = \"bfile\" requires starts_bfile and gaps_bfile".into(),
            ));
        }
        Ok(())
    }
}
