//! Gap records, maximal-gap extraction and normalization.

use serde::{Deserialize, Serialize};

/// A gap `gap = next - p` starting at prime `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapRecord {
    pub p: u64,
    pub gap: u64,
}

/// Logarithmic factor a gap is divided by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// `R(p) = g / ln²(p)`
    #[default]
    LogSquared,
    /// `R(p) = g / ln(p)`
    Log,
}

impl Normalization {
    pub fn factor(self, p: f64) -> f64 {
        let ln = p.ln();
        match self {
            Self::LogSquared => ln * ln,
            Self::Log => ln,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LogSquared => "g / ln²(p)",
            Self::Log => "g / ln(p)",
        }
    }
}

/// A maximal-gap record with its normalized value `r = R(p)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedGap {
    pub p: u64,
    pub gap: u64,
    pub r: f64,
}

impl NormalizedGap {
    pub fn ln_p(&self) -> f64 {
        (self.p as f64).ln()
    }
}

/// Normalize one record. `p <= 1` has no meaningful logarithm and maps to 0.
pub fn normalize(record: GapRecord, normalization: Normalization) -> NormalizedGap {
    let r = if record.p <= 1 {
        0.0
    } else {
        record.gap as f64 / normalization.factor(record.p as f64)
    };
    NormalizedGap {
        p: record.p,
        gap: record.gap,
        r,
    }
}

pub fn normalize_all(records: &[GapRecord], normalization: Normalization) -> Vec<NormalizedGap> {
    records
        .iter()
        .map(|&record| normalize(record, normalization))
        .collect()
}

/// Gaps between every pair of consecutive primes.
pub fn consecutive_gaps(primes: &[u64]) -> Vec<GapRecord> {
    primes
        .windows(2)
        .map(|w| GapRecord {
            p: w[0],
            gap: w[1] - w[0],
        })
        .collect()
}

/// Record-setting gaps: each strictly exceeds every gap before it.
///
/// Only gaps whose closing prime is present in `primes` are considered, so a
/// record straddling the sieve bound is never reported.
pub fn maximal_gaps(primes: &[u64]) -> Vec<GapRecord> {
    let mut tracker = RecordTracker::default();
    for &p in primes {
        tracker.push(p);
    }
    tracker.into_records()
}

/// Streaming maximal-gap extraction over an increasing sequence.
#[derive(Debug, Default, Clone)]
pub struct RecordTracker {
    last: Option<u64>,
    max_gap: u64,
    records: Vec<GapRecord>,
}

impl RecordTracker {
    pub fn push(&mut self, value: u64) {
        if let Some(last) = self.last {
            debug_assert!(value > last, "sequence must be strictly increasing");
            let gap = value - last;
            if gap > self.max_gap {
                self.max_gap = gap;
                self.records.push(GapRecord { p: last, gap });
            }
        }
        self.last = Some(value);
    }

    pub fn records(&self) -> &[GapRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<GapRecord> {
        self.records
    }
}
