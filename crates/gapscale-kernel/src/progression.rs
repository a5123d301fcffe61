//! Maximal gaps inside arithmetic progressions `a mod q`.
//!
//! For every modulus `q` and residue `a` coprime to `q`, the primes `≡ a`
//! form their own increasing sequence. Its maximal gaps are normalized like
//! the global ones and fitted against `ln p`; the slope is `β(a, q)`. The
//! per-modulus mean `β(q)` is then fitted against `log10 q`.

use crate::error::{GapError, Result};
use crate::fit::{LinearFit, fit_linear};
use crate::gaps::{GapRecord, Normalization, RecordTracker, maximal_gaps, normalize_all};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fitted exponent of one progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSlope {
    pub q: u64,
    pub a: u64,
    pub beta: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub n_records: usize,
}

/// Aggregate of `β(a, q)` over the residues of one modulus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulusBeta {
    pub q: u64,
    pub mean: f64,
    /// Sample standard deviation; 0 for a single progression.
    pub std: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionAnalysis {
    pub slopes: Vec<ProgressionSlope>,
    /// Progressions with fewer than `min_records` maximal gaps.
    pub skipped: usize,
    pub by_modulus: Vec<ModulusBeta>,
    /// Mean `β(q)` against `log10 q`, when at least two moduli qualify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_fit: Option<LinearFit>,
    pub positive_count: usize,
    pub negative_count: usize,
}

impl ProgressionAnalysis {
    pub fn total(&self) -> usize {
        self.slopes.len()
    }

    pub fn positive_percentage(&self) -> f64 {
        percentage(self.positive_count, self.total())
    }

    pub fn negative_percentage(&self) -> f64 {
        percentage(self.negative_count, self.total())
    }

    pub fn modulus(&self, q: u64) -> Option<&ModulusBeta> {
        self.by_modulus.iter().find(|m| m.q == q)
    }
}

/// Minimum number of progressions a modulus needs to enter the scaling fit.
pub const SCALING_MIN_PROGRESSIONS: usize = 2;

pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Primes congruent to `a` modulo `q`, in order.
pub fn primes_in_progression(primes: &[u64], a: u64, q: u64) -> Vec<u64> {
    primes.iter().copied().filter(|p| p % q == a).collect()
}

/// Maximal gaps of the progression `a mod q`.
pub fn progression_records(primes: &[u64], a: u64, q: u64) -> Vec<GapRecord> {
    maximal_gaps(&primes_in_progression(primes, a, q))
}

pub fn analyze_progressions(
    primes: &[u64],
    moduli: &[u64],
    normalization: Normalization,
    min_records: usize,
) -> Result<ProgressionAnalysis> {
    let mut moduli = moduli.to_vec();
    moduli.sort_unstable();
    moduli.dedup();
    if let Some(&modulus) = moduli.iter().find(|&&q| q < 2) {
        return Err(GapError::InvalidModulus { modulus });
    }

    let mut slopes = Vec::new();
    let mut skipped = 0;
    let mut by_modulus = Vec::new();

    for &q in &moduli {
        let width = usize::try_from(q).map_err(|_| GapError::InvalidModulus { modulus: q })?;
        let coprime: Vec<bool> = (0..q).map(|a| gcd(a, q) == 1).collect();

        // One pass over the primes feeds every residue class of q.
        let mut trackers = vec![RecordTracker::default(); width];
        for &p in primes {
            let residue = (p % q) as usize;
            if coprime[residue] {
                trackers[residue].push(p);
            }
        }

        let mut betas = Vec::new();
        for (a, tracker) in trackers.iter().enumerate() {
            if !coprime[a] {
                continue;
            }
            let records = tracker.records();
            if records.len() < min_records.max(2) {
                skipped += 1;
                continue;
            }
            let normalized = normalize_all(records, normalization);
            let xs: Vec<f64> = normalized.iter().map(|g| g.ln_p()).collect();
            let ys: Vec<f64> = normalized.iter().map(|g| g.r).collect();
            let fit = fit_linear(&xs, &ys)?;
            betas.push(fit.slope);
            slopes.push(ProgressionSlope {
                q,
                a: a as u64,
                beta: fit.slope,
                intercept: fit.intercept,
                r_squared: fit.r_squared,
                n_records: records.len(),
            });
        }

        debug!(q, progressions = betas.len(), "fitted residue classes");
        if !betas.is_empty() {
            by_modulus.push(aggregate(q, &betas));
        }
    }

    let scaling_fit = fit_scaling(&by_modulus)?;
    let positive_count = slopes.iter().filter(|s| s.beta > 0.0).count();
    let negative_count = slopes.iter().filter(|s| s.beta < 0.0).count();

    Ok(ProgressionAnalysis {
        slopes,
        skipped,
        by_modulus,
        scaling_fit,
        positive_count,
        negative_count,
    })
}

fn aggregate(q: u64, betas: &[f64]) -> ModulusBeta {
    let count = betas.len();
    let mean = betas.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        0.0
    } else {
        let var = betas.iter().map(|b| (b - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    };
    ModulusBeta {
        q,
        mean,
        std,
        count,
    }
}

fn fit_scaling(by_modulus: &[ModulusBeta]) -> Result<Option<LinearFit>> {
    let eligible: Vec<&ModulusBeta> = by_modulus
        .iter()
        .filter(|m| m.count >= SCALING_MIN_PROGRESSIONS)
        .collect();
    let xs: Vec<f64> = eligible.iter().map(|m| (m.q as f64).log10()).collect();
    let ys: Vec<f64> = eligible.iter().map(|m| m.mean).collect();
    match fit_linear(&xs, &ys) {
        Ok(fit) => Ok(Some(fit)),
        Err(GapError::InsufficientPoints { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
