//! Gaussian Unitary Ensemble baseline.
//!
//! For each matrix size `n`, draw Hermitian matrices `H = A + A†` with
//! standard complex Gaussian entries, take the eigenvalue spacings in the
//! central half of the spectrum, unfold them by their mean and keep the
//! largest. The sample mean of that maximum plays the role of a maximal
//! gap; it is normalized by the same logarithmic factor (in `n`) and fitted
//! against `ln n`. The slope is the RMT exponent the empirical `β` values
//! are contrasted with.

use crate::error::{GapError, Result};
use crate::fit::{LinearFit, fit_linear};
use crate::gaps::Normalization;
use nalgebra::{Complex, DMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MIN_MATRIX_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmtPoint {
    pub n: usize,
    pub mean_max_spacing: f64,
    pub normalized: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmtResult {
    pub points: Vec<RmtPoint>,
    pub samples: usize,
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<LinearFit>,
}

impl RmtResult {
    /// Fitted RMT exponent, when at least two sizes were simulated.
    pub fn beta(&self) -> Option<f64> {
        self.fit.as_ref().map(|f| f.slope)
    }
}

pub fn simulate_gue(
    sizes: &[usize],
    samples: usize,
    seed: u64,
    normalization: Normalization,
) -> Result<RmtResult> {
    if let Some(&n) = sizes.iter().find(|&&n| n < MIN_MATRIX_SIZE) {
        return Err(GapError::Config(format!(
            "rmt matrix size {n} is below the minimum of {MIN_MATRIX_SIZE}"
        )));
    }
    if samples == 0 {
        return Err(GapError::Config("rmt samples must be at least 1".into()));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(sizes.len());
    for &n in sizes {
        let total: f64 = (0..samples)
            .map(|_| max_unfolded_bulk_spacing(&gue_eigenvalues(n, &mut rng)))
            .sum();
        let mean_max_spacing = total / samples as f64;
        let normalized = mean_max_spacing / normalization.factor(n as f64);
        debug!(n, mean_max_spacing, "simulated GUE size");
        points.push(RmtPoint {
            n,
            mean_max_spacing,
            normalized,
        });
    }

    let xs: Vec<f64> = points.iter().map(|pt| (pt.n as f64).ln()).collect();
    let ys: Vec<f64> = points.iter().map(|pt| pt.normalized).collect();
    let fit = match fit_linear(&xs, &ys) {
        Ok(fit) => Some(fit),
        Err(GapError::InsufficientPoints { .. } | GapError::DegenerateSeries { .. }) => None,
        Err(err) => return Err(err),
    };

    Ok(RmtResult {
        points,
        samples,
        seed,
        fit,
    })
}

/// Sorted eigenvalues of one GUE draw of size `n`.
pub fn gue_eigenvalues(n: usize, rng: &mut impl Rng) -> Vec<f64> {
    let a = DMatrix::<Complex<f64>>::from_fn(n, n, |_, _| {
        let re: f64 = rng.sample(StandardNormal);
        let im: f64 = rng.sample(StandardNormal);
        Complex::new(re, im)
    });
    let h = &a + a.adjoint();
    let mut eigenvalues: Vec<f64> = h.symmetric_eigenvalues().iter().copied().collect();
    eigenvalues.sort_by(f64::total_cmp);
    eigenvalues
}

/// Largest spacing in the central half of `sorted`, in units of the mean
/// spacing there.
pub fn max_unfolded_bulk_spacing(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let bulk = &sorted[n / 4..(3 * n).div_ceil(4)];
    let spacings: Vec<f64> = bulk.windows(2).map(|w| w[1] - w[0]).collect();
    if spacings.is_empty() {
        return 0.0;
    }
    let mean = spacings.iter().sum::<f64>() / spacings.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    spacings.iter().copied().fold(0.0, f64::max) / mean
}
