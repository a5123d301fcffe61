//! Ordinary least-squares line fitting.
//!
//! Fit policy:
//! - fewer than 2 points is [`GapError::InsufficientPoints`];
//! - all abscissae equal is [`GapError::DegenerateSeries`];
//! - exactly 2 points fit exactly, without standard error or p-value.

use crate::error::{GapError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

pub const MIN_FIT_POINTS: usize = 2;

/// `y ≈ intercept + slope · x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// `y_i - ŷ_i`, in input order.
    pub residuals: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope_std_err: Option<f64>,
    /// Two-sided p-value of the slope against zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit paired series `xs`, `ys`.
pub fn fit_linear(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    if xs.len() != ys.len() {
        return Err(GapError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    let n = xs.len();
    if n < MIN_FIT_POINTS {
        return Err(GapError::InsufficientPoints {
            needed: MIN_FIT_POINTS,
            got: n,
        });
    }
    if let Some(index) = xs
        .iter()
        .zip(ys)
        .position(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(GapError::NonFinite { index });
    }

    let count = n as f64;
    let mean_x = xs.iter().sum::<f64>() / count;
    let mean_y = ys.iter().sum::<f64>() / count;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx == 0.0 {
        return Err(GapError::DegenerateSeries {
            points: n,
            x: xs[0],
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let residuals: Vec<f64> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| y - (intercept + slope * x))
        .collect();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();

    // A constant response is fitted exactly by a flat line.
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (1.0 - ss_res / syy).clamp(0.0, 1.0)
    };

    let (slope_std_err, p_value) = if n > MIN_FIT_POINTS {
        let dof = (n - 2) as f64;
        let std_err = (ss_res / dof / sxx).sqrt();
        (Some(std_err), slope_p_value(slope, std_err, dof))
    } else {
        (None, None)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        residuals,
        slope_std_err,
        p_value,
        n,
    })
}

/// Fit `(x, y)` pairs.
pub fn fit_pairs(points: &[(f64, f64)]) -> Result<LinearFit> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
    fit_linear(&xs, &ys)
}

fn slope_p_value(slope: f64, std_err: f64, dof: f64) -> Option<f64> {
    if std_err == 0.0 {
        return Some(if slope == 0.0 { 1.0 } else { 0.0 });
    }
    let t = (slope / std_err).abs();
    let dist = StudentsT::new(0.0, 1.0, dof).ok()?;
    Some((2.0 * (1.0 - dist.cdf(t))).clamp(0.0, 1.0))
}
