//! # gapscale-figures
//!
//! Static SVG figures over an [`AnalysisReport`]:
//!
//! | file | content |
//! |------|---------|
//! | `figure1_evolution_Rn.svg` | `R_n` against `ln p`, global fit, rebounds |
//! | `figure2_distribution_delta.svg` | rebound amplitudes |
//! | `figure3_scaling_beta_q.svg` | mean `β(q)` against `log10 q` |
//! | `figure4_rmt_comparison.svg` | empirical `β` against the GUE exponent |
//! | `figure5_residuals.svg` | residuals of the global fit |
//!
//! A figure without data (no rebounds, no modulus with enough
//! progressions) is skipped rather than drawn empty.

pub mod charts;
pub mod scale;

use gapscale_kernel::AnalysisReport;
use plotters::drawing::DrawingAreaErrorKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const FIGURE1: &str = "figure1_evolution_Rn.svg";
pub const FIGURE2: &str = "figure2_distribution_delta.svg";
pub const FIGURE3: &str = "figure3_scaling_beta_q.svg";
pub const FIGURE4: &str = "figure4_rmt_comparison.svg";
pub const FIGURE5: &str = "figure5_residuals.svg";

#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("render error: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for FigureError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Render(err.to_string())
    }
}

/// Outcome of one figure pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFigures {
    pub written: Vec<PathBuf>,
    /// File names skipped for lack of data.
    pub skipped: Vec<String>,
}

/// Render every figure into `out_dir`, creating it when missing.
pub fn render_all(report: &AnalysisReport, out_dir: &Path) -> Result<RenderedFigures, FigureError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| FigureError::Io(format!("{}: {e}", out_dir.display())))?;

    let has_rebounds = !report.rebounds.rebounds.is_empty();
    let has_scaling = report
        .progressions
        .by_modulus
        .iter()
        .any(|m| m.count >= charts::FIGURE3_MIN_PROGRESSIONS);
    let has_slopes = !report.progressions.slopes.is_empty();

    type Render = fn(&AnalysisReport, &Path) -> Result<(), FigureError>;
    let plan: [(&str, bool, Render); 5] = [
        (FIGURE1, true, charts::evolution),
        (FIGURE2, has_rebounds, charts::rebound_distribution),
        (FIGURE3, has_scaling, charts::beta_scaling),
        (FIGURE4, has_slopes, charts::rmt_comparison),
        (FIGURE5, true, charts::residuals),
    ];

    let mut rendered = RenderedFigures::default();
    for (name, has_data, render) in plan {
        if !has_data {
            warn!(figure = name, "skipped: no data");
            rendered.skipped.push(name.to_string());
            continue;
        }
        let path = out_dir.join(name);
        render(report, &path)?;
        info!(figure = %path.display(), "figure written");
        rendered.written.push(path);
    }
    Ok(rendered)
}
