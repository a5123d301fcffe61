//! Markdown run summary (`analysis_summary_<ts>.md`).

use crate::layout::{RunArtifacts, StoredReport};
use std::fmt::Write;

pub fn render_summary(stored: &StoredReport, artifacts: &RunArtifacts) -> String {
    let report = &stored.report;
    let fit = &report.global_fit;
    let rebounds = &report.rebounds;
    let progressions = &report.progressions;
    let mut out = String::new();

    let _ = writeln!(out, "# Analysis Summary - {}", stored.timestamp);
    let _ = writeln!(out);
    let _ = writeln!(out, "- Input digest: `{}`", report.input_digest);
    let _ = writeln!(
        out,
        "- Primes up to {}: {} (largest {})",
        report.config.bound, report.prime_count, report.largest_prime
    );
    let _ = writeln!(out, "- Normalization: {}", report.config.normalization.label());
    let _ = writeln!(out);

    let _ = writeln!(out, "## Record Gaps");
    let _ = writeln!(out, "- Total: {}", report.records.len());
    let _ = writeln!(
        out,
        "- Global slope: {:.6} ± {}",
        fit.slope,
        fmt_opt(fit.slope_std_err, 6)
    );
    let _ = writeln!(out, "- Intercept: {:.6}", fit.intercept);
    let _ = writeln!(out, "- R²: {:.4}", fit.r_squared);
    let _ = writeln!(out, "- p-value: {}", fmt_sci(fit.p_value));
    let _ = writeln!(out);

    let _ = writeln!(out, "## Rebounds");
    let _ = writeln!(out, "- Count: {}", rebounds.count);
    let _ = writeln!(out, "- Percentage: {:.1}%", rebounds.percentage);
    let _ = writeln!(out, "- Mean amplitude: {:.6}", rebounds.mean_amplitude);
    let _ = writeln!(out, "- Largest: {:.6}", rebounds.max_amplitude);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Arithmetic Progressions");
    let _ = writeln!(out, "- Total: {}", progressions.total());
    let _ = writeln!(out, "- Skipped (too few records): {}", progressions.skipped);
    let _ = writeln!(
        out,
        "- β > 0: {} ({:.1}%)",
        progressions.positive_count,
        progressions.positive_percentage()
    );
    let _ = writeln!(
        out,
        "- β < 0: {} ({:.1}%)",
        progressions.negative_count,
        progressions.negative_percentage()
    );
    if let Some(q10) = progressions.modulus(10) {
        let _ = writeln!(out, "- Mean β for q=10: {:.6}", q10.mean);
    }
    if let Some(scaling) = &progressions.scaling_fit {
        let _ = writeln!(
            out,
            "- β(q) = {:.4} + {:.4}·log₁₀(q) (R² = {:.3})",
            scaling.intercept, scaling.slope, scaling.r_squared
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Random Matrix Baseline (GUE)");
    let sizes: Vec<String> = report.rmt.points.iter().map(|p| p.n.to_string()).collect();
    let _ = writeln!(out, "- Matrix sizes: {}", sizes.join(", "));
    let _ = writeln!(out, "- Samples per size: {}", report.rmt.samples);
    let _ = writeln!(out, "- RMT exponent: {}", fmt_opt(report.rmt.beta(), 6));
    let _ = writeln!(out);

    let _ = writeln!(out, "## Files Generated");
    let files = [
        &artifacts.record_gaps,
        &artifacts.rebounds,
        &artifacts.progression_slopes,
        &artifacts.report,
    ];
    for (i, path) in files.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, path.display());
    }
    out
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}

fn fmt_sci(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2e}"),
        None => "n/a".to_string(),
    }
}
