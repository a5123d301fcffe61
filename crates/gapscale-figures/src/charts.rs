//! One function per figure. Each writes a single SVG file.

use crate::FigureError;
use crate::scale::{Bin, histogram, padded_range, range_with_zero};
use gapscale_kernel::{AnalysisReport, ModulusBeta};
use plotters::prelude::*;
use std::path::Path;

const SIZE: (u32, u32) = (1000, 700);
const WIDE: (u32, u32) = (1400, 600);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);
const HIST_BINS: usize = 30;

/// Moduli need this many progressions to appear in the scaling figure.
pub const FIGURE3_MIN_PROGRESSIONS: usize = 3;

/// `R_n` against `ln p` with the global fit; rebound targets in red.
pub fn evolution(report: &AnalysisReport, path: &Path) -> Result<(), FigureError> {
    let points: Vec<(f64, f64)> = report.records.iter().map(|g| (g.ln_p(), g.r)).collect();
    let rebound_targets: Vec<(f64, f64)> = report
        .rebounds
        .rebounds
        .iter()
        .filter_map(|r| points.get(r.idx + 1).copied())
        .collect();
    let fit = &report.global_fit;
    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(
        points
            .iter()
            .map(|p| p.1)
            .chain([fit.predict(x_range.start), fit.predict(x_range.end)]),
    );

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Maximal gaps: R = {} against ln p",
                report.config.normalization.label()
            ),
            CAPTION_FONT,
        )
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range)?;
    chart
        .configure_mesh()
        .x_desc("ln p")
        .y_desc("R_n")
        .draw()?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )?
        .label("record gaps")
        .legend(|(x, y)| Circle::new((x, y), 4, BLUE.filled()));
    chart
        .draw_series(
            rebound_targets
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 6, RED.stroke_width(2))),
        )?
        .label("rebounds")
        .legend(|(x, y)| Circle::new((x, y), 6, RED.stroke_width(2)));
    chart
        .draw_series(LineSeries::new(
            [x_range.start, x_range.end].map(|x| (x, fit.predict(x))),
            BLACK.stroke_width(2),
        ))?
        .label(format!(
            "R = {:.4} + {:.4}·ln p (R² = {:.3})",
            fit.intercept, fit.slope, fit.r_squared
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Histogram of rebound amplitudes `Δ`.
pub fn rebound_distribution(report: &AnalysisReport, path: &Path) -> Result<(), FigureError> {
    let deltas: Vec<f64> = report.rebounds.rebounds.iter().map(|r| r.delta).collect();
    let bins = histogram(&deltas, HIST_BINS.min(deltas.len().max(1)));
    draw_histogram(
        path,
        SIZE,
        &format!(
            "Rebound amplitudes Δ (mean {:.4}, max {:.4})",
            report.rebounds.mean_amplitude, report.rebounds.max_amplitude
        ),
        "Δ = R_next - R_n",
        &bins,
        None,
    )
}

/// Mean `β(q)` with ±1σ bars against `log10 q`, plus the scaling fit.
pub fn beta_scaling(report: &AnalysisReport, path: &Path) -> Result<(), FigureError> {
    let moduli: Vec<&ModulusBeta> = report
        .progressions
        .by_modulus
        .iter()
        .filter(|m| m.count >= FIGURE3_MIN_PROGRESSIONS)
        .collect();
    let x_range = padded_range(moduli.iter().map(|m| (m.q as f64).log10()));
    let y_range = padded_range(
        moduli
            .iter()
            .flat_map(|m| [m.mean - m.std, m.mean + m.std]),
    );

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Scaling of β with the modulus q", CAPTION_FONT)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range)?;
    chart
        .configure_mesh()
        .x_desc("log10 q")
        .y_desc("mean β(a, q)")
        .draw()?;

    let cap = 0.004 * (x_range.end - x_range.start);
    for m in &moduli {
        let x = (m.q as f64).log10();
        let (lo, hi) = (m.mean - m.std, m.mean + m.std);
        chart.draw_series([
            PathElement::new(vec![(x, lo), (x, hi)], BLUE),
            PathElement::new(vec![(x - cap, lo), (x + cap, lo)], BLUE),
            PathElement::new(vec![(x - cap, hi), (x + cap, hi)], BLUE),
        ])?;
    }
    chart
        .draw_series(
            moduli
                .iter()
                .map(|m| Circle::new(((m.q as f64).log10(), m.mean), 4, BLUE.filled())),
        )?
        .label("mean β ± σ")
        .legend(|(x, y)| Circle::new((x, y), 4, BLUE.filled()));

    if let Some(fit) = &report.progressions.scaling_fit {
        chart
            .draw_series(LineSeries::new(
                [x_range.start, x_range.end].map(|x| (x, fit.predict(x))),
                RED.stroke_width(2),
            ))?
            .label(format!(
                "β = {:.3} + {:.3}·log10 q (R² = {:.3})",
                fit.intercept, fit.slope, fit.r_squared
            ))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Left: distribution of every `β(a, q)`. Right: per-modulus mean `β`
/// against the GUE exponent.
pub fn rmt_comparison(report: &AnalysisReport, path: &Path) -> Result<(), FigureError> {
    let betas: Vec<f64> = report.progressions.slopes.iter().map(|s| s.beta).collect();
    let bins = histogram(&betas, HIST_BINS.min(betas.len().max(1)));
    let rmt_beta = report.rmt.beta();

    let root = SVGBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(WIDE.0 / 2);

    draw_histogram_on(
        &left,
        "Distribution of empirical slopes β(a, q)",
        "β(a, q)",
        &bins,
        Some(0.0),
    )?;

    let moduli = &report.progressions.by_modulus;
    let x_range = padded_range(moduli.iter().map(|m| m.q as f64));
    let y_range = range_with_zero(moduli.iter().map(|m| m.mean).chain(rmt_beta));
    let mut chart = ChartBuilder::on(&right)
        .caption("Empirical β(q) against the GUE exponent", CAPTION_FONT)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range)?;
    chart
        .configure_mesh()
        .x_desc("modulus q")
        .y_desc("slope β")
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x_range.start, 0.0), (x_range.end, 0.0)],
        BLACK.mix(0.3),
    )))?;
    chart
        .draw_series(moduli.iter().map(|m| {
            let q = m.q as f64;
            Rectangle::new([(q - 0.35, 0.0), (q + 0.35, m.mean)], BLUE.mix(0.7).filled())
        }))?
        .label("empirical mean β(q)")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], BLUE.mix(0.7).filled()));

    if let Some(beta) = rmt_beta {
        chart
            .draw_series(LineSeries::new(
                [(x_range.start, beta), (x_range.end, beta)],
                RED.stroke_width(2),
            ))?
            .label(format!("GUE exponent {beta:.4}"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Residuals of the global fit against `ln p`.
pub fn residuals(report: &AnalysisReport, path: &Path) -> Result<(), FigureError> {
    let points: Vec<(f64, f64)> = report
        .records
        .iter()
        .zip(&report.global_fit.residuals)
        .map(|(g, &res)| (g.ln_p(), res))
        .collect();
    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = range_with_zero(points.iter().map(|p| p.1));

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Residuals of the global fit", CAPTION_FONT)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range)?;
    chart
        .configure_mesh()
        .x_desc("ln p")
        .y_desc("R_n - fit")
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x_range.start, 0.0), (x_range.end, 0.0)],
        BLACK.mix(0.4),
    )))?;
    for &(x, y) in &points {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, 0.0), (x, y)],
            BLUE.mix(0.3),
        )))?;
    }
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;
    root.present()?;
    Ok(())
}

fn draw_histogram(
    path: &Path,
    size: (u32, u32),
    caption: &str,
    x_desc: &str,
    bins: &[Bin],
    marker: Option<f64>,
) -> Result<(), FigureError> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    draw_histogram_on(&root, caption, x_desc, bins, marker)?;
    root.present()?;
    Ok(())
}

fn draw_histogram_on<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    caption: &str,
    x_desc: &str,
    bins: &[Bin],
    marker: Option<f64>,
) -> Result<(), FigureError> {
    let x_range = padded_range(bins.iter().flat_map(|b| [b.lo, b.hi]).chain(marker));
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, CAPTION_FONT)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..y_max)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("frequency")
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new(
            [(b.lo, 0.0), (b.hi, b.count as f64)],
            BLUE.mix(0.6).filled(),
        )
    }))?;
    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLACK.stroke_width(1))
    }))?;
    if let Some(x) = marker {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, 0.0), (x, y_max)],
            RED.stroke_width(2),
        )))?;
    }
    Ok(())
}
