use crate::support::{fmt_opt, or_exit, print_json};
use gapscale_kernel::{AnalysisConfig, run_analysis};
use gapscale_store::{RunLayout, persist_run, timestamp};
use serde_json::json;
use std::path::PathBuf;

pub fn run(config: Option<PathBuf>, out_dir: PathBuf, json_output: bool) {
    let config = or_exit(AnalysisConfig::resolve(config.as_deref()));
    let report = or_exit(run_analysis(&config));

    let layout = RunLayout::new(out_dir);
    let ts = timestamp(chrono::Utc::now());
    let artifacts = or_exit(persist_run(&layout, &ts, &report));

    let fit = &report.global_fit;
    let progressions = &report.progressions;

    if json_output {
        let payload = json!({
            "timestamp": ts,
            "input_digest": report.input_digest,
            "bound": config.bound,
            "prime_count": report.prime_count,
            "largest_prime": report.largest_prime,
            "record_count": report.records.len(),
            "global_fit": {
                "slope": fit.slope,
                "intercept": fit.intercept,
                "r_squared": fit.r_squared,
                "slope_std_err": fit.slope_std_err,
                "p_value": fit.p_value,
            },
            "rebound_count": report.rebounds.count,
            "progression_count": progressions.total(),
            "scaling_slope": progressions.scaling_fit.as_ref().map(|f| f.slope),
            "rmt_beta": report.rmt.beta(),
            "files": {
                "record_gaps": artifacts.record_gaps.display().to_string(),
                "rebounds": artifacts.rebounds.display().to_string(),
                "progression_slopes": artifacts.progression_slopes.display().to_string(),
                "report": artifacts.report.display().to_string(),
                "summary": artifacts.summary.display().to_string(),
            },
        });
        print_json(&payload);
    } else {
        println!("gapscale run_analysis {ts}");
        println!(
            "  Primes up to {}: {} (largest {})",
            config.bound, report.prime_count, report.largest_prime
        );
        println!("  Record gaps: {}", report.records.len());
        println!(
            "  Global slope: {:.6} ± {} (R² = {:.4})",
            fit.slope,
            fmt_opt(fit.slope_std_err),
            fit.r_squared
        );
        println!(
            "  Rebounds: {} of {} transitions",
            report.rebounds.count, report.rebounds.transitions
        );
        println!(
            "  Progressions: {} fitted, {} skipped",
            progressions.total(),
            progressions.skipped
        );
        if let Some(scaling) = &progressions.scaling_fit {
            println!("  β(q) scaling slope: {:.4}", scaling.slope);
        }
        println!("  RMT exponent: {}", fmt_opt(report.rmt.beta()));
        println!("  Report: {}", artifacts.report.display());
        println!("  Summary: {}", artifacts.summary.display());
    }
}
