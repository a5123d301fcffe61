//! The analysis stage as one pure function of the configuration.

use crate::config::AnalysisConfig;
use crate::digest::input_digest;
use crate::error::{GapError, Result};
use crate::fit::{LinearFit, fit_linear};
use crate::gaps::{GapRecord, NormalizedGap, maximal_gaps, normalize_all};
use crate::progression::{ProgressionAnalysis, analyze_progressions};
use crate::rebound::{ReboundSummary, find_rebounds};
use crate::records::{KNOWN_MAXIMAL_GAPS, RecordSource, records_from_bfiles};
use crate::rmt::{RmtResult, simulate_gue};
use crate::sieve::sieve_primes;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    pub input_digest: String,
    pub prime_count: usize,
    pub largest_prime: u64,
    pub records: Vec<NormalizedGap>,
    /// `R` against `ln p` over the maximal-gap records.
    pub global_fit: LinearFit,
    pub rebounds: ReboundSummary,
    pub progressions: ProgressionAnalysis,
    pub rmt: RmtResult,
}

pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;

    info!(bound = config.bound, "sieving primes");
    let primes = sieve_primes(config.bound)?;
    let largest_prime = primes.last().copied().unwrap_or_default();
    info!(count = primes.len(), largest_prime, "primes generated");

    let raw = load_records(config, &primes)?;
    info!(records = raw.len(), source = ?config.records.source, "maximal gaps loaded");
    let input_digest = input_digest(config, &raw)?;

    let records = normalize_all(&raw, config.normalization);
    let xs: Vec<f64> = records.iter().map(NormalizedGap::ln_p).collect();
    let ys: Vec<f64> = records.iter().map(|g| g.r).collect();
    let global_fit = fit_linear(&xs, &ys)?;
    info!(
        slope = global_fit.slope,
        r_squared = global_fit.r_squared,
        "global fit"
    );

    let rebounds = find_rebounds(&records);
    info!(count = rebounds.count, "rebounds found");

    let progressions = analyze_progressions(
        &primes,
        &config.moduli,
        config.normalization,
        config.min_records,
    )?;
    info!(
        progressions = progressions.total(),
        skipped = progressions.skipped,
        "residue classes fitted"
    );

    let rmt = simulate_gue(
        &config.rmt.matrix_sizes,
        config.rmt.samples,
        config.rmt.seed,
        config.normalization,
    )?;
    info!(beta = ?rmt.beta(), "GUE baseline simulated");

    Ok(AnalysisReport {
        config: config.clone(),
        input_digest,
        prime_count: primes.len(),
        largest_prime,
        records,
        global_fit,
        rebounds,
        progressions,
        rmt,
    })
}

fn load_records(config: &AnalysisConfig, primes: &[u64]) -> Result<Vec<GapRecord>> {
    match config.records.source {
        RecordSource::Sieve => Ok(maximal_gaps(primes)),
        RecordSource::KnownTable => Ok(KNOWN_MAXIMAL_GAPS.to_vec()),
        RecordSource::BFile => match (&config.records.starts_bfile, &config.records.gaps_bfile) {
            (Some(starts), Some(gaps)) => records_from_bfiles(starts, gaps),
            _ => Err(GapError::Config(
                "records.source = \"bfile\" requires starts_bfile and gaps_bfile".into(),
            )),
        },
    }
}
