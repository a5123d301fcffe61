//! On-disk layout of an analysis run.
//!
//! ```text
//! <root>/
//!   data/raw/record_gaps_<ts>.jsonl
//!   data/processed/rebounds_<ts>.jsonl
//!   data/processed/progression_slopes_<ts>.jsonl
//!   data/processed/analysis_<ts>.json
//!   analysis_summary_<ts>.md
//!   figures/publication/
//! ```
//!
//! `<ts>` is `YYYYMMDD_HHMMSS`, so lexicographic order is run order.

use crate::jsonl::{
    StoreError, read_json_from_path, write_json_to_path, write_rows_to_path, write_text_to_path,
};
use crate::summary::render_summary;
use chrono::{DateTime, Utc};
use gapscale_kernel::AnalysisReport;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One row of `record_gaps_<ts>.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub n: usize,
    pub p_n: u64,
    pub g_n: u64,
    pub r_n: f64,
}

/// The persisted report: the analysis plus when it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub timestamp: String,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// Paths written by [`persist_run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunArtifacts {
    pub timestamp: String,
    pub record_gaps: PathBuf,
    pub rebounds: PathBuf,
    pub progression_slopes: PathBuf,
    pub report: PathBuf,
    pub summary: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RunLayout {
    root: PathBuf,
}

impl RunLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("data").join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("data").join("processed")
    }

    pub fn figures_dir(&self) -> PathBuf {
        self.root.join("figures").join("publication")
    }

    pub fn artifacts(&self, timestamp: &str) -> RunArtifacts {
        RunArtifacts {
            timestamp: timestamp.to_string(),
            record_gaps: self.raw_dir().join(format!("record_gaps_{timestamp}.jsonl")),
            rebounds: self.processed_dir().join(format!("rebounds_{timestamp}.jsonl")),
            progression_slopes: self
                .processed_dir()
                .join(format!("progression_slopes_{timestamp}.jsonl")),
            report: self.processed_dir().join(format!("analysis_{timestamp}.json")),
            summary: self.root.join(format!("analysis_summary_{timestamp}.md")),
        }
    }

    /// The most recent `analysis_<ts>.json` under `data/processed`.
    pub fn latest_report(&self) -> Result<PathBuf, StoreError> {
        let dir = self.processed_dir();
        let not_found = || StoreError::NotFound(dir.display().to_string());
        if !dir.is_dir() {
            return Err(not_found());
        }
        let pattern = report_name_re();
        let entries =
            fs::read_dir(&dir).map_err(|e| StoreError::Io(format!("{}: {e}", dir.display())))?;

        let mut latest: Option<String> = None;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io(format!("{}: {e}", dir.display())))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if pattern.is_match(&name) && latest.as_ref().is_none_or(|best| name > *best) {
                latest = Some(name);
            }
        }
        latest.map(|name| dir.join(name)).ok_or_else(not_found)
    }
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn report_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^analysis_\d{8}_\d{6}\.json$").expect("report name regex must compile")
    })
}

/// Write every table, the full report and the markdown summary for one run.
pub fn persist_run(
    layout: &RunLayout,
    timestamp: &str,
    report: &AnalysisReport,
) -> Result<RunArtifacts, StoreError> {
    let artifacts = layout.artifacts(timestamp);

    let record_rows: Vec<RecordRow> = report
        .records
        .iter()
        .enumerate()
        .map(|(n, g)| RecordRow {
            n,
            p_n: g.p,
            g_n: g.gap,
            r_n: g.r,
        })
        .collect();
    write_rows_to_path(&artifacts.record_gaps, &record_rows)?;
    write_rows_to_path(&artifacts.rebounds, &report.rebounds.rebounds)?;
    write_rows_to_path(&artifacts.progression_slopes, &report.progressions.slopes)?;

    let stored = StoredReport {
        timestamp: timestamp.to_string(),
        report: report.clone(),
    };
    write_json_to_path(&artifacts.report, &stored)?;
    write_text_to_path(&artifacts.summary, &render_summary(&stored, &artifacts))?;

    info!(report = %artifacts.report.display(), "run persisted");
    Ok(artifacts)
}

pub fn load_report(path: impl AsRef<Path>) -> Result<StoredReport, StoreError> {
    read_json_from_path(path)
}
