//! # gapscale-store
//!
//! Persistence for analysis runs.
//!
//! This crate provides:
//! - JSONL tables and JSON documents with atomic temp-and-rename writes
//! - the timestamped run layout and latest-report discovery
//! - the markdown run summary
//!
//! It does not compute anything; reports come from `gapscale-kernel`.
//!
//! ## Data model
//!
//! ```text
//! AnalysisReport (kernel)
//!     ↓  persist_run
//! record_gaps / rebounds / progression_slopes (JSONL)
//! analysis_<ts>.json (StoredReport)  ──  load_report  →  figures
//! ```

pub mod jsonl;
pub mod layout;
pub mod summary;

pub use jsonl::{
    StoreError, read_json_from_path, read_rows, read_rows_from_path, write_json_to_path,
    write_rows, write_rows_to_path, write_text_to_path,
};
pub use layout::{
    RecordRow, RunArtifacts, RunLayout, StoredReport, TIMESTAMP_FORMAT, load_report, persist_run,
    timestamp,
};
pub use summary::render_summary;
