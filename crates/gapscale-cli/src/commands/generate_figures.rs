use crate::support::{or_exit, print_json};
use gapscale_figures::render_all;
use gapscale_store::{RunLayout, load_report};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

pub fn run(out_dir: PathBuf, report: Option<PathBuf>, json_output: bool) {
    let layout = RunLayout::new(out_dir);
    let report_path = match report {
        Some(path) => path,
        None => or_exit(layout.latest_report()),
    };
    info!(report = %report_path.display(), "loading report");
    let stored = or_exit(load_report(&report_path));

    let figures_dir = layout.figures_dir();
    let rendered = or_exit(render_all(&stored.report, &figures_dir));

    if json_output {
        let written: Vec<String> = rendered
            .written
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        let payload = json!({
            "report": report_path.display().to_string(),
            "timestamp": stored.timestamp,
            "figures_dir": figures_dir.display().to_string(),
            "written": written,
            "skipped": rendered.skipped,
        });
        print_json(&payload);
    } else {
        println!("gapscale generate_figures {}", stored.timestamp);
        println!("  Report: {}", report_path.display());
        println!("  Figures ({}):", rendered.written.len());
        for path in &rendered.written {
            println!("    - {}", path.display());
        }
        if !rendered.skipped.is_empty() {
            println!("  Skipped (no data):");
            for name in &rendered.skipped {
                println!("    - {name}");
            }
        }
    }
}
