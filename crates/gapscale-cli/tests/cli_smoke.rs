use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const SMALL_CONFIG: &str = r#"
bound = 50000
moduli = [3, 4, 5, 6, 8, 10]
min_records = 3

[rmt]
matrix_sizes = [8, 12, 16]
samples = 2
seed = 7
"#;

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "gapscale-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_bin<I, S>(bin: &str, cwd: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(bin)
        .current_dir(cwd)
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("command should execute")
}

fn run_analysis<I, S>(cwd: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bin(env!("CARGO_BIN_EXE_run_analysis"), cwd, args)
}

fn generate_figures<I, S>(cwd: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bin(env!("CARGO_BIN_EXE_generate_figures"), cwd, args)
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("dir should be readable")
        .map(|entry| {
            entry
                .expect("entry should be readable")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();
    names
}

#[test]
fn run_analysis_writes_every_artifact() {
    let tmp = TempDirGuard::new("analysis");
    fs::write(tmp.path().join("gapscale.toml"), SMALL_CONFIG).expect("config should be written");

    let output = run_analysis(tmp.path(), ["--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);

    assert_eq!(payload["bound"], 50000);
    assert_eq!(payload["prime_count"], 5133);
    assert_eq!(payload["largest_prime"], 49999);
    assert!(payload["record_count"].as_u64().unwrap_or(0) >= 10);
    assert!(payload["global_fit"]["slope"].is_f64());
    assert!(
        payload["input_digest"]
            .as_str()
            .is_some_and(|d| d.starts_with("in1_"))
    );

    for key in [
        "record_gaps",
        "rebounds",
        "progression_slopes",
        "report",
        "summary",
    ] {
        let path = payload["files"][key].as_str().expect("file path");
        assert!(
            tmp.path().join(path).is_file(),
            "{key} missing at {path}"
        );
    }

    let raw = tmp.path().join("data").join("raw");
    assert_eq!(files_with_prefix(&raw, "record_gaps_").len(), 1);
    let summaries = files_with_prefix(tmp.path(), "analysis_summary_");
    assert_eq!(summaries.len(), 1);
    let summary =
        fs::read_to_string(tmp.path().join(&summaries[0])).expect("summary should be readable");
    assert!(summary.contains("## Record Gaps"));
}

#[test]
fn run_analysis_human_output_and_out_dir() {
    let tmp = TempDirGuard::new("human");
    let config = tmp.path().join("small.toml");
    fs::write(&config, SMALL_CONFIG).expect("config should be written");

    let output = run_analysis(
        tmp.path(),
        [
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("--out-dir"),
            OsStr::new("run"),
        ],
    );
    assert_success(&output);
    let text = stdout_text(&output);
    assert!(text.starts_with("gapscale run_analysis "));
    assert!(text.contains("Primes up to 50000: 5133 (largest 49999)"));
    assert!(text.contains("RMT exponent:"));

    let processed = tmp.path().join("run").join("data").join("processed");
    assert_eq!(files_with_prefix(&processed, "analysis_").len(), 1);
}

#[test]
fn generate_figures_renders_latest_report() {
    let tmp = TempDirGuard::new("figures");
    fs::write(tmp.path().join("gapscale.toml"), SMALL_CONFIG).expect("config should be written");
    assert_success(&run_analysis(tmp.path(), Vec::<&str>::new()));

    let output = generate_figures(tmp.path(), ["--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);

    let written = payload["written"].as_array().expect("written list");
    assert!(written.len() >= 2, "too few figures: {payload}");
    for path in written {
        let path = tmp.path().join(path.as_str().expect("figure path"));
        let svg = fs::read_to_string(&path).expect("figure should exist");
        assert!(svg.contains("<svg"));
    }

    let figures = tmp.path().join("figures").join("publication");
    assert!(figures.join("figure1_evolution_Rn.svg").is_file());
    assert!(figures.join("figure5_residuals.svg").is_file());
}

#[test]
fn generate_figures_without_report_fails() {
    let tmp = TempDirGuard::new("no-report");

    let output = generate_figures(tmp.path(), Vec::<&str>::new());
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_text(&output);
    assert!(
        stderr.contains("error: no analysis report found"),
        "stderr:\n{stderr}"
    );
}

#[test]
fn run_analysis_rejects_invalid_bound() {
    let tmp = TempDirGuard::new("bad-bound");
    fs::write(tmp.path().join("gapscale.toml"), "bound = 1\n").expect("config should be written");

    let output = run_analysis(tmp.path(), Vec::<&str>::new());
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_text(&output).contains("error: invalid bound 1"));
    assert!(!tmp.path().join("data").exists());
}

#[test]
fn run_analysis_reports_unsievable_bound() {
    let tmp = TempDirGuard::new("huge-bound");
    fs::write(
        tmp.path().join("gapscale.toml"),
        "bound = 9223372036854775807\n",
    )
    .expect("config should be written");

    let output = run_analysis(tmp.path(), Vec::<&str>::new());
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr_text(&output).contains("error: bound 9223372036854775807 is too large"),
        "stderr:\n{}",
        stderr_text(&output)
    );
}

#[test]
fn run_analysis_rejects_unknown_config_keys() {
    let tmp = TempDirGuard::new("bad-key");
    fs::write(tmp.path().join("gapscale.toml"), "bound = 1000\nspeed = 3\n")
        .expect("config should be written");

    let output = run_analysis(tmp.path(), Vec::<&str>::new());
    assert_failure(&output);
    assert!(stderr_text(&output).contains("error: config error"));
}
