use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "run_analysis",
    about = "Sieve primes, extract maximal gaps and fit their scaling laws",
    version
)]
pub struct RunAnalysisCli {
    /// Analysis config (TOML); defaults to ./gapscale.toml when present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Root directory for data/ and the run summary
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
#[command(
    name = "generate_figures",
    about = "Render publication figures from the latest analysis report",
    version
)]
pub struct GenerateFiguresCli {
    /// Root directory holding data/processed and receiving figures/publication
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Explicit report path instead of the latest analysis_<ts>.json
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
