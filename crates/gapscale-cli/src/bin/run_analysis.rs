use clap::Parser;
use gapscale_cli::cli::RunAnalysisCli;
use gapscale_cli::{commands, support};

fn main() {
    let cli = RunAnalysisCli::parse();
    support::init_logging();
    commands::run_analysis::run(cli.config, cli.out_dir, cli.json);
}
