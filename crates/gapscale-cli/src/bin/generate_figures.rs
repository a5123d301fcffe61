use clap::Parser;
use gapscale_cli::cli::GenerateFiguresCli;
use gapscale_cli::{commands, support};

fn main() {
    let cli = GenerateFiguresCli::parse();
    support::init_logging();
    commands::generate_figures::run(cli.out_dir, cli.report, cli.json);
}
