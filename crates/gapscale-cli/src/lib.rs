//! Gapscale CLI: the `run_analysis` and `generate_figures` commands.

pub mod cli;
pub mod commands;
pub mod support;
