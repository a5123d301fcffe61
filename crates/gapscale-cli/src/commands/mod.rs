pub mod generate_figures;
pub mod run_analysis;
