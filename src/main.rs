//! lotto-logic CLI
//!
//! Command-line interface for running lottery simulations.

use std::process::ExitCode;

use lotto_logic::cli::{run_cli, Args};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run_cli(Args::parse())
}
