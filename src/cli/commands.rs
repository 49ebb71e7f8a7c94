//! CLI command handlers.

use std::path::Path;
use std::process::ExitCode;

use super::output::{print_help, print_run_result, print_tickets, print_version};
use super::{Args, Command};
use crate::config::RunConfig;
use crate::engine::{RunOutput, SimEngine};
use crate::error::{SimError, SimResult};
use crate::lottery::strategy::FixedTickets;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run {
            config_path,
            seed_override,
            years_override,
            verbose,
        } => run_simulation(config_path.as_deref(), seed_override, years_override, verbose),
        Command::Verify { config_path, runs } => verify_reproducibility(config_path.as_deref(), runs),
        Command::Narrate { config_path } => narrate(config_path.as_deref()),
        Command::Report { config_path } => report(config_path.as_deref()),
        Command::CheckTickets { tickets_path } => check_tickets(&tickets_path),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Load a configuration file, or the defaults without one.
///
/// # Errors
///
/// Returns error if the file cannot be read, parsed or validated.
pub fn load_config(path: Option<&Path>) -> SimResult<RunConfig> {
    match path {
        Some(path) => {
            log::info!("loading configuration from {}", path.display());
            RunConfig::load(path)
        }
        None => Ok(RunConfig::default()),
    }
}

fn execute(config: RunConfig) -> SimResult<RunOutput> {
    SimEngine::new(config)?.run()
}

fn load_and_run(path: Option<&Path>) -> SimResult<RunOutput> {
    execute(load_config(path)?)
}

/// Run a simulation and print the results.
#[must_use]
pub fn run_simulation(
    path: Option<&Path>,
    seed_override: Option<u32>,
    years_override: Option<u32>,
    verbose: bool,
) -> ExitCode {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║           lotto-logic - Lottery Market Simulation             ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    let mut config = match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };
    if let Some(seed) = seed_override {
        config.seed = seed;
    }
    if let Some(years) = years_override {
        config.years = years;
    }

    match execute(config) {
        Ok(output) => {
            print_run_result(&output, verbose);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Run the same configuration `runs` times and compare fingerprints.
#[must_use]
pub fn verify_reproducibility(path: Option<&Path>, runs: usize) -> ExitCode {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║         lotto-logic - Reproducibility Verification            ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    let config = match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };
    let runs = runs.max(2);
    println!("Seed: {}   Runs: {runs}\n", config.seed);

    let mut hashes = Vec::with_capacity(runs);
    for _ in 0..runs {
        match execute(config.clone()).and_then(|o| o.fingerprint()) {
            Ok(hash) => hashes.push(hash),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(1);
            }
        }
    }

    let reference = &hashes[0];
    let identical = hashes.iter().all(|h| h == reference);
    for (i, hash) in hashes.iter().enumerate() {
        let match_sym = if hash == reference { "=" } else { "!" };
        println!("  Run {}: {hash} {match_sym}", i + 1);
    }

    let (sym, status) = if identical { ("✓", "PASSED") } else { ("✗", "FAILED") };
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{sym} Result: {status}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if identical {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Print one narration line per event.
#[must_use]
pub fn narrate(path: Option<&Path>) -> ExitCode {
    match load_and_run(path) {
        Ok(output) => {
            for line in output.narration() {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Print the markdown summary report.
#[must_use]
pub fn report(path: Option<&Path>) -> ExitCode {
    match load_and_run(path) {
        Ok(output) => {
            println!("{}", output.summary_report());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Validate a fixed-ticket file.
#[must_use]
pub fn check_tickets(path: &Path) -> ExitCode {
    let parsed = std::fs::read_to_string(path)
        .map_err(SimError::from)
        .and_then(|text| FixedTickets::parse(&text));
    match parsed {
        Ok(tickets) => {
            print_tickets(&tickets);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}: {e}", path.display());
            ExitCode::from(1)
        }
    }
}
