//! CLI module for lotto-logic.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command};
pub use commands::{
    check_tickets, load_config, narrate, report, run_cli, run_simulation, verify_reproducibility,
};
pub use output::{print_help, print_run_result, print_tickets, print_version};
