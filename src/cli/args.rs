//! CLI argument parsing.
//!
//! Hand-rolled parser over any iterator of strings so it can be tested
//! without touching `std::env::args()`.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a simulation and print the results
    Run {
        /// Optional YAML configuration; defaults apply without one.
        config_path: Option<PathBuf>,
        /// Optional seed override.
        seed_override: Option<u32>,
        /// Optional years override.
        years_override: Option<u32>,
        /// Print every event and the per-player detail.
        verbose: bool,
    },
    /// Run the same configuration several times and compare fingerprints
    Verify {
        /// Optional YAML configuration.
        config_path: Option<PathBuf>,
        /// Number of runs.
        runs: usize,
    },
    /// Print the narration lines of a run
    Narrate {
        /// Optional YAML configuration.
        config_path: Option<PathBuf>,
    },
    /// Print the markdown summary report of a run
    Report {
        /// Optional YAML configuration.
        config_path: Option<PathBuf>,
    },
    /// Validate a fixed-ticket file
    CheckTickets {
        /// Path to the ticket file.
        tickets_path: PathBuf,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "verify" => Self::parse_verify_command(args),
            "narrate" => Command::Narrate {
                config_path: Self::config_path(args),
            },
            "report" => Command::Report {
                config_path: Self::config_path(args),
            },
            "check-tickets" => Self::parse_check_tickets_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// First positional argument after the command, if any.
    fn config_path(args: &[String]) -> Option<PathBuf> {
        args.get(2)
            .filter(|a| !a.starts_with('-'))
            .map(PathBuf::from)
    }

    /// Index of the first option after the command and optional path.
    fn options_start(args: &[String]) -> usize {
        if Self::config_path(args).is_some() {
            3
        } else {
            2
        }
    }

    fn parse_run_command(args: &[String]) -> Command {
        let mut seed_override = None;
        let mut years_override = None;
        let mut verbose = false;

        let mut i = Self::options_start(args);
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    if let Some(seed) = args.get(i + 1).and_then(|v| v.parse().ok()) {
                        seed_override = Some(seed);
                    } else {
                        eprintln!("Warning: --seed expects a number between 0 and {}", u32::MAX);
                    }
                    i += 2;
                }
                "--years" => {
                    if let Some(years) = args.get(i + 1).and_then(|v| v.parse().ok()) {
                        years_override = Some(years);
                    } else {
                        eprintln!("Warning: --years expects a number");
                    }
                    i += 2;
                }
                "-v" | "--verbose" => {
                    verbose = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Command::Run {
            config_path: Self::config_path(args),
            seed_override,
            years_override,
            verbose,
        }
    }

    fn parse_verify_command(args: &[String]) -> Command {
        let start = Self::options_start(args);
        let mut runs = 3;
        if args.get(start).map(String::as_str) == Some("--runs") {
            if let Some(n) = args.get(start + 1).and_then(|v| v.parse().ok()) {
                runs = n;
            }
        }

        Command::Verify {
            config_path: Self::config_path(args),
            runs,
        }
    }

    fn parse_check_tickets_command(args: &[String]) -> Command {
        match Self::config_path(args) {
            Some(tickets_path) => Command::CheckTickets { tickets_path },
            None => {
                eprintln!("Error: 'check-tickets' command requires a ticket file path");
                Command::Help
            }
        }
    }
}
