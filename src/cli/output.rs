//! CLI output formatting.

use crate::engine::{EventCategory, RunOutput};
use crate::lottery::strategy::FixedTickets;
use crate::report::{format_money, format_percent};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    println!(
        "lotto-logic {} ({})",
        env!("LOTTO_LOGIC_VERSION"),
        env!("GIT_HASH")
    );
}

/// Print help message.
pub fn print_help() {
    println!(
        r"lotto-logic - Reproducible Powerball-style lottery simulation

USAGE:
    lotto-logic <COMMAND> [config.yaml] [OPTIONS]

COMMANDS:
    run [config.yaml]           Run a simulation and print the results
        --seed <N>              Override the configured seed
        --years <N>             Override the configured years (1-100)
        -v, --verbose           Print every event

    verify [config.yaml]        Check that repeated runs are identical
        --runs <N>              Number of runs (default: 3)

    narrate [config.yaml]       Print one narration line per event

    report [config.yaml]        Print the markdown summary report

    check-tickets <file>        Validate five fixed tickets (w w w w w | pb)

    help                        Show this help message
    version                     Show version information

Without a configuration file the default three-player run is used.
Set RUST_LOG=debug to trace eliminations and jackpot hits.

EXAMPLES:
    lotto-logic run
    lotto-logic run runs/century.yaml --seed 12345
    lotto-logic verify runs/century.yaml --runs 5
    lotto-logic check-tickets my_tickets.txt
"
    );
}

/// Print the result of a run.
pub fn print_run_result(output: &RunOutput, verbose: bool) {
    let meta = &output.meta;
    let summary = &output.summary;

    println!("{RULE}");
    println!("Seed: {}   Years: {}   Add-on: {}", meta.seed, meta.years, meta.add_on);
    println!(
        "Draws: {} of {}   First draw: {}",
        meta.completed_periods, meta.total_periods, meta.start_date
    );
    println!("Market efficiency: {:.4}", meta.efficiency);
    println!("{RULE}\n");

    println!("Final ranking:");
    for (rank, p) in summary.final_ranking.iter().enumerate() {
        let roi = if p.spent > 0.0 {
            format_percent((p.won - p.spent) / p.spent)
        } else {
            "n/a".to_string()
        };
        println!(
            "  #{} {:<3} {:<26} balance {:>10}  spent {:>10}  won {:>10}  ROI {:>9}  {:?}",
            rank + 1,
            p.id,
            p.strategy.label(),
            format_money(p.balance),
            format_money(p.spent),
            format_money(p.won),
            roi,
            p.status
        );
    }

    println!("\nJackpot:");
    println!("  Draws with a market winner: {}", summary.market_hit_periods);
    println!("  Player jackpot hits:        {}", summary.player_jackpot_hits);
    println!("  Longest drought (draws):    {}", summary.longest_jackpot_drought);
    if let Some(peak) = output
        .snapshots
        .iter()
        .map(|s| s.jackpot)
        .max_by(f64::total_cmp)
    {
        println!("  Largest jackpot:            {}", format_money(peak));
    }

    let count = |category: EventCategory| output.events.iter().filter(|e| e.category == category).count();
    println!("\nEvents: {} total", output.events.len());
    println!("  Jackpot hits:       {}", count(EventCategory::JackpotHit));
    println!("  Lead changes:       {}", count(EventCategory::LeaderChange));
    println!("  Dry spells:         {}", count(EventCategory::DrySpell));
    println!("  Long rollovers:     {}", count(EventCategory::LongRollover));
    println!("  Eliminations:       {}", count(EventCategory::Elimination));

    if verbose {
        println!();
        for line in output.narration() {
            println!("  {line}");
        }
    }
}

/// Print a validated fixed-ticket set.
pub fn print_tickets(tickets: &FixedTickets) {
    println!("✓ 5 valid tickets");
    for (i, ticket) in tickets.tickets().iter().enumerate() {
        println!("  {}. {ticket}", i + 1);
    }
}
