//! Run configuration with YAML loading and validation.
//!
//! Loading goes through three gates before a run may start:
//! 1. Structural validation (`validator`): roster size, id lengths
//! 2. Semantic validation: duplicate ids, at most one fixed-ticket player,
//!    fixed-ticket text that parses to exactly five tickets
//! 3. Clamping: numeric fields are clamped into range, never rejected
//!
//! ```yaml
//! years: 25
//! add_on: power-play
//! seed: 1234
//! start_jackpot: 20000000
//! players:
//!   - { id: A, strategy: quick-pick }
//!   - { id: B, strategy: filtered }
//!   - { id: C, strategy: fixed }
//! fixed_tickets: |
//!   3 11 19 42 65 | 7
//!   ...
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::clock::PERIODS_PER_YEAR;
use crate::engine::events::NarrativeConfig;
use crate::error::{SimError, SimResult};
use crate::lottery::rules::{clamp_jackpot, AddOnMode, MIN_JACKPOT};
use crate::lottery::strategy::{FilterConfig, FixedTickets, StrategyKind};

/// Most players a run can hold.
pub const MAX_PLAYERS: usize = 5;
/// Longest run in years.
pub const MAX_YEARS: u32 = 100;
/// Cash each player starts with unless configured otherwise.
pub const DEFAULT_STARTING_BALANCE: f64 = 100_000.0;

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Years to simulate (clamped to 1-100).
    #[serde(default = "default_years")]
    pub years: u32,

    /// Optional add-on bought with every ticket.
    #[serde(default)]
    pub add_on: AddOnMode,

    /// Master seed for the run.
    #[serde(default = "default_seed")]
    pub seed: u32,

    /// Jackpot cash at the first period (clamped to the legal range).
    #[serde(default = "default_start_jackpot")]
    pub start_jackpot: f64,

    /// Calendar start; moved forward to the next draw day.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Cash each player starts with.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,

    /// Player roster in ranking tie-break order.
    #[validate(length(max = 5))]
    #[validate(nested)]
    #[serde(default = "default_players")]
    pub players: Vec<PlayerConfig>,

    /// Settings for the filtered strategy.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Five `w w w w w | pb` lines for the fixed strategy.
    #[serde(default)]
    pub fixed_tickets: Option<String>,

    /// Event detector thresholds.
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

const fn default_years() -> u32 {
    MAX_YEARS
}

const fn default_seed() -> u32 {
    42
}

const fn default_start_jackpot() -> f64 {
    MIN_JACKPOT
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

const fn default_starting_balance() -> f64 {
    DEFAULT_STARTING_BALANCE
}

fn default_players() -> Vec<PlayerConfig> {
    vec![
        PlayerConfig::new("A", StrategyKind::QuickPick),
        PlayerConfig::new("B", StrategyKind::Filtered),
        PlayerConfig::new("C", StrategyKind::Fixed),
    ]
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            years: default_years(),
            add_on: AddOnMode::default(),
            seed: default_seed(),
            start_jackpot: default_start_jackpot(),
            start_date: default_start_date(),
            starting_balance: default_starting_balance(),
            players: default_players(),
            filter: FilterConfig::default(),
            fixed_tickets: None,
            narrative: NarrativeConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns `SimError::YamlParse` if serialization fails.
    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Run structural and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first structural or semantic defect found.
    pub fn check(&self) -> SimResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate constraints the schema cannot express.
    fn validate_semantic(&self) -> SimResult<()> {
        let mut ids = HashSet::new();
        for player in &self.players {
            if !ids.insert(player.id.as_str()) {
                return Err(SimError::config(format!(
                    "player id '{}' is used more than once",
                    player.id
                )));
            }
        }

        let fixed = self
            .players
            .iter()
            .filter(|p| p.enabled && p.strategy == StrategyKind::Fixed)
            .count();
        if fixed > 1 {
            return Err(SimError::config(format!(
                "only one player can use fixed tickets, found {fixed}"
            )));
        }

        if let Some(text) = &self.fixed_tickets {
            FixedTickets::parse(text)?;
        }

        Ok(())
    }

    /// Copy with every numeric field clamped into range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let starting_balance = if self.starting_balance.is_finite() {
            self.starting_balance.max(0.0)
        } else {
            DEFAULT_STARTING_BALANCE
        };
        Self {
            years: self.years.clamp(1, MAX_YEARS),
            start_jackpot: clamp_jackpot(self.start_jackpot),
            starting_balance,
            filter: self.filter.clamped(),
            narrative: self.narrative.clamped(),
            ..self.clone()
        }
    }

    /// Enabled players; a lone quick-pick player `A` if none are enabled.
    #[must_use]
    pub fn roster(&self) -> Vec<PlayerConfig> {
        let enabled: Vec<PlayerConfig> = self.players.iter().filter(|p| p.enabled).cloned().collect();
        if enabled.is_empty() {
            vec![PlayerConfig::new("A", StrategyKind::QuickPick)]
        } else {
            enabled
        }
    }

    /// The fixed ticket set, if an enabled player needs one.
    ///
    /// Uses the configured text when present, otherwise draws a default set
    /// from the stream derived from the run seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured text does not parse.
    pub fn fixed_ticket_set(&self) -> SimResult<Option<FixedTickets>> {
        let needed = self
            .roster()
            .iter()
            .any(|p| p.strategy == StrategyKind::Fixed);
        if !needed {
            return Ok(None);
        }
        match &self.fixed_tickets {
            Some(text) => FixedTickets::parse(text).map(Some),
            None => Ok(Some(FixedTickets::from_seed(self.seed))),
        }
    }

    /// Number of draw periods the run covers.
    #[must_use]
    pub fn total_periods(&self) -> usize {
        self.years.clamp(1, MAX_YEARS) as usize * PERIODS_PER_YEAR
    }
}

/// One player slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    /// Short identifier shown in rankings.
    #[validate(length(min = 1, max = 8))]
    pub id: String,
    /// Display name; defaults to `Player <id>`.
    #[serde(default)]
    pub name: String,
    /// Ticket strategy.
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Disabled players are left out of the run.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_true() -> bool {
    true
}

impl PlayerConfig {
    /// Enabled player named `Player <id>`.
    #[must_use]
    pub fn new(id: impl Into<String>, strategy: StrategyKind) -> Self {
        let id = id.into();
        Self {
            name: format!("Player {id}"),
            id,
            strategy,
            enabled: true,
        }
    }

    /// Display name, falling back to `Player <id>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Player {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Clone, Default)]
pub struct RunConfigBuilder {
    years: Option<u32>,
    add_on: Option<AddOnMode>,
    seed: Option<u32>,
    start_jackpot: Option<f64>,
    start_date: Option<NaiveDate>,
    starting_balance: Option<f64>,
    players: Vec<PlayerConfig>,
    filter: Option<FilterConfig>,
    fixed_tickets: Option<String>,
    narrative: Option<NarrativeConfig>,
}

impl RunConfigBuilder {
    /// Set the number of years.
    #[must_use]
    pub const fn years(mut self, years: u32) -> Self {
        self.years = Some(years);
        self
    }

    /// Set the add-on mode.
    #[must_use]
    pub const fn add_on(mut self, add_on: AddOnMode) -> Self {
        self.add_on = Some(add_on);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the starting jackpot.
    #[must_use]
    pub const fn start_jackpot(mut self, cash: f64) -> Self {
        self.start_jackpot = Some(cash);
        self
    }

    /// Set the calendar start.
    #[must_use]
    pub const fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Set each player's starting cash.
    #[must_use]
    pub const fn starting_balance(mut self, cash: f64) -> Self {
        self.starting_balance = Some(cash);
        self
    }

    /// Add a player. Without any, the default three-player roster is used.
    #[must_use]
    pub fn player(mut self, id: impl Into<String>, strategy: StrategyKind) -> Self {
        self.players.push(PlayerConfig::new(id, strategy));
        self
    }

    /// Set the filtered-strategy settings.
    #[must_use]
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the fixed-ticket text.
    #[must_use]
    pub fn fixed_tickets(mut self, text: impl Into<String>) -> Self {
        self.fixed_tickets = Some(text.into());
        self
    }

    /// Set the event detector thresholds.
    #[must_use]
    pub fn narrative(mut self, narrative: NarrativeConfig) -> Self {
        self.narrative = Some(narrative);
        self
    }

    /// Build the configuration. Validation happens when an engine is created.
    #[must_use]
    pub fn build(self) -> RunConfig {
        let mut config = RunConfig::default();

        if let Some(years) = self.years {
            config.years = years;
        }
        if let Some(add_on) = self.add_on {
            config.add_on = add_on;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(cash) = self.start_jackpot {
            config.start_jackpot = cash;
        }
        if let Some(date) = self.start_date {
            config.start_date = date;
        }
        if let Some(cash) = self.starting_balance {
            config.starting_balance = cash;
        }
        if !self.players.is_empty() {
            config.players = self.players;
        }
        if let Some(filter) = self.filter {
            config.filter = filter;
        }
        config.fixed_tickets = self.fixed_tickets;
        if let Some(narrative) = self.narrative {
            config.narrative = narrative;
        }

        config
    }
}
