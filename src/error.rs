//! Error types for lotto-logic.
//!
//! Every fallible operation returns `Result<T, SimError>`. Configuration
//! defects are surfaced before a run starts; inside a run the only error
//! source is the invariant guard, which treats any broken invariant as fatal.

use thiserror::Error;

/// Result type alias for lotto-logic operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all lotto-logic operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// A fixed-ticket line could not be parsed or broke a ticket rule.
    #[error("Invalid ticket on line {line}: {reason}")]
    InvalidTicket {
        /// 1-based line number in the ticket text.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The fixed-ticket text did not hold exactly five tickets.
    #[error("Fixed tickets require exactly 5 lines (`w w w w w | pb`), found {found}")]
    TicketCount {
        /// Number of non-empty lines found.
        found: usize,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Structural validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ===== Run Errors =====
    /// A ledger or jackpot invariant was broken mid-run.
    #[error("Invariant '{name}' violated: {detail}")]
    InvariantViolation {
        /// Name of the violated invariant.
        name: String,
        /// What was observed.
        detail: String,
    },
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid-ticket error for a 1-based line number.
    #[must_use]
    pub fn invalid_ticket(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidTicket {
            line,
            reason: reason.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an invariant violation.
    #[must_use]
    pub fn invariant(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            name: name.into(),
            detail: detail.into(),
        }
    }

    /// Whether this error was raised before the run started.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::InvalidTicket { .. }
                | Self::TicketCount { .. }
                | Self::YamlParse(_)
                | Self::Validation(_)
        )
    }
}
