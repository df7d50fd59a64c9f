//! Unified error types for `ScrimSync`.
//!
//! Variants split into two families: user errors (limit gate, role gate,
//! missing entities, bad input) that are rendered back to the actor, and
//! system errors (storage, Discord transport, configuration) that are logged
//! and surfaced as a generic failure.

use crate::core::limits::Tier;
use thiserror::Error;

/// All errors that can occur in the application
#[derive(Debug, Error)]
pub enum Error {
    /// Team is at its tier's player cap; carries the tier and the numeric
    /// limit so callers can render a precise message.
    #[error("team is at the {tier} tier limit of {limit} players")]
    LimitExceeded {
        /// Subscription tier of the team that hit the cap
        tier: Tier,
        /// The player cap that was reached
        limit: u32,
    },

    /// The acting user does not hold the role bound to the team
    #[error("you do not have the team role for '{team_name}'")]
    RoleNotMember {
        /// Name of the team whose role is missing
        team_name: String,
    },

    /// The selected role is already bound to another team
    #[error("this role is already linked to the team '{team_name}'")]
    RoleAlreadyLinked {
        /// Name of the team already holding the role
        team_name: String,
    },

    /// Team lookup failed (deleted mid-flow or never existed)
    #[error("team '{key}' no longer exists")]
    TeamNotFound {
        /// Name or id used for the lookup
        key: String,
    },

    /// Event lookup failed (deleted mid-flow or never existed)
    #[error("event '{key}' no longer exists")]
    EventNotFound {
        /// Name or id used for the lookup
        key: String,
    },

    /// User-supplied input failed validation
    #[error("{message}")]
    InvalidInput {
        /// Human-readable description of the problem
        message: String,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Storage engine failure
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serenity/Poise framework error
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// String formatting error (embed/report assembly)
    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

impl Error {
    /// Whether this error should be shown to the acting user as-is.
    ///
    /// User errors are expected outcomes of the role/limit gates and bad
    /// input; they are never logged as failures. Everything else is a system
    /// error: logged with context, rendered as a generic failure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::LimitExceeded { .. }
                | Self::RoleNotMember { .. }
                | Self::RoleAlreadyLinked { .. }
                | Self::TeamNotFound { .. }
                | Self::EventNotFound { .. }
                | Self::InvalidInput { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
