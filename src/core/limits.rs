//! Limit evaluator - tier-based player caps and retention horizons.
//!
//! Pure decision logic over counts and configuration; no I/O. The player
//! registry consults [`LimitConfig::evaluate`] before creating a player, and
//! the retention sweep consults [`TierLimits::history_days`] to decide which
//! teams' old events to purge.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Subscription tier governing a team's limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Free tier: capped players, bounded event history
    Free,
    /// Starter tier: unlimited players, bounded event history
    Starter,
    /// Pro tier: unlimited everything
    Pro,
    /// Enterprise tier: unlimited everything
    Enterprise,
}

impl Tier {
    /// The string stored in the `teams.tier` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "free" => Ok(Self::Free),
            "starter" => Ok(Self::Starter),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(Error::Config {
                message: format!("unknown tier '{other}'"),
            }),
        }
    }
}

/// The limits attached to one tier. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TierLimits {
    /// Maximum number of players per team, None for unlimited
    pub max_players: Option<u32>,
    /// Event retention horizon in days, None for unlimited
    pub history_days: Option<i64>,
}

/// Static tier-to-limits mapping, loadable from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Limits for the free tier
    pub free: TierLimits,
    /// Limits for the starter tier
    pub starter: TierLimits,
    /// Limits for the pro tier
    pub pro: TierLimits,
    /// Limits for the enterprise tier
    pub enterprise: TierLimits,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            free: TierLimits {
                max_players: Some(15),
                history_days: Some(30),
            },
            starter: TierLimits {
                max_players: None,
                history_days: Some(90),
            },
            pro: TierLimits {
                max_players: None,
                history_days: None,
            },
            enterprise: TierLimits {
                max_players: None,
                history_days: None,
            },
        }
    }
}

/// The verdict of a player-limit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitVerdict {
    /// Whether a new player may be added
    pub allowed: bool,
    /// The tier's player cap, None for unlimited
    pub limit: Option<u32>,
}

impl LimitConfig {
    /// Returns the limits configured for a tier.
    #[must_use]
    pub const fn for_tier(&self, tier: Tier) -> &TierLimits {
        match tier {
            Tier::Free => &self.free,
            Tier::Starter => &self.starter,
            Tier::Pro => &self.pro,
            Tier::Enterprise => &self.enterprise,
        }
    }

    /// Decides whether a team on `tier` with `current_players` members may
    /// add one more. Deterministic and side-effect free; callers must
    /// re-evaluate under a fresh count rather than caching the verdict.
    #[must_use]
    pub fn evaluate(&self, tier: Tier, current_players: u64) -> LimitVerdict {
        let limit = self.for_tier(tier).max_players;
        let allowed = limit.is_none_or(|max| current_players < u64::from(max));
        LimitVerdict { allowed, limit }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_free_tier_under_limit() {
        let config = LimitConfig::default();
        let verdict = config.evaluate(Tier::Free, 14);
        assert!(verdict.allowed);
        assert_eq!(verdict.limit, Some(15));
    }

    #[test]
    fn test_free_tier_at_limit() {
        let config = LimitConfig::default();
        let verdict = config.evaluate(Tier::Free, 15);
        assert!(!verdict.allowed);
        assert_eq!(verdict.limit, Some(15));
    }

    #[test]
    fn test_free_tier_over_limit() {
        // Possible after a soft-limit race; still disallowed going forward
        let config = LimitConfig::default();
        let verdict = config.evaluate(Tier::Free, 17);
        assert!(!verdict.allowed);
    }

    #[test]
    fn test_unbounded_tiers() {
        let config = LimitConfig::default();
        for tier in [Tier::Starter, Tier::Pro, Tier::Enterprise] {
            let verdict = config.evaluate(tier, 10_000);
            assert!(verdict.allowed, "{tier} should be unbounded");
            assert_eq!(verdict.limit, None);
        }
    }

    #[test]
    fn test_tier_round_trip() {
        for tier in [Tier::Free, Tier::Starter, Tier::Pro, Tier::Enterprise] {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        assert!("premium".parse::<Tier>().is_err());
    }

    #[test]
    fn test_limit_config_from_toml() {
        let config: LimitConfig = toml::from_str(
            r#"
            [free]
            max_players = 5
            history_days = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.free.max_players, Some(5));
        assert_eq!(config.free.history_days, Some(7));
        // Unspecified tiers fall back to defaults
        assert_eq!(config.starter.history_days, Some(90));
    }
}
