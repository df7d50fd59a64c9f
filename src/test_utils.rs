//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults, plus a
//! recording [`Surface`] mock for reconciler tests.

use crate::{
    core::{events, limits::Tier, players, reconciler::Surface, teams},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::sync::{Mutex, PoisonError};

/// Guild id used by all test fixtures.
pub const TEST_GUILD: &str = "guild-test";

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool is pinned to a single connection: each pooled connection to
/// `sqlite::memory:` would otherwise get its own empty database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a free-tier test team with no bound role.
pub async fn create_test_team(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::team::Model> {
    teams::create_team(db, TEST_GUILD, name, None, Tier::Free, "test_admin").await
}

/// Creates a free-tier test team bound to the given role.
pub async fn create_test_team_with_role(
    db: &DatabaseConnection,
    name: &str,
    role_id: &str,
) -> Result<entities::team::Model> {
    teams::create_team(db, TEST_GUILD, name, Some(role_id), Tier::Free, "test_admin").await
}

/// Creates a test team with custom role and tier.
/// Use this when you need to test specific tier configurations.
pub async fn create_custom_team(
    db: &DatabaseConnection,
    name: &str,
    role_id: Option<&str>,
    tier: &str,
) -> Result<entities::team::Model> {
    teams::create_team(db, TEST_GUILD, name, role_id, tier.parse()?, "test_admin").await
}

/// Creates a test event with sensible defaults, optionally bound to an
/// announcement message in channel `"chan-1"`.
///
/// # Defaults
/// * `date`: "Feb 15"
/// * `time`: "7:00 PM EST"
/// * `game_type` / `notes`: None
pub async fn create_test_event(
    db: &DatabaseConnection,
    team_id: i64,
    name: &str,
    message_id: Option<&str>,
) -> Result<entities::event::Model> {
    let event =
        events::create_event(db, team_id, name, "Feb 15", "7:00 PM EST", None, None, "test_admin")
            .await?;
    match message_id {
        Some(message_id) => events::bind_announcement(db, event.id, "chan-1", message_id).await,
        None => Ok(event),
    }
}

/// Creates a player record directly through the registry.
pub async fn create_test_player(
    db: &DatabaseConnection,
    team_id: i64,
    discord_id: &str,
    username: &str,
) -> Result<entities::player::Model> {
    // A permissive config so fixtures are never limit-gated
    let limits = crate::core::limits::LimitConfig {
        free: crate::core::limits::TierLimits {
            max_players: None,
            history_days: Some(30),
        },
        ..Default::default()
    };
    players::resolve_or_create(db, &limits, discord_id, username, team_id).await
}

/// Fills a team with `n` distinct players.
pub async fn fill_team(db: &DatabaseConnection, team_id: i64, n: u32) -> Result<()> {
    for i in 0..n {
        create_test_player(db, team_id, &format!("filler-{i}"), &format!("player{i}")).await?;
    }
    Ok(())
}

/// Sets up a complete test environment with a team, a bound event, and one
/// player. Returns (db, team, event, player) for ledger-level tests.
pub async fn setup_with_event_and_player() -> Result<(
    DatabaseConnection,
    entities::team::Model,
    entities::event::Model,
    entities::player::Model,
)> {
    let db = setup_test_db().await?;
    let team = create_test_team(&db, "Test Team").await?;
    let event = create_test_event(&db, team.id, "Test Event", Some("msg-test")).await?;
    let player = create_test_player(&db, team.id, "111", "alice").await?;
    Ok((db, team, event, player))
}

/// A [`Surface`] that records every side effect instead of talking to
/// Discord.
#[derive(Debug, Default)]
pub struct MockSurface {
    removals: Mutex<Vec<(String, String)>>,
    notices: Mutex<Vec<(String, String)>>,
}

impl MockSurface {
    /// Recorded reaction removals as (user id, emoji) pairs.
    pub fn removals(&self) -> Vec<(String, String)> {
        self.removals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded notices as (user id, text) pairs.
    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Surface for MockSurface {
    async fn remove_reaction(
        &self,
        _channel_id: &str,
        _message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> Result<()> {
        self.removals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((user_id.to_string(), emoji.to_string()));
        Ok(())
    }

    async fn notify_actor(&self, user_id: &str, text: &str) -> Result<()> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((user_id.to_string(), text.to_string()));
        Ok(())
    }
}
