//! Team lifecycle - creation with role binding and explicit cascading
//! deletion.
//!
//! A guild may hold several teams, each bound to its own Discord role; the
//! role is what makes membership checkable without any join table. Deletion
//! cascades in the application rather than relying on foreign-key pragmas,
//! so the removal order (responses, then events and players, then the team)
//! is the same on every backend.

use crate::{
    core::{directory, limits::Tier},
    entities::{Event, Player, Response, Team, event, player, response, team},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Maximum accepted team name length.
const MAX_NAME_LEN: usize = 50;

/// What a team deletion removed, for confirmation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamDeletion {
    /// Player records removed
    pub players: u64,
    /// Events removed
    pub events: u64,
    /// Responses removed
    pub responses: u64,
}

/// Creates a team in a guild, optionally binding it to a Discord role.
///
/// Fails with [`Error::InvalidInput`] for an empty or over-long name or a
/// duplicate name within the guild, and with [`Error::RoleAlreadyLinked`]
/// when the role is already bound to another team in the guild.
pub async fn create_team(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    role_id: Option<&str>,
    tier: Tier,
    created_by: &str,
) -> Result<team::Model> {
    let name = name.trim();
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidInput {
            message: format!("team name must be 1-{MAX_NAME_LEN} characters"),
        });
    }

    if directory::team_by_name(db, guild_id, name).await?.is_some() {
        return Err(Error::InvalidInput {
            message: format!("a team named '{name}' already exists in this server"),
        });
    }

    if let Some(role) = role_id {
        if let Some(holder) = directory::team_by_role_id(db, role).await? {
            return Err(Error::RoleAlreadyLinked {
                team_name: holder.name,
            });
        }
    }

    let row = team::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        name: Set(name.to_string()),
        role_id: Set(role_id.map(ToString::to_string)),
        tier: Set(tier.as_str().to_string()),
        created_by: Set(created_by.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = row.insert(db).await?;
    info!(guild_id, team = %created.name, %tier, "created team");
    Ok(created)
}

/// Changes a team's subscription tier.
pub async fn set_tier(db: &DatabaseConnection, team_id: i64, tier: Tier) -> Result<team::Model> {
    let team = directory::team_by_id(db, team_id)
        .await?
        .ok_or_else(|| Error::TeamNotFound {
            key: team_id.to_string(),
        })?;

    let mut active: team::ActiveModel = team.into();
    active.tier = Set(tier.as_str().to_string());
    let updated = active.update(db).await?;
    info!(team = %updated.name, %tier, "tier updated");
    Ok(updated)
}

/// Deletes a team and everything hanging off it.
///
/// Responses go first (keyed by the team's events), then events and players,
/// then the team row itself, so a crash mid-way never strands a response
/// pointing at a deleted event.
pub async fn delete_team(db: &DatabaseConnection, team_id: i64) -> Result<TeamDeletion> {
    let team = directory::team_by_id(db, team_id)
        .await?
        .ok_or_else(|| Error::TeamNotFound {
            key: team_id.to_string(),
        })?;

    let event_ids: Vec<i64> = Event::find()
        .filter(event::Column::TeamId.eq(team_id))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();

    let responses = if event_ids.is_empty() {
        0
    } else {
        Response::delete_many()
            .filter(response::Column::EventId.is_in(event_ids))
            .exec(db)
            .await?
            .rows_affected
    };

    let events = Event::delete_many()
        .filter(event::Column::TeamId.eq(team_id))
        .exec(db)
        .await?
        .rows_affected;

    let players = Player::delete_many()
        .filter(player::Column::TeamId.eq(team_id))
        .exec(db)
        .await?
        .rows_affected;

    Team::delete_by_id(team_id).exec(db).await?;
    info!(team = %team.name, players, events, responses, "deleted team");

    Ok(TeamDeletion {
        players,
        events,
        responses,
    })
}
