//! Response ledger - the at-most-one-row-per-(player, event) status store.
//!
//! Every mutation is a single atomic upsert or delete keyed by the natural
//! unique key, so partial application is structurally impossible and every
//! write is safe to retry blindly.

use crate::{
    entities::{Player, Response, player, response},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::fmt;
use std::str::FromStr;

/// A player's availability status for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Player will attend
    Available,
    /// Player will not attend
    Unavailable,
    /// Player is unsure
    Maybe,
}

impl Status {
    /// The string stored in the `responses.status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Maybe => "maybe",
        }
    }

    /// The reaction emoji representing this status on event messages.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Available => "✅",
            Self::Unavailable => "❌",
            Self::Maybe => "❓",
        }
    }

    /// Maps a raw reaction emoji to a status. Returns None for emoji that
    /// are not part of the status vocabulary (those reactions are ignored).
    #[must_use]
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        match emoji {
            "✅" => Some(Self::Available),
            "❌" => Some(Self::Unavailable),
            "❓" => Some(Self::Maybe),
            _ => None,
        }
    }

    /// All statuses, in the order their reactions are seeded on messages.
    pub const ALL: [Self; 3] = [Self::Available, Self::Unavailable, Self::Maybe];
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            "maybe" => Ok(Self::Maybe),
            other => Err(Error::Config {
                message: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// Sets a player's status for an event via an atomic upsert.
///
/// The unique key (`player_id`, `event_id`) guarantees at most one row per
/// pair regardless of which input channel the assertion arrived through.
/// Re-asserting the same status is a valid no-op write that still refreshes
/// `updated_at`.
pub async fn set_response(
    db: &DatabaseConnection,
    player_id: i64,
    event_id: i64,
    status: Status,
) -> Result<response::Model> {
    let row = response::ActiveModel {
        player_id: Set(player_id),
        event_id: Set(event_id),
        status: Set(status.as_str().to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    Response::insert(row)
        .on_conflict(
            OnConflict::columns([response::Column::PlayerId, response::Column::EventId])
                .update_columns([response::Column::Status, response::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(db)
        .await?;

    // The upserted row's id differs between the insert and update paths, so
    // re-read by the natural key rather than trusting last_insert_id.
    get_response(db, player_id, event_id)
        .await?
        .ok_or(Error::Database(DbErr::RecordNotFound(
            "response vanished after upsert".to_string(),
        )))
}

/// Deletes a player's response for an event.
///
/// Returns the number of rows removed; retracting with nothing stored is a
/// no-op, not an error.
pub async fn clear_response(
    db: &DatabaseConnection,
    player_id: i64,
    event_id: i64,
) -> Result<u64> {
    let result = Response::delete_many()
        .filter(response::Column::PlayerId.eq(player_id))
        .filter(response::Column::EventId.eq(event_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Fetches a player's current response for an event, if any.
pub async fn get_response(
    db: &DatabaseConnection,
    player_id: i64,
    event_id: i64,
) -> Result<Option<response::Model>> {
    Response::find()
        .filter(response::Column::PlayerId.eq(player_id))
        .filter(response::Column::EventId.eq(event_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Fetches all responses for an event together with the responding players,
/// ordered by most recent assertion first.
pub async fn responses_for_event(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Vec<(response::Model, Option<player::Model>)>> {
    Response::find()
        .filter(response::Column::EventId.eq(event_id))
        .find_also_related(Player)
        .order_by_desc(response::Column::UpdatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_status_emoji_round_trip() {
        for status in Status::ALL {
            assert_eq!(Status::from_emoji(status.emoji()), Some(status));
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        assert_eq!(Status::from_emoji("🎉"), None);
    }

    #[tokio::test]
    async fn test_set_response_creates_single_row() -> Result<()> {
        let (db, _team, event, player) = setup_with_event_and_player().await?;

        let saved = set_response(&db, player.id, event.id, Status::Available).await?;
        assert_eq!(saved.status, "available");

        let rows = Response::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_response_overwrites_previous_status() -> Result<()> {
        let (db, _team, event, player) = setup_with_event_and_player().await?;

        set_response(&db, player.id, event.id, Status::Available).await?;
        let second = set_response(&db, player.id, event.id, Status::Maybe).await?;
        assert_eq!(second.status, "maybe");

        // Still exactly one row for the pair
        let rows = Response::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "maybe");
        Ok(())
    }

    #[tokio::test]
    async fn test_idempotent_reassert_refreshes_updated_at() -> Result<()> {
        let (db, _team, event, player) = setup_with_event_and_player().await?;

        let first = set_response(&db, player.id, event.id, Status::Available).await?;
        let second = set_response(&db, player.id, event.id, Status::Available).await?;

        assert_eq!(second.status, first.status);
        assert!(second.updated_at >= first.updated_at);

        let rows = Response::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_response_is_idempotent() -> Result<()> {
        let (db, _team, event, player) = setup_with_event_and_player().await?;

        // Retract with nothing stored: no row created, no error
        assert_eq!(clear_response(&db, player.id, event.id).await?, 0);

        set_response(&db, player.id, event.id, Status::Maybe).await?;
        assert_eq!(clear_response(&db, player.id, event.id).await?, 1);
        assert_eq!(clear_response(&db, player.id, event.id).await?, 0);

        assert!(get_response(&db, player.id, event.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_responses_for_event_includes_players() -> Result<()> {
        let (db, team, event, player) = setup_with_event_and_player().await?;
        let other = create_test_player(&db, team.id, "222", "beta").await?;

        set_response(&db, player.id, event.id, Status::Available).await?;
        set_response(&db, other.id, event.id, Status::Unavailable).await?;

        let rows = responses_for_event(&db, event.id).await?;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|(_, p)| p.is_some()));
        Ok(())
    }
}
