//! Player registry - resolves a (Discord user, team) pair to a persisted
//! player record, creating it subject to the limit evaluator's verdict.
//!
//! The unique constraint on (`discord_id`, `team_id`) is the authoritative
//! de-duplication mechanism: when two concurrent resolutions race past the
//! existence check, the loser's insert comes back as `RecordNotInserted` and
//! is re-read as the winner's row instead of surfacing an error. The limit
//! check is advisory under that race (accepted soft-limit semantic).

use crate::{
    core::{directory, limits::LimitConfig},
    entities::{Player, Response, player, response},
    errors::{Error, Result},
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{Set, prelude::*};
use tracing::{debug, info, warn};

/// Resolves or lazily creates the player record for a Discord user on a team.
///
/// Existing players get their stored username refreshed when it has changed
/// (a best-effort side effect that never fails the call). Missing players
/// are created only when the team's tier permits another member; otherwise
/// the call fails with [`Error::LimitExceeded`] carrying the tier and cap
/// for presentation.
pub async fn resolve_or_create(
    db: &DatabaseConnection,
    limits: &LimitConfig,
    discord_id: &str,
    username: &str,
    team_id: i64,
) -> Result<player::Model> {
    if let Some(existing) = directory::find_player(db, discord_id, team_id).await? {
        return Ok(refresh_username(db, existing, username).await);
    }

    let team = directory::team_by_id(db, team_id)
        .await?
        .ok_or_else(|| Error::TeamNotFound {
            key: team_id.to_string(),
        })?;
    let tier = team.tier.parse()?;

    let current = directory::player_count(db, team_id).await?;
    let verdict = limits.evaluate(tier, current);
    if !verdict.allowed {
        return Err(Error::LimitExceeded {
            tier,
            // A disallowed verdict always carries the finite cap
            limit: verdict.limit.unwrap_or_default(),
        });
    }

    let row = player::ActiveModel {
        discord_id: Set(discord_id.to_string()),
        username: Set(username.to_string()),
        team_id: Set(team_id),
        ..Default::default()
    };

    let insert = Player::insert(row)
        .on_conflict(
            OnConflict::columns([player::Column::DiscordId, player::Column::TeamId])
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await;

    match insert {
        Ok(result) => {
            debug!(
                discord_id,
                team_id,
                count = current + 1,
                "created player record"
            );
            Player::find_by_id(result.last_insert_id)
                .one(db)
                .await?
                .ok_or(Error::Database(DbErr::RecordNotFound(
                    "player vanished after insert".to_string(),
                )))
        }
        // Lost a create race: another task inserted the same pair between
        // our existence check and this insert. Return the winner's row.
        Err(DbErr::RecordNotInserted) => directory::find_player(db, discord_id, team_id)
            .await?
            .ok_or(Error::Database(DbErr::RecordNotFound(
                "player missing after conflicting insert".to_string(),
            ))),
        Err(e) => Err(e.into()),
    }
}

/// Updates the stored username when the observed one differs. Failures are
/// logged and swallowed; the caller still gets a usable player record.
async fn refresh_username(
    db: &DatabaseConnection,
    existing: player::Model,
    username: &str,
) -> player::Model {
    if existing.username == username {
        return existing;
    }

    let mut active: player::ActiveModel = existing.clone().into();
    active.username = Set(username.to_string());
    match active.update(db).await {
        Ok(updated) => updated,
        Err(e) => {
            warn!(player_id = existing.id, error = %e, "failed to refresh username");
            existing
        }
    }
}

/// What a registry prune removed, for the sync confirmation message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Player records removed
    pub players: u64,
    /// Responses removed with them
    pub responses: u64,
}

/// Removes player records for users who no longer hold the team's role,
/// along with their responses. `current_member_ids` is the set of Discord
/// user ids that still hold the role.
pub async fn prune_departed(
    db: &DatabaseConnection,
    team_id: i64,
    current_member_ids: &[String],
) -> Result<PruneSummary> {
    let departed: Vec<i64> = directory::players_for_team(db, team_id)
        .await?
        .into_iter()
        .filter(|p| !current_member_ids.contains(&p.discord_id))
        .map(|p| p.id)
        .collect();
    if departed.is_empty() {
        return Ok(PruneSummary::default());
    }

    let responses = Response::delete_many()
        .filter(response::Column::PlayerId.is_in(departed.clone()))
        .exec(db)
        .await?
        .rows_affected;
    let players = Player::delete_many()
        .filter(player::Column::Id.is_in(departed))
        .exec(db)
        .await?
        .rows_affected;

    info!(team_id, players, responses, "pruned departed players");
    Ok(PruneSummary { players, responses })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::limits::Tier;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_creates_player_lazily() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        let limits = LimitConfig::default();

        let player = resolve_or_create(&db, &limits, "111", "alice", team.id).await?;
        assert_eq!(player.discord_id, "111");
        assert_eq!(player.username, "alice");
        assert_eq!(directory::player_count(&db, team.id).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_returns_existing_player_unchanged() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        let limits = LimitConfig::default();

        let first = resolve_or_create(&db, &limits, "111", "alice", team.id).await?;
        let second = resolve_or_create(&db, &limits, "111", "alice", team.id).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(directory::player_count(&db, team.id).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_refreshes_changed_username() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        let limits = LimitConfig::default();

        let first = resolve_or_create(&db, &limits, "111", "alice", team.id).await?;
        let renamed = resolve_or_create(&db, &limits, "111", "alicia", team.id).await?;
        assert_eq!(renamed.id, first.id);
        assert_eq!(renamed.username, "alicia");
        Ok(())
    }

    #[tokio::test]
    async fn test_limit_exceeded_leaves_table_unchanged() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        let limits = LimitConfig::default();

        fill_team(&db, team.id, 15).await?;

        let result = resolve_or_create(&db, &limits, "999", "late", team.id).await;
        match result {
            Err(Error::LimitExceeded { tier, limit }) => {
                assert_eq!(tier, Tier::Free);
                assert_eq!(limit, 15);
            }
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
        assert_eq!(directory::player_count(&db, team.id).await?, 15);
        Ok(())
    }

    #[tokio::test]
    async fn test_unbounded_tier_has_no_cap() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_custom_team(&db, "Pros", None, "pro").await?;
        let limits = LimitConfig::default();

        fill_team(&db, team.id, 20).await?;
        let player = resolve_or_create(&db, &limits, "999", "extra", team.id).await?;
        assert_eq!(player.username, "extra");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_race_loser_returns_winner_row() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        let limits = LimitConfig::default();

        // Two resolutions for the same pair interleaved: both may observe
        // "no existing player", the unique index arbitrates.
        let (a, b) = tokio::join!(
            resolve_or_create(&db, &limits, "111", "alice", team.id),
            resolve_or_create(&db, &limits, "111", "alice", team.id),
        );
        let a = a?;
        let b = b?;
        assert_eq!(a.id, b.id);
        assert_eq!(directory::player_count(&db, team.id).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_prune_departed_removes_players_and_responses() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        let event = create_test_event(&db, team.id, "Scrim", Some("msg-1")).await?;
        let stays = create_test_player(&db, team.id, "111", "alice").await?;
        let leaves = create_test_player(&db, team.id, "222", "bob").await?;
        crate::core::responses::set_response(
            &db,
            leaves.id,
            event.id,
            crate::core::responses::Status::Available,
        )
        .await?;

        let summary = prune_departed(&db, team.id, &["111".to_string()]).await?;
        assert_eq!(
            summary,
            PruneSummary {
                players: 1,
                responses: 1,
            }
        );

        let remaining = directory::players_for_team(&db, team.id).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, stays.id);

        // Nothing left to prune on a second pass
        let again = prune_departed(&db, team.id, &["111".to_string()]).await?;
        assert_eq!(again, PruneSummary::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_team_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let limits = LimitConfig::default();

        let result = resolve_or_create(&db, &limits, "111", "alice", 12345).await;
        assert!(matches!(result, Err(Error::TeamNotFound { .. })));
        Ok(())
    }
}
