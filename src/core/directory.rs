//! Team/event directory - read-only lookups feeding the reconciler and the
//! Discord commands.
//!
//! All lookups are side-effect free and rely on the storage engine for any
//! caching; nothing here mutates state.

use crate::{
    entities::{Event, Player, Response, Team, event, player, team},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};

/// Returns all teams in a guild, newest first.
pub async fn teams_for_guild(db: &DatabaseConnection, guild_id: &str) -> Result<Vec<team::Model>> {
    Team::find()
        .filter(team::Column::GuildId.eq(guild_id))
        .order_by_desc(team::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the guild's teams whose bound role appears in the caller-supplied
/// set of role ids the member holds. This is the membership predicate used
/// by the role gate and by every "your teams" command surface.
pub async fn teams_where_member_has_role(
    db: &DatabaseConnection,
    guild_id: &str,
    member_roles: &[String],
) -> Result<Vec<team::Model>> {
    let teams = teams_for_guild(db, guild_id).await?;
    Ok(teams
        .into_iter()
        .filter(|t| {
            t.role_id
                .as_ref()
                .is_some_and(|role| member_roles.iter().any(|held| held == role))
        })
        .collect())
}

/// Finds the team bound to a role, if any.
pub async fn team_by_role_id(
    db: &DatabaseConnection,
    role_id: &str,
) -> Result<Option<team::Model>> {
    Team::find()
        .filter(team::Column::RoleId.eq(role_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a team by its id.
pub async fn team_by_id(db: &DatabaseConnection, team_id: i64) -> Result<Option<team::Model>> {
    Team::find_by_id(team_id).one(db).await.map_err(Into::into)
}

/// Finds a team in a guild by (case-insensitive) name.
pub async fn team_by_name(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
) -> Result<Option<team::Model>> {
    let teams = teams_for_guild(db, guild_id).await?;
    Ok(teams
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name)))
}

/// Resolves an announcement message back to its event and owning team.
///
/// Returns None when the message is not an event announcement; raw reactions
/// on such messages are ignored by the reconciler.
pub async fn event_by_message_id(
    db: &DatabaseConnection,
    message_id: &str,
) -> Result<Option<(event::Model, team::Model)>> {
    let found = Event::find()
        .filter(event::Column::MessageId.eq(message_id))
        .find_also_related(Team)
        .one(db)
        .await?;

    // An event without its team means the team was deleted mid-flow; treat
    // the message as no longer an event announcement.
    Ok(found.and_then(|(event, team)| team.map(|t| (event, t))))
}

/// Finds an event by id together with its owning team.
pub async fn event_by_id(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Option<(event::Model, team::Model)>> {
    let found = Event::find_by_id(event_id)
        .find_also_related(Team)
        .one(db)
        .await?;
    Ok(found.and_then(|(event, team)| team.map(|t| (event, t))))
}

/// Returns a team's most recent events, newest first.
pub async fn events_for_team(
    db: &DatabaseConnection,
    team_id: i64,
    limit: u64,
) -> Result<Vec<event::Model>> {
    Event::find()
        .filter(event::Column::TeamId.eq(team_id))
        .order_by_desc(event::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns a team's events created on or after `cutoff`, newest first.
///
/// A `None` cutoff means the whole history; callers derive the cutoff from
/// the team's tier retention horizon.
pub async fn events_for_team_since(
    db: &DatabaseConnection,
    team_id: i64,
    cutoff: Option<DateTimeUtc>,
) -> Result<Vec<event::Model>> {
    let mut query = Event::find().filter(event::Column::TeamId.eq(team_id));
    if let Some(cutoff) = cutoff {
        query = query.filter(event::Column::CreatedAt.gte(cutoff));
    }
    query
        .order_by_desc(event::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Instance-wide row counts shown by the stats overview command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalCounts {
    /// Teams across all guilds
    pub teams: u64,
    /// Registered players
    pub players: u64,
    /// Events created
    pub events: u64,
    /// Responses recorded
    pub responses: u64,
}

/// Counts every team, player, event, and response the bot tracks.
pub async fn global_counts(db: &DatabaseConnection) -> Result<GlobalCounts> {
    Ok(GlobalCounts {
        teams: Team::find().count(db).await?,
        players: Player::find().count(db).await?,
        events: Event::find().count(db).await?,
        responses: Response::find().count(db).await?,
    })
}

/// Returns all players on a team, ordered by username.
pub async fn players_for_team(
    db: &DatabaseConnection,
    team_id: i64,
) -> Result<Vec<player::Model>> {
    Player::find()
        .filter(player::Column::TeamId.eq(team_id))
        .order_by_asc(player::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a team-scoped player record for a Discord user, if one exists.
pub async fn find_player(
    db: &DatabaseConnection,
    discord_id: &str,
    team_id: i64,
) -> Result<Option<player::Model>> {
    Player::find()
        .filter(player::Column::DiscordId.eq(discord_id))
        .filter(player::Column::TeamId.eq(team_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Counts the players currently on a team. The registry re-runs this count
/// immediately before every limit evaluation to avoid stale reads.
pub async fn player_count(db: &DatabaseConnection, team_id: i64) -> Result<u64> {
    Player::find()
        .filter(player::Column::TeamId.eq(team_id))
        .count(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_teams_where_member_has_role() -> Result<()> {
        let db = setup_test_db().await?;
        let alpha = create_test_team_with_role(&db, "Alpha", "role-a").await?;
        let _beta = create_test_team_with_role(&db, "Beta", "role-b").await?;

        let held = vec!["role-a".to_string(), "role-z".to_string()];
        let teams = teams_where_member_has_role(&db, TEST_GUILD, &held).await?;
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].id, alpha.id);

        let none = teams_where_member_has_role(&db, TEST_GUILD, &[]).await?;
        assert!(none.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_event_by_message_id() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        let event = create_test_event(&db, team.id, "Scrim", Some("msg-1")).await?;

        let found = event_by_message_id(&db, "msg-1").await?;
        let (found_event, found_team) = found.unwrap();
        assert_eq!(found_event.id, event.id);
        assert_eq!(found_team.id, team.id);

        assert!(event_by_message_id(&db, "msg-unknown").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_player_count_and_find() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        assert_eq!(player_count(&db, team.id).await?, 0);

        let created = create_test_player(&db, team.id, "111", "alice").await?;
        assert_eq!(player_count(&db, team.id).await?, 1);

        let found = find_player(&db, "111", team.id).await?.unwrap();
        assert_eq!(found.id, created.id);
        assert!(find_player(&db, "222", team.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_events_for_team_since_applies_cutoff() -> Result<()> {
        use chrono::{Duration, Utc};
        use sea_orm::Set;

        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha").await?;
        let old = create_test_event(&db, team.id, "Old", Some("msg-1")).await?;
        let fresh = create_test_event(&db, team.id, "Fresh", Some("msg-2")).await?;

        let mut active: event::ActiveModel = old.into();
        active.created_at = Set(Utc::now() - Duration::days(45));
        active.update(&db).await?;

        let within = events_for_team_since(&db, team.id, Some(Utc::now() - Duration::days(30)))
            .await?;
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].id, fresh.id);

        // No cutoff: the whole history, newest first
        let all = events_for_team_since(&db, team.id, None).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, fresh.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_global_counts() -> Result<()> {
        use crate::core::responses::{Status, set_response};

        let db = setup_test_db().await?;
        assert_eq!(global_counts(&db).await?, GlobalCounts::default());

        let team = create_test_team(&db, "Alpha").await?;
        let event = create_test_event(&db, team.id, "Scrim", Some("msg-1")).await?;
        let player = create_test_player(&db, team.id, "111", "alice").await?;
        set_response(&db, player.id, event.id, Status::Available).await?;

        assert_eq!(
            global_counts(&db).await?,
            GlobalCounts {
                teams: 1,
                players: 1,
                events: 1,
                responses: 1,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_team_by_name_is_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team(&db, "Alpha Squad").await?;

        let found = team_by_name(&db, TEST_GUILD, "alpha squad").await?.unwrap();
        assert_eq!(found.id, team.id);
        assert!(team_by_name(&db, TEST_GUILD, "Bravo").await?.is_none());
        Ok(())
    }
}
