//! Roster aggregation - turns the response ledger into the per-event view
//! coaches actually read: who is in, who is out, who is unsure, and who has
//! said nothing at all.

use crate::{
    core::{directory, responses, responses::Status},
    entities::event,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Usernames grouped by status for one event, plus the team members who have
/// not responded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRoster {
    /// Players marked available
    pub available: Vec<String>,
    /// Players marked unavailable
    pub unavailable: Vec<String>,
    /// Players marked maybe
    pub maybe: Vec<String>,
    /// Registered team players with no response for this event
    pub no_response: Vec<String>,
}

impl EventRoster {
    /// Number of players that have responded either way.
    #[must_use]
    pub fn responded(&self) -> usize {
        self.available.len() + self.unavailable.len() + self.maybe.len()
    }
}

/// Builds the roster view for an event from the ledger and the team's
/// player registry.
///
/// Responses whose player record was deleted out from under them are
/// dropped rather than shown as anonymous entries.
pub async fn event_roster(db: &DatabaseConnection, event: &event::Model) -> Result<EventRoster> {
    let rows = responses::responses_for_event(db, event.id).await?;
    let players = directory::players_for_team(db, event.team_id).await?;

    let mut roster = EventRoster::default();
    let mut responded_ids = Vec::with_capacity(rows.len());

    for (response, player) in rows {
        let Some(player) = player else { continue };
        responded_ids.push(player.id);
        match response.status.parse::<Status>() {
            Ok(Status::Available) => roster.available.push(player.username),
            Ok(Status::Unavailable) => roster.unavailable.push(player.username),
            Ok(Status::Maybe) => roster.maybe.push(player.username),
            // An unparseable status row is skipped rather than miscounted
            Err(_) => {}
        }
    }

    roster.no_response = players
        .into_iter()
        .filter(|p| !responded_ids.contains(&p.id))
        .map(|p| p.username)
        .collect();

    Ok(roster)
}
