//! Retention sweep - removes events (and their responses) older than each
//! team's tier allows. Runs once at startup and then daily from a background
//! task.

use crate::{
    core::limits::{LimitConfig, Tier},
    entities::{Event, Response, Team, event, response},
    errors::Result,
};
use chrono::{Duration, Utc};
use sea_orm::prelude::*;
use tracing::{info, warn};

/// Totals removed by one retention sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    /// Events removed across all teams
    pub events: u64,
    /// Responses removed with them
    pub responses: u64,
}

/// Sweeps all teams, deleting events created before each team's retention
/// horizon together with their responses. Tiers with unlimited history are
/// skipped entirely.
pub async fn purge_expired_events(
    db: &DatabaseConnection,
    limits: &LimitConfig,
) -> Result<PurgeSummary> {
    let mut summary = PurgeSummary::default();
    let now = Utc::now();

    for team in Team::find().all(db).await? {
        let tier: Tier = match team.tier.parse() {
            Ok(tier) => tier,
            Err(e) => {
                warn!(team = %team.name, error = %e, "skipping team with bad tier");
                continue;
            }
        };
        let Some(days) = limits.for_tier(tier).history_days else {
            continue;
        };
        let cutoff = now - Duration::days(days);

        let expired: Vec<i64> = Event::find()
            .filter(event::Column::TeamId.eq(team.id))
            .filter(event::Column::CreatedAt.lt(cutoff))
            .all(db)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        if expired.is_empty() {
            continue;
        }

        let responses = Response::delete_many()
            .filter(response::Column::EventId.is_in(expired.clone()))
            .exec(db)
            .await?
            .rows_affected;
        let events = Event::delete_many()
            .filter(event::Column::Id.is_in(expired))
            .exec(db)
            .await?
            .rows_affected;

        info!(team = %team.name, events, responses, "purged expired events");
        summary.events += events;
        summary.responses += responses;
    }

    Ok(summary)
}
