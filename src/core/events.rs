//! Event lifecycle - creation, announcement binding, and deletion.
//!
//! Date and time stay free text; coaches write "Feb 15" and "7:00 PM EST"
//! and the bot never needs to compute with them. The announcement binding
//! (`message_id`, `channel_id`) is set after the Discord message is posted,
//! which is what makes raw reactions on that message resolvable back to the
//! event.

use crate::{
    core::directory,
    entities::{Event, Response, event, response},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Accepted length range for the event name, and the cap on the free-text
/// date/time fields.
const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 100;
const MAX_FIELD_LEN: usize = 50;

/// Creates an event for a team. The announcement binding starts empty and
/// is filled in by [`bind_announcement`] once the message is posted.
#[allow(clippy::too_many_arguments)]
pub async fn create_event(
    db: &DatabaseConnection,
    team_id: i64,
    name: &str,
    date: &str,
    time: &str,
    game_type: Option<&str>,
    notes: Option<&str>,
    created_by: &str,
) -> Result<event::Model> {
    let name = name.trim();
    let date = date.trim();
    let time = time.trim();
    if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidInput {
            message: format!("event name must be {MIN_NAME_LEN}-{MAX_NAME_LEN} characters"),
        });
    }
    if date.is_empty() || date.len() > MAX_FIELD_LEN {
        return Err(Error::InvalidInput {
            message: "event date is required".to_string(),
        });
    }
    if time.is_empty() || time.len() > MAX_FIELD_LEN {
        return Err(Error::InvalidInput {
            message: "event time is required".to_string(),
        });
    }

    if directory::team_by_id(db, team_id).await?.is_none() {
        return Err(Error::TeamNotFound {
            key: team_id.to_string(),
        });
    }

    let row = event::ActiveModel {
        team_id: Set(team_id),
        name: Set(name.to_string()),
        date: Set(date.to_string()),
        time: Set(time.to_string()),
        game_type: Set(game_type.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())),
        notes: Set(notes.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())),
        created_by: Set(created_by.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = row.insert(db).await?;
    info!(team_id, event = %created.name, "created event");
    Ok(created)
}

/// Binds an event to its posted announcement message.
pub async fn bind_announcement(
    db: &DatabaseConnection,
    event_id: i64,
    channel_id: &str,
    message_id: &str,
) -> Result<event::Model> {
    let (event, _team) = directory::event_by_id(db, event_id)
        .await?
        .ok_or_else(|| Error::EventNotFound {
            key: event_id.to_string(),
        })?;

    let mut active: event::ActiveModel = event.into();
    active.channel_id = Set(Some(channel_id.to_string()));
    active.message_id = Set(Some(message_id.to_string()));
    active.update(db).await.map_err(Into::into)
}

/// Deletes an event and its responses. Returns the number of responses that
/// went with it.
pub async fn delete_event(db: &DatabaseConnection, event_id: i64) -> Result<u64> {
    let (event, _team) = directory::event_by_id(db, event_id)
        .await?
        .ok_or_else(|| Error::EventNotFound {
            key: event_id.to_string(),
        })?;

    let responses = Response::delete_many()
        .filter(response::Column::EventId.eq(event_id))
        .exec(db)
        .await?
        .rows_affected;
    Event::delete_by_id(event_id).exec(db).await?;
    info!(event = %event.name, responses, "deleted event");
    Ok(responses)
}
