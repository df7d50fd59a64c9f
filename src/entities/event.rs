//! Event entity - A scheduled occasion owned by one team.
//!
//! Date and time are stored as free text exactly as the coach entered them.
//! `message_id` binds the event to its announcement message once posted, so
//! raw reactions on that message can be resolved back to the event.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Team this event belongs to
    pub team_id: i64,
    /// Event name (e.g., "Tournament Week 5")
    pub name: String,
    /// Event date, free text (e.g., "Feb 15")
    pub date: String,
    /// Event time, free text (e.g., "7:00 PM EST")
    pub time: String,
    /// Game being played, if specified
    pub game_type: Option<String>,
    /// Additional notes, if any
    pub notes: Option<String>,
    /// Discord user ID who created the event
    pub created_by: String,
    /// Discord message ID of the announcement this event is bound to
    pub message_id: Option<String>,
    /// Discord channel the announcement was posted in
    pub channel_id: Option<String>,
    /// When the event was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each event belongs to one team
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id"
    )]
    Team,
    /// One event has many responses
    #[sea_orm(has_many = "super::response::Entity")]
    Responses,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
