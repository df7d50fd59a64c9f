//! Response entity - A player's current availability verdict for one event.
//!
//! At most one row exists per (`player_id`, `event_id`); this is the central
//! consistency guarantee the reconciler protects. Retracting deletes the row
//! outright rather than storing a "none" status.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Response database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "responses")]
pub struct Model {
    /// Unique identifier for the response
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Player this response belongs to
    pub player_id: i64,
    /// Event this response is for
    pub event_id: i64,
    /// Availability status: `"available"`, `"unavailable"`, or `"maybe"`
    pub status: String,
    /// When the response was last asserted
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Response and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each response belongs to one player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id"
    )]
    Player,
    /// Each response belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
