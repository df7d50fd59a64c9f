//! Team entity - A role-scoped group within a guild.
//!
//! Each team is bound to at most one Discord role per guild; members holding
//! that role are the team's players. The tier field governs the player cap
//! and event retention horizon.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    /// Unique identifier for the team
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild (server) this team belongs to
    pub guild_id: String,
    /// Human-readable team name
    pub name: String,
    /// Discord role bound to this team, None until linked.
    /// Within a guild a role is linked to at most one team.
    pub role_id: Option<String>,
    /// Subscription tier: `"free"`, `"starter"`, `"pro"`, or `"enterprise"`
    pub tier: String,
    /// Discord user ID of the admin who created the team
    pub created_by: String,
    /// When the team was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Team and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One team has many players
    #[sea_orm(has_many = "super::player::Entity")]
    Players,
    /// One team has many events
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
