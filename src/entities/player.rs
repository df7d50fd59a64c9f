//! Player entity - A team-scoped identity bound to a Discord user.
//!
//! The same Discord user may be a distinct player per team; the pair
//! (`discord_id`, `team_id`) is unique. Players are created lazily on their
//! first availability-affecting action, gated by the tier's player limit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Player database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    /// Unique identifier for the player
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID
    pub discord_id: String,
    /// Last observed Discord username, refreshed on each interaction
    pub username: String,
    /// Team this player record belongs to
    pub team_id: i64,
}

/// Defines relationships between Player and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each player belongs to one team
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id"
    )]
    Team,
    /// One player has many responses
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
