//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod event;
pub mod player;
pub mod response;
pub mod team;

// Re-export specific types to avoid conflicts
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use player::{Column as PlayerColumn, Entity as Player, Model as PlayerModel};
pub use response::{Column as ResponseColumn, Entity as Response, Model as ResponseModel};
pub use team::{Column as TeamColumn, Entity as Team, Model as TeamModel};
