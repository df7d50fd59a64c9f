//! Database connection and table creation.
//!
//! Handles the `SQLite` connection and schema setup using `SeaORM`'s
//! `Schema::create_table_from_entity`, so the schema always matches the
//! entity definitions without hand-written DDL. The two composite unique
//! indexes cannot be expressed through entity attributes and are created
//! with explicit statements; they are what the registry and ledger rely on
//! for race-safe upserts.

use crate::entities::{Event, Player, Response, Team};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// falls back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/scrimsync.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database at `url`.
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    Database::connect(url).await.map_err(Into::into)
}

/// Creates all tables and indexes. Every statement is idempotent, so this
/// runs unconditionally at startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let team_table = schema.create_table_from_entity(Team).if_not_exists().to_owned();
    let player_table = schema.create_table_from_entity(Player).if_not_exists().to_owned();
    let event_table = schema.create_table_from_entity(Event).if_not_exists().to_owned();
    let response_table = schema
        .create_table_from_entity(Response)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&team_table)).await?;
    db.execute(builder.build(&player_table)).await?;
    db.execute(builder.build(&event_table)).await?;
    db.execute(builder.build(&response_table)).await?;

    // One player record per (user, team); the registry's create race
    // resolves through this index.
    db.execute_unprepared(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_players_discord_id_team_id \
         ON players (discord_id, team_id)",
    )
    .await?;
    // At most one response per (player, event); the ledger upserts against
    // this index.
    db.execute_unprepared(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_responses_player_id_event_id \
         ON responses (player_id, event_id)",
    )
    .await?;

    Ok(())
}
