//! `ScrimSync` binary entry point - wires configuration, the database, the
//! daily retention sweep, and the Discord client together.

use dotenvy::dotenv;
use scrimsync::{
    bot, config,
    core::cleanup,
    errors::{Error, Result},
};
use std::{env, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal; env vars can be set externally
    dotenv().ok();

    let app_config = config::load_app_configuration()?;

    let database = config::database::create_connection(&app_config.database_url).await?;
    config::database::create_tables(&database).await?;
    info!("database initialized");

    // The first tick fires immediately, which doubles as the startup sweep
    let sweep_db = database.clone();
    let sweep_limits = app_config.limits.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RETENTION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match cleanup::purge_expired_events(&sweep_db, &sweep_limits).await {
                Ok(summary) => {
                    info!(events = summary.events, responses = summary.responses, "retention sweep done");
                }
                Err(e) => error!(error = %e, "retention sweep failed"),
            }
        }
    });

    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, app_config, database).await
}
