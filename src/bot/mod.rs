//! Bot layer - Discord-specific interface, commands, and gateway handlers.
//!
//! This module adapts Discord's slash commands and reaction events onto the
//! framework-agnostic core. Nothing under `core` knows about serenity; the
//! translation happens entirely here.

/// Discord command implementations (team, event, availability, general)
pub mod commands;
/// Shared embed builders for announcements and rosters
pub mod embeds;
/// Gateway event handlers (reaction add/remove) and the Discord surface
pub mod handlers;

use crate::{
    config::AppConfig,
    core::{debounce::DebounceTable, limits::LimitConfig, reconciler::Reconciler},
    errors,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

/// Shared data available to all bot commands and handlers.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Tier limit configuration
    pub limits: LimitConfig,
    /// The shared reaction reconciler
    pub reconciler: Arc<Reconciler>,
}

pub(crate) type Error = errors::Error;
pub(crate) type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let message = if error.is_user_error() {
                format!("❌ {error}")
            } else {
                tracing::error!(command = %ctx.command().name, %error, "command failed");
                "⚠️ Something went wrong on our end. Please try again.".to_string()
            };
            if let Err(e) = ctx.say(message).await {
                tracing::error!(error = %e, "failed to send error message");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!(error = %e, "error while handling error");
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until shutdown.
pub async fn run_bot(
    token: String,
    config: AppConfig,
    database: DatabaseConnection,
) -> errors::Result<()> {
    let reconciler = Arc::new(Reconciler::new(
        database.clone(),
        config.limits.clone(),
        DebounceTable::new(Duration::from_millis(config.debounce_ms)),
    ));
    let limits = config.limits;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::team(),
                commands::event(),
                commands::availability(),
                commands::roster(),
                commands::history(),
                commands::sync(),
                commands::upgrade(),
                commands::info(),
                commands::ping(),
                commands::help(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(user = %ready.user.name, "logged in, registering commands globally");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData {
                    database,
                    limits,
                    reconciler,
                })
            })
        })
        .build();

    // GUILD_MEMBERS is needed for /sync; reaction intents feed the reconciler
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    info!("starting bot client");
    client.start().await.map_err(|e| {
        error!(error = %e, "client error");
        e.into()
    })
}
