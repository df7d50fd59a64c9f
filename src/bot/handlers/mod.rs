//! Gateway event handlers.
//!
//! Raw reaction events are translated into reconciler input here; everything
//! else on the gateway is ignored.

/// Reaction event translation and the Discord side-effect surface
pub mod reactions;

use crate::{
    bot::{BotData, Error},
    errors::Result,
};
use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// Dispatches gateway events the bot cares about.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(user = %data_about_bot.user.name, "gateway ready");
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            if let Some(inbound) = reactions::inbound_from_add(ctx, add_reaction) {
                let surface = reactions::DiscordSurface::new(ctx);
                let outcome = data.reconciler.process(&surface, inbound).await?;
                debug!(?outcome, "processed reaction add");
            }
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            if let Some(inbound) = reactions::inbound_from_remove(ctx, removed_reaction) {
                let surface = reactions::DiscordSurface::new(ctx);
                let outcome = data.reconciler.process(&surface, inbound).await?;
                debug!(?outcome, "processed reaction remove");
            }
        }
        _ => {}
    }
    Ok(())
}
