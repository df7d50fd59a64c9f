//! Shared embed builders for event announcements and roster views.

use crate::{
    core::roster::EventRoster,
    entities::{event, team},
};
use poise::serenity_prelude as serenity;

/// Accent color used by all bot embeds.
pub const EMBED_COLOR: u32 = 0x0034_98DB;

/// Builds the announcement embed posted when an event is created.
#[must_use]
pub fn announcement(team: &team::Model, event: &event::Model) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::default()
        .title(format!("📅 {}", event.name))
        .description(format!("**{}** - mark your availability below!", team.name))
        .color(EMBED_COLOR)
        .field("Date", event.date.clone(), true)
        .field("Time", event.time.clone(), true);
    if let Some(game) = &event.game_type {
        embed = embed.field("Game", game.clone(), true);
    }
    if let Some(notes) = &event.notes {
        embed = embed.field("Notes", notes.clone(), false);
    }
    embed.footer(serenity::CreateEmbedFooter::new(
        "React with ✅ available, ❌ unavailable, ❓ maybe",
    ))
}

/// Builds the roster embed for one event.
#[must_use]
pub fn roster(event: &event::Model, roster: &EventRoster) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title(format!("📋 {} - {} at {}", event.name, event.date, event.time))
        .color(EMBED_COLOR)
        .field(
            format!("✅ Available ({})", roster.available.len()),
            name_list(&roster.available),
            false,
        )
        .field(
            format!("❌ Unavailable ({})", roster.unavailable.len()),
            name_list(&roster.unavailable),
            false,
        )
        .field(
            format!("❓ Maybe ({})", roster.maybe.len()),
            name_list(&roster.maybe),
            false,
        )
        .field(
            format!("💤 No response ({})", roster.no_response.len()),
            name_list(&roster.no_response),
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} of {} registered players have responded",
            roster.responded(),
            roster.responded() + roster.no_response.len()
        )))
}

fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        "_nobody_".to_string()
    } else {
        names.join(", ")
    }
}
