//! Event Discord commands - creation with announcement posting, listing,
//! deletion, plus the roster and history views.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        bot::commands::team::require_guild,
        bot::embeds,
        core::{directory, events, limits::Tier, responses, responses::Status, roster},
        entities::team,
        errors::Result,
    };
    use chrono::{Duration, Utc};
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Manage a team's events.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands("create", "list", "delete"),
        subcommand_required
    )]
    pub async fn event(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Creates an event and posts its announcement in the current channel.
    #[poise::command(slash_command, guild_only)]
    pub async fn create(
        ctx: Context<'_>,
        #[description = "Team this event belongs to"] team: String,
        #[description = "Event name"] name: String,
        #[description = "Date (e.g. 'Feb 15')"] date: String,
        #[description = "Time (e.g. '7:00 PM EST')"] time: String,
        #[description = "Game being played"] game: Option<String>,
        #[description = "Additional notes"] notes: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let Some(team) = directory::team_by_name(db, &guild_id.to_string(), &team).await? else {
            ctx.say(format!("❌ No team named '{team}' in this server."))
                .await?;
            return Ok(());
        };
        if !caller_may_manage(&ctx, &team).await {
            ctx.say(format!(
                "❌ You need the **{}** team role (or Manage Server) to create its events.",
                team.name
            ))
            .await?;
            return Ok(());
        }

        let created = events::create_event(
            db,
            team.id,
            &name,
            &date,
            &time,
            game.as_deref(),
            notes.as_deref(),
            &ctx.author().id.to_string(),
        )
        .await?;

        // Post the announcement, seed the status reactions, then bind the
        // message so raw reactions resolve back to this event
        let message = ctx
            .channel_id()
            .send_message(
                ctx.http(),
                serenity::CreateMessage::new().embed(embeds::announcement(&team, &created)),
            )
            .await?;
        for status in Status::ALL {
            message
                .react(
                    ctx.http(),
                    serenity::ReactionType::Unicode(status.emoji().to_string()),
                )
                .await?;
        }
        events::bind_announcement(
            db,
            created.id,
            &message.channel_id.to_string(),
            &message.id.to_string(),
        )
        .await?;

        ctx.send(
            poise::CreateReply::default()
                .content(format!("✅ Event **{}** created and announced!", created.name))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Lists a team's most recent events.
    #[poise::command(slash_command, guild_only)]
    pub async fn list(
        ctx: Context<'_>,
        #[description = "Team whose events to show"] team: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let Some(team) = directory::team_by_name(db, &guild_id.to_string(), &team).await? else {
            ctx.say(format!("❌ No team named '{team}' in this server."))
                .await?;
            return Ok(());
        };

        let events = directory::events_for_team(db, team.id, 10).await?;
        if events.is_empty() {
            ctx.say(format!(
                "📅 **{}** has no events yet. Create one with `/event create`!",
                team.name
            ))
            .await?;
            return Ok(());
        }

        let mut response = format!("📅 **Events for {}**\n\n", team.name);
        for event in events {
            let game = event
                .game_type
                .as_deref()
                .map_or_else(String::new, |g| format!(" [{g}]"));
            writeln!(
                &mut response,
                "• **{}** - {} at {}{}",
                event.name, event.date, event.time, game
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Deletes an event and its responses.
    #[poise::command(slash_command, guild_only)]
    pub async fn delete(
        ctx: Context<'_>,
        #[description = "Team the event belongs to"] team: String,
        #[description = "Name of the event to delete"] name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let Some(team) = directory::team_by_name(db, &guild_id.to_string(), &team).await? else {
            ctx.say(format!("❌ No team named '{team}' in this server."))
                .await?;
            return Ok(());
        };
        if !caller_may_manage(&ctx, &team).await {
            ctx.say(format!(
                "❌ You need the **{}** team role (or Manage Server) to delete its events.",
                team.name
            ))
            .await?;
            return Ok(());
        }

        let events = directory::events_for_team(db, team.id, 50).await?;
        let Some(event) = events.iter().find(|e| e.name.eq_ignore_ascii_case(&name)) else {
            ctx.say(format!("❌ No event named '{name}' for **{}**.", team.name))
                .await?;
            return Ok(());
        };

        let responses = events::delete_event(db, event.id).await?;
        ctx.say(format!(
            "✅ Deleted event **{}** ({responses} response{} removed).",
            event.name,
            if responses == 1 { "" } else { "s" }
        ))
        .await?;
        Ok(())
    }

    /// Shows who is available, unavailable, unsure, or silent.
    ///
    /// Without an event name, covers the team's three most recent events.
    #[poise::command(slash_command, guild_only)]
    pub async fn roster(
        ctx: Context<'_>,
        #[description = "Team the event belongs to"] team: String,
        #[description = "Event name (defaults to the 3 most recent)"] event: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let Some(team) = directory::team_by_name(db, &guild_id.to_string(), &team).await? else {
            ctx.say(format!("❌ No team named '{team}' in this server."))
                .await?;
            return Ok(());
        };

        let recent = directory::events_for_team(db, team.id, 50).await?;
        let selected: Vec<_> = match event.as_deref() {
            Some(name) => recent
                .into_iter()
                .filter(|e| e.name.eq_ignore_ascii_case(name))
                .take(1)
                .collect(),
            None => recent.into_iter().take(3).collect(),
        };
        if selected.is_empty() {
            ctx.say(format!("❌ No matching event for **{}**.", team.name))
                .await?;
            return Ok(());
        }

        let mut reply = poise::CreateReply::default();
        for event in &selected {
            let roster = roster::event_roster(db, event).await?;
            reply = reply.embed(embeds::roster(event, &roster));
        }
        ctx.send(reply).await?;
        Ok(())
    }

    /// Shows a team's past events within its retention horizon, with
    /// response tallies per event.
    #[poise::command(slash_command, guild_only)]
    pub async fn history(
        ctx: Context<'_>,
        #[description = "Team to show event history for"] team: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let Some(team) = directory::team_by_name(db, &guild_id.to_string(), &team).await? else {
            ctx.say(format!("❌ No team named '{team}' in this server."))
                .await?;
            return Ok(());
        };

        // The history window is the team's tier retention horizon; tiers
        // with no horizon see everything
        let tier: Tier = team.tier.parse()?;
        let horizon = ctx.data().limits.for_tier(tier).history_days;
        let cutoff = horizon.map(|days| Utc::now() - Duration::days(days));
        let window = horizon.map_or_else(
            || "all time".to_string(),
            |days| format!("the last {days} days"),
        );

        let events = directory::events_for_team_since(db, team.id, cutoff).await?;
        if events.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!(
                        "📜 No events from {window} for **{}**.\n\
                         Events appear here after you create them with `/event create`.",
                        team.name
                    ))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        let shown = events.len().min(10);
        let mut response = format!(
            "📜 **Event history for {}** ({} tier)\n\
             Showing {shown} of {} events from {window}.\n\n",
            team.name,
            team.tier,
            events.len()
        );
        for event in events.iter().take(10) {
            let rows = responses::responses_for_event(db, event.id).await?;
            let tally = |status: Status| {
                rows.iter()
                    .filter(|(r, _)| r.status == status.as_str())
                    .count()
            };
            writeln!(
                &mut response,
                "• **{}** - {} at {} | ✅ {} ❌ {} ❓ {}",
                event.name,
                event.date,
                event.time,
                tally(Status::Available),
                tally(Status::Unavailable),
                tally(Status::Maybe)
            )?;
        }
        ctx.send(poise::CreateReply::default().content(response).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Whether the caller holds the team's role or Manage Server.
    pub(crate) async fn caller_may_manage(ctx: &Context<'_>, team: &team::Model) -> bool {
        if let Some(member) = ctx.author_member().await {
            let holds_role = team
                .role_id
                .as_deref()
                .is_some_and(|role| member.roles.iter().any(|r| r.to_string() == role));
            let manages = member.permissions.is_some_and(|p| p.manage_guild());
            holds_role || manages
        } else {
            false
        }
    }
}

// Re-export all commands
pub use inner::*;
