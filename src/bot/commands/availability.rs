//! The `/availability` flow - an ephemeral select-menu alternative to
//! reacting on announcement messages. Both paths feed the same reconciler,
//! so a button press and a reaction can never disagree about the stored
//! status.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        bot::commands::team::require_guild,
        bot::handlers::reactions::DiscordSurface,
        core::{
            directory,
            reconciler::{Actor, InboundEvent, Outcome, Rejection},
            responses::Status,
        },
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::time::Duration;

    /// How long each step of the flow waits for the user.
    const FLOW_TIMEOUT: Duration = Duration::from_secs(300);

    /// Marks your availability for an upcoming event.
    #[poise::command(slash_command, guild_only)]
    pub async fn availability(
        ctx: Context<'_>,
        #[description = "Team (needed only if you're on several)"] team: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let member_roles = member_role_strings(&ctx).await;
        let mut teams =
            directory::teams_where_member_has_role(db, &guild_id.to_string(), &member_roles)
                .await?;
        if let Some(name) = team.as_deref() {
            teams.retain(|t| t.name.eq_ignore_ascii_case(name));
        }

        let team = match teams.len() {
            0 => {
                ctx.send(
                    poise::CreateReply::default()
                        .content("❌ You don't hold any team role here, so there's nothing to respond to.")
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            1 => teams.remove(0),
            _ => {
                let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!(
                            "You're on several teams ({}). Run `/availability team:<name>` to pick one.",
                            names.join(", ")
                        ))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
        };

        let events = directory::events_for_team(db, team.id, 10).await?;
        if events.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("📅 **{}** has no upcoming events.", team.name))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        // Step 1: pick the event
        let options: Vec<serenity::CreateSelectMenuOption> = events
            .iter()
            .map(|e| {
                serenity::CreateSelectMenuOption::new(
                    format!("{} - {} at {}", e.name, e.date, e.time),
                    e.id.to_string(),
                )
            })
            .collect();
        let select = serenity::CreateSelectMenu::new(
            "availability_event",
            serenity::CreateSelectMenuKind::String { options },
        )
        .placeholder("Choose an event");

        let reply = ctx
            .send(
                poise::CreateReply::default()
                    .content(format!("📅 Which **{}** event are you responding to?", team.name))
                    .components(vec![serenity::CreateActionRow::SelectMenu(select)])
                    .ephemeral(true),
            )
            .await?;
        let message = reply.message().await?;

        let Some(picked) = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
            .message_id(message.id)
            .author_id(ctx.author().id)
            .timeout(FLOW_TIMEOUT)
            .await
        else {
            reply
                .edit(
                    ctx,
                    poise::CreateReply::default()
                        .content("⌛ Timed out. Run `/availability` again when you're ready.")
                        .components(Vec::new()),
                )
                .await?;
            return Ok(());
        };
        let serenity::ComponentInteractionDataKind::StringSelect { values } = &picked.data.kind
        else {
            return Ok(());
        };
        let Some(event_id) = values.first().and_then(|v| v.parse::<i64>().ok()) else {
            return Ok(());
        };

        // Step 2: pick the status
        let buttons = vec![serenity::CreateActionRow::Buttons(
            Status::ALL
                .iter()
                .map(|status| {
                    serenity::CreateButton::new(status.as_str())
                        .label(capitalize(status.as_str()))
                        .emoji(serenity::ReactionType::Unicode(status.emoji().to_string()))
                        .style(match status {
                            Status::Available => serenity::ButtonStyle::Success,
                            Status::Unavailable => serenity::ButtonStyle::Danger,
                            Status::Maybe => serenity::ButtonStyle::Secondary,
                        })
                })
                .collect(),
        )];
        picked
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .content("How's your availability?")
                        .components(buttons),
                ),
            )
            .await?;

        let Some(pressed) = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
            .message_id(message.id)
            .author_id(ctx.author().id)
            .timeout(FLOW_TIMEOUT)
            .await
        else {
            reply
                .edit(
                    ctx,
                    poise::CreateReply::default()
                        .content("⌛ Timed out. Run `/availability` again when you're ready.")
                        .components(Vec::new()),
                )
                .await?;
            return Ok(());
        };
        let Ok(status) = pressed.data.custom_id.parse::<Status>() else {
            return Ok(());
        };

        // Same pipeline as a raw reaction, minus the message-surface cleanup
        let inbound = InboundEvent::ComponentInteraction {
            event_id,
            actor: Actor {
                discord_id: ctx.author().id.to_string(),
                username: ctx.author().name.clone(),
            },
            status,
            member_roles,
        };
        let surface = DiscordSurface::new(ctx.serenity_context());
        let outcome = ctx.data().reconciler.process(&surface, inbound).await?;

        pressed
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .content(outcome_text(&outcome))
                        .components(Vec::new()),
                ),
            )
            .await?;
        Ok(())
    }

    async fn member_role_strings(ctx: &Context<'_>) -> Vec<String> {
        match ctx.author_member().await {
            Some(member) => member.roles.iter().map(ToString::to_string).collect(),
            None => Vec::new(),
        }
    }

    fn outcome_text(outcome: &Outcome) -> String {
        match outcome {
            Outcome::Applied(status) => format!(
                "{} Got it, you're marked **{status}**. Change your mind any time.",
                status.emoji()
            ),
            Outcome::Rejected(Rejection::RoleNotMember { team_name }) => {
                format!("❌ You don't have the required role for **{team_name}**.")
            }
            Outcome::Rejected(Rejection::LimitExceeded {
                team_name,
                tier,
                limit,
            }) => format!(
                "🚫 **{team_name}** is at the {tier} tier limit of {limit} players. \
                 Ask a team admin about `/upgrade`."
            ),
            Outcome::Rejected(Rejection::EventNotFound) => {
                "❌ That event was deleted before your response landed.".to_string()
            }
            Outcome::Cleared | Outcome::Ignored | Outcome::Superseded => {
                "ℹ️ Nothing changed.".to_string()
            }
        }
    }

    fn capitalize(s: &str) -> String {
        let mut chars = s.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().collect::<String>() + chars.as_str()
        })
    }
}

// Re-export all commands
pub use inner::*;
