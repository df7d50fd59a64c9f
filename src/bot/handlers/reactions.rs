//! Reaction event translation and the Discord-backed side-effect surface.
//!
//! Gateway reaction payloads become [`InboundEvent`]s for the reconciler;
//! the [`DiscordSurface`] carries the reconciler's side effects (reaction
//! cleanup, private notices) back to Discord.

use crate::{
    core::reconciler::{Actor, InboundEvent, Surface},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;

/// [`Surface`] implementation talking to the Discord HTTP API.
pub struct DiscordSurface {
    ctx: serenity::Context,
}

impl DiscordSurface {
    /// Wraps a serenity context for use as a reconciler surface.
    #[must_use]
    pub fn new(ctx: &serenity::Context) -> Self {
        Self { ctx: ctx.clone() }
    }
}

impl Surface for DiscordSurface {
    async fn remove_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> Result<()> {
        let channel = serenity::ChannelId::new(parse_id(channel_id)?);
        let message = serenity::MessageId::new(parse_id(message_id)?);
        let user = serenity::UserId::new(parse_id(user_id)?);
        channel
            .delete_reaction(
                &self.ctx.http,
                message,
                Some(user),
                serenity::ReactionType::Unicode(emoji.to_string()),
            )
            .await
            .map_err(Into::into)
    }

    async fn notify_actor(&self, user_id: &str, text: &str) -> Result<()> {
        let user = serenity::UserId::new(parse_id(user_id)?);
        let dm = user.create_dm_channel(&self.ctx).await?;
        dm.say(&self.ctx.http, text).await?;
        Ok(())
    }
}

/// Translates a gateway reaction-add into reconciler input. Returns None for
/// the bot's own reactions (the seed reactions on fresh announcements) and
/// for payloads without a user id.
#[must_use]
pub fn inbound_from_add(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
) -> Option<InboundEvent> {
    let user_id = reaction.user_id?;
    if is_self(ctx, user_id) {
        return None;
    }
    let member = reaction.member.as_ref();
    if member.is_some_and(|m| m.user.bot) {
        return None;
    }

    let username = member.map_or_else(|| user_id.to_string(), |m| m.user.name.clone());
    let member_roles = member.map_or_else(Vec::new, |m| {
        m.roles.iter().map(ToString::to_string).collect()
    });

    Some(InboundEvent::ReactionAdd {
        channel_id: reaction.channel_id.to_string(),
        message_id: reaction.message_id.to_string(),
        actor: Actor {
            discord_id: user_id.to_string(),
            username,
        },
        emoji: emoji_string(&reaction.emoji),
        member_roles,
    })
}

/// Translates a gateway reaction-remove. The payload's user id is the user
/// whose reaction was removed, including removals the bot itself performed
/// during cleanup; the reconciler's retract logic sorts those echoes out.
#[must_use]
pub fn inbound_from_remove(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
) -> Option<InboundEvent> {
    let user_id = reaction.user_id?;
    if is_self(ctx, user_id) {
        return None;
    }

    Some(InboundEvent::ReactionRemove {
        channel_id: reaction.channel_id.to_string(),
        message_id: reaction.message_id.to_string(),
        actor_id: user_id.to_string(),
        emoji: emoji_string(&reaction.emoji),
    })
}

fn is_self(ctx: &serenity::Context, user_id: serenity::UserId) -> bool {
    ctx.cache.current_user().id == user_id
}

/// Renders a reaction emoji as the string form the status vocabulary uses.
/// Custom guild emoji render as their mention form and simply never match.
fn emoji_string(emoji: &serenity::ReactionType) -> String {
    match emoji {
        serenity::ReactionType::Unicode(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_id(raw: &str) -> Result<u64> {
    raw.parse().map_err(|_| Error::InvalidInput {
        message: format!("'{raw}' is not a Discord id"),
    })
}
