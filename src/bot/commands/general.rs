//! General Discord commands - ping, help, and the stats overview.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, core::directory, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong! 🏓").await?;
        Ok(())
    }

    /// Shows what the bot is tracking across all servers.
    #[poise::command(slash_command)]
    pub async fn info(ctx: Context<'_>) -> Result<()> {
        let counts = directory::global_counts(&ctx.data().database).await?;
        ctx.say(format!(
            "🏆 **ScrimSync** - availability tracking for esports teams\n\n\
             📊 **Statistics**\n\
             • Teams: {}\n\
             • Players registered: {}\n\
             • Events created: {}\n\
             • Responses recorded: {}\n\n\
             Use `/help` for the command list.",
            counts.teams, counts.players, counts.events, counts.responses
        ))
        .await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**ScrimSync Help**\n\
        Availability tracking for esports teams.\n\n\
        **Responding**\n\
        • React ✅ / ❌ / ❓ on an event announcement, or\n\
        • `/availability` - Pick an event and status from a menu.\n\
        Only your latest answer counts; removing your reaction withdraws it.\n\n\
        **Teams** (Manage Server for create/delete)\n\
        • `/team create <name> <role>` - Create a team bound to a role.\n\
        • `/team list` - Show all teams, tiers, and player counts.\n\
        • `/team delete <name>` - Remove a team and all its data.\n\
        • `/sync [team]` - Reconcile rosters with current role holders.\n\
        • `/upgrade <team> <tier>` - Change a team's tier.\n\n\
        **Events**\n\
        • `/event create <team> <name> <date> <time>` - Create and announce an event.\n\
        • `/event list <team>` - Show recent events.\n\
        • `/event delete <team> <name>` - Remove an event.\n\
        • `/roster <team> [event]` - See who's in, out, unsure, or silent.\n\
        • `/history <team>` - Past events within the team's retention window.\n\n\
        **Utility**\n\
        • `/info` - Bot statistics.\n\
        • `/ping` - Check the bot is alive.\n\
        • `/help` - This message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
