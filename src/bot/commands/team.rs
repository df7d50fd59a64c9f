//! Team Discord commands - creation, listing, deletion, role sync, and tier
//! upgrades.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        core::{directory, limits::Tier, players, teams},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Tier choices offered by `/upgrade`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum TierChoice {
        #[name = "free"]
        Free,
        #[name = "starter"]
        Starter,
        #[name = "pro"]
        Pro,
        #[name = "enterprise"]
        Enterprise,
    }

    impl From<TierChoice> for Tier {
        fn from(choice: TierChoice) -> Self {
            match choice {
                TierChoice::Free => Self::Free,
                TierChoice::Starter => Self::Starter,
                TierChoice::Pro => Self::Pro,
                TierChoice::Enterprise => Self::Enterprise,
            }
        }
    }

    /// Manage your server's teams.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands("create", "list", "delete"),
        subcommand_required
    )]
    pub async fn team(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Creates a team bound to a Discord role.
    #[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn create(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
        #[description = "Role whose holders are the team's players"] role: serenity::Role,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let team = teams::create_team(
            db,
            &guild_id.to_string(),
            &name,
            Some(&role.id.to_string()),
            Tier::Free,
            &ctx.author().id.to_string(),
        )
        .await?;

        ctx.say(format!(
            "✅ Created team **{}** linked to <@&{}> on the free tier.\n\
             Members holding that role can now respond to the team's events.",
            team.name, role.id
        ))
        .await?;
        Ok(())
    }

    /// Lists all teams in this server.
    #[poise::command(slash_command, guild_only)]
    pub async fn list(ctx: Context<'_>) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let teams = directory::teams_for_guild(db, &guild_id.to_string()).await?;
        if teams.is_empty() {
            ctx.say("📂 No teams yet. Create one with `/team create`!")
                .await?;
            return Ok(());
        }

        let mut response = String::from("📂 **Teams**\n\n");
        for team in teams {
            let players = directory::player_count(db, team.id).await?;
            let role = team
                .role_id
                .as_deref()
                .map_or_else(|| "no role linked".to_string(), |r| format!("<@&{r}>"));
            writeln!(
                &mut response,
                "• **{}** ({}) - {} player{}, {}",
                team.name,
                team.tier,
                players,
                if players == 1 { "" } else { "s" },
                role
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Deletes a team and all its events, players, and responses.
    #[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn delete(
        ctx: Context<'_>,
        #[description = "Name of the team to delete"] name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let Some(team) = directory::team_by_name(db, &guild_id.to_string(), &name).await? else {
            ctx.say(format!("❌ No team named '{name}' in this server."))
                .await?;
            return Ok(());
        };

        let summary = teams::delete_team(db, team.id).await?;
        ctx.say(format!(
            "✅ Deleted team **{}** ({} players, {} events, {} responses removed).",
            team.name, summary.players, summary.events, summary.responses
        ))
        .await?;
        Ok(())
    }

    /// Changes a team's subscription tier.
    #[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn upgrade(
        ctx: Context<'_>,
        #[description = "Team to change"] name: String,
        #[description = "New tier"] tier: TierChoice,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;

        let Some(team) = directory::team_by_name(db, &guild_id.to_string(), &name).await? else {
            ctx.say(format!("❌ No team named '{name}' in this server."))
                .await?;
            return Ok(());
        };

        let tier = Tier::from(tier);
        let updated = teams::set_tier(db, team.id, tier).await?;
        let limits = ctx.data().limits.for_tier(tier);
        let cap = limits
            .max_players
            .map_or_else(|| "unlimited players".to_string(), |n| format!("up to {n} players"));
        let history = limits.history_days.map_or_else(
            || "unlimited event history".to_string(),
            |d| format!("{d} days of event history"),
        );
        ctx.say(format!(
            "✅ **{}** is now on the **{}** tier: {cap}, {history}.",
            updated.name, updated.tier
        ))
        .await?;
        Ok(())
    }

    /// Reconciles team rosters with current role holders.
    ///
    /// Removes players who no longer hold their team's role.
    #[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn sync(
        ctx: Context<'_>,
        #[description = "Only sync this team (defaults to all)"] team: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = require_guild(&ctx)?;
        ctx.defer().await?;

        // The member list endpoint caps each page; walk the cursor so role
        // holders beyond the first page are not mistaken for departures
        let members = fetch_pages(
            |after| {
                let page = guild_id.members(
                    ctx.http(),
                    Some(MEMBER_PAGE_SIZE),
                    after.map(serenity::UserId::new),
                );
                async move { page.await.map_err(Error::from) }
            },
            |m: &serenity::Member| m.user.id.get(),
        )
        .await?;
        let mut teams = directory::teams_for_guild(db, &guild_id.to_string()).await?;
        if let Some(name) = team.as_deref() {
            teams.retain(|t| t.name.eq_ignore_ascii_case(name));
            if teams.is_empty() {
                ctx.say(format!("❌ No team named '{name}' in this server."))
                    .await?;
                return Ok(());
            }
        }

        let mut response = String::from("🔄 **Roster sync**\n\n");
        let mut touched = false;
        for team in teams {
            let Some(role_id) = team.role_id.as_deref() else {
                continue;
            };
            let Ok(role) = role_id.parse::<u64>() else {
                continue;
            };
            let role = serenity::RoleId::new(role);
            let holders: Vec<&serenity::Member> =
                members.iter().filter(|m| m.roles.contains(&role)).collect();

            // Register current role holders, counting those the tier cap
            // turns away
            let mut added = 0_u64;
            let mut capped = 0_u64;
            for member in &holders {
                let user_id = member.user.id.to_string();
                let known = directory::find_player(db, &user_id, team.id).await?.is_some();
                match players::resolve_or_create(
                    db,
                    &ctx.data().limits,
                    &user_id,
                    &member.user.name,
                    team.id,
                )
                .await
                {
                    Ok(_) if !known => added += 1,
                    Ok(_) => {}
                    Err(Error::LimitExceeded { .. }) => capped += 1,
                    Err(e) => return Err(e),
                }
            }

            let holder_ids: Vec<String> =
                holders.iter().map(|m| m.user.id.to_string()).collect();
            let removal = players::prune_departed(db, team.id, &holder_ids).await?;

            if added > 0 || capped > 0 || removal.players > 0 {
                touched = true;
                writeln!(
                    &mut response,
                    "• **{}**: {added} added, {} removed ({} responses){}",
                    team.name,
                    removal.players,
                    removal.responses,
                    if capped > 0 {
                        format!(", {capped} blocked by the player limit")
                    } else {
                        String::new()
                    }
                )?;
            }
        }

        if !touched {
            response.push_str("All rosters already match their roles. Nothing to do!");
        }
        ctx.say(response).await?;
        Ok(())
    }

    pub(crate) fn require_guild(ctx: &Context<'_>) -> Result<serenity::GuildId> {
        ctx.guild_id().ok_or_else(|| Error::InvalidInput {
            message: "this command only works inside a server".to_string(),
        })
    }

    /// Largest page the guild member listing endpoint returns per request.
    pub(super) const MEMBER_PAGE_SIZE: u64 = 1000;

    /// Walks a cursor-paginated listing to completion. Fetches page after
    /// page, passing the last item's id as the cursor, until a short page
    /// signals the end.
    pub(super) async fn fetch_pages<T, F, Fut>(
        mut fetch: F,
        id_of: fn(&T) -> u64,
    ) -> Result<Vec<T>>
    where
        F: FnMut(Option<u64>) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let mut all = Vec::new();
        let mut after = None;
        loop {
            let page = fetch(after).await?;
            let done = (page.len() as u64) < MEMBER_PAGE_SIZE;
            after = page.last().map(id_of);
            all.extend(page);
            if done || after.is_none() {
                break;
            }
        }
        Ok(all)
    }
}

// Re-export all commands
pub use inner::*;
