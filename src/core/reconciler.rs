//! Reaction reconciler - the core state machine keeping one live status per
//! (player, event) no matter which input channel the status arrived through.
//!
//! The reconciler holds no per-pair state of its own; it is a stateless
//! transformer over the response ledger. What it adds on top of the ledger's
//! unique-key upsert are the guarantees raw reaction input violates
//! naturally: single-active-status cleanup on the message surface, the team
//! role gate, per-key debouncing of reaction bursts, and composition with
//! the player registry's limit gate so a rejected assertion leaves no
//! externally visible trace.

use crate::{
    core::{
        debounce::{DebounceKey, DebounceTable},
        directory,
        limits::{LimitConfig, Tier},
        players,
        responses::{self, Status},
    },
    entities::{event, team},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

/// The user performing an availability action.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Discord user id
    pub discord_id: String,
    /// Current Discord username, used to refresh the player record
    pub username: String,
}

/// Which transport an assertion arrived through. Only the raw reaction
/// channel needs message-surface cleanup; component asserts replace the
/// prior selection atomically by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Reaction,
    Component,
}

/// A raw inbound gateway event, abstracted from the Discord transport.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A user added a reaction to some message
    ReactionAdd {
        /// Channel containing the message
        channel_id: String,
        /// The reacted-to message
        message_id: String,
        /// The reacting user
        actor: Actor,
        /// Unicode emoji that was added
        emoji: String,
        /// Role ids the user currently holds in the guild
        member_roles: Vec<String>,
    },
    /// A user's reaction was removed (by them or by cleanup)
    ReactionRemove {
        /// Channel containing the message
        channel_id: String,
        /// The message the reaction was removed from
        message_id: String,
        /// Discord user id whose reaction was removed
        actor_id: String,
        /// Unicode emoji that was removed
        emoji: String,
    },
    /// A status button was clicked in the `/availability` flow
    ComponentInteraction {
        /// The event being responded to
        event_id: i64,
        /// The interacting user
        actor: Actor,
        /// The asserted status
        status: Status,
        /// Role ids the user currently holds in the guild
        member_roles: Vec<String>,
    },
}

/// Normalized intent produced from an [`InboundEvent`].
#[derive(Debug, Clone)]
enum Intent {
    Assert {
        channel: Channel,
        event_ref: EventRef,
        actor: Actor,
        status: Status,
        member_roles: Vec<String>,
    },
    Retract {
        message_id: String,
        actor_id: String,
        status: Status,
    },
}

/// How an assertion refers to its event: by announcement message (reaction
/// channel) or by event id (component channel).
#[derive(Debug, Clone)]
enum EventRef {
    Message {
        channel_id: String,
        message_id: String,
    },
    Id(i64),
}

/// Why an assertion was rejected. These are expected user-facing outcomes,
/// not errors; the ledger is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The actor does not hold the team's bound role
    RoleNotMember {
        /// Name of the team whose role the actor lacks
        team_name: String,
    },
    /// The team is at its tier's player cap
    LimitExceeded {
        /// Name of the full team
        team_name: String,
        /// The team's tier
        tier: Tier,
        /// The player cap that was reached
        limit: u32,
    },
    /// The event was deleted mid-flow
    EventNotFound,
}

/// The observable outcome of processing one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A response row now holds this status
    Applied(Status),
    /// The response row was removed (or none existed; retract is idempotent)
    Cleared,
    /// The assertion was rejected and any visible trace undone
    Rejected(Rejection),
    /// Not an availability action (unknown emoji, non-event message,
    /// or a cleanup echo of our own reaction removal)
    Ignored,
    /// A newer event for the same (actor, message) superseded this one
    /// within the debounce window
    Superseded,
}

/// Side-effect sink for the rendering surface. Implemented against Discord
/// by the bot layer and by a recording mock in tests.
///
/// Failures from these calls never abort reconciliation; the reconciler
/// logs and swallows them.
pub trait Surface: Send + Sync {
    /// Removes one user's reaction emoji from a message.
    fn remove_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Sends a private notice to a user.
    fn notify_actor(&self, user_id: &str, text: &str) -> impl Future<Output = Result<()>> + Send;
}

/// The reconciler itself. Shared process-wide; all fields are internally
/// synchronized or immutable.
#[derive(Debug)]
pub struct Reconciler {
    db: DatabaseConnection,
    limits: LimitConfig,
    debounce: DebounceTable,
}

impl Reconciler {
    /// Creates a reconciler over the given store, limit configuration, and
    /// debounce table.
    #[must_use]
    pub const fn new(db: DatabaseConnection, limits: LimitConfig, debounce: DebounceTable) -> Self {
        Self {
            db,
            limits,
            debounce,
        }
    }

    /// Processes one inbound gateway event end to end.
    ///
    /// User-level rejections come back as [`Outcome::Rejected`]; only
    /// storage and transport faults surface as `Err`.
    pub async fn process<S: Surface>(&self, surface: &S, event: InboundEvent) -> Result<Outcome> {
        let Some(intent) = normalize(event) else {
            return Ok(Outcome::Ignored);
        };

        match intent {
            Intent::Assert {
                channel: Channel::Reaction,
                event_ref,
                actor,
                status,
                member_roles,
            } => {
                let EventRef::Message {
                    ref message_id, ..
                } = event_ref
                else {
                    // Reaction asserts always carry a message reference
                    return Ok(Outcome::Ignored);
                };
                let key = DebounceKey {
                    actor_id: actor.discord_id.clone(),
                    message_id: message_id.clone(),
                };
                if !self.debounce.settle(key).await {
                    debug!(actor = %actor.discord_id, "reaction assert superseded");
                    return Ok(Outcome::Superseded);
                }
                self.apply_assert(surface, Channel::Reaction, event_ref, actor, status, &member_roles)
                    .await
            }
            Intent::Assert {
                channel: Channel::Component,
                event_ref,
                actor,
                status,
                member_roles,
            } => {
                self.apply_assert(surface, Channel::Component, event_ref, actor, status, &member_roles)
                    .await
            }
            Intent::Retract {
                message_id,
                actor_id,
                status,
            } => {
                let key = DebounceKey {
                    actor_id: actor_id.clone(),
                    message_id: message_id.clone(),
                };
                if !self.debounce.settle(key).await {
                    debug!(actor = %actor_id, "reaction retract superseded");
                    return Ok(Outcome::Superseded);
                }
                self.apply_retract(&message_id, &actor_id, status).await
            }
        }
    }

    async fn apply_assert<S: Surface>(
        &self,
        surface: &S,
        channel: Channel,
        event_ref: EventRef,
        actor: Actor,
        status: Status,
        member_roles: &[String],
    ) -> Result<Outcome> {
        let resolved = self.resolve_event(&event_ref).await?;
        let Some((event, team)) = resolved else {
            return Ok(match event_ref {
                // A reaction on a non-event message is simply not ours
                EventRef::Message { .. } => Outcome::Ignored,
                EventRef::Id(_) => Outcome::Rejected(Rejection::EventNotFound),
            });
        };

        // Role gate: only members holding the team's bound role may respond
        if !holds_team_role(&team, member_roles) {
            self.undo_visible_trace(surface, channel, &event_ref, &actor, status)
                .await;
            let text = format!(
                "❌ You don't have the required role for **{}**.\n\n\
                 Only members with the team role can mark availability for this event.",
                team.name
            );
            Self::notify(surface, &actor.discord_id, &text).await;
            info!(
                actor = %actor.discord_id,
                team = %team.name,
                "assert rejected: not a team member"
            );
            return Ok(Outcome::Rejected(Rejection::RoleNotMember {
                team_name: team.name,
            }));
        }

        // Limit-gated registry resolution runs before any ledger write
        let player = match players::resolve_or_create(
            &self.db,
            &self.limits,
            &actor.discord_id,
            &actor.username,
            team.id,
        )
        .await
        {
            Ok(player) => player,
            Err(Error::LimitExceeded { tier, limit }) => {
                self.undo_visible_trace(surface, channel, &event_ref, &actor, status)
                    .await;
                let text = format!(
                    "🚫 **{}** is at the {tier} tier limit of {limit} players, \
                     so your availability could not be recorded.\n\n\
                     Ask a team admin to upgrade with `/upgrade`, or wait for a slot to open up.",
                    team.name
                );
                Self::notify(surface, &actor.discord_id, &text).await;
                info!(team = %team.name, limit, "assert rejected: player limit reached");
                return Ok(Outcome::Rejected(Rejection::LimitExceeded {
                    team_name: team.name,
                    tier,
                    limit,
                }));
            }
            Err(e) => return Err(e),
        };

        // Single-active-status: scrub the user's other status reactions so
        // the visible message state never shows two conflicting marks
        if channel == Channel::Reaction {
            if let EventRef::Message {
                ref channel_id,
                ref message_id,
            } = event_ref
            {
                for other in Status::ALL {
                    if other != status {
                        if let Err(e) = surface
                            .remove_reaction(
                                channel_id,
                                message_id,
                                &actor.discord_id,
                                other.emoji(),
                            )
                            .await
                        {
                            debug!(error = %e, emoji = other.emoji(), "reaction cleanup failed");
                        }
                    }
                }
            }
        }

        responses::set_response(&self.db, player.id, event.id, status).await?;
        info!(
            actor = %actor.discord_id,
            event = %event.name,
            %status,
            "availability recorded"
        );
        Ok(Outcome::Applied(status))
    }

    /// Clears the stored response when the removed reaction matches it.
    ///
    /// A mismatch means the removal was a cleanup echo from the
    /// single-active-status scrub (or the user peeling off a stale mark),
    /// so the live status stays put.
    async fn apply_retract(
        &self,
        message_id: &str,
        actor_id: &str,
        removed: Status,
    ) -> Result<Outcome> {
        let Some((event, team)) = directory::event_by_message_id(&self.db, message_id).await?
        else {
            return Ok(Outcome::Ignored);
        };

        let Some(player) = directory::find_player(&self.db, actor_id, team.id).await? else {
            // Never responded; nothing to retract
            return Ok(Outcome::Cleared);
        };

        match responses::get_response(&self.db, player.id, event.id).await? {
            None => Ok(Outcome::Cleared),
            Some(current) if current.status != removed.as_str() => Ok(Outcome::Ignored),
            Some(_) => {
                responses::clear_response(&self.db, player.id, event.id).await?;
                info!(actor = %actor_id, event = %event.name, "availability retracted");
                Ok(Outcome::Cleared)
            }
        }
    }

    async fn resolve_event(
        &self,
        event_ref: &EventRef,
    ) -> Result<Option<(event::Model, team::Model)>> {
        match event_ref {
            EventRef::Message { message_id, .. } => {
                directory::event_by_message_id(&self.db, message_id).await
            }
            EventRef::Id(id) => directory::event_by_id(&self.db, *id).await,
        }
    }

    /// Removes the reaction that triggered a rejected assertion so no
    /// lingering mark implies success. Component asserts have no such trace.
    async fn undo_visible_trace<S: Surface>(
        &self,
        surface: &S,
        channel: Channel,
        event_ref: &EventRef,
        actor: &Actor,
        status: Status,
    ) {
        if channel != Channel::Reaction {
            return;
        }
        if let EventRef::Message {
            channel_id,
            message_id,
        } = event_ref
        {
            if let Err(e) = surface
                .remove_reaction(channel_id, message_id, &actor.discord_id, status.emoji())
                .await
            {
                debug!(error = %e, "failed to remove rejected reaction");
            }
        }
    }

    /// Fire-and-forget private notice; delivery failure (e.g., DMs
    /// disabled) is logged and swallowed.
    async fn notify<S: Surface>(surface: &S, user_id: &str, text: &str) {
        if let Err(e) = surface.notify_actor(user_id, text).await {
            debug!(user_id, error = %e, "could not deliver notice");
        }
    }
}

/// Collapses the three raw channels into assert/retract intents. Unknown
/// emoji produce no intent at all.
fn normalize(event: InboundEvent) -> Option<Intent> {
    match event {
        InboundEvent::ReactionAdd {
            channel_id,
            message_id,
            actor,
            emoji,
            member_roles,
        } => {
            let status = Status::from_emoji(&emoji)?;
            Some(Intent::Assert {
                channel: Channel::Reaction,
                event_ref: EventRef::Message {
                    channel_id,
                    message_id,
                },
                actor,
                status,
                member_roles,
            })
        }
        InboundEvent::ReactionRemove {
            message_id,
            actor_id,
            emoji,
            ..
        } => {
            let status = Status::from_emoji(&emoji)?;
            Some(Intent::Retract {
                message_id,
                actor_id,
                status,
            })
        }
        InboundEvent::ComponentInteraction {
            event_id,
            actor,
            status,
            member_roles,
        } => Some(Intent::Assert {
            channel: Channel::Component,
            event_ref: EventRef::Id(event_id),
            actor,
            status,
            member_roles,
        }),
    }
}

fn holds_team_role(team: &team::Model, member_roles: &[String]) -> bool {
    team.role_id
        .as_ref()
        .is_some_and(|role| member_roles.iter().any(|held| held == role))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Player, Response};
    use crate::test_utils::*;
    use sea_orm::EntityTrait;
    use std::sync::Arc;
    use std::time::Duration;

    const ROLE: &str = "role-1";

    fn actor(id: &str, name: &str) -> Actor {
        Actor {
            discord_id: id.to_string(),
            username: name.to_string(),
        }
    }

    fn reaction_add(message_id: &str, who: &Actor, emoji: &str, roles: &[&str]) -> InboundEvent {
        InboundEvent::ReactionAdd {
            channel_id: "chan-1".to_string(),
            message_id: message_id.to_string(),
            actor: who.clone(),
            emoji: emoji.to_string(),
            member_roles: roles.iter().map(ToString::to_string).collect(),
        }
    }

    fn reaction_remove(message_id: &str, actor_id: &str, emoji: &str) -> InboundEvent {
        InboundEvent::ReactionRemove {
            channel_id: "chan-1".to_string(),
            message_id: message_id.to_string(),
            actor_id: actor_id.to_string(),
            emoji: emoji.to_string(),
        }
    }

    async fn setup_reconciler() -> crate::errors::Result<(
        Reconciler,
        crate::entities::team::Model,
        crate::entities::event::Model,
    )> {
        let db = setup_test_db().await?;
        let team = create_test_team_with_role(&db, "Alpha", ROLE).await?;
        let event = create_test_event(&db, team.id, "Scrim", Some("msg-1")).await?;
        let reconciler = Reconciler::new(
            db,
            crate::core::limits::LimitConfig::default(),
            DebounceTable::new(Duration::ZERO),
        );
        Ok((reconciler, team, event))
    }

    #[tokio::test]
    async fn test_assert_creates_player_and_response() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        let alice = actor("111", "alice");

        let outcome = reconciler
            .process(&surface, reaction_add("msg-1", &alice, "✅", &[ROLE]))
            .await?;
        assert_eq!(outcome, Outcome::Applied(Status::Available));

        let rows = Response::find().all(reconciler.db()).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "available");

        // The other two status emoji were scrubbed from the message
        let removals = surface.removals();
        assert_eq!(removals.len(), 2);
        assert!(!removals.iter().any(|(_, emoji)| emoji == "✅"));
        Ok(())
    }

    #[tokio::test]
    async fn test_single_status_invariant_across_asserts() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        let alice = actor("111", "alice");

        for emoji in ["✅", "❌", "❓", "✅"] {
            reconciler
                .process(&surface, reaction_add("msg-1", &alice, emoji, &[ROLE]))
                .await?;
        }

        let rows = Response::find().all(reconciler.db()).await?;
        assert_eq!(rows.len(), 1, "exactly one row after any assert sequence");
        assert_eq!(rows[0].status, "available", "last assertion wins");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_emoji_is_ignored() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        let alice = actor("111", "alice");

        let outcome = reconciler
            .process(&surface, reaction_add("msg-1", &alice, "🎉", &[ROLE]))
            .await?;
        assert_eq!(outcome, Outcome::Ignored);
        assert!(Response::find().all(reconciler.db()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_reaction_on_non_event_message_is_ignored() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        let alice = actor("111", "alice");

        let outcome = reconciler
            .process(&surface, reaction_add("msg-unrelated", &alice, "✅", &[ROLE]))
            .await?;
        assert_eq!(outcome, Outcome::Ignored);
        assert!(surface.removals().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_role_gate_rejects_non_member() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        let stranger = actor("999", "stranger");

        for _ in 0..3 {
            let outcome = reconciler
                .process(
                    &surface,
                    reaction_add("msg-1", &stranger, "✅", &["some-other-role"]),
                )
                .await?;
            assert!(matches!(
                outcome,
                Outcome::Rejected(Rejection::RoleNotMember { .. })
            ));
        }

        // No player, no response, however many times it is retried
        assert!(Player::find().all(reconciler.db()).await?.is_empty());
        assert!(Response::find().all(reconciler.db()).await?.is_empty());
        // The triggering reaction was removed and the user notified
        assert!(surface.removals().iter().any(|(_, emoji)| emoji == "✅"));
        assert!(!surface.notices().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_limit_gate_leaves_no_half_applied_state() -> crate::errors::Result<()> {
        let (reconciler, team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        fill_team(reconciler.db(), team.id, 15).await?;

        let outcome = reconciler
            .process(&surface, reaction_add("msg-1", &actor("999", "late"), "✅", &[ROLE]))
            .await?;
        match outcome {
            Outcome::Rejected(Rejection::LimitExceeded { tier, limit, .. }) => {
                assert_eq!(tier, crate::core::limits::Tier::Free);
                assert_eq!(limit, 15);
            }
            other => panic!("expected limit rejection, got {other:?}"),
        }

        assert_eq!(Player::find().all(reconciler.db()).await?.len(), 15);
        assert!(Response::find().all(reconciler.db()).await?.is_empty());
        assert!(surface.removals().iter().any(|(_, emoji)| emoji == "✅"));
        assert!(!surface.notices().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_retract_clears_matching_status() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        let alice = actor("111", "alice");

        reconciler
            .process(&surface, reaction_add("msg-1", &alice, "✅", &[ROLE]))
            .await?;
        let outcome = reconciler
            .process(&surface, reaction_remove("msg-1", "111", "✅"))
            .await?;
        assert_eq!(outcome, Outcome::Cleared);
        assert!(Response::find().all(reconciler.db()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_cleanup_echo_does_not_clear_new_status() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        let alice = actor("111", "alice");

        // User switches from available to maybe; the scrub of ✅ then echoes
        // back as a reaction-remove event
        reconciler
            .process(&surface, reaction_add("msg-1", &alice, "✅", &[ROLE]))
            .await?;
        reconciler
            .process(&surface, reaction_add("msg-1", &alice, "❓", &[ROLE]))
            .await?;
        let outcome = reconciler
            .process(&surface, reaction_remove("msg-1", "111", "✅"))
            .await?;
        assert_eq!(outcome, Outcome::Ignored);

        let rows = Response::find().all(reconciler.db()).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "maybe");
        Ok(())
    }

    #[tokio::test]
    async fn test_retract_with_nothing_stored_is_noop() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();

        let outcome = reconciler
            .process(&surface, reaction_remove("msg-1", "111", "✅"))
            .await?;
        assert_eq!(outcome, Outcome::Cleared);
        assert!(Response::find().all(reconciler.db()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_component_assert_skips_reaction_cleanup() -> crate::errors::Result<()> {
        let (reconciler, _team, event) = setup_reconciler().await?;
        let surface = MockSurface::default();

        let outcome = reconciler
            .process(
                &surface,
                InboundEvent::ComponentInteraction {
                    event_id: event.id,
                    actor: actor("111", "alice"),
                    status: Status::Maybe,
                    member_roles: vec![ROLE.to_string()],
                },
            )
            .await?;
        assert_eq!(outcome, Outcome::Applied(Status::Maybe));
        assert!(surface.removals().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_component_assert_on_deleted_event() -> crate::errors::Result<()> {
        let (reconciler, _team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();

        let outcome = reconciler
            .process(
                &surface,
                InboundEvent::ComponentInteraction {
                    event_id: 424_242,
                    actor: actor("111", "alice"),
                    status: Status::Available,
                    member_roles: vec![ROLE.to_string()],
                },
            )
            .await?;
        assert_eq!(outcome, Outcome::Rejected(Rejection::EventNotFound));
        Ok(())
    }

    #[tokio::test]
    async fn test_debounce_collapses_rapid_asserts() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let team = create_test_team_with_role(&db, "Alpha", ROLE).await?;
        let _event = create_test_event(&db, team.id, "Scrim", Some("msg-1")).await?;
        let reconciler = Arc::new(Reconciler::new(
            db,
            crate::core::limits::LimitConfig::default(),
            DebounceTable::new(Duration::from_millis(80)),
        ));
        let surface = Arc::new(MockSurface::default());
        let alice = actor("111", "alice");

        let r = Arc::clone(&reconciler);
        let s = Arc::clone(&surface);
        let first_actor = alice.clone();
        let first = tokio::spawn(async move {
            r.process(&*s, reaction_add("msg-1", &first_actor, "✅", &[ROLE]))
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = reconciler
            .process(&*surface, reaction_add("msg-1", &alice, "❓", &[ROLE]))
            .await?;

        assert_eq!(first.await.unwrap()?, Outcome::Superseded);
        assert_eq!(second, Outcome::Applied(Status::Maybe));

        let rows = Response::find().all(reconciler.db()).await?;
        assert_eq!(rows.len(), 1, "only the last event in the window writes");
        assert_eq!(rows[0].status, "maybe");
        Ok(())
    }

    #[tokio::test]
    async fn test_end_to_end_limit_scenario() -> crate::errors::Result<()> {
        // Free team at 14 of 15 players: U fills the last slot, V is turned
        // away with a limit notice and leaves no trace.
        let (reconciler, team, _event) = setup_reconciler().await?;
        let surface = MockSurface::default();
        fill_team(reconciler.db(), team.id, 14).await?;

        let u = reconciler
            .process(&surface, reaction_add("msg-1", &actor("901", "u"), "✅", &[ROLE]))
            .await?;
        assert_eq!(u, Outcome::Applied(Status::Available));
        assert_eq!(Player::find().all(reconciler.db()).await?.len(), 15);

        let v = reconciler
            .process(&surface, reaction_add("msg-1", &actor("902", "v"), "❓", &[ROLE]))
            .await?;
        assert!(matches!(
            v,
            Outcome::Rejected(Rejection::LimitExceeded { limit: 15, .. })
        ));
        assert_eq!(Player::find().all(reconciler.db()).await?.len(), 15);
        assert_eq!(Response::find().all(reconciler.db()).await?.len(), 1);
        assert!(
            surface
                .notices()
                .iter()
                .any(|(user, text)| user == "902" && text.contains("limit")),
            "V receives a limit-reached notice"
        );
        Ok(())
    }
}

#[cfg(test)]
impl Reconciler {
    /// Test-only access to the underlying connection.
    pub(crate) const fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
