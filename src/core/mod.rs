//! Core business logic - framework-agnostic availability reconciliation.
//!
//! Everything in here operates on a [`sea_orm::DatabaseConnection`] and
//! plain values; nothing imports Discord types. The bot layer adapts gateway
//! events and slash commands onto these functions.

/// Retention sweep removing events past their tier's history horizon
pub mod cleanup;
/// Per-key coalescing of reaction event bursts
pub mod debounce;
/// Read-only team, event, and player lookups
pub mod directory;
/// Event lifecycle and announcement binding
pub mod events;
/// Tier limits and the player-cap evaluator
pub mod limits;
/// Player registry with limit-gated lazy creation
pub mod players;
/// The reaction reconciler state machine
pub mod reconciler;
/// The at-most-one-status-per-(player, event) response ledger
pub mod responses;
/// Per-event roster aggregation
pub mod roster;
/// Team lifecycle and cascading deletion
pub mod teams;
