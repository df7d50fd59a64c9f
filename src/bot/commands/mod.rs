//! Discord command implementations organized by category.

/// Availability select-menu flow
pub mod availability;
/// Event management, roster, and history commands
pub mod event;
/// General utility commands
pub mod general;
/// Team management, sync, and upgrade commands
pub mod team;

// Export the top-level commands (subcommands stay inside their modules)
pub use availability::availability;
pub use event::{event, history, roster};
pub use general::{help, info, ping};
pub use team::{sync, team, upgrade};
