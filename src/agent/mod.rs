//! Decision-making capability consumed by the engine.
//!
//! The engine never decides anything on a player's behalf except when an
//! answer is unusable, in which case the resolver substitutes a documented
//! default. Agents see read-only context snapshots and cannot observe other
//! agents' answers from the same step.
//!
//! - [`PlayerAgent`]: the capability trait
//! - [`ScriptedAgent`]: replays queued answers (tests, replays)
//! - [`RandomAgent`]: seeded, always-legal answers (simulations)

mod capability;
mod random;
mod scripted;

pub use capability::{
    AgentTable, NightContext, NightPrompt, PlayerAgent, SpeechContext, SpeechKind, VoteContext,
    VotePurpose,
};
pub use random::RandomAgent;
pub use scripted::ScriptedAgent;
