//! # werewolf-engine
//!
//! A deterministic resolution engine for werewolf-style social deduction
//! games.
//!
//! ## Design Principles
//!
//! 1. **Decisions Are External**: Every choice a player makes comes from a
//!    [`PlayerAgent`]: a human front-end, a language model client, a script.
//!    The engine only validates and resolves.
//!
//! 2. **Never Stall on Bad Input**: An invalid or failed answer is replaced by
//!    a documented default and recorded in the event log. Only a broken
//!    engine invariant aborts a game.
//!
//! 3. **Reproducible**: All randomness flows through an injected, seeded
//!    [`GameRng`]. Same seed, same agents, same game.
//!
//! ## Architecture
//!
//! - **Single Owner**: One [`Orchestrator`] owns one [`GameState`]. Concurrent
//!   games use independent instances.
//!
//! - **Gather Then Reduce**: Simultaneous decisions (the pack's proposals, the
//!   day vote) are all collected before any of them touches state.
//!
//! - **Persistent Data Structures**: Ledgers and the event log use `im-rs`, so
//!   cloning a state for inspection is cheap.
//!
//! ## Modules
//!
//! - `core`: Players, roles, state, decisions, events, RNG, configuration, errors
//! - `agent`: The `PlayerAgent` seam and bundled scripted/random agents
//! - `rules`: Vote tallying and victory evaluation
//! - `phases`: Night, day and MVP resolvers
//! - `orchestrator`: Game loop and export

pub mod core;
pub mod agent;
pub mod rules;
pub mod phases;
pub mod orchestrator;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap, Player, Status,
    Role, RoleState, SeerVerdict, Team,
    GameRng, GameRngState,
    GameConfig, RolePolicy, RosterEntry,
    NightAction, WitchChoice, Speech,
    EventKind, EventLog, EventOutcome, GameEvent,
    AgentError, EngineError, InconsistentStateError, InvalidAction, SetupError,
    GameState, Phase, PlayerSnapshot,
};

pub use crate::agent::{
    AgentTable, PlayerAgent,
    NightContext, NightPrompt, SpeechContext, SpeechKind, VoteContext, VotePurpose,
    RandomAgent, ScriptedAgent,
};

pub use crate::rules::{evaluate, Plurality, Tally, Verdict, VictoryReason, Winner};

pub use crate::phases::{DayReport, DayResolver, MvpResult, MvpVote, NightReport, NightResolver};

pub use crate::orchestrator::{
    Exporter, GameSummary, MemoryExporter, Orchestrator, RoundOutcome, TracingExporter,
};
