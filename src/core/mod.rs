//! Core engine types: players, roles, state, decisions, events, RNG,
//! configuration and errors.
//!
//! Nothing in this module makes a rules decision. Resolvers in `phases`
//! and the evaluator in `rules` build on these types.

pub mod player;
pub mod role;
pub mod rng;
pub mod config;
pub mod action;
pub mod event;
pub mod error;
pub mod state;

pub use player::{Player, PlayerId, PlayerMap, Status};
pub use role::{Role, RoleState, SeerVerdict, Team};
pub use rng::{GameRng, GameRngState};
pub use config::{validate_roster, validate_seats, GameConfig, RolePolicy, RosterEntry};
pub use action::{LastWords, NightAction, Speech, SpeechRecord, VoteRecord, WitchChoice};
pub use event::{EventKind, EventLog, EventOutcome, GameEvent};
pub use error::{AgentError, EngineError, InconsistentStateError, InvalidAction, SetupError};
pub use state::{GameState, NightScratchpad, Phase, PlayerSnapshot};
