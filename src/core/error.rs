//! Error taxonomy.
//!
//! - [`SetupError`]: the roster or configuration is unusable. Raised before
//!   any `GameState` exists.
//! - [`InvalidAction`]: an agent answered with something the rules do not
//!   allow. Recovered locally with a deterministic fallback and recorded in
//!   the event log; never returned from a phase.
//! - [`InconsistentStateError`]: an engine invariant broke. Always fatal.
//! - [`EngineError`]: what the orchestrator's fallible API returns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::PlayerId;
use super::role::Role;

/// Invalid or incomplete setup. Fatal, and never reachable once play starts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("roster is empty")]
    EmptyRoster,

    #[error("roster has {actual} players, role policy requires {expected}")]
    WrongPlayerCount { expected: usize, actual: usize },

    #[error("player id {0} appears more than once")]
    DuplicateId(PlayerId),

    #[error("player ids must be contiguous from 1 to {expected_max}, found {found}")]
    NonContiguousIds { expected_max: usize, found: PlayerId },

    #[error("player {0} has an empty name")]
    EmptyName(PlayerId),

    #[error("roster has {actual} {role} players, role policy requires {expected}")]
    RoleCountMismatch {
        role: Role,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported role policy: {0}")]
    UnsupportedPolicy(&'static str),

    #[error("agent table covers {actual} players, roster has {expected}")]
    AgentCountMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Failure reported by an external decision-making agent.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentError {
    #[error("agent timed out")]
    Timeout,

    #[error("malformed agent response: {0}")]
    Malformed(String),

    #[error("agent unavailable: {0}")]
    Unavailable(String),
}

/// A capability response that the rules reject.
///
/// Recovered by the resolver that received it; only observable through the
/// event log.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidAction {
    #[error("target {0} is not a seat at this table")]
    OutOfRange(PlayerId),

    #[error("target {0} is not an eligible choice")]
    NotEligible(PlayerId),

    #[error("target {0} was already checked")]
    AlreadyChecked(PlayerId),

    #[error("expected a {expected} action")]
    WrongShape { expected: String },

    #[error("the {0} potion is not available")]
    PotionUnavailable(String),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// An engine invariant was violated. Signals a defect; play must stop.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InconsistentStateError {
    #[error("player {0} is already dead")]
    AlreadyDead(PlayerId),

    #[error("player {0} does not exist")]
    UnknownPlayer(PlayerId),

    #[error("player {player} has already spent the {resource}")]
    ResourceSpent {
        player: PlayerId,
        resource: &'static str,
    },

    #[error("seer {seer} already checked {target}")]
    AlreadyChecked { seer: PlayerId, target: PlayerId },

    #[error("cannot {action} during the {phase} phase")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },

    #[error("player {player} is a {actual}, expected a {expected}")]
    RoleMismatch {
        player: PlayerId,
        expected: Role,
        actual: Role,
    },
}

/// Fatal errors surfaced to the orchestrator's caller.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("inconsistent game state: {0}")]
    Inconsistent(#[from] InconsistentStateError),

    #[error("game has already ended")]
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_messages() {
        let err = SetupError::RoleCountMismatch {
            role: Role::Werewolf,
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "roster has 2 werewolf players, role policy requires 3"
        );

        let err = SetupError::NonContiguousIds {
            expected_max: 10,
            found: PlayerId::new(12),
        };
        assert_eq!(
            err.to_string(),
            "player ids must be contiguous from 1 to 10, found #12"
        );
    }

    #[test]
    fn test_agent_error_converts_to_invalid_action() {
        let invalid: InvalidAction = AgentError::Timeout.into();
        assert_eq!(invalid, InvalidAction::Agent(AgentError::Timeout));
        assert_eq!(invalid.to_string(), "agent timed out");
    }

    #[test]
    fn test_engine_error_from_inconsistent_state() {
        let err: EngineError = InconsistentStateError::AlreadyDead(PlayerId::new(3)).into();
        assert_eq!(
            err.to_string(),
            "inconsistent game state: player #3 is already dead"
        );
    }

    #[test]
    fn test_invalid_action_serialization() {
        let invalid = InvalidAction::WrongShape {
            expected: "check".to_string(),
        };
        let json = serde_json::to_string(&invalid).unwrap();
        let deserialized: InvalidAction = serde_json::from_str(&json).unwrap();
        assert_eq!(invalid, deserialized);
    }
}
