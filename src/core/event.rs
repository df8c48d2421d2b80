//! Structured event stream.
//!
//! Every observable step of a game (a seer check, a wolf proposal, a
//! fallback substitution, a vote) is appended to an `EventLog` as a
//! `GameEvent`. The log is sufficient to reconstruct the full transcript
//! and is handed to the exporter at the end of the game.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::InvalidAction;
use super::player::PlayerId;
use super::role::SeerVerdict;
use super::state::Phase;
use crate::rules::{VictoryReason, Winner};

/// What kind of thing happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NightStarted,
    SeerCheck,
    WolfProposal,
    WolfKill,
    WitchHeal,
    WitchPoison,
    WitchPass,
    HunterForfeit,
    NightDeaths,
    DeathAnnouncement,
    LastWords,
    Speech,
    Vote,
    Elimination,
    HungJury,
    HunterShot,
    DayDeaths,
    GameEnded,
    MvpVote,
    MvpElected,
}

/// How the event resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// The action took effect as requested.
    Applied,
    /// The action was nullified (e.g. a healed wolf kill).
    Cancelled,
    /// A seer check result.
    Verdict(SeerVerdict),
    /// The agent's response was rejected and a default was substituted.
    Fallback(InvalidAction),
    /// Nothing to do this step.
    Skipped(String),
    /// Terminal verdict.
    Winner(Winner, VictoryReason),
}

/// A single entry in the event stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub round: u32,
    pub phase: Phase,
    pub kind: EventKind,

    /// Who acted. Empty for moderator events such as announcements.
    pub actors: SmallVec<[PlayerId; 3]>,

    /// Who was affected.
    pub targets: SmallVec<[PlayerId; 3]>,

    pub outcome: EventOutcome,
}

impl GameEvent {
    /// Create a new event with no actors or targets.
    pub fn new(round: u32, phase: Phase, kind: EventKind) -> Self {
        Self {
            round,
            phase,
            kind,
            actors: SmallVec::new(),
            targets: SmallVec::new(),
            outcome: EventOutcome::Applied,
        }
    }

    /// Add an actor (builder pattern).
    #[must_use]
    pub fn with_actor(mut self, actor: PlayerId) -> Self {
        self.actors.push(actor);
        self
    }

    /// Add several actors (builder pattern).
    #[must_use]
    pub fn with_actors(mut self, actors: impl IntoIterator<Item = PlayerId>) -> Self {
        self.actors.extend(actors);
        self
    }

    /// Add a target (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: PlayerId) -> Self {
        self.targets.push(target);
        self
    }

    /// Add several targets (builder pattern).
    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = PlayerId>) -> Self {
        self.targets.extend(targets);
        self
    }

    /// Set the outcome (builder pattern).
    #[must_use]
    pub fn with_outcome(mut self, outcome: EventOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Whether this event records a substituted agent response.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, EventOutcome::Fallback(_))
    }
}

/// Append-only event stream backed by a persistent vector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vector<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Events from one round, in order.
    pub fn for_round(&self, round: u32) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().filter(move |e| e.round == round)
    }

    /// Events of one kind, in order.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    #[must_use]
    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }
}
