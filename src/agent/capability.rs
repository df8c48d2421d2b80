use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::{AgentError, LastWords, NightAction, PlayerId, PlayerMap, SeerVerdict, Speech};

/// Role-specific part of a night prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightPrompt {
    Seer {
        /// Living players the seer has not checked yet, excluding the seer.
        unchecked: Vec<PlayerId>,
        checks: OrdMap<PlayerId, SeerVerdict>,
    },
    Werewolf {
        /// Living pack members, the asking wolf included.
        pack: Vec<PlayerId>,
        /// Living non-werewolves.
        targets: Vec<PlayerId>,
    },
    Witch {
        /// Tonight's resolved wolf kill, if any.
        wolf_target: Option<PlayerId>,
        heal_available: bool,
        poison_available: bool,
        poison_targets: Vec<PlayerId>,
    },
}

/// Snapshot handed to a player acting at night.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightContext {
    pub round: u32,
    pub me: PlayerId,
    pub alive: Vec<PlayerId>,
    pub prompt: NightPrompt,
}

/// Why a vote is being requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotePurpose {
    Elimination,
    HunterShot,
    Mvp,
}

/// Snapshot handed to a voter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteContext {
    pub round: u32,
    pub me: PlayerId,
    pub purpose: VotePurpose,
    /// Valid choices, in seat order.
    pub candidates: Vec<PlayerId>,
}

/// Which kind of statement is being requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechKind {
    /// 1-based position in the speaking order.
    Discussion { position: u32 },
    LastWords,
}

/// Snapshot handed to a speaker.
///
/// `spoken` and `pending` exist for turn bookkeeping only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechContext {
    pub round: u32,
    pub me: PlayerId,
    pub kind: SpeechKind,
    pub spoken: Vec<PlayerId>,
    pub pending: Vec<PlayerId>,
    pub night_deaths: Vec<PlayerId>,
    pub last_words: Vec<LastWords>,
}

/// Capability implemented by whatever decides for a player: a human
/// front-end, a language model client, a script.
///
/// Every method may fail; failures are never fatal to the game. Liveness is
/// answered by `GameState::is_alive`, never by the agent.
pub trait PlayerAgent: Send {
    /// Night decision. Only called for seers, werewolves and witches.
    fn night_action(&mut self, ctx: &NightContext) -> Result<NightAction, AgentError>;

    /// Day elimination vote.
    fn vote(&mut self, ctx: &VoteContext) -> Result<PlayerId, AgentError>;

    /// Discussion turn or last words.
    fn speak(&mut self, ctx: &SpeechContext) -> Result<Speech, AgentError>;

    /// Hunter retaliation target.
    fn hunter_shot(&mut self, ctx: &VoteContext) -> Result<PlayerId, AgentError> {
        self.vote(ctx)
    }

    /// Post-game MVP vote.
    fn mvp_vote(&mut self, ctx: &VoteContext) -> Result<PlayerId, AgentError> {
        self.vote(ctx)
    }
}

/// One agent per seat.
pub type AgentTable = PlayerMap<Box<dyn PlayerAgent>>;
