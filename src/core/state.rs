//! Game state: the single mutable aggregate.
//!
//! ## GameState
//!
//! - Roster (`PlayerMap<Player>`, seat order = creation order)
//! - Round counter and phase
//! - Append-only ledgers: votes, speeches, events
//! - Per-round scratch: night decisions, last words
//!
//! Ledgers use `im` persistent vectors, so cloning a `GameState` for a
//! snapshot is cheap and the clone shares structure with the original.
//!
//! All player mutation goes through this type (`kill`, role resource
//! helpers); resolvers never reach into `Player` directly.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{LastWords, Speech, SpeechRecord, VoteRecord, WitchChoice};
use super::config::{validate_seats, RosterEntry};
use super::error::{InconsistentStateError, SetupError};
use super::event::{EventLog, GameEvent};
use super::player::{Player, PlayerId, PlayerMap, Status};
use super::role::{Role, RoleState, SeerVerdict, Team};

/// Game phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Night,
    Day,
    Ended,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Ended => "ended",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ephemeral night memory. Cleared whenever a night begins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightScratchpad {
    /// Resolved wolf-kill target, before any heal.
    pub wolf_target: Option<PlayerId>,

    pub witch_choice: WitchChoice,

    /// `(target, verdict)` of tonight's seer check.
    pub seer_check: Option<(PlayerId, SeerVerdict)>,
}

/// One row of the end-of-game roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub team: Team,
    pub status: Status,
}

/// Full game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    players: PlayerMap<Player>,

    /// Starts at 0; incremented exactly once per night entered.
    round: u32,

    phase: Phase,

    /// Round at which the game is drawn.
    max_rounds: u32,

    vote_ledger: Vector<VoteRecord>,
    speech_log: Vector<SpeechRecord>,

    night: NightScratchpad,

    /// Last words granted in the current round.
    last_words: Vector<LastWords>,

    /// Last words from earlier rounds, archived at each night.
    last_words_history: Vector<LastWords>,

    events: EventLog,
}

impl GameState {
    /// Build the initial state.
    ///
    /// Seats are checked with `validate_seats` and stored in id order; the
    /// role distribution is not checked here (see `validate_roster`).
    pub fn new(roster: &[RosterEntry], max_rounds: u32) -> Result<Self, SetupError> {
        let players = PlayerMap::from_vec(
            validate_seats(roster)?
                .into_iter()
                .map(|e| Player::new(e.id, e.name, e.role))
                .collect(),
        );

        Ok(Self {
            players,
            round: 0,
            phase: Phase::Setup,
            max_rounds,
            vote_ledger: Vector::new(),
            speech_log: Vector::new(),
            night: NightScratchpad::default(),
            last_words: Vector::new(),
            last_words_history: Vector::new(),
            events: EventLog::new(),
        })
    }

    // === Progression ===

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Begin a night: next round, fresh scratchpad, last words archived.
    pub fn enter_night(&mut self) -> Result<u32, InconsistentStateError> {
        match self.phase {
            Phase::Setup | Phase::Day => {}
            Phase::Night | Phase::Ended => {
                return Err(InconsistentStateError::WrongPhase {
                    action: "enter night",
                    phase: self.phase.as_str(),
                })
            }
        }

        self.round += 1;
        self.phase = Phase::Night;
        self.night = NightScratchpad::default();

        let archived = std::mem::take(&mut self.last_words);
        self.last_words_history.append(archived);

        Ok(self.round)
    }

    /// Begin the day that follows the current night.
    pub fn enter_day(&mut self) -> Result<(), InconsistentStateError> {
        if self.phase != Phase::Night {
            return Err(InconsistentStateError::WrongPhase {
                action: "enter day",
                phase: self.phase.as_str(),
            });
        }
        self.phase = Phase::Day;
        Ok(())
    }

    /// Terminate the game.
    pub fn end(&mut self) -> Result<(), InconsistentStateError> {
        match self.phase {
            Phase::Night | Phase::Day => {
                self.phase = Phase::Ended;
                Ok(())
            }
            Phase::Setup | Phase::Ended => Err(InconsistentStateError::WrongPhase {
                action: "end the game",
                phase: self.phase.as_str(),
            }),
        }
    }

    // === Players ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().map(|(_, p)| p)
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, InconsistentStateError> {
        self.players
            .get(id)
            .ok_or(InconsistentStateError::UnknownPlayer(id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, InconsistentStateError> {
        self.players
            .get_mut(id)
            .ok_or(InconsistentStateError::UnknownPlayer(id))
    }

    /// Whether `id` is a seat at this table.
    #[must_use]
    pub fn is_seat(&self, id: PlayerId) -> bool {
        self.players.contains(id)
    }

    /// Whether `id` is a seated, living player. Unknown ids are not alive.
    #[must_use]
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.players.get(id).is_some_and(Player::is_alive)
    }

    /// Living players in seat order.
    #[must_use]
    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.players()
            .filter(|p| p.is_alive())
            .map(Player::id)
            .collect()
    }

    /// Living players of one role in seat order.
    #[must_use]
    pub fn alive_with_role(&self, role: Role) -> Vec<PlayerId> {
        self.players()
            .filter(|p| p.is_alive() && p.role() == role)
            .map(Player::id)
            .collect()
    }

    /// The first seat holding `role`, living or dead.
    #[must_use]
    pub fn first_with_role(&self, role: Role) -> Option<&Player> {
        self.players().find(|p| p.role() == role)
    }

    #[must_use]
    pub fn living_werewolves(&self) -> usize {
        self.players()
            .filter(|p| p.is_alive() && p.team() == Team::Werewolf)
            .count()
    }

    #[must_use]
    pub fn living_village(&self) -> usize {
        self.players()
            .filter(|p| p.is_alive() && p.team() == Team::Village)
            .count()
    }

    /// Move a living player to `Dead`. The only path to death.
    pub fn kill(&mut self, id: PlayerId) -> Result<(), InconsistentStateError> {
        self.player_mut(id)?.kill()
    }

    // === Role resources ===

    pub(crate) fn record_seer_check(
        &mut self,
        seer: PlayerId,
        target: PlayerId,
    ) -> Result<SeerVerdict, InconsistentStateError> {
        let target_player = self.player(target)?;
        if !target_player.is_alive() {
            return Err(InconsistentStateError::AlreadyDead(target));
        }
        let verdict = SeerVerdict::of(target_player.role());

        self.player_mut(seer)?
            .role_state_mut()
            .record_check(seer, target, verdict)?;
        self.night.seer_check = Some((target, verdict));
        Ok(verdict)
    }

    pub(crate) fn consume_heal(&mut self, witch: PlayerId) -> Result<(), InconsistentStateError> {
        self.player_mut(witch)?.role_state_mut().consume_heal(witch)
    }

    pub(crate) fn consume_poison(&mut self, witch: PlayerId) -> Result<(), InconsistentStateError> {
        self.player_mut(witch)?.role_state_mut().consume_poison(witch)
    }

    pub(crate) fn consume_shot(&mut self, hunter: PlayerId) -> Result<bool, InconsistentStateError> {
        self.player_mut(hunter)?.role_state_mut().consume_shot(hunter)
    }

    /// Role state of a seat, for read-only inspection.
    pub fn role_state(&self, id: PlayerId) -> Result<&RoleState, InconsistentStateError> {
        Ok(self.player(id)?.role_state())
    }

    // === Night scratchpad ===

    #[must_use]
    pub fn night(&self) -> &NightScratchpad {
        &self.night
    }

    pub(crate) fn set_wolf_target(&mut self, target: Option<PlayerId>) {
        self.night.wolf_target = target;
    }

    pub(crate) fn set_witch_choice(&mut self, choice: WitchChoice) {
        self.night.witch_choice = choice;
    }

    // === Ledgers ===

    pub(crate) fn record_vote(&mut self, voter: PlayerId, target: PlayerId) {
        self.vote_ledger.push_back(VoteRecord {
            round: self.round,
            voter,
            target,
        });
    }

    #[must_use]
    pub fn vote_ledger(&self) -> &Vector<VoteRecord> {
        &self.vote_ledger
    }

    /// Votes cast in one round, in casting order.
    pub fn votes_in_round(&self, round: u32) -> impl Iterator<Item = &VoteRecord> {
        self.vote_ledger.iter().filter(move |v| v.round == round)
    }

    pub(crate) fn record_speech(&mut self, speaker: PlayerId, order: u32, speech: Speech) {
        self.speech_log.push_back(SpeechRecord {
            round: self.round,
            speaker,
            order,
            speech,
        });
    }

    #[must_use]
    pub fn speech_log(&self) -> &Vector<SpeechRecord> {
        &self.speech_log
    }

    /// Who has already spoken in the current round's discussion.
    #[must_use]
    pub fn spoken_this_round(&self) -> Vec<PlayerId> {
        self.speech_log
            .iter()
            .filter(|s| s.round == self.round)
            .map(|s| s.speaker)
            .collect()
    }

    pub(crate) fn push_last_words(&mut self, player: PlayerId, speech: Speech) {
        self.last_words.push_back(LastWords {
            round: self.round,
            player,
            speech,
        });
    }

    /// Last words granted this round.
    #[must_use]
    pub fn last_words(&self) -> &Vector<LastWords> {
        &self.last_words
    }

    /// Last words from earlier rounds.
    #[must_use]
    pub fn last_words_history(&self) -> &Vector<LastWords> {
        &self.last_words_history
    }

    pub(crate) fn record_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // === Snapshot ===

    /// Roster with roles and status, for export.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PlayerSnapshot> {
        self.players()
            .map(|p| PlayerSnapshot {
                id: p.id(),
                name: p.name().to_string(),
                role: p.role(),
                team: p.team(),
                status: p.status(),
            })
            .collect()
    }
}
