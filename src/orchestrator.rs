//! Game driver.
//!
//! Owns the one `GameState` of a game and runs
//! `Setup -> (Night -> victory? -> Day -> victory?)* -> Ended`, then hands a
//! [`GameSummary`] and the event log to an [`Exporter`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::AgentTable;
use crate::core::{
    validate_roster, EngineError, EventKind, EventLog, EventOutcome, GameConfig, GameEvent,
    GameRng, GameState, Phase, PlayerSnapshot, RosterEntry, SetupError,
};
use crate::phases::{DayReport, DayResolver, MvpResult, MvpVote, NightReport, NightResolver};
use crate::rules::{evaluate, Verdict, VictoryReason, Winner};

/// What one call to [`Orchestrator::play_round`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: u32,
    pub night: NightReport,
    /// `None` when the game ended at dawn.
    pub day: Option<DayReport>,
    pub verdict: Verdict,
}

impl RoundOutcome {
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.verdict.is_over()
    }
}

/// Terminal summary handed to the exporter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Last round played.
    pub round: u32,
    pub roster: Vec<PlayerSnapshot>,
    pub winner: Winner,
    pub reason: VictoryReason,
    /// Exhibition result; has no bearing on `winner`.
    pub mvp: Option<MvpResult>,
}

/// Receives the finished game.
pub trait Exporter {
    fn export(&mut self, summary: &GameSummary, events: &EventLog);
}

/// Keeps the last exported game in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryExporter {
    summary: Option<GameSummary>,
    events: EventLog,
}

impl MemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

impl Exporter for MemoryExporter {
    fn export(&mut self, summary: &GameSummary, events: &EventLog) {
        self.summary = Some(summary.clone());
        self.events = events.clone();
    }
}

/// Writes the summary to `tracing` at info level and the transcript at debug.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingExporter;

impl Exporter for TracingExporter {
    fn export(&mut self, summary: &GameSummary, events: &EventLog) {
        info!(
            round = summary.round,
            winner = %summary.winner,
            reason = %summary.reason,
            mvp = ?summary.mvp.as_ref().map(|m| m.mvp),
            "game over"
        );
        for player in &summary.roster {
            info!(
                player = %player.id,
                name = %player.name,
                role = %player.role,
                status = ?player.status,
                "final roster"
            );
        }
        for event in events.iter() {
            debug!(
                round = event.round,
                phase = %event.phase,
                kind = ?event.kind,
                actors = ?event.actors,
                targets = ?event.targets,
                outcome = ?event.outcome,
                "event"
            );
        }
    }
}

/// Drives one game from setup to export.
///
/// ```
/// use werewolf_engine::agent::{AgentTable, PlayerAgent, RandomAgent};
/// use werewolf_engine::core::{GameConfig, PlayerMap, Role, RosterEntry};
/// use werewolf_engine::orchestrator::{MemoryExporter, Orchestrator};
///
/// let roles = [
///     Role::Werewolf, Role::Werewolf, Role::Werewolf, Role::Seer, Role::Witch,
///     Role::Hunter, Role::Villager, Role::Villager, Role::Villager, Role::Villager,
/// ];
/// let roster: Vec<_> = roles
///     .iter()
///     .enumerate()
///     .map(|(i, &role)| RosterEntry::new(i as u8 + 1, format!("P{}", i + 1), role))
///     .collect();
/// let agents: AgentTable = PlayerMap::new(10, |id| {
///     Box::new(RandomAgent::for_seat(7, id)) as Box<dyn PlayerAgent>
/// });
///
/// let mut game = Orchestrator::new(GameConfig::default().with_seed(7), roster, agents).unwrap();
/// let mut exporter = MemoryExporter::new();
/// let summary = game.run(&mut exporter).unwrap();
/// assert!(summary.round <= 10);
/// assert_eq!(exporter.summary(), Some(&summary));
/// ```
pub struct Orchestrator {
    config: GameConfig,
    state: GameState,
    agents: AgentTable,
    rng: GameRng,
    result: Option<(Winner, VictoryReason)>,
}

impl Orchestrator {
    /// Validate the setup and build the initial state.
    pub fn new(
        config: GameConfig,
        roster: Vec<RosterEntry>,
        agents: AgentTable,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let roster = validate_roster(&roster, &config.role_policy)?;
        if agents.player_count() != roster.len() {
            return Err(SetupError::AgentCountMismatch {
                expected: roster.len(),
                actual: agents.player_count(),
            });
        }

        let state = GameState::new(&roster, config.max_rounds)?;
        let rng = GameRng::new(config.seed);
        info!(players = roster.len(), seed = config.seed, max_rounds = config.max_rounds, "game set up");

        Ok(Self {
            config,
            state,
            agents,
            rng,
            result: None,
        })
    }

    /// Replace the tie-break source.
    #[must_use]
    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Final `(winner, reason)` once the game has ended.
    #[must_use]
    pub fn result(&self) -> Option<(Winner, VictoryReason)> {
        self.result
    }

    /// Play one night and, unless that ends the game, one day.
    pub fn play_round(&mut self) -> Result<RoundOutcome, EngineError> {
        if self.state.phase() == Phase::Ended {
            return Err(EngineError::GameOver);
        }

        let round = self.state.enter_night()?;
        let night = NightResolver::run(&mut self.state, &mut self.agents, &mut self.rng)?;

        let verdict = evaluate(&self.state);
        if let Verdict::Over { winner, reason } = verdict {
            self.finish(winner, reason)?;
            return Ok(RoundOutcome {
                round,
                night,
                day: None,
                verdict,
            });
        }

        self.state.enter_day()?;
        let day = DayResolver::run(&mut self.state, &night.deaths, &mut self.agents)?;

        let verdict = evaluate(&self.state);
        if let Verdict::Over { winner, reason } = verdict {
            self.finish(winner, reason)?;
        }

        Ok(RoundOutcome {
            round,
            night,
            day: Some(day),
            verdict,
        })
    }

    /// Play to the end, run the MVP vote if enabled, and export.
    pub fn run(&mut self, exporter: &mut dyn Exporter) -> Result<GameSummary, EngineError> {
        let (winner, reason) = loop {
            if let Verdict::Over { winner, reason } = self.play_round()?.verdict {
                break (winner, reason);
            }
        };

        let mvp = if self.config.mvp_vote {
            MvpVote::run(&mut self.state, &mut self.agents)?
        } else {
            None
        };

        let summary = GameSummary {
            round: self.state.round(),
            roster: self.state.snapshot(),
            winner,
            reason,
            mvp,
        };
        exporter.export(&summary, self.state.events());
        Ok(summary)
    }

    fn finish(&mut self, winner: Winner, reason: VictoryReason) -> Result<(), EngineError> {
        let round = self.state.round();
        let phase = self.state.phase();
        self.state.record_event(
            GameEvent::new(round, phase, EventKind::GameEnded)
                .with_outcome(EventOutcome::Winner(winner, reason)),
        );
        self.state.end()?;
        self.result = Some((winner, reason));
        info!(round, %winner, %reason, "game ended");
        Ok(())
    }
}
