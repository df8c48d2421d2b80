use tracing::{debug, info};

use crate::agent::{AgentTable, SpeechContext, SpeechKind, VoteContext, VotePurpose};
use crate::core::{
    EventKind, EventOutcome, GameEvent, GameState, InconsistentStateError, InvalidAction, Phase,
    PlayerId, Role, Speech,
};
use crate::rules::{Plurality, Tally};

use super::{agent_for, record_fallback};

/// What one day produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DayReport {
    pub round: u32,
    /// Eliminated player first, then the hunter's target.
    pub deaths: Vec<PlayerId>,
    pub eliminated: Option<PlayerId>,
    /// Two or more candidates shared the top count.
    pub tie: bool,
    pub hunter_shot: Option<PlayerId>,
    pub last_words_granted: Vec<PlayerId>,
    pub speaking_order: Vec<PlayerId>,
}

/// Resolves a day: announcement, last words, discussion, vote, hunter.
pub struct DayResolver;

impl DayResolver {
    /// Compute the discussion order.
    ///
    /// Starts at the first living id above the highest night death and wraps
    /// around; with no deaths, or nobody above them, starts at the lowest id.
    ///
    /// ```
    /// use werewolf_engine::core::PlayerId;
    /// use werewolf_engine::phases::DayResolver;
    ///
    /// let alive: Vec<_> = [1, 2, 4, 6].into_iter().map(PlayerId::new).collect();
    /// let order = DayResolver::speaking_order(&alive, &[PlayerId::new(3)]);
    /// assert_eq!(order, [4, 6, 1, 2].map(PlayerId::new));
    /// ```
    #[must_use]
    pub fn speaking_order(alive: &[PlayerId], night_deaths: &[PlayerId]) -> Vec<PlayerId> {
        let mut alive = alive.to_vec();
        alive.sort();

        let start = night_deaths
            .iter()
            .max()
            .and_then(|&last| alive.iter().position(|&id| id > last))
            .unwrap_or(0);
        alive.rotate_left(start);
        alive
    }

    /// Resolve the current day. `state` must be in `Phase::Day`.
    pub fn run(
        state: &mut GameState,
        night_deaths: &[PlayerId],
        agents: &mut AgentTable,
    ) -> Result<DayReport, InconsistentStateError> {
        if state.phase() != Phase::Day {
            return Err(InconsistentStateError::WrongPhase {
                action: "resolve the day",
                phase: state.phase().as_str(),
            });
        }

        let round = state.round();
        let mut report = DayReport {
            round,
            ..DayReport::default()
        };

        info!(round, ?night_deaths, "day breaks");
        state.record_event(
            GameEvent::new(round, Phase::Day, EventKind::DeathAnnouncement)
                .with_targets(night_deaths.iter().copied()),
        );

        report.last_words_granted = Self::last_words(state, night_deaths, agents)?;

        let alive = state.alive_ids();
        if alive.len() <= 1 {
            debug!(round, "too few players for discussion");
            return Ok(report);
        }

        report.speaking_order = Self::speaking_order(&alive, night_deaths);
        Self::discussion(state, &report.speaking_order, night_deaths, agents)?;

        let (eliminated, tie) = Self::vote(state, &alive, agents)?;
        report.eliminated = eliminated;
        report.tie = tie;

        if let Some(eliminated) = eliminated {
            state.kill(eliminated)?;
            report.deaths.push(eliminated);

            if state.player(eliminated)?.role() == Role::Hunter && state.consume_shot(eliminated)? {
                report.hunter_shot = Self::hunter_shot(state, eliminated, agents)?;
                if let Some(target) = report.hunter_shot {
                    state.kill(target)?;
                    report.deaths.push(target);
                }
            }
        }

        state.record_event(
            GameEvent::new(round, Phase::Day, EventKind::DayDeaths)
                .with_targets(report.deaths.iter().copied()),
        );
        info!(round, deaths = ?report.deaths, "day resolved");
        Ok(report)
    }

    /// Night victims speak when it is the first round or they died alone.
    fn last_words(
        state: &mut GameState,
        night_deaths: &[PlayerId],
        agents: &mut AgentTable,
    ) -> Result<Vec<PlayerId>, InconsistentStateError> {
        let round = state.round();
        if night_deaths.is_empty() {
            return Ok(Vec::new());
        }
        if round > 1 && night_deaths.len() > 1 {
            debug!(round, "simultaneous deaths, no last words");
            return Ok(Vec::new());
        }

        let mut granted = Vec::with_capacity(night_deaths.len());
        for &player in night_deaths {
            let ctx = SpeechContext {
                round,
                me: player,
                kind: SpeechKind::LastWords,
                spoken: Vec::new(),
                pending: Vec::new(),
                night_deaths: night_deaths.to_vec(),
                last_words: state.last_words().iter().cloned().collect(),
            };
            let speech = match agent_for(agents, player)?.speak(&ctx) {
                Ok(speech) => speech,
                Err(error) => {
                    record_fallback(state, EventKind::LastWords, player, None, error.into());
                    Speech::default()
                }
            };

            state.push_last_words(player, speech);
            state.record_event(GameEvent::new(round, Phase::Day, EventKind::LastWords).with_actor(player));
            granted.push(player);
        }
        Ok(granted)
    }

    fn discussion(
        state: &mut GameState,
        order: &[PlayerId],
        night_deaths: &[PlayerId],
        agents: &mut AgentTable,
    ) -> Result<(), InconsistentStateError> {
        let round = state.round();
        for (i, &speaker) in order.iter().enumerate() {
            let position = i as u32 + 1;
            let ctx = SpeechContext {
                round,
                me: speaker,
                kind: SpeechKind::Discussion { position },
                spoken: order[..i].to_vec(),
                pending: order[i + 1..].to_vec(),
                night_deaths: night_deaths.to_vec(),
                last_words: state.last_words().iter().cloned().collect(),
            };
            let speech = match agent_for(agents, speaker)?.speak(&ctx) {
                Ok(speech) => speech,
                Err(error) => {
                    record_fallback(state, EventKind::Speech, speaker, None, error.into());
                    Speech::default()
                }
            };

            state.record_speech(speaker, position, speech);
            state.record_event(GameEvent::new(round, Phase::Day, EventKind::Speech).with_actor(speaker));
        }
        Ok(())
    }

    /// Gather every ballot, then record and count them.
    fn vote(
        state: &mut GameState,
        candidates: &[PlayerId],
        agents: &mut AgentTable,
    ) -> Result<(Option<PlayerId>, bool), InconsistentStateError> {
        let round = state.round();
        let Some(&default_target) = candidates.first() else {
            return Ok((None, false));
        };

        let mut ballots = Vec::with_capacity(candidates.len());
        for &voter in candidates {
            let ctx = VoteContext {
                round,
                me: voter,
                purpose: VotePurpose::Elimination,
                candidates: candidates.to_vec(),
            };
            ballots.push((voter, agent_for(agents, voter)?.vote(&ctx)));
        }

        let mut tally = Tally::new();
        for (voter, ballot) in ballots {
            let target = match validate_choice(state, candidates, ballot.map_err(Into::into)) {
                Ok(target) => {
                    state.record_event(
                        GameEvent::new(round, Phase::Day, EventKind::Vote)
                            .with_actor(voter)
                            .with_target(target),
                    );
                    target
                }
                Err(invalid) => {
                    record_fallback(state, EventKind::Vote, voter, Some(default_target), invalid);
                    default_target
                }
            };
            state.record_vote(voter, target);
            tally.add(target);
        }

        debug!(round, counts = ?tally.sorted_counts(), "votes counted");
        match tally.plurality() {
            Plurality::Unique(eliminated) => {
                info!(round, player = %eliminated, votes = tally.count(eliminated), "player eliminated");
                state.record_event(
                    GameEvent::new(round, Phase::Day, EventKind::Elimination).with_target(eliminated),
                );
                Ok((Some(eliminated), false))
            }
            Plurality::Tied(tied) => {
                info!(round, ?tied, "hung jury");
                state.record_event(
                    GameEvent::new(round, Phase::Day, EventKind::HungJury)
                        .with_targets(tied)
                        .with_outcome(EventOutcome::Skipped("tie at the top".to_string())),
                );
                Ok((None, true))
            }
            Plurality::Empty => Ok((None, false)),
        }
    }

    /// The eliminated hunter names one living target. The shot is already
    /// consumed; an unusable answer means no shot.
    fn hunter_shot(
        state: &mut GameState,
        hunter: PlayerId,
        agents: &mut AgentTable,
    ) -> Result<Option<PlayerId>, InconsistentStateError> {
        let round = state.round();
        let candidates = state.alive_ids();
        if candidates.is_empty() {
            return Ok(None);
        }

        let ctx = VoteContext {
            round,
            me: hunter,
            purpose: VotePurpose::HunterShot,
            candidates: candidates.clone(),
        };
        let response = agent_for(agents, hunter)?.hunter_shot(&ctx);

        match validate_choice(state, &candidates, response.map_err(Into::into)) {
            Ok(target) => {
                info!(round, hunter = %hunter, target = %target, "hunter fires");
                state.record_event(
                    GameEvent::new(round, Phase::Day, EventKind::HunterShot)
                        .with_actor(hunter)
                        .with_target(target),
                );
                Ok(Some(target))
            }
            Err(invalid) => {
                record_fallback(state, EventKind::HunterShot, hunter, None, invalid);
                Ok(None)
            }
        }
    }
}

/// Accept `choice` if it names one of `candidates`.
pub(super) fn validate_choice(
    state: &GameState,
    candidates: &[PlayerId],
    choice: Result<PlayerId, InvalidAction>,
) -> Result<PlayerId, InvalidAction> {
    let target = choice?;
    if candidates.contains(&target) {
        Ok(target)
    } else if state.is_seat(target) {
        Err(InvalidAction::NotEligible(target))
    } else {
        Err(InvalidAction::OutOfRange(target))
    }
}
