use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agent::{AgentTable, VoteContext, VotePurpose};
use crate::core::{
    EventKind, EventOutcome, GameEvent, GameState, InconsistentStateError, Phase, PlayerId,
};
use crate::rules::Tally;

use super::day::validate_choice;
use super::{agent_for, record_fallback};

/// Outcome of the exhibition vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvpResult {
    pub mvp: PlayerId,
    pub votes: u32,
    /// Several players shared the top count; the lowest id was taken.
    pub tie: bool,
    /// `(candidate, votes)` in seat order.
    pub counts: Vec<(PlayerId, u32)>,
    pub total: u32,
}

impl MvpResult {
    /// Percentage of ballots a candidate received.
    #[must_use]
    pub fn share(&self, candidate: PlayerId) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let votes = self
            .counts
            .iter()
            .find(|&&(id, _)| id == candidate)
            .map_or(0, |&(_, n)| n);
        f64::from(votes) * 100.0 / f64::from(self.total)
    }
}

/// Post-game "most valuable player" vote.
///
/// Every seat, dead or alive, votes for any seat. Runs only after the
/// winner is fixed and never touches player state.
pub struct MvpVote;

impl MvpVote {
    pub fn run(
        state: &mut GameState,
        agents: &mut AgentTable,
    ) -> Result<Option<MvpResult>, InconsistentStateError> {
        if state.phase() != Phase::Ended {
            return Err(InconsistentStateError::WrongPhase {
                action: "elect an mvp",
                phase: state.phase().as_str(),
            });
        }

        let round = state.round();
        let candidates: Vec<PlayerId> = state.players().map(|p| p.id()).collect();
        let Some(&default_target) = candidates.first() else {
            return Ok(None);
        };

        let mut ballots = Vec::with_capacity(candidates.len());
        for &voter in &candidates {
            let ctx = VoteContext {
                round,
                me: voter,
                purpose: VotePurpose::Mvp,
                candidates: candidates.clone(),
            };
            ballots.push((voter, agent_for(agents, voter)?.mvp_vote(&ctx)));
        }

        let mut tally = Tally::new();
        for (voter, ballot) in ballots {
            let target = match validate_choice(state, &candidates, ballot.map_err(Into::into)) {
                Ok(target) => {
                    state.record_event(
                        GameEvent::new(round, Phase::Ended, EventKind::MvpVote)
                            .with_actor(voter)
                            .with_target(target),
                    );
                    target
                }
                Err(invalid) => {
                    record_fallback(state, EventKind::MvpVote, voter, Some(default_target), invalid);
                    default_target
                }
            };
            tally.add(target);
        }

        let leaders = tally.leaders();
        let Some(&mvp) = leaders.first() else {
            return Ok(None);
        };
        let tie = leaders.len() > 1;

        let mut event = GameEvent::new(round, Phase::Ended, EventKind::MvpElected).with_target(mvp);
        if tie {
            event = event.with_outcome(EventOutcome::Skipped(format!(
                "tied with {} others, lowest seat wins",
                leaders.len() - 1
            )));
        }
        state.record_event(event);
        info!(mvp = %mvp, votes = tally.count(mvp), tie, "mvp elected");

        Ok(Some(MvpResult {
            mvp,
            votes: tally.count(mvp),
            tie,
            counts: tally.sorted_counts(),
            total: tally.total(),
        }))
    }
}
