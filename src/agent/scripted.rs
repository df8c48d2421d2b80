use std::collections::VecDeque;

use crate::core::{AgentError, NightAction, PlayerId, Speech};

use super::capability::{NightContext, PlayerAgent, SpeechContext, VoteContext};

/// Agent that replays queued answers in call order.
///
/// Once a queue runs dry the agent passes at night and reports
/// `AgentError::Unavailable` for votes and shots, which exercises the
/// resolvers' fallbacks. Speeches default to an empty token.
///
/// ```
/// use werewolf_engine::agent::ScriptedAgent;
/// use werewolf_engine::core::{NightAction, PlayerId};
///
/// let agent = ScriptedAgent::new()
///     .night(NightAction::Kill(PlayerId::new(1)))
///     .votes_for(PlayerId::new(4));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedAgent {
    night: VecDeque<Result<NightAction, AgentError>>,
    votes: VecDeque<Result<PlayerId, AgentError>>,
    shots: VecDeque<Result<PlayerId, AgentError>>,
    mvp: VecDeque<Result<PlayerId, AgentError>>,
    speeches: VecDeque<Result<Speech, AgentError>>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a night action.
    #[must_use]
    pub fn night(mut self, action: NightAction) -> Self {
        self.night.push_back(Ok(action));
        self
    }

    /// Queue a failed night action.
    #[must_use]
    pub fn night_error(mut self, error: AgentError) -> Self {
        self.night.push_back(Err(error));
        self
    }

    /// Queue an elimination vote.
    #[must_use]
    pub fn votes_for(mut self, target: PlayerId) -> Self {
        self.votes.push_back(Ok(target));
        self
    }

    /// Queue a failed elimination vote.
    #[must_use]
    pub fn vote_error(mut self, error: AgentError) -> Self {
        self.votes.push_back(Err(error));
        self
    }

    /// Queue a hunter shot.
    #[must_use]
    pub fn shot(mut self, target: PlayerId) -> Self {
        self.shots.push_back(Ok(target));
        self
    }

    /// Queue an MVP vote.
    #[must_use]
    pub fn mvp(mut self, target: PlayerId) -> Self {
        self.mvp.push_back(Ok(target));
        self
    }

    /// Queue a statement.
    #[must_use]
    pub fn speech(mut self, text: impl Into<String>) -> Self {
        self.speeches.push_back(Ok(Speech::new(text)));
        self
    }

    fn exhausted(what: &str) -> AgentError {
        AgentError::Unavailable(format!("no scripted {what} left"))
    }
}

impl PlayerAgent for ScriptedAgent {
    fn night_action(&mut self, _ctx: &NightContext) -> Result<NightAction, AgentError> {
        self.night.pop_front().unwrap_or(Ok(NightAction::Pass))
    }

    fn vote(&mut self, _ctx: &VoteContext) -> Result<PlayerId, AgentError> {
        self.votes
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("vote")))
    }

    fn speak(&mut self, _ctx: &SpeechContext) -> Result<Speech, AgentError> {
        self.speeches.pop_front().unwrap_or(Ok(Speech::default()))
    }

    fn hunter_shot(&mut self, _ctx: &VoteContext) -> Result<PlayerId, AgentError> {
        self.shots
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("shot")))
    }

    fn mvp_vote(&mut self, _ctx: &VoteContext) -> Result<PlayerId, AgentError> {
        self.mvp
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("mvp vote")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::VotePurpose;

    fn vote_ctx() -> VoteContext {
        VoteContext {
            round: 1,
            me: PlayerId::new(1),
            purpose: VotePurpose::Elimination,
            candidates: vec![PlayerId::new(1), PlayerId::new(2)],
        }
    }

    #[test]
    fn test_replays_in_order_then_runs_dry() {
        let mut agent = ScriptedAgent::new()
            .votes_for(PlayerId::new(2))
            .vote_error(AgentError::Timeout);

        assert_eq!(agent.vote(&vote_ctx()), Ok(PlayerId::new(2)));
        assert_eq!(agent.vote(&vote_ctx()), Err(AgentError::Timeout));
        assert!(matches!(agent.vote(&vote_ctx()), Err(AgentError::Unavailable(_))));
    }

    #[test]
    fn test_shots_are_separate_from_votes() {
        let mut agent = ScriptedAgent::new().votes_for(PlayerId::new(2)).shot(PlayerId::new(1));

        assert_eq!(agent.hunter_shot(&vote_ctx()), Ok(PlayerId::new(1)));
        assert_eq!(agent.vote(&vote_ctx()), Ok(PlayerId::new(2)));
        assert!(agent.mvp_vote(&vote_ctx()).is_err());
    }
}
