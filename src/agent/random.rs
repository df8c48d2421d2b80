use crate::core::{AgentError, GameRng, NightAction, PlayerId, Speech};

use super::capability::{NightContext, NightPrompt, PlayerAgent, SpeechContext, VoteContext};

/// Agent that answers uniformly at random among legal options.
///
/// Deterministic for a given seed, so whole games can be replayed. Useful
/// for simulations and for stress-testing the resolvers.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,

    /// Chance that a witch with a heal saves tonight's wolf target.
    heal_probability: f64,

    /// Chance that a witch with poison uses it on a given night.
    poison_probability: f64,
}

impl RandomAgent {
    /// Create an agent with its own stream.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self {
            rng,
            heal_probability: 0.5,
            poison_probability: 0.2,
        }
    }

    /// Create an agent for a seat, derived from a shared table seed.
    #[must_use]
    pub fn for_seat(seed: u64, seat: PlayerId) -> Self {
        Self::new(GameRng::new(seed).for_context(&format!("agent-{}", seat.raw())))
    }

    /// Override the witch's potion habits.
    #[must_use]
    pub fn with_potion_odds(mut self, heal: f64, poison: f64) -> Self {
        self.heal_probability = heal.clamp(0.0, 1.0);
        self.poison_probability = poison.clamp(0.0, 1.0);
        self
    }

    fn pick(&mut self, options: &[PlayerId]) -> Result<PlayerId, AgentError> {
        self.rng
            .choose(options)
            .copied()
            .ok_or_else(|| AgentError::Malformed("no options to choose from".to_string()))
    }
}

impl PlayerAgent for RandomAgent {
    fn night_action(&mut self, ctx: &NightContext) -> Result<NightAction, AgentError> {
        match &ctx.prompt {
            NightPrompt::Seer { unchecked, .. } => self.pick(unchecked).map(NightAction::Check),
            NightPrompt::Werewolf { targets, .. } => self.pick(targets).map(NightAction::Kill),
            NightPrompt::Witch {
                wolf_target,
                heal_available,
                poison_available,
                poison_targets,
            } => {
                if let Some(target) = wolf_target {
                    if *heal_available && self.rng.gen_bool(self.heal_probability) {
                        return Ok(NightAction::Heal(*target));
                    }
                }
                if *poison_available
                    && !poison_targets.is_empty()
                    && self.rng.gen_bool(self.poison_probability)
                {
                    return self.pick(poison_targets).map(NightAction::Poison);
                }
                Ok(NightAction::Pass)
            }
        }
    }

    fn vote(&mut self, ctx: &VoteContext) -> Result<PlayerId, AgentError> {
        let others: Vec<PlayerId> = ctx
            .candidates
            .iter()
            .copied()
            .filter(|&c| c != ctx.me)
            .collect();

        if others.is_empty() {
            self.pick(&ctx.candidates)
        } else {
            self.pick(&others)
        }
    }

    fn speak(&mut self, ctx: &SpeechContext) -> Result<Speech, AgentError> {
        Ok(Speech::new(format!("{} passes the floor.", ctx.me)))
    }
}
