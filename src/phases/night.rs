use tracing::{debug, info};

use crate::agent::{AgentTable, NightContext, NightPrompt};
use crate::core::{
    EventKind, EventOutcome, GameEvent, GameRng, GameState, InconsistentStateError, InvalidAction,
    NightAction, Phase, PlayerId, Role, SeerVerdict, Team, WitchChoice,
};
use crate::rules::{Plurality, Tally};

use super::{agent_for, record_fallback};

/// What one night produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NightReport {
    pub round: u32,
    /// Players who died tonight, in seat order.
    pub deaths: Vec<PlayerId>,
    pub wolf_target: Option<PlayerId>,
    pub witch_choice: WitchChoice,
    pub seer_check: Option<(PlayerId, SeerVerdict)>,
}

/// Resolves a night in a fixed order: seer, werewolves, witch, deaths.
///
/// Nobody dies until every night role has acted, so the seer may check
/// tonight's victim and the witch always sees the final wolf target.
pub struct NightResolver;

impl NightResolver {
    /// Resolve the current night.
    ///
    /// `state` must already be in `Phase::Night` (see `GameState::enter_night`).
    pub fn run(
        state: &mut GameState,
        agents: &mut AgentTable,
        rng: &mut GameRng,
    ) -> Result<NightReport, InconsistentStateError> {
        if state.phase() != Phase::Night {
            return Err(InconsistentStateError::WrongPhase {
                action: "resolve the night",
                phase: state.phase().as_str(),
            });
        }

        let round = state.round();
        info!(round, alive = state.alive_ids().len(), "night falls");
        state.record_event(GameEvent::new(round, Phase::Night, EventKind::NightStarted));

        let seer_check = Self::seer_step(state, agents)?;
        let wolf_target = Self::wolf_step(state, agents, rng)?;
        let witch_choice = Self::witch_step(state, agents)?;
        let deaths = Self::resolve_deaths(state)?;

        Ok(NightReport {
            round,
            deaths,
            wolf_target,
            witch_choice,
            seer_check,
        })
    }

    fn seer_step(
        state: &mut GameState,
        agents: &mut AgentTable,
    ) -> Result<Option<(PlayerId, SeerVerdict)>, InconsistentStateError> {
        let Some(seer) = state.alive_with_role(Role::Seer).first().copied() else {
            return Ok(None);
        };
        let round = state.round();
        let checks = state.role_state(seer)?.seer_checks();
        let alive = state.alive_ids();
        let unchecked: Vec<PlayerId> = alive
            .iter()
            .copied()
            .filter(|&id| id != seer && !checks.contains_key(&id))
            .collect();

        let Some(&default_target) = unchecked.first() else {
            state.record_event(
                GameEvent::new(round, Phase::Night, EventKind::SeerCheck)
                    .with_actor(seer)
                    .with_outcome(EventOutcome::Skipped("nobody left to check".to_string())),
            );
            return Ok(None);
        };

        let ctx = NightContext {
            round,
            me: seer,
            alive,
            prompt: NightPrompt::Seer {
                unchecked: unchecked.clone(),
                checks: checks.clone(),
            },
        };
        let response = agent_for(agents, seer)?.night_action(&ctx);

        let checked = match response {
            Ok(NightAction::Check(target)) if unchecked.contains(&target) => Ok(target),
            Ok(NightAction::Check(target)) if !state.is_seat(target) => {
                Err(InvalidAction::OutOfRange(target))
            }
            Ok(NightAction::Check(target)) if checks.contains_key(&target) => {
                Err(InvalidAction::AlreadyChecked(target))
            }
            Ok(NightAction::Check(target)) => Err(InvalidAction::NotEligible(target)),
            Ok(_) => Err(InvalidAction::WrongShape {
                expected: "check".to_string(),
            }),
            Err(error) => Err(error.into()),
        };
        let target = checked.unwrap_or_else(|invalid| {
            record_fallback(state, EventKind::SeerCheck, seer, Some(default_target), invalid);
            default_target
        });

        let verdict = state.record_seer_check(seer, target)?;
        debug!(round, seer = %seer, target = %target, ?verdict, "seer check");
        state.record_event(
            GameEvent::new(round, Phase::Night, EventKind::SeerCheck)
                .with_actor(seer)
                .with_target(target)
                .with_outcome(EventOutcome::Verdict(verdict)),
        );

        Ok(Some((target, verdict)))
    }

    /// Every wolf proposes against the same snapshot; the plurality wins and
    /// ties are broken by `rng`.
    fn wolf_step(
        state: &mut GameState,
        agents: &mut AgentTable,
        rng: &mut GameRng,
    ) -> Result<Option<PlayerId>, InconsistentStateError> {
        let pack = state.alive_with_role(Role::Werewolf);
        if pack.is_empty() {
            return Ok(None);
        }
        let round = state.round();
        let alive = state.alive_ids();
        let mut targets = Vec::with_capacity(alive.len());
        for &id in &alive {
            if state.player(id)?.team() == Team::Village {
                targets.push(id);
            }
        }

        let Some(&default_target) = targets.first() else {
            state.record_event(
                GameEvent::new(round, Phase::Night, EventKind::WolfKill)
                    .with_actors(pack.iter().copied())
                    .with_outcome(EventOutcome::Skipped("no eligible target".to_string())),
            );
            state.set_wolf_target(None);
            return Ok(None);
        };

        let prompt = NightPrompt::Werewolf {
            pack: pack.clone(),
            targets: targets.clone(),
        };
        let mut responses = Vec::with_capacity(pack.len());
        for &wolf in &pack {
            let ctx = NightContext {
                round,
                me: wolf,
                alive: alive.clone(),
                prompt: prompt.clone(),
            };
            responses.push((wolf, agent_for(agents, wolf)?.night_action(&ctx)));
        }

        let mut tally = Tally::new();
        for (wolf, response) in responses {
            let proposal = match response {
                Ok(NightAction::Kill(target)) if targets.contains(&target) => Ok(target),
                Ok(NightAction::Kill(target)) if !state.is_seat(target) => {
                    Err(InvalidAction::OutOfRange(target))
                }
                Ok(NightAction::Kill(target)) => Err(InvalidAction::NotEligible(target)),
                Ok(_) => Err(InvalidAction::WrongShape {
                    expected: "kill".to_string(),
                }),
                Err(error) => Err(error.into()),
            };
            let target = match proposal {
                Ok(target) => {
                    state.record_event(
                        GameEvent::new(round, Phase::Night, EventKind::WolfProposal)
                            .with_actor(wolf)
                            .with_target(target),
                    );
                    target
                }
                Err(invalid) => {
                    record_fallback(state, EventKind::WolfProposal, wolf, Some(default_target), invalid);
                    default_target
                }
            };
            tally.add(target);
        }

        let chosen = match tally.plurality() {
            Plurality::Unique(target) => target,
            Plurality::Tied(tied) => {
                let pick = rng.choose(&tied).copied().unwrap_or(default_target);
                debug!(round, ?tied, pick = %pick, "wolf proposals tied");
                pick
            }
            Plurality::Empty => default_target,
        };

        info!(round, target = %chosen, "werewolves choose a victim");
        state.record_event(
            GameEvent::new(round, Phase::Night, EventKind::WolfKill)
                .with_actors(pack.iter().copied())
                .with_target(chosen),
        );
        state.set_wolf_target(Some(chosen));
        Ok(Some(chosen))
    }

    fn witch_step(
        state: &mut GameState,
        agents: &mut AgentTable,
    ) -> Result<WitchChoice, InconsistentStateError> {
        let Some(witch) = state.alive_with_role(Role::Witch).first().copied() else {
            return Ok(WitchChoice::None);
        };
        let round = state.round();
        let (heal_available, poison_available) =
            state
                .role_state(witch)?
                .potions()
                .ok_or(InconsistentStateError::RoleMismatch {
                    player: witch,
                    expected: Role::Witch,
                    actual: state.player(witch)?.role(),
                })?;

        let wolf_target = state.night().wolf_target;
        let alive = state.alive_ids();
        let poison_targets: Vec<PlayerId> = alive.iter().copied().filter(|&id| id != witch).collect();

        let ctx = NightContext {
            round,
            me: witch,
            alive,
            prompt: NightPrompt::Witch {
                wolf_target,
                heal_available,
                poison_available,
                poison_targets: poison_targets.clone(),
            },
        };
        let response = agent_for(agents, witch)?.night_action(&ctx);

        let decided = match response {
            Ok(NightAction::Heal(_)) if !heal_available => {
                Err(InvalidAction::PotionUnavailable("heal".to_string()))
            }
            Ok(NightAction::Heal(target)) if wolf_target == Some(target) => Ok(WitchChoice::Heal(target)),
            Ok(NightAction::Heal(target)) if !state.is_seat(target) => {
                Err(InvalidAction::OutOfRange(target))
            }
            Ok(NightAction::Heal(target)) => Err(InvalidAction::NotEligible(target)),
            Ok(NightAction::Poison(_)) if !poison_available => {
                Err(InvalidAction::PotionUnavailable("poison".to_string()))
            }
            Ok(NightAction::Poison(target)) if poison_targets.contains(&target) => {
                Ok(WitchChoice::Poison(target))
            }
            Ok(NightAction::Poison(target)) if !state.is_seat(target) => {
                Err(InvalidAction::OutOfRange(target))
            }
            Ok(NightAction::Poison(target)) => Err(InvalidAction::NotEligible(target)),
            Ok(NightAction::Pass) => Ok(WitchChoice::None),
            Ok(NightAction::Check(_) | NightAction::Kill(_)) => Err(InvalidAction::WrongShape {
                expected: "heal, poison or pass".to_string(),
            }),
            Err(error) => Err(error.into()),
        };

        let choice = match decided {
            Ok(choice) => choice,
            Err(invalid) => {
                record_fallback(state, EventKind::WitchPass, witch, None, invalid);
                WitchChoice::None
            }
        };

        match choice {
            WitchChoice::Heal(target) => {
                state.consume_heal(witch)?;
                info!(round, witch = %witch, target = %target, "witch heals");
                state.record_event(
                    GameEvent::new(round, Phase::Night, EventKind::WitchHeal)
                        .with_actor(witch)
                        .with_target(target)
                        .with_outcome(EventOutcome::Cancelled),
                );
            }
            WitchChoice::Poison(target) => {
                state.consume_poison(witch)?;
                info!(round, witch = %witch, target = %target, "witch poisons");
                state.record_event(
                    GameEvent::new(round, Phase::Night, EventKind::WitchPoison)
                        .with_actor(witch)
                        .with_target(target),
                );
            }
            WitchChoice::None => {
                state.record_event(
                    GameEvent::new(round, Phase::Night, EventKind::WitchPass).with_actor(witch),
                );
            }
        }

        state.set_witch_choice(choice);
        Ok(choice)
    }

    /// `(wolf target unless healed) ∪ poisoned`, applied at once.
    fn resolve_deaths(state: &mut GameState) -> Result<Vec<PlayerId>, InconsistentStateError> {
        let round = state.round();
        let night = state.night().clone();

        let mut deaths = Vec::with_capacity(2);
        if let Some(target) = night.wolf_target {
            if night.witch_choice != WitchChoice::Heal(target) {
                deaths.push(target);
            }
        }
        if let WitchChoice::Poison(target) = night.witch_choice {
            deaths.push(target);
        }
        deaths.retain(|&id| state.is_alive(id));
        deaths.sort();
        deaths.dedup();

        for &dead in &deaths {
            state.kill(dead)?;

            // A hunter can only fire after a day vote.
            if state.player(dead)?.role() == Role::Hunter && state.consume_shot(dead)? {
                state.record_event(
                    GameEvent::new(round, Phase::Night, EventKind::HunterForfeit)
                        .with_actor(dead)
                        .with_outcome(EventOutcome::Skipped("died at night".to_string())),
                );
            }
        }

        let mut event = GameEvent::new(round, Phase::Night, EventKind::NightDeaths)
            .with_targets(deaths.iter().copied());
        if deaths.is_empty() {
            event = event.with_outcome(EventOutcome::Skipped("peaceful night".to_string()));
        }
        state.record_event(event);

        info!(round, ?deaths, "night resolved");
        Ok(deaths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{PlayerAgent, ScriptedAgent};
    use crate::core::{AgentError, PlayerMap, RosterEntry};

    // 1 wolf, 2 wolf, 3 seer, 4 witch, 5 hunter, 6 villager
    fn setup() -> GameState {
        let roles = [
            Role::Werewolf,
            Role::Werewolf,
            Role::Seer,
            Role::Witch,
            Role::Hunter,
            Role::Villager,
        ];
        let roster: Vec<_> = roles
            .iter()
            .enumerate()
            .map(|(i, &role)| RosterEntry::new(i as u8 + 1, format!("P{}", i + 1), role))
            .collect();
        let mut state = GameState::new(&roster, 10).unwrap();
        state.enter_night().unwrap();
        state
    }

    fn agents(scripts: Vec<ScriptedAgent>) -> AgentTable {
        let boxed: Vec<Box<dyn PlayerAgent>> = scripts
            .into_iter()
            .map(|a| Box::new(a) as Box<dyn PlayerAgent>)
            .collect();
        PlayerMap::from_vec(boxed)
    }

    fn id(n: u8) -> PlayerId {
        PlayerId::new(n)
    }

    #[test]
    fn test_wolf_kill_lands() {
        let mut state = setup();
        let mut table = agents(vec![
            ScriptedAgent::new().night(NightAction::Kill(id(6))),
            ScriptedAgent::new().night(NightAction::Kill(id(6))),
            ScriptedAgent::new().night(NightAction::Check(id(1))),
            ScriptedAgent::new().night(NightAction::Pass),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
        ]);
        let mut rng = GameRng::new(1);

        let report = NightResolver::run(&mut state, &mut table, &mut rng).unwrap();

        assert_eq!(report.deaths, vec![id(6)]);
        assert_eq!(report.seer_check, Some((id(1), SeerVerdict::Werewolf)));
        assert!(!state.is_alive(id(6)));
        assert_eq!(state.events().of_kind(EventKind::WolfProposal).count(), 2);
    }

    #[test]
    fn test_heal_cancels_kill() {
        let mut state = setup();
        let mut table = agents(vec![
            ScriptedAgent::new().night(NightAction::Kill(id(3))),
            ScriptedAgent::new().night(NightAction::Kill(id(3))),
            ScriptedAgent::new().night(NightAction::Check(id(2))),
            ScriptedAgent::new().night(NightAction::Heal(id(3))),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
        ]);
        let mut rng = GameRng::new(1);

        let report = NightResolver::run(&mut state, &mut table, &mut rng).unwrap();

        assert!(report.deaths.is_empty());
        assert_eq!(report.witch_choice, WitchChoice::Heal(id(3)));
        assert_eq!(state.role_state(id(4)).unwrap().potions(), Some((false, true)));
        assert_eq!(state.alive_ids().len(), 6);
    }

    #[test]
    fn test_poison_adds_a_death() {
        let mut state = setup();
        let mut table = agents(vec![
            ScriptedAgent::new().night(NightAction::Kill(id(6))),
            ScriptedAgent::new().night(NightAction::Kill(id(6))),
            ScriptedAgent::new().night(NightAction::Check(id(5))),
            ScriptedAgent::new().night(NightAction::Poison(id(1))),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
        ]);
        let mut rng = GameRng::new(1);

        let report = NightResolver::run(&mut state, &mut table, &mut rng).unwrap();

        assert_eq!(report.deaths, vec![id(1), id(6)]);
        assert_eq!(state.role_state(id(4)).unwrap().potions(), Some((true, false)));
    }

    #[test]
    fn test_poisoning_the_wolf_target_kills_once() {
        let mut state = setup();
        let mut table = agents(vec![
            ScriptedAgent::new().night(NightAction::Kill(id(6))),
            ScriptedAgent::new().night(NightAction::Kill(id(6))),
            ScriptedAgent::new().night(NightAction::Check(id(5))),
            ScriptedAgent::new().night(NightAction::Poison(id(6))),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
        ]);
        let mut rng = GameRng::new(1);

        let report = NightResolver::run(&mut state, &mut table, &mut rng).unwrap();

        assert_eq!(report.deaths, vec![id(6)]);
    }

    #[test]
    fn test_invalid_heal_falls_back_to_pass() {
        let mut state = setup();
        let mut table = agents(vec![
            ScriptedAgent::new().night(NightAction::Kill(id(6))),
            ScriptedAgent::new().night(NightAction::Kill(id(6))),
            ScriptedAgent::new().night(NightAction::Check(id(5))),
            // heals someone the wolves did not pick
            ScriptedAgent::new().night(NightAction::Heal(id(5))),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
        ]);
        let mut rng = GameRng::new(1);

        let report = NightResolver::run(&mut state, &mut table, &mut rng).unwrap();

        assert_eq!(report.witch_choice, WitchChoice::None);
        assert_eq!(report.deaths, vec![id(6)]);
        assert_eq!(state.role_state(id(4)).unwrap().potions(), Some((true, true)));
        assert!(state.events().iter().any(|e| e.is_fallback()));
    }

    #[test]
    fn test_invalid_wolf_proposal_defaults_to_first_target() {
        let mut state = setup();
        let mut table = agents(vec![
            // wolves cannot target their own pack
            ScriptedAgent::new().night(NightAction::Kill(id(2))),
            ScriptedAgent::new().night_error(AgentError::Timeout),
            ScriptedAgent::new().night(NightAction::Check(id(1))),
            ScriptedAgent::new().night(NightAction::Pass),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
        ]);
        let mut rng = GameRng::new(1);

        let report = NightResolver::run(&mut state, &mut table, &mut rng).unwrap();

        assert_eq!(report.wolf_target, Some(id(3)));
        assert_eq!(
            state
                .events()
                .of_kind(EventKind::WolfProposal)
                .filter(|e| e.is_fallback())
                .count(),
            2
        );
    }

    #[test]
    fn test_split_pack_breaks_tie_reproducibly() {
        let run = |seed: u64| {
            let mut state = setup();
            let mut table = agents(vec![
                ScriptedAgent::new().night(NightAction::Kill(id(5))),
                ScriptedAgent::new().night(NightAction::Kill(id(6))),
                ScriptedAgent::new().night(NightAction::Check(id(1))),
                ScriptedAgent::new().night(NightAction::Pass),
                ScriptedAgent::new(),
                ScriptedAgent::new(),
            ]);
            let mut rng = GameRng::new(seed);
            NightResolver::run(&mut state, &mut table, &mut rng).unwrap().wolf_target
        };

        let first = run(42);
        assert!(first == Some(id(5)) || first == Some(id(6)));
        assert_eq!(run(42), first);
    }

    #[test]
    fn test_seer_cannot_recheck() {
        let mut state = setup();
        let mut table = agents(vec![
            ScriptedAgent::new()
                .night(NightAction::Kill(id(6)))
                .night(NightAction::Kill(id(5))),
            ScriptedAgent::new()
                .night(NightAction::Kill(id(6)))
                .night(NightAction::Kill(id(5))),
            ScriptedAgent::new()
                .night(NightAction::Check(id(2)))
                .night(NightAction::Check(id(2))),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
        ]);
        let mut rng = GameRng::new(1);

        NightResolver::run(&mut state, &mut table, &mut rng).unwrap();
        state.enter_day().unwrap();
        state.enter_night().unwrap();
        let report = NightResolver::run(&mut state, &mut table, &mut rng).unwrap();

        // falls back to the first unchecked living player
        assert_eq!(report.seer_check, Some((id(1), SeerVerdict::Werewolf)));
        assert_eq!(state.role_state(id(3)).unwrap().seer_checks().len(), 2);
    }

    #[test]
    fn test_hunter_killed_at_night_forfeits_shot() {
        let mut state = setup();
        let mut table = agents(vec![
            ScriptedAgent::new().night(NightAction::Kill(id(5))),
            ScriptedAgent::new().night(NightAction::Kill(id(5))),
            ScriptedAgent::new().night(NightAction::Check(id(1))),
            ScriptedAgent::new().night(NightAction::Pass),
            ScriptedAgent::new(),
            ScriptedAgent::new(),
        ]);
        let mut rng = GameRng::new(1);

        NightResolver::run(&mut state, &mut table, &mut rng).unwrap();

        assert!(!state.role_state(id(5)).unwrap().can_shoot());
        assert_eq!(state.events().of_kind(EventKind::HunterForfeit).count(), 1);
    }

    #[test]
    fn test_requires_night_phase() {
        let roster = vec![
            RosterEntry::new(1, "A", Role::Werewolf),
            RosterEntry::new(2, "B", Role::Villager),
            RosterEntry::new(3, "C", Role::Villager),
        ];
        let mut state = GameState::new(&roster, 10).unwrap();
        let mut table = agents(vec![ScriptedAgent::new(), ScriptedAgent::new(), ScriptedAgent::new()]);
        let mut rng = GameRng::new(1);

        assert!(matches!(
            NightResolver::run(&mut state, &mut table, &mut rng),
            Err(InconsistentStateError::WrongPhase { .. })
        ));
    }
}
