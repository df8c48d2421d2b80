//! Property tests.
//!
//! Random tables are played round by round and the state is checked after
//! every step.

use proptest::prelude::*;

use werewolf_engine::agent::{AgentTable, PlayerAgent, RandomAgent};
use werewolf_engine::core::{
    GameConfig, GameState, PlayerId, PlayerMap, Role, RolePolicy, RosterEntry, Team,
};
use werewolf_engine::orchestrator::Orchestrator;
use werewolf_engine::phases::DayResolver;
use werewolf_engine::rules::{evaluate, Plurality, Tally};

/// Shuffle the standard role multiset onto seats with a permutation seed.
fn roster(order: &[usize]) -> Vec<RosterEntry> {
    let mut roles = Vec::new();
    let policy = RolePolicy::standard();
    for role in Role::ALL {
        roles.extend(std::iter::repeat(role).take(policy.count(role)));
    }
    order
        .iter()
        .enumerate()
        .map(|(seat, &slot)| RosterEntry::new(seat as u8 + 1, format!("P{}", seat + 1), roles[slot]))
        .collect()
}

fn random_table(seed: u64, heal: f64, poison: f64) -> AgentTable {
    PlayerMap::new(10, |seat| {
        Box::new(RandomAgent::for_seat(seed, seat).with_potion_odds(heal, poison)) as Box<dyn PlayerAgent>
    })
}

/// Per-player resources that may only ever be spent.
fn resources(state: &GameState) -> Vec<(bool, bool, bool)> {
    state
        .players()
        .map(|p| {
            let (heal, poison) = p.role_state().potions().unwrap_or((false, false));
            (heal, poison, p.role_state().can_shoot())
        })
        .collect()
}

fn permutation() -> impl Strategy<Value = Vec<usize>> {
    Just((0..10).collect::<Vec<usize>>()).prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Invariants hold after every round of a random game.
    #[test]
    fn prop_game_invariants(
        seed in any::<u64>(),
        order in permutation(),
        heal in 0.0f64..=1.0,
        poison in 0.0f64..=1.0,
    ) {
        let config = GameConfig::default().with_seed(seed).with_mvp_vote(false);
        let mut game = Orchestrator::new(config, roster(&order), random_table(seed, heal, poison)).unwrap();

        let mut alive = game.state().alive_ids().len();
        let mut dead: Vec<PlayerId> = Vec::new();
        let mut spent = resources(game.state());
        let mut votes = 0;
        let mut round = 0;

        loop {
            let outcome = game.play_round().unwrap();
            let state = game.state();

            // round advances by exactly one per night
            prop_assert_eq!(state.round(), round + 1);
            prop_assert_eq!(outcome.round, round + 1);
            round = state.round();

            // team is a function of role
            for p in state.players() {
                prop_assert_eq!(p.team() == Team::Werewolf, p.role() == Role::Werewolf);
            }

            // nobody comes back, and the alive count never grows
            for &d in &dead {
                prop_assert!(!state.is_alive(d));
            }
            let now_alive = state.alive_ids().len();
            prop_assert!(now_alive <= alive);
            alive = now_alive;
            dead = state.players().filter(|p| !p.is_alive()).map(|p| p.id()).collect();

            // one-shot resources never come back
            let now = resources(state);
            for (before, after) in spent.iter().zip(&now) {
                prop_assert!(before.0 || !after.0);
                prop_assert!(before.1 || !after.1);
                prop_assert!(before.2 || !after.2);
            }
            spent = now;

            // the vote ledger only grows
            prop_assert!(state.vote_ledger().len() >= votes);
            votes = state.vote_ledger().len();

            // evaluation is pure
            prop_assert_eq!(evaluate(state), evaluate(state));
            prop_assert_eq!(evaluate(state), outcome.verdict);

            if outcome.is_over() {
                break;
            }
        }

        prop_assert!(round <= 10);
    }

    /// A unique plurality strictly beats every other candidate.
    #[test]
    fn prop_plurality(votes in prop::collection::vec(1u8..=6, 0..40)) {
        let tally: Tally = votes.iter().copied().map(PlayerId::new).collect();

        match tally.plurality() {
            Plurality::Unique(winner) => {
                for (candidate, count) in tally.sorted_counts() {
                    if candidate != winner {
                        prop_assert!(tally.count(winner) > count);
                    }
                }
            }
            Plurality::Tied(tied) => {
                prop_assert!(tied.len() >= 2);
                let top = tally.count(tied[0]);
                for &t in &tied {
                    prop_assert_eq!(tally.count(t), top);
                }
            }
            Plurality::Empty => prop_assert!(votes.is_empty()),
        }
    }

    /// The speaking order visits each living player exactly once.
    #[test]
    fn prop_speaking_order_is_a_rotation(
        alive in prop::collection::btree_set(1u8..=12, 1..12),
        deaths in prop::collection::vec(1u8..=12, 0..3),
    ) {
        let alive: Vec<PlayerId> = alive.into_iter().map(PlayerId::new).collect();
        let deaths: Vec<PlayerId> = deaths.into_iter().map(PlayerId::new).collect();

        let order = DayResolver::speaking_order(&alive, &deaths);

        let mut sorted = order.clone();
        sorted.sort();
        prop_assert_eq!(&sorted, &alive);

        let start = order.iter().position(|id| *id == alive[0]).unwrap();
        let mut rotated = order.clone();
        rotated.rotate_left(start);
        prop_assert_eq!(rotated, alive.clone());

        if let Some(last) = deaths.iter().max() {
            if let Some(first_after) = alive.iter().find(|id| *id > last) {
                prop_assert_eq!(order[0], *first_after);
            } else {
                prop_assert_eq!(order[0], alive[0]);
            }
        }
    }
}
