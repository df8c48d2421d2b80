//! Victory evaluation.
//!
//! A pure function of `GameState`, checked after every night and every day.
//! Conditions are tested in a fixed priority order, so a state that
//! satisfies several of them always yields the same verdict.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Role};

/// Which side won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Village,
    Werewolves,
    Draw,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Winner::Village => "village",
            Winner::Werewolves => "werewolves",
            Winner::Draw => "draw",
        })
    }
}

/// Why the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryReason {
    AllWerewolvesEliminated,
    ParityOrMajority,
    Stalemate,
    RoundLimit,
}

impl std::fmt::Display for VictoryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            VictoryReason::AllWerewolvesEliminated => "all werewolves eliminated",
            VictoryReason::ParityOrMajority => "parity or majority reached",
            VictoryReason::Stalemate => "stalemate",
            VictoryReason::RoundLimit => "round limit reached",
        })
    }
}

/// Result of a victory check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Continue,
    Over { winner: Winner, reason: VictoryReason },
}

impl Verdict {
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self, Verdict::Over { .. })
    }

    fn over(winner: Winner, reason: VictoryReason) -> Self {
        Verdict::Over { winner, reason }
    }
}

/// Evaluate the game. Never mutates state.
///
/// 1. No living werewolves: village wins.
/// 2. Werewolves at least match the village: werewolves win.
/// 3. Witch dead with both potions spent, one wolf against one villager:
///    werewolves win by stalemate.
/// 4. `round >= max_rounds`: draw.
#[must_use]
pub fn evaluate(state: &GameState) -> Verdict {
    let wolves = state.living_werewolves();
    let village = state.living_village();

    if wolves == 0 {
        return Verdict::over(Winner::Village, VictoryReason::AllWerewolvesEliminated);
    }

    if wolves >= village {
        return Verdict::over(Winner::Werewolves, VictoryReason::ParityOrMajority);
    }

    // Unreachable while rule 2 precedes it (1 >= 1); kept so the rule set
    // stays intact if parity is ever relaxed.
    if let Some(witch) = state.first_with_role(Role::Witch) {
        let exhausted = witch.role_state().potions() == Some((false, false));
        if !witch.is_alive() && exhausted && wolves == 1 && village == 1 {
            return Verdict::over(Winner::Werewolves, VictoryReason::Stalemate);
        }
    }

    if state.round() >= state.max_rounds() {
        return Verdict::over(Winner::Draw, VictoryReason::RoundLimit);
    }

    Verdict::Continue
}
