//! Roles, teams, and role-scoped player state.
//!
//! Each role carries its own sub-state inside the `RoleState` variant, so a
//! witch's potions can only exist on a witch and a seer's checks only on a
//! seer. Resolvers match exhaustively on `Role`; adding a role is a
//! compile error until every phase handles it.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::error::InconsistentStateError;
use super::player::PlayerId;

/// A player's secret role. Immutable after setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    Seer,
    Witch,
    Hunter,
    Villager,
}

impl Role {
    /// All roles, in policy order.
    pub const ALL: [Role; 5] = [
        Role::Werewolf,
        Role::Seer,
        Role::Witch,
        Role::Hunter,
        Role::Villager,
    ];

    /// The team this role plays for.
    #[must_use]
    pub const fn team(self) -> Team {
        match self {
            Role::Werewolf => Team::Werewolf,
            Role::Seer | Role::Witch | Role::Hunter | Role::Villager => Team::Village,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Werewolf => "werewolf",
            Role::Seer => "seer",
            Role::Witch => "witch",
            Role::Hunter => "hunter",
            Role::Villager => "villager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived grouping used only by victory evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Werewolf,
    Village,
}

/// What the seer learns about a checked player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeerVerdict {
    Villager,
    Werewolf,
}

impl SeerVerdict {
    /// The verdict a check on `role` produces.
    #[must_use]
    pub const fn of(role: Role) -> Self {
        match role {
            Role::Werewolf => SeerVerdict::Werewolf,
            Role::Seer | Role::Witch | Role::Hunter | Role::Villager => SeerVerdict::Villager,
        }
    }
}

/// Role plus the one-shot resources that only make sense for that role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleState {
    Werewolf,
    Seer {
        /// Each target appears at most once over the whole game.
        checks: OrdMap<PlayerId, SeerVerdict>,
    },
    Witch {
        heal_available: bool,
        poison_available: bool,
    },
    Hunter {
        can_shoot: bool,
    },
    Villager,
}

impl RoleState {
    /// Initial state for a role: no checks, both potions, a loaded gun.
    #[must_use]
    pub fn fresh(role: Role) -> Self {
        match role {
            Role::Werewolf => RoleState::Werewolf,
            Role::Seer => RoleState::Seer {
                checks: OrdMap::new(),
            },
            Role::Witch => RoleState::Witch {
                heal_available: true,
                poison_available: true,
            },
            Role::Hunter => RoleState::Hunter { can_shoot: true },
            Role::Villager => RoleState::Villager,
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            RoleState::Werewolf => Role::Werewolf,
            RoleState::Seer { .. } => Role::Seer,
            RoleState::Witch { .. } => Role::Witch,
            RoleState::Hunter { .. } => Role::Hunter,
            RoleState::Villager => Role::Villager,
        }
    }

    /// Seer checks performed so far. Empty for every other role.
    #[must_use]
    pub fn seer_checks(&self) -> OrdMap<PlayerId, SeerVerdict> {
        match self {
            RoleState::Seer { checks } => checks.clone(),
            _ => OrdMap::new(),
        }
    }

    /// `(heal_available, poison_available)` for a witch.
    #[must_use]
    pub fn potions(&self) -> Option<(bool, bool)> {
        match self {
            RoleState::Witch {
                heal_available,
                poison_available,
            } => Some((*heal_available, *poison_available)),
            _ => None,
        }
    }

    /// Whether a hunter still holds a shot.
    #[must_use]
    pub fn can_shoot(&self) -> bool {
        matches!(self, RoleState::Hunter { can_shoot: true })
    }

    pub(crate) fn record_check(
        &mut self,
        owner: PlayerId,
        target: PlayerId,
        verdict: SeerVerdict,
    ) -> Result<(), InconsistentStateError> {
        match self {
            RoleState::Seer { checks } => {
                if checks.contains_key(&target) {
                    return Err(InconsistentStateError::AlreadyChecked { seer: owner, target });
                }
                checks.insert(target, verdict);
                Ok(())
            }
            other => Err(InconsistentStateError::RoleMismatch {
                player: owner,
                expected: Role::Seer,
                actual: other.role(),
            }),
        }
    }

    pub(crate) fn consume_heal(&mut self, owner: PlayerId) -> Result<(), InconsistentStateError> {
        match self {
            RoleState::Witch { heal_available, .. } => {
                if !*heal_available {
                    return Err(InconsistentStateError::ResourceSpent {
                        player: owner,
                        resource: "heal potion",
                    });
                }
                *heal_available = false;
                Ok(())
            }
            other => Err(InconsistentStateError::RoleMismatch {
                player: owner,
                expected: Role::Witch,
                actual: other.role(),
            }),
        }
    }

    pub(crate) fn consume_poison(&mut self, owner: PlayerId) -> Result<(), InconsistentStateError> {
        match self {
            RoleState::Witch {
                poison_available, ..
            } => {
                if !*poison_available {
                    return Err(InconsistentStateError::ResourceSpent {
                        player: owner,
                        resource: "poison potion",
                    });
                }
                *poison_available = false;
                Ok(())
            }
            other => Err(InconsistentStateError::RoleMismatch {
                player: owner,
                expected: Role::Witch,
                actual: other.role(),
            }),
        }
    }

    /// Spend the hunter's shot. Returns whether a shot was still held.
    pub(crate) fn consume_shot(&mut self, owner: PlayerId) -> Result<bool, InconsistentStateError> {
        match self {
            RoleState::Hunter { can_shoot } => {
                let had_shot = *can_shoot;
                *can_shoot = false;
                Ok(had_shot)
            }
            other => Err(InconsistentStateError::RoleMismatch {
                player: owner,
                expected: Role::Hunter,
                actual: other.role(),
            }),
        }
    }
}
