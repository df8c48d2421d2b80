//! Game configuration and roster validation.
//!
//! The surrounding application supplies:
//! - `RosterEntry` list: who sits where, with which role
//! - `RolePolicy`: how many of each role the table must have
//! - `GameConfig`: round limit, RNG seed, optional MVP vote
//!
//! Everything here is checked before a `GameState` is built. A roster that
//! passes `validate_roster` can never produce a `SetupError` later.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::SetupError;
use super::player::PlayerId;
use super::role::Role;

/// Required number of players per role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolePolicy {
    pub werewolves: usize,
    pub seers: usize,
    pub witches: usize,
    pub hunters: usize,
    pub villagers: usize,
}

impl RolePolicy {
    /// The 10-player table: 3 werewolves, seer, witch, hunter, 4 villagers.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            werewolves: 3,
            seers: 1,
            witches: 1,
            hunters: 1,
            villagers: 4,
        }
    }

    /// Create a custom policy.
    #[must_use]
    pub const fn new(
        werewolves: usize,
        seers: usize,
        witches: usize,
        hunters: usize,
        villagers: usize,
    ) -> Self {
        Self {
            werewolves,
            seers,
            witches,
            hunters,
            villagers,
        }
    }

    /// Required count for one role.
    #[must_use]
    pub const fn count(&self, role: Role) -> usize {
        match role {
            Role::Werewolf => self.werewolves,
            Role::Seer => self.seers,
            Role::Witch => self.witches,
            Role::Hunter => self.hunters,
            Role::Villager => self.villagers,
        }
    }

    /// Total table size.
    #[must_use]
    pub const fn player_count(&self) -> usize {
        self.werewolves + self.seers + self.witches + self.hunters + self.villagers
    }

    /// Reject policies the resolvers cannot run.
    ///
    /// The night resolver acts for a single seer and a single witch.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.werewolves == 0 {
            return Err(SetupError::UnsupportedPolicy("at least one werewolf is required"));
        }
        if self.seers > 1 {
            return Err(SetupError::UnsupportedPolicy("at most one seer is supported"));
        }
        if self.witches > 1 {
            return Err(SetupError::UnsupportedPolicy("at most one witch is supported"));
        }
        if self.player_count() > 255 {
            return Err(SetupError::UnsupportedPolicy("at most 255 players are supported"));
        }
        Ok(())
    }
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// One seat in the incoming roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
}

impl RosterEntry {
    pub fn new(id: u8, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            role,
        }
    }
}

/// Validate a roster against a role policy.
///
/// Entries may arrive in any order; the result is sorted by id so that
/// creation order equals seat order.
pub fn validate_roster(
    entries: &[RosterEntry],
    policy: &RolePolicy,
) -> Result<Vec<RosterEntry>, SetupError> {
    policy.validate()?;

    if entries.is_empty() {
        return Err(SetupError::EmptyRoster);
    }

    let expected = policy.player_count();
    if entries.len() != expected {
        return Err(SetupError::WrongPlayerCount {
            expected,
            actual: entries.len(),
        });
    }

    let sorted = validate_seats(entries)?;

    for role in Role::ALL {
        let actual = entries.iter().filter(|e| e.role == role).count();
        let required = policy.count(role);
        if actual != required {
            return Err(SetupError::RoleCountMismatch {
                role,
                expected: required,
                actual,
            });
        }
    }

    Ok(sorted)
}

/// Check seat numbering and names, ignoring the role distribution.
///
/// Ids must be unique and cover `1..=entries.len()`. Returns the entries
/// sorted by id.
pub fn validate_seats(entries: &[RosterEntry]) -> Result<Vec<RosterEntry>, SetupError> {
    if entries.is_empty() {
        return Err(SetupError::EmptyRoster);
    }

    let expected = entries.len();
    let mut seen = FxHashSet::default();
    for entry in entries {
        if entry.id.raw() == 0 || entry.id.index() >= expected {
            return Err(SetupError::NonContiguousIds {
                expected_max: expected,
                found: entry.id,
            });
        }
        if !seen.insert(entry.id) {
            return Err(SetupError::DuplicateId(entry.id));
        }
        if entry.name.trim().is_empty() {
            return Err(SetupError::EmptyName(entry.id));
        }
    }

    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.id);
    Ok(sorted)
}

/// Engine configuration.
///
/// Deserializable with defaults for every field, so partial configs work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Round at which the game is declared a draw.
    pub max_rounds: u32,

    /// Seed for tie-breaking randomness.
    pub seed: u64,

    /// Required role distribution.
    pub role_policy: RolePolicy,

    /// Run the post-game MVP vote.
    pub mvp_vote: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            seed: 0,
            role_policy: RolePolicy::standard(),
            mvp_vote: true,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_role_policy(mut self, policy: RolePolicy) -> Self {
        self.role_policy = policy;
        self
    }

    pub fn with_mvp_vote(mut self, enabled: bool) -> Self {
        self.mvp_vote = enabled;
        self
    }

    /// Check the configuration itself (not the roster).
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.max_rounds == 0 {
            return Err(SetupError::InvalidConfig("max_rounds must be at least 1"));
        }
        self.role_policy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_roster() -> Vec<RosterEntry> {
        let roles = [
            Role::Villager,
            Role::Werewolf,
            Role::Seer,
            Role::Villager,
            Role::Werewolf,
            Role::Witch,
            Role::Werewolf,
            Role::Hunter,
            Role::Villager,
            Role::Villager,
        ];
        roles
            .iter()
            .enumerate()
            .map(|(i, &role)| RosterEntry::new(i as u8 + 1, format!("P{}", i + 1), role))
            .collect()
    }

    #[test]
    fn test_standard_policy() {
        let policy = RolePolicy::standard();
        assert_eq!(policy.player_count(), 10);
        assert_eq!(policy.count(Role::Werewolf), 3);
        assert_eq!(policy.count(Role::Villager), 4);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_valid_roster_is_sorted() {
        let mut roster = standard_roster();
        roster.reverse();

        let validated = validate_roster(&roster, &RolePolicy::standard()).unwrap();
        let ids: Vec<_> = validated.iter().map(|e| e.id.raw()).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_wrong_player_count() {
        let mut roster = standard_roster();
        roster.pop();

        assert_eq!(
            validate_roster(&roster, &RolePolicy::standard()),
            Err(SetupError::WrongPlayerCount {
                expected: 10,
                actual: 9
            })
        );
    }

    #[test]
    fn test_duplicate_id() {
        let mut roster = standard_roster();
        roster[9].id = PlayerId::new(3);

        assert_eq!(
            validate_roster(&roster, &RolePolicy::standard()),
            Err(SetupError::DuplicateId(PlayerId::new(3)))
        );
    }

    #[test]
    fn test_non_contiguous_ids() {
        let mut roster = standard_roster();
        roster[9].id = PlayerId::new(11);

        assert_eq!(
            validate_roster(&roster, &RolePolicy::standard()),
            Err(SetupError::NonContiguousIds {
                expected_max: 10,
                found: PlayerId::new(11)
            })
        );

        roster[9].id = PlayerId::new(0);
        assert!(matches!(
            validate_roster(&roster, &RolePolicy::standard()),
            Err(SetupError::NonContiguousIds { .. })
        ));
    }

    #[test]
    fn test_role_count_mismatch() {
        let mut roster = standard_roster();
        // Turn a villager into a fourth werewolf
        roster[0].role = Role::Werewolf;

        assert_eq!(
            validate_roster(&roster, &RolePolicy::standard()),
            Err(SetupError::RoleCountMismatch {
                role: Role::Werewolf,
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn test_empty_name() {
        let mut roster = standard_roster();
        roster[4].name = "   ".to_string();

        assert_eq!(
            validate_roster(&roster, &RolePolicy::standard()),
            Err(SetupError::EmptyName(PlayerId::new(5)))
        );
    }

    #[test]
    fn test_unsupported_policies() {
        assert!(RolePolicy::new(0, 1, 1, 1, 4).validate().is_err());
        assert!(RolePolicy::new(2, 2, 1, 1, 4).validate().is_err());
        assert!(RolePolicy::new(2, 1, 2, 1, 4).validate().is_err());
        assert!(RolePolicy::new(1, 0, 0, 0, 2).validate().is_ok());
    }

    #[test]
    fn test_config_defaults_and_builder() {
        let config = GameConfig::new().with_seed(9).with_max_rounds(4).with_mvp_vote(false);
        assert_eq!(config.seed, 9);
        assert_eq!(config.max_rounds, 4);
        assert!(!config.mvp_vote);
        assert_eq!(config.role_policy, RolePolicy::standard());

        assert!(GameConfig::new().with_max_rounds(0).validate().is_err());
    }

    #[test]
    fn test_config_partial_deserialization() {
        let config: GameConfig = serde_json::from_str(r#"{"max_rounds": 6}"#).unwrap();
        assert_eq!(config.max_rounds, 6);
        assert_eq!(config.seed, 0);
        assert!(config.mvp_vote);
    }
}
