//! Decisions and the append-only records they leave behind.
//!
//! - `NightAction`: the raw shape an agent returns at night
//! - `WitchChoice`: the resolved witch decision, at most one potion
//! - `Speech`: an opaque statement token
//! - `VoteRecord` / `SpeechRecord` / `LastWords`: ledger entries

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A night decision as returned by an agent.
///
/// The expected shape depends on the role: a seer returns `Check`, a
/// werewolf `Kill`, a witch `Heal`, `Poison` or `Pass`. Any other shape is
/// treated as invalid and replaced by the role's default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum NightAction {
    Check(PlayerId),
    Kill(PlayerId),
    Heal(PlayerId),
    Poison(PlayerId),
    Pass,
}

impl NightAction {
    /// The target named by this action, if any.
    #[must_use]
    pub fn target(&self) -> Option<PlayerId> {
        match *self {
            NightAction::Check(t)
            | NightAction::Kill(t)
            | NightAction::Heal(t)
            | NightAction::Poison(t) => Some(t),
            NightAction::Pass => None,
        }
    }

    #[must_use]
    pub fn kind_str(&self) -> &'static str {
        match self {
            NightAction::Check(_) => "check",
            NightAction::Kill(_) => "kill",
            NightAction::Heal(_) => "heal",
            NightAction::Poison(_) => "poison",
            NightAction::Pass => "pass",
        }
    }
}

/// The witch's nightly decision. One variant, so at most one potion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum WitchChoice {
    #[default]
    None,
    Heal(PlayerId),
    Poison(PlayerId),
}

/// Opaque statement token. The engine stores it but never reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Speech(pub String);

impl Speech {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One day vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub round: u32,
    pub voter: PlayerId,
    pub target: PlayerId,
}

/// One discussion turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub round: u32,
    pub speaker: PlayerId,

    /// 1-based position in that round's speaking order.
    pub order: u32,

    pub speech: Speech,
}

/// A dying player's final statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastWords {
    pub round: u32,
    pub player: PlayerId,
    pub speech: Speech,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_action_target() {
        assert_eq!(NightAction::Kill(PlayerId::new(3)).target(), Some(PlayerId::new(3)));
        assert_eq!(NightAction::Pass.target(), None);
        assert_eq!(NightAction::Heal(PlayerId::new(1)).kind_str(), "heal");
    }

    #[test]
    fn test_witch_choice_default() {
        assert_eq!(WitchChoice::default(), WitchChoice::None);
    }

    #[test]
    fn test_night_action_wire_shape() {
        let json = serde_json::to_string(&NightAction::Check(PlayerId::new(2))).unwrap();
        assert_eq!(json, r#"{"kind":"check","target":2}"#);

        let pass: NightAction = serde_json::from_str(r#"{"kind":"pass"}"#).unwrap();
        assert_eq!(pass, NightAction::Pass);
    }

    #[test]
    fn test_record_serialization() {
        let record = SpeechRecord {
            round: 2,
            speaker: PlayerId::new(6),
            order: 1,
            speech: Speech::new("I am the seer."),
        };
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: SpeechRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
