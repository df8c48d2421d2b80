//! Player identification, per-player storage and the player record.
//!
//! ## PlayerId
//!
//! Seat numbers are 1-based and contiguous: a 10-player table uses
//! `PlayerId(1)..=PlayerId(10)`.
//!
//! ## PlayerMap
//!
//! Dense per-player storage backed by `Vec` for O(1) access by `PlayerId`.
//! Holds the roster inside `GameState` and the agent table inside the
//! orchestrator.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::error::InconsistentStateError;
use super::role::{Role, RoleState, Team};

/// Seat number, 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat number.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Slot in a dense 0-based array.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }

    /// Iterate over all seats for a table of `player_count` players.
    ///
    /// ```
    /// use werewolf_engine::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(1), PlayerId::new(2), PlayerId::new(3)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..=player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use werewolf_engine::core::{PlayerId, PlayerMap};
///
/// let mut spoken: PlayerMap<bool> = PlayerMap::with_value(4, false);
/// spoken[PlayerId::new(2)] = true;
/// assert!(spoken[PlayerId::new(2)]);
/// assert!(!spoken[PlayerId::new(1)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl FnMut(PlayerId) -> T) -> Self {
        assert!(player_count <= 255, "At most 255 players supported");

        let data = PlayerId::all(player_count).map(factory).collect();
        Self { data }
    }

    /// Build from values already ordered by seat (slot 0 is seat 1).
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Check whether a seat exists in this map.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.0 >= 1 && player.index() < self.data.len()
    }

    /// Get a reference to a player's data, if the seat exists.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        if self.contains(player) {
            self.data.get(player.index())
        } else {
            None
        }
    }

    /// Get a mutable reference to a player's data, if the seat exists.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        if self.contains(player) {
            self.data.get_mut(player.index())
        } else {
            None
        }
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8 + 1), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// Life status. Only ever moves from `Alive` to `Dead`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Alive,
    Dead,
}

/// A seated player: static identity plus role-scoped mutable state.
///
/// The role is fixed at construction; `team()` is always derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    role_state: RoleState,
    status: Status,
}

impl Player {
    /// Create a living player with fresh role state.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role_state: RoleState::fresh(role),
            status: Status::Alive,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role_state.role()
    }

    #[must_use]
    pub fn team(&self) -> Team {
        self.role().team()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    /// Role-scoped state (seer checks, witch potions, hunter shot).
    #[must_use]
    pub fn role_state(&self) -> &RoleState {
        &self.role_state
    }

    pub(crate) fn role_state_mut(&mut self) -> &mut RoleState {
        &mut self.role_state
    }

    /// Transition to `Dead`.
    ///
    /// Killing a dead player is an engine defect, not a game event.
    pub(crate) fn kill(&mut self) -> Result<(), InconsistentStateError> {
        if !self.is_alive() {
            return Err(InconsistentStateError::AlreadyDead(self.id));
        }
        self.status = Status::Dead;
        Ok(())
    }
}
