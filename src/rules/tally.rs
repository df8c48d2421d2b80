//! Plurality counting shared by the wolf kill, the day vote and the MVP vote.

use rustc_hash::FxHashMap;

use crate::core::PlayerId;

/// Result of a plurality count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plurality {
    /// Exactly one candidate holds the maximum.
    Unique(PlayerId),
    /// Two or more candidates share the maximum, in seat order.
    Tied(Vec<PlayerId>),
    /// No votes were cast.
    Empty,
}

/// Vote counter keyed by candidate.
///
/// ```
/// use werewolf_engine::core::PlayerId;
/// use werewolf_engine::rules::{Plurality, Tally};
///
/// let tally: Tally = [2, 2, 5].into_iter().map(PlayerId::new).collect();
/// assert_eq!(tally.plurality(), Plurality::Unique(PlayerId::new(2)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Tally {
    counts: FxHashMap<PlayerId, u32>,
    total: u32,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one vote for `candidate`.
    pub fn add(&mut self, candidate: PlayerId) {
        *self.counts.entry(candidate).or_insert(0) += 1;
        self.total += 1;
    }

    #[must_use]
    pub fn count(&self, candidate: PlayerId) -> u32 {
        self.counts.get(&candidate).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// `(candidate, votes)` pairs in seat order.
    #[must_use]
    pub fn sorted_counts(&self) -> Vec<(PlayerId, u32)> {
        let mut counts: Vec<_> = self.counts.iter().map(|(&id, &n)| (id, n)).collect();
        counts.sort_by_key(|&(id, _)| id);
        counts
    }

    /// Candidates holding the maximum count, in seat order.
    #[must_use]
    pub fn leaders(&self) -> Vec<PlayerId> {
        let Some(max) = self.counts.values().copied().max() else {
            return Vec::new();
        };
        let mut leaders: Vec<_> = self
            .counts
            .iter()
            .filter(|&(_, &n)| n == max)
            .map(|(&id, _)| id)
            .collect();
        leaders.sort();
        leaders
    }

    /// Strict plurality, or the tied set.
    #[must_use]
    pub fn plurality(&self) -> Plurality {
        let mut leaders = self.leaders();
        match leaders.len() {
            0 => Plurality::Empty,
            1 => Plurality::Unique(leaders.remove(0)),
            _ => Plurality::Tied(leaders),
        }
    }
}

impl FromIterator<PlayerId> for Tally {
    fn from_iter<I: IntoIterator<Item = PlayerId>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for candidate in iter {
            tally.add(candidate);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(votes: &[(u8, u32)]) -> Tally {
        let mut tally = Tally::new();
        for &(id, n) in votes {
            for _ in 0..n {
                tally.add(PlayerId::new(id));
            }
        }
        tally
    }

    #[test]
    fn test_unique_leader() {
        let tally = tally_of(&[(2, 4), (5, 2)]);
        assert_eq!(tally.plurality(), Plurality::Unique(PlayerId::new(2)));
        assert_eq!(tally.total(), 6);
        assert_eq!(tally.count(PlayerId::new(5)), 2);
        assert_eq!(tally.count(PlayerId::new(9)), 0);
    }

    #[test]
    fn test_tie_at_maximum() {
        let tally = tally_of(&[(7, 1), (5, 3), (2, 3)]);
        assert_eq!(
            tally.plurality(),
            Plurality::Tied(vec![PlayerId::new(2), PlayerId::new(5)])
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(Tally::new().plurality(), Plurality::Empty);
        assert!(Tally::new().leaders().is_empty());
    }

    #[test]
    fn test_sorted_counts() {
        let tally = tally_of(&[(7, 1), (2, 3)]);
        assert_eq!(
            tally.sorted_counts(),
            vec![(PlayerId::new(2), 3), (PlayerId::new(7), 1)]
        );
    }
}
