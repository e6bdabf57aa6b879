//! Keeps two views of the same competitors in step: a hash table for finding
//! someone by name, and a search tree ordered by win count for answering
//! standings queries.

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    arena::{Arena, Handle},
    competitor::Competitor,
    hash_map::{ChainedHashMap, INITIAL_CAPACITY},
    ordered_map::OrderedMap,
};

/// Why a game result was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreboardError {
    #[error("no competitor named {0:?} is registered")]
    UnknownCompetitor(String),

    #[error("{0:?} is listed as both winner and loser")]
    SelfMatch(String),
}

/// Where a competitor sits in the win tree. Win count comes first, and the
/// competitor's handle breaks ties, so two competitors on the same number of
/// wins are two distinct nodes, ordered by registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct StandingKey {
    wins: i64,
    id: Handle,
}

/// Tracks competitors and their results, and answers "who has between N and M
/// wins" style questions.
///
/// Competitor records live in an arena and both indexes store handles into it.
/// The tree key for a competitor always reflects their current win count: a
/// recorded game pulls both players out of the tree under their old counts and
/// puts them back under the new ones.
pub struct Scoreboard {
    competitors: Arena<Competitor>,
    by_name: ChainedHashMap<String, Handle>,
    by_wins: OrderedMap<StandingKey, Handle>,
    games_reported: u64,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Makes a scoreboard whose name table starts out with a specified number
    /// of buckets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            competitors: Arena::new(),
            by_name: ChainedHashMap::with_capacity(capacity),
            by_wins: OrderedMap::new(),
            games_reported: 0,
        }
    }

    /// Adds a competitor with a clean record. Registering a name twice does
    /// nothing the second time.
    pub fn register_player(&mut self, name: &str) {
        if self.by_name.contains(name) {
            return;
        }

        let id = self.competitors.alloc(Competitor::new(name.to_owned()));
        let key = self.key_of(id);
        self.by_name.put(name.to_owned(), id);
        self.by_wins.put(key, id);

        debug!(name, "registered competitor");

        #[cfg(test)]
        self.check_sync();
    }

    pub fn check_player(&self, name: &str) -> bool {
        self.by_name.contains(name)
    }

    pub fn competitor(&self, name: &str) -> Option<&Competitor> {
        self.by_name.get(name).map(|&id| &self.competitors[id])
    }

    /// Records a game. A result naming someone who isn't registered, or the
    /// same competitor on both sides, is dropped without complaint; use
    /// [`Scoreboard::try_add_game_result`] to find out when that happens.
    pub fn add_game_result(&mut self, winner: &str, loser: &str, draw: bool) {
        if let Err(err) = self.try_add_game_result(winner, loser, draw) {
            debug!(%err, "dropping game result");
        }
    }

    /// Records a game, reporting why it was refused if it was. A draw counts
    /// as a draw for both sides; otherwise winner gets a win and loser a loss.
    ///
    /// Every call counts towards [`Scoreboard::games_reported`], refused or
    /// not.
    pub fn try_add_game_result(
        &mut self,
        winner: &str,
        loser: &str,
        draw: bool,
    ) -> Result<(), ScoreboardError> {
        self.games_reported += 1;

        let winner_id = self.lookup(winner)?;
        let loser_id = self.lookup(loser)?;
        if winner_id == loser_id {
            return Err(ScoreboardError::SelfMatch(winner.to_owned()));
        }

        // the tree can't re-key a node in place, so both players come out
        // under their current win counts before anything changes
        self.unlink(winner_id);
        self.unlink(loser_id);

        if draw {
            self.competitors[winner_id].add_draw();
            self.competitors[loser_id].add_draw();
        } else {
            self.competitors[winner_id].add_win();
            self.competitors[loser_id].add_loss();
        }

        self.link(winner_id);
        self.link(loser_id);

        trace!(winner, loser, draw, "recorded game result");

        #[cfg(test)]
        self.check_sync();

        Ok(())
    }

    /// Everyone with between lo and hi wins inclusive, fewest wins first.
    /// Competitors on the same number of wins come out in registration order.
    pub fn win_range(&self, lo: i64, hi: i64) -> Vec<&Competitor> {
        let lo = StandingKey {
            wins: lo,
            id: Handle::MIN,
        };
        let hi = StandingKey {
            wins: hi,
            id: Handle::MAX,
        };

        self.by_wins
            .range_search(lo, hi)
            .map(|(_, &id)| &self.competitors[id])
            .collect()
    }

    /// Everyone with strictly more than wins wins, fewest wins first.
    pub fn win_successor(&self, wins: i64) -> Vec<&Competitor> {
        let key = StandingKey {
            wins,
            id: Handle::MAX,
        };

        self.by_wins
            .successors(key)
            .map(|(_, &id)| &self.competitors[id])
            .collect()
    }

    /// Every competitor, fewest wins first.
    pub fn standings(&self) -> impl Iterator<Item = &Competitor> + '_ {
        self.by_wins.iter().map(move |(_, &id)| &self.competitors[id])
    }

    /// The number of registered competitors.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// How many results have been reported, including ones that were dropped.
    pub fn games_reported(&self) -> u64 {
        self.games_reported
    }

    fn lookup(&self, name: &str) -> Result<Handle, ScoreboardError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ScoreboardError::UnknownCompetitor(name.to_owned()))
    }

    fn key_of(&self, id: Handle) -> StandingKey {
        StandingKey {
            wins: i64::from(self.competitors[id].wins()),
            id,
        }
    }

    fn unlink(&mut self, id: Handle) {
        let key = self.key_of(id);
        let removed = self.by_wins.delete(&key);
        debug_assert_eq!(Some(id), removed);
    }

    fn link(&mut self, id: Handle) {
        let key = self.key_of(id);
        self.by_wins.put(key, id);
    }

    /// Every competitor appears exactly once in each index, and their tree
    /// key matches their current win count.
    #[cfg(test)]
    fn check_sync(&self) {
        assert_eq!(self.competitors.len(), self.by_name.len());
        assert_eq!(self.competitors.len(), self.by_wins.len());

        for (name, &id) in self.by_name.iter() {
            assert_eq!(Some(name.as_str()), self.competitors.get(id).map(Competitor::name));
            assert_eq!(Some(&id), self.by_wins.get(&self.key_of(id)));
        }
    }
}
