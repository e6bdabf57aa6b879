#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Someone with a name and a record. The name never changes; the counters
/// only move when the owning scoreboard records a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competitor {
    name: String,
    wins: u32,
    draws: u32,
    losses: u32,
}

impl Competitor {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Total games recorded for this competitor.
    pub fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Wins over games played, or 0 before the first game.
    pub fn win_rate(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => f64::from(self.wins) / f64::from(games),
        }
    }

    /// Takes an owned snapshot of the record, suitable for handing to whatever
    /// renders standings.
    pub fn standing(&self) -> Standing {
        Standing {
            name: self.name.clone(),
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            win_rate: self.win_rate(),
        }
    }

    pub(crate) fn add_win(&mut self) {
        self.wins += 1;
    }

    pub(crate) fn add_draw(&mut self) {
        self.draws += 1;
    }

    pub(crate) fn add_loss(&mut self) {
        self.losses += 1;
    }
}

/// A competitor's record at one point in time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Standing {
    pub name: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub win_rate: f64,
}
