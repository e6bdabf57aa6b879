//! A small ranking engine. A [`Scoreboard`] tracks competitors and their
//! win/draw/loss records, and answers ordered questions about them ("who has
//! between 2 and 5 wins", "who has more wins than 3") as results come in.
//!
//! Underneath are two hand-rolled maps which can be used on their own:
//!
//! * [`OrderedMap`], an unbalanced binary search tree with pruned range and
//!   successor queries.
//! * [`ChainedHashMap`], a separately chained hash table which grows and
//!   shrinks as entries come and go.
//!
//! ```
//! use scoreboard::Scoreboard;
//!
//! let mut board = Scoreboard::new();
//! board.register_player("ada");
//! board.register_player("grace");
//!
//! board.add_game_result("ada", "grace", false);
//!
//! let leaders: Vec<_> = board.win_successor(0).into_iter().map(|c| c.name()).collect();
//! assert_eq!(vec!["ada"], leaders);
//! ```
//!
//! Nothing in here is thread safe, and nothing is persisted.

mod arena;
mod competitor;
mod hash_map;
#[cfg(test)]
mod identity_hasher;
mod ordered_map;
mod scoreboard;

pub use competitor::{Competitor, Standing};
pub use hash_map::{ChainedHashMap, ChainedHashMapIter, DeterministicState, INITIAL_CAPACITY};
pub use ordered_map::{OrderedMap, Range};
pub use scoreboard::{Scoreboard, ScoreboardError};
