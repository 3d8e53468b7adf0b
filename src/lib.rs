//! Map poker hands to a dense index shared by all suit-isomorphic hands,
//! and map an index back to a canonical hand.
//!
//! A [`HandIndexer`] is built once for a game (a deck of R ranks and S suits
//! plus a per-round deal schedule) and then answers three questions:
//!
//! - [`HandIndexer::index_all`] / [`HandIndexer::index_last`]: the index of
//!   a hand in `[0, size(round))`, identical for every suit relabeling;
//! - [`HandIndexer::unindex`]: the canonical representative hand behind an
//!   index;
//! - [`HandIndexer::index_next_round`]: the same, one round at a time, as
//!   cards are revealed.
//!
//! Queries on a built indexer are pure and lock-free; share the indexer
//! across threads freely. See [`holdem_indexer`] for a process-wide Texas
//! hold'em instance.

mod configurations;
mod permutations;

pub mod cards;
pub mod deck;
pub mod display;
pub mod error;
pub mod indexer;
pub mod ranksets;

pub use cards::{full_deck, parse_card, parse_hand, Card};
pub use deck::Deck;
pub use error::{IsoError, IsoResult};
pub use indexer::{holdem_indexer, HandIndexer, IndexerState};
