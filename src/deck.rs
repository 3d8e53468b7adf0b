//! Game deck descriptor: how many ranks and suits the deck holds, how many
//! private cards each player is dealt, and how many board cards are revealed
//! on each round. This is pure bookkeeping; the indexing machinery lives in
//! the `indexer` module.

use serde::{Deserialize, Serialize};

use crate::cards::{MAX_RANKS, MAX_ROUNDS, MAX_SUITS};
use crate::error::{IsoError, IsoResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeckSpec")]
pub struct Deck {
    num_ranks: usize,
    num_suits: usize,
    private_cards: Vec<usize>,
    board_cards: Vec<usize>,
}

/// The raw shape a deck deserializes from; `Deck::new` validates it.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckSpec {
    num_ranks: usize,
    num_suits: usize,
    private_cards: Vec<usize>,
    board_cards: Vec<usize>,
}

impl TryFrom<DeckSpec> for Deck {
    type Error = IsoError;

    fn try_from(spec: DeckSpec) -> IsoResult<Deck> {
        Deck::new(
            spec.num_ranks,
            spec.num_suits,
            spec.private_cards,
            spec.board_cards,
        )
    }
}

impl Deck {
    pub fn new(
        num_ranks: usize,
        num_suits: usize,
        private_cards: Vec<usize>,
        board_cards: Vec<usize>,
    ) -> IsoResult<Deck> {
        if num_ranks == 0 || num_ranks > MAX_RANKS {
            return Err(IsoError::BadRankCount {
                got: num_ranks,
                max: MAX_RANKS,
            });
        }
        if num_suits == 0 || num_suits > MAX_SUITS {
            return Err(IsoError::BadSuitCount {
                got: num_suits,
                max: MAX_SUITS,
            });
        }
        if board_cards.is_empty() || board_cards.len() > MAX_ROUNDS {
            return Err(IsoError::BadRoundCount {
                got: board_cards.len(),
                max: MAX_ROUNDS,
            });
        }
        let dealt = private_cards.iter().sum::<usize>() + board_cards.iter().sum::<usize>();
        if dealt > num_ranks * num_suits {
            return Err(IsoError::TooManyCards {
                dealt,
                held: num_ranks * num_suits,
            });
        }

        Ok(Deck {
            num_ranks,
            num_suits,
            private_cards,
            board_cards,
        })
    }

    /// Two-player Kuhn poker: three ranks, one suit, one private card each.
    pub fn kuhn() -> Deck {
        Deck::new(3, 1, vec![1, 1], vec![0]).unwrap()
    }

    /// Two-player Leduc hold'em: a six-card deck, one private card each and
    /// one board card on the second round.
    pub fn leduc() -> Deck {
        Deck::new(3, 2, vec![1, 1], vec![0, 1]).unwrap()
    }

    /// Heads-up Texas hold'em: 52 cards, two private cards each, board rounds
    /// of 3, 1 and 1.
    pub fn holdem() -> Deck {
        Deck::new(13, 4, vec![2, 2], vec![0, 3, 1, 1]).unwrap()
    }

    pub fn num_ranks(&self) -> usize {
        self.num_ranks
    }

    pub fn num_suits(&self) -> usize {
        self.num_suits
    }

    /// Total cards in the deck.
    pub fn size(&self) -> usize {
        self.num_ranks * self.num_suits
    }

    pub fn num_rounds(&self) -> usize {
        self.board_cards.len()
    }

    pub fn num_players(&self) -> usize {
        self.private_cards.len()
    }

    pub fn private_cards(&self) -> &[usize] {
        &self.private_cards
    }

    pub fn private_cards_dealt(&self) -> usize {
        self.private_cards.iter().sum()
    }

    /// Board cards revealed on round `round` alone.
    pub fn board_cards_on_round(&self, round: usize) -> usize {
        self.board_cards[round]
    }

    /// Board cards revealed up to and including round `round`.
    pub fn board_cards_by_round(&self, round: usize) -> usize {
        self.board_cards[..=round].iter().sum()
    }

    /// The per-round card counts one player observes: their private cards on
    /// round 0 (plus any round-0 board cards), board cards afterwards. This
    /// is the schedule a `HandIndexer` is built from.
    pub fn deal_schedule(&self, player: usize) -> IsoResult<Vec<usize>> {
        let private = *self
            .private_cards
            .get(player)
            .ok_or(IsoError::NoSuchPlayer {
                player,
                players: self.private_cards.len(),
            })?;
        let mut schedule = self.board_cards.clone();
        schedule[0] += private;
        Ok(schedule)
    }
}

impl Default for Deck {
    fn default() -> Deck {
        Deck::holdem()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_ranks() {
        assert!(Deck::new(0, 4, vec![2], vec![0]).is_err());
    }

    #[test]
    fn test_rejects_wide_deck() {
        assert!(Deck::new(14, 4, vec![2], vec![0]).is_err());
        assert!(Deck::new(13, 5, vec![2], vec![0]).is_err());
    }

    #[test]
    fn test_rejects_overdealt_deck() {
        // 3x1 deck holds 3 cards; dealing 4 is impossible.
        assert!(Deck::new(3, 1, vec![2, 2], vec![0]).is_err());
    }

    #[test]
    fn test_rejects_no_rounds() {
        assert!(Deck::new(13, 4, vec![2], vec![]).is_err());
    }

    #[test]
    fn test_deal_schedule() {
        let deck = Deck::holdem();
        assert_eq!(deck.deal_schedule(0).unwrap(), vec![2, 3, 1, 1]);
        assert!(deck.deal_schedule(2).is_err());

        let leduc = Deck::leduc();
        assert_eq!(leduc.deal_schedule(1).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_json_roundtrip() {
        let deck = Deck::leduc();
        let json = serde_json::to_string(&deck).unwrap();
        let back: Deck = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deck);
    }

    #[test]
    fn test_json_rejects_invalid_spec() {
        let json = r#"{"num_ranks":0,"num_suits":2,"private_cards":[1],"board_cards":[0]}"#;
        assert!(serde_json::from_str::<Deck>(json).is_err());
    }
}
