//! The hand indexer: per-round lookup tables plus the index/unindex drivers.
//!
//! Construction enumerates suit configurations and suit-count permutations
//! once and freezes the results into flat per-round arrays. After that every
//! query is table lookups and integer arithmetic; an indexer is immutable
//! and freely shared across threads. Incremental indexing carries its
//! mutable accumulators in a caller-owned [`IndexerState`].

use once_cell::sync::Lazy;

use crate::cards::{Card, MAX_RANKS, MAX_ROUNDS, MAX_SUITS};
use crate::configurations::{build_configuration_tables, cards_on_round, ConfigurationTable};
use crate::deck::Deck;
use crate::error::{IsoError, IsoResult};
use crate::permutations::{
    build_permutation_tables, decode_permutation, permutation_space_bound, PermutationTable,
    MAX_PERMUTATION_ENTRIES,
};
use crate::ranksets::{
    binom, colex_rank, colex_unrank_unchecked, cwr_rank, cwr_unrank, multichoose, spread_rankset,
};

pub struct HandIndexer {
    num_ranks: usize,
    num_suits: usize,
    cards_per_round: Vec<usize>,
    /// cumulative card counts; `round_start[r]` is where round `r`'s cards
    /// begin in a concatenated hand, `round_start[rounds]` the hand length
    round_start: Vec<usize>,
    configurations: Vec<ConfigurationTable>,
    permutations: Vec<PermutationTable>,
    /// decoded suit orderings, indexed by the factorial-system `pi` code
    suit_permutations: Vec<[u8; MAX_SUITS]>,
}

/// Accumulators for indexing a hand one round at a time. Confine each state
/// to one thread; distinct states are independent.
#[derive(Debug, Clone)]
pub struct IndexerState {
    suit_index: [u64; MAX_SUITS],
    suit_multiplier: [u64; MAX_SUITS],
    used_ranks: [u32; MAX_SUITS],
    permutation_index: u64,
    permutation_multiplier: u64,
    round: usize,
}

impl IndexerState {
    fn new() -> IndexerState {
        IndexerState {
            suit_index: [0; MAX_SUITS],
            suit_multiplier: [1; MAX_SUITS],
            used_ranks: [0; MAX_SUITS],
            permutation_index: 0,
            permutation_multiplier: 1,
            round: 0,
        }
    }

    /// Rounds folded in so far.
    pub fn round(&self) -> usize {
        self.round
    }
}

impl HandIndexer {
    /// Build the lookup tables for a game dealing `cards_per_round` cards
    /// per round out of a `num_ranks` x `num_suits` deck. This is the
    /// expensive step; queries afterwards are cheap.
    pub fn new(
        num_ranks: usize,
        num_suits: usize,
        cards_per_round: &[usize],
    ) -> IsoResult<HandIndexer> {
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
        if cards_per_round.is_empty() || cards_per_round.len() > MAX_ROUNDS {
            return Err(IsoError::BadRoundCount {
                got: cards_per_round.len(),
                max: MAX_ROUNDS,
            });
        }
        let dealt: usize = cards_per_round.iter().sum();
        if dealt > num_ranks * num_suits {
            return Err(IsoError::TooManyCards {
                dealt,
                held: num_ranks * num_suits,
            });
        }
        let bound = permutation_space_bound(num_suits, cards_per_round);
        if bound > MAX_PERMUTATION_ENTRIES {
            return Err(IsoError::TablesTooLarge {
                round: cards_per_round.len() - 1,
                entries: u64::try_from(bound).unwrap_or(u64::MAX),
            });
        }

        let mut round_start = Vec::with_capacity(cards_per_round.len() + 1);
        round_start.push(0);
        for &n in cards_per_round {
            round_start.push(round_start.last().unwrap() + n);
        }

        let configurations = build_configuration_tables(num_ranks, num_suits, cards_per_round);
        let permutations =
            build_permutation_tables(num_ranks, num_suits, cards_per_round, &configurations);

        let factorial: u32 = (1..=num_suits as u32).product();
        let suit_permutations = (0..factorial)
            .map(|index| decode_permutation(index, num_suits))
            .collect();

        Ok(HandIndexer {
            num_ranks,
            num_suits,
            cards_per_round: cards_per_round.to_vec(),
            round_start,
            configurations,
            permutations,
            suit_permutations,
        })
    }

    /// Tables for the hand player 0 of `deck` observes.
    pub fn from_deck(deck: &Deck) -> IsoResult<HandIndexer> {
        HandIndexer::for_player(deck, 0)
    }

    /// Tables for the hand `player` observes: their private cards on round
    /// 0, board cards afterwards.
    pub fn for_player(deck: &Deck, player: usize) -> IsoResult<HandIndexer> {
        let schedule = deck.deal_schedule(player)?;
        HandIndexer::new(deck.num_ranks(), deck.num_suits(), &schedule)
    }

    pub fn num_ranks(&self) -> usize {
        self.num_ranks
    }

    pub fn num_suits(&self) -> usize {
        self.num_suits
    }

    pub fn num_rounds(&self) -> usize {
        self.cards_per_round.len()
    }

    pub fn cards_per_round(&self) -> &[usize] {
        &self.cards_per_round
    }

    /// Cards dealt through round `round` inclusive.
    pub fn cards_through_round(&self, round: usize) -> usize {
        self.round_start[round + 1]
    }

    /// Cards in a complete hand.
    pub fn total_cards(&self) -> usize {
        *self.round_start.last().unwrap()
    }

    /// Number of suit-isomorphism classes at `round`.
    pub fn size(&self, round: usize) -> u64 {
        self.configurations[round].round_size()
    }

    /// Number of canonical configurations at `round`.
    pub fn num_configurations(&self, round: usize) -> usize {
        self.configurations[round].len()
    }

    /// Hash slots in `round`'s permutation table.
    pub fn num_permutations(&self, round: usize) -> usize {
        self.permutations[round].len()
    }

    /// Fresh accumulators for indexing a hand incrementally.
    pub fn state(&self) -> IndexerState {
        IndexerState::new()
    }

    /// Checked validation of untrusted input: every card must belong to
    /// this game's deck and appear at most once. The indexing paths only
    /// `debug_assert` this contract; call this first when the cards come
    /// from outside.
    pub fn check_cards(&self, cards: &[Card]) -> IsoResult<()> {
        let mut seen = [0u32; MAX_SUITS];
        for &card in cards {
            let suit = card.suit() as usize;
            let rank = card.rank() as usize;
            if suit >= self.num_suits || rank >= self.num_ranks {
                return Err(IsoError::ForeignCard {
                    card: card.to_string(),
                    ranks: self.num_ranks,
                    suits: self.num_suits,
                });
            }
            if seen[suit] & 1 << rank != 0 {
                return Err(IsoError::DuplicateCard(card.to_string()));
            }
            seen[suit] |= 1 << rank;
        }
        Ok(())
    }

    /// Fold in the next round's cards and return the hand's index at that
    /// round. Fails once every round has been folded.
    pub fn index_next_round(&self, cards: &[Card], state: &mut IndexerState) -> IsoResult<u64> {
        let rounds = self.num_rounds();
        if state.round >= rounds {
            return Err(IsoError::HandComplete { rounds });
        }
        let need = self.cards_per_round[state.round];
        if cards.len() != need {
            return Err(IsoError::WrongCardCount {
                need,
                got: cards.len(),
            });
        }
        Ok(self.fold_round(cards, state))
    }

    /// Index a complete hand on every round; `indices[r]` receives round
    /// `r`'s index and the last round's index is returned. No more expensive
    /// than indexing the last round alone.
    pub fn index_all(&self, cards: &[Card], indices: &mut [u64]) -> IsoResult<u64> {
        let rounds = self.num_rounds();
        if cards.len() != self.total_cards() {
            return Err(IsoError::WrongCardCount {
                need: self.total_cards(),
                got: cards.len(),
            });
        }
        assert!(indices.len() >= rounds);

        let mut state = self.state();
        for round in 0..rounds {
            let start = self.round_start[round];
            indices[round] = self.fold_round(&cards[start..start + self.cards_per_round[round]], &mut state);
        }
        Ok(indices[rounds - 1])
    }

    /// Index a complete hand on its last round.
    pub fn index_last(&self, cards: &[Card]) -> IsoResult<u64> {
        let mut indices = [0u64; MAX_ROUNDS];
        self.index_all(cards, &mut indices)
    }

    /// Index a prefix of a hand covering whole rounds; returns one index per
    /// covered round. Useful when later streets have not been dealt yet.
    pub fn index_rounds(&self, cards: &[Card]) -> IsoResult<Vec<u64>> {
        let rounds = self.num_rounds();
        let mut state = self.state();
        let mut indices = Vec::new();
        let mut start = 0;
        while state.round < rounds {
            let n = self.cards_per_round[state.round];
            if start + n > cards.len() {
                break;
            }
            indices.push(self.fold_round(&cards[start..start + n], &mut state));
            start += n;
        }
        if start != cards.len() {
            let need = if state.round < rounds {
                self.round_start[state.round + 1]
            } else {
                self.total_cards()
            };
            return Err(IsoError::WrongCardCount {
                need,
                got: cards.len(),
            });
        }
        Ok(indices)
    }

    /// The round-folding core. `cards` must hold exactly this round's cards;
    /// duplicate or out-of-range cards are a contract violation checked only
    /// in debug builds.
    fn fold_round(&self, cards: &[Card], state: &mut IndexerState) -> u64 {
        let round = state.round;
        let rounds = self.num_rounds();
        let num_suits = self.num_suits;

        // Split this round's cards into per-suit ranksets. The shifted set
        // renumbers each rank relative to the ranks this suit has not used
        // yet, which is the universe its colex subrank lives in.
        let mut ranks = [0u32; MAX_SUITS];
        let mut shifted = [0u32; MAX_SUITS];
        for &card in cards {
            let suit = card.suit() as usize;
            let rank = card.rank() as u32;
            debug_assert!(suit < num_suits && (rank as usize) < self.num_ranks);
            let bit = 1u32 << rank;
            debug_assert_eq!(
                (state.used_ranks[suit] | ranks[suit]) & bit,
                0,
                "duplicate card"
            );
            ranks[suit] |= bit;
            shifted[suit] |= bit >> ((bit - 1) & state.used_ranks[suit]).count_ones();
        }

        for suit in 0..num_suits {
            let used = state.used_ranks[suit].count_ones() as usize;
            let dealt = ranks[suit].count_ones() as usize;
            state.suit_index[suit] += state.suit_multiplier[suit] * colex_rank(shifted[suit]);
            state.suit_multiplier[suit] *= binom(self.num_ranks - used, dealt);
            state.used_ranks[suit] |= ranks[suit];
        }

        // Extend the permutation hash with this round's count digits.
        let mut remaining = self.cards_per_round[round] as u64;
        for suit in 0..num_suits - 1 {
            let dealt = ranks[suit].count_ones() as u64;
            state.permutation_index += state.permutation_multiplier * dealt;
            state.permutation_multiplier *= remaining + 1;
            remaining -= dealt;
        }
        state.round += 1;

        let permutation = &self.permutations[round];
        let configuration = permutation.configuration(state.permutation_index);
        let pi = &self.suit_permutations[permutation.pi(state.permutation_index) as usize];

        let table = &self.configurations[round];
        let equal = table.equal_of(configuration);
        let suit_sizes = table.suit_sizes_of(configuration);

        // Compose per-suit subranks in canonical order, mixed radix over the
        // suit sizes; equal groups collapse to a multiset rank.
        let mut index = table.offset_of(configuration);
        let mut multiplier = 1u64;
        let mut i = 0;
        while i < num_suits {
            let mut j = i + 1;
            while j < num_suits && equal & 1 << j != 0 {
                j += 1;
            }
            let group = j - i;
            let mut keys = [0u64; MAX_SUITS];
            for (slot, canonical_slot) in (i..j).enumerate() {
                keys[slot] = state.suit_index[pi[canonical_slot] as usize];
            }
            keys[..group].sort_unstable_by(|a, b| b.cmp(a));
            index += multiplier * cwr_rank(&keys[..group]);
            multiplier *= multichoose(suit_sizes[i] as u64, group);
            i = j;
        }
        index
    }

    /// Recover the canonical hand behind `index` at `round`. The cards come
    /// back grouped by round, each round's cards ordered by suit then rank.
    pub fn unindex(&self, round: usize, index: u64) -> IsoResult<Vec<Card>> {
        let rounds = self.num_rounds();
        if round >= rounds {
            return Err(IsoError::RoundOutOfRange { round, rounds });
        }
        let table = &self.configurations[round];
        if index >= table.round_size() {
            return Err(IsoError::IndexOutOfRange {
                round,
                index,
                size: table.round_size(),
            });
        }

        let configuration = table.block_containing(index);
        let mut remainder = index - table.offset_of(configuration);
        let equal = table.equal_of(configuration);
        let suit_sizes = table.suit_sizes_of(configuration);
        let counts = table.counts_of(configuration);
        let num_suits = self.num_suits;

        // Peel the mixed radix back into per-suit subranks; an equal group
        // unranks as a multiset, largest subrank to the lowest suit.
        let mut suit_index = [0u64; MAX_SUITS];
        let mut i = 0;
        while i < num_suits {
            let mut j = i + 1;
            while j < num_suits && equal & 1 << j != 0 {
                j += 1;
            }
            let group = j - i;
            let group_size = multichoose(suit_sizes[i] as u64, group);
            let group_index = remainder % group_size;
            remainder /= group_size;
            cwr_unrank(group_index, suit_sizes[i] as u64, &mut suit_index[i..j]);
            i = j;
        }

        // Decompose each suit's subrank through the rounds, low digit first,
        // expanding shifted ranksets back to absolute ranks.
        let mut cards = vec![Card::new(0, 0); self.round_start[round + 1]];
        let mut location = [0usize; MAX_ROUNDS];
        location[..=round].copy_from_slice(&self.round_start[..=round]);

        for suit in 0..num_suits {
            let packed = counts[suit];
            let mut used = 0u32;
            let mut dealt = 0usize;
            let mut sub = suit_index[suit];
            for r in 0..=round {
                let n = cards_on_round(packed, r, rounds) as usize;
                let round_size = binom(self.num_ranks - dealt, n);
                let round_index = sub % round_size;
                sub /= round_size;

                let shifted = colex_unrank_unchecked(round_index, n, self.num_ranks - dealt);
                dealt += n;
                let rank_set = spread_rankset(shifted, used);
                let mut bits = rank_set;
                while bits != 0 {
                    let rank = bits.trailing_zeros();
                    bits &= bits - 1;
                    cards[location[r]] = Card::new(suit as u8, rank as u8);
                    location[r] += 1;
                }
                used |= rank_set;
            }
        }
        Ok(cards)
    }
}

static HOLDEM: Lazy<HandIndexer> = Lazy::new(|| {
    HandIndexer::from_deck(&Deck::holdem()).expect("hold'em tables failed to build")
});

/// The process-wide Texas hold'em indexer, built on first use.
pub fn holdem_indexer() -> &'static HandIndexer {
    &HOLDEM
}
