use proptest::prelude::*;

use hand_iso::cards::{full_deck, Card, MAX_ROUNDS};
use hand_iso::{holdem_indexer, Deck, HandIndexer};

fn permute_suits(cards: &[Card], permutation: &[u8]) -> Vec<Card> {
    cards
        .iter()
        .map(|c| Card::new(permutation[c.suit() as usize], c.rank()))
        .collect()
}

fn any_holdem_hand() -> impl Strategy<Value = Vec<Card>> {
    Just(full_deck(13, 4))
        .prop_shuffle()
        .prop_map(|deck| deck[..7].to_vec())
}

fn any_suit_permutation() -> impl Strategy<Value = Vec<u8>> {
    Just((0u8..4).collect::<Vec<u8>>()).prop_shuffle()
}

fn any_round_and_index() -> impl Strategy<Value = (usize, u64)> {
    (0usize..4).prop_flat_map(|round| {
        let size = holdem_indexer().size(round);
        (Just(round), 0..size)
    })
}

fn any_leduc_hand() -> impl Strategy<Value = Vec<Card>> {
    Just(full_deck(3, 2))
        .prop_shuffle()
        .prop_map(|deck| deck[..2].to_vec())
}

proptest! {
    #[test]
    fn prop_holdem_indices_suit_invariant(
        hand in any_holdem_hand(),
        permutation in any_suit_permutation(),
    ) {
        let indexer = holdem_indexer();
        let mut original = [0u64; MAX_ROUNDS];
        let mut relabeled = [0u64; MAX_ROUNDS];
        indexer.index_all(&hand, &mut original).unwrap();
        indexer
            .index_all(&permute_suits(&hand, &permutation), &mut relabeled)
            .unwrap();
        prop_assert_eq!(&original[..4], &relabeled[..4]);
    }

    #[test]
    fn prop_holdem_unindex_reindex_roundtrip((round, index) in any_round_and_index()) {
        let indexer = holdem_indexer();
        let cards = indexer.unindex(round, index).unwrap();
        prop_assert_eq!(cards.len(), indexer.cards_through_round(round));
        let indices = indexer.index_rounds(&cards).unwrap();
        prop_assert_eq!(indices[round], index);
    }

    #[test]
    fn prop_holdem_incremental_equivalence(hand in any_holdem_hand()) {
        let indexer = holdem_indexer();
        let mut indices = [0u64; MAX_ROUNDS];
        indexer.index_all(&hand, &mut indices).unwrap();

        let mut state = indexer.state();
        let mut start = 0;
        for round in 0..indexer.num_rounds() {
            let n = indexer.cards_per_round()[round];
            let step = indexer
                .index_next_round(&hand[start..start + n], &mut state)
                .unwrap();
            prop_assert_eq!(step, indices[round]);
            start += n;
        }
    }

    #[test]
    fn prop_leduc_index_within_size(hand in any_leduc_hand()) {
        let indexer = HandIndexer::from_deck(&Deck::leduc()).unwrap();
        let index = indexer.index_last(&hand).unwrap();
        prop_assert!(index < indexer.size(1));

        let swapped = permute_suits(&hand, &[1, 0]);
        prop_assert_eq!(indexer.index_last(&swapped).unwrap(), index);
    }
}
