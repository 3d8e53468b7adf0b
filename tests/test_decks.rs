use hand_iso::Deck;

#[test]
fn test_kuhn_deck_properties() {
    let deck = Deck::kuhn();
    assert_eq!(deck.num_ranks(), 3);
    assert_eq!(deck.num_suits(), 1);
    assert_eq!(deck.size(), 3);
    assert_eq!(deck.private_cards(), &[1, 1]);
    assert_eq!(deck.private_cards_dealt(), 2);
    assert_eq!(deck.board_cards_on_round(0), 0);
    assert_eq!(deck.board_cards_by_round(0), 0);
    assert_eq!(deck.num_rounds(), 1);
    assert_eq!(deck.num_players(), 2);
}

#[test]
fn test_leduc_deck_properties() {
    let deck = Deck::leduc();
    assert_eq!(deck.num_ranks(), 3);
    assert_eq!(deck.num_suits(), 2);
    assert_eq!(deck.size(), 6);
    assert_eq!(deck.private_cards(), &[1, 1]);
    assert_eq!(deck.private_cards_dealt(), 2);
    assert_eq!(deck.board_cards_on_round(0), 0);
    assert_eq!(deck.board_cards_on_round(1), 1);
    assert_eq!(deck.board_cards_by_round(0), 0);
    assert_eq!(deck.board_cards_by_round(1), 1);
    assert_eq!(deck.num_rounds(), 2);
}

#[test]
fn test_holdem_deck_properties() {
    let deck = Deck::holdem();
    assert_eq!(deck.num_ranks(), 13);
    assert_eq!(deck.num_suits(), 4);
    assert_eq!(deck.size(), 52);
    assert_eq!(deck.private_cards(), &[2, 2]);
    assert_eq!(deck.private_cards_dealt(), 4);
    assert_eq!(deck.board_cards_on_round(0), 0);
    assert_eq!(deck.board_cards_on_round(1), 3);
    assert_eq!(deck.board_cards_on_round(2), 1);
    assert_eq!(deck.board_cards_on_round(3), 1);
    assert_eq!(deck.board_cards_by_round(3), 5);
    assert_eq!(deck.num_rounds(), 4);
}

#[test]
fn test_deal_schedules() {
    assert_eq!(Deck::kuhn().deal_schedule(0).unwrap(), vec![1]);
    assert_eq!(Deck::leduc().deal_schedule(0).unwrap(), vec![1, 1]);
    assert_eq!(Deck::holdem().deal_schedule(1).unwrap(), vec![2, 3, 1, 1]);
}
