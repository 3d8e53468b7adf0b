use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;

use crate::cards::Card;
use crate::indexer::HandIndexer;

/// A card as rank plus suit symbol, colored by suit.
pub fn colored_card(card: Card) -> String {
    let text = format!("{}{}", card.rank_char(), card.suit_symbol());
    match card.suit() {
        0 => text.white().to_string(),
        1 => text.red().to_string(),
        2 => text.blue().to_string(),
        _ => text.green().to_string(),
    }
}

pub fn hand_display(cards: &[Card]) -> String {
    cards.iter().map(|&c| colored_card(c)).join(" ")
}

/// Compact machine-friendly notation: "AhKs".
pub fn hand_notation(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).join("")
}

/// A hand split at round boundaries: "AhKs | Td9c2s | 4d".
pub fn hand_by_rounds(indexer: &HandIndexer, cards: &[Card]) -> String {
    let mut parts = Vec::new();
    let mut start = 0;
    for &n in indexer.cards_per_round() {
        if start >= cards.len() {
            break;
        }
        let end = (start + n).min(cards.len());
        parts.push(hand_display(&cards[start..end]));
        start = end;
    }
    parts.join(&format!(" {} ", "|".dimmed()))
}

/// Per-round summary of an indexer's tables.
pub fn round_size_table(indexer: &HandIndexer) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Round"),
        Cell::new("Cards").set_alignment(CellAlignment::Right),
        Cell::new("Configurations").set_alignment(CellAlignment::Right),
        Cell::new("Permutations").set_alignment(CellAlignment::Right),
        Cell::new("Size").set_alignment(CellAlignment::Right),
    ]);
    for round in 0..indexer.num_rounds() {
        table.add_row(vec![
            Cell::new(round),
            Cell::new(indexer.cards_per_round()[round]).set_alignment(CellAlignment::Right),
            Cell::new(indexer.num_configurations(round)).set_alignment(CellAlignment::Right),
            Cell::new(indexer.num_permutations(round)).set_alignment(CellAlignment::Right),
            Cell::new(indexer.size(round)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_hand;
    use crate::deck::Deck;

    #[test]
    fn test_hand_notation_roundtrips() {
        let cards = parse_hand("AhKs2d").unwrap();
        assert_eq!(hand_notation(&cards), "AhKs2d");
    }

    #[test]
    fn test_round_size_table_rows() {
        let indexer = HandIndexer::from_deck(&Deck::leduc()).unwrap();
        let table = round_size_table(&indexer);
        assert_eq!(table.row_iter().count(), 2);
    }
}
