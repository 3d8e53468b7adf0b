use thiserror::Error;

#[derive(Error, Debug)]
pub enum IsoError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("Deck needs between 1 and {max} ranks, got {got}")]
    BadRankCount { got: usize, max: usize },

    #[error("Deck needs between 1 and {max} suits, got {got}")]
    BadSuitCount { got: usize, max: usize },

    #[error("Deck needs between 1 and {max} rounds, got {got}")]
    BadRoundCount { got: usize, max: usize },

    #[error("Deck deals {dealt} cards but only holds {held}")]
    TooManyCards { dealt: usize, held: usize },

    #[error("No such player: {player} (deck has {players})")]
    NoSuchPlayer { player: usize, players: usize },

    #[error("Round {round} out of range (game has {rounds} rounds)")]
    RoundOutOfRange { round: usize, rounds: usize },

    #[error("Index {index} out of range for round {round} (size {size})")]
    IndexOutOfRange { round: usize, index: u64, size: u64 },

    #[error("Hand already complete: all {rounds} rounds have been indexed")]
    HandComplete { rounds: usize },

    #[error("Lookup tables too large: round {round} needs {entries} permutation entries")]
    TablesTooLarge { round: usize, entries: u64 },

    #[error("Card {card} does not belong to a {ranks}x{suits} deck")]
    ForeignCard {
        card: String,
        ranks: usize,
        suits: usize,
    },

    #[error("Duplicate card: {0}")]
    DuplicateCard(String),

    #[error("Expected {need} cards, got {got}")]
    WrongCardCount { need: usize, got: usize },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type IsoResult<T> = Result<T, IsoError>;
