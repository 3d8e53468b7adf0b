use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rand::seq::SliceRandom;
use rand::thread_rng;
use rayon::prelude::*;

use hand_iso::cards::full_deck;
use hand_iso::display::{
    hand_by_rounds, hand_notation, print_error, round_size_table,
};
use hand_iso::{parse_hand, Deck, HandIndexer, IsoError, IsoResult};

#[derive(Parser)]
#[command(
    name = "handiso",
    version = "1.0.0",
    about = "Poker hand isomorphism indexer — round sizes, hand indices, canonical hands."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum Game {
    Holdem,
    Leduc,
    Kuhn,
}

#[derive(Args)]
struct GameOpts {
    /// Built-in game
    #[arg(long, value_enum, default_value = "holdem")]
    game: Game,

    /// JSON deck descriptor, overrides --game:
    /// '{"num_ranks":3,"num_suits":2,"private_cards":[1,1],"board_cards":[0,1]}'
    #[arg(long)]
    spec: Option<String>,
}

impl GameOpts {
    fn deck(&self) -> IsoResult<Deck> {
        match &self.spec {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(match self.game {
                Game::Holdem => Deck::holdem(),
                Game::Leduc => Deck::leduc(),
                Game::Kuhn => Deck::kuhn(),
            }),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-round table shapes and index space sizes
    Sizes {
        #[command(flatten)]
        opts: GameOpts,

        /// Emit machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Index a hand given as card notation covering whole rounds ("AhKs" or
    /// "AhKs Td9c2s")
    Index {
        cards: String,

        #[command(flatten)]
        opts: GameOpts,
    },

    /// Recover the canonical hand behind an index
    Unindex {
        round: usize,
        index: u64,

        #[command(flatten)]
        opts: GameOpts,
    },

    /// Deal random hands and show their per-round indices
    Sample {
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        #[command(flatten)]
        opts: GameOpts,
    },

    /// Exhaustively unindex and re-index a round, checking the roundtrip
    Verify {
        #[command(flatten)]
        opts: GameOpts,

        /// Check a single round instead of all rounds
        #[arg(long)]
        round: Option<usize>,

        /// Cap the number of indices checked per round
        #[arg(long)]
        limit: Option<u64>,
    },
}

pub fn run() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Sizes { opts, json } => cmd_sizes(&opts, json),
        Commands::Index { cards, opts } => cmd_index(&opts, &cards),
        Commands::Unindex {
            round,
            index,
            opts,
        } => cmd_unindex(&opts, round, index),
        Commands::Sample { count, opts } => cmd_sample(&opts, count),
        Commands::Verify { opts, round, limit } => cmd_verify(&opts, round, limit),
    };
    if let Err(err) = result {
        print_error(&err.to_string());
        std::process::exit(1);
    }
}

fn build_indexer(opts: &GameOpts) -> IsoResult<HandIndexer> {
    HandIndexer::from_deck(&opts.deck()?)
}

fn cmd_sizes(opts: &GameOpts, json: bool) -> IsoResult<()> {
    let deck = opts.deck()?;
    let indexer = HandIndexer::from_deck(&deck)?;

    if json {
        let rounds: Vec<serde_json::Value> = (0..indexer.num_rounds())
            .map(|round| {
                serde_json::json!({
                    "round": round,
                    "cards": indexer.cards_per_round()[round],
                    "configurations": indexer.num_configurations(round),
                    "permutations": indexer.num_permutations(round),
                    "size": indexer.size(round),
                })
            })
            .collect();
        let out = serde_json::json!({
            "num_ranks": indexer.num_ranks(),
            "num_suits": indexer.num_suits(),
            "rounds": rounds,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} ranks x {} suits, {} rounds",
        indexer.num_ranks(),
        indexer.num_suits(),
        indexer.num_rounds()
    );
    println!("{}", round_size_table(&indexer));
    Ok(())
}

fn cmd_index(opts: &GameOpts, notation: &str) -> IsoResult<()> {
    let indexer = build_indexer(opts)?;
    let cards = parse_hand(notation)?;
    indexer.check_cards(&cards)?;

    let indices = indexer.index_rounds(&cards)?;
    if indices.is_empty() {
        return Err(IsoError::WrongCardCount {
            need: indexer.cards_per_round()[0],
            got: cards.len(),
        });
    }
    println!("hand: {}", hand_by_rounds(&indexer, &cards));
    for (round, &index) in indices.iter().enumerate() {
        println!(
            "round {}: index {} {}",
            round,
            index.to_string().bold(),
            format!("(of {})", indexer.size(round)).dimmed()
        );
    }

    let last_round = indices.len() - 1;
    let canonical = indexer.unindex(last_round, indices[last_round])?;
    println!(
        "canonical: {} ({})",
        hand_by_rounds(&indexer, &canonical),
        hand_notation(&canonical)
    );
    Ok(())
}

fn cmd_unindex(opts: &GameOpts, round: usize, index: u64) -> IsoResult<()> {
    let indexer = build_indexer(opts)?;
    let cards = indexer.unindex(round, index)?;
    println!(
        "round {} index {}: {} ({})",
        round,
        index,
        hand_by_rounds(&indexer, &cards),
        hand_notation(&cards)
    );
    Ok(())
}

fn cmd_sample(opts: &GameOpts, count: usize) -> IsoResult<()> {
    let indexer = build_indexer(opts)?;
    let mut deck = full_deck(indexer.num_ranks(), indexer.num_suits());
    let mut rng = thread_rng();
    let mut indices = vec![0u64; indexer.num_rounds()];

    for _ in 0..count {
        deck.shuffle(&mut rng);
        let hand = &deck[..indexer.total_cards()];
        let last = indexer.index_all(hand, &mut indices)?;
        println!(
            "{}  ->  {}",
            hand_by_rounds(&indexer, hand),
            last.to_string().bold()
        );
    }
    Ok(())
}

fn cmd_verify(opts: &GameOpts, round: Option<usize>, limit: Option<u64>) -> IsoResult<()> {
    let indexer = build_indexer(opts)?;
    if let Some(r) = round {
        if r >= indexer.num_rounds() {
            return Err(IsoError::RoundOutOfRange {
                round: r,
                rounds: indexer.num_rounds(),
            });
        }
    }
    let rounds: Vec<usize> = match round {
        Some(r) => vec![r],
        None => (0..indexer.num_rounds()).collect(),
    };

    let mut failed = false;
    for round in rounds {
        let size = indexer.size(round);
        let checked = limit.map_or(size, |cap| cap.min(size));

        let failures = (0..checked)
            .into_par_iter()
            .filter(|&index| {
                let roundtrip = indexer
                    .unindex(round, index)
                    .and_then(|cards| indexer.index_rounds(&cards));
                match roundtrip {
                    Ok(indices) => indices.get(round) != Some(&index),
                    Err(_) => true,
                }
            })
            .count();

        let coverage = if checked == size {
            format!("all {} indices", size)
        } else {
            format!("first {} of {} indices", checked, size)
        };
        if failures == 0 {
            println!("round {}: {} roundtrip {}", round, coverage, "ok".green());
        } else {
            println!(
                "round {}: {} failed for {} indices",
                round,
                coverage,
                failures.to_string().red().bold()
            );
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
