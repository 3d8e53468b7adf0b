//! Raw suit-count permutations.
//!
//! Where the configuration enumerator walks only canonical count vectors,
//! this one walks every ordered assignment of per-round card counts to
//! physical suits. Each assignment hashes to a slot in a per-round table
//! that records which canonical configuration it collapses to and which
//! suit reordering (`pi`) gets it there, so a query never has to sort and
//! search at runtime.

use crate::cards::MAX_SUITS;
use crate::configurations::{cards_on_round, ConfigurationTable, ROUND_SHIFT};
use crate::ranksets::nth_clear_bit;

/// Hard ceiling on a round's hash-table slots; construction fails beyond it.
pub(crate) const MAX_PERMUTATION_ENTRIES: u128 = 1 << 26;

/// Upper bound on the permutation hash space of the last round: the product
/// over rounds of `(cards_on_round + 1)^(num_suits - 1)`.
pub(crate) fn permutation_space_bound(num_suits: usize, cards_per_round: &[usize]) -> u128 {
    let mut bound: u128 = 1;
    for &n in cards_per_round {
        bound *= ((n + 1) as u128).pow(num_suits as u32 - 1);
    }
    bound
}

/// Walk every ordered per-suit count assignment, calling
/// `observe(round, packed)` once per round prefix.
pub(crate) fn enumerate_permutations<F>(
    num_ranks: usize,
    num_suits: usize,
    cards_per_round: &[usize],
    mut observe: F,
) where
    F: FnMut(usize, &[u32; MAX_SUITS]),
{
    let mut used = [0u32; MAX_SUITS];
    let mut count = [0u32; MAX_SUITS];
    enumerate_r(
        num_ranks as u32,
        num_suits,
        cards_per_round,
        0,
        cards_per_round[0] as u32,
        0,
        &mut used,
        &mut count,
        &mut observe,
    );
}

#[allow(clippy::too_many_arguments)]
fn enumerate_r<F>(
    num_ranks: u32,
    num_suits: usize,
    cards_per_round: &[usize],
    round: usize,
    remaining: u32,
    suit: usize,
    used: &mut [u32; MAX_SUITS],
    count: &mut [u32; MAX_SUITS],
    observe: &mut F,
) where
    F: FnMut(usize, &[u32; MAX_SUITS]),
{
    let rounds = cards_per_round.len();
    if suit == num_suits {
        observe(round, count);
        if round + 1 < rounds {
            enumerate_r(
                num_ranks,
                num_suits,
                cards_per_round,
                round + 1,
                cards_per_round[round + 1] as u32,
                0,
                used,
                count,
                observe,
            );
        }
        return;
    }

    let min = if suit == num_suits - 1 { remaining } else { 0 };
    let mut max = num_ranks - used[suit];
    if remaining < max {
        max = remaining;
    }

    let shift = ROUND_SHIFT * (rounds - round - 1) as u32;
    let old_count = count[suit];
    let old_used = used[suit];
    let mut n = min;
    while n <= max {
        count[suit] = old_count | n << shift;
        used[suit] = old_used + n;
        enumerate_r(
            num_ranks,
            num_suits,
            cards_per_round,
            round,
            remaining - n,
            suit + 1,
            used,
            count,
            observe,
        );
        n += 1;
    }
    count[suit] = old_count;
    used[suit] = old_used;
}

/// Perfect hash of a count assignment through `round`. Digits are the first
/// `num_suits - 1` per-suit counts of each round (the last suit's count is
/// implied), each with radix `remaining + 1`; the multiplier carries across
/// rounds. The incremental indexer reproduces this hash one round at a time.
pub(crate) fn hash_assignment(
    count: &[u32; MAX_SUITS],
    round: usize,
    rounds: usize,
    cards_per_round: &[usize],
    num_suits: usize,
) -> u64 {
    let mut hash = 0u64;
    let mut mult = 1u64;
    for r in 0..=round {
        let mut remaining = cards_per_round[r] as u64;
        for suit in 0..num_suits - 1 {
            let size = cards_on_round(count[suit], r, rounds) as u64;
            hash += mult * size;
            mult *= remaining + 1;
            remaining -= size;
        }
    }
    hash
}

/// Stable sort of the suits by packed count, descending: the canonical
/// reordering. Ties keep physical suit order.
pub(crate) fn sort_suits(count: &[u32; MAX_SUITS], num_suits: usize) -> [u8; MAX_SUITS] {
    let mut pi = [0u8; MAX_SUITS];
    for (i, slot) in pi.iter_mut().enumerate() {
        *slot = i as u8;
    }
    for i in 1..num_suits {
        let pi_i = pi[i];
        let mut j = i;
        while j > 0 && count[pi_i as usize] > count[pi[j - 1] as usize] {
            pi[j] = pi[j - 1];
            j -= 1;
        }
        pi[j] = pi_i;
    }
    pi
}

/// Factorial-number-system encoding of a suit ordering: digit `j` is the
/// rank of `pi[j]` among the suits not yet placed.
pub(crate) fn encode_permutation(pi: &[u8; MAX_SUITS], num_suits: usize) -> u32 {
    let mut index = 0u32;
    let mut mult = 1u32;
    let mut used = 0u32;
    for j in 0..num_suits {
        let bit = 1u32 << pi[j];
        let smaller = ((bit - 1) & used).count_ones();
        index += (pi[j] as u32 - smaller) * mult;
        mult *= (num_suits - j) as u32;
        used |= bit;
    }
    index
}

pub(crate) fn decode_permutation(mut index: u32, num_suits: usize) -> [u8; MAX_SUITS] {
    let mut pi = [0u8; MAX_SUITS];
    let mut used = 0u32;
    for (j, slot) in pi.iter_mut().enumerate().take(num_suits) {
        let digit = index % (num_suits - j) as u32;
        index /= (num_suits - j) as u32;
        let suit = nth_clear_bit(used, digit);
        *slot = suit as u8;
        used |= 1 << suit;
    }
    pi
}

/// Per-round lookup from a count-assignment hash to its canonical
/// configuration and reordering.
pub(crate) struct PermutationTable {
    to_configuration: Vec<u32>,
    to_pi: Vec<u32>,
}

impl PermutationTable {
    pub fn len(&self) -> usize {
        self.to_configuration.len()
    }

    pub fn configuration(&self, hash: u64) -> usize {
        self.to_configuration[hash as usize] as usize
    }

    pub fn pi(&self, hash: u64) -> u32 {
        self.to_pi[hash as usize]
    }
}

/// Two passes, like the configuration tables: size each round's hash space,
/// then fill in the canonical configuration and `pi` for every assignment.
pub(crate) fn build_permutation_tables(
    num_ranks: usize,
    num_suits: usize,
    cards_per_round: &[usize],
    configurations: &[ConfigurationTable],
) -> Vec<PermutationTable> {
    let rounds = cards_per_round.len();

    let mut sizes = vec![0u64; rounds];
    enumerate_permutations(num_ranks, num_suits, cards_per_round, |round, count| {
        let hash = hash_assignment(count, round, rounds, cards_per_round, num_suits);
        if hash + 1 > sizes[round] {
            sizes[round] = hash + 1;
        }
    });

    let mut tables: Vec<PermutationTable> = sizes
        .iter()
        .map(|&n| PermutationTable {
            to_configuration: vec![0; n as usize],
            to_pi: vec![0; n as usize],
        })
        .collect();

    enumerate_permutations(num_ranks, num_suits, cards_per_round, |round, count| {
        let hash = hash_assignment(count, round, rounds, cards_per_round, num_suits);
        let pi = sort_suits(count, num_suits);
        let mut canonical = [0u32; MAX_SUITS];
        for (slot, &suit) in pi.iter().enumerate().take(num_suits) {
            canonical[slot] = count[suit as usize];
        }
        let configuration = configurations[round].position(&canonical[..num_suits]);
        tables[round].to_configuration[hash as usize] = configuration as u32;
        tables[round].to_pi[hash as usize] = encode_permutation(&pi, num_suits);
    });

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurations::build_configuration_tables;

    #[test]
    fn test_permutation_codec_roundtrip() {
        for num_suits in 1..=4usize {
            let total: u32 = (1..=num_suits as u32).product();
            let mut seen = std::collections::HashSet::new();
            for index in 0..total {
                let pi = decode_permutation(index, num_suits);
                assert_eq!(encode_permutation(&pi, num_suits), index);
                seen.insert(pi);
            }
            assert_eq!(seen.len(), total as usize);
        }
    }

    #[test]
    fn test_sort_suits_stable_descending() {
        let count = [0x10, 0x20, 0x20, 0x00];
        let pi = sort_suits(&count, 4);
        assert_eq!(pi, [1, 2, 0, 3]);
    }

    #[test]
    fn test_hash_assignment_injective() {
        let cards_per_round = [1usize, 1];
        let mut hashes: Vec<Vec<u64>> = vec![Vec::new(); 2];
        enumerate_permutations(3, 2, &cards_per_round, |round, count| {
            hashes[round].push(hash_assignment(count, round, 2, &cards_per_round, 2));
        });
        for round_hashes in &hashes {
            let mut sorted = round_hashes.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), round_hashes.len());
        }
    }

    #[test]
    fn test_tables_cover_all_assignments() {
        let cards_per_round = [2usize, 3, 1, 1];
        let configurations = build_configuration_tables(13, 4, &cards_per_round);
        let permutations = build_permutation_tables(13, 4, &cards_per_round, &configurations);
        assert_eq!(permutations.len(), 4);

        // every preflop assignment of 2 cards to 4 suits maps to one of the
        // two canonical configurations
        enumerate_permutations(13, 4, &cards_per_round[..1], |round, count| {
            let hash = hash_assignment(count, round, 1, &cards_per_round[..1], 4);
            assert!((hash as usize) < permutations[0].len());
            assert!(permutations[0].configuration(hash) < configurations[0].len());
            let pi = permutations[0].pi(hash);
            assert!(pi < 24);
        });
    }
}
