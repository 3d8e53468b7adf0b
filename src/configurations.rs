//! Canonical suit-configuration enumeration.
//!
//! A configuration at round `r` records, per suit, how many cards that suit
//! received on every round up to `r`. The per-suit counts are nibble-packed
//! into a `u32` with earlier rounds in the higher nibbles, so comparing two
//! packed values compares their count sequences round by round. A
//! configuration is canonical when the packed per-suit values are
//! non-increasing; suits with identical packed values remain interchangeable
//! and form an equal group.

use std::cmp::Ordering;

use crate::cards::MAX_SUITS;
use crate::ranksets::{binom, multichoose};

pub(crate) const ROUND_SHIFT: u32 = 4;
pub(crate) const ROUND_MASK: u32 = 0xf;

/// Cards a suit received on `round` alone, out of its packed count value.
pub(crate) fn cards_on_round(packed: u32, round: usize, rounds: usize) -> u32 {
    packed >> (ROUND_SHIFT * (rounds - round - 1) as u32) & ROUND_MASK
}

/// Walk every canonical configuration, calling `observe(round, packed)` once
/// per round prefix. The `equal` bitmask tracks which suits are still
/// interchangeable with their predecessor; a suit marked equal may not
/// receive more cards than its predecessor did this round, which keeps the
/// enumeration canonical and duplicate-free.
pub(crate) fn enumerate_configurations<F>(
    num_ranks: usize,
    num_suits: usize,
    cards_per_round: &[usize],
    mut observe: F,
) where
    F: FnMut(usize, &[u32; MAX_SUITS]),
{
    let mut used = [0u32; MAX_SUITS];
    let mut configuration = [0u32; MAX_SUITS];
    let equal = ((1u32 << num_suits) - 1) & !1;
    enumerate_r(
        num_ranks as u32,
        num_suits,
        cards_per_round,
        0,
        cards_per_round[0] as u32,
        0,
        equal,
        &mut used,
        &mut configuration,
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
    equal: u32,
    used: &mut [u32; MAX_SUITS],
    configuration: &mut [u32; MAX_SUITS],
    observe: &mut F,
) where
    F: FnMut(usize, &[u32; MAX_SUITS]),
{
    let rounds = cards_per_round.len();
    if suit == num_suits {
        observe(round, configuration);
        if round + 1 < rounds {
            enumerate_r(
                num_ranks,
                num_suits,
                cards_per_round,
                round + 1,
                cards_per_round[round + 1] as u32,
                0,
                equal,
                used,
                configuration,
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
    let was_equal = equal & 1 << suit != 0;
    let mut previous = num_ranks + 1;
    if was_equal {
        previous = configuration[suit - 1] >> shift & ROUND_MASK;
        if previous < max {
            max = previous;
        }
    }

    let old_configuration = configuration[suit];
    let old_used = used[suit];
    let mut n = min;
    while n <= max {
        let new_equal = (equal & !(1 << suit)) | u32::from(was_equal && n == previous) << suit;
        configuration[suit] = old_configuration | n << shift;
        used[suit] = old_used + n;
        enumerate_r(
            num_ranks,
            num_suits,
            cards_per_round,
            round,
            remaining - n,
            suit + 1,
            new_equal,
            used,
            configuration,
            observe,
        );
        n += 1;
    }
    configuration[suit] = old_configuration;
    used[suit] = old_used;
}

/// One round's configurations, sorted by packed counts, stored as flat
/// stride-`num_suits` arrays.
pub(crate) struct ConfigurationTable {
    num_suits: usize,
    /// packed per-suit counts, `len() * num_suits`
    counts: Vec<u32>,
    /// distinct ranksets available to each suit, `len() * num_suits`
    suit_sizes: Vec<u32>,
    /// bit `j` set when suit `j` shares an equal group with suit `j - 1`
    equal: Vec<u32>,
    /// start of each configuration's block in the round's index space
    offsets: Vec<u64>,
    round_size: u64,
}

impl ConfigurationTable {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn round_size(&self) -> u64 {
        self.round_size
    }

    pub fn counts_of(&self, i: usize) -> &[u32] {
        &self.counts[i * self.num_suits..(i + 1) * self.num_suits]
    }

    pub fn suit_sizes_of(&self, i: usize) -> &[u32] {
        &self.suit_sizes[i * self.num_suits..(i + 1) * self.num_suits]
    }

    pub fn equal_of(&self, i: usize) -> u32 {
        self.equal[i]
    }

    pub fn offset_of(&self, i: usize) -> u64 {
        self.offsets[i]
    }

    /// Configuration whose block contains `index`: the greatest `i` with
    /// `offset_of(i) <= index`.
    pub fn block_containing(&self, index: u64) -> usize {
        self.offsets.partition_point(|&offset| offset <= index) - 1
    }

    /// Position of a canonical (non-increasing) packed count vector.
    pub fn position(&self, target: &[u32]) -> usize {
        let s = self.num_suits;
        let mut lo = 0;
        let mut hi = self.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            match self.counts[mid * s..mid * s + s].cmp(target) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return mid,
            }
        }
        debug_assert!(false, "canonical configuration not enumerated");
        lo
    }
}

struct Entry {
    counts: [u32; MAX_SUITS],
    suit_sizes: [u32; MAX_SUITS],
    equal: u32,
    size: u64,
}

/// Two passes over the enumeration: the first sizes each round's table, the
/// second tabulates suit sizes, equal groups and block sizes. Block sizes
/// land in the offset array and are prefix-summed in place afterwards.
pub(crate) fn build_configuration_tables(
    num_ranks: usize,
    num_suits: usize,
    cards_per_round: &[usize],
) -> Vec<ConfigurationTable> {
    let rounds = cards_per_round.len();

    let mut configurations = vec![0usize; rounds];
    enumerate_configurations(num_ranks, num_suits, cards_per_round, |round, _| {
        configurations[round] += 1;
    });

    let mut entries: Vec<Vec<Entry>> = configurations
        .iter()
        .map(|&n| Vec::with_capacity(n))
        .collect();
    enumerate_configurations(num_ranks, num_suits, cards_per_round, |round, packed| {
        entries[round].push(tabulate(num_ranks, num_suits, rounds, round, packed));
    });

    entries
        .into_iter()
        .map(|mut round_entries| {
            round_entries.sort_unstable_by(|a, b| a.counts.cmp(&b.counts));

            let n = round_entries.len();
            let mut counts = Vec::with_capacity(n * num_suits);
            let mut suit_sizes = Vec::with_capacity(n * num_suits);
            let mut equal = Vec::with_capacity(n);
            let mut offsets = Vec::with_capacity(n);
            for entry in &round_entries {
                counts.extend_from_slice(&entry.counts[..num_suits]);
                suit_sizes.extend_from_slice(&entry.suit_sizes[..num_suits]);
                equal.push(entry.equal);
                offsets.push(entry.size);
            }

            let mut accum = 0u64;
            for offset in offsets.iter_mut() {
                let next = accum + *offset;
                *offset = accum;
                accum = next;
            }

            ConfigurationTable {
                num_suits,
                counts,
                suit_sizes,
                equal,
                offsets,
                round_size: accum,
            }
        })
        .collect()
}

fn tabulate(
    num_ranks: usize,
    num_suits: usize,
    rounds: usize,
    round: usize,
    packed: &[u32; MAX_SUITS],
) -> Entry {
    let mut suit_sizes = [0u32; MAX_SUITS];
    let mut equal = 0u32;
    let mut size = 1u64;

    let mut i = 0;
    while i < num_suits {
        let mut suit_size = 1u64;
        let mut remaining = num_ranks;
        for j in 0..=round {
            let n = cards_on_round(packed[i], j, rounds) as usize;
            suit_size *= binom(remaining, n);
            remaining -= n;
        }

        let mut j = i + 1;
        while j < num_suits && packed[j] == packed[i] {
            equal |= 1 << j;
            j += 1;
        }
        for s in i..j {
            suit_sizes[s] = suit_size as u32;
        }
        size *= multichoose(suit_size, j - i);
        i = j;
    }

    Entry {
        counts: *packed,
        suit_sizes,
        equal,
        size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holdem_preflop_configurations() {
        // two hole cards split across four suits: either suited or offsuit
        let tables = build_configuration_tables(13, 4, &[2, 3, 1, 1]);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[0].round_size(), 169);
    }

    #[test]
    fn test_leduc_configurations() {
        let tables = build_configuration_tables(3, 2, &[1, 1]);
        assert_eq!(tables[0].len(), 1);
        assert_eq!(tables[0].round_size(), 3);
        assert_eq!(tables[1].len(), 2);
        assert_eq!(tables[1].round_size(), 15);
    }

    #[test]
    fn test_single_suit_configurations() {
        let tables = build_configuration_tables(3, 1, &[1]);
        assert_eq!(tables[0].len(), 1);
        assert_eq!(tables[0].round_size(), 3);
    }

    #[test]
    fn test_counts_sorted_and_canonical() {
        let tables = build_configuration_tables(13, 4, &[2, 3, 1, 1]);
        for table in &tables {
            for i in 0..table.len() {
                let counts = table.counts_of(i);
                assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{:?}", counts);
                if i > 0 {
                    assert!(table.counts_of(i - 1) < counts);
                }
                assert_eq!(table.position(counts), i);
            }
        }
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let tables = build_configuration_tables(13, 4, &[2, 3, 1, 1]);
        for table in &tables {
            assert_eq!(table.offset_of(0), 0);
            for i in 1..table.len() {
                assert!(table.offset_of(i) > table.offset_of(i - 1));
            }
            assert!(table.round_size() > table.offset_of(table.len() - 1));
        }
    }

    #[test]
    fn test_block_containing() {
        let tables = build_configuration_tables(13, 4, &[2, 3, 1, 1]);
        let preflop = &tables[0];
        assert_eq!(preflop.block_containing(0), 0);
        let split = preflop.offset_of(1);
        assert_eq!(preflop.block_containing(split - 1), 0);
        assert_eq!(preflop.block_containing(split), 1);
        assert_eq!(preflop.block_containing(168), 1);
    }
}
