use super::*;
use alloc::vec::Vec;
use rand::prelude::*;

/// Builds `[0, 0, 1, 1, ..., n - 1, n - 1]`, the unshuffled multiset for `pair_count` pairs.
pub fn paired_sequence(pair_count: CardCount) -> Vec<PairId> {
    (0..pair_count).flat_map(|pair_id| [pair_id, pair_id]).collect()
}

/// In-place Fisher-Yates: walks `i` from the end down to 1 and swaps with a uniform pick from `0..=i`.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

fn shuffled_board<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Board {
    let mut pairs = paired_sequence(config.total_pairs());
    fisher_yates(&mut pairs, rng);
    log::trace!("shuffled {} cards", pairs.len());
    Board::from_pairs_unchecked(pairs)
}

/// Deterministic generator, the same seed always yields the same board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShuffledBoardGenerator {
    seed: u64,
}

impl ShuffledBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for ShuffledBoardGenerator {
    fn generate(self, config: &GameConfig) -> Board {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        shuffled_board(config, &mut rng)
    }
}

/// Generator drawing from a caller-owned random source.
#[derive(Debug)]
pub struct RngBoardGenerator<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RngBoardGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + ?Sized> BoardGenerator for RngBoardGenerator<'_, R> {
    fn generate(self, config: &GameConfig) -> Board {
        shuffled_board(config, self.rng)
    }
}
