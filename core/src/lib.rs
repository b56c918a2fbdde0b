#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Index;
use core::time::Duration;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use history::*;
pub use palette::*;
pub use snapshot::*;
pub use types::*;

mod card;
mod controller;
mod engine;
mod error;
mod generator;
mod history;
mod palette;
mod snapshot;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Easy => GameConfig::new_unchecked(Easy, 4, 4),
            Medium => GameConfig::new_unchecked(Medium, 6, 6),
            Hard => GameConfig::new_unchecked(Hard, 8, 8),
        }
    }

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "Easy",
            Medium => "Medium",
            Hard => "Hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

/// Immutable grid descriptor. The card count is always even and non-zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    difficulty: Difficulty,
    rows: Coord,
    cols: Coord,
}

impl GameConfig {
    const fn new_unchecked(difficulty: Difficulty, rows: Coord, cols: Coord) -> Self {
        Self {
            difficulty,
            rows,
            cols,
        }
    }

    pub fn new(difficulty: Difficulty, rows: Coord, cols: Coord) -> Result<Self> {
        let total_cards = mult(rows, cols);
        if total_cards == 0 || total_cards % 2 != 0 {
            return Err(GameError::InvalidConfig);
        }
        Ok(Self::new_unchecked(difficulty, rows, cols))
    }

    pub const fn easy() -> Self {
        Difficulty::Easy.config()
    }

    pub const fn medium() -> Self {
        Difficulty::Medium.config()
    }

    pub const fn hard() -> Self {
        Difficulty::Hard.config()
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cards(&self) -> CardCount {
        mult(self.rows, self.cols)
    }

    pub const fn total_pairs(&self) -> CardCount {
        self.total_cards() / 2
    }

    pub const fn difficulty_name(&self) -> &'static str {
        self.difficulty.name()
    }

    pub fn description(&self) -> String {
        format!(
            "{}×{} Grid • {} Unique Pairs",
            self.rows,
            self.cols,
            self.total_pairs()
        )
    }

    pub fn validate_index(&self, index: CardIndex) -> Result<CardIndex> {
        if index < usize::from(self.total_cards()) {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    pub fn index_of(&self, (row, col): Coord2) -> Result<CardIndex> {
        if row < self.rows && col < self.cols {
            Ok(usize::from(row) * usize::from(self.cols) + usize::from(col))
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    pub fn coords_of(&self, index: CardIndex) -> Result<Coord2> {
        let index = self.validate_index(index)?;
        let cols = usize::from(self.cols);
        // both parts fit in a Coord once the index is in range
        Ok(((index / cols) as Coord, (index % cols) as Coord))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::easy()
    }
}

/// Shuffled sequence of pair ids, one per grid position, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    pairs: Vec<PairId>,
}

impl Board {
    pub fn from_pairs(config: &GameConfig, pairs: Vec<PairId>) -> Result<Self> {
        if pairs.len() != usize::from(config.total_cards()) {
            return Err(GameError::InvalidBoard);
        }

        let mut seen = vec![0u8; usize::from(config.total_pairs())];
        for &pair_id in &pairs {
            let count = seen
                .get_mut(usize::from(pair_id))
                .ok_or(GameError::InvalidBoard)?;
            *count += 1;
            if *count > 2 {
                return Err(GameError::InvalidBoard);
            }
        }

        // every slot is filled and none exceeds two, so each pair appears exactly twice
        Ok(Self { pairs })
    }

    pub(crate) fn from_pairs_unchecked(pairs: Vec<PairId>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pair_at(&self, index: CardIndex) -> Option<PairId> {
        self.pairs.get(index).copied()
    }

    pub fn as_slice(&self) -> &[PairId] {
        &self.pairs
    }

    pub fn positions_of(&self, pair_id: PairId) -> impl Iterator<Item = CardIndex> + '_ {
        self.pairs
            .iter()
            .enumerate()
            .filter(move |&(_, &id)| id == pair_id)
            .map(|(index, _)| index)
    }

    pub fn to_grid(&self, config: &GameConfig) -> Result<Array2<PairId>> {
        Array2::from_shape_vec(config.size().to_nd_index(), self.pairs.clone())
            .map_err(|_| GameError::InvalidBoard)
    }
}

impl Index<CardIndex> for Board {
    type Output = PairId;

    fn index(&self, index: CardIndex) -> &Self::Output {
        &self.pairs[index]
    }
}

/// How a pending resolution will end.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionKind {
    Match,
    Mismatch,
}

impl ResolutionKind {
    pub const fn delay(self) -> Duration {
        match self {
            Self::Match => MATCH_DELAY,
            Self::Mismatch => MISMATCH_DELAY,
        }
    }
}

/// Identifies one scheduled resolution. Tickets from a replaced board never fire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionTicket(u64);

impl ResolutionTicket {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledResolution {
    pub ticket: ResolutionTicket,
    pub kind: ResolutionKind,
    pub delay: Duration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    Ignored,
    Revealed,
    Scheduled(ScheduledResolution),
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    pub const fn scheduled(self) -> Option<ScheduledResolution> {
        match self {
            Self::Scheduled(resolution) => Some(resolution),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    NoChange,
    Matched(PairId),
    Mismatched,
    Won(PairId),
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        use ResolveOutcome::*;
        match self {
            NoChange => false,
            Matched(_) => true,
            Mismatched => true,
            Won(_) => true,
        }
    }
}
