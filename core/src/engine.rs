use alloc::vec;
use alloc::vec::Vec;
use core::num::Saturating;
use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Time both cards of a matching pair stay up before they are retired.
pub const MATCH_DELAY: Duration = Duration::from_millis(500);

/// Time both cards of a mismatched pair stay up before they are hidden again.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Idle,
    Resolving,
    Won,
}

impl GamePhase {
    pub const fn accepts_flips(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Two face-up cards waiting for their timed match/mismatch resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingResolution {
    pub ticket: ResolutionTicket,
    pub first: CardIndex,
    pub second: CardIndex,
    pub kind: ResolutionKind,
    pub remaining: Duration,
}

#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    cards: Vec<CardState>,
    turn: SmallVec<[CardIndex; 2]>,
    pending: Option<PendingResolution>,
    moves: Saturating<u32>,
    matched_pairs: CardCount,
    history: MatchHistory,
    last_match: Option<(CardIndex, CardIndex)>,
    palette: Palette,
    rng: SmallRng,
    next_ticket: u64,
}

impl GameState {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = RngBoardGenerator::new(&mut rng).generate(&config);
        Self::from_parts(config, board, rng)
    }

    /// Starts from a fixed layout; later `new_game` calls shuffle with `seed`.
    pub fn with_layout(config: GameConfig, pairs: Vec<PairId>, seed: u64) -> Result<Self> {
        let board = Board::from_pairs(&config, pairs)?;
        Ok(Self::from_parts(
            config,
            board,
            SmallRng::seed_from_u64(seed),
        ))
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    fn from_parts(config: GameConfig, board: Board, rng: SmallRng) -> Self {
        log::info!(
            "new {} game, {} pairs",
            config.difficulty_name(),
            config.total_pairs()
        );
        Self {
            config,
            cards: vec![CardState::Hidden; board.len()],
            board,
            turn: SmallVec::new(),
            pending: None,
            moves: Saturating(0),
            matched_pairs: 0,
            history: MatchHistory::new(),
            last_match: None,
            palette: Palette::default(),
            rng,
            next_ticket: 0,
        }
    }

    /// Deals a fresh board, optionally switching to `config` first.
    ///
    /// Any pending resolution is dropped and its ticket will no longer fire.
    pub fn new_game(&mut self, config: Option<GameConfig>) {
        if let Some(config) = config {
            self.config = config;
        }

        if let Some(pending) = self.pending.take() {
            log::debug!(
                "cancelled pending resolution {} for cards {} and {}",
                pending.ticket.raw(),
                pending.first,
                pending.second
            );
        }

        self.board = RngBoardGenerator::new(&mut self.rng).generate(&self.config);
        self.cards = vec![CardState::Hidden; self.board.len()];
        self.turn.clear();
        self.moves = Saturating(0);
        self.matched_pairs = 0;
        self.history.clear();
        self.last_match = None;

        log::info!(
            "new {} game, {} pairs",
            self.config.difficulty_name(),
            self.config.total_pairs()
        );
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn phase(&self) -> GamePhase {
        if self.is_won() {
            GamePhase::Won
        } else if self.pending.is_some() {
            GamePhase::Resolving
        } else {
            GamePhase::Idle
        }
    }

    pub fn is_won(&self) -> bool {
        self.matched_pairs == self.config.total_pairs()
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_resolution(&self) -> Option<PendingResolution> {
        self.pending
    }

    pub fn move_count(&self) -> u32 {
        self.moves.0
    }

    pub fn matched_pair_count(&self) -> CardCount {
        self.matched_pairs
    }

    pub fn recent_matches(&self) -> &[&'static str] {
        self.history.as_slice()
    }

    /// Face-up cards of the turn in progress, in flip order.
    pub fn turn(&self) -> &[CardIndex] {
        &self.turn
    }

    pub fn card_state(&self, index: CardIndex) -> Result<CardState> {
        let index = self.config.validate_index(index)?;
        Ok(self.cards[index])
    }

    pub fn is_solved(&self, index: CardIndex) -> Result<bool> {
        Ok(self.card_state(index)? == CardState::Solved)
    }

    pub fn is_revealed(&self, index: CardIndex) -> Result<bool> {
        Ok(self.card_state(index)? == CardState::Revealed)
    }

    pub fn card_face(&self, index: CardIndex) -> Result<CardFace> {
        let state = self.card_state(index)?;
        Ok(match self.last_match {
            Some((first, second)) if index == first || index == second => CardFace::MatchGlow,
            _ => state.into(),
        })
    }

    pub fn pair_at(&self, index: CardIndex) -> Result<PairId> {
        let index = self.config.validate_index(index)?;
        Ok(self.board[index])
    }

    pub fn symbol_for(&self, pair_id: PairId) -> &'static str {
        self.palette.symbol_for(pair_id)
    }

    pub fn color_for(&self, pair_id: PairId) -> Rgb {
        self.palette.color_for(pair_id, self.config.total_pairs())
    }

    pub fn can_flip_at(&self, index: CardIndex) -> bool {
        self.phase().accepts_flips()
            && matches!(self.cards.get(index), Some(CardState::Hidden))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_game(self)
    }

    /// Turns a card face up.
    ///
    /// Flips on a won or resolving board, or on a card that is already face up, are ignored.
    /// The second flip of a turn counts a move and schedules the resolution.
    pub fn flip(&mut self, index: CardIndex) -> Result<FlipOutcome> {
        let index = self.config.validate_index(index)?;

        if !self.can_flip_at(index) {
            log::trace!("ignored flip at {} ({:?})", index, self.phase());
            return Ok(FlipOutcome::Ignored);
        }

        self.cards[index] = CardState::Revealed;
        self.last_match = None;
        self.turn.push(index);
        log::debug!("flipped card {}", index);

        let &[first, second] = self.turn.as_slice() else {
            return Ok(FlipOutcome::Revealed);
        };

        self.moves += 1;
        let kind = if self.board[first] == self.board[second] {
            ResolutionKind::Match
        } else {
            ResolutionKind::Mismatch
        };
        let ticket = ResolutionTicket::new(self.next_ticket);
        self.next_ticket += 1;
        let delay = kind.delay();

        self.pending = Some(PendingResolution {
            ticket,
            first,
            second,
            kind,
            remaining: delay,
        });
        log::debug!(
            "cards {} and {} scheduled as {:?} in {:?}",
            first,
            second,
            kind,
            delay
        );

        Ok(FlipOutcome::Scheduled(ScheduledResolution {
            ticket,
            kind,
            delay,
        }))
    }

    /// Fires the pending resolution if `ticket` still refers to it.
    pub fn resolve(&mut self, ticket: ResolutionTicket) -> ResolveOutcome {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                self.apply_resolution(pending)
            }
            _ => {
                log::warn!("ignoring stale resolution ticket {}", ticket.raw());
                ResolveOutcome::NoChange
            }
        }
    }

    /// Counts the pending resolution down by `elapsed` and fires it once its delay has passed.
    pub fn advance(&mut self, elapsed: Duration) -> ResolveOutcome {
        let Some(pending) = self.pending.as_mut() else {
            return ResolveOutcome::NoChange;
        };

        pending.remaining = pending.remaining.saturating_sub(elapsed);
        if !pending.remaining.is_zero() {
            return ResolveOutcome::NoChange;
        }

        let pending = *pending;
        self.pending = None;
        self.apply_resolution(pending)
    }

    fn apply_resolution(&mut self, pending: PendingResolution) -> ResolveOutcome {
        let PendingResolution {
            first,
            second,
            kind,
            ..
        } = pending;
        self.turn.clear();

        match kind {
            ResolutionKind::Match => {
                let pair_id = self.board[first];
                self.cards[first] = CardState::Solved;
                self.cards[second] = CardState::Solved;
                self.matched_pairs += 1;
                self.history.push(self.palette.symbol_for(pair_id));
                self.last_match = Some((first, second));

                if self.is_won() {
                    log::info!("won in {} moves", self.moves.0);
                    ResolveOutcome::Won(pair_id)
                } else {
                    log::debug!(
                        "matched pair {} ({}/{})",
                        pair_id,
                        self.matched_pairs,
                        self.config.total_pairs()
                    );
                    ResolveOutcome::Matched(pair_id)
                }
            }
            ResolutionKind::Mismatch => {
                self.cards[first] = CardState::Hidden;
                self.cards[second] = CardState::Hidden;
                log::debug!("cards {} and {} hidden again", first, second);
                ResolveOutcome::Mismatched
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Easy board with pair 3 at cards 0 and 1 and pair 0 at cards 2 and 3.
    fn easy_game() -> GameState {
        let pairs = vec![3, 3, 0, 0, 1, 1, 2, 2, 4, 4, 5, 5, 6, 6, 7, 7];
        GameState::with_layout(GameConfig::easy(), pairs, 0).unwrap()
    }

    fn flip_pair(game: &mut GameState, a: CardIndex, b: CardIndex) -> ScheduledResolution {
        assert_eq!(game.flip(a).unwrap(), FlipOutcome::Revealed);
        game.flip(b).unwrap().scheduled().unwrap()
    }

    fn solve_all(game: &mut GameState) -> ResolveOutcome {
        let mut outcome = ResolveOutcome::NoChange;
        for pair_id in 0..game.config().total_pairs() {
            let positions: Vec<_> = game.board().positions_of(pair_id).collect();
            let scheduled = flip_pair(game, positions[0], positions[1]);
            outcome = game.resolve(scheduled.ticket);
        }
        outcome
    }

    #[test]
    fn new_game_deals_each_pair_twice() {
        for difficulty in Difficulty::ALL {
            let mut game = GameState::new(difficulty.config(), 11);
            for _ in 0..3 {
                for pair_id in 0..game.config().total_pairs() {
                    assert_eq!(game.board().positions_of(pair_id).count(), 2);
                }
                game.new_game(None);
            }
        }
    }

    #[test]
    fn flip_out_of_range_is_rejected() {
        let mut game = easy_game();
        assert_eq!(game.flip(16), Err(GameError::InvalidIndex));
        assert_eq!(game.card_state(16), Err(GameError::InvalidIndex));
        assert_eq!(game.is_solved(16), Err(GameError::InvalidIndex));
        assert_eq!(game.is_revealed(16), Err(GameError::InvalidIndex));
        assert_eq!(game.card_face(16), Err(GameError::InvalidIndex));
        assert_eq!(game.pair_at(16), Err(GameError::InvalidIndex));
        assert_eq!(game.pair_at(15), Ok(7));

        solve_all(&mut game);
        assert_eq!(game.flip(99), Err(GameError::InvalidIndex));
    }

    #[test]
    fn single_flip_does_not_count_a_move() {
        let mut game = easy_game();

        assert_eq!(game.flip(5).unwrap(), FlipOutcome::Revealed);

        assert_eq!(game.move_count(), 0);
        assert_eq!(game.card_state(5).unwrap(), CardState::Revealed);
        assert_eq!(game.turn(), &[5]);
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[test]
    fn matching_pair_is_solved_after_match_delay() {
        let mut game = easy_game();

        let scheduled = flip_pair(&mut game, 0, 1);
        assert_eq!(scheduled.kind, ResolutionKind::Match);
        assert_eq!(scheduled.delay, MATCH_DELAY);
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.phase(), GamePhase::Resolving);
        let pending = game.pending_resolution().unwrap();
        assert_eq!((pending.first, pending.second), (0, 1));
        assert_eq!(pending.ticket, scheduled.ticket);
        assert_eq!(pending.remaining, MATCH_DELAY);

        assert_eq!(game.resolve(scheduled.ticket), ResolveOutcome::Matched(3));
        assert_eq!(game.pending_resolution(), None);

        assert_eq!(game.card_state(0).unwrap(), CardState::Solved);
        assert_eq!(game.card_state(1).unwrap(), CardState::Solved);
        assert_eq!(game.matched_pair_count(), 1);
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.recent_matches(), &[game.symbol_for(3)]);
        assert!(game.turn().is_empty());
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[test]
    fn advance_waits_for_the_full_match_delay() {
        let mut game = easy_game();
        flip_pair(&mut game, 0, 1);

        assert_eq!(
            game.advance(Duration::from_millis(499)),
            ResolveOutcome::NoChange
        );
        assert!(game.is_revealed(0).unwrap());

        assert_eq!(
            game.advance(Duration::from_millis(1)),
            ResolveOutcome::Matched(3)
        );
        assert!(game.is_solved(0).unwrap());
        assert!(game.is_solved(1).unwrap());
    }

    #[test]
    fn mismatched_pair_is_hidden_after_mismatch_delay() {
        let mut game = easy_game();

        let scheduled = flip_pair(&mut game, 0, 2);
        assert_eq!(scheduled.kind, ResolutionKind::Mismatch);
        assert_eq!(scheduled.delay, MISMATCH_DELAY);
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.card_state(0).unwrap(), CardState::Revealed);
        assert_eq!(game.card_state(2).unwrap(), CardState::Revealed);

        // still up once the shorter match delay has passed
        assert_eq!(game.advance(MATCH_DELAY), ResolveOutcome::NoChange);
        assert_eq!(game.card_state(0).unwrap(), CardState::Revealed);

        assert_eq!(
            game.advance(MISMATCH_DELAY - MATCH_DELAY),
            ResolveOutcome::Mismatched
        );
        assert_eq!(game.card_state(0).unwrap(), CardState::Hidden);
        assert_eq!(game.card_state(2).unwrap(), CardState::Hidden);
        assert_eq!(game.matched_pair_count(), 0);
        assert!(game.recent_matches().is_empty());
    }

    #[test]
    fn board_is_locked_while_resolving() {
        let mut game = easy_game();
        flip_pair(&mut game, 0, 2);
        let before = game.snapshot();

        for index in 0..16 {
            assert_eq!(game.flip(index).unwrap(), FlipOutcome::Ignored);
        }

        assert_eq!(game.snapshot(), before);
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn flips_on_face_up_cards_are_ignored() {
        let mut game = easy_game();
        let scheduled = flip_pair(&mut game, 0, 1);
        game.resolve(scheduled.ticket);

        assert_eq!(game.flip(0).unwrap(), FlipOutcome::Ignored);
        assert_eq!(game.flip(1).unwrap(), FlipOutcome::Ignored);
        assert_eq!(game.matched_pair_count(), 1);
        assert_eq!(game.move_count(), 1);

        assert_eq!(game.flip(4).unwrap(), FlipOutcome::Revealed);
        assert_eq!(game.flip(4).unwrap(), FlipOutcome::Ignored);
        assert_eq!(game.turn(), &[4]);
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn one_move_per_completed_turn() {
        let mut game = easy_game();

        for (turn, (a, b)) in [(0, 2), (4, 6), (8, 10)].into_iter().enumerate() {
            let scheduled = flip_pair(&mut game, a, b);
            assert_eq!(game.move_count(), turn as u32 + 1);
            game.resolve(scheduled.ticket);
        }

        game.flip(12).unwrap();
        assert_eq!(game.move_count(), 3);
    }

    #[test]
    fn solving_every_pair_wins_and_stays_won() {
        let mut game = easy_game();

        let outcome = solve_all(&mut game);

        assert!(matches!(outcome, ResolveOutcome::Won(_)));
        assert!(game.is_won());
        assert_eq!(game.phase(), GamePhase::Won);
        assert_eq!(game.matched_pair_count(), 8);
        assert_eq!(game.move_count(), 8);
        assert_eq!(game.recent_matches().len(), MATCH_HISTORY_LEN);

        assert_eq!(game.flip(0).unwrap(), FlipOutcome::Ignored);
        assert_eq!(game.advance(Duration::from_secs(5)), ResolveOutcome::NoChange);
        assert!(game.is_won());

        game.new_game(None);
        assert!(!game.is_won());
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[test]
    fn new_game_cancels_pending_resolution() {
        let mut game = easy_game();
        let scheduled = flip_pair(&mut game, 0, 1);

        game.new_game(None);

        assert_eq!(game.pending_resolution(), None);
        assert_eq!(game.resolve(scheduled.ticket), ResolveOutcome::NoChange);
        assert_eq!(game.advance(Duration::from_secs(2)), ResolveOutcome::NoChange);
        assert_eq!(game.matched_pair_count(), 0);
        assert_eq!(game.move_count(), 0);
        assert!((0..16).all(|index| game.card_state(index) == Ok(CardState::Hidden)));
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[test]
    fn difficulty_switch_mid_resolution_replaces_board() {
        let mut game = easy_game();
        let scheduled = flip_pair(&mut game, 0, 2);

        game.new_game(Some(GameConfig::hard()));

        assert_eq!(game.resolve(scheduled.ticket), ResolveOutcome::NoChange);
        assert_eq!(game.board().len(), 64);
        assert_eq!(game.config().difficulty(), Difficulty::Hard);
        assert!(game.recent_matches().is_empty());
        assert_eq!(game.card_state(63), Ok(CardState::Hidden));
    }

    #[test]
    fn resolution_ticket_fires_once() {
        let mut game = easy_game();
        let scheduled = flip_pair(&mut game, 0, 1);

        assert_eq!(game.resolve(scheduled.ticket), ResolveOutcome::Matched(3));
        assert_eq!(game.resolve(scheduled.ticket), ResolveOutcome::NoChange);
        assert_eq!(game.matched_pair_count(), 1);
    }

    #[test]
    fn matched_pair_glows_until_next_flip() {
        let mut game = easy_game();
        let scheduled = flip_pair(&mut game, 0, 1);
        game.resolve(scheduled.ticket);

        assert_eq!(game.card_face(0).unwrap(), CardFace::MatchGlow);
        assert_eq!(game.card_face(1).unwrap(), CardFace::MatchGlow);
        assert_eq!(game.card_state(0).unwrap(), CardState::Solved);

        game.flip(2).unwrap();
        assert_eq!(game.card_face(0).unwrap(), CardFace::Solved);
        assert_eq!(game.card_face(2).unwrap(), CardFace::Revealed);
    }

    #[test]
    fn history_keeps_three_newest_symbols() {
        let mut game = easy_game();
        for (a, b) in [(0, 1), (2, 3), (4, 5), (6, 7)] {
            let scheduled = flip_pair(&mut game, a, b);
            game.resolve(scheduled.ticket);
        }

        assert_eq!(
            game.recent_matches(),
            &[game.symbol_for(2), game.symbol_for(1), game.symbol_for(0)]
        );
    }

    #[test]
    fn colors_follow_total_pairs() {
        let mut game = easy_game();
        let easy_color = game.color_for(4);

        game.new_game(Some(GameConfig::hard()));

        assert_eq!(easy_color, game.palette().color_for(4, 8));
        assert_eq!(game.color_for(16), easy_color);
    }

    #[test]
    fn injected_palette_drives_symbols() {
        static DIGITS: &[&str] = &["0", "1", "2", "3"];
        let mut game = easy_game().with_palette(Palette::new(DIGITS).unwrap());

        let scheduled = flip_pair(&mut game, 0, 1);
        game.resolve(scheduled.ticket);

        assert_eq!(game.recent_matches(), &["3"]);
        assert_eq!(game.symbol_for(7), "3");
    }
}
