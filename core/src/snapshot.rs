use alloc::vec::Vec;
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// What a presentation adapter needs to draw one card.
///
/// Pair identity, symbol and color are only exposed while the card is face up.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct CardView {
    pub face: CardFace,
    pub pair_id: Option<PairId>,
    pub symbol: Option<&'static str>,
    pub color: Option<Rgb>,
}

impl CardView {
    pub const HIDDEN: CardView = CardView {
        face: CardFace::Hidden,
        pair_id: None,
        symbol: None,
        color: None,
    };
}

/// Read-only copy of the game handed to change listeners.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub config: GameConfig,
    pub cards: Array2<CardView>,
    pub phase: GamePhase,
    pub moves: u32,
    pub matched_pairs: CardCount,
    pub total_pairs: CardCount,
    pub recent_matches: Vec<&'static str>,
}

impl GameSnapshot {
    pub fn from_game(game: &GameState) -> Self {
        let config = *game.config();
        let cols = usize::from(config.cols());

        let cards = Array2::from_shape_fn(config.size().to_nd_index(), |(row, col)| {
            let index = row * cols + col;
            match game.card_face(index) {
                Ok(face) if face.is_face_up() => {
                    let pair_id = game.board()[index];
                    CardView {
                        face,
                        pair_id: Some(pair_id),
                        symbol: Some(game.symbol_for(pair_id)),
                        color: Some(game.color_for(pair_id)),
                    }
                }
                _ => CardView::HIDDEN,
            }
        });

        Self {
            config,
            cards,
            phase: game.phase(),
            moves: game.move_count(),
            matched_pairs: game.matched_pair_count(),
            total_pairs: config.total_pairs(),
            recent_matches: game.recent_matches().to_vec(),
        }
    }

    pub fn card(&self, coords: Coord2) -> Option<&CardView> {
        self.cards.get(coords.to_nd_index())
    }

    pub fn is_won(&self) -> bool {
        matches!(self.phase, GamePhase::Won)
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, GamePhase::Resolving)
    }
}
