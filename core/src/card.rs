use serde::{Deserialize, Serialize};

/// Canonical per-card state stored by the game engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    Revealed,
    Solved,
}

impl Default for CardState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Visual state handed to presentation adapters.
///
/// `MatchGlow` marks the pair that was matched last, until the next flip or new game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    Hidden,
    Revealed,
    Solved,
    MatchGlow,
}

impl CardFace {
    pub const fn is_face_up(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

impl From<CardState> for CardFace {
    fn from(state: CardState) -> Self {
        match state {
            CardState::Hidden => Self::Hidden,
            CardState::Revealed => Self::Revealed,
            CardState::Solved => Self::Solved,
        }
    }
}
