use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Card index out of range")]
    InvalidIndex,
    #[error("Grid must hold an even, non-zero number of cards")]
    InvalidConfig,
    #[error("Board must hold every pair exactly twice")]
    InvalidBoard,
    #[error("Symbol palette is empty")]
    EmptyPalette,
}

pub type Result<T> = core::result::Result<T, GameError>;
