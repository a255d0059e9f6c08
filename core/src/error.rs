use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game is not accepting card flips")]
    NotPlaying,
    #[error("A pair is still being resolved")]
    InputLocked,
    #[error("Card is already face-up or matched")]
    CardUnavailable,
    #[error("A round is already running")]
    AlreadyRunning,
    #[error("Game has not ended yet")]
    NotTerminal,
    #[error("Action is not available in this mode")]
    WrongMode,
    #[error("Timer is no longer armed")]
    StaleTimer,
    #[error("Grid size must be between {min} and {max}")]
    InvalidGridSize { min: u8, max: u8 },
    #[error("Alphabet has no symbols")]
    EmptyAlphabet,
    #[error("Alphabet has more than 255 symbols")]
    AlphabetTooLarge,
    #[error("Alphabet lists the same symbol twice")]
    DuplicateSymbol,
    #[error("Pair matching needs an even number of cells")]
    OddCellCount,
    #[error("Alphabet needs at least {needed} symbols for this grid")]
    AlphabetTooSmall { needed: u16 },
}

pub type Result<T> = core::result::Result<T, GameError>;
