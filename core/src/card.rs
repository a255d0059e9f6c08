use serde::{Deserialize, Serialize};

/// Index into the configured alphabet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub u8);

impl Symbol {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One grid position. Identity is the position, not the symbol.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub symbol: Symbol,
    pub face_up: bool,
    pub matched: bool,
}

impl Card {
    pub const fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            face_up: false,
            matched: false,
        }
    }

    /// Whether a click on this card can flip it in pair-matching play.
    pub const fn is_pickable(self) -> bool {
        !self.face_up && !self.matched
    }
}
