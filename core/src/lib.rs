#![no_std]

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use clock::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use snapshot::*;
pub use timer::*;
pub use types::*;

mod card;
mod clock;
mod engine;
mod error;
mod generator;
mod grid;
mod snapshot;
mod timer;
mod types;

pub const MIN_GRID_SIZE: Coord = 2;
pub const MAX_GRID_SIZE: Coord = 8;

/// Period of the countdown timer.
pub const TICK_MS: Millis = 1000;

pub const FRUITS: [&str; 8] = [
    "apple",
    "banana",
    "cherry",
    "lemon",
    "grape",
    "orange",
    "pear",
    "strawberry",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Rapid re-randomization, won by a uniform row or column.
    Shuffle,
    /// Pair matching on a face-down grid.
    Memory,
}

impl Mode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shuffle => "shuffle",
            Self::Memory => "memory",
        }
    }
}

/// Durations of the time-bounded sub-phases and delayed callbacks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    pub preview_ms: Millis,
    pub agitation_ms: Millis,
    pub agitation_interval_ms: Millis,
    pub mismatch_ms: Millis,
    pub restart_ms: Millis,
}

impl Timings {
    fn clamped(self) -> Self {
        Self {
            preview_ms: self.preview_ms.max(1),
            agitation_ms: self.agitation_ms.max(1),
            agitation_interval_ms: self.agitation_interval_ms.max(1),
            mismatch_ms: self.mismatch_ms.max(1),
            restart_ms: self.restart_ms.max(1),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            preview_ms: 2000,
            agitation_ms: 2000,
            agitation_interval_ms: 200,
            mismatch_ms: 1000,
            restart_ms: 2000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    mode: Mode,
    grid_size: Coord,
    alphabet: Vec<String>,
    timer_secs: u32,
    max_mismatches: u32,
    timings: Timings,
}

/// Unchecked wire form of [`GameConfig`].
#[derive(Deserialize)]
struct RawGameConfig {
    mode: Mode,
    grid_size: Coord,
    alphabet: Vec<String>,
    timer_secs: u32,
    max_mismatches: u32,
    #[serde(default)]
    timings: Timings,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        let config = Self {
            mode: raw.mode,
            grid_size: raw.grid_size,
            alphabet: raw.alphabet,
            timer_secs: raw.timer_secs.max(1),
            max_mismatches: raw.max_mismatches.max(1),
            timings: raw.timings.clamped(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl GameConfig {
    pub fn try_new<S: ToString>(
        mode: Mode,
        grid_size: Coord,
        alphabet: &[S],
        timer_secs: u32,
        max_mismatches: u32,
    ) -> Result<Self> {
        let config = Self {
            mode,
            grid_size,
            alphabet: alphabet.iter().map(ToString::to_string).collect(),
            timer_secs: timer_secs.max(1),
            max_mismatches: max_mismatches.max(1),
            timings: Timings::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 4x4 pair matching over all eight fruits.
    pub fn memory() -> Self {
        Self {
            mode: Mode::Memory,
            grid_size: 4,
            alphabet: FRUITS.iter().map(ToString::to_string).collect(),
            timer_secs: 60,
            max_mismatches: 10,
            timings: Timings::default(),
        }
    }

    /// 3x3 shuffle table over four fruits with two attempts.
    pub fn shuffle() -> Self {
        Self {
            mode: Mode::Shuffle,
            grid_size: 3,
            alphabet: FRUITS[..4].iter().map(ToString::to_string).collect(),
            timer_secs: 60,
            max_mismatches: 2,
            timings: Timings::default(),
        }
    }

    pub fn preset(mode: Mode) -> Self {
        match mode {
            Mode::Shuffle => Self::shuffle(),
            Mode::Memory => Self::memory(),
        }
    }

    pub fn with_timer_secs(mut self, timer_secs: u32) -> Self {
        self.timer_secs = timer_secs.max(1);
        self
    }

    pub fn with_max_mismatches(mut self, max_mismatches: u32) -> Self {
        self.max_mismatches = max_mismatches.max(1);
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings.clamped();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(GameError::InvalidGridSize {
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        if self.alphabet.is_empty() {
            return Err(GameError::EmptyAlphabet);
        }
        if self.alphabet.len() > usize::from(u8::MAX) {
            return Err(GameError::AlphabetTooLarge);
        }
        for (i, symbol) in self.alphabet.iter().enumerate() {
            if self.alphabet[..i].contains(symbol) {
                return Err(GameError::DuplicateSymbol);
            }
        }
        if matches!(self.mode, Mode::Memory) {
            let cells = self.total_cells();
            if cells % 2 != 0 {
                return Err(GameError::OddCellCount);
            }
            if self.alphabet.len() < usize::from(cells / 2) {
                return Err(GameError::AlphabetTooSmall { needed: cells / 2 });
            }
        }
        Ok(())
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn grid_size(&self) -> Coord {
        self.grid_size
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    pub const fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    pub const fn max_mismatches(&self) -> u32 {
        self.max_mismatches
    }

    pub const fn timings(&self) -> Timings {
        self.timings
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.grid_size, self.grid_size)
    }

    /// Number of distinct symbols a fresh grid draws from.
    pub fn symbols_in_play(&self) -> CellCount {
        match self.mode {
            Mode::Memory => self.total_cells() / 2,
            // validate() caps the alphabet at 255 entries
            Mode::Shuffle => self.alphabet.len() as CellCount,
        }
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        self.alphabet
            .get(symbol.index())
            .map_or("?", String::as_str)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::memory()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StartOutcome {
    /// Memory mode: all cards shown for the preview window.
    Previewing,
    /// Shuffle mode: agitation running.
    Shuffling,
}

impl StartOutcome {
    pub const fn has_update(self) -> bool {
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Shuffle mode: a card was turned over.
    Flipped,
    /// Memory mode: first card of a pair is up.
    FirstPick,
    Matched,
    /// Pair differs and is locked until the flip-back delay ends.
    Mismatched,
    /// Shuffle mode: every card is up and no line is uniform.
    NoLine,
    Won,
    Lost,
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        true
    }

}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Counted,
    TimeUp,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TimerOutcome {
    Tick(TickOutcome),
    Agitated,
    Settled,
    PreviewEnded,
    FlippedBack,
    Restarted(StartOutcome),
}

impl TimerOutcome {
    pub const fn has_update(self) -> bool {
        true
    }
}
