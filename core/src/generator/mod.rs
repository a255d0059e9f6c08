use rand::rngs::SmallRng;

use crate::*;
pub use random::*;

mod random;

pub trait GridGenerator {
    fn generate(&self, config: &GameConfig, rng: &mut SmallRng) -> Grid;
}

/// Generator matching the configured mode.
pub fn generator_for(mode: Mode) -> &'static dyn GridGenerator {
    match mode {
        Mode::Memory => &PairedGenerator,
        Mode::Shuffle => &IndependentGenerator,
    }
}
