use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Unbiased in-place permutation.
pub fn fisher_yates<T>(items: &mut [T], rng: &mut SmallRng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

fn grid_from_row_major(side: Coord, symbols: &[Symbol]) -> Grid {
    let side = usize::from(side);
    let cards = Array2::from_shape_fn((side, side), |(row, col)| {
        Card::new(symbols[row * side + col])
    });
    Grid::from_cards_unchecked(cards)
}

/// Pair matching: each of the first `cells / 2` symbols appears exactly twice.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PairedGenerator;

impl GridGenerator for PairedGenerator {
    fn generate(&self, config: &GameConfig, rng: &mut SmallRng) -> Grid {
        let total_cells = config.total_cells();
        if total_cells % 2 != 0 {
            log::warn!(
                "Pair grid requested with odd cell count {}, last cell gets a lone symbol",
                total_cells
            );
        }

        let mut symbols: Vec<Symbol> = (0..total_cells)
            .map(|i| Symbol((i / 2) as u8))
            .collect();
        fisher_yates(&mut symbols, rng);
        grid_from_row_major(config.grid_size(), &symbols)
    }
}

/// Shuffle table: every cell draws its symbol independently.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct IndependentGenerator;

impl GridGenerator for IndependentGenerator {
    fn generate(&self, config: &GameConfig, rng: &mut SmallRng) -> Grid {
        let choices = config.symbols_in_play().max(1);
        let symbols: Vec<Symbol> = (0..config.total_cells())
            .map(|_| Symbol(rng.random_range(0..choices) as u8))
            .collect();
        grid_from_row_major(config.grid_size(), &symbols)
    }
}
