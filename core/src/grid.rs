use core::ops::{Index, IndexMut};
use hashbrown::HashMap;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::*;

/// Square matrix of cards, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Card>", into = "Array2<Card>")]
pub struct Grid {
    cards: Array2<Card>,
}

impl TryFrom<Array2<Card>> for Grid {
    type Error = GameError;

    fn try_from(cards: Array2<Card>) -> Result<Self> {
        Self::from_cards(cards)
    }
}

impl From<Grid> for Array2<Card> {
    fn from(grid: Grid) -> Self {
        grid.cards
    }
}

impl Grid {
    pub fn from_cards(cards: Array2<Card>) -> Result<Self> {
        let (rows, cols) = cards.dim();
        if rows != cols || !(usize::from(MIN_GRID_SIZE)..=usize::from(MAX_GRID_SIZE)).contains(&rows) {
            return Err(GameError::InvalidGridSize {
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        Ok(Self::from_cards_unchecked(cards))
    }

    pub(crate) const fn from_cards_unchecked(cards: Array2<Card>) -> Self {
        Self { cards }
    }

    /// Builds a face-down grid from row-major symbol indices.
    pub fn from_symbols(side: Coord, symbols: &[u8]) -> Result<Self> {
        let cells = usize::from(side) * usize::from(side);
        if symbols.len() != cells {
            return Err(GameError::InvalidGridSize {
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        let cards = Array2::from_shape_fn((usize::from(side), usize::from(side)), |(row, col)| {
            Card::new(Symbol(symbols[row * usize::from(side) + col]))
        });
        Self::from_cards(cards)
    }

    pub fn side(&self) -> Coord {
        // from_cards bounds the side by MAX_GRID_SIZE
        self.cards.nrows() as Coord
    }

    pub fn dim(&self) -> (usize, usize) {
        self.cards.dim()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let side = self.side();
        if coords.0 < side && coords.1 < side {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Card> {
        self.cards.get(coords.to_nd_index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Card)> {
        iter_coords(self.side()).map(|coords| (coords, &self[coords]))
    }

    pub fn set_all_face_up(&mut self, face_up: bool) {
        for card in self.cards.iter_mut() {
            card.face_up = face_up;
        }
    }

    pub fn all_face_up(&self) -> bool {
        self.cards.iter().all(|card| card.face_up)
    }

    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|card| card.matched)
    }

    /// First row, then column, whose cards all share one symbol.
    pub fn uniform_line(&self) -> Option<Line> {
        fn is_uniform<'a>(mut cards: impl Iterator<Item = &'a Card>) -> bool {
            match cards.next() {
                Some(first) => cards.all(|card| card.symbol == first.symbol),
                None => false,
            }
        }

        for (row, lane) in self.cards.axis_iter(Axis(0)).enumerate() {
            if is_uniform(lane.iter()) {
                return Some(Line::Row(row as Coord));
            }
        }
        for (col, lane) in self.cards.axis_iter(Axis(1)).enumerate() {
            if is_uniform(lane.iter()) {
                return Some(Line::Column(col as Coord));
            }
        }
        None
    }

    pub fn symbol_counts(&self) -> HashMap<Symbol, CellCount> {
        let mut counts = HashMap::new();
        for card in self.cards.iter() {
            *counts.entry(card.symbol).or_insert(0) += 1;
        }
        counts
    }

    /// Whether every symbol present occurs exactly twice.
    pub fn is_paired(&self) -> bool {
        self.symbol_counts().values().all(|&count| count == 2)
    }
}

impl Index<Coord2> for Grid {
    type Output = Card;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cards[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cards[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Line {
    Row(Coord),
    Column(Coord),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_uniform_row() {
        let grid = Grid::from_symbols(3, &[1, 1, 1, 0, 2, 3, 2, 0, 1]).unwrap();
        assert_eq!(grid.uniform_line(), Some(Line::Row(0)));
    }

    #[test]
    fn detects_uniform_column() {
        let grid = Grid::from_symbols(3, &[0, 1, 2, 3, 1, 0, 2, 1, 3]).unwrap();
        assert_eq!(grid.uniform_line(), Some(Line::Column(1)));
    }

    #[test]
    fn no_line_on_mixed_grid() {
        let grid = Grid::from_symbols(3, &[0, 1, 2, 1, 2, 0, 2, 0, 1]).unwrap();
        assert_eq!(grid.uniform_line(), None);
    }

    #[test]
    fn rejects_wrong_symbol_count() {
        assert!(Grid::from_symbols(3, &[0, 1]).is_err());
        assert!(Grid::from_symbols(1, &[0]).is_err());
    }

    #[test]
    fn validate_coords_bounds() {
        let grid = Grid::from_symbols(2, &[0, 0, 1, 1]).unwrap();
        assert_eq!(grid.validate_coords((1, 1)), Ok((1, 1)));
        assert_eq!(grid.validate_coords((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(grid.validate_coords((0, 200)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn deserializing_rejects_non_square_cards() {
        let cards = Array2::from_elem((4, 3), Card::new(Symbol(0)));
        let json = serde_json::to_value(&cards).unwrap();
        assert!(serde_json::from_value::<Grid>(json).is_err());

        let grid = Grid::from_symbols(2, &[0, 1, 1, 0]).unwrap();
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(serde_json::from_value::<Grid>(json).unwrap(), grid);
    }

    #[test]
    fn pairing_check() {
        assert!(Grid::from_symbols(2, &[0, 1, 1, 0]).unwrap().is_paired());
        assert!(!Grid::from_symbols(2, &[0, 0, 0, 1]).unwrap().is_paired());
    }
}
