/// Single coordinate axis used for grid rows, columns and side length.
pub type Coord = u8;

/// Count type used for cell counts and symbol tallies.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Milliseconds on the engine's clock.
pub type Millis = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Iterates every `(row, col)` of a square grid in row-major order.
pub fn iter_coords(side: Coord) -> impl Iterator<Item = Coord2> {
    (0..side).flat_map(move |row| (0..side).map(move |col| (row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn iter_coords_is_row_major() {
        let coords: Vec<_> = iter_coords(2).collect();
        assert_eq!(coords, [(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn mult_saturates() {
        assert_eq!(mult(4, 4), 16);
        assert_eq!(mult(Coord::MAX, Coord::MAX), 65025);
    }
}
