/// Single grid axis used for row and column counts and positions.
pub type Coord = u8;

/// Count type used for card and pair totals.
pub type CardCount = u16;

/// Identity shared by the two cards of a pair.
pub type PairId = u16;

/// Row-major position of a card on the board.
pub type CardIndex = usize;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

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

pub const fn mult(a: Coord, b: Coord) -> CardCount {
    let a = a as CardCount;
    let b = b as CardCount;
    a.saturating_mul(b)
}
