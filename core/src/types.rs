/// Single axis of a board: width, height, or one component of a position.
pub type Coord = u8;

/// Tile and mine counts.
pub type CellCount = u16;

/// Tile position `(x, y)`, or board size `(width, height)`.
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

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Position of row-major index `index` (`x + y * width`) on a board `width` tiles wide.
pub const fn deflatten(index: usize, width: Coord) -> Coord2 {
    let width = width as usize;
    ((index % width) as Coord, (index / width) as Coord)
}

/// Whether `coords` lies inside a board of `size`.
pub const fn in_bounds((x, y): Coord2, size: Coord2) -> bool {
    x < size.0 && y < size.1
}

/// All positions of a board of `size`, in flattened-index order.
pub fn iter_coords(size: Coord2) -> impl Iterator<Item = Coord2> {
    let (width, height) = size;
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it stays on the board.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let next_x = coords.0.checked_add_signed(delta.0)?;
    let next_y = coords.1.checked_add_signed(delta.1)?;
    in_bounds((next_x, next_y), bounds).then_some((next_x, next_y))
}

/// The clipped 8-neighbourhood of a tile; never yields the centre itself.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(coords) = apply_delta(self.center, delta, self.bounds) {
                return Some(coords);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (3, 3)).collect();
        assert_eq!(neighbors, [(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn center_has_eight_neighbors_excluding_itself() {
        let neighbors: Vec<_> = NeighborIter::new((1, 1), (3, 3)).collect();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&(1, 1)));
    }

    #[test]
    fn single_tile_board_has_no_neighbors() {
        assert_eq!(NeighborIter::new((0, 0), (1, 1)).count(), 0);
    }

    #[test]
    fn deflatten_is_row_major() {
        assert_eq!(deflatten(6, 4), (2, 1));
        let order: Vec<_> = iter_coords((2, 2)).collect();
        assert_eq!(order, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
