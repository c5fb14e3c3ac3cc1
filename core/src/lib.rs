#![no_std]

extern crate alloc;
#[cfg(test)]
#[macro_use]
extern crate std;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod tile;
mod types;

#[cfg(test)]
mod properties;

/// Board dimensions and mine count. Always leaves at least one safe tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const BEGINNER: Self = Self::new_unchecked((9, 9), 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked((16, 16), 40);
    pub const EXPERT: Self = Self::new_unchecked((30, 16), 99);

    pub(crate) const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps both dimensions to at least 1 and the mine count to `total - 1`.
    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Self {
        let size_x = size_x.max(1);
        let size_y = size_y.max(1);
        let max_mines = mult(size_x, size_y) - 1;
        if mines > max_mines {
            log::debug!("Clamping mine count {} to {}", mines, max_mines);
        }
        Self::new_unchecked((size_x, size_y), mines.min(max_mines))
    }

    /// Like [`GameConfig::new`] but rejects empty boards instead of growing them.
    pub fn try_new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidDimensions);
        }
        Ok(Self::new(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::INTERMEDIATE
    }
}

/// Mine bitmap plus the adjacency count of every tile, kept in sync.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        let adjacent = Array2::default(mine_mask.dim());
        let mut layout = Self {
            mine_mask,
            adjacent,
            mine_count,
        };
        layout.recount();
        layout
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidDimensions);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let layout = Self::from_mine_mask(mine_mask);
        if layout.mine_count >= layout.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.mine_mask.dim();
        (x as Coord, y as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.to_nd_index()]
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size()).filter(|&coords| self[coords])
    }

    /// Moves the mine at `from` to the lowest-index tile that is neither a mine nor `from`.
    ///
    /// Returns the new position, or `None` when `from` holds no mine.
    pub(crate) fn relocate_mine(&mut self, from: Coord2) -> Option<Coord2> {
        if !self[from] {
            return None;
        }

        let target = iter_coords(self.size()).find(|&coords| coords != from && !self[coords])?;
        self.mine_mask[from.to_nd_index()] = false;
        self.mine_mask[target.to_nd_index()] = true;
        self.recount();
        Some(target)
    }

    fn recount(&mut self) {
        for coords in iter_coords(self.size()) {
            let count = self
                .iter_neighbors(coords)
                .filter(|&pos| self[pos])
                .count();
            self.adjacent[coords.to_nd_index()] = count as u8;
        }
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

/// What a single interaction did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InteractOutcome {
    NoChange,
    /// A flag was placed or removed.
    Marked,
    Revealed,
    HitMine,
    Won,
}

impl InteractOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}
