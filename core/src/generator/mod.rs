use crate::*;
pub use shuffle::*;

mod shuffle;

/// Source of fresh mine layouts for [`Board::initialize`].
pub trait LayoutGenerator {
    fn generate(&mut self, config: GameConfig) -> MineLayout;
}
