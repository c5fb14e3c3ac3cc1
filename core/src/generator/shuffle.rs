use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Uniform placement: shuffles every flattened tile index and mines the first `mines` of them.
///
/// The RNG is owned and advanced by every call, so one seed reproduces a whole sequence of
/// boards rather than a single one.
#[derive(Clone, Debug)]
pub struct ShuffleLayoutGenerator {
    rng: SmallRng,
}

impl ShuffleLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl LayoutGenerator for ShuffleLayoutGenerator {
    fn generate(&mut self, config: GameConfig) -> MineLayout {
        let config = GameConfig::new(config.size, config.mines);
        let (width, _) = config.size;

        let mut indices: Vec<usize> = (0..usize::from(config.total_cells())).collect();
        indices.shuffle(&mut self.rng);

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        for &index in indices.iter().take(config.mines.into()) {
            mine_mask[deflatten(index, width).to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        layout
    }
}
