use alloc::collections::VecDeque;
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - NotStarted -> Ongoing (first successful reveal)
/// - Ongoing -> Won
/// - Ongoing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    NotStarted,
    Ongoing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// The whole game: mine layout, per-tile state and the game-state machine.
///
/// Read-only queries are meant to be polled by a presentation layer, which also translates its
/// input events into board coordinates before calling [`Board::interact`] or
/// [`Board::telegraph`].
#[derive(Clone, Debug)]
pub struct Board {
    config: GameConfig,
    layout: MineLayout,
    tiles: Array2<TileState>,
    flagged_count: CellCount,
    state: GameState,
    last_interacted: Option<Coord2>,
    telegraphed: HashSet<Coord2>,
    generator: ShuffleLayoutGenerator,
}

impl Board {
    /// Creates a board with a random layout drawn from `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut generator = ShuffleLayoutGenerator::new(seed);
        let config = GameConfig::new(config.size, config.mines);
        let layout = generator.generate(config);
        log::debug!(
            "New board {}x{} with {} mines",
            config.size.0,
            config.size.1,
            config.mines
        );
        Self::with_generator(layout, generator)
    }

    /// Creates a board around a known layout; `seed` only affects later re-initialisation.
    pub fn from_layout(layout: MineLayout, seed: u64) -> Self {
        Self::with_generator(layout, ShuffleLayoutGenerator::new(seed))
    }

    fn with_generator(layout: MineLayout, generator: ShuffleLayoutGenerator) -> Self {
        let size = layout.size();
        Self {
            config: layout.game_config(),
            layout,
            tiles: Array2::default(size.to_nd_index()),
            flagged_count: 0,
            state: GameState::default(),
            last_interacted: None,
            telegraphed: HashSet::new(),
            generator,
        }
    }

    /// Discards the current game and starts a fresh one with a new random layout.
    pub fn initialize(&mut self, config: GameConfig) {
        let config = GameConfig::new(config.size, config.mines);
        log::debug!(
            "Initializing board {}x{} with {} mines",
            config.size.0,
            config.size.1,
            config.mines
        );

        self.layout = self.generator.generate(config);
        self.config = self.layout.game_config();
        self.tiles = Array2::default(config.size.to_nd_index());
        self.flagged_count = 0;
        self.state = GameState::NotStarted;
        self.last_interacted = None;
        self.telegraphed.clear();
    }

    /// Re-initialises with the current configuration.
    pub fn restart(&mut self) {
        self.initialize(self.config);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Board dimensions in tiles.
    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus flags; negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        self.layout.mine_count() as isize - self.flagged_count as isize
    }

    /// # Panics
    ///
    /// Panics if `coords` is outside the board.
    pub fn tile_at(&self, coords: Coord2) -> TileState {
        self.tiles[coords.to_nd_index()]
    }

    /// # Panics
    ///
    /// Panics if `coords` is outside the board.
    pub fn adjacent_mines_at(&self, coords: Coord2) -> u8 {
        self.layout.adjacent_mine_count(coords)
    }

    /// Position of the most recent accepted interaction.
    pub fn last_interacted(&self) -> Option<Coord2> {
        self.last_interacted
    }

    /// Mine membership the player is allowed to know: uncovered tiles, or anything once the
    /// game is over. `false` outside the board.
    pub fn exposed_mine_at(&self, coords: Coord2) -> bool {
        let Ok(coords) = self.layout.validate_coords(coords) else {
            return false;
        };
        let exposed = self.state.is_finished() || self.tile_at(coords) == TileState::Uncovered;
        exposed && self.layout.contains_mine(coords)
    }

    /// Debug probe, only answers when built with the `mine-probe` feature.
    #[cfg(feature = "mine-probe")]
    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.layout
            .validate_coords(coords)
            .is_ok_and(|coords| self.layout.contains_mine(coords))
    }

    /// Debug probe, only answers when built with the `mine-probe` feature.
    #[cfg(not(feature = "mine-probe"))]
    pub fn has_mine_at(&self, _coords: Coord2) -> bool {
        false
    }

    #[cfg(test)]
    pub(crate) fn mine_layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn is_telegraphed(&self, coords: Coord2) -> bool {
        self.telegraphed.contains(&coords)
    }

    pub fn telegraphed(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.telegraphed.iter().copied()
    }

    /// Whether a primary press on `coords` would chord.
    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        self.state == GameState::Ongoing
            && self.layout.validate_coords(coords).is_ok()
            && self.tile_at(coords) == TileState::Uncovered
            && self.adjacent_mines_at(coords) == self.count_flagged_neighbors(coords)
    }

    /// Applies a button press at `coords`. Invalid input and finished games are ignored.
    pub fn interact(&mut self, coords: Coord2, button: Button) -> InteractOutcome {
        self.try_interact(coords, button).unwrap_or_else(|err| {
            log::trace!("Ignored {:?} at {:?}: {}", button, coords, err);
            InteractOutcome::NoChange
        })
    }

    pub fn try_interact(&mut self, coords: Coord2, button: Button) -> Result<InteractOutcome> {
        use Button::*;
        use TileState::*;

        let coords = self.layout.validate_coords(coords)?;
        if button == Middle {
            return Err(GameError::UnsupportedButton);
        }
        self.check_not_finished()?;

        self.last_interacted = Some(coords);

        let outcome = match (self.tile_at(coords), button) {
            (Covered, Primary) => {
                self.set_tile(coords, Uncovered);
                if self.state == GameState::NotStarted {
                    if let Some(target) = self.layout.relocate_mine(coords) {
                        log::debug!("Moved first-click mine from {:?} to {:?}", coords, target);
                    }
                    self.state = GameState::Ongoing;
                }
                InteractOutcome::Revealed
            }
            (Covered, Secondary) => {
                self.set_tile(coords, Flagged);
                InteractOutcome::Marked
            }
            (Uncovered, Primary) => self.chord(coords),
            (Flagged, Secondary) => {
                self.set_tile(coords, Covered);
                InteractOutcome::Marked
            }
            _ => InteractOutcome::NoChange,
        };

        if !outcome.has_update() {
            return Ok(outcome);
        }

        self.flood_fill(coords);
        Ok(self.evaluate(outcome))
    }

    /// Uncovers every covered neighbour of a satisfied number tile.
    fn chord(&mut self, coords: Coord2) -> InteractOutcome {
        if self.adjacent_mines_at(coords) != self.count_flagged_neighbors(coords) {
            return InteractOutcome::NoChange;
        }

        let covered: SmallVec<[Coord2; 8]> = self
            .layout
            .iter_neighbors(coords)
            .filter(|&pos| self.tile_at(pos) == TileState::Covered)
            .collect();
        if covered.is_empty() {
            return InteractOutcome::NoChange;
        }

        log::trace!("Chord at {:?} uncovers {:?}", coords, covered);
        for &pos in &covered {
            self.set_tile(pos, TileState::Uncovered);
            self.flood_fill(pos);
        }
        InteractOutcome::Revealed
    }

    /// Breadth-first reveal of the zero region around an uncovered, safe, zero-count tile.
    ///
    /// Returns how many tiles were uncovered; `0` when the seed does not qualify.
    pub fn flood_fill(&mut self, coords: Coord2) -> usize {
        if self.state.is_finished() || self.layout.validate_coords(coords).is_err() {
            return 0;
        }
        if self.tile_at(coords) != TileState::Uncovered
            || self.layout.contains_mine(coords)
            || self.adjacent_mines_at(coords) != 0
        {
            return 0;
        }

        let mut revealed = 0;
        let mut to_visit = VecDeque::from([coords]);
        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in self.layout.iter_neighbors(visit_coords) {
                if self.tile_at(pos) != TileState::Covered {
                    continue;
                }
                self.set_tile(pos, TileState::Uncovered);
                revealed += 1;
                if self.adjacent_mines_at(pos) == 0 {
                    to_visit.push_back(pos);
                }
            }
        }

        log::trace!("Flood fill from {:?} uncovered {} tiles", coords, revealed);
        revealed
    }

    /// Marks the tiles a press at `coords` would affect, replacing any previous preview.
    pub fn telegraph(&mut self, coords: Coord2) {
        if self.layout.validate_coords(coords).is_err() {
            return;
        }

        self.telegraphed.clear();
        match self.tile_at(coords) {
            TileState::Covered => {
                self.telegraphed.insert(coords);
            }
            TileState::Uncovered => {
                let covered = self
                    .layout
                    .iter_neighbors(coords)
                    .filter(|&pos| self.tiles[pos.to_nd_index()] == TileState::Covered);
                self.telegraphed.extend(covered);
            }
            TileState::Flagged => {}
        }
    }

    pub fn clear_telegraph(&mut self) {
        self.telegraphed.clear();
    }

    /// Loss wins over a simultaneous win.
    fn evaluate(&mut self, outcome: InteractOutcome) -> InteractOutcome {
        if self.check_lose() {
            log::debug!("Game lost at {:?}", self.last_interacted);
            self.state = GameState::Lost;
            InteractOutcome::HitMine
        } else if self.check_win() {
            log::debug!("Game won");
            self.state = GameState::Won;
            InteractOutcome::Won
        } else {
            outcome
        }
    }

    fn check_lose(&self) -> bool {
        self.layout
            .iter_mines()
            .any(|coords| self.tile_at(coords) == TileState::Uncovered)
    }

    fn check_win(&self) -> bool {
        let unrevealed = self.tiles.iter().filter(|tile| tile.is_unrevealed()).count();
        unrevealed == usize::from(self.layout.mine_count())
    }

    fn set_tile(&mut self, coords: Coord2, tile: TileState) {
        let slot = &mut self.tiles[coords.to_nd_index()];
        match (*slot, tile) {
            (TileState::Flagged, TileState::Flagged) => {}
            (TileState::Flagged, _) => self.flagged_count -= 1,
            (_, TileState::Flagged) => self.flagged_count += 1,
            _ => {}
        }
        *slot = tile;
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.layout
            .iter_neighbors(coords)
            .filter(|&pos| self.tile_at(pos) == TileState::Flagged)
            .count() as u8
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
