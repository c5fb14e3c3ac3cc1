use serde::{Deserialize, Serialize};

/// Player-visible state of a single tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    #[default]
    Covered,
    Uncovered,
    Flagged,
}

impl TileState {
    /// Covered or flagged, i.e. still hiding its content.
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged)
    }
}

/// Pointer button as delivered by the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    /// Reveal, or chord on an uncovered tile.
    Primary,
    /// Toggle a flag.
    Secondary,
    Middle,
}
