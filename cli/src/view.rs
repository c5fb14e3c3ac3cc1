use chrono::prelude::*;
use serde::Serialize;
use std::fmt::Write;
use sweeper_core::{Board, Coord2, GameState, TileState, iter_coords};

use crate::session::GameSession;

/// What a tile looks like, derived from engine state the same way every frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) enum ViewTile {
    Covered,
    /// Covered, but under a held button.
    Pressed,
    Flagged,
    Revealed(u8),
    Mine,
    Detonated,
    Misflagged,
}

impl ViewTile {
    pub fn glyph(self) -> char {
        use ViewTile::*;
        match self {
            Covered => '#',
            Pressed => '_',
            Flagged => 'F',
            Revealed(0) => '.',
            Revealed(count) => char::from(b'0' + count.min(8)),
            Mine => '*',
            Detonated => 'X',
            Misflagged => '!',
        }
    }
}

pub(crate) fn tile_view(board: &Board, coords: Coord2) -> ViewTile {
    use GameState::*;

    match (board.tile_at(coords), board.state()) {
        (TileState::Covered, Won) => ViewTile::Flagged,
        (TileState::Covered, Lost) if board.exposed_mine_at(coords) => ViewTile::Mine,
        (TileState::Covered, NotStarted | Ongoing) if board.is_telegraphed(coords) => {
            ViewTile::Pressed
        }
        (TileState::Covered, _) => ViewTile::Covered,
        (TileState::Uncovered, _) if board.exposed_mine_at(coords) => {
            if board.last_interacted() == Some(coords) {
                ViewTile::Detonated
            } else {
                ViewTile::Mine
            }
        }
        (TileState::Uncovered, _) => ViewTile::Revealed(board.adjacent_mines_at(coords)),
        (TileState::Flagged, Lost) if !board.exposed_mine_at(coords) => ViewTile::Misflagged,
        (TileState::Flagged, _) => ViewTile::Flagged,
    }
}

/// Serialisable snapshot of everything the text renderer draws.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct BoardView {
    pub size: Coord2,
    pub state: GameState,
    pub mines_left: isize,
    pub elapsed_secs: u32,
    pub clicks: u32,
    /// Row-major: `rows[y][x]`.
    pub rows: Vec<Vec<ViewTile>>,
}

impl BoardView {
    pub fn capture(session: &GameSession, now: DateTime<Utc>) -> Self {
        let board = &session.board;
        let (width, height) = board.size();
        let mut rows = vec![Vec::with_capacity(width.into()); height.into()];
        for (x, y) in iter_coords(board.size()) {
            rows[usize::from(y)].push(tile_view(board, (x, y)));
        }

        Self {
            size: board.size(),
            state: board.state(),
            mines_left: board.mines_left(),
            elapsed_secs: session.elapsed_secs(now),
            clicks: session.click_count,
            rows,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("   ");
        for x in 0..self.size.0 {
            let _ = write!(out, "{:>3}", x);
        }
        out.push('\n');

        for (y, row) in self.rows.iter().enumerate() {
            let _ = write!(out, "{:>3}", y);
            for tile in row {
                let _ = write!(out, "{:>3}", tile.glyph());
            }
            out.push('\n');
        }

        let status = match self.state {
            GameState::NotStarted => "ready",
            GameState::Ongoing => "playing",
            GameState::Won => "won",
            GameState::Lost => "lost",
        };
        let _ = write!(
            out,
            "{}  mines: {}  time: {}s  clicks: {}",
            status, self.mines_left, self.elapsed_secs, self.clicks
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{Button, MineLayout};

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        GameSession::new(Board::from_layout(layout, 0))
    }

    #[test]
    fn loss_shows_detonated_mine_and_misflags() {
        let mut session = session((2, 2), &[(0, 0), (0, 1)]);

        session.release((1, 1), Button::Primary, t0());
        session.release((1, 0), Button::Secondary, t0());
        session.release((0, 0), Button::Primary, t0());

        let board = &session.board;
        assert_eq!(board.state(), GameState::Lost);
        assert_eq!(tile_view(board, (0, 0)), ViewTile::Detonated);
        assert_eq!(tile_view(board, (0, 1)), ViewTile::Mine);
        assert_eq!(tile_view(board, (1, 0)), ViewTile::Misflagged);
        assert_eq!(tile_view(board, (1, 1)), ViewTile::Revealed(2));
    }

    #[test]
    fn win_shows_remaining_tiles_as_flags() {
        let mut session = session((2, 1), &[(0, 0)]);

        session.release((1, 0), Button::Primary, t0());

        assert_eq!(tile_view(&session.board, (0, 0)), ViewTile::Flagged);
    }

    #[test]
    fn held_button_presses_covered_tiles() {
        let mut session = session((3, 3), &[(0, 0)]);

        session.hold((2, 2));

        assert_eq!(tile_view(&session.board, (2, 2)), ViewTile::Pressed);
        assert_eq!(tile_view(&session.board, (1, 1)), ViewTile::Covered);
    }

    #[test]
    fn render_draws_headers_grid_and_status() {
        let mut session = session((3, 1), &[(2, 0)]);
        session.release((0, 0), Button::Primary, t0());

        let text = BoardView::capture(&session, t0()).render();

        assert_eq!(
            text,
            "     0  1  2\n  0  .  1  F\nwon  mines: 1  time: 0s  clicks: 1"
        );
    }
}
