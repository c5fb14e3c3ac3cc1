use proptest::prelude::*;
use std::prelude::v1::*;

use crate::*;

fn board_config() -> impl Strategy<Value = (GameConfig, u64)> {
    (1u8..=16, 1u8..=16, 0u16..300, any::<u64>())
        .prop_map(|(width, height, mines, seed)| (GameConfig::new((width, height), mines), seed))
}

fn brute_force_count(board: &Board, coords: Coord2) -> u8 {
    NeighborIter::new(coords, board.size())
        .filter(|&pos| board.mine_layout().contains_mine(pos))
        .count() as u8
}

fn assert_adjacency_exact(board: &Board) {
    for coords in iter_coords(board.size()) {
        assert_eq!(
            board.adjacent_mines_at(coords),
            brute_force_count(board, coords),
            "adjacency at {:?}",
            coords
        );
    }
}

fn unrevealed(board: &Board) -> Vec<Coord2> {
    iter_coords(board.size())
        .filter(|&coords| board.tile_at(coords).is_unrevealed())
        .collect()
}

proptest! {
    #[test]
    fn initialize_places_clamped_mine_count((config, seed) in board_config(), requested in 0u16..300) {
        let mut board = Board::new(config, seed);
        board.initialize(GameConfig::new(config.size, requested));

        let expected = requested.min(config.total_cells() - 1);
        prop_assert_eq!(board.total_mines(), expected);
        prop_assert_eq!(board.mine_layout().iter_mines().count(), usize::from(expected));
        prop_assert_eq!(board.state(), GameState::NotStarted);
        prop_assert!(iter_coords(board.size()).all(|c| board.tile_at(c) == TileState::Covered));
        assert_adjacency_exact(&board);
    }

    #[test]
    fn first_click_is_never_a_mine((config, seed) in board_config(), pick in any::<(u8, u8)>()) {
        let mut board = Board::new(config, seed);
        let coords = (pick.0 % config.size.0, pick.1 % config.size.1);
        let mines_before = board.total_mines();

        let outcome = board.interact(coords, Button::Primary);

        prop_assert!(matches!(outcome, InteractOutcome::Revealed | InteractOutcome::Won));
        prop_assert!(!board.mine_layout().contains_mine(coords));
        prop_assert_eq!(board.total_mines(), mines_before);
        prop_assert_eq!(board.mine_layout().iter_mines().count(), usize::from(mines_before));
        prop_assert_ne!(board.state(), GameState::Lost);
        assert_adjacency_exact(&board);
    }

    #[test]
    fn flood_fill_reveals_closed_region_once((config, seed) in board_config(), pick in any::<(u8, u8)>()) {
        let mut board = Board::new(config, seed);
        let coords = (pick.0 % config.size.0, pick.1 % config.size.1);
        board.interact(coords, Button::Primary);

        for tile in iter_coords(board.size()) {
            if board.tile_at(tile) == TileState::Uncovered && board.adjacent_mines_at(tile) == 0 {
                prop_assert!(
                    NeighborIter::new(tile, board.size())
                        .all(|pos| board.tile_at(pos) == TileState::Uncovered),
                    "zero tile {:?} borders a covered tile", tile
                );
            }
            prop_assert_eq!(board.flood_fill(tile), 0);
        }
    }

    #[test]
    fn terminal_states_match_board_contents(
        (config, seed) in board_config(),
        moves in proptest::collection::vec((any::<(u8, u8)>(), any::<bool>()), 1..60),
    ) {
        let mut board = Board::new(config, seed);

        for (pick, primary) in moves {
            let coords = (pick.0 % config.size.0, pick.1 % config.size.1);
            let button = if primary { Button::Primary } else { Button::Secondary };
            board.interact(coords, button);

            let mine_uncovered = board
                .mine_layout()
                .iter_mines()
                .any(|c| board.tile_at(c) == TileState::Uncovered);
            let only_mines_left = unrevealed(&board) == board.mine_layout().iter_mines().collect::<Vec<_>>();

            match board.state() {
                GameState::Lost => prop_assert!(mine_uncovered),
                GameState::Won => prop_assert!(only_mines_left && !mine_uncovered),
                _ => prop_assert!(!mine_uncovered && !only_mines_left),
            }
            assert_adjacency_exact(&board);
        }
    }
}
