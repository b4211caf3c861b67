//! Board tests - grid access, spawning, line clearing and actions

use turn_tetris::core::{Board, Piece};
use turn_tetris::types::{Action, CellChange, PieceKind, Pos, BOARD_HEIGHT, BOARD_WIDTH};

fn fill_row_except(board: &mut Board, row: i8, gaps: &[i8]) {
    for col in 0..BOARD_WIDTH as i8 {
        if !gaps.contains(&col) {
            board.set(row, col, Some(PieceKind::Z));
        }
    }
}

fn board_with(kind: PieceKind) -> Board {
    let mut board = Board::new();
    board.set_piece(Piece::new(kind));
    assert!(board.spawn_piece());
    board
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert!(board.piece().is_none());

    for row in 0..BOARD_HEIGHT as i8 {
        for col in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(row, col), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_HEIGHT as i8, 0), None);
    assert_eq!(board.get(0, BOARD_WIDTH as i8), None);
}

#[test]
fn test_board_set_out_of_bounds() {
    let mut board = Board::new();

    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, BOARD_WIDTH as i8, Some(PieceKind::T)));
    assert!(board.set(20, 9, Some(PieceKind::T)));
}

#[test]
fn test_spawn_writes_o_piece_cells() {
    let board = board_with(PieceKind::O);

    // Anchor (x, y) = (4, 2): cells (y,x), (y-1,x), (y-1,x+1), (y,x+1)
    for (row, col) in [(2, 4), (1, 4), (1, 5), (2, 5)] {
        assert_eq!(board.get(row, col), Some(Some(PieceKind::O)));
    }
    assert_eq!(board.grid().occupied_count(), 4);
}

#[test]
fn test_blocked_spawn_marks_landed_and_leaves_grid() {
    let mut board = Board::new();
    board.set(2, 4, Some(PieceKind::L));
    let before = board.snapshot();

    board.set_piece(Piece::new(PieceKind::O));
    assert!(!board.spawn_piece());
    assert!(board.piece().unwrap().landed());
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_game_running_checks_row_one_only() {
    let mut board = Board::new();
    assert!(board.is_game_running());

    board.set(0, 3, Some(PieceKind::I));
    assert!(board.is_game_running());

    board.set(1, 3, Some(PieceKind::I));
    assert!(!board.is_game_running());
}

#[test]
fn test_get_changes_reports_cell_values() {
    let mut board = Board::new();
    board.set(20, 0, Some(PieceKind::S));
    let before = board.snapshot();

    board.set(20, 0, None);
    board.set(5, 7, Some(PieceKind::J));

    assert_eq!(
        board.get_changes(&before),
        vec![
            CellChange {
                cell: Some(PieceKind::J),
                row: 5,
                col: 7
            },
            CellChange {
                cell: None,
                row: 20,
                col: 0
            },
        ]
    );
    assert!(board.get_changes(&board.snapshot()).is_empty());
}

#[test]
fn test_find_lines_bottom_first() {
    let mut board = Board::new();
    fill_row_except(&mut board, 20, &[]);
    fill_row_except(&mut board, 17, &[]);
    fill_row_except(&mut board, 18, &[4]);

    assert_eq!(board.find_lines_to_clear(), vec![20, 17]);
}

#[test]
fn test_clear_lines_scores() {
    for (count, expected) in [(1usize, 100u32), (2, 250), (3, 750), (4, 3000)] {
        let mut board = Board::new();
        for row in 0..count {
            fill_row_except(&mut board, 20 - row as i8, &[]);
        }
        let rows = board.find_lines_to_clear();
        assert_eq!(rows.len(), count);
        assert_eq!(board.clear_lines(&rows), expected);
        assert_eq!(board.grid().occupied_count(), 0);
    }

    let mut board = Board::new();
    assert_eq!(board.clear_lines(&[]), 0);
}

#[test]
fn test_clear_lines_keeps_dimensions_and_drops_rows() {
    let mut board = Board::new();
    fill_row_except(&mut board, 20, &[]);
    board.set(19, 1, Some(PieceKind::T));
    board.set(10, 8, Some(PieceKind::I));

    board.clear_lines(&[20]);

    assert_eq!(board.grid().rows().count(), BOARD_HEIGHT as usize);
    assert!(board.grid().rows().all(|r| r.len() == BOARD_WIDTH as usize));
    assert_eq!(board.get(20, 1), Some(Some(PieceKind::T)));
    assert_eq!(board.get(11, 8), Some(Some(PieceKind::I)));
    assert!(board.grid().is_row_empty(0));
}

#[test]
#[should_panic]
fn test_clear_lines_rejects_rows_outside_grid() {
    let mut board = Board::new();
    board.clear_lines(&[BOARD_HEIGHT as usize]);
}

#[test]
fn test_i_piece_completes_row() {
    let mut board = Board::new();
    // The I piece spawns over columns 3-6.
    fill_row_except(&mut board, 20, &[3, 4, 5, 6]);
    board.set_piece(Piece::new(PieceKind::I));
    assert!(board.spawn_piece());

    board.apply_action(Action::HardDrop);

    assert!(board.piece().unwrap().landed());
    assert_eq!(board.find_lines_to_clear(), vec![20]);
    assert_eq!(board.clear_lines(&[20]), 100);
    assert_eq!(board.grid().occupied_count(), 0);
}

#[test]
fn test_every_action_but_drop_falls_once() {
    for action in [
        Action::Noop,
        Action::RotateAnticlockwise,
        Action::RotateClockwise,
        Action::MoveLeft,
        Action::MoveRight,
    ] {
        let mut board = board_with(PieceKind::T);
        board.apply_action(action);
        assert_eq!(board.piece().unwrap().y(), 3, "{:?}", action);
    }
}

#[test]
fn test_move_left_shifts_piece() {
    let mut board = board_with(PieceKind::T);
    board.apply_action(Action::MoveLeft);

    let piece = board.piece().unwrap();
    assert_eq!(piece.x(), 3);
    for pos in piece.cells() {
        assert_eq!(board.grid().get(pos), Some(Some(PieceKind::T)));
    }
    assert_eq!(board.grid().occupied_count(), 4);
}

#[test]
fn test_noop_rests_on_first_blocked_row() {
    let mut board = board_with(PieceKind::T);
    board.set(15, 4, Some(PieceKind::O));

    let mut turns = 0;
    while !board.piece().unwrap().landed() {
        board.apply_action(Action::Noop);
        turns += 1;
        assert!(turns < 30);
    }

    // Flat side of T covers row y, the obstacle sits directly below column 4.
    assert_eq!(board.piece().unwrap().y(), 14);
    assert_eq!(board.get(14, 4), Some(Some(PieceKind::T)));
}

#[test]
fn test_j_rotates_back_to_spawn() {
    let mut board = board_with(PieceKind::J);
    let spawn_cells = board.piece().unwrap().cells();
    let spawn_grid = board.snapshot();

    for _ in 0..4 {
        board.rotate_piece_clockwise();
    }

    let piece = board.piece().unwrap();
    assert_eq!(piece.rotation().index(), 0);
    assert_eq!(piece.cells(), spawn_cells);
    assert_eq!(board.snapshot(), spawn_grid);
}

#[test]
fn test_with_moves_stops_at_landing() {
    let board = board_with(PieceKind::O);
    let dropped = board.with_moves(&[Action::HardDrop, Action::MoveLeft, Action::MoveLeft]);

    let piece = dropped.piece().unwrap();
    assert!(piece.landed());
    assert_eq!(piece.x(), 4);
    assert_eq!(piece.y(), 20);

    // Live board untouched
    assert_eq!(board.piece().unwrap().y(), 2);
    assert!(!board.piece().unwrap().landed());
}

#[test]
fn test_with_move_is_independent_copy() {
    let board = board_with(PieceKind::S);
    let original = board.clone();

    let mut moved = board.with_move(Action::MoveRight);
    moved.set(20, 0, Some(PieceKind::I));

    assert_eq!(board, original);
    assert_ne!(moved, original);
}

#[test]
#[should_panic(expected = "outside the grid")]
fn test_update_board_outside_grid_panics() {
    let mut board = board_with(PieceKind::O);
    board.update_board(&[Pos::new(-1, 0)], &[]);
}
