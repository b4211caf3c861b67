//! Board module - manages the game grid and the active piece
//!
//! The grid is 21 rows by 10 columns, each cell empty or holding a piece kind.
//! Uses a flat array for better cache locality and cheap copies: a whole board
//! is a plain value, so look-ahead copies share nothing with the live board.
//! Coordinates: `(row, col)` with row 0 at the top; row 0 is headroom and row 1
//! is the top playable row.

use crate::pieces::{Delta, Piece};
use crate::types::{
    line_clear_score, Action, Cell, CellChange, Pos, BOARD_HEIGHT, BOARD_WIDTH, TOP_PLAYABLE_ROW,
};

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

/// Cell storage, 21 rows x 10 columns, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Cell; BOARD_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (row, col)
    #[inline(always)]
    fn index(pos: Pos) -> Option<usize> {
        if !pos.in_bounds() {
            return None;
        }
        Some(pos.row as usize * BOARD_WIDTH as usize + pos.col as usize)
    }

    /// Get cell at `pos`, `None` if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        Self::index(pos).map(|idx| self.cells[idx])
    }

    /// Set cell at `pos`. Returns false if out of bounds.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match Self::index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(Some(_)))
    }

    /// One row of cells. Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * BOARD_WIDTH as usize;
        &self.cells[start..start + BOARD_WIDTH as usize]
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        row < BOARD_HEIGHT as usize && self.row(row).iter().all(|cell| cell.is_some())
    }

    pub fn is_row_empty(&self, row: usize) -> bool {
        row < BOARD_HEIGHT as usize && self.row(row).iter().all(|cell| cell.is_none())
    }

    /// Number of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// The game board: grid plus the active piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    grid: Grid,
    piece: Option<Piece>,
}

impl Board {
    /// Create a new empty board without a piece
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            piece: None,
        }
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Active piece, `None` before the first spawn
    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    /// Cell at (row, col), `None` if out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        self.grid.get(Pos::new(row, col))
    }

    /// Overwrite a single cell. Returns false if out of bounds.
    ///
    /// This bypasses piece bookkeeping and exists for remote mirrors and
    /// test fixtures.
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        self.grid.set(Pos::new(row, col), cell)
    }

    /// Install a new active piece without placing it on the grid
    pub fn set_piece(&mut self, piece: Piece) {
        self.piece = Some(piece);
    }

    /// Copy of the grid for later diffing
    pub fn snapshot(&self) -> Grid {
        self.grid
    }

    /// True while the top playable row is empty
    pub fn is_game_running(&self) -> bool {
        self.grid.is_row_empty(TOP_PLAYABLE_ROW as usize)
    }

    /// Write the active piece's spawn cells onto the grid.
    ///
    /// If any spawn cell is already filled the piece is marked landed, the grid
    /// is left untouched and false is returned (game over).
    ///
    /// # Panics
    ///
    /// Panics if no piece has been set.
    pub fn spawn_piece(&mut self) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            panic!("spawn_piece called without an active piece");
        };

        let cells = piece.spawn();
        if cells.iter().any(|p| self.grid.is_occupied(*p)) {
            piece.mark_landed();
            return false;
        }

        self.update_board(&[], &cells);
        true
    }

    /// Every cell that differs from `previous`, top to bottom, left to right
    pub fn get_changes(&self, previous: &Grid) -> Vec<CellChange> {
        self.grid
            .cells()
            .iter()
            .zip(previous.cells())
            .enumerate()
            .filter(|(_, (now, before))| now != before)
            .map(|(idx, (now, _))| CellChange {
                cell: *now,
                row: (idx / BOARD_WIDTH as usize) as u8,
                col: (idx % BOARD_WIDTH as usize) as u8,
            })
            .collect()
    }

    /// Indices of every full row, bottom first
    pub fn find_lines_to_clear(&self) -> Vec<usize> {
        (0..BOARD_HEIGHT as usize)
            .rev()
            .filter(|&row| self.grid.is_row_full(row))
            .collect()
    }

    /// Remove the given rows, drop everything above them and refill the top
    /// with empty rows. Returns the score for the number of rows removed.
    ///
    /// # Panics
    ///
    /// Panics if an index is outside the grid.
    pub fn clear_lines(&mut self, rows: &[usize]) -> u32 {
        if rows.is_empty() {
            return 0;
        }

        let mut remove = [false; BOARD_HEIGHT as usize];
        for &row in rows {
            assert!(
                row < BOARD_HEIGHT as usize,
                "cannot clear row {} outside the grid",
                row
            );
            remove[row] = true;
        }

        let width = BOARD_WIDTH as usize;
        let mut write_row = BOARD_HEIGHT as usize;

        // Compact surviving rows towards the bottom, scanning upwards.
        for read_row in (0..BOARD_HEIGHT as usize).rev() {
            if remove[read_row] {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                let src = read_row * width;
                self.grid
                    .cells
                    .copy_within(src..src + width, write_row * width);
            }
        }

        for cell in &mut self.grid.cells[..write_row * width] {
            *cell = None;
        }

        line_clear_score(write_row)
    }

    /// Empty `vacated`, then fill `occupied` with the active piece's kind.
    ///
    /// # Panics
    ///
    /// Any coordinate outside the grid is a geometry bug and aborts.
    pub fn update_board(&mut self, vacated: &[Pos], occupied: &[Pos]) {
        for &pos in vacated {
            assert!(
                self.grid.set(pos, None),
                "vacated cell {:?} is outside the grid",
                pos
            );
        }

        if occupied.is_empty() {
            return;
        }

        let Some(kind) = self.piece.map(|p| p.kind()) else {
            panic!("update_board filling cells without an active piece");
        };
        for &pos in occupied {
            assert!(
                self.grid.set(pos, Some(kind)),
                "occupied cell {:?} is outside the grid",
                pos
            );
        }
    }

    fn apply_delta(&mut self, delta: Option<Delta>) {
        if let Some(delta) = delta {
            self.update_board(&delta.vacated, &delta.occupied);
        }
    }

    /// Run `op` against the active piece if it can still move
    fn with_active<F>(&mut self, op: F)
    where
        F: FnOnce(&mut Piece, &Grid) -> Option<Delta>,
    {
        let delta = match self.piece.as_mut() {
            Some(piece) if !piece.landed() => op(piece, &self.grid),
            _ => None,
        };
        self.apply_delta(delta);
    }

    pub fn move_piece_left(&mut self) {
        self.with_active(|piece, grid| piece.move_left(grid));
    }

    pub fn move_piece_right(&mut self) {
        self.with_active(|piece, grid| piece.move_right(grid));
    }

    pub fn rotate_piece_clockwise(&mut self) {
        self.with_active(|piece, grid| piece.rotate_clockwise(grid));
    }

    pub fn rotate_piece_anticlockwise(&mut self) {
        self.with_active(|piece, grid| piece.rotate_anticlockwise(grid));
    }

    /// Drop the active piece one row, or mark it landed if it cannot fall.
    pub fn fall(&mut self) {
        self.with_active(|piece, grid| {
            if piece.has_landed(grid) {
                piece.mark_landed();
                None
            } else {
                Some(piece.fall())
            }
        });
    }

    /// Apply one agent action.
    ///
    /// A hard drop falls until the piece lands. Every other action is tried
    /// (blocked moves are silent no-ops) and followed by exactly one fall step.
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::HardDrop => {
                while self.piece.is_some_and(|p| !p.landed()) {
                    self.fall();
                }
                return;
            }
            Action::Noop => {}
            Action::RotateAnticlockwise => self.rotate_piece_anticlockwise(),
            Action::RotateClockwise => self.rotate_piece_clockwise(),
            Action::MoveLeft => self.move_piece_left(),
            Action::MoveRight => self.move_piece_right(),
        }

        self.fall();
    }

    /// Copy of this board with one action applied
    pub fn with_move(&self, action: Action) -> Board {
        self.with_moves(&[action])
    }

    /// Copy of this board with the actions applied in order, stopping as soon
    /// as the piece lands.
    pub fn with_moves(&self, actions: &[Action]) -> Board {
        let mut board = self.clone();
        board.apply_actions(actions);
        board
    }

    /// Apply actions in order until the piece lands; returns how many were
    /// applied.
    pub fn apply_actions(&mut self, actions: &[Action]) -> usize {
        let mut applied = 0;
        for &action in actions {
            self.apply_action(action);
            applied += 1;
            if self.piece.map_or(true, |p| p.landed()) {
                break;
            }
        }
        applied
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
