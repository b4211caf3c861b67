//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond conversions, making them
//! usable in any context (simulation core, presentation, wire protocol).
//!
//! # Board Dimensions
//!
//! The playfield is 21 rows by 10 columns:
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 21 rows (indexed 0-20, top to bottom)
//! - **Row 0**: headroom for rotations near the top, never shown to players
//! - **Row 1**: top playable row; any landed cell here ends the game
//!
//! # Scoring
//!
//! | Rows cleared at once | Points |
//! |----------------------|--------|
//! | 1 | 100 |
//! | 2 | 250 |
//! | 3 | 750 |
//! | 4 | 3000 |
//!
//! # Examples
//!
//! ```
//! use turn_tetris_types::{Action, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Action::from_u8(5), Some(Action::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 21);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (21 rows, row 0 is rotation headroom)
pub const BOARD_HEIGHT: u8 = 21;

/// Topmost row that counts for the game-over check
pub const TOP_PLAYABLE_ROW: u8 = 1;

/// Default number of pieces dealt per session
pub const DEFAULT_PIECE_LIMIT: usize = 1000;

/// Points for clearing N rows at once, indexed by N.
///
/// Counts outside 1..=4 cannot happen with a four-cell piece and are worth 0.
pub const LINE_CLEAR_SCORES: [u32; 5] = [0, 100, 250, 750, 3000];

/// Score for a simultaneous clear of `count` rows.
///
/// ```
/// use turn_tetris_types::line_clear_score;
///
/// assert_eq!(line_clear_score(0), 0);
/// assert_eq!(line_clear_score(4), 3000);
/// assert_eq!(line_clear_score(9), 0);
/// ```
pub fn line_clear_score(count: usize) -> u32 {
    LINE_CLEAR_SCORES.get(count).copied().unwrap_or(0)
}

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Kinds in dealing order: a uniform draw of index `n` yields `ALL[n]`.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::O,
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::L,
        PieceKind::J,
        PieceKind::T,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use turn_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("N"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "I" => Some(PieceKind::I),
            "O" => Some(PieceKind::O),
            "T" => Some(PieceKind::T),
            "S" => Some(PieceKind::S),
            "Z" => Some(PieceKind::Z),
            "J" => Some(PieceKind::J),
            "L" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Single uppercase letter used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Rotation states, clockwise from the spawn orientation.
///
/// The cycle goes: North → East → South → West → North. On the wire these are
/// the orientation indices 0, 1, 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use turn_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    ///
    /// ```
    /// use turn_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Orientation index (0-3)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Inverse of [`Rotation::index`]; `None` outside 0-3.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Rotation::North),
            1 => Some(Rotation::East),
            2 => Some(Rotation::South),
            3 => Some(Rotation::West),
            _ => None,
        }
    }
}

/// Discrete command an agent may issue for one turn.
///
/// The discriminants are the integer values used by the line protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum Action {
    Noop = 0,
    RotateAnticlockwise = 1,
    RotateClockwise = 2,
    MoveLeft = 3,
    MoveRight = 4,
    HardDrop = 5,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Noop,
        Action::RotateAnticlockwise,
        Action::RotateClockwise,
        Action::MoveLeft,
        Action::MoveRight,
        Action::HardDrop,
    ];

    /// Parse the protocol integer value
    ///
    /// ```
    /// use turn_tetris_types::Action;
    ///
    /// assert_eq!(Action::from_u8(0), Some(Action::Noop));
    /// assert_eq!(Action::from_u8(3), Some(Action::MoveLeft));
    /// assert_eq!(Action::from_u8(6), None);
    /// ```
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Protocol integer value
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// camelCase name used in event records
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Noop => "noop",
            Action::RotateAnticlockwise => "rotateAnticlockwise",
            Action::RotateClockwise => "rotateClockwise",
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::HardDrop => "hardDrop",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;

/// Wire letter for a cell; empty cells are `N`.
pub fn cell_str(cell: Cell) -> &'static str {
    cell.map(|kind| kind.as_str()).unwrap_or("N")
}

/// Grid coordinate, row first (row 0 is the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: i8,
    pub col: i8,
}

impl Pos {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Inside `[0, BOARD_HEIGHT) x [0, BOARD_WIDTH)`
    pub fn in_bounds(&self) -> bool {
        self.row >= 0
            && self.row < BOARD_HEIGHT as i8
            && self.col >= 0
            && self.col < BOARD_WIDTH as i8
    }
}

/// One cell that differs between two board snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellChange {
    pub cell: Cell,
    pub row: u8,
    pub col: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_values_match_protocol() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.value() as usize, i);
            assert_eq!(Action::from_u8(i as u8), Some(*action));
        }
    }

    #[test]
    fn rotation_index_roundtrip() {
        for i in 0..4 {
            let r = Rotation::from_index(i).unwrap();
            assert_eq!(r.index(), i);
            assert_eq!(r.rotate_cw().rotate_ccw(), r);
        }
        assert_eq!(Rotation::from_index(4), None);
    }

    #[test]
    fn piece_letters_parse_back() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(cell_str(None), "N");
        assert_eq!(cell_str(Some(PieceKind::Z)), "Z");
    }

    #[test]
    fn pos_bounds() {
        assert!(Pos::new(0, 0).in_bounds());
        assert!(Pos::new(20, 9).in_bounds());
        assert!(!Pos::new(21, 0).in_bounds());
        assert!(!Pos::new(0, -1).in_bounds());
        assert!(!Pos::new(0, 10).in_bounds());
    }
}
