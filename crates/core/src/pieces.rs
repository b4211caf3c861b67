//! Pieces module - tetromino geometry, movement and rotation kicks
//!
//! Every piece kind is described per rotation state by an explicit table of
//! four `(row, col)` offsets from the piece anchor. There is no shared
//! "rotate around a pivot" transform: the anchor of each kind means something
//! different (the O anchor is its bottom-left square, the I anchor the second
//! square from the left, the others the bottom-middle square of the spawn
//! shape) and the I piece additionally moves its anchor on every rotation.
//!
//! Rotations near a boundary are kicked back inside the grid instead of being
//! rejected, following the kick rule of the kind:
//!
//! | Kind | Wall kick | Floor kick |
//! |------|-----------|------------|
//! | I, S, Z, T | yes | yes |
//! | J, L | yes | no |
//! | O | never rotates | |
//!
//! A kicked placement must still be collision-free, otherwise the rotation is
//! a no-op.

use arrayvec::ArrayVec;

use crate::board::Grid;
use crate::types::{PieceKind, Pos, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// Offset of a single mino from the piece anchor, `(row, col)`
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the anchor
pub type PieceShape = [MinoOffset; 4];

/// Up to four grid positions
pub type Cells = ArrayVec<Pos, 4>;

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// I piece shapes, anchor is the second square from the left when flat
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, -1), (0, 0), (0, 1), (0, 2)],
        Rotation::East => [(-1, 0), (0, 0), (1, 0), (2, 0)],
        Rotation::South => [(0, -2), (0, -1), (0, 0), (0, 1)],
        Rotation::West => [(-2, 0), (-1, 0), (0, 0), (1, 0)],
    }
}

/// O piece shapes (same for all rotations), anchor is the bottom-left square
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(0, 0), (-1, 0), (-1, 1), (0, 1)]
}

fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(-1, 0), (0, -1), (0, 0), (0, 1)],
        Rotation::East => [(-1, 0), (0, 0), (0, 1), (1, 0)],
        Rotation::South => [(0, -1), (0, 0), (0, 1), (1, 0)],
        Rotation::West => [(-1, 0), (0, -1), (0, 0), (1, 0)],
    }
}

fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(-1, 1), (-1, 0), (0, 0), (0, -1)],
        Rotation::East => [(-1, 0), (0, 0), (0, 1), (1, 1)],
        Rotation::South => [(0, 0), (0, 1), (1, -1), (1, 0)],
        Rotation::West => [(-1, -1), (0, -1), (0, 0), (1, 0)],
    }
}

fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(-1, -1), (-1, 0), (0, 0), (0, 1)],
        Rotation::East => [(-1, 1), (0, 0), (0, 1), (1, 0)],
        Rotation::South => [(0, -1), (0, 0), (1, 0), (1, 1)],
        Rotation::West => [(-1, 0), (0, -1), (0, 0), (1, -1)],
    }
}

/// J piece shapes, spawns like |_ _ _
fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(-1, -1), (0, -1), (0, 0), (0, 1)],
        Rotation::East => [(-1, 0), (-1, 1), (0, 0), (1, 0)],
        Rotation::South => [(0, -1), (0, 0), (0, 1), (1, 1)],
        Rotation::West => [(-1, 0), (0, 0), (1, 0), (1, -1)],
    }
}

/// L piece shapes, spawns like _ _ _|
fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(-1, 1), (0, -1), (0, 0), (0, 1)],
        Rotation::East => [(-1, 0), (0, 0), (1, 0), (1, 1)],
        Rotation::South => [(0, -1), (0, 0), (0, 1), (1, -1)],
        Rotation::West => [(-1, -1), (-1, 0), (0, 0), (1, 0)],
    }
}

/// Spawn anchor `(x, y)` for a piece kind
pub fn spawn_anchor(kind: PieceKind) -> (i8, i8) {
    match kind {
        PieceKind::I => (4, 1),
        _ => (4, 2),
    }
}

/// Anchor translation `(dx, dy)` applied before kicks when rotating away
/// from `from`. Only the I piece walks its anchor around.
fn rotation_shift(kind: PieceKind, from: Rotation, clockwise: bool) -> (i8, i8) {
    if kind != PieceKind::I {
        return (0, 0);
    }

    match (from, clockwise) {
        (Rotation::North, true) => (1, 0),
        (Rotation::East, true) => (0, 1),
        (Rotation::South, true) => (-1, 0),
        (Rotation::West, true) => (0, -1),
        (Rotation::North, false) => (0, 1),
        (Rotation::West, false) => (1, 0),
        (Rotation::South, false) => (0, -1),
        (Rotation::East, false) => (-1, 0),
    }
}

/// Which boundaries a rotation may be kicked away from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KickRule {
    /// Shift sideways off the left/right walls
    pub wall: bool,
    /// Shift upwards off the floor
    pub floor: bool,
}

/// Get the kick rule for a piece kind
pub fn kick_rule(kind: PieceKind) -> KickRule {
    match kind {
        PieceKind::I | PieceKind::S | PieceKind::Z | PieceKind::T => KickRule {
            wall: true,
            floor: true,
        },
        PieceKind::J | PieceKind::L => KickRule {
            wall: true,
            floor: false,
        },
        PieceKind::O => KickRule {
            wall: false,
            floor: false,
        },
    }
}

/// Absolute cells of a shape placed at anchor `(x, y)`
pub fn cells_at(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> [Pos; 4] {
    get_shape(kind, rotation).map(|(dr, dc)| Pos::new(y + dr, x + dc))
}

/// Cells vacated and occupied by one successful transformation.
///
/// Cells shared by the old and new placement appear in neither list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub vacated: Cells,
    pub occupied: Cells,
}

impl Delta {
    fn between(old: &[Pos; 4], new: &[Pos; 4]) -> Self {
        Self {
            vacated: old.iter().filter(|p| !new.contains(p)).copied().collect(),
            occupied: new.iter().filter(|p| !old.contains(p)).copied().collect(),
        }
    }
}

/// The falling tetromino
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    x: i8,
    y: i8,
    rotation: Rotation,
    landed: bool,
}

impl Piece {
    /// Create a new piece at its spawn anchor
    pub fn new(kind: PieceKind) -> Self {
        let (x, y) = spawn_anchor(kind);
        Self {
            kind,
            x,
            y,
            rotation: Rotation::North,
            landed: false,
        }
    }

    /// Create a piece at an explicit anchor and orientation (remote mirrors)
    pub fn placed(kind: PieceKind, x: i8, y: i8, rotation: Rotation) -> Self {
        Self {
            kind,
            x,
            y,
            rotation,
            landed: false,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn landed(&self) -> bool {
        self.landed
    }

    /// Once set the piece stays landed.
    pub(crate) fn mark_landed(&mut self) {
        self.landed = true;
    }

    /// Cells covered by the current placement
    pub fn cells(&self) -> [Pos; 4] {
        cells_at(self.kind, self.rotation, self.x, self.y)
    }

    /// Cells of the initial placement at the top of the board
    pub fn spawn(&self) -> [Pos; 4] {
        let (x, y) = spawn_anchor(self.kind);
        cells_at(self.kind, Rotation::North, x, y)
    }

    /// True if every cell is inside the grid and either empty or already
    /// covered by this piece.
    fn fits(&self, grid: &Grid, cells: &[Pos; 4]) -> bool {
        let own = self.cells();
        cells
            .iter()
            .all(|p| p.in_bounds() && (own.contains(p) || !grid.is_occupied(*p)))
    }

    fn shift(&mut self, grid: &Grid, dx: i8) -> Option<Delta> {
        let old = self.cells();
        let new = cells_at(self.kind, self.rotation, self.x + dx, self.y);
        if !self.fits(grid, &new) {
            return None;
        }

        self.x += dx;
        Some(Delta::between(&old, &new))
    }

    /// Move one column left; `None` if blocked by the wall or another cell
    pub fn move_left(&mut self, grid: &Grid) -> Option<Delta> {
        self.shift(grid, -1)
    }

    /// Move one column right; `None` if blocked by the wall or another cell
    pub fn move_right(&mut self, grid: &Grid) -> Option<Delta> {
        self.shift(grid, 1)
    }

    pub fn rotate_clockwise(&mut self, grid: &Grid) -> Option<Delta> {
        self.rotate(grid, true)
    }

    pub fn rotate_anticlockwise(&mut self, grid: &Grid) -> Option<Delta> {
        self.rotate(grid, false)
    }

    fn rotate(&mut self, grid: &Grid, clockwise: bool) -> Option<Delta> {
        if self.kind == PieceKind::O {
            self.rotation = Rotation::North;
            return None;
        }

        let target = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
        let (dx, dy) = rotation_shift(self.kind, self.rotation, clockwise);
        let (x, y) = kick(self.kind, target, self.x + dx, self.y + dy)?;

        let old = self.cells();
        let new = cells_at(self.kind, target, x, y);
        if !self.fits(grid, &new) {
            return None;
        }

        self.x = x;
        self.y = y;
        self.rotation = target;
        Some(Delta::between(&old, &new))
    }

    /// True if moving down one row would leave the grid or hit another cell.
    pub fn has_landed(&self, grid: &Grid) -> bool {
        let below = self.cells().map(|p| Pos::new(p.row + 1, p.col));
        !self.fits(grid, &below)
    }

    /// Move down one row unconditionally. Callers check [`Piece::has_landed`]
    /// first.
    pub fn fall(&mut self) -> Delta {
        let old = self.cells();
        self.y += 1;
        Delta::between(&old, &self.cells())
    }
}

/// Shift a rotated placement back inside the grid according to the kind's
/// kick rule. `None` if the placement cannot be made to fit.
fn kick(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Option<(i8, i8)> {
    let rule = kick_rule(kind);
    let cells = cells_at(kind, rotation, x, y);

    let min_col = cells.iter().map(|p| p.col).min()?;
    let max_col = cells.iter().map(|p| p.col).max()?;
    let min_row = cells.iter().map(|p| p.row).min()?;
    let max_row = cells.iter().map(|p| p.row).max()?;

    let right_wall = BOARD_WIDTH as i8 - 1;
    let floor = BOARD_HEIGHT as i8 - 1;

    let mut x = x;
    let mut y = y;

    if min_col < 0 || max_col > right_wall {
        if !rule.wall {
            return None;
        }
        if min_col < 0 {
            x -= min_col;
        } else {
            x -= max_col - right_wall;
        }
    }

    if max_row > floor {
        if !rule.floor {
            return None;
        }
        y -= max_row - floor;
    }

    if min_row < 0 {
        return None;
    }

    Some((x, y))
}
