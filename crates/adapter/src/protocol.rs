//! Protocol module - line codec for the remote scoring harness
//!
//! Every message is one line of space-separated tokens. Lines sent to the
//! agent side:
//!
//! | Line | Meaning | Reply |
//! |------|---------|-------|
//! | `INIT` | synchronise, always first | `OK` |
//! | `M` | a decision is needed | action values, e.g. `3 3 5` |
//! | `L <score> <row>...` | score is now `<score>`, remove the rows | none |
//! | `U <kind> <x> <y> <orientation> <cell>...` | active piece and cell updates | none |
//!
//! A cell update is `kind,row,col` where kind `N` means empty. An empty
//! decision is answered with `0` (no-op).

use anyhow::{bail, Context, Result};

use crate::core::{get_shape, Board, Piece};
use crate::types::{cell_str, Action, CellChange, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// Handshake request
pub const INIT: &str = "INIT";
/// Handshake reply
pub const OK: &str = "OK";
/// Decision request
pub const MOVE: &str = "M";

/// Active piece placement carried by a `U` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceUpdate {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
    pub cells: Vec<CellChange>,
}

/// A line received by the agent side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Init,
    Move,
    Lines { score: u32, rows: Vec<usize> },
    Update(PieceUpdate),
}

fn parse_num<T: std::str::FromStr>(token: Option<&str>, what: &str) -> Result<T> {
    let token = token.with_context(|| format!("missing {}", what))?;
    token
        .parse::<T>()
        .ok()
        .with_context(|| format!("invalid {}: {:?}", what, token))
}

fn parse_kind(token: &str) -> Result<PieceKind> {
    PieceKind::from_str(token).with_context(|| format!("unknown piece kind: {:?}", token))
}

/// Parse `kind,row,col`
pub fn parse_cell(token: &str) -> Result<CellChange> {
    let mut parts = token.split(',');
    let kind = parts.next().unwrap_or_default();
    let cell = if kind == "N" {
        None
    } else {
        Some(parse_kind(kind)?)
    };
    let row: u8 = parse_num(parts.next(), "cell row")?;
    let col: u8 = parse_num(parts.next(), "cell column")?;
    if parts.next().is_some() {
        bail!("malformed cell update: {:?}", token);
    }
    if row >= BOARD_HEIGHT || col >= BOARD_WIDTH {
        bail!("cell update outside the grid: {:?}", token);
    }
    Ok(CellChange { cell, row, col })
}

/// Parse one inbound line
pub fn parse_inbound(line: &str) -> Result<Inbound> {
    let mut tokens = line.split_whitespace();
    let Some(tag) = tokens.next() else {
        bail!("empty message");
    };

    match tag {
        INIT => Ok(Inbound::Init),
        MOVE => Ok(Inbound::Move),
        "L" => {
            let score = parse_num(tokens.next(), "score")?;
            let rows = tokens
                .map(|t| parse_num::<usize>(Some(t), "row index"))
                .collect::<Result<Vec<_>>>()?;
            if let Some(row) = rows.iter().find(|&&r| r >= BOARD_HEIGHT as usize) {
                bail!("cannot clear row {} outside the grid", row);
            }
            Ok(Inbound::Lines { score, rows })
        }
        "U" => {
            let kind = parse_kind(tokens.next().context("missing piece kind")?)?;
            let x = parse_num(tokens.next(), "piece x")?;
            let y = parse_num(tokens.next(), "piece y")?;
            let index: u8 = parse_num(tokens.next(), "orientation")?;
            let rotation = Rotation::from_index(index)
                .with_context(|| format!("invalid orientation: {}", index))?;
            check_placement(kind, rotation, x, y)?;
            let cells = tokens.map(parse_cell).collect::<Result<Vec<_>>>()?;
            Ok(Inbound::Update(PieceUpdate {
                kind,
                x,
                y,
                rotation,
                cells,
            }))
        }
        other => bail!("unknown message type: {:?}", other),
    }
}

/// Every cell of the piece at anchor `(x, y)` must lie on the grid.
fn check_placement(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Result<()> {
    let fits = get_shape(kind, rotation).iter().all(|&(dr, dc)| {
        let row = i16::from(y) + i16::from(dr);
        let col = i16::from(x) + i16::from(dc);
        (0..i16::from(BOARD_HEIGHT)).contains(&row) && (0..i16::from(BOARD_WIDTH)).contains(&col)
    });
    if !fits {
        bail!(
            "{} piece at ({}, {}) orientation {} is off the grid",
            kind.as_str(),
            x,
            y,
            rotation.index()
        );
    }
    Ok(())
}

/// Reply to `M`: action values separated by spaces, `0` when empty
pub fn encode_decision(actions: &[Action]) -> String {
    if actions.is_empty() {
        return Action::Noop.value().to_string();
    }
    actions
        .iter()
        .map(|a| a.value().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a reply to `M`. Unknown values are fatal.
pub fn parse_decision(line: &str) -> Result<Vec<Action>> {
    let actions = line
        .split_whitespace()
        .map(|t| {
            let value: u8 = parse_num(Some(t), "action value")?;
            Action::from_u8(value).with_context(|| format!("unknown action value: {}", value))
        })
        .collect::<Result<Vec<_>>>()?;
    if actions.is_empty() {
        bail!("empty decision");
    }
    Ok(actions)
}

/// `L <score> <row>...`
pub fn encode_lines(score: u32, rows: &[usize]) -> String {
    let mut line = format!("L {}", score);
    for row in rows {
        line.push(' ');
        line.push_str(&row.to_string());
    }
    line
}

fn push_cell(line: &mut String, change: &CellChange) {
    line.push(' ');
    line.push_str(cell_str(change.cell));
    line.push(',');
    line.push_str(&change.row.to_string());
    line.push(',');
    line.push_str(&change.col.to_string());
}

/// `U <kind> <x> <y> <orientation> <cell>...`
pub fn encode_update(piece: &Piece, changes: &[CellChange]) -> String {
    let mut line = format!(
        "U {} {} {} {}",
        piece.kind().as_str(),
        piece.x(),
        piece.y(),
        piece.rotation().index()
    );
    for change in changes {
        push_cell(&mut line, change);
    }
    line
}

/// The whole board as a `U` line, every cell included, so that a fresh mirror
/// reconstructs it exactly. `None` if the board has no active piece.
pub fn encode_full_state(board: &Board) -> Option<String> {
    let piece = board.piece()?;
    let changes: Vec<CellChange> = board
        .grid()
        .cells()
        .iter()
        .enumerate()
        .map(|(idx, cell)| CellChange {
            cell: *cell,
            row: (idx / BOARD_WIDTH as usize) as u8,
            col: (idx % BOARD_WIDTH as usize) as u8,
        })
        .collect();
    Some(encode_update(piece, &changes))
}

/// Agent-side mirror of the harness's game
#[derive(Debug, Clone, Default)]
pub struct RemoteState {
    board: Board,
    score: u32,
}

impl RemoteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Apply a state-update message. `Init` and `Move` carry no state and
    /// are ignored here.
    /// Apply a parsed line. Placements are assumed to come from
    /// [`parse_inbound`], which rejects pieces off the grid.
    pub fn apply(&mut self, inbound: &Inbound) {
        match inbound {
            Inbound::Init | Inbound::Move => {}
            Inbound::Lines { score, rows } => {
                self.score = *score;
                self.board.clear_lines(rows);
            }
            Inbound::Update(update) => {
                self.board.set_piece(Piece::placed(
                    update.kind,
                    update.x,
                    update.y,
                    update.rotation,
                ));
                for change in &update.cells {
                    self.board
                        .set(change.row as i8, change.col as i8, change.cell);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_messages() {
        assert_eq!(parse_inbound("INIT").unwrap(), Inbound::Init);
        assert_eq!(parse_inbound("M").unwrap(), Inbound::Move);
        assert_eq!(
            parse_inbound("L 350 20 19").unwrap(),
            Inbound::Lines {
                score: 350,
                rows: vec![20, 19]
            }
        );
    }

    #[test]
    fn test_parse_update() {
        let msg = parse_inbound("U T 4 2 1 T,1,4 N,2,3").unwrap();
        let Inbound::Update(update) = msg else {
            panic!("expected update");
        };
        assert_eq!(update.kind, PieceKind::T);
        assert_eq!((update.x, update.y), (4, 2));
        assert_eq!(update.rotation, Rotation::East);
        assert_eq!(
            update.cells,
            vec![
                CellChange {
                    cell: Some(PieceKind::T),
                    row: 1,
                    col: 4
                },
                CellChange {
                    cell: None,
                    row: 2,
                    col: 3
                },
            ]
        );
    }

    #[test]
    fn test_malformed_lines_are_errors() {
        assert!(parse_inbound("").is_err());
        assert!(parse_inbound("MOVE").is_err());
        assert!(parse_inbound("L").is_err());
        assert!(parse_inbound("L 100 21").is_err());
        assert!(parse_inbound("U X 4 2 0").is_err());
        assert!(parse_inbound("U T 4 2 4").is_err());
        assert!(parse_inbound("U T 4 2 0 T,1").is_err());
        assert!(parse_inbound("U T 4 2 0 T,1,10").is_err());

        // anchors that put the piece off the grid
        assert!(parse_inbound("U O 0 0 0").is_err());
        assert!(parse_inbound("U I 127 5 0").is_err());
        assert!(parse_inbound("U I -128 -128 2").is_err());
        assert!(parse_inbound("U T 4 21 0").is_err());
        assert!(parse_inbound("U O 9 20 0").is_err());
        assert!(parse_inbound("U O 8 20 0").is_ok());
    }

    #[test]
    fn test_decision_codec() {
        assert_eq!(encode_decision(&[]), "0");
        assert_eq!(
            encode_decision(&[Action::MoveLeft, Action::MoveLeft, Action::HardDrop]),
            "3 3 5"
        );
        assert_eq!(
            parse_decision("3 3 5").unwrap(),
            vec![Action::MoveLeft, Action::MoveLeft, Action::HardDrop]
        );
        assert!(parse_decision("6").is_err());
        assert!(parse_decision("").is_err());
    }

    #[test]
    fn test_encode_lines() {
        assert_eq!(encode_lines(100, &[20]), "L 100 20");
        assert_eq!(encode_lines(0, &[]), "L 0");
    }

    #[test]
    fn test_remote_state_applies_updates() {
        let mut state = RemoteState::new();
        state.apply(&parse_inbound("U O 4 20 0 O,19,4 O,19,5 O,20,4 O,20,5").unwrap());
        assert_eq!(state.board().get(20, 4), Some(Some(PieceKind::O)));
        assert_eq!(state.board().piece().map(|p| p.kind()), Some(PieceKind::O));

        state.apply(&parse_inbound("L 100 20").unwrap());
        assert_eq!(state.score(), 100);
        assert_eq!(state.board().get(20, 4), Some(Some(PieceKind::O)));
        assert_eq!(state.board().get(19, 4), Some(None));
    }
}
