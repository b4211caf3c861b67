//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the simulation: piece geometry, the board, piece
//! sequencing and the turn loop. It has **zero dependencies** on rendering,
//! networking or I/O, and it never logs:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Value semantics**: A [`Board`] is a plain value; look-ahead copies share nothing
//! - **Pull-based**: Consumers drive the [`Game`] one event at a time
//!
//! # Module Structure
//!
//! - [`pieces`]: Per-kind rotation tables, movement, kicks and landing
//! - [`board`]: 21x10 grid, active piece, line clearing and change tracking
//! - [`rng`]: Seeded piece supply (uniform or 7-bag), capped per session
//! - [`agent`]: The decision capability consulted once per turn
//! - [`game`]: The turn loop producing [`GameEvent`]s
//!
//! # Game Rules
//!
//! - Every action except a hard drop is followed by exactly one fall step, so
//!   gravity runs at the cadence of decisions, not of wall-clock time
//! - A hard drop falls until the piece lands
//! - Full rows are cleared after each piece lands; 1-4 rows score 100, 250,
//!   750 or 3000
//! - The game ends when a landed piece occupies row 1 or a new piece cannot
//!   spawn
//!
//! # Example
//!
//! ```
//! use turn_tetris_core::{Decision, Game};
//! use turn_tetris_core::types::{Action, PieceKind};
//!
//! let mut game = Game::from_pieces([PieceKind::I, PieceKind::O]);
//! let mut agent = |_: &turn_tetris_core::Board| Decision::Single(Action::HardDrop);
//!
//! let events: Vec<_> = game.events(&mut agent).collect();
//! assert_eq!(events.len(), 4);
//! assert!(game.is_finished());
//! ```

pub mod agent;
pub mod board;
pub mod game;
pub mod pieces;
pub mod rng;

pub use turn_tetris_types as types;

// Re-export commonly used types for convenience
pub use agent::{Agent, Decision, RandomAgent};
pub use board::{Board, Grid};
pub use game::{EventPayload, Game, GameConfig, GameEvent, Turn};
pub use pieces::{get_shape, Delta, Piece};
pub use rng::{PieceRule, PieceSequence, SimpleRng};
