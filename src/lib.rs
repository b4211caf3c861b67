//! Turn-based Tetris (workspace facade crate).
//!
//! Re-exports the member crates as `turn_tetris::{core, adapter, types}` and
//! adds the terminal [`view`] and the [`keys`] live-play agent used by the demo
//! binary.

pub use turn_tetris_adapter as adapter;
pub use turn_tetris_core as core;
pub use turn_tetris_types as types;

pub mod keys;
pub mod view;
