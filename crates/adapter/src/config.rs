//! Session configuration from environment variables
//!
//! - `TETRIS_SEED`: piece sequence seed; unset or `-1` for a time-seeded session
//! - `TETRIS_PIECE_LIMIT`: pieces dealt per session (default: 1000)
//! - `TETRIS_PIECE_RULE`: `uniform` (default) or `bag7`
//! - `TETRIS_FRAME_MS`: delay after each rendered frame (default: 400)
//! - `TETRIS_FAST`: set to "1" or "true" to render only non-action frames
//! - `TETRIS_EVENT_LOG`: append every event as a JSON line to this path
//!
//! Invalid values fall back to the defaults.

use crate::core::{GameConfig, PieceRule};
use crate::types::DEFAULT_PIECE_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub game: GameConfig,
    pub frame_ms: u64,
    pub fast: bool,
    pub event_log: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            frame_ms: 400,
            fast: false,
            event_log: None,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = var("TETRIS_SEED")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(|s| u32::try_from(s).ok());

        let piece_limit = var("TETRIS_PIECE_LIMIT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PIECE_LIMIT);

        let rule = var("TETRIS_PIECE_RULE")
            .and_then(|s| PieceRule::from_str(&s))
            .unwrap_or_default();

        let frame_ms = var("TETRIS_FRAME_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(400);

        let fast = var("TETRIS_FAST")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let event_log = var("TETRIS_EVENT_LOG")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            game: GameConfig {
                seed,
                piece_limit,
                rule,
            },
            frame_ms,
            fast,
            event_log,
        }
    }
}
