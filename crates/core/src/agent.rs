//! Agent capability - where turn decisions come from
//!
//! The game loop asks an [`Agent`] for a [`Decision`] once per turn, handing it
//! a read-only view of the live board. Look-ahead goes through
//! [`Board::with_move`] / [`Board::with_moves`], which return independent
//! copies.

use crate::board::Board;
use crate::rng::SimpleRng;
use crate::types::Action;

/// One action, or an ordered sequence applied until the piece lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Single(Action),
    Sequence(Vec<Action>),
}

impl Decision {
    /// Actions to apply in order. An empty sequence counts as a single `Noop`.
    pub fn into_actions(self) -> Vec<Action> {
        match self {
            Decision::Single(action) => vec![action],
            Decision::Sequence(actions) if actions.is_empty() => vec![Action::Noop],
            Decision::Sequence(actions) => actions,
        }
    }
}

impl From<Action> for Decision {
    fn from(action: Action) -> Self {
        Decision::Single(action)
    }
}

impl From<Vec<Action>> for Decision {
    fn from(actions: Vec<Action>) -> Self {
        Decision::Sequence(actions)
    }
}

impl From<&[Action]> for Decision {
    fn from(actions: &[Action]) -> Self {
        Decision::Sequence(actions.to_vec())
    }
}

/// A source of turn decisions
pub trait Agent {
    fn play_move(&mut self, board: &Board) -> Decision;
}

impl<F> Agent for F
where
    F: FnMut(&Board) -> Decision + ?Sized,
{
    fn play_move(&mut self, board: &Board) -> Decision {
        self(board)
    }
}

/// Picks one of the six actions uniformly at random each turn
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: SimpleRng,
}

impl RandomAgent {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Time-seeded agent
    pub fn unseeded() -> Self {
        Self {
            rng: SimpleRng::from_time(),
        }
    }

    pub fn next_action(&mut self) -> Action {
        let idx = self.rng.next_range(Action::ALL.len() as u32) as usize;
        Action::ALL[idx]
    }
}

impl Agent for RandomAgent {
    fn play_move(&mut self, _board: &Board) -> Decision {
        Decision::Single(self.next_action())
    }
}
