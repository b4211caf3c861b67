//! Game loop - sequences pieces and drives the turn protocol
//!
//! A [`Game`] owns the board, the piece supply, the score and the running
//! flag. It is a pull-based state machine: every call to [`Game::step`]
//! advances until the next observable event, or stops when the active piece
//! needs a decision. The caller then obtains a [`Decision`] however it likes
//! (synchronously, from a remote peer, after a timer) and hands it to
//! [`Game::submit`].
//!
//! Per piece the sequence of events is:
//!
//! 1. spawn, then for every turn until the piece lands:
//!    - the diff since the last report (possibly empty), no actions
//!    - the diff after applying the decision, tagged with the actions applied
//! 2. a line-clear event if any rows were completed
//! 3. on game over, one final diff if anything is still unreported
//!
//! Abandoning a game mid-sequence is fine: there are no background tasks.

use crate::agent::{Agent, Decision};
use crate::board::{Board, Grid};
use crate::pieces::Piece;
use crate::rng::{PieceRule, PieceSequence};
use crate::types::{Action, CellChange, PieceKind, DEFAULT_PIECE_LIMIT};

/// Session parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for the piece sequence, `None` for a time-seeded session
    pub seed: Option<u32>,
    /// Pieces dealt before the session ends on its own
    pub piece_limit: usize,
    pub rule: PieceRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            piece_limit: DEFAULT_PIECE_LIMIT,
            rule: PieceRule::Uniform,
        }
    }
}

impl GameConfig {
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Build the piece supply this configuration describes
    pub fn sequence(&self) -> PieceSequence {
        match self.seed {
            Some(seed) => PieceSequence::new(seed, self.rule, self.piece_limit),
            None => PieceSequence::unseeded(self.rule, self.piece_limit),
        }
    }
}

/// What changed in one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Cells changed because the piece spawned or moved
    Changes(Vec<CellChange>),
    /// Rows removed at once (bottom first) and the points they earned
    LinesCleared { rows: Vec<usize>, points: u32 },
}

/// One observable state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub payload: EventPayload,
    /// Authoritative board after the transition
    pub board: Board,
    /// Cumulative score after the transition
    pub score: u32,
    /// Actions applied this turn; only set on the diff following a decision
    pub actions: Option<Vec<Action>>,
}

impl GameEvent {
    /// Cell changes, empty for line-clear events
    pub fn changes(&self) -> &[CellChange] {
        match &self.payload {
            EventPayload::Changes(changes) => changes,
            EventPayload::LinesCleared { .. } => &[],
        }
    }

    /// Cleared rows, empty for movement events
    pub fn lines(&self) -> &[usize] {
        match &self.payload {
            EventPayload::Changes(_) => &[],
            EventPayload::LinesCleared { rows, .. } => rows,
        }
    }

    pub fn is_line_clear(&self) -> bool {
        matches!(self.payload, EventPayload::LinesCleared { .. })
    }
}

/// Result of advancing the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Event(GameEvent),
    /// The active piece needs a decision; call [`Game::submit`]
    AwaitingDecision,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NextPiece,
    Falling,
    AwaitingDecision,
    LineClear,
    RunningCheck,
    Finished,
}

/// A game session
pub struct Game {
    board: Board,
    pieces: Box<dyn Iterator<Item = PieceKind> + Send>,
    score: u32,
    running: bool,
    pieces_dealt: usize,
    /// Grid as of the last reported event
    last_reported: Grid,
    phase: Phase,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::from_pieces(config.sequence())
    }

    /// Seeded session with default limits
    pub fn with_seed(seed: u32) -> Self {
        Self::new(GameConfig::seeded(seed))
    }

    /// Session dealing exactly the given kinds, in order
    pub fn from_pieces<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
        I::IntoIter: Send + 'static,
    {
        Self::from_board(Board::new(), pieces)
    }

    /// Session continuing from an existing position. Cells already on `board`
    /// count as reported.
    pub fn from_board<I>(board: Board, pieces: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
        I::IntoIter: Send + 'static,
    {
        Self {
            last_reported: board.snapshot(),
            board,
            pieces: Box::new(pieces.into_iter()),
            score: 0,
            running: true,
            pieces_dealt: 0,
            phase: Phase::NextPiece,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// False once the top playable row is occupied or a spawn was blocked
    pub fn running(&self) -> bool {
        self.running
    }

    /// True when no further events will be produced
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn pieces_dealt(&self) -> usize {
        self.pieces_dealt
    }

    /// True while [`Game::submit`] is expected
    pub fn awaiting_decision(&self) -> bool {
        self.phase == Phase::AwaitingDecision
    }

    fn event(&self, payload: EventPayload, actions: Option<Vec<Action>>) -> GameEvent {
        GameEvent {
            payload,
            board: self.board.clone(),
            score: self.score,
            actions,
        }
    }

    /// Advance to the next event or decision point.
    ///
    /// Calling `step` again while a decision is pending keeps returning
    /// [`Turn::AwaitingDecision`].
    pub fn step(&mut self) -> Turn {
        loop {
            match self.phase {
                Phase::NextPiece => {
                    let Some(kind) = self.pieces.next() else {
                        self.phase = Phase::Finished;
                        return Turn::Finished;
                    };
                    self.pieces_dealt += 1;
                    self.board.set_piece(Piece::new(kind));

                    if !self.board.spawn_piece() {
                        self.running = false;
                        self.phase = Phase::Finished;
                        return self.final_changes();
                    }
                    self.phase = Phase::Falling;
                }
                Phase::Falling => {
                    if self.board.piece().map_or(true, |p| p.landed()) {
                        self.phase = Phase::LineClear;
                        continue;
                    }
                    let changes = self.board.get_changes(&self.last_reported);
                    self.phase = Phase::AwaitingDecision;
                    return Turn::Event(self.event(EventPayload::Changes(changes), None));
                }
                Phase::AwaitingDecision => return Turn::AwaitingDecision,
                Phase::LineClear => {
                    self.phase = Phase::RunningCheck;
                    let rows = self.board.find_lines_to_clear();
                    if rows.is_empty() {
                        continue;
                    }
                    let points = self.board.clear_lines(&rows);
                    self.score += points;
                    self.last_reported = self.board.snapshot();
                    return Turn::Event(
                        self.event(EventPayload::LinesCleared { rows, points }, None),
                    );
                }
                Phase::RunningCheck => {
                    self.running = self.board.is_game_running();
                    if self.running {
                        self.phase = Phase::NextPiece;
                        continue;
                    }
                    self.phase = Phase::Finished;
                    return self.final_changes();
                }
                Phase::Finished => return Turn::Finished,
            }
        }
    }

    /// Last diff before termination, if anything is unreported
    fn final_changes(&mut self) -> Turn {
        let changes = self.board.get_changes(&self.last_reported);
        if changes.is_empty() {
            return Turn::Finished;
        }
        self.last_reported = self.board.snapshot();
        Turn::Event(self.event(EventPayload::Changes(changes), None))
    }

    /// Apply the pending decision and return the resulting diff.
    ///
    /// Actions are applied in order until the piece lands; the event carries
    /// only the actions that were applied.
    ///
    /// # Panics
    ///
    /// Panics if no decision is pending (see [`Game::awaiting_decision`]).
    pub fn submit(&mut self, decision: impl Into<Decision>) -> GameEvent {
        assert!(
            self.phase == Phase::AwaitingDecision,
            "submit called with no decision pending"
        );

        let mut actions = decision.into().into_actions();
        let before = self.board.snapshot();
        let applied = self.board.apply_actions(&actions);
        actions.truncate(applied);

        let changes = self.board.get_changes(&before);
        if changes.is_empty() {
            self.last_reported = before;
        } else {
            self.last_reported = self.board.snapshot();
        }
        self.phase = Phase::Falling;

        self.event(EventPayload::Changes(changes), Some(actions))
    }

    /// Pull the next event, asking `agent` whenever a decision is needed.
    pub fn next_event<A: Agent + ?Sized>(&mut self, agent: &mut A) -> Option<GameEvent> {
        match self.step() {
            Turn::Event(event) => Some(event),
            Turn::AwaitingDecision => {
                let decision = agent.play_move(&self.board);
                Some(self.submit(decision))
            }
            Turn::Finished => None,
        }
    }

    /// Iterator over all remaining events
    pub fn events<'a, A: Agent + ?Sized>(&'a mut self, agent: &'a mut A) -> Events<'a, A> {
        Events { game: self, agent }
    }

    /// Play to the end and return the final score
    pub fn run<A: Agent + ?Sized>(&mut self, agent: &mut A) -> u32 {
        while self.next_event(agent).is_some() {}
        self.score
    }
}

/// Event stream borrowing a game and its agent
pub struct Events<'a, A: ?Sized> {
    game: &'a mut Game,
    agent: &'a mut A,
}

impl<A: Agent + ?Sized> Iterator for Events<'_, A> {
    type Item = GameEvent;

    fn next(&mut self) -> Option<GameEvent> {
        self.game.next_event(self.agent)
    }
}
