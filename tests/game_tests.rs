//! Game loop tests - event stream shape, scoring and termination

use turn_tetris::core::{
    Board, Decision, EventPayload, Game, GameConfig, GameEvent, PieceRule, RandomAgent, Turn,
};
use turn_tetris::types::{Action, PieceKind, BOARD_WIDTH};

fn hard_drop(_: &Board) -> Decision {
    Decision::Single(Action::HardDrop)
}

fn collect(game: &mut Game, agent: &mut dyn FnMut(&Board) -> Decision) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Some(event) = game.next_event(agent) {
        events.push(event);
    }
    events
}

#[test]
fn test_turn_sequence_for_one_piece() {
    let mut game = Game::from_pieces([PieceKind::T]);

    // Spawn diff, no actions yet
    let Turn::Event(spawn) = game.step() else {
        panic!("expected spawn event");
    };
    assert_eq!(spawn.changes().len(), 4);
    assert!(spawn.actions.is_none());
    assert!(spawn.lines().is_empty());

    assert_eq!(game.step(), Turn::AwaitingDecision);
    let moved = game.submit(Action::MoveRight);
    assert_eq!(moved.actions, Some(vec![Action::MoveRight]));
    // Moving right and falling one row changes cells.
    assert!(!moved.changes().is_empty());

    // Next turn: diff since the last report is empty
    let Turn::Event(announce) = game.step() else {
        panic!("expected turn event");
    };
    assert!(announce.changes().is_empty());
    assert!(announce.actions.is_none());
}

#[test]
fn test_line_clear_event_is_separate() {
    let mut board = Board::new();
    for col in 0..BOARD_WIDTH as i8 {
        if !(3..=6).contains(&col) {
            board.set(20, col, Some(PieceKind::L));
        }
    }

    let mut game = Game::from_board(board, [PieceKind::I]);
    let events = collect(&mut game, &mut hard_drop);

    let clears: Vec<_> = events.iter().filter(|e| e.is_line_clear()).collect();
    assert_eq!(clears.len(), 1);
    assert_eq!(clears[0].lines(), &[20]);
    assert!(clears[0].changes().is_empty());
    assert_eq!(
        clears[0].payload,
        EventPayload::LinesCleared {
            rows: vec![20],
            points: 100
        }
    );
    assert_eq!(clears[0].score, 100);
    assert_eq!(game.score(), 100);
    assert_eq!(game.board().grid().occupied_count(), 0);
}

#[test]
fn test_exactly_one_payload_per_event() {
    let mut game = Game::new(GameConfig {
        seed: Some(2024),
        piece_limit: 60,
        rule: PieceRule::Bag7,
    });
    let mut agent = RandomAgent::new(2024);

    let mut last_score = 0;
    while let Some(event) = game.next_event(&mut agent) {
        match &event.payload {
            EventPayload::Changes(_) => assert!(event.lines().is_empty()),
            EventPayload::LinesCleared { rows, points } => {
                assert!(!rows.is_empty());
                assert!(*points > 0);
                assert!(event.actions.is_none());
            }
        }
        assert!(event.score >= last_score);
        last_score = event.score;
    }
    assert!(game.is_finished());
}

#[test]
fn test_same_seed_same_game() {
    let play = || {
        let mut game = Game::with_seed(77);
        let mut agent = RandomAgent::new(77);
        let events: Vec<_> = game.events(&mut agent).take(300).collect();
        (events, game.score())
    };

    assert_eq!(play(), play());
}

#[test]
fn test_blocked_spawn_ends_without_event() {
    let mut board = Board::new();
    board.set(2, 4, Some(PieceKind::Z));

    let mut game = Game::from_board(board, [PieceKind::O, PieceKind::O]);
    assert_eq!(game.step(), Turn::Finished);
    assert!(!game.running());
    assert_eq!(game.pieces_dealt(), 1);
    assert_eq!(game.board().grid().occupied_count(), 1);
}

#[test]
fn test_stack_to_top_ends_game() {
    let mut game = Game::from_pieces(std::iter::repeat(PieceKind::I));
    let mut agent = |_: &Board| Decision::Single(Action::HardDrop);
    game.run(&mut agent);

    assert!(!game.running());
    assert!(game.is_finished());
    assert!(game.pieces_dealt() < 25);
}

#[test]
fn test_piece_limit_ends_session() {
    let mut game = Game::new(GameConfig {
        seed: Some(1),
        piece_limit: 3,
        rule: PieceRule::Uniform,
    });
    let mut agent = |board: &Board| {
        // Spread pieces so the stack never reaches the top.
        let x = board.piece().map(|p| p.x()).unwrap_or(4);
        if x > 1 {
            Decision::Single(Action::MoveLeft)
        } else {
            Decision::Single(Action::HardDrop)
        }
    };
    game.run(&mut agent);

    assert_eq!(game.pieces_dealt(), 3);
    assert!(game.running());
}

#[test]
fn test_sequence_decision_is_applied_in_order() {
    let mut game = Game::from_pieces([PieceKind::O]);
    game.step();
    let event = game.submit(vec![Action::MoveLeft, Action::MoveLeft, Action::MoveLeft]);

    let piece = event.board.piece().unwrap();
    assert_eq!(piece.x(), 1);
    assert_eq!(piece.y(), 5);
    assert_eq!(
        event.actions,
        Some(vec![Action::MoveLeft, Action::MoveLeft, Action::MoveLeft])
    );
}

#[test]
fn test_empty_sequence_is_noop() {
    let mut game = Game::from_pieces([PieceKind::O]);
    game.step();
    let event = game.submit(Decision::Sequence(Vec::new()));

    assert_eq!(event.actions, Some(vec![Action::Noop]));
    assert_eq!(event.board.piece().unwrap().y(), 3);
}

#[test]
fn test_abandoning_game_is_fine() {
    let mut game = Game::with_seed(5);
    let mut agent = RandomAgent::new(5);
    let first_few: Vec<_> = game.events(&mut agent).take(3).collect();
    assert_eq!(first_few.len(), 3);
    drop(game);
}
