//! Save/restore tests: packing a live game and resuming it elsewhere.

use blocktris::core::{
    Game, GameOptions, GameStatus, RestoreError, SaveState, SavedGame, SAVE_FORMAT_VERSION,
};
use blocktris::types::{Direction, PieceKind, Point};

fn play_some(game: &mut Game) {
    game.move_piece(Direction::Left);
    game.rotate();
    game.hard_drop();
    game.move_piece(Direction::Right);
    game.move_piece(Direction::Right);
    game.hard_drop();
    game.rotate();
    game.move_piece(Direction::Down);
    game.move_piece(Direction::Down);
}

type Snapshot = (
    Vec<(Point, PieceKind)>,
    Option<(PieceKind, usize, [Point; 4])>,
    [u32; 5],
);

fn snapshot(game: &Game) -> Snapshot {
    (
        game.grid().cells().collect(),
        game.active()
            .map(|p| (p.kind(), p.rotation_index(), p.coordinates())),
        [
            game.level(),
            game.lines(),
            game.score(),
            game.play_time_ms(),
            game.drop_interval_ms(),
        ],
    )
}

#[test]
fn test_round_trip_restores_everything() {
    let mut game = Game::new(GameOptions::default(), 8080);
    game.start_game();
    play_some(&mut game);
    game.advance(700);

    let saved = game.save_game().unwrap();
    assert_eq!(saved.words()[0], SAVE_FORMAT_VERSION);

    let mut restored = Game::new(GameOptions::default(), 1);
    restored.restore_game(&saved).unwrap();
    assert_eq!(restored.status(), GameStatus::Idle);
    assert_eq!(snapshot(&restored), snapshot(&game));
    assert_eq!(restored.ghost(), game.ghost());
    assert_eq!(restored.get_next_tetromino(8), game.get_next_tetromino(8));

    restored.start_game();
    assert_eq!(snapshot(&restored), snapshot(&game));

    // Same RNG state, so both games continue identically.
    for _ in 0..5 {
        game.hard_drop();
        restored.hard_drop();
        assert_eq!(snapshot(&restored), snapshot(&game));
    }
}

#[test]
fn test_round_trip_through_json() {
    let mut game = Game::new(GameOptions::default(), 3);
    game.start_game();
    game.hard_drop();

    let saved = game.save_game().unwrap();
    let json = serde_json::to_string(&saved).unwrap();
    assert!(json.starts_with('['));
    let back: SavedGame = serde_json::from_str(&json).unwrap();
    assert_eq!(back, saved);
}

#[test]
fn test_paused_game_can_be_saved() {
    let mut game = Game::new(GameOptions::default(), 3);
    game.start_game();
    game.pause_game();
    assert!(game.save_game().is_some());

    game.end_game();
    assert!(game.save_game().is_none());
}

#[test]
fn test_corrupt_blob_leaves_controller_untouched() {
    let mut game = Game::new(GameOptions::default(), 11);
    game.start_game();
    game.hard_drop();
    let words = game.save_game().unwrap().into_words();

    let mut fresh = Game::new(GameOptions::default(), 11);
    let upcoming = fresh.get_next_tetromino(4);

    let truncated = SavedGame::from_words(words[..words.len() - 2].to_vec());
    assert_eq!(fresh.restore_game(&truncated), Err(RestoreError::Truncated));

    let mut bad_kind = words.clone();
    bad_kind[6] = 42;
    assert_eq!(
        fresh.restore_game(&SavedGame::from_words(bad_kind)),
        Err(RestoreError::InvalidKind(42))
    );

    let mut bad_version = words.clone();
    bad_version[0] = SAVE_FORMAT_VERSION + 1;
    assert!(matches!(
        fresh.restore_game(&SavedGame::from_words(bad_version)),
        Err(RestoreError::VersionMismatch(_))
    ));

    assert!(fresh.active().is_none());
    assert!(fresh.grid().is_empty());
    assert_eq!(fresh.get_next_tetromino(4), upcoming);

    // Still a normal new game afterwards.
    fresh.start_game();
    assert_eq!(fresh.active().unwrap().kind(), upcoming[0]);
}

fn t_state(rotation: usize, coords: [(i32, i32); 4]) -> SaveState {
    SaveState {
        width: 10,
        height: 22,
        level: 1,
        lines: 0,
        drop_interval_ms: 1000,
        kind: PieceKind::T,
        rotation,
        coordinates: coords.map(|(x, y)| Point::new(x, y)),
        rng_state: 5,
        score: 0,
        last_clear: 1,
        play_time_ms: 0,
        cells: Vec::new(),
        queue: vec![PieceKind::I],
    }
}

#[test]
fn test_rejects_unknown_rotation() {
    let mut game = Game::new(GameOptions::default(), 1);
    let saved = t_state(4, [(4, 0), (5, 0), (6, 0), (5, 1)]).pack();
    assert_eq!(
        game.restore_game(&saved),
        Err(RestoreError::InvalidRotation {
            kind: PieceKind::T,
            rotation: 4
        })
    );
}

#[test]
fn test_rejects_shape_mismatch() {
    let mut game = Game::new(GameOptions::default(), 1);
    // Spawn-state cells labelled as rotation 2.
    let saved = t_state(2, [(4, 0), (5, 0), (6, 0), (5, 1)]).pack();
    assert_eq!(game.restore_game(&saved), Err(RestoreError::ShapeMismatch));

    // A translated spawn state is fine.
    let saved = t_state(0, [(0, 10), (1, 10), (2, 10), (1, 11)]).pack();
    assert_eq!(game.restore_game(&saved), Ok(()));
}

#[test]
fn test_rejects_overlap_with_locked_cells() {
    let mut game = Game::new(GameOptions::default(), 1);
    let mut state = t_state(0, [(4, 0), (5, 0), (6, 0), (5, 1)]);
    state.cells.push((Point::new(6, 0), PieceKind::O));
    assert_eq!(
        game.restore_game(&state.pack()),
        Err(RestoreError::PieceOverlap(Point::new(6, 0)))
    );
}

#[test]
fn test_score_survives_restore() {
    let mut state = t_state(0, [(4, 0), (5, 0), (6, 0), (5, 1)]);
    state.level = 2;
    state.lines = 11;
    state.score = 1460;
    state.last_clear = 4;
    state.play_time_ms = 90_000;
    // Row 21 needs only the vertical I's column to clear.
    state.kind = PieceKind::I;
    state.rotation = 1;
    state.coordinates = [(9, 18), (9, 19), (9, 20), (9, 21)].map(|(x, y)| Point::new(x, y));
    state.cells = (0..9).map(|x| (Point::new(x, 21), PieceKind::Z)).collect();

    let mut game = Game::new(GameOptions::default(), 1);
    game.restore_game(&state.pack()).unwrap();
    assert_eq!(game.score(), 1460);
    assert_eq!(game.play_time_ms(), 90_000);

    game.start_game();
    game.drop_tetromino();
    // single at level 2 after a four-row clear
    assert_eq!(game.score(), 1460 + 40 * 2 * 4);
}

#[test]
fn test_rejects_full_row_and_empty_queue() {
    let mut game = Game::new(GameOptions::default(), 1);

    let mut full = t_state(0, [(4, 0), (5, 0), (6, 0), (5, 1)]);
    full.cells = (0..10).map(|x| (Point::new(x, 21), PieceKind::L)).collect();
    assert_eq!(game.restore_game(&full.pack()), Err(RestoreError::FullRow(21)));

    let mut empty = t_state(0, [(4, 0), (5, 0), (6, 0), (5, 1)]);
    empty.queue.clear();
    assert_eq!(game.restore_game(&empty.pack()), Err(RestoreError::EmptyQueue));

    assert!(game.grid().is_empty());
    assert!(game.active().is_none());
    game.start_game();
    assert_eq!(game.status(), GameStatus::Running);
}

#[test]
fn test_error_messages_are_readable() {
    assert_eq!(
        RestoreError::DimensionMismatch {
            saved: (10, 22),
            expected: (12, 22)
        }
        .to_string(),
        "saved grid 10x22 does not match 12x22"
    );
    assert_eq!(RestoreError::Truncated.to_string(), "save data is truncated");
}
