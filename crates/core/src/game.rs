//! Game module - the controller state machine
//!
//! Ties the grid, the active piece, the queue and the timer together and
//! publishes every observable change through the [`EventDispatcher`].
//!
//! # Lifecycle
//!
//! ```text
//! Idle --start_game--> Running <--pause/unpause--> Paused
//!                         |                           |
//!                         +------ end_game / top out -+--> Ended
//! any --reset--> Idle
//! ```
//!
//! Movement, rotation, locking and ticks are ignored unless the game is Running.

use arrayvec::ArrayVec;

use crate::events::{Event, EventDispatcher};
use crate::ghost::project_ghost;
use crate::grid::Grid;
use crate::options::GameOptions;
use crate::pieces::{index_maps, PieceCoords, Tetromino};
use crate::rng::{PieceQueue, SimpleRng};
use crate::save::{RestoreError, SaveState, SavedGame};
use crate::scoring::calculate_line_score;
use crate::timer::DropTimer;
use crate::types::{
    drop_interval_for_level, Direction, PieceKind, DROP_INTERVAL_MIN_MS, DROP_STEP_MS,
    LINES_PER_LEVEL, SOFT_LOCK_THRESHOLD,
};

/// Lifecycle state of a [`Game`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Idle,
    Running,
    Paused,
    Ended,
}

/// Game controller
#[derive(Debug)]
pub struct Game {
    options: GameOptions,
    status: GameStatus,
    grid: Grid,
    active: Option<Tetromino>,
    ghost: Option<PieceCoords>,
    queue: PieceQueue,
    rng: SimpleRng,
    level: u32,
    lines: u32,
    score: u32,
    /// Rows cleared by the previous clear; scales the next clear's points
    last_clear: u32,
    /// Time spent Running, fed by `advance`
    play_time_ms: u32,
    drop_interval_ms: u32,
    soft_lock_count: u8,
    timer: DropTimer,
    /// Set by a successful restore; the next start skips fill and spawn
    restored: bool,
    events: EventDispatcher,
}

impl Game {
    /// Create an idle game. `options` must have passed [`GameOptions::validate`].
    pub fn new(options: GameOptions, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let queue = PieceQueue::new(&mut rng);

        Self {
            options,
            status: GameStatus::Idle,
            grid: Grid::new(options.grid_width, options.grid_height),
            active: None,
            ghost: None,
            queue,
            rng,
            level: options.level,
            lines: 0,
            score: 0,
            last_clear: 1,
            play_time_ms: 0,
            drop_interval_ms: drop_interval_for_level(options.level),
            soft_lock_count: 0,
            timer: DropTimer::new(),
            restored: false,
            events: EventDispatcher::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Milliseconds spent Running; paused time does not count
    pub fn play_time_ms(&self) -> u32 {
        self.play_time_ms
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn soft_lock_count(&self) -> u8 {
        self.soft_lock_count
    }

    pub fn active(&self) -> Option<&Tetromino> {
        self.active.as_ref()
    }

    /// Landing position of the active piece; None when it cannot fall any further
    pub fn ghost(&self) -> Option<PieceCoords> {
        self.ghost
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Kinds already queued, head first. Use [`Game::get_next_tetromino`] to
    /// look further ahead.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter()
    }

    pub fn timer(&self) -> &DropTimer {
        &self.timer
    }

    /// Subscriptions survive [`Game::reset`]
    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    fn emit(&mut self, event: Event) {
        self.events.dispatch(&event);
    }

    fn emit_grid_changed(&mut self) {
        let grid = self.grid.snapshot();
        self.emit(Event::GridChanged { grid });
    }

    fn update_ghost(&mut self) {
        self.ghost = self.active.as_ref().and_then(|piece| {
            let coords = piece.coordinates();
            let ghost = project_ghost(&coords, &self.grid);
            (ghost != coords).then_some(ghost)
        });
    }

    /// Start an idle game. Returns false in any other state.
    ///
    /// A new game gets its starting-height garbage and its first piece. A
    /// restored game resumes with the saved grid and piece as they are.
    pub fn start_game(&mut self) -> bool {
        if self.status != GameStatus::Idle {
            return false;
        }
        self.status = GameStatus::Running;

        if self.restored {
            self.restored = false;
            self.timer.start(self.drop_interval_ms);
            self.emit(Event::GameStart);
            self.emit_grid_changed();
            return true;
        }

        self.grid.clear();
        self.fill_starting_height();
        self.drop_interval_ms = drop_interval_for_level(self.level);
        self.timer.start(self.drop_interval_ms);

        self.emit(Event::GameStart);
        self.emit_grid_changed();
        self.spawn_piece();
        true
    }

    /// Garbage rows from the bottom up, each with 1..=W-1 holes
    fn fill_starting_height(&mut self) {
        let rows = self.options.starting_rows() as i32;
        let width = self.grid.width();
        let height = self.grid.height();
        let mut columns: Vec<i32> = (0..width).collect();

        for y in (height - rows..height).rev() {
            let holes = self.rng.next_between(1, width as u32 - 1) as usize;
            self.rng.shuffle(&mut columns);
            for &x in &columns[holes..] {
                let kind = self.rng.next_kind();
                self.grid.fill_position(x, y, kind);
            }
        }
    }

    /// Take the next kind from the queue and make it the active piece.
    ///
    /// Ends the game if the spawn position is blocked.
    fn spawn_piece(&mut self) -> bool {
        let kind = self.queue.draw(&mut self.rng);
        let piece = Tetromino::spawn(kind, self.grid.width(), self.options.invert_rotation);
        let coordinates = piece.coordinates();

        if self.grid.is_collision(&coordinates) {
            self.finish();
            return false;
        }

        self.active = Some(piece);
        self.soft_lock_count = 0;
        self.update_ghost();
        self.emit(Event::TetrominoSpawned { coordinates, kind });
        true
    }

    fn finish(&mut self) {
        self.timer.cancel();
        self.grid.clear();
        self.active = None;
        self.ghost = None;
        self.status = GameStatus::Ended;
        self.emit(Event::GameEnd);
    }

    /// Move the active piece one cell.
    ///
    /// A refused move emits `Collision`. Two refused downward moves in a row
    /// lock the piece.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        let Some(piece) = &self.active else {
            return false;
        };

        let (dx, dy) = direction.delta();
        let old = piece.coordinates();
        let kind = piece.kind();
        let new = piece.moved(dx, dy);

        if self.grid.is_collision(&new) {
            self.emit(Event::Collision {
                coordinates: old,
                direction,
            });
            if direction == Direction::Down {
                self.soft_lock_count += 1;
                if self.soft_lock_count >= SOFT_LOCK_THRESHOLD {
                    self.soft_lock_count = 0;
                    self.drop_tetromino();
                }
            }
            return false;
        }

        if let Some(piece) = self.active.as_mut() {
            piece.shift(dx, dy);
        }
        self.soft_lock_count = 0;
        self.update_ghost();
        self.emit(Event::CoordinatesChanged { old, new, kind });
        true
    }

    /// Advance to the next rotation state if it fits. No wall kicks.
    pub fn rotate(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        let Some(piece) = &self.active else {
            return false;
        };
        let Some(new) = piece.next_rotation() else {
            return false;
        };
        if self.grid.is_collision(&new) {
            return false;
        }

        let old = piece.coordinates();
        let kind = piece.kind();
        if let Some(piece) = self.active.as_mut() {
            piece.advance_rotation();
        }
        self.update_ghost();
        self.emit(Event::CoordinatesChanged { old, new, kind });
        true
    }

    /// Lock the active piece where it is, clear full rows and spawn the next piece.
    pub fn drop_tetromino(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        let Some(piece) = self.active.take() else {
            return false;
        };
        self.ghost = None;

        let kind = piece.kind();
        let mut rows: ArrayVec<i32, 4> = ArrayVec::new();
        for p in piece.coordinates() {
            self.grid.fill_position(p.x, p.y, kind);
            if !rows.contains(&p.y) {
                rows.push(p.y);
            }
        }
        rows.sort_unstable();

        let mut cleared: ArrayVec<i32, 4> = ArrayVec::new();
        for &y in &rows {
            if self.grid.is_line_full(y) {
                self.grid.clear_line(y);
                cleared.push(y);
            }
        }

        if let Some(&lowest) = cleared.last() {
            self.grid.push_lines(lowest);
            for _ in 0..cleared.len() {
                self.lines += 1;
                if self.lines % LINES_PER_LEVEL == 0 {
                    self.level += 1;
                    self.drop_interval_ms = self
                        .drop_interval_ms
                        .saturating_sub(DROP_STEP_MS)
                        .max(DROP_INTERVAL_MIN_MS);
                }
            }
            let points = calculate_line_score(
                cleared.len(),
                self.level,
                self.options.starting_height_percent,
                self.last_clear,
            );
            self.score = self.score.saturating_add(points);
            self.last_clear = cleared.len() as u32;
            let grid = self.grid.snapshot();
            self.emit(Event::LinesCompleted {
                cleared_rows: cleared.to_vec(),
                grid,
            });
        } else {
            self.emit_grid_changed();
        }

        self.timer.cancel();
        if self.spawn_piece() {
            self.timer.start(self.drop_interval_ms);
        }
        true
    }

    /// Move the active piece straight to its landing position and lock it.
    pub fn hard_drop(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        let Some(piece) = &self.active else {
            return false;
        };

        if let Some(target) = self.ghost {
            let old = piece.coordinates();
            let kind = piece.kind();
            let dy = target[0].y - old[0].y;
            if let Some(piece) = self.active.as_mut() {
                piece.shift(0, dy);
            }
            self.ghost = None;
            self.emit(Event::CoordinatesChanged {
                old,
                new: target,
                kind,
            });
        }
        self.drop_tetromino()
    }

    pub fn pause_game(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        self.status = GameStatus::Paused;
        self.timer.cancel();
        self.emit(Event::GamePause);
        true
    }

    /// Resume a paused game; the auto-drop interval starts over from zero.
    pub fn unpause_game(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Running;
        self.timer.start(self.drop_interval_ms);
        self.emit(Event::GameUnpause);
        true
    }

    /// End a running or paused game. The grid is cleared.
    pub fn end_game(&mut self) -> bool {
        if !matches!(self.status, GameStatus::Running | GameStatus::Paused) {
            return false;
        }
        self.finish();
        true
    }

    /// Return to Idle with an empty grid, a fresh queue and starting stats.
    ///
    /// A game in progress is ended first. Subscriptions are kept and the random
    /// source carries on, so the next game differs from the last one.
    pub fn reset(&mut self) {
        self.end_game();
        self.timer.cancel();
        self.grid = Grid::new(self.options.grid_width, self.options.grid_height);
        self.active = None;
        self.ghost = None;
        self.queue = PieceQueue::new(&mut self.rng);
        self.level = self.options.level;
        self.lines = 0;
        self.score = 0;
        self.last_clear = 1;
        self.play_time_ms = 0;
        self.drop_interval_ms = drop_interval_for_level(self.options.level);
        self.soft_lock_count = 0;
        self.restored = false;
        self.status = GameStatus::Idle;
    }

    /// The next `n` kinds to spawn, head first. Never changes their order.
    pub fn get_next_tetromino(&mut self, n: usize) -> Vec<PieceKind> {
        self.queue.peek(n, &mut self.rng)
    }

    /// Auto-drop step: move the active piece down once
    pub fn tick(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        self.move_piece(Direction::Down)
    }

    /// Feed elapsed time to the drop timer and run every due tick.
    ///
    /// A lock restarts the timer, which discards the rest of `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if self.status != GameStatus::Running {
            return;
        }
        self.play_time_ms = self.play_time_ms.saturating_add(elapsed_ms);
        self.timer.add_elapsed(elapsed_ms);
        while self.timer.consume_tick() {
            self.tick();
            if self.status != GameStatus::Running {
                break;
            }
        }
    }

    /// Pack the game in progress. None unless there is an active piece to save.
    pub fn save_game(&self) -> Option<SavedGame> {
        if !matches!(self.status, GameStatus::Running | GameStatus::Paused) {
            return None;
        }
        let piece = self.active.as_ref()?;

        let state = SaveState {
            width: self.options.grid_width,
            height: self.options.grid_height,
            level: self.level,
            lines: self.lines,
            drop_interval_ms: self.drop_interval_ms,
            kind: piece.kind(),
            rotation: piece.rotation_index(),
            coordinates: piece.coordinates(),
            rng_state: self.rng.state(),
            score: self.score,
            last_clear: self.last_clear,
            play_time_ms: self.play_time_ms,
            cells: self.grid.cells().collect(),
            queue: self.queue.iter().collect(),
        };
        Some(state.pack())
    }

    /// Load a saved game into an idle controller.
    ///
    /// Everything is checked before the controller changes. On success the
    /// game stays Idle and emits `GridChanged`; the next
    /// [`Game::start_game`] resumes it without filling or spawning.
    pub fn restore_game(&mut self, saved: &SavedGame) -> Result<(), RestoreError> {
        if self.status != GameStatus::Idle {
            return Err(RestoreError::NotIdle);
        }

        let state = SaveState::unpack(saved)?;
        let expected = (self.options.grid_width, self.options.grid_height);
        if (state.width, state.height) != expected {
            return Err(RestoreError::DimensionMismatch {
                saved: (state.width, state.height),
                expected,
            });
        }
        if state.rotation >= index_maps(state.kind).len() {
            return Err(RestoreError::InvalidRotation {
                kind: state.kind,
                rotation: state.rotation,
            });
        }
        let piece = Tetromino::from_saved(
            state.kind,
            state.width as i32,
            self.options.invert_rotation,
            state.rotation,
            state.coordinates,
        )
        .ok_or(RestoreError::ShapeMismatch)?;

        let mut grid = Grid::new(state.width, state.height);
        for (p, kind) in &state.cells {
            grid.fill_position(p.x, p.y, *kind);
        }

        self.grid = grid;
        self.active = Some(piece);
        self.queue = PieceQueue::from_kinds(state.queue);
        self.rng = SimpleRng::from_state(state.rng_state);
        self.level = state.level;
        self.lines = state.lines;
        self.score = state.score;
        self.last_clear = state.last_clear;
        self.play_time_ms = state.play_time_ms;
        self.drop_interval_ms = state.drop_interval_ms;
        self.soft_lock_count = 0;
        self.restored = true;
        self.update_ghost();
        self.emit_grid_changed();
        Ok(())
    }
}
