//! Save module - flat, versioned encoding of an in-progress game
//!
//! # Layout
//!
//! A [`SavedGame`] is a list of `u32` words:
//!
//! | Index | Content |
//! |-------|---------|
//! | 0 | format version |
//! | 1, 2 | grid width, grid height |
//! | 3, 4, 5 | level, lines, drop interval (ms) |
//! | 6, 7 | active kind index, rotation index |
//! | 8..12 | active cells, `x << 8 \| y` |
//! | 12 | RNG state |
//! | 13, 14, 15 | score, size of the previous clear, play time (ms) |
//! | 16 | locked cell count `N` |
//! | .. | `N` cells, `x << 16 \| y << 8 \| kind` |
//! | .. | queue length `M`, then `M` kind indices |
//!
//! Coordinates fit in 8 bits because grid dimensions are capped at 255.
//! [`SaveState::unpack`] checks the whole blob before anything is built from it.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pieces::PieceCoords;
use crate::types::{PieceKind, Point, MAX_GRID_DIMENSION, MIN_GRID_DIMENSION};

/// Current layout version written at index 0
pub const SAVE_FORMAT_VERSION: u32 = 2;

/// Packed game state; serializes as a plain integer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedGame(Vec<u32>);

impl SavedGame {
    pub fn from_words(words: Vec<u32>) -> Self {
        Self(words)
    }

    pub fn words(&self) -> &[u32] {
        &self.0
    }

    pub fn into_words(self) -> Vec<u32> {
        self.0
    }
}

/// Decoded contents of a [`SavedGame`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveState {
    pub width: u32,
    pub height: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
    pub kind: PieceKind,
    pub rotation: usize,
    pub coordinates: PieceCoords,
    pub rng_state: u32,
    pub score: u32,
    /// Rows cleared by the previous clear, 1..=4
    pub last_clear: u32,
    pub play_time_ms: u32,
    /// Locked cells in row-major order
    pub cells: Vec<(Point, PieceKind)>,
    /// Upcoming kinds, head first
    pub queue: Vec<PieceKind>,
}

#[inline(always)]
fn pack_point(p: Point) -> u32 {
    ((p.x as u32 & 0xFF) << 8) | (p.y as u32 & 0xFF)
}

#[inline(always)]
fn pack_cell(p: Point, kind: PieceKind) -> u32 {
    ((p.x as u32 & 0xFF) << 16) | ((p.y as u32 & 0xFF) << 8) | kind.index() as u32
}

fn kind_at(word: u32) -> Result<PieceKind, RestoreError> {
    PieceKind::from_index(word as usize).ok_or(RestoreError::InvalidKind(word))
}

struct Reader<'a> {
    words: &'a [u32],
    pos: usize,
}

impl Reader<'_> {
    fn next(&mut self) -> Result<u32, RestoreError> {
        let word = self
            .words
            .get(self.pos)
            .copied()
            .ok_or(RestoreError::Truncated)?;
        self.pos += 1;
        Ok(word)
    }
}

impl SaveState {
    pub fn pack(&self) -> SavedGame {
        let mut words = Vec::with_capacity(18 + self.cells.len() + self.queue.len());
        words.extend([
            SAVE_FORMAT_VERSION,
            self.width,
            self.height,
            self.level,
            self.lines,
            self.drop_interval_ms,
            self.kind.index() as u32,
            self.rotation as u32,
        ]);
        words.extend(self.coordinates.iter().map(|p| pack_point(*p)));
        words.extend([
            self.rng_state,
            self.score,
            self.last_clear,
            self.play_time_ms,
        ]);

        words.push(self.cells.len() as u32);
        words.extend(self.cells.iter().map(|(p, kind)| pack_cell(*p, *kind)));

        words.push(self.queue.len() as u32);
        words.extend(self.queue.iter().map(|kind| kind.index() as u32));
        SavedGame(words)
    }

    /// Decode and check a blob.
    ///
    /// Rejects wrong versions, short or over-long blobs, out-of-range values,
    /// unknown kinds, cells outside the grid, duplicate cells, full rows, an
    /// empty queue, and an active piece that overlaps locked cells. Whether the active cells match the
    /// rotation state is checked when the piece is rebuilt.
    pub fn unpack(saved: &SavedGame) -> Result<SaveState, RestoreError> {
        let mut r = Reader {
            words: &saved.0,
            pos: 0,
        };

        let version = r.next()?;
        if version != SAVE_FORMAT_VERSION {
            return Err(RestoreError::VersionMismatch(version));
        }

        let width = r.next()?;
        let height = r.next()?;
        let dims = MIN_GRID_DIMENSION..=MAX_GRID_DIMENSION;
        if !dims.contains(&width) || !dims.contains(&height) {
            return Err(RestoreError::DimensionOutOfRange { width, height });
        }
        let in_grid = |p: Point| p.x < width as i32 && p.y < height as i32;

        let level = r.next()?;
        if level == 0 {
            return Err(RestoreError::InvalidLevel);
        }
        let lines = r.next()?;
        let drop_interval_ms = r.next()?;
        if drop_interval_ms == 0 {
            return Err(RestoreError::InvalidInterval);
        }

        let kind = kind_at(r.next()?)?;
        let rotation = r.next()? as usize;

        let mut coordinates = [Point::default(); 4];
        for slot in coordinates.iter_mut() {
            let word = r.next()?;
            if word > 0xFFFF {
                return Err(RestoreError::MalformedWord(word));
            }
            let p = Point::new((word >> 8) as i32, (word & 0xFF) as i32);
            if !in_grid(p) {
                return Err(RestoreError::OutOfBounds(p));
            }
            *slot = p;
        }

        let rng_state = r.next()?;
        let score = r.next()?;
        let last_clear = r.next()?;
        if !(1..=4).contains(&last_clear) {
            return Err(RestoreError::InvalidClearSize(last_clear));
        }
        let play_time_ms = r.next()?;

        let cell_count = r.next()? as usize;
        let mut cells = Vec::new();
        let mut seen = HashSet::new();
        for _ in 0..cell_count {
            let word = r.next()?;
            if word > 0xFF_FFFF {
                return Err(RestoreError::MalformedWord(word));
            }
            let p = Point::new((word >> 16) as i32, ((word >> 8) & 0xFF) as i32);
            let cell_kind = kind_at(word & 0xFF)?;
            if !in_grid(p) {
                return Err(RestoreError::OutOfBounds(p));
            }
            if !seen.insert(p) {
                return Err(RestoreError::DuplicateCell(p));
            }
            cells.push((p, cell_kind));
        }

        let mut row_lengths: HashMap<i32, u32> = HashMap::new();
        for (p, _) in &cells {
            let len = row_lengths.entry(p.y).or_default();
            *len += 1;
            if *len == width {
                return Err(RestoreError::FullRow(p.y));
            }
        }

        if let Some(p) = coordinates.iter().find(|p| seen.contains(*p)) {
            return Err(RestoreError::PieceOverlap(*p));
        }

        let queue_len = r.next()? as usize;
        if queue_len == 0 {
            return Err(RestoreError::EmptyQueue);
        }
        let mut queue = Vec::new();
        for _ in 0..queue_len {
            queue.push(kind_at(r.next()?)?);
        }

        if r.pos != saved.0.len() {
            return Err(RestoreError::TrailingData(saved.0.len() - r.pos));
        }

        Ok(SaveState {
            width,
            height,
            level,
            lines,
            drop_interval_ms,
            kind,
            rotation,
            coordinates,
            rng_state,
            score,
            last_clear,
            play_time_ms,
            cells,
            queue,
        })
    }
}

/// Why a [`SavedGame`] could not be restored. The controller is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    /// Unknown format version
    VersionMismatch(u32),
    /// Blob ended before all fields were read
    Truncated,
    /// Words left over after the queue
    TrailingData(usize),
    DimensionOutOfRange { width: u32, height: u32 },
    /// Saved grid differs from the controller's options
    DimensionMismatch {
        saved: (u32, u32),
        expected: (u32, u32),
    },
    InvalidLevel,
    InvalidInterval,
    InvalidKind(u32),
    /// Previous clear size outside 1..=4
    InvalidClearSize(u32),
    /// Bits set outside the packed fields
    MalformedWord(u32),
    OutOfBounds(Point),
    DuplicateCell(Point),
    PieceOverlap(Point),
    /// A locked row is complete; a lock would have cleared it
    FullRow(i32),
    EmptyQueue,
    InvalidRotation { kind: PieceKind, rotation: usize },
    /// Active cells are not a translation of the saved rotation state
    ShapeMismatch,
    /// Restore is only accepted before the game starts
    NotIdle,
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::VersionMismatch(v) => {
                write!(f, "unsupported save version {v}, expected {SAVE_FORMAT_VERSION}")
            }
            RestoreError::Truncated => write!(f, "save data is truncated"),
            RestoreError::TrailingData(n) => write!(f, "{n} unexpected words after save data"),
            RestoreError::DimensionOutOfRange { width, height } => {
                write!(f, "saved grid {width}x{height} has invalid dimensions")
            }
            RestoreError::DimensionMismatch { saved, expected } => write!(
                f,
                "saved grid {}x{} does not match {}x{}",
                saved.0, saved.1, expected.0, expected.1
            ),
            RestoreError::InvalidLevel => write!(f, "saved level must be at least 1"),
            RestoreError::InvalidInterval => write!(f, "saved drop interval is zero"),
            RestoreError::InvalidKind(k) => write!(f, "unknown piece kind index {k}"),
            RestoreError::InvalidClearSize(n) => write!(f, "previous clear of {n} rows is impossible"),
            RestoreError::MalformedWord(w) => write!(f, "malformed packed word {w:#x}"),
            RestoreError::OutOfBounds(p) => write!(f, "cell {p} is outside the grid"),
            RestoreError::DuplicateCell(p) => write!(f, "cell {p} is listed twice"),
            RestoreError::PieceOverlap(p) => write!(f, "active piece overlaps locked cell {p}"),
            RestoreError::FullRow(y) => write!(f, "locked row {y} is full"),
            RestoreError::EmptyQueue => write!(f, "upcoming piece queue is empty"),
            RestoreError::InvalidRotation { kind, rotation } => write!(
                f,
                "rotation {rotation} does not exist for piece {}",
                kind.as_str()
            ),
            RestoreError::ShapeMismatch => {
                write!(f, "active cells do not match the saved rotation")
            }
            RestoreError::NotIdle => write!(f, "a game is already in progress"),
        }
    }
}

impl std::error::Error for RestoreError {}
