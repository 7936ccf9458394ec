//! Core types module - shared value types and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain `Copy` data with no external dependencies, so they can be
//! passed freely between the rules engine, event subscribers and renderers.
//!
//! # Grid Dimensions
//!
//! The default playfield is 10 columns by 22 rows:
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 22 rows (indexed 0-21, row 0 at the top)
//!
//! # Drop Timing
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 1000 | Auto-drop interval at level 1 |
//! | `DROP_STEP_MS` | 50 | Interval reduction per level |
//! | `DROP_INTERVAL_MIN_MS` | 100 | Interval floor |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines per level-up |
//!
//! # Examples
//!
//! ```
//! use blocktris_types::{Direction, PieceKind, Point};
//!
//! let p = Point::new(3, 0);
//! assert_eq!(p.step(Direction::Down), Point::new(3, 1));
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::from_index(0), Some(PieceKind::I));
//! ```

/// Default grid width in cells (10 columns)
pub const DEFAULT_GRID_WIDTH: u32 = 10;

/// Default grid height in cells (22 rows)
pub const DEFAULT_GRID_HEIGHT: u32 = 22;

/// Smallest accepted grid dimension (every piece fits a 4x4 box)
pub const MIN_GRID_DIMENSION: u32 = 4;

/// Largest accepted grid dimension (coordinates are packed into 8 bits)
pub const MAX_GRID_DIMENSION: u32 = 255;

/// Auto-drop interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Interval reduction for each level above 1
pub const DROP_STEP_MS: u32 = 50;

/// Absolute minimum auto-drop interval (100ms)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Cumulative cleared lines needed for each level-up
pub const LINES_PER_LEVEL: u32 = 10;

/// Consecutive downward collisions before the active piece is locked
pub const SOFT_LOCK_THRESHOLD: u8 = 2;

/// Number of upcoming kinds seeded into the queue for a new game
pub const INITIAL_QUEUE_LEN: usize = 4;

/// Highest accepted starting-height setting (10 = the whole grid)
pub const MAX_STARTING_HEIGHT: u32 = 10;

/// Top rows kept free of starting garbage so the first pieces can spawn and rotate
pub const SPAWN_ROWS: u32 = 4;

/// Base points for a line clear, indexed by rows cleared (0-4)
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// A grid cell position.
///
/// `x` grows to the right, `y` grows downwards. Points are plain values: every
/// translation returns a new point and never touches the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Return this point moved one cell in `direction`.
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// The seven tetromino piece kinds
///
/// The declaration order is significant: it defines the kind index used by
/// saved games, so new kinds must never be inserted in the middle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    J,
    L,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in index order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Stable index of this kind (0..7).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`PieceKind::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Movement directions accepted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Cell delta `(dx, dy)` for one step in this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Down => "down",
        }
    }
}

/// Player actions produced by a front end's input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    /// Pause when running, resume when paused
    TogglePause,
    /// Abandon the current game and start a new one
    Restart,
}

/// Auto-drop interval for a starting level.
///
/// `BASE_DROP_MS - (level - 1) * DROP_STEP_MS`, never below `DROP_INTERVAL_MIN_MS`.
///
/// ```
/// use blocktris_types::drop_interval_for_level;
///
/// assert_eq!(drop_interval_for_level(1), 1000);
/// assert_eq!(drop_interval_for_level(5), 800);
/// assert_eq!(drop_interval_for_level(40), 100);
/// ```
pub fn drop_interval_for_level(level: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(reduction)
        .max(DROP_INTERVAL_MIN_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_index_roundtrips_in_declaration_order() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceKind::from_index(i), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(7), None);
    }

    #[test]
    fn point_step_returns_new_value() {
        let p = Point::new(4, 4);
        let left = p.step(Direction::Left);
        let right = p.step(Direction::Right);
        let down = p.step(Direction::Down);

        assert_eq!(left, Point::new(3, 4));
        assert_eq!(right, Point::new(5, 4));
        assert_eq!(down, Point::new(4, 5));
        assert_eq!(p, Point::new(4, 4));
    }

    #[test]
    fn point_display_matches_save_debug_format() {
        assert_eq!(Point::new(3, 21).to_string(), "3x21");
    }

    #[test]
    fn drop_interval_is_clamped() {
        assert_eq!(drop_interval_for_level(0), BASE_DROP_MS);
        assert_eq!(drop_interval_for_level(2), 950);
        assert_eq!(drop_interval_for_level(19), DROP_INTERVAL_MIN_MS);
        assert_eq!(drop_interval_for_level(u32::MAX), DROP_INTERVAL_MIN_MS);
    }

    #[test]
    fn piece_kind_string_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
    }
}
