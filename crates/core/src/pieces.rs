//! Pieces module - tetromino catalogue and rotation states
//!
//! Every kind is described by a list of 4x4 index maps. Index `n` in a map
//! names the cell `(n % 4, n / 4)` of a 4x4 box. The first map is the spawn
//! orientation and the list order is the rotation cycle.
//!
//! A [`Tetromino`] carries all of its rotation states already translated to
//! its current position, so rotating is a lookup plus one collision test.

use crate::types::{PieceKind, Point};

/// The four cells of a piece
pub type PieceCoords = [Point; 4];

/// Index map: four cell indices into a 4x4 box
pub type IndexMap = [u8; 4];

const I_MAPS: &[IndexMap] = &[[0, 1, 2, 3], [2, 6, 10, 14]];
const O_MAPS: &[IndexMap] = &[[0, 1, 4, 5]];
const J_MAPS: &[IndexMap] = &[[0, 4, 5, 6], [1, 5, 9, 8], [0, 1, 2, 6], [0, 1, 4, 8]];
const L_MAPS: &[IndexMap] = &[[2, 4, 5, 6], [0, 1, 5, 9], [0, 1, 2, 4], [0, 4, 8, 9]];
const S_MAPS: &[IndexMap] = &[[1, 2, 4, 5], [0, 4, 5, 9]];
const T_MAPS: &[IndexMap] = &[[0, 1, 2, 5], [0, 4, 8, 5], [1, 4, 5, 6], [1, 4, 5, 9]];
const Z_MAPS: &[IndexMap] = &[[0, 1, 5, 6], [1, 4, 5, 8]];

/// Rotation cycle for a piece kind, spawn orientation first
pub fn index_maps(kind: PieceKind) -> &'static [IndexMap] {
    match kind {
        PieceKind::I => I_MAPS,
        PieceKind::O => O_MAPS,
        PieceKind::J => J_MAPS,
        PieceKind::L => L_MAPS,
        PieceKind::S => S_MAPS,
        PieceKind::T => T_MAPS,
        PieceKind::Z => Z_MAPS,
    }
}

/// Nominal width used to center the piece on spawn
pub fn nominal_width(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::I => 4,
        PieceKind::O => 2,
        _ => 3,
    }
}

/// Convert a 4x4 box index to a point relative to the box origin.
#[inline(always)]
pub fn index_to_point(n: u8) -> Point {
    let n = n as i32;
    let x = n % 4;
    Point::new(x, (n - x) / 4)
}

/// Convert an index map to coordinates, shifted right by `x_offset`.
pub fn map_to_coords(map: &IndexMap, x_offset: i32) -> PieceCoords {
    map.map(|n| index_to_point(n).offset(x_offset, 0))
}

fn translate(coords: &PieceCoords, dx: i32, dy: i32) -> PieceCoords {
    coords.map(|p| p.offset(dx, dy))
}

/// Rotation states of `kind` placed at the spawn position of a grid `grid_width` wide.
///
/// With `invert` the non-spawn part of the cycle is reversed, which mirrors the
/// rotation direction while keeping the spawn orientation first.
pub fn spawn_rotations(kind: PieceKind, grid_width: i32, invert: bool) -> Vec<PieceCoords> {
    let x_offset = (grid_width / 2) - (nominal_width(kind) / 2);
    let mut rotations: Vec<PieceCoords> = index_maps(kind)
        .iter()
        .map(|map| map_to_coords(map, x_offset))
        .collect();
    if invert && rotations.len() > 2 {
        rotations[1..].reverse();
    }
    rotations
}

/// An active piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tetromino {
    kind: PieceKind,
    rotations: Vec<PieceCoords>,
    current_rotation: usize,
}

impl Tetromino {
    /// Build a piece at its centered spawn position
    pub fn spawn(kind: PieceKind, grid_width: i32, invert: bool) -> Self {
        Self {
            kind,
            rotations: spawn_rotations(kind, grid_width, invert),
            current_rotation: 0,
        }
    }

    /// Rebuild a piece at saved coordinates.
    ///
    /// The rotation states are translated by the delta between `coords` and the
    /// spawn state at `rotation`. Returns None if the rotation index is out of
    /// range or `coords` is not a translation of that state.
    pub fn from_saved(
        kind: PieceKind,
        grid_width: i32,
        invert: bool,
        rotation: usize,
        coords: PieceCoords,
    ) -> Option<Self> {
        let rotations = spawn_rotations(kind, grid_width, invert);
        let state = rotations.get(rotation)?;

        let dx = coords[0].x - state[0].x;
        let dy = coords[0].y - state[0].y;
        if translate(state, dx, dy) != coords {
            return None;
        }

        Some(Self {
            kind,
            rotations: rotations.iter().map(|r| translate(r, dx, dy)).collect(),
            current_rotation: rotation,
        })
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Current cells of the piece
    #[inline]
    pub fn coordinates(&self) -> PieceCoords {
        self.rotations[self.current_rotation]
    }

    pub fn rotation_index(&self) -> usize {
        self.current_rotation
    }

    pub fn rotation_count(&self) -> usize {
        self.rotations.len()
    }

    pub fn rotations(&self) -> &[PieceCoords] {
        &self.rotations
    }

    /// Cells the piece would occupy after moving by `(dx, dy)`
    pub fn moved(&self, dx: i32, dy: i32) -> PieceCoords {
        translate(&self.coordinates(), dx, dy)
    }

    /// Move the piece and every rotation state by `(dx, dy)`
    pub fn shift(&mut self, dx: i32, dy: i32) {
        for state in &mut self.rotations {
            *state = translate(state, dx, dy);
        }
    }

    /// Cells of the next rotation state, None for single-state kinds
    pub fn next_rotation(&self) -> Option<PieceCoords> {
        if self.rotations.len() < 2 {
            return None;
        }
        Some(self.rotations[(self.current_rotation + 1) % self.rotations.len()])
    }

    /// Commit the rotation returned by [`Tetromino::next_rotation`]
    pub fn advance_rotation(&mut self) {
        self.current_rotation = (self.current_rotation + 1) % self.rotations.len();
    }
}
