//! Ghost module - landing projection of the active piece
//!
//! The projection never mutates the grid or the piece. Instead of stepping a
//! piece down row by row from the top, the empty band between the piece and
//! the nearest occupied row below it is skipped in one jump, then single-row
//! steps finish the descent.

use crate::grid::Grid;
use crate::pieces::PieceCoords;

/// Smallest element of `sorted` strictly greater than `target`.
///
/// `sorted` must be ascending. Returns None if every element is `<= target`.
///
/// ```
/// use blocktris_core::find_closest_larger;
///
/// assert_eq!(find_closest_larger(&[2, 5, 9], 5), Some(9));
/// assert_eq!(find_closest_larger(&[2, 5, 9], 0), Some(2));
/// assert_eq!(find_closest_larger(&[2, 5, 9], 9), None);
/// ```
pub fn find_closest_larger(sorted: &[i32], target: i32) -> Option<i32> {
    let idx = sorted.partition_point(|&v| v <= target);
    sorted.get(idx).copied()
}

fn shifted(coords: &PieceCoords, dy: i32) -> PieceCoords {
    coords.map(|p| p.offset(0, dy))
}

/// Where `coords` would come to rest if dropped straight down.
///
/// Returns `coords` unchanged when the piece cannot move down at all.
pub fn project_ghost(coords: &PieceCoords, grid: &Grid) -> PieceCoords {
    let top = coords.iter().map(|p| p.y).min().unwrap_or(0);
    let lowest = coords.iter().map(|p| p.y).max().unwrap_or(0);

    // Rows overlapping the piece's own span may hold cells beside it, so the
    // search starts from the top row of the piece.
    let rows = grid.occupied_rows();
    let bound = find_closest_larger(&rows, top).unwrap_or(grid.height());

    let mut ghost = *coords;
    let skip = bound - lowest - 1;
    if skip > 0 {
        let candidate = shifted(coords, skip);
        if !grid.is_collision(&candidate) {
            ghost = candidate;
        }
    }

    loop {
        let next = shifted(&ghost, 1);
        if grid.is_collision(&next) {
            return ghost;
        }
        ghost = next;
    }
}
