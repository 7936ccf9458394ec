//! Grid module - the playfield of locked cells
//!
//! The grid is a sparse, ordered map of `row -> (column -> kind)` holding only
//! occupied cells. A row with no cells has no entry at all.
//! Coordinates: (x, y) where x ranges 0..W (left to right) and y ranges 0..H
//! (top to bottom). The active falling piece is never stored here.

use std::collections::BTreeMap;

use crate::types::{PieceKind, Point};

type Row = BTreeMap<i32, PieceKind>;

/// The game grid - width x height cells, occupied cells only
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    rows: BTreeMap<i32, Row>,
}

impl Grid {
    /// Create a new empty grid
    ///
    /// Dimensions are assumed to be validated by [`crate::GameOptions::validate`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            rows: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline(always)]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Column offset that horizontally centers a piece of `piece_width` columns.
    pub fn center_offset(&self, piece_width: i32) -> i32 {
        (self.width / 2) - (piece_width / 2)
    }

    /// Get the kind locked at (x, y), if any.
    pub fn get(&self, x: i32, y: i32) -> Option<PieceKind> {
        self.rows.get(&y).and_then(|row| row.get(&x)).copied()
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Check whether any point is outside the grid or on an occupied cell.
    ///
    /// The bounds test always runs before the occupancy lookup.
    pub fn is_collision(&self, points: &[Point]) -> bool {
        points
            .iter()
            .any(|p| !self.in_bounds(p.x, p.y) || self.is_occupied(p.x, p.y))
    }

    /// Mark a cell as occupied, creating the row lazily.
    /// Returns false if the cell is out of bounds.
    pub fn fill_position(&mut self, x: i32, y: i32, kind: PieceKind) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.rows.entry(y).or_default().insert(x, kind);
        true
    }

    /// Check if a row is completely filled
    pub fn is_line_full(&self, y: i32) -> bool {
        self.rows
            .get(&y)
            .is_some_and(|row| row.len() == self.width as usize)
    }

    /// Remove a row entirely
    pub fn clear_line(&mut self, y: i32) {
        self.rows.remove(&y);
    }

    /// Compact the grid after one or more rows were cleared.
    ///
    /// Scans from `lowest` up to the topmost occupied row. Each missing row grows
    /// the shift; each present row moves down by the shift accumulated so far, so
    /// a block of cleared rows collapses in a single pass. Rows below `lowest`
    /// are never touched.
    pub fn push_lines(&mut self, lowest: i32) {
        let Some(&highest) = self.rows.keys().next() else {
            return;
        };

        let mut step = 0;
        let mut y = lowest;
        while y >= highest {
            match self.rows.remove(&y) {
                None => step += 1,
                Some(row) => {
                    self.rows.insert(y + step, row);
                }
            }
            y -= 1;
        }
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indices holding at least one cell, sorted top to bottom.
    pub fn occupied_rows(&self) -> Vec<i32> {
        self.rows.keys().copied().collect()
    }

    /// Occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Point, PieceKind)> + '_ {
        self.rows.iter().flat_map(|(&y, row)| {
            row.iter().map(move |(&x, &kind)| (Point::new(x, y), kind))
        })
    }

    /// Immutable copy of the occupied cells, safe to hand to subscribers.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            rows: self.rows.clone(),
        }
    }

    /// Rebuild a grid from a list of cells.
    ///
    /// Returns None if any cell is out of bounds or listed twice.
    pub fn from_cells(
        width: u32,
        height: u32,
        cells: impl IntoIterator<Item = (Point, PieceKind)>,
    ) -> Option<Self> {
        let mut grid = Self::new(width, height);
        for (p, kind) in cells {
            if grid.is_occupied(p.x, p.y) || !grid.fill_position(p.x, p.y, kind) {
                return None;
            }
        }
        Some(grid)
    }
}

/// Read-only copy of a [`Grid`] carried by event payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    width: i32,
    height: i32,
    rows: BTreeMap<i32, Row>,
}

impl GridSnapshot {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<PieceKind> {
        self.rows.get(&y).and_then(|row| row.get(&x)).copied()
    }

    /// Number of occupied cells in row `y`.
    pub fn row_len(&self, y: i32) -> usize {
        self.rows.get(&y).map_or(0, |row| row.len())
    }

    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }

    pub fn cells(&self) -> impl Iterator<Item = (Point, PieceKind)> + '_ {
        self.rows.iter().flat_map(|(&y, row)| {
            row.iter().map(move |(&x, &kind)| (Point::new(x, y), kind))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(grid: &mut Grid, y: i32, kind: PieceKind) {
        for x in 0..grid.width() {
            grid.fill_position(x, y, kind);
        }
    }

    #[test]
    fn test_center_offset() {
        let grid = Grid::new(10, 22);
        assert_eq!(grid.center_offset(4), 3); // I
        assert_eq!(grid.center_offset(2), 4); // O
        assert_eq!(grid.center_offset(3), 4); // rest
    }

    #[test]
    fn test_fill_position_creates_rows_lazily() {
        let mut grid = Grid::new(10, 22);
        assert!(grid.is_empty());

        assert!(grid.fill_position(9, 10, PieceKind::Z));
        assert_eq!(grid.occupied_rows(), vec![10]);
        assert_eq!(grid.get(9, 10), Some(PieceKind::Z));

        assert!(!grid.fill_position(10, 10, PieceKind::Z));
        assert!(!grid.fill_position(0, 22, PieceKind::Z));
        assert!(!grid.fill_position(-1, 0, PieceKind::Z));
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn test_is_collision() {
        let mut grid = Grid::new(10, 22);

        // Out of bounds
        assert!(grid.is_collision(&[Point::new(-1, 0)]));
        assert!(grid.is_collision(&[Point::new(10, 0)]));
        assert!(grid.is_collision(&[Point::new(0, 22)]));
        assert!(grid.is_collision(&[Point::new(0, -1)]));

        // Occupied
        grid.fill_position(9, 10, PieceKind::Z);
        assert!(grid.is_collision(&[Point::new(0, 0), Point::new(9, 10)]));

        // Free
        assert!(!grid.is_collision(&[Point::new(0, 0), Point::new(9, 21)]));
    }

    #[test]
    fn test_is_line_full() {
        let mut grid = Grid::new(10, 22);
        assert!(!grid.is_line_full(21));

        for x in 0..9 {
            grid.fill_position(x, 21, PieceKind::I);
        }
        assert!(!grid.is_line_full(21));

        grid.fill_position(9, 21, PieceKind::I);
        assert!(grid.is_line_full(21));
    }

    #[test]
    fn test_clear_line_removes_row_entry() {
        let mut grid = Grid::new(10, 22);
        fill_row(&mut grid, 21, PieceKind::I);
        grid.clear_line(21);
        assert!(grid.is_empty());
        assert_eq!(grid.occupied_rows(), Vec::<i32>::new());
    }

    #[test]
    fn test_push_lines_moves_top_row_to_floor() {
        let mut grid = Grid::new(10, 22);
        fill_row(&mut grid, 21, PieceKind::I);
        fill_row(&mut grid, 0, PieceKind::O);

        grid.clear_line(21);
        grid.push_lines(21);

        // Row 0 sat above 21 empty rows, so it lands on the floor.
        assert_eq!(grid.occupied_rows(), vec![21]);
        for x in 0..10 {
            assert_eq!(grid.get(x, 21), Some(PieceKind::O));
        }
    }

    #[test]
    fn test_push_lines_collapses_consecutive_rows_additively() {
        let mut grid = Grid::new(10, 22);
        grid.fill_position(0, 18, PieceKind::T);
        grid.fill_position(1, 19, PieceKind::S);
        fill_row(&mut grid, 20, PieceKind::I);
        fill_row(&mut grid, 21, PieceKind::I);

        grid.clear_line(21);
        grid.clear_line(20);
        grid.push_lines(21);

        assert_eq!(grid.occupied_rows(), vec![20, 21]);
        assert_eq!(grid.get(1, 21), Some(PieceKind::S));
        assert_eq!(grid.get(0, 20), Some(PieceKind::T));
    }

    #[test]
    fn test_push_lines_keeps_rows_below_lowest() {
        let mut grid = Grid::new(10, 22);
        grid.fill_position(3, 21, PieceKind::L);
        grid.fill_position(4, 19, PieceKind::J);
        fill_row(&mut grid, 20, PieceKind::I);

        grid.clear_line(20);
        grid.push_lines(20);

        assert_eq!(grid.get(3, 21), Some(PieceKind::L));
        assert_eq!(grid.get(4, 20), Some(PieceKind::J));
        assert_eq!(grid.cell_count(), 2);
    }

    #[test]
    fn test_push_lines_without_gaps_is_noop() {
        let mut grid = Grid::new(10, 22);
        grid.fill_position(0, 19, PieceKind::I);
        grid.fill_position(0, 20, PieceKind::O);
        grid.fill_position(0, 21, PieceKind::T);
        let before = grid.clone();

        grid.push_lines(21);
        assert_eq!(grid, before);

        let mut empty = Grid::new(10, 22);
        empty.push_lines(21);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_grid() {
        let mut grid = Grid::new(10, 22);
        grid.fill_position(2, 5, PieceKind::J);
        let snap = grid.snapshot();

        grid.clear();
        assert_eq!(snap.get(2, 5), Some(PieceKind::J));
        assert_eq!(snap.cell_count(), 1);
        assert_eq!(snap.row_len(5), 1);
    }

    #[test]
    fn test_from_cells_rejects_duplicates_and_out_of_bounds() {
        let ok = Grid::from_cells(10, 22, [(Point::new(1, 1), PieceKind::I)]);
        assert!(ok.is_some());

        let dup = Grid::from_cells(
            10,
            22,
            [
                (Point::new(1, 1), PieceKind::I),
                (Point::new(1, 1), PieceKind::O),
            ],
        );
        assert!(dup.is_none());

        let oob = Grid::from_cells(10, 22, [(Point::new(10, 1), PieceKind::I)]);
        assert!(oob.is_none());
    }

    #[test]
    fn test_cells_are_row_major() {
        let mut grid = Grid::new(10, 22);
        grid.fill_position(5, 3, PieceKind::S);
        grid.fill_position(1, 3, PieceKind::Z);
        grid.fill_position(0, 1, PieceKind::T);

        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![
                (Point::new(0, 1), PieceKind::T),
                (Point::new(1, 3), PieceKind::Z),
                (Point::new(5, 3), PieceKind::S),
            ]
        );
    }
}
