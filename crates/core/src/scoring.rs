//! Scoring module - points awarded for line clears
//!
//! A clear of `n` rows is worth `LINE_SCORES[n] * level * (starting_height + 1)`,
//! multiplied by the size of the previous clear. Back-to-back big clears pay
//! the most; the first clear of a game counts the previous one as a single.

use crate::types::LINE_SCORES;

/// Calculate line clear score
/// rows: number of rows cleared (1-4)
/// level: level after the clear was counted (1-based)
/// starting_height: the game's starting-height setting (0-10)
/// previous_rows: rows cleared by the previous clear (1-4)
pub fn calculate_line_score(rows: usize, level: u32, starting_height: u32, previous_rows: u32) -> u32 {
    if rows == 0 || rows > 4 {
        return 0;
    }
    LINE_SCORES[rows]
        .saturating_mul(level)
        .saturating_mul(starting_height.saturating_add(1))
        .saturating_mul(previous_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_at_level_one() {
        assert_eq!(calculate_line_score(1, 1, 0, 1), 40);
    }

    #[test]
    fn test_table_values() {
        assert_eq!(calculate_line_score(2, 1, 0, 1), 100);
        assert_eq!(calculate_line_score(3, 1, 0, 1), 300);
        assert_eq!(calculate_line_score(4, 1, 0, 1), 1200);
    }

    #[test]
    fn test_multipliers() {
        // level 3, starting height 2, after a double
        assert_eq!(calculate_line_score(1, 3, 2, 2), 40 * 3 * 3 * 2);
        // tetris after tetris
        assert_eq!(calculate_line_score(4, 1, 0, 4), 4800);
    }

    #[test]
    fn test_invalid_row_counts() {
        assert_eq!(calculate_line_score(0, 5, 0, 1), 0);
        assert_eq!(calculate_line_score(5, 5, 0, 1), 0);
    }

    #[test]
    fn test_saturates() {
        assert_eq!(calculate_line_score(4, u32::MAX, 10, 4), u32::MAX);
    }
}
