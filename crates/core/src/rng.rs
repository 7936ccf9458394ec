//! RNG module - seeded random source and the upcoming-piece queue
//!
//! Every random decision of a game (next kinds, starting-height garbage) goes
//! through one [`SimpleRng`], so a seed fully determines a game and the RNG
//! state can be saved alongside the grid.
//!
//! The queue draws each kind uniformly and independently. Consuming the head
//! appends one fresh kind, so the queue never runs empty.

use std::collections::VecDeque;

use crate::types::{PieceKind, INITIAL_QUEUE_LEN};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Resume from a state previously returned by [`SimpleRng::state`]
    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max). Returns 0 when `max` is 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max
    }

    /// Generate random value in the inclusive range [lo, hi]
    pub fn next_between(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.next_range(hi - lo + 1)
    }

    /// Uniformly chosen piece kind
    pub fn next_kind(&mut self) -> PieceKind {
        let index = self.next_range(PieceKind::ALL.len() as u32) as usize;
        PieceKind::ALL[index]
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Ordered upcoming kinds; the head is the next piece to spawn
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PieceQueue {
    kinds: VecDeque<PieceKind>,
}

impl PieceQueue {
    /// Queue seeded with [`INITIAL_QUEUE_LEN`] random kinds
    pub fn new(rng: &mut SimpleRng) -> Self {
        let mut queue = Self::default();
        queue.fill_to(INITIAL_QUEUE_LEN, rng);
        queue
    }

    /// Queue holding exactly `kinds`, in order (used by restore)
    pub fn from_kinds(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    fn fill_to(&mut self, len: usize, rng: &mut SimpleRng) {
        while self.kinds.len() < len {
            self.kinds.push_back(rng.next_kind());
        }
    }

    /// Pop the head and append one new random kind
    pub fn draw(&mut self, rng: &mut SimpleRng) -> PieceKind {
        self.fill_to(1, rng);
        let kind = self.kinds.pop_front().unwrap_or(PieceKind::I);
        self.kinds.push_back(rng.next_kind());
        kind
    }

    /// The next `n` kinds in order.
    ///
    /// Grows the tail when fewer than `n` kinds are queued; never reorders.
    pub fn peek(&mut self, n: usize, rng: &mut SimpleRng) -> Vec<PieceKind> {
        self.fill_to(n, rng);
        self.kinds.iter().take(n).copied().collect()
    }

    /// Next kind without consuming it
    pub fn head(&self) -> Option<PieceKind> {
        self.kinds.front().copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.kinds.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_remapped() {
        assert_eq!(SimpleRng::new(0), SimpleRng::new(1));
    }

    #[test]
    fn test_rng_state_resumes_sequence() {
        let mut rng = SimpleRng::new(777);
        rng.next_u32();
        let mut resumed = SimpleRng::from_state(rng.state());
        for _ in 0..20 {
            assert_eq!(rng.next_u32(), resumed.next_u32());
        }
    }

    #[test]
    fn test_next_between_is_inclusive() {
        let mut rng = SimpleRng::new(3);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let v = rng.next_between(1, 4);
            assert!((1..=4).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_next_kind_covers_all_kinds() {
        let mut rng = SimpleRng::new(42);
        let mut seen = Vec::new();
        for _ in 0..500 {
            let kind = rng.next_kind();
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_queue_starts_with_four_kinds() {
        let mut rng = SimpleRng::new(1);
        let queue = PieceQueue::new(&mut rng);
        assert_eq!(queue.len(), INITIAL_QUEUE_LEN);
    }

    #[test]
    fn test_draw_pops_head_and_keeps_length() {
        let mut rng = SimpleRng::new(9);
        let mut queue = PieceQueue::new(&mut rng);
        let expected: Vec<PieceKind> = queue.iter().collect();

        let drawn = queue.draw(&mut rng);
        assert_eq!(drawn, expected[0]);
        assert_eq!(queue.len(), INITIAL_QUEUE_LEN);

        let rest: Vec<PieceKind> = queue.iter().take(3).collect();
        assert_eq!(rest, expected[1..]);
    }

    #[test]
    fn test_peek_does_not_reorder() {
        let mut rng = SimpleRng::new(5);
        let mut queue = PieceQueue::new(&mut rng);

        let first = queue.peek(3, &mut rng);
        let again = queue.peek(3, &mut rng);
        assert_eq!(first, again);

        // Peeking past the end grows the tail only.
        let long = queue.peek(10, &mut rng);
        assert_eq!(long.len(), 10);
        assert_eq!(long[..3], first[..]);
        assert_eq!(queue.head(), Some(first[0]));
    }

    #[test]
    fn test_from_kinds_preserves_order() {
        let kinds = [PieceKind::Z, PieceKind::I, PieceKind::O];
        let queue = PieceQueue::from_kinds(kinds);
        assert_eq!(queue.iter().collect::<Vec<_>>(), kinds.to_vec());
    }
}
