//! RNG module - piece sequencing for a game session
//!
//! Pieces are drawn either uniformly from the seven kinds (the default) or via
//! the "7-bag" rule, where each bag holds one of each kind, shuffled, and is
//! drawn until empty before a new bag is generated.
//!
//! The generator is a simple LCG owned by the session. Nothing here touches a
//! process-wide RNG: the same seed always deals the same pieces.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{PieceKind, DEFAULT_PIECE_LIMIT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
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

    /// Seed from the system clock
    pub fn from_time() -> Self {
        Self::new(clock_seed())
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // The low bits of an LCG cycle quickly; use the high half.
        (self.next_u32() >> 16) % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(1);
    (nanos ^ (nanos >> 32)) as u32
}

/// How the next piece kind is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieceRule {
    /// Each draw is independent and uniform over the seven kinds
    #[default]
    Uniform,
    /// One of each kind per shuffled bag of seven
    Bag7,
}

impl PieceRule {
    /// Parse `uniform` / `bag7` (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Some(PieceRule::Uniform),
            "bag7" | "bag" | "7bag" => Some(PieceRule::Bag7),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceRule::Uniform => "uniform",
            PieceRule::Bag7 => "bag7",
        }
    }
}

/// Bounded supply of piece kinds for one session
#[derive(Debug, Clone)]
pub struct PieceSequence {
    rule: PieceRule,
    rng: SimpleRng,
    /// Current bag (7-bag rule only)
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    remaining: usize,
}

impl PieceSequence {
    /// Create a sequence from an explicit seed
    pub fn new(seed: u32, rule: PieceRule, limit: usize) -> Self {
        Self::with_rng(SimpleRng::new(seed), rule, limit)
    }

    /// Create a time-seeded sequence
    pub fn unseeded(rule: PieceRule, limit: usize) -> Self {
        Self::with_rng(SimpleRng::from_time(), rule, limit)
    }

    fn with_rng(rng: SimpleRng, rule: PieceRule, limit: usize) -> Self {
        Self {
            rule,
            rng,
            bag: PieceKind::ALL,
            // Start exhausted so the first draw shuffles a fresh bag.
            bag_index: 7,
            remaining: limit,
        }
    }

    pub fn rule(&self) -> PieceRule {
        self.rule
    }

    /// Pieces still to be dealt
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next kind, `None` once the supply is exhausted
    pub fn draw(&mut self) -> Option<PieceKind> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let kind = match self.rule {
            PieceRule::Uniform => {
                let idx = self.rng.next_range(PieceKind::ALL.len() as u32) as usize;
                PieceKind::ALL[idx]
            }
            PieceRule::Bag7 => {
                if self.bag_index >= 7 {
                    self.refill_bag();
                }
                let kind = self.bag[self.bag_index];
                self.bag_index += 1;
                kind
            }
        };
        Some(kind)
    }
}

impl Default for PieceSequence {
    fn default() -> Self {
        Self::new(1, PieceRule::Uniform, DEFAULT_PIECE_LIMIT)
    }
}

impl Iterator for PieceSequence {
    type Item = PieceKind;

    fn next(&mut self) -> Option<PieceKind> {
        self.draw()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PieceSequence {}

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
    fn test_zero_seed_is_remapped() {
        assert_eq!(SimpleRng::new(0).state(), 1);
    }

    #[test]
    fn test_sequence_respects_limit() {
        let seq = PieceSequence::new(7, PieceRule::Uniform, 25);
        assert_eq!(seq.len(), 25);
        assert_eq!(seq.count(), 25);

        let mut empty = PieceSequence::new(7, PieceRule::Bag7, 0);
        assert_eq!(empty.draw(), None);
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let a: Vec<_> = PieceSequence::new(99, PieceRule::Uniform, 50).collect();
        let b: Vec<_> = PieceSequence::new(99, PieceRule::Uniform, 50).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_uniform_hits_every_kind() {
        let drawn: Vec<_> = PieceSequence::new(3, PieceRule::Uniform, 500).collect();
        for kind in PieceKind::ALL {
            assert!(drawn.contains(&kind), "Missing piece: {:?}", kind);
        }
    }

    #[test]
    fn test_bag7_deals_each_kind_once_per_bag() {
        let drawn: Vec<_> = PieceSequence::new(1, PieceRule::Bag7, 21).collect();
        for bag in drawn.chunks(7) {
            for kind in PieceKind::ALL {
                assert!(bag.contains(&kind), "Missing piece: {:?}", kind);
            }
        }
    }

    #[test]
    fn test_rule_parsing() {
        assert_eq!(PieceRule::from_str("Uniform"), Some(PieceRule::Uniform));
        assert_eq!(PieceRule::from_str("bag7"), Some(PieceRule::Bag7));
        assert_eq!(PieceRule::from_str("random"), None);
    }
}
