//! RNG module - pluggable piece selection
//!
//! The engine never touches an ambient random function. It draws kinds from a
//! [`PieceRng`], which can be:
//!
//! - [`SimpleRng`]: seeded LCG, identical sequences for identical seeds
//! - [`SequenceRng`]: a scripted, cycling list of kinds for tests and puzzles
//! - `fastrand::Rng`: entropy-seeded play

use crate::types::PieceKind;

/// Source of piece kinds.
pub trait PieceRng {
    /// Uniform value in `0..max` (0 when `max` is 0)
    fn next_below(&mut self, max: u32) -> u32;

    /// Uniformly pick one of the seven kinds
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::from_index(self.next_below(PieceKind::COUNT))
    }
}

impl<R: PieceRng + ?Sized> PieceRng for Box<R> {
    fn next_below(&mut self, max: u32) -> u32 {
        (**self).next_below(max)
    }

    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

impl PieceRng for fastrand::Rng {
    fn next_below(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.u32(..max)
    }
}

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

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current internal state (for restarting with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl PieceRng for SimpleRng {
    fn next_below(&mut self, max: u32) -> u32 {
        // Multiply-shift keeps the high bits; the low bits of an LCG cycle quickly.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Cycles through a fixed list of kinds.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    kinds: Vec<PieceKind>,
    pos: usize,
}

impl SequenceRng {
    /// An empty list falls back to cycling every kind in order.
    pub fn new<I: IntoIterator<Item = PieceKind>>(kinds: I) -> Self {
        let mut kinds: Vec<PieceKind> = kinds.into_iter().collect();
        if kinds.is_empty() {
            kinds.extend(PieceKind::ALL);
        }
        Self { kinds, pos: 0 }
    }

    /// Repeat a single kind forever
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new([kind])
    }
}

impl PieceRng for SequenceRng {
    fn next_below(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_kind().index() % max
    }

    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.pos];
        self.pos = (self.pos + 1) % self.kinds.len();
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        assert_eq!(SimpleRng::new(0).state(), 1);
    }

    #[test]
    fn test_next_below_stays_in_range() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_below(7) < 7);
        }
        assert_eq!(rng.next_below(0), 0);
    }

    #[test]
    fn test_every_kind_is_drawn() {
        let mut rng = SimpleRng::new(42);
        let mut seen = [0u32; 7];
        for _ in 0..7000 {
            seen[rng.next_kind().index() as usize] += 1;
        }
        // Roughly uniform: every kind within 30% of the expected 1000.
        for count in seen {
            assert!((700..=1300).contains(&count), "{seen:?}");
        }
    }

    #[test]
    fn test_sequence_cycles() {
        let mut rng = SequenceRng::new([PieceKind::O, PieceKind::I]);
        assert_eq!(rng.next_kind(), PieceKind::O);
        assert_eq!(rng.next_kind(), PieceKind::I);
        assert_eq!(rng.next_kind(), PieceKind::O);
    }

    #[test]
    fn test_empty_sequence_falls_back_to_all_kinds() {
        let mut rng = SequenceRng::new(Vec::new());
        let drawn: Vec<_> = (0..7).map(|_| rng.next_kind()).collect();
        assert_eq!(drawn, PieceKind::ALL);
    }

    #[test]
    fn test_boxed_rng_delegates() {
        let mut rng: Box<dyn PieceRng> = Box::new(SequenceRng::repeat(PieceKind::T));
        assert_eq!(rng.next_kind(), PieceKind::T);
    }

    #[test]
    fn test_fastrand_seeded_is_in_range() {
        let mut rng = fastrand::Rng::with_seed(9);
        for _ in 0..100 {
            assert!(rng.next_below(7) < 7);
        }
    }
}
