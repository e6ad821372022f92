// src/prng.rs

/// Seeded mulberry32 generator.
///
/// One `u32` of state, advanced with wrapping add/multiply and xor-shift
/// mixing. Two instances built from the same seed yield the same sequence.
/// Not suitable for anything security related.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    const INCREMENT: u32 = 0x6D2B_79F5;
    const TWO_POW_32: f64 = 4_294_967_296.0;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Builds a generator from a wide seed (e.g. a millisecond timestamp),
    /// keeping only its low 32 bits.
    pub fn from_wide_seed(seed: i64) -> Self {
        Self::new(seed as u32)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / Self::TWO_POW_32
    }
}

impl Iterator for Mulberry32 {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
