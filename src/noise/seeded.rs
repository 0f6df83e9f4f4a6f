/// Park–Miller multiplier.
pub const LCG_MULTIPLIER: u64 = 16_807;
/// Park–Miller modulus, the Mersenne prime `2^31 - 1`.
pub const LCG_MODULUS: u64 = 2_147_483_647;

// With a direct seed, the first draw is `seed * 16807 / M`, so neighbouring small seeds
// start nearly equal. Discarding two draws pushes the per-seed offset to A^3 mod M.
const WARMUP_DRAWS: usize = 2;

/// Discrete seeded stream of uniform values in `[0, 1)`.
///
/// `state = (state * 16807) mod (2^31 - 1)`, output `(state - 1) / (M - 1)`. The seed is
/// folded into `[1, M - 1]`; zero (and multiples of `M`) map to `M - 1`.
///
/// A stream is a value, not shared state: every generator opens its own from the seed it
/// was given, so unrelated generators never perturb each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededStream {
    state: u64,
}

impl SeededStream {
    /// Open a stream for `seed`.
    pub fn new(seed: u64) -> Self {
        let folded = seed % LCG_MODULUS;
        let state = if folded == 0 { LCG_MODULUS - 1 } else { folded };
        let mut stream = Self { state };
        for _ in 0..WARMUP_DRAWS {
            stream.step();
        }
        stream
    }

    fn step(&mut self) {
        // state < 2^31 and A < 2^15, the product fits comfortably in u64.
        self.state = (self.state * LCG_MULTIPLIER) % LCG_MODULUS;
    }

    /// Next uniform value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.step();
        (self.state - 1) as f64 / (LCG_MODULUS - 1) as f64
    }

    /// Next value in `[-1, 1)`.
    pub fn signed(&mut self) -> f64 {
        self.next_unit() * 2.0 - 1.0
    }

    /// Next value between `lo` and `hi`; inverted bounds are reordered.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        lo + (hi - lo) * self.next_unit()
    }

    /// Next integer in `[0, n)`; `n == 0` yields `0` and still consumes one draw.
    pub fn index(&mut self, n: usize) -> usize {
        let u = self.next_unit();
        if n == 0 {
            return 0;
        }
        ((u * n as f64) as usize).min(n - 1)
    }
}

impl Iterator for SeededStream {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_unit())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/noise/seeded.rs"]
mod tests;
