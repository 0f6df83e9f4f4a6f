use std::f64::consts::TAU;

use crate::{foundation::core::FrameIndex, noise::seeded::SeededStream};

const PHI: f64 = 1.618_033_988_749_895;
const SILVER: f64 = 2.414_213_562_373_095;
const ENVELOPE_RATE: f64 = 0.0731;
const DRIFT_RATE: f64 = 0.0137 * PHI;

#[derive(Clone, Copy, Debug)]
struct Phases {
    fast_a: f64,
    fast_b: f64,
    fast_c: f64,
    envelope: f64,
    drift: f64,
}

impl Phases {
    // Pull order: fast_a, fast_b, fast_c, envelope, drift.
    fn for_seed(seed: u64) -> Self {
        let mut s = SeededStream::new(seed);
        Self {
            fast_a: s.next_unit() * TAU,
            fast_b: s.next_unit() * TAU,
            fast_c: s.next_unit() * TAU,
            envelope: s.next_unit() * TAU,
            drift: s.next_unit() * TAU,
        }
    }
}

/// Smooth, bounded, non-repeating noise in `[-1, 1]`.
///
/// `time` is usually `frame * rate`. Three partials at frequency ratios `1 : φ : 1+√2`
/// are scaled by a slow envelope and offset by an even slower drift; no combination of
/// them shares a common period.
pub fn long_cycle(time: f64, seed: u64) -> f64 {
    if !time.is_finite() {
        return 0.0;
    }
    let p = Phases::for_seed(seed);
    let fast = 0.5 * (time + p.fast_a).sin()
        + 0.3 * (time * PHI + p.fast_b).sin()
        + 0.2 * (time * SILVER + p.fast_c).sin();
    let envelope = 0.75 + 0.25 * (time * ENVELOPE_RATE + p.envelope).sin();
    let drift = 0.2 * (time * DRIFT_RATE + p.drift).sin();
    (fast * envelope * 0.8 + drift).clamp(-1.0, 1.0)
}

/// [`long_cycle`] remapped to `[0, 1]`.
pub fn long_cycle01(time: f64, seed: u64) -> f64 {
    (long_cycle(time, seed) + 1.0) * 0.5
}

/// A frame-driven long-cycle noise source: `offset + amp * long_cycle(frame * rate, seed')`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Wobble {
    /// Output amplitude.
    pub amp: f64,
    /// Noise time advanced per frame.
    pub rate: f64,
    /// Constant added to the output.
    #[serde(default)]
    pub offset: f64,
    /// Per-source phase key mixed into the caller's seed.
    #[serde(default)]
    pub phase: u64,
}

impl Wobble {
    /// Create a wobble with zero offset and phase.
    pub fn new(amp: f64, rate: f64) -> Self {
        Self {
            amp,
            rate,
            offset: 0.0,
            phase: 0,
        }
    }

    /// Same source with a different phase key.
    pub fn with_phase(mut self, phase: u64) -> Self {
        self.phase = phase;
        self
    }

    /// Sample at `frame`; bounded to `offset ± |amp|`.
    pub fn at(&self, frame: FrameIndex, seed: u64) -> f64 {
        let t = frame.as_f64() * self.rate;
        self.offset + self.amp * long_cycle(t, seed.wrapping_add(self.phase))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/noise/cycle.rs"]
mod tests;
