//! Deterministic noise core.
//!
//! Two grains of reproducible randomness:
//!
//! - [`crate::SeededStream`]: a discrete Park–Miller stream of uniform values in `[0, 1)`, opened
//!   fresh by every scatter generator.
//! - [`crate::long_cycle`]: a continuous, bounded function of `(time, seed)` built from partials at
//!   irrational frequency ratios, so its period never shows up over a long render.

pub(crate) mod cycle;
pub(crate) mod seeded;
