use crate::noise::seeded::SeededStream;

/// Hard ceiling on elements per generated set.
pub const MAX_ELEMENTS: usize = 100_000;

/// Closed value range `[min, max]` for one generated attribute.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Span {
    /// Create a span; bounds are sanitized at sampling time, not here.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate span always yielding `v`.
    pub const fn fixed(v: f64) -> Self {
        Self { min: v, max: v }
    }

    /// Reorder inverted bounds and collapse non-finite bounds to `0.0`.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_finite() { v } else { 0.0 };
        let (a, b) = (fix(self.min), fix(self.max));
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Draw one value; always consumes exactly one value from the stream.
    pub fn sample(self, stream: &mut SeededStream) -> f64 {
        let s = self.sanitized();
        stream.range(s.min, s.max)
    }
}

pub(crate) fn clamp_count(count: i64) -> usize {
    usize::try_from(count.max(0))
        .unwrap_or(MAX_ELEMENTS)
        .min(MAX_ELEMENTS)
}

/// Envelope for [`crate::stars`]. Positions are canvas fractions, radius in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StarEnvelope {
    /// Number of stars; negative clamps to zero.
    pub count: i64,
    /// Horizontal position as a fraction of canvas width.
    pub x: Span,
    /// Vertical position as a fraction of canvas height.
    pub y: Span,
    /// Radius in pixels.
    pub radius: Span,
    /// Base brightness in `[0, 1]`.
    pub brightness: Span,
    /// Noise time advanced per frame for twinkling.
    pub twinkle_rate: Span,
}

impl Default for StarEnvelope {
    fn default() -> Self {
        Self {
            count: 120,
            x: Span::new(0.0, 1.0),
            y: Span::new(0.0, 0.6),
            radius: Span::new(0.6, 2.2),
            brightness: Span::new(0.35, 1.0),
            twinkle_rate: Span::new(0.01, 0.08),
        }
    }
}

/// Envelope for [`crate::cloud_clusters`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CloudEnvelope {
    /// Number of clusters; negative clamps to zero.
    pub count: i64,
    /// Cluster centre x as a canvas-width fraction.
    pub x: Span,
    /// Cluster centre y as a canvas-height fraction.
    pub y: Span,
    /// Cluster width in pixels.
    pub width: Span,
    /// Cluster height in pixels.
    pub height: Span,
    /// Horizontal drift in pixels per frame (negative drifts left).
    pub drift_rate: Span,
    /// Cluster opacity in `[0, 1]`.
    pub opacity: Span,
    /// Puffs per cluster; negative clamps to zero.
    pub puffs: i64,
    /// Puff radius as a fraction of cluster height.
    pub puff_radius: Span,
}

impl Default for CloudEnvelope {
    fn default() -> Self {
        Self {
            count: 6,
            x: Span::new(0.0, 1.0),
            y: Span::new(0.08, 0.4),
            width: Span::new(180.0, 420.0),
            height: Span::new(50.0, 110.0),
            drift_rate: Span::new(0.05, 0.3),
            opacity: Span::new(0.55, 0.9),
            puffs: 5,
            puff_radius: Span::new(0.35, 0.6),
        }
    }
}

/// Envelope for [`crate::silhouette`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SilhouetteEnvelope {
    /// Control points across the canvas; values below 2 are raised to 2.
    pub points: i64,
    /// Baseline as a canvas-height fraction (the ridge rises above it).
    pub baseline: f64,
    /// Ridge height above the baseline as a canvas-height fraction.
    pub height: Span,
    /// Horizontal jitter as a fraction of control-point spacing.
    pub jitter: f64,
}

impl Default for SilhouetteEnvelope {
    fn default() -> Self {
        Self {
            points: 9,
            baseline: 0.72,
            height: Span::new(0.04, 0.16),
            jitter: 0.3,
        }
    }
}

/// Envelope for [`crate::ground_clutter`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClutterEnvelope {
    /// Number of items; negative clamps to zero.
    pub count: i64,
    /// Horizontal position as a canvas-width fraction.
    pub x: Span,
    /// Vertical position as a canvas-height fraction.
    pub y: Span,
    /// Item size in pixels.
    pub size: Span,
    /// Number of visual variants to pick from; values below 1 are raised to 1.
    pub variants: i64,
}

impl Default for ClutterEnvelope {
    fn default() -> Self {
        Self {
            count: 40,
            x: Span::new(0.0, 1.0),
            y: Span::new(0.78, 0.98),
            size: Span::new(6.0, 18.0),
            variants: 3,
        }
    }
}

/// Envelope for [`crate::dust`]; positions are band-relative.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DustEnvelope {
    /// Number of particles; negative clamps to zero.
    pub count: i64,
    /// Radius in pixels.
    pub radius: Span,
    /// Peak particle alpha in `[0, 1]`.
    pub alpha: Span,
    /// Noise time advanced per frame for drifting.
    pub drift_rate: Span,
}

impl Default for DustEnvelope {
    fn default() -> Self {
        Self {
            count: 24,
            radius: Span::new(1.0, 3.5),
            alpha: Span::new(0.2, 0.6),
            drift_rate: Span::new(0.002, 0.012),
        }
    }
}
