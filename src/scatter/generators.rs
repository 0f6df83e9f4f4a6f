use std::{f64::consts::TAU, ops::Deref, sync::Arc};

use crate::{
    foundation::core::{BezPath, Canvas, FrameIndex, Point},
    noise::{cycle::long_cycle, seeded::SeededStream},
    scatter::envelope::{
        ClutterEnvelope, CloudEnvelope, DustEnvelope, SilhouetteEnvelope, StarEnvelope,
        clamp_count,
    },
};

/// Immutable, cheaply cloneable element set shared by every frame of a render.
#[derive(Debug, PartialEq)]
pub struct ScatterSet<T>(Arc<[T]>);

impl<T> Clone for ScatterSet<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> From<Vec<T>> for ScatterSet<T> {
    fn from(v: Vec<T>) -> Self {
        Self(v.into())
    }
}

impl<T> Deref for ScatterSet<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

/// One star of a star field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Star {
    /// Canvas-width fraction.
    pub x: f64,
    /// Canvas-height fraction.
    pub y: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Base brightness.
    pub brightness: f64,
    /// Twinkle phase offset in radians.
    pub phase: f64,
    /// Noise time per frame.
    pub twinkle_rate: f64,
}

impl Star {
    /// Brightness at `frame`, dipping at most 40% below the base value.
    pub fn brightness_at(&self, frame: FrameIndex, seed: u64) -> f64 {
        let n = long_cycle(frame.as_f64() * self.twinkle_rate + self.phase, seed);
        (self.brightness * (0.8 + 0.2 * n)).clamp(0.0, 1.0)
    }
}

/// Generate a star field.
///
/// Pull order per star: `x, y, radius, brightness, phase, twinkle_rate`.
pub fn stars(seed: u64, env: &StarEnvelope) -> ScatterSet<Star> {
    let n = clamp_count(env.count);
    let mut s = SeededStream::new(seed);
    let out: Vec<Star> = (0..n)
        .map(|_| Star {
            x: env.x.sample(&mut s),
            y: env.y.sample(&mut s),
            radius: env.radius.sample(&mut s).max(0.0),
            brightness: env.brightness.sample(&mut s).clamp(0.0, 1.0),
            phase: s.next_unit() * TAU,
            twinkle_rate: env.twinkle_rate.sample(&mut s),
        })
        .collect();
    tracing::debug!(seed, count = out.len(), "generated star field");
    out.into()
}

/// One circular puff of a cloud cluster, relative to the cluster centre.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Puff {
    /// Offset as a fraction of cluster width, in `[-0.5, 0.5)`.
    pub dx: f64,
    /// Offset as a fraction of cluster height, in `[-0.5, 0.5)`.
    pub dy: f64,
    /// Radius in pixels.
    pub radius: f64,
}

/// A drifting cloud cluster made of puffs.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CloudCluster {
    /// Starting centre x as a canvas-width fraction.
    pub x: f64,
    /// Centre y as a canvas-height fraction.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Pixels per frame.
    pub drift_rate: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Puffs in draw order.
    pub puffs: Vec<Puff>,
}

impl CloudCluster {
    /// Centre x in pixels at `frame`; clusters wrap once fully off-canvas.
    pub fn center_x_at(&self, frame: FrameIndex, canvas: Canvas) -> f64 {
        let span = canvas.w() + self.width;
        let travelled = self.x * canvas.w() + self.drift_rate * frame.as_f64() + self.width * 0.5;
        travelled.rem_euclid(span) - self.width * 0.5
    }
}

/// Generate drifting cloud clusters.
///
/// Pull order per cluster: `x, y, width, height, drift_rate, opacity`, then per puff
/// `dx, dy, radius`.
pub fn cloud_clusters(seed: u64, env: &CloudEnvelope) -> ScatterSet<CloudCluster> {
    let n = clamp_count(env.count);
    let puffs = clamp_count(env.puffs);
    let mut s = SeededStream::new(seed);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let x = env.x.sample(&mut s);
        let y = env.y.sample(&mut s);
        let width = env.width.sample(&mut s).max(0.0);
        let height = env.height.sample(&mut s).max(0.0);
        let drift_rate = env.drift_rate.sample(&mut s);
        let opacity = env.opacity.sample(&mut s).clamp(0.0, 1.0);
        let puffs = (0..puffs)
            .map(|_| Puff {
                dx: s.next_unit() - 0.5,
                dy: s.next_unit() - 0.5,
                radius: env.puff_radius.sample(&mut s).max(0.0) * height,
            })
            .collect();
        out.push(CloudCluster {
            x,
            y,
            width,
            height,
            drift_rate,
            opacity,
            puffs,
        });
    }
    tracing::debug!(seed, count = out.len(), "generated cloud clusters");
    out.into()
}

/// Ridge line of control points in canvas fractions, left to right.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Silhouette {
    /// Control points; `x` in `[0, 1]`, `y` measured from the top.
    pub points: Vec<Point>,
}

impl Silhouette {
    /// Closed fill path: ridge smoothed through segment midpoints, down to the canvas bottom.
    pub fn to_path(&self, canvas: Canvas) -> BezPath {
        let mut path = BezPath::new();
        let px: Vec<Point> = self
            .points
            .iter()
            .map(|p| Point::new(p.x * canvas.w(), p.y * canvas.h()))
            .collect();
        let (Some(first), Some(last)) = (px.first(), px.last()) else {
            return path;
        };

        path.move_to(Point::new(first.x, canvas.h()));
        path.line_to(*first);
        for pair in px.windows(2) {
            let mid = pair[0].midpoint(pair[1]);
            path.quad_to(pair[0], mid);
        }
        path.line_to(*last);
        path.line_to(Point::new(last.x, canvas.h()));
        path.close_path();
        path
    }
}

/// Generate a hill or ridge silhouette.
///
/// Pull order per control point: `jitter_x, height`. The first and last points are pinned
/// to the canvas edges but still consume their jitter draw.
pub fn silhouette(seed: u64, env: &SilhouetteEnvelope) -> Silhouette {
    let n = clamp_count(env.points).max(2);
    let spacing = 1.0 / (n - 1) as f64;
    let jitter = if env.jitter.is_finite() {
        env.jitter.clamp(0.0, 0.5)
    } else {
        0.0
    };
    let baseline = if env.baseline.is_finite() {
        env.baseline
    } else {
        0.0
    };
    let mut s = SeededStream::new(seed);
    let points = (0..n)
        .map(|i| {
            let jx = s.signed() * jitter * spacing;
            let h = env.height.sample(&mut s);
            let x = if i == 0 {
                0.0
            } else if i == n - 1 {
                1.0
            } else {
                (i as f64 * spacing + jx).clamp(0.0, 1.0)
            };
            Point::new(x, baseline - h)
        })
        .collect();
    Silhouette { points }
}

/// One piece of ground clutter (tuft, pebble, flower).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Clutter {
    /// Canvas-width fraction.
    pub x: f64,
    /// Canvas-height fraction where the item sits.
    pub y: f64,
    /// Size in pixels.
    pub size: f64,
    /// Variant index in `[0, variants)`.
    pub variant: usize,
    /// Sway phase in radians.
    pub sway_phase: f64,
}

/// Generate ground clutter.
///
/// Pull order per item: `x, y, size, variant, sway_phase`.
pub fn ground_clutter(seed: u64, env: &ClutterEnvelope) -> ScatterSet<Clutter> {
    let n = clamp_count(env.count);
    let variants = clamp_count(env.variants).max(1);
    let mut s = SeededStream::new(seed);
    let out: Vec<Clutter> = (0..n)
        .map(|_| Clutter {
            x: env.x.sample(&mut s),
            y: env.y.sample(&mut s),
            size: env.size.sample(&mut s).max(0.0),
            variant: s.index(variants),
            sway_phase: s.next_unit() * TAU,
        })
        .collect();
    out.into()
}

/// One dust/haze mote inside the horizon band.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DustParticle {
    /// Starting canvas-width fraction.
    pub x: f64,
    /// Vertical offset in band half-heights, in `[-1, 1)`.
    pub band_offset: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Peak alpha.
    pub alpha: f64,
    /// Noise time per frame.
    pub drift_rate: f64,
    /// Noise phase offset.
    pub phase: f64,
}

/// Generate horizon dust motes.
///
/// Pull order per particle: `x, band_offset, radius, alpha, drift_rate, phase`.
pub fn dust(seed: u64, env: &DustEnvelope) -> ScatterSet<DustParticle> {
    let n = clamp_count(env.count);
    let mut s = SeededStream::new(seed);
    let out: Vec<DustParticle> = (0..n)
        .map(|_| DustParticle {
            x: s.next_unit(),
            band_offset: s.signed(),
            radius: env.radius.sample(&mut s).max(0.0),
            alpha: env.alpha.sample(&mut s).clamp(0.0, 1.0),
            drift_rate: env.drift_rate.sample(&mut s),
            phase: s.next_unit() * 1_000.0,
        })
        .collect();
    out.into()
}

#[cfg(test)]
#[path = "../../tests/unit/scatter/generators.rs"]
mod tests;
