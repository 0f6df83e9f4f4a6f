//! Tableau is a deterministic procedural layer-compositing engine for long-form rendered video.
//!
//! A frame is a pure function of `(seed, frame index, scene)`: the same inputs always give
//! bit-identical pixels, so frames can be rendered out of order or in parallel.
//!
//! # Pipeline overview
//!
//! 1. **Noise**: [`SeededStream`] (discrete) and [`long_cycle`] (continuous) give every
//!    generator and animation its reproducible randomness.
//! 2. **Scatter**: generators such as [`stars`] and [`cloud_clusters`] expand a seed and an
//!    envelope into element sets, once per render.
//! 3. **Plan**: [`plan_frame`] resolves a [`ComposedScene`] through the [`AssetRegistry`] and
//!    a [`LayoutResolver`] into a [`FramePlan`] in fixed slot order. Missing assets and
//!    unknown presets are logged and skipped, never fatal.
//! 4. **Render**: [`Compositor::render_plan`] rasterizes each planned layer, including the
//!    [`HorizonBlender`] band, and stacks premultiplied RGBA8 with source-over.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit registry**: assets are registered during a load phase and then shared
//!   read-only; there is no global state.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod atmosphere;
mod composition;
mod eval;
mod foundation;
mod noise;
mod render;
mod scatter;

pub use assets::layer::{Layer, LayerPainter};
pub use assets::library::{
    CloudDeck, ClutterStrip, Figure, GradientSky, LightWash, Ridges, STOCK_SEED, StockAssets,
};
pub use assets::registry::{AssetModule, AssetRegistry, AssetRenderer, StyleParams};
pub use atmosphere::horizon::{DRIFT_AMPLITUDE, DRIFT_RATE, HorizonBlender, PULSE_RATE};
pub use atmosphere::mood::{
    DustSpec, Haze, Mood, MoodConfig, MoodTable, SceneCombo, Spill, TableIssue,
};
pub use composition::layout::{LayoutResolver, PresetTable};
pub use composition::scene::{
    ColorShift, ComposedScene, HorizonSpec, Placement, Position, ScaleSpec, Slot, SlotAsset,
};
pub use eval::planner::{
    FramePlan, Geometry, LayerSource, MissingAsset, MissingReason, PlanContext, PlannedLayer,
    plan_frame,
};
pub use foundation::core::{
    Affine, BezPath, Canvas, FrameIndex, FrameRange, Point, Rect, Rgba8Premul, Vec2,
};
pub use foundation::error::{TableauError, TableauResult};
pub use noise::cycle::{Wobble, long_cycle, long_cycle01};
pub use noise::seeded::{LCG_MODULUS, LCG_MULTIPLIER, SeededStream};
pub use render::composite::{PremulRgba8, over, over_in_place};
pub use render::pipeline::{
    CHUNK_SIZE_ENV, Compositor, CompositorOpts, FrameRGBA, RenderStats, RenderThreading,
    THREADS_ENV, render_frames,
};
pub use scatter::envelope::{
    CloudEnvelope, ClutterEnvelope, DustEnvelope, MAX_ELEMENTS, SilhouetteEnvelope, Span,
    StarEnvelope,
};
pub use scatter::generators::{
    CloudCluster, Clutter, DustParticle, Puff, ScatterSet, Silhouette, Star, cloud_clusters,
    dust, ground_clutter, silhouette, stars,
};
