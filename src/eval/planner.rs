use std::sync::Arc;

use crate::{
    assets::layer::Layer,
    assets::registry::{AssetRegistry, AssetRenderer, StyleParams},
    atmosphere::mood::{Mood, MoodTable},
    composition::layout::LayoutResolver,
    composition::scene::{ColorShift, ComposedScene, Placement, Position, Slot, SlotAsset},
    foundation::core::{Affine, Canvas, FrameIndex, Point, Vec2},
};

/// Collaborators the planner resolves against.
#[derive(Clone, Copy)]
pub struct PlanContext<'a> {
    /// Asset lookup.
    pub registry: &'a AssetRegistry,
    /// Preset lookup.
    pub layout: &'a dyn LayoutResolver,
    /// Sky id to mood lookup for the horizon band.
    pub moods: &'a MoodTable,
    /// Target canvas.
    pub canvas: Canvas,
}

/// Why a scene entry produced no layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MissingReason {
    /// Asset id not in the registry.
    Unregistered,
    /// Position preset unknown to the layout resolver.
    UnknownPreset(String),
    /// The renderer returned an error.
    RenderFailed(String),
}

/// A scene entry that was skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingAsset {
    /// Slot of the entry.
    pub slot: Slot,
    /// Index inside the slot's list (0 for singular slots).
    pub index: usize,
    /// Asset id as written in the scene.
    pub asset: String,
    /// Why it was skipped.
    pub reason: MissingReason,
}

/// What draws a planned layer.
#[derive(Clone)]
pub enum LayerSource {
    /// Registered asset renderer.
    Asset(Arc<dyn AssetRenderer>),
    /// Horizon blender band.
    Horizon {
        /// Resolved mood.
        mood: Mood,
        /// Horizon row in canvas pixels.
        y: f64,
        /// Blend seed.
        seed: u64,
    },
}

impl std::fmt::Debug for LayerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset(_) => f.write_str("Asset(..)"),
            Self::Horizon { mood, y, seed } => f
                .debug_struct("Horizon")
                .field("mood", mood)
                .field("y", y)
                .field("seed", seed)
                .finish(),
        }
    }
}

/// How a rendered layer lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    /// Stretched over the whole canvas.
    FullCanvas,
    /// `translate(target) * scale(scale) * translate(-anchor)`; `target = None` pivots in place.
    Placed {
        /// Canvas point the anchor lands on.
        target: Option<Point>,
        /// Per-axis scale with mirroring folded into `x`.
        scale: Vec2,
    },
}

impl Geometry {
    /// Canvas transform for `layer`.
    pub fn transform_for(self, layer: &Layer, canvas: Canvas) -> Affine {
        match self {
            Geometry::FullCanvas => {
                if layer.width == canvas.width && layer.height == canvas.height {
                    Affine::IDENTITY
                } else {
                    Affine::scale_non_uniform(
                        canvas.w() / f64::from(layer.width),
                        canvas.h() / f64::from(layer.height),
                    )
                }
            }
            Geometry::Placed { target, scale } => {
                let anchor = layer.anchor.to_vec2();
                let target = target.map_or(anchor, Point::to_vec2);
                Affine::translate(target)
                    * Affine::scale_non_uniform(scale.x, scale.y)
                    * Affine::translate(-anchor)
            }
        }
    }
}

/// One layer of a frame plan.
#[derive(Clone, Debug)]
pub struct PlannedLayer {
    /// Slot the layer belongs to.
    pub slot: Slot,
    /// Index inside the slot's list (0 for singular slots).
    pub index: usize,
    /// Asset id (`horizon:<mood>` for the horizon band).
    pub asset: String,
    /// What draws it.
    pub source: LayerSource,
    /// Style passed to the renderer.
    pub style: StyleParams,
    /// Placement geometry.
    pub geometry: Geometry,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Color shift applied before compositing.
    pub color_shift: Option<ColorShift>,
}

/// Resolved, ordered layers for one frame.
#[derive(Clone, Debug)]
pub struct FramePlan {
    /// Frame being planned.
    pub frame: FrameIndex,
    /// Target canvas.
    pub canvas: Canvas,
    /// Layers bottom to top.
    pub layers: Vec<PlannedLayer>,
    /// Entries that were skipped.
    pub missing: Vec<MissingAsset>,
}

impl FramePlan {
    /// Slot of every planned layer, bottom to top.
    pub fn slots(&self) -> Vec<Slot> {
        self.layers.iter().map(|l| l.slot).collect()
    }

    /// Asset id of every planned layer, bottom to top.
    pub fn asset_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.asset.as_str()).collect()
    }
}

/// Resolve `scene` at `frame` into an ordered plan. Never fails: unresolved entries are
/// logged, recorded in [`FramePlan::missing`] and skipped.
#[tracing::instrument(skip(scene, ctx))]
pub fn plan_frame(scene: &ComposedScene, frame: FrameIndex, ctx: &PlanContext<'_>) -> FramePlan {
    let mut plan = FramePlan {
        frame,
        canvas: ctx.canvas,
        layers: Vec::new(),
        missing: Vec::new(),
    };

    for slot in Slot::ORDER {
        match slot {
            Slot::Sky => plan_slot_asset(&mut plan, ctx, slot, &scene.sky),
            Slot::Terrain => plan_slot_asset(&mut plan, ctx, slot, &scene.terrain),
            Slot::Lighting => plan_slot_asset(&mut plan, ctx, slot, &scene.lighting),
            Slot::Horizon => plan_horizon(&mut plan, ctx, scene),
            _ => {
                for (index, placement) in scene.placements(slot).iter().enumerate() {
                    plan_placement(&mut plan, ctx, slot, index, placement);
                }
            }
        }
    }
    plan
}

pub(crate) fn record_missing(
    missing: &mut Vec<MissingAsset>,
    slot: Slot,
    index: usize,
    asset: &str,
    reason: MissingReason,
) {
    match &reason {
        MissingReason::Unregistered => {
            tracing::warn!(
                slot = slot.name(),
                index,
                asset,
                "asset not registered, skipping layer"
            );
        }
        MissingReason::UnknownPreset(preset) => {
            tracing::warn!(
                slot = slot.name(),
                index,
                asset,
                preset = %preset,
                "unknown position preset, skipping layer"
            );
        }
        MissingReason::RenderFailed(err) => {
            tracing::warn!(
                slot = slot.name(),
                index,
                asset,
                error = %err,
                "asset render failed, skipping layer"
            );
        }
    }
    missing.push(MissingAsset {
        slot,
        index,
        asset: asset.to_owned(),
        reason,
    });
}

fn plan_slot_asset(plan: &mut FramePlan, ctx: &PlanContext<'_>, slot: Slot, entry: &SlotAsset) {
    let Some(renderer) = ctx.registry.resolve(&entry.asset) else {
        record_missing(&mut plan.missing, slot, 0, &entry.asset, MissingReason::Unregistered);
        return;
    };
    plan.layers.push(PlannedLayer {
        slot,
        index: 0,
        asset: entry.asset.clone(),
        source: LayerSource::Asset(renderer),
        style: StyleParams {
            color_shift: entry.color_shift,
            ..StyleParams::default()
        },
        geometry: Geometry::FullCanvas,
        opacity: 1.0,
        color_shift: entry.color_shift,
    });
}

fn plan_placement(
    plan: &mut FramePlan,
    ctx: &PlanContext<'_>,
    slot: Slot,
    index: usize,
    placement: &Placement,
) {
    let Some(renderer) = ctx.registry.resolve(&placement.asset) else {
        record_missing(
            &mut plan.missing,
            slot,
            index,
            &placement.asset,
            MissingReason::Unregistered,
        );
        return;
    };

    let target = match &placement.position {
        None => None,
        Some(Position::At(p)) => Some(*p),
        Some(Position::Preset(name)) => match ctx.layout.resolve(name, ctx.canvas) {
            Some(p) => Some(p),
            None => {
                record_missing(
                    &mut plan.missing,
                    slot,
                    index,
                    &placement.asset,
                    MissingReason::UnknownPreset(name.clone()),
                );
                return;
            }
        },
    };

    let scale = placement.scale.factors();
    let mirrored = Vec2::new(if placement.mirror { -scale.x } else { scale.x }, scale.y);
    let opacity = if placement.opacity.is_finite() {
        placement.opacity.clamp(0.0, 1.0)
    } else {
        1.0
    };

    plan.layers.push(PlannedLayer {
        slot,
        index,
        asset: placement.asset.clone(),
        source: LayerSource::Asset(renderer),
        style: StyleParams {
            position: target,
            scale,
            opacity,
            mirror: placement.mirror,
            color_shift: placement.color_shift,
        },
        geometry: Geometry::Placed {
            target,
            scale: mirrored,
        },
        opacity: opacity as f32,
        color_shift: placement.color_shift,
    });
}

fn plan_horizon(plan: &mut FramePlan, ctx: &PlanContext<'_>, scene: &ComposedScene) {
    let Some(horizon) = &scene.horizon else {
        return;
    };
    let mood = match &horizon.mood {
        Some(key) => Mood::from_key(key),
        None => match ctx.moods.mood_for_sky(&scene.sky.asset) {
            Some(mood) => mood,
            None => {
                tracing::debug!(
                    sky = %scene.sky.asset,
                    "sky has no mood mapping, horizon blend off"
                );
                return;
            }
        },
    };
    if mood == Mood::Indoor {
        return;
    }
    plan.layers.push(PlannedLayer {
        slot: Slot::Horizon,
        index: 0,
        asset: format!("horizon:{mood}"),
        source: LayerSource::Horizon {
            mood,
            y: horizon.y,
            seed: horizon.seed,
        },
        style: StyleParams::default(),
        geometry: Geometry::FullCanvas,
        opacity: 1.0,
        color_shift: None,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/eval/planner.rs"]
mod tests;
