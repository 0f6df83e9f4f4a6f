use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::layer::Layer,
    composition::scene::ColorShift,
    foundation::core::{Canvas, FrameIndex, Point, Vec2},
    foundation::error::TableauResult,
};

/// Styling handed to a renderer alongside the frame.
///
/// The compositor applies geometry, opacity and color shift itself; renderers may read these
/// values (for example to pick a detail level) but must not bake them in.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleParams {
    /// Resolved target position on the canvas, `None` for full-canvas slots.
    pub position: Option<Point>,
    /// Per-axis scale, before mirroring.
    pub scale: Vec2,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Horizontal mirror flag.
    pub mirror: bool,
    /// Color-shift tag.
    pub color_shift: Option<ColorShift>,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            position: None,
            scale: Vec2::new(1.0, 1.0),
            opacity: 1.0,
            mirror: false,
            color_shift: None,
        }
    }
}

/// Anything that can draw an asset for a frame.
pub trait AssetRenderer: Send + Sync {
    /// Draw the asset at `frame`.
    fn render(&self, frame: FrameIndex, style: &StyleParams, canvas: Canvas)
    -> TableauResult<Layer>;
}

impl<F> AssetRenderer for F
where
    F: Fn(FrameIndex, &StyleParams, Canvas) -> TableauResult<Layer> + Send + Sync,
{
    fn render(
        &self,
        frame: FrameIndex,
        style: &StyleParams,
        canvas: Canvas,
    ) -> TableauResult<Layer> {
        self(frame, style, canvas)
    }
}

/// A bundle of assets registered together during the load phase.
pub trait AssetModule {
    /// Register every asset of the module.
    fn register_into(&self, registry: &mut AssetRegistry);
}

/// String id to renderer map.
///
/// Populated once (`register`/`load` need `&mut self`), then shared read-only behind an
/// `Arc` for the rest of the render.
#[derive(Clone, Default)]
pub struct AssetRegistry {
    entries: HashMap<String, Arc<dyn AssetRenderer>>,
}

impl std::fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

impl AssetRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to `renderer`. Last write wins; the previous binding is returned.
    pub fn register<R>(
        &mut self,
        id: impl Into<String>,
        renderer: R,
    ) -> Option<Arc<dyn AssetRenderer>>
    where
        R: AssetRenderer + 'static,
    {
        self.register_arc(id, Arc::new(renderer))
    }

    /// Bind `id` to an already shared renderer.
    pub fn register_arc(
        &mut self,
        id: impl Into<String>,
        renderer: Arc<dyn AssetRenderer>,
    ) -> Option<Arc<dyn AssetRenderer>> {
        let id = id.into();
        let previous = self.entries.insert(id.clone(), renderer);
        if previous.is_some() {
            tracing::debug!(asset = %id, "asset registration overwritten");
        }
        previous
    }

    /// Run the load phase for `modules`, in order.
    pub fn load(&mut self, modules: &[&dyn AssetModule]) {
        for module in modules {
            module.register_into(self);
        }
        tracing::debug!(assets = self.entries.len(), "asset registry loaded");
    }

    /// Look up `id`. Never fails; repeated lookups return the same `Arc`.
    pub fn resolve(&self, id: &str) -> Option<Arc<dyn AssetRenderer>> {
        self.entries.get(id).cloned()
    }

    /// `true` when `id` is bound.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of bound ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/registry.rs"]
mod tests;
