use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    assets::layer::Layer,
    assets::registry::AssetRegistry,
    atmosphere::horizon::HorizonBlender,
    atmosphere::mood::MoodTable,
    composition::layout::{LayoutResolver, PresetTable},
    composition::scene::ComposedScene,
    eval::planner::{
        FramePlan, LayerSource, MissingAsset, MissingReason, PlanContext, PlannedLayer,
        plan_frame, record_missing,
    },
    foundation::core::{Affine, Canvas, FrameIndex, FrameRange, Rgba8Premul},
    foundation::error::{TableauError, TableauResult},
    render::{composite, cpu},
};

/// Environment variable overriding [`RenderThreading::threads`].
pub const THREADS_ENV: &str = "TABLEAU_RENDER_THREADS";
/// Environment variable overriding [`RenderThreading::chunk_size`].
pub const CHUNK_SIZE_ENV: &str = "TABLEAU_CHUNK_SIZE";

/// One composited frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
    /// Scene entries that produced no layer.
    pub missing: Vec<MissingAsset>,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as premultiplied `[r, g, b, a]`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Compositor options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositorOpts {
    /// Target canvas.
    pub canvas: Canvas,
    /// Backdrop under the sky slot, so a frame with every layer missing is still not empty.
    pub clear: Rgba8Premul,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            clear: Rgba8Premul::from_straight_rgba(48, 48, 56, 255),
        }
    }
}

/// Stacks a scene's layers into frames. `Send + Sync`; frames render in any order.
pub struct Compositor {
    registry: Arc<AssetRegistry>,
    layout: Arc<dyn LayoutResolver>,
    blender: HorizonBlender,
    moods: Arc<MoodTable>,
    opts: CompositorOpts,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("registry", &self.registry)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor with the stock presets and mood table.
    pub fn new(registry: Arc<AssetRegistry>, opts: CompositorOpts) -> TableauResult<Self> {
        Self::with_parts(
            registry,
            Arc::new(PresetTable::default()),
            Arc::new(MoodTable::default()),
            opts,
        )
    }

    /// Compositor with explicit collaborators.
    pub fn with_parts(
        registry: Arc<AssetRegistry>,
        layout: Arc<dyn LayoutResolver>,
        moods: Arc<MoodTable>,
        opts: CompositorOpts,
    ) -> TableauResult<Self> {
        opts.canvas.validate()?;
        Ok(Self {
            registry,
            layout,
            blender: HorizonBlender::new(Arc::clone(&moods)),
            moods,
            opts,
        })
    }

    /// Target canvas.
    pub fn canvas(&self) -> Canvas {
        self.opts.canvas
    }

    /// The registry in use.
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Resolve `scene` at `frame` without rendering.
    pub fn plan(&self, scene: &ComposedScene, frame: FrameIndex) -> FramePlan {
        let ctx = PlanContext {
            registry: &self.registry,
            layout: self.layout.as_ref(),
            moods: &self.moods,
            canvas: self.opts.canvas,
        };
        plan_frame(scene, frame, &ctx)
    }

    /// Plan and render one frame.
    pub fn compose(&self, scene: &ComposedScene, frame: FrameIndex) -> TableauResult<FrameRGBA> {
        let plan = self.plan(scene, frame);
        self.render_plan(&plan)
    }

    /// Rasterize and stack `plan` bottom to top.
    ///
    /// A layer whose renderer fails is skipped and reported in [`FrameRGBA::missing`].
    pub fn render_plan(&self, plan: &FramePlan) -> TableauResult<FrameRGBA> {
        let canvas = plan.canvas;
        canvas.validate()?;
        let mut data = vec![0u8; canvas.rgba_len()];
        composite::fill_in_place(&mut data, self.opts.clear.to_array());
        let mut missing = plan.missing.clone();

        for planned in &plan.layers {
            let layer = match self.render_layer(planned, plan.frame, canvas) {
                Ok(Some(layer)) => layer,
                Ok(None) => continue,
                Err(err) => {
                    record_missing(
                        &mut missing,
                        planned.slot,
                        planned.index,
                        &planned.asset,
                        MissingReason::RenderFailed(err.to_string()),
                    );
                    continue;
                }
            };
            if let Err(err) = draw_layer(&mut data, layer, planned, canvas) {
                record_missing(
                    &mut missing,
                    planned.slot,
                    planned.index,
                    &planned.asset,
                    MissingReason::RenderFailed(err.to_string()),
                );
            }
        }

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            missing,
        })
    }

    fn render_layer(
        &self,
        planned: &PlannedLayer,
        frame: FrameIndex,
        canvas: Canvas,
    ) -> TableauResult<Option<Layer>> {
        match &planned.source {
            LayerSource::Asset(renderer) => {
                renderer.render(frame, &planned.style, canvas).map(Some)
            }
            LayerSource::Horizon { mood, y, seed } => {
                Ok(self.blender.blend(*mood, frame, *y, *seed, canvas))
            }
        }
    }
}

fn draw_layer(
    dst: &mut [u8],
    mut layer: Layer,
    planned: &PlannedLayer,
    canvas: Canvas,
) -> TableauResult<()> {
    if layer.data.len() != (layer.width as usize * layer.height as usize).saturating_mul(4) {
        return Err(TableauError::render(format!(
            "layer is {}x{} but carries {} bytes",
            layer.width,
            layer.height,
            layer.data.len()
        )));
    }
    if planned.opacity <= 0.0 || layer.is_blank() {
        return Ok(());
    }
    if let Some(shift) = planned.color_shift {
        shift.apply_in_place(&mut layer.data);
    }

    let transform = planned.geometry.transform_for(&layer, canvas);
    let same_size = layer.width == canvas.width && layer.height == canvas.height;
    if same_size && transform == Affine::IDENTITY {
        return composite::over_in_place(dst, &layer.data, planned.opacity);
    }

    let coeffs = transform.as_coeffs();
    if coeffs.iter().any(|c| !c.is_finite()) || transform.determinant() == 0.0 {
        tracing::debug!(
            slot = planned.slot.name(),
            index = planned.index,
            asset = planned.asset.as_str(),
            "skipping placement with degenerate transform"
        );
        return Ok(());
    }
    let placed = cpu::resample_premul(
        &layer.data,
        layer.width,
        layer.height,
        transform,
        canvas.width,
        canvas.height,
    )?;
    composite::over_in_place(dst, &placed, planned.opacity)
}

/// Frame-range threading options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderThreading {
    /// Render chunks on a rayon pool.
    pub parallel: bool,
    /// Frames per chunk (0 is treated as 1).
    pub chunk_size: usize,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

impl RenderThreading {
    /// Defaults, with `TABLEAU_RENDER_THREADS` / `TABLEAU_CHUNK_SIZE` applied when set.
    ///
    /// Setting a thread count turns parallel rendering on. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut threading = Self::default();
        if let Some(n) = env_usize(THREADS_ENV) {
            threading.threads = Some(n.max(1));
            threading.parallel = true;
        }
        if let Some(n) = env_usize(CHUNK_SIZE_ENV) {
            threading.chunk_size = n;
        }
        threading
    }
}

fn env_usize(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable render setting");
            None
        }
    }
}

/// Counters for a range render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames requested.
    pub frames_total: u64,
    /// Frames rendered.
    pub frames_rendered: u64,
    /// Frames that had at least one skipped entry.
    pub frames_degraded: u64,
}

/// Render `range` in frame order. Output is identical for sequential and parallel modes.
#[tracing::instrument(skip(compositor, scene), fields(frames = range.len_frames()))]
pub fn render_frames(
    compositor: &Compositor,
    scene: &ComposedScene,
    range: FrameRange,
    threading: &RenderThreading,
) -> TableauResult<(Vec<FrameRGBA>, RenderStats)> {
    if range.is_empty() {
        return Err(TableauError::validation("render range must be non-empty"));
    }

    let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
    let mut stats = RenderStats {
        frames_total: range.len_frames(),
        ..RenderStats::default()
    };

    if !threading.parallel {
        for frame in range.frames() {
            let rendered = compositor.compose(scene, frame)?;
            stats.record(&rendered);
            out.push(rendered);
        }
        return Ok((out, stats));
    }

    let pool = build_thread_pool(threading.threads)?;
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = chunk_start.saturating_add(chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        let rendered = pool.install(|| {
            (chunk.start.0..chunk.end.0)
                .into_par_iter()
                .map(|f| compositor.compose(scene, FrameIndex(f)))
                .collect::<Vec<_>>()
        });
        for frame in rendered {
            let frame = frame?;
            stats.record(&frame);
            out.push(frame);
        }
        chunk_start = chunk_end;
    }

    Ok((out, stats))
}

impl RenderStats {
    fn record(&mut self, frame: &FrameRGBA) {
        self.frames_rendered += 1;
        if !frame.missing.is_empty() {
            self.frames_degraded += 1;
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> TableauResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TableauError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TableauError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
