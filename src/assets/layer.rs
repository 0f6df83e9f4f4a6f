use crate::{
    foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul},
    foundation::error::{TableauError, TableauResult},
    render::{composite, cpu},
};

/// A self-contained drawable region returned by an asset renderer.
///
/// Pixels are premultiplied RGBA8, row-major and tightly packed. `anchor` is the local
/// point that a placement's position refers to and that scaling and mirroring pivot on;
/// it defaults to the bottom centre so figures stand on their position.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Placement pivot in local pixel coordinates.
    pub anchor: Point,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl Layer {
    /// Fully transparent layer.
    pub fn transparent(width: u32, height: u32) -> TableauResult<Self> {
        cpu::surface_dims(width, height)?;
        Ok(Self {
            width,
            height,
            anchor: bottom_center(width, height),
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        })
    }

    /// Transparent layer covering `canvas`.
    pub fn for_canvas(canvas: Canvas) -> TableauResult<Self> {
        Self::transparent(canvas.width, canvas.height)
    }

    /// Wrap existing premultiplied bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> TableauResult<Self> {
        cpu::surface_dims(width, height)?;
        if data.len() != (width as usize) * (height as usize) * 4 {
            return Err(TableauError::validation(format!(
                "layer data length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            anchor: bottom_center(width, height),
            data,
        })
    }

    /// Layer filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> TableauResult<Self> {
        let mut layer = Self::transparent(width, height)?;
        composite::fill_in_place(&mut layer.data, color.to_array());
        Ok(layer)
    }

    /// Vertical gradient through `stops` (`(t, color)` with `t` in `[0, 1]`, top to bottom).
    ///
    /// Stops are sorted by `t`; rows before the first or after the last stop take that
    /// stop's color. An empty stop list yields a transparent layer.
    pub fn vertical_gradient(
        width: u32,
        height: u32,
        stops: &[(f64, Rgba8Premul)],
    ) -> TableauResult<Self> {
        let mut layer = Self::transparent(width, height)?;
        let mut stops = stops.to_vec();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        if stops.is_empty() {
            return Ok(layer);
        }

        let row_len = (width as usize) * 4;
        let h1 = f64::from(height.max(2) - 1);
        for y in 0..height {
            let t = f64::from(y) / h1;
            let c = sample_stops(&stops, t);
            let row = &mut layer.data[(y as usize) * row_len..(y as usize + 1) * row_len];
            composite::fill_in_place(row, c);
        }
        Ok(layer)
    }

    /// Replace the anchor.
    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = anchor;
        self
    }

    /// Pixel at `(x, y)` as premultiplied `[r, g, b, a]`; `None` outside the layer.
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

    /// Mutable bytes of row `y`.
    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let row_len = (self.width as usize) * 4;
        let start = (y as usize) * row_len;
        &mut self.data[start..start + row_len]
    }

    /// `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Composite `other` (same size) over this layer.
    pub fn draw_over(&mut self, other: &Layer, opacity: f32) -> TableauResult<()> {
        if other.width != self.width || other.height != self.height {
            return Err(TableauError::render("draw_over expects equal-size layers"));
        }
        composite::over_in_place(&mut self.data, &other.data, opacity)
    }
}

fn bottom_center(width: u32, height: u32) -> Point {
    Point::new(f64::from(width) * 0.5, f64::from(height))
}

fn sample_stops(stops: &[(f64, Rgba8Premul)], t: f64) -> [u8; 4] {
    let first = stops[0];
    let last = stops[stops.len() - 1];
    if t <= first.0 {
        return first.1.to_array();
    }
    if t >= last.0 {
        return last.1.to_array();
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let u = if t1 > t0 { (t - t0) / (t1 - t0) } else { 1.0 };
            let lerp = |a: u8, b: u8| -> u8 {
                let af = f64::from(a);
                let bf = f64::from(b);
                (af + (bf - af) * u).round().clamp(0.0, 255.0) as u8
            };
            return [
                lerp(c0.r, c1.r),
                lerp(c0.g, c1.g),
                lerp(c0.b, c1.b),
                lerp(c0.a, c1.a),
            ];
        }
    }
    last.1.to_array()
}

/// Vector painter for building [`Layer`]s, backed by `vello_cpu`.
///
/// Colors are straight-alpha RGBA8; the finished layer is premultiplied.
pub struct LayerPainter {
    ctx: vello_cpu::RenderContext,
    width: u32,
    height: u32,
    base: Option<Layer>,
}

impl LayerPainter {
    /// Painter over a transparent `width x height` surface.
    pub fn new(width: u32, height: u32) -> TableauResult<Self> {
        Ok(Self {
            ctx: cpu::new_context(width, height)?,
            width,
            height,
            base: None,
        })
    }

    /// Painter whose strokes land on top of an existing layer.
    pub fn over(base: Layer) -> TableauResult<Self> {
        let mut painter = Self::new(base.width, base.height)?;
        painter.base = Some(base);
        Ok(painter)
    }

    /// Set the transform for subsequent fills.
    pub fn set_transform(&mut self, transform: Affine) {
        self.ctx.set_transform(cpu::affine_to_cpu(transform));
    }

    /// Fill an arbitrary path.
    pub fn fill_path(&mut self, path: &BezPath, rgba: [u8; 4]) {
        if rgba[3] == 0 {
            return;
        }
        self.ctx.set_paint(cpu::straight_color(rgba));
        self.ctx.fill_path(&cpu::bezpath_to_cpu(path));
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        if rgba[3] == 0 {
            return;
        }
        self.ctx.set_paint(cpu::straight_color(rgba));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, center: Point, radius: f64, rgba: [u8; 4]) {
        use kurbo::Shape;

        if radius <= 0.0 {
            return;
        }
        let path = kurbo::Circle::new(center, radius).to_path(0.1);
        self.fill_path(&path, rgba);
    }

    /// Rasterize everything painted so far into a layer.
    pub fn finish(self) -> TableauResult<Layer> {
        let strokes = cpu::finish_context(self.ctx, self.width, self.height)?;
        let strokes = Layer::from_premul_rgba8(self.width, self.height, strokes)?;
        match self.base {
            None => Ok(strokes),
            Some(mut base) => {
                base.draw_over(&strokes, 1.0)?;
                Ok(base)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/layer.rs"]
mod tests;
