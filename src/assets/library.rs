//! Stock procedural assets.
//!
//! Every asset here derives its scatter sets once, at construction, from the library seed
//! and its own id, and rasterizes them per frame. Ids line up with the stock mood table's
//! sky lookup and [`crate::SceneCombo::stock`].

use crate::{
    assets::layer::{Layer, LayerPainter},
    assets::registry::{AssetModule, AssetRegistry, AssetRenderer, StyleParams},
    foundation::core::{BezPath, Canvas, FrameIndex, Point, Rect, Rgba8Premul},
    foundation::error::TableauResult,
    foundation::math::derive_seed,
    noise::cycle::{Wobble, long_cycle},
    scatter::envelope::{CloudEnvelope, ClutterEnvelope, SilhouetteEnvelope, Span, StarEnvelope},
    scatter::generators::{
        CloudCluster, Clutter, ScatterSet, Silhouette, Star, cloud_clusters, ground_clutter,
        silhouette, stars,
    },
};

/// Default library seed.
pub const STOCK_SEED: u64 = 401;

fn opaque(rgb: [u8; 3]) -> Rgba8Premul {
    Rgba8Premul::from_straight_rgba(rgb[0], rgb[1], rgb[2], 255)
}

/// Two-stop sky with an optional twinkling star field.
#[derive(Clone, Debug)]
pub struct GradientSky {
    top: [u8; 3],
    bottom: [u8; 3],
    star_field: Option<ScatterSet<Star>>,
    seed: u64,
}

impl GradientSky {
    /// Plain gradient.
    pub fn new(top: [u8; 3], bottom: [u8; 3]) -> Self {
        Self {
            top,
            bottom,
            star_field: None,
            seed: 0,
        }
    }

    /// Add stars generated from `seed`.
    pub fn with_stars(mut self, seed: u64, env: &StarEnvelope) -> Self {
        self.star_field = Some(stars(seed, env));
        self.seed = seed;
        self
    }
}

impl AssetRenderer for GradientSky {
    fn render(&self, frame: FrameIndex, _: &StyleParams, canvas: Canvas) -> TableauResult<Layer> {
        let base = Layer::vertical_gradient(
            canvas.width,
            canvas.height,
            &[(0.0, opaque(self.top)), (1.0, opaque(self.bottom))],
        )?;
        let Some(field) = &self.star_field else {
            return Ok(base);
        };
        let mut painter = LayerPainter::over(base)?;
        for star in field.iter() {
            let a = (star.brightness_at(frame, self.seed) * 255.0).round() as u8;
            painter.fill_circle(
                Point::new(star.x * canvas.w(), star.y * canvas.h()),
                star.radius,
                [255, 250, 235, a],
            );
        }
        painter.finish()
    }
}

/// Drifting puff clouds over a transparent canvas.
#[derive(Clone, Debug)]
pub struct CloudDeck {
    clusters: ScatterSet<CloudCluster>,
    color: [u8; 3],
}

impl CloudDeck {
    /// Clouds generated from `seed`.
    pub fn new(seed: u64, env: &CloudEnvelope, color: [u8; 3]) -> Self {
        Self {
            clusters: cloud_clusters(seed, env),
            color,
        }
    }
}

impl AssetRenderer for CloudDeck {
    fn render(&self, frame: FrameIndex, _: &StyleParams, canvas: Canvas) -> TableauResult<Layer> {
        let mut painter = LayerPainter::new(canvas.width, canvas.height)?;
        for cluster in self.clusters.iter() {
            let cx = cluster.center_x_at(frame, canvas);
            let cy = cluster.y * canvas.h();
            let a = (cluster.opacity * 255.0).round() as u8;
            let [r, g, b] = self.color;
            for puff in &cluster.puffs {
                painter.fill_circle(
                    Point::new(cx + puff.dx * cluster.width, cy + puff.dy * cluster.height),
                    puff.radius,
                    [r, g, b, a],
                );
            }
        }
        painter.finish()
    }
}

/// Layered ridge lines filled back to front.
#[derive(Clone, Debug)]
pub struct Ridges {
    ridges: Vec<(Silhouette, [u8; 3])>,
}

impl Ridges {
    /// One ridge per `(envelope, color)`, each seeded from `seed` and its index.
    pub fn new(seed: u64, layers: &[(SilhouetteEnvelope, [u8; 3])]) -> Self {
        let ridges = layers
            .iter()
            .enumerate()
            .map(|(i, (env, color))| (silhouette(seed.wrapping_add(i as u64), env), *color))
            .collect();
        Self { ridges }
    }
}

impl AssetRenderer for Ridges {
    fn render(&self, _: FrameIndex, _: &StyleParams, canvas: Canvas) -> TableauResult<Layer> {
        let mut painter = LayerPainter::new(canvas.width, canvas.height)?;
        for (ridge, [r, g, b]) in &self.ridges {
            painter.fill_path(&ridge.to_path(canvas), [*r, *g, *b, 255]);
        }
        painter.finish()
    }
}

/// Swaying ground clutter: tufts, pebbles and flowers.
#[derive(Clone, Debug)]
pub struct ClutterStrip {
    items: ScatterSet<Clutter>,
    seed: u64,
    sway: Wobble,
}

impl ClutterStrip {
    /// Clutter generated from `seed`.
    pub fn new(seed: u64, env: &ClutterEnvelope) -> Self {
        Self {
            items: ground_clutter(seed, env),
            seed,
            sway: Wobble::new(0.25, 0.03),
        }
    }
}

impl AssetRenderer for ClutterStrip {
    fn render(&self, frame: FrameIndex, _: &StyleParams, canvas: Canvas) -> TableauResult<Layer> {
        let mut order: Vec<&Clutter> = self.items.iter().collect();
        order.sort_by(|a, b| a.y.total_cmp(&b.y));

        let mut painter = LayerPainter::new(canvas.width, canvas.height)?;
        for item in order {
            let base = Point::new(item.x * canvas.w(), item.y * canvas.h());
            let s = item.size;
            match item.variant % 3 {
                0 => {
                    let lean = self.sway.at(frame, self.seed) + 0.2 * item.sway_phase.sin();
                    let mut tuft = BezPath::new();
                    tuft.move_to(Point::new(base.x - s * 0.3, base.y));
                    tuft.line_to(Point::new(base.x + lean * s, base.y - s));
                    tuft.line_to(Point::new(base.x + s * 0.3, base.y));
                    tuft.close_path();
                    painter.fill_path(&tuft, [70, 120, 60, 255]);
                }
                1 => painter.fill_circle(
                    Point::new(base.x, base.y - s * 0.25),
                    s * 0.3,
                    [130, 125, 118, 255],
                ),
                _ => {
                    painter.fill_rect(
                        Rect::new(base.x - 1.0, base.y - s, base.x + 1.0, base.y),
                        [60, 110, 55, 255],
                    );
                    painter.fill_circle(
                        Point::new(base.x, base.y - s),
                        s * 0.22,
                        [235, 200, 90, 255],
                    );
                }
            }
        }
        painter.finish()
    }
}

/// Simple standing figure with a breathing bob; anchored at its feet.
#[derive(Clone, Debug)]
pub struct Figure {
    color: [u8; 3],
    bob: Wobble,
    seed: u64,
}

impl Figure {
    /// Figure of `color`, animated from `seed`.
    pub fn new(color: [u8; 3], seed: u64) -> Self {
        Self {
            color,
            bob: Wobble::new(2.0, 0.05),
            seed,
        }
    }
}

impl AssetRenderer for Figure {
    fn render(&self, frame: FrameIndex, _: &StyleParams, _: Canvas) -> TableauResult<Layer> {
        let (w, h) = (60u32, 140u32);
        let mut painter = LayerPainter::new(w, h)?;
        let bob = self.bob.at(frame, self.seed);
        let [r, g, b] = self.color;
        painter.fill_rect(Rect::new(18.0, 60.0 + bob, 42.0, 140.0), [r, g, b, 255]);
        painter.fill_circle(Point::new(30.0, 40.0 + bob), 14.0, [r, g, b, 255]);
        // nose marks facing direction so mirroring is visible
        painter.fill_rect(Rect::new(42.0, 38.0 + bob, 48.0, 42.0 + bob), [r, g, b, 255]);
        painter.finish()
    }
}

/// Full-canvas translucent tint with a slow flicker.
#[derive(Clone, Debug)]
pub struct LightWash {
    tint: [u8; 3],
    alpha: f64,
    seed: u64,
}

impl LightWash {
    /// Wash of `tint` at `alpha`.
    pub fn new(tint: [u8; 3], alpha: f64, seed: u64) -> Self {
        Self { tint, alpha, seed }
    }
}

impl AssetRenderer for LightWash {
    fn render(&self, frame: FrameIndex, _: &StyleParams, canvas: Canvas) -> TableauResult<Layer> {
        let flicker = 0.9 + 0.1 * long_cycle(frame.as_f64() * 0.02, self.seed);
        Layer::solid(
            canvas.width,
            canvas.height,
            Rgba8Premul::from_rgb_alpha(self.tint, self.alpha * flicker),
        )
    }
}

fn blank_canvas(_: FrameIndex, _: &StyleParams, canvas: Canvas) -> TableauResult<Layer> {
    Layer::for_canvas(canvas)
}

/// The stock asset set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StockAssets {
    /// Library seed every asset derives its own seed from.
    pub seed: u64,
}

impl Default for StockAssets {
    fn default() -> Self {
        Self { seed: STOCK_SEED }
    }
}

const SKY_PALETTES: [(&str, [u8; 3], [u8; 3], bool); 10] = [
    ("sky-day", [98, 160, 230], [200, 225, 245], false),
    ("sky-day-cool", [120, 170, 225], [215, 232, 248], false),
    ("sky-dawn", [90, 90, 160], [250, 190, 180], false),
    ("sky-sunset", [70, 60, 130], [250, 150, 80], false),
    ("sky-sunset-cold", [50, 40, 110], [190, 140, 210], false),
    ("sky-dusk", [30, 35, 80], [110, 110, 170], true),
    ("sky-night", [6, 8, 28], [30, 40, 80], true),
    ("sky-storm", [70, 74, 82], [140, 144, 150], false),
    ("sky-desert", [140, 180, 220], [240, 215, 160], false),
    ("sky-interior", [60, 50, 45], [90, 78, 70], false),
];

impl StockAssets {
    fn seed_for(&self, id: &str) -> u64 {
        derive_seed(self.seed, id)
    }
}

impl AssetModule for StockAssets {
    fn register_into(&self, registry: &mut AssetRegistry) {
        let star_env = StarEnvelope {
            count: 120,
            ..StarEnvelope::default()
        };
        for (id, top, bottom, starry) in SKY_PALETTES {
            let sky = GradientSky::new(top, bottom);
            let sky = if starry {
                sky.with_stars(self.seed_for(id), &star_env)
            } else {
                sky
            };
            registry.register(id, sky);
        }

        registry.register(
            "clouds",
            CloudDeck::new(
                self.seed_for("clouds"),
                &CloudEnvelope::default(),
                [250, 250, 252],
            ),
        );

        let hill = |baseline: f64, height: (f64, f64)| SilhouetteEnvelope {
            baseline,
            height: Span::new(height.0, height.1),
            ..SilhouetteEnvelope::default()
        };
        registry.register(
            "hills",
            Ridges::new(
                self.seed_for("hills"),
                &[
                    (hill(0.62, (0.04, 0.14)), [88, 128, 96]),
                    (hill(0.72, (0.02, 0.10)), [64, 110, 70]),
                    (hill(0.82, (0.01, 0.06)), [48, 92, 52]),
                ],
            ),
        );
        registry.register(
            "dunes",
            Ridges::new(
                self.seed_for("dunes"),
                &[
                    (hill(0.66, (0.03, 0.09)), [214, 178, 118]),
                    (hill(0.78, (0.02, 0.07)), [196, 158, 98]),
                ],
            ),
        );
        registry.register(
            "floor",
            |_: FrameIndex, _: &StyleParams, c: Canvas| -> TableauResult<Layer> {
                let mut painter = LayerPainter::new(c.width, c.height)?;
                painter.fill_rect(Rect::new(0.0, c.h() * 0.7, c.w(), c.h()), [120, 92, 64, 255]);
                painter.finish()
            },
        );

        registry.register(
            "clutter",
            ClutterStrip::new(self.seed_for("clutter"), &ClutterEnvelope::default()),
        );
        registry.register("figure", Figure::new([40, 36, 44], self.seed_for("figure")));

        registry.register("light-none", blank_canvas);
        registry.register(
            "light-warm",
            LightWash::new([255, 190, 120], 0.12, self.seed_for("light-warm")),
        );
        registry.register(
            "light-night",
            LightWash::new([20, 30, 90], 0.3, self.seed_for("light-night")),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/library.rs"]
mod tests;
