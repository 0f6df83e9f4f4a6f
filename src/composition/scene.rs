use std::{fs::File, io::Read, path::Path};

use anyhow::Context;

use crate::{
    foundation::core::{Point, Vec2},
    foundation::error::{TableauError, TableauResult},
};

/// The ten stacking slots, in the order they are composited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
    /// Full-canvas sky.
    Sky,
    /// Full-canvas ground.
    Terrain,
    /// Horizon haze band drawn by the blender (not authored per scene).
    Horizon,
    /// Optional water body.
    Water,
    /// Buildings and large props.
    Structures,
    /// Trees, bushes.
    Vegetation,
    /// Characters.
    Characters,
    /// Small props.
    Props,
    /// Foreground dressing.
    Foreground,
    /// Particles, fog, rain.
    Atmosphere,
    /// Full-canvas lighting overlay.
    Lighting,
}

impl Slot {
    /// Every slot in stacking order.
    pub const ORDER: [Slot; 11] = [
        Slot::Sky,
        Slot::Terrain,
        Slot::Horizon,
        Slot::Water,
        Slot::Structures,
        Slot::Vegetation,
        Slot::Characters,
        Slot::Props,
        Slot::Foreground,
        Slot::Atmosphere,
        Slot::Lighting,
    ];

    /// Slots whose layer is stretched over the whole canvas.
    pub fn is_full_canvas(self) -> bool {
        matches!(self, Slot::Sky | Slot::Terrain | Slot::Horizon | Slot::Lighting)
    }

    /// Kebab-case slot name.
    pub fn name(self) -> &'static str {
        match self {
            Slot::Sky => "sky",
            Slot::Terrain => "terrain",
            Slot::Horizon => "horizon",
            Slot::Water => "water",
            Slot::Structures => "structures",
            Slot::Vegetation => "vegetation",
            Slot::Characters => "characters",
            Slot::Props => "props",
            Slot::Foreground => "foreground",
            Slot::Atmosphere => "atmosphere",
            Slot::Lighting => "lighting",
        }
    }
}

/// Per-layer color grading applied by the compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorShift {
    /// Push towards orange.
    Warm,
    /// Push towards blue.
    Cool,
    /// Darken evenly.
    Dim,
    /// Dark and blue.
    Night,
    /// Brown monochrome.
    Sepia,
    /// Pull towards grey.
    Desaturate,
}

impl ColorShift {
    /// Parse a tag; unknown tags log a warning and mean "no shift".
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "warm" => Some(Self::Warm),
            "cool" => Some(Self::Cool),
            "dim" => Some(Self::Dim),
            "night" => Some(Self::Night),
            "sepia" => Some(Self::Sepia),
            "desaturate" => Some(Self::Desaturate),
            "" | "none" => None,
            other => {
                tracing::warn!(tag = other, "unknown color shift, ignoring");
                None
            }
        }
    }

    /// Shift one premultiplied pixel. Channels never exceed alpha.
    pub fn apply_px(self, px: [u8; 4]) -> [u8; 4] {
        let a = px[3];
        if a == 0 {
            return px;
        }
        let [r, g, b] = [px[0], px[1], px[2]].map(f32::from);
        let luma = 0.299 * r + 0.587 * g + 0.114 * b;
        let (r, g, b) = match self {
            Self::Warm => (r * 1.08 + 6.0, g * 1.0, b * 0.86),
            Self::Cool => (r * 0.88, g * 0.97, b * 1.10 + 6.0),
            Self::Dim => (r * 0.7, g * 0.7, b * 0.7),
            Self::Night => (r * 0.42, g * 0.52, b * 0.78),
            Self::Sepia => (
                0.393 * r + 0.769 * g + 0.189 * b,
                0.349 * r + 0.686 * g + 0.168 * b,
                0.272 * r + 0.534 * g + 0.131 * b,
            ),
            Self::Desaturate => (
                luma + (r - luma) * 0.3,
                luma + (g - luma) * 0.3,
                luma + (b - luma) * 0.3,
            ),
        };
        let cap = f32::from(a);
        let q = |v: f32| -> u8 { v.round().clamp(0.0, cap) as u8 };
        [q(r), q(g), q(b), a]
    }

    /// Shift a premultiplied RGBA8 buffer in place.
    pub fn apply_in_place(self, data: &mut [u8]) {
        for px in data.chunks_exact_mut(4) {
            let out = self.apply_px([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        }
    }
}

fn color_shift_tag<'de, D>(de: D) -> Result<Option<ColorShift>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let tag: Option<String> = serde::Deserialize::deserialize(de)?;
    Ok(tag.as_deref().and_then(ColorShift::parse))
}

/// Where a placement goes: explicit canvas pixels or a named layout preset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Position {
    /// Explicit `{ "x": .., "y": .. }` in canvas pixels.
    At(Point),
    /// Preset name resolved by the layout resolver.
    Preset(String),
}

/// Uniform factor or per-axis `{ "x": .., "y": .. }` factors.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ScaleSpec {
    /// Same factor on both axes.
    Uniform(f64),
    /// Independent factors.
    Axes(Vec2),
}

impl Default for ScaleSpec {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

impl ScaleSpec {
    /// Factors as a vector; non-finite factors fall back to 1.
    pub fn factors(self) -> Vec2 {
        let v = match self {
            Self::Uniform(s) => Vec2::new(s, s),
            Self::Axes(v) => v,
        };
        let fix = |f: f64| if f.is_finite() { f } else { 1.0 };
        Vec2::new(fix(v.x), fix(v.y))
    }
}

fn default_opacity() -> f64 {
    1.0
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// One asset reference with its layout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Registry id.
    pub asset: String,
    /// Target point; `None` places the layer at the canvas origin unscaled by position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Scale factors.
    #[serde(default)]
    pub scale: ScaleSpec,
    /// Flip horizontally around the anchor.
    #[serde(default, skip_serializing_if = "is_false")]
    pub mirror: bool,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Optional color grading.
    #[serde(
        default,
        deserialize_with = "color_shift_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_shift: Option<ColorShift>,
}

impl Placement {
    /// Unpositioned, unscaled placement of `asset`.
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            position: None,
            scale: ScaleSpec::default(),
            mirror: false,
            opacity: 1.0,
            color_shift: None,
        }
    }

    /// Place at explicit canvas pixels.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::At(Point::new(x, y)));
        self
    }

    /// Place at a named preset.
    pub fn at_preset(mut self, name: impl Into<String>) -> Self {
        self.position = Some(Position::Preset(name.into()));
        self
    }

    /// Uniform scale.
    pub fn scaled(mut self, s: f64) -> Self {
        self.scale = ScaleSpec::Uniform(s);
        self
    }

    /// Per-axis scale.
    pub fn scaled_xy(mut self, x: f64, y: f64) -> Self {
        self.scale = ScaleSpec::Axes(Vec2::new(x, y));
        self
    }

    /// Set the mirror flag.
    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Set opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the color shift.
    pub fn with_color_shift(mut self, shift: ColorShift) -> Self {
        self.color_shift = Some(shift);
        self
    }
}

/// A singular full-canvas slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlotAsset {
    /// Registry id.
    pub asset: String,
    /// Optional color grading.
    #[serde(
        default,
        deserialize_with = "color_shift_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_shift: Option<ColorShift>,
}

impl SlotAsset {
    /// Slot showing `asset` without grading.
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            color_shift: None,
        }
    }
}

/// Enables the horizon blender for a scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HorizonSpec {
    /// Horizon row in canvas pixels.
    pub y: f64,
    /// Mood key; when absent the mood is looked up from the sky id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Seed for drift, pulse and dust.
    #[serde(default)]
    pub seed: u64,
}

/// Declarative description of one shot across the fixed slots.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComposedScene {
    /// Full-canvas sky.
    pub sky: SlotAsset,
    /// Full-canvas ground.
    pub terrain: SlotAsset,
    /// Optional water body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<Placement>,
    /// Buildings.
    #[serde(default)]
    pub structures: Vec<Placement>,
    /// Plants.
    #[serde(default)]
    pub vegetation: Vec<Placement>,
    /// Characters.
    #[serde(default)]
    pub characters: Vec<Placement>,
    /// Small props.
    #[serde(default)]
    pub props: Vec<Placement>,
    /// Foreground dressing.
    #[serde(default)]
    pub foreground: Vec<Placement>,
    /// Atmospheric particles.
    #[serde(default)]
    pub atmosphere: Vec<Placement>,
    /// Full-canvas lighting overlay.
    pub lighting: SlotAsset,
    /// Horizon blending, off when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon: Option<HorizonSpec>,
}

impl ComposedScene {
    /// Scene with the three singular slots set and everything else empty.
    pub fn new(sky: &str, terrain: &str, lighting: &str) -> Self {
        Self {
            sky: SlotAsset::new(sky),
            terrain: SlotAsset::new(terrain),
            water: None,
            structures: Vec::new(),
            vegetation: Vec::new(),
            characters: Vec::new(),
            props: Vec::new(),
            foreground: Vec::new(),
            atmosphere: Vec::new(),
            lighting: SlotAsset::new(lighting),
            horizon: None,
        }
    }

    /// Parse a JSON scene and validate it.
    pub fn from_reader(reader: impl Read) -> TableauResult<Self> {
        let scene: Self =
            serde_json::from_reader(reader).map_err(|e| TableauError::serde(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Parse a JSON scene file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> TableauResult<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("open scene file '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Placements of a list slot (empty for singular slots).
    pub fn placements(&self, slot: Slot) -> &[Placement] {
        match slot {
            Slot::Water => self.water.as_slice(),
            Slot::Structures => &self.structures,
            Slot::Vegetation => &self.vegetation,
            Slot::Characters => &self.characters,
            Slot::Props => &self.props,
            Slot::Foreground => &self.foreground,
            Slot::Atmosphere => &self.atmosphere,
            Slot::Sky | Slot::Terrain | Slot::Horizon | Slot::Lighting => &[],
        }
    }

    /// Structural checks. Unknown asset ids are not an error here; they degrade at plan time.
    pub fn validate(&self) -> TableauResult<()> {
        for (slot, asset) in [
            (Slot::Sky, &self.sky.asset),
            (Slot::Terrain, &self.terrain.asset),
            (Slot::Lighting, &self.lighting.asset),
        ] {
            if asset.trim().is_empty() {
                return Err(TableauError::validation(format!(
                    "{} slot asset id must be non-empty",
                    slot.name()
                )));
            }
        }

        for slot in Slot::ORDER {
            for (i, p) in self.placements(slot).iter().enumerate() {
                if p.asset.trim().is_empty() {
                    return Err(TableauError::validation(format!(
                        "{}[{i}] asset id must be non-empty",
                        slot.name()
                    )));
                }
                if !p.opacity.is_finite() || !(0.0..=1.0).contains(&p.opacity) {
                    return Err(TableauError::validation(format!(
                        "{}[{i}] opacity must be in [0, 1]",
                        slot.name()
                    )));
                }
                if let Some(Position::At(pt)) = &p.position
                    && !(pt.x.is_finite() && pt.y.is_finite())
                {
                    return Err(TableauError::validation(format!(
                        "{}[{i}] position must be finite",
                        slot.name()
                    )));
                }
            }
        }

        if let Some(h) = &self.horizon
            && !h.y.is_finite()
        {
            return Err(TableauError::validation("horizon y must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/scene.rs"]
mod tests;
