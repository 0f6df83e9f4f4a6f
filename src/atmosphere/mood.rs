use std::{collections::HashMap, fs::File, io::Read, path::Path};

use anyhow::Context;

use crate::{
    assets::registry::AssetRegistry,
    foundation::error::{TableauError, TableauResult},
};

/// Lighting mood driving the horizon blender.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Mood {
    /// Bright, warm daylight.
    DayWarm,
    /// Bright, cool daylight.
    DayCool,
    /// Pink low sun.
    Dawn,
    /// Orange low sun.
    SunsetWarm,
    /// Violet low sun.
    SunsetCold,
    /// Fading blue light.
    Dusk,
    /// Moonlight.
    Night,
    /// Overcast, grey.
    Storm,
    /// Desert glare.
    Sand,
    /// No horizon; blending is off.
    Indoor,
}

impl Mood {
    /// All moods.
    pub const ALL: [Mood; 10] = [
        Mood::DayWarm,
        Mood::DayCool,
        Mood::Dawn,
        Mood::SunsetWarm,
        Mood::SunsetCold,
        Mood::Dusk,
        Mood::Night,
        Mood::Storm,
        Mood::Sand,
        Mood::Indoor,
    ];

    /// Kebab-case key.
    pub fn key(self) -> &'static str {
        match self {
            Mood::DayWarm => "day-warm",
            Mood::DayCool => "day-cool",
            Mood::Dawn => "dawn",
            Mood::SunsetWarm => "sunset-warm",
            Mood::SunsetCold => "sunset-cold",
            Mood::Dusk => "dusk",
            Mood::Night => "night",
            Mood::Storm => "storm",
            Mood::Sand => "sand",
            Mood::Indoor => "indoor",
        }
    }

    /// Parse a key. Unknown keys log a warning and fall back to [`Mood::Indoor`].
    pub fn from_key(key: &str) -> Self {
        let k = key.trim();
        match Self::ALL.into_iter().find(|m| m.key().eq_ignore_ascii_case(k)) {
            Some(m) => m,
            None => {
                tracing::warn!(mood = k, "unknown mood key, treating as indoor");
                Mood::Indoor
            }
        }
    }
}

impl From<String> for Mood {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Haze band around the horizon line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Haze {
    /// Straight RGB.
    pub color: [u8; 3],
    /// Peak opacity in `[0, 1]`.
    pub opacity: f64,
    /// Half-height of the band in pixels.
    pub height: f64,
}

/// Light spilling downwards from the horizon.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spill {
    /// Straight RGB.
    pub color: [u8; 3],
    /// Opacity at the horizon line.
    pub opacity: f64,
    /// Depth below the horizon in pixels.
    pub height: f64,
}

/// Dust motes drifting inside the haze band.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DustSpec {
    /// Mote count.
    pub count: i64,
    /// Straight RGB.
    pub color: [u8; 3],
}

/// Everything the blender needs for one mood.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MoodConfig {
    /// Haze band.
    pub haze: Haze,
    /// Light spill.
    pub spill: Spill,
    /// Dust motes.
    pub dust: DustSpec,
}

impl MoodConfig {
    /// Config that draws nothing.
    pub const OFF: MoodConfig = MoodConfig {
        haze: haze([0, 0, 0], 0.0, 0.0),
        spill: spill([0, 0, 0], 0.0, 0.0),
        dust: dust(0, [0, 0, 0]),
    };
}

const fn haze(color: [u8; 3], opacity: f64, height: f64) -> Haze {
    Haze {
        color,
        opacity,
        height,
    }
}

const fn spill(color: [u8; 3], opacity: f64, height: f64) -> Spill {
    Spill {
        color,
        opacity,
        height,
    }
}

const fn dust(count: i64, color: [u8; 3]) -> DustSpec {
    DustSpec { count, color }
}

fn stock_config(mood: Mood) -> MoodConfig {
    match mood {
        Mood::DayWarm => MoodConfig {
            haze: haze([255, 236, 200], 0.35, 60.0),
            spill: spill([255, 220, 170], 0.18, 90.0),
            dust: dust(24, [255, 245, 220]),
        },
        Mood::DayCool => MoodConfig {
            haze: haze([214, 232, 255], 0.30, 56.0),
            spill: spill([200, 225, 255], 0.12, 70.0),
            dust: dust(16, [235, 245, 255]),
        },
        Mood::Dawn => MoodConfig {
            haze: haze([255, 190, 200], 0.45, 70.0),
            spill: spill([255, 200, 180], 0.25, 110.0),
            dust: dust(30, [255, 225, 230]),
        },
        Mood::SunsetWarm => MoodConfig {
            haze: haze([255, 150, 80], 0.55, 80.0),
            spill: spill([255, 130, 60], 0.35, 140.0),
            dust: dust(40, [255, 200, 140]),
        },
        Mood::SunsetCold => MoodConfig {
            haze: haze([190, 140, 220], 0.50, 76.0),
            spill: spill([170, 120, 210], 0.28, 120.0),
            dust: dust(34, [230, 200, 255]),
        },
        Mood::Dusk => MoodConfig {
            haze: haze([120, 130, 190], 0.40, 64.0),
            spill: spill([100, 110, 170], 0.20, 90.0),
            dust: dust(20, [200, 205, 240]),
        },
        Mood::Night => MoodConfig {
            haze: haze([60, 70, 120], 0.30, 48.0),
            spill: spill([80, 90, 140], 0.10, 60.0),
            dust: dust(12, [190, 200, 255]),
        },
        Mood::Storm => MoodConfig {
            haze: haze([150, 155, 165], 0.60, 90.0),
            spill: spill([120, 125, 135], 0.20, 80.0),
            dust: dust(60, [200, 200, 205]),
        },
        Mood::Sand => MoodConfig {
            haze: haze([235, 200, 140], 0.50, 72.0),
            spill: spill([240, 210, 150], 0.30, 100.0),
            dust: dust(80, [245, 220, 170]),
        },
        Mood::Indoor => MoodConfig::OFF,
    }
}

const STOCK_SKIES: [(&str, Mood); 10] = [
    ("sky-day", Mood::DayWarm),
    ("sky-day-cool", Mood::DayCool),
    ("sky-dawn", Mood::Dawn),
    ("sky-sunset", Mood::SunsetWarm),
    ("sky-sunset-cold", Mood::SunsetCold),
    ("sky-dusk", Mood::Dusk),
    ("sky-night", Mood::Night),
    ("sky-storm", Mood::Storm),
    ("sky-desert", Mood::Sand),
    ("sky-interior", Mood::Indoor),
];

/// Mood configurations plus the sky id to mood lookup.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MoodTable {
    #[serde(default)]
    moods: HashMap<Mood, MoodConfig>,
    #[serde(default)]
    skies: HashMap<String, Mood>,
}

impl Default for MoodTable {
    fn default() -> Self {
        Self {
            moods: Mood::ALL.into_iter().map(|m| (m, stock_config(m))).collect(),
            skies: STOCK_SKIES
                .into_iter()
                .map(|(id, m)| (id.to_owned(), m))
                .collect(),
        }
    }
}

impl MoodTable {
    /// Stock table with overrides from JSON (`{"moods": {..}, "skies": {..}}`) merged on top.
    pub fn from_reader(reader: impl Read) -> TableauResult<Self> {
        let mut table = Self::default();
        table.extend_from_reader(reader)?;
        Ok(table)
    }

    /// [`MoodTable::from_reader`] on a file.
    pub fn from_path(path: impl AsRef<Path>) -> TableauResult<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("open mood table '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Merge JSON overrides into this table.
    pub fn extend_from_reader(&mut self, reader: impl Read) -> TableauResult<()> {
        let extra: Self =
            serde_json::from_reader(reader).map_err(|e| TableauError::serde(e.to_string()))?;
        for (mood, cfg) in &extra.moods {
            validate_config(*mood, cfg)?;
        }
        self.moods.extend(extra.moods);
        self.skies.extend(extra.skies);
        Ok(())
    }

    /// Config for `mood`; moods missing from the table draw nothing.
    pub fn config(&self, mood: Mood) -> MoodConfig {
        self.moods.get(&mood).copied().unwrap_or(MoodConfig::OFF)
    }

    /// Mood implied by a sky asset id.
    pub fn mood_for_sky(&self, sky: &str) -> Option<Mood> {
        self.skies.get(sky).copied()
    }

    /// Set or replace a mood config.
    pub fn set_config(&mut self, mood: Mood, config: MoodConfig) {
        self.moods.insert(mood, config);
    }

    /// Map a sky id to a mood.
    pub fn map_sky(&mut self, sky: impl Into<String>, mood: Mood) {
        self.skies.insert(sky.into(), mood);
    }

    /// Check curated combinations against this table and a registry.
    ///
    /// Reports sky ids missing from the lookup, combos whose mood contradicts the lookup,
    /// and ids absent from the registry. Nothing here is enforced at render time.
    pub fn audit(&self, combos: &[SceneCombo], registry: &AssetRegistry) -> Vec<TableIssue> {
        let mut issues = Vec::new();
        for combo in combos {
            match self.mood_for_sky(&combo.sky) {
                None => issues.push(TableIssue::UnmappedSky {
                    sky: combo.sky.clone(),
                }),
                Some(found) if found != combo.mood => issues.push(TableIssue::MoodMismatch {
                    sky: combo.sky.clone(),
                    expected: combo.mood,
                    found,
                }),
                Some(_) => {}
            }
            for id in [&combo.sky, &combo.terrain] {
                if !registry.contains(id) {
                    issues.push(TableIssue::Unregistered { id: id.clone() });
                }
            }
        }
        issues
    }
}

fn validate_config(mood: Mood, cfg: &MoodConfig) -> TableauResult<()> {
    let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
    let len = |v: f64| v.is_finite() && v >= 0.0;
    if !unit(cfg.haze.opacity) || !unit(cfg.spill.opacity) {
        return Err(TableauError::validation(format!(
            "mood '{mood}': opacities must be in [0, 1]"
        )));
    }
    if !len(cfg.haze.height) || !len(cfg.spill.height) {
        return Err(TableauError::validation(format!(
            "mood '{mood}': heights must be finite and >= 0"
        )));
    }
    Ok(())
}

/// A curated sky/terrain pairing and the mood it is meant to carry.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneCombo {
    /// Sky asset id.
    pub sky: String,
    /// Terrain asset id.
    pub terrain: String,
    /// Intended mood.
    pub mood: Mood,
}

impl SceneCombo {
    /// New combo.
    pub fn new(sky: &str, terrain: &str, mood: Mood) -> Self {
        Self {
            sky: sky.to_owned(),
            terrain: terrain.to_owned(),
            mood,
        }
    }

    /// Pairings shipped with the stock asset library.
    pub fn stock() -> Vec<SceneCombo> {
        vec![
            Self::new("sky-day", "hills", Mood::DayWarm),
            Self::new("sky-day-cool", "hills", Mood::DayCool),
            Self::new("sky-dawn", "hills", Mood::Dawn),
            Self::new("sky-sunset", "dunes", Mood::SunsetWarm),
            Self::new("sky-sunset-cold", "hills", Mood::SunsetCold),
            Self::new("sky-dusk", "hills", Mood::Dusk),
            Self::new("sky-night", "hills", Mood::Night),
            Self::new("sky-storm", "hills", Mood::Storm),
            Self::new("sky-desert", "dunes", Mood::Sand),
            Self::new("sky-interior", "floor", Mood::Indoor),
        ]
    }
}

/// One finding of [`MoodTable::audit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableIssue {
    /// Sky id has no mood mapping.
    UnmappedSky {
        /// Sky id.
        sky: String,
    },
    /// Combo's mood differs from the sky lookup.
    MoodMismatch {
        /// Sky id.
        sky: String,
        /// Mood the combo declares.
        expected: Mood,
        /// Mood the lookup returns.
        found: Mood,
    },
    /// Id is not registered.
    Unregistered {
        /// Asset id.
        id: String,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/atmosphere/mood.rs"]
mod tests;
