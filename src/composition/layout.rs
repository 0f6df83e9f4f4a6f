use std::collections::HashMap;

use crate::foundation::core::{Canvas, Point};

/// Maps a named position preset to canvas pixels.
pub trait LayoutResolver: Send + Sync {
    /// Resolve `preset` for `canvas`; `None` when the name is unknown.
    fn resolve(&self, preset: &str, canvas: Canvas) -> Option<Point>;
}

/// Preset names mapped to canvas-relative fractions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PresetTable {
    presets: HashMap<String, Point>,
}

impl Default for PresetTable {
    /// Stock presets along a ground line at 85% of the canvas height.
    fn default() -> Self {
        let ground = 0.85;
        let presets = [
            ("far-left", 0.08),
            ("left", 0.2),
            ("left-third", 1.0 / 3.0),
            ("center", 0.5),
            ("right-third", 2.0 / 3.0),
            ("right", 0.8),
            ("far-right", 0.92),
        ]
        .into_iter()
        .map(|(name, x)| (name.to_owned(), Point::new(x, ground)))
        .collect();
        Self { presets }
    }
}

impl PresetTable {
    /// Table with no presets.
    pub fn empty() -> Self {
        Self {
            presets: HashMap::new(),
        }
    }

    /// Add or replace a preset at canvas fractions `(fx, fy)`.
    pub fn insert(&mut self, name: impl Into<String>, fx: f64, fy: f64) -> &mut Self {
        self.presets.insert(name.into(), Point::new(fx, fy));
        self
    }

    /// Fractions for `name`.
    pub fn fraction(&self, name: &str) -> Option<Point> {
        self.presets.get(name).copied()
    }
}

impl LayoutResolver for PresetTable {
    fn resolve(&self, preset: &str, canvas: Canvas) -> Option<Point> {
        self.fraction(preset)
            .map(|f| Point::new(f.x * canvas.w(), f.y * canvas.h()))
    }
}
