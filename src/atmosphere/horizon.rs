use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    assets::layer::Layer,
    atmosphere::mood::{Mood, MoodConfig, MoodTable},
    foundation::core::{Canvas, FrameIndex, Rgba8Premul},
    foundation::math::smoothstep,
    noise::cycle::long_cycle,
    render::composite::over,
    scatter::{
        envelope::DustEnvelope,
        generators::{DustParticle, ScatterSet, dust},
    },
};

/// Noise time per frame for the horizontal drift of the band.
pub const DRIFT_RATE: f64 = 0.004;
/// Drift amplitude as a fraction of canvas width.
pub const DRIFT_AMPLITUDE: f64 = 0.06;
/// Noise time per frame for the opacity pulse.
pub const PULSE_RATE: f64 = 0.011;

const PULSE_SEED_OFFSET: u64 = 17;
const BANDING_SEED_OFFSET: u64 = 3;
const MOTE_SEED_OFFSET: u64 = 29;

type DustKey = (Mood, u64, u32);

/// Draws the haze band, light spill and dust motes that soften the sky/terrain seam.
#[derive(Debug)]
pub struct HorizonBlender {
    moods: Arc<MoodTable>,
    dust_cache: Mutex<HashMap<DustKey, ScatterSet<DustParticle>>>,
}

impl HorizonBlender {
    /// Blender over `moods`.
    pub fn new(moods: Arc<MoodTable>) -> Self {
        Self {
            moods,
            dust_cache: Mutex::new(HashMap::new()),
        }
    }

    /// The mood table in use.
    pub fn moods(&self) -> &MoodTable {
        &self.moods
    }

    /// Full-canvas blend layer for `mood` at `frame`, or `None` when the mood draws nothing.
    ///
    /// All pixels lie in rows `[horizon_y - h, horizon_y + max(h, spill_h)]`.
    pub fn blend(
        &self,
        mood: Mood,
        frame: FrameIndex,
        horizon_y: f64,
        seed: u64,
        canvas: Canvas,
    ) -> Option<Layer> {
        if mood == Mood::Indoor {
            return None;
        }
        let cfg = self.moods.config(mood);
        if cfg.haze.opacity <= 0.0 || !horizon_y.is_finite() {
            return None;
        }
        let mut layer = match Layer::for_canvas(canvas) {
            Ok(layer) => layer,
            Err(err) => {
                tracing::warn!(%err, "horizon blend skipped");
                return None;
            }
        };

        let t = frame.as_f64();
        let width = canvas.w();
        let drift = long_cycle(t * DRIFT_RATE, seed) * DRIFT_AMPLITUDE * width;
        let pulse = 0.85 + 0.15 * long_cycle(t * PULSE_RATE, seed.wrapping_add(PULSE_SEED_OFFSET));

        let banding: Vec<f64> = (0..canvas.width)
            .map(|x| {
                let u = (f64::from(x) + drift) / width;
                0.85 + 0.15 * long_cycle(u * 6.0, seed.wrapping_add(BANDING_SEED_OFFSET))
            })
            .collect();

        let band = Band::new(&cfg, horizon_y, canvas);
        for y in band.rows() {
            let dy = f64::from(y) + 0.5 - horizon_y;
            let haze_a = if band.half > 0.0 && dy.abs() <= band.half {
                cfg.haze.opacity * pulse * (1.0 - smoothstep(0.0, 1.0, dy.abs() / band.half))
            } else {
                0.0
            };
            let spill_a = if band.spill > 0.0 && (0.0..=band.spill).contains(&dy) {
                let u = dy / band.spill;
                cfg.spill.opacity * (1.0 - u) * (1.0 - u)
            } else {
                0.0
            };
            if haze_a <= 0.0 && spill_a <= 0.0 {
                continue;
            }
            let spill_px = Rgba8Premul::from_rgb_alpha(cfg.spill.color, spill_a).to_array();
            let row = layer.row_mut(y);
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let haze_px =
                    Rgba8Premul::from_rgb_alpha(cfg.haze.color, haze_a * banding[x]).to_array();
                let out = over(spill_px, haze_px, 1.0);
                px.copy_from_slice(&out);
            }
        }

        let motes = self.dust_for(mood, &cfg, seed, canvas.width);
        for mote in motes.iter() {
            draw_mote(&mut layer, &band, mote, &cfg, frame, drift, pulse, seed);
        }
        Some(layer)
    }

    fn dust_for(
        &self,
        mood: Mood,
        cfg: &MoodConfig,
        seed: u64,
        width: u32,
    ) -> ScatterSet<DustParticle> {
        let mut cache = self
            .dust_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache
            .entry((mood, seed, width))
            .or_insert_with(|| {
                let env = DustEnvelope {
                    count: cfg.dust.count,
                    ..DustEnvelope::default()
                };
                dust(seed, &env)
            })
            .clone()
    }
}

struct Band {
    horizon: f64,
    half: f64,
    spill: f64,
    top: u32,
    bottom: u32,
}

impl Band {
    fn new(cfg: &MoodConfig, horizon: f64, canvas: Canvas) -> Self {
        let half = cfg.haze.height.max(0.0);
        let spill = cfg.spill.height.max(0.0);
        let h = canvas.h();
        let top = (horizon - half).floor().clamp(0.0, h) as u32;
        let bottom = (horizon + half.max(spill)).ceil().clamp(0.0, h) as u32;
        Self {
            horizon,
            half,
            spill,
            top,
            bottom,
        }
    }

    fn rows(&self) -> std::ops::Range<u32> {
        self.top..self.bottom
    }

    // Motes live in the haze band only, not in the spill.
    fn mote_rows(&self) -> (f64, f64) {
        (self.horizon - self.half, self.horizon + self.half)
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_mote(
    layer: &mut Layer,
    band: &Band,
    mote: &DustParticle,
    cfg: &MoodConfig,
    frame: FrameIndex,
    drift: f64,
    pulse: f64,
    seed: u64,
) {
    if mote.radius <= 0.0 || mote.alpha <= 0.0 || band.half <= 0.0 {
        return;
    }
    let w = f64::from(layer.width);
    let t = frame.as_f64() * mote.drift_rate + mote.phase;
    let wander = long_cycle(t, seed.wrapping_add(MOTE_SEED_OFFSET));
    let cx = (mote.x * w + drift + wander * 0.02 * w).rem_euclid(w);
    let cy = band.horizon + mote.band_offset * band.half;
    let alpha = mote.alpha * pulse * (0.6 + 0.4 * long_cycle(t * 1.7, seed));

    let (lo, hi) = band.mote_rows();
    let y0 = (cy - mote.radius).max(lo).max(f64::from(band.top)).floor().max(0.0) as u32;
    let y1 = (cy + mote.radius).min(hi).min(f64::from(band.bottom)).ceil().max(0.0) as u32;
    let x0 = (cx - mote.radius).floor().max(0.0) as u32;
    let x1 = ((cx + mote.radius).ceil().min(w)).max(0.0) as u32;

    for y in y0..y1.min(layer.height) {
        let py = f64::from(y) + 0.5;
        if py < lo || py > hi {
            continue;
        }
        let row = layer.row_mut(y);
        for x in x0..x1 {
            let px = f64::from(x) + 0.5;
            let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            let a = alpha * (1.0 - smoothstep(0.0, mote.radius, d));
            if a <= 0.0 {
                continue;
            }
            let src = Rgba8Premul::from_rgb_alpha(cfg.dust.color, a).to_array();
            let i = (x as usize) * 4;
            let dst = [row[i], row[i + 1], row[i + 2], row[i + 3]];
            row[i..i + 4].copy_from_slice(&over(dst, src, 1.0));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/atmosphere/horizon.rs"]
mod tests;
