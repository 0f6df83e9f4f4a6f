use super::*;

fn blender() -> HorizonBlender {
    HorizonBlender::new(Arc::new(MoodTable::default()))
}

fn canvas() -> Canvas {
    Canvas::new(320, 240).unwrap()
}

fn row_is_blank(layer: &Layer, y: u32) -> bool {
    (0..layer.width).all(|x| layer.pixel(x, y).unwrap()[3] == 0)
}

#[test]
fn indoor_and_zero_opacity_draw_nothing() {
    let b = blender();
    assert!(b.blend(Mood::Indoor, FrameIndex(10), 120.0, 1, canvas()).is_none());

    let mut table = MoodTable::default();
    let mut cfg = table.config(Mood::Dusk);
    cfg.haze.opacity = 0.0;
    table.set_config(Mood::Dusk, cfg);
    let b = HorizonBlender::new(Arc::new(table));
    assert!(b.blend(Mood::Dusk, FrameIndex(10), 120.0, 1, canvas()).is_none());
}

#[test]
fn output_stays_inside_band() {
    let b = blender();
    let cfg = b.moods().config(Mood::SunsetWarm);
    let horizon = 100.0;
    let top = horizon - cfg.haze.height;
    let bottom = horizon + cfg.haze.height.max(cfg.spill.height);
    let layer = b
        .blend(Mood::SunsetWarm, FrameIndex(321), horizon, 5, canvas())
        .unwrap();
    for y in 0..layer.height {
        let fy = f64::from(y);
        if fy + 1.0 <= top || fy >= bottom {
            assert!(row_is_blank(&layer, y), "row {y} outside band has ink");
        }
    }
    assert!(!row_is_blank(&layer, 100));
}

#[test]
fn blend_is_deterministic_and_animates() {
    let b = blender();
    let a = b.blend(Mood::Night, FrameIndex(900), 120.0, 42, canvas()).unwrap();
    let again = blender()
        .blend(Mood::Night, FrameIndex(900), 120.0, 42, canvas())
        .unwrap();
    assert_eq!(a, again);
    let later = b.blend(Mood::Night, FrameIndex(4_000), 120.0, 42, canvas()).unwrap();
    assert_ne!(a, later);
}

#[test]
fn dust_set_is_cached_per_key() {
    let b = blender();
    let cfg = b.moods().config(Mood::Sand);
    let first = b.dust_for(Mood::Sand, &cfg, 8, 320);
    let second = b.dust_for(Mood::Sand, &cfg, 8, 320);
    assert!(std::ptr::eq(first.as_ptr(), second.as_ptr()));
    assert_eq!(first.len(), cfg.dust.count as usize);
    let other = b.dust_for(Mood::Sand, &cfg, 9, 320);
    assert!(!std::ptr::eq(first.as_ptr(), other.as_ptr()));
}

#[test]
fn horizon_off_canvas_still_succeeds() {
    let b = blender();
    let layer = b
        .blend(Mood::DayWarm, FrameIndex(0), -500.0, 0, canvas())
        .unwrap();
    assert!(layer.is_blank());
}
