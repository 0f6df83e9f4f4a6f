use super::*;
use crate::{
    composition::layout::PresetTable, foundation::error::TableauResult,
};

fn square(_: FrameIndex, _: &StyleParams, _: Canvas) -> TableauResult<Layer> {
    Layer::transparent(10, 20)
}

fn registry(ids: &[&str]) -> AssetRegistry {
    let mut r = AssetRegistry::new();
    for id in ids {
        r.register(*id, square);
    }
    r
}

fn plan(scene: &ComposedScene, registry: &AssetRegistry) -> FramePlan {
    let layout = PresetTable::default();
    let moods = MoodTable::default();
    let ctx = PlanContext {
        registry,
        layout: &layout,
        moods: &moods,
        canvas: Canvas::new(200, 100).unwrap(),
    };
    plan_frame(scene, FrameIndex(3), &ctx)
}

#[test]
fn layers_follow_slot_order_not_insertion_order() {
    let r = registry(&["sky-day", "hills", "light", "tree", "hero", "fog", "well", "pond"]);
    let mut s = ComposedScene::new("sky-day", "hills", "light");
    s.atmosphere.push(Placement::new("fog"));
    s.characters.push(Placement::new("hero"));
    s.vegetation.push(Placement::new("tree"));
    s.structures.push(Placement::new("well"));
    s.water = Some(Placement::new("pond"));
    let p = plan(&s, &r);
    assert_eq!(
        p.slots(),
        vec![
            Slot::Sky,
            Slot::Terrain,
            Slot::Water,
            Slot::Structures,
            Slot::Vegetation,
            Slot::Characters,
            Slot::Atmosphere,
            Slot::Lighting
        ]
    );
    assert!(p.missing.is_empty());
}

#[test]
fn missing_sky_is_recorded_and_rest_planned() {
    let r = registry(&["hills", "light", "hero"]);
    let mut s = ComposedScene::new("sky-gone", "hills", "light");
    s.characters.push(Placement::new("hero"));
    let p = plan(&s, &r);
    assert_eq!(p.asset_ids(), vec!["hills", "hero", "light"]);
    assert_eq!(
        p.missing,
        vec![MissingAsset {
            slot: Slot::Sky,
            index: 0,
            asset: "sky-gone".into(),
            reason: MissingReason::Unregistered
        }]
    );
}

#[test]
fn unknown_preset_skips_only_that_placement() {
    let r = registry(&["s", "t", "l", "hero"]);
    let mut s = ComposedScene::new("s", "t", "l");
    s.characters.push(Placement::new("hero").at_preset("backstage"));
    s.characters.push(Placement::new("hero").at_preset("center"));
    let p = plan(&s, &r);
    assert_eq!(p.layers.len(), 4);
    assert_eq!(p.layers[2].index, 1);
    assert_eq!(
        p.missing[0].reason,
        MissingReason::UnknownPreset("backstage".into())
    );
    assert_eq!(p.layers[2].style.position, Some(Point::new(100.0, 85.0)));
}

#[test]
fn mirror_flag_equals_negative_x_scale() {
    let r = registry(&["s", "t", "l", "hero"]);
    let mut s = ComposedScene::new("s", "t", "l");
    s.characters.push(Placement::new("hero").at(50.0, 90.0).mirrored(true));
    s.characters.push(Placement::new("hero").at(50.0, 90.0).scaled_xy(-1.0, 1.0));
    let p = plan(&s, &r);
    let layer = Layer::transparent(10, 20).unwrap();
    let a = p.layers[2].geometry.transform_for(&layer, p.canvas);
    let b = p.layers[3].geometry.transform_for(&layer, p.canvas);
    assert_eq!(a, b);
    // anchor (5, 20) lands on the target, and x is flipped around it
    assert_eq!(a * Point::new(5.0, 20.0), Point::new(50.0, 90.0));
    assert_eq!(a * Point::new(0.0, 20.0), Point::new(55.0, 90.0));
}

#[test]
fn unpositioned_unscaled_placement_is_identity() {
    let g = Geometry::Placed {
        target: None,
        scale: Vec2::new(1.0, 1.0),
    };
    let layer = Layer::transparent(10, 20).unwrap();
    assert_eq!(
        g.transform_for(&layer, Canvas::new(200, 100).unwrap()),
        Affine::IDENTITY
    );
}

#[test]
fn full_canvas_slots_stretch_to_canvas() {
    let layer = Layer::transparent(100, 50).unwrap();
    let t = Geometry::FullCanvas.transform_for(&layer, Canvas::new(200, 100).unwrap());
    assert_eq!(t * Point::new(100.0, 50.0), Point::new(200.0, 100.0));
}

#[test]
fn horizon_band_sits_after_terrain() {
    let r = registry(&["sky-dusk", "t", "l", "pond"]);
    let mut s = ComposedScene::new("sky-dusk", "t", "l");
    s.water = Some(Placement::new("pond"));
    s.horizon = Some(crate::composition::scene::HorizonSpec {
        y: 50.0,
        mood: None,
        seed: 1,
    });
    let p = plan(&s, &r);
    assert_eq!(
        p.slots(),
        vec![Slot::Sky, Slot::Terrain, Slot::Horizon, Slot::Water, Slot::Lighting]
    );
    assert_eq!(p.layers[2].asset, "horizon:dusk");
}

#[test]
fn horizon_off_for_indoor_or_unmapped_sky() {
    let r = registry(&["sky-x", "t", "l"]);
    let mut s = ComposedScene::new("sky-x", "t", "l");
    s.horizon = Some(crate::composition::scene::HorizonSpec {
        y: 50.0,
        mood: None,
        seed: 1,
    });
    assert!(!plan(&s, &r).slots().contains(&Slot::Horizon));

    if let Some(h) = s.horizon.as_mut() {
        h.mood = Some("indoor".into());
    }
    assert!(!plan(&s, &r).slots().contains(&Slot::Horizon));
}
