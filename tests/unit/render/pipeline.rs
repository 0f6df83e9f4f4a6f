use super::*;
use crate::{
    assets::registry::StyleParams, composition::scene::Placement, foundation::core::Point,
};

fn canvas() -> Canvas {
    Canvas::new(32, 16).unwrap()
}

fn full_red(_: FrameIndex, _: &StyleParams, c: Canvas) -> TableauResult<Layer> {
    Layer::solid(c.width, c.height, Rgba8Premul::from_straight_rgba(255, 0, 0, 255))
}

fn half_blue(_: FrameIndex, _: &StyleParams, _: Canvas) -> TableauResult<Layer> {
    Layer::solid(16, 16, Rgba8Premul::from_straight_rgba(0, 0, 255, 255))
}

fn broken(_: FrameIndex, _: &StyleParams, _: Canvas) -> TableauResult<Layer> {
    Err(TableauError::render("boom"))
}

fn short_buffer(_: FrameIndex, _: &StyleParams, _: Canvas) -> TableauResult<Layer> {
    Ok(Layer {
        width: 10,
        height: 10,
        anchor: Point::new(5.0, 10.0),
        data: vec![255; 40],
    })
}

fn clear_light(_: FrameIndex, _: &StyleParams, c: Canvas) -> TableauResult<Layer> {
    Layer::for_canvas(c)
}

fn compositor() -> Compositor {
    let mut r = AssetRegistry::new();
    r.register("red", full_red);
    r.register("blue", half_blue);
    r.register("broken", broken);
    r.register("light", clear_light);
    r.register("short", short_buffer);
    Compositor::new(
        Arc::new(r),
        CompositorOpts {
            canvas: canvas(),
            ..CompositorOpts::default()
        },
    )
    .unwrap()
}

#[test]
fn all_missing_still_yields_backdrop() {
    let c = compositor();
    let scene = ComposedScene::new("a", "b", "d");
    let f = c.compose(&scene, FrameIndex(0)).unwrap();
    assert_eq!(f.missing.len(), 3);
    assert_eq!(f.pixel(0, 0), Some(CompositorOpts::default().clear.to_array()));
}

#[test]
fn later_slots_occlude_earlier_ones() {
    let c = compositor();
    let mut scene = ComposedScene::new("red", "light", "light");
    // bottom-centre anchor (8, 16) placed at (8, 16): covers x in [0, 16)
    scene.characters.push(Placement::new("blue").at(8.0, 16.0));
    let f = c.compose(&scene, FrameIndex(0)).unwrap();
    let px = f.pixel(4, 8).unwrap();
    assert!(px[0] <= 4 && px[2] >= 250 && px[3] == 255, "{px:?}");
    assert_eq!(f.pixel(24, 8), Some([255, 0, 0, 255]));
}

#[test]
fn renderer_errors_degrade_like_missing_assets() {
    let c = compositor();
    let mut scene = ComposedScene::new("red", "light", "light");
    scene.props.push(Placement::new("broken"));
    let f = c.compose(&scene, FrameIndex(0)).unwrap();
    assert_eq!(f.missing.len(), 1);
    assert!(matches!(f.missing[0].reason, MissingReason::RenderFailed(_)));
    assert_eq!(f.pixel(4, 4), Some([255, 0, 0, 255]));
}

#[test]
fn malformed_layer_buffer_degrades_instead_of_aborting() {
    let c = compositor();
    let mut scene = ComposedScene::new("red", "light", "light");
    scene.props.push(Placement::new("short").at(8.0, 8.0));
    let f = c.compose(&scene, FrameIndex(0)).unwrap();
    assert_eq!(f.missing.len(), 1);
    assert_eq!(f.missing[0].asset, "short");
    assert!(matches!(f.missing[0].reason, MissingReason::RenderFailed(_)));
    assert_eq!(f.pixel(4, 4), Some([255, 0, 0, 255]));

    scene.foreground.push(Placement::new("short"));
    let range = FrameRange::new(FrameIndex(0), FrameIndex(2)).unwrap();
    let (frames, stats) = render_frames(&c, &scene, range, &RenderThreading::default()).unwrap();
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.missing.len() == 2));
    assert_eq!(stats.frames_degraded, 2);
}

#[test]
fn zero_scale_placement_is_skipped() {
    let c = compositor();
    let base = ComposedScene::new("red", "light", "light");
    let mut squashed = base.clone();
    squashed
        .characters
        .push(Placement::new("blue").at(8.0, 16.0).scaled(0.0));
    assert_eq!(
        c.compose(&base, FrameIndex(2)).unwrap(),
        c.compose(&squashed, FrameIndex(2)).unwrap()
    );
}

#[test]
fn zero_opacity_placement_changes_nothing() {
    let c = compositor();
    let base = ComposedScene::new("red", "light", "light");
    let mut faded = base.clone();
    faded
        .characters
        .push(Placement::new("blue").at(8.0, 16.0).with_opacity(0.0));
    assert_eq!(
        c.compose(&base, FrameIndex(1)).unwrap(),
        c.compose(&faded, FrameIndex(1)).unwrap()
    );
}

#[test]
fn range_render_validates_inputs() {
    let c = compositor();
    let scene = ComposedScene::new("red", "light", "light");
    let empty = FrameRange::new(FrameIndex(4), FrameIndex(4)).unwrap();
    assert!(render_frames(&c, &scene, empty, &RenderThreading::default()).is_err());

    let range = FrameRange::new(FrameIndex(0), FrameIndex(2)).unwrap();
    let bad = RenderThreading {
        parallel: true,
        threads: Some(0),
        ..RenderThreading::default()
    };
    assert!(matches!(
        render_frames(&c, &scene, range, &bad),
        Err(TableauError::Validation(_))
    ));
}

#[test]
fn stats_count_degraded_frames() {
    let c = compositor();
    let scene = ComposedScene::new("nope", "light", "light");
    let range = FrameRange::new(FrameIndex(0), FrameIndex(3)).unwrap();
    let (frames, stats) = render_frames(&c, &scene, range, &RenderThreading::default()).unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 3,
            frames_rendered: 3,
            frames_degraded: 3
        }
    );
}

#[test]
fn chunk_size_zero_is_one() {
    assert_eq!(normalized_chunk_size(0), 1);
    assert_eq!(normalized_chunk_size(7), 7);
}

#[test]
fn compositor_rejects_oversized_canvas() {
    let opts = CompositorOpts {
        canvas: Canvas {
            width: 70_000,
            height: 10,
        },
        ..CompositorOpts::default()
    };
    assert!(Compositor::new(Arc::new(AssetRegistry::new()), opts).is_err());
}
