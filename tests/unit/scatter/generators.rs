use super::*;
use crate::scatter::envelope::Span;

fn fifty_stars() -> StarEnvelope {
    StarEnvelope {
        count: 50,
        ..StarEnvelope::default()
    }
}

#[test]
fn star_field_seed_401_is_reproducible() {
    let a = stars(401, &fifty_stars());
    let b = stars(401, &fifty_stars());
    assert_eq!(a.len(), 50);
    assert_eq!(a, b);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.x.to_bits(), y.x.to_bits());
        assert_eq!(x.brightness.to_bits(), y.brightness.to_bits());
        assert_eq!(x.phase.to_bits(), y.phase.to_bits());
    }
}

#[test]
fn different_seeds_give_different_fields() {
    assert_ne!(stars(401, &fifty_stars()), stars(402, &fifty_stars()));
}

#[test]
fn raising_count_appends_without_perturbing() {
    let small = stars(7, &fifty_stars());
    let big = stars(
        7,
        &StarEnvelope {
            count: 80,
            ..StarEnvelope::default()
        },
    );
    assert_eq!(&big[..50], &small[..]);

    let c_small = ground_clutter(3, &ClutterEnvelope::default());
    let c_big = ground_clutter(
        3,
        &ClutterEnvelope {
            count: 90,
            ..ClutterEnvelope::default()
        },
    );
    assert_eq!(&c_big[..c_small.len()], &c_small[..]);
}

#[test]
fn stars_stay_inside_their_envelope() {
    let env = StarEnvelope {
        count: 500,
        x: Span::new(0.25, 0.75),
        y: Span::new(0.5, 0.1),
        ..StarEnvelope::default()
    };
    for s in stars(11, &env).iter() {
        assert!((0.25..=0.75).contains(&s.x));
        assert!((0.1..=0.5).contains(&s.y));
        assert!((0.0..std::f64::consts::TAU).contains(&s.phase));
        let b = s.brightness_at(FrameIndex(120), 11);
        assert!((0.0..=1.0).contains(&b));
    }
}

#[test]
fn negative_counts_produce_empty_sets() {
    let env = StarEnvelope {
        count: -3,
        ..StarEnvelope::default()
    };
    assert!(stars(1, &env).is_empty());
    let clouds = cloud_clusters(
        1,
        &CloudEnvelope {
            count: 2,
            puffs: -1,
            ..CloudEnvelope::default()
        },
    );
    assert_eq!(clouds.len(), 2);
    assert!(clouds.iter().all(|c| c.puffs.is_empty()));
}

#[test]
fn clouds_wrap_across_the_canvas() {
    let canvas = Canvas {
        width: 640,
        height: 360,
    };
    let set = cloud_clusters(5, &CloudEnvelope::default());
    assert_eq!(set[0].puffs.len(), 5);
    for c in set.iter() {
        for f in [0u64, 100, 10_000, 1_000_000] {
            let x = c.center_x_at(FrameIndex(f), canvas);
            assert!(x >= -c.width * 0.5 - 1e-9);
            assert!(x <= canvas.w() + c.width * 0.5 + 1e-9);
        }
    }
}

#[test]
fn silhouette_is_pinned_and_closed() {
    let ridge = silhouette(21, &SilhouetteEnvelope::default());
    assert_eq!(ridge.points.len(), 9);
    assert_eq!(ridge.points[0].x, 0.0);
    assert_eq!(ridge.points[8].x, 1.0);
    assert!(ridge.points.windows(2).all(|w| w[0].x <= w[1].x));
    for p in &ridge.points {
        assert!(p.y <= 0.72 - 0.04 + 1e-12 && p.y >= 0.72 - 0.16 - 1e-12);
    }
    let path = ridge.to_path(Canvas::default());
    assert!(matches!(
        path.elements().last(),
        Some(kurbo::PathEl::ClosePath)
    ));

    let degenerate = silhouette(
        21,
        &SilhouetteEnvelope {
            points: 0,
            ..SilhouetteEnvelope::default()
        },
    );
    assert_eq!(degenerate.points.len(), 2);
}

#[test]
fn clutter_variants_are_in_range() {
    let env = ClutterEnvelope {
        count: 200,
        variants: 0,
        ..ClutterEnvelope::default()
    };
    assert!(ground_clutter(4, &env).iter().all(|c| c.variant == 0));
    let env = ClutterEnvelope {
        count: 200,
        variants: 4,
        ..ClutterEnvelope::default()
    };
    assert!(ground_clutter(4, &env).iter().all(|c| c.variant < 4));
}

#[test]
fn dust_offsets_are_band_relative() {
    let set = dust(
        8,
        &DustEnvelope {
            count: 300,
            ..DustEnvelope::default()
        },
    );
    assert_eq!(set.len(), 300);
    for p in set.iter() {
        assert!((-1.0..1.0).contains(&p.band_offset));
        assert!((0.0..1.0).contains(&p.x));
    }
    assert_eq!(set, dust(8, &DustEnvelope { count: 300, ..DustEnvelope::default() }));
}

#[test]
fn scatter_sets_share_storage_on_clone() {
    let a = stars(1, &fifty_stars());
    let b = a.clone();
    assert!(std::ptr::eq(a.as_ptr(), b.as_ptr()));
}
