use std::collections::HashMap;

use super::*;

#[test]
fn deterministic_for_same_inputs() {
    for seed in [0u64, 7, 401, 10_000] {
        for f in [0u64, 1, 59, 14_999, 30_000] {
            let t = f as f64 * 0.05;
            assert_eq!(long_cycle(t, seed).to_bits(), long_cycle(t, seed).to_bits());
        }
    }
}

#[test]
fn bounded_over_long_window() {
    for seed in [1u64, 42, 9_001] {
        for f in 0..20_000u64 {
            let v = long_cycle(f as f64 * 0.031, seed);
            assert!((-1.0..=1.0).contains(&v));
            let u = long_cycle01(f as f64 * 0.031, seed);
            assert!((0.0..=1.0).contains(&u));
        }
    }
}

#[test]
fn non_finite_time_is_zero() {
    assert_eq!(long_cycle(f64::NAN, 3), 0.0);
    assert_eq!(long_cycle(f64::INFINITY, 3), 0.0);
}

#[test]
fn continuous_in_time() {
    let seed = 12;
    let mut prev = long_cycle(0.0, seed);
    for i in 1..10_000 {
        let v = long_cycle(i as f64 * 0.001, seed);
        assert!((v - prev).abs() < 0.01);
        prev = v;
    }
}

#[test]
fn seeds_shift_the_signal() {
    let a: Vec<f64> = (0..100).map(|f| long_cycle(f as f64 * 0.1, 1)).collect();
    let b: Vec<f64> = (0..100).map(|f| long_cycle(f as f64 * 0.1, 2)).collect();
    assert_ne!(a, b);
}

#[test]
fn no_window_of_500_frames_repeats_in_15000() {
    const FRAMES: usize = 15_000;
    const WINDOW: usize = 500;
    let samples: Vec<u64> = (0..FRAMES)
        .map(|f| long_cycle(f as f64 * 0.05, 401).to_bits())
        .collect();

    // Any repeated window must start with a repeated value; only those starts are checked.
    let mut starts: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, &bits) in samples.iter().enumerate().take(FRAMES - WINDOW + 1) {
        starts.entry(bits).or_default().push(i);
    }
    for positions in starts.values().filter(|p| p.len() > 1) {
        for (k, &i) in positions.iter().enumerate() {
            for &j in &positions[k + 1..] {
                assert_ne!(
                    samples[i..i + WINDOW],
                    samples[j..j + WINDOW],
                    "window at {i} repeats at {j}"
                );
            }
        }
    }
}

/// First lag in `[window, len - window]` at which the signal never diverges from its
/// shifted copy by more than `threshold`, if any.
fn near_repeat_lag(samples: &[f64], window: usize, threshold: f64) -> Option<usize> {
    (window..=samples.len() - window).find(|&lag| {
        samples
            .iter()
            .zip(&samples[lag..])
            .all(|(a, b)| (a - b).abs() <= threshold)
    })
}

#[test]
fn no_lag_tracks_the_signal_within_tolerance() {
    const FRAMES: usize = 15_000;
    const WINDOW: usize = 500;
    for seed in [401u64, 7] {
        let samples: Vec<f64> = (0..FRAMES)
            .map(|f| long_cycle(f as f64 * 0.05, seed))
            .collect();
        assert_eq!(near_repeat_lag(&samples, WINDOW, 0.05), None, "seed {seed}");
    }

    // A single sine with a ~126 frame period is caught at a multiple of its period.
    let periodic: Vec<f64> = (0..FRAMES).map(|f| (f as f64 * 0.05).sin()).collect();
    assert!(near_repeat_lag(&periodic, WINDOW, 0.05).is_some());
}

#[test]
fn wobble_respects_offset_and_amplitude() {
    let w = Wobble {
        amp: 3.0,
        rate: 0.02,
        offset: 10.0,
        phase: 5,
    };
    for f in 0..2_000u64 {
        let v = w.at(FrameIndex(f), 9);
        assert!((7.0..=13.0).contains(&v));
    }
    assert_eq!(w.at(FrameIndex(33), 9), w.at(FrameIndex(33), 9));
    assert_ne!(
        Wobble::new(1.0, 0.1).at(FrameIndex(20), 9),
        Wobble::new(1.0, 0.1).with_phase(1).at(FrameIndex(20), 9)
    );
}
