// Host-side tests for audio smoothing and metering.

use orb_core::{boost_for, spectrum_level, AudioSmoother};

#[test]
fn deadzone_is_exactly_zero() {
    for i in 0..=150 {
        assert_eq!(boost_for(i as f32 / 1000.0), 0.0);
    }
    assert_eq!(boost_for(0.15), 0.0);
}

#[test]
fn boost_is_continuous_past_threshold() {
    assert!(boost_for(0.15 + 1e-6) < 1e-5);
    assert!((boost_for(1.0) - 1.0).abs() < 1e-6);
    let mid = boost_for(0.575);
    assert!((mid - 0.5).abs() < 1e-5);
}

#[test]
fn smoothing_follows_scaled_input() {
    let mut s = AudioSmoother::new();
    let first = s.update(1.0);
    assert!((first - 0.08).abs() < 1e-6);
    for _ in 0..300 {
        s.update(1.0);
    }
    assert!((s.smoothed() - 1.0).abs() < 1e-3);
    assert!(s.boost() > 0.99);

    s.reset();
    for _ in 0..300 {
        s.update(0.5);
    }
    // 0.5 * 1.5 gain
    assert!((s.smoothed() - 0.75).abs() < 1e-3);
}

#[test]
fn bad_samples_are_clamped() {
    let mut s = AudioSmoother::new();
    s.update(f32::NAN);
    assert_eq!(s.smoothed(), 0.0);
    s.update(f32::INFINITY);
    assert_eq!(s.smoothed(), 0.0);
    s.update(7.0);
    assert!((s.smoothed() - 0.08).abs() < 1e-6);
    s.update(-3.0);
    assert!(s.smoothed() < 0.08 && s.smoothed() > 0.0);
}

#[test]
fn spectrum_level_is_mean_over_255() {
    assert_eq!(spectrum_level(&[]), 0.0);
    assert_eq!(spectrum_level(&[255; 128]), 1.0);
    assert_eq!(spectrum_level(&[0; 128]), 0.0);
    let level = spectrum_level(&[0, 255, 51, 102]);
    assert!((level - 102.0 / 255.0).abs() < 1e-6);
}
