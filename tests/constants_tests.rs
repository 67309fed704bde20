// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use orb_core::constants as sim;

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_frames_the_clamp_sphere() {
    let max_radius = sim::SHELL_RADIUS * sim::MAX_RADIUS_FACTOR;
    assert!(CAMERA_NEAR > 0.0 && CAMERA_NEAR < CAMERA_FAR);
    assert!(CAMERA_Z - max_radius > CAMERA_NEAR);
    // Half-height of the view at the origin plane must contain the orb
    let half_view = CAMERA_Z * (CAMERA_FOV_DEG.to_radians() / 2.0).tan();
    assert!(half_view > max_radius);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn sprite_and_analyser_settings_are_valid() {
    assert!(POINT_SIZE > 0.0 && POINT_SIZE < 0.1);
    assert!((0.0..=1.0).contains(&POINT_OPACITY));
    assert!(CLEAR_RGB.iter().all(|c| (0.0..=1.0).contains(c)));
    // AnalyserNode requires a power of two in [32, 32768]
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!((32..=32768).contains(&ANALYSER_FFT_SIZE));
    assert!(!DEFAULT_CANVAS_ID.is_empty());
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn simulation_constants_are_within_reasonable_bounds() {
    assert!(sim::PARTICLE_COUNT > 0);
    assert!(sim::SHELL_BIAS > 0.0 && sim::SHELL_BIAS <= 1.0);
    assert!(sim::MAX_RADIUS_FACTOR > 1.0);
    assert!(sim::CENTER_ORBITER_FRACTION + sim::GRAY_PARTICLE_FRACTION < 1.0);
    assert!(sim::AUDIO_THRESHOLD > 0.0 && sim::AUDIO_THRESHOLD < 1.0);
    assert!(sim::AUDIO_SMOOTHING > 0.0 && sim::AUDIO_SMOOTHING <= 1.0);
    assert!(sim::BASE_PULL > 0.0 && sim::BASE_PULL < 1.0);
    assert!(sim::RING_BLEND > 0.0 && sim::RING_BLEND < 1.0);
    assert!(sim::EMBARRASSMENT_SHRINK_TARGET > 0.0 && sim::EMBARRASSMENT_SHRINK_TARGET < 1.0);
    assert!(sim::SHADE_MIN + sim::SHADE_SPAN <= 1.0 + 1e-6);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn excitement_ring_fits_inside_the_clamp_sphere() {
    let outer = sim::RING_RADIUS + sim::RING_THICKNESS;
    assert!(outer < sim::SHELL_RADIUS * sim::MAX_RADIUS_FACTOR);
}

#[test]
fn palette_transition_takes_about_twenty_frames() {
    let frames = (1.0 / sim::COLOR_TRANSITION_STEP).round() as u32;
    assert_eq!(frames, 20);
}
