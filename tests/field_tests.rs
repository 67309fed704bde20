// Host-side tests for particle field generation.

use glam::Vec3;
use orb_core::{tangent_basis, FieldConfig, ParticleField};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn field(count: usize, seed: u64) -> ParticleField {
    let config = FieldConfig {
        count,
        ..FieldConfig::default()
    };
    ParticleField::generate(&config, &mut StdRng::seed_from_u64(seed))
}

fn assert_orthonormal(base: Vec3, u: Vec3, v: Vec3) {
    assert!(u.is_finite() && v.is_finite(), "non-finite basis for {base:?}");
    assert!((u.length() - 1.0).abs() < 1e-4, "|u| = {}", u.length());
    assert!((v.length() - 1.0).abs() < 1e-4, "|v| = {}", v.length());
    assert!(u.dot(v).abs() < 1e-4);
    if base.length() > 1e-3 {
        let dir = base.normalize();
        assert!(u.dot(dir).abs() < 1e-4, "u not perpendicular to base");
        assert!(v.dot(dir).abs() < 1e-4, "v not perpendicular to base");
    }
}

#[test]
fn every_particle_has_an_orthonormal_tangent_basis() {
    let f = field(8000, 1);
    assert_eq!(f.len(), 8000);
    for i in 0..f.len() {
        assert_orthonormal(f.base_positions()[i], f.basis_u()[i], f.basis_v()[i]);
    }
}

#[test]
fn degenerate_axis_falls_back_without_nan() {
    let cases = [
        (Vec3::new(0.3, -1.2, 0.4), Vec3::new(0.3, -1.2, 0.4)),
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0)),
        (Vec3::Y, Vec3::Y),
        (Vec3::NEG_Y * 1.5, Vec3::Y),
        (Vec3::Z, Vec3::ZERO),
        (Vec3::ZERO, Vec3::ZERO),
        (Vec3::ZERO, Vec3::Y),
    ];
    for (base, axis) in cases {
        let (u, v) = tangent_basis(base, axis);
        assert_orthonormal(base, u, v);
    }
}

#[test]
fn base_positions_lie_inside_the_shell() {
    let f = field(4000, 2);
    let r = f.radius();
    let mut mean = 0.0;
    for p in f.base_positions() {
        let d = p.length();
        assert!(d <= r + 1e-4);
        mean += d / r;
    }
    mean /= f.len() as f32;
    // E[u^0.75] = 1 / 1.75
    assert!((mean - 1.0 / 1.75).abs() < 0.03, "mean radius fraction {mean}");
}

#[test]
fn directions_cover_both_poles_evenly() {
    let f = field(4000, 3);
    let upper = f.base_positions().iter().filter(|p| p.z > 0.0).count() as f32;
    let frac = upper / f.len() as f32;
    assert!((frac - 0.5).abs() < 0.05, "upper hemisphere fraction {frac}");
}

#[test]
fn category_flags_follow_configured_fractions() {
    let f = field(8000, 4);
    let n = f.len() as f32;
    let orbiters = f.flags().iter().filter(|fl| fl.center_orbiter).count() as f32 / n;
    let gray = f.flags().iter().filter(|fl| fl.gray).count() as f32 / n;
    assert!((0.01..0.03).contains(&orbiters), "orbiters {orbiters}");
    assert!((0.27..0.33).contains(&gray), "gray {gray}");
}

#[test]
fn per_particle_ranges_are_respected() {
    let f = field(2000, 5);
    for i in 0..f.len() {
        let speed = f.orbit_speeds()[i];
        let amp = f.orbit_amplitudes()[i];
        assert!((0.6..=1.8).contains(&speed));
        assert!((0.015..=0.05).contains(&amp));
        assert!((0.0..=std::f32::consts::TAU).contains(&f.phase_offsets()[i]));
        let off = f.noise_offsets()[i];
        assert!(off.min_element() >= 0.0 && off.max_element() <= 100.0);
    }
}

#[test]
fn same_seed_same_field() {
    let a = field(500, 42);
    let b = field(500, 42);
    assert_eq!(a.base_positions(), b.base_positions());
    assert_eq!(a.basis_u(), b.basis_u());
    assert_eq!(a.flags(), b.flags());
}

#[test]
fn config_is_sanitized() {
    let cfg = FieldConfig {
        count: 0,
        radius: -1.0,
        shell_bias: 3.0,
        center_orbiter_fraction: f32::NAN,
        gray_fraction: 1.5,
    }
    .sanitized();
    assert_eq!(cfg.count, 1);
    assert_eq!(cfg.radius, FieldConfig::default().radius);
    assert_eq!(cfg.shell_bias, 1.0);
    assert_eq!(cfg.center_orbiter_fraction, FieldConfig::default().center_orbiter_fraction);
    assert_eq!(cfg.gray_fraction, 1.0);

    let f = ParticleField::generate(&cfg, &mut StdRng::seed_from_u64(0));
    assert_eq!(f.len(), 1);
    assert!(f.flags()[0].gray);
}

#[test]
fn max_radius_scales_with_shell() {
    let f = field(10, 6);
    assert!((f.max_radius() - f.radius() * 1.4).abs() < 1e-6);
}
