//! Static seed data for every particle in the orb.
//!
//! The field is generated once and never mutated afterwards. Dynamic state
//! (current positions and colours) lives in [`crate::Simulation`].

use crate::constants::*;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub count: usize,
    pub radius: f32,
    /// Exponent applied to the uniform radial draw. Values below 1 push
    /// particles toward the shell.
    pub shell_bias: f32,
    pub center_orbiter_fraction: f32,
    pub gray_fraction: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            radius: SHELL_RADIUS,
            shell_bias: SHELL_BIAS,
            center_orbiter_fraction: CENTER_ORBITER_FRACTION,
            gray_fraction: GRAY_PARTICLE_FRACTION,
        }
    }
}

impl FieldConfig {
    /// Clamp every field into its usable range, falling back to defaults for
    /// non-finite values.
    pub fn sanitized(&self) -> Self {
        let finite_or = |v: f32, d: f32| if v.is_finite() { v } else { d };
        let radius = finite_or(self.radius, SHELL_RADIUS);
        let bias = finite_or(self.shell_bias, SHELL_BIAS);
        Self {
            count: self.count.max(1),
            radius: if radius > 0.0 { radius } else { SHELL_RADIUS },
            shell_bias: if bias > 0.0 { bias.min(1.0) } else { SHELL_BIAS },
            center_orbiter_fraction: finite_or(
                self.center_orbiter_fraction,
                CENTER_ORBITER_FRACTION,
            )
            .clamp(0.0, 1.0),
            gray_fraction: finite_or(self.gray_fraction, GRAY_PARTICLE_FRACTION).clamp(0.0, 1.0),
        }
    }

    pub fn max_radius(&self) -> f32 {
        self.radius * MAX_RADIUS_FACTOR
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticleFlags {
    pub center_orbiter: bool,
    pub gray: bool,
}

/// Immutable per-particle seed data, stored as parallel arrays.
#[derive(Clone, Debug)]
pub struct ParticleField {
    config: FieldConfig,
    base: Vec<Vec3>,
    noise_offset: Vec<Vec3>,
    basis_u: Vec<Vec3>,
    basis_v: Vec<Vec3>,
    orbit_speed: Vec<f32>,
    orbit_amplitude: Vec<f32>,
    phase_offset: Vec<f32>,
    breath_offset: Vec<f32>,
    flags: Vec<ParticleFlags>,
}

impl ParticleField {
    pub fn generate<R: Rng + ?Sized>(config: &FieldConfig, rng: &mut R) -> Self {
        let config = config.sanitized();
        let n = config.count;
        let mut field = Self {
            config: config.clone(),
            base: Vec::with_capacity(n),
            noise_offset: Vec::with_capacity(n),
            basis_u: Vec::with_capacity(n),
            basis_v: Vec::with_capacity(n),
            orbit_speed: Vec::with_capacity(n),
            orbit_amplitude: Vec::with_capacity(n),
            phase_offset: Vec::with_capacity(n),
            breath_offset: Vec::with_capacity(n),
            flags: Vec::with_capacity(n),
        };

        for _ in 0..n {
            let base = sample_shell_point(config.radius, config.shell_bias, rng);
            let noise_offset = Vec3::new(
                rng.gen::<f32>() * NOISE_OFFSET_RANGE,
                rng.gen::<f32>() * NOISE_OFFSET_RANGE,
                rng.gen::<f32>() * NOISE_OFFSET_RANGE,
            );
            let axis = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            let (u, v) = tangent_basis(base, axis);

            field.base.push(base);
            field.noise_offset.push(noise_offset);
            field.basis_u.push(u);
            field.basis_v.push(v);
            field
                .orbit_speed
                .push(ORBIT_SPEED_MIN + rng.gen::<f32>() * ORBIT_SPEED_SPAN);
            field
                .orbit_amplitude
                .push(ORBIT_AMPLITUDE_MIN + rng.gen::<f32>() * ORBIT_AMPLITUDE_SPAN);
            field.phase_offset.push(rng.gen::<f32>() * TAU);
            field.breath_offset.push(rng.gen::<f32>() * TAU);
            field.flags.push(ParticleFlags {
                center_orbiter: rng.gen::<f32>() < config.center_orbiter_fraction,
                gray: rng.gen::<f32>() < config.gray_fraction,
            });
        }

        log::info!(
            "[field] generated {} particles (radius {:.2}, bias {:.2}, orbiters {}, gray {})",
            n,
            config.radius,
            config.shell_bias,
            field.flags.iter().filter(|f| f.center_orbiter).count(),
            field.flags.iter().filter(|f| f.gray).count()
        );
        field
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    pub fn max_radius(&self) -> f32 {
        self.config.max_radius()
    }

    pub fn base_positions(&self) -> &[Vec3] {
        &self.base
    }

    pub fn noise_offsets(&self) -> &[Vec3] {
        &self.noise_offset
    }

    pub fn basis_u(&self) -> &[Vec3] {
        &self.basis_u
    }

    pub fn basis_v(&self) -> &[Vec3] {
        &self.basis_v
    }

    pub fn orbit_speeds(&self) -> &[f32] {
        &self.orbit_speed
    }

    pub fn orbit_amplitudes(&self) -> &[f32] {
        &self.orbit_amplitude
    }

    pub fn phase_offsets(&self) -> &[f32] {
        &self.phase_offset
    }

    pub fn breath_offsets(&self) -> &[f32] {
        &self.breath_offset
    }

    pub fn flags(&self) -> &[ParticleFlags] {
        &self.flags
    }
}

/// Draw a point on the fuzzy shell: uniform direction, radius `R * u^bias`.
pub fn sample_shell_point<R: Rng + ?Sized>(radius: f32, bias: f32, rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (rng.gen::<f32>() * 2.0 - 1.0).clamp(-1.0, 1.0).acos();
    let r = radius * rng.gen::<f32>().powf(bias);
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Orthonormal pair spanning the plane perpendicular to `base`.
///
/// `axis` seeds the orientation of the pair inside that plane. When `axis`
/// is (nearly) zero or parallel to `base`, a fixed axis chosen away from the
/// base direction is used instead, so the result is always unit length.
pub fn tangent_basis(base: Vec3, axis: Vec3) -> (Vec3, Vec3) {
    let dir = if base.length() < DEGENERATE_EPSILON {
        Vec3::Y
    } else {
        base.normalize()
    };
    let axis = if axis.length() < DEGENERATE_EPSILON {
        Vec3::Y
    } else {
        axis.normalize()
    };

    let mut u = axis.cross(dir);
    if u.length() < DEGENERATE_EPSILON {
        let fallback = if dir.y.abs() > 0.5 { Vec3::X } else { Vec3::Y };
        u = fallback.cross(dir);
    }
    let u = u.normalize();
    let v = dir.cross(u).normalize();
    (u, v)
}
