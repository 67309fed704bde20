//! Per-particle frame update.
//!
//! Every particle passes through the same fixed sequence of stages; each
//! stage takes the running position and returns the next one. Stages that
//! feed colour tinting also record a highlight value.

use crate::color::{gray_particle_color, palette_index, Rgb};
use crate::constants::*;
use crate::effects::{Effect, EffectLevels};
use crate::field::ParticleField;
use crate::modifiers::FrameParams;
use crate::noise::SimplexNoise;
use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

// Phase of `t * rate` reduced to one turn while still in f64.
#[inline]
fn phase(t: f64, rate: f32) -> f32 {
    (t * rate as f64).rem_euclid(std::f64::consts::TAU) as f32
}

// Noise time coordinate `t * rate`, wrapped so f32 keeps its resolution.
#[inline]
fn clock(t: f64, rate: f32) -> f32 {
    (t * rate as f64).rem_euclid(NOISE_TIME_WRAP) as f32
}

/// Highlight values produced by the gesture stages, consumed by colouring.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Highlights {
    pub wave: f32,
    pub smile: f32,
    pub frown: f32,
}

pub struct Compositor<'a> {
    pub field: &'a ParticleField,
    pub noise: &'a SimplexNoise,
    pub levels: &'a EffectLevels,
    pub params: &'a FrameParams,
    pub palette: &'a [Rgb],
    /// Simulation time in seconds.
    pub time: f64,
}

// Intensity-derived terms evaluated once per frame.
struct Gains {
    wave: f32,
    smile: f32,
    frown: f32,
    joy: Option<f32>,
    disgust: Option<f32>,
    embarrassment: Option<f32>,
    excitement: bool,
    confusion: Option<f32>,
}

impl Gains {
    fn new(levels: &EffectLevels) -> Self {
        let when_active = |e: Effect| levels.is_active(e).then(|| levels.get(e));
        let positive = |e: Effect| when_active(e).filter(|v| *v > 0.0);
        Self {
            wave: levels.level(Effect::Wave),
            smile: levels.level(Effect::Smile),
            frown: levels.level(Effect::Frown),
            joy: when_active(Effect::Joy),
            disgust: when_active(Effect::Disgust),
            embarrassment: when_active(Effect::Embarrassment),
            excitement: positive(Effect::Excitement).is_some(),
            confusion: positive(Effect::Confusion),
        }
    }
}

impl<'a> Compositor<'a> {
    pub fn run<R: Rng + ?Sized>(&self, positions: &mut [Vec3], colors: &mut [Rgb], sparkle: &mut R) {
        let gains = Gains::new(self.levels);
        let n = self.field.len();
        for (i, (pos, color)) in positions.iter_mut().zip(colors.iter_mut()).enumerate().take(n) {
            let (next, highlights) = self.advance(i, *pos, &gains);
            *pos = next;
            *color = self.shade(i, n, highlights, sparkle.gen::<f32>());
        }
    }

    fn advance(&self, i: usize, pos: Vec3, gains: &Gains) -> (Vec3, Highlights) {
        let f = self.field;
        let base = f.base_positions()[i];
        let offset = f.noise_offsets()[i];
        let mut highlights = Highlights::default();

        let natural = self.natural_target(i, base, offset);
        let mut pos = self.pull_and_swirl(pos, natural, base);
        pos = self.orbit(i, pos);
        if f.flags()[i].center_orbiter {
            pos = self.center_orbit(i, pos);
        }
        pos = self.flow_currents(base, offset, pos);
        pos = self.filament(i, base, offset, pos);
        if gains.wave > 0.0 {
            pos = self.wave(i, base, pos, gains.wave, &mut highlights);
        }
        if gains.smile > 0.0 || gains.frown > 0.0 {
            pos = mouth(base, pos, gains.smile, gains.frown, &mut highlights);
        }
        let scale = self.final_scale(i, gains);
        if gains.excitement {
            pos = self.excitement_ring(i, pos);
        }
        if let Some(confusion) = gains.confusion {
            pos = self.confusion_scatter(base, offset, pos, confusion);
        }
        pos *= scale;
        (clamp_to_radius(pos, f.max_radius()), highlights)
    }

    #[inline]
    fn n4(&self, p: Vec3, w: f32) -> f32 {
        self.noise.noise4d(p.x, p.y, p.z, w)
    }

    fn natural_target(&self, i: usize, base: Vec3, offset: Vec3) -> Vec3 {
        let t = self.time;
        let noise = self.n4(base * FLOW_SAMPLE_SCALE + offset, clock(t, self.params.flow_speed));
        let breath = 1.0 + (phase(t, BREATH_RATE) + self.field.breath_offsets()[i]).sin() * BREATH_DEPTH;
        base * (breath + noise * self.params.displacement)
    }

    // Swirl reads the position from before the pull.
    fn pull_and_swirl(&self, pos: Vec3, natural: Vec3, base: Vec3) -> Vec3 {
        let swirl = self.params.swirl;
        let mut next = pos + (natural - pos) * self.params.pull;
        next.x += -pos.y * swirl;
        next.y += pos.x * swirl;
        next.z += (base.x * 0.5 + phase(self.time, 0.5)).sin() * swirl * 0.25;
        next
    }

    fn orbit(&self, i: usize, pos: Vec3) -> Vec3 {
        let f = self.field;
        let angle = phase(self.time, f.orbit_speeds()[i]) + f.phase_offsets()[i];
        let curve = f.basis_u()[i] * angle.sin() + f.basis_v()[i] * angle.cos();
        pos + curve * (f.orbit_amplitudes()[i] * ORBIT_SCALE)
    }

    fn center_orbit(&self, i: usize, pos: Vec3) -> Vec3 {
        let t = self.time;
        let ph = self.field.phase_offsets()[i];
        let radius = CENTER_ORBIT_RADIUS + (phase(t, 0.3) + ph).sin() * CENTER_ORBIT_RADIUS_SWING;
        let angle = phase(t, self.field.orbit_speeds()[i] * 0.5) + ph;
        let vertical = (phase(t, 0.2) + ph).sin() * 0.5;
        let target = Vec3::new(
            angle.cos() * radius * vertical.cos(),
            angle.sin() * radius * vertical.cos(),
            vertical.sin() * radius * 0.6,
        );
        pos * (1.0 - CENTER_ORBIT_BLEND) + target * CENTER_ORBIT_BLEND
    }

    fn flow_currents(&self, base: Vec3, off: Vec3, pos: Vec3) -> Vec3 {
        let t = self.time;
        let n1 = self.n4(base * 0.7 + off, clock(t, 0.28));
        let n2 = self.n4(base * 1.2 + Vec3::new(off.y, off.z, off.x), clock(t, 0.4) + 15.0);
        let n3 = self.n4(base * 0.9 + Vec3::new(off.z, off.x, off.y), clock(t, 0.33) + 31.0);
        pos + Vec3::new(n2 - n1, n1 - n3, n2 - n3 * 0.5) * self.params.current
    }

    fn filament(&self, i: usize, base: Vec3, off: Vec3, pos: Vec3) -> Vec3 {
        let w = clock(self.time, 0.6) + i as f32 * 0.0002;
        let f = self.n4(base * 2.2 + off * 0.5, w);
        pos + self.field.basis_u()[i] * (f * self.params.layer)
    }

    // Arm-like sweep on the +X side of the shell.
    fn wave(&self, i: usize, base: Vec3, pos: Vec3, wave: f32, hl: &mut Highlights) -> Vec3 {
        let reach = base.x.max(0.0);
        if reach <= 0.05 {
            return pos;
        }
        let vertical = (1.0 - base.y.abs() * 1.8).max(0.0);
        let depth = (1.0 - base.z.abs() * 1.2).max(0.0);
        let angle = phase(self.time, WAVE_RATE) + base.y * 9.0 + self.field.phase_offsets()[i] * 0.6;
        let lift = angle.sin() * wave.powf(0.7) * reach * vertical * depth;
        hl.wave = lift.abs();
        pos + Vec3::new(lift * 0.5, lift * 0.18, lift * 0.28)
    }

    fn final_scale(&self, i: usize, gains: &Gains) -> f32 {
        let mut scale = self.params.breathing;
        if let Some(joy) = gains.joy {
            let bounce = joy * 0.3;
            scale *= 1.0 + (phase(self.time, 8.0) + self.field.breath_offsets()[i]).sin() * bounce;
        }
        if let Some(disgust) = gains.disgust {
            scale *= 1.0 - disgust * 0.7 * disgust;
        }
        if let Some(progress) = gains.embarrassment {
            scale *= 1.0 - (1.0 - EMBARRASSMENT_SHRINK_TARGET) * progress;
        }
        scale
    }

    // The ring slot comes from the particle index so the ring fills evenly.
    fn excitement_ring(&self, i: usize, pos: Vec3) -> Vec3 {
        let n = self.field.len() as f32;
        let angle = i as f32 / n * TAU;
        let radius = RING_RADIUS + ((i as f32 * 0.1).sin() * 0.5 + 0.5) * RING_THICKNESS;
        let target = Vec3::new(
            angle.cos() * radius,
            (i as f32 * 0.5).sin() * 0.5 * RING_THICKNESS,
            angle.sin() * radius,
        );
        let blended = pos * (1.0 - RING_BLEND) + target * RING_BLEND;
        let (s, c) = phase(self.time, RING_SPIN_SPEED).sin_cos();
        Vec3::new(
            blended.x * c - blended.z * s,
            blended.y,
            blended.x * s + blended.z * c,
        )
    }

    fn confusion_scatter(&self, base: Vec3, off: Vec3, pos: Vec3, confusion: f32) -> Vec3 {
        let t = self.time;
        let c1 = self.n4(base * 3.0 + off, clock(t, 2.0));
        let c2 = self.n4(
            Vec3::new(base.y, base.z, base.x) * 3.0 + Vec3::new(off.y, off.z, off.x),
            clock(t, 2.3) + 10.0,
        );
        let c3 = self.n4(
            Vec3::new(base.z, base.x, base.y) * 3.0 + Vec3::new(off.z, off.x, off.y),
            clock(t, 1.8) + 20.0,
        );
        pos + Vec3::new(c1, c2, c3) * (confusion * 0.5)
    }

    fn shade(&self, i: usize, n: usize, hl: Highlights, sparkle: f32) -> Rgb {
        let base = if self.field.flags()[i].gray || self.palette.is_empty() {
            gray_particle_color()
        } else {
            self.palette[palette_index(i, n, self.palette.len())]
        };
        tint(base, hl, sparkle)
    }
}

/// Smile lifts and frown drops a band of particles around the mouth line,
/// split left/right by the sign of the base X coordinate.
fn mouth(base: Vec3, mut pos: Vec3, smile: f32, frown: f32, hl: &mut Highlights) -> Vec3 {
    let vertical = (1.0 - (base.y - MOUTH_OFFSET_Y).abs() * 5.0).max(0.0);
    let horizontal = (1.0 - base.x.abs() * 1.4).max(0.0);
    let depth = (1.0 - base.z.abs() * 1.2).max(0.0);
    let band = vertical * horizontal * depth * 1.2;
    if band <= 0.01 {
        return pos;
    }
    let side = if base.x >= 0.0 { 1.0 } else { -1.0 };
    if smile > 0.0 {
        let lift = smile.powf(0.8) * band * 0.6;
        pos += Vec3::new(side * lift * 0.35, lift, lift * 0.12);
        hl.smile = lift;
    }
    if frown > 0.0 {
        let drop = frown.powf(0.8) * band * 0.6;
        pos -= Vec3::new(side * drop * 0.28, drop, drop * 0.1);
        hl.frown = drop;
    }
    pos
}

/// Apply the sparkle shade and gesture tints, then clamp to [0, 1].
///
/// `sparkle` is a uniform draw in [0, 1).
pub fn tint(base: Rgb, hl: Highlights, sparkle: f32) -> Rgb {
    let mut c = base.scale(SHADE_MIN + sparkle * SHADE_SPAN);
    if hl.wave > 0.0 {
        let glow = (hl.wave * 2.5).min(0.35);
        c.r += glow * 0.12;
        c.g += glow * 0.18;
        c.b += glow * 0.24;
    }
    if hl.smile > 0.0 {
        let glow = (hl.smile * 1.5).min(0.5);
        c.r += (1.0 - c.r) * glow * 0.5;
        c.g += (1.0 - c.g) * glow * 0.35;
    }
    if hl.frown > 0.0 {
        let s = (hl.frown * 1.7).min(0.6);
        c.r *= 1.0 - s * 0.7;
        c.g *= 1.0 - s * 0.4;
        c.b *= 1.0 - s * 0.25;
    }
    c.clamped()
}

/// Rescale `pos` onto the sphere of radius `max_radius` if it lies outside.
pub fn clamp_to_radius(pos: Vec3, max_radius: f32) -> Vec3 {
    let d = pos.length();
    if !d.is_finite() {
        return Vec3::ZERO;
    }
    if d > max_radius {
        pos * (max_radius / d)
    } else {
        pos
    }
}

/// Whole-cloud rotation: slow ambient drift with nod and shake applied on top.
pub fn orientation(t: f64, levels: &EffectLevels) -> Quat {
    let mut q = Quat::from_euler(
        EulerRot::XYZ,
        phase(t, DRIFT_PITCH_RATE).sin() * DRIFT_PITCH_DEPTH,
        phase(t, DRIFT_YAW_RATE),
        phase(t, DRIFT_ROLL_RATE).sin() * DRIFT_ROLL_DEPTH,
    );
    let nod = levels.level(Effect::Nod);
    if nod > 0.0 {
        let angle = phase(t, NOD_RATE).sin() * nod.powf(NOD_EXPONENT) * NOD_AMPLITUDE;
        q = Quat::from_rotation_x(angle) * q;
    }
    let shake = levels.level(Effect::Shake);
    if shake > 0.0 {
        let angle = phase(t, SHAKE_RATE).sin() * shake.powf(SHAKE_EXPONENT) * SHAKE_AMPLITUDE;
        q = Quat::from_rotation_z(angle) * q;
    }
    q.normalize()
}
