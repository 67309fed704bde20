//! The owned simulation state and its per-tick step.

use crate::audio::AudioSmoother;
use crate::color::{parse_palette_lossy, ColorTransition, Palette, Rgb};
use crate::compositor::{orientation, Compositor};
use crate::constants::{COLOR_TRANSITION_STEP, DEFAULT_PALETTE_RGB8};
use crate::effects::{Effect, EffectLevels, TimerBank, TriggerSignals};
use crate::field::{FieldConfig, ParticleField};
use crate::modifiers::{compose, FrameParams};
use crate::noise::SimplexNoise;
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub field: FieldConfig,
    pub color_step: f32,
    /// Initial palette as colour names or hex strings.
    pub palette: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let [r, g, b] = DEFAULT_PALETTE_RGB8;
        Self {
            field: FieldConfig::default(),
            color_step: COLOR_TRANSITION_STEP,
            palette: vec![format!("#{:02x}{:02x}{:02x}", r, g, b)],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Milliseconds since the simulation started.
    pub now_ms: f64,
    /// Raw audio amplitude in [0, 1].
    pub audio_level: f32,
}

pub struct Simulation {
    field: ParticleField,
    noise: SimplexNoise,
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    timers: TimerBank,
    signals: TriggerSignals,
    palette: ColorTransition,
    audio: AudioSmoother,
    sparkle: StdRng,
    color_step: f32,
    params: FrameParams,
    levels: EffectLevels,
    orientation: Quat,
    frames: u64,
}

impl Simulation {
    pub fn new(config: &SimulationConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let field = ParticleField::generate(&config.field, &mut rng);
        let noise = SimplexNoise::new(&mut rng);
        // Sparkle draws use their own stream
        let sparkle = StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
        let color_step = if config.color_step.is_finite() && config.color_step > 0.0 {
            config.color_step.min(1.0)
        } else {
            COLOR_TRANSITION_STEP
        };
        let n = field.len();
        Self {
            positions: field.base_positions().to_vec(),
            colors: vec![Rgb::BLACK; n],
            field,
            noise,
            timers: TimerBank::new(),
            signals: TriggerSignals::new(),
            palette: ColorTransition::new(parse_palette_lossy(&config.palette)),
            audio: AudioSmoother::new(),
            sparkle,
            color_step,
            params: FrameParams::default(),
            levels: EffectLevels::default(),
            orientation: Quat::IDENTITY,
            frames: 0,
        }
    }

    pub fn trigger(&mut self, effect: Effect, now_ms: f64) -> bool {
        self.timers.trigger(effect, now_ms)
    }

    /// Drive a request signal; a rising edge starts the effect.
    pub fn set_signal(&mut self, effect: Effect, on: bool, now_ms: f64) -> bool {
        self.signals.set(effect, on) && self.timers.trigger(effect, now_ms)
    }

    /// Hold a request signal high for `hold_ms`; a rising edge starts the
    /// effect.
    pub fn pulse_signal(&mut self, effect: Effect, now_ms: f64, hold_ms: f64) -> bool {
        self.signals.pulse(effect, now_ms, hold_ms) && self.timers.trigger(effect, now_ms)
    }

    pub fn deactivate(&mut self, effect: Effect) -> bool {
        self.timers.deactivate(effect)
    }

    pub fn set_target_palette(&mut self, palette: Palette) {
        self.palette.set_target_palette(palette);
    }

    pub fn step(&mut self, input: FrameInput) {
        let now = input.now_ms;
        self.signals.release_due(now);
        self.timers.expire(now);
        self.palette.tick(self.color_step);
        self.audio.update(input.audio_level);

        self.levels = self.timers.levels(now);
        self.params = compose(&self.levels, self.audio.boost());

        let time = now / 1000.0;
        let compositor = Compositor {
            field: &self.field,
            noise: &self.noise,
            levels: &self.levels,
            params: &self.params,
            palette: self.palette.current(),
            time,
        };
        compositor.run(&mut self.positions, &mut self.colors, &mut self.sparkle);

        self.orientation = orientation(time, &self.levels);
        self.frames += 1;
    }

    pub fn len(&self) -> usize {
        self.field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Positions as a flat `[x, y, z, ...]` buffer.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colours as a flat `[r, g, b, ...]` buffer.
    pub fn color_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn params(&self) -> &FrameParams {
        &self.params
    }

    pub fn levels(&self) -> &EffectLevels {
        &self.levels
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    pub fn signals(&self) -> &TriggerSignals {
        &self.signals
    }

    pub fn palette(&self) -> &ColorTransition {
        &self.palette
    }

    pub fn audio(&self) -> &AudioSmoother {
        &self.audio
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
