//! Named emotion/gesture effects and their timers. An active effect cannot
//! be re-triggered or extended.

use crate::error::OrbError;
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::f32::consts::FRAC_PI_2;

pub const EFFECT_COUNT: usize = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effect {
    Anger,
    Frustration,
    Embarrassment,
    Excitement,
    Joy,
    Sadness,
    Confusion,
    Disgust,
    Calm,
    Wave,
    Nod,
    Shake,
    Smile,
    Frown,
}

impl Effect {
    pub const ALL: [Effect; EFFECT_COUNT] = [
        Effect::Anger,
        Effect::Frustration,
        Effect::Embarrassment,
        Effect::Excitement,
        Effect::Joy,
        Effect::Sadness,
        Effect::Confusion,
        Effect::Disgust,
        Effect::Calm,
        Effect::Wave,
        Effect::Nod,
        Effect::Shake,
        Effect::Smile,
        Effect::Frown,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Effect::Anger => "anger",
            Effect::Frustration => "frustration",
            Effect::Embarrassment => "embarrassment",
            Effect::Excitement => "excitement",
            Effect::Joy => "joy",
            Effect::Sadness => "sadness",
            Effect::Confusion => "confusion",
            Effect::Disgust => "disgust",
            Effect::Calm => "calm",
            Effect::Wave => "wave",
            Effect::Nod => "nod",
            Effect::Shake => "shake",
            Effect::Smile => "smile",
            Effect::Frown => "frown",
        }
    }

    pub fn from_name(name: &str) -> Option<Effect> {
        let name = name.trim();
        Effect::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    pub fn duration_ms(self) -> f64 {
        match self {
            Effect::Anger => 3000.0,
            Effect::Frustration => 3000.0,
            Effect::Embarrassment => 2000.0,
            Effect::Excitement => 1500.0,
            Effect::Joy => 2000.0,
            Effect::Sadness => 4000.0,
            Effect::Confusion => 2500.0,
            Effect::Disgust => 2000.0,
            Effect::Calm => 3000.0,
            Effect::Wave => 1600.0,
            Effect::Nod => 1400.0,
            Effect::Shake => 1400.0,
            Effect::Smile => 2200.0,
            Effect::Frown => 2200.0,
        }
    }

    pub fn curve(self) -> CurveKind {
        match self {
            Effect::Embarrassment => CurveKind::EaseIn,
            _ => CurveKind::LinearDecay,
        }
    }
}

impl std::str::FromStr for Effect {
    type Err = OrbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Effect::from_name(s).ok_or_else(|| OrbError::UnknownEffect(s.to_string()))
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of an effect's intensity over its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    /// `1 - elapsed / duration`, floored at 0.
    LinearDecay,
    /// `sin(min(elapsed, duration) / duration * pi/2)`, rising to 1.
    EaseIn,
}

impl CurveKind {
    pub fn evaluate(self, elapsed_ms: f64, duration_ms: f64) -> f32 {
        if duration_ms <= 0.0 {
            return 0.0;
        }
        let p = (elapsed_ms.max(0.0) / duration_ms) as f32;
        match self {
            CurveKind::LinearDecay => (1.0 - p).clamp(0.0, 1.0),
            CurveKind::EaseIn => (p.min(1.0) * FRAC_PI_2).sin(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectRecord {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub curve: CurveKind,
}

impl EffectRecord {
    pub fn intensity(&self, now_ms: f64) -> f32 {
        self.curve.evaluate(now_ms - self.start_ms, self.duration_ms)
    }

    pub fn deadline_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectLevels {
    pub intensity: [f32; EFFECT_COUNT],
    pub active: [bool; EFFECT_COUNT],
}

impl EffectLevels {
    #[inline]
    pub fn get(&self, effect: Effect) -> f32 {
        self.intensity[effect.index()]
    }

    #[inline]
    pub fn is_active(&self, effect: Effect) -> bool {
        self.active[effect.index()]
    }

    /// Intensity if the effect is active, else 0.
    #[inline]
    pub fn level(&self, effect: Effect) -> f32 {
        if self.is_active(effect) {
            self.get(effect)
        } else {
            0.0
        }
    }

    pub fn with(mut self, effect: Effect, intensity: f32) -> Self {
        self.intensity[effect.index()] = intensity;
        self.active[effect.index()] = true;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct TimerBank {
    running: FnvHashMap<Effect, EffectRecord>,
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `effect` at `now_ms`. Returns false (and changes nothing) when
    /// the effect is already running.
    pub fn trigger(&mut self, effect: Effect, now_ms: f64) -> bool {
        if self.running.contains_key(&effect) {
            return false;
        }
        self.running.insert(
            effect,
            EffectRecord {
                start_ms: now_ms,
                duration_ms: effect.duration_ms(),
                curve: effect.curve(),
            },
        );
        log::debug!("[timers] {} started at {:.0}ms", effect, now_ms);
        true
    }

    /// Out-of-band deactivation. Only clears the active state.
    pub fn deactivate(&mut self, effect: Effect) -> bool {
        self.running.remove(&effect).is_some()
    }

    pub fn expire(&mut self, now_ms: f64) -> SmallVec<[Effect; 4]> {
        let mut expired: SmallVec<[Effect; 4]> = SmallVec::new();
        self.running.retain(|effect, record| {
            if now_ms >= record.deadline_ms() {
                expired.push(*effect);
                false
            } else {
                true
            }
        });
        expired.sort();
        for effect in &expired {
            log::debug!("[timers] {} expired at {:.0}ms", effect, now_ms);
        }
        expired
    }

    pub fn is_active(&self, effect: Effect) -> bool {
        self.running.contains_key(&effect)
    }

    pub fn record(&self, effect: Effect) -> Option<&EffectRecord> {
        self.running.get(&effect)
    }

    pub fn intensity(&self, effect: Effect, now_ms: f64) -> f32 {
        self.running
            .get(&effect)
            .map_or(0.0, |r| r.intensity(now_ms))
    }

    pub fn levels(&self, now_ms: f64) -> EffectLevels {
        let mut levels = EffectLevels::default();
        for (effect, record) in &self.running {
            levels.active[effect.index()] = true;
            levels.intensity[effect.index()] = record.intensity(now_ms);
        }
        levels
    }

    pub fn active_count(&self) -> usize {
        self.running.len()
    }

    pub fn clear(&mut self) {
        self.running.clear();
    }
}

/// External boolean request signals, one per effect.
///
/// A pulse holds its signal high until a release deadline; the timer bank
/// only ever sees the rising edge.
#[derive(Clone, Debug, Default)]
pub struct TriggerSignals {
    requested: [bool; EFFECT_COUNT],
    release_at: [Option<f64>; EFFECT_COUNT],
}

impl TriggerSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a signal level directly. Returns true on a rising edge.
    pub fn set(&mut self, effect: Effect, on: bool) -> bool {
        let i = effect.index();
        let rising = on && !self.requested[i];
        self.requested[i] = on;
        if !on {
            self.release_at[i] = None;
        }
        rising
    }

    /// Raise a signal and lower it again after `hold_ms`. A signal that is
    /// already high keeps its original release time. Returns true on a
    /// rising edge.
    pub fn pulse(&mut self, effect: Effect, now_ms: f64, hold_ms: f64) -> bool {
        let i = effect.index();
        if self.requested[i] {
            return false;
        }
        self.requested[i] = true;
        self.release_at[i] = Some(now_ms + hold_ms.max(0.0));
        true
    }

    pub fn release_due(&mut self, now_ms: f64) -> SmallVec<[Effect; 4]> {
        let mut released = SmallVec::new();
        for effect in Effect::ALL {
            let i = effect.index();
            if matches!(self.release_at[i], Some(at) if now_ms >= at) {
                self.requested[i] = false;
                self.release_at[i] = None;
                released.push(effect);
            }
        }
        released
    }

    pub fn is_requested(&self, effect: Effect) -> bool {
        self.requested[effect.index()]
    }

    pub fn release_time(&self, effect: Effect) -> Option<f64> {
        self.release_at[effect.index()]
    }
}
