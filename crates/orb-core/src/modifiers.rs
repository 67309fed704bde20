//! Frame-wide motion parameters, built by an ordered list of named stages.
//!
//! Each stage reads effect intensities (and the audio boost) and edits a
//! [`FrameParams`]. Adding a new effect means appending one stage here.

use crate::constants::*;
use crate::effects::{Effect, EffectLevels};

/// Parameters shared by every particle for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    pub flow_speed: f32,
    pub displacement: f32,
    pub pull: f32,
    pub swirl: f32,
    pub current: f32,
    pub layer: f32,
    /// Velocity multiplier: the strongest slow-down among active effects.
    pub velocity: f32,
    /// Global voice-driven breathing scale.
    pub breathing: f32,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            flow_speed: BASE_FLOW_SPEED,
            displacement: BASE_DISPLACEMENT,
            pull: BASE_PULL,
            swirl: BASE_SWIRL,
            current: BASE_CURRENT,
            layer: BASE_LAYER,
            velocity: 1.0,
            breathing: 1.0,
        }
    }
}

pub type ModifierFn = fn(&mut FrameParams, &EffectLevels, f32);

#[derive(Clone, Copy)]
pub struct Modifier {
    pub name: &'static str,
    pub apply: ModifierFn,
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier").field("name", &self.name).finish()
    }
}

pub const MODIFIERS: [Modifier; 7] = [
    Modifier { name: "calm", apply: calm },
    Modifier { name: "sadness", apply: sadness },
    Modifier { name: "frustration", apply: frustration },
    Modifier { name: "anger", apply: anger },
    Modifier { name: "confusion", apply: confusion },
    Modifier { name: "velocity", apply: velocity_damping },
    Modifier { name: "voice", apply: voice_breathing },
];

/// Run every stage in order starting from the baseline.
pub fn compose(levels: &EffectLevels, boost: f32) -> FrameParams {
    let mut params = FrameParams::default();
    for stage in MODIFIERS.iter() {
        (stage.apply)(&mut params, levels, boost);
    }
    params
}

fn calm(p: &mut FrameParams, levels: &EffectLevels, _boost: f32) {
    let c = levels.level(Effect::Calm);
    p.velocity = p.velocity.min(1.0 - c * 0.6);
}

fn sadness(p: &mut FrameParams, levels: &EffectLevels, _boost: f32) {
    let s = levels.level(Effect::Sadness);
    p.velocity = p.velocity.min(1.0 - s * 0.4);
}

fn frustration(p: &mut FrameParams, levels: &EffectLevels, _boost: f32) {
    let f = levels.level(Effect::Frustration);
    p.flow_speed += f * 0.8;
    p.displacement += f * 1.2;
    p.swirl += f * 0.01;
    p.current += f * 0.02;
    p.layer += f * 0.08;
}

fn anger(p: &mut FrameParams, levels: &EffectLevels, _boost: f32) {
    let a = levels.level(Effect::Anger);
    p.flow_speed += a * 1.5;
    p.displacement += a * 2.0;
    p.swirl += a * 0.02;
    p.current += a * 0.03;
    p.layer += a * 0.12;
}

fn confusion(p: &mut FrameParams, levels: &EffectLevels, _boost: f32) {
    let c = levels.level(Effect::Confusion);
    p.displacement += c * 1.5;
    p.current += c * 1.5 * 0.02;
}

// Displacement is not damped.
fn velocity_damping(p: &mut FrameParams, _levels: &EffectLevels, _boost: f32) {
    let v = p.velocity;
    p.flow_speed *= v;
    p.pull *= v;
    p.swirl *= v;
    p.current *= v;
    p.layer *= v;
}

fn voice_breathing(p: &mut FrameParams, levels: &EffectLevels, boost: f32) {
    let calm = levels.level(Effect::Calm);
    let sad = levels.level(Effect::Sadness);
    p.breathing = 1.0 + boost * VOICE_EXPANSION * (1.0 - calm * 0.5) * (1.0 - sad * 0.35);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_is_fixed() {
        let names: Vec<_> = MODIFIERS.iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            ["calm", "sadness", "frustration", "anger", "confusion", "velocity", "voice"]
        );
    }

    #[test]
    fn velocity_takes_strongest_slowdown() {
        let levels = EffectLevels::default()
            .with(Effect::Calm, 0.5)
            .with(Effect::Sadness, 1.0);
        let p = compose(&levels, 0.0);
        // calm -> 0.7, sadness -> 0.6
        assert!((p.velocity - 0.6).abs() < 1e-6);
        assert!((p.pull - BASE_PULL * 0.6).abs() < 1e-6);
        assert!((p.displacement - BASE_DISPLACEMENT).abs() < 1e-6);
    }
}
