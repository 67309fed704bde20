use crate::constants::{AUDIO_INPUT_GAIN, AUDIO_SMOOTHING, AUDIO_THRESHOLD};

/// Exponentially smoothed audio amplitude with a noise-floor deadzone.
#[derive(Clone, Debug, Default)]
pub struct AudioSmoother {
    smoothed: f32,
}

impl AudioSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw sample. Values outside [0, 1] are clamped and
    /// non-finite values count as silence.
    pub fn update(&mut self, raw: f32) -> f32 {
        let raw = if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            log::warn!("[audio] non-finite level {}, treating as silence", raw);
            0.0
        };
        let target = (raw * AUDIO_INPUT_GAIN).min(1.0);
        self.smoothed += (target - self.smoothed) * AUDIO_SMOOTHING;
        self.smoothed
    }

    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    pub fn boost(&self) -> f32 {
        boost_for(self.smoothed)
    }

    pub fn reset(&mut self) {
        self.smoothed = 0.0;
    }
}

/// Deadzone mapping: 0 at or below the threshold, rising linearly to 1.
#[inline]
pub fn boost_for(smoothed: f32) -> f32 {
    if smoothed > AUDIO_THRESHOLD {
        ((smoothed - AUDIO_THRESHOLD) / (1.0 - AUDIO_THRESHOLD)).min(1.0)
    } else {
        0.0
    }
}

/// Mean of byte frequency bins scaled to [0, 1].
pub fn spectrum_level(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / bins.len() as f32 / 255.0
}
