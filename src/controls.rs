// Control events queued by the JS-facing handle and drained by the frame loop.
// Pure Rust (no web-sys) so host-side tests can include this file.
use orb_core::{
    handle_tool_call, Effect, OrbError, Palette, Simulation, ToolAction, ToolCallResult,
};

#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    Pulse { effect: Effect, hold_ms: f64 },
    Palette(Palette),
}

#[derive(Debug, Default)]
pub struct ControlQueue {
    pending: Vec<ControlEvent>,
    audio_level: f32,
    closed: bool,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a remote tool call and queue its action for the next frame.
    pub fn handle_tool_call(&mut self, name: &str, raw_args: &str) -> ToolCallResult {
        if self.closed {
            return ToolCallResult::failure(&OrbError::Stopped);
        }
        let dispatch = handle_tool_call(name, raw_args);
        if let Some(action) = dispatch.action {
            self.push_action(action);
        }
        dispatch.result
    }

    pub fn push_action(&mut self, action: ToolAction) {
        match action {
            ToolAction::Palette(palette) => self.pending.push(ControlEvent::Palette(palette)),
            ToolAction::Effect {
                effect,
                hold_ms,
                palette,
            } => {
                if let Some(palette) = palette {
                    self.pending.push(ControlEvent::Palette(palette));
                }
                self.pending.push(ControlEvent::Pulse { effect, hold_ms });
            }
        }
    }

    /// Latest externally supplied audio level, clamped to [0, 1].
    pub fn set_audio_level(&mut self, level: f32) {
        if self.closed {
            return;
        }
        self.audio_level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn audio_level(&self) -> f32 {
        self.audio_level
    }

    /// Stop accepting input once the frame loop has gone away.
    pub fn close(&mut self) {
        self.closed = true;
        self.pending.clear();
        self.audio_level = 0.0;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every queued event in arrival order. Returns how many were applied.
    pub fn apply(&mut self, sim: &mut Simulation, now_ms: f64) -> usize {
        let count = self.pending.len();
        for event in self.pending.drain(..) {
            match event {
                ControlEvent::Palette(palette) => sim.set_target_palette(palette),
                ControlEvent::Pulse { effect, hold_ms } => {
                    sim.pulse_signal(effect, now_ms, hold_ms);
                }
            }
        }
        count
    }
}
