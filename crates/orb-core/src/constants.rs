// Shared tuning constants for the particle orb simulation.

// Field layout
pub const PARTICLE_COUNT: usize = 8000;
pub const SHELL_RADIUS: f32 = 1.75;
pub const SHELL_BIAS: f32 = 0.75; // < 1 pushes mass toward the shell
pub const CENTER_ORBITER_FRACTION: f32 = 0.02;
pub const GRAY_PARTICLE_FRACTION: f32 = 0.30;

// Per-particle randomisation ranges
pub const NOISE_OFFSET_RANGE: f32 = 100.0;
pub const ORBIT_SPEED_MIN: f32 = 0.6;
pub const ORBIT_SPEED_SPAN: f32 = 1.2;
pub const ORBIT_AMPLITUDE_MIN: f32 = 0.015;
pub const ORBIT_AMPLITUDE_SPAN: f32 = 0.035;

// Below this length a cross product is treated as degenerate
pub const DEGENERATE_EPSILON: f32 = 1e-3;

// Clamp sphere relative to the shell radius
pub const MAX_RADIUS_FACTOR: f32 = 1.4;

// Natural flow
pub const BASE_FLOW_SPEED: f32 = 0.18;
pub const BASE_DISPLACEMENT: f32 = 0.45;
pub const BASE_PULL: f32 = 0.1;
pub const BASE_SWIRL: f32 = 0.004;
pub const BASE_CURRENT: f32 = 0.012;
pub const BASE_LAYER: f32 = 0.04;
pub const FLOW_SAMPLE_SCALE: f32 = 0.75;
pub const BREATH_RATE: f32 = 0.45;
pub const BREATH_DEPTH: f32 = 0.08;
pub const ORBIT_SCALE: f32 = 0.4;

// Center orbiters
pub const CENTER_ORBIT_BLEND: f32 = 0.6;
pub const CENTER_ORBIT_RADIUS: f32 = 0.8;
pub const CENTER_ORBIT_RADIUS_SWING: f32 = 0.2;

// Audio smoothing
pub const AUDIO_INPUT_GAIN: f32 = 1.5;
pub const AUDIO_SMOOTHING: f32 = 0.08;
pub const AUDIO_THRESHOLD: f32 = 0.15;
pub const VOICE_EXPANSION: f32 = 0.12; // 12% expansion at full boost

// Colour
pub const COLOR_TRANSITION_STEP: f32 = 0.05; // ~20 frames per transition
pub const GRAY_PARTICLE_RGB8: [u8; 3] = [0x42, 0x42, 0x43];
pub const DEFAULT_PALETTE_RGB8: [u8; 3] = [0x42, 0x42, 0x43];
pub const SHADE_MIN: f32 = 0.8;
pub const SHADE_SPAN: f32 = 0.2;

// Excitement ring
pub const RING_RADIUS: f32 = 1.5;
pub const RING_THICKNESS: f32 = 0.2;
pub const RING_BLEND: f32 = 0.8;
pub const RING_SPIN_SPEED: f32 = 6.0;

// Embarrassment shrinks to this fraction of the original size
pub const EMBARRASSMENT_SHRINK_TARGET: f32 = 0.15;

// Gestures
pub const WAVE_RATE: f32 = 6.0;
pub const MOUTH_OFFSET_Y: f32 = -0.45;

// Noise time coordinates wrap here; f32 stays sub-millisecond below it
pub const NOISE_TIME_WRAP: f64 = 4096.0;

// Ambient orientation drift
pub const DRIFT_YAW_RATE: f32 = 0.05;
pub const DRIFT_PITCH_RATE: f32 = 0.08;
pub const DRIFT_PITCH_DEPTH: f32 = 0.05;
pub const DRIFT_ROLL_RATE: f32 = 0.12;
pub const DRIFT_ROLL_DEPTH: f32 = 0.025;

// Nod/shake rotation (rate rad/s, amplitude rad, intensity exponent)
pub const NOD_RATE: f32 = 4.5;
pub const NOD_AMPLITUDE: f32 = 0.38;
pub const NOD_EXPONENT: f32 = 0.8;
pub const SHAKE_RATE: f32 = 5.2;
pub const SHAKE_AMPLITUDE: f32 = 0.45;
pub const SHAKE_EXPONENT: f32 = 0.85;
