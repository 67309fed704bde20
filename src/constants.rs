// Camera, point sprite and audio-metering constants for the web front-end.
//
// Kept free of platform types so host-side tests can include this file.

// Perspective camera looking down -Z at the origin
pub const CAMERA_Z: f32 = 5.0;
pub const CAMERA_FOV_DEG: f32 = 70.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Point sprites: world-space width (attenuated with depth) and overall opacity
pub const POINT_SIZE: f32 = 0.035;
pub const POINT_OPACITY: f32 = 0.95;

// Background
pub const CLEAR_RGB: [f64; 3] = [1.0, 1.0, 1.0];

// Analyser
pub const ANALYSER_FFT_SIZE: u32 = 256;

// Default canvas element id
pub const DEFAULT_CANVAS_ID: &str = "orb-canvas";
