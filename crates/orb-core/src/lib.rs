pub mod audio;
pub mod color;
pub mod compositor;
pub mod constants;
pub mod dispatch;
pub mod effects;
pub mod error;
pub mod field;
pub mod modifiers;
pub mod noise;
pub mod simulation;

pub use audio::*;
pub use color::*;
pub use compositor::{clamp_to_radius, orientation, Compositor, Highlights};
pub use dispatch::*;
pub use effects::*;
pub use error::OrbError;
pub use field::*;
pub use modifiers::{compose, FrameParams, Modifier, MODIFIERS};
pub use noise::SimplexNoise;
pub use simulation::*;
