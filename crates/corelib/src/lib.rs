//! Core types: math re-exports, Camera, animation knobs, time source.

pub use glam::{EulerRot, Mat4, Vec3, vec3};

pub mod animation;
pub mod camera;
pub mod clock;

pub use animation::{AnimationState, Knob};
pub use camera::Camera;
pub use clock::{Clock, ManualClock, Stopwatch};
