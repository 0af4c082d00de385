//! Externally driven animation knobs read once per frame.

use std::f32::consts::TAU;

use crate::{EulerRot, Mat4};

/// Rotation angles (radians) and the disco blend factor.
///
/// No invariant is enforced on the raw fields; [`AnimationState::nudge`]
/// keeps angles wrapped and disco within 0..=1 for the keyboard path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub disco: f32,
}

/// One adjustable field of [`AnimationState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Knob {
    Yaw,
    Pitch,
    Roll,
    Disco,
}

impl AnimationState {
    pub fn with_disco(disco: f32) -> Self {
        Self {
            disco: disco.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Model matrix = Ry(yaw) * Rx(pitch) * Rz(roll): roll applied first,
    /// then pitch, then yaw.
    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll)
    }

    pub fn nudge(&mut self, knob: Knob, delta: f32) {
        match knob {
            Knob::Yaw => self.yaw = wrap_angle(self.yaw + delta),
            Knob::Pitch => self.pitch = wrap_angle(self.pitch + delta),
            Knob::Roll => self.roll = wrap_angle(self.roll + delta),
            Knob::Disco => self.disco = (self.disco + delta).clamp(0.0, 1.0),
        }
    }

    /// Snap disco fully on or fully off.
    pub fn toggle_disco(&mut self) {
        self.disco = if self.disco > 0.5 { 0.0 } else { 1.0 };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn wrap_angle(a: f32) -> f32 {
    a.rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    #[test]
    fn yaw_rotates_about_y() {
        let a = AnimationState {
            yaw: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        let v = a.model_matrix().transform_vector3(Vec3::X);
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn roll_is_applied_before_yaw() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        let a = AnimationState {
            yaw: half_pi,
            roll: half_pi,
            ..Default::default()
        };
        // X --roll--> Y --yaw--> Y
        let v = a.model_matrix().transform_vector3(Vec3::X);
        assert!((v - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn disco_nudge_is_clamped() {
        let mut a = AnimationState::default();
        a.nudge(Knob::Disco, 3.0);
        assert_eq!(a.disco, 1.0);
        a.nudge(Knob::Disco, -7.0);
        assert_eq!(a.disco, 0.0);
    }

    #[test]
    fn angles_wrap() {
        let mut a = AnimationState::default();
        a.nudge(Knob::Pitch, -0.5);
        assert!((a.pitch - (TAU - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn toggle_and_reset() {
        let mut a = AnimationState::with_disco(0.2);
        a.toggle_disco();
        assert_eq!(a.disco, 1.0);
        a.toggle_disco();
        assert_eq!(a.disco, 0.0);
        a.yaw = 1.0;
        a.reset();
        assert_eq!(a, AnimationState::default());
    }
}
