use crate::{Mat4, Vec3, vec3};

/// Simple perspective camera (right-handed).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// Fixed camera the teapot is viewed through: eye at (25, 25, 25)
    /// looking at the origin, 45° vertical FOV, near 0.01, far 1000.
    ///
    /// The up vector is -Y. The mesh data is authored for that handedness;
    /// flipping it renders the teapot upside down.
    pub fn orbit_default(aspect: f32) -> Self {
        Self::new_perspective(
            vec3(25.0, 25.0, 25.0),
            Vec3::ZERO,
            vec3(0.0, -1.0, 0.0),
            45f32.to_radians(),
            0.01,
            1000.0,
            aspect,
        )
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Depth maps to z ∈ [0,1] (D3D-style), not the GL-native [-1,1].
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

}
