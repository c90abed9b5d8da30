//! Orbit camera for the hair viewer.

use crate::render::GlobalUniforms;
use glam::{Mat4, Vec3};

/// Orbit camera looking at the hair object.
///
/// Starts at `(0, 0, 6)` looking at the origin with a 0.8 rad vertical
/// field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    const PITCH_LIMIT: f32 = 1.5;

    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 6.0,
            target: Vec3::ZERO,
            fov_y: 0.8,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), self.near, self.far)
    }

    /// Rotate by a mouse drag of `(dx, dy)` radians.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx;
        self.pitch = (self.pitch + dy).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Scale the distance; positive `amount` moves closer.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance * (1.0 - amount * 0.1)).clamp(1.0, 50.0);
    }

    /// Per-frame uniforms for a viewport of the given aspect ratio.
    pub fn global_uniforms(&self, aspect: f32) -> GlobalUniforms {
        GlobalUniforms::new(
            self.projection_matrix(aspect),
            self.view_matrix(),
            Mat4::IDENTITY,
            self.position(),
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
