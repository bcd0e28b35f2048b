//! Perspective camera and the energy-modulated orbit it follows.

use crate::constants::{
    CAMERA_FOVY_DEGREES, CAMERA_ORBIT_RADIUS, CAMERA_ORBIT_RATE, CAMERA_ZFAR, CAMERA_ZNEAR,
};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera at its starting spot on the orbit, looking at the origin.
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_ORBIT_RADIUS),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ignores degenerate sizes (minimised windows report 0).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Place the eye on the orbit for `elapsed_sec` and re-aim at the origin.
    pub fn follow_orbit(&mut self, elapsed_sec: f32, zoom: f32) {
        self.eye = orbit_eye(elapsed_sec, zoom);
        self.target = Vec3::ZERO;
    }
}

/// Eye position on the horizontal orbit. `zoom` stretches the radius.
#[inline]
pub fn orbit_eye(elapsed_sec: f32, zoom: f32) -> Vec3 {
    let radius = CAMERA_ORBIT_RADIUS * zoom;
    let angle = elapsed_sec * CAMERA_ORBIT_RATE;
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_starts_on_positive_x_at_base_radius() {
        let eye = orbit_eye(0.0, 1.0);
        assert!((eye.x - CAMERA_ORBIT_RADIUS).abs() < 1e-5);
        assert!(eye.y.abs() < 1e-6);
        assert!(eye.z.abs() < 1e-6);
    }

    #[test]
    fn zoom_scales_orbit_radius() {
        let eye = orbit_eye(1234.0, 1.5);
        assert!((eye.length() - CAMERA_ORBIT_RADIUS * 1.5).abs() < 1e-3);
    }

    #[test]
    fn zero_viewport_keeps_previous_aspect() {
        let mut cam = Camera::new(1.5);
        cam.set_viewport(0, 600);
        assert_eq!(cam.aspect, 1.5);
        cam.set_viewport(800, 400);
        assert_eq!(cam.aspect, 2.0);
    }
}
