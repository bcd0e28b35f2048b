//! Render-facing state written by the parameter store and the frame update.

use crate::camera::Camera;
use crate::params::{Param, VisualParams};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Values the noise mesh shader reads every frame.
///
/// Laid out for direct upload: eight `f32`s, two 16-byte rows.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderUniforms {
    pub time: f32,
    pub frequency: f32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub noise_scale: f32,
    pub displacement_scale: f32,
    pub _pad: f32,
}

impl ShaderUniforms {
    pub const NAMES: [&'static str; 7] = [
        "time",
        "frequency",
        "red",
        "green",
        "blue",
        "noiseScale",
        "displacementScale",
    ];

    pub fn get(&self, name: &str) -> Option<f32> {
        match name {
            "time" => Some(self.time),
            "frequency" => Some(self.frequency),
            "red" => Some(self.red),
            "green" => Some(self.green),
            "blue" => Some(self.blue),
            "noiseScale" => Some(self.noise_scale),
            "displacementScale" => Some(self.displacement_scale),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSettings {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

/// Euler rotation (XYZ order) plus uniform scale about the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn model_matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
            Vec3::ZERO,
        )
    }
}

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub uniforms: ShaderUniforms,
    pub bloom: BloomSettings,
    pub particle_color: [f32; 3],
    pub particle_sphere: Transform,
    pub noise_mesh: Transform,
    pub particle_field: Transform,
    pub camera: Camera,
    pub energy: f32,
}

impl SceneState {
    pub fn new(params: &VisualParams, aspect: f32) -> Self {
        let mut scene = Self {
            uniforms: ShaderUniforms::default(),
            bloom: BloomSettings {
                threshold: 0.0,
                strength: 0.0,
                radius: 0.0,
            },
            particle_color: [0.0; 3],
            particle_sphere: Transform::default(),
            noise_mesh: Transform::default(),
            particle_field: Transform::default(),
            camera: Camera::new(aspect),
            energy: 0.0,
        };
        scene.apply_all(params);
        scene
    }

    /// Project a single parameter into uniforms, bloom or particle color.
    /// Volume has no visual projection.
    pub fn apply_param(&mut self, param: Param, params: &VisualParams) {
        match param {
            Param::Red | Param::Green | Param::Blue => {
                self.uniforms.red = params.red;
                self.uniforms.green = params.green;
                self.uniforms.blue = params.blue;
                self.particle_color = params.color();
            }
            Param::BloomThreshold => self.bloom.threshold = params.bloom_threshold,
            Param::BloomStrength => self.bloom.strength = params.bloom_strength,
            Param::BloomRadius => self.bloom.radius = params.bloom_radius,
            Param::NoiseScale => self.uniforms.noise_scale = params.noise_scale,
            Param::DisplacementScale => {
                self.uniforms.displacement_scale = params.displacement_scale
            }
            Param::Volume => {}
        }
    }

    pub fn apply_all(&mut self, params: &VisualParams) {
        for param in Param::ALL {
            self.apply_param(param, params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scene_projects_defaults() {
        let params = VisualParams::defaults("t");
        let scene = SceneState::new(&params, 1.0);
        assert_eq!(scene.uniforms.blue, 0.5);
        assert_eq!(scene.uniforms.noise_scale, 1.5);
        assert_eq!(scene.uniforms.displacement_scale, 3.0);
        assert_eq!(scene.bloom.strength, 0.7);
        assert_eq!(scene.particle_color, [0.0, 0.02, 0.5]);
        assert_eq!(scene.particle_field.scale, 1.0);
    }

    #[test]
    fn uniform_lookup_by_name() {
        let u = ShaderUniforms {
            time: 1.0,
            frequency: 2.0,
            red: 3.0,
            green: 4.0,
            blue: 5.0,
            noise_scale: 6.0,
            displacement_scale: 7.0,
            _pad: 0.0,
        };
        let values: Vec<f32> = ShaderUniforms::NAMES
            .iter()
            .filter_map(|n| u.get(n))
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(u.get("u_time"), None);
        assert_eq!(std::mem::size_of::<ShaderUniforms>(), 32);
    }

    #[test]
    fn identity_transform_is_identity_matrix() {
        assert_eq!(Transform::default().model_matrix(), Mat4::IDENTITY);
    }
}
