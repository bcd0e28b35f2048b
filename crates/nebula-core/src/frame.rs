//! Per-frame scene update, decoupled from how frames get scheduled.

use crate::constants::{FIELD_DRIFT_PER_FRAME, NOISE_MESH_SPIN_PER_FRAME, SPHERE_SPIN_PER_FRAME};
use crate::energy::{energy, energy_factor};
use crate::host::{Clock, FrequencySource, InstantClock, SceneRenderer};
use crate::scene::SceneState;

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub elapsed: f32,
    pub energy: f32,
    pub rendered: bool,
}

/// Apply one frame of animation to `scene`.
///
/// `sample` is the current byte spectrum, or `None` when nothing is being
/// analysed; in that case the energy-driven values keep their last state.
pub fn advance_scene(scene: &mut SceneState, elapsed: f32, sample: Option<&[u8]>) {
    scene.uniforms.time = elapsed;

    if let Some(sample) = sample {
        let e = energy(sample);
        scene.energy = e;
        scene.uniforms.frequency = e;
        scene.particle_field.scale = energy_factor(e);
    }

    scene.particle_sphere.rotation.y += SPHERE_SPIN_PER_FRAME;
    scene.noise_mesh.rotation.x += NOISE_MESH_SPIN_PER_FRAME;
    scene.noise_mesh.rotation.y += NOISE_MESH_SPIN_PER_FRAME;
    scene.particle_field.rotation.y += FIELD_DRIFT_PER_FRAME;

    scene.camera.follow_orbit(elapsed, energy_factor(scene.energy));
}

/// Drives the scene from a clock, an optional spectrum source and an
/// optional renderer. The host calls [`FrameDriver::tick`] once per display
/// frame.
pub struct FrameDriver<C: Clock = InstantClock> {
    clock: C,
    frame: u64,
    sample: Vec<u8>,
    render_failures: u64,
}

impl FrameDriver<InstantClock> {
    pub fn new() -> Self {
        Self::with_clock(InstantClock::new())
    }
}

impl Default for FrameDriver<InstantClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrameDriver<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            frame: 0,
            sample: Vec::new(),
            render_failures: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn render_failures(&self) -> u64 {
        self.render_failures
    }

    /// Last spectrum read from the source.
    pub fn sample(&self) -> &[u8] {
        &self.sample
    }

    pub fn tick<R: SceneRenderer>(
        &mut self,
        scene: &mut SceneState,
        source: Option<&mut dyn FrequencySource>,
        renderer: Option<&mut R>,
    ) -> FrameReport {
        let elapsed = self.clock.now_sec() as f32;

        let fresh = match source {
            Some(src) => src.frequency_data(&mut self.sample),
            None => false,
        };
        let sample = if fresh {
            Some(self.sample.as_slice())
        } else {
            None
        };
        advance_scene(scene, elapsed, sample);

        let rendered = match renderer {
            Some(r) => match r.render(scene) {
                Ok(()) => true,
                Err(e) => {
                    self.render_failures += 1;
                    log::warn!("frame {} render failed: {:?}", self.frame, e);
                    false
                }
            },
            None => false,
        };

        let report = FrameReport {
            frame: self.frame,
            elapsed,
            energy: scene.energy,
            rendered,
        };
        self.frame += 1;
        report
    }
}

/// Renderer that draws nothing; for hosts without a GPU surface yet.
pub struct NullRenderer;

impl SceneRenderer for NullRenderer {
    type Error = std::convert::Infallible;

    fn render(&mut self, _scene: &SceneState) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::VisualParams;

    #[test]
    fn advance_without_sample_keeps_energy() {
        let mut scene = SceneState::new(&VisualParams::defaults("x"), 1.0);
        advance_scene(&mut scene, 1.0, Some(&[100, 100]));
        advance_scene(&mut scene, 2.0, None);
        assert_eq!(scene.energy, 100.0);
        assert_eq!(scene.uniforms.time, 2.0);
        assert!((scene.particle_field.scale - 1.2).abs() < 1e-6);
    }

    #[test]
    fn rotations_accumulate_per_frame() {
        let mut scene = SceneState::new(&VisualParams::defaults("x"), 1.0);
        for i in 0..10 {
            advance_scene(&mut scene, i as f32, None);
        }
        assert!((scene.particle_sphere.rotation.y - 0.05).abs() < 1e-6);
        assert!((scene.noise_mesh.rotation.x - 0.05).abs() < 1e-6);
        assert!((scene.noise_mesh.rotation.y - 0.05).abs() < 1e-6);
        assert!((scene.particle_field.rotation.y - 0.005).abs() < 1e-6);
        assert_eq!(scene.particle_field.scale, 1.0);
    }

    #[test]
    fn empty_sample_means_zero_energy() {
        let mut scene = SceneState::new(&VisualParams::defaults("x"), 1.0);
        advance_scene(&mut scene, 0.0, Some(&[200]));
        advance_scene(&mut scene, 0.0, Some(&[]));
        assert_eq!(scene.energy, 0.0);
        assert!((scene.camera.eye.x - 30.0).abs() < 1e-4);
    }
}
