//! The visualizer's shared state: parameters, scene and transport together.

use crate::config::VisualizerConfig;
use crate::error::LoadError;
use crate::host::AudioOutput;
use crate::params::{Param, VisualParams};
use crate::scene::SceneState;
use crate::transport::{LoadOutcome, LoadRequest, LoadTicket, Transport, TransportState};

/// Owns everything the control surface and the frame loop touch.
pub struct Visualizer<O: AudioOutput> {
    pub params: VisualParams,
    pub scene: SceneState,
    pub transport: Transport<O>,
}

impl<O: AudioOutput> Visualizer<O> {
    pub fn new(output: O, config: &VisualizerConfig, aspect: f32) -> Self {
        let params = VisualParams::defaults(config.default_track_name());
        let scene = SceneState::new(&params, aspect);
        let mut transport = Transport::new(output, config);
        transport.set_volume(params.volume);
        Self {
            params,
            scene,
            transport,
        }
    }

    /// Clamp, store and project one parameter. Returns the applied value.
    pub fn set_param(&mut self, param: Param, value: f32) -> f32 {
        let v = self.params.set(param, value);
        match param {
            Param::Volume => {
                self.transport.set_volume(v);
            }
            _ => self.scene.apply_param(param, &self.params),
        }
        v
    }

    /// Move a parameter by `steps` control steps.
    pub fn nudge_param(&mut self, param: Param, steps: i32) -> f32 {
        let current = self.params.get(param);
        self.set_param(param, current + param.spec().step * steps as f32)
    }

    /// Restore every parameter default. The loaded file name is kept.
    pub fn reset(&mut self) {
        let name = std::mem::take(&mut self.params.file_name);
        self.params = VisualParams::defaults(name);
        self.scene.apply_all(&self.params);
        self.transport.set_volume(self.params.volume);
        log::info!("parameters reset");
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.camera.set_viewport(width, height);
    }

    pub fn begin_load(&mut self, name: impl Into<String>) -> LoadTicket {
        self.transport.begin_load(name)
    }

    pub fn begin_default_load(&mut self) -> LoadRequest {
        self.transport.begin_default_load()
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<O::Track, LoadError>,
    ) -> LoadOutcome {
        let outcome = self.transport.finish_load(ticket, result);
        if !matches!(outcome, LoadOutcome::Stale) {
            self.params.file_name = self.transport.file_name().to_string();
        }
        outcome
    }

    pub fn toggle_play_pause(&mut self, wall_now_sec: f64) -> Option<TransportState> {
        self.transport.toggle_play_pause(wall_now_sec)
    }

    pub fn seek(&mut self, normalized: f64) {
        self.transport.seek(normalized);
    }

    pub fn poll_position(&self) -> f64 {
        self.transport.poll_position()
    }
}
