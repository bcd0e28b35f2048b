// Shared fakes: a synthetic transport clock, a recording output, a scripted
// analyser and a renderer that can be told to fail.

#![allow(dead_code)]

use nebula_core::{AudioOutput, Clock, FrequencySource, SceneRenderer, SceneState, Track};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct FakeClock(pub Rc<Cell<f64>>);

impl FakeClock {
    pub fn set(&self, t: f64) {
        self.0.set(t);
    }
    pub fn advance(&self, dt: f64) {
        self.0.set(self.0.get() + dt);
    }
}

impl Clock for FakeClock {
    fn now_sec(&self) -> f64 {
        self.0.get()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FakeTrack {
    pub name: String,
    pub duration: f64,
}

impl FakeTrack {
    pub fn new(name: &str, duration: f64) -> Self {
        Self {
            name: name.to_string(),
            duration,
        }
    }
}

impl Track for FakeTrack {
    fn duration_sec(&self) -> f64 {
        self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    SetTrack(String),
    Start(f64),
    Stop,
}

pub struct FakeOutput {
    pub clock: FakeClock,
    pub calls: Vec<OutputCall>,
    pub volume: f32,
    pub playing: bool,
}

impl FakeOutput {
    pub fn new(clock: FakeClock) -> Self {
        Self {
            clock,
            calls: Vec::new(),
            volume: 1.0,
            playing: false,
        }
    }

    pub fn starts(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                OutputCall::Start(o) => Some(*o),
                _ => None,
            })
            .collect()
    }
}

impl AudioOutput for FakeOutput {
    type Track = FakeTrack;

    fn clock_sec(&self) -> f64 {
        self.clock.now_sec()
    }

    fn set_track(&mut self, track: FakeTrack) {
        self.calls.push(OutputCall::SetTrack(track.name));
    }

    fn start(&mut self, offset_sec: f64) {
        assert!(!self.playing, "start while already playing");
        self.playing = true;
        self.calls.push(OutputCall::Start(offset_sec));
    }

    fn stop(&mut self) {
        self.playing = false;
        self.calls.push(OutputCall::Stop);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

/// Returns each scripted spectrum once, then reports no data.
#[derive(Default)]
pub struct ScriptedAnalyser {
    pub frames: Vec<Vec<u8>>,
}

impl FrequencySource for ScriptedAnalyser {
    fn frequency_data(&mut self, out: &mut Vec<u8>) -> bool {
        if self.frames.is_empty() {
            return false;
        }
        let next = self.frames.remove(0);
        out.clear();
        out.extend_from_slice(&next);
        true
    }
}

#[derive(Default)]
pub struct FlakyRenderer {
    pub fail: bool,
    pub drawn: usize,
    pub last_time: f32,
}

impl SceneRenderer for FlakyRenderer {
    type Error = &'static str;

    fn render(&mut self, scene: &SceneState) -> Result<(), Self::Error> {
        if self.fail {
            return Err("surface lost");
        }
        self.drawn += 1;
        self.last_time = scene.uniforms.time;
        Ok(())
    }
}
