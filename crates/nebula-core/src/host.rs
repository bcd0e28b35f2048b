//! Seams to the platform: clocks, audio output, spectrum analysis, rendering.
//!
//! The web and native frontends implement these on top of WebAudio/wgpu and
//! cpal/wgpu respectively; tests implement them with synthetic clocks.

use crate::scene::SceneState;

/// Monotonic time source in seconds.
pub trait Clock {
    fn now_sec(&self) -> f64;
}

/// Wall clock measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    start: instant::Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            start: instant::Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_sec(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_sec(&self) -> f64 {
        (**self).now_sec()
    }
}

/// A decoded, playable buffer.
pub trait Track {
    fn duration_sec(&self) -> f64;
}

/// Playback collaborator owning the transport clock.
///
/// The clock keeps running whether or not anything is playing, the way
/// `AudioContext.currentTime` does. `start` always plays the current track
/// looped from `offset_sec`; callers stop before restarting.
pub trait AudioOutput {
    type Track: Track;

    fn clock_sec(&self) -> f64;
    fn set_track(&mut self, track: Self::Track);
    fn start(&mut self, offset_sec: f64);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;
}

/// Byte spectrum provider (one 0..=255 magnitude per band).
pub trait FrequencySource {
    /// Fills `out` with the current spectrum. Returns `false` when no data is
    /// available, in which case `out` is left untouched.
    fn frequency_data(&mut self, out: &mut Vec<u8>) -> bool;
}

/// Draws one frame of the scene.
pub trait SceneRenderer {
    type Error: std::fmt::Debug;

    fn render(&mut self, scene: &SceneState) -> Result<(), Self::Error>;
}
