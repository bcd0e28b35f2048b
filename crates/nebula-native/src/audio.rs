// ---------------- Native audio (cpal) ----------------
//
// The stream runs for the whole session and writes silence while stopped, so
// the frame counter is a transport clock that never stalls.

use crate::analyser::SharedTap;
use crate::decode::WavTrack;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use nebula_core::AudioOutput;
use std::sync::{Arc, Mutex};

/// Player state shared with the audio callback.
struct Player {
    track: Option<WavTrack>,
    playing: bool,
    // fractional frame index into the track
    cursor: f64,
    // track frames per output frame
    step: f64,
    volume: f32,
    frames_rendered: u64,
}

impl Player {
    fn new(volume: f32) -> Self {
        Self {
            track: None,
            playing: false,
            cursor: 0.0,
            step: 1.0,
            volume,
            frames_rendered: 0,
        }
    }

    /// Fill one output frame and return its mono mix.
    fn next_frame(&mut self, frame: &mut [f32]) -> f32 {
        self.frames_rendered += 1;
        let track = match &self.track {
            Some(t) if self.playing && t.frames() > 0 => t,
            _ => {
                frame.fill(0.0);
                return 0.0;
            }
        };
        let frames = track.frames();
        let idx = (self.cursor as usize).min(frames - 1);
        let src = &track.samples[idx * track.channels..(idx + 1) * track.channels];
        for (c, out) in frame.iter_mut().enumerate() {
            *out = src[c.min(track.channels - 1)] * self.volume;
        }
        let mono = src.iter().sum::<f32>() / track.channels as f32 * self.volume;

        // looped playback
        self.cursor += self.step;
        if self.cursor >= frames as f64 {
            self.cursor %= frames as f64;
        }
        mono
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    player: Arc<Mutex<Player>>,
    tap: SharedTap,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels.max(1) as usize;
    let mut scratch = vec![0.0f32; channels];
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let Ok(mut player) = player.lock() else {
                data.fill(T::EQUILIBRIUM);
                return;
            };
            let mut tap = tap.lock().ok();
            for frame in data.chunks_mut(channels) {
                let mono = player.next_frame(&mut scratch);
                for (out, s) in frame.iter_mut().zip(&scratch) {
                    *out = T::from_sample(*s);
                }
                if let Some(tap) = tap.as_mut() {
                    tap.push(mono);
                }
            }
        },
        |err| log::error!("audio stream error: {err}"),
        None,
    )
}

pub struct CpalOutput {
    player: Arc<Mutex<Player>>,
    sample_rate: f64,
    volume: f32,
    _stream: cpal::Stream,
}

impl CpalOutput {
    /// Open the default output device and start the (silent) stream.
    pub fn new(tap: SharedTap) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("No audio output device"))?;
        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let player = Arc::new(Mutex::new(Player::new(1.0)));

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, player.clone(), tap)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, player.clone(), tap)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, player.clone(), tap)?,
            other => anyhow::bail!("unsupported sample format {other:?}"),
        };
        stream.play()?;
        log::info!(
            "audio output: {} ch @ {} Hz ({:?})",
            config.channels,
            config.sample_rate.0,
            sample_format
        );

        Ok(Self {
            player,
            sample_rate: config.sample_rate.0.max(1) as f64,
            volume: 1.0,
            _stream: stream,
        })
    }

    fn with_player(&self, f: impl FnOnce(&mut Player)) {
        match self.player.lock() {
            Ok(mut p) => f(&mut p),
            Err(_) => log::error!("audio player state poisoned"),
        }
    }
}

impl AudioOutput for CpalOutput {
    type Track = WavTrack;

    fn clock_sec(&self) -> f64 {
        self.player
            .lock()
            .map(|p| p.frames_rendered as f64 / self.sample_rate)
            .unwrap_or(0.0)
    }

    fn set_track(&mut self, track: WavTrack) {
        let step = track.sample_rate as f64 / self.sample_rate;
        self.with_player(|p| {
            p.track = Some(track);
            p.playing = false;
            p.cursor = 0.0;
            p.step = step;
        });
    }

    fn start(&mut self, offset_sec: f64) {
        self.with_player(|p| {
            let Some(track) = &p.track else {
                return;
            };
            let frames = track.frames().max(1) as f64;
            p.cursor = (offset_sec.max(0.0) * track.sample_rate as f64) % frames;
            p.playing = true;
        });
    }

    fn stop(&mut self) {
        self.with_player(|p| p.playing = false);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.with_player(|p| p.volume = volume);
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(samples: &[f32], channels: usize, rate: u32) -> WavTrack {
        WavTrack {
            samples: samples.into(),
            channels,
            sample_rate: rate,
        }
    }

    #[test]
    fn stopped_player_is_silent_but_clock_advances() {
        let mut p = Player::new(1.0);
        p.track = Some(track(&[0.5, 0.5], 1, 10));
        let mut frame = [1.0; 2];
        assert_eq!(p.next_frame(&mut frame), 0.0);
        assert_eq!(frame, [0.0, 0.0]);
        assert_eq!(p.frames_rendered, 1);
    }

    #[test]
    fn playing_loops_and_applies_volume() {
        let mut p = Player::new(0.5);
        p.track = Some(track(&[1.0, -1.0, 0.5, -0.5], 2, 10));
        p.playing = true;
        let mut frame = [0.0; 2];

        p.next_frame(&mut frame);
        assert_eq!(frame, [0.5, -0.5]);
        p.next_frame(&mut frame);
        assert_eq!(frame, [0.25, -0.25]);
        // wrapped to the first frame
        let mono = p.next_frame(&mut frame);
        assert_eq!(frame, [0.5, -0.5]);
        assert_eq!(mono, 0.0);
    }

    #[test]
    fn mono_track_fills_every_output_channel() {
        let mut p = Player::new(1.0);
        p.track = Some(track(&[0.25], 1, 10));
        p.playing = true;
        let mut frame = [0.0; 2];
        assert_eq!(p.next_frame(&mut frame), 0.25);
        assert_eq!(frame, [0.25, 0.25]);
    }
}
