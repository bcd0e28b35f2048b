//! Play/pause/seek/load state machine over an [`AudioOutput`].
//!
//! Positions are derived from the output's transport clock rather than
//! tracked incrementally: while playing, the position is
//! `(clock - transport_start_time) mod duration`; while stopped it is the
//! offset recorded at the last pause or seek.

use crate::config::VisualizerConfig;
use crate::error::LoadError;
use crate::host::{AudioOutput, Track};

/// Timing bookkeeping for the active track, all in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub transport_start_time: f64,
    pub last_known_offset: f64,
    pub buffer_duration: f64,
}

impl PlaybackState {
    pub fn position_at(&self, clock_now: f64) -> f64 {
        if self.buffer_duration <= 0.0 {
            return 0.0;
        }
        if self.is_playing {
            (clock_now - self.transport_start_time).rem_euclid(self.buffer_duration)
        } else {
            self.last_known_offset
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
}

/// Drops repeat triggers that arrive within `cooldown_sec` of the last
/// accepted one.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    cooldown_sec: f64,
    last: Option<f64>,
}

impl Debounce {
    pub fn new(cooldown_sec: f64) -> Self {
        Self {
            cooldown_sec: cooldown_sec.max(0.0),
            last: None,
        }
    }

    pub fn try_fire(&mut self, now_sec: f64) -> bool {
        if let Some(last) = self.last {
            if now_sec - last < self.cooldown_sec {
                return false;
            }
        }
        self.last = Some(now_sec);
        true
    }
}

/// Sequence number of a load request. Only the newest one may be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// A load the frontend has to fulfil (fetch + decode) and report back.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub name: String,
    pub is_default: bool,
}

#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    /// The track is now active.
    Applied,
    /// A newer request superseded this one; nothing changed.
    Stale,
    /// A user source failed. The frontend should fulfil `retry`.
    FellBack { error: LoadError, retry: LoadRequest },
    /// The default source itself failed; the transport stays stopped and empty.
    DefaultFailed(LoadError),
}

pub struct Transport<O: AudioOutput> {
    output: O,
    state: PlaybackState,
    has_track: bool,
    debounce: Debounce,
    next_seq: u64,
    pending: Option<LoadRequest>,
    file_name: String,
    default_track: String,
    autoplay_on_load: bool,
}

impl<O: AudioOutput> Transport<O> {
    pub fn new(output: O, config: &VisualizerConfig) -> Self {
        Self {
            output,
            state: PlaybackState::default(),
            has_track: false,
            debounce: Debounce::new(config.toggle_cooldown_sec),
            next_seq: 0,
            pending: None,
            file_name: config.default_track_name().to_string(),
            default_track: config.default_track.clone(),
            autoplay_on_load: config.autoplay_on_load,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn transport_state(&self) -> TransportState {
        if self.state.is_playing {
            TransportState::Playing
        } else {
            TransportState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn has_track(&self) -> bool {
        self.has_track
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// The request a completion must match to be applied.
    pub fn pending(&self) -> Option<&LoadRequest> {
        self.pending.as_ref()
    }

    fn issue(&mut self, name: String, is_default: bool) -> LoadRequest {
        self.next_seq += 1;
        let request = LoadRequest {
            ticket: LoadTicket(self.next_seq),
            name,
            is_default,
        };
        log::debug!(
            "load #{} requested: {}",
            request.ticket.seq(),
            request.name
        );
        self.pending = Some(request.clone());
        request
    }

    /// Start loading a user-supplied source. Supersedes any load in flight.
    pub fn begin_load(&mut self, name: impl Into<String>) -> LoadTicket {
        self.issue(name.into(), false).ticket
    }

    /// Start loading the bundled default track. `name` on the returned
    /// request is the path or URL to open.
    pub fn begin_default_load(&mut self) -> LoadRequest {
        self.issue(self.default_track.clone(), true)
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<O::Track, LoadError>,
    ) -> LoadOutcome {
        let request = match &self.pending {
            Some(req) if req.ticket == ticket => req.clone(),
            _ => {
                log::debug!("discarding stale load #{}", ticket.seq());
                return LoadOutcome::Stale;
            }
        };
        self.pending = None;

        let result = result.and_then(|track| {
            let duration = track.duration_sec();
            if duration.is_finite() && duration > 0.0 {
                Ok(track)
            } else {
                Err(LoadError::Empty {
                    name: request.name.clone(),
                })
            }
        });

        match result {
            Ok(track) => {
                self.stop_output();
                let duration = track.duration_sec();
                self.output.set_track(track);
                self.has_track = true;
                self.state = PlaybackState {
                    is_playing: false,
                    transport_start_time: 0.0,
                    last_known_offset: 0.0,
                    buffer_duration: duration,
                };
                self.file_name = crate::config::display_name(&request.name).to_string();
                log::info!("loaded {} ({:.1}s)", self.file_name, duration);
                if self.autoplay_on_load {
                    self.play();
                }
                LoadOutcome::Applied
            }
            Err(error) => {
                log::error!("{}", error);
                self.stop_output();
                self.has_track = false;
                self.state = PlaybackState::default();
                self.file_name = crate::config::display_name(&self.default_track).to_string();
                if request.is_default {
                    LoadOutcome::DefaultFailed(error)
                } else {
                    let retry = self.begin_default_load();
                    LoadOutcome::FellBack { error, retry }
                }
            }
        }
    }

    /// Flip between playing and stopped. Returns `None` when ignored:
    /// no track loaded, or within the cooldown of the previous toggle.
    pub fn toggle_play_pause(&mut self, wall_now_sec: f64) -> Option<TransportState> {
        if !self.has_track {
            return None;
        }
        if !self.debounce.try_fire(wall_now_sec) {
            log::debug!("toggle ignored (cooldown)");
            return None;
        }
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
        Some(self.transport_state())
    }

    fn play(&mut self) {
        let offset = self.state.last_known_offset;
        self.output.start(offset % self.state.buffer_duration);
        self.state.transport_start_time = self.output.clock_sec() - offset;
        self.state.is_playing = true;
        log::info!("play from {:.2}s", offset);
    }

    fn pause(&mut self) {
        let position = self.position_sec();
        self.output.stop();
        self.state.last_known_offset = position;
        self.state.is_playing = false;
        log::info!("pause at {:.2}s", position);
    }

    fn stop_output(&mut self) {
        if self.state.is_playing {
            self.output.stop();
            self.state.is_playing = false;
        }
    }

    /// Jump to `normalized` (clamped to 0..=1) of the track. The track loops,
    /// so the very end is the same point as the start.
    pub fn seek(&mut self, normalized: f64) {
        if !self.has_track {
            return;
        }
        let p = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        let duration = self.state.buffer_duration;
        let target = (p * duration) % duration;
        if self.state.is_playing {
            self.output.stop();
            self.output.start(target);
            self.state.transport_start_time = self.output.clock_sec() - target;
        }
        self.state.last_known_offset = target;
        log::debug!("seek to {:.2}s", target);
    }

    pub fn position_sec(&self) -> f64 {
        if !self.has_track {
            return 0.0;
        }
        self.state.position_at(self.output.clock_sec())
    }

    /// Position as a fraction of the duration; 0 without a track. Frozen at
    /// the last known offset while stopped.
    pub fn poll_position(&self) -> f64 {
        if !self.has_track || self.state.buffer_duration <= 0.0 {
            return 0.0;
        }
        (self.position_sec() / self.state.buffer_duration).clamp(0.0, 1.0)
    }

    pub fn duration_sec(&self) -> f64 {
        self.state.buffer_duration
    }

    /// Clamps to 0..=1, applies immediately and returns the applied value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let v = if volume.is_nan() {
            self.output.volume()
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.output.set_volume(v);
        v
    }

    pub fn volume(&self) -> f32 {
        self.output.volume()
    }
}
