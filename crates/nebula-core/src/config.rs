use crate::constants::{ANALYSER_FFT_SIZE, TOGGLE_COOLDOWN_SEC};

/// Startup configuration shared by the frontends.
///
/// `default_track` is whatever the frontend knows how to open: a URL relative
/// to the page on the web, a filesystem path natively.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerConfig {
    pub default_track: String,
    pub toggle_cooldown_sec: f64,
    pub autoplay_on_load: bool,
    pub analyser_fft_size: usize,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            default_track: "./music/bodies.mp3".to_string(),
            toggle_cooldown_sec: TOGGLE_COOLDOWN_SEC,
            autoplay_on_load: false,
            analyser_fft_size: ANALYSER_FFT_SIZE,
        }
    }
}

impl VisualizerConfig {
    pub fn with_default_track(mut self, track: impl Into<String>) -> Self {
        self.default_track = track.into();
        self
    }

    /// Display name of the default track (last path segment).
    pub fn default_track_name(&self) -> &str {
        display_name(&self.default_track)
    }
}

/// Last segment of a `/` or `\` separated path, or the whole string.
pub fn display_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_track_name_is_last_segment() {
        let cfg = VisualizerConfig::default();
        assert_eq!(cfg.default_track_name(), "bodies.mp3");
        let cfg = cfg.with_default_track(r"C:\music\intro.wav");
        assert_eq!(cfg.default_track_name(), "intro.wav");
        assert_eq!(display_name("plain.wav"), "plain.wav");
    }
}
