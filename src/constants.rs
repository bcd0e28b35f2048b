// Element ids and control-surface tuning for the web front-end.

pub const CANVAS_ID: &str = "app-canvas";
pub const PANEL_ID: &str = "controls";

// Created by the panel at startup
pub const FILE_NAME_ID: &str = "file-name";
pub const FILE_INPUT_ID: &str = "audio-file";
pub const UPLOAD_BUTTON_ID: &str = "upload-audio";
pub const RESET_BUTTON_ID: &str = "reset-all";
pub const PLAY_BUTTON_ID: &str = "play-pause";
pub const SEEK_SLIDER_ID: &str = "seek";
pub const PARAM_INPUT_PREFIX: &str = "param-";

// Seek slider runs 0..=100 in whole steps
pub const SEEK_SLIDER_MAX: f64 = 100.0;

// Keyboard seek step as a fraction of the track
pub const KEY_SEEK_STEP: f64 = 0.05;

pub const PLAY_LABEL: &str = "Play";
pub const PAUSE_LABEL: &str = "Pause";
pub const UPLOAD_LABEL: &str = "Upload Audio";
pub const RESET_LABEL: &str = "Reset All";
