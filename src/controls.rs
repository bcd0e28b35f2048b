// Pure helpers behind the DOM control panel. No web-sys here so the host
// test suite can include this file directly.

use crate::constants::{PAUSE_LABEL, PLAY_LABEL};
use nebula_core::ParamSpec;

/// Seek slider value (0..=100) to a normalized position.
#[inline]
pub fn slider_to_fraction(value: f64, slider_max: f64) -> f64 {
    if !value.is_finite() || slider_max <= 0.0 {
        return 0.0;
    }
    (value / slider_max).clamp(0.0, 1.0)
}

/// Normalized position to a seek slider value.
#[inline]
pub fn fraction_to_slider(fraction: f64, slider_max: f64) -> f64 {
    if !fraction.is_finite() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0) * slider_max
}

/// Decimal places implied by a slider step (0.01 -> 2, 0.1 -> 1).
pub fn decimals_for_step(step: f32) -> usize {
    let mut decimals = 0;
    let mut s = step.abs();
    while decimals < 4 && s > 0.0 && (s - s.round()).abs() > 1e-4 {
        s *= 10.0;
        decimals += 1;
    }
    decimals
}

pub fn format_value(spec: &ParamSpec, value: f32) -> String {
    format!("{:.*}", decimals_for_step(spec.step), value)
}

/// Parse an `<input type=range>` value; anything unparsable is ignored.
pub fn parse_slider(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

#[inline]
pub fn play_button_label(is_playing: bool) -> &'static str {
    if is_playing {
        PAUSE_LABEL
    } else {
        PLAY_LABEL
    }
}

pub fn param_input_id(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

/// What a key press on the page asks for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    TogglePlay,
    SeekBy(f64),
}

/// Page-level shortcut for a keydown. Keys aimed at a form input (text or
/// slider) belong to that input, so they never reach the transport.
pub fn page_key_action(key: &str, target_is_input: bool, seek_step: f64) -> Option<KeyAction> {
    if target_is_input {
        return None;
    }
    key_action(key, seek_step)
}

pub fn key_action(key: &str, seek_step: f64) -> Option<KeyAction> {
    match key {
        " " | "Spacebar" => Some(KeyAction::TogglePlay),
        "ArrowLeft" => Some(KeyAction::SeekBy(-seek_step)),
        "ArrowRight" => Some(KeyAction::SeekBy(seek_step)),
        _ => None,
    }
}
