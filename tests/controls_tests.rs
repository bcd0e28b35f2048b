// Host-side tests for the control panel helpers.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod controls {
    include!("../src/controls.rs");
}

use constants::*;
use controls::*;
use nebula_core::Param;

#[test]
fn seek_slider_maps_to_fraction_and_back() {
    assert_eq!(slider_to_fraction(0.0, SEEK_SLIDER_MAX), 0.0);
    assert_eq!(slider_to_fraction(50.0, SEEK_SLIDER_MAX), 0.5);
    assert_eq!(slider_to_fraction(100.0, SEEK_SLIDER_MAX), 1.0);
    assert_eq!(fraction_to_slider(0.25, SEEK_SLIDER_MAX), 25.0);
}

#[test]
fn seek_slider_clamps_out_of_range_and_garbage() {
    assert_eq!(slider_to_fraction(150.0, SEEK_SLIDER_MAX), 1.0);
    assert_eq!(slider_to_fraction(-3.0, SEEK_SLIDER_MAX), 0.0);
    assert_eq!(slider_to_fraction(f64::NAN, SEEK_SLIDER_MAX), 0.0);
    assert_eq!(slider_to_fraction(10.0, 0.0), 0.0);
    assert_eq!(fraction_to_slider(2.0, SEEK_SLIDER_MAX), SEEK_SLIDER_MAX);
    assert_eq!(fraction_to_slider(f64::INFINITY, SEEK_SLIDER_MAX), 0.0);
}

#[test]
fn readouts_use_step_precision() {
    assert_eq!(decimals_for_step(1.0), 0);
    assert_eq!(decimals_for_step(0.1), 1);
    assert_eq!(decimals_for_step(0.01), 2);

    assert_eq!(format_value(&Param::BloomStrength.spec(), 0.7), "0.70");
    assert_eq!(format_value(&Param::NoiseScale.spec(), 1.5), "1.5");
    assert_eq!(format_value(&Param::DisplacementScale.spec(), 3.0), "3.0");
}

#[test]
fn slider_values_parse_leniently() {
    assert_eq!(parse_slider("0.42"), Some(0.42));
    assert_eq!(parse_slider(" 3 "), Some(3.0));
    assert_eq!(parse_slider(""), None);
    assert_eq!(parse_slider("abc"), None);
    assert_eq!(parse_slider("NaN"), None);
}

#[test]
fn play_button_shows_the_next_action() {
    assert_eq!(play_button_label(false), PLAY_LABEL);
    assert_eq!(play_button_label(true), PAUSE_LABEL);
}

#[test]
fn param_inputs_get_unique_ids() {
    let mut ids: Vec<String> = Param::ALL
        .iter()
        .map(|p| param_input_id(PARAM_INPUT_PREFIX, p.spec().key))
        .collect();
    assert_eq!(ids[0], "param-red");
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), Param::ALL.len());
}

#[test]
fn keys_map_to_transport_actions() {
    assert_eq!(key_action(" ", KEY_SEEK_STEP), Some(KeyAction::TogglePlay));
    assert_eq!(
        key_action("ArrowLeft", KEY_SEEK_STEP),
        Some(KeyAction::SeekBy(-KEY_SEEK_STEP))
    );
    assert_eq!(
        key_action("ArrowRight", KEY_SEEK_STEP),
        Some(KeyAction::SeekBy(KEY_SEEK_STEP))
    );
    assert_eq!(key_action("a", KEY_SEEK_STEP), None);
}

#[test]
fn focused_inputs_keep_their_keys() {
    // arrows on a focused slider move that slider only
    assert_eq!(page_key_action("ArrowLeft", true, KEY_SEEK_STEP), None);
    assert_eq!(page_key_action("ArrowRight", true, KEY_SEEK_STEP), None);
    assert_eq!(page_key_action(" ", true, KEY_SEEK_STEP), None);
    assert_eq!(
        page_key_action("ArrowRight", false, KEY_SEEK_STEP),
        Some(KeyAction::SeekBy(KEY_SEEK_STEP))
    );
    assert_eq!(
        page_key_action(" ", false, KEY_SEEK_STEP),
        Some(KeyAction::TogglePlay)
    );
}
