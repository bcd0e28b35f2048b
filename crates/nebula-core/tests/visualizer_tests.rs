// Parameter store, reset and frame loop behaviour through `Visualizer`.

mod common;

use common::{FakeClock, FakeOutput, FakeTrack, FlakyRenderer, ScriptedAnalyser};
use nebula_core::{
    FrameDriver, FrequencySource, NullRenderer, Param, SceneState, VisualParams, Visualizer,
    VisualizerConfig,
};

fn visualizer() -> (Visualizer<FakeOutput>, FakeClock) {
    let clock = FakeClock::default();
    let vis = Visualizer::new(
        FakeOutput::new(clock.clone()),
        &VisualizerConfig::default(),
        16.0 / 9.0,
    );
    (vis, clock)
}

#[test]
fn initial_volume_reaches_output() {
    let (vis, _) = visualizer();
    assert_eq!(vis.transport.volume(), 0.5);
    assert_eq!(vis.params.file_name, "bodies.mp3");
}

#[test]
fn set_param_projects_immediately() {
    let (mut vis, _) = visualizer();
    vis.set_param(Param::Red, 0.9);
    assert_eq!(vis.scene.uniforms.red, 0.9);
    assert_eq!(vis.scene.particle_color[0], 0.9);

    vis.set_param(Param::BloomRadius, 0.4);
    assert_eq!(vis.scene.bloom.radius, 0.4);

    assert_eq!(vis.set_param(Param::DisplacementScale, 25.0), 10.0);
    assert_eq!(vis.scene.uniforms.displacement_scale, 10.0);

    vis.set_param(Param::Volume, 0.25);
    assert_eq!(vis.transport.volume(), 0.25);
}

#[test]
fn nudge_moves_by_control_step() {
    let (mut vis, _) = visualizer();
    let v = vis.nudge_param(Param::NoiseScale, 2);
    assert!((v - 1.7).abs() < 1e-5);
    let v = vis.nudge_param(Param::Volume, -100);
    assert_eq!(v, 0.0);
}

#[test]
fn reset_restores_every_default_and_projection() {
    let (mut vis, _) = visualizer();
    let ticket = vis.begin_load("mine.wav");
    vis.finish_load(ticket, Ok(FakeTrack::new("mine.wav", 10.0)));

    for param in Param::ALL {
        let s = param.spec();
        vis.set_param(param, s.max);
    }
    vis.reset();

    let expected = VisualParams::defaults("mine.wav");
    assert_eq!(vis.params, expected);
    let projected = SceneState::new(&expected, vis.scene.camera.aspect);
    assert_eq!(vis.scene.uniforms, projected.uniforms);
    assert_eq!(vis.scene.bloom, projected.bloom);
    assert_eq!(vis.scene.particle_color, projected.particle_color);
    assert_eq!(vis.transport.volume(), 0.5);
}

#[test]
fn load_updates_file_name_and_resize_updates_aspect() {
    let (mut vis, _) = visualizer();
    let ticket = vis.begin_load("dir/track.wav");
    vis.finish_load(ticket, Ok(FakeTrack::new("track.wav", 3.0)));
    assert_eq!(vis.params.file_name, "track.wav");

    vis.resize(1000, 500);
    assert_eq!(vis.scene.camera.aspect, 2.0);
    vis.resize(0, 0);
    assert_eq!(vis.scene.camera.aspect, 2.0);
}

#[test]
fn frame_tick_uses_spectrum_energy() {
    let (mut vis, _) = visualizer();
    let frame_clock = FakeClock::default();
    let mut driver = FrameDriver::with_clock(frame_clock.clone());
    let mut analyser = ScriptedAnalyser {
        frames: vec![vec![250; 128]],
    };
    let mut renderer = FlakyRenderer::default();

    frame_clock.set(2.0);
    let report = driver.tick(
        &mut vis.scene,
        Some(&mut analyser as &mut dyn FrequencySource),
        Some(&mut renderer),
    );
    assert_eq!(report.frame, 0);
    assert_eq!(report.energy, 250.0);
    assert!(report.rendered);
    assert_eq!(vis.scene.uniforms.frequency, 250.0);
    assert!((vis.scene.particle_field.scale - 1.5).abs() < 1e-6);
    assert!((vis.scene.camera.eye.length() - 45.0).abs() < 1e-3);
    assert_eq!(renderer.last_time, 2.0);

    // analyser has nothing new: energy holds
    let report = driver.tick(
        &mut vis.scene,
        Some(&mut analyser as &mut dyn FrequencySource),
        Some(&mut renderer),
    );
    assert_eq!(report.energy, 250.0);
    assert_eq!(driver.sample().len(), 128);
}

#[test]
fn frame_loop_survives_render_failures() {
    let (mut vis, _) = visualizer();
    let clock = FakeClock::default();
    let mut driver = FrameDriver::with_clock(clock.clone());
    let mut renderer = FlakyRenderer {
        fail: true,
        ..Default::default()
    };
    for _ in 0..3 {
        clock.advance(1.0 / 60.0);
        let report = driver.tick(&mut vis.scene, None, Some(&mut renderer));
        assert!(!report.rendered);
    }
    renderer.fail = false;
    let report = driver.tick(&mut vis.scene, None, Some(&mut renderer));
    assert!(report.rendered);
    assert_eq!(report.frame, 3);
    assert_eq!(driver.render_failures(), 3);
    assert_eq!(renderer.drawn, 1);
}

#[test]
fn frames_without_source_or_renderer_still_animate() {
    let (mut vis, _) = visualizer();
    let mut driver = FrameDriver::with_clock(FakeClock::default());
    for _ in 0..4 {
        driver.tick::<NullRenderer>(&mut vis.scene, None, None);
    }
    assert!((vis.scene.particle_sphere.rotation.y - 0.02).abs() < 1e-6);
    assert_eq!(vis.scene.energy, 0.0);
    assert_eq!(driver.frame(), 4);
}
