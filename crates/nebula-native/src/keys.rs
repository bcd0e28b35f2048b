//! Keyboard control surface for the desktop window.

use nebula_core::{AudioOutput, Param, Visualizer};
use winit::keyboard::{Key, NamedKey};

pub const SEEK_STEP: f64 = 0.05;
pub const VOLUME_STEP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    TogglePlay,
    SeekBy(f64),
    VolumeBy(f32),
    SelectPrev,
    SelectNext,
    Nudge(i32),
    Reset,
    Quit,
}

pub fn command_for(key: &Key) -> Option<Command> {
    match key {
        Key::Named(NamedKey::Space) => Some(Command::TogglePlay),
        Key::Named(NamedKey::ArrowLeft) => Some(Command::SeekBy(-SEEK_STEP)),
        Key::Named(NamedKey::ArrowRight) => Some(Command::SeekBy(SEEK_STEP)),
        Key::Named(NamedKey::ArrowUp) => Some(Command::VolumeBy(VOLUME_STEP)),
        Key::Named(NamedKey::ArrowDown) => Some(Command::VolumeBy(-VOLUME_STEP)),
        Key::Named(NamedKey::Escape) => Some(Command::Quit),
        Key::Character(c) => match c.as_str() {
            "[" => Some(Command::SelectPrev),
            "]" => Some(Command::SelectNext),
            "-" => Some(Command::Nudge(-1)),
            "=" | "+" => Some(Command::Nudge(1)),
            "r" | "R" => Some(Command::Reset),
            _ => None,
        },
        _ => None,
    }
}

/// Which parameter `-`/`=` adjust.
#[derive(Debug, Default)]
pub struct Controls {
    selected: usize,
}

impl Controls {
    pub fn selected(&self) -> Param {
        Param::ALL[self.selected]
    }

    fn select(&mut self, delta: isize) {
        let n = Param::ALL.len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(n) as usize;
        log::info!("selected {}", self.selected().spec().label);
    }

    /// Apply one command. Returns `false` when the window should close.
    pub fn apply<O: AudioOutput>(
        &mut self,
        command: Command,
        vis: &mut Visualizer<O>,
        wall_now_sec: f64,
    ) -> bool {
        match command {
            Command::TogglePlay => {
                vis.toggle_play_pause(wall_now_sec);
            }
            Command::SeekBy(delta) => {
                let p = vis.poll_position() + delta;
                vis.seek(p);
            }
            Command::VolumeBy(delta) => {
                let v = vis.set_param(Param::Volume, vis.params.volume + delta);
                log::info!("volume {v:.2}");
            }
            Command::SelectPrev => self.select(-1),
            Command::SelectNext => self.select(1),
            Command::Nudge(steps) => {
                let param = self.selected();
                let v = vis.nudge_param(param, steps);
                log::info!("{} = {v:.2}", param.spec().label);
            }
            Command::Reset => vis.reset(),
            Command::Quit => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::{LoadOutcome, Track, VisualizerConfig};

    struct Tone(f64);

    impl Track for Tone {
        fn duration_sec(&self) -> f64 {
            self.0
        }
    }

    #[derive(Default)]
    struct Silent {
        volume: f32,
    }

    impl AudioOutput for Silent {
        type Track = Tone;
        fn clock_sec(&self) -> f64 {
            0.0
        }
        fn set_track(&mut self, _track: Tone) {}
        fn start(&mut self, _offset_sec: f64) {}
        fn stop(&mut self) {}
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
        fn volume(&self) -> f32 {
            self.volume
        }
    }

    fn vis() -> Visualizer<Silent> {
        Visualizer::new(Silent::default(), &VisualizerConfig::default(), 1.0)
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(
            command_for(&Key::Named(NamedKey::Space)),
            Some(Command::TogglePlay)
        );
        assert_eq!(
            command_for(&Key::Named(NamedKey::ArrowLeft)),
            Some(Command::SeekBy(-SEEK_STEP))
        );
        assert_eq!(
            command_for(&Key::Named(NamedKey::ArrowDown)),
            Some(Command::VolumeBy(-VOLUME_STEP))
        );
        assert_eq!(
            command_for(&Key::Character("]".into())),
            Some(Command::SelectNext)
        );
        assert_eq!(
            command_for(&Key::Character("R".into())),
            Some(Command::Reset)
        );
        assert_eq!(command_for(&Key::Character("q".into())), None);
        assert_eq!(command_for(&Key::Named(NamedKey::Tab)), None);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut c = Controls::default();
        assert_eq!(c.selected(), Param::Red);
        let mut v = vis();
        c.apply(Command::SelectPrev, &mut v, 0.0);
        assert_eq!(c.selected(), Param::Volume);
        c.apply(Command::SelectNext, &mut v, 0.0);
        c.apply(Command::SelectNext, &mut v, 0.0);
        assert_eq!(c.selected(), Param::Green);
    }

    #[test]
    fn nudge_and_reset_touch_the_selected_param() {
        let mut c = Controls::default();
        let mut v = vis();
        c.apply(Command::SelectNext, &mut v, 0.0);
        c.apply(Command::SelectNext, &mut v, 0.0);
        assert_eq!(c.selected(), Param::Blue);
        c.apply(Command::Nudge(1), &mut v, 0.0);
        assert!((v.params.blue - 0.51).abs() < 1e-6);
        assert!((v.scene.uniforms.blue - 0.51).abs() < 1e-6);

        c.apply(Command::Reset, &mut v, 0.0);
        assert_eq!(v.params.blue, Param::Blue.spec().default);
    }

    #[test]
    fn volume_keys_clamp_and_reach_the_output() {
        let mut c = Controls::default();
        let mut v = vis();
        for _ in 0..20 {
            c.apply(Command::VolumeBy(VOLUME_STEP), &mut v, 0.0);
        }
        assert_eq!(v.params.volume, 1.0);
        assert_eq!(v.transport.output().volume(), 1.0);
        c.apply(Command::VolumeBy(-VOLUME_STEP), &mut v, 0.0);
        assert!((v.transport.output().volume() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn seek_and_toggle_with_a_track() {
        let mut c = Controls::default();
        let mut v = vis();
        let req = v.begin_default_load();
        assert_eq!(v.finish_load(req.ticket, Ok(Tone(10.0))), LoadOutcome::Applied);

        c.apply(Command::SeekBy(SEEK_STEP), &mut v, 0.0);
        assert!((v.poll_position() - SEEK_STEP).abs() < 1e-9);
        c.apply(Command::SeekBy(-1.0), &mut v, 0.0);
        assert_eq!(v.poll_position(), 0.0);

        assert!(c.apply(Command::TogglePlay, &mut v, 1.0));
        assert!(v.transport.is_playing());
        assert!(!c.apply(Command::Quit, &mut v, 2.0));
    }
}
