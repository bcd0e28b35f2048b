use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::Key,
    window::{Window, WindowBuilder},
};

use nebula_core::{
    Clock, FrameDriver, FrequencySource, InstantClock, LoadOutcome, LoadResult, LoadTicket,
    Visualizer, VisualizerConfig,
};
use nebula_render::GpuState;

mod analyser;
mod audio;
mod decode;
mod keys;

use analyser::{FftAnalyser, Tap};
use audio::CpalOutput;
use decode::WavTrack;

const DEFAULT_TRACK: &str = "assets/bodies.wav";
const TRACK_ENV: &str = "NEBULA_TRACK";

type Decoded = (LoadTicket, LoadResult<WavTrack>);

/// Decode off the event-loop thread; the result comes back over `tx`.
fn spawn_decode(tx: &mpsc::Sender<Decoded>, ticket: LoadTicket, path: PathBuf) {
    let tx = tx.clone();
    let spawned = thread::Builder::new()
        .name("wav-decode".into())
        .spawn(move || {
            let result = decode::decode_wav(&path);
            _ = tx.send((ticket, result));
        });
    if let Err(e) = spawned {
        log::error!("could not start decode thread: {e}");
    }
}

struct App {
    window: Arc<Window>,
    gpu: GpuState<'static>,
    vis: Visualizer<CpalOutput>,
    analyser: FftAnalyser,
    driver: FrameDriver,
    controls: keys::Controls,
    wall: InstantClock,
    decoded_tx: mpsc::Sender<Decoded>,
}

impl App {
    fn load_default(&mut self) {
        let request = self.vis.begin_default_load();
        spawn_decode(&self.decoded_tx, request.ticket, PathBuf::from(request.name));
    }

    fn load_path(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::info!("loading {}", path.display());
        let ticket = self.vis.begin_load(name);
        spawn_decode(&self.decoded_tx, ticket, path);
    }

    fn drain_decoded(&mut self, rx: &mpsc::Receiver<Decoded>) {
        while let Ok((ticket, result)) = rx.try_recv() {
            match self.vis.finish_load(ticket, result) {
                LoadOutcome::Applied | LoadOutcome::Stale => {}
                LoadOutcome::FellBack { retry, .. } => {
                    spawn_decode(&self.decoded_tx, retry.ticket, PathBuf::from(retry.name));
                }
                LoadOutcome::DefaultFailed(e) => {
                    log::error!("default track unavailable: {e}");
                }
            }
            self.refresh_title();
        }
    }

    fn refresh_title(&self) {
        let state = if self.vis.transport.is_playing() {
            "playing"
        } else {
            "paused"
        };
        self.window.set_title(&format!(
            "nebula - {} [{}]",
            self.vis.params.file_name, state
        ));
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.resize_if_needed(width, height);
        self.vis.resize(width, height);
    }

    /// Returns `false` when the key asks to quit.
    fn on_key(&mut self, key: &Key) -> bool {
        let Some(command) = keys::command_for(key) else {
            return true;
        };
        let running = self
            .controls
            .apply(command, &mut self.vis, self.wall.now_sec());
        self.refresh_title();
        running
    }

    fn redraw(&mut self) {
        let source: Option<&mut dyn FrequencySource> = if self.vis.transport.has_track() {
            Some(&mut self.analyser)
        } else {
            None
        };
        let report = self
            .driver
            .tick(&mut self.vis.scene, source, Some(&mut self.gpu));
        if report.frame % 600 == 0 {
            log::debug!(
                "frame {} energy {:.1} position {:.3}",
                report.frame,
                report.energy,
                self.vis.poll_position()
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let track = std::env::var(TRACK_ENV).unwrap_or_else(|_| DEFAULT_TRACK.to_string());
    let config = VisualizerConfig::default().with_default_track(track);

    let tap = Tap::shared(config.analyser_fft_size);
    let output = CpalOutput::new(tap.clone())?;
    let analyser = FftAnalyser::new(config.analyser_fft_size, tap);

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("nebula")
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)?,
    );
    let size = window.inner_size();
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone())?;
    let gpu = pollster::block_on(GpuState::new(&instance, surface, size.width, size.height))?;

    let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
    let (decoded_tx, decoded_rx) = mpsc::channel();
    let mut app = App {
        window,
        gpu,
        vis: Visualizer::new(output, &config, aspect),
        analyser,
        driver: FrameDriver::new(),
        controls: keys::Controls::default(),
        wall: InstantClock::new(),
        decoded_tx,
    };
    app.load_default();
    app.refresh_title();
    log::info!("space play/pause, arrows seek/volume, [ ] select, - = adjust, r reset, esc quit");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => app.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if !app.on_key(&logical_key) {
                    elwt.exit();
                }
            }
            WindowEvent::DroppedFile(path) => app.load_path(path),
            WindowEvent::RedrawRequested => app.redraw(),
            _ => {}
        },
        Event::AboutToWait => {
            app.drain_decoded(&decoded_rx);
            app.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
