use crate::audio::{self, DecodedTrack, WebAnalyser, WebAudioOutput};
use crate::panel::Panel;
use nebula_core::{
    Clock, InstantClock, LoadOutcome, LoadResult, LoadTicket, TransportState, Visualizer,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Everything the DOM handlers and the frame loop share.
pub struct WebApp {
    pub vis: Visualizer<WebAudioOutput>,
    pub analyser: WebAnalyser,
    pub panel: Option<Panel>,
    pub wall: InstantClock,
}

pub type SharedApp = Rc<RefCell<WebApp>>;

impl WebApp {
    pub fn new(vis: Visualizer<WebAudioOutput>) -> Self {
        let analyser = vis.transport.output().analyser();
        Self {
            vis,
            analyser,
            panel: None,
            wall: InstantClock::new(),
        }
    }

    pub fn toggle_play_pause(&mut self) -> Option<TransportState> {
        self.vis.transport.output().resume();
        let state = self.vis.toggle_play_pause(self.wall.now_sec());
        self.refresh_transport_ui();
        state
    }

    pub fn refresh_transport_ui(&self) {
        if let Some(panel) = &self.panel {
            panel.set_playing(self.vis.transport.is_playing());
            panel.set_file_name(&self.vis.params.file_name);
            panel.set_seek(self.vis.poll_position());
        }
    }

    fn context(&self) -> web::AudioContext {
        self.vis.transport.output().context().clone()
    }
}

pub fn load_default(app: &SharedApp) {
    let (request, ctx) = {
        let mut a = app.borrow_mut();
        (a.vis.begin_default_load(), a.context())
    };
    let app = app.clone();
    spawn_local(async move {
        let result = audio::fetch_track(&ctx, &request.name).await;
        complete_load(&app, request.ticket, result);
    });
}

pub fn load_file(app: &SharedApp, file: web::File) {
    let (ticket, ctx) = {
        let mut a = app.borrow_mut();
        (a.vis.begin_load(file.name()), a.context())
    };
    log::info!("loading {}", file.name());
    let app = app.clone();
    spawn_local(async move {
        let result = audio::read_file(&ctx, &file).await;
        complete_load(&app, ticket, result);
    });
}

fn complete_load(app: &SharedApp, ticket: LoadTicket, result: LoadResult<DecodedTrack>) {
    let outcome = app.borrow_mut().vis.finish_load(ticket, result);
    match outcome {
        LoadOutcome::Applied | LoadOutcome::Stale => {}
        LoadOutcome::FellBack { retry, .. } => {
            let ctx = app.borrow().context();
            let app_retry = app.clone();
            spawn_local(async move {
                let result = audio::fetch_track(&ctx, &retry.name).await;
                complete_load(&app_retry, retry.ticket, result);
            });
        }
        LoadOutcome::DefaultFailed(e) => {
            log::error!("default track unavailable: {}", e);
        }
    }
    app.borrow().refresh_transport_ui();
}
