#![cfg(target_arch = "wasm32")]
use nebula_core::{FrameDriver, Visualizer, VisualizerConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod audio;
mod constants;
mod controls;
mod dom;
mod frame;
mod panel;

use constants::CANVAS_ID;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("nebula-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
    wire_canvas_resize(&canvas);

    let config = VisualizerConfig::default();
    let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let output = audio::WebAudioOutput::new(ctx, config.analyser_fft_size as u32)?;
    let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;
    let vis = Visualizer::new(output, &config, aspect);

    let panel = panel::Panel::build(&document, &vis.params)?;
    let shared = Rc::new(RefCell::new(app::WebApp::new(vis)));
    panel.wire(&shared);
    shared.borrow_mut().panel = Some(panel);
    panel::wire_keyboard(&shared);

    app::load_default(&shared);

    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_none() {
        log::warn!("continuing without a renderer");
    }
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        app: shared,
        gpu,
        driver: FrameDriver::new(),
        canvas,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
