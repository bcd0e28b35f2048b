use crate::app::SharedApp;
use nebula_core::{FrameDriver, FrequencySource};
use nebula_render::GpuState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub app: SharedApp,
    pub gpu: Option<GpuState<'static>>,
    pub driver: FrameDriver,
    pub canvas: web::HtmlCanvasElement,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let mut guard = self.app.borrow_mut();
        let app = &mut *guard;

        let w = self.canvas.width();
        let h = self.canvas.height();
        app.vis.resize(w, h);
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(w, h);
        }

        // Analyse only once something is loaded
        let source: Option<&mut dyn FrequencySource> = if app.vis.transport.has_track() {
            Some(&mut app.analyser)
        } else {
            None
        };
        let report = self.driver.tick(&mut app.vis.scene, source, self.gpu.as_mut());
        if report.frame % 600 == 0 {
            log::debug!(
                "frame {} energy {:.1} render failures {}",
                report.frame,
                report.energy,
                self.driver.render_failures()
            );
        }

        if let Some(panel) = &app.panel {
            panel.set_seek(app.vis.poll_position());
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<GpuState<'static>> {
    let instance = wgpu::Instance::default();
    let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
        Ok(s) => s,
        Err(e) => {
            log::error!("WebGPU surface error: {:?}", e);
            return None;
        }
    };
    match GpuState::new(&instance, surface, canvas.width(), canvas.height()).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
