use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Create an element and cast it, logging when the DOM refuses.
pub fn create<T: JsCast>(document: &web::Document, tag: &str) -> anyhow::Result<T> {
    let el = document
        .create_element(tag)
        .map_err(|e| anyhow::anyhow!("create_element({tag}) failed: {:?}", e))?;
    el.dyn_into::<T>()
        .map_err(|_| anyhow::anyhow!("<{tag}> has an unexpected type"))
}

pub fn append(parent: &web::Node, child: &web::Node) {
    if let Err(e) = parent.append_child(child) {
        log::warn!("append_child failed: {:?}", e);
    }
}

/// Attach `handler` for `event` on `target` for the lifetime of the page.
pub fn listen(target: &web::EventTarget, event: &str, handler: impl FnMut(web::Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("add_event_listener({event}) failed: {:?}", e);
    }
    closure.forget();
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}
