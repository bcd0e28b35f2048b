//! DOM control panel: parameter sliders, track name, upload, reset and the
//! transport bar.

use crate::app::{self, SharedApp};
use crate::constants::*;
use crate::controls;
use crate::dom;
use nebula_core::{Param, VisualParams};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

struct SliderRow {
    param: Param,
    input: web::HtmlInputElement,
    value: web::HtmlElement,
}

pub struct Panel {
    sliders: Vec<SliderRow>,
    file_name: web::HtmlElement,
    file_input: web::HtmlInputElement,
    upload: web::HtmlButtonElement,
    reset: web::HtmlButtonElement,
    play: web::HtmlButtonElement,
    seek: web::HtmlInputElement,
    // true while the user drags the seek slider
    seeking: Rc<Cell<bool>>,
}

fn text_el(document: &web::Document, tag: &str, text: &str) -> anyhow::Result<web::HtmlElement> {
    let el: web::HtmlElement = dom::create(document, tag)?;
    el.set_text_content(Some(text));
    Ok(el)
}

fn button(document: &web::Document, id: &str, label: &str) -> anyhow::Result<web::HtmlButtonElement> {
    let b: web::HtmlButtonElement = dom::create(document, "button")?;
    b.set_id(id);
    b.set_text_content(Some(label));
    Ok(b)
}

fn range(
    document: &web::Document,
    id: &str,
    min: f64,
    max: f64,
    step: f64,
    value: f64,
) -> anyhow::Result<web::HtmlInputElement> {
    let input: web::HtmlInputElement = dom::create(document, "input")?;
    input.set_type("range");
    input.set_id(id);
    input.set_min(&min.to_string());
    input.set_max(&max.to_string());
    input.set_step(&step.to_string());
    input.set_value(&value.to_string());
    Ok(input)
}

impl Panel {
    /// Build the panel inside `#controls`, creating that container if the
    /// page does not provide one.
    pub fn build(document: &web::Document, params: &VisualParams) -> anyhow::Result<Self> {
        let root: web::HtmlElement = match dom::element_by_id(document, PANEL_ID) {
            Some(el) => el,
            None => {
                let el: web::HtmlElement = dom::create(document, "div")?;
                el.set_id(PANEL_ID);
                let body = document
                    .body()
                    .ok_or_else(|| anyhow::anyhow!("no <body>"))?;
                dom::append(&body, &el);
                el
            }
        };

        let mut sliders = Vec::with_capacity(Param::ALL.len());
        let mut current_group = "";
        for param in Param::ALL {
            let spec = param.spec();
            if spec.group != current_group {
                current_group = spec.group;
                dom::append(&root, &text_el(document, "h3", spec.group)?);
            }
            let row: web::HtmlElement = dom::create(document, "div")?;
            row.set_class_name("param-row");
            let label = text_el(document, "label", spec.label)?;
            let value = params.get(param);
            let input = range(
                document,
                &controls::param_input_id(PARAM_INPUT_PREFIX, spec.key),
                spec.min as f64,
                spec.max as f64,
                spec.step as f64,
                value as f64,
            )?;
            let readout = text_el(document, "span", &controls::format_value(&spec, value))?;
            dom::append(&row, &label);
            dom::append(&row, &input);
            dom::append(&row, &readout);
            dom::append(&root, &row);
            sliders.push(SliderRow {
                param,
                input,
                value: readout,
            });
        }

        dom::append(&root, &text_el(document, "h3", "File")?);
        let file_name = text_el(document, "span", &params.file_name)?;
        file_name.set_id(FILE_NAME_ID);
        dom::append(&root, &file_name);

        let file_input: web::HtmlInputElement = dom::create(document, "input")?;
        file_input.set_type("file");
        file_input.set_id(FILE_INPUT_ID);
        file_input.set_accept("audio/*");
        _ = file_input.style().set_property("display", "none");
        dom::append(&root, &file_input);

        let upload = button(document, UPLOAD_BUTTON_ID, UPLOAD_LABEL)?;
        let reset = button(document, RESET_BUTTON_ID, RESET_LABEL)?;
        dom::append(&root, &upload);
        dom::append(&root, &reset);

        let bar: web::HtmlElement = dom::create(document, "div")?;
        bar.set_class_name("transport");
        let play = button(document, PLAY_BUTTON_ID, controls::play_button_label(false))?;
        let seek = range(document, SEEK_SLIDER_ID, 0.0, SEEK_SLIDER_MAX, 1.0, 0.0)?;
        dom::append(&bar, &play);
        dom::append(&bar, &seek);
        dom::append(&root, &bar);

        Ok(Self {
            sliders,
            file_name,
            file_input,
            upload,
            reset,
            play,
            seek,
            seeking: Rc::new(Cell::new(false)),
        })
    }

    /// Hook every control up to the shared app state.
    pub fn wire(&self, shared: &SharedApp) {
        for row in &self.sliders {
            let app = shared.clone();
            let param = row.param;
            let input = row.input.clone();
            let readout = row.value.clone();
            dom::listen(&row.input, "input", move |_| {
                let Some(v) = controls::parse_slider(&input.value()) else {
                    return;
                };
                let applied = app.borrow_mut().vis.set_param(param, v);
                readout.set_text_content(Some(&controls::format_value(&param.spec(), applied)));
            });
        }

        let file_input = self.file_input.clone();
        dom::listen(&self.upload, "click", move |_| file_input.click());

        let app = shared.clone();
        let file_input = self.file_input.clone();
        dom::listen(&self.file_input, "change", move |_| {
            let file = file_input.files().and_then(|list| list.get(0));
            if let Some(file) = file {
                app::load_file(&app, file);
            }
            // allow picking the same file again
            file_input.set_value("");
        });

        let app = shared.clone();
        dom::listen(&self.reset, "click", move |_| {
            app.borrow_mut().vis.reset();
            let a = app.borrow();
            if let Some(panel) = &a.panel {
                panel.sync_params(&a.vis.params);
            }
        });

        let app = shared.clone();
        dom::listen(&self.play, "click", move |_| {
            app.borrow_mut().toggle_play_pause();
        });

        let app = shared.clone();
        let seek = self.seek.clone();
        let seeking = self.seeking.clone();
        dom::listen(&self.seek, "input", move |_| {
            seeking.set(true);
            let Some(v) = controls::parse_slider(&seek.value()) else {
                return;
            };
            let p = controls::slider_to_fraction(v as f64, SEEK_SLIDER_MAX);
            app.borrow_mut().vis.seek(p);
        });
        let seeking = self.seeking.clone();
        dom::listen(&self.seek, "change", move |_| seeking.set(false));
    }

    pub fn sync_params(&self, params: &VisualParams) {
        for row in &self.sliders {
            let v = params.get(row.param);
            row.input.set_value(&v.to_string());
            row.value
                .set_text_content(Some(&controls::format_value(&row.param.spec(), v)));
        }
        self.set_file_name(&params.file_name);
    }

    pub fn set_file_name(&self, name: &str) {
        self.file_name.set_text_content(Some(name));
    }

    pub fn set_playing(&self, playing: bool) {
        self.play
            .set_text_content(Some(controls::play_button_label(playing)));
    }

    pub fn set_seek(&self, fraction: f64) {
        if self.seeking.get() {
            return;
        }
        let v = controls::fraction_to_slider(fraction, SEEK_SLIDER_MAX);
        self.seek.set_value(&format!("{v:.1}"));
    }
}

/// Space toggles playback, arrows seek. Ignored while an input has focus.
pub fn wire_keyboard(shared: &SharedApp) {
    let Some(window) = web::window() else {
        return;
    };
    let app = shared.clone();
    dom::listen(&window, "keydown", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        let on_input = ev
            .target()
            .map(|t| t.has_type::<web::HtmlInputElement>())
            .unwrap_or(false);
        match controls::page_key_action(&ev.key(), on_input, KEY_SEEK_STEP) {
            Some(controls::KeyAction::TogglePlay) => {
                ev.prevent_default();
                app.borrow_mut().toggle_play_pause();
            }
            Some(controls::KeyAction::SeekBy(delta)) => {
                let mut a = app.borrow_mut();
                let p = a.vis.poll_position() + delta;
                a.vis.seek(p);
                a.refresh_transport_ui();
            }
            None => {}
        }
    });
}
