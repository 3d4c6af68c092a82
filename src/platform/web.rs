//! Browser bindings: canvas surfaces, LocalStorage records, and the
//! session handle exported to JavaScript

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Storage};

use crate::records::RecordStore;
use crate::renderer::{Color, DevicePoint, Surface};
use crate::settings::Settings;
use crate::sim::{Level, SceneSurfaces, Session};

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}

/// Attempt records kept in the page's LocalStorage
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn open() -> Option<Self> {
        local_storage().map(|storage| Self { storage })
    }
}

impl RecordStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            log::warn!("LocalStorage write to {key} failed: {e:?}");
        }
    }
}

/// `Surface` backed by a 2D canvas context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    /// Look up `<canvas id=...>` and take its 2D context
    pub fn from_element_id(id: &str) -> Result<Self, JsValue> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .ok_or_else(|| JsValue::from_str(&format!("no element #{id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: DevicePoint) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: DevicePoint) {
        self.ctx.line_to(p.x, p.y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_ellipse(&mut self, center: DevicePoint, radius_x: f64, radius_y: f64) {
        self.ctx.begin_path();
        if self
            .ctx
            .ellipse(center.x, center.y, radius_x, radius_y, 0.0, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn fill_rect(&mut self, origin: DevicePoint, width: f64, height: f64) {
        self.ctx.fill_rect(origin.x, origin.y, width, height);
    }

    fn fill_text(&mut self, text: &str, at: DevicePoint) {
        let _ = self.ctx.fill_text(text, at.x, at.y);
    }
}

/// Session plus the three canvases it paints, driven from a page's
/// `requestAnimationFrame` loop
#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    curve: CanvasSurface,
    deriv: CanvasSurface,
    color: CanvasSurface,
    store: Option<LocalStore>,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
impl WebSession {
    /// Open built-in level `level` on the canvases with the given ids
    #[wasm_bindgen(constructor)]
    pub fn new(level: u32, curve_id: &str, deriv_id: &str, color_id: &str) -> Result<WebSession, JsValue> {
        let session = Session::new(Level::builtin(level).map_err(js_err)?, level, Settings::load()).map_err(js_err)?;
        let store = LocalStore::open();
        if store.is_none() {
            log::warn!("LocalStorage unavailable, wins will not be saved");
        }
        Ok(WebSession {
            session,
            curve: CanvasSurface::from_element_id(curve_id)?,
            deriv: CanvasSurface::from_element_id(deriv_id)?,
            color: CanvasSurface::from_element_id(color_id)?,
            store,
        })
    }

    pub fn set_coefficient(&mut self, a: f64) -> Result<(), JsValue> {
        self.session.set_coefficient(a).map_err(js_err)
    }

    pub fn set_roots(&mut self, text: &str) -> Result<(), JsValue> {
        self.session.set_roots(text).map_err(js_err)
    }

    pub fn set_formula(&mut self, text: &str) -> Result<(), JsValue> {
        self.session.set_formula(text).map_err(js_err)
    }

    pub fn play(&mut self) {
        self.session.play(super::now_ms());
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    /// Advance and repaint; returns this frame's events as a JSON array
    pub fn frame(&mut self) -> String {
        let events = match self.store.as_mut() {
            Some(store) => self.session.update(super::now_ms(), store),
            None => self.session.update(super::now_ms(), &mut crate::records::MemoryStore::new()),
        };
        self.session.render(&mut SceneSurfaces {
            curve: &mut self.curve,
            deriv: &mut self.deriv,
            color: &mut self.color,
        });
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Stored wins for this level as JSON
    pub fn records(&self) -> String {
        let record = match self.store.as_ref() {
            Some(store) => self.session.record(store),
            None => Default::default(),
        };
        serde_json::to_string(&record).unwrap_or_else(|_| "{}".to_string())
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    super::init_logging();
    log::info!("Curve Rider loaded");
}
