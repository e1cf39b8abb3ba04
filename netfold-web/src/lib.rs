/// Netfold Web - WASM bindings for the fold session
///
/// The browser owns rendering; this module forwards pointer and toggle input
/// to a [`Session`] and hands pose updates back as JSON strings.
use netfold_core::{
    ControlMode, HollowCase, HollowCube, HollowError, NetfoldError, PointerEvent, PointerKind, PointerSource, Session,
    UnfoldConfig,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct LayoutSummary<'a> {
    id: &'a str,
    name: &'a str,
    solid: &'a str,
    mode: ControlMode,
    family: Option<&'a str>,
    notes: &'a [String],
    formulas: &'a [&'static str],
}

#[derive(Debug, Error)]
enum WebError {
    #[error(transparent)]
    Core(#[from] NetfoldError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

type WebResult<T> = Result<T, WebError>;

fn to_json<T: Serialize + ?Sized>(value: &T) -> WebResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Converts a JS frame delta in milliseconds; non-finite or huge values
/// saturate, negative ones and NaN count as no time.
fn tick_duration(ms: f64) -> Duration {
    Duration::try_from_secs_f64((ms / 1000.0).max(0.0)).unwrap_or(Duration::MAX)
}

fn js_error(err: WebError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// A fold session driven from JavaScript
#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    hollow: HollowCube,
}

impl WebSession {
    fn create(layout_id: Option<String>) -> WebResult<Self> {
        let mut session = Session::with_builtin(UnfoldConfig::default())?;
        if let Some(id) = layout_id {
            session.select(&id)?;
        }
        Ok(Self {
            session,
            hollow: HollowCube::default(),
        })
    }

    fn select_json(&mut self, id: &str) -> WebResult<String> {
        let updates = self.session.select(id)?;
        to_json(&updates)
    }

    fn pointer_json(&mut self, kind: PointerKind, x: f32, y: f32, touch: bool) -> WebResult<String> {
        let source = if touch { PointerSource::Touch } else { PointerSource::Mouse };
        let event = PointerEvent { kind, x, y, source };
        to_json(&self.session.pointer(&event))
    }

    fn layouts_json(&self) -> WebResult<String> {
        let summaries: Vec<_> = self
            .session
            .registry()
            .layouts()
            .iter()
            .map(|layout| LayoutSummary {
                id: layout.id(),
                name: layout.name(),
                solid: layout.solid().name(),
                mode: layout.mode(),
                family: layout.family().map(|f| f.label()),
                notes: layout.notes(),
                formulas: layout.solid().formulas(),
            })
            .collect();
        to_json(&summaries)
    }

    fn hollow_json(&self, case: &str) -> WebResult<String> {
        let case: HollowCase = case.parse().map_err(NetfoldError::from)?;
        to_json(&self.hollow.report(case))
    }
}

#[wasm_bindgen]
impl WebSession {
    /// Opens the built-in catalog, optionally at `layout_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(layout_id: Option<String>) -> Result<WebSession, JsValue> {
        Self::create(layout_id).map_err(js_error)
    }

    /// Switches layout; returns the JSON array of pose updates.
    pub fn select(&mut self, id: &str) -> Result<String, JsValue> {
        self.select_json(id).map_err(js_error)
    }

    pub fn pointer_start(&mut self, x: f32, y: f32, touch: bool) -> Result<String, JsValue> {
        self.pointer_json(PointerKind::Start, x, y, touch).map_err(js_error)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, touch: bool) -> Result<String, JsValue> {
        self.pointer_json(PointerKind::Move, x, y, touch).map_err(js_error)
    }

    pub fn pointer_end(&mut self, x: f32, y: f32, touch: bool) -> Result<String, JsValue> {
        self.pointer_json(PointerKind::End, x, y, touch).map_err(js_error)
    }

    pub fn pointer_leave(&mut self, x: f32, y: f32) -> Result<String, JsValue> {
        self.pointer_json(PointerKind::Leave, x, y, false).map_err(js_error)
    }

    pub fn toggle(&mut self) -> Result<String, JsValue> {
        to_json(&self.session.toggle()).map_err(js_error)
    }

    pub fn set_folded(&mut self, folded: bool) -> Result<String, JsValue> {
        to_json(&self.session.set_folded(folded)).map_err(js_error)
    }

    /// Advances animations by `ms` milliseconds.
    pub fn tick(&mut self, ms: f64) -> Result<String, JsValue> {
        to_json(&self.session.tick(tick_duration(ms))).map_err(js_error)
    }

    /// Current pose of every face, as JSON.
    pub fn poses(&self) -> Result<String, JsValue> {
        to_json(&self.session.poses()).map_err(js_error)
    }

    pub fn progress(&self) -> f32 {
        self.session.progress().value()
    }

    pub fn is_animating(&self) -> bool {
        self.session.is_animating()
    }

    pub fn layout_id(&self) -> String {
        self.session.layout().id().to_string()
    }

    /// JSON summaries of every registered layout.
    pub fn layouts(&self) -> Result<String, JsValue> {
        self.layouts_json().map_err(js_error)
    }

    /// JSON hollow-cube report for `none`, `corner`, `edge` or `face`.
    pub fn hollow_report(&self, case: &str) -> Result<String, JsValue> {
        self.hollow_json(case).map_err(js_error)
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    Ok(())
}
