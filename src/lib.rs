#![cfg(target_arch = "wasm32")]
use instant::Instant;
use orb_core::{Simulation, SimulationConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod constants;
mod controls;
mod dom;
mod frame;
mod render;

use audio::LevelMeter;
use controls::ControlQueue;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("craig-orb-web starting");
    Ok(())
}

/// JS-facing control surface for a mounted orb.
#[wasm_bindgen]
pub struct OrbHandle {
    controls: Rc<RefCell<ControlQueue>>,
    meter: Rc<RefCell<Option<LevelMeter>>>,
    running: Rc<RefCell<bool>>,
}

#[wasm_bindgen]
impl OrbHandle {
    /// Apply a remote tool call; returns the JSON reply for the caller.
    #[wasm_bindgen(js_name = handleToolCall)]
    pub fn handle_tool_call(&self, name: &str, args_json: &str) -> String {
        self.controls
            .borrow_mut()
            .handle_tool_call(name, args_json)
            .to_json()
    }

    #[wasm_bindgen(js_name = setAudioLevel)]
    pub fn set_audio_level(&self, level: f32) {
        self.controls.borrow_mut().set_audio_level(level);
    }

    /// Meter a remote media stream; replaces any previously attached stream.
    #[wasm_bindgen(js_name = attachStream)]
    pub fn attach_stream(&self, stream: web::MediaStream) -> Result<(), JsValue> {
        if self.controls.borrow().is_closed() {
            return Err(JsValue::from_str("orb is stopped"));
        }
        let meter = LevelMeter::attach(&stream).map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
        if let Some(old) = self.meter.borrow_mut().replace(meter) {
            old.close();
        }
        Ok(())
    }

    pub fn stop(&self) {
        if std::mem::replace(&mut *self.running.borrow_mut(), false) {
            log::info!("[frame] stop requested");
        }
        self.controls.borrow_mut().close();
    }
}

/// Mount the orb on the canvas with id `canvas_id` (default `orb-canvas`).
#[wasm_bindgen]
pub async fn mount(canvas_id: Option<String>) -> Result<OrbHandle, JsValue> {
    mount_inner(canvas_id)
        .await
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

async fn mount_inner(canvas_id: Option<String>) -> anyhow::Result<OrbHandle> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let id = canvas_id.unwrap_or_else(|| constants::DEFAULT_CANVAS_ID.to_string());
    let canvas = dom::canvas_by_id(&document, &id)?;
    dom::wire_canvas_resize(&canvas);

    let seed = random_seed();
    let sim = Simulation::new(&SimulationConfig::default(), seed);
    let gpu = frame::init_gpu(&canvas, sim.len()).await;
    log::info!(
        "[frame] mounted on #{} ({} particles, gpu={})",
        id,
        sim.len(),
        gpu.is_some()
    );

    let controls = Rc::new(RefCell::new(ControlQueue::new()));
    let meter = Rc::new(RefCell::new(None));
    let running = Rc::new(RefCell::new(true));

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        sim,
        controls: controls.clone(),
        meter: meter.clone(),
        running: running.clone(),
        canvas,
        gpu,
        started: Instant::now(),
    }));
    frame::start_loop(frame_ctx);

    Ok(OrbHandle {
        controls,
        meter,
        running,
    })
}
