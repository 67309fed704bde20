use crate::audio::LevelMeter;
use crate::controls::ControlQueue;
use crate::render;
use instant::Instant;
use orb_core::{FrameInput, Simulation};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub sim: Simulation,
    pub controls: Rc<RefCell<ControlQueue>>,
    pub meter: Rc<RefCell<Option<LevelMeter>>>,
    pub running: Rc<RefCell<bool>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState>,
    pub started: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;

        let metered = self.meter.borrow_mut().as_mut().map(|m| m.level());
        let audio_level = {
            let mut controls = self.controls.borrow_mut();
            controls.apply(&mut self.sim, now_ms);
            metered.unwrap_or_else(|| controls.audio_level())
        };

        self.sim.step(FrameInput {
            now_ms,
            audio_level,
        });

        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
            match gpu.render(&self.sim) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("[gpu] surface lost, reconfiguring");
                    gpu.reconfigure();
                }
                Err(e) => log::error!("[gpu] render error: {:?}", e),
            }
        }
    }

    fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    fn teardown(&mut self) {
        self.gpu = None;
        if let Some(meter) = self.meter.borrow_mut().take() {
            meter.close();
        }
        log::info!("[frame] loop stopped after {} frames", self.sim.frames());
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement, particles: usize) -> Option<render::GpuState> {
    match render::GpuState::new(canvas, particles).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drive `frame_ctx` from requestAnimationFrame until its running flag clears.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let mut ctx = frame_ctx.borrow_mut();
        if !ctx.is_running() {
            ctx.teardown();
            drop(ctx);
            // Release the closure and with it the frame context
            let _ = tick_clone.borrow_mut().take();
            return;
        }
        ctx.frame();
        drop(ctx);
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
