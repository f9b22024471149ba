//! Constellation background widget
//!
//! This crate provides WASM bindings for embedding the animated
//! constellation background in a web page. The simulation modules are pure
//! Rust and unit-tested natively; only this module and the renderers touch
//! the browser.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub mod camera3d;
pub mod canvas2d;
pub mod field;
pub mod frame_loop;
pub mod links;
pub mod overlay;
pub mod pointer;
pub mod scene_types;
pub mod simulation;
pub mod volumetric;

#[cfg(feature = "webgpu")]
pub mod webgpu;

use crate::canvas2d::CanvasRenderer;
use crate::field::{Bounds, ParticleField};
use crate::frame_loop::{FrameLoop, LoopState};
use crate::links::proximity_links;
use crate::pointer::PointerTracker;
use crate::scene_types::{Dimensions, Rgb, SceneConfig, resolve_palette};
use crate::simulation::{DriftConfig, tick};

/// Initialize WASM panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Everything one widget instance owns. Held behind a shared cell so the
/// frame callback and the event listeners see the same state; multiple
/// widgets on one page never share anything.
struct WidgetState {
    config: SceneConfig,
    palette: Vec<Rgb>,
    drift: DriftConfig,
    field: ParticleField,
    pointer: PointerTracker,
    renderer: CanvasRenderer,
    frame_loop: FrameLoop,
    rng: SmallRng,
}

impl WidgetState {
    /// One full cycle: update every particle, then draw in fixed order
    fn advance_frame(&mut self) {
        let frame = self.frame_loop.frame();
        tick(&mut self.field, self.pointer.position(), &self.drift);
        let links = proximity_links(self.field.particles(), self.config.connection_distance);
        self.renderer.render(
            &self.field,
            &links,
            &self.palette,
            &self.config.overlay,
            frame,
            &mut self.rng,
        );
        self.frame_loop.advance();
    }
}

/// The embeddable constellation background
#[wasm_bindgen]
pub struct ConstellationWidget {
    state: Rc<RefCell<WidgetState>>,
    canvas: HtmlCanvasElement,
    raf_id: Rc<Cell<Option<i32>>>,
    raf_closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    pointer_move: Option<Closure<dyn FnMut(web_sys::MouseEvent)>>,
    pointer_leave: Option<Closure<dyn FnMut(web_sys::MouseEvent)>>,
}

#[wasm_bindgen]
impl ConstellationWidget {
    /// Create a widget on the given canvas from a JSON scene config.
    /// Particles exist after this returns; the loop starts on `start`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: &str) -> Result<ConstellationWidget, JsValue> {
        let config = SceneConfig::from_json(config_json)
            .map_err(|e| js_error(format!("invalid scene config: {}", e)))?
            .sanitized();

        let mut renderer = CanvasRenderer::new(canvas.clone()).map_err(js_error)?;

        let (width, height) = match config.dimensions {
            Dimensions::Fixed { width, height } => (width as f32, height as f32),
            Dimensions::FillParent => (
                canvas.client_width().max(0) as f32,
                canvas.client_height().max(0) as f32,
            ),
        };
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        renderer.resize(width, height, dpr);

        let palette = resolve_palette(&config.palette);
        let mut rng = SmallRng::from_entropy();
        let field = ParticleField::new(
            config.particle_count,
            Bounds::new(width, height),
            palette.len(),
            &mut rng,
        );

        let drift = DriftConfig {
            max_speed: config.max_speed,
            ..Default::default()
        };

        let mut frame_loop = FrameLoop::new();
        frame_loop.mark_initialized();

        let state = Rc::new(RefCell::new(WidgetState {
            config,
            palette,
            drift,
            field,
            pointer: PointerTracker::new(),
            renderer,
            frame_loop,
            rng,
        }));

        let mut widget = ConstellationWidget {
            state,
            canvas,
            raf_id: Rc::new(Cell::new(None)),
            raf_closure: Rc::new(RefCell::new(None)),
            pointer_move: None,
            pointer_leave: None,
        };
        widget.attach_pointer_listeners()?;
        Ok(widget)
    }

    fn attach_pointer_listeners(&mut self) -> Result<(), JsValue> {
        let state = Rc::clone(&self.state);
        let canvas = self.canvas.clone();
        let on_move = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(
            move |event: web_sys::MouseEvent| {
                let rect = canvas.get_bounding_client_rect();
                state.borrow_mut().pointer.record(
                    event.client_x() as f32,
                    event.client_y() as f32,
                    rect.left() as f32,
                    rect.top() as f32,
                );
            },
        );
        self.canvas
            .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;

        let state = Rc::clone(&self.state);
        let on_leave = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(
            move |_event: web_sys::MouseEvent| {
                state.borrow_mut().pointer.clear();
            },
        );
        self.canvas
            .add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;

        self.pointer_move = Some(on_move);
        self.pointer_leave = Some(on_leave);
        Ok(())
    }

    /// Start the frame-driven loop. Idempotent while running.
    pub fn start(&mut self) {
        if self.state.borrow().frame_loop.state() == LoopState::Running {
            return;
        }
        let token = self.state.borrow_mut().frame_loop.start();

        let state = Rc::clone(&self.state);
        let raf_id = Rc::clone(&self.raf_id);
        let rearm = Rc::clone(&self.raf_closure);
        *self.raf_closure.borrow_mut() = Some(Closure::new(move || {
            if token.is_cancelled() {
                return;
            }
            state.borrow_mut().advance_frame();

            // The token is checked again before re-arming so teardown during
            // a cycle cancels cleanly.
            if token.is_cancelled() {
                return;
            }
            if let Some(window) = web_sys::window() {
                if let Some(callback) = rearm.borrow().as_ref() {
                    if let Ok(id) =
                        window.request_animation_frame(callback.as_ref().unchecked_ref())
                    {
                        raf_id.set(Some(id));
                    }
                }
            }
        }));

        if let Some(window) = web_sys::window() {
            if let Some(callback) = self.raf_closure.borrow().as_ref() {
                if let Ok(id) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    self.raf_id.set(Some(id));
                }
            }
        }
    }

    /// Cancel the pending frame request. Particles are retained but inert.
    pub fn stop(&mut self) {
        self.state.borrow_mut().frame_loop.stop();
        if let Some(id) = self.raf_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    /// Rebuild the particle batch for a new logical size. Safe to call
    /// while running; the loop continues over the fresh batch.
    pub fn resize(&mut self, width: f32, height: f32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);

        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        state.renderer.resize(width, height, dpr);
        state.field.reinitialize(
            state.config.particle_count,
            Bounds::new(width, height),
            state.palette.len(),
            &mut state.rng,
        );
        state.frame_loop.mark_initialized();
    }

    /// Tear the widget down: cancel the loop and detach all listeners.
    /// Call when the owning view unmounts.
    pub fn dispose(&mut self) {
        self.stop();
        if let Some(callback) = self.pointer_move.take() {
            let _ = self
                .canvas
                .remove_event_listener_with_callback("mousemove", callback.as_ref().unchecked_ref());
        }
        if let Some(callback) = self.pointer_leave.take() {
            let _ = self.canvas.remove_event_listener_with_callback(
                "mouseleave",
                callback.as_ref().unchecked_ref(),
            );
        }
        self.raf_closure.borrow_mut().take();
    }

    /// Number of particles in the current batch
    pub fn particle_count(&self) -> usize {
        self.state.borrow().field.len()
    }

    /// Whether the loop is currently armed
    pub fn is_running(&self) -> bool {
        self.state.borrow().frame_loop.state() == LoopState::Running
    }
}

/// The volumetric cloud variant, rendered with WebGPU
#[cfg(feature = "webgpu")]
#[wasm_bindgen]
pub struct VolumetricWidget {
    state: Rc<RefCell<VolumetricState>>,
    raf_id: Rc<Cell<Option<i32>>>,
    raf_closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

#[cfg(feature = "webgpu")]
struct VolumetricState {
    cloud: volumetric::ParticleCloud,
    palette: Vec<Rgb>,
    renderer: webgpu::CloudRenderer,
    frame_loop: FrameLoop,
}

#[cfg(feature = "webgpu")]
#[wasm_bindgen]
impl VolumetricWidget {
    /// Create a cloud widget on the given canvas (async WebGPU setup)
    pub async fn create(
        canvas: HtmlCanvasElement,
        config_json: &str,
    ) -> Result<VolumetricWidget, JsValue> {
        let config = SceneConfig::from_json(config_json)
            .map_err(|e| js_error(format!("invalid scene config: {}", e)))?
            .sanitized();

        let renderer = webgpu::CloudRenderer::new(canvas).await.map_err(js_error)?;

        let palette = resolve_palette(&config.palette);
        let mut rng = SmallRng::from_entropy();
        let cloud_config = volumetric::CloudConfig {
            count: config.particle_count,
            ..Default::default()
        };
        let cloud = volumetric::ParticleCloud::new(cloud_config, palette.len(), &mut rng);

        let mut frame_loop = FrameLoop::new();
        frame_loop.mark_initialized();

        Ok(VolumetricWidget {
            state: Rc::new(RefCell::new(VolumetricState {
                cloud,
                palette,
                renderer,
                frame_loop,
            })),
            raf_id: Rc::new(Cell::new(None)),
            raf_closure: Rc::new(RefCell::new(None)),
        })
    }

    /// Start the frame-driven loop. Idempotent while running.
    pub fn start(&mut self) {
        if self.state.borrow().frame_loop.state() == LoopState::Running {
            return;
        }
        let token = self.state.borrow_mut().frame_loop.start();

        let state = Rc::clone(&self.state);
        let raf_id = Rc::clone(&self.raf_id);
        let rearm = Rc::clone(&self.raf_closure);
        *self.raf_closure.borrow_mut() = Some(Closure::new(move || {
            if token.is_cancelled() {
                return;
            }
            {
                let mut state = state.borrow_mut();
                let state = &mut *state;
                state.cloud.tick();
                state.renderer.render(&state.cloud, &state.palette);
                state.frame_loop.advance();
            }

            if token.is_cancelled() {
                return;
            }
            if let Some(window) = web_sys::window() {
                if let Some(callback) = rearm.borrow().as_ref() {
                    if let Ok(id) =
                        window.request_animation_frame(callback.as_ref().unchecked_ref())
                    {
                        raf_id.set(Some(id));
                    }
                }
            }
        }));

        if let Some(window) = web_sys::window() {
            if let Some(callback) = self.raf_closure.borrow().as_ref() {
                if let Ok(id) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    self.raf_id.set(Some(id));
                }
            }
        }
    }

    /// Cancel the pending frame request
    pub fn stop(&mut self) {
        self.state.borrow_mut().frame_loop.stop();
        if let Some(id) = self.raf_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        self.raf_closure.borrow_mut().take();
    }

    /// Reconfigure the surface for a new size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.state.borrow_mut().renderer.resize(width, height);
    }
}
