//! 2D canvas rendering for the constellation
//!
//! Draws the current field to an HTML canvas: particles with a soft glow,
//! proximity links, then the rotating overlay. Draw order within a frame is
//! fixed (clear, particles, links, overlay) so later passes stack on top.

use rand::Rng;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::field::ParticleField;
use crate::links::{Link, pick_link_color};
use crate::overlay;
use crate::scene_types::{OverlayConfig, Rgb};

/// Canvas renderer for one widget instance
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Logical size; the backing store is scaled by the device pixel ratio
    width: f32,
    height: f32,
}

impl CanvasRenderer {
    /// Create a renderer from a canvas element
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("Failed to get 2d context: {:?}", e))?
            .ok_or("2d context not available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

        let width = canvas.width() as f32;
        let height = canvas.height() as f32;

        Ok(Self {
            canvas,
            ctx,
            width,
            height,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Resize the backing store for a new logical size, scaling it by the
    /// device pixel ratio so the animation stays crisp on dense displays.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);

        let dpr = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        self.canvas.set_width((self.width as f64 * dpr) as u32);
        self.canvas.set_height((self.height as f64 * dpr) as u32);

        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", self.width));
        let _ = style.set_property("height", &format!("{}px", self.height));

        // Setting width/height reset the transform; reapply the scale
        let _ = self.ctx.scale(dpr, dpr);
    }

    /// Render one frame. `frame` drives the overlay rotation; `rng` picks
    /// the per-link colors.
    pub fn render(
        &self,
        field: &ParticleField,
        links: &[Link],
        palette: &[Rgb],
        overlay_config: &OverlayConfig,
        frame: u64,
        rng: &mut impl Rng,
    ) {
        self.ctx
            .clear_rect(0.0, 0.0, self.width as f64, self.height as f64);

        self.draw_particles(field, palette);
        self.draw_links(field, links, palette, rng);
        if overlay_config.enabled {
            self.draw_overlay(overlay_config, frame, palette);
        }
    }

    /// Each particle is a solid core plus a radial-gradient halo at twice
    /// its effective size.
    fn draw_particles(&self, field: &ParticleField, palette: &[Rgb]) {
        for p in field.particles() {
            let Some(color) = palette.get(p.color) else {
                continue;
            };
            let size = p.size() as f64;
            let opacity = p.opacity();
            let (x, y) = (p.x as f64, p.y as f64);

            self.ctx.begin_path();
            self.ctx
                .arc(x, y, size, 0.0, std::f64::consts::TAU)
                .ok();
            self.ctx.set_fill_style_str(&color.css(opacity));
            self.ctx.fill();

            let halo = size * 2.0;
            if let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, halo) {
                let _ = gradient.add_color_stop(0.0, &color.css(opacity * 0.3));
                let _ = gradient.add_color_stop(1.0, &color.css(0.0));
                self.ctx.begin_path();
                self.ctx.arc(x, y, halo, 0.0, std::f64::consts::TAU).ok();
                self.ctx.set_fill_style_canvas_gradient(&gradient);
                self.ctx.fill();
            }
        }
    }

    fn draw_links(
        &self,
        field: &ParticleField,
        links: &[Link],
        palette: &[Rgb],
        rng: &mut impl Rng,
    ) {
        if palette.is_empty() {
            return;
        }
        self.ctx.set_line_width(1.0);

        let particles = field.particles();
        for link in links {
            let (Some(a), Some(b)) = (particles.get(link.a), particles.get(link.b)) else {
                continue;
            };
            let color = palette[pick_link_color(palette.len(), rng)];
            self.ctx.set_stroke_style_str(&color.css(link.opacity));

            self.ctx.begin_path();
            self.ctx.move_to(a.x as f64, a.y as f64);
            self.ctx.line_to(b.x as f64, b.y as f64);
            self.ctx.stroke();
        }
    }

    /// Rotating polygon plus an inner circle, centered on the canvas
    fn draw_overlay(&self, config: &OverlayConfig, frame: u64, palette: &[Rgb]) {
        let stroke = palette
            .get(1)
            .or_else(|| palette.first())
            .map(|c| c.css(overlay::STROKE_ALPHA));
        let Some(stroke) = stroke else {
            return;
        };

        let radius = overlay::overlay_radius(self.width, self.height);
        let vertices = overlay::polygon_vertices(config.sides, radius);
        if vertices.is_empty() {
            return;
        }

        self.ctx.save();
        let _ = self
            .ctx
            .translate(self.width as f64 / 2.0, self.height as f64 / 2.0);
        let _ = self.ctx.rotate(overlay::rotation_angle(frame) as f64);

        self.ctx.set_stroke_style_str(&stroke);
        self.ctx.set_line_width(1.0);

        self.ctx.begin_path();
        for (i, (x, y)) in vertices.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(*x as f64, *y as f64);
            } else {
                self.ctx.line_to(*x as f64, *y as f64);
            }
        }
        self.ctx.close_path();
        self.ctx.stroke();

        self.ctx.begin_path();
        self.ctx
            .arc(
                0.0,
                0.0,
                (radius * overlay::INNER_CIRCLE_FACTOR) as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
        self.ctx.stroke();

        self.ctx.restore();
    }
}
