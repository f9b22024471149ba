//! Per-frame physics update
//!
//! Advances every particle by one fixed timestep: Euler integration,
//! wraparound at the bounds, pulse phase advance, then pointer attraction.
//! The step is pure arithmetic over the field; it never touches the canvas.

use crate::field::ParticleField;
use crate::pointer::PointerPosition;

/// Tunable constants for the update step
#[derive(Debug, Clone)]
pub struct DriftConfig {
    /// Pulse angle advance per frame
    pub phase_increment: f32,
    /// Radius within which the pointer attracts particles
    pub pointer_radius: f32,
    /// Scale applied to `(radius - distance)` when accelerating a particle
    pub pointer_strength: f32,
    /// Optional speed clamp. The original effect leaves repeated pointer
    /// passes free to accelerate a particle without bound; setting this caps
    /// the magnitude after each update.
    pub max_speed: Option<f32>,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            phase_increment: 0.02,
            pointer_radius: 100.0,
            pointer_strength: 0.0001,
            max_speed: None,
        }
    }
}

/// Advance the whole field by one frame.
///
/// Order per particle: integrate, wrap, advance phase, apply pointer force.
/// The force contribution is skipped at distance zero so a pointer parked
/// exactly on a particle cannot divide by zero and poison its velocity.
pub fn tick(field: &mut ParticleField, pointer: Option<PointerPosition>, config: &DriftConfig) {
    let bounds = field.bounds();

    for p in field.particles_mut() {
        // Euler integration at frame cadence
        p.x += p.vx;
        p.y += p.vy;

        // Wrap to the opposite edge, never reflect
        if p.x < 0.0 {
            p.x = bounds.width;
        } else if p.x > bounds.width {
            p.x = 0.0;
        }
        if p.y < 0.0 {
            p.y = bounds.height;
        } else if p.y > bounds.height {
            p.y = 0.0;
        }

        p.phase += config.phase_increment;

        if let Some(pointer) = pointer {
            let dx = pointer.x - p.x;
            let dy = pointer.y - p.y;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance > 0.0 && distance < config.pointer_radius {
                let force = (config.pointer_radius - distance) * config.pointer_strength;
                p.vx += dx / distance * force;
                p.vy += dy / distance * force;
            }
        }

        if let Some(max) = config.max_speed {
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            if speed > max {
                let scale = max / speed;
                p.vx *= scale;
                p.vy *= scale;
            }
        }
    }
}
