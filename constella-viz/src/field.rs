//! Particle state store
//!
//! Holds the per-frame list of particles. The whole list is created in one
//! batch and discarded wholesale on reinitialization (viewport resize); no
//! individual particle identity survives.

use std::f32::consts::TAU;

use rand::Rng;

/// Velocity components are drawn from [-DRIFT_SPEED, DRIFT_SPEED]
pub const DRIFT_SPEED: f32 = 0.25;

/// Base radius range in logical pixels
pub const SIZE_MIN: f32 = 1.0;
pub const SIZE_MAX: f32 = 4.0;

/// Base alpha range
pub const OPACITY_MIN: f32 = 0.2;
pub const OPACITY_MAX: f32 = 1.0;

/// Sinusoidal pulse: `sin(phase) * AMPLITUDE + OFFSET`, bounded [0.4, 1.0]
pub const PULSE_AMPLITUDE: f32 = 0.3;
pub const PULSE_OFFSET: f32 = 0.7;

/// Logical bounds of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// A single animated point
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in logical pixels, always within bounds
    pub x: f32,
    pub y: f32,
    /// Velocity in pixels per frame
    pub vx: f32,
    pub vy: f32,
    /// Index into the scene palette
    pub color: usize,
    /// Base radius, modulated by the pulse
    pub base_size: f32,
    /// Base alpha, modulated by the same pulse
    pub base_opacity: f32,
    /// Monotonically increasing pulse angle; randomized at spawn so the
    /// particles twinkle out of sync
    pub phase: f32,
}

impl Particle {
    /// Create one particle with randomized state inside the bounds
    pub fn spawn(bounds: Bounds, palette_len: usize, rng: &mut impl Rng) -> Self {
        let color = if palette_len == 0 {
            0
        } else {
            rng.gen_range(0..palette_len)
        };
        Self {
            x: rng.gen_range(0.0..=bounds.width),
            y: rng.gen_range(0.0..=bounds.height),
            vx: rng.gen_range(-DRIFT_SPEED..=DRIFT_SPEED),
            vy: rng.gen_range(-DRIFT_SPEED..=DRIFT_SPEED),
            color,
            base_size: rng.gen_range(SIZE_MIN..SIZE_MAX),
            base_opacity: rng.gen_range(OPACITY_MIN..OPACITY_MAX),
            phase: rng.gen_range(0.0..TAU),
        }
    }

    /// Current pulse factor, a pure function of phase
    pub fn pulse(&self) -> f32 {
        self.phase.sin() * PULSE_AMPLITUDE + PULSE_OFFSET
    }

    /// Radius after pulse modulation
    pub fn size(&self) -> f32 {
        self.base_size * self.pulse()
    }

    /// Alpha after pulse modulation
    pub fn opacity(&self) -> f32 {
        self.base_opacity * self.pulse()
    }
}

/// The current frame's particle list plus the bounds it lives in
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Bounds,
}

impl ParticleField {
    /// Populate `count` particles within `bounds`. A count of zero yields an
    /// empty, valid field.
    pub fn new(count: usize, bounds: Bounds, palette_len: usize, rng: &mut impl Rng) -> Self {
        let particles = (0..count)
            .map(|_| Particle::spawn(bounds, palette_len, rng))
            .collect();
        Self { particles, bounds }
    }

    /// Discard the current list and rebuild it for new bounds (resize path)
    pub fn reinitialize(
        &mut self,
        count: usize,
        bounds: Bounds,
        palette_len: usize,
        rng: &mut impl Rng,
    ) {
        *self = Self::new(count, bounds, palette_len, rng);
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn spawns_requested_count() {
        let field = ParticleField::new(80, Bounds::new(640.0, 480.0), 2, &mut rng());
        assert_eq!(field.len(), 80);
    }

    #[test]
    fn zero_count_yields_empty_valid_field() {
        let field = ParticleField::new(0, Bounds::new(640.0, 480.0), 2, &mut rng());
        assert!(field.is_empty());
        assert_eq!(field.bounds(), Bounds::new(640.0, 480.0));
    }

    #[test]
    fn spawned_particles_start_inside_bounds() {
        let bounds = Bounds::new(320.0, 200.0);
        let field = ParticleField::new(200, bounds, 2, &mut rng());
        for p in field.particles() {
            assert!((0.0..=bounds.width).contains(&p.x));
            assert!((0.0..=bounds.height).contains(&p.y));
        }
    }

    #[test]
    fn spawned_state_respects_fixed_ranges() {
        let field = ParticleField::new(200, Bounds::new(640.0, 480.0), 3, &mut rng());
        for p in field.particles() {
            assert!(p.vx.abs() <= DRIFT_SPEED);
            assert!(p.vy.abs() <= DRIFT_SPEED);
            assert!((SIZE_MIN..SIZE_MAX).contains(&p.base_size));
            assert!((OPACITY_MIN..OPACITY_MAX).contains(&p.base_opacity));
            assert!((0.0..TAU).contains(&p.phase));
            assert!(p.color < 3);
        }
    }

    #[test]
    fn zero_sized_bounds_do_not_panic() {
        let field = ParticleField::new(10, Bounds::new(0.0, 0.0), 2, &mut rng());
        for p in field.particles() {
            assert_eq!(p.x, 0.0);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn empty_palette_assigns_index_zero() {
        let field = ParticleField::new(5, Bounds::new(100.0, 100.0), 0, &mut rng());
        assert!(field.particles().iter().all(|p| p.color == 0));
    }

    #[test]
    fn pulse_is_bounded() {
        let mut p = Particle::spawn(Bounds::new(100.0, 100.0), 1, &mut rng());
        for i in 0..1000 {
            p.phase = i as f32 * 0.1;
            let pulse = p.pulse();
            assert!((0.4..=1.0).contains(&pulse), "pulse {} out of range", pulse);
        }
    }

    #[test]
    fn effective_size_and_opacity_stay_in_envelope() {
        let mut p = Particle::spawn(Bounds::new(100.0, 100.0), 1, &mut rng());
        for i in 0..1000 {
            p.phase = i as f32 * 0.07;
            assert!(p.size() >= p.base_size * 0.4 - f32::EPSILON);
            assert!(p.size() <= p.base_size * 1.0 + f32::EPSILON);
            assert!(p.opacity() >= p.base_opacity * 0.4 - f32::EPSILON);
            assert!(p.opacity() <= p.base_opacity * 1.0 + f32::EPSILON);
        }
    }

    #[test]
    fn reinitialize_replaces_the_whole_list() {
        let mut r = rng();
        let mut field = ParticleField::new(50, Bounds::new(640.0, 480.0), 2, &mut r);
        let before: Vec<Particle> = field.particles().to_vec();

        field.reinitialize(30, Bounds::new(800.0, 600.0), 2, &mut r);

        assert_eq!(field.len(), 30);
        assert_eq!(field.bounds(), Bounds::new(800.0, 600.0));
        // A fresh batch, not a truncation of the old one
        assert_ne!(&before[..30.min(before.len())], field.particles());
    }
}
