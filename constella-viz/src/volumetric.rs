//! Volumetric particle cloud
//!
//! Extends the 2D constellation with a z axis: a drifting cloud of points
//! with short-range mutual attraction, sinusoidal drift, velocity damping,
//! and slow whole-cloud rotation. CPU simulation only; rendering lives in
//! the optional WebGPU module.

use std::f32::consts::TAU;

use rand::Rng;

/// Configuration for the cloud simulation
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Number of particles
    pub count: usize,
    /// Cloud occupies [-half_extent, half_extent] on every axis
    pub half_extent: f32,
    /// Distance within which particles attract each other
    pub neighbor_radius: f32,
    /// Attraction magnitude at unit distance
    pub neighbor_strength: f32,
    /// Amplitude of the per-axis sinusoidal drift
    pub drift_strength: f32,
    /// Velocity retained each frame
    pub damping: f32,
    /// Whole-cloud rotation per frame around the vertical axis
    pub yaw_rate: f32,
    /// Whole-cloud rotation per frame around the depth axis
    pub roll_rate: f32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            count: 200,
            half_extent: 10.0,
            neighbor_radius: 2.0,
            neighbor_strength: 0.0001,
            drift_strength: 0.0001,
            damping: 0.99,
            yaw_rate: 0.001,
            roll_rate: 0.0005,
        }
    }
}

/// One point in the cloud
#[derive(Debug, Clone, PartialEq)]
pub struct Mote {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    /// Index into the scene palette
    pub color: usize,
    /// Base render scale before pulsing
    pub base_scale: f32,
}

impl Mote {
    fn spawn(config: &CloudConfig, palette_len: usize, rng: &mut impl Rng) -> Self {
        let e = config.half_extent;
        let color = if palette_len == 0 {
            0
        } else {
            rng.gen_range(0..palette_len)
        };
        Self {
            x: rng.gen_range(-e..=e),
            y: rng.gen_range(-e..=e),
            z: rng.gen_range(-e..=e),
            vx: rng.gen_range(-0.01..=0.01),
            vy: rng.gen_range(-0.01..=0.01),
            vz: rng.gen_range(-0.01..=0.01),
            color,
            base_scale: rng.gen_range(0.1..0.6),
        }
    }
}

/// The drifting 3D cloud
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    motes: Vec<Mote>,
    config: CloudConfig,
    /// Simulated seconds at frame cadence (1/60 s per tick)
    time: f32,
    /// Accumulated whole-cloud rotation
    yaw: f32,
    roll: f32,
}

impl ParticleCloud {
    pub fn new(config: CloudConfig, palette_len: usize, rng: &mut impl Rng) -> Self {
        let motes = (0..config.count)
            .map(|_| Mote::spawn(&config, palette_len, rng))
            .collect();
        Self {
            motes,
            config,
            time: 0.0,
            yaw: 0.0,
            roll: 0.0,
        }
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Advance the cloud by one frame
    pub fn tick(&mut self) {
        self.time += 1.0 / 60.0;

        // Attraction reads a position snapshot so the pass is order-independent
        let positions: Vec<(f32, f32, f32)> =
            self.motes.iter().map(|m| (m.x, m.y, m.z)).collect();

        let e = self.config.half_extent;
        for (i, mote) in self.motes.iter_mut().enumerate() {
            let mut ax = 0.0;
            let mut ay = 0.0;
            let mut az = 0.0;
            for (j, &(ox, oy, oz)) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let dx = ox - mote.x;
                let dy = oy - mote.y;
                let dz = oz - mote.z;
                let distance = (dx * dx + dy * dy + dz * dz).sqrt();
                if distance > 0.0 && distance < self.config.neighbor_radius {
                    let force = self.config.neighbor_strength / distance;
                    ax += dx / distance * force;
                    ay += dy / distance * force;
                    az += dz / distance * force;
                }
            }

            let i = i as f32;
            mote.vx = (mote.vx
                + ax
                + (self.time + i * 0.1).sin() * self.config.drift_strength)
                * self.config.damping;
            mote.vy = (mote.vy
                + ay
                + (self.time + i * 0.15).cos() * self.config.drift_strength)
                * self.config.damping;
            mote.vz = (mote.vz
                + az
                + (self.time * 0.5 + i * 0.2).sin() * self.config.drift_strength)
                * self.config.damping;

            mote.x += mote.vx;
            mote.y += mote.vy;
            mote.z += mote.vz;

            // Wrap to the opposite face on every axis
            if mote.x > e {
                mote.x = -e;
            } else if mote.x < -e {
                mote.x = e;
            }
            if mote.y > e {
                mote.y = -e;
            } else if mote.y < -e {
                mote.y = e;
            }
            if mote.z > e {
                mote.z = -e;
            } else if mote.z < -e {
                mote.z = e;
            }
        }

        self.yaw = (self.yaw + self.config.yaw_rate) % TAU;
        self.roll = (self.roll + self.config.roll_rate) % TAU;
    }

    /// Render scale for mote `index` at the current time, floored so a mote
    /// never vanishes entirely.
    pub fn render_scale(&self, index: usize) -> f32 {
        let mote = &self.motes[index];
        (mote.base_scale + (self.time * 3.0 + index as f32 * 0.5).sin() * 0.3).max(0.1)
    }
}
