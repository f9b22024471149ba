//! Proximity link computation
//!
//! Evaluates every particle pair each frame and produces the faded lines
//! drawn between nearby particles. The all-pairs pass is O(n²); particle
//! counts are kept small (80-200) so no spatial index is warranted.

use rand::Rng;

use crate::field::Particle;

/// Opacity of a link between coincident particles
pub const LINK_MAX_OPACITY: f32 = 0.5;

/// A drawable connection between two particles (indices into the field)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub opacity: f32,
}

/// Opacity for a pair at `distance`. Fades linearly from
/// [`LINK_MAX_OPACITY`] at distance zero to 0 at the threshold; at or
/// beyond the threshold the pair is not linked.
pub fn link_opacity(distance: f32, connection_distance: f32) -> f32 {
    if connection_distance <= 0.0 || distance >= connection_distance {
        return 0.0;
    }
    (connection_distance - distance) / connection_distance * LINK_MAX_OPACITY
}

/// Compute all links for the current particle list
pub fn proximity_links(particles: &[Particle], connection_distance: f32) -> Vec<Link> {
    let mut links = Vec::new();
    if connection_distance <= 0.0 {
        return links;
    }

    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let dx = particles[i].x - particles[j].x;
            let dy = particles[i].y - particles[j].y;
            let distance = (dx * dx + dy * dy).sqrt();

            let opacity = link_opacity(distance, connection_distance);
            if opacity > 0.0 {
                links.push(Link { a: i, b: j, opacity });
            }
        }
    }
    links
}

/// Pick a palette index for one link. Deliberately independent of either
/// endpoint's color; the per-line shimmer is part of the original look.
pub fn pick_link_color(palette_len: usize, rng: &mut impl Rng) -> usize {
    if palette_len == 0 {
        0
    } else {
        rng.gen_range(0..palette_len)
    }
}
