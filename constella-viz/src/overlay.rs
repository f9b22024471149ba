//! Rotating geometric overlay
//!
//! Pure geometry for the decorative polygon drawn above the particles: a
//! slowly rotating regular polygon with an inner circle at half its radius.
//! Kept free of browser types so it can be tested headlessly.

use std::f32::consts::TAU;

/// Rotation advance per frame (0.1 rad per simulated second at 60 fps)
pub const ROTATION_PER_FRAME: f32 = 0.0016;

/// Overlay radius as a fraction of the short canvas side
pub const RADIUS_FACTOR: f32 = 0.2;

/// Inner circle radius as a fraction of the polygon radius
pub const INNER_CIRCLE_FACTOR: f32 = 0.5;

/// Stroke alpha for the overlay lines
pub const STROKE_ALPHA: f32 = 0.125;

/// Polygon radius for a canvas of the given logical size
pub fn overlay_radius(width: f32, height: f32) -> f32 {
    width.min(height) * RADIUS_FACTOR
}

/// Rotation angle after `frame` frames
pub fn rotation_angle(frame: u64) -> f32 {
    frame as f32 * ROTATION_PER_FRAME
}

/// Vertices of a regular polygon centered at the origin, first vertex on
/// the positive x axis. Fewer than three sides yields no polygon.
pub fn polygon_vertices(sides: u32, radius: f32) -> Vec<(f32, f32)> {
    if sides < 3 {
        return Vec::new();
    }
    (0..sides)
        .map(|i| {
            let angle = i as f32 / sides as f32 * TAU;
            (angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_follows_short_side() {
        assert_eq!(overlay_radius(1000.0, 500.0), 100.0);
        assert_eq!(overlay_radius(300.0, 800.0), 60.0);
    }

    #[test]
    fn hexagon_has_six_vertices_on_the_circle() {
        let verts = polygon_vertices(6, 100.0);
        assert_eq!(verts.len(), 6);
        for (x, y) in verts {
            let r = (x * x + y * y).sqrt();
            assert!((r - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn first_vertex_lies_on_positive_x_axis() {
        let verts = polygon_vertices(6, 50.0);
        assert!((verts[0].0 - 50.0).abs() < 1e-4);
        assert!(verts[0].1.abs() < 1e-4);
    }

    #[test]
    fn degenerate_polygons_yield_nothing() {
        assert!(polygon_vertices(0, 100.0).is_empty());
        assert!(polygon_vertices(2, 100.0).is_empty());
    }

    #[test]
    fn rotation_advances_with_frames() {
        assert_eq!(rotation_angle(0), 0.0);
        assert!(rotation_angle(100) > rotation_angle(99));
        assert!((rotation_angle(625) - 1.0).abs() < 1e-3);
    }
}
