//! Camera math for the volumetric renderer
//!
//! Pure matrix calculations (column-major, wgpu 0..1 depth range) kept free
//! of GPU types so they can be unit tested without a device.

/// Column-major 4x4 matrix; `0[col][row]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Right-handed perspective projection mapping depth to [0, 1]
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let aspect = if aspect > 0.0 { aspect } else { 1.0 };
        Mat4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, far / (near - far), -1.0],
            [0.0, 0.0, near * far / (near - far), 0.0],
        ])
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Mat4::IDENTITY;
        m.0[3] = [x, y, z, 1.0];
        m
    }

    /// Rotation around the vertical axis
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation around the depth axis
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn multiply(&self, other: &Mat4) -> Mat4 {
        let a = &self.0;
        let b = &other.0;
        let mut out = [[0.0f32; 4]; 4];
        for (col, out_col) in out.iter_mut().enumerate() {
            for (row, value) in out_col.iter_mut().enumerate() {
                *value = (0..4).map(|k| a[k][row] * b[col][k]).sum();
            }
        }
        Mat4(out)
    }

    /// Transform a point, returning homogeneous (x, y, z, w)
    pub fn transform(&self, x: f32, y: f32, z: f32) -> [f32; 4] {
        let m = &self.0;
        let v = [x, y, z, 1.0];
        let mut out = [0.0f32; 4];
        for (row, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|k| m[k][row] * v[k]).sum();
        }
        out
    }

    /// Flatten for a uniform buffer
    pub fn to_array(&self) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            out[col * 4..col * 4 + 4].copy_from_slice(&self.0[col]);
        }
        out
    }
}

/// Fixed camera looking at the cloud from +z
#[derive(Debug, Clone, Copy)]
pub struct CloudCamera {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    /// Distance from the origin along +z
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl CloudCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: 75.0_f32.to_radians(),
            aspect,
            distance: 10.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Projection * view * model for the rotated cloud
    pub fn mvp(&self, yaw: f32, roll: f32) -> Mat4 {
        let projection = Mat4::perspective(self.fov_y, self.aspect, self.near, self.far);
        let view = Mat4::translation(0.0, 0.0, -self.distance);
        let model = Mat4::rotation_y(yaw).multiply(&Mat4::rotation_z(roll));
        projection.multiply(&view).multiply(&model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = Mat4::IDENTITY.transform(1.0, -2.0, 3.0);
        assert_eq!(p, [1.0, -2.0, 3.0, 1.0]);
    }

    #[test]
    fn multiplying_by_identity_is_a_noop() {
        let m = Mat4::rotation_y(0.7);
        assert_eq!(m.multiply(&Mat4::IDENTITY), m);
        assert_eq!(Mat4::IDENTITY.multiply(&m), m);
    }

    #[test]
    fn translation_moves_points() {
        let p = Mat4::translation(5.0, -1.0, 2.0).transform(1.0, 1.0, 1.0);
        assert_eq!(p, [6.0, 0.0, 3.0, 1.0]);
    }

    #[test]
    fn quarter_turn_yaw_maps_x_to_minus_z() {
        let p = Mat4::rotation_y(std::f32::consts::FRAC_PI_2).transform(1.0, 0.0, 0.0);
        assert!(close(p[0], 0.0) && close(p[1], 0.0) && close(p[2], -1.0));
    }

    #[test]
    fn quarter_turn_roll_maps_x_to_y() {
        let p = Mat4::rotation_z(std::f32::consts::FRAC_PI_2).transform(1.0, 0.0, 0.0);
        assert!(close(p[0], 0.0) && close(p[1], 1.0) && close(p[2], 0.0));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = CloudCamera::new(16.0 / 9.0);
        let clip = camera.mvp(0.0, 0.0).transform(0.0, 0.0, 0.0);
        // Centered in x/y with positive w (in front of the camera)
        assert!(close(clip[0], 0.0) && close(clip[1], 0.0));
        assert!(clip[3] > 0.0);
    }

    #[test]
    fn points_between_near_and_far_stay_in_depth_range() {
        let camera = CloudCamera::new(1.0);
        for z in [-5.0, 0.0, 5.0] {
            let clip = camera.mvp(0.0, 0.0).transform(0.0, 0.0, z);
            let depth = clip[2] / clip[3];
            assert!((0.0..=1.0).contains(&depth), "depth {} for z {}", depth, z);
        }
    }

    #[test]
    fn to_array_is_column_major() {
        let m = Mat4::translation(7.0, 8.0, 9.0);
        let a = m.to_array();
        assert_eq!(&a[12..15], &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn resize_ignores_degenerate_sizes() {
        let mut camera = CloudCamera::new(2.0);
        camera.resize(0.0, 600.0);
        assert_eq!(camera.aspect, 2.0);
        camera.resize(800.0, 400.0);
        assert_eq!(camera.aspect, 2.0);
        camera.resize(900.0, 300.0);
        assert_eq!(camera.aspect, 3.0);
    }
}
