use cgmath::{ortho, Matrix4, Point3, Vector2, Vector3};

/// 2D orthographic camera.
///
/// The projection spans a fixed world-space window; the view looks down the
/// negative Z axis from the camera's 2D position.
pub struct Camera {
    pub position: Vector2<f32>,
    projection: Matrix4<f32>,
}

impl Camera {
    pub fn new(position: Vector2<f32>) -> Self {
        Self {
            position,
            projection: ortho(0.0, 32.0 * 40.0, 0.0, 32.0 * 21.0, 0.0, 100.0),
        }
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::new(self.position.x, self.position.y, 20.0),
            Point3::new(self.position.x, self.position.y, -1.0),
            Vector3::unit_y(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cgmath::Vector4;

    fn project(camera: &Camera, world: Vector3<f32>) -> Vector2<f32> {
        let clip = camera.projection_matrix()
            * camera.view_matrix()
            * Vector4::new(world.x, world.y, world.z, 1.0);

        Vector2::new(clip.x / clip.w, clip.y / clip.w)
    }

    #[test]
    fn origin_camera_maps_frustum_corners_to_ndc() {
        let camera = Camera::new(Vector2::new(0.0, 0.0));

        let bottom_left = project(&camera, Vector3::new(0.0, 0.0, 0.0));
        let top_right = project(&camera, Vector3::new(1280.0, 672.0, 0.0));

        assert!((bottom_left.x - -1.0).abs() < 1e-5);
        assert!((bottom_left.y - -1.0).abs() < 1e-5);
        assert!((top_right.x - 1.0).abs() < 1e-5);
        assert!((top_right.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn moving_the_camera_shifts_the_view() {
        let centered = Camera::new(Vector2::new(0.0, 0.0));
        let shifted = Camera::new(Vector2::new(100.0, 0.0));

        let p0 = project(&centered, Vector3::new(0.0, 0.0, 0.0));
        let p1 = project(&shifted, Vector3::new(100.0, 0.0, 0.0));

        // A point 100 units right of a camera 100 units right lands where
        // the origin landed for the centered camera.
        assert!((p0.x - p1.x).abs() < 1e-5);
        assert!((p0.y - p1.y).abs() < 1e-5);
    }
}
