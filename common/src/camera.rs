//! Camera for 2D simulations

use glam::{Mat4, Vec3};

/// 2D orthographic camera
///
/// `zoom` is the half-height of the visible region in world units; the
/// half-width follows from the aspect ratio.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec3,
    pub zoom: f32,
    pub aspect_ratio: f32,
}

impl Camera2D {
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            zoom: 1.0,
            aspect_ratio,
        }
    }

    /// Camera centred on the origin that keeps a square of side
    /// `2 * half_extent` fully visible at any aspect ratio.
    pub fn framing(half_extent: f32, aspect_ratio: f32) -> Self {
        let mut camera = Self::new(aspect_ratio);
        camera.frame_square(half_extent);
        camera
    }

    /// Adjust zoom so `[-half_extent, half_extent]²` fits the viewport.
    pub fn frame_square(&mut self, half_extent: f32) {
        self.zoom = if self.aspect_ratio >= 1.0 {
            half_extent
        } else {
            half_extent / self.aspect_ratio
        };
    }

    /// Get the view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        let half_width = self.zoom * self.aspect_ratio;
        let half_height = self.zoom;

        let projection = Mat4::orthographic_rh(
            -half_width,
            half_width,
            -half_height,
            half_height,
            -1.0,
            1.0,
        );

        let view = Mat4::from_translation(-self.position);

        projection * view
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn framed_square_corner_lands_inside_clip_space() {
        let camera = Camera2D::framing(3.0, 16.0 / 9.0);
        let corner = camera.view_projection().project_point3(Vec3::new(3.0, 3.0, 0.0));
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-6);
        assert!(corner.x <= 1.0);
    }

    #[test]
    fn portrait_viewport_widens_zoom() {
        let camera = Camera2D::framing(3.0, 0.5);
        assert_relative_eq!(camera.zoom, 6.0);
        let corner = camera.view_projection().project_point3(Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-6);
    }
}
