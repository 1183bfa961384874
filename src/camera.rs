use glam::Vec2;

use crate::geometry::Rect;

/// Camera uniform uploaded to the GPU: the combined view-projection matrix.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [sx,  0,   0,  0]
/// col1: [0,   sy,  0,  0]
/// col2: [0,   0,   1,  0]
/// col3: [tx,  ty,  0,  1]
/// ```
/// where `sx = 2z/w`, `sy = -2z/h`, `tx = -sx*cx`, `ty = -sy*cy`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Column-major 4×4 view-projection matrix sent to the vertex shader.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Plain orthographic projection (no camera transform).
    /// Maps pixel coords [0..w] × [0..h] directly to clip space.
    /// Used for the UI pass so that UI is always screen-fixed.
    pub fn identity_ortho(width: f32, height: f32) -> Self {
        let sx = 2.0 / width;
        let sy = -2.0 / height;
        Self {
            view_proj: [
                [sx,   0.0,  0.0, 0.0], // col0
                [0.0,  sy,   0.0, 0.0], // col1
                [0.0,  0.0,  1.0, 0.0], // col2
                [-1.0, 1.0,  0.0, 1.0], // col3
            ],
        }
    }
}

/// 2D camera: follows a world-space point with smooth zoom, kept inside
/// optional world bounds.
#[derive(Clone, Debug)]
pub struct Camera {
    /// World-space pixel position the camera is centered on.
    pub position: Vec2,
    /// Current zoom level (1.0 = 1:1, >1 zooms in, <1 zooms out).
    pub zoom: f32,
    /// Smooth-zoom lerp target; `set_target_zoom` writes here.
    pub(crate) target_zoom: f32,
    /// World rectangle the view must stay inside.
    pub(crate) bounds: Option<Rect>,
}

impl Camera {
    pub fn new(center_x: f32, center_y: f32) -> Self {
        Self {
            position: Vec2::new(center_x, center_y),
            zoom: 1.0,
            target_zoom: 1.0,
            bounds: None,
        }
    }

    /// Set the zoom immediately, cancelling any zoom animation.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(0.05);
        self.target_zoom = self.zoom;
    }

    /// Set the zoom target. The camera eases toward it in `tick`.
    pub fn set_target_zoom(&mut self, zoom: f32) {
        self.target_zoom = zoom.max(0.05);
    }

    pub fn target_zoom(&self) -> f32 { self.target_zoom }

    /// Move the zoom target by `delta`, clamped into `[min, max]`.
    pub fn zoom_by(&mut self, delta: f32, min: f32, max: f32) {
        self.target_zoom = (self.target_zoom + delta).clamp(min, max);
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    /// Centre the view on `target`, then pull it back inside the bounds.
    pub fn follow(&mut self, target: Vec2, viewport: Vec2) {
        self.position = target;
        self.clamp_to_bounds(viewport);
    }

    /// Keep the visible area inside the bounds. On an axis where the bounds
    /// are smaller than the view, the camera centres on the bounds instead.
    pub fn clamp_to_bounds(&mut self, viewport: Vec2) {
        let Some(b) = self.bounds else { return };
        let half = viewport / (2.0 * self.zoom.max(0.01));

        self.position.x = if b.w <= half.x * 2.0 {
            b.center().x
        } else {
            self.position.x.clamp(b.left() + half.x, b.right() - half.x)
        };
        self.position.y = if b.h <= half.y * 2.0 {
            b.center().y
        } else {
            self.position.y.clamp(b.top() + half.y, b.bottom() - half.y)
        };
    }

    /// Advance the zoom animation by `dt` seconds (converges at ~8× per second)
    /// and re-apply the bounds, since the visible area changes with zoom.
    pub fn tick(&mut self, dt: f32, viewport: Vec2) {
        let speed = 8.0_f32;
        self.zoom += (self.target_zoom - self.zoom) * (speed * dt).min(1.0);
        self.clamp_to_bounds(viewport);
    }

    /// World rectangle currently visible through a viewport of the given size.
    pub fn visible_rect(&self, viewport: Vec2) -> Rect {
        let size = viewport / self.zoom.max(0.01);
        Rect::from_pos_size(self.position - size * 0.5, size)
    }

    /// Build the GPU-ready `CameraUniform` for the given viewport dimensions.
    ///
    /// The resulting matrix maps world-space pixel coordinates so that
    /// `self.position` lands at screen center, with the visible region scaled
    /// by `self.zoom`.
    ///
    /// Derivation (y-down pixel space → NDC):
    /// ```text
    /// x_ndc = sx * world_x + tx    (sx = 2z/w,  tx = -sx*cx)
    /// y_ndc = sy * world_y + ty    (sy = -2z/h, ty = -sy*cy)
    /// ```
    pub fn build_view_proj(&self, width: f32, height: f32) -> CameraUniform {
        let cx = self.position.x;
        let cy = self.position.y;
        let z = self.zoom.max(0.01);

        let sx = 2.0 * z / width;
        let sy = -2.0 * z / height;
        let tx = -sx * cx;
        let ty = -sy * cy;

        CameraUniform {
            view_proj: [
                [sx,  0.0, 0.0, 0.0], // col0
                [0.0, sy,  0.0, 0.0], // col1
                [0.0, 0.0, 1.0, 0.0], // col2
                [tx,  ty,  0.0, 1.0], // col3
            ],
        }
    }
}
