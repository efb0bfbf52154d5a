use glam::Vec2;

/// Camera uniform uploaded to the GPU — contains the combined view-projection matrix.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [sx,  0,   0,  0]
/// col1: [0,   sy,  0,  0]
/// col2: [0,   0,   1,  0]
/// col3: [tx,  ty,  0,  1]
/// ```
/// where `sx = 2/w`, `sy = -2/h`, `tx = -sx*ox - 1`, `ty = -sy*oy + 1`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Column-major 4×4 view-projection matrix sent to the vertex shader.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Plain orthographic projection (zero camera offset).
    /// Maps pixel coords [0..w] × [0..h] directly to clip space.
    /// The non-scrolling demo variant renders with this every frame.
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

/// 2D follow camera: a world-space viewport offset recomputed each frame from
/// the tracked actor, clamped so the viewport never leaves the world rectangle.
pub struct Camera {
    /// World-space top-left corner of the visible region, in pixels.
    pub offset: Vec2,
    viewport_w: f32,
    viewport_h: f32,
}

impl Camera {
    pub fn new(viewport_w: f32, viewport_h: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport_w,
            viewport_h,
        }
    }

    pub fn viewport_size(&self) -> Vec2 {
        Vec2::new(self.viewport_w, self.viewport_h)
    }

    /// Centre the viewport on a tile-sized actor whose top-left corner is at
    /// `target`, then clamp the offset to `[0, world − viewport]` per axis.
    ///
    /// `min` runs before `max`, so a world smaller than the viewport pins the
    /// offset to 0 instead of going negative. The result depends only on
    /// `target` and the static dimensions; re-applying it is a no-op.
    pub fn center_on(
        &mut self,
        target: Vec2,
        tile_w: u32,
        tile_h: u32,
        world_w: f32,
        world_h: f32,
    ) {
        let x = target.x - self.viewport_w / 2.0 + tile_w as f32 / 2.0;
        let y = target.y - self.viewport_h / 2.0 + tile_h as f32 / 2.0;
        self.offset = Vec2::new(
            x.min(world_w - self.viewport_w).max(0.0),
            y.min(world_h - self.viewport_h).max(0.0),
        );
    }

    /// Build the GPU-ready `CameraUniform` for the current offset.
    ///
    /// Derivation (y-down pixel space → NDC, `ox, oy` = offset):
    /// ```text
    /// x_ndc = (2/w) * (world_x − ox) − 1     ⇒ sx = 2/w,  tx = -sx*ox - 1
    /// y_ndc = 1 − (2/h) * (world_y − oy)     ⇒ sy = -2/h, ty = -sy*oy + 1
    /// ```
    /// A world point at the offset lands at NDC (−1, 1), the top-left corner
    /// of the surface. ✓
    pub fn build_view_proj(&self) -> CameraUniform {
        let sx = 2.0 / self.viewport_w;
        let sy = -2.0 / self.viewport_h;
        let tx = -sx * self.offset.x - 1.0;
        let ty = -sy * self.offset.y + 1.0;

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
