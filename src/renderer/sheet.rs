use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::sprites::SpriteFrame;

/// GPU-side copy of the actor sprite sheet, plus the dimensions needed to turn
/// pixel-space frame rectangles into UV coordinates.
pub struct SpriteSheet {
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl SpriteSheet {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("sprite_sheet"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img,
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Nearest keeps the pixel-art frames crisp when scaled up to tile size.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture_view, sampler, width, height }
    }

    /// Returns (uv_min, uv_max) for a frame's pixel rectangle on the sheet.
    pub fn uv_for_frame(&self, frame: &SpriteFrame) -> ([f32; 2], [f32; 2]) {
        let w = self.width as f32;
        let h = self.height as f32;

        let u_min = frame.x as f32 / w;
        let v_min = frame.y as f32 / h;
        let u_max = (frame.x + frame.width) as f32 / w;
        let v_max = (frame.y + frame.height) as f32 / h;

        ([u_min, v_min], [u_max, v_max])
    }
}
