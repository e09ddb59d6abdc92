//! Off-screen render targets and depth buffers.

use crate::gpu::GpuContext;
use crate::render::material_pass::RENDER_TARGET_FORMAT;

/// Format of every depth attachment.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A depth texture that follows the size of whatever it is attached to.
pub struct DepthBuffer {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    size: (u32, u32),
}

impl DepthBuffer {
    pub fn new(gpu: &GpuContext, width: u32, height: u32, label: &str) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            size: (width, height),
        }
    }

    /// Recreate the buffer if its size differs from `width × height`.
    pub fn ensure_size(&mut self, gpu: &GpuContext, width: u32, height: u32, label: &str) {
        if self.size != (width.max(1), height.max(1)) {
            *self = Self::new(gpu, width, height, label);
        }
    }
}

/// An off-screen color + depth pair that a scene renders into and a later
/// pass samples from.
///
/// The color texture is 8 bits per channel RGBA. Filtering is a property of
/// the sampler that reads it; the compositor samples targets linearly.
pub struct RenderTarget {
    label: &'static str,
    #[allow(dead_code)]
    texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) depth: DepthBuffer,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Allocate a `width × height` target. Zero dimensions are clamped to 1.
    pub fn new(gpu: &GpuContext, width: u32, height: u32, label: &'static str) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: RENDER_TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = DepthBuffer::new(gpu, width, height, &format!("{label} Depth"));

        Self {
            label,
            texture,
            view,
            depth,
            width,
            height,
        }
    }

    /// Reallocate color and depth if the size changed.
    ///
    /// The old textures are dropped; anything sampling them must rebind.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        if (self.width, self.height) != (width.max(1), height.max(1)) {
            log::debug!("reallocating {} at {}x{}", self.label, width, height);
            *self = Self::new(gpu, width, height, self.label);
        }
    }
}
