//! GPU pipeline for one [`Material`].
//!
//! Each pass owns a uniform buffer, a sampler and two pipelines: one that
//! writes into an off-screen [`RenderTarget`](super::RenderTarget) and one
//! that writes into the window surface. Both test and write depth.
//!
//! Bind group 0 is rebuilt on every draw from the material's current sampler
//! slots, so rebinding a slot on the CPU side takes effect immediately.

use glam::Mat4;

use crate::gpu::GpuContext;
use crate::material::{Material, Uniforms};
use crate::mesh::{Mesh, Vertex3d};
use crate::render::target::DEPTH_FORMAT;

/// Color format of off-screen render targets: 8 bits per RGBA channel.
pub const RENDER_TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Uniform block layout shared by every material shader.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniforms {
    view_proj: [[f32; 4]; 4],
    resolution: [f32; 4],
    time: f32,
    progress: f32,
    _pad: [f32; 2],
}

impl MaterialUniforms {
    fn new(uniforms: &Uniforms, view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            resolution: uniforms.resolution.to_array(),
            time: uniforms.time,
            progress: uniforms.progress,
            _pad: [0.0; 2],
        }
    }
}

/// Compiled pipelines and buffers for one material.
pub struct MaterialPass {
    label: &'static str,
    target_pipeline: wgpu::RenderPipeline,
    screen_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    texture_count: usize,
}

impl MaterialPass {
    pub fn new(gpu: &GpuContext, material: &Material) -> Self {
        let device = &gpu.device;
        let texture_count = material.sampler_count();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} Shader", material.label)),
            source: wgpu::ShaderSource::Wgsl(material.shader.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Uniforms", material.label)),
            size: std::mem::size_of::<MaterialUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let address_mode = material.wrap.address_mode();
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", material.label)),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Uniforms, one texture per sampler slot, then the shared sampler.
        let mut entries = Vec::with_capacity(texture_count + 2);
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
        for slot in 0..texture_count {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: slot as u32 + 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
        }
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: texture_count as u32 + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} Bind Group Layout", material.label)),
            entries: &entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", material.label)),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let create_pipeline = |format: wgpu::TextureFormat, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: material.side.cull_mode(),
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let target_pipeline = create_pipeline(
            RENDER_TARGET_FORMAT,
            &format!("{} Target Pipeline", material.label),
        );
        let screen_pipeline = create_pipeline(
            gpu.config.format,
            &format!("{} Screen Pipeline", material.label),
        );

        Self {
            label: material.label,
            target_pipeline,
            screen_pipeline,
            bind_group_layout,
            uniform_buffer,
            sampler,
            texture_count,
        }
    }

    /// Upload `material`'s uniforms and draw `mesh` with it.
    ///
    /// `textures` must hold one view per sampler slot, in slot order.
    /// `to_screen` selects the pipeline built for the surface format.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        material: &Material,
        view_proj: Mat4,
        textures: &[&wgpu::TextureView],
        mesh: &Mesh,
        to_screen: bool,
    ) {
        if textures.len() != self.texture_count {
            log::error!(
                "{}: expected {} textures, got {}",
                self.label,
                self.texture_count,
                textures.len()
            );
            return;
        }

        let uniforms = MaterialUniforms::new(&material.uniforms, view_proj);
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut entries = Vec::with_capacity(self.texture_count + 2);
        entries.push(wgpu::BindGroupEntry {
            binding: 0,
            resource: self.uniform_buffer.as_entire_binding(),
        });
        for (slot, view) in textures.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: slot as u32 + 1,
                resource: wgpu::BindingResource::TextureView(*view),
            });
        }
        entries.push(wgpu::BindGroupEntry {
            binding: self.texture_count as u32 + 1,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Bind Group", self.label)),
            layout: &self.bind_group_layout,
            entries: &entries,
        });

        let pipeline = if to_screen {
            &self.screen_pipeline
        } else {
            &self.target_pipeline
        };
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[]);
        mesh.draw(render_pass);
    }
}
