//! Flat 2D overlay: colored rectangles drawn over the final frame.

use crate::gpu::GpuContext;

/// A rectangle in screen-space pixel coordinates, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside the rectangle, edges included.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// RGBA color with straight alpha, components in sRGB space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub fn hex(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    /// Semi-transparent dark background for panels.
    pub const PANEL_BG: Color = Color::rgba(0.1, 0.1, 0.1, 0.85);
    /// Panel border.
    pub const PANEL_BORDER: Color = Color::rgba(0.4, 0.4, 0.4, 1.0);
    /// Slider track.
    pub const TRACK: Color = Color::rgba(0.25, 0.25, 0.25, 1.0);
    /// Filled part of a slider.
    pub const ACCENT: Color = Color::rgba(0.18, 0.63, 0.85, 1.0);

    /// Convert to a linear wgpu clear color.
    ///
    /// Surfaces and render targets use sRGB formats, so clear values must be
    /// linear to come out as the literal color on screen.
    pub fn to_linear(self) -> wgpu::Color {
        wgpu::Color {
            r: srgb_to_linear(self.r) as f64,
            g: srgb_to_linear(self.g) as f64,
            b: srgb_to_linear(self.b) as f64,
            a: self.a as f64,
        }
    }

    fn to_linear_array(self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a,
        ]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// A GUI element that the overlay can draw.
#[derive(Clone, Debug, PartialEq)]
pub enum GuiComponent {
    /// A background pane with an optional one-pixel border.
    FloatingPane {
        rect: Rect,
        background: Color,
        border: Option<Color>,
    },
    /// A simple colored rectangle.
    Quad { rect: Rect, color: Color },
}

impl GuiComponent {
    pub fn pane(rect: Rect) -> Self {
        GuiComponent::FloatingPane {
            rect,
            background: Color::PANEL_BG,
            border: Some(Color::PANEL_BORDER),
        }
    }

    pub fn quad(rect: Rect, color: Color) -> Self {
        GuiComponent::Quad { rect, color }
    }
}

/// Vertex for overlay quads.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct OverlayVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl OverlayVertex {
    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<OverlayVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct OverlayUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

const MAX_VERTICES: usize = 4096;

/// CPU-side triangle list built from [`GuiComponent`]s.
#[derive(Debug, Default)]
struct QuadBatch {
    vertices: Vec<OverlayVertex>,
}

impl QuadBatch {
    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn add(&mut self, component: &GuiComponent) {
        match component {
            GuiComponent::FloatingPane {
                rect,
                background,
                border,
            } => {
                self.push_quad(rect, background);

                if let Some(border) = border {
                    let w = 1.0;
                    self.push_quad(&Rect::new(rect.x, rect.y, rect.width, w), border);
                    self.push_quad(&Rect::new(rect.x, rect.bottom() - w, rect.width, w), border);
                    self.push_quad(&Rect::new(rect.x, rect.y, w, rect.height), border);
                    self.push_quad(&Rect::new(rect.right() - w, rect.y, w, rect.height), border);
                }
            }
            GuiComponent::Quad { rect, color } => self.push_quad(rect, color),
        }
    }

    fn push_quad(&mut self, rect: &Rect, color: &Color) {
        if self.vertices.len() + 6 > MAX_VERTICES {
            log::warn!("overlay vertex budget of {MAX_VERTICES} exhausted, dropping quad");
            return;
        }

        let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
        let color = color.to_linear_array();
        for position in [[x0, y0], [x1, y0], [x0, y1], [x1, y0], [x1, y1], [x0, y1]] {
            self.vertices.push(OverlayVertex { position, color });
        }
    }
}

/// Draws queued GUI components on top of the screen image.
///
/// Runs in its own render pass without depth, loading whatever the scene
/// pass left in the surface texture.
pub struct OverlayPass {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    batch: QuadBatch,
}

impl OverlayPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/ui.wgsl").into()),
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Vertex Buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<OverlayVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Uniforms"),
            size: std::mem::size_of::<OverlayUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Overlay Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Overlay Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[OverlayVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            bind_group,
            batch: QuadBatch::default(),
        }
    }

    /// Replace everything queued with `components`.
    pub fn set_components(&mut self, components: &[GuiComponent]) {
        self.batch.clear();
        for component in components {
            self.batch.add(component);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.batch.vertices.is_empty()
    }

    /// Draw the queued components.
    pub fn render(&self, gpu: &GpuContext, render_pass: &mut wgpu::RenderPass) {
        if self.is_empty() {
            return;
        }

        let uniforms = OverlayUniforms {
            resolution: [gpu.width() as f32, gpu.height() as f32],
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        gpu.queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(&self.batch.vertices),
        );

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.batch.vertices.len() as u32, 0..1);
    }
}
