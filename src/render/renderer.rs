use std::collections::HashMap;

use crate::camera::Projection;
use crate::gpu::GpuContext;
use crate::material::{RenderTargetId, SamplerBinding};
use crate::mesh::Mesh;
use crate::render::material_pass::MaterialPass;
use crate::render::target::{DepthBuffer, RenderTarget};
use crate::render::FrameRenderer;
use crate::scene::{Scene, SceneId};
use crate::texture::{Texture, TextureSource};
use crate::ui::{Color, OverlayPass};

/// GPU resources for one scene object.
struct GpuObject {
    mesh: Mesh,
    pass: MaterialPass,
}

/// wgpu implementation of [`FrameRenderer`].
///
/// Meshes and pipelines are built once per scene object up front. Material
/// values and sampler slots are read from the [`Scene`] on every draw.
pub struct GpuRenderer {
    gpu: GpuContext,
    clear_color: wgpu::Color,
    targets: [RenderTarget; 2],
    screen_depth: DepthBuffer,
    objects: HashMap<SceneId, Vec<GpuObject>>,
    textures: HashMap<TextureSource, Texture>,
    white: Texture,
    overlay: OverlayPass,
}

impl GpuRenderer {
    pub fn new(gpu: GpuContext, scenes: &[&Scene], clear_color: Color) -> Self {
        let (width, height) = (gpu.width(), gpu.height());
        let targets = [
            RenderTarget::new(&gpu, width, height, "Render Target A"),
            RenderTarget::new(&gpu, width, height, "Render Target B"),
        ];
        let screen_depth = DepthBuffer::new(&gpu, width, height, "Screen Depth");
        let white = Texture::white(&gpu);
        let overlay = OverlayPass::new(&gpu);

        let mut objects = HashMap::new();
        let mut textures = HashMap::new();
        for scene in scenes {
            let fallback = fallback_texture(scene.id());

            let mut gpu_objects = Vec::with_capacity(scene.objects().len());
            for object in scene.objects() {
                let material = &object.material;
                for binding in material.sampler_bindings() {
                    if let SamplerBinding::Image(source) = binding {
                        if !textures.contains_key(source) {
                            let texture = Texture::load(&gpu, source, &fallback);
                            textures.insert(source.clone(), texture);
                        }
                    }
                }

                gpu_objects.push(GpuObject {
                    mesh: Mesh::from_geometry(&gpu, &object.geometry, material.label),
                    pass: MaterialPass::new(&gpu, material),
                });
            }
            objects.insert(scene.id(), gpu_objects);
        }

        log::info!(
            "renderer ready: {} scenes, {} textures, {}x{}",
            objects.len(),
            textures.len(),
            width,
            height
        );

        Self {
            gpu,
            clear_color: clear_color.to_linear(),
            targets,
            screen_depth,
            objects,
            textures,
            white,
            overlay,
        }
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayPass {
        &mut self.overlay
    }

    /// View to bind for a sampler slot while drawing into `drawing_into`.
    fn resolve(&self, binding: &SamplerBinding, drawing_into: Option<RenderTargetId>) -> &wgpu::TextureView {
        match view_source(binding, drawing_into) {
            ViewSource::White => &self.white.view,
            ViewSource::Image(source) => self
                .textures
                .get(source)
                .map(|texture| &texture.view)
                .unwrap_or(&self.white.view),
            ViewSource::Feedback(id) => {
                log::warn!("render target {id:?} sampled while drawing into it, binding white");
                &self.white.view
            }
            ViewSource::Target(id) => &self.targets[id.index()].view,
        }
    }

    fn draw_scene(
        &self,
        render_pass: &mut wgpu::RenderPass,
        scene: &Scene,
        objects: &[GpuObject],
        camera: &dyn Projection,
        target: Option<RenderTargetId>,
    ) {
        let view_proj = camera.view_projection();
        for (object, gpu_object) in scene.objects().iter().zip(objects) {
            let material = &object.material;
            let views: Vec<&wgpu::TextureView> = material
                .sampler_bindings()
                .map(|binding| self.resolve(binding, target))
                .collect();
            gpu_object.pass.draw(
                &self.gpu,
                render_pass,
                material,
                view_proj,
                &views,
                &gpu_object.mesh,
                target.is_none(),
            );
        }
    }

    fn begin_scene_pass<'a>(
        &self,
        encoder: &'a mut wgpu::CommandEncoder,
        color: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        label: &str,
    ) -> wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

/// Procedural texture used for a scene's images when a file fails to load.
pub(crate) fn fallback_texture(scene: SceneId) -> TextureSource {
    match scene {
        SceneId::Sphere => TextureSource::Horizon,
        SceneId::Plane | SceneId::Composite => TextureSource::UvGrid,
    }
}

/// Where the view for one sampler slot comes from.
#[derive(Debug, PartialEq)]
enum ViewSource<'a> {
    White,
    Image(&'a TextureSource),
    Target(RenderTargetId),
    /// The slot samples the target being drawn into.
    Feedback(RenderTargetId),
}

fn view_source(binding: &SamplerBinding, drawing_into: Option<RenderTargetId>) -> ViewSource<'_> {
    match binding {
        SamplerBinding::Empty => ViewSource::White,
        SamplerBinding::Image(source) => ViewSource::Image(source),
        SamplerBinding::Target(id) if Some(*id) == drawing_into => ViewSource::Feedback(*id),
        SamplerBinding::Target(id) => ViewSource::Target(*id),
    }
}

impl FrameRenderer for GpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &dyn Projection, target: Option<RenderTargetId>) {
        let Some(objects) = self.objects.get(&scene.id()) else {
            log::warn!("no GPU resources for scene {:?}", scene.id());
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        match target {
            Some(id) => {
                let render_target = &self.targets[id.index()];
                {
                    let mut pass = self.begin_scene_pass(
                        &mut encoder,
                        &render_target.view,
                        &render_target.depth.view,
                        "Render Target Pass",
                    );
                    self.draw_scene(&mut pass, scene, objects, camera, target);
                }
                self.gpu.queue.submit(std::iter::once(encoder.finish()));
            }
            None => {
                let output = match self.gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        log::warn!("surface lost or outdated, reconfiguring");
                        self.gpu.reconfigure();
                        return;
                    }
                    Err(err) => {
                        log::error!("failed to acquire surface texture: {err}");
                        return;
                    }
                };
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                {
                    let mut pass = self.begin_scene_pass(
                        &mut encoder,
                        &view,
                        &self.screen_depth.view,
                        "Screen Pass",
                    );
                    self.draw_scene(&mut pass, scene, objects, camera, None);
                }

                if !self.overlay.is_empty() {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Overlay Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            depth_slice: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });
                    self.overlay.render(&self.gpu, &mut pass);
                }

                self.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();
            }
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        let (width, height) = (self.gpu.width(), self.gpu.height());
        self.screen_depth
            .ensure_size(&self.gpu, width, height, "Screen Depth");
    }

    fn size(&self) -> (u32, u32) {
        (self.gpu.width(), self.gpu.height())
    }

    fn set_render_target_size(&mut self, width: u32, height: u32) {
        for target in &mut self.targets {
            target.resize(&self.gpu, width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_falls_back_to_horizon_and_plane_to_grid() {
        assert_eq!(fallback_texture(SceneId::Sphere), TextureSource::Horizon);
        assert_eq!(fallback_texture(SceneId::Plane), TextureSource::UvGrid);
    }

    #[test]
    fn sampling_the_target_being_drawn_is_feedback() {
        let a = SamplerBinding::Target(RenderTargetId::A);
        assert_eq!(view_source(&a, Some(RenderTargetId::A)), ViewSource::Feedback(RenderTargetId::A));
        assert_eq!(view_source(&a, Some(RenderTargetId::B)), ViewSource::Target(RenderTargetId::A));
        assert_eq!(view_source(&a, None), ViewSource::Target(RenderTargetId::A));
    }

    #[test]
    fn empty_and_image_slots_resolve_without_targets() {
        assert_eq!(view_source(&SamplerBinding::Empty, Some(RenderTargetId::A)), ViewSource::White);

        let image = SamplerBinding::Image(TextureSource::UvGrid);
        assert_eq!(
            view_source(&image, Some(RenderTargetId::B)),
            ViewSource::Image(&TextureSource::UvGrid)
        );
    }
}
