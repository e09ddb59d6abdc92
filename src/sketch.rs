//! The session: three scenes, two cameras and the frame driver.
//!
//! [`Sketch`] owns every piece of cross-frame state. The host calls
//! [`Sketch::tick`] once per display refresh and [`Sketch::on_resize`] when
//! the window changes size; everything GPU-side goes through the
//! [`FrameRenderer`] it is handed.

use glam::Vec4;

use crate::camera::{OrthographicCamera, PerspectiveCamera};
use crate::config::SketchConfig;
use crate::frame::{DriverState, FrameDriver, FrameScheduler};
use crate::geometry::Geometry;
use crate::material::{Material, RenderTargetId, SamplerBinding, Side, Wrap};
use crate::panel::{Settings, Slider};
use crate::render::FrameRenderer;
use crate::scene::{Scene, SceneId, SceneObject};

/// Sampler slot on the sphere and plane materials.
pub const TEXTURE_MAP: &str = "u_texture_map";
/// Compositor slot fed by render target A.
pub const SCENE_01: &str = "u_scene_01";
/// Compositor slot fed by render target B.
pub const SCENE_02: &str = "u_scene_02";

const SPHERE_SHADER: &str = include_str!("shaders/sphere.wgsl");
const PLANE_SHADER: &str = include_str!("shaders/plane.wgsl");
const COMPOSITE_SHADER: &str = include_str!("shaders/composite.wgsl");

/// A sphere seen from inside and a plane, blended by `progress`.
#[derive(Clone, Debug)]
pub struct Sketch {
    viewport: (u32, u32),
    camera: PerspectiveCamera,
    ortho: OrthographicCamera,
    sphere: Scene,
    plane: Scene,
    composite: Scene,
    settings: Settings,
    driver: FrameDriver,
}

impl Sketch {
    pub fn new(config: &SketchConfig) -> Self {
        let (width, height) = (config.width.max(1), config.height.max(1));

        let mut sphere = Scene::new(SceneId::Sphere);
        sphere.add(SceneObject::new(
            Geometry::sphere(10.0, 64, 32),
            Material::new("Sphere", SPHERE_SHADER)
                .side(Side::Back)
                .sampler(TEXTURE_MAP, SamplerBinding::Image(config.sphere_texture.clone())),
        ));

        let mut plane = Scene::new(SceneId::Plane);
        plane.add(SceneObject::new(
            Geometry::plane(2.0, 2.0, 32, 32),
            Material::new("Plane", PLANE_SHADER)
                .side(Side::Double)
                .sampler(TEXTURE_MAP, SamplerBinding::Image(config.plane_texture.clone())),
        ));

        let mut composite = Scene::new(SceneId::Composite);
        composite.add(SceneObject::new(
            Geometry::plane(1.0, 1.0, 1, 1),
            Material::new("Composite", COMPOSITE_SHADER)
                .side(Side::Double)
                .wrap(Wrap::Clamp)
                .sampler(SCENE_01, SamplerBinding::Empty)
                .sampler(SCENE_02, SamplerBinding::Empty),
        ));

        let mut sketch = Self {
            viewport: (width, height),
            camera: PerspectiveCamera::new(70.0, width as f32 / height as f32, 0.01, 100.0)
                .at(0.0, 0.0, 3.0),
            ortho: OrthographicCamera::frustum(1.0),
            sphere,
            plane,
            composite,
            settings: Settings {
                progress: Slider::progress().snap(config.progress),
            },
            driver: FrameDriver::new(config.time_step),
        };
        sketch.set_resolution(width, height);
        sketch
    }

    /// Run one frame.
    ///
    /// While running: advance time, push the time and progress uniforms,
    /// render the sphere into target A and the plane into target B (binding
    /// each to its compositor slot), render the compositor to the screen,
    /// then ask `scheduler` for the next frame. Returns `false` and does
    /// nothing at all while stopped.
    pub fn tick<R, S>(&mut self, renderer: &mut R, scheduler: &mut S) -> bool
    where
        R: FrameRenderer + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        let Some(time) = self.driver.advance() else {
            return false;
        };

        for material in self.sphere.materials_mut() {
            material.uniforms.time = time;
        }
        let progress = self.settings.progress;
        for material in self.composite.materials_mut() {
            material.uniforms.progress = progress;
        }

        renderer.render(&self.sphere, &self.camera, Some(RenderTargetId::A));
        self.bind_target(SCENE_01, RenderTargetId::A);

        renderer.render(&self.plane, &self.camera, Some(RenderTargetId::B));
        self.bind_target(SCENE_02, RenderTargetId::B);

        renderer.render(&self.composite, &self.ortho, None);

        scheduler.request_frame();
        true
    }

    /// Draw the compositor to the screen again without advancing.
    ///
    /// The targets keep their last images and the compositor keeps the
    /// uniforms of the last tick, so only the overlay can change. This is
    /// how a stopped sketch shows panel edits; the new `progress` is blended
    /// in on the next tick after resuming.
    pub fn repaint<R: FrameRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.render(&self.composite, &self.ortho, None);
    }

    fn bind_target(&mut self, slot: &str, target: RenderTargetId) {
        for material in self.composite.materials_mut() {
            if !material.set_sampler(slot, SamplerBinding::Target(target)) {
                log::warn!("{} has no sampler slot {slot}", material.label);
            }
        }
    }

    /// Stop advancing. The current frame stays on screen.
    pub fn pause(&mut self) {
        if self.driver.pause() {
            log::info!("paused at t = {:.2}", self.driver.time());
        }
    }

    /// Start advancing again and schedule the next frame.
    pub fn resume<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if self.driver.resume() {
            log::info!("resumed at t = {:.2}", self.driver.time());
            scheduler.request_frame();
        }
    }

    /// Toggle between running and stopped.
    pub fn toggle_pause<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if self.is_running() {
            self.pause();
        } else {
            self.resume(scheduler);
        }
    }

    /// Follow a viewport resize. Zero-sized viewports are ignored.
    ///
    /// Returns `true` if anything changed.
    pub fn on_resize<R: FrameRenderer + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        renderer: &mut R,
    ) -> bool {
        if width == 0 || height == 0 {
            log::debug!("ignoring {width}x{height} resize");
            return false;
        }

        self.viewport = (width, height);
        renderer.set_size(width, height);

        self.camera.aspect = width as f32 / height as f32;
        self.camera.update_projection_matrix();

        renderer.set_render_target_size(width, height);
        self.set_resolution(width, height);

        log::debug!("viewport resized to {width}x{height}");
        true
    }

    fn set_resolution(&mut self, width: u32, height: u32) {
        let (w, h) = (width as f32, height as f32);
        let resolution = Vec4::new(w, h, 1.0 / w, 1.0 / h);
        for scene in [&mut self.sphere, &mut self.plane, &mut self.composite] {
            for material in scene.materials_mut() {
                material.uniforms.resolution = resolution;
            }
        }
    }

    pub fn time(&self) -> f32 {
        self.driver.time()
    }

    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn ortho(&self) -> &OrthographicCamera {
        &self.ortho
    }

    pub fn scene(&self, id: SceneId) -> &Scene {
        match id {
            SceneId::Sphere => &self.sphere,
            SceneId::Plane => &self.plane,
            SceneId::Composite => &self.composite,
        }
    }

    /// All scenes in render order.
    pub fn scenes(&self) -> [&Scene; 3] {
        [&self.sphere, &self.plane, &self.composite]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;
    use crate::frame::TIME_STEP;
    use crate::texture::TextureSource;

    /// One `render` call as the renderer saw it.
    struct Call {
        scene: SceneId,
        target: Option<RenderTargetId>,
        material: Material,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<Call>,
        size: (u32, u32),
        target_size: (u32, u32),
    }

    impl FrameRenderer for RecordingRenderer {
        fn render(&mut self, scene: &Scene, _camera: &dyn Projection, target: Option<RenderTargetId>) {
            self.calls.push(Call {
                scene: scene.id(),
                target,
                material: scene.objects()[0].material.clone(),
            });
        }

        fn set_size(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn set_render_target_size(&mut self, width: u32, height: u32) {
            self.target_size = (width, height);
        }
    }

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn sketch() -> Sketch {
        Sketch::new(&SketchConfig::default())
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn time_is_step_times_ticks() {
        let mut sketch = sketch();
        let (mut renderer, mut scheduler) = (RecordingRenderer::default(), CountingScheduler::default());
        assert_eq!(sketch.time(), 0.0);

        for n in 1..=40u32 {
            assert!(sketch.tick(&mut renderer, &mut scheduler));
            assert_eq!(sketch.time(), n as f32 * TIME_STEP);
        }
        assert_eq!(scheduler.requests, 40);
    }

    #[test]
    fn pause_and_resume_scenario() {
        let mut sketch = sketch();
        let (mut renderer, mut scheduler) = (RecordingRenderer::default(), CountingScheduler::default());

        for _ in 0..10 {
            sketch.tick(&mut renderer, &mut scheduler);
        }
        assert!(close(sketch.time(), 0.5));

        sketch.pause();
        assert_eq!(sketch.state(), DriverState::Stopped);
        let calls = renderer.calls.len();
        let requests = scheduler.requests;
        for _ in 0..5 {
            assert!(!sketch.tick(&mut renderer, &mut scheduler));
        }
        assert!(close(sketch.time(), 0.5));
        assert_eq!(renderer.calls.len(), calls);
        assert_eq!(scheduler.requests, requests);

        sketch.resume(&mut scheduler);
        assert_eq!(scheduler.requests, requests + 1);
        assert!(close(sketch.time(), 0.5));

        sketch.tick(&mut renderer, &mut scheduler);
        assert!(close(sketch.time(), 0.55));
        assert_eq!(sketch.time(), 11.0 * TIME_STEP);
    }

    #[test]
    fn resume_while_running_does_not_double_schedule() {
        let mut sketch = sketch();
        let mut scheduler = CountingScheduler::default();
        sketch.resume(&mut scheduler);
        assert_eq!(scheduler.requests, 0);

        sketch.toggle_pause(&mut scheduler);
        assert!(!sketch.is_running());
        sketch.toggle_pause(&mut scheduler);
        assert!(sketch.is_running());
        assert_eq!(scheduler.requests, 1);
    }

    #[test]
    fn tick_renders_scenes_in_order_into_their_targets() {
        let mut sketch = sketch();
        let (mut renderer, mut scheduler) = (RecordingRenderer::default(), CountingScheduler::default());
        sketch.tick(&mut renderer, &mut scheduler);

        let order: Vec<_> = renderer.calls.iter().map(|c| (c.scene, c.target)).collect();
        assert_eq!(
            order,
            vec![
                (SceneId::Sphere, Some(RenderTargetId::A)),
                (SceneId::Plane, Some(RenderTargetId::B)),
                (SceneId::Composite, None),
            ]
        );
    }

    #[test]
    fn targets_feed_their_own_compositor_slots() {
        let mut sketch = sketch();
        let composite = sketch.scene(SceneId::Composite).materials().next().unwrap();
        assert_eq!(composite.sampler_binding(SCENE_01), Some(&SamplerBinding::Empty));
        assert_eq!(composite.sampler_binding(SCENE_02), Some(&SamplerBinding::Empty));

        let (mut renderer, mut scheduler) = (RecordingRenderer::default(), CountingScheduler::default());
        sketch.tick(&mut renderer, &mut scheduler);

        let drawn = &renderer.calls[2].material;
        assert_eq!(
            drawn.sampler_binding(SCENE_01),
            Some(&SamplerBinding::Target(RenderTargetId::A))
        );
        assert_eq!(
            drawn.sampler_binding(SCENE_02),
            Some(&SamplerBinding::Target(RenderTargetId::B))
        );

        // Neither offscreen scene samples a render target.
        for call in &renderer.calls[..2] {
            assert!(call
                .material
                .sampler_bindings()
                .all(|b| !matches!(b, SamplerBinding::Target(_))));
        }
    }

    #[test]
    fn progress_reaches_compositor_on_next_tick() {
        let mut sketch = sketch();
        let (mut renderer, mut scheduler) = (RecordingRenderer::default(), CountingScheduler::default());

        for value in [0.0, 0.3, 1.0] {
            sketch.settings_mut().progress = value;
            renderer.calls.clear();
            sketch.tick(&mut renderer, &mut scheduler);

            assert_eq!(renderer.calls[2].material.uniforms.progress, value);
            // Offscreen scenes keep their own progress.
            assert_eq!(renderer.calls[0].material.uniforms.progress, 0.6);
            assert_eq!(renderer.calls[1].material.uniforms.progress, 0.6);
        }
    }

    #[test]
    fn sphere_sees_current_time() {
        let mut sketch = sketch();
        let (mut renderer, mut scheduler) = (RecordingRenderer::default(), CountingScheduler::default());
        sketch.tick(&mut renderer, &mut scheduler);
        sketch.tick(&mut renderer, &mut scheduler);

        let sphere = &renderer.calls[3].material;
        assert_eq!(sphere.uniforms.time, sketch.time());
        assert_eq!(renderer.calls[4].material.uniforms.time, 0.0);
    }

    #[test]
    fn resize_updates_camera_surface_targets_and_resolution() {
        let mut sketch = sketch();
        let mut renderer = RecordingRenderer::default();
        let ortho_before = sketch.ortho().projection_matrix();

        assert!(sketch.on_resize(1024, 512, &mut renderer));
        assert_eq!(sketch.viewport(), (1024, 512));
        assert_eq!(sketch.camera().aspect, 2.0);
        assert_eq!(renderer.size(), (1024, 512));
        assert_eq!(renderer.target_size, (1024, 512));

        let expected = Vec4::new(1024.0, 512.0, 1.0 / 1024.0, 1.0 / 512.0);
        for scene in sketch.scenes() {
            for material in scene.materials() {
                assert_eq!(material.uniforms.resolution, expected);
            }
        }

        // The unit frustum is left alone.
        assert_eq!(sketch.ortho().projection_matrix(), ortho_before);
    }

    #[test]
    fn resize_recomputes_perspective_projection() {
        let mut sketch = sketch();
        let mut renderer = RecordingRenderer::default();
        let before = sketch.camera().projection_matrix();

        sketch.on_resize(600, 600, &mut renderer);
        assert_ne!(sketch.camera().projection_matrix(), before);
        assert_eq!(sketch.camera().aspect, 1.0);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut sketch = sketch();
        let mut renderer = RecordingRenderer::default();

        assert!(!sketch.on_resize(0, 300, &mut renderer));
        assert!(!sketch.on_resize(300, 0, &mut renderer));
        assert_eq!(sketch.viewport(), (800, 600));
        assert_eq!(renderer.size(), (0, 0));
        assert_eq!(sketch.camera().aspect, 800.0 / 600.0);
    }

    #[test]
    fn scenes_are_built_from_config() {
        let config = SketchConfig::default()
            .sphere_texture(TextureSource::Horizon)
            .progress(1.5);
        let sketch = Sketch::new(&config);

        assert_eq!(sketch.settings().progress, 1.0);
        assert_eq!(sketch.camera().fov, 70.0);
        assert_eq!(sketch.camera().position, glam::Vec3::new(0.0, 0.0, 3.0));

        let sphere = &sketch.scene(SceneId::Sphere).objects()[0];
        assert_eq!(sphere.material.side, Side::Back);
        assert_eq!(sphere.geometry.vertices.len(), 65 * 33);
        assert_eq!(
            sphere.material.sampler_binding(TEXTURE_MAP),
            Some(&SamplerBinding::Image(TextureSource::Horizon))
        );

        let plane = &sketch.scene(SceneId::Plane).objects()[0];
        assert_eq!(plane.material.side, Side::Double);
        assert_eq!(plane.geometry.vertices.len(), 33 * 33);

        let composite = &sketch.scene(SceneId::Composite).objects()[0];
        assert_eq!(composite.material.wrap, Wrap::Clamp);
        assert_eq!(composite.geometry.bounds().1.x, 0.5);
    }

    #[test]
    fn repaint_while_stopped_draws_compositor_only() {
        let mut sketch = sketch();
        let (mut renderer, mut scheduler) = (RecordingRenderer::default(), CountingScheduler::default());
        for _ in 0..3 {
            sketch.tick(&mut renderer, &mut scheduler);
        }
        sketch.pause();
        let (time, requests) = (sketch.time(), scheduler.requests);

        sketch.settings_mut().progress = 0.2;
        renderer.calls.clear();
        sketch.repaint(&mut renderer);

        assert_eq!(renderer.calls.len(), 1);
        let call = &renderer.calls[0];
        assert_eq!((call.scene, call.target), (SceneId::Composite, None));
        assert_eq!(
            call.material.sampler_binding(SCENE_01),
            Some(&SamplerBinding::Target(RenderTargetId::A))
        );
        assert_eq!(call.material.uniforms.progress, 0.5);
        assert_eq!(sketch.time(), time);
        assert_eq!(scheduler.requests, requests);

        sketch.resume(&mut scheduler);
        renderer.calls.clear();
        sketch.tick(&mut renderer, &mut scheduler);
        assert_eq!(renderer.calls[2].material.uniforms.progress, 0.2);
    }
}
