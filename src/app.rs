use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::SketchConfig;
use crate::error::SketchError;
use crate::frame::FrameScheduler;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::orbit_camera::OrbitCamera;
use crate::panel::{ControlPanel, PointerEvent};
use crate::render::GpuRenderer;
use crate::sketch::Sketch;

/// Schedules frames by asking the window for a redraw.
///
/// winit coalesces repeated requests, so asking twice before the next
/// `RedrawRequested` still yields one tick.
pub struct WindowScheduler {
    window: Arc<Window>,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// Open a window and run the sketch until it is closed.
///
/// # Example
/// ```no_run
/// blendsketch::run(blendsketch::SketchConfig::new().size(1280, 720))?;
/// # Ok::<(), blendsketch::SketchError>(())
/// ```
pub fn run(config: SketchConfig) -> Result<(), SketchError> {
    let event_loop = EventLoop::new()?;
    // Frames are driven by redraw requests; nothing runs while paused.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = SketchApp::Pending(config);
    event_loop.run_app(&mut app)?;

    match app {
        SketchApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

/// Everything that exists once the window and GPU are up.
struct Session {
    scheduler: WindowScheduler,
    renderer: GpuRenderer,
    sketch: Sketch,
    panel: ControlPanel,
    orbit: OrbitCamera,
    input: Input,
}

impl Session {
    fn start(event_loop: &ActiveEventLoop, config: &SketchConfig) -> Result<Self, SketchError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = GpuContext::new(window.clone())?;
        let mut sketch = Sketch::new(config);
        let mut renderer = GpuRenderer::new(gpu, &sketch.scenes(), config.clear_color);

        let size = window.inner_size();
        sketch.on_resize(size.width, size.height, &mut renderer);

        let panel =
            ControlPanel::new(sketch.viewport().0 as f32).with_scale(window.scale_factor() as f32);
        let orbit = OrbitCamera::from_camera(sketch.camera());

        let mut scheduler = WindowScheduler::new(window);
        scheduler.request_frame();

        log::info!("drag to orbit, scroll to zoom, space to pause, H to toggle the panel");

        Ok(Self {
            scheduler,
            renderer,
            sketch,
            panel,
            orbit,
            input: Input::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.sketch.on_resize(width, height, &mut self.renderer) {
            self.panel.layout(width as f32);
            self.request_repaint();
        }
    }

    fn rescale(&mut self, scale_factor: f64) {
        self.panel.set_scale(scale_factor as f32);
        self.request_repaint();
    }

    fn key_pressed(&mut self, key: KeyCode) {
        match key {
            KeyCode::Space => {
                self.sketch.toggle_pause(&mut self.scheduler);
                // Motion from while stopped must not jump the camera.
                self.input.begin_frame();
            }
            KeyCode::KeyH => {
                self.panel.toggle_visible();
                self.request_repaint();
            }
            _ => {}
        }
    }

    fn pointer(&mut self, event: PointerEvent) {
        let before = *self.sketch.settings();
        self.panel.handle_pointer(self.sketch.settings_mut(), event);
        if *self.sketch.settings() != before {
            self.request_repaint();
        }
    }

    /// Ask for a redraw of the overlay while stopped. A running sketch
    /// already has its next frame scheduled.
    fn request_repaint(&mut self) {
        if !self.sketch.is_running() {
            self.scheduler.request_frame();
        }
    }

    fn redraw(&mut self) {
        if self.sketch.is_running() && !self.panel.is_capturing() && self.orbit.update(&self.input) {
            self.orbit.apply(self.sketch.camera_mut());
        }

        let components = self.panel.components(self.sketch.settings());
        self.renderer.overlay_mut().set_components(&components);

        if !self.sketch.tick(&mut self.renderer, &mut self.scheduler) {
            self.sketch.repaint(&mut self.renderer);
        }
        self.input.begin_frame();
    }
}

enum SketchApp {
    Pending(SketchConfig),
    Running(Box<Session>),
    Failed(SketchError),
}

impl ApplicationHandler for SketchApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let SketchApp::Pending(config) = self else {
            return;
        };

        match Session::start(event_loop, config) {
            Ok(session) => *self = SketchApp::Running(Box::new(session)),
            Err(err) => {
                log::error!("failed to start: {err}");
                *self = SketchApp::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let SketchApp::Running(session) = self else {
            return;
        };

        session.input.handle_event(&event);
        if let Some(pointer) = PointerEvent::from_window_event(&event) {
            session.pointer(pointer);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                session.resize(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                session.rescale(scale_factor);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                session.key_pressed(key);
            }
            WindowEvent::RedrawRequested => {
                session.redraw();
            }
            _ => {}
        }
    }
}
