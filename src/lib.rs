//! # blendsketch
//!
//! **Two scenes rendered off-screen, blended on screen.**
//!
//! A textured sphere (seen from inside) is rendered into render target A and
//! a textured plane into render target B. A full-screen compositor quad
//! samples both targets and mixes them by `progress`, which a small slider
//! panel in the top-right corner controls.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> Result<(), blendsketch::SketchError> {
//!     blendsketch::run(blendsketch::SketchConfig::default())
//! }
//! ```
//!
//! ## Controls
//!
//! - **Drag** orbits the camera, **scroll** zooms.
//! - **Drag the slider** to blend between the two scenes.
//! - **Space** pauses and resumes, **H** hides the panel.
//!
//! ## Without a window
//!
//! [`Sketch`] holds all session state and talks to the GPU only through
//! [`FrameRenderer`] and to the host only through [`FrameScheduler`], so it
//! can be driven by anything that implements those two traits.

mod app;
mod camera;
mod config;
mod error;
mod frame;
mod geometry;
mod gpu;
mod input;
mod material;
mod mesh;
mod orbit_camera;
mod panel;
mod render;
mod scene;
mod sketch;
mod texture;
mod ui;

pub use app::{WindowScheduler, run};
pub use camera::{OrthographicCamera, PerspectiveCamera, Projection};
pub use config::SketchConfig;
pub use error::SketchError;
pub use frame::{DriverState, FrameDriver, FrameScheduler, TIME_STEP};
pub use geometry::Geometry;
pub use gpu::GpuContext;
pub use input::Input;
pub use material::{Material, RenderTargetId, SamplerBinding, Side, Uniforms, Wrap};
pub use mesh::{Mesh, Vertex3d};
pub use orbit_camera::OrbitCamera;
pub use panel::{ControlPanel, PointerEvent, Settings, Slider};
pub use render::{
    DepthBuffer, FrameRenderer, GpuRenderer, MaterialPass, RENDER_TARGET_FORMAT, RenderTarget,
};
pub use scene::{Scene, SceneId, SceneObject};
pub use sketch::{SCENE_01, SCENE_02, Sketch, TEXTURE_MAP};
pub use texture::{Texture, TextureSource};
pub use ui::{Color, GuiComponent, OverlayPass, Rect};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
