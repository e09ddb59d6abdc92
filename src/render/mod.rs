//! The renderer seam and its wgpu implementation.
//!
//! [`Sketch`](crate::Sketch) never touches the GPU directly. Each tick it asks
//! a [`FrameRenderer`] to draw whole scenes:
//!
//! ```text
//! ┌──────────────┐   target A   ┌──────────────┐
//! │ Sphere scene │─────────────▶│              │
//! └──────────────┘              │  Composite   │──▶ screen
//! ┌──────────────┐   target B   │    scene     │
//! │ Plane scene  │─────────────▶│              │
//! └──────────────┘              └──────────────┘
//! ```
//!
//! [`GpuRenderer`] implements the seam with wgpu. Tests implement it with a
//! recorder that only remembers what was asked.

mod material_pass;
mod renderer;
mod target;

pub use material_pass::{MaterialPass, RENDER_TARGET_FORMAT};
pub use renderer::GpuRenderer;
pub use target::{DepthBuffer, RenderTarget};

use crate::camera::Projection;
use crate::material::RenderTargetId;
use crate::scene::Scene;

/// Draws scenes on behalf of the frame driver.
pub trait FrameRenderer {
    /// Draw `scene` as seen through `camera` into `target`, or to the screen
    /// when `target` is `None`.
    fn render(&mut self, scene: &Scene, camera: &dyn Projection, target: Option<RenderTargetId>);

    /// Resize the screen output.
    fn set_size(&mut self, width: u32, height: u32);

    /// Current screen output size in pixels.
    fn size(&self) -> (u32, u32);

    /// Reallocate both off-screen render targets.
    fn set_render_target_size(&mut self, width: u32, height: u32);
}
