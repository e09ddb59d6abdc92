//! Start-up errors.
//!
//! Only window and GPU initialization can fail in a way the caller sees.
//! Faults during a frame are logged by the renderer and the session keeps
//! running.

/// Errors returned by [`run`](crate::run) and [`GpuContext::new`](crate::GpuContext::new).
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    /// The winit event loop could not be created or exited abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// The OS refused to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// wgpu could not create a surface for the window.
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    /// No adapter is compatible with the surface.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    /// The adapter refused to open a device.
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("surface does not support any texture format")]
    UnsupportedSurface,
}
