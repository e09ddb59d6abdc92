//! Perspective and orthographic cameras.
//!
//! Both cameras cache their projection matrix. The perspective camera only
//! recomputes it when [`PerspectiveCamera::update_projection_matrix`] is
//! called, so changing `aspect` alone has no visible effect until then.

use glam::{Mat4, Vec3};

/// Anything that can place geometry in clip space.
pub trait Projection {
    /// Combined projection × view matrix.
    fn view_projection(&self) -> Mat4;
}

/// A perspective camera looking at a target point.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    pub up: Vec3,
    projection: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(70.0, 1.0, 0.01, 100.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Move the eye to `(x, y, z)`.
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, target: impl Into<Vec3>) -> Self {
        self.target = target.into();
        self
    }

    /// Recompute the cached projection from `fov`, `aspect`, `near` and `far`.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }
}

impl Projection for PerspectiveCamera {
    fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

/// An orthographic camera at the origin looking down -Z.
#[derive(Clone, Debug)]
pub struct OrthographicCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthographicCamera {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            near,
            far,
        }
    }

    /// A square frustum `size` units across, centered on the view axis.
    ///
    /// With `size = 1.0` a unit quad at the origin covers the whole viewport
    /// whatever the aspect ratio.
    pub fn frustum(size: f32) -> Self {
        let half = size / 2.0;
        Self::new(-half, half, half, -half, -1000.0, 1000.0)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

impl Projection for OrthographicCamera {
    fn view_projection(&self) -> Mat4 {
        self.projection_matrix()
    }
}
