use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::camera::PerspectiveCamera;
use crate::input::Input;

const ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Drives a [`PerspectiveCamera`] around its target with the mouse.
///
/// Left drag orbits, the scroll wheel zooms. The sphere scene is viewed from
/// inside, so the default distance limits keep the eye within its radius.
///
/// # Example
/// ```ignore
/// let mut orbit = OrbitCamera::from_camera(&camera);
///
/// // In frame loop:
/// if orbit.update(&input) {
///     orbit.apply(&mut camera);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Horizontal angle in radians (yaw).
    pub azimuth: f32,
    /// Vertical angle in radians (pitch), clamped short of the poles.
    pub elevation: f32,
    /// Radians per pixel of mouse drag.
    pub sensitivity: f32,
    /// Distance per scroll line.
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 3.0,
            azimuth: 0.0,
            elevation: 0.0,
            sensitivity: 0.005,
            zoom_sensitivity: 0.25,
            min_distance: 0.5,
            max_distance: 9.0,
        }
    }
}

impl OrbitCamera {
    /// Start from wherever `camera` currently is.
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.length();
        let (azimuth, elevation) = if distance > f32::EPSILON {
            (
                offset.x.atan2(offset.z),
                (offset.y / distance).clamp(-1.0, 1.0).asin(),
            )
        } else {
            (0.0, 0.0)
        };

        let defaults = Self::default();
        Self {
            target: camera.target,
            distance: distance.clamp(defaults.min_distance, defaults.max_distance),
            azimuth,
            elevation: elevation.clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT),
            ..defaults
        }
    }

    /// Set distance limits.
    pub fn distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self.distance = self.distance.clamp(min, max);
        self
    }

    /// Rotate by a mouse drag of `delta` pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * self.sensitivity;
        self.elevation = (self.elevation + delta.y * self.sensitivity)
            .clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Move closer by `lines` scroll lines (negative moves away).
    pub fn zoom(&mut self, lines: f32) {
        self.distance =
            (self.distance - lines * self.zoom_sensitivity).clamp(self.min_distance, self.max_distance);
    }

    /// Apply this frame's mouse input. Returns `true` if the orbit changed.
    pub fn update(&mut self, input: &Input) -> bool {
        let mut changed = false;

        if input.mouse_down(MouseButton::Left) {
            let delta = input.mouse_delta();
            if delta != Vec2::ZERO {
                self.orbit(delta);
                changed = true;
            }
        }

        let scroll = input.scroll_delta();
        if scroll.y.abs() > 0.0 {
            self.zoom(scroll.y);
            changed = true;
        }

        changed
    }

    /// Eye position for the current angles and distance.
    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        );
        self.target + offset
    }

    /// Move `camera` to the orbit position, looking at the target.
    pub fn apply(&self, camera: &mut PerspectiveCamera) {
        camera.position = self.position();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_camera_round_trips_position() {
        let camera = PerspectiveCamera::default().at(0.0, 0.0, 3.0);
        let orbit = OrbitCamera::from_camera(&camera);
        assert!((orbit.distance - 3.0).abs() < 1e-6);
        assert!(orbit.azimuth.abs() < 1e-6);
        assert!(orbit.elevation.abs() < 1e-6);
        assert!((orbit.position() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn orbit_keeps_distance_and_clamps_elevation() {
        let mut orbit = OrbitCamera::default();
        orbit.orbit(Vec2::new(100.0, 0.0));
        assert!((orbit.position().length() - orbit.distance).abs() < 1e-4);

        orbit.orbit(Vec2::new(0.0, 10_000.0));
        assert!(orbit.elevation <= ELEVATION_LIMIT);
        assert!(orbit.position().y < orbit.distance);
    }

    #[test]
    fn zoom_respects_limits() {
        let mut orbit = OrbitCamera::default().distance_limits(1.0, 4.0);
        orbit.zoom(100.0);
        assert_eq!(orbit.distance, 1.0);
        orbit.zoom(-100.0);
        assert_eq!(orbit.distance, 4.0);
    }

    #[test]
    fn apply_moves_camera() {
        let mut camera = PerspectiveCamera::default().at(0.0, 0.0, 3.0);
        let mut orbit = OrbitCamera::from_camera(&camera);
        orbit.orbit(Vec2::new(-std::f32::consts::FRAC_PI_2 / orbit.sensitivity, 0.0));
        orbit.apply(&mut camera);
        assert!((camera.position - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
