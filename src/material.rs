//! Shader materials: a WGSL program plus the values it reads each draw.
//!
//! A [`Material`] is plain data. The renderer turns it into a pipeline once
//! and re-uploads [`Uniforms`] and rebinds sampler slots on every draw, so
//! changing a field here is all the frame driver has to do.
//!
//! # Shader interface
//!
//! ```wgsl
//! struct Uniforms {
//!     view_proj: mat4x4f,
//!     resolution: vec4f,
//!     time: f32,
//!     progress: f32,
//! }
//! @group(0) @binding(0) var<uniform> u: Uniforms;
//! // one texture per sampler slot, in declaration order
//! @group(0) @binding(1) var t0: texture_2d<f32>;
//! // ...
//! @group(0) @binding(N + 1) var s: sampler;
//! ```
//!
//! Entry points are `vs` and `fs`; vertices use the
//! [`Vertex3d`](crate::Vertex3d) layout.

use glam::Vec4;

use crate::texture::TextureSource;

/// Which faces of a mesh are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    /// Counter-clockwise faces only.
    #[default]
    Front,
    /// Clockwise faces only, for viewing a mesh from inside.
    Back,
    /// No culling.
    Double,
}

impl Side {
    pub(crate) fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }
}

/// Texture addressing outside `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    Repeat,
    Clamp,
}

impl Wrap {
    pub(crate) fn address_mode(self) -> wgpu::AddressMode {
        match self {
            Wrap::Repeat => wgpu::AddressMode::Repeat,
            Wrap::Clamp => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// Identifies one of the two off-screen render targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderTargetId {
    A,
    B,
}

impl RenderTargetId {
    pub(crate) fn index(self) -> usize {
        match self {
            RenderTargetId::A => 0,
            RenderTargetId::B => 1,
        }
    }
}

/// What a sampler slot reads from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SamplerBinding {
    /// Nothing bound yet; samples as opaque white.
    #[default]
    Empty,
    /// A static image texture.
    Image(TextureSource),
    /// The color texture of an off-screen render target.
    Target(RenderTargetId),
}

/// Scalar and vector uniforms shared by every material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniforms {
    pub time: f32,
    pub progress: f32,
    /// `(width, height, 1 / width, 1 / height)` of the viewport.
    pub resolution: Vec4,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            progress: 0.6,
            resolution: Vec4::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct SamplerSlot {
    name: &'static str,
    binding: SamplerBinding,
}

/// A WGSL program with its uniforms and named sampler slots.
#[derive(Clone, Debug)]
pub struct Material {
    pub label: &'static str,
    pub shader: &'static str,
    pub side: Side,
    pub wrap: Wrap,
    pub uniforms: Uniforms,
    samplers: Vec<SamplerSlot>,
}

impl Material {
    pub fn new(label: &'static str, shader: &'static str) -> Self {
        Self {
            label,
            shader,
            side: Side::default(),
            wrap: Wrap::default(),
            uniforms: Uniforms::default(),
            samplers: Vec::new(),
        }
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Declare a sampler slot. Slots bind in declaration order.
    pub fn sampler(mut self, name: &'static str, binding: SamplerBinding) -> Self {
        self.samplers.push(SamplerSlot { name, binding });
        self
    }

    /// Current binding of the slot called `name`.
    pub fn sampler_binding(&self, name: &str) -> Option<&SamplerBinding> {
        self.samplers
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| &slot.binding)
    }

    /// Rebind an existing slot. Returns `false` if no slot has that name.
    pub fn set_sampler(&mut self, name: &str, binding: SamplerBinding) -> bool {
        match self.samplers.iter_mut().find(|slot| slot.name == name) {
            Some(slot) => {
                slot.binding = binding;
                true
            }
            None => false,
        }
    }

    /// Slot bindings in declaration order.
    pub fn sampler_bindings(&self) -> impl Iterator<Item = &SamplerBinding> {
        self.samplers.iter().map(|slot| &slot.binding)
    }

    pub fn sampler_count(&self) -> usize {
        self.samplers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_keep_declaration_order() {
        let material = Material::new("test", "")
            .sampler("u_scene_01", SamplerBinding::Empty)
            .sampler("u_scene_02", SamplerBinding::Target(RenderTargetId::B));

        let bindings: Vec<_> = material.sampler_bindings().cloned().collect();
        assert_eq!(
            bindings,
            vec![SamplerBinding::Empty, SamplerBinding::Target(RenderTargetId::B)]
        );
    }

    #[test]
    fn set_sampler_only_touches_named_slot() {
        let mut material = Material::new("test", "")
            .sampler("u_scene_01", SamplerBinding::Empty)
            .sampler("u_scene_02", SamplerBinding::Empty);

        assert!(material.set_sampler("u_scene_01", SamplerBinding::Target(RenderTargetId::A)));
        assert_eq!(
            material.sampler_binding("u_scene_01"),
            Some(&SamplerBinding::Target(RenderTargetId::A))
        );
        assert_eq!(material.sampler_binding("u_scene_02"), Some(&SamplerBinding::Empty));
    }

    #[test]
    fn unknown_sampler_is_rejected() {
        let mut material = Material::new("test", "");
        assert!(!material.set_sampler("missing", SamplerBinding::Empty));
        assert_eq!(material.sampler_binding("missing"), None);
    }

    #[test]
    fn back_side_culls_front_faces() {
        assert_eq!(Side::Back.cull_mode(), Some(wgpu::Face::Front));
        assert_eq!(Side::Front.cull_mode(), Some(wgpu::Face::Back));
        assert_eq!(Side::Double.cull_mode(), None);
    }
}
