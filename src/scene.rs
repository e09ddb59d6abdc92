//! Scene containers.

use crate::geometry::Geometry;
use crate::material::Material;

/// Identifies one of the three scenes of a sketch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneId {
    /// The textured sphere, drawn into render target A.
    Sphere,
    /// The textured plane, drawn into render target B.
    Plane,
    /// The compositor quad, drawn to the screen.
    Composite,
}

/// One drawable: a geometry with the material it is shaded with.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub geometry: Geometry,
    pub material: Material,
}

impl SceneObject {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }
}

/// An unordered bag of drawables rendered together with one camera.
#[derive(Clone, Debug)]
pub struct Scene {
    id: SceneId,
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(id: SceneId) -> Self {
        Self {
            id,
            objects: Vec::new(),
        }
    }

    /// Add an object and return its index.
    pub fn add(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.objects.iter_mut().map(|object| &mut object.material)
    }

    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.objects.iter().map(|object| &object.material)
    }
}
