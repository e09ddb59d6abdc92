//! CPU-side geometry generation.
//!
//! A [`Geometry`] is plain vertex and index data. It is built once when a
//! scene is assembled and uploaded to the GPU as a [`Mesh`](crate::Mesh) by
//! the renderer; nothing mutates it afterwards.
//!
//! Triangles wind counter-clockwise when seen from the side the normals point
//! to. UVs follow the wgpu image convention: `v = 0` is the top row.

use glam::Vec3;
use std::f32::consts::PI;

use crate::mesh::Vertex3d;

/// Immutable vertex and index data for one mesh.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// A UV sphere centered at the origin.
    ///
    /// `width_segments` divide the equator, `height_segments` run pole to
    /// pole. The pole rows emit one triangle per segment instead of a
    /// degenerate quad.
    ///
    /// - **Vertices**: `(width_segments + 1) × (height_segments + 1)`
    /// - **Triangles**: `2 × width_segments × (height_segments - 1)`
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
        let mut indices = Vec::new();

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let theta = v * PI;

            // Shift pole UVs half a segment so the fan samples the middle of each column.
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * 2.0 * PI;

                let position = Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                let normal = position.normalize_or_zero();

                vertices.push(Vertex3d::new(
                    position.to_array(),
                    normal.to_array(),
                    [u + u_offset, v],
                ));
            }
        }

        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// A flat `width × height` plane in the XY plane facing +Z.
    ///
    /// - **Vertices**: `(width_segments + 1) × (height_segments + 1)`
    /// - **Triangles**: `2 × width_segments × height_segments`
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let grid_x = width_segments.max(1);
        let grid_y = height_segments.max(1);
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;

        let mut vertices = Vec::with_capacity(((grid_x + 1) * (grid_y + 1)) as usize);
        let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);

        for iy in 0..=grid_y {
            let y = iy as f32 * segment_height - height / 2.0;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_width - width / 2.0;
                vertices.push(Vertex3d::new(
                    [x, -y, 0.0],
                    [0.0, 0.0, 1.0],
                    [ix as f32 / grid_x as f32, iy as f32 / grid_y as f32],
                ));
            }
        }

        let row = grid_x + 1;
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = ix + 1 + row * (iy + 1);
                let d = ix + 1 + row * iy;

                indices.extend_from_slice(&[a, b, d]);
                indices.extend_from_slice(&[b, c, d]);
            }
        }

        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }
}
