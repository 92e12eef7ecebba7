//! Engine-agnostic triangle mesh buffers and material handles.
//!
//! The renderer is an external collaborator: it uploads a [`MeshData`] once,
//! keyed by the owning solid's id, and draws it with the referenced
//! [`Material`]. Nothing here talks to a GPU.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A generic material identifier referencing an external palette.
pub type MaterialId = u16;

/// Render-side description of a surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Palette entry (texture set, shading model) on the renderer side.
    pub id: MaterialId,

    /// Linear RGB base colour.
    pub color: Vec3,

    /// 1.0 is fully opaque.
    pub opacity: f32,

    /// Whether the printer's clipping plane applies to this material.
    pub clip_to_hand: bool,
}

impl Material {
    pub fn opaque(id: MaterialId, color: Vec3) -> Self {
        Self {
            id,
            color,
            opacity: 1.0,
            clip_to_hand: false,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        // #80A0A0, the colour of freshly printed objects
        Self::opaque(0, Vec3::new(0.5, 0.627, 0.627))
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Triangle mesh buffers.
///
/// When `indices` is `None` the mesh is a plain triangle list: every three
/// consecutive vertices form one face.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Option<Vec<u32>>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Vertex indices of every triangle, whether the mesh is indexed or not.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                .collect(),
            None => (0..self.positions.len() / 3)
                .map(|f| [3 * f, 3 * f + 1, 3 * f + 2])
                .collect(),
        }
    }

    /// Rotates positions and normals about the X axis by `angle` radians.
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate(Quat::from_rotation_x(angle));
    }

    pub fn rotate(&mut self, rotation: Quat) {
        for p in &mut self.positions {
            *p = rotation * *p;
        }
        for n in &mut self.normals {
            *n = rotation * *n;
        }
    }

    /// Scales positions per axis; normals follow the inverse-transpose.
    pub fn scale(&mut self, factor: Vec3) {
        for p in &mut self.positions {
            *p *= factor;
        }
        let inverse = factor.recip();
        for n in &mut self.normals {
            *n = (*n * inverse).normalize_or_zero();
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }

    /// One normal per face, copied to each of its three vertices.
    ///
    /// Only meaningful for triangle lists; indexed meshes share vertices
    /// between faces and keep their existing normals.
    pub fn compute_flat_normals(&mut self) {
        if self.indices.is_some() {
            return;
        }
        self.normals = self
            .positions
            .chunks_exact(3)
            .flat_map(|t| {
                let n = (t[1] - t[0]).cross(t[2] - t[0]).normalize_or_zero();
                [n, n, n]
            })
            .collect();
    }
}
