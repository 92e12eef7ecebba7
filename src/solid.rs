//! Printable solids: lathe and twisted-extrusion meshes built from profile curves.

use crate::error::GenerationError;
use crate::mesh::{Aabb, Material, MeshData};
use crate::profile::{ShapeFamily, ShapeTag};
use glam::{Quat, Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::atomic::{AtomicU64, Ordering};

/// Radial scale applied to every printed solid.
pub const RADIUS: f32 = 8.0;

/// Default profile subdivisions per unit of printed height.
pub const POINTS_PER_HEIGHT: f32 = 10.0;

/// Angular segments of a revolution solid.
pub const LATHE_SEGMENTS: usize = 12;

/// Samples per cubic segment when flattening an extrusion outline.
pub const CURVE_SEGMENTS: usize = 12;

/// Extrusion depth before the height scale is applied.
pub const EXTRUDE_DEPTH: f32 = 1.0;

/// Side-wall quads whose first edge is flatter than this in `y` map `(x, z)`.
const SIDE_WALL_FLAT_EPSILON: f32 = 0.01;

static NEXT_SOLID_ID: AtomicU64 = AtomicU64::new(0);

/// Key under which the renderer stores a solid's GPU buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolidId(pub u64);

impl SolidId {
    fn next() -> Self {
        Self(NEXT_SOLID_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A printed object: mesh, transform scale, material and visibility.
///
/// A solid exclusively owns its mesh and material and is not `Clone`.
/// [`Solid::dispose`] hands the id back so the renderer can free the matching
/// GPU buffers.
#[derive(Debug, PartialEq)]
pub struct Solid {
    id: SolidId,
    pub shape: ShapeTag,
    pub height: f32,
    pub twist_angle: f32,
    pub mesh: MeshData,
    /// Object-space scale applied on top of `mesh` when rendering.
    pub scale: Vec3,
    pub material: Material,
    pub visible: bool,
}

impl Solid {
    pub fn id(&self) -> SolidId {
        self.id
    }

    /// Mesh positions with the solid's scale applied.
    pub fn scaled_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.mesh.positions.iter().map(|&p| p * self.scale)
    }

    pub fn scaled_bounds(&self) -> Option<Aabb> {
        self.mesh.bounds().map(|b| Aabb {
            min: b.min * self.scale,
            max: b.max * self.scale,
        })
    }

    /// Releases the solid, returning the id whose render resources must be freed.
    pub fn dispose(self) -> SolidId {
        tracing::debug!(id = self.id.0, shape = %self.shape, "disposing solid");
        self.id
    }
}

/// Builds a printable solid for `shape`.
///
/// Revolution shapes are lathed from `divisions_per_unit_height * height`
/// arc-length spaced profile points and their geometry is scaled by
/// `(RADIUS, height, RADIUS)`. Extrusion shapes are swept one unit deep in as
/// many steps, stood upright, twisted by `twist_angle_deg` degrees per unit of
/// height, and scaled through [`Solid::scale`].
///
/// # Errors
///
/// [`GenerationError::InvalidHeight`] if `height <= 0` or not finite.
pub fn generate_solid(
    shape: ShapeTag,
    twist_angle_deg: f32,
    height: f32,
    divisions_per_unit_height: f32,
    material: Material,
) -> Result<Solid, GenerationError> {
    if !height.is_finite() || height <= 0.0 {
        return Err(GenerationError::InvalidHeight(height));
    }
    let divisions = ((divisions_per_unit_height * height).ceil() as usize).max(1);
    let full_scale = Vec3::new(RADIUS, height, RADIUS);

    let (mesh, scale) = match ShapeFamily::of(shape) {
        ShapeFamily::Revolution(curve) => {
            let points = curve.spaced_points(divisions);
            let mut mesh = lathe(&points, LATHE_SEGMENTS);
            mesh.scale(full_scale);
            (mesh, Vec3::ONE)
        }
        ShapeFamily::Extrusion(curve) => {
            let outline = curve.points(CURVE_SEGMENTS);
            let mut mesh = extrude(&outline, divisions, EXTRUDE_DEPTH)?;
            mesh.rotate_x(-FRAC_PI_2);
            twist(&mut mesh, twist_angle_deg);
            (mesh, full_scale)
        }
    };

    let solid = Solid {
        id: SolidId::next(),
        shape,
        height,
        twist_angle: twist_angle_deg,
        mesh,
        scale,
        material,
        visible: true,
    };
    tracing::debug!(
        id = solid.id.0,
        shape = %shape,
        height,
        twist_angle_deg,
        vertices = solid.mesh.vertex_count(),
        "generated solid"
    );
    Ok(solid)
}

/// Rotates every vertex about the vertical axis by `(π/180)·deg·y`.
///
/// Each vertex only depends on its own height, so the map is order
/// independent. Normals are rotated with their vertex.
pub fn twist(mesh: &mut MeshData, twist_angle_deg: f32) {
    let rate = twist_angle_deg.to_radians();
    for i in 0..mesh.positions.len() {
        let rotation = Quat::from_rotation_y(rate * mesh.positions[i].y);
        mesh.positions[i] = rotation * mesh.positions[i];
        if let Some(normal) = mesh.normals.get_mut(i) {
            *normal = rotation * *normal;
        }
    }
}

/// Sweeps `points` (x = radius, y = height) a full turn about +Y.
pub fn lathe(points: &[Vec2], segments: usize) -> MeshData {
    let segments = segments.max(3);
    let n = points.len();
    let profile_normals = lathe_profile_normals(points);

    let mut mesh = MeshData {
        indices: Some(Vec::with_capacity(segments * n.saturating_sub(1) * 6)),
        ..Default::default()
    };

    for i in 0..=segments {
        let phi = TAU * i as f32 / segments as f32;
        let (sin, cos) = phi.sin_cos();
        for (j, (p, n2)) in points.iter().zip(&profile_normals).enumerate() {
            mesh.positions.push(Vec3::new(p.x * sin, p.y, p.x * cos));
            mesh.normals.push(Vec3::new(n2.x * sin, n2.y, n2.x * cos));
            mesh.uvs.push(Vec2::new(
                i as f32 / segments as f32,
                j as f32 / (n.max(2) - 1) as f32,
            ));
        }
    }

    if let Some(indices) = mesh.indices.as_mut() {
        for i in 0..segments {
            for j in 0..n.saturating_sub(1) {
                let base = (j + i * n) as u32;
                let a = base;
                let b = base + n as u32;
                let c = base + n as u32 + 1;
                let d = base + 1;
                indices.extend_from_slice(&[a, b, d, c, d, b]);
            }
        }
    }
    mesh
}

/// Outward 2D normals of the profile, averaged across each inner point.
fn lathe_profile_normals(points: &[Vec2]) -> Vec<Vec2> {
    let edge_normals: Vec<Vec2> = points
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            Vec2::new(d.y, -d.x).normalize_or_zero()
        })
        .collect();

    (0..points.len())
        .map(|j| {
            let before = j.checked_sub(1).and_then(|k| edge_normals.get(k));
            let after = edge_normals.get(j);
            match (before, after) {
                (Some(a), Some(b)) => (*a + *b).normalize_or(*b),
                (Some(n), None) | (None, Some(n)) => *n,
                (None, None) => Vec2::X,
            }
        })
        .collect()
}

/// Extrudes a closed outline along +Z, producing a flat-shaded triangle list.
///
/// `steps` layers subdivide the side walls. Caps are triangulated with
/// ear clipping; UVs follow the bounding-box projection of
/// [`bounding_box_top_uv`] and [`bounding_box_side_wall_uv`].
pub fn extrude(outline: &[Vec2], steps: usize, depth: f32) -> Result<MeshData, GenerationError> {
    let steps = steps.max(1);
    let mut contour = outline.to_vec();
    if contour.len() > 1 && contour[0].distance(contour[contour.len() - 1]) < 1e-4 {
        contour.pop();
    }
    if contour.len() < 3 {
        return Err(GenerationError::Triangulation(format!(
            "outline needs at least 3 points, got {}",
            contour.len()
        )));
    }
    // Walls are wound for a clockwise contour.
    if signed_area(&contour) > 0.0 {
        contour.reverse();
    }

    let coords: Vec<f64> = contour
        .iter()
        .flat_map(|p| [f64::from(p.x), f64::from(p.y)])
        .collect();
    let cap = earcutr::earcut(&coords, &[], 2)
        .map_err(|e| GenerationError::Triangulation(format!("earcut error: {e}")))?;
    if cap.is_empty() {
        return Err(GenerationError::Triangulation(
            "ear clipping produced no triangles".to_string(),
        ));
    }

    let n = contour.len();
    let layer = |j: usize, s: usize| contour[j].extend(depth * s as f32 / steps as f32);
    let mut mesh = MeshData::default();

    // 1. Caps: bottom faces -Z, top faces +Z.
    for tri in cap.chunks_exact(3) {
        let (a, mut b, mut c) = (tri[0], tri[1], tri[2]);
        if (contour[b] - contour[a]).perp_dot(contour[c] - contour[a]) > 0.0 {
            std::mem::swap(&mut b, &mut c);
        }
        for v in [layer(a, 0), layer(b, 0), layer(c, 0)] {
            mesh.positions.push(v);
            mesh.uvs.push(bounding_box_top_uv(v));
        }
        for v in [layer(a, steps), layer(c, steps), layer(b, steps)] {
            mesh.positions.push(v);
            mesh.uvs.push(bounding_box_top_uv(v));
        }
    }

    // 2. Side walls, one quad per contour edge and step.
    for i in 0..n {
        let j = i;
        let k = if i == 0 { n - 1 } else { i - 1 };
        for s in 0..steps {
            let quad = [layer(j, s), layer(k, s), layer(k, s + 1), layer(j, s + 1)];
            let uv = bounding_box_side_wall_uv(quad);
            for idx in [0, 1, 3, 1, 2, 3] {
                mesh.positions.push(quad[idx]);
                mesh.uvs.push(uv[idx]);
            }
        }
    }

    mesh.compute_flat_normals();
    Ok(mesh)
}

/// Shoelace area; positive for counter-clockwise outlines.
fn signed_area(contour: &[Vec2]) -> f32 {
    let n = contour.len();
    (0..n)
        .map(|i| contour[i].perp_dot(contour[(i + 1) % n]))
        .sum::<f32>()
        / 2.0
}

/// Cap UV: the vertex's raw object-space `(x, y)`.
pub fn bounding_box_top_uv(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Side-wall UVs for the quad `a, b, c, d`.
///
/// Uses `(x, 1 - z)` when `a` and `b` share nearly the same `y`, otherwise
/// `(y, 1 - z)`.
pub fn bounding_box_side_wall_uv(quad: [Vec3; 4]) -> [Vec2; 4] {
    let [a, b, ..] = quad;
    if (a.y - b.y).abs() < SIDE_WALL_FLAT_EPSILON {
        quad.map(|v| Vec2::new(v.x, 1.0 - v.z))
    } else {
        quad.map(|v| Vec2::new(v.y, 1.0 - v.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_area_of_ccw_square_is_positive() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert!((signed_area(&square) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn lathe_normals_point_outward_on_a_cylinder() {
        let points = [Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
        let mesh = lathe(&points, 8);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let radial = Vec3::new(p.x, 0.0, p.z).normalize();
            assert!(n.dot(radial) > 0.99);
        }
    }
}
