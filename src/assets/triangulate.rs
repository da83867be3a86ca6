//! Ear-clipping triangulation of single polygons.
//!
//! The polygon is projected onto the plane spanned by its first three
//! vertices, turned counter-clockwise in that plane, and then ears are cut off
//! one at a time. Every vertex is carried through unchanged, so the output is
//! a flat run of complete triangles made from the input vertices.

use gfx_maths::*;
use log::debug;

use super::face::Vertex;

/// Orthonormal 2D frame of a polygon's supporting plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBasis {
    pub normal: Vec3,
    pub u: Vec3,
    pub v: Vec3,
}

impl PlaneBasis {
    /// Frame spanned by `a -> b` and `a -> c`. Collinear points give a non-finite frame.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let edge1 = b - a;
        let edge2 = c - a;
        let normal = normalized(edge1.cross(edge2));
        let u = normalized(edge1);
        let v = normal.cross(u);
        Self { normal, u, v }
    }

    /// Frame of the first three vertices, `None` for fewer than three.
    pub fn of_polygon(polygon: &[Vertex]) -> Option<Self> {
        match polygon {
            [a, b, c, ..] => Some(Self::from_points(a.point, b.point, c.point)),
            _ => None,
        }
    }

    pub fn project(&self, origin: Vec3, point: Vec3) -> Vec2 {
        let offset = point - origin;
        Vec2::new(dot(offset, self.u), dot(offset, self.v))
    }

    /// Projects all vertices relative to the first one.
    pub fn project_all(&self, vertices: &[Vertex]) -> Vec<Vec2> {
        let origin = match vertices.first() {
            Some(first) => first.point,
            None => return Vec::new(),
        };

        vertices
            .iter()
            .map(|vertex| self.project(origin, vertex.point))
            .collect()
    }
}

fn dot(a: Vec3, b: Vec3) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

fn normalized(mut v: Vec3) -> Vec3 {
    v.normalize();
    v
}

/// Signed area of a projected polygon, positive when counter-clockwise.
pub fn signed_area(points: &[Vec2]) -> f32 {
    -winding_sum(points) / 2.0
}

// sum of (x_j - x_i) * (y_j + y_i) over all edges; negative means counter-clockwise
fn winding_sum(points: &[Vec2]) -> f32 {
    let mut total = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        total += (b.x - a.x) * (b.y + a.y);
    }
    total
}

fn turn(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

// boundary inclusive: a point on an edge counts as inside
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let c1 = turn(a, b, p);
    let c2 = turn(b, c, p);
    let c3 = turn(c, a, p);

    let has_neg = c1 < 0.0 || c2 < 0.0 || c3 < 0.0;
    let has_pos = c1 > 0.0 || c2 > 0.0 || c3 > 0.0;

    !(has_neg && has_pos)
}

fn neighbours(indices: &[usize], i: usize) -> (usize, usize, usize) {
    let len = indices.len();
    (indices[(i + len - 1) % len], indices[i], indices[(i + 1) % len])
}

// position in `indices` of the first ear, if any
fn find_ear(indices: &[usize], projected: &[Vec2]) -> Option<usize> {
    (0..indices.len()).find(|&i| {
        let (prev, curr, next) = neighbours(indices, i);
        let (a, b, c) = (projected[prev], projected[curr], projected[next]);

        // convex corner; NaN from a degenerate frame is rejected here too
        if !(turn(a, b, c) > 0.0) {
            return false;
        }

        !indices
            .iter()
            .filter(|&&vi| vi != prev && vi != curr && vi != next)
            .any(|&vi| point_in_triangle(projected[vi], a, b, c))
    })
}

/// Triangulates a polygon into a flat list of triangle vertices.
///
/// Polygons with fewer than three vertices produce nothing. A polygon on which
/// no ear can be found (degenerate or numerically unstable input) stops early
/// and yields only the triangles cut so far.
pub fn triangulate(polygon: &[Vertex]) -> Vec<Vertex> {
    let plane = match PlaneBasis::of_polygon(polygon) {
        Some(plane) => plane,
        None => return Vec::new(),
    };

    let mut vertices = polygon.to_vec();
    let mut projected = plane.project_all(&vertices);

    // the ear test below assumes counter-clockwise order
    if !(winding_sum(&projected) < 0.0) {
        vertices.reverse();
        projected = plane.project_all(&vertices);
    }

    let mut indices: Vec<usize> = (0..vertices.len()).collect();
    let mut result = Vec::with_capacity((vertices.len() - 2) * 3);

    while indices.len() > 3 {
        match find_ear(&indices, &projected) {
            Some(i) => {
                let (prev, curr, next) = neighbours(&indices, i);
                result.extend_from_slice(&[vertices[prev], vertices[curr], vertices[next]]);
                indices.remove(i);
            }
            None => {
                debug!(
                    "No ear found, {} of {} vertices left untriangulated",
                    indices.len(),
                    vertices.len()
                );
                break;
            }
        }
    }

    if let [a, b, c] = indices[..] {
        result.extend_from_slice(&[vertices[a], vertices[b], vertices[c]]);
    }

    result
}
