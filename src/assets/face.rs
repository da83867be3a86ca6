use gfx_maths::*;

use super::mtl::Material;

/// A face vertex resolved against the position/normal/texcoord tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub point: Vec3,
    pub normal: Vec3,
    pub texture: Vec2,
}

impl Vertex {
    pub fn new(point: Vec3, normal: Vec3, texture: Vec2) -> Self {
        Self {
            point,
            normal,
            texture,
        }
    }

    #[cfg(test)]
    pub(crate) fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, y, z), Vec3::new(0.0, 1.0, 0.0), Vec2::zero())
    }
}

/// One polygon record of a mesh file, before triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: Vec<Vertex>,
    pub material: Material,
}
