use std::path::{Path, PathBuf};

use gfx_maths::*;
use log::{debug, warn};

use super::{meta::ObjMeta, parser::ParserError};
use crate::assets::{
    face::{Face, Vertex},
    mtl::{Material, MaterialCache},
};
use crate::texture::ImageDecoder;

/// 1-based references of one face vertex, as written in the file.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct ObjFaceIndex {
    pub(crate) vert_i: usize,
    pub(crate) uv_i: Option<usize>,
    pub(crate) normal_i: Option<usize>,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct ObjFace {
    pub(crate) face_i: Vec<ObjFaceIndex>,
}

/// Running state of one mesh load: the attribute tables, the active material
/// and the faces emitted so far.
pub(crate) struct ObjMeshBuilder<'a> {
    directory: PathBuf,
    meta: ObjMeta,
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
    library: Option<PathBuf>,
    material_name: Option<String>,
    active_material: Option<Material>,
    materials: MaterialCache,
    decoder: &'a mut dyn ImageDecoder,
}

impl<'a> ObjMeshBuilder<'a> {
    /// `directory` is the folder of the model file; material libraries are resolved against it.
    pub(crate) fn new(directory: &Path, meta: ObjMeta, decoder: &'a mut dyn ImageDecoder) -> Self {
        Self {
            directory: directory.to_path_buf(),
            meta,
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            library: None,
            material_name: None,
            active_material: None,
            materials: MaterialCache::new(),
            decoder,
        }
    }

    #[cfg(test)]
    pub(crate) fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[cfg(test)]
    pub(crate) fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    #[cfg(test)]
    pub(crate) fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub(crate) fn push_position(&mut self, position: Vec3) {
        self.positions.push(self.flip(position));
    }

    pub(crate) fn push_uv(&mut self, mut uv: Vec2) {
        if self.meta.flip_uv {
            uv.y = 1.0 - uv.y;
        }
        self.uvs.push(uv);
    }

    pub(crate) fn push_normal(&mut self, normal: Vec3) {
        self.normals.push(self.flip(normal));
    }

    // invert axes if necessary
    fn flip(&self, mut v: Vec3) -> Vec3 {
        if self.meta.flip_axis[0] {
            v.x = -v.x;
        }
        if self.meta.flip_axis[1] {
            v.y = -v.y;
        }
        if self.meta.flip_axis[2] {
            v.z = -v.z;
        }
        v
    }

    pub(crate) fn set_material_library(&mut self, file: &str) {
        self.library = if file.is_empty() {
            None
        } else {
            Some(self.directory.join(file))
        };
        self.active_material = None;
    }

    pub(crate) fn use_material(&mut self, name: &str) {
        self.material_name = if name.is_empty() {
            None
        } else {
            Some(name.into())
        };
        self.active_material = None;
    }

    // resolved on first use, so a `usemtl` without faces never touches the library
    fn current_material(&mut self) -> Material {
        if let Some(material) = &self.active_material {
            return material.clone();
        }

        let material = match (&self.library, &self.material_name) {
            (Some(library), Some(name)) => self.materials.resolve(library, name, self.decoder),
            (None, Some(name)) => {
                warn!("Material `{}` used without a material library", name);
                Material::named(name)
            }
            _ => Material::default(),
        };

        self.active_material = Some(material.clone());
        material
    }

    /// Resolves the face against the tables and emits it with the active material.
    pub(crate) fn push_face(&mut self, face: &ObjFace) -> Result<(), ParserError> {
        if face.face_i.is_empty() {
            return Err(ParserError::ParseFace);
        }

        let mut vertices = Vec::with_capacity(face.face_i.len());
        for index in &face.face_i {
            match self.resolve(index) {
                Ok(vertex) => vertices.push(vertex),
                Err(err) => warn!("Skipping face vertex {:?}: {}", index, err),
            }
        }

        if vertices.len() < 3 {
            debug!("Face with {} vertices yields no triangles", vertices.len());
        }

        let material = self.current_material();
        self.faces.push(Face { vertices, material });
        Ok(())
    }

    fn resolve(&self, index: &ObjFaceIndex) -> Result<Vertex, ParserError> {
        let len = self.positions.len();
        if index.vert_i == 0 || index.vert_i > len {
            return Err(ParserError::IndexOutOfRange {
                index: index.vert_i,
                len,
            });
        }

        let point = self.positions[index.vert_i - 1];

        let normal = match lookup(&self.normals, index.normal_i) {
            Some(normal) => normal,
            None => self.fallback_normal(index.vert_i),
        };

        let texture = match lookup(&self.uvs, index.uv_i) {
            Some(uv) => uv,
            None => self.fallback_uv(index.vert_i),
        };

        Ok(Vertex::new(point, normal, texture))
    }

    /// Cross product of two edges anchored at the first declared position:
    /// from it to the referenced position and to the position after that
    /// (wrapping). An approximation of the face normal, not an area-weighted one.
    fn fallback_cross(&self, vert_i: usize) -> Option<Vec3> {
        let anchor = self.positions[0];
        let edge1 = self.positions[vert_i - 1] - anchor;
        let edge2 = self.positions[vert_i % self.positions.len()] - anchor;
        let mut cross = edge1.cross(edge2);

        let length = cross.magnitude();
        if length > 0.0 && length.is_finite() {
            cross.normalize();
            Some(cross)
        } else {
            None
        }
    }

    fn fallback_normal(&self, vert_i: usize) -> Vec3 {
        self.fallback_cross(vert_i)
            .unwrap_or_else(|| Vec3::new(0.0, 1.0, 0.0))
    }

    // reuses the normal expression; carries no real uv meaning
    fn fallback_uv(&self, vert_i: usize) -> Vec2 {
        self.fallback_cross(vert_i)
            .map(|cross| Vec2::new(cross.x, cross.y))
            .unwrap_or_else(Vec2::zero)
    }

    pub(crate) fn finish(self) -> Vec<Face> {
        self.faces
    }
}

// resolves an optional 1-based index, treating out-of-range as absent
fn lookup<T: Copy>(table: &[T], index: Option<usize>) -> Option<T> {
    let index = index?;
    let value = table.get(index.checked_sub(1)?).copied();
    if value.is_none() {
        warn!(
            "Attribute index {} is out of range 1..={}, using fallback",
            index,
            table.len()
        );
    }
    value
}
