use crate::{error::Result, texture::TextureData, texture::TextureHandle};
use gfx_maths::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of scalars per vertex record.
pub const STRIDE: usize = 13;
/// Size of one vertex record in bytes.
pub const STRIDE_BYTES: usize = STRIDE * std::mem::size_of::<f32>();

/// Texture slot written for faces without a diffuse texture.
pub const NO_TEXTURE_SLOT: f32 = -1.0;

/// One attribute binding of the interleaved vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub name: &'static str,
    pub components: u32,
    /// Offset in scalars from the start of a record.
    pub offset: u32,
}

impl VertexAttribute {
    pub fn byte_offset(&self) -> usize {
        self.offset as usize * std::mem::size_of::<f32>()
    }
}

/// Attribute bindings in record order. The rendering backend binds these verbatim.
pub const ATTRIBUTES: [VertexAttribute; 6] = [
    VertexAttribute { location: 0, name: "position", components: 3, offset: 0 },
    VertexAttribute { location: 1, name: "normal", components: 3, offset: 3 },
    VertexAttribute { location: 2, name: "uv", components: 2, offset: 6 },
    VertexAttribute { location: 3, name: "texture_slot", components: 1, offset: 8 },
    VertexAttribute { location: 4, name: "diffuse_color", components: 3, offset: 9 },
    VertexAttribute { location: 5, name: "opacity", components: 1, offset: 12 },
];

/// A single 13-scalar vertex record:
/// position(3) normal(3) uv(2) texture_slot(1) diffuse_color(3) opacity(1).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub texture_slot: f32,
    pub diffuse_color: Vec3,
    pub opacity: f32,
}

impl VertexRecord {
    /// Appends the record to `out` in the fixed field order.
    pub fn write_to(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&[
            self.position.x,
            self.position.y,
            self.position.z,
            self.normal.x,
            self.normal.y,
            self.normal.z,
            self.uv.x,
            self.uv.y,
            self.texture_slot,
            self.diffuse_color.x,
            self.diffuse_color.y,
            self.diffuse_color.z,
            self.opacity,
        ]);
    }

    pub fn from_slice(data: &[f32]) -> Option<Self> {
        if data.len() != STRIDE {
            return None;
        }

        Some(VertexRecord {
            position: Vec3::new(data[0], data[1], data[2]),
            normal: Vec3::new(data[3], data[4], data[5]),
            uv: Vec2::new(data[6], data[7]),
            texture_slot: data[8],
            diffuse_color: Vec3::new(data[9], data[10], data[11]),
            opacity: data[12],
        })
    }

    /// Slot into the mesh texture table, `None` for untextured records.
    pub fn texture_index(&self) -> Option<usize> {
        if self.texture_slot < 0.0 {
            None
        } else {
            Some(self.texture_slot as usize)
        }
    }
}

/// Assembled mesh ready for upload: the interleaved vertex stream, the
/// deduplicated texture table and the transparency flag used for draw ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub textures: Vec<TextureHandle>,
    pub has_transparency: bool,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn push_record(&mut self, record: &VertexRecord) {
        record.write_to(&mut self.vertices);
    }

    pub fn records(&self) -> impl Iterator<Item = VertexRecord> + '_ {
        self.vertices
            .chunks_exact(STRIDE)
            .filter_map(VertexRecord::from_slice)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(bincode::deserialize::<MeshData>(&bytes)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self)?)
    }
}

/// Self-contained cooked model: `textures[i]` holds the pixels behind `mesh.textures[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshPackage {
    pub mesh: MeshData,
    pub textures: Vec<TextureData>,
}

impl MeshPackage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(bincode::deserialize::<MeshPackage>(&bytes)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        MeshPackage::from_bytes(data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self)?)
    }
}
