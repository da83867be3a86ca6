use log::debug;
use sv_format::{
    mesh::{MeshData, VertexRecord, NO_TEXTURE_SLOT},
    texture::TextureHandle,
};

use super::{face::Face, triangulate::triangulate};

/// Triangulates every face and interleaves the result into one vertex stream.
///
/// Texture handles are collected in first-reference order; faces sharing a
/// handle share its slot.
pub fn assemble(faces: &[Face]) -> MeshData {
    let mut mesh = MeshData::default();

    for face in faces {
        let material = &face.material;

        let texture_slot = match material.diffuse_texture {
            Some(handle) => texture_slot(&mut mesh.textures, handle) as f32,
            None => NO_TEXTURE_SLOT,
        };

        if material.is_transparent() {
            mesh.has_transparency = true;
        }

        for vertex in triangulate(&face.vertices) {
            mesh.push_record(&VertexRecord {
                position: vertex.point,
                normal: vertex.normal,
                uv: vertex.texture,
                texture_slot,
                diffuse_color: material.diffuse_color,
                opacity: material.opacity,
            });
        }
    }

    debug!(
        "Assembled {} faces into {} triangles with {} textures",
        faces.len(),
        mesh.triangle_count(),
        mesh.textures.len()
    );

    mesh
}

fn texture_slot(textures: &mut Vec<TextureHandle>, handle: TextureHandle) -> usize {
    match textures.iter().position(|&known| known == handle) {
        Some(slot) => slot,
        None => {
            textures.push(handle);
            textures.len() - 1
        }
    }
}
