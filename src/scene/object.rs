use std::path::Path;

use log::{info, warn};
use sv_format::mesh::MeshData;

use super::transform::Transform;
use crate::assets::obj::{self, meta::ObjMeta};
use crate::texture::ImageDecoder;

/// A mesh placed in the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshData,
    pub transform: Transform,
    /// Whether the point lights apply; unlit objects show their diffuse color as is.
    pub use_lighting: bool,
}

impl SceneObject {
    pub fn new(name: &str, mesh: MeshData) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Transform::default(),
            use_lighting: true,
        }
    }

    /// Loads the model at `path`; an unreadable model gives an empty mesh.
    pub fn load(name: &str, path: &Path, decoder: &mut dyn ImageDecoder) -> Self {
        let meta = ObjMeta::find(path).unwrap_or_else(|err| {
            warn!("Ignoring import options of {}: {:#}", path.display(), err);
            ObjMeta::default()
        });

        let mesh = obj::load(path, meta, decoder);
        info!(
            "Loaded `{}`: {} vertices, {} textures",
            name,
            mesh.vertex_count(),
            mesh.textures.len()
        );

        Self::new(name, mesh)
    }

    pub fn is_transparent(&self) -> bool {
        self.mesh.has_transparency
    }
}
