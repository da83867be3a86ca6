//! Wavefront `.obj` loading.

mod builder;
pub mod meta;
mod parser;

use std::path::Path;

use log::warn;
use sv_format::mesh::MeshData;

use self::{builder::ObjMeshBuilder, meta::ObjMeta};
use super::{assembler, face::Face};
use crate::texture::ImageDecoder;

pub use parser::ParserError;

/// Reads the faces of a model, each with its resolved material.
pub fn parse_mesh(
    path: &Path,
    meta: ObjMeta,
    decoder: &mut dyn ImageDecoder,
) -> Result<Vec<Face>, ParserError> {
    let directory = path.parent().unwrap_or_else(|| Path::new(""));
    let mut builder = ObjMeshBuilder::new(directory, meta, decoder);
    parser::parse(path, &mut builder)?;
    Ok(builder.finish())
}

/// Loads and assembles a model. Fails only if the file cannot be read.
pub fn try_load(
    path: &Path,
    meta: ObjMeta,
    decoder: &mut dyn ImageDecoder,
) -> Result<MeshData, ParserError> {
    let faces = parse_mesh(path, meta, decoder)?;
    Ok(assembler::assemble(&faces))
}

/// Best-effort variant of [`try_load`]: an unreadable model yields an empty mesh.
pub fn load(path: &Path, meta: ObjMeta, decoder: &mut dyn ImageDecoder) -> MeshData {
    match try_load(path, meta, decoder) {
        Ok(mesh) => mesh,
        Err(err) => {
            warn!("Failed to load mesh {}: {}", path.display(), err);
            MeshData::default()
        }
    }
}
