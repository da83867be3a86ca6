use anyhow::{Context, Result};
use log::info;
use scene_viewer::{
    assets::obj::{self, meta::ObjMeta},
    texture::TextureStorage,
};
use std::path::{Path, PathBuf};
use sv_format::{mesh::MeshPackage, texture::TextureData};

use crate::utils;

/// Extension of cooked mesh packages.
pub(crate) const EXTENSION: &str = "svm";

// loads the model and moves the pixels of every referenced texture into the package
fn package(path: &Path, meta: ObjMeta) -> Result<MeshPackage> {
    let mut storage = TextureStorage::new();
    let mesh = obj::try_load(path, meta, &mut storage)
        .with_context(|| format!("Could not load model: {}", path.display()))?;

    let textures = mesh
        .textures
        .iter()
        .map(|&handle| {
            storage
                .take(handle)
                .with_context(|| format!("Texture {} is missing from storage", handle))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MeshPackage { mesh, textures })
}

fn serialize(package: &MeshPackage) -> Result<Vec<u8>> {
    package
        .to_bytes()
        .context("Could not serialize MeshPackage")
}

fn save(path: &Path, output_dir: &Path, data: &[u8]) -> Result<PathBuf> {
    let file_name = utils::file_name(path)?;
    let target = utils::combine_path(output_dir, file_name, EXTENSION);
    utils::write_file(&target, data)?;
    Ok(target)
}

/// Cooks a Wavefront `.obj` file into a `.svm` package inside `output_dir`.
pub(crate) fn process(path: &Path, output_dir: &Path) -> Result<PathBuf> {
    info!("Processing Wavefront `.obj`-file: `{}`", path.display());
    let meta = ObjMeta::find(path)?;
    let package = package(path, meta)?;

    info!(
        "Cooked {} vertices and {} textures ({} bytes of pixels){}",
        package.mesh.vertex_count(),
        package.textures.len(),
        package.textures.iter().map(TextureData::byte_len).sum::<usize>(),
        if package.mesh.has_transparency {
            " (transparent)"
        } else {
            ""
        }
    );

    save(path, output_dir, &serialize(&package)?)
}
