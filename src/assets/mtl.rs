//! Wavefront `.mtl` material resolution.
//!
//! Only the diffuse part of a material is read: `Kd`, `d`, `Tr` and `map_Kd`.
//! Every failure degrades to the default material, since faces without a
//! usable material still have to be drawn.

use std::{
    collections::HashMap,
    fs,
    io::{self, BufRead},
    num,
    path::{Path, PathBuf},
};

use gfx_maths::*;
use log::{debug, info, warn};
use sv_format::texture::TextureHandle;

use crate::texture::ImageDecoder;

#[derive(thiserror::Error, Debug)]
pub enum MaterialError {
    #[error("Failed to read material library.")]
    Io(#[from] io::Error),
    #[error("Failed to parse float.")]
    ParseFloat(#[from] num::ParseFloatError),
    #[error("Expected {expected} values, found {found}.")]
    MissingValues { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse_color: Vec3,
    pub opacity: f32,
    pub diffuse_texture: Option<TextureHandle>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_color: Vec3::new(0.8, 0.8, 0.8),
            opacity: 1.0,
            diffuse_texture: None,
        }
    }
}

impl Material {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Resolved materials of one mesh load, keyed by library path and material name.
///
/// Keeps repeated `usemtl` references from re-reading the library and
/// re-decoding its textures.
#[derive(Debug, Default)]
pub struct MaterialCache {
    materials: HashMap<(PathBuf, String), Material>,
}

impl MaterialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn resolve(
        &mut self,
        library: &Path,
        name: &str,
        decoder: &mut dyn ImageDecoder,
    ) -> Material {
        self.materials
            .entry((library.to_path_buf(), name.to_owned()))
            .or_insert_with(|| resolve_material(library, name, decoder))
            .clone()
    }
}

/// Looks up `name` in the material library at `library`.
///
/// Returns the default material when the library cannot be read or does not
/// declare `name`.
pub fn resolve_material(library: &Path, name: &str, decoder: &mut dyn ImageDecoder) -> Material {
    info!("Resolving material `{}` from {}", name, library.display());

    match parse(library, name, decoder) {
        Ok(Some(material)) => material,
        Ok(None) => {
            warn!(
                "Material `{}` not found in {}, using default material",
                name,
                library.display()
            );
            Material::named(name)
        }
        Err(err) => {
            warn!(
                "Failed to open material library {}: {}",
                library.display(),
                err
            );
            Material::default()
        }
    }
}

fn parse(
    library: &Path,
    name: &str,
    decoder: &mut dyn ImageDecoder,
) -> Result<Option<Material>, MaterialError> {
    let file = fs::File::open(library)?;
    let directory = library.parent().unwrap_or_else(|| Path::new(""));

    let mut material = Material::named(name);
    let mut found = false;
    let mut in_block = false;

    for (number, line) in io::BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!(
                    "Skipping line {}:{}: {}",
                    library.display(),
                    number + 1,
                    err
                );
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (token, value) = line
            .split_once(char::is_whitespace)
            .map(|(token, value)| (token, value.trim()))
            .unwrap_or((line, ""));

        if token == "newmtl" {
            in_block = value.split_whitespace().next() == Some(name);
            found |= in_block;
            continue;
        }

        if !in_block {
            continue;
        }

        debug!("Material record: \"{}\"", line);
        if let Err(err) = parse_token(token, value, directory, &mut material, decoder) {
            warn!(
                "Skipping `{}` record at {}:{}: {}",
                token,
                library.display(),
                number + 1,
                err
            );
        }
    }

    Ok(if found { Some(material) } else { None })
}

fn parse_token(
    token: &str,
    value: &str,
    directory: &Path,
    material: &mut Material,
    decoder: &mut dyn ImageDecoder,
) -> Result<(), MaterialError> {
    match token {
        "Kd" => {
            let [r, g, b] = parse_floats::<3>(value)?;
            material.diffuse_color = Vec3::new(r, g, b);
        }
        "d" => {
            let [opacity] = parse_floats::<1>(value)?;
            material.opacity = opacity;
        }
        "Tr" => {
            let [transparency] = parse_floats::<1>(value)?;
            material.opacity = 1.0 - transparency;
        }
        "map_Kd" => {
            // options like `-o u v` precede the file name
            if let Some(file) = value.split_whitespace().last() {
                material.diffuse_texture = decoder.decode(&directory.join(file));
            }
        }
        _ => debug!("Ignoring material token: \"{}\"", token),
    }

    Ok(())
}

// parses the first N whitespace separated floats of a value
fn parse_floats<const N: usize>(value: &str) -> Result<[f32; N], MaterialError> {
    let mut out = [0.0; N];
    let mut found = 0;

    for (slot, part) in out.iter_mut().zip(value.split_whitespace()) {
        *slot = part.parse()?;
        found += 1;
    }

    if found < N {
        return Err(MaterialError::MissingValues { expected: N, found });
    }

    Ok(out)
}
