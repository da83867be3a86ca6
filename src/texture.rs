use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use sv_format::texture::{TextureData, TextureHandle};

#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Texture storage is full")]
    StorageFull,
}

/// Turns an image file into a texture handle. `None` means "no texture".
pub trait ImageDecoder {
    fn decode(&mut self, path: &Path) -> Option<TextureHandle>;
}

/// CPU-side texture store backed by the `image` crate.
///
/// Handles are handed out as `1..=n` in insertion order; decoding the same
/// path again returns the handle of the first decode.
#[derive(Debug, Default)]
pub struct TextureStorage {
    textures: Vec<Option<TextureData>>,
    by_path: HashMap<PathBuf, TextureHandle>,
}

impl TextureStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn load(&mut self, path: &Path) -> Result<TextureHandle, TextureError> {
        if let Some(handle) = self.by_path.get(path) {
            return Ok(*handle);
        }

        let handle = u32::try_from(self.textures.len() + 1)
            .ok()
            .and_then(TextureHandle::new)
            .ok_or(TextureError::StorageFull)?;
        let texture = decode_file(path)?;
        debug!(
            "Decoded texture {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );

        self.textures.push(Some(texture));
        self.by_path.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureData> {
        self.textures
            .get(handle.get() as usize - 1)
            .and_then(Option::as_ref)
    }

    /// Moves the pixels out of the store; later lookups of `handle` return `None`.
    pub fn take(&mut self, handle: TextureHandle) -> Option<TextureData> {
        self.textures
            .get_mut(handle.get() as usize - 1)
            .and_then(Option::take)
    }
}

impl ImageDecoder for TextureStorage {
    fn decode(&mut self, path: &Path) -> Option<TextureHandle> {
        match self.load(path) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("Failed to load texture {}: {}", path.display(), err);
                None
            }
        }
    }
}

/// Decoder that never produces a texture, for geometry-only loads.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTextures;

impl ImageDecoder for NoTextures {
    fn decode(&mut self, path: &Path) -> Option<TextureHandle> {
        debug!("Skipping texture {}", path.display());
        None
    }
}

// decodes to RGBA8 and flips rows so the first row is the bottom of the image
fn decode_file(path: &Path) -> Result<TextureData, TextureError> {
    let image = image::open(path)?.flipv().to_rgba8();
    let (width, height) = image.dimensions();

    Ok(TextureData {
        width,
        height,
        pixels: image.into_raw(),
    })
}
