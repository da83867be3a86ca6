use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroU32};

/// Opaque handle to a decoded texture. A handle is never zero; "no texture" is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(NonZeroU32);

impl TextureHandle {
    /// Returns `None` for the raw value 0.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(TextureHandle)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Decoded RGBA8 pixels, rows bottom-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}
