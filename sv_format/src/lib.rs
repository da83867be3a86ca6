pub mod error;
pub mod mesh;
pub mod texture;
