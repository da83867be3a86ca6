//! Mesh ingestion: from a Wavefront model on disk to an interleaved vertex stream.

pub mod assembler;
pub mod face;
pub mod mtl;
pub mod obj;
pub mod triangulate;
