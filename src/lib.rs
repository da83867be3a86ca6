pub mod assets;
pub mod scene;
pub mod texture;

pub mod prelude {
    pub use crate::assets::{
        assembler::assemble,
        face::{Face, Vertex},
        mtl::{resolve_material, Material},
        obj::{load, meta::ObjMeta, parse_mesh, try_load, ParserError},
        triangulate::triangulate,
    };
    pub use crate::scene::{
        camera::{Camera, CameraInput},
        light::{LightManager, PointLight},
        object::SceneObject,
        transform::Transform,
        Scene, SceneError,
    };
    pub use crate::texture::{ImageDecoder, NoTextures, TextureStorage};
    pub use sv_format::mesh::{MeshData, MeshPackage};
}
