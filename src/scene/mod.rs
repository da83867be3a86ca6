pub mod camera;
pub mod description;
pub mod light;
pub mod object;
pub mod transform;

use std::{io, path::Path};

use gfx_maths::*;
use log::info;

use self::{
    camera::Camera,
    description::SceneDescription,
    light::{LightManager, PointLight},
    object::SceneObject,
    transform::Transform,
};
use crate::texture::ImageDecoder;

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene description: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid scene description: {0}")]
    Toml(#[from] toml::de::Error),
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

pub struct Scene {
    pub camera: Camera,
    pub light_manager: LightManager,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            light_manager: LightManager::default(),
            objects: Vec::new(),
        }
    }

    /// Builds a scene from a toml description; model paths are relative to it.
    pub fn from_description(path: &Path, decoder: &mut dyn ImageDecoder) -> Result<Self, SceneError> {
        info!("Loading scene: {}", path.display());
        let description = SceneDescription::parse(path)?;
        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::build(&description, directory, decoder))
    }

    pub fn build(
        description: &SceneDescription,
        directory: &Path,
        decoder: &mut dyn ImageDecoder,
    ) -> Self {
        let camera = Camera::builder()
            .position(vec3(description.camera.position))
            .rotation(vec3(description.camera.rotation))
            .fovy(description.camera.fov)
            .build();
        let mut scene = Self::new(camera);

        for light in &description.lights {
            scene.light_manager.add_light(PointLight {
                position: vec3(light.position),
                color: vec3(light.color),
                intensity: light.intensity,
            });
        }

        for object in &description.objects {
            let mut loaded = SceneObject::load(&object.name, &directory.join(&object.path), decoder);
            loaded.transform = Transform {
                position: vec3(object.position),
                rotation: vec3(object.rotation),
                scale: vec3(object.scale),
            };
            loaded.use_lighting = object.lighting;
            scene.add(loaded);
        }

        scene
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Indices into `objects` in drawing order: opaque objects as declared,
    /// then objects with transparency from the farthest to the nearest.
    pub fn draw_order(&self) -> Vec<usize> {
        let (mut transparent, opaque): (Vec<usize>, Vec<usize>) =
            (0..self.objects.len()).partition(|&i| self.objects[i].is_transparent());

        let eye = self.camera.position();
        let distance = |i: usize| (self.objects[i].transform.position - eye).sqr_magnitude();
        transparent.sort_by(|&a, &b| distance(b).total_cmp(&distance(a)));

        let mut order = opaque;
        order.extend(transparent);
        order
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sv_format::mesh::MeshData;

    fn object(name: &str, transparent: bool, z: f32) -> SceneObject {
        let mut object = SceneObject::new(
            name,
            MeshData {
                has_transparency: transparent,
                ..MeshData::default()
            },
        );
        object.transform.position = Vec3::new(0.0, 0.0, z);
        object
    }

    #[test]
    fn test_draw_order() {
        let mut scene = Scene::new(Camera::builder().position(Vec3::new(0.0, 0.0, 10.0)).build());
        scene.add(object("near glass", true, 8.0));
        scene.add(object("floor", false, 0.0));
        scene.add(object("far glass", true, -5.0));
        scene.add(object("crate", false, 9.0));
        scene.add(object("mid glass", true, 2.0));

        assert_eq!(scene.draw_order(), vec![1, 3, 2, 4, 0]);
    }

    #[test]
    fn test_missing_models_degrade_to_empty_meshes() {
        let description = SceneDescription::from_toml(
            "[[objects]]\nname = \"ghost\"\npath = \"ghost.obj\"\nposition = [1.0, 2.0, 3.0]\n\n\
             [[lights]]\nposition = [0.0, 5.0, 0.0]\n",
        )
        .unwrap();

        let scene = Scene::build(
            &description,
            Path::new("/definitely/not/here"),
            &mut crate::texture::NoTextures,
        );

        assert_eq!(scene.objects.len(), 1);
        assert!(scene.objects[0].mesh.is_empty());
        assert_eq!(scene.objects[0].transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.light_manager.len(), 1);
    }

    #[test]
    fn test_missing_description_is_an_error() {
        assert!(matches!(
            Scene::from_description(
                Path::new("/definitely/not/here/scene.toml"),
                &mut crate::texture::NoTextures
            ),
            Err(SceneError::Io(_))
        ));
    }
}
