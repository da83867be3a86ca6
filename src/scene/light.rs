use gfx_maths::*;
use log::warn;

/// Upper bound of point lights the shading backend accepts.
pub const MAX_LIGHTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            color: Vec3::one(),
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct LightManager {
    point_lights: Vec<PointLight>,
}

impl LightManager {
    /// Adds a light; lights beyond [`MAX_LIGHTS`] are dropped.
    pub fn add_light(&mut self, light: PointLight) {
        if self.point_lights.len() >= MAX_LIGHTS {
            warn!(
                "Light limit of {} reached, dropping light at {:?}",
                MAX_LIGHTS, light.position
            );
            return;
        }
        self.point_lights.push(light);
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn len(&self) -> usize {
        self.point_lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point_lights.is_empty()
    }

    /// Packs the lights for a uniform upload: a header holding the light
    /// count, then position and scaled color per light, each padded to four floats.
    pub fn uniform_data(&self) -> Vec<f32> {
        // push padding floats as gpu vecs are always 4 * T
        let mut data: Vec<f32> = vec![self.point_lights.len() as f32, 0.0, 0.0, 0.0];
        for light in &self.point_lights {
            let radiance = light.color * light.intensity;
            data.extend_from_slice(&[light.position.x, light.position.y, light.position.z, 0.0]);
            data.extend_from_slice(&[radiance.x, radiance.y, radiance.z, 0.0]);
        }
        data
    }
}
