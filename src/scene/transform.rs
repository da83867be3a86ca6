use gfx_maths::*;

/// Rotation from Euler angles in degrees, applied about X, then Y, then Z.
pub fn euler_rotation(degrees: Vec3) -> Quaternion {
    Quaternion::axis_angle(Vec3::new(1.0, 0.0, 0.0), degrees.x.to_radians())
        * Quaternion::axis_angle(Vec3::new(0.0, 1.0, 0.0), degrees.y.to_radians())
        * Quaternion::axis_angle(Vec3::new(0.0, 0.0, 1.0), degrees.z.to_radians())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            scale: Vec3::one(),
        }
    }
}

impl Transform {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::local_to_world(self.position, euler_rotation(self.rotation), self.scale)
    }
}
