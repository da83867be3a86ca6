use gfx_maths::*;

use super::transform::euler_rotation;

fn world_up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Held-down state of the camera controls for one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub roll_left: bool,
    pub roll_right: bool,
    pub reset_roll: bool,
}

#[derive(Debug)]
pub struct Camera {
    position: Vec3,
    rotation: Quaternion,
    /// Vertical field of view in degrees.
    fovy: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Units per second.
    pub const MOVE_SPEED: f32 = 2.0;
    /// Degrees per second.
    pub const TURN_SPEED: f32 = 60.0;

    pub fn builder() -> CameraBuilder {
        CameraBuilder {
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            fovy: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::new(1.0, 0.0, 0.0)
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 1.0, 0.0)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_view_matrix();
    }

    /// Updates the projection after a resize. A zero height is treated as one.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.set_aspect(width as f32 / height.max(1) as f32);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    fn update_projection_matrix(&mut self) {
        self.projection_matrix =
            Mat4::perspective_vulkan(self.fovy.to_radians(), self.near, self.far, self.aspect);
    }

    fn update_view_matrix(&mut self) {
        self.view_matrix = Mat4::rotate(-self.rotation) * Mat4::translate(-self.position);
    }

    /// Integrates one frame of held-down controls.
    pub fn update(&mut self, input: &CameraInput, delta: f32) {
        let step = Self::MOVE_SPEED * delta;
        let angle = (Self::TURN_SPEED * delta).to_radians();

        let forward = self.forward();
        let right = self.right();

        let mut movement = Vec3::zero();
        if input.forward {
            movement += forward;
        }
        if input.backward {
            movement += -forward;
        }
        if input.right {
            movement += right;
        }
        if input.left {
            movement += -right;
        }
        if input.up {
            movement += world_up();
        }
        if input.down {
            movement += -world_up();
        }
        self.position += movement * step;

        let mut rotation = self.rotation;
        if input.pitch_up {
            rotation = Quaternion::axis_angle(right, angle) * rotation;
        }
        if input.pitch_down {
            rotation = Quaternion::axis_angle(right, -angle) * rotation;
        }
        if input.yaw_left {
            rotation = Quaternion::axis_angle(world_up(), angle) * rotation;
        }
        if input.yaw_right {
            rotation = Quaternion::axis_angle(world_up(), -angle) * rotation;
        }
        if input.roll_left {
            rotation = Quaternion::axis_angle(forward, -angle) * rotation;
        }
        if input.roll_right {
            rotation = Quaternion::axis_angle(forward, angle) * rotation;
        }
        self.rotation = renormalized(rotation);

        if input.reset_roll {
            self.reset_roll();
        }

        self.update_view_matrix();
    }

    /// Levels the camera so that `right` is horizontal, keeping the view direction.
    pub fn reset_roll(&mut self) {
        let forward = self.forward();
        let yaw = (-forward.x).atan2(-forward.z);
        let pitch = forward.y.max(-1.0).min(1.0).asin();

        self.rotation = renormalized(
            Quaternion::axis_angle(world_up(), yaw)
                * Quaternion::axis_angle(Vec3::new(1.0, 0.0, 0.0), pitch),
        );
        self.update_view_matrix();
    }
}

// keeps accumulated rotations from drifting away from unit length
fn renormalized(q: Quaternion) -> Quaternion {
    let length = (q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w).sqrt();
    if length > 0.0 && length.is_finite() {
        Quaternion::new(q.x / length, q.y / length, q.z / length, q.w / length)
    } else {
        Quaternion::identity()
    }
}

pub struct CameraBuilder {
    position: Vec3,
    rotation: Vec3,
    fovy: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl CameraBuilder {
    pub fn position(&mut self, pos: Vec3) -> &mut Self {
        self.position = pos;
        self
    }

    /// Euler angles in degrees, applied about X, then Y, then Z.
    pub fn rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    /// Vertical field of view in degrees.
    pub fn fovy(&mut self, fovy: f32) -> &mut Self {
        const MIN: f32 = 1.0;
        const MAX: f32 = 179.0;

        self.fovy = fovy.max(MIN).min(MAX);
        if (self.fovy - fovy).abs() > 1e-6 {
            log::warn!("FovY out of bounds: {} <= `{}` <= {}", MIN, fovy, MAX);
        }
        self
    }

    pub fn aspect(&mut self, aspect: f32) -> &mut Self {
        self.aspect = aspect;
        self
    }

    pub fn near(&mut self, near: f32) -> &mut Self {
        if near <= 0.0 {
            log::warn!("Near is negative: `{}`", near);
        }
        self.near = near;
        self
    }

    pub fn far(&mut self, far: f32) -> &mut Self {
        if far <= 0.0 {
            log::warn!("Far is negative: `{}`", far);
        }
        self.far = far;
        self
    }

    pub fn build(&mut self) -> Camera {
        if self.far < self.near {
            log::warn!("Far is closer than near: `{}` `{}`", self.far, self.near);
        }

        let mut cam = Camera {
            position: self.position,
            rotation: renormalized(euler_rotation(self.rotation)),
            fovy: self.fovy,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
            view_matrix: Mat4::identity(),
            projection_matrix: Mat4::identity(),
        };
        cam.update_projection_matrix();
        cam.update_view_matrix();
        cam
    }
}
