//! First-person camera: position, yaw and forward velocity.
//! The frame driver moves it from input; the pipeline only reads the view matrix.

use super::math::{Mat4, Vec3, Vec4};

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Unit look direction, derived from yaw
    pub direction: Vec3,
    /// Displacement applied by the last forward/backward move
    pub forward_velocity: Vec3,
    /// Rotation about the world Y axis (radians)
    pub yaw: f32,
}

impl Camera {
    pub const MOVE_SPEED: f32 = 5.0;
    pub const CLIMB_SPEED: f32 = 3.0;
    pub const TURN_SPEED: f32 = 1.0;

    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            direction: Vec3::FORWARD,
            forward_velocity: Vec3::ZERO,
            yaw: 0.0,
        }
    }

    /// Recompute `direction` from yaw (rotating +Z about Y)
    pub fn update_direction(&mut self) {
        let rotated = Mat4::rotation_y(self.yaw).mul_vec4(Vec4::from(Vec3::FORWARD));
        self.direction = Vec3::from(rotated).normalize();
    }

    /// World-to-camera matrix for the current position and yaw
    pub fn view_matrix(&mut self) -> Mat4 {
        self.update_direction();
        let target = self.position + self.direction;
        Mat4::look_at(self.position, target, Vec3::UP)
    }

    pub fn move_forward(&mut self, dt: f32) {
        self.update_direction();
        self.forward_velocity = self.direction * (Self::MOVE_SPEED * dt);
        self.position = self.position + self.forward_velocity;
    }

    pub fn move_backward(&mut self, dt: f32) {
        self.update_direction();
        self.forward_velocity = self.direction * (Self::MOVE_SPEED * dt);
        self.position = self.position - self.forward_velocity;
    }

    pub fn climb(&mut self, dt: f32) {
        self.position.y += Self::CLIMB_SPEED * dt;
    }

    pub fn turn(&mut self, dt: f32) {
        self.yaw += Self::TURN_SPEED * dt;
    }

    /// Yaw towards -X, which is left on screen
    pub fn turn_left(&mut self, dt: f32) {
        self.turn(-dt);
    }

    pub fn turn_right(&mut self, dt: f32) {
        self.turn(dt);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
