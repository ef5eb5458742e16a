//! Flat per-face lighting

use super::math::Vec3;
use super::types::Color;

/// Directional light
#[derive(Debug, Clone, Copy)]
pub struct Light {
    /// Direction the light travels (normalized)
    pub direction: Vec3,
}

impl Light {
    pub fn new(direction: Vec3) -> Self {
        Self { direction: direction.normalize() }
    }

    /// `-dot(normal, direction)` clamped to 0..1
    pub fn intensity(&self, normal: Vec3) -> f32 {
        (-normal.dot(self.direction)).clamp(0.0, 1.0)
    }

    /// Scale the face's base color by the light hitting it
    pub fn apply(&self, color: Color, normal: Vec3) -> Color {
        color.shade(self.intensity(normal))
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::FORWARD)
    }
}
