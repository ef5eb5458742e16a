//! Mesh data model

use crate::rasterizer::{Face, Texture, Vec2, Vec3};
use super::SceneError;

/// Indexed triangle mesh with its own transform and texture
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub texture: Option<Texture>,
    pub scale: Vec3,
    /// Euler angles (radians), applied X then Y then Z
    pub rotation: Vec3,
    pub translation: Vec3,
    /// Rotation velocity (radians per second)
    pub spin: Vec3,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            name: String::new(),
            vertices,
            faces,
            texture: None,
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
            spin: Vec3::ZERO,
        }
    }

    /// Every face must index an existing vertex
    pub fn validate(&self) -> Result<(), SceneError> {
        let count = self.vertices.len();
        for (face_index, face) in self.faces.iter().enumerate() {
            if let Some(&index) = face.indices().iter().find(|&&i| i >= count) {
                return Err(SceneError::InvalidFace {
                    mesh: self.name.clone(),
                    face: face_index,
                    index,
                    vertex_count: count,
                });
            }
        }
        Ok(())
    }

    /// Advance the spin animation
    pub fn animate(&mut self, dt: f32) {
        self.rotation = self.rotation + self.spin * dt;
    }

    /// Axis-aligned cube of side 2 centred on the origin, wound clockwise
    /// when seen from outside.
    pub fn cube() -> Self {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];

        let lower = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)];
        let upper = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)];

        // Two triangles per side: (a, b, c) and (a, c, d)
        let quads = [
            [0, 1, 2, 3], // front
            [3, 2, 4, 5], // right
            [5, 4, 6, 7], // back
            [7, 6, 1, 0], // left
            [1, 6, 4, 2], // top
            [5, 7, 0, 3], // bottom
        ];

        let mut faces = Vec::with_capacity(12);
        for [a, b, c, d] in quads {
            faces.push(Face::new(a, b, c, lower));
            faces.push(Face::new(a, c, d, upper));
        }

        let mut mesh = Self::new(vertices, faces);
        mesh.name = "cube".to_string();
        mesh
    }
}
