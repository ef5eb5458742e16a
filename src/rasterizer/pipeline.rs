//! Per-frame geometry pipeline
//!
//! Transform -> Cull -> Clip -> Triangulate -> Project -> Rasterize, one
//! face at a time, in mesh and face order. Stages are plain functions so each
//! can be exercised on its own; [`Pipeline`] strings them together.

use super::clipping::{Frustum, Polygon};
use super::light::Light;
use super::math::{world_matrix, Mat4, Vec3, Vec4};
use super::render::{draw_filled_triangle, draw_filled_triangle_unsorted, draw_textured_triangle, Framebuffer};
use super::types::{Color, CullMode, DepthPolicy, PipelineSettings, Triangle};
use crate::world::Mesh;

/// Counters for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub faces: usize,
    pub culled: usize,
    pub clipped_away: usize,
    pub triangles: usize,
}

/// Camera-space positions of a face's three corners
pub fn transform_face(model_view: &Mat4, vertices: [Vec3; 3]) -> [Vec3; 3] {
    vertices.map(|v| model_view.transform_point(v))
}

/// Normalized face normal from the edges A->B and A->C
pub fn face_normal(vertices: &[Vec3; 3]) -> Vec3 {
    let ab = (vertices[1] - vertices[0]).normalize();
    let ac = (vertices[2] - vertices[0]).normalize();
    ab.cross(ac).normalize()
}

/// True when the normal points away from the camera at the origin.
///
/// The ray runs from vertex A back to the camera; a negative dot product means
/// the face is seen from behind.
pub fn is_back_facing(normal: Vec3, vertex_a: Vec3) -> bool {
    let camera_ray = Vec3::ZERO - vertex_a;
    normal.dot(camera_ray) < 0.0
}

/// Projection stage: clip coordinates, divide by w, then viewport mapping.
///
/// Y is flipped so that up in camera space is up on screen. w is kept for
/// perspective-correct interpolation.
pub fn project_to_screen(projection: &Mat4, point: Vec3, width: usize, height: usize) -> Vec4 {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;

    let mut p = projection.mul_vec4_project(Vec4::from(point));
    p.x *= half_w;
    p.y *= -half_h;
    p.x += half_w;
    p.y += half_h;
    p
}

/// Runs the per-frame pipeline with explicit settings and viewport
pub struct Pipeline {
    pub settings: PipelineSettings,
    width: usize,
    height: usize,
    projection: Mat4,
    frustum: Frustum,
    light: Light,
    triangles: Vec<Triangle>,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings, width: usize, height: usize) -> Self {
        let aspect_y = height as f32 / width as f32;
        Self {
            light: Light::new(settings.light_dir),
            projection: Mat4::perspective(settings.fov_y, aspect_y, settings.z_near, settings.z_far),
            frustum: Frustum::for_viewport(settings.fov_y, width, height, settings.z_near, settings.z_far),
            settings,
            width,
            height,
            triangles: Vec::new(),
        }
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Triangles queued by the last `process_mesh` calls
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
    }

    /// Transform, cull, clip and project every face of a mesh, queueing the
    /// resulting screen-space triangles.
    pub fn process_mesh(&mut self, mesh: &Mesh, mesh_index: usize, view: &Mat4, stats: &mut FrameStats) {
        let world = world_matrix(mesh.scale, mesh.rotation, mesh.translation);
        let model_view = *view * world;
        self.light = Light::new(self.settings.light_dir);

        for face in &mesh.faces {
            stats.faces += 1;
            let corners = face.indices().map(|i| mesh.vertices[i]);
            let cam = transform_face(&model_view, corners);

            let normal = face_normal(&cam);
            if self.settings.cull_mode == CullMode::BackFace && is_back_facing(normal, cam[0]) {
                stats.culled += 1;
                continue;
            }

            let mut polygon = Polygon::from_triangle(cam, face.uvs);
            self.frustum.clip(&mut polygon);
            if polygon.is_empty() {
                stats.clipped_away += 1;
                continue;
            }

            let color = self.light.apply(face.color, normal);
            for (points, texcoords) in polygon.triangles() {
                let projected = points.map(|p| project_to_screen(&self.projection, p, self.width, self.height));
                let mut tri = Triangle::new(projected, texcoords, color);
                tri.mesh = mesh_index;
                self.triangles.push(tri);
            }
        }
    }

    /// Draw the queued triangles into the framebuffer according to the render mode.
    ///
    /// `meshes` supplies textures by each triangle's mesh index.
    pub fn rasterize(&mut self, fb: &mut Framebuffer, meshes: &[Mesh]) {
        let mode = self.settings.render_mode;

        if self.settings.depth_policy == DepthPolicy::PainterSort {
            self.triangles
                .sort_by(|a, b| b.avg_depth().total_cmp(&a.avg_depth()));
        }

        for tri in &self.triangles {
            let texture = meshes.get(tri.mesh).and_then(|m| m.texture.as_ref());

            if mode.textures() {
                match texture {
                    Some(tex) => draw_textured_triangle(fb, &tri.points, &tri.texcoords, tex),
                    None => self.fill(fb, tri),
                }
            } else if mode.fills() {
                self.fill(fb, tri);
            }

            if mode.wireframe() {
                fb.draw_triangle(&tri.points, Color::WHITE);
            }

            if mode.vertices() {
                for p in &tri.points {
                    fb.draw_rect(p.x as i32 - 3, p.y as i32 - 3, 6, 6, Color::RED);
                }
            }
        }
    }

    fn fill(&self, fb: &mut Framebuffer, tri: &Triangle) {
        match self.settings.depth_policy {
            DepthPolicy::PerPixel => draw_filled_triangle(fb, &tri.points, tri.color),
            DepthPolicy::PainterSort => draw_filled_triangle_unsorted(fb, &tri.points, tri.color),
        }
    }

    /// Run the whole pipeline for every mesh. The caller clears the buffers.
    pub fn render_frame(&mut self, fb: &mut Framebuffer, meshes: &[Mesh], view: &Mat4) -> FrameStats {
        let mut stats = FrameStats::default();
        self.clear();

        for (index, mesh) in meshes.iter().enumerate() {
            self.process_mesh(mesh, index, view, &mut stats);
        }
        stats.triangles = self.triangles.len();

        self.rasterize(fb, meshes);
        log::trace!(
            "frame: {} faces, {} culled, {} clipped away, {} triangles",
            stats.faces, stats.culled, stats.clipped_away, stats.triangles
        );
        stats
    }
}
