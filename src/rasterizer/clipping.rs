//! Sutherland-Hodgman frustum clipping in camera space.
//!
//! A triangle is promoted to a [`Polygon`], clipped against the six view
//! planes in a fixed order, then fanned back into triangles. A triangle can
//! produce 0 to 7 output triangles.

use super::math::{Vec2, Vec3};

/// Vertex ceiling for a clipped polygon. A triangle gains at most one vertex per plane.
pub const MAX_POLY_VERTICES: usize = 10;

/// A plane given by a point on it and an inward-pointing normal
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Positive inside the frustum, negative outside
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }
}

/// The six view-frustum planes
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Left, right, top, bottom, near, far. Clipping runs in this order.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Build the planes from the full horizontal/vertical fov (radians) and near/far distances.
    pub fn new(fov_x: f32, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        let (sin_half_x, cos_half_x) = (fov_x / 2.0).sin_cos();
        let (sin_half_y, cos_half_y) = (fov_y / 2.0).sin_cos();

        let origin = Vec3::ZERO;
        Self {
            planes: [
                Plane { point: origin, normal: Vec3::new(cos_half_x, 0.0, sin_half_x) },
                Plane { point: origin, normal: Vec3::new(-cos_half_x, 0.0, sin_half_x) },
                Plane { point: origin, normal: Vec3::new(0.0, -cos_half_y, sin_half_y) },
                Plane { point: origin, normal: Vec3::new(0.0, cos_half_y, sin_half_y) },
                Plane { point: Vec3::new(0.0, 0.0, z_near), normal: Vec3::FORWARD },
                Plane { point: Vec3::new(0.0, 0.0, z_far), normal: Vec3::new(0.0, 0.0, -1.0) },
            ],
        }
    }

    /// Frustum for a viewport, deriving the horizontal fov from the vertical one.
    pub fn for_viewport(fov_y: f32, width: usize, height: usize, z_near: f32, z_far: f32) -> Self {
        let aspect_x = width as f32 / height as f32;
        let fov_x = ((fov_y / 2.0).tan() * aspect_x).atan() * 2.0;
        Self::new(fov_x, fov_y, z_near, z_far)
    }

    /// Clip the polygon against every plane. An empty result means nothing to draw.
    pub fn clip(&self, polygon: &mut Polygon) {
        for plane in &self.planes {
            if polygon.is_empty() {
                return;
            }
            polygon.clip_against_plane(plane);
        }
    }
}

/// Fixed-capacity convex polygon with a texture coordinate per vertex
#[derive(Debug, Clone, Copy)]
pub struct Polygon {
    vertices: [Vec3; MAX_POLY_VERTICES],
    texcoords: [Vec2; MAX_POLY_VERTICES],
    count: usize,
}

impl Polygon {
    pub fn empty() -> Self {
        Self {
            vertices: [Vec3::ZERO; MAX_POLY_VERTICES],
            texcoords: [Vec2::default(); MAX_POLY_VERTICES],
            count: 0,
        }
    }

    pub fn from_triangle(vertices: [Vec3; 3], texcoords: [Vec2; 3]) -> Self {
        let mut poly = Self::empty();
        for (v, t) in vertices.into_iter().zip(texcoords) {
            poly.push(v, t);
        }
        poly
    }

    /// Panics past `MAX_POLY_VERTICES`; well-formed clipping never gets there.
    pub fn push(&mut self, vertex: Vec3, texcoord: Vec2) {
        assert!(
            self.count < MAX_POLY_VERTICES,
            "clipped polygon exceeded {} vertices",
            MAX_POLY_VERTICES
        );
        self.vertices[self.count] = vertex;
        self.texcoords[self.count] = texcoord;
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// Fewer than three vertices: nothing renderable is left
    pub fn is_empty(&self) -> bool {
        self.count < 3
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices[..self.count]
    }

    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords[..self.count]
    }

    /// Keep the part of the polygon on the inner side of `plane`.
    ///
    /// Vertices on the plane count as inside. A new vertex is emitted where an
    /// edge strictly crosses the plane, with position and texture coordinate
    /// interpolated at the crossing.
    pub fn clip_against_plane(&mut self, plane: &Plane) {
        let mut inside = Polygon::empty();
        if self.count == 0 {
            *self = inside;
            return;
        }

        let mut prev = self.count - 1;
        let mut prev_dist = plane.signed_distance(self.vertices[prev]);

        for curr in 0..self.count {
            let curr_dist = plane.signed_distance(self.vertices[curr]);

            if prev_dist * curr_dist < 0.0 {
                let t = prev_dist / (prev_dist - curr_dist);
                inside.push(
                    self.vertices[prev].lerp(self.vertices[curr], t),
                    self.texcoords[prev].lerp(self.texcoords[curr], t),
                );
            }

            if curr_dist >= 0.0 {
                inside.push(self.vertices[curr], self.texcoords[curr]);
            }

            prev = curr;
            prev_dist = curr_dist;
        }

        if inside.count < 3 {
            inside.count = 0;
        }
        *self = inside;
    }

    /// Fan triangulation from vertex 0: (0,1,2), (0,2,3), ... (0,n-2,n-1).
    /// Only valid because clipped polygons stay convex.
    pub fn triangles(&self) -> impl Iterator<Item = ([Vec3; 3], [Vec2; 3])> + '_ {
        let n = if self.is_empty() { 0 } else { self.count - 2 };
        (0..n).map(move |i| {
            (
                [self.vertices[0], self.vertices[i + 1], self.vertices[i + 2]],
                [self.texcoords[0], self.texcoords[i + 1], self.texcoords[i + 2]],
            )
        })
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self::empty()
    }
}
