//! Framebuffer and triangle rasterization
//!
//! Scanline fill with barycentric, perspective-correct attribute
//! interpolation and a less-than depth test.

use super::math::{Vec2, Vec3, Vec4};
use super::types::{Color, Texture};

/// Depth of an empty pixel. Stored depth is `1 - 1/w`, so closer is smaller.
pub const FAR_DEPTH: f32 = 1.0;

/// Color and depth buffers for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![FAR_DEPTH; width * height],
            width,
            height,
        }
    }

    /// Fill the color buffer. Depth is left alone.
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Reset every depth value to the far sentinel
    pub fn clear_depth(&mut self) {
        self.zbuffer.fill(FAR_DEPTH);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Write a pixel; coordinates outside the buffer are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| {
            let p = &self.pixels[idx * 4..idx * 4 + 4];
            Color::with_alpha(p[0], p[1], p[2], p[3])
        })
    }

    /// Stored depth, or `FAR_DEPTH` outside the buffer
    pub fn depth(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(FAR_DEPTH, |idx| self.zbuffer[idx])
    }

    pub fn set_depth(&mut self, x: i32, y: i32, z: f32) {
        if let Some(idx) = self.index(x, y) {
            self.zbuffer[idx] = z;
        }
    }

    /// Write color and depth if `z` is strictly closer than what is stored.
    /// Ties keep the earlier pixel.
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, z: f32, color: Color) -> bool {
        match self.index(x, y) {
            Some(idx) if z < self.zbuffer[idx] => {
                self.zbuffer[idx] = z;
                self.pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_bytes());
                true
            }
            _ => false,
        }
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Triangle outline
    pub fn draw_triangle(&mut self, points: &[Vec4; 3], color: Color) {
        for i in 0..3 {
            let a = points[i];
            let b = points[(i + 1) % 3];
            self.draw_line(a.x as i32, a.y as i32, b.x as i32, b.y as i32, color);
        }
    }

    /// Filled axis-aligned rectangle, top-left corner at (x, y)
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        for row in y..y + height {
            for col in x..x + width {
                self.set_pixel(col, row, color);
            }
        }
    }

    /// Dotted background grid
    pub fn draw_grid(&mut self, spacing: usize, color: Color) {
        let spacing = spacing.max(1);
        for y in (0..self.height).step_by(spacing) {
            for x in (0..self.width).step_by(spacing) {
                self.set_pixel(x as i32, y as i32, color);
            }
        }
    }

    /// Write the color buffer to a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), image::ImageError> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )
    }
}

/// Barycentric weights (alpha, beta, gamma) of `p` in triangle `abc`.
///
/// Uses the 2D cross product (parallelogram area). Returns `None` for
/// zero-area triangles.
pub fn barycentric_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<Vec3> {
    let ac = c - a;
    let ab = b - a;
    let ap = p - a;
    let pc = c - p;
    let pb = b - p;

    let area = ac.x * ab.y - ac.y * ab.x;
    if area.abs() < 1e-6 {
        return None;
    }

    let alpha = (pc.x * pb.y - pc.y * pb.x) / area;
    let beta = (ac.x * ap.y - ac.y * ap.x) / area;
    let gamma = 1.0 - alpha - beta;

    Some(Vec3::new(alpha, beta, gamma))
}

/// Interpolated `1/w` at the given weights
pub fn interpolate_reciprocal_w(weights: Vec3, points: &[Vec4; 3]) -> f32 {
    weights.x / points[0].w + weights.y / points[1].w + weights.z / points[2].w
}

/// Perspective-correct texture coordinate: interpolate u/w, v/w and 1/w, then divide.
///
/// Returns `None` when the interpolated 1/w is not positive.
pub fn perspective_uv(weights: Vec3, points: &[Vec4; 3], uvs: &[Vec2; 3]) -> Option<Vec2> {
    let reciprocal_w = interpolate_reciprocal_w(weights, points);
    if reciprocal_w <= f32::EPSILON {
        return None;
    }

    let u = uvs[0].x / points[0].w * weights.x
        + uvs[1].x / points[1].w * weights.y
        + uvs[2].x / points[2].w * weights.z;
    let v = uvs[0].y / points[0].w * weights.x
        + uvs[1].y / points[1].w * weights.y
        + uvs[2].y / points[2].w * weights.z;

    Some(Vec2::new(u / reciprocal_w, v / reciprocal_w))
}

/// Integer screen position of a triangle corner
#[derive(Debug, Clone, Copy)]
struct ScanVertex {
    x: i32,
    y: i32,
}

/// x where the edge `top -> bottom` crosses row `y`, evaluated from the
/// endpoints. `top.y < bottom.y`.
///
/// Triangles sharing an edge see the same endpoints in the same order, so
/// they compute bit-identical x and split the edge's pixels without gaps.
fn edge_x(top: ScanVertex, bottom: ScanVertex, y: i32) -> f32 {
    let dy = (bottom.y - top.y) as i64;
    let dx = (bottom.x - top.x) as i64;
    top.x as f32 + ((y - top.y) as i64 * dx) as f32 / dy as f32
}

/// Walk every covered pixel of a triangle, calling `plot(x, y)`.
///
/// Vertices are sorted by y. Flat-bottom and flat-top triangles are walked
/// directly; anything else is split at the middle vertex's y into a
/// flat-bottom and a flat-top half, both measured against the unsplit long
/// edge. Spans cover `ceil(left)..ceil(right)`.
fn scan_triangle(corners: [ScanVertex; 3], mut plot: impl FnMut(i32, i32)) {
    let mut v = corners;
    v.sort_by_key(|c| c.y);
    let [v0, v1, v2] = v;

    if v0.y == v2.y {
        // Zero-height: no scanlines
        return;
    }

    if v1.y == v2.y {
        fill_flat_bottom(v0, v1, v2, &mut plot);
    } else if v0.y == v1.y {
        fill_flat_top(v0, v1, v2, &mut plot);
    } else {
        walk_rows(v0.y, v1.y, (v0, v1), (v0, v2), &mut plot);
        // The shared middle row was already drawn by the upper half
        walk_rows(v1.y + 1, v2.y, (v1, v2), (v0, v2), &mut plot);
    }
}

/// Apex at the top, horizontal edge at the bottom
fn fill_flat_bottom(top: ScanVertex, b0: ScanVertex, b1: ScanVertex, plot: &mut impl FnMut(i32, i32)) {
    walk_rows(top.y, b0.y, (top, b0), (top, b1), plot);
}

/// Horizontal edge at the top, apex at the bottom
fn fill_flat_top(t0: ScanVertex, t1: ScanVertex, bottom: ScanVertex, plot: &mut impl FnMut(i32, i32)) {
    walk_rows(t0.y, bottom.y, (t0, bottom), (t1, bottom), plot);
}

/// Rows `y_start..=y_end` between two edges, each given top endpoint first
fn walk_rows(
    y_start: i32,
    y_end: i32,
    edge_a: (ScanVertex, ScanVertex),
    edge_b: (ScanVertex, ScanVertex),
    plot: &mut impl FnMut(i32, i32),
) {
    for y in y_start..=y_end {
        let x_a = edge_x(edge_a.0, edge_a.1, y);
        let x_b = edge_x(edge_b.0, edge_b.1, y);
        scan_span(x_a, x_b, y, plot);
    }
}

fn scan_span(x_a: f32, x_b: f32, y: i32, plot: &mut impl FnMut(i32, i32)) {
    let (left, right) = if x_a > x_b { (x_b, x_a) } else { (x_a, x_b) };
    let x_start = left.ceil() as i32;
    let x_end = right.ceil() as i32;
    for x in x_start..x_end {
        plot(x, y);
    }
}

fn scan_corners(points: &[Vec4; 3]) -> [ScanVertex; 3] {
    points.map(|p| ScanVertex { x: p.x as i32, y: p.y as i32 })
}

/// Integer-snapped corners as used for barycentric weights
fn snapped(points: &[Vec4; 3]) -> [Vec2; 3] {
    points.map(|p| Vec2::new((p.x as i32) as f32, (p.y as i32) as f32))
}

fn signed_area(corners: &[Vec2; 3]) -> f32 {
    let ab = corners[1] - corners[0];
    let ac = corners[2] - corners[0];
    ab.x * ac.y - ab.y * ac.x
}

/// Flat-color fill, depth tested per pixel with interpolated 1/w
pub fn draw_filled_triangle(fb: &mut Framebuffer, points: &[Vec4; 3], color: Color) {
    let corners = snapped(points);
    if signed_area(&corners).abs() < 1e-6 {
        return;
    }

    scan_triangle(scan_corners(points), |x, y| {
        let p = Vec2::new(x as f32, y as f32);
        let Some(weights) = barycentric_weights(corners[0], corners[1], corners[2], p) else {
            return;
        };
        let depth = 1.0 - interpolate_reciprocal_w(weights, points);
        fb.set_pixel_with_depth(x, y, depth, color);
    });
}

/// Flat-color fill with no depth test; later triangles overwrite earlier ones.
///
/// Depth is still recorded (the triangle's average) so depth-tested draws
/// afterwards have something to compare against.
pub fn draw_filled_triangle_unsorted(fb: &mut Framebuffer, points: &[Vec4; 3], color: Color) {
    let corners = snapped(points);
    if signed_area(&corners).abs() < 1e-6 {
        return;
    }

    let avg_w = (points[0].w + points[1].w + points[2].w) / 3.0;
    let depth = if avg_w > f32::EPSILON { 1.0 - 1.0 / avg_w } else { FAR_DEPTH };

    scan_triangle(scan_corners(points), |x, y| {
        fb.set_pixel(x, y, color);
        fb.set_depth(x, y, depth);
    });
}

/// Perspective-correct textured fill, depth tested per pixel.
///
/// Texture V is flipped since mesh texture coordinates start at the bottom.
pub fn draw_textured_triangle(fb: &mut Framebuffer, points: &[Vec4; 3], uvs: &[Vec2; 3], texture: &Texture) {
    let corners = snapped(points);
    if signed_area(&corners).abs() < 1e-6 {
        return;
    }
    let flipped = uvs.map(|uv| Vec2::new(uv.x, 1.0 - uv.y));

    scan_triangle(scan_corners(points), |x, y| {
        let p = Vec2::new(x as f32, y as f32);
        let Some(weights) = barycentric_weights(corners[0], corners[1], corners[2], p) else {
            return;
        };
        let Some(uv) = perspective_uv(weights, points, &flipped) else {
            return;
        };
        let depth = 1.0 - interpolate_reciprocal_w(weights, points);
        if depth < fb.depth(x, y) {
            fb.set_pixel_with_depth(x, y, depth, texture.sample(uv.x, uv.y));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFFFF0000;

    fn screen_tri(a: (f32, f32), b: (f32, f32), c: (f32, f32), w: f32) -> [Vec4; 3] {
        [
            Vec4::new(a.0, a.1, 0.0, w),
            Vec4::new(b.0, b.1, 0.0, w),
            Vec4::new(c.0, c.1, 0.0, w),
        ]
    }

    fn painted(fb: &Framebuffer) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..fb.height as i32 {
            for x in 0..fb.width as i32 {
                if fb.get_pixel(x, y) != Some(Color::with_alpha(0, 0, 0, 0)) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let c = Vec2::new(5.0, 10.0);

        let wa = barycentric_weights(a, b, c, a).unwrap();
        let wb = barycentric_weights(a, b, c, b).unwrap();
        let wc = barycentric_weights(a, b, c, c).unwrap();
        assert!((wa - Vec3::new(1.0, 0.0, 0.0)).len() < 1e-6);
        assert!((wb - Vec3::new(0.0, 1.0, 0.0)).len() < 1e-6);
        assert!((wc - Vec3::new(0.0, 0.0, 1.0)).len() < 1e-6);
    }

    #[test]
    fn test_barycentric_inside_sums_to_one() {
        let a = Vec2::new(3.0, 1.0);
        let b = Vec2::new(40.0, 7.0);
        let c = Vec2::new(12.0, 33.0);
        for p in [Vec2::new(15.0, 12.0), Vec2::new(20.0, 10.0), Vec2::new(14.0, 25.0)] {
            let w = barycentric_weights(a, b, c, p).unwrap();
            assert!(w.x >= 0.0 && w.y >= 0.0 && w.z >= 0.0);
            assert!((w.x + w.y + w.z - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_barycentric_degenerate_is_none() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(5.0, 5.0);
        let c = Vec2::new(10.0, 10.0);
        assert!(barycentric_weights(a, b, c, Vec2::new(1.0, 2.0)).is_none());
    }

    #[test]
    fn test_filled_triangle_bounded_by_edges() {
        let mut fb = Framebuffer::new(320, 240);
        fb.clear(Color::with_alpha(0, 0, 0, 0));
        let tri = screen_tri((100.0, 100.0), (200.0, 100.0), (150.0, 200.0), 1.0);
        draw_filled_triangle(&mut fb, &tri, Color::from_argb(RED));

        let pixels = painted(&fb);
        assert!(!pixels.is_empty());
        for &(x, y) in &pixels {
            assert_eq!(fb.get_pixel(x, y), Some(Color::RED));
            // Inside all three edges
            let yf = y as f32;
            assert!((100..=200).contains(&y));
            assert!(x as f32 >= 100.0 + (yf - 100.0) * 0.5);
            assert!((x as f32) < 200.0 - (yf - 100.0) * 0.5);
        }

        // Interior is covered, outside is untouched
        for (x, y) in [(150, 150), (100, 100), (199, 100), (150, 101), (130, 150)] {
            assert_eq!(fb.get_pixel(x, y), Some(Color::RED), "({}, {})", x, y);
        }
        for (x, y) in [(150, 99), (150, 201), (99, 100), (200, 100), (120, 180), (180, 180)] {
            assert_eq!(fb.get_pixel(x, y), Some(Color::with_alpha(0, 0, 0, 0)), "({}, {})", x, y);
        }

        // Every row strictly between the top edge and the apex has its full span
        for y in 100..200 {
            let yf = y as f32;
            let left = (100.0 + (yf - 100.0) * 0.5).ceil() as i32;
            let right = (200.0 - (yf - 100.0) * 0.5).ceil() as i32;
            let row = pixels.iter().filter(|p| p.1 == y).count() as i32;
            assert_eq!(row, right - left, "row {}", y);
        }
    }

    #[test]
    fn test_general_triangle_splits_without_gaps() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::with_alpha(0, 0, 0, 0));
        // No two vertices share a y: exercises the split path
        let tri = screen_tri((10.0, 5.0), (50.0, 20.0), (20.0, 50.0), 1.0);
        draw_filled_triangle(&mut fb, &tri, Color::GREEN);

        let corners = snapped(&tri);
        for (x, y) in painted(&fb) {
            let w = barycentric_weights(corners[0], corners[1], corners[2], Vec2::new(x as f32, y as f32)).unwrap();
            assert!(w.x >= -1e-4 && w.y >= -1e-4 && w.z >= -1e-4, "({}, {}) outside", x, y);
        }
        // The middle vertex row and the rows around it are filled
        for y in 19..=21 {
            assert_eq!(fb.get_pixel(30, y), Some(Color::GREEN), "row {}", y);
        }
    }

    /// Every row's painted pixels form one unbroken run
    fn assert_rows_contiguous(fb: &Framebuffer) {
        let pixels = painted(fb);
        for y in 0..fb.height as i32 {
            let xs: Vec<i32> = pixels.iter().filter(|p| p.1 == y).map(|p| p.0).collect();
            if let (Some(min), Some(max)) = (xs.iter().min(), xs.iter().max()) {
                assert_eq!((max - min + 1) as usize, xs.len(), "gap in row {}: {:?}", y, xs);
            }
        }
    }

    #[test]
    fn test_shared_edge_leaves_no_crack() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::with_alpha(0, 0, 0, 0));
        // Convex quad split along (18,37)-(26,7); (22,22) lies exactly on that edge
        let right = screen_tri((18.0, 37.0), (58.0, 55.0), (26.0, 7.0), 1.0);
        let left = screen_tri((18.0, 37.0), (26.0, 7.0), (18.0, 18.0), 1.0);
        draw_filled_triangle_unsorted(&mut fb, &right, Color::RED);
        draw_filled_triangle_unsorted(&mut fb, &left, Color::BLUE);

        assert_ne!(fb.get_pixel(22, 22), Some(Color::with_alpha(0, 0, 0, 0)));
        assert_rows_contiguous(&fb);
    }

    #[test]
    fn test_parallelogram_diagonals_leave_no_crack() {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            32.0 + ((seed >> 33) % 64) as f32
        };

        for _ in 0..300 {
            let a = (next(), next());
            let b = (next(), next());
            let c = (next(), next());
            let d = (a.0 + c.0 - b.0, a.1 + c.1 - b.1);

            let mut fb = Framebuffer::new(128, 128);
            fb.clear(Color::with_alpha(0, 0, 0, 0));
            draw_filled_triangle_unsorted(&mut fb, &screen_tri(a, b, c, 1.0), Color::RED);
            draw_filled_triangle_unsorted(&mut fb, &screen_tri(a, c, d, 1.0), Color::BLUE);
            assert_rows_contiguous(&fb);
        }
    }

    #[test]
    fn test_flat_bottom_triangle() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::with_alpha(0, 0, 0, 0));
        let tri = screen_tri((30.0, 10.0), (10.0, 40.0), (50.0, 40.0), 1.0);
        draw_filled_triangle(&mut fb, &tri, Color::BLUE);
        // The apex row is a zero-width span
        assert_eq!(fb.get_pixel(30, 10), Some(Color::with_alpha(0, 0, 0, 0)));
        assert_eq!(fb.get_pixel(30, 11), Some(Color::BLUE));
        assert_eq!(fb.get_pixel(30, 39), Some(Color::BLUE));
        assert_eq!(fb.get_pixel(10, 40), Some(Color::BLUE));
        assert_eq!(fb.get_pixel(30, 41), Some(Color::with_alpha(0, 0, 0, 0)));
    }

    #[test]
    fn test_zero_area_paints_nothing() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::with_alpha(0, 0, 0, 0));
        let line = screen_tri((0.0, 0.0), (20.0, 20.0), (40.0, 40.0), 1.0);
        draw_filled_triangle(&mut fb, &line, Color::RED);
        let flat = screen_tri((0.0, 10.0), (20.0, 10.0), (40.0, 10.0), 1.0);
        draw_filled_triangle(&mut fb, &flat, Color::RED);
        assert!(painted(&fb).is_empty());
        assert!(fb.zbuffer.iter().all(|&z| z == FAR_DEPTH));
    }

    #[test]
    fn test_same_triangle_twice_is_idempotent() {
        let mut fb = Framebuffer::new(64, 64);
        let tri = screen_tri((5.0, 5.0), (60.0, 10.0), (20.0, 55.0), 2.0);
        draw_filled_triangle(&mut fb, &tri, Color::RED);
        let pixels = fb.pixels.clone();
        let depth = fb.zbuffer.clone();

        // Same depth, different color: the tie keeps the first draw
        draw_filled_triangle(&mut fb, &tri, Color::BLUE);
        assert_eq!(fb.pixels, pixels);
        assert_eq!(fb.zbuffer, depth);
    }

    #[test]
    fn test_nearer_triangle_wins_in_either_order() {
        let near = screen_tri((10.0, 10.0), (50.0, 10.0), (30.0, 50.0), 2.0);
        let far = screen_tri((5.0, 5.0), (55.0, 5.0), (30.0, 55.0), 4.0);

        let mut fb = Framebuffer::new(64, 64);
        draw_filled_triangle(&mut fb, &far, Color::BLUE);
        draw_filled_triangle(&mut fb, &near, Color::RED);
        assert_eq!(fb.get_pixel(30, 20), Some(Color::RED));
        assert!((fb.depth(30, 20) - 0.5).abs() < 1e-5);

        let mut fb = Framebuffer::new(64, 64);
        draw_filled_triangle(&mut fb, &near, Color::RED);
        draw_filled_triangle(&mut fb, &far, Color::BLUE);
        assert_eq!(fb.get_pixel(30, 20), Some(Color::RED));
        // Outside the near triangle the far one shows
        assert_eq!(fb.get_pixel(30, 7), Some(Color::BLUE));
    }

    #[test]
    fn test_unsorted_fill_is_order_sensitive() {
        let near = screen_tri((10.0, 10.0), (50.0, 10.0), (30.0, 50.0), 2.0);
        let far = screen_tri((5.0, 5.0), (55.0, 5.0), (30.0, 55.0), 4.0);

        let mut fb = Framebuffer::new(64, 64);
        draw_filled_triangle_unsorted(&mut fb, &far, Color::BLUE);
        draw_filled_triangle_unsorted(&mut fb, &near, Color::RED);
        assert_eq!(fb.get_pixel(30, 20), Some(Color::RED));

        let mut fb = Framebuffer::new(64, 64);
        draw_filled_triangle_unsorted(&mut fb, &near, Color::RED);
        draw_filled_triangle_unsorted(&mut fb, &far, Color::BLUE);
        // The last draw wins, even though it is farther away
        assert_eq!(fb.get_pixel(30, 20), Some(Color::BLUE));
        assert!((fb.depth(30, 20) - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_constant_w_uv_is_linear() {
        let points = screen_tri((0.0, 0.0), (10.0, 0.0), (0.0, 10.0), 1.0);
        let uvs = [Vec2::new(0.1, 0.2), Vec2::new(0.9, 0.3), Vec2::new(0.4, 0.8)];
        for weights in [Vec3::new(0.2, 0.3, 0.5), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.6, 0.1, 0.3)] {
            let uv = perspective_uv(weights, &points, &uvs).unwrap();
            let u = uvs[0].x * weights.x + uvs[1].x * weights.y + uvs[2].x * weights.z;
            let v = uvs[0].y * weights.x + uvs[1].y * weights.y + uvs[2].y * weights.z;
            assert!((uv.x - u).abs() < 1e-5);
            assert!((uv.y - v).abs() < 1e-5);
        }
    }

    #[test]
    fn test_varying_w_pulls_uv_towards_near_vertex() {
        let mut points = screen_tri((0.0, 0.0), (10.0, 0.0), (0.0, 10.0), 1.0);
        points[1].w = 4.0;
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)];
        let uv = perspective_uv(Vec3::new(0.5, 0.5, 0.0), &points, &uvs).unwrap();
        // Halfway on screen is well short of halfway in texture space
        assert!((uv.x - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_textured_triangle_samples_texture() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::with_alpha(0, 0, 0, 0));
        let tex = Texture::checkerboard(2, 2, Color::GREEN, Color::GREEN);
        let tri = screen_tri((2.0, 2.0), (30.0, 2.0), (2.0, 30.0), 3.0);
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        draw_textured_triangle(&mut fb, &tri, &uvs, &tex);

        assert_eq!(fb.get_pixel(8, 8), Some(Color::GREEN));
        assert!((fb.depth(8, 8) - (1.0 - 1.0 / 3.0)).abs() < 1e-5);
        assert_eq!(fb.get_pixel(29, 29), Some(Color::with_alpha(0, 0, 0, 0)));
    }

    #[test]
    fn test_out_of_bounds_access_is_ignored() {
        let mut fb = Framebuffer::new(8, 8);
        fb.set_pixel(-1, 3, Color::RED);
        fb.set_pixel(8, 0, Color::RED);
        fb.set_depth(3, 100, 0.0);
        assert_eq!(fb.get_pixel(-1, 3), None);
        assert_eq!(fb.depth(100, 3), FAR_DEPTH);
        assert!(fb.pixels.iter().all(|&b| b == 0));
        assert!(fb.zbuffer.iter().all(|&z| z == FAR_DEPTH));
    }

    #[test]
    fn test_offscreen_triangle_is_clipped_to_surface() {
        let mut fb = Framebuffer::new(16, 16);
        let tri = screen_tri((-20.0, -20.0), (40.0, -10.0), (5.0, 40.0), 1.0);
        draw_filled_triangle(&mut fb, &tri, Color::RED);
        assert_eq!(fb.get_pixel(8, 8), Some(Color::RED));
    }

    #[test]
    fn test_grid_and_rect() {
        let mut fb = Framebuffer::new(25, 25);
        fb.draw_grid(10, Color::GRID);
        assert_eq!(fb.get_pixel(20, 10), Some(Color::GRID));
        assert_eq!(fb.get_pixel(5, 10), Some(Color::with_alpha(0, 0, 0, 0)));

        fb.draw_rect(-3, -3, 6, 6, Color::RED);
        assert_eq!(fb.get_pixel(2, 2), Some(Color::RED));
        assert_eq!(fb.get_pixel(3, 3), Some(Color::with_alpha(0, 0, 0, 0)));
    }
}
