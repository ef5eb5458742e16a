//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::{Vec2, Vec3, Vec4};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const GRID: Color = Color { r: 0x33, g: 0x33, b: 0x33, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a `0xAARRGGBB` value
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack as `0xAARRGGBB`
    pub fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Apply shading (multiply by intensity 0.0-1.0). Alpha is kept.
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Colors are written as `0xAARRGGBB` in config and scene files
impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.to_argb())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Color::from_argb)
    }
}

/// A mesh face: three vertex indices, per-corner texture coordinates and a base color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub uvs: [Vec2; 3],
    pub color: Color,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize, uvs: [Vec2; 3]) -> Self {
        Self { a, b, c, uvs, color: Color::WHITE }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// Render-ready triangle: screen-space x/y, projected z and camera-space w
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub points: [Vec4; 3],
    pub texcoords: [Vec2; 3],
    pub color: Color,
    /// Index of the source mesh (for its texture)
    pub mesh: usize,
}

impl Triangle {
    pub fn new(points: [Vec4; 3], texcoords: [Vec2; 3], color: Color) -> Self {
        Self { points, texcoords, color, mesh: 0 }
    }

    /// Mean camera-space depth, used by the painter sort
    pub fn avg_depth(&self) -> f32 {
        (self.points[0].w + self.points[1].w + self.points[2].w) / 3.0
    }
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
        }
    }

    /// Load texture from an image file (PNG, JPEG, BMP)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, image::ImageError> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
        })
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 8) + (y / 8)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels }
    }

    /// Sample at texture coordinates, wrapping by the absolute texel index.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::WHITE;
        }
        let tx = ((u * self.width as f32) as i64).unsigned_abs() as usize % self.width;
        let ty = ((v * self.height as f32) as i64).unsigned_abs() as usize % self.height;
        self.pixels[ty * self.width + tx]
    }
}

/// Which faces survive the culling stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CullMode {
    None,
    #[default]
    BackFace,
}

/// How projected triangles are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Edges plus a marker on every vertex
    WireVertex,
    Wire,
    FillTriangle,
    FillTriangleWire,
    #[default]
    Textured,
    TexturedWire,
}

impl RenderMode {
    pub const ALL: [RenderMode; 6] = [
        RenderMode::WireVertex,
        RenderMode::Wire,
        RenderMode::FillTriangle,
        RenderMode::FillTriangleWire,
        RenderMode::Textured,
        RenderMode::TexturedWire,
    ];

    pub fn fills(self) -> bool {
        matches!(self, RenderMode::FillTriangle | RenderMode::FillTriangleWire)
    }

    pub fn textures(self) -> bool {
        matches!(self, RenderMode::Textured | RenderMode::TexturedWire)
    }

    pub fn wireframe(self) -> bool {
        !matches!(self, RenderMode::FillTriangle | RenderMode::Textured)
    }

    pub fn vertices(self) -> bool {
        self == RenderMode::WireVertex
    }
}

/// Occlusion strategy for flat fills
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthPolicy {
    /// Every fill goes through the z-buffer with interpolated 1/w
    #[default]
    PerPixel,
    /// Triangles sorted far-to-near by average depth; flat fills skip the depth test
    PainterSort,
}

/// Per-frame pipeline settings
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub cull_mode: CullMode,
    pub render_mode: RenderMode,
    pub depth_policy: DepthPolicy,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Direction the light travels, camera space
    pub light_dir: Vec3,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::BackFace,
            render_mode: RenderMode::Textured,
            depth_policy: DepthPolicy::PerPixel,
            fov_y: std::f32::consts::PI / 3.0,
            z_near: 0.1,
            z_far: 100.0,
            light_dir: Vec3::FORWARD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_round_trip_red() {
        let red = Color::from_argb(0xFFFF0000);
        assert_eq!(red, Color::RED);
        assert_eq!(red.to_argb(), 0xFFFF0000);
    }

    #[test]
    fn test_shade_clamps() {
        let c = Color::new(200, 100, 50);
        assert_eq!(c.shade(2.0), c);
        assert_eq!(c.shade(-1.0), Color::with_alpha(0, 0, 0, 255));
        assert_eq!(c.shade(0.5), Color::new(100, 50, 25));
    }

    #[test]
    fn test_texture_sample_wraps_absolute() {
        let mut tex = Texture::new(4, 4);
        tex.pixels[1] = Color::RED; // (1, 0)
        assert_eq!(tex.sample(0.25, 0.0), Color::RED);
        // 1.25 * 4 = 5 -> 5 % 4 = 1
        assert_eq!(tex.sample(1.25, 0.0), Color::RED);
        // -0.25 * 4 = -1 -> |-1| % 4 = 1
        assert_eq!(tex.sample(-0.25, 0.0), Color::RED);
        assert_eq!(tex.sample(0.5, 0.0), Color::WHITE);
    }

    #[test]
    fn test_render_mode_flags() {
        assert!(RenderMode::Wire.wireframe());
        assert!(!RenderMode::Textured.wireframe());
        assert!(RenderMode::TexturedWire.textures() && RenderMode::TexturedWire.wireframe());
        assert!(RenderMode::FillTriangleWire.fills());
        assert!(RenderMode::WireVertex.vertices());
    }

    #[test]
    fn test_color_deserializes_from_argb() {
        let c: Color = ron::from_str("0xFF00FF00").unwrap();
        assert_eq!(c, Color::GREEN);
    }
}
