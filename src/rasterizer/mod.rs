//! Software 3D rasterizer
//!
//! Features:
//! - Frustum clipping in camera space (Sutherland-Hodgman)
//! - Back-face culling and flat directional lighting
//! - Scanline fill with perspective-correct texture mapping
//! - Per-pixel z-buffer or painter's sort

mod camera;
mod clipping;
mod light;
mod math;
mod pipeline;
mod render;
mod types;

pub use camera::*;
pub use clipping::*;
pub use light::*;
pub use math::*;
pub use pipeline::*;
pub use render::*;
pub use types::*;

/// Default window dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
