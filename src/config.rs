//! Render configuration
//!
//! Loaded from a RON file; any field left out takes its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Color, CullMode, DepthPolicy, PipelineSettings, RenderMode, Vec3, HEIGHT, WIDTH};

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Vertical field of view (degrees)
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub cull_mode: CullMode,
    pub render_mode: RenderMode,
    pub depth_policy: DepthPolicy,
    pub light_dir: Vec3,
    pub clear_color: Color,
    pub show_grid: bool,
    /// Scene file; the built-in cube when absent
    pub scene: Option<String>,
    pub camera_position: Vec3,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fov_y: 60.0,
            z_near: 0.1,
            z_far: 100.0,
            cull_mode: CullMode::BackFace,
            render_mode: RenderMode::Textured,
            depth_policy: DepthPolicy::PerPixel,
            light_dir: Vec3::FORWARD,
            clear_color: Color::BLACK,
            show_grid: true,
            scene: None,
            camera_position: Vec3::ZERO,
        }
    }
}

impl RenderConfig {
    /// Largest framebuffer side the window texture can hold
    pub const MAX_DIMENSION: usize = u16::MAX as usize;

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = 1..=Self::MAX_DIMENSION;
        if !dims.contains(&self.width) || !dims.contains(&self.height) {
            return Err(ConfigError::Invalid(format!(
                "framebuffer size {}x{} must be within 1..={} on each side",
                self.width,
                self.height,
                Self::MAX_DIMENSION
            )));
        }
        if !(self.fov_y > 0.0 && self.fov_y < 180.0) {
            return Err(ConfigError::Invalid(format!("fov_y {} must be between 0 and 180 degrees", self.fov_y)));
        }
        if !(self.z_near > 0.0 && self.z_far > self.z_near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes need 0 < z_near < z_far (got {} and {})",
                self.z_near, self.z_far
            )));
        }
        Ok(())
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            cull_mode: self.cull_mode,
            render_mode: self.render_mode,
            depth_policy: self.depth_policy,
            fov_y: self.fov_y.to_radians(),
            z_near: self.z_near,
            z_far: self.z_far,
            light_dir: self.light_dir,
        }
    }
}

/// Load configuration from a RON file. A missing file yields the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("no config at {}, using defaults", path.display());
        return Ok(RenderConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents)?;
    log::info!("loaded config {}", path.display());
    Ok(config)
}

pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    let config: RenderConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}
