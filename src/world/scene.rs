//! Scene loading
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files. A scene
//! lists meshes by OBJ path (or the built-in cube), with an optional texture
//! and the mesh transform. Relative paths resolve against the scene file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Color, Texture, Vec3};
use super::{load_obj, Mesh};

/// Error type for scene, mesh and texture loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    Obj { line: usize, message: String },
    ImageError(image::ImageError),
    InvalidFace { mesh: String, face: usize, index: usize, vertex_count: usize },
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<image::ImageError> for SceneError {
    fn from(e: image::ImageError) -> Self {
        SceneError::ImageError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::Obj { line, message } => write!(f, "OBJ error on line {}: {}", line, message),
            SceneError::ImageError(e) => write!(f, "Image error: {}", e),
            SceneError::InvalidFace { mesh, face, index, vertex_count } => write!(
                f,
                "Mesh '{}' face {} uses vertex {} but only {} exist",
                mesh, face, index, vertex_count
            ),
        }
    }
}

impl std::error::Error for SceneError {}

fn default_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

/// One mesh entry in a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshDesc {
    /// OBJ file; the built-in cube when absent
    #[serde(default)]
    pub obj: Option<String>,
    /// Image file; a checkerboard when absent
    #[serde(default)]
    pub texture: Option<String>,
    /// Base color for every face (flat fill modes)
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default)]
    pub spin: Vec3,
}

/// Scene file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub meshes: Vec<MeshDesc>,
}

/// Loaded meshes ready for the pipeline
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
}

impl Scene {
    /// Fallback scene: one spinning cube in front of the camera
    pub fn default_cube() -> Self {
        let mut cube = Mesh::cube();
        cube.texture = Some(Texture::checkerboard(64, 64, Color::WHITE, Color::new(200, 60, 60)));
        cube.translation = Vec3::new(0.0, 0.0, 5.0);
        cube.spin = Vec3::new(0.3, 0.5, 0.0);
        Self { meshes: vec![cube] }
    }

    pub fn animate(&mut self, dt: f32) {
        for mesh in &mut self.meshes {
            mesh.animate(dt);
        }
    }
}

fn resolve(base: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn build_mesh(desc: &MeshDesc, index: usize, base: &Path) -> Result<Mesh, SceneError> {
    let mut mesh = match &desc.obj {
        Some(file) => load_obj(resolve(base, file))?,
        None => Mesh::cube(),
    };
    if mesh.name.is_empty() {
        mesh.name = format!("mesh{}", index);
    }

    mesh.texture = Some(match &desc.texture {
        Some(file) => {
            let path = resolve(base, file);
            let texture = Texture::from_file(&path)?;
            log::info!("loaded texture {} ({}x{})", path.display(), texture.width, texture.height);
            texture
        }
        None => {
            log::warn!("mesh '{}' has no texture, using a checkerboard", mesh.name);
            Texture::checkerboard(64, 64, Color::WHITE, Color::new(128, 128, 128))
        }
    });

    if let Some(color) = desc.color {
        for face in &mut mesh.faces {
            face.color = color;
        }
    }

    mesh.scale = desc.scale;
    mesh.rotation = desc.rotation;
    mesh.translation = desc.translation;
    mesh.spin = desc.spin;
    mesh.validate()?;
    Ok(mesh)
}

/// Build a scene from a parsed description. `base` anchors relative paths.
pub fn build_scene(desc: &SceneDesc, base: &Path) -> Result<Scene, SceneError> {
    let meshes = desc
        .meshes
        .iter()
        .enumerate()
        .map(|(i, m)| build_mesh(m, i, base))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Scene { meshes })
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let desc: SceneDesc = ron::from_str(&contents)?;
    let base = path.parent().unwrap_or(Path::new("."));
    let scene = build_scene(&desc, base)?;
    log::info!("loaded scene {} with {} meshes", path.display(), scene.meshes.len());
    Ok(scene)
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    let desc: SceneDesc = ron::from_str(s)?;
    build_scene(&desc, Path::new("."))
}
