//! World module - meshes and the scenes that hold them
//!
//! - Indexed triangle meshes with per-mesh transform, texture and spin
//! - OBJ subset loader
//! - RON scene descriptions

mod mesh;
mod obj;
mod scene;

pub use mesh::*;
pub use obj::*;
pub use scene::*;
