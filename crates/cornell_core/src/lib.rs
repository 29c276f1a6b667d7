//! Cornell Core - scene description, mesh ingestion and procedural textures.
//!
//! This crate provides everything the renderer consumes but does not
//! compute itself:
//!
//! - **Scene description**: `SceneDescription`, serializable with serde
//! - **Mesh ingestion**: Wavefront OBJ loading via `tobj`
//! - **Procedural color**: Perlin-noise solid textures behind `ProceduralColor`
//!
//! # Example
//!
//! ```ignore
//! use cornell_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scenes/boxes.json")?;
//! println!("{} spheres, {} meshes", scene.spheres.len(), scene.meshes.len());
//! ```

pub mod mesh;
pub mod perlin;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use mesh::{load_obj, load_obj_from_str, Mesh, MeshError, MeshResult};
pub use perlin::Perlin;
pub use scene::{
    CameraDesc, MaterialDesc, MaterialKind, MeshDesc, PlaneDesc, SceneDescription, SceneError,
    SceneResult, SphereDesc, TextureDesc, TriangleDesc,
};
pub use texture::{Pattern, ProceduralColor, SolidTexture};
