//! Triangle mesh ingestion for Cornell scenes.
//!
//! Meshes are read from Wavefront OBJ files through `tobj`. Every OBJ
//! object/group becomes its own [`Mesh`] so that material tags can be
//! resolved per group by the scene builder.

use std::io::Cursor;
use std::path::Path;

use cornell_math::{Vec3, NORMALIZE_EPSILON};
use thiserror::Error;

/// Errors that can occur during mesh loading.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No geometry found in {0}")]
    NoGeometry(String),

    #[error("Face index {index} out of range in {mesh} ({vertex_count} vertices)")]
    InvalidIndex {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A named group of triangles sharing one vertex array.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Object or group name from the OBJ file (used as material tag)
    pub name: String,

    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh, checking that every index refers to a vertex.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, indices: Vec<u32>) -> MeshResult<Self> {
        let name = name.into();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::InvalidIndex {
                mesh: name,
                index,
                vertex_count: positions.len(),
            });
        }

        Ok(Self {
            name,
            positions,
            indices,
        })
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Extract triangle vertices as [v0, v1, v2] triplets.
    ///
    /// Zero-area faces are skipped so that every returned triangle has a
    /// well-defined geometric normal.
    pub fn triangles(&self) -> Vec<[Vec3; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        let mut degenerate = 0usize;

        for chunk in self.indices.chunks_exact(3) {
            let v0 = self.positions[chunk[0] as usize];
            let v1 = self.positions[chunk[1] as usize];
            let v2 = self.positions[chunk[2] as usize];

            if (v1 - v0).cross(v2 - v0).length() <= NORMALIZE_EPSILON {
                degenerate += 1;
                continue;
            }

            triangles.push([v0, v1, v2]);
        }

        if degenerate > 0 {
            log::warn!(
                "Mesh {}: skipped {} degenerate triangle(s)",
                self.name,
                degenerate
            );
        }

        triangles
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Load an OBJ file, returning one mesh per object/group.
pub fn load_obj<P: AsRef<Path>>(path: P) -> MeshResult<Vec<Mesh>> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &load_options())?;

    let meshes = convert_models(models, &path.display().to_string())?;
    log::info!(
        "Loaded {} triangles in {} group(s) from {}",
        meshes.iter().map(Mesh::triangle_count).sum::<usize>(),
        meshes.len(),
        path.display()
    );
    Ok(meshes)
}

/// Load OBJ text held in memory. `source` only names the data in errors.
pub fn load_obj_from_str(text: &str, source: &str) -> MeshResult<Vec<Mesh>> {
    let mut reader = Cursor::new(text.as_bytes());
    // Material libraries are never consulted; tags come from the scene description.
    let (models, _materials) =
        tobj::load_obj_buf(&mut reader, &load_options(), |_| Err(tobj::LoadError::OpenFileFailed))?;

    convert_models(models, source)
}

fn convert_models(models: Vec<tobj::Model>, source: &str) -> MeshResult<Vec<Mesh>> {
    let mut meshes = Vec::with_capacity(models.len());

    for model in models {
        let positions: Vec<Vec3> = model
            .mesh
            .positions
            .chunks_exact(3)
            .map(Vec3::from_slice)
            .collect();

        if model.mesh.indices.is_empty() {
            log::debug!("Skipping empty group {} in {}", model.name, source);
            continue;
        }

        log::debug!(
            "Group {}: {} vertices, {} triangles",
            model.name,
            positions.len(),
            model.mesh.indices.len() / 3
        );
        meshes.push(Mesh::new(model.name, positions, model.mesh.indices)?);
    }

    if meshes.is_empty() {
        return Err(MeshError::NoGeometry(source.to_string()));
    }

    Ok(meshes)
}
