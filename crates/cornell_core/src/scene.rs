//! Scene description types.
//!
//! A `SceneDescription` is the renderer-agnostic input to a render: camera
//! pose, analytic primitives, OBJ meshes with material tags and the
//! procedural texture used by textured surfaces. It round-trips through
//! JSON with serde; every field has a default so files only need to list
//! what they change.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cornell_math::{Color, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::MeshError;
use crate::texture::{Pattern, SolidTexture};

/// Errors that can occur while loading or validating a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Invalid scene: {0}")]
    Invalid(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Sine of the smallest angle allowed between the camera up vector and the
/// view direction.
const PARALLEL_EPSILON: f32 = 1e-4;

/// How a surface scatters light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Lambertian reflector
    #[default]
    Diffuse,
    /// Mirror reflection perturbed by `fuzz`
    Metal,
    /// Lambertian reflector whose albedo comes from the scene's solid texture
    Textured,
}

/// Surface attributes attached to a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    /// Reflectance per channel (0-1)
    pub albedo: Color,
    /// Emitted radiance (zero for everything but lights)
    pub emission: Color,
    pub kind: MaterialKind,
    /// Metal roughness, 0 = perfect mirror
    pub fuzz: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            albedo: Color::splat(0.7),
            emission: Color::ZERO,
            kind: MaterialKind::Diffuse,
            fuzz: 0.0,
        }
    }
}

impl MaterialDesc {
    /// Diffuse material with the given albedo.
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// Metal material with the given albedo and roughness.
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            kind: MaterialKind::Metal,
            fuzz,
            ..Default::default()
        }
    }

    /// Textured material; `albedo` still drives Russian roulette.
    pub fn textured(albedo: Color) -> Self {
        Self {
            albedo,
            kind: MaterialKind::Textured,
            ..Default::default()
        }
    }

    /// Light source emitting `emission`.
    pub fn emissive(emission: Color) -> Self {
        Self {
            albedo: Color::ZERO,
            emission,
            ..Default::default()
        }
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }
}

/// Camera pose and lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(0.0, 1.0, 3.0),
            look_at: Vec3::new(0.0, 1.0, 0.0),
            vup: Vec3::Y,
            vfov: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f32,
    #[serde(default)]
    pub material: MaterialDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneDesc {
    pub point: Vec3,
    pub normal: Vec3,
    #[serde(default)]
    pub material: MaterialDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleDesc {
    pub vertices: [Vec3; 3],
    #[serde(default)]
    pub material: MaterialDesc,
}

/// An OBJ file placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDesc {
    /// Path to the OBJ file, relative paths resolve against the scene file
    pub path: PathBuf,
    /// Material for groups without an entry in `groups`
    #[serde(default)]
    pub material: MaterialDesc,
    /// Per-group material tags, keyed by OBJ object/group name
    #[serde(default)]
    pub groups: HashMap<String, MaterialDesc>,
    /// Uniform scale applied before `offset`
    #[serde(default = "default_mesh_scale")]
    pub scale: f32,
    #[serde(default)]
    pub offset: Vec3,
}

fn default_mesh_scale() -> f32 {
    1.0
}

impl MeshDesc {
    /// Material for a named group, falling back to the mesh default.
    pub fn material_for(&self, group: &str) -> MaterialDesc {
        self.groups.get(group).copied().unwrap_or(self.material)
    }

    /// Object-to-world placement of a vertex.
    pub fn place(&self, v: Vec3) -> Vec3 {
        v * self.scale + self.offset
    }
}

/// Solid texture used by `MaterialKind::Textured` surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureDesc {
    pub pattern: Pattern,
    /// Pattern scale, `None` uses the pattern's default
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default = "default_texture_seed")]
    pub seed: u64,
}

fn default_texture_seed() -> u64 {
    42
}

impl TextureDesc {
    /// Build the texture this description names.
    pub fn build(&self) -> SolidTexture {
        match self.scale {
            Some(scale) => SolidTexture::with_scale(self.pattern, scale, self.seed),
            None => SolidTexture::new(self.pattern, self.seed),
        }
    }
}

/// A complete renderable scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDesc,
    pub spheres: Vec<SphereDesc>,
    pub planes: Vec<PlaneDesc>,
    pub triangles: Vec<TriangleDesc>,
    pub meshes: Vec<MeshDesc>,
    pub texture: Option<TextureDesc>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self::empty()
    }
}

impl SceneDescription {
    /// An empty scene with the default camera.
    pub fn empty() -> Self {
        Self {
            camera: CameraDesc::default(),
            spheres: Vec::new(),
            planes: Vec::new(),
            triangles: Vec::new(),
            meshes: Vec::new(),
            texture: None,
        }
    }

    /// The built-in Cornell box: five walls spanning x in [-1, 1],
    /// y in [0, 2] and z >= -1, a small emissive sphere under the ceiling,
    /// a wood-textured sphere and a slightly rough copper sphere.
    pub fn cornell_box() -> Self {
        let white = MaterialDesc::diffuse(Color::new(0.725, 0.71, 0.68));
        let red = MaterialDesc::diffuse(Color::new(0.63, 0.065, 0.05));
        let green = MaterialDesc::diffuse(Color::new(0.14, 0.45, 0.091));

        let planes = vec![
            PlaneDesc { point: Vec3::new(-1.0, 0.0, 0.0), normal: Vec3::X, material: red },
            PlaneDesc { point: Vec3::new(1.0, 0.0, 0.0), normal: Vec3::NEG_X, material: green },
            PlaneDesc { point: Vec3::new(0.0, 0.0, -1.0), normal: Vec3::Z, material: white },
            PlaneDesc { point: Vec3::ZERO, normal: Vec3::Y, material: white },
            PlaneDesc { point: Vec3::new(0.0, 2.0, 0.0), normal: Vec3::NEG_Y, material: white },
        ];

        let spheres = vec![
            SphereDesc {
                center: Vec3::new(0.0, 1.98, 0.0),
                radius: 0.3,
                material: MaterialDesc::emissive(Color::splat(15.0)),
            },
            SphereDesc {
                center: Vec3::new(-0.4, 0.3, -0.3),
                radius: 0.3,
                material: MaterialDesc::textured(Color::splat(0.7)),
            },
            SphereDesc {
                center: Vec3::new(0.4, 0.5, 0.2),
                radius: 0.5,
                material: MaterialDesc::metal(Color::new(0.95, 0.64, 0.54), 0.05),
            },
        ];

        Self {
            planes,
            spheres,
            texture: Some(TextureDesc {
                pattern: Pattern::Wood,
                scale: None,
                seed: default_texture_seed(),
            }),
            ..Self::empty()
        }
    }

    /// Parse a scene description from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let scene: Self = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load a scene description from a JSON file.
    ///
    /// Relative mesh paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut scene = Self::from_json_str(&text)?;

        if let Some(base) = path.parent() {
            scene.resolve_paths(base);
        }

        log::info!(
            "Loaded scene {}: {} spheres, {} planes, {} triangles, {} meshes",
            path.display(),
            scene.spheres.len(),
            scene.planes.len(),
            scene.triangles.len(),
            scene.meshes.len()
        );
        Ok(scene)
    }

    /// Make relative mesh paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for mesh in &mut self.meshes {
            if mesh.path.is_relative() {
                mesh.path = base.join(&mesh.path);
            }
        }
    }

    /// Reject descriptions the renderer cannot make sense of.
    pub fn validate(&self) -> SceneResult<()> {
        let camera = &self.camera;
        if !(camera.vfov > 0.0 && camera.vfov < 180.0) {
            return Err(SceneError::Invalid(format!(
                "camera vfov must be in (0, 180), got {}",
                camera.vfov
            )));
        }
        if (camera.look_at - camera.look_from).length_squared() == 0.0 {
            return Err(SceneError::Invalid(
                "camera look_from and look_at coincide".to_string(),
            ));
        }
        let view = camera.look_at - camera.look_from;
        if view.normalize().cross(camera.vup.normalize_or_zero()).length() <= PARALLEL_EPSILON {
            return Err(SceneError::Invalid(format!(
                "camera vup {} is zero or parallel to the view direction {}",
                camera.vup, view
            )));
        }
        if let Some(sphere) = self.spheres.iter().find(|s| !(s.radius > 0.0)) {
            return Err(SceneError::Invalid(format!(
                "sphere at {} has non-positive radius {}",
                sphere.center, sphere.radius
            )));
        }
        if let Some(plane) = self.planes.iter().find(|p| p.normal.length_squared() == 0.0) {
            return Err(SceneError::Invalid(format!(
                "plane through {} has a zero normal",
                plane.point
            )));
        }
        if let Some(mesh) = self.meshes.iter().find(|m| m.scale <= 0.0) {
            return Err(SceneError::Invalid(format!(
                "mesh {} has non-positive scale {}",
                mesh.path.display(),
                mesh.scale
            )));
        }
        Ok(())
    }

    /// Total number of analytic primitives (meshes not included).
    pub fn primitive_count(&self) -> usize {
        self.spheres.len() + self.planes.len() + self.triangles.len()
    }
}
