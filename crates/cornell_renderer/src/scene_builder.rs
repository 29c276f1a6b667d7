//! Turns a `SceneDescription` into a render-ready `Scene`.
//!
//! Every description material passes through `Material::from`, so albedo
//! is clamped to `[0, 1]` here, before any primitive reaches the renderer.

use std::sync::Arc;

use cornell_core::{load_obj, MaterialDesc, MaterialKind, Mesh, MeshDesc, SceneDescription, SceneResult};

use crate::{Material, Plane, Scene, Sphere, Triangle};

/// Build the scene, loading every referenced OBJ file.
///
/// Primitive order is spheres, planes, triangles, then meshes in listing
/// order, which fixes how exact distance ties resolve.
pub fn build_scene(desc: &SceneDescription) -> SceneResult<Scene> {
    desc.validate()?;

    let mut scene = Scene::new();

    for sphere in &desc.spheres {
        scene.add(Sphere::new(
            sphere.center,
            sphere.radius,
            Material::from(sphere.material),
        ));
    }

    for plane in &desc.planes {
        scene.add(Plane::new(
            plane.point,
            plane.normal,
            Material::from(plane.material),
        ));
    }

    for triangle in &desc.triangles {
        let [v0, v1, v2] = triangle.vertices;
        scene.add(Triangle::new(v0, v1, v2, Material::from(triangle.material)));
    }

    for mesh_desc in &desc.meshes {
        let meshes = load_obj(&mesh_desc.path)?;
        for mesh in &meshes {
            add_mesh(&mut scene, mesh, mesh_desc);
        }
    }

    if let Some(texture) = &desc.texture {
        log::debug!("Solid texture: {:?}", texture.pattern);
        scene.set_texture(Arc::new(texture.build()));
    }
    if !scene.has_texture() && uses_texture(desc) {
        log::warn!("Scene has textured surfaces but no texture; using their albedo");
    }

    log::info!(
        "Scene: {} spheres, {} planes, {} triangles, {} meshes -> {} primitives",
        desc.spheres.len(),
        desc.planes.len(),
        desc.triangles.len(),
        desc.meshes.len(),
        scene.len()
    );

    Ok(scene)
}

fn uses_texture(desc: &SceneDescription) -> bool {
    let textured = |m: &MaterialDesc| m.kind == MaterialKind::Textured;
    desc.spheres.iter().any(|s| textured(&s.material))
        || desc.planes.iter().any(|p| textured(&p.material))
        || desc.triangles.iter().any(|t| textured(&t.material))
        || desc
            .meshes
            .iter()
            .any(|m| textured(&m.material) || m.groups.values().any(textured))
}

/// Add the triangles of one mesh group, placed and tagged per `desc`.
///
/// Returns the number of triangles added; degenerate faces are dropped.
pub fn add_mesh(scene: &mut Scene, mesh: &Mesh, desc: &MeshDesc) -> usize {
    let material = Material::from(desc.material_for(&mesh.name));

    let triangles = mesh.triangles();
    for [v0, v1, v2] in &triangles {
        scene.add(Triangle::new(
            desc.place(*v0),
            desc.place(*v1),
            desc.place(*v2),
            material,
        ));
    }

    log::debug!(
        "Mesh group {}: {} triangles, {:?} material",
        mesh.name,
        triangles.len(),
        material.kind
    );
    triangles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Interval, Ray, Vec3};
    use cornell_core::{load_obj_from_str, PlaneDesc, SceneError};

    const TAGGED_OBJ: &str = "\
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
v -1 2 -1
v 1 2 -1
o floor
f 1 2 3 4
o back
f 1 2 6 5
";

    fn mesh_desc() -> MeshDesc {
        let mut groups = std::collections::HashMap::new();
        groups.insert("back".to_string(), MaterialDesc::metal(Color::splat(0.9), 0.1));
        MeshDesc {
            path: "inline.obj".into(),
            material: MaterialDesc::diffuse(Color::new(0.8, 0.1, 0.1)),
            groups,
            scale: 1.0,
            offset: Vec3::ZERO,
        }
    }

    #[test]
    fn test_cornell_box_builds() {
        let desc = SceneDescription::cornell_box();
        let scene = build_scene(&desc).unwrap();

        assert_eq!(scene.len(), desc.primitive_count());
        assert!(scene.has_texture());
    }

    #[test]
    fn test_mesh_groups_get_their_own_material() {
        let meshes = load_obj_from_str(TAGGED_OBJ, "tagged").unwrap();
        let desc = mesh_desc();

        let mut scene = Scene::new();
        let added: usize = meshes.iter().map(|m| add_mesh(&mut scene, m, &desc)).sum();
        assert_eq!(added, 4);
        assert_eq!(scene.len(), 4);

        let down = Ray::new(Vec3::new(0.2, 1.0, 0.3), Vec3::NEG_Y);
        let floor = scene.hit(&down, Interval::from_min(0.001)).unwrap();
        assert_eq!(floor.kind, MaterialKind::Diffuse);
        assert_eq!(floor.albedo, Color::new(0.8, 0.1, 0.1));

        let back = Ray::new(Vec3::new(0.2, 1.0, 0.0), Vec3::NEG_Z);
        let wall = scene.hit(&back, Interval::from_min(0.001)).unwrap();
        assert_eq!(wall.kind, MaterialKind::Metal);
        assert!((wall.t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_placement_applies_scale_and_offset() {
        let meshes = load_obj_from_str(TAGGED_OBJ, "tagged").unwrap();
        let desc = MeshDesc {
            scale: 0.5,
            offset: Vec3::new(0.0, 3.0, 0.0),
            ..mesh_desc()
        };

        let mut scene = Scene::new();
        add_mesh(&mut scene, &meshes[0], &desc);

        let down = Ray::new(Vec3::new(0.1, 10.0, 0.1), Vec3::NEG_Y);
        let rec = scene.hit(&down, Interval::from_min(0.001)).unwrap();
        assert!((rec.p.y - 3.0).abs() < 1e-5);

        // Outside the scaled footprint
        let miss = Ray::new(Vec3::new(0.8, 10.0, 0.0), Vec3::NEG_Y);
        assert!(scene.hit(&miss, Interval::from_min(0.001)).is_none());
    }

    #[test]
    fn test_albedo_clamped_on_build() {
        let mut desc = SceneDescription::empty();
        desc.planes.push(PlaneDesc {
            point: Vec3::ZERO,
            normal: Vec3::Y,
            material: MaterialDesc::diffuse(Color::new(1.5, -0.2, 0.5)),
        });
        let scene = build_scene(&desc).unwrap();

        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = scene.hit(&ray, Interval::from_min(0.001)).unwrap();
        assert_eq!(rec.albedo, Color::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_mesh_from_file() {
        let path = std::env::temp_dir().join("cornell_renderer_builder_test.obj");
        std::fs::write(&path, TAGGED_OBJ).unwrap();

        let mut desc = SceneDescription::empty();
        desc.meshes.push(MeshDesc {
            path: path.clone(),
            ..mesh_desc()
        });
        let scene = build_scene(&desc).unwrap();
        assert_eq!(scene.len(), 4);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bundled_scene_builds() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenes/boxes.json");
        let desc = SceneDescription::load(&path).unwrap();
        let scene = build_scene(&desc).unwrap();

        // 5 walls, the light and two blocks of 12 triangles each
        assert_eq!(scene.len(), 30);
        assert!(scene.has_texture());
    }

    #[test]
    fn test_textured_surfaces_detected() {
        let mut desc = SceneDescription::cornell_box();
        assert!(uses_texture(&desc));

        desc.texture = None;
        let scene = build_scene(&desc).unwrap();
        assert!(!scene.has_texture());

        desc.spheres.retain(|s| s.material.kind != MaterialKind::Textured);
        assert!(!uses_texture(&desc));
    }

    #[test]
    fn test_missing_mesh_is_an_error() {
        let mut desc = SceneDescription::empty();
        desc.meshes.push(MeshDesc {
            path: "/definitely/not/here.obj".into(),
            ..mesh_desc()
        });
        assert!(matches!(build_scene(&desc), Err(SceneError::Mesh(_))));
    }
}
