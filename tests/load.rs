use std::{
    fs,
    path::{Path, PathBuf},
};

use approx::assert_abs_diff_eq;
use gfx_maths::*;
use scene_viewer::prelude::*;
use sv_format::mesh::{VertexRecord, NO_TEXTURE_SLOT};

fn asset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("assets")
        .join(name)
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn triangle_area(triangle: &[VertexRecord]) -> f32 {
    let edge1 = triangle[1].position - triangle[0].position;
    let edge2 = triangle[2].position - triangle[0].position;
    edge1.cross(edge2).magnitude() / 2.0
}

fn total_area(mesh: &MeshData) -> f32 {
    let records: Vec<VertexRecord> = mesh.records().collect();
    records.chunks_exact(3).map(triangle_area).sum()
}

#[test]
fn test_unit_square() -> Result<(), ParserError> {
    init_logger();
    let mesh = try_load(&asset("square.obj"), ObjMeta::default(), &mut NoTextures)?;

    assert_eq!(mesh.triangle_count(), 2);
    assert_abs_diff_eq!(total_area(&mesh), 1.0, epsilon = 1e-6);
    assert!(mesh.textures.is_empty());
    assert!(!mesh.has_transparency);

    for record in mesh.records() {
        assert_eq!(record.texture_slot, NO_TEXTURE_SLOT);
        assert_eq!(record.opacity, 1.0);
        assert_eq!(record.diffuse_color, Vec3::new(0.8, 0.8, 0.8));
    }
    Ok(())
}

#[test]
fn test_red_material_marks_transparency() -> Result<(), ParserError> {
    init_logger();
    let material = resolve_material(&asset("red.mtl"), "Red", &mut NoTextures);
    assert_eq!(material.diffuse_color, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(material.opacity, 0.5);
    assert_eq!(material.diffuse_texture, None);

    let mesh = try_load(&asset("red_square.obj"), ObjMeta::default(), &mut NoTextures)?;
    assert!(mesh.has_transparency);
    assert_eq!(mesh.triangle_count(), 2);
    for record in mesh.records() {
        assert_eq!(record.diffuse_color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(record.opacity, 0.5);
    }
    Ok(())
}

#[test]
fn test_mixed_model() -> Result<(), ParserError> {
    init_logger();
    let path = asset("house.obj");

    let faces = parse_mesh(&path, ObjMeta::default(), &mut NoTextures)?;
    assert_eq!(faces.len(), 3);
    assert_eq!(faces[0].vertices.len(), 5);
    // the broken and the out-of-range reference are dropped
    assert_eq!(faces[1].vertices.len(), 4);
    assert_eq!(faces[2].material.name, "Missing");

    let mesh = try_load(&path, ObjMeta::default(), &mut NoTextures)?;
    let records: Vec<VertexRecord> = mesh.records().collect();
    assert_eq!(records.len(), (3 + 2 + 1) * 3);
    assert_abs_diff_eq!(total_area(&mesh), 5.0 + 4.0 + 2.0, epsilon = 1e-5);
    assert!(mesh.has_transparency);

    for record in &records[0..9] {
        assert_eq!(record.diffuse_color, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(record.normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(record.opacity, 1.0);
    }
    for record in &records[9..15] {
        assert_eq!(record.diffuse_color, Vec3::new(0.2, 0.2, 0.2));
        assert_eq!(record.normal, Vec3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(record.opacity, 0.25, epsilon = 1e-6);
    }
    for record in &records[15..18] {
        assert_eq!(record.diffuse_color, Vec3::new(0.8, 0.8, 0.8));
        assert_eq!(record.opacity, 1.0);
    }
    Ok(())
}

#[test]
fn test_flip_options() -> Result<(), ParserError> {
    let meta = ObjMeta {
        flip_axis: [true, false, false],
        flip_uv: false,
    };
    let mesh = try_load(&asset("square.obj"), meta, &mut NoTextures)?;

    assert_eq!(mesh.triangle_count(), 2);
    assert!(mesh.records().all(|r| r.position.x <= 0.0));
    assert_abs_diff_eq!(total_area(&mesh), 1.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_missing_model_is_empty() {
    init_logger();
    let path = asset("does_not_exist.obj");

    assert!(matches!(
        try_load(&path, ObjMeta::default(), &mut NoTextures),
        Err(ParserError::Io(_))
    ));
    assert_eq!(load(&path, ObjMeta::default(), &mut NoTextures), MeshData::default());
}

#[test]
fn test_textures_are_shared() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let dir = std::env::temp_dir().join("scene_viewer_shared_textures");
    fs::create_dir_all(dir.join("maps"))?;

    image::RgbaImage::from_pixel(2, 2, image::Rgba([120, 80, 40, 255])).save(dir.join("maps/wood.png"))?;
    fs::write(
        dir.join("woods.mtl"),
        "newmtl Oak\nmap_Kd maps/wood.png\n\nnewmtl Pine\nKd 1 1 1\nmap_Kd maps/wood.png\n\nnewmtl Paint\nKd 0 0 1\n",
    )?;
    fs::write(
        dir.join("shelf.obj"),
        "mtllib woods.mtl\n\
         v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
         usemtl Oak\nf 1 2 3\n\
         usemtl Paint\nf 1 3 4\n\
         usemtl Pine\nf 1 2 4\n",
    )?;

    let mut storage = TextureStorage::new();
    let mesh = try_load(&dir.join("shelf.obj"), ObjMeta::default(), &mut storage)?;

    assert_eq!(mesh.textures.len(), 1);
    assert_eq!(storage.len(), 1);

    let slots: Vec<Option<usize>> = mesh.records().map(|r| r.texture_index()).collect();
    assert_eq!(
        slots,
        vec![
            Some(0),
            Some(0),
            Some(0),
            None,
            None,
            None,
            Some(0),
            Some(0),
            Some(0)
        ]
    );

    let texture = storage.get(mesh.textures[0]).ok_or("texture not stored")?;
    assert_eq!((texture.width, texture.height), (2, 2));
    Ok(())
}

#[test]
fn test_scene_from_description() -> Result<(), SceneError> {
    init_logger();
    let dir = std::env::temp_dir().join("scene_viewer_scene_description");
    fs::create_dir_all(&dir)?;

    let scene_file = dir.join("scene.toml");
    fs::write(
        &scene_file,
        format!(
            "[camera]\nposition = [0.0, 0.0, 5.0]\n\n\
             [[objects]]\nname = \"glass\"\npath = \"{}\"\nposition = [0.0, 0.0, -3.0]\n\n\
             [[objects]]\nname = \"floor\"\npath = \"{}\"\nlighting = false\n\n\
             [[lights]]\nposition = [0.0, 3.0, 0.0]\ncolor = [1.0, 0.9, 0.8]\n",
            asset("red_square.obj").display().to_string().replace('\\', "/"),
            asset("square.obj").display().to_string().replace('\\', "/"),
        ),
    )?;

    let scene = Scene::from_description(&scene_file, &mut NoTextures)?;

    assert_eq!(scene.objects.len(), 2);
    assert_eq!(scene.objects[0].mesh.triangle_count(), 2);
    assert!(!scene.objects[1].use_lighting);
    assert_eq!(scene.light_manager.len(), 1);
    assert_eq!(scene.draw_order(), vec![1, 0]);
    Ok(())
}
