//! End-to-end tests: OBJ/MTL text through the readers into a finished model

use std::sync::Arc;

use approx::assert_relative_eq;
use model_ingest::directive::apply_all;
use model_ingest::foundation::logging;
use model_ingest::prelude::*;

const CUBE_OBJ: &str = r#"
# Unit cube, two groups sharing the top face
mtllib cube.mtl
o Cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 -1
vn 0 0 1

g bottom
usemtl wood
s 1
f 1/1/1 4/4/1 3/3/1 2/2/1
g sides
s off
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
g top sides
usemtl glass
s 2
f -4/1/-1 -3/2/-1 -2/3/-1 -1/4/-1
"#;

const CUBE_MTL: &str = r#"
newmtl wood
Ka 0.1 0.1 0.1
Kd 0.6 0.4 0.2
illum 2
map_Kd textures/wood.png

newmtl glass
Kd xyz 0.9
d -halo 0.25
Ni 1.5
refl -type sphere env.hdr
"#;

fn load_cube() -> Model {
    logging::init_for_tests();
    ModelLoader::default()
        .load_str("cube", CUBE_OBJ, &[CUBE_MTL])
        .unwrap()
}

#[test]
fn test_cube_geometry() {
    let model = load_cube();

    assert_eq!(model.object_name.as_deref(), Some("Cube"));
    assert_eq!(model.positions.len(), 8);
    assert_eq!(model.faces.len(), 6);
    assert_eq!(model.diagnostics.quads, 6);
    assert_eq!(model.diagnostics.errors, 0);

    // The relative top face resolves to the last four positions
    let top = &model.faces[5];
    let first = model.position_of(&top.vertices[0]).unwrap();
    assert_relative_eq!(*first, Vec3::new(0.0, 0.0, 1.0));

    let normal = model.normal_of(&top.vertices[0]).unwrap();
    assert_relative_eq!(normal.z, 1.0);
}

#[test]
fn test_cube_groups_and_smoothing() {
    let model = load_cube();

    assert_eq!(model.group("bottom").unwrap().faces, vec![FaceId(0)]);
    assert_eq!(model.group("sides").unwrap().faces.len(), 5);
    assert_eq!(model.groups_of(FaceId(5)), vec!["sides", "top"]);

    assert_eq!(model.smoothing_group_of(FaceId(0)), Some(1));
    assert_eq!(model.smoothing_group_of(FaceId(1)), None);
    assert_eq!(model.smoothing_group_of(FaceId(5)), Some(2));
}

#[test]
fn test_cube_materials() {
    let model = load_cube();

    assert_eq!(model.faces[0].material.as_deref(), Some("wood"));
    assert_eq!(model.faces[5].material.as_deref(), Some("glass"));

    let wood = model.material("wood").unwrap();
    assert_eq!(wood.illumination_model, 2);
    assert_eq!(wood.texture_map(TextureMapKind::Diffuse), Some("textures/wood.png"));
    let diffuse = wood.channel(ChannelKind::Diffuse).rgb().unwrap();
    assert_relative_eq!(diffuse, Vec3::new(0.6, 0.4, 0.2));

    let glass = model.material("glass").unwrap();
    assert!(glass.channel(ChannelKind::Diffuse).is_xyz());
    assert!(glass.halo);
    assert_relative_eq!(glass.dissolve, 0.25);
    assert_relative_eq!(glass.optical_density, 1.5);
    assert_eq!(glass.reflection.as_ref().unwrap().kind, ReflectionType::Sphere);
}

#[test]
fn test_texture_registry_across_threads() {
    let registry = Arc::new(TextureRegistry::new());
    let loader = Arc::new(ModelLoader::default());

    std::thread::scope(|scope| {
        for name in ["cube_a", "cube_b"] {
            let registry = Arc::clone(&registry);
            let loader = Arc::clone(&loader);
            scope.spawn(move || {
                let model = loader.load_str(name, CUBE_OBJ, &[CUBE_MTL]).unwrap();
                registry.register_model(&model);
            });
        }
    });

    assert_eq!(registry.filenames(), vec!["env.hdr", "textures/wood.png"]);
    assert_eq!(registry.users("textures/wood.png").unwrap().materials.len(), 2);
}

#[test]
fn test_malformed_library_is_protocol_violation() {
    // A second material's properties written without its newmtl line
    let mtl = "newmtl red\nKd 1 0 0\n";
    let stray = MtlReader::parse("Kd 0 1 0\n").unwrap();

    let mut builder = ModelBuilder::default();
    builder.start_parsing("stray").unwrap();
    apply_all(&MtlReader::parse(mtl).unwrap(), &mut builder).unwrap();
    let err = apply_all(&stray, &mut builder).unwrap_err();
    assert!(err.is_protocol_violation());

    let model = builder.finish_parsing().unwrap();
    let red = model.material("red").unwrap();
    assert_relative_eq!(
        red.channel(ChannelKind::Diffuse).rgb().unwrap(),
        Vec3::new(1.0, 0.0, 0.0)
    );
}

#[test]
fn test_bad_faces_are_counted_not_fatal() {
    let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\nf 1 2 3/7\nf -1 -2 -3\n";
    let model = ModelLoader::default().load_str("bad", obj, &[]).unwrap();

    assert_eq!(model.diagnostics.errors, 1);
    assert_eq!(model.faces.len(), 2);
    // Out-of-range texture index is dropped, the face survives
    assert_eq!(model.faces[0].vertices[2].texture, None);
}

#[test]
fn test_builder_reuse_after_close() {
    let mut builder = ModelBuilder::default();

    for name in ["first", "second"] {
        builder.start_parsing(name).unwrap();
        apply_all(&ObjReader::parse("v 0 0 0\nf 1 1 1\n").unwrap(), &mut builder).unwrap();
        let model = builder.finish_parsing().unwrap();
        builder.close().unwrap();

        assert_eq!(model.name, name);
        assert_eq!(model.face_vertices.len(), 1);
    }
    assert_eq!(builder.phase(), BuilderPhase::Closed);
}

#[test]
fn test_finished_model_ron_round_trip() {
    let model = load_cube();

    let text = ron::ser::to_string_pretty(&model, ron::ser::PrettyConfig::default()).unwrap();
    let restored: Model = ron::from_str(&text).unwrap();

    assert_eq!(restored, model);
    assert_eq!(restored.groups_of(FaceId(5)), vec!["sides", "top"]);
    assert_eq!(restored.material("wood").unwrap().texture_map(TextureMapKind::Diffuse), Some("textures/wood.png"));
}
