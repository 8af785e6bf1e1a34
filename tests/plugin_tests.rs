use bevy::asset::RenderAssetUsages;
use bevy::ecs::message::Messages;
use bevy::mesh::PrimitiveTopology;
use bevy::mesh::skinning::{SkinnedMesh, SkinnedMeshInverseBindposes};
use bevy::prelude::*;
use bevy_wardrobe::plugin::capture_native_skins;
use bevy_wardrobe::{
    AvatarRig, CatalogBuilder, ChangePart, PartChangeFailed, PartChanged, SkinnedPart,
    SwapError, TargetSlot, Wardrobe, WardrobeConfig, WardrobePlugin,
};

struct Harness {
    app: App,
    hair_mesh: Handle<Mesh>,
    target_spine: Entity,
}

fn make_app() -> Harness {
    let mut meshes = Assets::<Mesh>::default();
    let mut materials = Assets::<StandardMaterial>::default();
    let mut bindposes = Assets::<SkinnedMeshInverseBindposes>::default();
    let mut new_mesh = || {
        meshes.add(Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        ))
    };
    let hair_mesh = new_mesh();
    let alt_hair_mesh = new_mesh();
    let top_mesh = new_mesh();
    let material = materials.add(StandardMaterial::default());
    let inverse_bindposes = bindposes.add(SkinnedMeshInverseBindposes::from(vec![
        Mat4::IDENTITY,
        Mat4::IDENTITY,
    ]));

    let config = WardrobeConfig {
        catalog: CatalogBuilder::new().with_categories(["Hair", "Top"]),
        ..default()
    };
    let mut app = App::new();
    app.add_plugins(WardrobePlugin::new(config))
        .init_resource::<OutcomeLog>()
        .add_systems(PostUpdate, record_outcomes);

    let world = app.world_mut();
    let donor = world.spawn(Name::new("Model")).id();
    let donor_hips = world.spawn((Name::new("Hips"), ChildOf(donor))).id();
    let donor_spine = world.spawn((Name::new("Spine01"), ChildOf(donor_hips))).id();
    let parts = world.spawn((Name::new("Parts"), ChildOf(donor))).id();

    let hair = SkinnedPart::new(hair_mesh.clone())
        .with_materials([material.clone()])
        .with_bones([donor_hips, donor_spine])
        .with_root_bone(donor_hips)
        .with_inverse_bindposes(inverse_bindposes);
    world.spawn((Name::new("Hair_1"), hair, ChildOf(parts)));
    let alt_hair = SkinnedPart::new(alt_hair_mesh).with_bones([donor_spine]);
    world.spawn((Name::new("Hair_2"), alt_hair, ChildOf(parts)));
    let top = SkinnedPart::new(top_mesh).with_materials([material]);
    world.spawn((Name::new("Top_1"), top, ChildOf(parts)));

    let target = world.spawn(Name::new("Target")).id();
    let target_hips = world.spawn((Name::new("Hips"), ChildOf(target))).id();
    let target_spine = world
        .spawn((Name::new("Spine01"), ChildOf(target_hips)))
        .id();

    world.insert_resource(AvatarRig::new(donor, target));

    Harness {
        app,
        hair_mesh,
        target_spine,
    }
}

#[derive(Resource, Default)]
struct OutcomeLog {
    changed: Vec<PartChanged>,
    failed: Vec<PartChangeFailed>,
}

fn record_outcomes(
    mut log: ResMut<OutcomeLog>,
    mut changed: MessageReader<PartChanged>,
    mut failed: MessageReader<PartChangeFailed>,
) {
    log.changed.extend(changed.read().cloned());
    log.failed.extend(failed.read().cloned());
}

fn request(app: &mut App, category: &str, code: &str) {
    app.world_mut()
        .resource_mut::<Messages<ChangePart>>()
        .write(ChangePart::new(category, code));
}

#[test]
fn test_startup_applies_default_outfit() {
    let mut scene = make_app();
    scene.app.update();

    let wardrobe = scene
        .app
        .world()
        .get_resource::<Wardrobe>()
        .expect("Wardrobe should be inserted once the rig is present");
    let selection = wardrobe.current_selection();
    assert_eq!(selection["Hair"], "1");
    assert_eq!(selection["Top"], "1");

    let slot_entity = wardrobe.slot_entity("Hair").unwrap();
    let world = scene.app.world();
    let slot = world.get::<TargetSlot>(slot_entity).unwrap();
    assert_eq!(slot.mesh.as_ref(), Some(&scene.hair_mesh));
    assert_eq!(world.get::<Mesh3d>(slot_entity).map(|m| &m.0), Some(&scene.hair_mesh));

    let skin = world
        .get::<SkinnedMesh>(slot_entity)
        .expect("Fully resolved part should be skinned");
    assert_eq!(skin.joints.len(), 2);
    assert_eq!(skin.joints[1], scene.target_spine);
}

#[test]
fn test_change_part_message_round_trip() {
    let mut scene = make_app();
    scene.app.update();

    request(&mut scene.app, "Hair", "2");
    request(&mut scene.app, "Hat", "1");
    scene.app.update();

    let world = scene.app.world();
    let wardrobe = world.resource::<Wardrobe>();
    assert_eq!(wardrobe.current_selection()["Hair"], "2");

    let slot_entity = wardrobe.slot_entity("Hair").unwrap();
    let slot = world.get::<TargetSlot>(slot_entity).unwrap();
    assert_eq!(slot.bones, vec![Some(scene.target_spine)]);
    assert!(
        world.get::<SkinnedMesh>(slot_entity).is_none(),
        "Part without bindposes must not keep the previous skin"
    );
    assert!(world.get::<MeshMaterial3d<StandardMaterial>>(slot_entity).is_none());

    let log = world.resource::<OutcomeLog>();
    assert_eq!(log.changed.len(), 1);
    assert_eq!(log.changed[0].0.bound, "2");
    assert_eq!(log.failed.len(), 1);
    assert_eq!(log.failed[0].error, SwapError::UnknownCategory("Hat".into()));
}

#[test]
fn test_requests_before_rig_are_dropped() {
    let mut app = App::new();
    app.add_plugins(WardrobePlugin::default());
    request(&mut app, "Hair", "1");
    app.update();

    assert!(app.world().get_resource::<Wardrobe>().is_none());
}

#[test]
fn test_capture_native_skins() {
    let mut meshes = Assets::<Mesh>::default();
    let mut bindposes = Assets::<SkinnedMeshInverseBindposes>::default();
    let mesh = meshes.add(Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    ));
    let inverse_bindposes =
        bindposes.add(SkinnedMeshInverseBindposes::from(vec![Mat4::IDENTITY]));

    let mut app = App::new();
    app.add_systems(Update, capture_native_skins);
    let world = app.world_mut();
    let joint = world.spawn(Name::new("Hips")).id();
    let native = world
        .spawn((
            Mesh3d(mesh.clone()),
            SkinnedMesh {
                inverse_bindposes: inverse_bindposes.clone(),
                joints: vec![joint],
            },
        ))
        .id();
    let slot = world
        .spawn((
            TargetSlot::default(),
            Mesh3d(mesh.clone()),
            SkinnedMesh {
                inverse_bindposes,
                joints: vec![joint],
            },
        ))
        .id();
    app.update();

    let world = app.world();
    let part = world
        .get::<SkinnedPart>(native)
        .expect("Native skin should be captured");
    assert_eq!(part.mesh, mesh);
    assert_eq!(part.bones, vec![joint]);
    assert_eq!(part.root_bone, Some(joint));
    assert!(part.materials.is_empty());
    assert!(world.get::<SkinnedPart>(slot).is_none(), "Slots are not parts");
}

#[test]
fn test_capture_attaches_skin_to_part_node() {
    let mut meshes = Assets::<Mesh>::default();
    let mut bindposes = Assets::<SkinnedMeshInverseBindposes>::default();
    let mesh = meshes.add(Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    ));
    let inverse_bindposes =
        bindposes.add(SkinnedMeshInverseBindposes::from(vec![Mat4::IDENTITY]));

    let mut app = App::new();
    app.insert_resource(WardrobeConfig {
        catalog: CatalogBuilder::new().with_categories(["Hair"]),
        ..default()
    })
    .add_systems(Update, capture_native_skins);

    let world = app.world_mut();
    let joint = world.spawn(Name::new("Hips")).id();
    let node = world.spawn(Name::new("Hair_1")).id();
    // glTF primitives are named after the mesh, not the node.
    let primitives: Vec<Entity> = (0..2)
        .map(|i| {
            world
                .spawn((
                    Name::new(format!("HairMesh.{i}")),
                    Mesh3d(mesh.clone()),
                    SkinnedMesh {
                        inverse_bindposes: inverse_bindposes.clone(),
                        joints: vec![joint],
                    },
                    ChildOf(node),
                ))
                .id()
        })
        .collect();
    app.update();
    app.update();

    let world = app.world();
    let part = world
        .get::<SkinnedPart>(node)
        .expect("Skin should land on the Hair_1 node");
    assert_eq!(part.mesh, mesh);
    assert_eq!(part.bones, vec![joint]);
    for primitive in primitives {
        assert!(
            world.get::<SkinnedPart>(primitive).is_none(),
            "Primitives must not become nested duplicates"
        );
    }
}
