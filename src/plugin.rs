//! Bevy plugin wiring for the [`Wardrobe`].
//!
//! # Workflow
//!
//! 1. Add [`WardrobePlugin`], optionally with a custom [`WardrobeConfig`].
//! 2. Spawn the donor and target hierarchies, then insert an [`AvatarRig`]
//!    naming them. The wardrobe is built and the default outfit applied on
//!    the next update.
//! 3. Write [`ChangePart`] messages from UI or game logic. Each request
//!    answers with a [`PartChanged`] or a [`PartChangeFailed`].
//! 4. [`sync_slot_bindings`] copies slot bindings onto the slot entities and
//!    mirrors them to `Mesh3d`, `MeshMaterial3d` and `SkinnedMesh`.

use bevy::mesh::skinning::SkinnedMesh;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::error::SwapError;
use crate::part::{SkinnedPart, TargetSlot};
use crate::wardrobe::{SwapOutcome, Wardrobe, WardrobeConfig};

/// The donor and target roots to build the wardrobe from.
///
/// A `None` (or despawned) entry leaves the wardrobe empty.
#[derive(Resource, Debug, Clone, Copy)]
pub struct AvatarRig {
    pub donor: Option<Entity>,
    pub target: Option<Entity>,
}

impl AvatarRig {
    pub fn new(donor: Entity, target: Entity) -> Self {
        Self {
            donor: Some(donor),
            target: Some(target),
        }
    }
}

/// Request to bind `<category>_<code>`.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ChangePart {
    pub category: String,
    pub code: String,
}

impl ChangePart {
    pub fn new(category: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            code: code.into(),
        }
    }
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct PartChanged(pub SwapOutcome);

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct PartChangeFailed {
    pub request: ChangePart,
    pub error: SwapError,
}

#[derive(Default)]
pub struct WardrobePlugin {
    pub config: WardrobeConfig,
}

impl WardrobePlugin {
    pub fn new(config: WardrobeConfig) -> Self {
        Self { config }
    }
}

impl Plugin for WardrobePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<WardrobeConfig>() {
            app.insert_resource(self.config.clone());
        }
        app.add_message::<ChangePart>()
            .add_message::<PartChanged>()
            .add_message::<PartChangeFailed>()
            .add_systems(
                Update,
                (
                    initialize_wardrobe.run_if(resource_added::<AvatarRig>),
                    handle_change_requests,
                    sync_slot_bindings,
                )
                    .chain(),
            );
    }
}

/// Builds the [`Wardrobe`] from the current [`AvatarRig`] and applies the
/// default outfit.
pub fn initialize_wardrobe(world: &mut World) {
    let Some(rig) = world.get_resource::<AvatarRig>().copied() else {
        return;
    };
    let config = world
        .get_resource::<WardrobeConfig>()
        .cloned()
        .unwrap_or_default();

    let mut wardrobe = Wardrobe::build(world, rig.donor, rig.target, &config);
    let applied = wardrobe
        .apply_defaults()
        .into_iter()
        .filter(Result::is_ok)
        .count();
    info!(
        "Wardrobe ready: {} categories, {} bound at startup",
        wardrobe.categories().len(),
        applied
    );

    world.insert_resource(wardrobe);
}

/// Applies queued [`ChangePart`] requests in order.
pub fn handle_change_requests(
    wardrobe: Option<ResMut<Wardrobe>>,
    mut requests: MessageReader<ChangePart>,
    mut changed: MessageWriter<PartChanged>,
    mut failed: MessageWriter<PartChangeFailed>,
) {
    let Some(mut wardrobe) = wardrobe else {
        for request in requests.read() {
            warn!(
                "Wardrobe not initialized, dropping request for '{}_{}'",
                request.category, request.code
            );
        }
        return;
    };

    for request in requests.read() {
        match wardrobe.change_part(&request.category, &request.code) {
            Ok(outcome) => {
                changed.write(PartChanged(outcome));
            }
            Err(error) => {
                failed.write(PartChangeFailed {
                    request: request.clone(),
                    error,
                });
            }
        }
    }
}

/// Copies each category's binding onto its slot entity.
///
/// Only runs when the [`Wardrobe`] changed. The first material is mirrored to
/// `MeshMaterial3d`; a `SkinnedMesh` is only inserted when the part has
/// inverse bindposes and every joint can be resolved.
pub fn sync_slot_bindings(
    mut commands: Commands,
    wardrobe: Option<Res<Wardrobe>>,
    mut slots: Query<&mut TargetSlot>,
) {
    let Some(wardrobe) = wardrobe else {
        return;
    };
    if !wardrobe.is_changed() {
        return;
    }

    for entry in wardrobe.categories() {
        let Some(entity) = entry.slot_entity else {
            continue;
        };
        let Ok(mut slot) = slots.get_mut(entity) else {
            continue;
        };
        if *slot == entry.slot {
            continue;
        }
        *slot = entry.slot.clone();

        let Some(mesh) = entry.slot.mesh.clone() else {
            continue;
        };
        let mut slot_commands = commands.entity(entity);
        slot_commands.insert(Mesh3d(mesh));

        match entry.slot.materials.first() {
            Some(material) => {
                slot_commands.insert(MeshMaterial3d(material.clone()));
            }
            None => {
                slot_commands.remove::<MeshMaterial3d<StandardMaterial>>();
            }
        }

        match (entry.slot.inverse_bindposes.clone(), entry.slot.joints()) {
            (Some(inverse_bindposes), Some(joints)) => {
                slot_commands.insert(SkinnedMesh {
                    inverse_bindposes,
                    joints,
                });
            }
            _ => {
                slot_commands.remove::<SkinnedMesh>();
                if entry.slot.inverse_bindposes.is_some() {
                    warn!(
                        "Slot '{}' has unresolved bones and no root bone, rendering unskinned",
                        entry.name
                    );
                }
            }
        }
    }
}

/// Derives a [`SkinnedPart`] for every natively skinned mesh that lacks one.
///
/// Run this before inserting [`AvatarRig`] when the donor comes from a glTF
/// scene instead of hand-authored parts. Bevy's glTF loader puts the skin on
/// primitive entities named after the mesh, below the `<Category>_<code>`
/// node. The part is therefore attached to the nearest ancestor whose name
/// starts with a configured category and `_`, and only the first primitive
/// of a node is captured. Without such an ancestor the skinned entity itself
/// receives the part. Slot entities are left alone.
pub fn capture_native_skins(
    mut commands: Commands,
    config: Option<Res<WardrobeConfig>>,
    skins: Query<
        (
            Entity,
            &Mesh3d,
            Option<&MeshMaterial3d<StandardMaterial>>,
            &SkinnedMesh,
        ),
        (Without<SkinnedPart>, Without<TargetSlot>),
    >,
    nodes: Query<(Option<&Name>, Option<&ChildOf>, Has<SkinnedPart>)>,
) {
    let prefixes: Vec<String> = config
        .map(|c| {
            c.catalog
                .categories()
                .iter()
                .map(|category| format!("{category}_"))
                .collect()
        })
        .unwrap_or_default();
    let mut captured = HashSet::new();

    for (entity, mesh, material, skin) in &skins {
        let owner = part_node(entity, &prefixes, &nodes).unwrap_or(entity);
        if !captured.insert(owner) {
            continue;
        }
        if owner != entity && nodes.get(owner).is_ok_and(|(_, _, has_part)| has_part) {
            continue;
        }
        commands
            .entity(owner)
            .insert(SkinnedPart::from_native(mesh, material, skin));
    }
}

/// Nearest strict ancestor of `entity` named `<Category>_...`.
fn part_node(
    entity: Entity,
    prefixes: &[String],
    nodes: &Query<(Option<&Name>, Option<&ChildOf>, Has<SkinnedPart>)>,
) -> Option<Entity> {
    let mut current = nodes.get(entity).ok()?.1.map(ChildOf::parent);
    while let Some(node) = current {
        let (name, parent, _) = nodes.get(node).ok()?;
        let matches = name.is_some_and(|n| {
            prefixes
                .iter()
                .any(|p| n.as_str().starts_with(p.as_str()))
        });
        if matches {
            return Some(node);
        }
        current = parent.map(ChildOf::parent);
    }
    None
}
