//! Translates donor bone references into target skeleton bones by name.

use bevy::prelude::*;

use crate::part::DonorBone;
use crate::skeleton::SkeletonRegistry;

/// Maps each donor bone to the target bone with the same name.
///
/// The output has the same length and order as `donor_bones`. A donor bone
/// without a same-named target bone yields `None` at its position.
pub fn remap_bones(
    donor_bones: &[DonorBone],
    skeleton: &SkeletonRegistry,
) -> Vec<Option<Entity>> {
    donor_bones
        .iter()
        .map(|bone| resolve_bone(bone, skeleton))
        .collect()
}

/// Resolves a single donor bone, e.g. a part's root bone.
pub fn resolve_bone(bone: &DonorBone, skeleton: &SkeletonRegistry) -> Option<Entity> {
    bone.name.as_deref().and_then(|name| skeleton.find(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_length_and_order() {
        let mut world = World::new();
        let donor_a = world.spawn_empty().id();
        let donor_b = world.spawn_empty().id();
        let donor_c = world.spawn_empty().id();
        let target_b = world.spawn_empty().id();
        let target_a = world.spawn_empty().id();

        let mut skeleton = SkeletonRegistry::new();
        skeleton.push("B", target_b);
        skeleton.push("A", target_a);

        let named = |entity, name: &str| DonorBone {
            entity,
            name: Some(name.to_string()),
        };
        let donor = [
            named(donor_a, "A"),
            named(donor_c, "Tail"),
            named(donor_b, "B"),
            DonorBone {
                entity: donor_c,
                name: None,
            },
        ];

        assert_eq!(
            remap_bones(&donor, &skeleton),
            vec![Some(target_a), None, Some(target_b), None]
        );
    }
}
