use bevy::prelude::*;

/// Direct child of `parent` whose [`Name`] equals `name`.
pub(crate) fn find_child(world: &World, parent: Entity, name: &str) -> Option<Entity> {
    children_of(world, parent)
        .into_iter()
        .find(|&child| world.get::<Name>(child).is_some_and(|n| n.as_str() == name))
}

pub(crate) fn children_of(world: &World, parent: Entity) -> Vec<Entity> {
    world
        .get::<Children>(parent)
        .map(|children| children.to_vec())
        .unwrap_or_default()
}

/// Pre-order depth-first walk of `root` and everything below it.
pub(crate) fn depth_first(world: &World, root: Entity) -> Vec<Entity> {
    depth_first_pruned(world, root, None)
}

/// Like [`depth_first`], but leaves out `pruned` and its whole subtree.
pub(crate) fn depth_first_pruned(
    world: &World,
    root: Entity,
    pruned: Option<Entity>,
) -> Vec<Entity> {
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if Some(entity) == pruned {
            continue;
        }
        order.push(entity);
        // Reverse so the first child is visited first.
        stack.extend(children_of(world, entity).into_iter().rev());
    }
    order
}

pub(crate) fn name_of(world: &World, entity: Entity) -> Option<String> {
    world.get::<Name>(entity).map(|n| n.as_str().to_string())
}

/// Spawns an empty named node under `parent`.
pub(crate) fn spawn_node(world: &mut World, parent: Entity, name: &str) -> Entity {
    world
        .spawn((
            Name::new(name.to_string()),
            Transform::default(),
            Visibility::default(),
            ChildOf(parent),
        ))
        .id()
}
