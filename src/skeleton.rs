//! Name-indexed view of the target skeleton.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::hierarchy::depth_first_pruned;

/// A named node of the target hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneNode {
    pub name: String,
    pub entity: Entity,
}

/// Flat list of the target's named nodes plus a name index.
///
/// Nodes are kept in depth-first order starting at the target root. When two
/// nodes share a name, lookups resolve to the first one in that order.
#[derive(Debug, Clone, Default)]
pub struct SkeletonRegistry {
    bones: Vec<BoneNode>,
    index: HashMap<String, usize>,
}

impl SkeletonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every named node under `root` (inclusive).
    pub fn from_hierarchy(world: &World, root: Entity) -> Self {
        Self::from_hierarchy_excluding(world, root, None)
    }

    /// Same as [`from_hierarchy`](Self::from_hierarchy), skipping the subtree
    /// rooted at `excluded`.
    pub fn from_hierarchy_excluding(
        world: &World,
        root: Entity,
        excluded: Option<Entity>,
    ) -> Self {
        let mut registry = Self::new();
        for entity in depth_first_pruned(world, root, excluded) {
            if let Some(name) = world.get::<Name>(entity) {
                registry.push(name.as_str(), entity);
            }
        }
        registry
    }

    /// Appends a node. A name already present keeps its earlier entity.
    pub fn push(&mut self, name: impl Into<String>, entity: Entity) {
        let name = name.into();
        let position = self.bones.len();
        if self.index.contains_key(&name) {
            debug!("Duplicate bone name '{}', keeping first occurrence", name);
        } else {
            self.index.insert(name.clone(), position);
        }
        self.bones.push(BoneNode { name, entity });
    }

    pub fn find(&self, name: &str) -> Option<Entity> {
        self.index.get(name).map(|&i| self.bones[i].entity)
    }

    pub fn bones(&self) -> &[BoneNode] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
