//! Part catalog construction.
//!
//! [`CatalogBuilder`] scans a donor hierarchy for nodes named
//! `<Category>_<VariantCode>` that carry a [`SkinnedPart`], groups them by
//! category, and makes sure the target has one [`TargetSlot`] node per
//! category under its parts container:
//!
//! ```text
//! Target
//! └── Parts
//!     ├── Hair
//!     │   └── Hair   (TargetSlot)
//!     └── Top
//!         └── Top    (TargetSlot)
//! ```
//!
//! Building never fails. Missing assets or containers degrade the result to
//! partial coverage and are listed in the returned [`CatalogReport`].

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::error::CatalogIssue;
use crate::hierarchy::{children_of, depth_first, find_child, name_of, spawn_node};
use crate::part::{DonorBone, PartVariant, SkinnedPart, TargetSlot};
use crate::skeleton::SkeletonRegistry;

/// Categories used when none are configured.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Body", "Bottom", "Top", "Bag", "Headgear", "Shoes", "Glove", "Eyewear", "Face", "Hair",
];

/// Name of the container node holding parts on both donor and target.
pub const DEFAULT_PARTS_CONTAINER: &str = "Parts";

/// The parts found for one category and the slot they bind into.
#[derive(Debug, Clone)]
pub struct CategoryParts {
    pub name: String,
    /// Variants keyed by variant code.
    pub variants: BTreeMap<String, PartVariant>,
    pub slot: Option<Entity>,
}

/// Problems encountered while building, in the order they were found.
#[derive(Debug, Clone, Default)]
pub struct CatalogReport {
    pub issues: Vec<CatalogIssue>,
}

impl CatalogReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, issue: CatalogIssue) {
        self.issues.push(issue);
    }
}

/// Output of [`CatalogBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// One entry per declared category, in declaration order.
    pub categories: Vec<CategoryParts>,
    /// Target skeleton, without the parts container subtree.
    pub skeleton: SkeletonRegistry,
    pub report: CatalogReport,
}

#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    categories: Vec<String>,
    parts_container: String,
    require_parts_container: bool,
    recursive_scan: bool,
    hide_donor: bool,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            parts_container: DEFAULT_PARTS_CONTAINER.to_string(),
            require_parts_container: false,
            recursive_scan: true,
            hide_donor: true,
        }
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the declared categories. Duplicates are dropped.
    pub fn with_categories<S: Into<String>>(
        mut self,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        self.categories.clear();
        for category in categories {
            let category = category.into();
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
        self
    }

    pub fn with_parts_container(mut self, name: impl Into<String>) -> Self {
        self.parts_container = name.into();
        self
    }

    /// When set, the donor must have a parts container and the target's
    /// parts container is never created.
    pub fn require_parts_container(mut self, require: bool) -> Self {
        self.require_parts_container = require;
        self
    }

    /// When unset, only direct children of `<parts>/<Category>` on the donor
    /// are considered.
    pub fn recursive_scan(mut self, recursive: bool) -> Self {
        self.recursive_scan = recursive;
        self
    }

    /// Whether to set the donor root to [`Visibility::Hidden`].
    pub fn hide_donor(mut self, hide: bool) -> Self {
        self.hide_donor = hide;
        self
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn build(
        &self,
        world: &mut World,
        donor: Option<Entity>,
        target: Option<Entity>,
    ) -> Catalog {
        let mut catalog = Catalog {
            categories: self
                .categories
                .iter()
                .map(|name| CategoryParts {
                    name: name.clone(),
                    variants: BTreeMap::new(),
                    slot: None,
                })
                .collect(),
            ..default()
        };

        let Some(donor) = donor.filter(|&e| world.get_entity(e).is_ok()) else {
            error!("Donor asset is missing, part catalog stays empty");
            catalog.report.push(CatalogIssue::MissingDonor);
            return catalog;
        };
        let Some(target) = target.filter(|&e| world.get_entity(e).is_ok()) else {
            error!("Target asset is missing, part catalog stays empty");
            catalog.report.push(CatalogIssue::MissingTarget);
            return catalog;
        };

        if self.hide_donor {
            if let Some(mut visibility) = world.get_mut::<Visibility>(donor) {
                *visibility = Visibility::Hidden;
            }
        }

        let donor_container = find_child(world, donor, &self.parts_container);
        if donor_container.is_none() {
            if self.require_parts_container {
                error!("No '{}' container found in donor", self.parts_container);
                catalog
                    .report
                    .push(CatalogIssue::MissingDonorContainer(self.parts_container.clone()));
                return catalog;
            }
            info!(
                "No '{}' container found in donor, scanning from its root",
                self.parts_container
            );
        }
        // Recursive scans cover the whole donor; flat scans read `<parts>/<Category>`.
        let scan_root = if self.recursive_scan {
            donor
        } else {
            donor_container.unwrap_or(donor)
        };

        let existing_container = find_child(world, target, &self.parts_container);
        // Slot nodes from an earlier build or the prefab itself are not bones.
        catalog.skeleton =
            SkeletonRegistry::from_hierarchy_excluding(world, target, existing_container);

        let target_container = match existing_container {
            Some(container) => Some(container),
            None if self.require_parts_container => None,
            None => {
                info!("Created '{}' container on target", self.parts_container);
                Some(spawn_node(world, target, &self.parts_container))
            }
        };

        for entry in &mut catalog.categories {
            self.collect_category(world, scan_root, entry, &mut catalog.report);

            match target_container {
                Some(container) => entry.slot = Some(ensure_slot(world, container, &entry.name)),
                None => {
                    error!(
                        "No '{}' container found in target, skipping slot for '{}'",
                        self.parts_container, entry.name
                    );
                    catalog.report.push(CatalogIssue::MissingTargetContainer {
                        container: self.parts_container.clone(),
                        category: entry.name.clone(),
                    });
                }
            }
        }

        catalog
    }

    fn collect_category(
        &self,
        world: &World,
        scan_root: Entity,
        entry: &mut CategoryParts,
        report: &mut CatalogReport,
    ) {
        let candidates = if self.recursive_scan {
            // The scan root itself is never a part.
            depth_first(world, scan_root).into_iter().skip(1).collect()
        } else {
            find_child(world, scan_root, &entry.name)
                .map(|folder| children_of(world, folder))
                .unwrap_or_default()
        };

        let prefix = format!("{}_", entry.name);
        for node in candidates {
            let Some(name) = name_of(world, node) else {
                continue;
            };
            let Some(code) = name.strip_prefix(&prefix) else {
                continue;
            };
            let Some(skin) = world.get::<SkinnedPart>(node) else {
                debug!("Node '{}' matches '{}' but has no skin data", name, entry.name);
                continue;
            };
            if code.is_empty() {
                warn!("Part '{}' has an empty variant code, skipping", name);
                report.push(CatalogIssue::EmptyVariantCode(name));
                continue;
            }
            if entry.variants.contains_key(code) {
                warn!("Duplicate part '{}', keeping the first one", name);
                report.push(CatalogIssue::DuplicatePart(name));
                continue;
            }

            let variant = PartVariant {
                category: entry.name.clone(),
                code: code.to_string(),
                source: node,
                mesh: skin.mesh.clone(),
                materials: skin.materials.clone(),
                bones: skin.bones.iter().map(|&b| donor_bone(world, b)).collect(),
                root_bone: skin.root_bone.map(|b| donor_bone(world, b)),
                inverse_bindposes: skin.inverse_bindposes.clone(),
                name,
            };
            info!("Collected part '{}' under category '{}'", variant.name, entry.name);
            entry.variants.insert(variant.code.clone(), variant);
        }
    }
}

fn donor_bone(world: &World, entity: Entity) -> DonorBone {
    DonorBone {
        entity,
        name: name_of(world, entity),
    }
}

/// Returns the slot node for `category`, spawning the category folder and
/// slot when they do not exist yet.
fn ensure_slot(world: &mut World, container: Entity, category: &str) -> Entity {
    let folder = match find_child(world, container, category) {
        Some(folder) => folder,
        None => {
            debug!("Created category folder '{}'", category);
            spawn_node(world, container, category)
        }
    };

    let existing = children_of(world, folder).into_iter().find(|&child| {
        world.get::<TargetSlot>(child).is_some()
            && world.get::<Name>(child).is_some_and(|n| n.as_str() == category)
    });
    if let Some(slot) = existing {
        return slot;
    }

    let slot = spawn_node(world, folder, category);
    world.entity_mut(slot).insert(TargetSlot::default());
    debug!("Created slot for category '{}'", category);
    slot
}
