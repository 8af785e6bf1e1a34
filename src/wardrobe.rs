//! The swap engine.
//!
//! A [`Wardrobe`] owns one [`CategoryEntry`] per declared category. Each entry
//! holds its catalogued variants, its slot binding and its current variant
//! code, so the three can never disagree about which part is worn.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::catalog::{Catalog, CatalogBuilder, CatalogReport};
use crate::error::SwapError;
use crate::matching::{MatchPolicy, resolve};
use crate::outfit::DefaultOutfit;
use crate::part::{PartVariant, TargetSlot};
use crate::remap::{remap_bones, resolve_bone};
use crate::skeleton::SkeletonRegistry;

/// Settings used to construct a [`Wardrobe`].
#[derive(Resource, Debug, Clone, Default)]
pub struct WardrobeConfig {
    pub catalog: CatalogBuilder,
    pub defaults: DefaultOutfit,
    pub policy: MatchPolicy,
}

/// One category: its parts, its slot on the target, and what it currently wears.
#[derive(Debug, Clone)]
pub struct CategoryEntry {
    pub name: String,
    pub variants: BTreeMap<String, PartVariant>,
    /// Slot node on the target; `None` when the target had no parts container.
    pub slot_entity: Option<Entity>,
    pub slot: TargetSlot,
    pub current: Option<String>,
}

/// Result of a successful swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub category: String,
    pub requested: String,
    /// Code actually bound; differs from `requested` when the fallback fired.
    pub bound: String,
    pub fallback: bool,
    pub unresolved_bones: usize,
    pub slot: Entity,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Wardrobe {
    categories: Vec<CategoryEntry>,
    skeleton: SkeletonRegistry,
    policy: MatchPolicy,
    defaults: DefaultOutfit,
    report: CatalogReport,
}

impl Wardrobe {
    /// Builds the catalog from `donor` and `target`. Nothing is bound yet,
    /// call [`Wardrobe::apply_defaults`] for the startup outfit.
    pub fn build(
        world: &mut World,
        donor: Option<Entity>,
        target: Option<Entity>,
        config: &WardrobeConfig,
    ) -> Self {
        let catalog = config.catalog.build(world, donor, target);
        Self::from_catalog(catalog)
            .with_policy(config.policy)
            .with_defaults(config.defaults.clone())
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        let categories = catalog
            .categories
            .into_iter()
            .map(|parts| CategoryEntry {
                name: parts.name,
                variants: parts.variants,
                slot_entity: parts.slot,
                slot: TargetSlot::default(),
                current: None,
            })
            .collect();
        Self {
            categories,
            skeleton: catalog.skeleton,
            policy: MatchPolicy::default(),
            defaults: DefaultOutfit::default(),
            report: catalog.report,
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_defaults(mut self, defaults: DefaultOutfit) -> Self {
        self.defaults = defaults;
        self
    }

    /// Binds `<category>_<code>` onto the category's slot.
    ///
    /// On error nothing is changed. On success the slot is replaced as a whole
    /// and the selection records the code that was actually bound.
    pub fn change_part(&mut self, category: &str, code: &str) -> Result<SwapOutcome, SwapError> {
        let Some(entry) = self.categories.iter_mut().find(|e| e.name == category) else {
            error!("Category '{}' is not declared", category);
            return Err(SwapError::UnknownCategory(category.to_string()));
        };
        if entry.variants.is_empty() {
            error!("Category '{}' exists but has no parts", category);
            return Err(SwapError::EmptyCategory(category.to_string()));
        }
        let Some(resolved) = resolve(&entry.variants, code, self.policy) else {
            error!(
                "No part found with key '{}' and no suitable alternatives",
                PartVariant::full_name(category, code)
            );
            return Err(SwapError::NoMatchingVariant {
                category: category.to_string(),
                code: code.to_string(),
            });
        };
        let Some(slot_entity) = entry.slot_entity else {
            error!("Category '{}' has no slot on the target", category);
            return Err(SwapError::SlotMissing(category.to_string()));
        };

        let variant = resolved.variant;
        if resolved.fallback {
            warn!(
                "No exact match for part '{}', using '{}' instead",
                PartVariant::full_name(category, code),
                variant.name
            );
        }

        let binding = TargetSlot {
            variant: Some(variant.code.clone()),
            mesh: Some(variant.mesh.clone()),
            materials: variant.materials.clone(),
            bones: remap_bones(&variant.bones, &self.skeleton),
            root_bone: variant
                .root_bone
                .as_ref()
                .and_then(|bone| resolve_bone(bone, &self.skeleton)),
            inverse_bindposes: variant.inverse_bindposes.clone(),
        };
        let unresolved_bones = binding.unresolved_bones();
        if unresolved_bones > 0 {
            warn!(
                "Part '{}': {} of {} bones have no match on the target",
                variant.name,
                unresolved_bones,
                binding.bones.len()
            );
        }

        let outcome = SwapOutcome {
            category: category.to_string(),
            requested: code.to_string(),
            bound: variant.code.clone(),
            fallback: resolved.fallback,
            unresolved_bones,
            slot: slot_entity,
        };

        entry.slot = binding;
        entry.current = Some(outcome.bound.clone());
        info!("Bound part '{}'", PartVariant::full_name(category, &outcome.bound));
        Ok(outcome)
    }

    /// Applies the default outfit, one category at a time in declaration order.
    ///
    /// Categories with no parts are skipped and produce no entry.
    pub fn apply_defaults(&mut self) -> Vec<Result<SwapOutcome, SwapError>> {
        let requests: Vec<(String, String)> = self
            .categories
            .iter()
            .filter(|entry| !entry.variants.is_empty())
            .map(|entry| {
                let code = self.defaults.code_for(&entry.name).to_string();
                (entry.name.clone(), code)
            })
            .collect();

        requests
            .into_iter()
            .map(|(category, code)| self.change_part(&category, &code))
            .collect()
    }

    /// Variants of `category` keyed by variant code, or `None` if the
    /// category is not declared.
    pub fn parts_for_category(&self, category: &str) -> Option<&BTreeMap<String, PartVariant>> {
        self.entry(category).map(|e| &e.variants)
    }

    /// Category → bound variant code, for every category that has been bound.
    pub fn current_selection(&self) -> BTreeMap<String, String> {
        self.categories
            .iter()
            .filter_map(|e| e.current.clone().map(|code| (e.name.clone(), code)))
            .collect()
    }

    pub fn slot(&self, category: &str) -> Option<&TargetSlot> {
        self.entry(category).map(|e| &e.slot)
    }

    pub fn slot_entity(&self, category: &str) -> Option<Entity> {
        self.entry(category).and_then(|e| e.slot_entity)
    }

    pub fn entry(&self, category: &str) -> Option<&CategoryEntry> {
        self.categories.iter().find(|e| e.name == category)
    }

    /// Entries in declaration order.
    pub fn categories(&self) -> &[CategoryEntry] {
        &self.categories
    }

    pub fn skeleton(&self) -> &SkeletonRegistry {
        &self.skeleton
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn report(&self) -> &CatalogReport {
        &self.report
    }
}
