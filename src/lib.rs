//! Runtime avatar part swapping for Bevy.
//!
//! A donor hierarchy holds every interchangeable part (hair, tops, shoes, ...)
//! as nodes named `<Category>_<VariantCode>`, each carrying a [`SkinnedPart`].
//! This crate catalogs those parts and binds one variant per category onto a
//! target character, remapping each part's bones onto the target skeleton by
//! name.
//!
//! # Features
//!
//! - **Catalog**: one configurable builder for strict or permissive donor
//!   layouts, recursive or flat scans, via [`CatalogBuilder`].
//! - **Swap engine**: exact and prefix-fallback variant lookup, name-based bone
//!   remapping and all-or-nothing slot writes via [`Wardrobe`].
//! - **Plugin**: startup initialization, [`ChangePart`] request messages and
//!   render component sync via [`WardrobePlugin`].
//! - **Egui UI helpers** (optional): a variant picker widget via [`ui`].
//!   Requires the `egui` feature.
//!
//! # Feature Flags
//!
//! - `egui`: Enables [`ui::wardrobe_picker`] for `bevy_egui`-based outfit editing.
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_wardrobe::{AvatarRig, ChangePart, WardrobePlugin};
//!
//! fn setup(app: &mut App) {
//!     app.add_plugins(WardrobePlugin::default())
//!        .add_systems(Update, swap_hair_on_key);
//! }
//!
//! fn spawn_avatar(mut commands: Commands, donor: Entity, target: Entity) {
//!     commands.insert_resource(AvatarRig::new(donor, target));
//! }
//!
//! fn swap_hair_on_key(keys: Res<ButtonInput<KeyCode>>, mut changes: MessageWriter<ChangePart>) {
//!     if keys.just_pressed(KeyCode::KeyH) {
//!         changes.write(ChangePart::new("Hair", "2"));
//!     }
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod matching;
pub mod outfit;
pub mod part;
pub mod plugin;
pub mod remap;
pub mod skeleton;
pub mod wardrobe;

mod hierarchy;

#[cfg(feature = "egui")]
pub mod ui;

pub use catalog::{Catalog, CatalogBuilder, CatalogReport};
pub use error::{CatalogIssue, SwapError};
pub use matching::MatchPolicy;
pub use outfit::DefaultOutfit;
pub use part::{DonorBone, PartVariant, SkinnedPart, TargetSlot};
pub use plugin::{AvatarRig, ChangePart, PartChangeFailed, PartChanged, WardrobePlugin};
pub use skeleton::{BoneNode, SkeletonRegistry};
pub use wardrobe::{CategoryEntry, SwapOutcome, Wardrobe, WardrobeConfig};
