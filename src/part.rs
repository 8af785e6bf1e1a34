//! Part data: the donor-side skin component, catalogued variants, and the
//! per-category target slot they get bound into.

use bevy::mesh::skinning::{SkinnedMesh, SkinnedMeshInverseBindposes};
use bevy::prelude::*;

/// Skinned-mesh data attached to a donor part node (e.g. `Hair_1`).
///
/// This is what the catalog builder looks for when it scans the donor
/// hierarchy. Author it directly, or derive it from native render components
/// with [`SkinnedPart::from_native`].
#[derive(Component, Debug, Clone)]
pub struct SkinnedPart {
    pub mesh: Handle<Mesh>,
    /// Materials in submesh order.
    pub materials: Vec<Handle<StandardMaterial>>,
    /// Donor bones in the order the mesh's joint indices refer to them.
    pub bones: Vec<Entity>,
    pub root_bone: Option<Entity>,
    pub inverse_bindposes: Option<Handle<SkinnedMeshInverseBindposes>>,
}

impl SkinnedPart {
    pub fn new(mesh: Handle<Mesh>) -> Self {
        Self {
            mesh,
            materials: Vec::new(),
            bones: Vec::new(),
            root_bone: None,
            inverse_bindposes: None,
        }
    }

    pub fn with_materials(
        mut self,
        materials: impl IntoIterator<Item = Handle<StandardMaterial>>,
    ) -> Self {
        self.materials = materials.into_iter().collect();
        self
    }

    pub fn with_bones(mut self, bones: impl IntoIterator<Item = Entity>) -> Self {
        self.bones = bones.into_iter().collect();
        self
    }

    pub fn with_root_bone(mut self, root_bone: Entity) -> Self {
        self.root_bone = Some(root_bone);
        self
    }

    pub fn with_inverse_bindposes(
        mut self,
        inverse_bindposes: Handle<SkinnedMeshInverseBindposes>,
    ) -> Self {
        self.inverse_bindposes = Some(inverse_bindposes);
        self
    }

    /// Builds a part from the components a glTF skinned primitive spawns with.
    ///
    /// Bevy has no separate root-bone concept, so the first joint is used.
    pub fn from_native(
        mesh: &Mesh3d,
        material: Option<&MeshMaterial3d<StandardMaterial>>,
        skin: &SkinnedMesh,
    ) -> Self {
        Self {
            mesh: mesh.0.clone(),
            materials: material.map(|m| m.0.clone()).into_iter().collect(),
            bones: skin.joints.clone(),
            root_bone: skin.joints.first().copied(),
            inverse_bindposes: Some(skin.inverse_bindposes.clone()),
        }
    }
}

/// A donor bone reference with the name it is matched by.
///
/// `name` is `None` when the donor entity carries no [`Name`]; such a bone can
/// never be resolved on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorBone {
    pub entity: Entity,
    pub name: Option<String>,
}

/// One interchangeable part, identified by `(category, code)`.
#[derive(Debug, Clone)]
pub struct PartVariant {
    pub category: String,
    pub code: String,
    /// Full donor node name, `<category>_<code>`.
    pub name: String,
    /// The donor node this part was collected from.
    pub source: Entity,
    pub mesh: Handle<Mesh>,
    pub materials: Vec<Handle<StandardMaterial>>,
    pub bones: Vec<DonorBone>,
    pub root_bone: Option<DonorBone>,
    pub inverse_bindposes: Option<Handle<SkinnedMeshInverseBindposes>>,
}

impl PartVariant {
    /// Joins a category and variant code into a donor node name.
    pub fn full_name(category: &str, code: &str) -> String {
        format!("{category}_{code}")
    }
}

/// The render binding for one category on the target skeleton.
///
/// Lives both inside the [`Wardrobe`](crate::Wardrobe) and as a component on
/// the slot entity, where [`sync_slot_bindings`](crate::plugin::sync_slot_bindings)
/// copies it. `bones` always has as many entries as the bound variant has donor
/// bones; `None` marks a donor bone with no same-named target bone.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct TargetSlot {
    pub variant: Option<String>,
    pub mesh: Option<Handle<Mesh>>,
    pub materials: Vec<Handle<StandardMaterial>>,
    pub bones: Vec<Option<Entity>>,
    pub root_bone: Option<Entity>,
    pub inverse_bindposes: Option<Handle<SkinnedMeshInverseBindposes>>,
}

impl TargetSlot {
    pub fn is_bound(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn unresolved_bones(&self) -> usize {
        self.bones.iter().filter(|b| b.is_none()).count()
    }

    /// Joint list suitable for a [`SkinnedMesh`].
    ///
    /// Unresolved bones fall back to the root bone. Returns `None` when a bone
    /// is unresolved and there is no root bone to stand in for it.
    pub fn joints(&self) -> Option<Vec<Entity>> {
        self.bones
            .iter()
            .map(|bone| bone.or(self.root_bone))
            .collect()
    }
}
