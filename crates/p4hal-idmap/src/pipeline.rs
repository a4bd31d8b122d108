//! Vendor-neutral pipeline description.
//!
//! The pipeline metadata lists every named object a P4 program declares,
//! grouped by kind, each carrying the logical id the protocol layer uses to
//! refer to it. It says nothing about the ids the vendor runtime assigned;
//! that join happens in the mapper.

use p4hal_types::{LogicalId, ObjectKind};
use serde::{Deserialize, Serialize};

/// One named object declared by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineObject {
    /// Logical id assigned by the protocol description.
    pub id: LogicalId,
    /// Symbolic name, the join key against the runtime metadata.
    pub name: String,
}

impl PipelineObject {
    pub fn new(id: LogicalId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The pipeline description consumed at push time.
///
/// Field order mirrors the declaration sections of the protocol metadata.
/// Objects declared here may have no physical counterpart; the mapper omits
/// them rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineInfo {
    /// Match-action tables.
    #[serde(default)]
    pub tables: Vec<PipelineObject>,
    /// Actions.
    #[serde(default)]
    pub actions: Vec<PipelineObject>,
    /// Action profiles.
    #[serde(default)]
    pub action_profiles: Vec<PipelineObject>,
    /// Action selectors.
    #[serde(default)]
    pub action_selectors: Vec<PipelineObject>,
}

impl PipelineInfo {
    /// Iterates every declared object with its kind, in declaration order.
    pub fn iter_objects(&self) -> impl Iterator<Item = (ObjectKind, &PipelineObject)> {
        let tables = self.tables.iter().map(|o| (ObjectKind::Table, o));
        let actions = self.actions.iter().map(|o| (ObjectKind::Action, o));
        let profiles = self
            .action_profiles
            .iter()
            .map(|o| (ObjectKind::ActionProfile, o));
        let selectors = self
            .action_selectors
            .iter()
            .map(|o| (ObjectKind::ActionSelector, o));
        tables.chain(actions).chain(profiles).chain(selectors)
    }

    /// Looks up a declared object by kind and name.
    pub fn find(&self, kind: ObjectKind, name: &str) -> Option<&PipelineObject> {
        self.objects_of(kind).iter().find(|o| o.name == name)
    }

    /// Total number of declared objects across all kinds.
    pub fn len(&self) -> usize {
        self.tables.len()
            + self.actions.len()
            + self.action_profiles.len()
            + self.action_selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn objects_of(&self, kind: ObjectKind) -> &[PipelineObject] {
        match kind {
            ObjectKind::Table => &self.tables,
            ObjectKind::Action => &self.actions,
            ObjectKind::ActionProfile => &self.action_profiles,
            ObjectKind::ActionSelector => &self.action_selectors,
        }
    }
}
