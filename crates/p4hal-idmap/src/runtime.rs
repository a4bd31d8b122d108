//! Vendor runtime object index.
//!
//! The runtime metadata is the other half of the join: every object the
//! loaded pipeline actually materialized in hardware, with the physical id
//! the runtime assigned to it. The mapper treats this index as an opaque
//! metadata source and only ever asks it one question, "what is the object
//! of this kind with this name".

use p4hal_types::{ObjectKind, PhysicalId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One object as described by the vendor runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeObject {
    /// Physical id assigned by the runtime.
    pub id: PhysicalId,
    /// Symbolic name, matching the name in the pipeline description.
    pub name: String,
    /// Object kind.
    pub kind: ObjectKind,
}

impl RuntimeObject {
    pub fn new(id: PhysicalId, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }
}

/// Runtime objects indexed by kind, then by name.
///
/// Names are unique per kind within one loaded pipeline; if the source
/// repeats a key the later entry replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct RuntimeObjectIndex {
    by_kind: HashMap<ObjectKind, HashMap<String, RuntimeObject>>,
}

impl RuntimeObjectIndex {
    /// Builds the index from the runtime's object list.
    pub fn from_objects(objects: impl IntoIterator<Item = RuntimeObject>) -> Self {
        let mut by_kind: HashMap<ObjectKind, HashMap<String, RuntimeObject>> = HashMap::new();
        for object in objects {
            by_kind
                .entry(object.kind)
                .or_default()
                .insert(object.name.clone(), object);
        }
        Self { by_kind }
    }

    /// Looks up the object of the given kind and name.
    pub fn lookup(&self, kind: ObjectKind, name: &str) -> Option<&RuntimeObject> {
        self.by_kind.get(&kind)?.get(name)
    }

    /// Number of indexed objects.
    pub fn len(&self) -> usize {
        self.by_kind.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.values().all(HashMap::is_empty)
    }
}
