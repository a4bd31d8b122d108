//! Identifier types for the two metadata spaces the HAL translates between.
//!
//! A [`LogicalId`] comes from the vendor-neutral pipeline description; a
//! [`PhysicalId`] comes from the vendor runtime. The two are joined by
//! symbolic name per [`ObjectKind`], never by numeric value: the spaces are
//! versioned independently and overlap only by accident.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::HalError;

/// Pipeline object id as declared in the vendor-neutral protocol description.
///
/// Unique within one pipeline's metadata across all object kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalId(u32);

impl LogicalId {
    /// Creates a logical id from its raw metadata value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw metadata value.
    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicalId(0x{:08x})", self.0)
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<u32> for LogicalId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Runtime object id as assigned by the vendor-specific hardware runtime.
///
/// Unique within one loaded pipeline on one unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalId(u64);

impl PhysicalId {
    /// Creates a physical id from its raw runtime value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw runtime value.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PhysicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysicalId(0x{:016x})", self.0)
    }
}

impl fmt::Display for PhysicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<u64> for PhysicalId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Kind of pipeline object both metadata sources describe.
///
/// The kind participates in the name join: a table and an action may share a
/// symbolic name without being the same object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Match-action table.
    Table,
    /// Action declaration.
    Action,
    /// Action profile (member set providing indirection).
    ActionProfile,
    /// Action selector (group selection over a profile).
    ActionSelector,
}

impl ObjectKind {
    /// All kinds, in the order pushes iterate them.
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Table,
        ObjectKind::Action,
        ObjectKind::ActionProfile,
        ObjectKind::ActionSelector,
    ];
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectKind::Table => "table",
            ObjectKind::Action => "action",
            ObjectKind::ActionProfile => "action_profile",
            ObjectKind::ActionSelector => "action_selector",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectKind {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(ObjectKind::Table),
            "action" => Ok(ObjectKind::Action),
            "action_profile" => Ok(ObjectKind::ActionProfile),
            "action_selector" => Ok(ObjectKind::ActionSelector),
            other => Err(HalError::invalid_argument(format!(
                "unknown object kind: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_logical_id_round_trip() {
        let id = LogicalId::new(0x0200_0001);
        assert_eq!(id.as_raw(), 0x0200_0001);
        assert_eq!(id, LogicalId::from(0x0200_0001));
    }

    #[test]
    fn test_physical_id_display() {
        let id = PhysicalId::new(0x1234);
        assert_eq!(id.to_string(), "0x0000000000001234");
        assert_eq!(format!("{:?}", id), "PhysicalId(0x0000000000001234)");
    }

    #[test]
    fn test_logical_id_display() {
        let id = LogicalId::new(0xab);
        assert_eq!(id.to_string(), "0x000000ab");
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        let logical = LogicalId::new(7);
        let physical = PhysicalId::new(9);
        assert_eq!(serde_json::to_string(&logical).unwrap(), "7");
        assert_eq!(serde_json::to_string(&physical).unwrap(), "9");

        let back: PhysicalId = serde_json::from_str("9").unwrap();
        assert_eq!(back, physical);
    }

    #[test]
    fn test_object_kind_parse() {
        assert_eq!(
            "action_profile".parse::<ObjectKind>().unwrap(),
            ObjectKind::ActionProfile
        );
        assert_eq!("table".parse::<ObjectKind>().unwrap(), ObjectKind::Table);
        assert!("widget".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn test_object_kind_display_round_trip() {
        for kind in ObjectKind::ALL {
            assert_eq!(kind.to_string().parse::<ObjectKind>().unwrap(), kind);
        }
    }
}
