//! Hardware addressing types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One hardware device instance managed by the agent.
///
/// An identifier mapper is scoped to exactly one unit for its entire
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a unit id from its raw device number.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw device number.
    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipe scope of a runtime operation on one unit.
///
/// The mapper currently targets every pipe on the device; per-pipe scoping is
/// a known limitation of the translation layer, kept visible here rather than
/// papered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeScope {
    /// All pipes on the unit.
    #[default]
    All,
    /// A single pipe.
    Pipe(u32),
}

impl PipeScope {
    /// Returns true if the scope covers every pipe.
    pub const fn is_all(&self) -> bool {
        matches!(self, PipeScope::All)
    }
}

impl fmt::Display for PipeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeScope::All => write!(f, "all"),
            PipeScope::Pipe(n) => write!(f, "pipe{}", n),
        }
    }
}

/// Addressing tuple directing a runtime operation at specific hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceTarget {
    /// The device instance.
    pub unit: UnitId,
    /// Which pipes on the device the operation addresses.
    pub pipe: PipeScope,
}

impl DeviceTarget {
    /// Creates a target covering every pipe on the given unit.
    pub const fn all_pipes(unit: UnitId) -> Self {
        Self {
            unit,
            pipe: PipeScope::All,
        }
    }
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {} ({})", self.unit, self.pipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unit_id() {
        let unit = UnitId::new(2);
        assert_eq!(unit.as_raw(), 2);
        assert_eq!(unit.to_string(), "2");
    }

    #[test]
    fn test_pipe_scope() {
        assert!(PipeScope::All.is_all());
        assert!(!PipeScope::Pipe(1).is_all());
        assert_eq!(PipeScope::default(), PipeScope::All);
        assert_eq!(PipeScope::Pipe(3).to_string(), "pipe3");
    }

    #[test]
    fn test_device_target_all_pipes() {
        let target = DeviceTarget::all_pipes(UnitId::new(0));
        assert_eq!(target.unit, UnitId::new(0));
        assert!(target.pipe.is_all());
        assert_eq!(target.to_string(), "unit 0 (all)");
    }
}
