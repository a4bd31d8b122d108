//! Event payload types for device status and transceiver notifications.

use crate::HalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presence state of a hardware component such as a transceiver module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HwState {
    /// State has not been determined (default).
    #[default]
    Unknown,
    /// Component is physically present.
    Present,
    /// Component is absent.
    NotPresent,
    /// Component is present and initialized.
    Ready,
    /// Component is present but powered off.
    Off,
    /// Component is present but faulted.
    Failed,
}

impl HwState {
    /// Returns true if the component is physically present in any state.
    pub const fn is_present(&self) -> bool {
        matches!(self, HwState::Present | HwState::Ready | HwState::Off | HwState::Failed)
    }
}

impl fmt::Display for HwState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HwState::Unknown => "unknown",
            HwState::Present => "present",
            HwState::NotPresent => "not_present",
            HwState::Ready => "ready",
            HwState::Off => "off",
            HwState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for HwState {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unknown" => Ok(HwState::Unknown),
            "present" => Ok(HwState::Present),
            "not_present" => Ok(HwState::NotPresent),
            "ready" => Ok(HwState::Ready),
            "off" => Ok(HwState::Off),
            "failed" => Ok(HwState::Failed),
            _ => Err(HalError::invalid_argument(format!(
                "invalid hw state: {}",
                s
            ))),
        }
    }
}

/// Administrative state of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    /// Port is administratively down (default for new ports).
    #[default]
    Down,
    /// Port is administratively up.
    Up,
}

impl AdminState {
    /// Returns true if the port is administratively up.
    pub const fn is_up(&self) -> bool {
        matches!(self, AdminState::Up)
    }

    /// Returns true if the port is administratively down.
    pub const fn is_down(&self) -> bool {
        matches!(self, AdminState::Down)
    }
}

impl fmt::Display for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminState::Up => write!(f, "up"),
            AdminState::Down => write!(f, "down"),
        }
    }
}

impl FromStr for AdminState {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(AdminState::Up),
            "down" => Ok(AdminState::Down),
            _ => Err(HalError::invalid_argument(format!(
                "invalid admin state: {}",
                s
            ))),
        }
    }
}

/// Operational state of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperState {
    /// Port is operationally down (default).
    #[default]
    Down,
    /// Port is operationally up.
    Up,
    /// Port state is unknown/not available.
    Unknown,
    /// Port is in testing mode.
    Testing,
}

impl OperState {
    /// Returns true if the port is operationally up.
    pub const fn is_up(&self) -> bool {
        matches!(self, OperState::Up)
    }

    /// Returns true if the port is operationally down.
    pub const fn is_down(&self) -> bool {
        matches!(self, OperState::Down)
    }
}

impl fmt::Display for OperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperState::Up => write!(f, "up"),
            OperState::Down => write!(f, "down"),
            OperState::Unknown => write!(f, "unknown"),
            OperState::Testing => write!(f, "testing"),
        }
    }
}

impl FromStr for OperState {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(OperState::Up),
            "down" => Ok(OperState::Down),
            "unknown" => Ok(OperState::Unknown),
            "testing" => Ok(OperState::Testing),
            _ => Err(HalError::invalid_argument(format!(
                "invalid oper state: {}",
                s
            ))),
        }
    }
}

/// Insertion or removal of a transceiver module in a front-panel cage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransceiverEvent {
    /// Physical slot (linecard) number.
    pub slot: i32,
    /// Front-panel port number within the slot.
    pub port: i32,
    /// New presence state of the module.
    pub state: HwState,
}

impl fmt::Display for TransceiverEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {} port {}: {}", self.slot, self.port, self.state)
    }
}

/// One field changing on a port, reported by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum PortStatusUpdate {
    /// Link state transition.
    OperStatus {
        /// New operational state.
        state: OperState,
    },
    /// Administrative enable/disable.
    AdminStatus {
        /// New administrative state.
        state: AdminState,
    },
    /// Negotiated speed change.
    SpeedBps {
        /// New speed in bits per second.
        bps: u64,
    },
}

/// A port status change scoped to one node, delivered to that node's
/// registered event writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEvent {
    /// Node the port belongs to.
    pub node_id: u64,
    /// Port whose status changed.
    pub port_id: u64,
    /// The status field that changed.
    pub status: PortStatusUpdate,
}

/// A chassis-level status change.
///
/// The chassis subscription slot is part of the registry contract even though
/// no chassis-sourced updates are produced yet; see the front door's handling
/// of chassis status sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChassisEvent {
    /// New chassis state.
    pub state: HwState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hw_state_presence() {
        assert!(HwState::Present.is_present());
        assert!(HwState::Ready.is_present());
        assert!(HwState::Failed.is_present());
        assert!(!HwState::NotPresent.is_present());
        assert!(!HwState::Unknown.is_present());
    }

    #[test]
    fn test_hw_state_parse() {
        assert_eq!("present".parse::<HwState>().unwrap(), HwState::Present);
        assert_eq!("READY".parse::<HwState>().unwrap(), HwState::Ready);
        assert!("plugged".parse::<HwState>().is_err());
    }

    #[test]
    fn test_admin_state() {
        assert!(AdminState::Up.is_up());
        assert!(!AdminState::Up.is_down());
        assert!(AdminState::Down.is_down());
        assert_eq!(AdminState::default(), AdminState::Down);
    }

    #[test]
    fn test_oper_state() {
        assert!(OperState::Up.is_up());
        assert!(OperState::Down.is_down());
        assert!(!OperState::Unknown.is_up());
    }

    #[test]
    fn test_port_status_update_json() {
        let update = PortStatusUpdate::OperStatus {
            state: OperState::Up,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"field":"oper_status","state":"up"}"#);

        let back: PortStatusUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }

    #[test]
    fn test_node_event_json() {
        let event = NodeEvent {
            node_id: 1,
            port_id: 7,
            status: PortStatusUpdate::SpeedBps { bps: 100_000_000_000 },
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: NodeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_transceiver_event_display() {
        let event = TransceiverEvent {
            slot: 1,
            port: 32,
            state: HwState::Present,
        };
        assert_eq!(event.to_string(), "slot 1 port 32: present");
    }
}
