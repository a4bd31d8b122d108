//! Wire shapes for the event endpoint.
//!
//! One JSON document per line in each direction. Requests are tagged by
//! `type`; the status source inside a device status update is a tagged
//! union mirroring the upstream call shape, so every source a client can
//! name is representable even where the service answers `UNIMPLEMENTED`.

use p4hal_types::{ErrorCode, HalError, HwState, PortStatusUpdate};
use serde::{Deserialize, Serialize};

/// Where a device status update originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSource {
    /// A port on a node. The only source handled today.
    Port { node_id: u64, port_id: u64 },
    /// A whole node.
    Node { node_id: u64 },
    /// One queue on a port.
    PortQueue {
        node_id: u64,
        port_id: u64,
        queue_id: u32,
    },
    /// The chassis itself.
    Chassis {},
}

/// One inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimRequest {
    /// A status change somewhere on the device.
    DeviceStatusUpdate {
        source: StatusSource,
        status: PortStatusUpdate,
    },
    /// A transceiver module insertion or removal.
    TransceiverEvent {
        slot: i32,
        port: i32,
        state: HwState,
    },
}

/// One outbound response, always a pure value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimResponse {
    /// Outcome code, `OK` on success.
    pub code: ErrorCode,
    /// Human-readable detail, present on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SimResponse {
    /// The success response.
    pub fn ok() -> Self {
        Self {
            code: ErrorCode::Ok,
            message: None,
        }
    }

    /// A failure response with an explicit code.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    /// The response reporting a typed HAL error.
    pub fn from_error(err: &HalError) -> Self {
        Self {
            code: err.code(),
            message: Some(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p4hal_types::OperState;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_device_status_update_json() {
        let request = SimRequest::DeviceStatusUpdate {
            source: StatusSource::Port {
                node_id: 1,
                port_id: 3,
            },
            status: PortStatusUpdate::OperStatus {
                state: OperState::Up,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"type":"device_status_update","source":{"port":{"node_id":1,"port_id":3}},"status":{"field":"oper_status","state":"up"}}"#
        );

        let back: SimRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_chassis_source_json() {
        let request = SimRequest::DeviceStatusUpdate {
            source: StatusSource::Chassis {},
            status: PortStatusUpdate::SpeedBps { bps: 1 },
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: SimRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_transceiver_event_json() {
        let json = r#"{"type":"transceiver_event","slot":1,"port":16,"state":"present"}"#;
        let request: SimRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request,
            SimRequest::TransceiverEvent {
                slot: 1,
                port: 16,
                state: HwState::Present,
            }
        );
    }

    #[test]
    fn test_response_json() {
        let ok = SimResponse::ok();
        assert!(ok.is_ok());
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"code":"OK"}"#);

        let err = SimResponse::error(ErrorCode::Unimplemented, "node status source");
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"code":"UNIMPLEMENTED","message":"node status source"}"#
        );

        // A bare code on the wire parses back without a message.
        let parsed: SimResponse = serde_json::from_str(r#"{"code":"OK"}"#).unwrap();
        assert_eq!(parsed, SimResponse::ok());
    }

    #[test]
    fn test_response_from_error() {
        let response = SimResponse::from_error(&HalError::not_found("node 9"));
        assert_eq!(response.code, ErrorCode::NotFound);
        assert_eq!(response.message.as_deref(), Some("not found: node 9"));
    }
}
