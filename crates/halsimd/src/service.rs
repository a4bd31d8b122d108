//! Request classification.

use crate::wire::{SimRequest, SimResponse, StatusSource};
use p4hal_events::EventRegistry;
use p4hal_types::{HalError, TransceiverEvent};
use std::sync::Arc;

/// Classifies inbound requests and forwards them to the event registry.
///
/// Cloned into every connection task; all clones share one registry.
#[derive(Clone)]
pub struct HalSimService {
    registry: Arc<EventRegistry>,
}

impl HalSimService {
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self { registry }
    }

    /// Handles one decoded request and produces the response value.
    ///
    /// Device status updates are keyed by their source: port-sourced
    /// updates go to the node's registered subscriber; every other source
    /// answers `UNIMPLEMENTED` without touching the registry. Transceiver
    /// events fan out to all transceiver subscribers.
    pub async fn handle_request(&self, request: SimRequest) -> SimResponse {
        match request {
            SimRequest::DeviceStatusUpdate { source, status } => match source {
                StatusSource::Port { node_id, port_id } => {
                    match self
                        .registry
                        .dispatch_node_event(node_id, port_id, status)
                        .await
                    {
                        Ok(()) => SimResponse::ok(),
                        Err(e) => SimResponse::from_error(&e),
                    }
                }
                StatusSource::Node { .. } => unimplemented_source("node"),
                StatusSource::PortQueue { .. } => unimplemented_source("port queue"),
                StatusSource::Chassis {} => unimplemented_source("chassis"),
            },
            SimRequest::TransceiverEvent { slot, port, state } => {
                let event = TransceiverEvent { slot, port, state };
                match self.registry.dispatch_transceiver_event(&event).await {
                    Ok(()) => SimResponse::ok(),
                    Err(e) => SimResponse::from_error(&e),
                }
            }
        }
    }
}

fn unimplemented_source(source: &str) -> SimResponse {
    SimResponse::from_error(&HalError::unimplemented(format!(
        "{} status source",
        source
    )))
}
