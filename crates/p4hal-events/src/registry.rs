//! Subscriber registries for the three event classes.

use crate::sink::EventSink;
use p4hal_types::{ChassisEvent, HalError, HalResult, NodeEvent, PortStatusUpdate, TransceiverEvent};
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Per-sink write budget for transceiver fan-out.
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle identifying one transceiver subscription.
///
/// Ids are allocated monotonically and never reused within a process
/// lifetime, so a stale handle can never unregister somebody else's
/// subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct TransceiverSubscriber {
    id: SubscriberId,
    priority: i32,
    sink: Arc<dyn EventSink<TransceiverEvent>>,
}

/// Subscriber list plus the id counter it allocates from, under one lock.
#[derive(Default)]
struct TransceiverRegistry {
    next_id: u64,
    subscribers: Vec<TransceiverSubscriber>,
}

/// Registries for transceiver, node and chassis event subscribers.
///
/// Every method takes `&self`; the registry is shared behind an `Arc` by
/// whoever produces events. Each event class has its own mutex, and no lock
/// is ever held across sink delivery: dispatch snapshots the `Arc`s it needs
/// and releases the lock first. That keeps unregister safe to call while a
/// delivery to the same sink is still in flight (the snapshot keeps the sink
/// alive for the duration of that one attempt).
pub struct EventRegistry {
    write_timeout: Duration,
    transceiver: Mutex<TransceiverRegistry>,
    node: Mutex<HashMap<u64, Arc<dyn EventSink<NodeEvent>>>>,
    chassis: Mutex<Option<Arc<dyn EventSink<ChassisEvent>>>>,
}

impl EventRegistry {
    /// Creates a registry with the default 10 second per-sink write budget.
    pub fn new() -> Self {
        Self::with_write_timeout(DEFAULT_WRITE_TIMEOUT)
    }

    /// Creates a registry with a custom per-sink write budget for
    /// transceiver fan-out.
    pub fn with_write_timeout(write_timeout: Duration) -> Self {
        Self {
            write_timeout,
            transceiver: Mutex::new(TransceiverRegistry::default()),
            node: Mutex::new(HashMap::new()),
            chassis: Mutex::new(None),
        }
    }

    /// Registers a transceiver event subscriber.
    ///
    /// Any number of subscribers may coexist, including several at the same
    /// priority. Fan-out visits higher priorities first; equal priorities
    /// keep registration order. Returns the handle to unregister with.
    pub fn register_transceiver_subscriber(
        &self,
        sink: Arc<dyn EventSink<TransceiverEvent>>,
        priority: i32,
    ) -> HalResult<SubscriberId> {
        let mut registry = self.transceiver.lock();
        registry.next_id += 1;
        let id = SubscriberId(registry.next_id);
        registry.subscribers.push(TransceiverSubscriber { id, priority, sink });
        // Stable sort: equal priorities stay in registration order.
        registry
            .subscribers
            .sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(id)
    }

    /// Removes a transceiver subscription.
    ///
    /// Removal is idempotent: unregistering an id that is not (or no
    /// longer) present succeeds. Callers tearing down in arbitrary order
    /// must not have to track whether somebody got there first.
    pub fn unregister_transceiver_subscriber(&self, id: SubscriberId) -> HalResult<()> {
        self.transceiver.lock().subscribers.retain(|s| s.id != id);
        Ok(())
    }

    /// Delivers a transceiver event to every subscriber, best effort.
    ///
    /// Subscribers are visited in priority order. Each write gets the
    /// registry's per-sink budget; a sink that fails or times out is logged
    /// and skipped, and fan-out continues with the rest. Returns `Ok` once
    /// every sink has been attempted.
    pub async fn dispatch_transceiver_event(&self, event: &TransceiverEvent) -> HalResult<()> {
        let snapshot: Vec<(SubscriberId, Arc<dyn EventSink<TransceiverEvent>>)> = {
            let registry = self.transceiver.lock();
            registry
                .subscribers
                .iter()
                .map(|s| (s.id, Arc::clone(&s.sink)))
                .collect()
        };

        for (id, sink) in snapshot {
            match tokio::time::timeout(self.write_timeout, sink.write(*event)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(subscriber = %id, error = %e, "transceiver event delivery failed");
                }
                Err(_) => {
                    warn!(
                        subscriber = %id,
                        budget_ms = self.write_timeout.as_millis() as u64,
                        "transceiver event delivery timed out"
                    );
                }
            }
        }
        Ok(())
    }

    /// Registers the single status subscriber for one node.
    ///
    /// Fails with `AlreadyExists` if the node already has one; the existing
    /// subscription is left untouched.
    pub fn register_node_subscriber(
        &self,
        node_id: u64,
        sink: Arc<dyn EventSink<NodeEvent>>,
    ) -> HalResult<()> {
        match self.node.lock().entry(node_id) {
            Entry::Occupied(_) => Err(HalError::already_exists(format!(
                "status event subscriber for node {}",
                node_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(sink);
                Ok(())
            }
        }
    }

    /// Removes the status subscriber for one node.
    pub fn unregister_node_subscriber(&self, node_id: u64) -> HalResult<()> {
        match self.node.lock().remove(&node_id) {
            Some(_) => Ok(()),
            None => Err(HalError::not_found(format!(
                "status event subscriber for node {}",
                node_id
            ))),
        }
    }

    /// Delivers a port status change to the node's subscriber.
    ///
    /// Fails with `NotFound` when the node has no subscriber. A write
    /// failure from the sink itself is logged but not surfaced; the call
    /// contract only reports "nobody is listening".
    pub async fn dispatch_node_event(
        &self,
        node_id: u64,
        port_id: u64,
        status: PortStatusUpdate,
    ) -> HalResult<()> {
        let sink = self.node.lock().get(&node_id).map(Arc::clone);
        let Some(sink) = sink else {
            warn!(node_id, "status event dropped, no subscriber for node");
            return Err(HalError::not_found(format!(
                "status event subscriber for node {}",
                node_id
            )));
        };

        let event = NodeEvent {
            node_id,
            port_id,
            status,
        };
        if let Err(e) = sink.write(event).await {
            warn!(node_id, error = %e, "node event delivery failed");
        }
        Ok(())
    }

    /// Installs the chassis-wide subscriber.
    ///
    /// Fails with `AlreadyExists` if the slot is occupied.
    pub fn register_chassis_subscriber(
        &self,
        sink: Arc<dyn EventSink<ChassisEvent>>,
    ) -> HalResult<()> {
        let mut slot = self.chassis.lock();
        if slot.is_some() {
            return Err(HalError::already_exists("chassis event subscriber"));
        }
        *slot = Some(sink);
        Ok(())
    }

    /// Clears the chassis-wide subscriber slot.
    pub fn unregister_chassis_subscriber(&self) -> HalResult<()> {
        match self.chassis.lock().take() {
            Some(_) => Ok(()),
            None => Err(HalError::not_found("chassis event subscriber")),
        }
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ChannelSink;
    use p4hal_types::{ErrorCode, HwState, OperState};
    use tokio::sync::mpsc;

    fn status_up() -> PortStatusUpdate {
        PortStatusUpdate::OperStatus {
            state: OperState::Up,
        }
    }

    #[tokio::test]
    async fn test_node_register_conflict_leaves_first_subscriber() {
        let registry = EventRegistry::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);

        registry
            .register_node_subscriber(1, Arc::new(ChannelSink::new(tx_a)))
            .unwrap();
        let err = registry
            .register_node_subscriber(1, Arc::new(ChannelSink::new(tx_b)))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyExists);

        registry.dispatch_node_event(1, 7, status_up()).await.unwrap();
        let event = rx_a.recv().await.unwrap();
        assert_eq!(event.port_id, 7);
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_node_unregister_missing() {
        let registry = EventRegistry::new();
        let err = registry.unregister_node_subscriber(42).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_node_dispatch_without_subscriber() {
        let registry = EventRegistry::new();
        let err = registry
            .dispatch_node_event(42, 1, status_up())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_node_unregister_then_dispatch_misses() {
        let registry = EventRegistry::new();
        let (tx, _rx) = mpsc::channel(4);
        registry
            .register_node_subscriber(3, Arc::new(ChannelSink::new(tx)))
            .unwrap();
        registry.unregister_node_subscriber(3).unwrap();

        let err = registry
            .dispatch_node_event(3, 1, status_up())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_transceiver_ids_monotonic_never_reused() {
        let registry = EventRegistry::new();
        let (tx, _rx) = mpsc::channel::<TransceiverEvent>(4);
        let sink: Arc<dyn EventSink<TransceiverEvent>> = Arc::new(ChannelSink::new(tx));

        let first = registry
            .register_transceiver_subscriber(Arc::clone(&sink), 0)
            .unwrap();
        registry.unregister_transceiver_subscriber(first).unwrap();
        let second = registry
            .register_transceiver_subscriber(Arc::clone(&sink), 0)
            .unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_transceiver_unregister_is_idempotent() {
        let registry = EventRegistry::new();
        let (tx, _rx) = mpsc::channel::<TransceiverEvent>(4);
        let id = registry
            .register_transceiver_subscriber(Arc::new(ChannelSink::new(tx)), 0)
            .unwrap();

        registry.unregister_transceiver_subscriber(id).unwrap();
        // Second removal of the same id still succeeds.
        registry.unregister_transceiver_subscriber(id).unwrap();
    }

    #[tokio::test]
    async fn test_chassis_slot_semantics() {
        let registry = EventRegistry::new();
        let (tx_a, _rx_a) = mpsc::channel::<ChassisEvent>(4);
        let (tx_b, _rx_b) = mpsc::channel::<ChassisEvent>(4);

        registry
            .register_chassis_subscriber(Arc::new(ChannelSink::new(tx_a)))
            .unwrap();
        let err = registry
            .register_chassis_subscriber(Arc::new(ChannelSink::new(tx_b)))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyExists);

        registry.unregister_chassis_subscriber().unwrap();
        let err = registry.unregister_chassis_subscriber().unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_transceiver_dispatch_with_no_subscribers() {
        let registry = EventRegistry::new();
        let event = TransceiverEvent {
            slot: 1,
            port: 1,
            state: HwState::Present,
        };
        registry.dispatch_transceiver_event(&event).await.unwrap();
    }
}
