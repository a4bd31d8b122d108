//! Subscriber registries and fan-out for hardware events.
//!
//! Upper control-plane layers register sinks here; the service front door
//! (or any other event producer) dispatches into the registry, which fans
//! events out to whoever registered interest. Three independent event
//! classes with different delivery semantics:
//!
//! - **Transceiver events**: any number of subscribers, delivered in
//!   priority order with a bounded per-sink write budget. Best effort; a
//!   slow subscriber never blocks delivery to the others.
//! - **Node events**: exactly one subscriber per node id; registering a
//!   second is a conflict, not an overwrite.
//! - **Chassis events**: a single process-wide subscriber slot (reserved;
//!   no producer dispatches chassis events yet).

pub mod registry;
pub mod sink;

pub use registry::{EventRegistry, SubscriberId};
pub use sink::{ChannelSink, EventSink, SinkError};
