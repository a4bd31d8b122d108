//! HAL event front door.
//!
//! `halsimd` owns the listening endpoint that hardware simulators and test
//! harnesses push events into. Inbound requests arrive as newline-delimited
//! JSON over TCP; the service classifies each one and forwards it to the
//! [`EventRegistry`](p4hal_events::EventRegistry), which fans it out to
//! whichever upper-layer components registered interest.
//!
//! Two request shapes are understood:
//!
//! - a device status update, tagged with its source. Only port-sourced
//!   updates are handled today; node, port-queue and chassis sources are a
//!   named scope limitation and answer `UNIMPLEMENTED`.
//! - a transceiver event, fanned out to every transceiver subscriber.
//!
//! The daemon is composed in `main`: one [`HalSimServer`] per process,
//! constructed explicitly and handed the registry it serves.

pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod wire;

pub use config::HalSimConfig;
pub use error::{HalSimError, Result};
pub use server::HalSimServer;
pub use service::HalSimService;
pub use wire::{SimRequest, SimResponse, StatusSource};
