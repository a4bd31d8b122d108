//! Common types for the p4hal control plane.
//!
//! This crate provides the vendor-neutral vocabulary shared by the
//! identifier-mapping and event-notification crates:
//!
//! - [`LogicalId`] / [`PhysicalId`]: the two identifier spaces the HAL
//!   translates between
//! - [`ObjectKind`]: pipeline object classification used as a join key
//! - [`UnitId`] / [`PipeScope`] / [`DeviceTarget`]: hardware addressing
//! - [`TransceiverEvent`] / [`NodeEvent`] / [`ChassisEvent`]: event records
//!   delivered to registered subscribers
//! - [`HalError`] / [`HalResult`]: the error taxonomy every public HAL
//!   operation reports through

mod device;
mod error;
mod event;
mod id;

pub use device::{DeviceTarget, PipeScope, UnitId};
pub use error::{ErrorCode, HalError, HalResult};
pub use event::{
    AdminState, ChassisEvent, HwState, NodeEvent, OperState, PortStatusUpdate, TransceiverEvent,
};
pub use id::{LogicalId, ObjectKind, PhysicalId};
