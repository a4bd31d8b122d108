//! Bidirectional identifier mapping between a P4 pipeline description and a
//! vendor runtime.
//!
//! A P4 program names its tables, actions, action profiles and action
//! selectors with 32-bit logical ids; the vendor runtime assigns the same
//! objects its own 64-bit physical ids. Every driver call that crosses the
//! boundary between the two has to translate, and the only join key the two
//! metadata sources share is the symbolic object name.
//!
//! The crate is organized into:
//!
//! - [`pipeline`]: the vendor-neutral pipeline description ([`PipelineInfo`])
//! - [`runtime`]: the vendor runtime object index ([`RuntimeObjectIndex`])
//! - [`context`]: the auxiliary context document carrying the action-profile
//!   to action-selector linkage the runtime index does not expose
//! - [`mapper`]: the per-unit [`RuntimeIdMapper`] serving translated lookups
//!   under a reader-writer lock
//!
//! # Example
//!
//! ```ignore
//! use p4hal_idmap::RuntimeIdMapper;
//! use p4hal_types::{LogicalId, UnitId};
//!
//! let mapper = RuntimeIdMapper::create(UnitId::new(0));
//! mapper.push_pipeline_info(&pipeline, Some(&runtime))?;
//! let physical = mapper.physical_id(LogicalId::new(0x0200_0001))?;
//! ```

pub mod context;
pub mod mapper;
pub mod pipeline;
pub mod runtime;

pub use context::SelectorBinding;
pub use mapper::RuntimeIdMapper;
pub use pipeline::{PipelineInfo, PipelineObject};
pub use runtime::{RuntimeObject, RuntimeObjectIndex};
