//! Per-unit identifier mapper.

use crate::context::parse_selector_bindings;
use crate::pipeline::PipelineInfo;
use crate::runtime::RuntimeObjectIndex;
use p4hal_types::{
    DeviceTarget, HalError, HalResult, LogicalId, ObjectKind, PhysicalId, UnitId,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

/// All four lookup maps, swapped together so readers never observe a mix of
/// old and new entries.
#[derive(Debug, Default)]
struct MapState {
    logical_to_physical: HashMap<LogicalId, PhysicalId>,
    physical_to_logical: HashMap<PhysicalId, LogicalId>,
    profile_to_selector: HashMap<PhysicalId, PhysicalId>,
    selector_to_profile: HashMap<PhysicalId, PhysicalId>,
}

/// Translates ids between the P4 pipeline description and the vendor runtime
/// for one hardware unit.
///
/// Each unit has exactly one authoritative mapper, obtained through
/// [`RuntimeIdMapper::create`]. There is no default or copy construction; a
/// second mapper for the same unit would be a second, inconsistent mapping
/// table for the same hardware.
///
/// Lookups take a shared lock; [`push_pipeline_info`] and
/// [`build_action_profile_mapping`] rebuild their maps off to the side and
/// swap them in under the exclusive lock, so a reader sees either the
/// previous mapping or the new one, never a partial rebuild.
///
/// [`push_pipeline_info`]: RuntimeIdMapper::push_pipeline_info
/// [`build_action_profile_mapping`]: RuntimeIdMapper::build_action_profile_mapping
#[derive(Debug)]
pub struct RuntimeIdMapper {
    unit: UnitId,
    state: RwLock<MapState>,
}

impl RuntimeIdMapper {
    /// Creates the mapper for one unit. Mappings start empty; every lookup
    /// fails with `NotFound` until the first successful pipeline push.
    pub fn create(unit: UnitId) -> Self {
        Self {
            unit,
            state: RwLock::new(MapState::default()),
        }
    }

    /// The unit this mapper is scoped to.
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// Rebuilds the logical/physical id mapping from a freshly pushed
    /// pipeline.
    ///
    /// Every object the pipeline declares is joined against the runtime
    /// index by kind and symbolic name. Objects without a runtime
    /// counterpart are omitted; abstract declarations never materialize in
    /// hardware and that is not an error. The previous mapping is replaced,
    /// not merged. Fails with `NotFound` only when `runtime` is `None`,
    /// i.e. the runtime metadata for this unit was never loaded.
    pub fn push_pipeline_info(
        &self,
        pipeline: &PipelineInfo,
        runtime: Option<&RuntimeObjectIndex>,
    ) -> HalResult<()> {
        let runtime = runtime.ok_or_else(|| {
            HalError::not_found(format!("runtime metadata for unit {}", self.unit))
        })?;

        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();
        for (kind, object) in pipeline.iter_objects() {
            match runtime.lookup(kind, &object.name) {
                Some(found) => {
                    forward.insert(object.id, found.id);
                    reverse.insert(found.id, object.id);
                }
                None => {
                    debug!(
                        unit = %self.unit,
                        kind = %kind,
                        name = %object.name,
                        "pipeline object has no runtime counterpart"
                    );
                }
            }
        }

        let mapped = forward.len();
        {
            let mut state = self.state.write();
            state.logical_to_physical = forward;
            state.physical_to_logical = reverse;
        }
        debug!(
            unit = %self.unit,
            mapped,
            declared = pipeline.len(),
            "pipeline id mapping rebuilt"
        );
        Ok(())
    }

    /// Rebuilds the action-profile / action-selector cross-reference from
    /// the auxiliary context document.
    ///
    /// The runtime index does not expose which selector fronts which
    /// profile; the context document does, by symbolic name. Bindings whose
    /// profile is not declared in the pipeline, or whose names do not
    /// resolve in the runtime index, are skipped with a warning. Should a
    /// document bind the same profile to several selection tables, the last
    /// binding wins and the displacement is logged. Fails with
    /// `InvalidArgument` when the document cannot be parsed; a parse failure
    /// leaves both the primary mapping and any previously built
    /// cross-reference untouched.
    pub fn build_action_profile_mapping(
        &self,
        pipeline: &PipelineInfo,
        runtime: Option<&RuntimeObjectIndex>,
        context_doc: &str,
    ) -> HalResult<()> {
        let runtime = runtime.ok_or_else(|| {
            HalError::not_found(format!("runtime metadata for unit {}", self.unit))
        })?;
        let bindings = parse_selector_bindings(context_doc)?;

        let mut profile_to_selector = HashMap::new();
        let mut selector_to_profile = HashMap::new();
        for binding in &bindings {
            if pipeline
                .find(ObjectKind::ActionProfile, &binding.profile)
                .is_none()
            {
                warn!(
                    unit = %self.unit,
                    profile = %binding.profile,
                    "context document names an action profile the pipeline does not declare"
                );
                continue;
            }
            let Some(profile) = runtime.lookup(ObjectKind::ActionProfile, &binding.profile)
            else {
                warn!(
                    unit = %self.unit,
                    profile = %binding.profile,
                    "action profile has no runtime counterpart"
                );
                continue;
            };
            let Some(selector) = runtime.lookup(ObjectKind::ActionSelector, &binding.selector)
            else {
                warn!(
                    unit = %self.unit,
                    selector = %binding.selector,
                    "action selector has no runtime counterpart"
                );
                continue;
            };
            if let Some(displaced) = profile_to_selector.insert(profile.id, selector.id) {
                warn!(
                    unit = %self.unit,
                    profile = %binding.profile,
                    displaced = %displaced,
                    selector = %selector.id,
                    "action profile bound by more than one selection table, keeping the last"
                );
            }
            selector_to_profile.insert(selector.id, profile.id);
        }

        let resolved = profile_to_selector.len();
        {
            let mut state = self.state.write();
            state.profile_to_selector = profile_to_selector;
            state.selector_to_profile = selector_to_profile;
        }
        debug!(
            unit = %self.unit,
            resolved,
            declared = bindings.len(),
            "action profile cross-reference rebuilt"
        );
        Ok(())
    }

    /// Returns the device target for a physical id seen during the last
    /// push.
    ///
    /// Pipe scope is always [`PipeScope::All`] for now; per-pipe placement
    /// is not tracked by the mapping.
    ///
    /// [`PipeScope::All`]: p4hal_types::PipeScope::All
    pub fn device_target(&self, physical: PhysicalId) -> HalResult<DeviceTarget> {
        let state = self.state.read();
        if !state.physical_to_logical.contains_key(&physical) {
            return Err(HalError::not_found(format!(
                "physical id {} on unit {}",
                physical, self.unit
            )));
        }
        Ok(DeviceTarget::all_pipes(self.unit))
    }

    /// Maps a logical id to its physical counterpart.
    pub fn physical_id(&self, logical: LogicalId) -> HalResult<PhysicalId> {
        self.state
            .read()
            .logical_to_physical
            .get(&logical)
            .copied()
            .ok_or_else(|| {
                HalError::not_found(format!("physical id for logical id {}", logical))
            })
    }

    /// Maps a physical id back to its logical counterpart.
    pub fn logical_id(&self, physical: PhysicalId) -> HalResult<LogicalId> {
        self.state
            .read()
            .physical_to_logical
            .get(&physical)
            .copied()
            .ok_or_else(|| {
                HalError::not_found(format!("logical id for physical id {}", physical))
            })
    }

    /// Returns the selector fronting the given action profile.
    pub fn selector_for_profile(&self, profile: PhysicalId) -> HalResult<PhysicalId> {
        self.state
            .read()
            .profile_to_selector
            .get(&profile)
            .copied()
            .ok_or_else(|| {
                HalError::not_found(format!("selector for action profile {}", profile))
            })
    }

    /// Returns the action profile behind the given selector.
    pub fn profile_for_selector(&self, selector: PhysicalId) -> HalResult<PhysicalId> {
        self.state
            .read()
            .selector_to_profile
            .get(&selector)
            .copied()
            .ok_or_else(|| {
                HalError::not_found(format!("action profile for selector {}", selector))
            })
    }
}
