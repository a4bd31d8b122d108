//! Auxiliary context document parsing.
//!
//! The runtime metadata does not expose which action selector fronts which
//! action profile; that linkage only appears in a loosely structured JSON
//! side-channel emitted alongside the compiled pipeline. The document is
//! walked as a dynamic [`serde_json::Value`] rather than deserialized into a
//! rigid struct: the schema belongs to the pipeline compiler and varies
//! across its versions.

use p4hal_types::{HalError, HalResult};
use serde_json::Value;

/// One selector-to-profile binding extracted from the context document.
///
/// Both sides are symbolic names; resolution to physical ids happens in the
/// mapper against the runtime index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorBinding {
    /// Name of the action selector.
    pub selector: String,
    /// Name of the action profile the selector fronts.
    pub profile: String,
}

/// Extracts every selector binding from a context document.
///
/// The document must be a JSON object with a top-level `"tables"` array.
/// Entries whose `"table_type"` is `"selection"` describe a selector and must
/// carry a `"name"` and the `"action_profile"` they are bound to; every other
/// entry is ignored. Returns `InvalidArgument` when the document cannot be
/// parsed or a selection entry is incomplete.
pub fn parse_selector_bindings(doc: &str) -> HalResult<Vec<SelectorBinding>> {
    let root: Value = serde_json::from_str(doc).map_err(|e| {
        HalError::invalid_argument(format!("context document is not valid JSON: {}", e))
    })?;

    let tables = root
        .get("tables")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            HalError::invalid_argument("context document has no \"tables\" array")
        })?;

    let mut bindings = Vec::new();
    for table in tables {
        if table.get("table_type").and_then(Value::as_str) != Some("selection") {
            continue;
        }
        let selector = table
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| HalError::invalid_argument("selection table entry has no name"))?;
        let profile = table
            .get("action_profile")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                HalError::invalid_argument(format!(
                    "selection table {} names no action profile",
                    selector
                ))
            })?;
        bindings.push(SelectorBinding {
            selector: selector.to_string(),
            profile: profile.to_string(),
        });
    }
    Ok(bindings)
}
