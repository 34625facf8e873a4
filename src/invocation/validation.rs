use crate::invocation::error::BlockReason;
use serde_json::Value;
use std::fs;
use std::path::Path;

const SUPPORTED_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

pub fn is_supported_workflow_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Reads and parses a workflow file into a generic keyed value, choosing the
/// serialization purely by file extension.
pub fn parse_workflow_file(path: &Path) -> Result<Value, BlockReason> {
    let content = fs::read_to_string(path).map_err(|err| BlockReason::InvalidContent {
        reason: format!("failed to read file: {err}"),
    })?;

    if is_json_extension(path) {
        serde_json::from_str(&content).map_err(|err| BlockReason::InvalidContent {
            reason: format!("failed to parse file: {err}"),
        })
    } else {
        serde_yaml::from_str(&content).map_err(|err| BlockReason::InvalidContent {
            reason: format!("failed to parse file: {err}"),
        })
    }
}

/// A workflow graph must be a keyed mapping with at least one of the
/// recognized top-level sections.
pub fn validate_workflow_structure(graph: &Value) -> Result<(), BlockReason> {
    let Some(object) = graph.as_object() else {
        return Err(BlockReason::InvalidContent {
            reason: "file does not contain a valid YAML/JSON object".to_string(),
        });
    };

    if !object.contains_key("agents") && !object.contains_key("nodes") {
        return Err(BlockReason::InvalidContent {
            reason: "file does not appear to be a workflow (missing 'agents' or 'nodes' section)"
                .to_string(),
        });
    }

    Ok(())
}
