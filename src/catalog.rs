//! Static catalog of tool groups and the tools available in every mode.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolGroupConfig {
    pub tools: &'static [&'static str],
}

const TOOL_GROUPS: &[(&str, ToolGroupConfig)] = &[
    (
        "read",
        ToolGroupConfig {
            tools: &["read_file", "search_files", "list_files", "list_code_definitions"],
        },
    ),
    (
        "edit",
        ToolGroupConfig {
            tools: &["write_to_file", "apply_diff", "insert_content", "search_and_replace"],
        },
    ),
    (
        "browser",
        ToolGroupConfig {
            tools: &["browser_action"],
        },
    ),
    (
        "command",
        ToolGroupConfig {
            tools: &["execute_command"],
        },
    ),
    (
        "mcp",
        ToolGroupConfig {
            tools: &["use_mcp_tool", "access_mcp_resource"],
        },
    ),
    (
        "workflow",
        ToolGroupConfig {
            tools: &["run_workflow"],
        },
    ),
];

pub const ALWAYS_AVAILABLE_TOOLS: &[&str] = &[
    "ask_followup_question",
    "attempt_completion",
    "switch_mode",
    "new_task",
];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown tool group `{group}`")]
    UnknownGroup { group: String },
}

pub fn actions_of(group_id: &str) -> Result<&'static [&'static str], CatalogError> {
    TOOL_GROUPS
        .iter()
        .find(|(id, _)| *id == group_id)
        .map(|(_, config)| config.tools)
        .ok_or_else(|| CatalogError::UnknownGroup {
            group: group_id.to_string(),
        })
}

pub fn group_exists(group_id: &str) -> bool {
    TOOL_GROUPS.iter().any(|(id, _)| *id == group_id)
}

pub fn is_always_available(tool: &str) -> bool {
    ALWAYS_AVAILABLE_TOOLS.contains(&tool)
}
