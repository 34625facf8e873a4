//! Boolean-gated experimental capabilities with per-session overrides.

use std::collections::BTreeMap;

pub const POWER_STEERING: &str = "power_steering";
pub const CONCURRENT_FILE_READS: &str = "concurrent_file_reads";
pub const DISABLE_COMPLETION_COMMAND: &str = "disable_completion_command";

const EXPERIMENT_DEFAULTS: &[(&str, bool)] = &[
    (POWER_STEERING, false),
    (CONCURRENT_FILE_READS, false),
    (DISABLE_COMPLETION_COMMAND, false),
];

pub fn is_experiment_id(id: &str) -> bool {
    EXPERIMENT_DEFAULTS.iter().any(|(flag, _)| *flag == id)
}

pub fn default_enabled(id: &str) -> bool {
    EXPERIMENT_DEFAULTS
        .iter()
        .find(|(flag, _)| *flag == id)
        .map(|(_, enabled)| *enabled)
        // Unknown flags are treated as disabled.
        .unwrap_or(false)
}

pub fn is_enabled(overrides: &BTreeMap<String, bool>, id: &str) -> bool {
    match overrides.get(id) {
        Some(enabled) => *enabled,
        None => default_enabled(id),
    }
}
