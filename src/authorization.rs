//! Per-action authorization against the active mode.
//!
//! `authorize` is pure and reentrant: no I/O, no locking. Callers supplying a
//! custom-mode list that can be mutated concurrently must snapshot it first.

use crate::catalog::{self, is_always_available};
use crate::experiments;
use crate::modes::{get_mode_by_slug, ModeConfig};
use regex::Regex;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyCause {
    FlagOff,
    RequirementUnset,
    AllDisabled,
    ModeNotFound,
    NoMatchingGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { cause: DenyCause },
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Per-session tool requirement flags: either everything is disabled, or a
/// per-tool map where an explicit `false` denies that tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequirements {
    AllDisabled,
    PerTool(BTreeMap<String, bool>),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    /// A mutating action targeted a path outside its mode's allowed pattern.
    /// Raised as a hard failure rather than a deny: it signals a contract
    /// breach by the caller, and must be surfaced verbatim.
    #[error(
        "this mode ({mode_name}) can only edit files matching pattern: {pattern}{}. Got: {path}",
        .description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
    )]
    FileRestriction {
        mode_name: String,
        pattern: String,
        description: Option<String>,
        path: String,
    },
    #[error("mode `{mode_slug}` references {source}")]
    UnknownGroup {
        mode_slug: String,
        #[source]
        source: catalog::CatalogError,
    },
}

fn file_matches_pattern(file_path: &str, pattern: &str) -> bool {
    match Regex::new(pattern) {
        Ok(regex) => regex.is_match(file_path),
        // An unparsable pattern never matches, so a restricted edit under it
        // surfaces as a FileRestriction rather than slipping through.
        Err(_) => false,
    }
}

fn has_content_change_evidence(params: &BTreeMap<String, String>) -> bool {
    ["diff", "content", "operations"]
        .iter()
        .any(|key| params.contains_key(*key))
}

/// Decide whether `tool` may run under `mode_slug`, in this exact order:
/// always-available set, experiment gate, requirement flags, mode lookup,
/// then the mode's group assignments in declaration order with the first
/// granting assignment winning.
pub fn authorize(
    tool: &str,
    mode_slug: &str,
    custom_modes: &[ModeConfig],
    requirements: Option<&ToolRequirements>,
    params: Option<&BTreeMap<String, String>>,
    experiment_overrides: Option<&BTreeMap<String, bool>>,
) -> Result<Decision, AuthorizationError> {
    if is_always_available(tool) {
        return Ok(Decision::Allow);
    }

    // Experiment-gated tools are rejected before any group check.
    if let Some(overrides) = experiment_overrides {
        if experiments::is_experiment_id(tool) && !experiments::is_enabled(overrides, tool) {
            return Ok(Decision::Deny {
                cause: DenyCause::FlagOff,
            });
        }
    }

    match requirements {
        Some(ToolRequirements::AllDisabled) => {
            return Ok(Decision::Deny {
                cause: DenyCause::AllDisabled,
            });
        }
        Some(ToolRequirements::PerTool(map)) => {
            if map.get(tool) == Some(&false) {
                return Ok(Decision::Deny {
                    cause: DenyCause::RequirementUnset,
                });
            }
        }
        None => {}
    }

    let Some(mode) = get_mode_by_slug(mode_slug, custom_modes) else {
        return Ok(Decision::Deny {
            cause: DenyCause::ModeNotFound,
        });
    };

    for assignment in &mode.groups {
        let group_name = assignment.group_name();
        let group_tools =
            catalog::actions_of(group_name).map_err(|source| AuthorizationError::UnknownGroup {
                mode_slug: mode_slug.to_string(),
                source,
            })?;

        if !group_tools.contains(&tool) {
            continue;
        }

        let Some(options) = assignment.options() else {
            return Ok(Decision::Allow);
        };

        if group_name == "edit" {
            if let Some(pattern) = options.file_regex.as_deref() {
                if let Some(params) = params {
                    if let Some(file_path) = params.get("path") {
                        if has_content_change_evidence(params)
                            && !file_matches_pattern(file_path, pattern)
                        {
                            return Err(AuthorizationError::FileRestriction {
                                mode_name: mode.name.clone(),
                                pattern: pattern.to_string(),
                                description: options.description.clone(),
                                path: file_path.clone(),
                            });
                        }
                    }
                }
            }
        }

        // First matching assignment wins; later assignments are never
        // consulted even if they carry different options.
        return Ok(Decision::Allow);
    }

    Ok(Decision::Deny {
        cause: DenyCause::NoMatchingGroup,
    })
}
