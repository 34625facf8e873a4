//! Built-in mode registry plus per-session custom mode overrides.
//!
//! Custom modes are supplied by the caller for the duration of a session and
//! are never persisted here. A custom mode sharing a slug with a built-in
//! mode replaces it in its entirety; there is no field-level merging.

use crate::catalog::{self, ALWAYS_AVAILABLE_TOOLS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Either a bare group id or a `[group, options]` pair. Options are only
/// meaningful for the mutating `edit` group; other groups ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GroupAssignment {
    Bare(String),
    WithOptions(String, GroupOptions),
}

impl GroupAssignment {
    pub fn group_name(&self) -> &str {
        match self {
            GroupAssignment::Bare(name) => name,
            GroupAssignment::WithOptions(name, _) => name,
        }
    }

    pub fn options(&self) -> Option<&GroupOptions> {
        match self {
            GroupAssignment::Bare(_) => None,
            GroupAssignment::WithOptions(_, options) => Some(options),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ModeConfig {
    pub slug: String,
    pub name: String,
    pub role_definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_to_use: Option<String>,
    #[serde(default)]
    pub groups: Vec<GroupAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

/// Role and instruction text resolved for prompt assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSelection {
    pub role_definition: String,
    pub base_instructions: String,
}

/// Prompt-level override for a single mode, without replacing the mode itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PromptOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ModeError {
    #[error("no mode found for slug `{slug}`")]
    ModeNotFound { slug: String },
}

fn bare(group: &str) -> GroupAssignment {
    GroupAssignment::Bare(group.to_string())
}

pub fn builtin_modes() -> &'static [ModeConfig] {
    static MODES: OnceLock<Vec<ModeConfig>> = OnceLock::new();
    MODES.get_or_init(|| {
        vec![
            ModeConfig {
                slug: "code".to_string(),
                name: "Code".to_string(),
                role_definition: "You are a highly skilled software engineer with extensive \
                                  knowledge in many programming languages, frameworks, design \
                                  patterns, and best practices."
                    .to_string(),
                when_to_use: None,
                groups: vec![
                    bare("read"),
                    bare("edit"),
                    bare("browser"),
                    bare("command"),
                    bare("mcp"),
                    bare("workflow"),
                ],
                custom_instructions: None,
            },
            ModeConfig {
                slug: "architect".to_string(),
                name: "Architect".to_string(),
                role_definition: "You are an experienced technical leader who gathers context \
                                  and produces a detailed plan for the user to review before \
                                  implementation begins."
                    .to_string(),
                when_to_use: None,
                groups: vec![
                    bare("read"),
                    GroupAssignment::WithOptions(
                        "edit".to_string(),
                        GroupOptions {
                            file_regex: Some("\\.md$".to_string()),
                            description: Some("Markdown files only".to_string()),
                        },
                    ),
                    bare("browser"),
                    bare("mcp"),
                ],
                custom_instructions: Some(
                    "Gather context, draft a plan, and confirm it with the user before \
                     suggesting a switch to an implementation mode."
                        .to_string(),
                ),
            },
            ModeConfig {
                slug: "ask".to_string(),
                name: "Ask".to_string(),
                role_definition: "You are a knowledgeable technical assistant focused on \
                                  answering questions about software development."
                    .to_string(),
                when_to_use: None,
                groups: vec![bare("read"), bare("browser"), bare("mcp")],
                custom_instructions: Some(
                    "Answer thoroughly and do not switch to implementing code unless the \
                     user explicitly asks."
                        .to_string(),
                ),
            },
            ModeConfig {
                slug: "debug".to_string(),
                name: "Debug".to_string(),
                role_definition: "You are an expert software debugger specializing in \
                                  systematic problem diagnosis and resolution."
                    .to_string(),
                when_to_use: None,
                groups: vec![
                    bare("read"),
                    bare("edit"),
                    bare("browser"),
                    bare("command"),
                    bare("mcp"),
                ],
                custom_instructions: Some(
                    "Narrow candidate causes, add logs to validate assumptions, and confirm \
                     the diagnosis before fixing."
                        .to_string(),
                ),
            },
            ModeConfig {
                slug: "orchestrator".to_string(),
                name: "Orchestrator".to_string(),
                role_definition: "You are a strategic workflow orchestrator who coordinates \
                                  complex tasks by delegating them to specialized modes."
                    .to_string(),
                when_to_use: None,
                groups: vec![],
                custom_instructions: Some(
                    "Break complex work into subtasks and delegate each to the most \
                     appropriate mode."
                        .to_string(),
                ),
            },
        ]
    })
}

pub fn default_mode_slug() -> &'static str {
    "code"
}

fn find_by_slug<'a>(slug: &str, modes: &'a [ModeConfig]) -> Option<&'a ModeConfig> {
    modes.iter().find(|mode| mode.slug == slug)
}

/// Custom modes win over built-in modes of the same slug.
pub fn get_mode_by_slug<'a>(slug: &str, custom_modes: &'a [ModeConfig]) -> Option<&'a ModeConfig> {
    find_by_slug(slug, custom_modes).or_else(|| find_by_slug(slug, builtin_modes()))
}

pub fn resolve<'a>(slug: &str, custom_modes: &'a [ModeConfig]) -> Result<&'a ModeConfig, ModeError> {
    get_mode_by_slug(slug, custom_modes).ok_or_else(|| ModeError::ModeNotFound {
        slug: slug.to_string(),
    })
}

/// Built-in modes in their fixed order, each replaced in place by a custom
/// mode of the same slug; custom modes with novel slugs append at the end in
/// the order supplied.
pub fn all_modes(custom_modes: &[ModeConfig]) -> Vec<ModeConfig> {
    let mut all: Vec<ModeConfig> = builtin_modes().to_vec();
    for custom in custom_modes {
        match all.iter_mut().find(|mode| mode.slug == custom.slug) {
            Some(existing) => *existing = custom.clone(),
            None => all.push(custom.clone()),
        }
    }
    all
}

/// True iff a custom mode with that slug is present, whether or not it
/// overrides a built-in mode.
pub fn is_custom(slug: &str, custom_modes: &[ModeConfig]) -> bool {
    custom_modes.iter().any(|mode| mode.slug == slug)
}

/// Union of every assigned group's tools plus the always-available set.
///
/// Deliberately more permissive than `authorize`: that check walks the
/// assignments in declaration order and stops at the first match, while this
/// union has set semantics. The two must stay separate algorithms.
pub fn tools_for(mode: &ModeConfig) -> BTreeSet<String> {
    let mut tools = BTreeSet::new();
    for assignment in &mode.groups {
        if let Ok(actions) = catalog::actions_of(assignment.group_name()) {
            for action in actions {
                tools.insert((*action).to_string());
            }
        }
    }
    for tool in ALWAYS_AVAILABLE_TOOLS {
        tools.insert((*tool).to_string());
    }
    tools
}

/// Resolve role and base-instruction text with custom mode > prompt override
/// > built-in precedence. Unknown slugs resolve to empty text.
pub fn mode_selection(
    slug: &str,
    prompt_override: Option<&PromptOverride>,
    custom_modes: &[ModeConfig],
) -> ModeSelection {
    let custom = find_by_slug(slug, custom_modes);
    let builtin = find_by_slug(slug, builtin_modes());

    if let Some(mode) = custom.or(builtin) {
        if custom.is_none() {
            if let Some(overrides) = prompt_override {
                return ModeSelection {
                    role_definition: overrides
                        .role_definition
                        .clone()
                        .unwrap_or_else(|| mode.role_definition.clone()),
                    base_instructions: overrides
                        .custom_instructions
                        .clone()
                        .or_else(|| mode.custom_instructions.clone())
                        .unwrap_or_default(),
                };
            }
        }
        return ModeSelection {
            role_definition: mode.role_definition.clone(),
            base_instructions: mode.custom_instructions.clone().unwrap_or_default(),
        };
    }

    ModeSelection::default()
}

pub fn role_definition_for(slug: &str, custom_modes: &[ModeConfig]) -> String {
    get_mode_by_slug(slug, custom_modes)
        .map(|mode| mode.role_definition.clone())
        .unwrap_or_default()
}

pub fn when_to_use_for(slug: &str, custom_modes: &[ModeConfig]) -> String {
    get_mode_by_slug(slug, custom_modes)
        .and_then(|mode| mode.when_to_use.clone())
        .unwrap_or_default()
}

pub fn custom_instructions_for(slug: &str, custom_modes: &[ModeConfig]) -> String {
    get_mode_by_slug(slug, custom_modes)
        .and_then(|mode| mode.custom_instructions.clone())
        .unwrap_or_default()
}
