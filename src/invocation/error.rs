use crate::workflow::WorkflowRunError;

/// Validation-layer failures. All are user-correctable: they are reported
/// with enough detail to fix and resubmit, and each one bumps the session's
/// consecutive-mistake counter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockReason {
    #[error("missing required parameter `{param}` for `{tool}`")]
    MissingParam { tool: String, param: String },
    #[error("invalid workflow file: {reason}")]
    InvalidContent { reason: String },
    #[error("invalid `{param}` parameter: {reason}")]
    InvalidParam { param: String, reason: String },
    #[error("file not found: {path}")]
    NotFound { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    AgentNotFound,
    CircularDependency,
    InvalidInputReference,
    ExecutionTimeout,
    Unclassified,
}

impl ExecutionErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionErrorKind::AgentNotFound => "agent_not_found",
            ExecutionErrorKind::CircularDependency => "circular_dependency",
            ExecutionErrorKind::InvalidInputReference => "invalid_input_reference",
            ExecutionErrorKind::ExecutionTimeout => "execution_timeout",
            ExecutionErrorKind::Unclassified => "unclassified",
        }
    }
}

fn matches_agent_not_found(message: &str) -> bool {
    message.contains("agent") && message.contains("not found")
}

fn matches_circular(message: &str) -> bool {
    message.contains("circular")
}

fn matches_input_reference(message: &str) -> bool {
    message.contains("input") || message.contains("reference")
}

fn matches_timeout(message: &str) -> bool {
    message.contains("timeout")
}

// Evaluated top to bottom; first match wins. The execution boundary only
// guarantees a human-readable message, so classification stays substring
// based until that contract changes.
const CLASSIFIERS: &[(fn(&str) -> bool, ExecutionErrorKind, &str)] = &[
    (
        matches_agent_not_found,
        ExecutionErrorKind::AgentNotFound,
        "Agent not found. Ensure all referenced agents are available in the loaded agent packages.",
    ),
    (
        matches_circular,
        ExecutionErrorKind::CircularDependency,
        "Circular dependency detected in workflow nodes.",
    ),
    (
        matches_input_reference,
        ExecutionErrorKind::InvalidInputReference,
        "Invalid input reference. Check node input syntax (:nodeId).",
    ),
    (
        matches_timeout,
        ExecutionErrorKind::ExecutionTimeout,
        "Workflow execution timed out. Check for infinite loops or long-running operations.",
    ),
];

pub fn classify_execution_error(error: &WorkflowRunError) -> (ExecutionErrorKind, String) {
    let message = error.message.to_lowercase();
    for (matches, kind, mapped) in CLASSIFIERS {
        if matches(&message) {
            return (*kind, (*mapped).to_string());
        }
    }
    (
        ExecutionErrorKind::Unclassified,
        format!("workflow execution error: {}", error.message),
    )
}

const COMMON_CAUSES: &[&str] = &[
    "Check that all referenced agents are available in the loaded agent packages",
    "Verify that input references use the correct syntax (:nodeId)",
    "Ensure all required agent parameters are provided",
    "Check for circular dependencies in the workflow",
    "Validate the workflow structure matches the engine's specification",
];

/// One diagnostic report per failed execution: mapped message, the raw error
/// verbatim (message, name, stack when present), any extra properties the
/// engine attached, and a fixed checklist of common causes. Nothing is
/// swallowed at this stage.
pub fn build_failure_report(error: &WorkflowRunError, mapped_message: &str) -> String {
    let mut report = format!("Failed to execute workflow: {mapped_message}");

    report.push_str("\n\nFull error details:\n");
    if let Some(name) = error.name.as_deref() {
        report.push_str(&format!("Error name: {name}\n"));
    }
    report.push_str(&format!("Error message: {}\n", error.message));
    if let Some(stack) = error.stack.as_deref() {
        report.push_str(&format!("Stack trace:\n{stack}\n"));
    }

    if !error.properties.is_empty() {
        report.push_str("\nAdditional error properties:\n");
        for (key, value) in &error.properties {
            let rendered = serde_json::to_string_pretty(value)
                .unwrap_or_else(|_| value.to_string());
            report.push_str(&format!("{key}: {rendered}\n"));
        }
    }

    report.push_str("\nCommon workflow issues:\n");
    for cause in COMMON_CAUSES {
        report.push_str(&format!("- {cause}\n"));
    }

    report
}
