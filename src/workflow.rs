//! Boundary seams for the external workflow engine, the interactive
//! approval channel, and the outcome reporting channel.

use serde_json::Value;
use std::collections::BTreeMap;

/// Error surface of the external workflow engine. The only guaranteed part
/// of the contract is a human-readable message; name, stack, and any extra
/// properties are carried through when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowRunError {
    pub message: String,
    pub name: Option<String>,
    pub stack: Option<String>,
    pub properties: BTreeMap<String, Value>,
}

impl WorkflowRunError {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

impl std::fmt::Display for WorkflowRunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WorkflowRunError {}

/// One external workflow execution. Implementations run the parsed graph as
/// a unit; the adapter never retries a failed run.
pub trait WorkflowRunner {
    /// Whether the loaded graph declares a placeholder of this name.
    /// Injection of a value with no matching placeholder is a silent no-op.
    fn declares_placeholder(&self, graph: &Value, name: &str) -> bool;

    fn run(
        &mut self,
        graph: &Value,
        injected: &BTreeMap<String, Value>,
    ) -> Result<Value, WorkflowRunError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalResponse {
    Approved,
    Rejected,
    /// The approver answered with an execution request instead of a plain
    /// yes; treated as approval.
    Command,
}

impl ApprovalResponse {
    pub fn is_approved(self) -> bool {
        matches!(self, ApprovalResponse::Approved | ApprovalResponse::Command)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("approval channel closed: {reason}")]
pub struct ApprovalLost {
    pub reason: String,
}

/// Single request/response approval channel. `partial` marks best-effort
/// progress echoes while arguments are still streaming; those calls carry no
/// decision weight.
pub trait Approver {
    fn ask(
        &mut self,
        kind: &str,
        text: &str,
        partial: bool,
    ) -> Result<ApprovalResponse, ApprovalLost>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResponse {
    Success(String),
    Error(String),
}

/// The only way outcomes leave the invocation adapter.
pub trait ToolResultSink {
    fn push(&mut self, response: ToolResponse);
}
