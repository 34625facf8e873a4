use crate::invocation::error::{BlockReason, ExecutionErrorKind};
use std::collections::BTreeMap;

/// One attempted use of an action. Mutated by the caller while streamed
/// arguments arrive; finalized once `partial` flips to false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub tool: String,
    pub params: BTreeMap<String, String>,
    pub partial: bool,
}

impl InvocationRequest {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            params: BTreeMap::new(),
            partial: false,
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Exactly one terminal outcome per finalized request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Blocked {
        reason: BlockReason,
    },
    Rejected,
    Failed {
        kind: ExecutionErrorKind,
        message: String,
    },
    Succeeded {
        formatted: String,
    },
}
