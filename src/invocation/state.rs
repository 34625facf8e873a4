#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Streaming,
    Finalized,
    Validated,
    AwaitingApproval,
    Approved,
    Rejected,
    Executing,
    Succeeded,
    Failed,
    Blocked,
}

impl InvocationState {
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (InvocationState::Streaming, InvocationState::Streaming)
                | (InvocationState::Streaming, InvocationState::Finalized)
                | (InvocationState::Finalized, InvocationState::Validated)
                | (InvocationState::Finalized, InvocationState::Blocked)
                | (InvocationState::Validated, InvocationState::AwaitingApproval)
                | (InvocationState::AwaitingApproval, InvocationState::Approved)
                | (InvocationState::AwaitingApproval, InvocationState::Rejected)
                | (InvocationState::Approved, InvocationState::Executing)
                | (InvocationState::Executing, InvocationState::Succeeded)
                | (InvocationState::Executing, InvocationState::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InvocationState::Succeeded
                | InvocationState::Failed
                | InvocationState::Rejected
                | InvocationState::Blocked
        )
    }
}

impl std::fmt::Display for InvocationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InvocationState::Streaming => "streaming",
            InvocationState::Finalized => "finalized",
            InvocationState::Validated => "validated",
            InvocationState::AwaitingApproval => "awaiting_approval",
            InvocationState::Approved => "approved",
            InvocationState::Rejected => "rejected",
            InvocationState::Executing => "executing",
            InvocationState::Succeeded => "succeeded",
            InvocationState::Failed => "failed",
            InvocationState::Blocked => "blocked",
        };
        write!(f, "{label}")
    }
}
