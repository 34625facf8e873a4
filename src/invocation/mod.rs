//! Lifecycle adapter for invoking one external workflow action safely:
//! partial-argument streaming, structural validation, the approval gate,
//! execution through the runner boundary, and structured error mapping.

pub mod chat_history;
pub mod error;
pub mod format;
pub mod request;
pub mod session;
pub mod state;
pub mod validation;

pub use error::{BlockReason, ExecutionErrorKind};
pub use request::{InvocationOutcome, InvocationRequest};
pub use session::SessionContext;
pub use state::InvocationState;

use crate::invocation::chat_history::parse_flexible_messages;
use crate::invocation::error::{build_failure_report, classify_execution_error};
use crate::invocation::format::format_workflow_result;
use crate::invocation::validation::{
    is_supported_workflow_extension, parse_workflow_file, validate_workflow_structure,
};
use crate::shared::text::unescape_html_entities;
use crate::workflow::{Approver, ToolResponse, ToolResultSink, WorkflowRunner};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const RUN_WORKFLOW_TOOL: &str = "run_workflow";
pub const RUN_WORKFLOW_DISPLAY_NAME: &str = "Workflow";

pub const PATH_PARAM: &str = "path";
pub const CHAT_HISTORY_PARAM: &str = "chat_history";
pub const USER_PROMPT_PARAM: &str = "user_prompt";

// Placeholder node names the workflow format reserves for injected input.
const CHAT_HISTORY_PLACEHOLDER: &str = "chatHistory";
const USER_PROMPT_PLACEHOLDER: &str = "userPrompt";

fn basename(file_path: &str) -> String {
    Path::new(file_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_path)
        .to_string()
}

fn advance(session: &SessionContext, state: &mut InvocationState, next: InvocationState) {
    debug_assert!(state.can_transition_to(next), "{state} -> {next}");
    session.log(&format!("tool={RUN_WORKFLOW_TOOL} transition={state}->{next}"));
    *state = next;
}

fn block(
    session: &mut SessionContext,
    state: &mut InvocationState,
    sink: &mut dyn ToolResultSink,
    reason: BlockReason,
) -> Option<InvocationOutcome> {
    advance(session, state, InvocationState::Blocked);
    session.note_mistake(RUN_WORKFLOW_TOOL);
    sink.push(ToolResponse::Error(reason.to_string()));
    Some(InvocationOutcome::Blocked { reason })
}

/// Drives one `run_workflow` request through its lifecycle. Returns `None`
/// while arguments are still streaming; a finalized request always produces
/// exactly one terminal outcome.
pub fn run_workflow_tool(
    session: &mut SessionContext,
    request: &InvocationRequest,
    approver: &mut dyn Approver,
    sink: &mut dyn ToolResultSink,
    runner: &mut dyn WorkflowRunner,
) -> Option<InvocationOutcome> {
    let mut state = InvocationState::Streaming;

    if request.partial {
        // Best-effort progress echo only; a flaky display channel must not
        // abort the request.
        let preview = request.param(PATH_PARAM).unwrap_or_default();
        let _ = approver.ask("command", preview, true);
        return None;
    }

    advance(session, &mut state, InvocationState::Finalized);

    let Some(file_path) = request
        .param(PATH_PARAM)
        .map(str::trim)
        .filter(|path| !path.is_empty())
    else {
        return block(
            session,
            &mut state,
            sink,
            BlockReason::MissingParam {
                tool: RUN_WORKFLOW_TOOL.to_string(),
                param: PATH_PARAM.to_string(),
            },
        );
    };

    if !is_supported_workflow_extension(Path::new(file_path)) {
        return block(
            session,
            &mut state,
            sink,
            BlockReason::InvalidContent {
                reason: "workflow files must have a .yaml, .yml, or .json extension".to_string(),
            },
        );
    }

    let resolved = resolve_target(session.cwd(), file_path);

    // Existence is checked before the approval gate, uniformly, so the
    // approver is never prompted about a file that does not exist.
    if !resolved.exists() {
        return block(
            session,
            &mut state,
            sink,
            BlockReason::NotFound {
                path: file_path.to_string(),
            },
        );
    }

    let graph = match parse_workflow_file(&resolved) {
        Ok(graph) => graph,
        Err(reason) => return block(session, &mut state, sink, reason),
    };
    if let Err(reason) = validate_workflow_structure(&graph) {
        return block(session, &mut state, sink, reason);
    }

    let messages = match request.param(CHAT_HISTORY_PARAM) {
        Some(raw) => match parse_flexible_messages(raw, CHAT_HISTORY_PARAM) {
            Ok(messages) => Some(messages),
            Err(reason) => return block(session, &mut state, sink, reason),
        },
        None => None,
    };
    let user_prompt = request.param(USER_PROMPT_PARAM).map(str::to_string);

    advance(session, &mut state, InvocationState::Validated);
    session.reset_mistakes();

    let display_path = unescape_html_entities(file_path);

    advance(session, &mut state, InvocationState::AwaitingApproval);
    let approved = approver
        .ask(
            "command",
            &format!("Run workflow: {}", basename(&display_path)),
            false,
        )
        // A withdrawn approval channel counts as a decline.
        .map(|response| response.is_approved())
        .unwrap_or(false);

    if !approved {
        advance(session, &mut state, InvocationState::Rejected);
        return Some(InvocationOutcome::Rejected);
    }

    advance(session, &mut state, InvocationState::Approved);
    advance(session, &mut state, InvocationState::Executing);

    let mut injected = BTreeMap::new();
    if let Some(messages) = messages {
        // Injection with no matching placeholder is a silent no-op.
        if runner.declares_placeholder(&graph, CHAT_HISTORY_PLACEHOLDER) {
            injected.insert(CHAT_HISTORY_PLACEHOLDER.to_string(), Value::Array(messages));
        }
    }
    if let Some(prompt) = user_prompt {
        if runner.declares_placeholder(&graph, USER_PROMPT_PLACEHOLDER) {
            injected.insert(USER_PROMPT_PLACEHOLDER.to_string(), Value::String(prompt));
        }
    }

    match runner.run(&graph, &injected) {
        Ok(result) => {
            advance(session, &mut state, InvocationState::Succeeded);
            let formatted =
                format_workflow_result(&result, RUN_WORKFLOW_DISPLAY_NAME, &display_path);
            sink.push(ToolResponse::Success(formatted.clone()));
            Some(InvocationOutcome::Succeeded { formatted })
        }
        Err(run_error) => {
            advance(session, &mut state, InvocationState::Failed);
            let (kind, mapped) = classify_execution_error(&run_error);
            let report = build_failure_report(&run_error, &mapped);
            sink.push(ToolResponse::Error(report.clone()));
            Some(InvocationOutcome::Failed {
                kind,
                message: report,
            })
        }
    }
}

fn resolve_target(cwd: &Path, file_path: &str) -> PathBuf {
    let candidate = Path::new(file_path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        cwd.join(candidate)
    }
}
