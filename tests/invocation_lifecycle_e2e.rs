use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Value};
use tempfile::tempdir;
use toolgate::invocation::{
    run_workflow_tool, BlockReason, ExecutionErrorKind, InvocationOutcome, InvocationRequest,
    SessionContext, CHAT_HISTORY_PARAM, PATH_PARAM, RUN_WORKFLOW_TOOL, USER_PROMPT_PARAM,
};
use toolgate::shared::logging::session_log_path;
use toolgate::workflow::{
    ApprovalLost, ApprovalResponse, Approver, ToolResponse, ToolResultSink, WorkflowRunError,
    WorkflowRunner,
};

struct ScriptedApprover {
    approve: bool,
    asks: Vec<(String, bool)>,
}

impl ScriptedApprover {
    fn new(approve: bool) -> Self {
        Self {
            approve,
            asks: Vec::new(),
        }
    }
}

impl Approver for ScriptedApprover {
    fn ask(
        &mut self,
        _kind: &str,
        text: &str,
        partial: bool,
    ) -> Result<ApprovalResponse, ApprovalLost> {
        self.asks.push((text.to_string(), partial));
        if self.approve {
            Ok(ApprovalResponse::Approved)
        } else {
            Ok(ApprovalResponse::Rejected)
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    responses: Vec<ToolResponse>,
}

impl ToolResultSink for RecordingSink {
    fn push(&mut self, response: ToolResponse) {
        self.responses.push(response);
    }
}

struct PlaceholderRunner {
    result: Result<Value, WorkflowRunError>,
    seen_injections: BTreeMap<String, Value>,
}

impl WorkflowRunner for PlaceholderRunner {
    fn declares_placeholder(&self, graph: &Value, name: &str) -> bool {
        graph
            .get("nodes")
            .and_then(Value::as_object)
            .map(|nodes| nodes.contains_key(name))
            .unwrap_or(false)
    }

    fn run(
        &mut self,
        _graph: &Value,
        injected: &BTreeMap<String, Value>,
    ) -> Result<Value, WorkflowRunError> {
        self.seen_injections = injected.clone();
        self.result.clone()
    }
}

const WORKFLOW_WITH_PLACEHOLDERS: &str = "version: 0.5\nnodes:\n  userPrompt:\n    value: \"\"\n  chatHistory:\n    value: []\n  llm:\n    agent: openAIAgent\n";

fn write_workflow(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).expect("write workflow");
}

#[test]
fn streamed_partials_then_missing_path_blocks_then_valid_run_resets() {
    let temp = tempdir().expect("tempdir");
    write_workflow(temp.path(), "flow.yaml", WORKFLOW_WITH_PLACEHOLDERS);
    let mut session = SessionContext::new(temp.path()).with_log_root(temp.path());
    let mut approver = ScriptedApprover::new(true);
    let mut sink = RecordingSink::default();
    let mut runner = PlaceholderRunner {
        result: Ok(json!({"llm": {"text": "done"}})),
        seen_injections: BTreeMap::new(),
    };

    // Arguments stream in: the adapter only echoes, touches nothing.
    for prefix in ["f", "flo", "flow.ya"] {
        let partial = InvocationRequest::new(RUN_WORKFLOW_TOOL)
            .with_param(PATH_PARAM, prefix)
            .partial();
        let outcome =
            run_workflow_tool(&mut session, &partial, &mut approver, &mut sink, &mut runner);
        assert!(outcome.is_none());
    }
    assert_eq!(session.consecutive_mistake_count(), 0);

    // Finalized with an empty required path: exactly one mistake.
    let empty = InvocationRequest::new(RUN_WORKFLOW_TOOL).with_param(PATH_PARAM, "");
    let outcome = run_workflow_tool(&mut session, &empty, &mut approver, &mut sink, &mut runner)
        .expect("terminal outcome");
    assert!(matches!(
        outcome,
        InvocationOutcome::Blocked {
            reason: BlockReason::MissingParam { .. }
        }
    ));
    assert_eq!(session.consecutive_mistake_count(), 1);

    // A subsequent fully valid call resets the counter to zero.
    let valid = InvocationRequest::new(RUN_WORKFLOW_TOOL)
        .with_param(PATH_PARAM, "flow.yaml")
        .with_param(CHAT_HISTORY_PARAM, r#"[{"role":"user","content":"hi"}]"#)
        .with_param(USER_PROMPT_PARAM, "summarize");
    let outcome = run_workflow_tool(&mut session, &valid, &mut approver, &mut sink, &mut runner)
        .expect("terminal outcome");
    assert!(matches!(outcome, InvocationOutcome::Succeeded { .. }));
    assert_eq!(session.consecutive_mistake_count(), 0);

    // Both declared placeholders received their injected values.
    assert_eq!(
        runner.seen_injections.get("chatHistory"),
        Some(&json!([{"role": "user", "content": "hi"}]))
    );
    assert_eq!(
        runner.seen_injections.get("userPrompt"),
        Some(&json!("summarize"))
    );

    // The streaming echoes and the single approval prompt were all asked.
    let partial_asks = approver.asks.iter().filter(|(_, partial)| *partial).count();
    assert_eq!(partial_asks, 3);
    assert_eq!(
        approver.asks.last(),
        Some(&("Run workflow: flow.yaml".to_string(), false))
    );

    // State transitions landed in the session log.
    let log = std::fs::read_to_string(session_log_path(temp.path())).expect("session log");
    assert!(log.contains("transition=streaming->finalized"));
    assert!(log.contains("transition=executing->succeeded"));
}

#[test]
fn rejection_leaves_no_trace_but_the_prompt() {
    let temp = tempdir().expect("tempdir");
    write_workflow(temp.path(), "flow.json", r#"{"nodes": {"llm": {"agent": "openAIAgent"}}}"#);
    let mut session = SessionContext::new(temp.path());
    let mut approver = ScriptedApprover::new(false);
    let mut sink = RecordingSink::default();
    let mut runner = PlaceholderRunner {
        result: Ok(json!({})),
        seen_injections: BTreeMap::new(),
    };

    let request = InvocationRequest::new(RUN_WORKFLOW_TOOL).with_param(PATH_PARAM, "flow.json");
    let outcome = run_workflow_tool(&mut session, &request, &mut approver, &mut sink, &mut runner)
        .expect("terminal outcome");

    assert_eq!(outcome, InvocationOutcome::Rejected);
    assert!(sink.responses.is_empty());
    assert!(session.tool_errors().is_empty());
    assert_eq!(session.consecutive_mistake_count(), 0);
}

#[test]
fn execution_timeout_is_classified_and_fully_reported() {
    let temp = tempdir().expect("tempdir");
    write_workflow(temp.path(), "flow.yaml", WORKFLOW_WITH_PLACEHOLDERS);
    let mut session = SessionContext::new(temp.path());
    let mut approver = ScriptedApprover::new(true);
    let mut sink = RecordingSink::default();
    let mut properties = BTreeMap::new();
    properties.insert("elapsed_ms".to_string(), json!(30000));
    let mut runner = PlaceholderRunner {
        result: Err(WorkflowRunError {
            message: "Execution timeout exceeded".to_string(),
            name: Some("TimeoutError".to_string()),
            stack: None,
            properties,
        }),
        seen_injections: BTreeMap::new(),
    };

    let request = InvocationRequest::new(RUN_WORKFLOW_TOOL).with_param(PATH_PARAM, "flow.yaml");
    let outcome = run_workflow_tool(&mut session, &request, &mut approver, &mut sink, &mut runner)
        .expect("terminal outcome");

    let InvocationOutcome::Failed { kind, message } = outcome else {
        panic!("expected failure");
    };
    assert_eq!(kind, ExecutionErrorKind::ExecutionTimeout);
    assert!(message.contains("Execution timeout exceeded"));
    assert!(message.contains("Error name: TimeoutError"));
    assert!(message.contains("elapsed_ms: 30000"));
    assert!(message.contains("Common workflow issues:"));
}

#[test]
fn tagged_chat_history_normalizes_through_the_lenient_path() {
    let temp = tempdir().expect("tempdir");
    write_workflow(temp.path(), "flow.yaml", WORKFLOW_WITH_PLACEHOLDERS);
    let mut session = SessionContext::new(temp.path());
    let mut approver = ScriptedApprover::new(true);
    let mut sink = RecordingSink::default();
    let mut runner = PlaceholderRunner {
        result: Ok(json!({})),
        seen_injections: BTreeMap::new(),
    };

    let request = InvocationRequest::new(RUN_WORKFLOW_TOOL)
        .with_param(PATH_PARAM, "flow.yaml")
        .with_param(CHAT_HISTORY_PARAM, r#"<message role="user">hi</message>"#);
    run_workflow_tool(&mut session, &request, &mut approver, &mut sink, &mut runner)
        .expect("terminal outcome");

    assert_eq!(
        runner.seen_injections.get("chatHistory"),
        Some(&json!([{"role": "user", "content": "hi"}]))
    );
}
