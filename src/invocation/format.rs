use serde_json::Value;
use std::path::Path;

fn basename(file_path: &str) -> &str {
    Path::new(file_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_path)
}

fn render_value(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Renders a workflow result for display: keyed mappings list each result
/// node, an empty mapping or scalar renders the whole value.
pub fn format_workflow_result(result: &Value, display_name: &str, file_path: &str) -> String {
    let mut output = format!(
        "{display_name} execution completed for: {}\n\n",
        basename(file_path)
    );

    match result {
        Value::Object(map) if !map.is_empty() => {
            output.push_str("Results:\n");
            for (key, value) in map {
                output.push_str(&format!("  {key}: {}\n", render_value(value)));
            }
        }
        Value::Object(_) => {
            output.push_str(&format!("Result: {}", render_value(result)));
        }
        Value::String(text) => {
            output.push_str(&format!("Result: {text}"));
        }
        other => {
            output.push_str(&format!("Result: {other}"));
        }
    }

    output
}
