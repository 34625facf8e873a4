use crate::invocation::error::BlockReason;
use regex::Regex;
use serde_json::{json, Value};

/// Normalizes a flexible-format message payload: a strict JSON parse first,
/// then a lenient role-tagged extraction. Either way the declared shape is a
/// list of `{role, content}` records.
pub fn parse_flexible_messages(input: &str, param: &str) -> Result<Vec<Value>, BlockReason> {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Array(messages)) => Ok(messages),
        Ok(_) => Err(BlockReason::InvalidParam {
            param: param.to_string(),
            reason: format!("`{param}` must be an array of message objects"),
        }),
        Err(json_err) => match parse_tagged_messages(input) {
            Some(messages) => Ok(messages),
            None => Err(BlockReason::InvalidParam {
                param: param.to_string(),
                reason: format!(
                    "expected a JSON array or role-tagged message blocks; JSON error: {json_err}"
                ),
            }),
        },
    }
}

/// Extracts `<message role="...">...</message>` blocks into message records.
/// Returns None when no block is present, which counts as a lenient-path
/// failure.
fn parse_tagged_messages(input: &str) -> Option<Vec<Value>> {
    // Block bodies may span lines; the match stays lazy so adjacent blocks
    // do not merge.
    let pattern = Regex::new(r#"(?s)<message[^>]*role=["']([^"']+)["'][^>]*>(.*?)</message>"#)
        .ok()?;

    let messages: Vec<Value> = pattern
        .captures_iter(input)
        .map(|capture| {
            json!({
                "role": capture[1].to_string(),
                "content": capture[2].trim().to_string(),
            })
        })
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages)
    }
}
