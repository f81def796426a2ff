//! Response normalization: any gateway response becomes a plain string.
//!
//! Providers disagree about response shape, so normalization inspects a
//! fixed priority list of known layouts and resolves the first match. The
//! contract is deliberately infallible: an unrecognized shape degrades to a
//! pretty-printed JSON dump rather than an error, so callers never see a
//! failed normalization step.
//!
//! Priority order:
//! 1. The value is already a string.
//! 2. A tool/function-call descriptor (several known key paths) — resolved
//!    through the local tool registry.
//! 3. One of the known text fields: `.text`, `.content`, `.completion`,
//!    `.message.content` (string or text-block array),
//!    `.choices[0].message.content`, or a bare array of strings/text blocks.
//! 4. Fallback: the whole value, stringified.

use serde_json::Value;

use crate::gateway::ToolDispatch;

/// Normalize an arbitrary gateway response value into display text.
/// Always returns a string; unrecognized shapes are dumped verbatim.
pub fn normalize(value: &Value, tools: &dyn ToolDispatch) -> String {
    if let Value::String(s) = value {
        return s.clone();
    }

    if let Some((name, arguments)) = find_tool_call(value)
        && let Some(result) = tools.dispatch(&name, &arguments)
    {
        return result;
    }

    if let Some(text) = find_text(value) {
        return text;
    }

    dump(value)
}

/// Look for an explicit refusal on the response.
/// Checked before normalization so refusals surface verbatim.
pub fn find_refusal(value: &Value) -> Option<String> {
    let refusal = value.get("refusal").or_else(|| {
        value.get("message").and_then(|m| m.get("refusal"))
    })?;

    match refusal {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        _ => Some("Request was refused by the AI model.".to_string()),
    }
}

/// Locate a tool/function-call descriptor under the known key paths.
/// Returns the tool name and its JSON-encoded arguments.
fn find_tool_call(value: &Value) -> Option<(String, String)> {
    let candidates = [
        value.get("function_call"),
        value.pointer("/tool_calls/0/function"),
        value.pointer("/message/tool_calls/0/function"),
        value.pointer("/choices/0/message/tool_calls/0/function"),
    ];

    for function in candidates.into_iter().flatten() {
        let Some(name) = function.get("name").and_then(Value::as_str) else {
            continue;
        };
        let arguments = match function.get("arguments") {
            // Cloud providers send arguments as a JSON-encoded string,
            // local ones as a bare object
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "{}".to_string(),
        };
        return Some((name.to_string(), arguments));
    }

    None
}

fn find_text(value: &Value) -> Option<String> {
    if let Some(text) = value.get("text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    if let Some(content) = value.get("content").and_then(Value::as_str) {
        return Some(content.to_string());
    }

    if let Some(completion) = value.get("completion").and_then(Value::as_str) {
        return Some(completion.to_string());
    }

    if let Some(content) = value.pointer("/message/content") {
        match content {
            Value::String(s) => return Some(s.clone()),
            Value::Array(items) => {
                if let Some(joined) = join_text_blocks(items) {
                    return Some(joined);
                }
            }
            _ => {}
        }
    }

    if let Some(content) = value.pointer("/choices/0/message/content").and_then(Value::as_str) {
        return Some(content.to_string());
    }

    if let Value::Array(items) = value {
        if !items.is_empty() && items.iter().all(|i| i.is_string()) {
            return Some(
                items.iter().filter_map(Value::as_str).collect::<Vec<_>>().concat(),
            );
        }
        if let Some(text) = items.first().and_then(|i| i.get("text")).and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }

    None
}

/// Join `{type:"text", text}` blocks with newlines, preserving array order
fn join_text_blocks(items: &[Value]) -> Option<String> {
    let texts: Vec<&str> = items
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|item| item.get("text").and_then(Value::as_str))
        .collect();

    if texts.is_empty() { None } else { Some(texts.join("\n")) }
}

fn dump(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
