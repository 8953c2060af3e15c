use serde_json::{Map, Value};

/// Flatten a Jira description into plain text.
///
/// Cloud instances send Atlassian Document Format (ADF); older ones send a
/// plain string. Anything else is rendered as its JSON text.
pub fn description_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) if obj.is_empty() => String::new(),
        Some(Value::Object(obj)) => extract_text_from_adf(obj),
        Some(Value::Array(arr)) if arr.is_empty() => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Extract plain text from an ADF document.
///
/// Text runs are concatenated in document order and every paragraph ends
/// with a single newline. Empty paragraphs never produce blank lines.
pub fn extract_text_from_adf(doc: &Map<String, Value>) -> String {
    let mut out = String::new();
    walk(doc, &mut out);
    out.trim().to_string()
}

fn walk(node: &Map<String, Value>, out: &mut String) {
    let node_type = node.get("type").and_then(Value::as_str).unwrap_or("");

    if node_type == "text" {
        if let Some(text) = node.get("text").and_then(Value::as_str) {
            out.push_str(text);
        }
    }

    if let Some(Value::Array(children)) = node.get("content") {
        for child in children {
            if let Value::Object(child) = child {
                walk(child, out);
            }
        }
    }

    if node_type == "paragraph" && !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
