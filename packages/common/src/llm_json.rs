//! Recovering JSON from chat replies.
//!
//! Models wrap JSON in markdown fences or surround it with prose. These helpers
//! strip the fences and fall back to the outermost brace (or bracket) slice.

use serde_json::Value;

/// Return the body of the first fenced block, or the trimmed text when there is none.
pub fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let after_fence = &trimmed[start + 3..];
    let body = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => after_fence,
    };
    let end = body.find("```").unwrap_or(body.len());
    body[..end].trim()
}

/// Extract a JSON object from a chat reply.
pub fn extract_json_object(text: &str) -> Option<Value> {
    extract_delimited(text, '{', '}').filter(Value::is_object)
}

/// Extract a JSON array from a chat reply.
pub fn extract_json_array(text: &str) -> Option<Value> {
    extract_delimited(text, '[', ']').filter(Value::is_array)
}

fn extract_delimited(text: &str, open: char, close: char) -> Option<Value> {
    let body = strip_markdown_fences(text);
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Some(value);
    }

    // Fence stripping can cut a reply that merely mentions ``` in prose.
    [body, text.trim()]
        .into_iter()
        .find_map(|candidate| slice_between(candidate, open, close))
}

fn slice_between(text: &str, open: char, close: char) -> Option<Value> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Read a JSON value as `f64`, accepting numeric strings such as `"7.5"`.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}

/// Collect the string elements of a JSON array, trimming and dropping empties.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
