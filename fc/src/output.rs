//! Output coercion
//!
//! Classifies raw model responses as plain text or structured JSON so
//! downstream template resolution can pattern-match instead of sniffing
//! strings at every reference site.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The coerced result of one chain step
///
/// Untagged serde representation: a serialized history reads as natural
/// JSON (strings for text responses, raw JSON for structured ones).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputEntry {
    /// The raw string response, trimmed
    Text(String),
    /// A parsed JSON value, possibly unwrapped from a fenced code block
    Structured(Value),
}

impl OutputEntry {
    /// Canonical textual form: bare text, or compact (non-pretty) JSON
    pub fn render(&self) -> String {
        match self {
            OutputEntry::Text(s) => s.clone(),
            OutputEntry::Structured(v) => v.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OutputEntry::Text(s) => Some(s),
            OutputEntry::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            OutputEntry::Text(_) => None,
            OutputEntry::Structured(v) => Some(v),
        }
    }
}

impl From<&str> for OutputEntry {
    fn from(s: &str) -> Self {
        OutputEntry::Text(s.to_string())
    }
}

impl From<Value> for OutputEntry {
    fn from(v: Value) -> Self {
        OutputEntry::Structured(v)
    }
}

/// Coerce a raw model response into an [`OutputEntry`]
///
/// Best-effort and infallible: strip any markdown code fence, try to parse
/// the interior as JSON, and degrade silently to `Text` on failure.
pub fn coerce(raw: &str) -> OutputEntry {
    let candidate = strip_code_fence(raw);
    match serde_json::from_str::<Value>(&candidate) {
        Ok(value) => OutputEntry::Structured(value),
        Err(_) => OutputEntry::Text(raw.trim().to_string()),
    }
}

/// Strip markdown fence markers and an optional language tag
///
/// Takes the text after the first ``` fence, drops the rest of that line
/// (the language tag), cuts at the last ``` fence, and trims. Text without
/// fences is returned trimmed.
pub fn strip_code_fence(raw: &str) -> String {
    if !raw.contains("```") {
        return raw.trim().to_string();
    }
    let after = match raw.split_once("```") {
        Some((_, rest)) => rest,
        None => raw,
    };
    let body = match after.split_once('\n') {
        Some((_, rest)) => rest,
        None => after,
    };
    let body = match body.rsplit_once("```") {
        Some((inner, _)) => inner,
        None => body,
    };
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_plain_text() {
        let entry = coerce("Solo response: Single prompt: Test");
        assert_eq!(entry, OutputEntry::Text("Solo response: Single prompt: Test".to_string()));
    }

    #[test]
    fn test_coerce_json_object() {
        let entry = coerce(r#"{"key": "value"}"#);
        assert_eq!(entry, OutputEntry::Structured(json!({"key": "value"})));
    }

    #[test]
    fn test_coerce_fenced_json_with_tag() {
        let raw = r#"
        Here's a JSON response wrapped in markdown:
        ```json
        {
            "key": "value",
            "number": 42,
            "nested": {
                "inner": "content"
            }
        }
        ```
        "#;
        let entry = coerce(raw);
        assert_eq!(
            entry,
            OutputEntry::Structured(json!({"key": "value", "number": 42, "nested": {"inner": "content"}}))
        );
    }

    #[test]
    fn test_coerce_fenced_json_without_tag() {
        let raw = "```\n{\"ok\": true}\n```";
        assert_eq!(coerce(raw), OutputEntry::Structured(json!({"ok": true})));
    }

    #[test]
    fn test_fenced_and_unfenced_agree() {
        let fenced = coerce("```json\n{\"key\": \"value\"}\n```");
        let unfenced = coerce(r#"{"key": "value"}"#);
        assert_eq!(fenced, unfenced);
    }

    #[test]
    fn test_coerce_scalar_json() {
        assert_eq!(coerce("42"), OutputEntry::Structured(json!(42)));
        assert_eq!(coerce("true"), OutputEntry::Structured(json!(true)));
        assert_eq!(coerce("null"), OutputEntry::Structured(json!(null)));
    }

    #[test]
    fn test_coerce_invalid_json_degrades_to_trimmed_text() {
        let entry = coerce("  not json at all {  \n");
        assert_eq!(entry, OutputEntry::Text("not json at all {".to_string()));
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("  plain text  "), "plain text");
    }

    #[test]
    fn test_strip_code_fence_keeps_interior_only() {
        let raw = "prefix\n```mermaid\ngraph LR;\nA --> B\n```\nsuffix";
        assert_eq!(strip_code_fence(raw), "graph LR;\nA --> B");
    }

    #[test]
    fn test_render_compact_json() {
        let entry = OutputEntry::Structured(json!({"key": "value"}));
        assert_eq!(entry.render(), r#"{"key":"value"}"#);

        let entry = OutputEntry::Text("hello".to_string());
        assert_eq!(entry.render(), "hello");
    }

    #[test]
    fn test_serde_untagged_shape() {
        let entries = vec![
            OutputEntry::Text("plain".to_string()),
            OutputEntry::Structured(json!({"k": 1})),
        ];
        let serialized = serde_json::to_string(&entries).unwrap();
        assert_eq!(serialized, r#"["plain",{"k":1}]"#);

        let back: Vec<OutputEntry> = serde_json::from_str(&serialized).unwrap();
        assert_eq!(back, entries);
    }
}
