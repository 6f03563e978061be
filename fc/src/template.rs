//! Template resolution
//!
//! Renders one prompt template against a context mapping and the output
//! history accumulated so far within a chain run.
//!
//! Placeholder grammar:
//! - `{{name}}` / `{{name.path}}` - context references, dotted for nested values
//! - `{{output[-k]}}` / `{{output[-k].path}}` - k-th most recent output (1-indexed)
//! - `{{#if name}} ... {{/if}}` - fragment included only when `name` is truthy
//!
//! The conditional form is deliberately narrow: guard-variable truthiness
//! only, no expressions, no nesting, no else-branch. Prompt text is not a
//! place to host a scripting engine.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::context::{ChainContext, is_truthy};
use crate::error::ChainError;
use crate::output::OutputEntry;

static CONDITIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#if\s+([A-Za-z_]\w*)\s*\}\}(.*?)\{\{/if\}\}").expect("conditional regex")
});

static OUTPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*output\[-(\d+)\]((?:\.\w+)*)\s*\}\}").expect("output regex"));

static CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_]\w*(?:\.\w+)*)\s*\}\}").expect("context regex"));

/// Resolve a prompt template against `context` and the outputs so far
///
/// Substitution runs in three passes: conditional fragments, then context
/// references, then output references. Plain text outside placeholders
/// passes through unchanged.
pub fn resolve(template: &str, context: &ChainContext, outputs: &[OutputEntry]) -> Result<String, ChainError> {
    let step1 = substitute(&CONDITIONAL_RE, template, |caps| {
        let guard = &caps[1];
        let truthy = context.get(guard).map(is_truthy).unwrap_or(false);
        Ok(if truthy { caps[2].to_string() } else { String::new() })
    })?;

    let step2 = substitute(&CONTEXT_RE, &step1, |caps| {
        let reference = &caps[1];
        let value = context.lookup_path(reference).ok_or_else(|| ChainError::TemplateReference {
            reference: reference.to_string(),
        })?;
        Ok(stringify(value))
    })?;

    substitute(&OUTPUT_RE, &step2, |caps| {
        let k: usize = caps[1].parse().unwrap_or(usize::MAX);
        if k == 0 || k > outputs.len() {
            return Err(ChainError::OutOfRangeReference {
                index: k,
                len: outputs.len(),
            });
        }
        let entry = &outputs[outputs.len() - k];
        let path = caps[2].trim_start_matches('.');
        if path.is_empty() {
            return Ok(entry.render());
        }
        resolve_output_path(entry, k, path)
    })
}

/// Descend a dotted path into a structured output entry
fn resolve_output_path(entry: &OutputEntry, k: usize, path: &str) -> Result<String, ChainError> {
    let missing = || ChainError::TemplateReference {
        reference: format!("output[-{}].{}", k, path),
    };

    let mut current = entry.as_structured().ok_or_else(missing)?;
    for segment in path.split('.') {
        current = current.as_object().and_then(|o| o.get(segment)).ok_or_else(missing)?;
    }
    Ok(stringify(current))
}

/// Stringify a JSON value for substitution: bare contents for strings
/// (no surrounding quotes), compact JSON for everything else.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Regex replacement with a fallible substitution closure
fn substitute<F>(re: &Regex, input: &str, mut replacement: F) -> Result<String, ChainError>
where
    F: FnMut(&Captures) -> Result<String, ChainError>,
{
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in re.captures_iter(input) {
        let m = caps.get(0).expect("group 0 always present");
        out.push_str(&input[last..m.start()]);
        out.push_str(&replacement(&caps)?);
        last = m.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}
