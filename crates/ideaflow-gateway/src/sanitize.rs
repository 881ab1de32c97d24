//! Markup stripping for generated output
//!
//! Generated drafts end up in form fields and other plain-text display
//! contexts where literal Markdown emphasis looks broken. Every string in
//! the structured result is normalized: bold/italic markers are removed and
//! horizontal-rule lines are dropped, recursively through nested objects
//! and arrays. This normalization is part of the gateway contract.

use serde_json::Value;

/// Strip emphasis markup from every string in `value`, recursively
#[must_use]
pub fn strip_markup(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(strip_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_markup).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, strip_markup(v)))
                .collect(),
        ),
        other => other,
    }
}

/// A line consisting only of rule characters (`---`, `***`, `___`)
fn is_horizontal_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3
        && (trimmed.bytes().all(|b| b == b'-')
            || trimmed.bytes().all(|b| b == b'*')
            || trimmed.bytes().all(|b| b == b'_'))
}

fn strip_string(s: &str) -> String {
    let kept: Vec<&str> = s.lines().filter(|l| !is_horizontal_rule(l)).collect();
    let joined = if kept.len() == 1 {
        kept[0].to_string()
    } else {
        kept.join("\n")
    };
    // `***`/`**`/`*` and `__` collapse to nothing; single underscores stay
    // because identifiers contain them.
    joined.replace("**", "").replace("__", "").replace('*', "")
}
