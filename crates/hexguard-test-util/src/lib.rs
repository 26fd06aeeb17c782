//! Shared test utilities for the hexguard workspace.
//!
//! Reports carry wall-clock timestamps and the tool version; golden comparisons need both
//! replaced with fixed placeholders first.

use serde_json::Value;

pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
pub const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// `tool.version` is replaced only on a root report envelope (`schema`, `tool`, `verdict`
/// and `violations` all present). `started_at` and `finished_at` are replaced at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "verdict", "violations"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
            && tool.contains_key("version")
        {
            tool.insert(
                "version".to_string(),
                Value::String(VERSION_PLACEHOLDER.to_string()),
            );
        }
    }
    normalize_timestamps(&mut value);
    value
}

fn normalize_timestamps(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if let Some(v) = map.get_mut(key) {
                    *v = Value::String(TIMESTAMP_PLACEHOLDER.to_string());
                }
            }
            for v in map.values_mut() {
                normalize_timestamps(v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                normalize_timestamps(v);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_envelope_version_and_timestamps() {
        let input = json!({
            "schema": "hexguard.report.v1",
            "tool": {"name": "hexguard", "version": "0.1.0"},
            "started_at": "2026-01-01T00:00:00Z",
            "finished_at": "2026-01-01T00:00:01Z",
            "verdict": {"pass": true, "reasons": []},
            "violations": [],
            "data": {"nested": {"started_at": "x"}}
        });
        let out = normalize_nondeterministic(input);
        assert_eq!(out["tool"]["version"], VERSION_PLACEHOLDER);
        assert_eq!(out["started_at"], TIMESTAMP_PLACEHOLDER);
        assert_eq!(out["finished_at"], TIMESTAMP_PLACEHOLDER);
        assert_eq!(out["data"]["nested"]["started_at"], TIMESTAMP_PLACEHOLDER);
    }

    #[test]
    fn leaves_non_envelope_tool_alone() {
        let input = json!({"tool": {"name": "x", "version": "1"}});
        let out = normalize_nondeterministic(input.clone());
        assert_eq!(out, input);
    }
}
