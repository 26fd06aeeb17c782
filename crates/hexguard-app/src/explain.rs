//! The `explain` use case: look up rule documentation.

use hexguard_types::explain::{self, Explanation};

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; includes the available rule ids.
    NotFound {
        identifier: String,
        available_rule_ids: &'static [&'static str],
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rule_ids: explain::all_rule_ids(),
        },
    }
}

/// Terminal rendering: underlined title, description, remediation, then the
/// before/after sketches as fenced Java blocks.
pub fn format_explanation(exp: &Explanation) -> String {
    let underline = "=".repeat(exp.title.len());
    let sketch = |label: &str, code: &str| format!("{label}:\n```java\n{code}\n```\n");

    [
        format!("{}\n{underline}\n\n{}\n", exp.title, exp.description),
        format!("Remediation\n-----------\n{}\n", exp.remediation),
        "Examples\n--------\n".to_string(),
        sketch("Before (violation)", exp.examples.before),
        sketch("After (fixed)", exp.examples.after),
    ]
    .join("\n")
}

pub fn format_not_found(identifier: &str, rule_ids: &[&'static str]) -> String {
    let listed: String = rule_ids.iter().map(|id| format!("  - {id}\n")).collect();
    format!("Unknown rule id: {identifier}\n\nAvailable rule ids:\n{listed}")
}
