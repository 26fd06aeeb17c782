use crate::{RenderableReport, RenderableSeverity};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();
    let d = &report.data;

    out.push_str("# Hexguard report\n\n");
    out.push_str(&format!(
        "- Verdict: **{}**\n- Profile: `{}`\n- Types: {} ({} unclassified, ratio {})\n- Edges: {}\n- Violations: {}\n\n",
        if report.pass { "PASS" } else { "FAIL" },
        d.profile,
        d.types_scanned,
        d.unclassified,
        d.unclassified_ratio,
        d.edges_total,
        report.violations.len()
    ));

    for reason in &report.reasons {
        out.push_str(&format!("> Failed: {}\n", reason));
    }
    if !report.reasons.is_empty() {
        out.push('\n');
    }

    if !d.roles.is_empty() {
        out.push_str("## Roles\n\n| Role | Types |\n|---|---|\n");
        for r in &d.roles {
            out.push_str(&format!("| {} | {} |\n", r.role, r.count));
        }
        out.push('\n');
    }

    if report.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");

    for v in &report.violations {
        let sev = match v.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Critical => "CRITICAL",
            RenderableSeverity::Blocker => "BLOCKER",
        };
        out.push_str(&format!("- [{}] `{}`: {}\n", sev, v.rule_id, v.message));

        if let Some(cycle) = &v.cycle {
            out.push_str(&format!("  - cycle: {}\n", cycle.join(" → ")));
        } else if v.involved.len() > 1 {
            let names: Vec<String> = v.involved.iter().map(|n| format!("`{n}`")).collect();
            out.push_str(&format!("  - involved: {}\n", names.join(", ")));
        }
        if let Some(help) = &v.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
    }

    out
}
