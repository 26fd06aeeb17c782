use anyhow::Context;
use hexguard_render::{
    RenderableData, RenderableReport, RenderableRoleCount, RenderableSeverity,
    RenderableViolation,
};
use hexguard_types::{
    ids, HexguardData, HexguardReport, ReportEnvelope, Severity, ToolMeta, TypeName, Verdict,
    ViolationRecord, SCHEMA_REPORT_V1,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<HexguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    let report: HexguardReport =
        serde_json::from_value(value).context("parse hexguard v1 report")?;
    Ok(report)
}

pub fn serialize_report(report: &HexguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &HexguardReport) -> RenderableReport {
    let d = &report.data;
    RenderableReport {
        pass: report.verdict.pass,
        reasons: report.verdict.reasons.clone(),
        violations: report.violations.iter().map(renderable_violation).collect(),
        data: RenderableData {
            profile: d.profile.clone(),
            types_scanned: d.types_scanned,
            edges_total: d.edges_total,
            unclassified: d.summary.unclassified,
            unclassified_ratio: d.summary.unclassified_ratio,
            roles: d
                .summary
                .by_role
                .iter()
                .map(|(role, count)| RenderableRoleCount {
                    role: role.as_str().to_string(),
                    count: *count,
                })
                .collect(),
        },
    }
}

fn renderable_violation(v: &ViolationRecord) -> RenderableViolation {
    RenderableViolation {
        severity: match v.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Critical => RenderableSeverity::Critical,
            Severity::Blocker => RenderableSeverity::Blocker,
        },
        rule_id: v.rule_id.clone(),
        message: v.message.clone(),
        involved: v.involved.iter().map(|n| n.as_str().to_string()).collect(),
        cycle: v
            .cycle
            .as_ref()
            .map(|c| c.iter().map(|n| n.as_str().to_string()).collect()),
        help: v.help.clone(),
    }
}

/// A failing report describing a tool error, written in place of an analysis result.
pub fn runtime_error_report(message: &str) -> HexguardReport {
    let now = OffsetDateTime::now_utc();
    let violation = ViolationRecord {
        rule_id: ids::RULE_TOOL_RUNTIME.to_string(),
        severity: Severity::Blocker,
        involved: vec![TypeName::new("hexguard")],
        message: message.to_string(),
        cycle: None,
        help: Some("Fix the tool error and re-run hexguard.".to_string()),
        fingerprint: None,
    };

    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "hexguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict {
            pass: false,
            reasons: vec!["runtime error".to_string()],
        },
        violations: vec![violation],
        data: HexguardData {
            profile: "unknown".to_string(),
            ..HexguardData::default()
        },
    }
}
