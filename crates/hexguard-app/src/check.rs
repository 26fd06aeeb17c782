//! The `check` use case: classify, audit, evaluate policy and produce a report.

use anyhow::Context;
use hexguard_domain::{CancellationToken, Engine, EngineOptions, RunOutcome};
use hexguard_settings::{HexguardConfigV1, Overrides, ResolvedConfig};
use hexguard_types::{
    HexguardData, HexguardReport, ReportEnvelope, ToolMeta, TypeName, Verdict, SCHEMA_REPORT_V1,
};
use time::OffsetDateTime;
use tracing::info;

use crate::input::parse_model_json;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Symbol model JSON.
    pub model_json: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Worker threads for the analysis pool; `None` uses the default.
    pub workers: Option<usize>,
    pub token: CancellationToken,
}

#[derive(Clone, Debug)]
pub enum CheckOutcome {
    Report(HexguardReport),
    /// Cancelled before classification finished; no report is produced.
    Cancelled {
        classified: usize,
        skipped: Vec<TypeName>,
    },
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub outcome: CheckOutcome,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config and model, analyze, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        HexguardConfigV1::default()
    } else {
        hexguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved =
        hexguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;
    let policy = &resolved.policy;

    let model = parse_model_json(input.model_json).context("load symbol model")?;
    info!(types = model.len(), profile = %policy.profile, "check started");

    let engine = Engine::new(EngineOptions {
        workers: input.workers,
    })
    .context("start analysis engine")?;

    let analysis = match engine.analyze(&model, policy, &input.token) {
        RunOutcome::Complete(a) => a,
        RunOutcome::Cancelled(c) => {
            return Ok(CheckOutput {
                outcome: CheckOutcome::Cancelled {
                    classified: c.len(),
                    skipped: c.skipped().to_vec(),
                },
                resolved_config: resolved,
            });
        }
    };

    let summary = analysis.classification.summary();
    let data = HexguardData {
        profile: policy.profile.clone(),
        classification_threshold: policy.classification_threshold,
        types_scanned: summary.total,
        edges_total: analysis.graph.edge_count() as u32,
        counts: analysis.audit.counts.clone(),
        summary,
        classifications: analysis.classification.into_results(),
    };

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "hexguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: analysis.verdict,
        violations: analysis.audit.violations,
        data,
    };

    Ok(CheckOutput {
        outcome: CheckOutcome::Report(report),
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass, 2 = fail.
pub fn verdict_exit_code(verdict: &Verdict) -> i32 {
    if verdict.pass { 0 } else { 2 }
}
