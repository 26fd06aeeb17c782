//! The whole pipeline: classify, build the graph, audit, evaluate.

use crate::audit::audit;
use crate::cancel::CancellationToken;
use crate::classify::{Classification, Classifier};
use crate::error::EngineError;
use crate::graph::{build_graph, DependencyGraph};
use crate::model::SymbolModel;
use crate::policy::PolicyConfig;
use crate::verdict::evaluate;
use hexguard_types::{AuditReport, Verdict};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Default)]
pub struct EngineOptions {
    /// Worker threads; `None` uses rayon's default.
    pub workers: Option<usize>,
}

/// Results of a run that classified every type.
#[derive(Debug)]
pub struct Analysis {
    pub classification: Classification,
    pub graph: DependencyGraph,
    pub audit: AuditReport,
    pub verdict: Verdict,
}

#[derive(Debug)]
pub enum RunOutcome {
    Complete(Analysis),
    /// Cancelled during classification. Later phases did not run.
    Cancelled(Classification),
}

pub struct Engine {
    pool: ThreadPool,
    classifier: Classifier,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        Self::with_classifier(options, Classifier::default())
    }

    pub fn with_classifier(options: EngineOptions, classifier: Classifier) -> Result<Self, EngineError> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("hexguard-{i}"));
        if let Some(n) = options.workers {
            builder = builder.num_threads(n);
        }
        Ok(Self {
            pool: builder.build()?,
            classifier,
        })
    }

    pub fn analyze(
        &self,
        model: &SymbolModel,
        config: &PolicyConfig,
        token: &CancellationToken,
    ) -> RunOutcome {
        self.pool.install(|| {
            info!(
                types = model.len(),
                workers = rayon::current_num_threads(),
                profile = %config.profile,
                "analysis started"
            );

            let classification = self.classifier.classify(model, config, token);
            if !classification.is_complete() {
                warn!(skipped = classification.skipped().len(), "analysis cancelled");
                return RunOutcome::Cancelled(classification);
            }

            let graph = build_graph(&classification, model);
            let audit = audit(&graph, &classification, model, config);
            let verdict = evaluate(&audit, &classification.summary(), config);
            info!(pass = verdict.pass, "analysis finished");

            RunOutcome::Complete(Analysis {
                classification,
                graph,
                audit,
                verdict,
            })
        })
    }
}

/// Run the pipeline on a default-sized pool.
pub fn analyze(
    model: &SymbolModel,
    config: &PolicyConfig,
    token: &CancellationToken,
) -> Result<RunOutcome, EngineError> {
    Ok(Engine::new(EngineOptions::default())?.analyze(model, config, token))
}
