//! CLI entry point for hexguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `hexguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use hexguard_app::{
    format_explanation, format_not_found, parse_report_json, render_annotations, render_markdown,
    run_check, run_explain, runtime_error_report, serialize_report, to_renderable,
    verdict_exit_code, CheckInput, CheckOutcome, ExplainOutput, RenderableReport,
};
use hexguard_domain::CancellationToken;
use hexguard_settings::Overrides;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hexguard",
    version,
    about = "Hexagonal/DDD architecture classifier and auditor"
)]
struct Cli {
    /// Path to hexguard config TOML. A missing file means defaults.
    #[arg(long, default_value = "hexguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|standard|lenient).
    #[arg(long)]
    profile: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify, audit, evaluate policy and write artifacts.
    Check {
        /// Symbol model JSON produced by an extraction front-end.
        #[arg(long)]
        model: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/hexguard/report.json")]
        report_out: Utf8PathBuf,

        /// Override the classification threshold (0..=1).
        #[arg(long)]
        threshold: Option<f64>,

        /// Fail when any type stays unclassified.
        #[arg(long)]
        fail_on_unclassified: bool,

        /// Override the maximum unclassified ratio (0..=1).
        #[arg(long)]
        unclassified_ratio_limit: Option<f64>,

        /// Fail on any violation.
        #[arg(long)]
        fail_on_error: bool,

        /// Fail on CRITICAL violations.
        #[arg(long)]
        error_on_critical: bool,

        /// Extra exclude glob over qualified names (repeatable).
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Analysis worker threads (default: one per core).
        #[arg(long)]
        workers: Option<usize>,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/hexguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/hexguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/hexguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule id with remediation guidance.
    Explain {
        /// The rule id (e.g., "aggregate-cycle").
        identifier: String,
    },
}

struct CheckArgs {
    model: Utf8PathBuf,
    report_out: Utf8PathBuf,
    overrides: Overrides,
    workers: Option<usize>,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            model,
            report_out,
            threshold,
            fail_on_unclassified,
            unclassified_ratio_limit,
            fail_on_error,
            error_on_critical,
            exclude,
            workers,
            write_markdown,
            markdown_out,
        } => {
            // Flags only ever switch a policy on; leaving them off defers to the config file.
            let overrides = Overrides {
                profile: cli.profile,
                classification_threshold: threshold,
                fail_on_unclassified: fail_on_unclassified.then_some(true),
                unclassified_ratio_limit,
                fail_on_error: fail_on_error.then_some(true),
                error_on_critical: error_on_critical.then_some(true),
                exclude,
            };
            cmd_check(
                &cli.config,
                CheckArgs {
                    model,
                    report_out,
                    overrides,
                    workers,
                    write_markdown,
                    markdown_out,
                },
            )
        }
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

/// Logs go to stderr, filtered by `HEXGUARD_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("HEXGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn cmd_check(config: &Utf8Path, args: CheckArgs) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        // Missing config file is allowed (defaults apply).
        let cfg_text = match std::fs::read_to_string(config) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %config, "no config file; using defaults");
                String::new()
            }
            Err(err) => return Err(err).with_context(|| format!("read config: {config}")),
        };
        let model_json = std::fs::read_to_string(&args.model)
            .with_context(|| format!("read model: {}", args.model))?;

        let token = CancellationToken::new();
        let handler_token = token.clone();
        if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
            warn!(error = %err, "Ctrl-C handler not installed");
        }

        let input = CheckInput {
            model_json: &model_json,
            config_text: &cfg_text,
            overrides: args.overrides,
            workers: args.workers,
            token,
        };

        let output = run_check(input)?;
        let report = match output.outcome {
            CheckOutcome::Report(report) => report,
            CheckOutcome::Cancelled { classified, skipped } => anyhow::bail!(
                "analysis cancelled after classifying {classified} types; {} not classified",
                skipped.len()
            ),
        };

        write_artifact(&args.report_out, serialize_report(&report)?)
            .context("write report json")?;

        if args.write_markdown {
            let md = render_markdown(&to_renderable(&report));
            write_artifact(&args.markdown_out, md).context("write markdown")?;
        }

        Ok(verdict_exit_code(&report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            if let Ok(bytes) = serialize_report(&report) {
                let _ = write_artifact(&args.report_out, bytes);
            }
            eprintln!("hexguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Write `data` to `path`, creating parent directories first.
fn write_artifact(path: &Utf8Path, data: impl AsRef<[u8]>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write {path}"))
}

fn load_renderable(path: &Utf8Path) -> anyhow::Result<RenderableReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    Ok(to_renderable(&parse_report_json(&text)?))
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let md = render_markdown(&load_renderable(&report_path)?);
    match output {
        Some(out_path) => write_artifact(&out_path, md).context("write markdown output"),
        None => {
            print!("{md}");
            Ok(())
        }
    }
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report = load_renderable(&report_path)?;
    for annotation in render_annotations(&report, max) {
        println!("{annotation}");
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
        } => {
            eprint!("{}", format_not_found(&identifier, available_rule_ids));
            std::process::exit(1);
        }
    }
}
