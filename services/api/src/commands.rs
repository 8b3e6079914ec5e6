use crate::infra::RecordArgs;
use chrono::SecondsFormat;
use clap::Args;
use loan_guard::config::AppConfig;
use loan_guard::error::AppError;
use loan_guard::screening::{RiskExplainer, RiskExplanation, RiskThresholds, ScreeningReport};
use loan_guard::telemetry;
use loan_guard::{
    ArtifactPaths, ScreeningService, TrainedArtifacts, TrainingPipeline, TrainingSummary,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct TrainArgs {
    /// Loan CSV to fit on (defaults to LOAN_DATASET_PATH)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Directory receiving model.json, scaler.json, and encoders.json
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
    /// Number of trees in the forest
    #[arg(long)]
    pub(crate) trees: Option<usize>,
    /// Seed for bootstrap sampling and feature selection
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Maximum tree depth (unbounded when omitted)
    #[arg(long)]
    pub(crate) max_depth: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    #[command(flatten)]
    pub(crate) record: RecordArgs,
    /// Directory holding the trained artifacts (defaults to LOAN_ARTIFACT_DIR)
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExplainArgs {
    #[command(flatten)]
    pub(crate) record: RecordArgs,
}

pub(crate) fn run_train(args: TrainArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let TrainArgs {
        dataset,
        artifact_dir,
        trees,
        seed,
        max_depth,
    } = args;

    let mut options = config.training.options;
    if let Some(trees) = trees {
        options.n_trees = trees;
    }
    if let Some(seed) = seed {
        options.seed = seed;
    }
    if max_depth.is_some() {
        options.max_depth = max_depth;
    }

    let dataset = dataset.unwrap_or(config.training.dataset_path);
    let paths = artifact_dir
        .map(ArtifactPaths::in_dir)
        .unwrap_or_else(|| config.artifacts.paths());

    let outcome = TrainingPipeline::new(options).run_path(&dataset)?;
    outcome.artifacts.save(&paths)?;

    render_training_summary(&outcome.summary, &paths);
    Ok(())
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        record,
        artifact_dir,
        json,
    } = args;

    let paths = match artifact_dir {
        Some(dir) => ArtifactPaths::in_dir(dir),
        None => AppConfig::load()?.artifacts.paths(),
    };
    let artifacts = TrainedArtifacts::load(&paths)?;
    let service = ScreeningService::from_artifacts(&artifacts, RiskThresholds::default())?;
    let report = service.screen(&record.into_record())?;

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
        println!("{rendered}");
    } else {
        render_screening_report(&report);
    }
    Ok(())
}

pub(crate) fn run_explain(args: ExplainArgs) -> Result<(), AppError> {
    let record = args.record.into_record();
    record
        .validate()
        .map_err(loan_guard::screening::ScreeningError::from)?;

    let explanation = RiskExplainer::new(RiskThresholds::default()).explain(&record);
    println!("Risk advisories");
    render_explanation(&explanation);
    Ok(())
}

fn render_training_summary(summary: &TrainingSummary, paths: &ArtifactPaths) {
    println!("Loan classifier trained");
    println!(
        "  Rows: {} read, {} dropped for missing values, {} used",
        summary.rows_read, summary.rows_dropped, summary.rows_used
    );
    for (class, count) in &summary.class_counts {
        println!("  Loan_Status {class}: {count}");
    }
    println!(
        "  Forest: {} trees, seed {}",
        summary.n_trees, summary.seed
    );
    println!(
        "  Training accuracy: {:.2}%",
        summary.training_accuracy * 100.0
    );
    println!(
        "  Trained at: {}",
        summary
            .trained_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    println!("\nArtifacts written");
    println!("  Model: {}", paths.model.display());
    println!("  Scaler: {}", paths.scaler.display());
    println!("  Encoders: {}", paths.encoders.display());
}

fn render_screening_report(report: &ScreeningReport) {
    println!("Applicant summary");
    for (label, value) in report.inputs.lines() {
        println!("  {label}: {value}");
    }

    println!("\n{}", report.verdict);
    println!(
        "  Approval probability: {:.2}% ({:+.2} vs {:.0}% reference, {:?})",
        report.probability_percent,
        report.delta_from_reference,
        loan_guard::screening::report::REFERENCE_PERCENT,
        report.band
    );

    println!("\nRisk advisories");
    render_explanation(&report.explanation);

    if !report.suggestions.is_empty() {
        println!("\nSuggested improvements");
        for suggestion in &report.suggestions {
            println!("  - {suggestion}");
        }
    }
}

fn render_explanation(explanation: &RiskExplanation) {
    for message in &explanation.messages {
        println!("  - {message}");
    }
}
