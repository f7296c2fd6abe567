//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the run configuration (environment, then flag overrides)
//! - reads operator input files
//! - runs the panel / media pipelines
//! - prints tables or JSON and writes optional exports

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;

use crate::cli::{Cli, Command, NpsArgs, RankArgs, ResonanceArgs, ReviewsArgs, VerdictArgs};
use crate::domain::PanelConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `panel` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    let config = PanelConfig::from_env()?;
    let output = if cli.json { OutputMode::Json } else { OutputMode::Table };

    match cli.command {
        Command::Nps(args) => handle_nps(args, config, output),
        Command::Rank(args) => handle_rank(args, config, output),
        Command::Resonance(args) => handle_resonance(args, config, output),
        Command::Verdict(args) => handle_verdict(args, output),
        Command::Reviews(args) => handle_reviews(args, output),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Table,
    Json,
}

fn emit<T: Serialize>(output: OutputMode, value: &T, table: impl FnOnce() -> String) -> Result<(), AppError> {
    match output {
        OutputMode::Json => println!("{}", crate::io::to_json(value)?),
        OutputMode::Table => print!("{}", table()),
    }
    Ok(())
}

fn handle_nps(args: NpsArgs, config: PanelConfig, output: OutputMode) -> Result<(), AppError> {
    let config = nps_config_from_args(&args, config)?;
    let readings = crate::io::load_readings(&args.readings)?;
    let report = pipeline::run_panel(&readings, &config);

    emit(output, &report, || crate::report::format_panel_report(&report))?;

    if let Some(path) = &args.export {
        crate::io::write_json(path, &report)?;
    }
    Ok(())
}

fn handle_rank(args: RankArgs, config: PanelConfig, output: OutputMode) -> Result<(), AppError> {
    let mut config = config;
    if let Some(days) = args.horizon_days {
        config.horizon_days = days;
    }
    if let Some(path) = &args.bias_file {
        config.audience_bias = crate::io::load_bias_table(path)?;
    }
    config.validate()?;

    let now = parse_now(args.now.as_deref())?;
    let articles = crate::io::load_articles(&args.articles)?;

    let request = pipeline::MediaRequest {
        text: &args.text,
        articles: &articles,
        topics: &args.topics,
        audiences: &args.audiences,
        sentiment: args.sentiment,
        tone: &args.tone,
        now,
    };
    let report = pipeline::run_media(&request, &config);

    emit(output, &report, || crate::report::format_media_report(&report, args.top))
}

fn handle_resonance(args: ResonanceArgs, config: PanelConfig, output: OutputMode) -> Result<(), AppError> {
    let mut config = config;
    if let Some(path) = &args.bias_file {
        config.audience_bias = crate::io::load_bias_table(path)?;
    }

    let snapshot = crate::io::load_snapshot(&args.snapshot)?;
    let assessments = pipeline::run_resonance(&args.audiences, &snapshot, &config);

    emit(output, &assessments, || crate::report::format_assessments(&assessments))
}

fn handle_verdict(args: VerdictArgs, output: OutputMode) -> Result<(), AppError> {
    let raw = crate::io::read_text(&args.input)?;
    let verdict = crate::verdict::parse_verdict(&raw);

    emit(output, &verdict, || crate::report::format_verdict(&verdict))
}

fn handle_reviews(args: ReviewsArgs, output: OutputMode) -> Result<(), AppError> {
    let comments = crate::io::load_reviews(&args.input)?;
    if comments.is_empty() {
        return Err(AppError::no_data("No reviewer comments in input."));
    }
    let summary = crate::verdict::summarize_reviews(&comments);

    emit(output, &summary, || crate::report::format_reviews(&summary))
}

/// Apply `nps` flag overrides on top of the environment configuration.
pub fn nps_config_from_args(args: &NpsArgs, mut config: PanelConfig) -> Result<PanelConfig, AppError> {
    if let Some(t) = args.temperature {
        config.temperature = t;
    }
    if let Some(n) = args.sample_size {
        config.sample_size = n;
    }
    if args.draw_seed.is_some() {
        config.draw_seed = args.draw_seed;
    }
    config.validate()?;
    Ok(config)
}

/// Reference time for ranking: explicit RFC 3339, else the current time.
fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match raw {
        None => Ok(Utc::now()),
        Some(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| AppError::input(format!("Invalid --now '{s}' (expected RFC 3339): {e}"))),
    }
}
