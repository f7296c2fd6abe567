//! Command-line parsing for the panel scoring tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! scoring code. Flags left unset fall back to the environment configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "panel", version, about = "Synthetic panel scoring and news resonance")]
pub struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a panel of respondent log-probability readings (distribution, sample, NPS).
    Nps(NpsArgs),
    /// Rank related news articles and optionally score target audiences against them.
    Rank(RankArgs),
    /// Score target audiences against a media snapshot.
    Resonance(ResonanceArgs),
    /// Normalize a raw scoring response from an external reviewer.
    Verdict(VerdictArgs),
    /// Extract and average the scores in reviewer comments.
    Reviews(ReviewsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct NpsArgs {
    /// JSON array of respondent readings (token maps or completion payloads).
    #[arg(long, value_name = "JSON")]
    pub readings: PathBuf,

    /// Log-probability temperature.
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Number of simulated survey responses.
    #[arg(short = 'n', long)]
    pub sample_size: Option<u64>,

    /// Draw responses at random with this seed instead of apportioning them.
    #[arg(long)]
    pub draw_seed: Option<u64>,

    /// Write the full report as JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    /// JSON array of articles `{title, publisher, published, url}`.
    #[arg(long, value_name = "JSON")]
    pub articles: PathBuf,

    /// Topic keyword, most important first (repeatable). Derived from --text when omitted.
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// The message being compared against the news.
    #[arg(long, default_value = "")]
    pub text: String,

    /// Target audience to score (repeatable).
    #[arg(long = "audience")]
    pub audiences: Vec<String>,

    /// Media sentiment for audience scoring, in [-0.2, 0.2].
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub sentiment: f64,

    /// Media tone label.
    #[arg(long, default_value = "neutral")]
    pub tone: String,

    /// Reference time (RFC 3339); defaults to the current time.
    #[arg(long)]
    pub now: Option<String>,

    /// Look-back window in days.
    #[arg(long)]
    pub horizon_days: Option<i64>,

    /// JSON audience bias table.
    #[arg(long)]
    pub bias_file: Option<PathBuf>,

    /// Show only the top-N articles.
    #[arg(long, default_value_t = 3)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ResonanceArgs {
    /// JSON media snapshot `{topics, sentiment, volume, tone}`.
    #[arg(long, value_name = "JSON")]
    pub snapshot: PathBuf,

    /// Target audience to score (repeatable).
    #[arg(long = "audience", required = true)]
    pub audiences: Vec<String>,

    /// JSON audience bias table.
    #[arg(long)]
    pub bias_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct VerdictArgs {
    /// Raw reviewer response (JSON, possibly fenced or wrapped in prose).
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ReviewsArgs {
    /// JSON array of `{name, text}` reviewer comments.
    #[arg(long, value_name = "JSON")]
    pub input: PathBuf,
}
