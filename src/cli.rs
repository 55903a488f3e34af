use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "eda_simple",
    version,
    about = "Fetch, profile and clean short-term rental listings"
)]
pub struct Cli {
    /// Tracking database path.
    #[arg(long, global = true, default_value = "eda.sqlite3")]
    pub db: PathBuf,

    /// Artifact store root directory.
    #[arg(long = "store-root", global = true, default_value = "artifact_store")]
    pub store_root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download a remote CSV into the artifact store.
    Fetch(FetchArgs),
    /// Generate the descriptive-statistics report for a stored dataset.
    Profile(ProfileArgs),
    /// Drop price outliers and coerce review dates; log the result as a new artifact.
    Clean(CleanArgs),
    /// List recent tracked runs.
    Runs(RunsArgs),
    /// List the artifact registry.
    Artifacts,
}

#[derive(Debug, Args, Serialize)]
pub struct FetchArgs {
    /// Source URL of the raw CSV.
    #[arg(long)]
    pub url: String,

    /// Name the artifact is stored under.
    #[arg(long)]
    pub output_artifact: String,

    #[arg(long, default_value = "raw_data")]
    pub output_type: String,

    #[arg(long, default_value = "Raw dataset, as fetched")]
    pub output_description: String,
}

#[derive(Debug, Args, Serialize)]
pub struct ProfileArgs {
    /// Input artifact reference, e.g. "sample.csv:latest" or "sample.csv:v2".
    #[arg(long)]
    pub input_artifact: String,

    /// Directory the HTML and XLSX reports are written to.
    #[arg(long, default_value = "reports")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args, Serialize)]
pub struct CleanArgs {
    /// Fully-qualified name for the input artifact.
    #[arg(long)]
    pub input_artifact: String,

    /// Name of the output artifact.
    #[arg(long)]
    pub output_artifact: String,

    /// Type of the output artifact.
    #[arg(long)]
    pub output_type: String,

    /// Description for the output artifact.
    #[arg(long)]
    pub output_description: String,

    /// Minimum price for cleaning outliers.
    #[arg(long)]
    pub min_price: f64,

    /// Maximum price for cleaning outliers.
    #[arg(long)]
    pub max_price: f64,
}

#[derive(Debug, Args, Serialize)]
pub struct RunsArgs {
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}
