use crate::export::{UnmeasuredPolicy, DEFAULT_OUTPUT};
use crate::model::Granularity;
use anyhow::Result;
use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loc-trend")]
#[command(about = "Track lines of code over time by language with granularity, top-N, and repo path")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(flatten)]
    pub sampling: SamplingArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v info, -vv debug)")]
    pub verbose: u8,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(short, long, default_value = ".", help = "Path to the git repository")]
    pub path: PathBuf,

    #[arg(long, help = "Start from this commit or date (RFC3339, YYYY-MM-DD, or 'N days ago')")]
    pub since: Option<String>,

    #[arg(long, help = "End at this commit or date (RFC3339, YYYY-MM-DD, or 'N days ago')")]
    pub until: Option<String>,

    #[arg(long, env = "LOC_TREND_CLOC", default_value = "cloc", help = "Line counting program to run at each revision")]
    pub cloc: PathBuf,
}

#[derive(Args, Clone)]
pub struct SamplingArgs {
    #[arg(short, long, default_value_t = 1, help = "Sample every Nth commit (commits granularity only)")]
    pub step: usize,

    #[arg(short, long, value_enum, default_value_t = Granularity::Commits, help = "Bucket size")]
    pub granularity: Granularity,

    #[arg(short, long, help = "Keep at most this many evenly spaced buckets")]
    pub max_samples: Option<usize>,
}

#[derive(Args, Clone)]
pub struct OutputArgs {
    #[arg(short, long, default_value_t = 0, help = "Limit to top N languages by total lines (0 = all)")]
    pub top: usize,

    #[arg(short, long, help = "Comma separated languages to leave out (e.g. \"HTML,CSS\")")]
    pub exclude: Option<String>,

    #[arg(short, long, help = "Comma separated languages to keep (e.g. \"Rust,Python\")")]
    pub include: Option<String>,

    #[arg(short, long, default_value = DEFAULT_OUTPUT, help = "CSV file to write, relative to the repository root")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = UnmeasuredPolicy::Zero, help = "How to render revisions the counter failed on")]
    pub unmeasured: UnmeasuredPolicy,

    #[arg(long, help = "Do not open the interactive chart")]
    pub no_chart: bool,

    #[arg(long, help = "Print the run as JSON", conflicts_with = "ndjson")]
    pub json: bool,

    #[arg(long, help = "Print one record per line as NDJSON")]
    pub ndjson: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::run::exec(&self.common, &self.sampling, &self.output)
    }
}
