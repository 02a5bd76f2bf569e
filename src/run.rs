//! The pipeline: sample history, measure each bucket, aggregate, export.

use crate::aggregate::{select_languages, LanguageFilter, LanguageTotals};
use crate::chart;
use crate::cli::{CommonArgs, OutputArgs, SamplingArgs};
use crate::export::{output_json, output_ndjson, output_summary, write_csv};
use crate::git::GitRepo;
use crate::model::{LanguageCounts, Record, RunOutput, SCHEMA_VERSION};
use crate::oracle::{ClocOracle, CountOracle, OracleError};
use crate::sample::{SampledRevision, Sampler};
use crate::util::parse_language_list;
use anyhow::Context;
use chrono::Utc;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Records in bucket order, owned by a single run.
#[derive(Debug, Default)]
pub struct Accumulator {
    records: Vec<Record>,
    unmeasured: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: &SampledRevision, measured: Result<LanguageCounts, OracleError>) {
        let record = match measured {
            Ok(counts) => Record::measured(sample.key.clone(), &sample.revision, counts),
            Err(e) => {
                warn!(
                    revision = sample.revision.short_id(),
                    bucket = %sample.key,
                    "counting failed, bucket left unmeasured: {e}"
                );
                self.unmeasured += 1;
                Record::unmeasured(sample.key.clone(), &sample.revision)
            }
        };
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn unmeasured(&self) -> usize {
        self.unmeasured
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

pub struct Report {
    pub records: Vec<Record>,
    pub totals: LanguageTotals,
    pub languages: Vec<String>,
}

impl Report {
    pub fn build(records: Vec<Record>, filter: &LanguageFilter, top: usize) -> Self {
        let totals = LanguageTotals::compute(&records, filter);
        let languages = select_languages(&totals, top);
        Self {
            records,
            totals,
            languages,
        }
    }
}

/// Measures every sample in order, one oracle run at a time.
pub fn collect_records<O: CountOracle + ?Sized>(oracle: &O, samples: &[SampledRevision]) -> Accumulator {
    collect_records_with_progress(oracle, samples, false)
}

pub fn collect_records_with_progress<O: CountOracle + ?Sized>(
    oracle: &O,
    samples: &[SampledRevision],
    show_progress: bool,
) -> Accumulator {
    let pb = if show_progress {
        let pb = ProgressBar::new(samples.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut acc = Accumulator::new();
    for sample in samples {
        pb.set_message(format!("{} ({})", sample.key, sample.revision.short_id()));
        let measured = oracle.count(&sample.revision.id);
        pb.suspend(|| acc.push(sample, measured));
        pb.inc(1);
    }
    pb.finish_and_clear();

    acc
}

pub fn exec(common: &CommonArgs, sampling: &SamplingArgs, output: &OutputArgs) -> anyhow::Result<()> {
    // configuration is checked before the repository is touched
    let sampler = Sampler::new(sampling.step, sampling.granularity)?
        .with_max_samples(sampling.max_samples)?;

    let repo = GitRepo::open(Some(&common.path)).context("Failed to open git repository")?;
    let range = repo
        .resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;
    let sampler = sampler.with_range(range);

    let revisions = repo.revisions().context("Failed to walk commit history")?;
    let samples = sampler.sample(&revisions);
    info!(
        commits = revisions.len(),
        buckets = samples.len(),
        granularity = %sampler.granularity(),
        "selected revisions"
    );

    let machine_output = output.json || output.ndjson;
    let oracle = ClocOracle::new(&common.cloc, repo.path());
    let acc = collect_records_with_progress(&oracle, &samples, !machine_output && Term::stderr().is_term());
    if acc.unmeasured() > 0 {
        info!(unmeasured = acc.unmeasured(), "some revisions could not be measured");
    }

    let filter = LanguageFilter::new(
        output.include.as_deref().map(parse_language_list).unwrap_or_default(),
        output.exclude.as_deref().map(parse_language_list).unwrap_or_default(),
    );
    let report = Report::build(acc.into_records(), &filter, output.top);

    let csv_path = resolve_output(repo.path(), &output.output);
    write_csv(&csv_path, &report.records, &report.languages, output.unmeasured)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    let run_output = RunOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repo.path().to_string_lossy().to_string(),
        granularity: sampler.granularity(),
        step: sampler.step(),
        top: output.top,
        since: common.since.clone(),
        until: common.until.clone(),
        output: csv_path.to_string_lossy().to_string(),
        languages: report.languages.clone(),
        totals: report.totals.to_vec(),
        records: report.records,
    };

    if output.json {
        output_json(&run_output)?;
    } else if output.ndjson {
        output_ndjson(&run_output.records)?;
    } else {
        output_summary(&run_output, &csv_path, repo.path())?;
    }

    if output.no_chart || machine_output {
        return Ok(());
    }
    if !Term::stdout().is_term() {
        info!("stdout is not a terminal, skipping chart");
        return Ok(());
    }

    let data = chart::build_chart_data(&run_output.records, &run_output.languages);
    chart::run(&data).context("Failed to display chart")?;
    Ok(())
}

fn resolve_output(repo_path: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        repo_path.join(output)
    }
}
