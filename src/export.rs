use crate::error::Result;
use crate::model::{Record, RunOutput};
use console::style;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_OUTPUT: &str = "loc_over_time_by_lang.csv";

/// How cells of revisions the oracle failed on are rendered.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmeasuredPolicy {
    /// Render as 0, like a measured revision without the language
    #[default]
    Zero,
    /// Leave the cell empty
    Blank,
}

impl UnmeasuredPolicy {
    fn cell(self, record: &Record, language: &str) -> String {
        match (record.count(language), self) {
            (Some(code), _) => code.to_string(),
            (None, UnmeasuredPolicy::Zero) => "0".to_string(),
            (None, UnmeasuredPolicy::Blank) => String::new(),
        }
    }
}

/// Writes the `date,<lang...>` table, one row per record in record order.
pub fn render_csv<W: Write>(
    writer: W,
    records: &[Record],
    languages: &[String],
    policy: UnmeasuredPolicy,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(std::iter::once("date").chain(languages.iter().map(String::as_str)))?;

    for record in records {
        let mut row = Vec::with_capacity(languages.len() + 1);
        row.push(record.date.format("%Y-%m-%d").to_string());
        row.extend(languages.iter().map(|l| policy.cell(record, l)));
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

pub fn write_csv(
    path: &Path,
    records: &[Record],
    languages: &[String],
    policy: UnmeasuredPolicy,
) -> Result<()> {
    render_csv(File::create(path)?, records, languages, policy)
}

pub fn summary_line(output: &Path, rows: usize, languages: usize, repo_path: &Path) -> String {
    format!(
        "Wrote {} ({} rows, top {} langs) from '{}'",
        output.display(),
        rows,
        languages,
        repo_path.display()
    )
}

pub fn output_summary(output: &RunOutput, csv_path: &Path, repo_path: &Path) -> anyhow::Result<()> {
    println!(
        "{}",
        style(summary_line(csv_path, output.records.len(), output.languages.len(), repo_path)).bold()
    );

    let unmeasured = output.records.iter().filter(|r| !r.is_measured()).count();
    if unmeasured > 0 {
        println!(
            "{} revision(s) could not be measured",
            style(unmeasured).yellow()
        );
    }

    if let (Some(first), Some(last)) = (output.records.first(), output.records.last()) {
        println!(
            "Date range: {} to {}",
            style(first.date.format("%Y-%m-%d")).dim(),
            style(last.date.format("%Y-%m-%d")).dim()
        );
    }

    Ok(())
}

pub fn output_json(output: &RunOutput) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_ndjson(records: &[Record]) -> anyhow::Result<()> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}
