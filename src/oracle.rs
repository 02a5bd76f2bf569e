//! Line counting oracle. The default implementation shells out to `cloc`.

use crate::model::LanguageCounts;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, trace};

/// Keys in cloc's JSON report that are not languages.
const RESERVED_KEYS: [&str; 2] = ["SUM", "header"];

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("'{program}' was not found; is it installed and on PATH?")]
    NotInstalled { program: String },
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("malformed report: {0}")]
    Malformed(String),
}

/// Counts code lines per language at a given revision.
pub trait CountOracle {
    fn count(&self, revision: &str) -> Result<LanguageCounts, OracleError>;
}

pub struct ClocOracle {
    program: PathBuf,
    workdir: PathBuf,
}

impl ClocOracle {
    pub fn new(program: impl Into<PathBuf>, workdir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl CountOracle for ClocOracle {
    fn count(&self, revision: &str) -> Result<LanguageCounts, OracleError> {
        debug!(revision, program = %self.program.display(), "running oracle");

        let output = Command::new(&self.program)
            .args(["--quiet", "--json", "--git", revision])
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => OracleError::NotInstalled {
                    program: self.program_name(),
                },
                _ => OracleError::Launch {
                    program: self.program_name(),
                    source,
                },
            })?;

        if !output.status.success() {
            return Err(OracleError::Failed {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| OracleError::Malformed(format!("output is not UTF-8: {e}")))?;
        parse_cloc_output(&stdout)
    }
}

/// Parses a `cloc --json` report into code line counts, in report order.
///
/// Empty output means nothing countable was found. Entries without a
/// non-negative integer `code` field are skipped.
pub fn parse_cloc_output(output: &str) -> Result<LanguageCounts, OracleError> {
    if output.trim().is_empty() {
        return Ok(LanguageCounts::new());
    }

    let report: Map<String, Value> =
        serde_json::from_str(output).map_err(|e| OracleError::Malformed(e.to_string()))?;

    let mut counts = LanguageCounts::new();
    for (language, stats) in &report {
        if RESERVED_KEYS.contains(&language.as_str()) {
            continue;
        }
        match stats.get("code").and_then(Value::as_u64) {
            Some(code) => counts.insert(language.as_str(), code),
            None => trace!(language = %language, "entry has no code count"),
        }
    }
    Ok(counts)
}
