use crate::util::{day_key, month_key, week_key};
use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// A commit as seen by the sampler. `ordinal` is the 1-based position in the
/// oldest-to-newest traversal of every commit reachable from HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub ordinal: usize,
}

impl Revision {
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>, ordinal: usize) -> Self {
        Self {
            id: id.into(),
            timestamp,
            ordinal,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per sampled commit
    #[default]
    Commits,
    /// One bucket per calendar day (UTC)
    Daily,
    /// One bucket per ISO week
    Weekly,
    /// One bucket per calendar month
    Monthly,
}

impl Granularity {
    /// Only commit granularity honours the sampling stride.
    pub fn uses_step(self) -> bool {
        matches!(self, Granularity::Commits)
    }

    pub fn bucket_key(self, revision: &Revision) -> BucketKey {
        let key = match self {
            Granularity::Commits => format!("commit_{}", revision.ordinal),
            Granularity::Daily => day_key(&revision.timestamp),
            Granularity::Weekly => week_key(&revision.timestamp),
            Granularity::Monthly => month_key(&revision.timestamp),
        };
        BucketKey(key)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Commits => "commits",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketKey(pub String);

impl BucketKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-language code line counts for one revision, kept in the order the
/// oracle reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCounts {
    entries: Vec<(String, u64)>,
}

impl LanguageCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the count for `language`, keeping its original position if it
    /// was already present.
    pub fn insert(&mut self, language: impl Into<String>, code: u64) {
        let language = language.into();
        match self.entries.iter_mut().find(|(l, _)| *l == language) {
            Some(entry) => entry.1 = code,
            None => self.entries.push((language, code)),
        }
    }

    pub fn get(&self, language: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == language)
            .map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for LanguageCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = LanguageCounts::new();
        for (language, code) in iter {
            counts.insert(language, code);
        }
        counts
    }
}

impl Serialize for LanguageCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (language, code) in &self.entries {
            map.serialize_entry(language, code)?;
        }
        map.end()
    }
}

/// One retained bucket. `counts` is `None` when the oracle could not measure
/// the revision, which keeps "unmeasured" apart from "measured zero".
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub key: BucketKey,
    pub revision: String,
    pub date: NaiveDate,
    pub counts: Option<LanguageCounts>,
}

impl Record {
    pub fn measured(key: BucketKey, revision: &Revision, counts: LanguageCounts) -> Self {
        Self {
            key,
            revision: revision.id.clone(),
            date: revision.date(),
            counts: Some(counts),
        }
    }

    pub fn unmeasured(key: BucketKey, revision: &Revision) -> Self {
        Self {
            key,
            revision: revision.id.clone(),
            date: revision.date(),
            counts: None,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.counts.is_some()
    }

    /// Count for `language`: `Some(0)` when measured but absent, `None` when
    /// the revision was never measured.
    pub fn count(&self, language: &str) -> Option<u64> {
        self.counts
            .as_ref()
            .map(|counts| counts.get(language).unwrap_or(0))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageTotal {
    pub language: String,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub granularity: Granularity,
    pub step: usize,
    pub top: usize,
    pub since: Option<String>,
    pub until: Option<String>,
    pub output: String,
    pub languages: Vec<String>,
    pub totals: Vec<LanguageTotal>,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        if let Some(since) = self.since {
            if timestamp < &since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if timestamp > &until {
                return false;
            }
        }
        true
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}
