//! Commit sampling: the stride filter, the date window and bucket dedup.

use crate::error::{LocError, Result};
use crate::model::{BucketKey, DateRange, Granularity, Revision};
use std::collections::HashSet;
use tracing::debug;

/// A revision that survived sampling, with the bucket it represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledRevision {
    pub revision: Revision,
    pub key: BucketKey,
}

#[derive(Debug, Clone)]
pub struct Sampler {
    step: usize,
    granularity: Granularity,
    range: DateRange,
    max_samples: Option<usize>,
}

impl Sampler {
    pub fn new(step: usize, granularity: Granularity) -> Result<Self> {
        if step == 0 {
            return Err(LocError::config("--step must be a positive integer"));
        }
        Ok(Self {
            step,
            granularity,
            range: DateRange::new(),
            max_samples: None,
        })
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_max_samples(mut self, max_samples: Option<usize>) -> Result<Self> {
        if max_samples == Some(0) {
            return Err(LocError::config("--max-samples must be a positive integer"));
        }
        self.max_samples = max_samples;
        Ok(self)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Selects revisions from an oldest-first history. The first revision to
    /// produce a bucket key keeps it; later ones with the same key are dropped.
    pub fn sample<'a, I>(&self, revisions: I) -> Vec<SampledRevision>
    where
        I: IntoIterator<Item = &'a Revision>,
    {
        let mut seen: HashSet<BucketKey> = HashSet::new();
        let mut selected = Vec::new();

        for revision in revisions {
            if self.granularity.uses_step() && revision.ordinal % self.step != 0 {
                continue;
            }
            if !self.range.contains(&revision.timestamp) {
                continue;
            }

            let key = self.granularity.bucket_key(revision);
            if !seen.insert(key.clone()) {
                continue;
            }
            selected.push(SampledRevision {
                revision: revision.clone(),
                key,
            });
        }

        debug!(
            granularity = %self.granularity,
            step = self.step,
            buckets = selected.len(),
            "sampled history"
        );

        match self.max_samples {
            Some(max) if selected.len() > max => thin(selected, max),
            _ => selected,
        }
    }
}

/// Keeps every `ceil(len / max)`-th entry starting with the first, capped at `max`.
fn thin(selected: Vec<SampledRevision>, max: usize) -> Vec<SampledRevision> {
    let interval = selected.len().div_ceil(max);
    let thinned: Vec<_> = selected.into_iter().step_by(interval).take(max).collect();
    debug!(interval, kept = thinned.len(), "thinned samples");
    thinned
}
