use crate::error::{LocError, Result};
use crate::model::{DateRange, Revision};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gix::{discover, ObjectId, Repository};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        if !repo_path.is_dir() {
            return Err(LocError::config(format!(
                "'{}' is not a directory",
                repo_path.display()
            )));
        }

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        // discover walks up; only the repository root itself is accepted
        let requested = std::fs::canonicalize(&repo_path)?;
        let is_root = requested == std::fs::canonicalize(&path)?
            || requested == std::fs::canonicalize(repo.path())?;
        if !is_root {
            return Err(LocError::config(format!(
                "'{}' is not a git repository root (found '{}')",
                repo_path.display(),
                path.display()
            )));
        }
        debug!(path = %path.display(), "opened repository");

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resolve_range(&self, since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
        let since_dt = since.map(|s| self.parse_commit_or_date(s)).transpose()?;
        let until_dt = until.map(|u| self.parse_commit_or_date(u)).transpose()?;

        if let (Some(s), Some(u)) = (since_dt, until_dt) {
            if s > u {
                return Err(LocError::InvalidDate(format!(
                    "Invalid range: since ({s}) is after until ({u})"
                )));
            }
        }

        let mut range = DateRange::new();
        if let Some(s) = since_dt {
            range = range.with_since(s);
        }
        if let Some(u) = until_dt {
            range = range.with_until(u);
        }
        Ok(range)
    }

    fn parse_commit_or_date(&self, input: &str) -> Result<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.with_timezone(&Utc));
        }

        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&datetime));
            }
        }

        if let Some(duration) = parse_natural_duration(input) {
            return chrono::Duration::from_std(duration)
                .ok()
                .and_then(|ago| Utc::now().checked_sub_signed(ago))
                .ok_or_else(|| LocError::InvalidDate(format!("Duration overflow for '{input}'")));
        }

        // Anything else has to name a commit
        let id = self
            .repo
            .rev_parse_single(input)
            .map_err(|e| LocError::InvalidDate(format!("'{input}' is neither a date nor a commit: {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| LocError::InvalidDate(format!("Not a commit: {input}")))?;

        let secs = commit.time()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| LocError::InvalidDate(format!("Invalid timestamp: {secs}")))
    }

    /// Every commit reachable from HEAD, oldest first, with 1-based ordinals.
    ///
    /// Parents always come before their children. Among commits whose parents
    /// are all placed, the earliest committer time goes next. An unborn HEAD
    /// has no history.
    pub fn revisions(&self) -> Result<Vec<Revision>> {
        let mut head = self.repo.head()?;
        if head.is_unborn() {
            debug!("HEAD is unborn, no commits to walk");
            return Ok(Vec::new());
        }
        let head_commit = head.peel_to_commit_in_place()?;

        let mut found: Vec<WalkedCommit> = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: Vec<ObjectId> = vec![head_commit.id];

        while let Some(commit_id) = stack.pop() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();
            stack.extend(parents.iter().rev().copied());
            found.push(WalkedCommit { id: commit_id, secs, parents });
        }

        let ordered = parents_first(found);
        debug!(commits = ordered.len(), "walked history");

        ordered
            .into_iter()
            .enumerate()
            .map(|(idx, (id, secs))| {
                let timestamp = DateTime::from_timestamp(secs, 0)
                    .ok_or_else(|| LocError::InvalidDate(format!("Invalid timestamp: {secs}")))?;
                Ok(Revision::new(id.to_string(), timestamp, idx + 1))
            })
            .collect()
    }
}

struct WalkedCommit {
    id: ObjectId,
    secs: i64,
    parents: Vec<ObjectId>,
}

/// Orders commits so every parent precedes its children, releasing the
/// oldest ready commit first. `found` is in child-to-parent discovery order,
/// which also breaks ties between equal timestamps.
fn parents_first(found: Vec<WalkedCommit>) -> Vec<(ObjectId, i64)> {
    let index: HashMap<ObjectId, usize> = found.iter().enumerate().map(|(i, c)| (c.id, i)).collect();

    let mut waiting = vec![0usize; found.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); found.len()];
    for (i, commit) in found.iter().enumerate() {
        // a parent missing from the walk (shallow clone) never blocks its child
        for parent in commit.parents.iter().filter_map(|p| index.get(p)) {
            waiting[i] += 1;
            children[*parent].push(i);
        }
    }

    let tie = |i: usize| found.len() - 1 - i;
    let mut ready: BinaryHeap<Reverse<(i64, usize)>> = waiting
        .iter()
        .enumerate()
        .filter(|(_, &n)| n == 0)
        .map(|(i, _)| Reverse((found[i].secs, tie(i))))
        .collect();

    let mut ordered = Vec::with_capacity(found.len());
    while let Some(Reverse((secs, t))) = ready.pop() {
        let i = found.len() - 1 - t;
        ordered.push((found[i].id, secs));
        for &child in &children[i] {
            waiting[child] -= 1;
            if waiting[child] == 0 {
                ready.push(Reverse((found[child].secs, tie(child))));
            }
        }
    }
    ordered
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    let units: [(&str, u64); 3] = [
        (" days ago", 86_400),
        (" weeks ago", 7 * 86_400),
        (" months ago", 30 * 86_400),
    ];

    units.iter().find_map(|(suffix, secs)| {
        input
            .strip_suffix(suffix)
            .and_then(|n| n.trim().parse::<u64>().ok())
            .and_then(|n| n.checked_mul(*secs))
            .map(Duration::from_secs)
    })
}

#[cfg(test)]
mod tests {
    use super::parse_natural_duration;
    use std::time::Duration;

    #[test]
    fn natural_durations() {
        assert_eq!(parse_natural_duration("3 days ago"), Some(Duration::from_secs(3 * 86_400)));
        assert_eq!(parse_natural_duration(" 2 Weeks Ago "), Some(Duration::from_secs(14 * 86_400)));
        assert_eq!(parse_natural_duration("1 months ago"), Some(Duration::from_secs(30 * 86_400)));
        assert_eq!(parse_natural_duration("yesterday"), None);
    }

    #[test]
    fn oversized_durations_are_rejected() {
        assert_eq!(parse_natural_duration("300000000000000 days ago"), None);
        assert_eq!(parse_natural_duration("18446744073709551615 weeks ago"), None);
    }
}
