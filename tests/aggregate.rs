use chrono::{TimeZone, Utc};
use loc_trend::aggregate::{select_languages, LanguageFilter, LanguageTotals};
use loc_trend::model::{BucketKey, LanguageCounts, Record, Revision};
use pretty_assertions::assert_eq;

fn record(ordinal: usize, counts: &[(&str, u64)]) -> Record {
    let revision = Revision::new(
        format!("rev{ordinal}"),
        Utc.with_ymd_and_hms(2024, 1, ordinal as u32, 0, 0, 0).unwrap(),
        ordinal,
    );
    let counts: LanguageCounts = counts.iter().map(|&(l, c)| (l, c)).collect();
    Record::measured(BucketKey(format!("commit_{ordinal}")), &revision, counts)
}

fn unmeasured(ordinal: usize) -> Record {
    let revision = Revision::new(
        format!("rev{ordinal}"),
        Utc.with_ymd_and_hms(2024, 1, ordinal as u32, 0, 0, 0).unwrap(),
        ordinal,
    );
    Record::unmeasured(BucketKey(format!("commit_{ordinal}")), &revision)
}

#[test]
fn totals_sum_across_records() {
    let records = vec![
        record(1, &[("Python", 10)]),
        record(2, &[("Python", 12), ("Go", 5)]),
        unmeasured(3),
        record(4, &[("Go", 5), ("Python", 15)]),
    ];
    let totals = LanguageTotals::compute(&records, &LanguageFilter::default());

    assert_eq!(totals.languages().to_vec(), vec!["Python", "Go"]);
    assert_eq!(totals.total("Python"), 37);
    assert_eq!(totals.total("Go"), 10);
    assert_eq!(totals.total("Rust"), 0);
}

#[test]
fn top_n_breaks_ties_by_first_observation() {
    let b_first = vec![
        record(1, &[("A", 60), ("B", 20), ("D", 10)]),
        record(2, &[("A", 40), ("B", 30), ("C", 50)]),
    ];
    let totals = LanguageTotals::compute(&b_first, &LanguageFilter::default());
    assert_eq!(select_languages(&totals, 2), vec!["A", "B"]);

    let c_first = vec![
        record(1, &[("A", 60), ("C", 20), ("D", 10)]),
        record(2, &[("A", 40), ("B", 50), ("C", 30)]),
    ];
    let totals = LanguageTotals::compute(&c_first, &LanguageFilter::default());
    assert_eq!(select_languages(&totals, 2), vec!["A", "C"]);
}

#[test]
fn top_n_never_exceeds_observed_languages() {
    let records = vec![record(1, &[("Rust", 3), ("TOML", 1)])];
    let totals = LanguageTotals::compute(&records, &LanguageFilter::default());
    assert_eq!(select_languages(&totals, 10), vec!["Rust", "TOML"]);
}

#[test]
fn zero_top_selects_all_alphabetically() {
    let records = vec![
        record(1, &[("Python", 10)]),
        record(2, &[("Python", 12), ("Go", 5), ("C", 1)]),
    ];
    let totals = LanguageTotals::compute(&records, &LanguageFilter::default());
    assert_eq!(select_languages(&totals, 0), vec!["C", "Go", "Python"]);
}

#[test]
fn empty_records_select_nothing() {
    let totals = LanguageTotals::compute(&[], &LanguageFilter::default());
    assert!(totals.is_empty());
    assert!(select_languages(&totals, 0).is_empty());
    assert!(select_languages(&totals, 3).is_empty());
}

#[test]
fn filter_excludes_and_includes() {
    let records = vec![record(1, &[("HTML", 500), ("CSS", 300), ("Rust", 100), ("JSON", 50)])];

    let exclude = LanguageFilter::new(vec![], vec!["HTML".into(), "CSS".into()]);
    let totals = LanguageTotals::compute(&records, &exclude);
    assert_eq!(select_languages(&totals, 0), vec!["JSON", "Rust"]);

    let include = LanguageFilter::new(vec!["Rust".into(), "HTML".into()], vec!["HTML".into()]);
    let totals = LanguageTotals::compute(&records, &include);
    assert_eq!(select_languages(&totals, 0), vec!["Rust"]);
}

#[test]
fn totals_export_in_observation_order() {
    let records = vec![record(1, &[("Zig", 2), ("Ada", 4)])];
    let totals = LanguageTotals::compute(&records, &LanguageFilter::default()).to_vec();
    let pairs: Vec<(String, u64)> = totals.into_iter().map(|t| (t.language, t.total)).collect();
    assert_eq!(pairs, vec![("Zig".to_string(), 2), ("Ada".to_string(), 4)]);
}
