use chrono::{TimeZone, Utc};
use loc_trend::aggregate::LanguageFilter;
use crossterm::event::KeyCode;
use loc_trend::chart::{build_chart_data, show, ChartState};
use loc_trend::export::{render_csv, summary_line, UnmeasuredPolicy};
use loc_trend::model::{Granularity, LanguageCounts, Revision};
use loc_trend::oracle::{CountOracle, OracleError};
use loc_trend::run::{collect_records, Report};
use loc_trend::sample::Sampler;
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Answers from a fixed table; revisions missing from it fail.
struct TableOracle {
    answers: HashMap<String, Vec<(&'static str, u64)>>,
}

impl CountOracle for TableOracle {
    fn count(&self, revision: &str) -> Result<LanguageCounts, OracleError> {
        self.answers
            .get(revision)
            .map(|counts| counts.iter().copied().collect())
            .ok_or_else(|| OracleError::Malformed(format!("no answer for {revision}")))
    }
}

fn three_commits() -> Vec<Revision> {
    (1..=3)
        .map(|i| Revision::new(format!("c{i}"), Utc.with_ymd_and_hms(2024, 3, i, 9, 30, 0).unwrap(), i as usize))
        .collect()
}

fn oracle(skip: Option<&str>) -> TableOracle {
    let mut answers = HashMap::new();
    answers.insert("c1".to_string(), vec![("Python", 10)]);
    answers.insert("c2".to_string(), vec![("Python", 12), ("Go", 5)]);
    answers.insert("c3".to_string(), vec![("Python", 15), ("Go", 5)]);
    if let Some(rev) = skip {
        answers.remove(rev);
    }
    TableOracle { answers }
}

fn run_csv(oracle: &TableOracle, top: usize, policy: UnmeasuredPolicy) -> String {
    let revisions = three_commits();
    let samples = Sampler::new(1, Granularity::Commits).unwrap().sample(&revisions);
    let acc = collect_records(oracle, &samples);
    let report = Report::build(acc.into_records(), &LanguageFilter::default(), top);

    let mut out = Vec::new();
    render_csv(&mut out, &report.records, &report.languages, policy).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn three_commit_history_renders_alphabetical_table() {
    let csv = run_csv(&oracle(None), 0, UnmeasuredPolicy::Zero);
    assert_eq!(
        csv,
        "date,Go,Python\n2024-03-01,0,10\n2024-03-02,5,12\n2024-03-03,5,15\n"
    );
}

#[test]
fn failed_revision_still_gets_a_zero_row() {
    let csv = run_csv(&oracle(Some("c2")), 0, UnmeasuredPolicy::Zero);
    assert_eq!(
        csv,
        "date,Go,Python\n2024-03-01,0,10\n2024-03-02,0,0\n2024-03-03,5,15\n"
    );
}

#[test]
fn blank_policy_marks_only_unmeasured_rows() {
    let csv = run_csv(&oracle(Some("c2")), 0, UnmeasuredPolicy::Blank);
    assert_eq!(
        csv,
        "date,Go,Python\n2024-03-01,0,10\n2024-03-02,,\n2024-03-03,5,15\n"
    );
}

#[test]
fn top_one_keeps_the_largest_language() {
    let csv = run_csv(&oracle(None), 1, UnmeasuredPolicy::Zero);
    assert_eq!(csv, "date,Python\n2024-03-01,10\n2024-03-02,12\n2024-03-03,15\n");
}

#[test]
fn identical_inputs_render_identical_tables() {
    let first = run_csv(&oracle(None), 2, UnmeasuredPolicy::Zero);
    let second = run_csv(&oracle(None), 2, UnmeasuredPolicy::Zero);
    assert_eq!(first, second);
}

#[test]
fn accumulator_tracks_unmeasured_revisions() {
    let revisions = three_commits();
    let samples = Sampler::new(1, Granularity::Commits).unwrap().sample(&revisions);
    let acc = collect_records(&oracle(Some("c3")), &samples);

    assert_eq!(acc.records().len(), 3);
    assert_eq!(acc.unmeasured(), 1);
    assert!(acc.records()[0].is_measured());
    assert_eq!(acc.records()[2].count("Python"), None);
    assert_eq!(acc.records()[0].count("Go"), Some(0));
}

#[test]
fn empty_history_renders_header_only() {
    let report = Report::build(Vec::new(), &LanguageFilter::default(), 0);
    let mut out = Vec::new();
    render_csv(&mut out, &report.records, &report.languages, UnmeasuredPolicy::Zero).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "date\n");
}

#[test]
fn header_quotes_awkward_language_names() {
    let report = Report::build(Vec::new(), &LanguageFilter::default(), 0);
    let languages = vec!["C, extended".to_string(), "Say \"hi\"".to_string()];
    let mut out = Vec::new();
    render_csv(&mut out, &report.records, &languages, UnmeasuredPolicy::Zero).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "date,\"C, extended\",\"Say \"\"hi\"\"\"\n"
    );
}

#[test]
fn summary_line_reports_rows_and_languages() {
    let line = summary_line(
        Path::new("loc_over_time_by_lang.csv"),
        3,
        2,
        Path::new("/work/repo"),
    );
    assert_eq!(
        line,
        "Wrote loc_over_time_by_lang.csv (3 rows, top 2 langs) from '/work/repo'"
    );
}

#[test]
fn chart_series_follow_selection_with_zero_fill() {
    let revisions = three_commits();
    let samples = Sampler::new(1, Granularity::Commits).unwrap().sample(&revisions);
    let acc = collect_records(&oracle(Some("c2")), &samples);
    let report = Report::build(acc.into_records(), &LanguageFilter::default(), 0);

    let data = build_chart_data(&report.records, &report.languages);
    let names: Vec<&str> = data.series.iter().map(|s| s.language.as_str()).collect();
    assert_eq!(names, vec!["Go", "Python"]);

    let python: Vec<f64> = data.series[1].points.iter().map(|&(_, y)| y).collect();
    assert_eq!(python, vec![10.0, 0.0, 15.0]);
    assert!(data.x_bounds[0] < data.x_bounds[1]);
    assert_eq!(data.y_bounds[0], 0.0);
    assert!(data.y_bounds[1] >= 15.0);
    assert_eq!(data.x_labels.first().map(String::as_str), Some("2024-03-01"));
    assert_eq!(data.x_labels.last().map(String::as_str), Some("2024-03-03"));
}

#[test]
fn empty_chart_has_sane_bounds() {
    let data = build_chart_data(&[], &[]);
    assert!(data.is_empty());
    assert!(data.x_bounds[0] < data.x_bounds[1]);
    assert!(data.y_bounds[0] < data.y_bounds[1]);
}

#[test]
fn chart_state_toggles_series() {
    let mut state = ChartState::new(3);
    state.toggle(1);
    assert!(state.is_visible(0));
    assert!(!state.is_visible(1));
    state.toggle(7);
    state.show_all();
    assert!(state.is_visible(1));
}

#[test]
fn chart_keys_toggle_help_and_quit() {
    let mut state = ChartState::new(2);
    assert!(state.handle_key(KeyCode::Char('2')));
    assert!(!state.is_visible(1));
    assert!(state.handle_key(KeyCode::Char('h')));
    assert!(state.show_help);
    assert!(state.handle_key(KeyCode::Esc));
    assert!(!state.show_help);
    assert!(state.handle_key(KeyCode::Char('a')));
    assert!(state.is_visible(1));
    assert!(!state.handle_key(KeyCode::Esc));
    assert!(!state.handle_key(KeyCode::Char('q')));
}

#[test]
fn chart_session_ends_on_quit() {
    let data = build_chart_data(&[], &[]);
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    let mut keys = vec![KeyCode::Char('h'), KeyCode::Esc, KeyCode::Char('q')].into_iter();

    show(&mut terminal, &data, || Ok(keys.next())).unwrap();
    assert_eq!(keys.next(), None);
}

#[test]
fn chart_session_surfaces_input_errors() {
    let data = build_chart_data(&[], &[]);
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

    let err = show(&mut terminal, &data, || Err(io::Error::new(io::ErrorKind::Other, "input gone")))
        .unwrap_err();
    assert_eq!(err.to_string(), "input gone");
}

#[test]
fn blank_cells_survive_single_language_tables() {
    let revisions = three_commits();
    let samples = Sampler::new(1, Granularity::Commits).unwrap().sample(&revisions);
    let acc = collect_records(&oracle(Some("c2")), &samples);
    let report = Report::build(acc.into_records(), &LanguageFilter::default(), 1);

    let mut out = Vec::new();
    render_csv(&mut out, &report.records, &report.languages, UnmeasuredPolicy::Blank).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "date,Python\n2024-03-01,10\n2024-03-02,\n2024-03-03,15\n"
    );
}
