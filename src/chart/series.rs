use crate::model::Record;
use chrono::{Datelike, NaiveDate};

pub struct Series {
    pub language: String,
    pub points: Vec<(f64, f64)>,
}

/// Plot-ready data: x is the record date as days from the common era,
/// y the code line count with unmeasured points drawn at 0.
pub struct ChartData {
    pub series: Vec<Series>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

pub fn build_chart_data(records: &[Record], languages: &[String]) -> ChartData {
    let xs: Vec<f64> = records
        .iter()
        .map(|r| r.date.num_days_from_ce() as f64)
        .collect();

    let series: Vec<Series> = languages
        .iter()
        .map(|language| Series {
            language: language.clone(),
            points: xs
                .iter()
                .zip(records)
                .map(|(&x, r)| (x, r.count(language).unwrap_or(0) as f64))
                .collect(),
        })
        .collect();

    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let x_bounds = if xs.is_empty() {
        [0.0, 1.0]
    } else if x_min == x_max {
        [x_min - 1.0, x_max + 1.0]
    } else {
        [x_min, x_max]
    };

    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .fold(0.0, f64::max);
    let y_bounds = [0.0, if y_max > 0.0 { y_max * 1.05 } else { 1.0 }];

    let x_mid = (x_bounds[0] + x_bounds[1]) / 2.0;
    let x_labels = [x_bounds[0], x_mid, x_bounds[1]]
        .iter()
        .map(|&x| date_label(x))
        .collect();
    let y_labels = [0.0, y_bounds[1] / 2.0, y_bounds[1]]
        .iter()
        .map(|y| format!("{:.0}", y))
        .collect();

    ChartData {
        series,
        x_bounds,
        y_bounds,
        x_labels,
        y_labels,
    }
}

fn date_label(days: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
