pub mod draw;
pub mod run;
pub mod series;
pub mod state;

pub use draw::{draw_chart, draw_help_overlay};
pub use run::{run, show};
pub use series::{build_chart_data, ChartData, Series};
pub use state::ChartState;
