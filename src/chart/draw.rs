use super::series::ChartData;
use super::state::ChartState;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, GraphType, LegendPosition, Paragraph,
};
use ratatui::Frame;

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
    Color::Blue,
    Color::LightGreen,
    Color::LightRed,
];

pub fn series_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// One line per visible language over the record dates.
pub fn draw_chart(f: &mut Frame, area: Rect, data: &ChartData, state: &ChartState) {
    let block = Block::default()
        .title("Lines of Code Over Time by Language")
        .title(
            Title::from(" q quit · 1-9 toggle · a all · h help ")
                .position(Position::Bottom)
                .alignment(Alignment::Right),
        )
        .borders(Borders::ALL);

    if data.is_empty() {
        let empty = Paragraph::new("No data to display")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let datasets: Vec<Dataset> = data
        .series
        .iter()
        .enumerate()
        .filter(|(i, _)| state.is_visible(*i))
        .map(|(i, s)| {
            Dataset::default()
                .name(s.language.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(i)))
                .data(&s.points)
        })
        .collect();

    let axis_style = Style::default().fg(Color::Gray);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Date")
                .style(axis_style)
                .bounds(data.x_bounds)
                .labels(data.x_labels.iter().cloned().map(Span::from).collect()),
        )
        .y_axis(
            Axis::default()
                .title("Lines of Code")
                .style(axis_style)
                .bounds(data.y_bounds)
                .labels(data.y_labels.iter().cloned().map(Span::from).collect()),
        )
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    f.render_widget(chart, area);
}

pub fn draw_help_overlay(f: &mut Frame, area: Rect, data: &ChartData, state: &ChartState) {
    let help_area = centered_rect(60, 70, area);
    f.render_widget(Clear, help_area);

    let heading = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            "loc-trend - Help",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Keys:", heading)),
        Line::from("  1-9         Toggle a language"),
        Line::from("  a           Show every language"),
        Line::from("  h, F1       Toggle this help"),
        Line::from("  q, Esc      Quit"),
        Line::from(""),
        Line::from(Span::styled("Languages:", heading)),
    ];

    for (i, s) in data.series.iter().enumerate() {
        let marker = if state.is_visible(i) { "●" } else { "○" };
        let key = if i < 9 { format!("{}", i + 1) } else { " ".to_string() };
        lines.push(Line::from(vec![
            Span::raw(format!("  {key}  ")),
            Span::styled(marker, Style::default().fg(series_color(i))),
            Span::raw(format!(" {}", s.language)),
        ]));
    }

    let help = Paragraph::new(lines)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .wrap(ratatui::widgets::Wrap { trim: false });
    f.render_widget(help, help_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (area.width as u32 * percent_x as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y as u32 / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
