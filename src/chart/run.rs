use super::draw::{draw_chart, draw_help_overlay};
use super::series::ChartData;
use super::state::ChartState;
use crossterm::event::{poll, read, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::io;
use std::time::Duration;

/// Shows the chart until the user quits.
pub fn run(data: &ChartData) -> io::Result<()> {
    enable_raw_mode()?;
    let result = Terminal::new(CrosstermBackend::new(io::stdout()))
        .and_then(|mut terminal| show(&mut terminal, data, next_key));
    let disabled = disable_raw_mode();
    result.and(disabled)
}

/// Draws `data` and feeds it keys until one closes the chart. The screen is
/// cleared and the cursor shown again whether or not the loop failed.
pub fn show<B, K>(terminal: &mut Terminal<B>, data: &ChartData, mut keys: K) -> io::Result<()>
where
    B: Backend,
    K: FnMut() -> io::Result<Option<KeyCode>>,
{
    let result = event_loop(terminal, data, &mut keys);
    let restored = terminal.clear().and_then(|()| terminal.show_cursor());
    result.and(restored)
}

fn event_loop<B, K>(terminal: &mut Terminal<B>, data: &ChartData, keys: &mut K) -> io::Result<()>
where
    B: Backend,
    K: FnMut() -> io::Result<Option<KeyCode>>,
{
    let mut state = ChartState::new(data.series.len());
    terminal.clear()?;

    loop {
        terminal.draw(|f| {
            let size = f.size();
            draw_chart(f, size, data, &state);
            if state.show_help {
                draw_help_overlay(f, size, data, &state);
            }
        })?;

        if let Some(code) = keys()? {
            if !state.handle_key(code) {
                return Ok(());
            }
        }
    }
}

fn next_key() -> io::Result<Option<KeyCode>> {
    if !poll(Duration::from_millis(200))? {
        return Ok(None);
    }
    match read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key.code)),
        _ => Ok(None),
    }
}
