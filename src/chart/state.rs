use crossterm::event::KeyCode;

/// Which series are visible, and whether the help overlay is up.
pub struct ChartState {
    pub hidden: Vec<bool>,
    pub show_help: bool,
}

impl ChartState {
    pub fn new(series: usize) -> Self {
        Self {
            hidden: vec![false; series],
            show_help: false,
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(hidden) = self.hidden.get_mut(index) {
            *hidden = !*hidden;
        }
    }

    pub fn show_all(&mut self) {
        self.hidden.iter_mut().for_each(|h| *h = false);
    }

    pub fn is_visible(&self, index: usize) -> bool {
        !self.hidden.get(index).copied().unwrap_or(false)
    }

    /// Applies one key press. Returns `false` once the chart should close.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return false,
            KeyCode::Esc if self.show_help => self.show_help = false,
            KeyCode::Esc => return false,
            KeyCode::Char('h') | KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Char('a') => self.show_all(),
            KeyCode::Char(c @ '1'..='9') => self.toggle(c as usize - '1' as usize),
            _ => {}
        }
        true
    }
}
