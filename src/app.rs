use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::system::counters::{CounterSource, clock_ticks_per_second};
use crate::system::cpu::CpuSampler;
use crate::system::process::ProcessRecord;
use crate::system::summary::SystemSummary;
use crate::system::table::{ProcessTable, SortKey};
use crate::ui::theme::{ColorSupport, Theme, resolve_color_support};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub filter: KeyCode,
    pub cycle_sort: KeyCode,
    pub cycle_theme: KeyCode,
    pub help: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.filter), "Filter processes"),
            (key_label(self.cycle_sort), "Cycle sort key"),
            (key_label(self.cycle_theme), "Cycle theme"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("\u{2191}\u{2193}".to_string(), "Select row"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    source: Box<dyn CounterSource>,
    sampler: CpuSampler,
    ticks_per_second: u64,
    pub table: ProcessTable,
    pub summary: SystemSummary,
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub theme: Theme,
    pub color_support: ColorSupport,
    pub cpu_history: VecDeque<u64>,
    cpu_history_capacity: usize,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: Config, source: Box<dyn CounterSource>) -> Self {
        let color_support = resolve_color_support(&config.general.color_support);
        let theme = Theme::from_config(&config.general.theme, color_support);
        let sort = SortKey::from_str_config(&config.general.default_sort);
        let keybinds = ResolvedKeybinds::from_config(&config.keybinds);
        let sparkline_length = config.general.sparkline_length;

        let mut app = App {
            running: true,
            source,
            sampler: CpuSampler::new(),
            ticks_per_second: clock_ticks_per_second(),
            table: ProcessTable::new(sort),
            summary: SystemSummary::default(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            theme,
            color_support,
            cpu_history: VecDeque::with_capacity(sparkline_length),
            cpu_history_capacity: sparkline_length,
            keybinds,
        };
        app.refresh_data();
        app
    }

    /// One sampling tick: rebuild the machine summary and the process
    /// table. Both share the uptime read the summary already made so every
    /// record in the tick ages against the same instant.
    pub fn refresh_data(&mut self) {
        #[cfg(feature = "sample-tracing")]
        let _span = tracing::debug_span!("app.refresh_data").entered();

        self.summary = SystemSummary::refresh(self.source.as_ref(), &mut self.sampler);
        self.table.refresh(
            self.source.as_ref(),
            self.summary.uptime_seconds,
            self.ticks_per_second,
        );

        let cpu_val = (self.summary.cpu_utilization * 100.0) as u64;
        if self.cpu_history.len() == self.cpu_history_capacity {
            self.cpu_history.pop_front();
        }
        self.cpu_history.push_back(cpu_val);

        self.clamp_selection();
    }

    /// Records matching the active filter, in table order. The filter
    /// matches command line and user name, case-insensitively.
    pub fn visible_records(&self) -> Vec<&ProcessRecord> {
        let filter_lower = self.filter_text.to_lowercase();
        self.table
            .records()
            .iter()
            .filter(|r| {
                filter_lower.is_empty()
                    || r.command.to_lowercase().contains(&filter_lower)
                    || r.user.to_lowercase().contains(&filter_lower)
            })
            .collect()
    }

    pub fn selected_record(&self) -> Option<&ProcessRecord> {
        self.visible_records().get(self.selected_index).copied()
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Arrow keys are hardwired (not configurable)
        if let KeyCode::Up = code {
            return Action::Navigate(Direction::Up);
        }
        if let KeyCode::Down = code {
            return Action::Navigate(Direction::Down);
        }

        if code == KeyCode::Esc && !self.filter_text.is_empty() {
            return Action::ClearFilter;
        }
        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return Action::EnterFilterMode;
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.cycle_theme {
            return Action::CycleTheme;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::EnterFilterMode => {
                self.input_mode = InputMode::Filter;
            }
            Action::ExitFilterMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.clamp_selection();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.clamp_selection();
            }
            Action::CycleSortMode => {
                self.table.set_sort_key(self.table.sort_key().next());
                self.selected_index = 0;
            }
            Action::CycleTheme => {
                self.theme = self.theme.next(self.color_support);
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => {
                self.refresh_data();
            }
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let visible = self.visible_records().len();
        if visible == 0 {
            return;
        }
        match direction {
            Direction::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            Direction::Down => {
                self.selected_index = (self.selected_index + 1).min(visible - 1);
            }
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_records().len();
        if self.selected_index >= visible {
            self.selected_index = visible.saturating_sub(1);
        }
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }
}
