use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Cell, Row, Table, TableState};

use crate::format::{format_elapsed, format_percent, truncate_unicode};
use crate::system::process::ProcessRecord;
use crate::system::table::SortKey;
use crate::ui::theme::Theme;

const PID_WIDTH: u16 = 7;
const USER_WIDTH: u16 = 10;
const CPU_WIDTH: u16 = 6;
const RAM_WIDTH: u16 = 9;
const TIME_WIDTH: u16 = 9;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    records: &[&ProcessRecord],
    selected: usize,
    sort_key: SortKey,
    theme: &Theme,
) {
    let header_style = Style::default()
        .fg(theme.table_header_fg)
        .add_modifier(Modifier::BOLD);
    let sorted_style = header_style.add_modifier(Modifier::UNDERLINED);

    let column = |title: &'static str, key: SortKey| {
        let style = if key == sort_key {
            sorted_style
        } else {
            header_style
        };
        Cell::from(title).style(style)
    };

    let header = Row::new(vec![
        column("PID", SortKey::Pid),
        Cell::from("USER").style(header_style),
        column("CPU%", SortKey::Cpu),
        column("RAM", SortKey::Memory),
        column("TIME+", SortKey::Age),
        Cell::from("COMMAND").style(header_style),
    ])
    .height(1);

    // Width left for the command column after the fixed ones and the
    // single-space column gaps.
    let fixed: u16 = PID_WIDTH + USER_WIDTH + CPU_WIDTH + RAM_WIDTH + TIME_WIDTH + 5;
    let command_width = area.width.saturating_sub(fixed) as usize;

    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.pid.to_string())
                    .style(Style::default().fg(theme.text_secondary)),
                Cell::from(truncate_unicode(&record.user, USER_WIDTH as usize))
                    .style(Style::default().fg(theme.text_primary)),
                Cell::from(format_percent(record.cpu))
                    .style(Style::default().fg(theme.heat_for(record.cpu))),
                Cell::from(record.ram.clone()).style(Style::default().fg(theme.text_primary)),
                Cell::from(format_elapsed(record.age_seconds))
                    .style(Style::default().fg(theme.text_primary)),
                Cell::from(truncate_unicode(&record.command, command_width))
                    .style(Style::default().fg(theme.text_primary)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(PID_WIDTH),
            Constraint::Length(USER_WIDTH),
            Constraint::Length(CPU_WIDTH),
            Constraint::Length(RAM_WIDTH),
            Constraint::Length(TIME_WIDTH),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .fg(theme.selection_fg)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default().with_selected(if records.is_empty() {
        None
    } else {
        Some(selected.min(records.len() - 1))
    });

    frame.render_stateful_widget(table, area, &mut state);
}
