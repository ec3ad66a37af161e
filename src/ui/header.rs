use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Sparkline};

use crate::format::format_elapsed;
use crate::system::summary::SystemSummary;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    summary: &SystemSummary,
    theme: &Theme,
    cpu_history: &VecDeque<u64>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_identity(frame, chunks[0], summary, theme);
    render_memory_gauge(frame, chunks[1], summary, theme);
    render_cpu_sparkline(frame, chunks[2], summary, theme, cpu_history);
}

/// Branding plus the static machine facts: OS, kernel, uptime, counts.
fn render_identity(frame: &mut Frame, area: Rect, summary: &SystemSummary, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.text_secondary));
    let value = |text: String| Span::styled(text, Style::default().fg(theme.text_primary));

    let lines = vec![
        Line::from(vec![
            Span::styled(
                " proctop ",
                Style::default()
                    .fg(theme.header_accent_fg)
                    .bg(theme.header_accent_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            value(summary.os_name.clone()),
        ]),
        Line::from(vec![
            label("kernel "),
            value(summary.kernel.clone()),
            label("  up "),
            value(format_elapsed(summary.uptime_seconds)),
        ]),
        Line::from(vec![
            label("procs "),
            value(summary.total_processes.to_string()),
            label("  running "),
            value(summary.running_processes.to_string()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_memory_gauge(frame: &mut Frame, area: Rect, summary: &SystemSummary, theme: &Theme) {
    let ratio = summary.memory_utilization.clamp(0.0, 1.0);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " MEM ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!("{:.1}%", ratio * 100.0));

    frame.render_widget(gauge, area);
}

fn render_cpu_sparkline(
    frame: &mut Frame,
    area: Rect,
    summary: &SystemSummary,
    theme: &Theme,
    cpu_history: &VecDeque<u64>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" CPU {:.1}% ", summary.cpu_utilization * 100.0),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let cpu_data: Vec<u64> = cpu_history.iter().copied().collect();
    let sparkline = Sparkline::default()
        .block(block)
        .data(&cpu_data)
        .max(100)
        .style(Style::default().fg(theme.sparkline_color));

    frame.render_widget(sparkline, area);
}
