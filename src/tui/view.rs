// File: src/tui/view.rs
use crate::model::{EventCategory, TemporalMode};
use crate::timeline::{POSITION_MAX, TimelineView};
use crate::tui::state::{AppState, InputMode, now};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
};
use strum::IntoEnumIterator;

const TRACK: char = '─';
const TICK: char = '┼';
const HANDLE: char = '●';

fn column(position: f64, width: usize) -> usize {
    let last = width.saturating_sub(1) as f64;
    ((position / POSITION_MAX) * last).round() as usize
}

/// Text rendering of the slider: a track with a tick per event and the handle.
pub fn slider_line(view: &TimelineView, position: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut cells = vec![TRACK; width];
    for event in view.events() {
        if let Some(p) = view.position_of(event) {
            cells[column(p, width).min(width - 1)] = TICK;
        }
    }
    let clamped = if position.is_nan() { 0.0 } else { position.clamp(0.0, POSITION_MAX) };
    cells[column(clamped, width).min(width - 1)] = HANDLE;
    cells.into_iter().collect()
}

fn category_color(category: EventCategory) -> Color {
    match category {
        EventCategory::Workshop => Color::Cyan,
        EventCategory::Talk => Color::Yellow,
        EventCategory::Exhibition => Color::Magenta,
        EventCategory::Activity => Color::Green,
    }
}

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let full_help_text = vec![
        Line::from(vec![
            Span::styled(
                " GLOBAL ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ?:Toggle Help  r:Reload  q:Quit"),
        ]),
        Line::from(vec![
            Span::styled(
                " TIMELINE ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" h/l or Left/Right:Scrub  0:Start  $:End  j/k:Up/Down"),
        ]),
        Line::from(vec![
            Span::styled(
                " FILTER ",
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Tab:Next Mode  1:All  2:Past  3:Upcoming  /:Search  Esc:Clear Search"),
        ]),
    ];

    let footer_height = if state.show_full_help {
        Constraint::Length(full_help_text.len() as u16 + 2)
    } else {
        Constraint::Length(3)
    };

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
            footer_height,
        ])
        .split(f.area());

    // --- 1. Mode tabs ---
    let modes: Vec<TemporalMode> = TemporalMode::iter().collect();
    let selected_tab = modes
        .iter()
        .position(|m| *m == state.temporal_mode)
        .unwrap_or(0);
    let tabs = Tabs::new(modes.iter().map(|m| m.label()).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL).title(" Events "))
        .select(selected_tab)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, v_chunks[0]);

    // --- 2. Slider ---
    let inner_width = v_chunks[1].width.saturating_sub(2) as usize;
    let slider = if state.view.is_empty() {
        vec![Line::from(""), Line::from("")]
    } else {
        let label = state.view.label_at(state.position).unwrap_or_default();
        vec![
            Line::from(Span::styled(
                slider_line(&state.view, state.position, inner_width),
                Style::default().fg(Color::Blue),
            )),
            Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
        ]
    };
    f.render_widget(
        Paragraph::new(slider).block(Block::default().borders(Borders::ALL).title(" Timeline ")),
        v_chunks[1],
    );

    // --- 3. List and details ---
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(v_chunks[2]);

    let clock = now();
    if state.loading && state.view.is_empty() {
        f.render_widget(
            Paragraph::new("Loading events...")
                .block(Block::default().borders(Borders::ALL).title(" Calendar ")),
            h_chunks[0],
        );
    } else if state.view.is_empty() {
        f.render_widget(
            Paragraph::new(state.view.empty_message())
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(" Calendar ")),
            h_chunks[0],
        );
    } else {
        let items: Vec<ListItem> = state
            .view
            .events()
            .iter()
            .map(|e| {
                let date_style = if e.is_past(clock) {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}  ", e.start.format(&state.date_format)), date_style),
                    Span::styled(
                        format!("[{}] ", e.category),
                        Style::default().fg(category_color(e.category)),
                    ),
                    Span::raw(e.title.clone()),
                    Span::styled(
                        format!("  ({})", e.call_to_action(clock)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let title = format!(" Calendar ({}) ", state.view.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, h_chunks[0], &mut state.list_state);
    }

    let details = match state.get_selected_event() {
        Some(e) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    e.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("When: {}", e.start.format(&state.date_format))),
                Line::from(format!("Category: {}", e.category)),
            ];
            if !e.location.is_empty() {
                lines.push(Line::from(format!("Where: {}", e.location)));
            }
            if !e.description.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(e.description.clone()));
            }
            lines
        }
        None => vec![Line::from("No details.")],
    };
    f.render_widget(
        Paragraph::new(details)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Details ")),
        h_chunks[1],
    );

    // --- 4. Footer ---
    let footer = match state.mode {
        InputMode::Searching => Paragraph::new(format!("/{}", state.input_buffer))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(" Search ")),
        InputMode::Normal if state.show_full_help => Paragraph::new(full_help_text)
            .block(Block::default().borders(Borders::ALL).title(" Help ")),
        InputMode::Normal => {
            let mut spans = vec![Span::raw(state.message.clone())];
            if !state.input_buffer.is_empty() {
                spans.push(Span::styled(
                    format!("  search: \"{}\"", state.input_buffer),
                    Style::default().fg(Color::Yellow),
                ));
            }
            spans.push(Span::styled(
                "  ?:Help",
                Style::default().fg(Color::DarkGray),
            ));
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL))
        }
    };
    f.render_widget(footer, v_chunks[3]);
}
