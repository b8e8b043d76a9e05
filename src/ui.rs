//! Terminal UI rendering.
//!
//! All drawing lives here, separated from application state ([`App`]) and
//! input handling ([`crate::input`]).
//!
//! Layout, top to bottom: header (podcast + mode tabs), the current mode's
//! input fields, the results area (list + detail pane, or the duration
//! summary), and a one-line status bar.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Mode};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [header_area, inputs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(app, frame, header_area);
    draw_inputs(app, frame, inputs_area);
    match app.mode {
        Mode::Duration => draw_summary(app, frame, main_area),
        Mode::List | Mode::Search => {
            let [list_area, detail_area] =
                Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .areas(main_area);
            draw_results(app, frame, list_area);
            draw_detail(app, frame, detail_area);
        }
    }
    draw_status_bar(app, frame, status_area);
}

fn draw_header(app: &App, frame: &mut Frame, area: Rect) {
    let (name, url) = app
        .current_podcast()
        .map_or(("(no podcasts configured)", ""), |p| (p.name.as_str(), p.url.as_str()));

    let mut tabs = vec![Span::raw(" ")];
    for mode in Mode::ALL {
        let style = if mode == app.mode {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tabs.push(Span::styled(format!(" {} ", mode.label()), style));
        tabs.push(Span::raw(" "));
    }

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!(" {name}"), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(url, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(tabs),
    ]);
    frame.render_widget(header, area);
}

fn draw_inputs(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (i, label) in app.mode.field_labels().iter().enumerate() {
        let editing = app.editing == Some(i);
        let value_style = if editing {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if editing { "▏" } else { "" };

        spans.push(Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("{}{cursor}", app.inputs.field(app.mode, i)),
            value_style,
        ));
        spans.push(Span::raw("   "));
    }
    if app.mode == Mode::Search {
        let flag = if app.detail { "on" } else { "off" };
        spans.push(Span::styled(format!("detail: {flag}"), Style::default().fg(Color::DarkGray)));
    }

    let title = if app.editing.is_some() {
        " Editing (Tab: next field, Enter: apply, Esc: cancel) "
    } else {
        " Query (e: edit) "
    };
    let inputs = Paragraph::new(Line::from(spans))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(inputs, area);
}

/// Render the scrollable episode list.
fn draw_results(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let marker = if row.audio.is_some() { "♪ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(row.title_line.as_str(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let title = match &app.feed {
        Some(feed) if feed.len() == 1 => format!(" {} (1 episode) ", feed.title),
        Some(feed) => format!(" {} ({} episodes) ", feed.title, feed.len()),
        None if app.loading => " Loading… ".to_string(),
        None => " No feed ".to_string(),
    };

    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Audio, thumbnail, and (for detailed search hits) the cleaned body of the
/// selected episode.
fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let lines: Vec<Line> = match app.selected_row() {
        None => vec![Line::styled("Nothing selected", label)],
        Some(row) => {
            let mut lines = vec![Line::styled(row.title_line.as_str(), Style::default().add_modifier(Modifier::BOLD))];
            lines.push(match &row.audio {
                Some(audio) => Line::from(vec![
                    Span::styled("audio: ", label),
                    Span::raw(audio.href.as_str()),
                    Span::styled(
                        audio.mime_type.as_deref().map(|m| format!(" ({m})")).unwrap_or_default(),
                        label,
                    ),
                ]),
                None => Line::styled("no audio", label),
            });
            if !row.thumbnail.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("thumbnail: ", label),
                    Span::raw(row.thumbnail.as_str()),
                ]));
            }
            if let Some(body) = &row.body {
                lines.push(Line::raw(""));
                lines.extend(body.lines().map(Line::raw));
            }
            lines
        }
    };

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" Episode ").borders(Borders::ALL));
    frame.render_widget(detail, area);
}

fn draw_summary(app: &App, frame: &mut Frame, area: Rect) {
    let lines = match &app.summary {
        Some(result) => vec![
            Line::styled(
                format!("{} ({})", result.total_hms(), result.episodes_label()),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Line::raw(format!("(x1.3: {})", result.adjusted_hms())),
        ],
        None => vec![Line::styled(
            "No total: set a valid date range (e)",
            Style::default().fg(Color::DarkGray),
        )],
    };

    let summary = Paragraph::new(lines)
        .block(Block::default().title(" Listening time ").borders(Borders::ALL));
    frame.render_widget(summary, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status_style = if app.status.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), status_style),
        Span::raw("  q: quit  Tab: mode  [/]: podcast  e: edit  d: detail  o: play  r: reload"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Podcast;
    use crate::episode::{Feed, FeedEntry};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app_with_feed() -> App {
        let mut app = App::new(
            vec![Podcast { name: "Cast".into(), url: "https://example.com/rss".into() }],
            0,
        );
        let (_, generation) = app.begin_load().unwrap();
        app.on_loaded(
            generation,
            Feed {
                title: "Cast".into(),
                entries: vec![FeedEntry {
                    published: "Mon, 01 Jan 2024 09:00:00 +0900".into(),
                    title: "Pilot".into(),
                    duration: Some("12:34".into()),
                    ..FeedEntry::default()
                }],
                default_image: None,
            },
        );
        app
    }

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol().chars().next().unwrap_or(' ')).collect()
    }

    #[test]
    fn draw_does_not_panic_without_podcasts() {
        let mut app = App::new(Vec::new(), 0);
        let text = render(&mut app);
        assert!(text.contains("no podcasts configured"));
    }

    #[test]
    fn draw_list_shows_title_lines() {
        let mut app = app_with_feed();
        let text = render(&mut app);
        assert!(text.contains("Cast (1 episode)"));
        assert!(text.contains("1: 2024-01-01 Pilot"));
        assert!(text.contains("no audio"));
    }

    #[test]
    fn draw_duration_shows_totals() {
        let mut app = app_with_feed();
        app.inputs.from_date = "2024-01-01".into();
        app.inputs.to_date = "2024-01-01".into();
        app.mode = Mode::Duration;
        app.recompute();

        let text = render(&mut app);
        assert!(text.contains("00:12:34 (1 episode)"));
        assert!(text.contains("(x1.3: 00:09:40)"));
    }
}
