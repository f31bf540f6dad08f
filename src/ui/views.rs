//! Drill-down content rendering.
//!
//! One renderer per hierarchy depth: games, sections, and categories are
//! name lists; runs are a table with runner, time, and video columns.

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate;

/// Maximum characters of a video URL shown in the table
const VIDEO_COLUMN_WIDTH: usize = 40;

pub fn render_games(frame: &mut Frame, app: &App, area: Rect) {
    if app.leaderboard.games.is_empty() {
        render_empty(frame, app, area);
        return;
    }
    let names: Vec<&str> = app.leaderboard.games.iter().map(|g| g.name.as_str()).collect();
    render_name_list(frame, app, area, " Games ", &names);
}

pub fn render_sections(frame: &mut Frame, app: &App, area: Rect) {
    let names: Vec<&str> = app
        .current_game()
        .map(|g| g.sections.iter().map(|s| s.name.as_str()).collect())
        .unwrap_or_default();
    render_name_list(frame, app, area, " Sections ", &names);
}

pub fn render_categories(frame: &mut Frame, app: &App, area: Rect) {
    let names: Vec<&str> = app
        .current_section()
        .map(|s| s.categories.iter().map(|c| c.name.as_str()).collect())
        .unwrap_or_default();
    render_name_list(frame, app, area, " Categories ", &names);
}

pub fn render_runs(frame: &mut Frame, app: &App, area: Rect) {
    let runs = app.current_category().map(|c| c.runs.as_slice()).unwrap_or(&[]);

    let header = Row::new([Cell::from("Runner"), Cell::from("Time"), Cell::from("Video")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = runs
        .iter()
        .map(|run| {
            // A run without video proof gets an empty cell, not an error
            let video = run
                .video
                .as_deref()
                .map(|v| truncate(v, VIDEO_COLUMN_WIDTH))
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(run.runner.as_str()),
                Cell::from(run.time.as_str()),
                Cell::from(video),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(30), // Runner
        Constraint::Length(12),     // Time
        Constraint::Fill(1),        // Video
    ];

    let title = format!(" Runs ({}) ", runs.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_name_list(frame: &mut Frame, app: &App, area: Rect, title: &str, names: &[&str]) {
    let items: Vec<ListItem> = names
        .iter()
        .map(|name| ListItem::new(*name).style(styles::list_item_style()))
        .collect();

    let title = format!("{}({}) ", title, names.len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style())
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Shown instead of the game list when no data is available yet.
fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match app.status_message.as_deref() {
        Some(msg) if msg.starts_with("Failed") => (msg.to_string(), styles::error_style()),
        _ if app.refreshing => ("Loading leaderboard data...".to_string(), styles::muted_style()),
        _ => ("No leaderboard data. Press [u] to refresh.".to_string(), styles::muted_style()),
    };

    let paragraph = Paragraph::new(text).style(style).block(
        Block::default()
            .title(" Games (0) ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );
    frame.render_widget(paragraph, area);
}
