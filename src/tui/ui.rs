use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use super::state::{AppScreen, AppState, NotificationKind, Theme};
use crate::models::{Outcome, RequestState};

pub(crate) const NO_RESULTS_MESSAGE: &str = "No quotes found matching your criteria.";
const SHORTCUT_HINT: &str = "Keyboard shortcuts: (N)ew quote, (C)opy, (S)ave, (/) Search";

/// Colors for one theme.
struct Palette {
    background: Color,
    text: Color,
    accent: Color,
    secondary: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: Color::Rgb(0xDC, 0xD7, 0xC9),
            text: Color::Rgb(0x2C, 0x36, 0x39),
            accent: Color::Rgb(0xA2, 0x7B, 0x5C),
            secondary: Color::Rgb(0x3F, 0x4E, 0x4F),
        },
        Theme::Dark => Palette {
            background: Color::Rgb(0x1A, 0x1A, 0x1A),
            text: Color::White,
            accent: Color::Rgb(0xA2, 0x7B, 0x5C),
            secondary: Color::Rgb(0x9A, 0xA6, 0xA7),
        },
    }
}

/// Main render function that dispatches to the appropriate screen renderer.
pub fn render(f: &mut Frame, state: &AppState) {
    let colors = palette(state.theme);
    f.render_widget(
        Block::default().style(Style::default().bg(colors.background)),
        f.area(),
    );

    match state.screen {
        AppScreen::Quote | AppScreen::Search => render_quote_screen(f, state, &colors),
        AppScreen::Favorites => render_favorites(f, state, &colors),
    }
}

/// Render the quote screen.
fn render_quote_screen(f: &mut Frame, state: &AppState, colors: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(f.area());

    let title = Paragraph::new("QuoteSphere")
        .style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let tabs = Tabs::new(state.categories.iter().map(|c| Line::from(c.as_str())))
        .select(state.selected_category)
        .style(Style::default().fg(colors.secondary))
        .highlight_style(
            Style::default()
                .fg(colors.background)
                .bg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" Category "));
    f.render_widget(tabs, chunks[1]);

    render_search_box(f, chunks[2], state, colors);
    render_quote_body(f, chunks[3], state, colors);

    let help_text = match state.screen {
        AppScreen::Search => "Type to search | Enter/Esc: Done",
        _ => "n: New | c: Copy | s: Save | h: Share | /: Search | ←/→: Category | f: Favorites | t: Theme | q: Quit",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(colors.secondary))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);

    render_status_bar(f, chunks[5], state, colors);
}

fn render_search_box(f: &mut Frame, area: Rect, state: &AppState, colors: &Palette) {
    let focused = state.screen == AppScreen::Search;
    let border = if focused { colors.accent } else { colors.secondary };
    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let input = Paragraph::new(state.search_query.as_str())
        .style(Style::default().fg(colors.text))
        .block(block);
    f.render_widget(input, area);

    if focused {
        let cursor_x = area.x + state.search_cursor_position as u16 + 1;
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_quote_body(f: &mut Frame, area: Rect, state: &AppState, colors: &Palette) {
    let block = Block::default().borders(Borders::ALL);

    let lines: Vec<Line> = match &state.request {
        RequestState::Idle => vec![Line::from("Press n for a quote.")],
        RequestState::Loading { attempt, .. } => {
            let msg = if *attempt > 1 {
                format!("Loading... (attempt {attempt})")
            } else {
                "Loading...".to_string()
            };
            vec![Line::from(Span::styled(msg, Style::default().fg(colors.accent)))]
        }
        RequestState::Succeeded(Outcome::Found(quote)) => {
            let mut lines: Vec<Line> = quote
                .text
                .lines()
                .map(|l| {
                    Line::from(Span::styled(
                        l.to_string(),
                        Style::default().fg(colors.text).add_modifier(Modifier::ITALIC),
                    ))
                })
                .collect();
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("- {}", quote.author),
                Style::default().fg(colors.secondary).add_modifier(Modifier::BOLD),
            )));
            if let Some(category) = quote.category() {
                lines.push(Line::from(Span::styled(
                    category.to_string(),
                    Style::default().fg(colors.accent),
                )));
            }
            lines
        }
        RequestState::Succeeded(Outcome::NoResults) => vec![Line::from(NO_RESULTS_MESSAGE)],
        RequestState::Failed(failure) => vec![Line::from(Span::styled(
            failure.message.clone(),
            Style::default().fg(Color::Red),
        ))],
    };

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(body, area);
}

/// Render the favorites list.
fn render_favorites(f: &mut Frame, state: &AppState, colors: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(f.area());

    let title = Paragraph::new(format!("Favorites ({})", state.favorites.len()))
        .style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let rows: Vec<Row> = state
        .favorites
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let style = if i == state.favorites_selection {
                Style::default()
                    .fg(colors.background)
                    .bg(colors.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text)
            };
            Row::new(vec![
                Cell::from(truncate(&q.text, 60)),
                Cell::from(q.author.clone()),
                Cell::from(q.category().unwrap_or("").to_string()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(30),
            Constraint::Length(22),
            Constraint::Length(14),
        ],
    )
    .header(
        Row::new(vec!["Quote", "Author", "Category"])
            .style(Style::default().fg(colors.secondary).add_modifier(Modifier::BOLD))
            .bottom_margin(1),
    )
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(table, chunks[1]);

    let help = Paragraph::new("Up/Down: Navigate | d: Remove | Esc: Back | q: Quit")
        .style(Style::default().fg(colors.secondary))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);

    render_status_bar(f, chunks[3], state, colors);
}

/// Render the status bar at the bottom.
fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState, colors: &Palette) {
    let (text, style) = if let Some(n) = &state.notification {
        let color = match n.kind {
            NotificationKind::Info => Color::Green,
            NotificationKind::Error => Color::Red,
        };
        (format!(" {}", n.message), Style::default().fg(color))
    } else if state.hint_until.is_some() {
        (format!(" {SHORTCUT_HINT}"), Style::default().fg(colors.secondary))
    } else {
        let query = state.coordinator.active_query();
        let mut parts = vec![format!("Category: {}", state.active_category())];
        if !query.search_term.is_empty() {
            parts.push(format!("search: '{}'", query.search_term));
        }
        (format!(" {}", parts.join(" | ")), Style::default().fg(colors.secondary))
    };

    let status = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 8), "ééééé...");
    }
}
