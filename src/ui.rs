//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a tab bar, an optional query line (Search tab only), the
//!   current tab's list and a one-line status bar.
//! * The list records its height in [`Feed::viewport`](crate::app::Feed), which
//!   the scroll trigger reads on the next key press.
//! * Colours and styles are defined inline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Tab};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let query_height = if app.tab == Tab::Search { 1 } else { 0 };
    let [tabs_area, query_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(query_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(app, frame, tabs_area);
    if app.tab == Tab::Search {
        draw_query(app, frame, query_area);
    }
    draw_article_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn draw_query(app: &App, frame: &mut Frame, area: Rect) {
    let style = if app.editing_query {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if app.editing_query { "_" } else { "" };
    let line = Line::from(vec![
        Span::styled(" search: ", style),
        Span::raw(format!("{}{cursor}", app.query)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the current tab's article list.
fn draw_article_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let tab = app.tab;
    let list_items: Vec<ListItem> = app
        .current()
        .articles
        .iter()
        .map(|article| {
            let date_str = article
                .published()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "no date".into());
            let star = if app.is_favourite(article) { "★ " } else { "  " };

            let line = Line::from(vec![
                Span::styled(star, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:<18}", date_str),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(article.title.clone(), Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", article.source.name),
                    Style::default().fg(Color::Cyan),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(format!(" {} ", tab.title()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    let feed = app.feed_mut(tab);
    // Borders take two rows.
    feed.viewport = area.height.saturating_sub(2) as usize;
    frame.render_stateful_widget(list, area, &mut feed.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let feed = app.current();
    let activity = if feed.is_loading {
        Span::styled("loading", Style::default().fg(Color::Blue))
    } else if feed.is_error {
        Span::styled("error (r: retry)", Style::default().fg(Color::Red))
    } else {
        Span::raw("")
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} items", feed.articles.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        activity,
        Span::raw("  q: quit  ↑/↓: scroll  tab: switch  /: search  f: favourite"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use livescroll_news::source::{Article, ArticleSource};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio_util::sync::CancellationToken;

    fn sample_articles() -> Vec<Article> {
        (0..3)
            .map(|n| Article {
                source: ArticleSource {
                    id: None,
                    name: "Wire".into(),
                },
                title: format!("Story {n}"),
                url: format!("https://news.test/{n}"),
                published_at: "2024-05-01T12:00:00Z".into(),
                ..Article::default()
            })
            .collect()
    }

    fn app() -> App {
        App::new("us", 20, &CancellationToken::new()).0
    }

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draw_does_not_panic_with_no_items() {
        let mut app = app();
        render(&mut app);
    }

    #[test]
    fn draw_records_viewport_height() {
        let mut app = app();
        app.headlines.articles = sample_articles();
        app.select_first();
        render(&mut app);
        // 24 rows less tabs, status and the list borders.
        assert_eq!(app.headlines.viewport, 20);
    }

    #[test]
    fn draw_status_shows_item_count() {
        let mut app = app();
        app.headlines.articles = sample_articles();
        app.status = "OK".to_string();

        let text = render(&mut app);
        assert!(text.contains("3 items"), "status bar should show item count");
        assert!(text.contains("2024-05-01 12:00"));
    }

    #[test]
    fn search_tab_shows_query_line() {
        let mut app = app();
        app.start_query_edit();
        app.query = "rust".into();

        let text = render(&mut app);
        assert!(text.contains("search: rust_"));
    }
}
