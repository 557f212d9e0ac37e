//! Application state for the terminal client.
//!
//! The app never talks to the network itself.  Key handling mutates it and
//! queues [`Command`]s, which `main` runs against the session; session
//! output comes back as [`PollMsg`]s.  Each list on screen is changed only
//! by applying a [`ListUpdate`] edit script.

use std::collections::HashSet;

use ratatui::widgets::ListState;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use livescroll_news::diff::{apply, ListDiffer, ListUpdate};
use livescroll_news::paging::Channel;
use livescroll_news::scroll::{is_last_page, PageFlags, ScrollTrigger, ScrollWindow};
use livescroll_news::source::{Article, NewsResponse};
use livescroll_news::State;

use crate::poll::PollMsg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Headlines,
    Search,
    Favorites,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Headlines, Tab::Search, Tab::Favorites];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Headlines => "Headlines",
            Tab::Search => "Search",
            Tab::Favorites => "Favourites",
        }
    }

    fn channel(self) -> Option<Channel> {
        match self {
            Tab::Headlines => Some(Channel::Headlines),
            Tab::Search => Some(Channel::Search),
            Tab::Favorites => None,
        }
    }

    fn of(channel: Channel) -> Tab {
        match channel {
            Channel::Headlines => Tab::Headlines,
            Channel::Search => Tab::Search,
        }
    }
}

/// Work for the session, produced by user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Request(Channel, String),
    Favourite(Article),
    Unfavourite(Article),
}

/// One rendered list and its paging flags.
pub struct Feed {
    pub articles: Vec<Article>,
    pub list_state: ListState,
    /// Rows available to the list in the last frame.
    pub viewport: usize,
    pub is_loading: bool,
    pub is_error: bool,
    pub is_last_page: bool,
    pub error: Option<String>,
    pub total_results: u32,
    trigger: ScrollTrigger,
    differ: ListDiffer,
}

impl Feed {
    fn new(
        page_size: u32,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<ListUpdate>) {
        let (differ, rx) = ListDiffer::new(cancel);
        let feed = Self {
            articles: Vec::new(),
            list_state: ListState::default(),
            viewport: 0,
            is_loading: false,
            is_error: false,
            is_last_page: false,
            error: None,
            total_results: 0,
            trigger: ScrollTrigger::new(page_size as usize),
            differ,
        };
        (feed, rx)
    }

    pub fn selected(&self) -> Option<&Article> {
        self.list_state.selected().and_then(|i| self.articles.get(i))
    }

    fn flags(&self) -> PageFlags {
        PageFlags {
            is_error: self.is_error,
            is_loading: self.is_loading,
            is_last_page: self.is_last_page,
        }
    }

    fn window(&self) -> ScrollWindow {
        let first_visible = if self.articles.is_empty() {
            -1
        } else {
            self.list_state.offset() as i64
        };
        ScrollWindow {
            first_visible,
            visible_count: self.viewport,
            total_count: self.articles.len(),
        }
    }

    fn apply_update(&mut self, update: &ListUpdate) {
        if let Err(e) = apply(&mut self.articles, &update.edits) {
            tracing::warn!("list out of sync ({e}), replacing wholesale");
            self.articles = update.list.as_ref().clone();
        }
        match self.list_state.selected() {
            Some(_) if self.articles.is_empty() => self.list_state.select(None),
            Some(i) if i >= self.articles.len() => {
                self.list_state.select(Some(self.articles.len() - 1))
            }
            _ => {}
        }
    }
}

pub struct App {
    pub tab: Tab,
    pub headlines: Feed,
    pub search: Feed,
    pub favorites: Feed,
    /// Search text being edited.
    pub query: String,
    pub editing_query: bool,
    /// Query of the last submitted search.
    pub submitted_query: Option<String>,
    favourite_keys: HashSet<String>,
    country: String,
    page_size: u32,
    commands: Vec<Command>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

/// List-update receivers to hand to the poller, one per tab.
pub type ListReceivers = Vec<(Tab, mpsc::UnboundedReceiver<ListUpdate>)>;

impl App {
    pub fn new(country: &str, page_size: u32, cancel: &CancellationToken) -> (Self, ListReceivers) {
        let (headlines, h_rx) = Feed::new(page_size, cancel.child_token());
        let (search, s_rx) = Feed::new(page_size, cancel.child_token());
        let (favorites, f_rx) = Feed::new(page_size, cancel.child_token());

        let app = Self {
            tab: Tab::Headlines,
            headlines,
            search,
            favorites,
            query: String::new(),
            editing_query: false,
            submitted_query: None,
            favourite_keys: HashSet::new(),
            country: country.to_string(),
            page_size,
            commands: Vec::new(),
            quit: false,
            status: "Starting…".into(),
        };
        let receivers = vec![
            (Tab::Headlines, h_rx),
            (Tab::Search, s_rx),
            (Tab::Favorites, f_rx),
        ];
        (app, receivers)
    }

    pub fn feed(&self, tab: Tab) -> &Feed {
        match tab {
            Tab::Headlines => &self.headlines,
            Tab::Search => &self.search,
            Tab::Favorites => &self.favorites,
        }
    }

    pub fn feed_mut(&mut self, tab: Tab) -> &mut Feed {
        match tab {
            Tab::Headlines => &mut self.headlines,
            Tab::Search => &mut self.search,
            Tab::Favorites => &mut self.favorites,
        }
    }

    pub fn current(&self) -> &Feed {
        self.feed(self.tab)
    }

    pub fn is_favourite(&self, article: &Article) -> bool {
        self.favourite_keys.contains(article.key())
    }

    /// Commands queued since the last call.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    // -- session output ------------------------------------------------------

    /// Apply one message from the poller.  Must run inside a tokio runtime
    /// context, since successes are handed to a background differ.
    pub fn handle(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::State {
                channel,
                state,
                next_page,
            } => self.on_state(channel, state, next_page),
            PollMsg::List(tab, update) => self.feed_mut(tab).apply_update(&update),
            PollMsg::Favourites(list) => {
                self.favourite_keys = list.iter().map(|a| a.key().to_string()).collect();
                self.favorites.differ.submit(list);
            }
        }
    }

    fn on_state(&mut self, channel: Channel, state: State<NewsResponse>, next_page: u32) {
        let page_size = self.page_size;
        let feed = self.feed_mut(Tab::of(channel));
        match state {
            State::Loading => {
                feed.is_loading = true;
                self.status = "Loading…".into();
            }
            State::Success(response) => {
                feed.is_loading = false;
                feed.is_error = false;
                feed.error = None;
                feed.total_results = response.total_results;
                feed.is_last_page = is_last_page(response.total_results, next_page, page_size);
                let count = response.articles.len();
                feed.differ.submit(response.articles);
                self.status = format!("{count} of {} articles", response.total_results);
            }
            State::Error(message) => {
                feed.is_loading = false;
                feed.is_error = true;
                feed.error = Some(message.clone());
                self.status = format!("Sorry error: {message}");
            }
        }
    }

    // -- navigation ----------------------------------------------------------

    /// Move down one item.  Each press counts as a fresh drag gesture, so at
    /// the end of the list it may request the next page.
    pub fn scroll_down(&mut self) {
        let feed = self.feed_mut(self.tab);
        feed.trigger.on_drag_start();
        select_next(feed);
        self.maybe_paginate();
    }

    pub fn select_previous(&mut self) {
        let feed = self.feed_mut(self.tab);
        if feed.articles.is_empty() {
            return;
        }
        let i = match feed.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        feed.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        let feed = self.feed_mut(self.tab);
        if !feed.articles.is_empty() {
            feed.list_state.select(Some(0));
        }
    }

    pub fn scroll_to_end(&mut self) {
        let feed = self.feed_mut(self.tab);
        if feed.articles.is_empty() {
            return;
        }
        feed.trigger.on_drag_start();
        let last = feed.articles.len() - 1;
        feed.list_state.select(Some(last));
        *feed.list_state.offset_mut() = last.saturating_sub(feed.viewport.saturating_sub(1));
        self.maybe_paginate();
    }

    fn maybe_paginate(&mut self) {
        let tab = self.tab;
        let Some(channel) = tab.channel() else {
            return;
        };
        let feed = self.feed_mut(tab);
        let (window, flags) = (feed.window(), feed.flags());
        if feed.trigger.on_scroll(window, flags) {
            self.request(channel);
        }
    }

    pub fn next_tab(&mut self) {
        let i = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.tab = Tab::ALL[(i + 1) % Tab::ALL.len()];
    }

    pub fn previous_tab(&mut self) {
        let i = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.tab = Tab::ALL[(i + Tab::ALL.len() - 1) % Tab::ALL.len()];
    }

    // -- actions -------------------------------------------------------------

    fn request(&mut self, channel: Channel) {
        let args = match channel {
            Channel::Headlines => Some(self.country.clone()),
            Channel::Search => self.submitted_query.clone(),
        };
        if let Some(args) = args {
            // Loading until the resource answers; stops repeat triggers in
            // the meantime.
            self.feed_mut(Tab::of(channel)).is_loading = true;
            self.commands.push(Command::Request(channel, args));
        }
    }

    /// Re-issue the current tab's request, e.g. after an error.
    pub fn retry(&mut self) {
        if let Some(channel) = self.tab.channel() {
            self.request(channel);
        }
    }

    pub fn start_query_edit(&mut self) {
        self.tab = Tab::Search;
        self.editing_query = true;
    }

    pub fn cancel_query_edit(&mut self) {
        self.editing_query = false;
    }

    pub fn submit_query(&mut self) {
        self.editing_query = false;
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.submitted_query = Some(query);
        self.search.list_state.select(None);
        self.request(Channel::Search);
    }

    pub fn toggle_favourite(&mut self) {
        let Some(article) = self.current().selected().cloned() else {
            return;
        };
        if self.is_favourite(&article) {
            self.status = format!("Removed \"{}\" from favourites", article.title);
            self.commands.push(Command::Unfavourite(article));
        } else {
            self.status = format!("Saved \"{}\" to favourites", article.title);
            self.commands.push(Command::Favourite(article));
        }
    }

    /// Show the selected article's link.
    pub fn open_selected(&mut self) {
        if let Some(article) = self.current().selected() {
            self.status = format!("{} | {}", article.source.name, article.url);
        }
    }
}

fn select_next(feed: &mut Feed) {
    if feed.articles.is_empty() {
        return;
    }
    let i = match feed.list_state.selected() {
        Some(i) => (i + 1).min(feed.articles.len() - 1),
        None => 0,
    };
    feed.list_state.select(Some(i));
    if feed.viewport > 0 && i >= feed.list_state.offset() + feed.viewport {
        *feed.list_state.offset_mut() = i + 1 - feed.viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_article(n: usize) -> Article {
        Article {
            title: format!("Story {n}"),
            url: format!("https://news.test/{n}"),
            ..Article::default()
        }
    }

    fn response(range: std::ops::Range<usize>, total: u32) -> NewsResponse {
        NewsResponse {
            articles: range.map(make_article).collect(),
            status: "ok".into(),
            total_results: total,
        }
    }

    fn app() -> (App, ListReceivers) {
        App::new("us", 20, &CancellationToken::new())
    }

    /// Feed a success through the differ and apply the resulting update.
    async fn succeed(
        app: &mut App,
        rx: &mut ListReceivers,
        channel: Channel,
        r: NewsResponse,
        next_page: u32,
    ) {
        app.handle(PollMsg::State {
            channel,
            state: State::Success(r),
            next_page,
        });
        let tab = Tab::of(channel);
        let (_, list_rx) = rx.iter_mut().find(|(t, _)| *t == tab).unwrap();
        let update = list_rx.recv().await.unwrap();
        app.handle(PollMsg::List(tab, update));
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let (app, receivers) = app();
        assert!(app.headlines.articles.is_empty());
        assert_eq!(app.tab, Tab::Headlines);
        assert!(!app.quit);
        assert_eq!(receivers.len(), 3);
    }

    // -- session output ------------------------------------------------------

    #[tokio::test]
    async fn success_updates_rendered_list_through_differ() {
        let (mut app, mut rx) = app();
        succeed(&mut app, &mut rx, Channel::Headlines, response(0..20, 1000), 2).await;

        assert_eq!(app.headlines.articles.len(), 20);
        assert!(!app.headlines.is_loading);
        assert!(!app.headlines.is_last_page);
        assert_eq!(app.headlines.total_results, 1000);
    }

    #[tokio::test]
    async fn last_page_flag_follows_formula() {
        let (mut app, mut rx) = app();
        succeed(&mut app, &mut rx, Channel::Headlines, response(0..20, 35), 3).await;
        assert!(app.headlines.is_last_page);
    }

    #[test]
    fn error_sets_flags_and_status() {
        let (mut app, _rx) = app();
        app.handle(PollMsg::State {
            channel: Channel::Search,
            state: State::Error("Unable to connect".into()),
            next_page: 1,
        });
        assert!(app.search.is_error);
        assert_eq!(app.search.error.as_deref(), Some("Unable to connect"));
        assert_eq!(app.status, "Sorry error: Unable to connect");
    }

    // -- pagination ----------------------------------------------------------

    #[tokio::test]
    async fn scrolling_past_the_end_requests_next_page_once() {
        let (mut app, mut rx) = app();
        succeed(&mut app, &mut rx, Channel::Headlines, response(0..20, 1000), 2).await;
        app.headlines.viewport = 10;
        app.take_commands();

        for _ in 0..25 {
            app.scroll_down();
        }
        assert_eq!(
            app.take_commands(),
            vec![Command::Request(Channel::Headlines, "us".into())]
        );

        // Loading blocks further requests until the page arrives.
        app.handle(PollMsg::State {
            channel: Channel::Headlines,
            state: State::Loading,
            next_page: 2,
        });
        app.scroll_down();
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn retry_reissues_current_request() {
        let (mut app, _rx) = app();
        app.retry();
        assert_eq!(
            app.take_commands(),
            vec![Command::Request(Channel::Headlines, "us".into())]
        );

        app.tab = Tab::Search;
        app.retry();
        assert!(app.take_commands().is_empty(), "nothing to retry without a query");
    }

    #[test]
    fn submitting_a_query_requests_search() {
        let (mut app, _rx) = app();
        app.start_query_edit();
        app.query = "  rust  ".into();
        app.submit_query();

        assert_eq!(app.tab, Tab::Search);
        assert!(!app.editing_query);
        assert_eq!(
            app.take_commands(),
            vec![Command::Request(Channel::Search, "rust".into())]
        );
    }

    // -- favourites ----------------------------------------------------------

    #[tokio::test]
    async fn toggle_favourite_depends_on_store_contents() {
        let (mut app, mut rx) = app();
        succeed(&mut app, &mut rx, Channel::Headlines, response(0..3, 3), 2).await;
        app.select_first();

        app.toggle_favourite();
        assert_eq!(app.take_commands(), vec![Command::Favourite(make_article(0))]);

        app.handle(PollMsg::Favourites(vec![make_article(0)]));
        app.toggle_favourite();
        assert_eq!(app.take_commands(), vec![Command::Unfavourite(make_article(0))]);
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn tabs_cycle_both_ways() {
        let (mut app, _rx) = app();
        app.next_tab();
        assert_eq!(app.tab, Tab::Search);
        app.next_tab();
        app.next_tab();
        assert_eq!(app.tab, Tab::Headlines);
        app.previous_tab();
        assert_eq!(app.tab, Tab::Favorites);
    }

    #[test]
    fn navigation_on_empty_is_noop() {
        let (mut app, _rx) = app();
        app.scroll_down();
        app.select_previous();
        app.select_first();
        app.scroll_to_end();
        assert!(app.headlines.list_state.selected().is_none());
        assert!(app.take_commands().is_empty());
    }
}
