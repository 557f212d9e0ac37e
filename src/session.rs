//! One running news session: both channels, the favourites store and the
//! cancellation token that ends them all.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::connectivity::ConnectivityGate;
use crate::favorites::FavoritesStore;
use crate::paging::{Channel, PaginatedResource};
use crate::source::{Article, NewsSource};

pub struct NewsSession {
    headlines: Arc<PaginatedResource>,
    search: Arc<PaginatedResource>,
    favorites: Arc<dyn FavoritesStore>,
    cancel: CancellationToken,
}

impl NewsSession {
    pub fn new(
        source: Arc<dyn NewsSource>,
        gate: ConnectivityGate,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let resource = |channel| {
            Arc::new(PaginatedResource::new(
                channel,
                Arc::clone(&source),
                gate.clone(),
                cancel.child_token(),
            ))
        };

        Self {
            headlines: resource(Channel::Headlines),
            search: resource(Channel::Search),
            favorites,
            cancel,
        }
    }

    /// Create the session and request the first headline page for `country`.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(
        source: Arc<dyn NewsSource>,
        gate: ConnectivityGate,
        favorites: Arc<dyn FavoritesStore>,
        country: &str,
    ) -> Self {
        let session = Self::new(source, gate, favorites);
        tracing::info!(country, "news session started");
        session.load_headlines(country);
        session
    }

    pub fn headlines(&self) -> &Arc<PaginatedResource> {
        &self.headlines
    }

    pub fn search(&self) -> &Arc<PaginatedResource> {
        &self.search
    }

    pub fn resource(&self, channel: Channel) -> &Arc<PaginatedResource> {
        match channel {
            Channel::Headlines => &self.headlines,
            Channel::Search => &self.search,
        }
    }

    pub fn favorites(&self) -> &Arc<dyn FavoritesStore> {
        &self.favorites
    }

    /// Token cancelled at shutdown; children of it stop with the session.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fetch the next headline page in the background.
    pub fn load_headlines(&self, country: &str) -> JoinHandle<()> {
        self.spawn_request(Channel::Headlines, country)
    }

    /// Search for `query` in the background: a new query restarts paging,
    /// the same query fetches its next page.
    pub fn search_news(&self, query: &str) -> JoinHandle<()> {
        self.spawn_request(Channel::Search, query)
    }

    pub fn spawn_request(&self, channel: Channel, args: &str) -> JoinHandle<()> {
        let resource = Arc::clone(self.resource(channel));
        let args = args.to_string();
        tokio::spawn(async move { resource.request(&args).await })
    }

    pub fn add_to_favourites(&self, article: Article) -> JoinHandle<()> {
        let favorites = Arc::clone(&self.favorites);
        tokio::spawn(async move { favorites.upsert(article).await })
    }

    pub fn delete_favourite(&self, article: Article) -> JoinHandle<()> {
        let favorites = Arc::clone(&self.favorites);
        tokio::spawn(async move { favorites.delete(&article).await })
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel every in-flight request; nothing is published afterwards.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("news session shutting down");
            self.cancel.cancel();
        }
    }
}

impl Drop for NewsSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
