//! The paginated resource controller.
//!
//! One instance per channel.  Requests on the same channel are queued: a
//! request waits for the previous one to finish (tokio's mutex is FIFO) and
//! only then publishes `Loading`, checks connectivity and picks the page to
//! fetch, so every fetch sees the context left by the one before it.  Channels never share a lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::{PaginationContext, QueryTracker, Ticket};
use crate::connectivity::ConnectivityGate;
use crate::error::{FailureKind, FetchError};
use crate::source::{NewsResponse, NewsSource};
use crate::state::State;

/// Which independent stream a resource serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Top headlines; request argument is a country code.
    Headlines,
    /// Free-text search; request argument is the query.
    Search,
}

pub struct PaginatedResource {
    channel: Channel,
    source: Arc<dyn NewsSource>,
    gate: ConnectivityGate,
    context: Mutex<PaginationContext>,
    turn: tokio::sync::Mutex<()>,
    state: watch::Sender<State<NewsResponse>>,
    cancel: CancellationToken,
}

impl PaginatedResource {
    pub fn new(
        channel: Channel,
        source: Arc<dyn NewsSource>,
        gate: ConnectivityGate,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(State::Loading);
        Self {
            channel,
            source,
            gate,
            context: Mutex::new(PaginationContext::new()),
            turn: tokio::sync::Mutex::new(()),
            state,
            cancel,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Receiver for published states.  Only the latest state is retained.
    pub fn subscribe(&self) -> watch::Receiver<State<NewsResponse>> {
        self.state.subscribe()
    }

    /// Most recently published state.
    pub fn state(&self) -> State<NewsResponse> {
        self.state.borrow().clone()
    }

    /// Current page counter.
    pub fn page(&self) -> u32 {
        self.context().page()
    }

    /// Page the next continuing request will fetch.
    pub fn next_page(&self) -> u32 {
        self.context().page()
    }

    pub fn accumulated(&self) -> Option<NewsResponse> {
        self.context().accumulated().cloned()
    }

    /// Fetch the next page for `args` and publish the outcome.
    ///
    /// Waits for earlier requests on this channel, then publishes `Loading`
    /// followed by exactly one of `Success` or `Error`.  If the resource is
    /// cancelled first, nothing further is published and the context is left
    /// untouched.
    pub async fn request(&self, args: &str) {
        if self.cancel.is_cancelled() {
            return;
        }

        let _turn = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return,
            turn = self.turn.lock() => turn,
        };
        // Published once this request owns the channel, so an earlier
        // request's outcome cannot overwrite it while this fetch is pending.
        self.publish(State::Loading);

        if !self.gate.is_connected() {
            tracing::warn!(channel = ?self.channel, "no usable network, skipping fetch");
            self.publish(State::Error(FailureKind::NoConnectivity.message()));
            return;
        }

        let ticket = self.ticket(args);
        tracing::debug!(channel = ?self.channel, args, page = ticket.page, "fetching page");

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(channel = ?self.channel, "fetch cancelled");
                return;
            }
            result = self.fetch(args, ticket.page) => result,
        };

        if self.cancel.is_cancelled() {
            return;
        }

        match fetched {
            Ok(page) => {
                let received = page.articles.len();
                let accumulated = self.absorb(&ticket, page);
                tracing::debug!(
                    channel = ?self.channel,
                    received,
                    total = accumulated.articles.len(),
                    "page merged"
                );
                self.publish(State::Success(accumulated));
            }
            Err(err) => {
                let kind = FailureKind::from(&err);
                tracing::warn!(channel = ?self.channel, error = %err, "fetch failed");
                self.publish(State::Error(kind.message()));
            }
        }
    }

    async fn fetch(&self, args: &str, page: u32) -> Result<NewsResponse, FetchError> {
        match self.channel {
            Channel::Headlines => self.source.headlines(args, page).await,
            Channel::Search => self.source.search(args, page).await,
        }
    }

    fn ticket(&self, args: &str) -> Ticket {
        let ctx = self.context();
        match self.channel {
            Channel::Headlines => Ticket {
                query: args.to_string(),
                page: ctx.page(),
                fresh: false,
            },
            Channel::Search => QueryTracker::begin(&ctx, args),
        }
    }

    fn absorb(&self, ticket: &Ticket, page: NewsResponse) -> NewsResponse {
        let mut ctx = self.context();
        match self.channel {
            Channel::Headlines => ctx.advance(page).clone(),
            Channel::Search => QueryTracker::finish(&mut ctx, ticket, page).clone(),
        }
    }

    fn publish(&self, state: State<NewsResponse>) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.state.send_replace(state);
    }

    fn context(&self) -> MutexGuard<'_, PaginationContext> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
