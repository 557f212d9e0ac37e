//! Per-channel pagination.
//!
//! ```text
//!  request(args) ─► ConnectivityGate ─► NewsSource ─► merge / QueryTracker
//!                                                          │
//!                         watch::Sender<State<NewsResponse>> ◄┘
//! ```
//!
//! * [`PaginationContext`]: page counter plus accumulated response, owned by
//!   exactly one [`PaginatedResource`].
//! * [`merge`]: append a freshly fetched page to the accumulation.
//! * [`QueryTracker`]: decides, for the search channel, whether a request
//!   continues the current accumulation or starts a new one.
//! * [`PaginatedResource`]: the controller tying these together.

mod query;
mod resource;

pub use query::{QueryTracker, Ticket};
pub use resource::{Channel, PaginatedResource};

use crate::source::NewsResponse;

/// Pagination state of one channel.
///
/// The page number starts at 1 and only moves forward after a successful
/// merge, except for a search query-change reset which puts it back to 1 in
/// the same step that replaces the accumulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationContext {
    page: u32,
    accumulated: Option<NewsResponse>,
    query: Option<String>,
}

impl Default for PaginationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationContext {
    pub fn new() -> Self {
        Self {
            page: 1,
            accumulated: None,
            query: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn accumulated(&self) -> Option<&NewsResponse> {
        self.accumulated.as_ref()
    }

    /// Query the accumulation was built for (search channel only).
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Merge `incoming` and advance the page counter.
    pub fn advance(&mut self, incoming: NewsResponse) -> &NewsResponse {
        self.page += 1;
        let merged = merge(self.accumulated.take(), incoming);
        self.accumulated.insert(merged)
    }

    /// Discard the accumulation and start over from `incoming`, page 1.
    pub fn reset(&mut self, query: &str, incoming: NewsResponse) -> &NewsResponse {
        self.page = 1;
        self.query = Some(query.to_string());
        self.accumulated.insert(incoming)
    }
}

/// Combine the running accumulation with a newly fetched page.
///
/// The first page is taken as-is and its `total_results` becomes the frozen
/// total.  Later pages only contribute their articles, appended in arrival
/// order; status and total stay those of the first page.  Articles are not
/// de-duplicated across pages.
pub fn merge(accumulated: Option<NewsResponse>, incoming: NewsResponse) -> NewsResponse {
    match accumulated {
        None => incoming,
        Some(mut acc) => {
            acc.articles.extend(incoming.articles);
            acc
        }
    }
}
