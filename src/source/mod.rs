//! Fetch capability.
//!
//! This module defines the [`NewsSource`] trait and the [`Article`] /
//! [`NewsResponse`] types.  The concrete HTTP implementation lives in
//! [`newsapi`].
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `gnews.rs`).
//! 2. Define a struct and implement [`NewsSource`] for it, converting the
//!    provider's payload into [`NewsResponse`] and its failures into
//!    [`FetchError`].
//! 3. Add `mod gnews;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of [`NewsApiClient`].
//!
//! Pagination, merging and diffing are source-agnostic.

mod article;
mod newsapi;

pub use article::{Article, ArticleSource, NewsResponse};
pub use newsapi::NewsApiClient;

use async_trait::async_trait;

use crate::error::FetchError;

/// Trait every news provider implements.
///
/// The paginated resources call it from tokio tasks, so implementations must
/// be `Send + Sync`.  Pages are 1-based.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Top headlines for a two-letter country code.
    async fn headlines(&self, country: &str, page: u32) -> Result<NewsResponse, FetchError>;

    /// Free-text search across all articles.
    async fn search(&self, query: &str, page: u32) -> Result<NewsResponse, FetchError>;
}
