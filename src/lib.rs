//! livescroll-news — paginated news fetching with live list updates.
//!
//! ## Architecture overview
//!
//! ```text
//!  scroll / retry / query            ┌──────────────────────┐
//!  ─────────────────────────────────►│  PaginatedResource   │ (one per channel)
//!                                    │  gate → fetch → merge│
//!                                    └──────────┬───────────┘
//!                                               │ watch: State<NewsResponse>
//!                                               ▼
//!                                    ┌──────────────────────┐  ListUpdate
//!                                    │  ListDiffer          │ ───────────► rendered list
//!                                    │  (blocking pool)     │
//!                                    └──────────────────────┘
//! ```
//!
//! * **`source/`** — the [`NewsSource`](source::NewsSource) fetch capability,
//!   the article types and the NewsAPI client.
//! * **`connectivity`** — the gate consulted before every fetch.
//! * **`paging`** — pagination context, page merging, query-change detection
//!   and the per-channel controller.
//! * **`scroll`** — when a list should ask for its next page.
//! * **`diff`** — minimal edit scripts and the background differ.
//! * **`favorites`** — the favourites store capability.
//! * **`session`** — both channels plus favourites under one cancellation
//!   token.
//! * **`config`**, **`logging`**, **`error`** — configuration file, log file setup and error types.

pub mod config;
pub mod connectivity;
pub mod diff;
pub mod error;
pub mod favorites;
pub mod logging;
pub mod paging;
pub mod scroll;
pub mod session;
pub mod source;
pub mod state;

pub use error::{FailureKind, FetchError};
pub use session::NewsSession;
pub use state::State;
