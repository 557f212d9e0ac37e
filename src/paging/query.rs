//! Query-change detection for the search channel.

use super::PaginationContext;
use crate::source::NewsResponse;

/// What a single search request was issued for.
///
/// Captured once, when the request gets its turn, and carried through the
/// fetch so that the merge compares against the query the request was made
/// with rather than whatever a later request recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub query: String,
    /// Page to fetch.
    pub page: u32,
    /// Whether the result starts a new accumulation.
    pub fresh: bool,
}

/// Decides between continuing and restarting a search accumulation.
///
/// A continuation fetches the current page counter and advances it after the
/// merge, as the headline channel does.  A fresh start always fetches page 1
/// and leaves the counter at 1, so the second request for a query fetches
/// page 1 again; repeated articles are kept, like any cross-page duplicate.
pub struct QueryTracker;

impl QueryTracker {
    /// Record `query` for a request about to fetch.
    pub fn begin(ctx: &PaginationContext, query: &str) -> Ticket {
        let fresh = ctx.accumulated().is_none() || ctx.query() != Some(query);
        let page = if fresh { 1 } else { ctx.page() };
        Ticket {
            query: query.to_string(),
            page,
            fresh,
        }
    }

    /// Fold a fetched page into the context according to `ticket`.
    pub fn finish<'a>(
        ctx: &'a mut PaginationContext,
        ticket: &Ticket,
        incoming: NewsResponse,
    ) -> &'a NewsResponse {
        if ticket.fresh {
            tracing::debug!(query = %ticket.query, "search query changed, restarting pagination");
            ctx.reset(&ticket.query, incoming)
        } else {
            ctx.advance(incoming)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::tests::page_of;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_search_is_fresh_page_one() {
        let ctx = PaginationContext::new();
        let ticket = QueryTracker::begin(&ctx, "ai");
        assert_eq!(
            ticket,
            Ticket {
                query: "ai".into(),
                page: 1,
                fresh: true
            }
        );
    }

    #[test]
    fn same_query_fetches_current_page_counter() {
        let mut ctx = PaginationContext::new();
        let t1 = QueryTracker::begin(&ctx, "ai");
        QueryTracker::finish(&mut ctx, &t1, page_of("ai1", 20, 100));
        assert_eq!(ctx.page(), 1);

        let t2 = QueryTracker::begin(&ctx, "ai");
        assert!(!t2.fresh);
        assert_eq!(t2.page, ctx.page());

        let acc = QueryTracker::finish(&mut ctx, &t2, page_of("ai1", 20, 100));
        assert_eq!(acc.articles.len(), 40);
        assert_eq!(ctx.page(), 2);

        let t3 = QueryTracker::begin(&ctx, "ai");
        assert_eq!(t3.page, 2);
    }

    #[test]
    fn changed_query_resets_even_mid_pagination() {
        let mut ctx = PaginationContext::new();
        for tag in ["ai1", "ai2", "ai3"] {
            let t = QueryTracker::begin(&ctx, "ai");
            QueryTracker::finish(&mut ctx, &t, page_of(tag, 20, 100));
        }
        assert_eq!(ctx.page(), 3);

        let ml = QueryTracker::begin(&ctx, "ml");
        assert_eq!(ml.page, 1, "a new query must fetch its first page");
        assert!(ml.fresh);

        let first_ml = page_of("ml1", 5, 5);
        let acc = QueryTracker::finish(&mut ctx, &ml, first_ml.clone()).clone();
        assert_eq!(acc, first_ml);
        assert_eq!(ctx.page(), 1);
        assert_eq!(ctx.query(), Some("ml"));
    }

    #[test]
    fn ticket_keeps_query_from_issue_time() {
        let mut ctx = PaginationContext::new();
        let t_ai = QueryTracker::begin(&ctx, "ai");
        // A later request for another query records itself, but the earlier
        // ticket still merges as "ai".
        let _t_ml = QueryTracker::begin(&ctx, "ml");
        QueryTracker::finish(&mut ctx, &t_ai, page_of("ai", 1, 1));
        assert_eq!(ctx.query(), Some("ai"));
    }
}
