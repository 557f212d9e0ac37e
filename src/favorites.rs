//! Favourite articles.
//!
//! The store is keyed by article URL.  `upsert` inserts or replaces in place,
//! `delete` removes by key, and [`FavoritesStore::favourites`] hands out a
//! watch receiver that always holds the current ordered list.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::source::Article;

#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn upsert(&self, article: Article);
    async fn delete(&self, article: &Article);
    fn favourites(&self) -> watch::Receiver<Vec<Article>>;
}

/// Process-local store.
pub struct InMemoryFavorites {
    list: watch::Sender<Vec<Article>>,
}

impl InMemoryFavorites {
    pub fn new() -> Self {
        let (list, _) = watch::channel(Vec::new());
        Self { list }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.list.borrow().iter().any(|a| a.key() == key)
    }
}

impl Default for InMemoryFavorites {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavorites {
    async fn upsert(&self, mut article: Article) {
        article.favorited = true;
        self.list.send_modify(|list| {
            match list.iter_mut().find(|a| a.key() == article.key()) {
                Some(existing) => *existing = article,
                None => list.push(article),
            }
        });
    }

    async fn delete(&self, article: &Article) {
        self.list.send_if_modified(|list| {
            let before = list.len();
            list.retain(|a| a.key() != article.key());
            list.len() != before
        });
    }

    fn favourites(&self) -> watch::Receiver<Vec<Article>> {
        self.list.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(url: &str, title: &str) -> Article {
        Article {
            url: url.to_string(),
            title: title.to_string(),
            ..Article::default()
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_and_replaces_in_place() {
        let store = InMemoryFavorites::new();
        store.upsert(article("a", "A")).await;
        store.upsert(article("b", "B")).await;
        store.upsert(article("a", "A2")).await;
        store.upsert(article("a", "A2")).await;

        let list = store.favourites().borrow().clone();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "A2");
        assert_eq!(list[1].title, "B");
        assert!(list.iter().all(|a| a.favorited));
    }

    #[tokio::test]
    async fn delete_removes_by_key() {
        let store = InMemoryFavorites::new();
        store.upsert(article("a", "A")).await;
        store.upsert(article("b", "B")).await;

        store.delete(&article("a", "different title")).await;

        assert!(!store.contains("a"));
        assert!(store.contains("b"));
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let store = InMemoryFavorites::new();
        let mut rx = store.favourites();

        store.upsert(article("a", "A")).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.delete(&article("missing", "")).await;
        assert!(!rx.has_changed().unwrap(), "no-op delete should not notify");
    }
}
