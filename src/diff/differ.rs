//! Background diffing with latest-wins supersession.
//!
//! [`ListDiffer::submit`] snapshots the current list, computes the script on
//! tokio's blocking pool and applies it only if no newer list was submitted
//! in the meantime.  Application happens under one lock, so applied updates
//! are strictly sequential and reach the receiver in order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{diff, Edit};
use crate::source::Article;

/// One applied update: the script and the list it produced.
#[derive(Debug, Clone)]
pub struct ListUpdate {
    pub generation: u64,
    pub edits: Arc<[Edit]>,
    pub list: Arc<Vec<Article>>,
}

#[derive(Debug, Default)]
struct Current {
    generation: u64,
    list: Arc<Vec<Article>>,
}

#[derive(Clone)]
pub struct ListDiffer {
    current: Arc<Mutex<Current>>,
    updates: mpsc::UnboundedSender<ListUpdate>,
    cancel: CancellationToken,
}

impl ListDiffer {
    pub fn new(cancel: CancellationToken) -> (Self, mpsc::UnboundedReceiver<ListUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let differ = Self {
            current: Arc::new(Mutex::new(Current::default())),
            updates,
            cancel,
        };
        (differ, rx)
    }

    /// List as of the last applied update.
    pub fn current(&self) -> Arc<Vec<Article>> {
        Arc::clone(&self.lock().list)
    }

    /// Queue `next` as the new target list.
    ///
    /// Must be called within a tokio runtime.  The handle resolves to `true`
    /// if this submission was applied, `false` if it was superseded or
    /// cancelled.
    pub fn submit(&self, next: Vec<Article>) -> JoinHandle<bool> {
        let (generation, base) = {
            let mut current = self.lock();
            current.generation += 1;
            (current.generation, Arc::clone(&current.list))
        };
        let this = self.clone();

        tokio::spawn(async move {
            let job = tokio::task::spawn_blocking(move || {
                let edits = diff(&base, &next);
                (edits, next)
            });

            let (edits, next) = tokio::select! {
                biased;
                _ = this.cancel.cancelled() => return false,
                joined = job => match joined {
                    Ok(done) => done,
                    Err(e) => {
                        tracing::warn!("diff job failed: {e}");
                        return false;
                    }
                },
            };

            this.install(generation, edits, next)
        })
    }

    fn install(&self, generation: u64, edits: Vec<Edit>, next: Vec<Article>) -> bool {
        let mut current = self.lock();
        if self.cancel.is_cancelled() {
            return false;
        }
        if current.generation != generation {
            tracing::debug!(
                generation,
                latest = current.generation,
                "discarding superseded diff"
            );
            return false;
        }

        current.list = Arc::new(next);
        if !edits.is_empty() {
            tracing::debug!(generation, edits = edits.len(), "applying list update");
            let _ = self.updates.send(ListUpdate {
                generation,
                edits: edits.into(),
                list: Arc::clone(&current.list),
            });
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
