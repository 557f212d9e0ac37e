//! Bridging session output to the UI thread.
//!
//! Forwarding tasks run on the tokio runtime, wait on the session's watch
//! channels and the differs' update channels, and send everything to the UI
//! thread over one [`mpsc`] channel that the main loop drains each tick.
//!
//! ## For contributors
//!
//! Every forwarder stops when the session's cancellation token fires or when
//! the receiving end is dropped, so no task outlives the UI.

use std::sync::mpsc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use livescroll_news::diff::ListUpdate;
use livescroll_news::paging::{Channel, PaginatedResource};
use livescroll_news::source::{Article, NewsResponse};
use livescroll_news::{NewsSession, State};

use crate::app::{ListReceivers, Tab};

/// Messages sent from the runtime to the UI thread.
pub enum PollMsg {
    /// A channel published a new state.  `next_page` is the page the next
    /// continuing request would fetch, read when the state was forwarded.
    State {
        channel: Channel,
        state: State<NewsResponse>,
        next_page: u32,
    },
    /// A differ applied an edit script to a tab's list.
    List(Tab, ListUpdate),
    /// The favourites store changed.
    Favourites(Vec<Article>),
}

/// Spawn the forwarding tasks.
///
/// Must be called within a tokio runtime.  Returns a receiver that the main
/// loop should drain on every tick.
pub fn spawn(session: &NewsSession, lists: ListReceivers) -> mpsc::Receiver<PollMsg> {
    let (tx, rx) = mpsc::channel();
    let cancel = session.cancel_token().clone();

    for channel in [Channel::Headlines, Channel::Search] {
        let resource = std::sync::Arc::clone(session.resource(channel));
        forward_states(resource, tx.clone(), cancel.clone());
    }

    for (tab, mut updates) in lists {
        let tx = tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    update = updates.recv() => match update {
                        Some(update) => {
                            if tx.send(PollMsg::List(tab, update)).is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });
    }

    let favourites = session.favorites().favourites();
    forward_watch(favourites, tx, cancel, PollMsg::Favourites);

    rx
}

fn forward_states(
    resource: std::sync::Arc<PaginatedResource>,
    tx: mpsc::Sender<PollMsg>,
    cancel: CancellationToken,
) {
    let channel = resource.channel();
    let states = resource.subscribe();
    forward_watch(states, tx, cancel, move |state| PollMsg::State {
        channel,
        state,
        next_page: resource.next_page(),
    });
}

/// Forward every change of `rx`, wrapped by `wrap`.
fn forward_watch<T, F>(
    mut rx: watch::Receiver<T>,
    tx: mpsc::Sender<PollMsg>,
    cancel: CancellationToken,
    wrap: F,
) where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) -> PollMsg + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let value = rx.borrow_and_update().clone();
                    if tx.send(wrap(value)).is_err() {
                        // If the receiver is gone the UI has exited.
                        break;
                    }
                }
            }
        }
    });
}
