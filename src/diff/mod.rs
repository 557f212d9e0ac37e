//! Minimal edit scripts between two article lists.
//!
//! Items are matched by key (the article URL); the n-th occurrence of a key
//! in the old list matches the n-th occurrence in the new list, so lists
//! with repeated articles still diff correctly.  A matched pair whose fields
//! differ produces an [`Edit::Update`].
//!
//! Scripts are ordered: removals (back to front), moves, insertions (front
//! to back), updates.  Every index refers to the list as it stands after
//! the preceding edits.  Matched items on a longest increasing run keep
//! their place; every other matched item moves exactly once.

mod differ;

pub use differ::{ListDiffer, ListUpdate};

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::source::Article;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Remove { index: usize },
    /// Remove the item at `from`, then insert it at `to`.
    Move { from: usize, to: usize },
    Insert { index: usize, article: Article },
    /// Same item, new content.
    Update { index: usize, article: Article },
}

/// An edit did not fit the list it was applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("edit {edit} addresses index {index} of a list of {len} items")]
pub struct ScriptMismatch {
    pub edit: usize,
    pub index: usize,
    pub len: usize,
}

type Identity<'a> = (&'a str, usize);

fn identities(list: &[Article]) -> Vec<Identity<'_>> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    list.iter()
        .map(|article| {
            let n = seen.entry(article.key()).or_insert(0);
            let id = (article.key(), *n);
            *n += 1;
            id
        })
        .collect()
}

/// Compute the edit script turning `old` into `new`.
pub fn diff(old: &[Article], new: &[Article]) -> Vec<Edit> {
    let old_ids = identities(old);
    let new_ids = identities(new);
    let old_index: HashMap<Identity, usize> =
        old_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let new_index: HashMap<Identity, usize> =
        new_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut edits = Vec::new();

    for (i, id) in old_ids.iter().enumerate().rev() {
        if !new_index.contains_key(id) {
            edits.push(Edit::Remove { index: i });
        }
    }

    // Survivors in their current order, named by their target index.
    let mut working: Vec<usize> = old_ids
        .iter()
        .filter_map(|id| new_index.get(id).copied())
        .collect();
    let anchored = longest_increasing(&working);

    let mut previous: Option<usize> = None;
    for (target, id) in new_ids.iter().enumerate() {
        if !old_index.contains_key(id) {
            continue;
        }
        if !anchored.contains(&target) {
            let from = position(&working, target);
            working.remove(from);
            let to = previous.map_or(0, |p| position(&working, p) + 1);
            working.insert(to, target);
            if from != to {
                edits.push(Edit::Move { from, to });
            }
        }
        previous = Some(target);
    }

    for (target, id) in new_ids.iter().enumerate() {
        if !old_index.contains_key(id) {
            edits.push(Edit::Insert {
                index: target,
                article: new[target].clone(),
            });
        }
    }

    for (target, id) in new_ids.iter().enumerate() {
        if let Some(&source) = old_index.get(id) {
            if old[source] != new[target] {
                edits.push(Edit::Update {
                    index: target,
                    article: new[target].clone(),
                });
            }
        }
    }

    edits
}

/// Apply `edits` to `list` in order.
///
/// On a mismatch the list is left partially edited; callers should fall
/// back to replacing it wholesale.
pub fn apply(list: &mut Vec<Article>, edits: &[Edit]) -> Result<(), ScriptMismatch> {
    for (n, edit) in edits.iter().enumerate() {
        let mismatch = |index: usize, len: usize| ScriptMismatch { edit: n, index, len };
        match edit {
            Edit::Remove { index } => {
                if *index >= list.len() {
                    return Err(mismatch(*index, list.len()));
                }
                list.remove(*index);
            }
            Edit::Move { from, to } => {
                if *from >= list.len() {
                    return Err(mismatch(*from, list.len()));
                }
                if *to >= list.len() {
                    return Err(mismatch(*to, list.len()));
                }
                let article = list.remove(*from);
                list.insert(*to, article);
            }
            Edit::Insert { index, article } => {
                if *index > list.len() {
                    return Err(mismatch(*index, list.len()));
                }
                list.insert(*index, article.clone());
            }
            Edit::Update { index, article } => match list.get_mut(*index) {
                Some(slot) => *slot = article.clone(),
                None => return Err(mismatch(*index, list.len())),
            },
        }
    }
    Ok(())
}

fn position(working: &[usize], target: usize) -> usize {
    working
        .iter()
        .position(|&t| t == target)
        .unwrap_or(working.len())
}

/// Values on one longest strictly increasing subsequence of `seq`.
fn longest_increasing(seq: &[usize]) -> HashSet<usize> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, &value) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&j| seq[j] < value);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut run = HashSet::new();
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        run.insert(seq[i]);
        cursor = prev[i];
    }
    run
}
