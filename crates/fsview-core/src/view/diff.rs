//! Keyed sequence diff.
//!
//! Compares two ordered sequences of `(key, stamp)` pairs and reports what a
//! list widget needs to go from one to the other: rows removed, rows
//! inserted, rows that kept their identity but changed position, and rows
//! whose stamp changed. Keys are expected to be unique within a sequence.

use std::collections::HashMap;
use std::hash::Hash;

/// A row that survived but changed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move<K> {
    pub key: K,
    pub from: usize,
    pub to: usize,
}

/// Difference between an old and a new sequence.
///
/// Indices in `removed` refer to the old sequence; indices in `inserted`,
/// `changed` and `Move::to` refer to the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<K> {
    pub removed: Vec<(usize, K)>,
    pub inserted: Vec<(usize, K)>,
    pub moved: Vec<Move<K>>,
    pub changed: Vec<(usize, K)>,
}

impl<K> Default for Diff<K> {
    fn default() -> Self {
        Self {
            removed: Vec::new(),
            inserted: Vec::new(),
            moved: Vec::new(),
            changed: Vec::new(),
        }
    }
}

impl<K> Diff<K> {
    /// Returns `true` when both sequences were identical.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
            && self.inserted.is_empty()
            && self.moved.is_empty()
            && self.changed.is_empty()
    }
}

/// Computes the [`Diff`] from `old` to `new`.
///
/// Moves are kept minimal: the surviving keys whose relative order is
/// preserved (a longest increasing subsequence of their old positions) stay
/// put and every other survivor is reported as moved.
pub fn diff<K, S>(old: &[(K, S)], new: &[(K, S)]) -> Diff<K>
where
    K: Eq + Hash + Clone,
    S: PartialEq,
{
    let old_index: HashMap<&K, usize> = old.iter().enumerate().map(|(i, (k, _))| (k, i)).collect();
    let new_index: HashMap<&K, usize> = new.iter().enumerate().map(|(i, (k, _))| (k, i)).collect();

    let mut result = Diff::default();

    for (i, (key, _)) in old.iter().enumerate() {
        if !new_index.contains_key(key) {
            result.removed.push((i, key.clone()));
        }
    }

    // (new position, old position) of every survivor, in new order
    let mut survivors: Vec<(usize, usize)> = Vec::new();
    for (i, (key, stamp)) in new.iter().enumerate() {
        match old_index.get(key) {
            None => result.inserted.push((i, key.clone())),
            Some(&from) => {
                if old[from].1 != *stamp {
                    result.changed.push((i, key.clone()));
                }
                survivors.push((i, from));
            }
        }
    }

    let old_positions: Vec<usize> = survivors.iter().map(|&(_, from)| from).collect();
    let stable = longest_increasing(&old_positions);
    for (&(to, from), keep) in survivors.iter().zip(stable) {
        if !keep {
            result.moved.push(Move {
                key: new[to].0.clone(),
                from,
                to,
            });
        }
    }

    result
}

/// Marks the members of one longest strictly increasing subsequence.
fn longest_increasing(seq: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, &value) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&t| seq[t] < value);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut marks = vec![false; seq.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        marks[i] = true;
        cursor = prev[i];
    }
    marks
}
