#![forbid(unsafe_code)]

//! Splice-move reordering for displayed lists.
//!
//! A reorder removes the element at `from` and reinserts it at `to`; every
//! element between the two positions shifts by one. It is never a swap.
//! Identities are untouched, only positions change.
//!
//! Invalid requests (`from == to`, either index out of range) are silent
//! no-ops reported through [`ReorderOutcome`] so pointer handlers can call
//! [`reorder`] on every hover without pre-validating.

use serde::{Deserialize, Serialize};

/// Result of one reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReorderOutcome {
    Moved { from: usize, to: usize },
    Noop { reason: ReorderNoopReason },
}

impl ReorderOutcome {
    #[must_use]
    pub const fn is_moved(self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Why a reorder request left the list untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderNoopReason {
    SameIndex,
    FromOutOfRange,
    ToOutOfRange,
}

/// An entry of a displayed sequence with a stable identity.
///
/// Implementors that also cache their own position override
/// [`set_index`](OrderedItem::set_index); [`reindex`] keeps that cache in sync.
pub trait OrderedItem {
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Debug;

    fn id(&self) -> Self::Id;

    fn set_index(&mut self, _index: usize) {}
}

/// Move `list[from]` to position `to`.
pub fn reorder<T>(list: &mut [T], from: usize, to: usize) -> ReorderOutcome {
    let len = list.len();
    if from >= len {
        return ReorderOutcome::Noop {
            reason: ReorderNoopReason::FromOutOfRange,
        };
    }
    if to >= len {
        return ReorderOutcome::Noop {
            reason: ReorderNoopReason::ToOutOfRange,
        };
    }
    if from == to {
        return ReorderOutcome::Noop {
            reason: ReorderNoopReason::SameIndex,
        };
    }

    // Equivalent to remove + insert, without the double shift.
    if from < to {
        list[from..=to].rotate_left(1);
    } else {
        list[to..=from].rotate_right(1);
    }
    ReorderOutcome::Moved { from, to }
}

/// Reorder and then refresh every item's cached index.
pub fn reorder_items<T: OrderedItem>(list: &mut [T], from: usize, to: usize) -> ReorderOutcome {
    let outcome = reorder(list, from, to);
    if let ReorderOutcome::Moved { from, to } = outcome {
        let (lo, hi) = if from < to { (from, to) } else { (to, from) };
        for (index, item) in list.iter_mut().enumerate().take(hi + 1).skip(lo) {
            item.set_index(index);
        }
    }
    outcome
}

/// Write each item's current position into its cached index.
pub fn reindex<T: OrderedItem>(list: &mut [T]) {
    for (index, item) in list.iter_mut().enumerate() {
        item.set_index(index);
    }
}

/// Position of the item with `id`, if present.
pub fn position_of<T: OrderedItem>(list: &[T], id: &T::Id) -> Option<usize> {
    list.iter().position(|item| &item.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Card {
        id: char,
        index: usize,
    }

    impl OrderedItem for Card {
        type Id = char;

        fn id(&self) -> char {
            self.id
        }

        fn set_index(&mut self, index: usize) {
            self.index = index;
        }
    }

    fn cards(ids: &str) -> Vec<Card> {
        ids.chars()
            .enumerate()
            .map(|(index, id)| Card { id, index })
            .collect()
    }

    fn ids(list: &[Card]) -> String {
        list.iter().map(|card| card.id).collect()
    }

    #[test]
    fn forward_move_splices() {
        let mut list = vec!['A', 'B', 'C', 'D'];
        assert_eq!(reorder(&mut list, 0, 2), ReorderOutcome::Moved { from: 0, to: 2 });
        assert_eq!(list, vec!['B', 'C', 'A', 'D']);
    }

    #[test]
    fn backward_move_splices() {
        let mut list = vec!['A', 'B', 'C', 'D', 'E'];
        reorder(&mut list, 3, 1);
        assert_eq!(list, vec!['A', 'D', 'B', 'C', 'E']);
    }

    #[test]
    fn move_to_ends() {
        let mut list = vec![1, 2, 3, 4];
        reorder(&mut list, 0, 3);
        assert_eq!(list, vec![2, 3, 4, 1]);
        reorder(&mut list, 3, 0);
        assert_eq!(list, vec![1, 2, 3, 4]);
    }

    #[test]
    fn same_index_is_noop() {
        let mut list = vec![1, 2, 3];
        assert_eq!(
            reorder(&mut list, 1, 1),
            ReorderOutcome::Noop {
                reason: ReorderNoopReason::SameIndex
            }
        );
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn out_of_range_is_noop() {
        let mut list = vec![1, 2, 3];
        assert!(!reorder(&mut list, 3, 0).is_moved());
        assert!(!reorder(&mut list, 0, 7).is_moved());
        let mut empty: Vec<u8> = Vec::new();
        assert_eq!(
            reorder(&mut empty, 0, 0),
            ReorderOutcome::Noop {
                reason: ReorderNoopReason::FromOutOfRange
            }
        );
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn stepwise_hovers_equal_direct_move() {
        let mut stepwise = vec!['a', 'b', 'c', 'd', 'e'];
        reorder(&mut stepwise, 3, 2);
        reorder(&mut stepwise, 2, 1);

        let mut direct = vec!['a', 'b', 'c', 'd', 'e'];
        reorder(&mut direct, 3, 1);

        assert_eq!(stepwise, direct);
    }

    #[test]
    fn reorder_items_refreshes_indices() {
        let mut list = cards("ABCDE");
        reorder_items(&mut list, 4, 1);
        assert_eq!(ids(&list), "AEBCD");
        for (index, card) in list.iter().enumerate() {
            assert_eq!(card.index, index);
        }
        assert_eq!(position_of(&list, &'E'), Some(1));
        assert_eq!(position_of(&list, &'Z'), None);
    }

    #[test]
    fn reindex_fixes_stale_indices() {
        let mut list = vec![Card { id: 'x', index: 9 }, Card { id: 'y', index: 9 }];
        reindex(&mut list);
        assert_eq!(list[0].index, 0);
        assert_eq!(list[1].index, 1);
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_string(&ReorderOutcome::Moved { from: 1, to: 2 }).unwrap();
        assert_eq!(json, r#"{"outcome":"moved","from":1,"to":2}"#);
    }
}
