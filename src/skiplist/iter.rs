//! Ascending traversal along level 0.

use std::iter::FusedIterator;

use super::SkipList;
use super::node::Arena;
use super::node::Idx;
use super::node::NULL;
use crate::error::SkipListError;

/// Borrowing iterator. The borrow keeps the list frozen while it lives.
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    current: Idx,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(arena: &'a Arena<T>, current: Idx, remaining: usize) -> Self {
        Iter {
            arena,
            current,
            remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NULL {
            return None;
        }
        let value = self.arena.value(self.current);
        self.current = self.arena.link(self.current, 0).next;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

/// Owning iterator, produced by `SkipList::into_iter`.
pub struct IntoIter<T> {
    arena: Arena<T>,
    current: Idx,
    remaining: usize,
}

impl<T> IntoIter<T> {
    pub(super) fn new(arena: Arena<T>, current: Idx, remaining: usize) -> Self {
        IntoIter {
            arena,
            current,
            remaining,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.current == NULL {
            return None;
        }
        let node = self.arena.node_mut(self.current);
        self.current = node.links[0].next;
        self.remaining -= 1;
        node.value.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// A position in a list that does not hold a borrow.
///
/// The cursor remembers which list made it and that list's version. If the
/// list changes, or the cursor is handed a different list (a clone
/// included), the next call to `next` fails instead of reading stale links.
///
/// ```
/// use indexed_skiplist::{SkipList, SkipListError};
///
/// let mut list: SkipList<i32> = (1..=3).collect();
/// let mut cursor = list.cursor();
/// assert_eq!(cursor.next(&list), Ok(Some(&1)));
///
/// list.insert(10);
/// assert!(matches!(
///     cursor.next(&list),
///     Err(SkipListError::ConcurrentModification { .. })
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    list_id: u64,
    current: Idx,
    version: u64,
    position: usize,
}

impl Cursor {
    pub(super) fn new(list_id: u64, current: Idx, version: u64) -> Cursor {
        Cursor {
            list_id,
            current,
            version,
            position: 0,
        }
    }

    /// Rank of the value the next call will yield.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Version of the list this cursor was created against.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Yield the next value, or `None` at the end.
    pub fn next<'a, T>(&mut self, list: &'a SkipList<T>) -> Result<Option<&'a T>, SkipListError> {
        if list.id != self.list_id {
            return Err(SkipListError::ForeignCursor {
                expected: self.list_id,
                found: list.id,
            });
        }
        let found = list.version();
        if found != self.version {
            return Err(SkipListError::ConcurrentModification {
                expected: self.version,
                found,
            });
        }
        if self.current == NULL {
            return Ok(None);
        }
        let value = list.arena.value(self.current);
        self.current = list.arena.link(self.current, 0).next;
        self.position += 1;
        Ok(Some(value))
    }
}
