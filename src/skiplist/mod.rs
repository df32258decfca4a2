//! Indexable Skip List
//!
//! An ordered set of unique values kept in a skip list whose links carry
//! spans, so values can be looked up by rank as well as by comparison.
//!
//! # Operations
//!
//! - `insert(value)`: O(log n) expected - adds a value unless an equal one exists
//! - `remove(value)` / `remove_at(index)`: O(log n) expected
//! - `contains(value)`: O(log n) expected
//! - `at(index)`: O(log n) expected - value by rank
//! - `index_of(value)`: O(log n) expected - rank by value
//! - `len()` / `height()`: O(1)
//!
//! # Span Semantics
//!
//! Positions are 1-based with the head at position 0. A link from position
//! `a` to position `b` has span `b - a`. A link to NULL ends at the virtual
//! position `len + 1`, so the head's span at an empty level is `len + 1`.
//!
//! Every descent carries the position reached at each level. Splitting a
//! link on insert and merging two links on remove are then exact, without
//! ever walking level 0.

mod coin;
mod config;
mod dot;
mod integrity;
mod iter;
mod node;

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering as AtomicOrdering;

use smallvec::SmallVec;
use smallvec::smallvec;
use tracing::debug;
use tracing::trace;

use crate::error::SkipListError;

pub use coin::CoinToss;
pub use config::Config;
pub use config::DEFAULT_MAX_LEVEL;
pub use config::DEFAULT_PROBABILITY;
pub use iter::Cursor;
pub use iter::IntoIter;
pub use iter::Iter;

use node::Arena;
use node::HEAD;
use node::Idx;
use node::Link;
use node::NULL;

/// Source of list ids, so cursors can tell lists apart.
static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

fn next_list_id() -> u64 {
    NEXT_LIST_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Comparator defining the order of stored values.
pub type Compare<T> = fn(&T, &T) -> Ordering;

/// What `insert` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    /// The value was added.
    Inserted,
    /// An equal value was already stored. The list is unchanged and the
    /// incoming value was dropped.
    Replaced,
}

/// Per-level predecessors of a search point, with their positions.
struct Path {
    update: SmallVec<[Idx; 16]>,
    rank: SmallVec<[usize; 16]>,
}

/// An ordered set with O(log n) positional access.
///
/// ```
/// use indexed_skiplist::{Insert, SkipList};
///
/// let mut list = SkipList::new();
/// for v in [5, 3, 8, 1, 9, 2] {
///     list.insert(v);
/// }
/// assert_eq!(list.at(0), Ok(&1));
/// assert_eq!(list.index_of(&8), Ok(4));
/// assert_eq!(list.insert(5), Insert::Replaced);
/// ```
pub struct SkipList<T> {
    /// Unique per instance, clones included.
    id: u64,
    arena: Arena<T>,
    /// Number of stored values.
    len: usize,
    /// Current number of levels, equal to the tallest node's height.
    height: usize,
    max_level: usize,
    /// Bumped by every structural change.
    version: u64,
    coin: CoinToss,
    compare: Compare<T>,
}

impl<T: Ord> SkipList<T> {
    /// An empty list with the default configuration, ordered by `Ord`.
    pub fn new() -> Self {
        Self::build(Config::default(), T::cmp)
    }

    /// An empty list ordered by `Ord`.
    pub fn with_config(config: Config) -> Result<Self, SkipListError> {
        Self::with_comparator(config, T::cmp)
    }
}

impl<T> SkipList<T> {
    /// An empty list ordered by `compare`, which must be a total order.
    ///
    /// ```
    /// use indexed_skiplist::{Config, SkipList};
    ///
    /// let mut list = SkipList::with_comparator(Config::new(), f64::total_cmp).unwrap();
    /// list.insert(2.5);
    /// list.insert(-1.0);
    /// assert_eq!(list.at(0), Ok(&-1.0));
    /// ```
    pub fn with_comparator(config: Config, compare: Compare<T>) -> Result<Self, SkipListError> {
        config.validate()?;
        Ok(Self::build(config, compare))
    }

    fn build(config: Config, compare: Compare<T>) -> Self {
        debug!(
            max_level = config.max_level,
            probability = config.probability,
            seeded = config.seed.is_some(),
            "creating skip list"
        );
        SkipList {
            id: next_list_id(),
            arena: Arena::new(),
            len: 0,
            height: 0,
            max_level: config.max_level,
            version: 0,
            coin: CoinToss::new_unchecked(config.probability, config.seed),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels currently in use.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn probability(&self) -> f64 {
        self.coin.probability()
    }

    /// Structural version stamp. Changes whenever the set of stored values does.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Reseed the list's random source. Heights chosen by later inserts are
    /// then fully determined by `seed` and the sequence of operations.
    pub fn seed(&mut self, seed: u64) {
        self.coin.seed(seed);
    }

    /// Estimated bytes used by the list, inline and heap.
    pub fn size_of(&self) -> usize {
        std::mem::size_of::<Self>() + self.arena.size_of()
    }

    // --- Node access helpers ---

    #[inline]
    fn cmp(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }

    /// The level 0 successor of `idx`, or NULL.
    #[inline]
    fn successor(&self, idx: Idx) -> Idx {
        self.arena.node(idx).links.first().map_or(NULL, |link| link.next)
    }

    #[inline]
    fn holds(&self, idx: Idx, value: &T) -> bool {
        idx != NULL && self.cmp(self.arena.value(idx), value) == Ordering::Equal
    }

    // --- Invariant checking ---

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        if let Err(err) = self.check_integrity() {
            panic!("INVARIANT VIOLATED: {}", err);
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn check_invariants(&self) {}

    // --- Descent ---

    /// Last node before `value` at level 0, and its position.
    fn locate(&self, value: &T) -> (Idx, usize) {
        let mut idx = HEAD;
        let mut pos = 0;
        for level in (0..self.height).rev() {
            loop {
                let link = self.arena.link(idx, level);
                if link.next == NULL || self.cmp(self.arena.value(link.next), value) != Ordering::Less {
                    break;
                }
                pos += link.span;
                idx = link.next;
            }
        }
        (idx, pos)
    }

    /// Same walk as `locate`, recording the predecessor at every level.
    fn path_to_value(&self, value: &T) -> Path {
        let mut update: SmallVec<[Idx; 16]> = smallvec![HEAD; self.height];
        let mut rank: SmallVec<[usize; 16]> = smallvec![0; self.height];
        let mut idx = HEAD;
        let mut pos = 0;
        for level in (0..self.height).rev() {
            loop {
                let link = self.arena.link(idx, level);
                if link.next == NULL || self.cmp(self.arena.value(link.next), value) != Ordering::Less {
                    break;
                }
                pos += link.span;
                idx = link.next;
            }
            update[level] = idx;
            rank[level] = pos;
        }
        Path { update, rank }
    }

    /// Predecessors of the node at 1-based `position`.
    fn path_to_position(&self, position: usize) -> Path {
        let mut update: SmallVec<[Idx; 16]> = smallvec![HEAD; self.height];
        let mut rank: SmallVec<[usize; 16]> = smallvec![0; self.height];
        let mut idx = HEAD;
        let mut pos = 0;
        for level in (0..self.height).rev() {
            loop {
                let link = self.arena.link(idx, level);
                if link.next == NULL || pos + link.span >= position {
                    break;
                }
                pos += link.span;
                idx = link.next;
            }
            update[level] = idx;
            rank[level] = pos;
        }
        Path { update, rank }
    }

    /// The node at `index` (0-based), found by walking spans.
    fn node_at(&self, index: usize) -> Result<Idx, SkipListError> {
        if index >= self.len {
            return Err(SkipListError::OutOfRange {
                index,
                size: self.len,
            });
        }
        let target = index + 1;
        let mut idx = HEAD;
        let mut pos = 0;
        for level in (0..self.height).rev() {
            loop {
                let link = self.arena.link(idx, level);
                if link.next == NULL || pos + link.span > target {
                    break;
                }
                pos += link.span;
                idx = link.next;
            }
            if pos == target {
                break;
            }
        }
        debug_assert_eq!(pos, target, "rank walk overshot");
        Ok(idx)
    }

    // --- Core operations ---

    /// Whether a value equal to `value` is stored.
    pub fn contains(&self, value: &T) -> bool {
        let (pred, _) = self.locate(value);
        self.holds(self.successor(pred), value)
    }

    /// Add `value`, keeping the list sorted.
    ///
    /// If an equal value is already stored nothing changes and
    /// `Insert::Replaced` is returned.
    pub fn insert(&mut self, value: T) -> Insert {
        let mut path = self.path_to_value(&value);
        let next = match path.update.first() {
            Some(&pred) => self.successor(pred),
            None => NULL,
        };
        if self.holds(next, &value) {
            return Insert::Replaced;
        }

        // Grow by at most one level per insert, except into an empty list.
        let cap = if self.len == 0 {
            self.max_level
        } else {
            self.max_level.min(self.height + 1)
        };
        let height = self.coin.choose_height(cap);

        if height > self.height {
            // New top levels skip straight past every existing value.
            let span = self.len + 1;
            for _ in self.height..height {
                self.arena.head_mut().links.push(Link::new(NULL, span));
                path.update.push(HEAD);
                path.rank.push(0);
            }
            trace!(from = self.height, to = height, "skip list height grew");
            self.height = height;
        }

        let new_idx = self.arena.alloc(value, height);
        let position = path.rank[0] + 1;

        for level in 0..height {
            let pred = path.update[level];
            let old = self.arena.link(pred, level);
            // Steps from pred to the new node.
            let before = position - path.rank[level];
            *self.arena.link_mut(new_idx, level) = Link::new(old.next, old.span + 1 - before);
            *self.arena.link_mut(pred, level) = Link::new(new_idx, before);
        }

        // Levels the new node does not reach now skip one more value.
        for level in height..self.height {
            self.arena.link_mut(path.update[level], level).span += 1;
        }

        self.len += 1;
        self.version += 1;
        self.check_invariants();
        Insert::Inserted
    }

    /// Remove the value equal to `value` and return it.
    pub fn remove(&mut self, value: &T) -> Result<T, SkipListError> {
        let path = self.path_to_value(value);
        let target = match path.update.first() {
            Some(&pred) => self.successor(pred),
            None => NULL,
        };
        if !self.holds(target, value) {
            return Err(SkipListError::NotFound);
        }
        Ok(self.unlink(&path, target))
    }

    /// Remove and return the value at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, SkipListError> {
        if index >= self.len {
            return Err(SkipListError::OutOfRange {
                index,
                size: self.len,
            });
        }
        let path = self.path_to_position(index + 1);
        let target = self.successor(path.update[0]);
        Ok(self.unlink(&path, target))
    }

    /// Detach `target` from every level, fix spans, and free it.
    fn unlink(&mut self, path: &Path, target: Idx) -> T {
        let target_height = self.arena.node(target).height();

        for level in 0..target_height {
            let gone = self.arena.link(target, level);
            let link = self.arena.link_mut(path.update[level], level);
            debug_assert_eq!(link.next, target, "update path misses target at level {}", level);
            link.next = gone.next;
            link.span = link.span + gone.span - 1;
        }

        for level in target_height..self.height {
            self.arena.link_mut(path.update[level], level).span -= 1;
        }

        let value = self.arena.free(target);
        self.len -= 1;
        self.shrink();
        self.version += 1;
        self.check_invariants();
        value
    }

    /// Drop empty top levels.
    fn shrink(&mut self) {
        let before = self.height;
        while self.height > 0 && self.arena.link(HEAD, self.height - 1).next == NULL {
            self.arena.head_mut().links.pop();
            self.height -= 1;
        }
        if self.height != before {
            trace!(from = before, to = self.height, "skip list height shrank");
        }
    }

    /// The value at `index` in ascending order.
    pub fn at(&self, index: usize) -> Result<&T, SkipListError> {
        let idx = self.node_at(index)?;
        Ok(self.arena.value(idx))
    }

    /// Like `at`, but `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.at(index).ok()
    }

    /// The rank of `value` in ascending order.
    pub fn index_of(&self, value: &T) -> Result<usize, SkipListError> {
        let (pred, pos) = self.locate(value);
        if self.holds(self.successor(pred), value) {
            // pred sits at 1-based `pos`, so the match is at 0-based `pos`.
            Ok(pos)
        } else {
            Err(SkipListError::NotFound)
        }
    }

    /// `count` consecutive values starting at `index`.
    ///
    /// Fails with `RangeOutOfBounds`, carrying the arguments as given, when
    /// `index + count` passes the end.
    pub fn at_range(&self, index: usize, count: usize) -> Result<Vec<&T>, SkipListError> {
        if index.checked_add(count).is_none_or(|end| end > self.len) {
            return Err(SkipListError::RangeOutOfBounds {
                index,
                count,
                size: self.len,
            });
        }
        if count == 0 {
            return Ok(Vec::new());
        }
        Ok(self.iter_from(index)?.take(count).collect())
    }

    pub fn first(&self) -> Option<&T> {
        let idx = self.successor(HEAD);
        (idx != NULL).then(|| self.arena.value(idx))
    }

    /// The largest value, found by running right along each level.
    pub fn last(&self) -> Option<&T> {
        let mut idx = HEAD;
        for level in (0..self.height).rev() {
            loop {
                let next = self.arena.link(idx, level).next;
                if next == NULL {
                    break;
                }
                idx = next;
            }
        }
        (idx != HEAD).then(|| self.arena.value(idx))
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        debug!(len = self.len, height = self.height, "clearing skip list");
        self.arena.clear();
        self.len = 0;
        self.height = 0;
        self.version += 1;
    }

    // --- Iteration ---

    /// Ascending iterator over all values.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.arena, self.successor(HEAD), self.len)
    }

    /// Ascending iterator starting at `index`.
    pub fn iter_from(&self, index: usize) -> Result<Iter<'_, T>, SkipListError> {
        let idx = self.node_at(index)?;
        Ok(Iter::new(&self.arena, idx, self.len - index))
    }

    /// A detached iterator that does not borrow the list. Advancing it after
    /// the list has changed fails with `ConcurrentModification`.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.id, self.successor(HEAD), self.version)
    }
}

impl<T: Clone> Clone for SkipList<T> {
    /// The clone gets its own id, so cursors made on one list are rejected
    /// by the other even while their versions match.
    fn clone(&self) -> Self {
        SkipList {
            id: next_list_id(),
            arena: self.arena.clone(),
            len: self.len,
            height: self.height,
            max_level: self.max_level,
            version: self.version,
            coin: self.coin.clone(),
            compare: self.compare,
        }
    }
}

impl<T: Ord> Default for SkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SkipList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for SkipList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a SkipList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for SkipList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let first = self.successor(HEAD);
        IntoIter::new(self.arena, first, self.len)
    }
}
