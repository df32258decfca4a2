//! Indexed Skip List - an ordered set with O(log n) access by rank.
//!
//! The engine underneath sorted set, map and list types: a skip list whose
//! links record how many values they skip, so both `at(index)` and
//! `index_of(value)` run in expected O(log n) alongside insert and remove.
//!
//! # Quick Start
//!
//! ```
//! use indexed_skiplist::{Config, Insert, SkipList};
//!
//! // Fixed seed, so the node heights are reproducible.
//! let mut list = SkipList::with_config(Config::new().seed(42)).unwrap();
//!
//! for v in [5, 3, 8, 1, 9, 2] {
//!     assert_eq!(list.insert(v), Insert::Inserted);
//! }
//! assert_eq!(list.len(), 6);
//! assert_eq!(list.at(5), Ok(&9));
//! assert_eq!(list.index_of(&8), Ok(4));
//!
//! list.remove(&3).unwrap();
//! assert_eq!(list.at(1), Ok(&5));
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 5, 8, 9]);
//! ```
//!
//! # Threads
//!
//! A list is plain data with no internal locking. Share one across threads
//! by wrapping the whole thing in a lock; every operation, iteration
//! included, must hold it.

pub mod error;
pub mod skiplist;

pub use error::IntegrityError;
pub use error::SkipListError;
pub use skiplist::CoinToss;
pub use skiplist::Config;
pub use skiplist::Cursor;
pub use skiplist::Insert;
pub use skiplist::IntoIter;
pub use skiplist::Iter;
pub use skiplist::SkipList;
