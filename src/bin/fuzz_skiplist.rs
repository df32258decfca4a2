//! AFL fuzz harness for the indexed skip list
//!
//! Replays a byte stream of operations against both the skip list and a
//! `BTreeSet` model, checking after every step that:
//! 1. Membership, size and sorted order agree with the model
//! 2. `at` and `index_of` agree with the model's ranks
//! 3. The structural integrity check passes

use std::collections::BTreeSet;

use afl::fuzz;
use indexed_skiplist::{Config, Insert, SkipList};

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Insert(u8),
    Remove(u8),
    /// Remove by rank, as a fraction of the current length
    RemoveAt(u8),
    /// Look up by rank, as a fraction of the current length
    At(u8),
    Reseed(u8),
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        if bytes.len() < 2 {
            return None;
        }
        let arg = bytes[1];
        let op = match bytes[0] % 5 {
            0 => FuzzOp::Insert(arg),
            1 => FuzzOp::Remove(arg),
            2 => FuzzOp::RemoveAt(arg),
            3 => FuzzOp::At(arg),
            _ => FuzzOp::Reseed(arg),
        };
        Some((op, &bytes[2..]))
    }
}

fn main() {
    fuzz!(|data: &[u8]| {
        // First byte picks the max level so short towers get exercised too.
        let Some((&levels, mut remaining)) = data.split_first() else {
            return;
        };
        let config = Config::new().max_level(levels as usize % 8 + 1).seed(0);
        let mut list = SkipList::with_config(config).expect("valid config");
        let mut model = BTreeSet::new();

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;

            match op {
                FuzzOp::Insert(v) => {
                    let expected = if model.insert(v) {
                        Insert::Inserted
                    } else {
                        Insert::Replaced
                    };
                    assert_eq!(list.insert(v), expected);
                }
                FuzzOp::Remove(v) => {
                    assert_eq!(list.remove(&v).ok(), model.take(&v));
                }
                FuzzOp::RemoveAt(frac) => {
                    if !model.is_empty() {
                        let index = frac as usize * model.len() / 256;
                        let v = *model.iter().nth(index).expect("index below len");
                        model.remove(&v);
                        assert_eq!(list.remove_at(index), Ok(v));
                    }
                }
                FuzzOp::At(frac) => {
                    let index = frac as usize * (model.len() + 1) / 256;
                    assert_eq!(list.at(index).ok(), model.iter().nth(index));
                }
                FuzzOp::Reseed(seed) => list.seed(seed as u64),
            }

            assert_eq!(list.len(), model.len(), "Length mismatch");
            assert!(list.iter().eq(model.iter()), "Order mismatch");
            if let Err(err) = list.check_integrity() {
                panic!("Integrity failure after {:?}: {}", op, err);
            }
        }

        for (i, v) in model.iter().enumerate() {
            assert_eq!(list.index_of(v), Ok(i));
            assert_eq!(list.at(i), Ok(v));
        }
    });
}
