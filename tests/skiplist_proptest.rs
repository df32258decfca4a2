//! Property-based tests for the skip list, checked against a `BTreeSet` model.

use std::collections::BTreeSet;

use proptest::prelude::*;
use indexed_skiplist::{Config, Insert, SkipList, SkipListError};

// =============================================================================
// Test helpers
// =============================================================================

/// A random edit against a small key space so that duplicates and misses
/// happen often.
#[derive(Clone, Debug)]
enum EditOp {
    Insert(u16),
    Remove(u16),
    RemoveAt { index_pct: f64 },
}

fn arbitrary_edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        3 => (0u16..512).prop_map(EditOp::Insert),
        2 => (0u16..512).prop_map(EditOp::Remove),
        1 => (0.0..1.0f64).prop_map(|index_pct| EditOp::RemoveAt { index_pct }),
    ]
}

fn arbitrary_config() -> impl Strategy<Value = Config> {
    (1usize..12, 0.05..0.95f64, any::<u64>())
        .prop_map(|(max_level, p, seed)| Config::new().max_level(max_level).probability(p).seed(seed))
}

fn apply_edit(list: &mut SkipList<u16>, model: &mut BTreeSet<u16>, op: &EditOp) {
    match op {
        EditOp::Insert(v) => {
            let expected = if model.insert(*v) {
                Insert::Inserted
            } else {
                Insert::Replaced
            };
            assert_eq!(list.insert(*v), expected);
        }
        EditOp::Remove(v) => {
            let expected = model.take(v).ok_or(SkipListError::NotFound);
            assert_eq!(list.remove(v), expected);
        }
        EditOp::RemoveAt { index_pct } => {
            if model.is_empty() {
                assert!(list.remove_at(0).is_err());
                return;
            }
            let index = ((*index_pct * model.len() as f64) as usize).min(model.len() - 1);
            let v = *model.iter().nth(index).unwrap();
            model.remove(&v);
            assert_eq!(list.remove_at(index), Ok(v));
        }
    }
}

fn build(config: Config, ops: &[EditOp]) -> (SkipList<u16>, BTreeSet<u16>) {
    let mut list = SkipList::with_config(config).unwrap();
    let mut model = BTreeSet::new();
    for op in ops {
        apply_edit(&mut list, &mut model, op);
    }
    (list, model)
}

// =============================================================================
// Ordering and size
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Iteration yields the sorted, deduplicated input.
    #[test]
    fn iteration_is_sorted_input(values in prop::collection::vec(any::<i32>(), 0..300)) {
        let list: SkipList<i32> = values.iter().copied().collect();
        let expected: Vec<i32> = values.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let actual: Vec<i32> = list.iter().copied().collect();
        prop_assert_eq!(actual, expected);
    }

    /// Size always matches the number of net successful inserts.
    #[test]
    fn size_tracks_model(
        config in arbitrary_config(),
        ops in prop::collection::vec(arbitrary_edit_op(), 0..300),
    ) {
        let (list, model) = build(config, &ops);
        prop_assert_eq!(list.len(), model.len());
        prop_assert!(list.iter().eq(model.iter()));
        prop_assert!(list.height() <= config.max_level);
        prop_assert!(list.check_integrity().is_ok());
    }

    /// Inserting something already present changes nothing.
    #[test]
    fn duplicate_insert_is_noop(
        values in prop::collection::vec(0u16..100, 1..100),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut list = SkipList::with_config(Config::new().seed(1)).unwrap();
        for v in &values {
            list.insert(*v);
        }
        let len = list.len();
        let version = list.version();
        let dup = values[pick.index(values.len())];
        prop_assert_eq!(list.insert(dup), Insert::Replaced);
        prop_assert_eq!(list.len(), len);
        prop_assert_eq!(list.version(), version);
    }

    /// Removing an absent value is rejected and leaves the list alone.
    #[test]
    fn absent_remove_is_rejected(
        values in prop::collection::vec(0u16..1000, 0..100),
        absent in 1000u16..2000,
    ) {
        let mut list: SkipList<u16> = values.iter().copied().collect();
        let before: Vec<u16> = list.iter().copied().collect();
        let dot = list.to_dot();
        prop_assert_eq!(list.remove(&absent), Err(SkipListError::NotFound));
        prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), before);
        prop_assert_eq!(list.to_dot(), dot);
    }
}

// =============================================================================
// Rank properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// at(index_of(v)) == v for every stored v.
    #[test]
    fn at_inverts_index_of(
        config in arbitrary_config(),
        ops in prop::collection::vec(arbitrary_edit_op(), 0..200),
    ) {
        let (list, model) = build(config, &ops);
        for v in &model {
            let i = list.index_of(v).unwrap();
            prop_assert_eq!(list.at(i), Ok(v));
        }
    }

    /// index_of(at(i)) == i for every valid i.
    #[test]
    fn index_of_inverts_at(
        config in arbitrary_config(),
        ops in prop::collection::vec(arbitrary_edit_op(), 0..200),
    ) {
        let (list, model) = build(config, &ops);
        for (i, expected) in model.iter().enumerate() {
            let v = list.at(i).unwrap();
            prop_assert_eq!(v, expected);
            prop_assert_eq!(list.index_of(v), Ok(i));
        }
    }

    /// Every index at or past the end is out of range.
    #[test]
    fn past_end_is_out_of_range(
        values in prop::collection::vec(any::<u16>(), 0..100),
        extra in 0usize..1000,
    ) {
        let list: SkipList<u16> = values.iter().copied().collect();
        let index = list.len() + extra;
        prop_assert_eq!(list.at(index), Err(SkipListError::OutOfRange { index, size: list.len() }));
    }

    /// at_range matches a slice of the model.
    #[test]
    fn at_range_matches_model(
        values in prop::collection::vec(any::<u16>(), 0..200),
        start_pct in 0.0..=1.0f64,
        len_pct in 0.0..=1.0f64,
    ) {
        let list: SkipList<u16> = values.iter().copied().collect();
        let sorted: Vec<u16> = list.iter().copied().collect();
        let start = (start_pct * sorted.len() as f64) as usize;
        let count = (len_pct * (sorted.len() - start) as f64) as usize;
        let expected: Vec<&u16> = sorted[start..start + count].iter().collect();
        prop_assert_eq!(list.at_range(start, count), Ok(expected));
    }
}

// =============================================================================
// Reproducibility
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Same seed and same operations give the same structure.
    #[test]
    fn fixed_seed_is_reproducible(
        seed in any::<u64>(),
        ops in prop::collection::vec(arbitrary_edit_op(), 0..150),
    ) {
        let config = Config::new().seed(seed);
        let (a, _) = build(config, &ops);
        let (b, _) = build(config, &ops);
        prop_assert_eq!(a.height(), b.height());
        prop_assert_eq!(a.to_dot(), b.to_dot());
    }
}
