//! Structural self-check.
//!
//! Recomputes every level's spans from the level 0 chain and compares them
//! with what is stored. Linear in the number of links; debug builds run it
//! after every mutation.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use super::SkipList;
use super::node::HEAD;
use super::node::Idx;
use super::node::NULL;
use crate::error::IntegrityError;

impl<T> SkipList<T> {
    /// Verify every structural invariant, reporting the first one broken.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let head_height = self.arena.head().height();
        if head_height != self.height {
            return Err(IntegrityError::HeadHeight {
                expected: self.height,
                found: head_height,
            });
        }
        if self.height > self.max_level {
            return Err(IntegrityError::ExceedsMaxLevel {
                height: self.height,
                max_level: self.max_level,
            });
        }

        let positions = self.check_level_zero()?;

        if self.arena.live() != self.len {
            return Err(IntegrityError::Arena {
                live: self.arena.live(),
                size: self.len,
            });
        }

        // taller[level] = number of nodes reaching `level`.
        let mut taller = vec![0usize; self.height];
        let mut tallest = 0;
        for &idx in positions.keys() {
            let height = self.arena.node(idx).height();
            tallest = tallest.max(height);
            for count in taller.iter_mut().take(height) {
                *count += 1;
            }
        }
        if tallest != self.height {
            return Err(IntegrityError::TallestNode {
                expected: self.height,
                found: tallest,
            });
        }

        for level in 0..self.height {
            self.check_level(level, &positions, taller[level])?;
        }
        Ok(())
    }

    /// Walk level 0, checking order and size. Returns each node's position.
    fn check_level_zero(&self) -> Result<FxHashMap<Idx, usize>, IntegrityError> {
        let mut positions = FxHashMap::default();
        let mut prev: Option<Idx> = None;
        let mut idx = self.successor(HEAD);
        let mut pos = 0;

        while idx != NULL {
            pos += 1;
            if positions.insert(idx, pos).is_some() {
                return Err(IntegrityError::Cycle { level: 0 });
            }
            if let Some(prev) = prev {
                if self.cmp(self.arena.value(prev), self.arena.value(idx)) != Ordering::Less {
                    return Err(IntegrityError::Order {
                        level: 0,
                        position: pos,
                    });
                }
            }
            prev = Some(idx);
            idx = self.successor(idx);
        }

        if pos != self.len {
            return Err(IntegrityError::Size {
                expected: self.len,
                found: pos,
            });
        }
        Ok(positions)
    }

    /// Walk one level from the head, checking every span against positions.
    fn check_level(
        &self,
        level: usize,
        positions: &FxHashMap<Idx, usize>,
        expected: usize,
    ) -> Result<(), IntegrityError> {
        let end = self.len + 1;
        let mut idx = HEAD;
        let mut at = 0;
        let mut found = 0;

        loop {
            let link = self.arena.link(idx, level);
            let next_pos = if link.next == NULL {
                end
            } else {
                match positions.get(&link.next) {
                    Some(&pos) => pos,
                    None => return Err(IntegrityError::Detached { level }),
                }
            };
            // Positions only move forward, which also rules out cycles.
            if next_pos <= at {
                return Err(IntegrityError::Order {
                    level,
                    position: next_pos,
                });
            }
            if link.span != next_pos - at {
                return Err(IntegrityError::Span {
                    level,
                    position: at,
                    expected: next_pos - at,
                    found: link.span,
                });
            }
            if link.next == NULL {
                break;
            }
            found += 1;
            if self.arena.node(link.next).height() <= level {
                return Err(IntegrityError::Membership {
                    level,
                    expected,
                    found,
                });
            }
            at = next_pos;
            idx = link.next;
        }

        if found != expected {
            return Err(IntegrityError::Membership {
                level,
                expected,
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Config;
    use super::*;

    fn sample() -> SkipList<i32> {
        let mut list = SkipList::with_config(Config::new().seed(21)).unwrap();
        for v in 0..64 {
            list.insert(v);
        }
        list
    }

    #[test]
    fn healthy_list_passes() {
        let mut list = sample();
        assert!(list.check_integrity().is_ok());
        for v in (0..64).step_by(3) {
            list.remove(&v).unwrap();
            assert!(list.check_integrity().is_ok());
        }
    }

    #[test]
    fn detects_bad_span() {
        let mut list = sample();
        list.arena.link_mut(HEAD, 0).span += 1;
        assert!(matches!(
            list.check_integrity(),
            Err(IntegrityError::Span { level: 0, position: 0, .. })
        ));
    }

    #[test]
    fn detects_size_drift() {
        let mut list = sample();
        list.len += 1;
        assert!(matches!(list.check_integrity(), Err(IntegrityError::Size { .. })));
    }

    #[test]
    fn detects_stale_height() {
        let mut list = sample();
        list.height += 1;
        assert!(matches!(
            list.check_integrity(),
            Err(IntegrityError::HeadHeight { .. })
        ));
    }

    #[test]
    fn detects_out_of_order_values() {
        let mut list = sample();
        let first = list.successor(HEAD);
        list.arena.node_mut(first).value = Some(1000);
        assert!(matches!(
            list.check_integrity(),
            Err(IntegrityError::Order { level: 0, .. })
        ));
    }

    #[test]
    fn detects_cycle() {
        let mut list = sample();
        let first = list.successor(HEAD);
        let second = list.successor(first);
        list.arena.link_mut(second, 0).next = first;
        assert!(matches!(
            list.check_integrity(),
            Err(IntegrityError::Cycle { level: 0 }) | Err(IntegrityError::Order { level: 0, .. })
        ));
    }
}
