//! Sorted Set Value Type
//!
//! An ordered collection of `(score, member)` pairs, kept sorted ascending by
//! score. Members are unique. Ties keep the order in which the members were
//! first inserted.
//!
//! ## Layout
//!
//! ```text
//!  items (ascending score)            index (member -> position)
//! ┌───────────┬───────────┬────────┐  ┌─────────┬───┐
//! │ 1.0 "one" │ 2.0 "two" │ 3.0 .. │  │ "one"   │ 0 │
//! └───────────┴───────────┴────────┘  │ "two"   │ 1 │
//!                                     │ "three" │ 2 │
//!                                     └─────────┴───┘
//! ```
//!
//! Every mutation re-sorts the items and rebuilds the index, so a rank lookup
//! is a single hash map probe. There is no locking here: the store serializes
//! access through the owning key's lock.

use std::cmp::Ordering;
use std::collections::HashMap;

/// A single `(score, member)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedSetItem {
    pub score: f64,
    pub member: String,
}

impl SortedSetItem {
    pub fn new(score: f64, member: impl Into<String>) -> Self {
        Self {
            score,
            member: member.into(),
        }
    }
}

/// Members ordered by ascending score with O(1) rank lookup.
#[derive(Debug, Clone, Default)]
pub struct SortedSet {
    /// Items in ascending score order
    items: Vec<SortedSetItem>,
    /// Member name -> position in `items`
    index: HashMap<String, usize>,
}

impl SortedSet {
    /// Creates an empty sorted set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a member or updates its score.
    ///
    /// # Returns
    ///
    /// `true` if the member was new, `false` if an existing member's score was
    /// overwritten.
    pub fn set(&mut self, score: f64, member: impl Into<String>) -> bool {
        let member = member.into();
        // -0.0 and 0.0 are the same score.
        let score = score + 0.0;

        let inserted = match self.index.get(&member) {
            Some(&position) => {
                self.items[position].score = score;
                false
            }
            None => {
                self.items.push(SortedSetItem { score, member });
                true
            }
        };

        self.ensure_order();
        inserted
    }

    /// Re-sorts the items and rebuilds the index from the new order.
    ///
    /// `sort_by` is stable, so equal scores keep their relative order.
    fn ensure_order(&mut self) {
        self.items.sort_by(|a, b| compare_scores(a.score, b.score));

        self.index.clear();
        for (position, item) in self.items.iter().enumerate() {
            self.index.insert(item.member.clone(), position);
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the 0-based ascending rank of a member.
    pub fn position(&self, member: &str) -> Option<usize> {
        self.index.get(member).copied()
    }

    /// Returns the score of a member.
    pub fn score(&self, member: &str) -> Option<f64> {
        self.position(member).map(|position| self.items[position].score)
    }

    /// Returns a copy of the items covering `[start, stop]`.
    ///
    /// Indices follow these rules, `size` being the member count:
    ///
    /// 1. `start >= size` or `start > stop` gives an empty result.
    /// 2. A negative `start` counts from the end; if it is still negative
    ///    after adding `size`, the result is empty.
    /// 3. `stop >= size` is clamped to the end. A negative `stop` becomes
    ///    `stop + size + 1` (exclusive bound). Otherwise `stop` is inclusive.
    pub fn slice(&self, start: i64, stop: i64) -> Vec<SortedSetItem> {
        let size = self.items.len() as i64;

        if start >= size || start > stop {
            return Vec::new();
        }

        let mut start = start;
        if start < 0 {
            start += size;
            if start < 0 {
                return Vec::new();
            }
        }

        let stop = if stop >= size {
            size
        } else if stop < 0 {
            stop + size + 1
        } else {
            stop + 1
        };

        // A negative stop can land at or before start once adjusted.
        if stop <= start {
            return Vec::new();
        }

        self.items[start as usize..stop as usize].to_vec()
    }

    /// Iterates over the items in ascending score order.
    pub fn iter(&self) -> impl Iterator<Item = &SortedSetItem> {
        self.items.iter()
    }
}

/// Total order over scores so a NaN cannot break sorting.
#[inline]
fn compare_scores(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}
