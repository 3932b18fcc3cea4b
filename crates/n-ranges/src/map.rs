//! The nested offset-length map — storage, validated insert, introspection.
//!
//! Entries live in a [`BTreeMap`] keyed by [`Key`], so iteration is always in
//! `(offset, length)` order. Every stored span is either disjoint from or nested
//! inside every other stored span (a *laminar* family); markers are exempt.
//!
//! Point queries live in [`crate::query`], edit propagation in
//! [`crate::shift`]. Both extend the same type through further `impl` blocks.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::error::{RangeError, Result};
use crate::key::Key;

// ---------------------------------------------------------------------------
// NestedOffsetLengthMap
// ---------------------------------------------------------------------------

/// Byte ranges over a buffer, each bound to a value, kept non-crossing.
///
/// # Pruned scans
///
/// The map tracks `span_bound`, an upper bound on the longest stored length.
/// Any span covering byte `p` must start in `[p - span_bound, p]`, so every
/// containment scan walks only that window of the ordering. The bound is raised
/// whenever a longer span appears and reset once the map empties; erasing data
/// only shrinks spans, which keeps a stale bound valid.
#[derive(Clone)]
pub struct NestedOffsetLengthMap<V> {
    pub(crate) entries: BTreeMap<Key, V>,
    pub(crate) span_bound: u64,
}

impl<V> NestedOffsetLengthMap<V> {
    // -- Construction -------------------------------------------------------

    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            span_bound: 0,
        }
    }

    // -- Insert -------------------------------------------------------------

    /// Insert `value` at `(offset, length)`, or overwrite the value already
    /// stored under that exact key.
    ///
    /// Returns `false` and leaves the map untouched when the new span would
    /// partially overlap an existing one (or when `offset + length` overflows).
    /// Zero-length markers are always accepted.
    pub fn set(&mut self, offset: u64, length: u64, value: V) -> bool {
        self.try_set(offset, length, value).is_ok()
    }

    /// Like [`set`](Self::set), but reports why an insert was refused.
    ///
    /// On overwrite the previous value is returned as `Ok(Some(old))`.
    ///
    /// # Errors
    ///
    /// [`RangeError::Overflow`] when `offset + length` does not fit in a `u64`,
    /// [`RangeError::Crossing`] naming the first stored span the candidate
    /// crosses. Neither case modifies the map.
    pub fn try_set(&mut self, offset: u64, length: u64, value: V) -> Result<Option<V>> {
        let key = Key::new(offset, length);
        if key.checked_end().is_none() {
            return Err(RangeError::Overflow { offset, length });
        }

        if let Some(slot) = self.entries.get_mut(&key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }

        if let Some(existing) = self.find_crossing(key) {
            tracing::debug!(%key, %existing, "rejecting crossing range");
            return Err(RangeError::Crossing { key, existing });
        }

        self.span_bound = self.span_bound.max(length);
        self.entries.insert(key, value);

        self.debug_check("insert");
        Ok(None)
    }

    /// Whether [`set`](Self::set) would succeed for `(offset, length)`.
    ///
    /// Existing keys can always be overwritten.
    #[must_use]
    pub fn can_set(&self, offset: u64, length: u64) -> bool {
        let key = Key::new(offset, length);
        key.checked_end().is_some()
            && (self.entries.contains_key(&key) || self.find_crossing(key).is_none())
    }

    /// The first stored span (in key order) that `key` would cross.
    ///
    /// A crossing span `e` satisfies `e.offset < key.end()` and
    /// `e.end() > key.offset`, which puts its offset inside
    /// `[key.offset - span_bound, key.end())`.
    fn find_crossing(&self, key: Key) -> Option<Key> {
        if key.is_point() {
            return None;
        }
        let lo = Key::new(self.scan_start(key.offset), 0);
        let hi = Key::new(key.end(), 0);
        self.entries
            .range(lo..hi)
            .map(|(&existing, _)| existing)
            .find(|&existing| existing.crosses(key))
    }

    /// Lowest offset a span covering `point` could start at.
    #[inline]
    pub(crate) const fn scan_start(&self, point: u64) -> u64 {
        point.saturating_sub(self.span_bound)
    }

    // -- Introspection ------------------------------------------------------

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry stored under exactly `(offset, length)`.
    #[must_use]
    pub fn find(&self, offset: u64, length: u64) -> Option<(&Key, &V)> {
        self.entries.get_key_value(&Key::new(offset, length))
    }

    /// Mutable access to the value under exactly `(offset, length)`.
    ///
    /// Only the value is reachable; keys change through `set` and the shift
    /// operations alone.
    pub fn find_mut(&mut self, offset: u64, length: u64) -> Option<&mut V> {
        self.entries.get_mut(&Key::new(offset, length))
    }

    /// Whether an entry exists under exactly `(offset, length)`.
    #[must_use]
    pub fn contains_key(&self, offset: u64, length: u64) -> bool {
        self.entries.contains_key(&Key::new(offset, length))
    }

    /// The entry with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(&Key, &V)> {
        self.entries.first_key_value()
    }

    /// The entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&Key, &V)> {
        self.entries.last_key_value()
    }

    /// All entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, Key, V> {
        self.entries.iter()
    }

    /// All keys in order.
    pub fn keys(&self) -> btree_map::Keys<'_, Key, V> {
        self.entries.keys()
    }

    /// All values, in key order.
    pub fn values(&self) -> btree_map::Values<'_, Key, V> {
        self.entries.values()
    }

    // -- Invariants ---------------------------------------------------------

    /// Verify the structural invariants: no two spans cross, no span
    /// overflows, and `span_bound` covers every stored length.
    ///
    /// O(n log n): sweeps spans outermost-first at each offset, keeping a
    /// stack of the ends of the spans still open. The crate's own unit tests
    /// run it after every mutation; release and embedding debug builds never
    /// call it implicitly.
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        let mut spans: Vec<Key> = Vec::with_capacity(self.entries.len());
        for &key in self.entries.keys() {
            if key.checked_end().is_none() || key.length > self.span_bound {
                return false;
            }
            if !key.is_point() {
                spans.push(key);
            }
        }
        spans.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.length.cmp(&a.length)));

        let mut open: Vec<u64> = Vec::new();
        for key in spans {
            while open.last().is_some_and(|&end| end <= key.offset) {
                open.pop();
            }
            if open.last().is_some_and(|&end| key.end() > end) {
                return false;
            }
            open.push(key.end());
        }
        true
    }

    /// Assert the invariants after a mutation. Only active in unit tests.
    #[cfg(test)]
    #[track_caller]
    pub(crate) fn debug_check(&self, mutation: &str) {
        assert!(self.check_invariants(), "{mutation} broke the invariants");
    }

    #[cfg(not(test))]
    #[inline]
    pub(crate) const fn debug_check(&self, _mutation: &str) {}
}

impl<V> Default for NestedOffsetLengthMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for NestedOffsetLengthMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

// Equality ignores `span_bound`, which may be a stale upper bound.
impl<V: PartialEq> PartialEq for NestedOffsetLengthMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Eq> Eq for NestedOffsetLengthMap<V> {}

impl<'a, V> IntoIterator for &'a NestedOffsetLengthMap<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = btree_map::Iter<'a, Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
