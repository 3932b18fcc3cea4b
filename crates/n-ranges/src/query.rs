//! Point-containment queries.
//!
//! Queries walk only the window of the ordering where a covering span can
//! start (see [`NestedOffsetLengthMap`]'s pruned scans), then rank the hits by
//! nesting depth. Nothing is cached: every call recomputes its result from the
//! current keys.

use crate::key::Key;
use crate::map::NestedOffsetLengthMap;

impl<V> NestedOffsetLengthMap<V> {
    /// Every entry a point query at `point` may report, in key order:
    /// spans covering `point` and markers sitting exactly on it.
    fn touching(&self, point: u64) -> impl Iterator<Item = (&Key, &V)> + '_ {
        let lo = Key::new(self.scan_start(point), 0);
        let hi = Key::new(point, u64::MAX);
        self.entries
            .range(lo..=hi)
            .filter(move |(key, _)| key.touches(point))
    }

    /// The innermost span covering byte `point`.
    ///
    /// Markers are never returned, even when one sits exactly at `point`.
    /// Because no two spans cross, the covering spans form a single nested
    /// chain and the narrowest one is unique.
    #[must_use]
    pub fn get(&self, point: u64) -> Option<(&Key, &V)> {
        self.touching(point)
            .filter(|(key, _)| !key.is_point())
            .min_by_key(|(key, _)| key.length)
    }

    /// Every span covering `point` plus any marker at exactly `point`,
    /// innermost first.
    ///
    /// Results are sorted ascending by length, so a marker (length 0) leads and
    /// the outermost span comes last. The returned list borrows the map and is
    /// independent of later iteration, but cannot outlive the next mutation.
    #[must_use]
    pub fn get_all(&self, point: u64) -> Vec<(&Key, &V)> {
        let mut hits: Vec<_> = self.touching(point).collect();
        hits.sort_by_key(|(key, _)| key.length);
        hits
    }

    /// Every entry lying wholly inside `[offset, offset + length)`, in key order.
    ///
    /// A marker counts when it sits inside the range. An empty range, or one
    /// whose end overflows `u64`, holds nothing. Useful for carrying
    /// annotations along with a copied selection.
    #[must_use]
    pub fn get_recursive_in(&self, offset: u64, length: u64) -> Vec<(&Key, &V)> {
        let Some(end) = Key::new(offset, length).checked_end() else {
            return Vec::new();
        };
        self.entries
            .range(Key::new(offset, 0)..Key::new(end, 0))
            .filter(|(key, _)| key.end() <= end)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
