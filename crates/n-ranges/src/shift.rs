//! Edit propagation — keeping keys in step with the buffer.
//!
//! When bytes are inserted into or erased from the underlying buffer, every
//! stored key at or after the edit moves, spans straddling the edit grow or
//! shrink, and spans (or markers) swallowed by an erase disappear.
//!
//! `offset` is the primary sort key, so a moved entry is never rewritten in
//! place. Each shift collects the affected keys, removes all of them, then
//! reinserts the survivors under their new keys. Removing everything first
//! matters: moving entries one at a time could land one on a key that another
//! entry has not vacated yet.
//!
//! ```text
//! insert 4 @ 11        [10 ........ 18)      ->  [10 ................ 22)
//! erase  6 @ 8      [8 ~~~~~~ 14)
//!                         [10 ........ 18)   ->  [8 .... 12)
//! ```

use std::collections::btree_map::Entry;

use crate::key::Key;
use crate::map::NestedOffsetLengthMap;

// ---------------------------------------------------------------------------
// Key arithmetic
// ---------------------------------------------------------------------------

/// Where `key` ends up after `count` bytes are inserted at `at`.
///
/// Insertion at a span's first byte pushes the whole span right; insertion
/// strictly inside it grows the span; insertion at or after its end leaves it
/// alone. Markers move when the insertion lands at or before them.
#[must_use]
pub const fn inserted_key(key: Key, at: u64, count: u64) -> Key {
    if at <= key.offset {
        Key::new(key.offset + count, key.length)
    } else if at >= key.end() {
        key
    } else {
        Key::new(key.offset, key.length + count)
    }
}

/// Where `key` ends up after erasing `[at, at + count)`, or `None` when the
/// erase consumes it.
///
/// A marker inside the erased range is consumed. A span loses the bytes the
/// erase overlaps and slides left by the erased bytes lying before it; a span
/// losing every byte is consumed.
#[must_use]
pub const fn erased_key(key: Key, at: u64, count: u64) -> Option<Key> {
    let erase_end = at + count;

    if key.is_point() {
        return if at <= key.offset && key.offset < erase_end {
            None
        } else if erase_end <= key.offset {
            Some(Key::new(key.offset - count, 0))
        } else {
            Some(key)
        };
    }

    if erase_end <= key.offset {
        return Some(Key::new(key.offset - count, key.length));
    }
    if at >= key.end() {
        return Some(key);
    }

    let overlap = min(erase_end, key.end()) - max(at, key.offset);
    if overlap >= key.length {
        return None;
    }
    let erased_before = min(erase_end, key.offset).saturating_sub(at);
    Some(Key::new(key.offset - erased_before, key.length - overlap))
}

const fn min(a: u64, b: u64) -> u64 {
    if a < b { a } else { b }
}

const fn max(a: u64, b: u64) -> u64 {
    if a > b { a } else { b }
}

// ---------------------------------------------------------------------------
// Map operations
// ---------------------------------------------------------------------------

impl<V> NestedOffsetLengthMap<V> {
    /// Adjust keys for `count` bytes inserted into the buffer at `at`.
    ///
    /// Returns how many entries had their key changed. Insertion never
    /// deletes an entry, and a zero-byte insertion changes nothing.
    pub fn data_inserted(&mut self, at: u64, count: u64) -> usize {
        if count == 0 {
            return 0;
        }

        // A span reaching past `at` starts no earlier than `at - span_bound`.
        let lo = Key::new(self.scan_start(at), 0);
        let moves: Vec<(Key, Key)> = self
            .entries
            .range(lo..)
            .map(|(&key, _)| (key, inserted_key(key, at, count)))
            .filter(|(old, new)| old != new)
            .collect();

        let mut moved = Vec::with_capacity(moves.len());
        for (old, new) in &moves {
            if let Some(value) = self.entries.remove(old) {
                moved.push((*new, value));
            }
        }
        for (key, value) in moved {
            self.span_bound = self.span_bound.max(key.length);
            let displaced = self.entries.insert(key, value);
            debug_assert!(displaced.is_none(), "insertion shift collided at {key}");
        }

        tracing::trace!(at, count, modified = moves.len(), "data inserted");
        self.debug_check("insertion shift");
        moves.len()
    }

    /// Adjust keys for `count` bytes erased from the buffer starting at `at`.
    ///
    /// Returns how many entries were deleted or had their key changed.
    ///
    /// Erasing can squeeze two nested spans onto the same key (erasing the
    /// bytes that separated their starts, say). Keys stay unique, so the entry
    /// whose span was narrowest before the erase keeps the key and the other
    /// is dropped. It already counts as modified, so the result is the same
    /// either way.
    pub fn data_erased(&mut self, at: u64, count: u64) -> usize {
        if count == 0 {
            return 0;
        }

        let lo = Key::new(self.scan_start(at), 0);
        let fates: Vec<(Key, Option<Key>)> = self
            .entries
            .range(lo..)
            .map(|(&key, _)| (key, erased_key(key, at, count)))
            .filter(|(old, new)| *new != Some(*old))
            .collect();

        let mut survivors = Vec::with_capacity(fates.len());
        for (old, new) in &fates {
            let Some(value) = self.entries.remove(old) else {
                continue;
            };
            if let Some(new) = new {
                survivors.push((old.length, *new, value));
            }
        }

        // Narrowest original span first, so it wins any collision.
        survivors.sort_by_key(|&(original_length, key, _)| (original_length, key));
        for (original_length, key, value) in survivors {
            match self.entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(_) => {
                    tracing::debug!(%key, original_length, "erase collapsed two ranges onto one key");
                }
            }
        }

        if self.entries.is_empty() {
            self.span_bound = 0;
        }

        tracing::trace!(at, count, modified = fates.len(), "data erased");
        self.debug_check("erase shift");
        fates.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
