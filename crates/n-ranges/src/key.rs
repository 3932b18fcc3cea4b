//! Offset-length keys and their ordering.
//!
//! A [`Key`] names the half-open byte span `[offset, offset + length)`. A key
//! with `length == 0` is a **point marker**: it sits at a single position and
//! spans no bytes, so it never contains anything and never crosses anything.
//!
//! Keys order lexicographically, offset first, then length. That order is the
//! storage order of the map and the basis of every pruned scan. It is *not* the
//! order of containment queries, which report innermost spans first.

use std::fmt;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A byte span `(offset, length)` over a linear buffer.
///
/// `offset + length` must be representable as a `u64`. The map checks this on
/// insert; code that builds keys by hand should use [`Key::checked_end`] when
/// the inputs are untrusted.
///
/// # Ordering
///
/// `Key { offset: 5, length: 20 }` < `Key { offset: 10, length: 0 }` <
/// `Key { offset: 10, length: 5 }`. Two keys at the same offset sort narrowest
/// first, so an enclosing span always precedes the spans nested at its end
/// but follows the ones nested at its start.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub offset: u64,
    pub length: u64,
}

impl Key {
    /// Create a key.
    #[inline]
    #[must_use]
    pub const fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// A zero-length marker at `offset`.
    #[inline]
    #[must_use]
    pub const fn point(offset: u64) -> Self {
        Self { offset, length: 0 }
    }

    /// True for zero-length markers.
    #[inline]
    #[must_use]
    pub const fn is_point(self) -> bool {
        self.length == 0
    }

    /// One past the last byte of the span. Panics in debug on overflow.
    #[inline]
    #[must_use]
    pub const fn end(self) -> u64 {
        debug_assert!(
            self.offset.checked_add(self.length).is_some(),
            "Key offset + length overflows u64"
        );
        self.offset.wrapping_add(self.length)
    }

    /// `offset + length`, or `None` when it does not fit in a `u64`.
    #[inline]
    #[must_use]
    pub const fn checked_end(self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }

    /// True when `point` is one of the bytes the span covers.
    ///
    /// Markers cover no bytes, so this is always false for them.
    #[inline]
    #[must_use]
    pub const fn contains(self, point: u64) -> bool {
        point >= self.offset && point - self.offset < self.length
    }

    /// True when a point query at `point` should report this key: covering
    /// spans, plus markers sitting exactly at `point`.
    #[inline]
    #[must_use]
    pub const fn touches(self, point: u64) -> bool {
        if self.is_point() {
            self.offset == point
        } else {
            self.contains(point)
        }
    }

    /// True when `other` lies entirely within this span (equal spans included).
    #[inline]
    #[must_use]
    pub const fn contains_key(self, other: Self) -> bool {
        self.offset <= other.offset && other.end() <= self.end()
    }

    /// True when the two spans share no bytes. Adjacent spans are disjoint.
    #[inline]
    #[must_use]
    pub const fn is_disjoint(self, other: Self) -> bool {
        self.end() <= other.offset || other.end() <= self.offset
    }

    /// True when the spans partially overlap: neither disjoint nor nested.
    ///
    /// This is the one relation the map refuses to store. Markers never cross.
    #[inline]
    #[must_use]
    pub const fn crosses(self, other: Self) -> bool {
        !self.is_point()
            && !other.is_point()
            && !self.is_disjoint(other)
            && !self.contains_key(other)
            && !other.contains_key(self)
    }
}

// Storage order: offset first, then length.
impl Ord for Key {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset
            .cmp(&other.offset)
            .then(self.length.cmp(&other.length))
    }
}

impl PartialOrd for Key {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}+{})", self.offset, self.length)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            write!(f, "@{}", self.offset)
        } else {
            write!(f, "[{}, {})", self.offset, self.end())
        }
    }
}

impl From<(u64, u64)> for Key {
    #[inline]
    fn from((offset, length): (u64, u64)) -> Self {
        Self::new(offset, length)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
