//! # n-ranges — Nested offset-length map for n-nvim
//!
//! Tracks byte ranges over a linear buffer (a file or an in-memory blob), each
//! bound to a value: comments, highlights, bookmarks. Ranges may nest but never
//! cross, and they follow the buffer as bytes are inserted and erased.
//!
//! - **[`key`]** — `Key` `(offset, length)` and its ordering
//! - **[`map`]** — `NestedOffsetLengthMap` storage and validated insert
//! - **[`query`]** — innermost / all-covering point lookups
//! - **[`shift`]** — key rewriting for buffer inserts and erases
//! - **[`error`]** — `RangeError` for the `Result`-returning insert
//!
//! # Data flow
//!
//! ```text
//! buffer model
//!     │  set(offset, length, value)           reject crossing spans
//!     ▼
//! map.rs:    BTreeMap<Key, V> in (offset, length) order
//!     │
//!     │  data_inserted(at, n) / data_erased(at, n)   once per byte-level edit
//!     ▼
//! shift.rs:  remove affected keys, recompute, reinsert
//!     │
//!     │  get(point) / get_all(point)
//!     ▼
//! query.rs:  scan [point - span_bound, point], rank by length
//! ```
//!
//! # Example
//!
//! ```
//! use n_ranges::NestedOffsetLengthMap;
//!
//! let mut comments = NestedOffsetLengthMap::new();
//! assert!(comments.set(10, 8, "header"));
//! assert!(comments.set(12, 2, "magic"));
//! assert!(!comments.set(16, 4, "crosses the header"));
//!
//! assert_eq!(comments.get(13).map(|(_, v)| *v), Some("magic"));
//!
//! // Four bytes typed at offset 11 land inside the header.
//! assert_eq!(comments.data_inserted(11, 4), 2);
//! assert!(comments.find(10, 12).is_some());
//! assert!(comments.find(16, 2).is_some());
//! ```
//!
//! The map is a plain single-threaded value. Callers sharing it between
//! threads serialize access themselves (one lock around the map).

pub mod error;
pub mod key;
pub mod map;
pub mod query;
pub mod shift;

pub use error::{RangeError, Result};
pub use key::Key;
pub use map::NestedOffsetLengthMap;
