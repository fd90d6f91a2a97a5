//! slice-map: an insertion-ordered hash map whose entries can be sliced by
//! key and inserted next to an existing key.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) key lookup, stable insertion-order iteration, and O(1)
//!   positional insert/remove, with ranges of entries addressed by keys
//!   rather than integer positions.
//! - Layers:
//!   - LinkStore<T>: ring of order-nodes in a `SlotMap` arena. A reserved
//!     root node closes the ring, so "empty", "first" and "last" need no
//!     special cases. Resolves `(start, stop, direction)` into a lazy walk
//!     over node handles and removes such runs in one pass.
//!   - LinkedIndex<K, V, S>: key index (`HashTable<NodeId>`) and value store
//!     (the node payloads). Every structural call keeps both consistent:
//!     a key is indexed iff exactly one live node carries it.
//!   - SliceMap<K, V, S>: public API; point ops, range ops, equality,
//!     formatting and conversions.
//!
//! Constraints
//! - Nodes are addressed by generational handles, never by reference, so
//!   the ring needs no `unsafe` and a stale handle never aliases a new node.
//! - `Send` but `!Sync`: a map can move between threads, shared access
//!   needs outside synchronisation.
//! - Slice steps are limited to unset, `1` and `-1`.
//!
//! Reentrancy
//! - LinkedIndex enters a debug-only guard for each structural call. Only
//!   `K: Eq`/`K: Hash` run inside it.
//! - `Debug` for `SliceMap` renders a value that leads back into the map
//!   being formatted as `...`.
//!
//! Live iteration
//! - Borrowing iterators (`iter`, `range`, ...) hold `&SliceMap`, so the
//!   map cannot change while they run.
//! - `Cursor` is a detached walk that re-reads the ring on every step and
//!   tolerates mutation in between; see its docs for what it reports.
//!
//! Hasher and rehashing invariants
//! - Each entry stores a precomputed `u64` hash and the index always uses
//!   the stored hash; `K: Hash` is never invoked after insertion.

pub mod error;
mod iter;
mod link_store;
mod linked_index;
mod reentrancy;
#[cfg(feature = "serde")]
mod serde_impl;
pub mod slice;
mod slice_map;
mod slice_map_proptest;

pub use error::{ErrorKind, SliceError};
pub use iter::{
    Cursor, IntoIter, Iter, IterMut, Keys, Range, RangeKeys, RangeValues, Values, ValuesMut,
};
pub use slice::{Direction, Slice};
pub use slice_map::SliceMap;
