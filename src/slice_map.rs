//! SliceMap: public ordered map with key-bounded slices and positional
//! insertion.

use crate::error::SliceError;
use crate::iter::{
    Cursor, IntoIter, Iter, IterMut, Keys, Range, RangeKeys, RangeValues, Values, ValuesMut,
};
use crate::link_store::{LinkStore, NodeId};
use crate::linked_index::{Entry, LinkedIndex, Placement, Side};
use crate::reentrancy::FmtRecursion;
use crate::slice::{Direction, Slice};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use tracing::trace;

/// An insertion-ordered hash map.
///
/// Iteration follows insertion order. Updating an existing key keeps its
/// position; only [`insert`](SliceMap::insert) and
/// [`set_range`](SliceMap::set_range) move keys. Ranges of entries are
/// addressed with a [`Slice`] bounded by keys: the start key is included, the
/// stop key is excluded.
///
/// ```
/// use slice_map::{Slice, SliceMap};
///
/// let mut m = SliceMap::from([("foo", 1), ("swag", 2), ("yolo", 3), ("blaze", 4)]);
/// let mid: Vec<_> = m.range_values(Slice::new("swag", "blaze")).unwrap().collect();
/// assert_eq!(mid, [&2, &3]);
///
/// m.delete_range(Slice::new("swag", "blaze")).unwrap();
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["foo", "blaze"]);
/// ```
pub struct SliceMap<K, V, S = RandomState> {
    inner: LinkedIndex<K, V, S>,
    fmt_guard: FmtRecursion,
}

impl<K, V> SliceMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V> Default for SliceMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> SliceMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            inner: LinkedIndex::with_capacity_and_hasher(capacity, hasher),
            fmt_guard: FmtRecursion::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        self.inner.hasher()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub(crate) fn link_store(&self) -> &LinkStore<Entry<K, V>> {
        self.inner.links()
    }

    #[cfg(test)]
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        self.inner.check_consistency()
    }

    /// Drop every entry. The map stays usable and empty.
    pub fn clear(&mut self) {
        let removed = self.inner.len();
        self.inner.clear();
        trace!(removed, "slice map cleared");
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.inner.links())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.inner.links_mut().ordered_mut().into_iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    fn entry_at(&self, id: NodeId) -> Option<(&K, &V)> {
        self.inner.links().get(id).map(|e| (&e.key, &e.value))
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry_at(self.inner.links().head(Direction::Forward))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.entry_at(self.inner.links().head(Direction::Backward))
    }
}

impl<K, V, S> SliceMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn node<Q>(&self, key: &Q) -> Result<NodeId, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.find(key).ok_or(SliceError::KeyNotFound)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.find(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Result<&V, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Result<(&K, &V), SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.node(key)?;
        self.entry_at(id).ok_or(SliceError::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.node(key)?;
        self.inner
            .links_mut()
            .get_mut(id)
            .map(|e| &mut e.value)
            .ok_or(SliceError::KeyNotFound)
    }

    /// Set `key` to `value`. A new key is appended; an existing key keeps
    /// its position. Returns the replaced value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.inner.upsert(key, value, Placement::Append).1
    }

    /// Remove `key` from the map.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<(), SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.pop(key).map(drop)
    }

    /// Remove `key` and return its value.
    pub fn pop<Q>(&mut self, key: &Q) -> Result<V, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.pop_entry(key).map(|(_, v)| v)
    }

    pub fn pop_entry<Q>(&mut self, key: &Q) -> Result<(K, V), SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.node(key)?;
        self.inner.remove(id).ok_or(SliceError::KeyNotFound)
    }

    /// Remove `key` and return its value, or `default` when absent.
    pub fn pop_or<Q>(&mut self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.pop(key).unwrap_or(default)
    }

    /// Remove the last entry, or the first when `last` is false.
    pub fn pop_item(&mut self, last: bool) -> Result<(K, V), SliceError> {
        let dir = if last {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let id = self.inner.links().head(dir);
        self.inner.remove(id).ok_or(SliceError::Empty)
    }

    /// Value for `key`, setting it to `default` first if absent.
    pub fn set_default(&mut self, key: K, default: V) -> &mut V {
        let id = match self.inner.find(&key) {
            Some(id) => id,
            None => self.inner.upsert(key, default, Placement::Append).0,
        };
        match self.inner.links_mut().get_mut(id) {
            Some(e) => &mut e.value,
            None => unreachable!("indexed node has an entry"),
        }
    }

    /// Place `(new_key, value)` directly before (or after) the entry for
    /// `key`. If `new_key` already exists it is moved there and its value
    /// replaced; the previous value is returned.
    pub fn insert<Q>(
        &mut self,
        key: &Q,
        pair: (K, V),
        before: bool,
    ) -> Result<Option<V>, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let anchor = self.node(key)?;
        let side = if before { Side::Before } else { Side::After };
        let (new_key, value) = pair;
        Ok(self.inner.upsert(new_key, value, Placement::At(anchor, side)).1)
    }

    pub fn insert_before<Q>(
        &mut self,
        key: &Q,
        new_key: K,
        value: V,
    ) -> Result<Option<V>, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.insert(key, (new_key, value), true)
    }

    pub fn insert_after<Q>(
        &mut self,
        key: &Q,
        new_key: K,
        value: V,
    ) -> Result<Option<V>, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.insert(key, (new_key, value), false)
    }

    /// Validate a slice and resolve it to `(first node, stop node, direction)`.
    /// An open start resolves to the head in the walk direction, an open stop
    /// to the root.
    fn resolve<Q>(&self, slice: &Slice<'_, Q>) -> Result<(NodeId, NodeId, Direction), SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let dir = slice.direction()?;
        let links = self.inner.links();
        let start = match slice.start {
            Some(k) => self.node(k)?,
            None => links.head(dir),
        };
        let stop = match slice.stop {
            Some(k) => self.node(k)?,
            None => links.root(),
        };
        Ok((start, stop, dir))
    }

    /// Entries of `slice` in walk order. Bounds and step are checked up
    /// front; the walk itself is lazy.
    pub fn range<'q, Q>(
        &self,
        slice: impl Into<Slice<'q, Q>>,
    ) -> Result<Range<'_, K, V>, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        let (start, stop, dir) = self.resolve(&slice.into())?;
        Ok(Range::new(self.inner.links(), start, stop, dir))
    }

    pub fn range_keys<'q, Q>(
        &self,
        slice: impl Into<Slice<'q, Q>>,
    ) -> Result<RangeKeys<'_, K, V>, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        self.range(slice).map(|inner| RangeKeys { inner })
    }

    pub fn range_values<'q, Q>(
        &self,
        slice: impl Into<Slice<'q, Q>>,
    ) -> Result<RangeValues<'_, K, V>, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        self.range(slice).map(|inner| RangeValues { inner })
    }

    /// A detached walk over `slice`; see [`Cursor`].
    pub fn cursor<'q, Q>(&self, slice: impl Into<Slice<'q, Q>>) -> Result<Cursor, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        let (start, stop, dir) = self.resolve(&slice.into())?;
        Ok(Cursor::new(start, stop, dir))
    }

    /// Remove every entry in `slice`. Returns how many were removed.
    pub fn delete_range<'q, Q>(
        &mut self,
        slice: impl Into<Slice<'q, Q>>,
    ) -> Result<usize, SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        let (start, stop, dir) = self.resolve(&slice.into())?;
        let (_, _, removed) = self.inner.remove_span(start, stop, dir);
        trace!(removed, ?dir, "slice map range deleted");
        Ok(removed)
    }

    /// Replace the entries in `slice` with `replacement`.
    ///
    /// The replacement is first collected into a map of its own, so a
    /// duplicate key inside it keeps its first position and last value.
    /// Then the slice is removed and the replacement laid into the gap in
    /// order. A replacement key that still exists elsewhere in the map is
    /// moved into the gap. For an empty slice (`start == stop`) nothing is
    /// removed and the replacement lands directly in front of `start`.
    /// Walking the slice backward lays the replacement out so that a
    /// backward walk over the gap yields it in order.
    ///
    /// Nothing is mutated unless the bounds and step are valid.
    pub fn set_range<'q, Q, I>(
        &mut self,
        slice: impl Into<Slice<'q, Q>>,
        replacement: I,
    ) -> Result<(), SliceError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
        I: IntoIterator<Item = (K, V)>,
        S: Clone,
    {
        let (start, stop, dir) = self.resolve(&slice.into())?;
        let mut staged = SliceMap::with_hasher(self.hasher().clone());
        staged.extend(replacement);

        let (left, right, removed) = self.inner.remove_span(start, stop, dir);
        let inserted = staged.len();
        let (mut anchor, side) = match dir {
            Direction::Forward => (left, Side::After),
            Direction::Backward => (right, Side::Before),
        };
        for (key, value) in staged {
            anchor = self.inner.upsert(key, value, Placement::At(anchor, side)).0;
        }
        trace!(removed, inserted, ?dir, "slice map range replaced");
        Ok(())
    }

    /// Set each pair in order; equivalent to `extend`.
    pub fn update<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.extend(pairs);
    }

    /// Same mapping, order ignored.
    pub fn eq_unordered<S2>(&self, other: &SliceMap<K, V, S2>) -> bool
    where
        V: PartialEq,
        S2: BuildHasher,
    {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Ok(v))
    }
}

impl<K, V, S> SliceMap<K, V, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher + Default,
{
    /// A map with every key of `keys` set to `value`, in first-seen order.
    pub fn from_keys<I>(keys: I, value: V) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut map = Self::with_hasher(S::default());
        for key in keys {
            map.set(key, value.clone());
        }
        map
    }
}

impl<K, V, S> Clone for SliceMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            fmt_guard: FmtRecursion::new(),
        }
    }
}

impl<K, V, S> fmt::Debug for SliceMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_token) = self.fmt_guard.try_enter() else {
            return f.write_str("...");
        };
        f.write_str("SliceMap(")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({:?}, {:?})", k, v)?;
        }
        f.write_str(")")
    }
}

/// Ordered equality: same entries in the same order.
impl<K, V, S1, S2> PartialEq<SliceMap<K, V, S2>> for SliceMap<K, V, S1>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &SliceMap<K, V, S2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for SliceMap<K, V, S> {}

/// Against an unordered map only the mapping is compared.
impl<K, V, S, S2> PartialEq<HashMap<K, V, S2>> for SliceMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S2: BuildHasher,
{
    fn eq(&self, other: &HashMap<K, V, S2>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, Q, V, S> Index<&Q> for SliceMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if `key` is absent.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for SliceMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for SliceMap<K, V, S>
where
    K: Eq + Hash + Copy,
    V: Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(k, v)| (*k, *v)));
    }
}

impl<K, V, S> FromIterator<(K, V)> for SliceMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for SliceMap<K, V>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K, V, S> IntoIterator for SliceMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            store: self.inner.into_links(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a SliceMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut SliceMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn b() -> SliceMap<&'static str, &'static str> {
        SliceMap::from([
            ("foo", "foobar"),
            ("swag", "swagger"),
            ("yolo", "420"),
            ("blaze", "it"),
        ])
    }

    fn keys<K: Clone, V, S>(m: &SliceMap<K, V, S>) -> Vec<K> {
        m.keys().cloned().collect()
    }

    #[test]
    fn set_appends_and_updates_in_place() {
        let mut m = SliceMap::new();
        assert_eq!(m.set(1, 10), None);
        assert_eq!(m.set(2, 20), None);
        assert_eq!(m.set(1, 11), Some(10));
        assert_eq!(keys(&m), vec![1, 2]);
        assert_eq!(m.get(&1), Ok(&11));
        assert_eq!(m.get(&3), Err(SliceError::KeyNotFound));
    }

    #[test]
    fn point_delete_and_pop() {
        let mut m = SliceMap::from([(1, 10), (2, 20), (3, 30)]);
        assert_eq!(m.delete(&2), Ok(()));
        assert_eq!(m.delete(&2), Err(SliceError::KeyNotFound));
        assert_eq!(m.pop(&3), Ok(30));
        assert_eq!(m.pop_or(&3, -1), -1);
        assert_eq!(keys(&m), vec![1]);
    }

    #[test]
    fn pop_item_takes_either_end() {
        let mut m = SliceMap::from([(1, 10), (2, 20), (3, 30)]);
        assert_eq!(m.pop_item(true), Ok((3, 30)));
        assert_eq!(m.pop_item(false), Ok((1, 10)));
        assert_eq!(m.pop_item(false), Ok((2, 20)));
        let e = m.pop_item(true).unwrap_err();
        assert_eq!(e, SliceError::Empty);
        assert_eq!(e.kind(), ErrorKind::Key);
    }

    #[test]
    fn set_default_only_sets_when_absent() {
        let mut m = SliceMap::from([("a", 1)]);
        assert_eq!(*m.set_default("a", 5), 1);
        *m.set_default("b", 2) += 1;
        assert_eq!(m.get("b"), Ok(&3));
        assert_eq!(keys(&m), vec!["a", "b"]);
    }

    #[test]
    fn positional_insert_before_and_after() {
        let mut a = SliceMap::from([(10, 100), (20, 200), (30, 300)]);
        a.insert(&20, (25, 250), false).unwrap();
        a.insert(&20, (15, 150), true).unwrap();
        a.insert(&10, (0, 0), true).unwrap();
        a.insert(&30, (40, 400), false).unwrap();
        let got: Vec<_> = a.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(
            got,
            vec![(0, 0), (10, 100), (15, 150), (20, 200), (25, 250), (30, 300), (40, 400)]
        );
    }

    #[test]
    fn insert_moves_existing_key() {
        let mut m = SliceMap::from([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
        assert_eq!(m.insert(&2, (4, 'D'), true), Ok(Some('d')));
        assert_eq!(keys(&m), vec![1, 4, 2, 3]);
        // Already adjacent: order unchanged.
        m.insert_before(&2, 4, 'x').unwrap();
        m.insert_after(&1, 4, 'y').unwrap();
        assert_eq!(keys(&m), vec![1, 4, 2, 3]);
        // Relative to itself.
        m.insert(&3, (3, 'C'), false).unwrap();
        assert_eq!(keys(&m), vec![1, 4, 2, 3]);
        assert_eq!(m[&3], 'C');
        assert_eq!(m.insert(&9, (5, 'e'), true), Err(SliceError::KeyNotFound));
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn slices_are_half_open() {
        let m = b();
        let v: Vec<_> = m.range_values(Slice::new("swag", "blaze")).unwrap().copied().collect();
        assert_eq!(v, vec!["swagger", "420"]);
        let k: Vec<_> = m.range_keys(Slice::starting_at("yolo")).unwrap().copied().collect();
        assert_eq!(k, vec!["yolo", "blaze"]);
        let k: Vec<_> = m.range_keys(Slice::ending_before("blaze")).unwrap().copied().collect();
        assert_eq!(k, vec!["foo", "swag", "yolo"]);
        let k: Vec<_> = m.range_keys(Slice::<str>::full()).unwrap().copied().collect();
        assert_eq!(k, keys(&m));
    }

    #[test]
    fn backward_slices() {
        let m = b();
        let k: Vec<_> = m.range_keys(Slice::<str>::full().rev()).unwrap().copied().collect();
        assert_eq!(k, vec!["blaze", "yolo", "swag", "foo"]);
        let k: Vec<_> = m
            .range_keys(Slice::new("yolo", "foo").rev())
            .unwrap()
            .copied()
            .collect();
        assert_eq!(k, vec!["yolo", "swag"]);
    }

    #[test]
    fn slice_validation_errors() {
        let m = b();
        assert_eq!(m.range(Slice::new("nope", "foo")).err(), Some(SliceError::KeyNotFound));
        assert_eq!(m.range(Slice::new("foo", "nope")).err(), Some(SliceError::KeyNotFound));
        let e = m.range(Slice::<str>::full().with_step(0)).err().unwrap();
        assert_eq!(e.kind(), ErrorKind::Value);
        let e = m.range(Slice::<str>::full().with_step(2)).err().unwrap();
        assert_eq!(e.kind(), ErrorKind::Type);
    }

    #[test]
    fn delete_range_removes_from_every_store() {
        let mut m = b();
        assert_eq!(m.delete_range(Slice::new("swag", "blaze")), Ok(2));
        assert_eq!(keys(&m), vec!["foo", "blaze"]);
        assert!(!m.contains_key("swag"));
        assert!(!m.contains_key("yolo"));
        assert_eq!(m.len(), 2);
        assert_eq!(m.delete_range(Slice::new("foo", "foo")), Ok(0));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn set_range_replaces_span() {
        let mut m = b();
        m.set_range(Slice::new("swag", "blaze"), [("x", "1"), ("y", "2")]).unwrap();
        assert_eq!(keys(&m), vec!["foo", "x", "y", "blaze"]);
        assert!(!m.contains_key("swag"));
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn set_range_on_empty_slice_inserts_before_start() {
        let mut m = b();
        m.set_range(Slice::new("swag", "swag"), [("x", "1")]).unwrap();
        assert_eq!(keys(&m), vec!["foo", "x", "swag", "yolo", "blaze"]);
    }

    #[test]
    fn set_range_moves_keys_found_elsewhere() {
        let mut m = b();
        m.set_range(Slice::new("swag", "yolo"), [("blaze", "moved"), ("n", "new")])
            .unwrap();
        assert_eq!(keys(&m), vec!["foo", "blaze", "n", "yolo"]);
        assert_eq!(m.get("blaze"), Ok(&"moved"));
        // Boundary keys as replacement stay in place.
        m.set_range(Slice::new("n", "yolo"), [("blaze", "b"), ("yolo", "y")])
            .unwrap();
        assert_eq!(keys(&m), vec!["foo", "blaze", "yolo"]);
    }

    #[test]
    fn set_range_backward_lays_out_for_backward_walk() {
        let mut m = SliceMap::from([(1, ()), (2, ()), (3, ()), (4, ())]);
        m.set_range(Slice::new(&3, &1).rev(), [(7, ()), (8, ()), (9, ())]).unwrap();
        assert_eq!(keys(&m), vec![1, 9, 8, 7, 4]);
        let back: Vec<_> = m
            .range_keys(Slice::new(&7, &1).rev())
            .unwrap()
            .copied()
            .collect();
        assert_eq!(back, vec![7, 8, 9]);
    }

    #[test]
    fn set_range_with_bad_bound_leaves_map_untouched() {
        let mut m = b();
        let before = m.clone();
        assert_eq!(
            m.set_range(Slice::new("swag", "zzz"), [("x", "1")]),
            Err(SliceError::KeyNotFound)
        );
        assert_eq!(m, before);
    }

    #[test]
    fn equality_is_ordered_between_slice_maps() {
        let a = SliceMap::from([(1, 1), (2, 2)]);
        let c = SliceMap::from([(2, 2), (1, 1)]);
        assert_ne!(a, c);
        assert!(a.eq_unordered(&c));
        let h: HashMap<_, _> = [(2, 2), (1, 1)].into_iter().collect();
        assert!(a == h);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn clone_is_independent() {
        let a = b();
        let mut c = a.clone();
        assert_eq!(a, c);
        c.set("new", "v");
        c.delete("foo").unwrap();
        assert_eq!(keys(&a), vec!["foo", "swag", "yolo", "blaze"]);
        assert_ne!(a, c);
    }

    #[test]
    fn from_keys_collapses_duplicates_at_first_position() {
        let m: SliceMap<_, _> = SliceMap::from_keys(["a", "b", "a", "c"], 0);
        assert_eq!(keys(&m), vec!["a", "b", "c"]);
        assert!(m.values().all(|v| *v == 0));
    }

    #[test]
    fn debug_renders_pairs_in_order() {
        let m = SliceMap::from([(1, "a"), (2, "b")]);
        assert_eq!(format!("{:?}", m), r#"SliceMap((1, "a"), (2, "b"))"#);
        let e: SliceMap<i32, i32> = SliceMap::new();
        assert_eq!(format!("{:?}", e), "SliceMap()");
    }

    #[test]
    fn iterators_run_both_ways() {
        let mut m = SliceMap::from([(1, 10), (2, 20), (3, 30)]);
        let rev: Vec<_> = m.keys().rev().copied().collect();
        assert_eq!(rev, vec![3, 2, 1]);
        let mut it = m.iter();
        assert_eq!(it.next(), Some((&1, &10)));
        assert_eq!(it.next_back(), Some((&3, &30)));
        assert_eq!(it.len(), 1);
        assert_eq!(it.next(), Some((&2, &20)));
        assert_eq!(it.next_back(), None);
        for v in m.values_mut() {
            *v += 1;
        }
        assert_eq!(m.values().copied().collect::<Vec<_>>(), vec![11, 21, 31]);
        assert_eq!(m.first(), Some((&1, &11)));
        assert_eq!(m.last(), Some((&3, &31)));
        let owned: Vec<_> = m.into_iter().rev().collect();
        assert_eq!(owned, vec![(3, 31), (2, 21), (1, 11)]);
    }

    #[test]
    fn cursor_follows_live_state() {
        let mut m = SliceMap::from([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
        let mut c = m.cursor(Slice::<i32>::full()).unwrap();
        assert_eq!(c.next(&m), Some(Ok((&1, &'a'))));
        m.set(2, 'B');
        assert_eq!(c.next(&m), Some(Ok((&2, &'B'))));
        m.delete(&3).unwrap();
        assert_eq!(c.next(&m), Some(Err(SliceError::Invalidated)));
        assert_eq!(c.next(&m), None);
        assert!(c.is_done());

        let mut c = m.cursor(Slice::ending_before(&4)).unwrap();
        assert_eq!(c.next(&m), Some(Ok((&1, &'a'))));
        m.insert_after(&2, 9, 'z').unwrap();
        assert_eq!(c.next(&m), Some(Ok((&2, &'B'))));
        assert_eq!(c.next(&m), Some(Ok((&9, &'z'))));
        assert_eq!(c.next(&m), None);

        // Removing the stop node lets the walk run to the end of the map.
        m.set(5, 'e');
        let mut c = m.cursor(Slice::new(&2, &4)).unwrap();
        assert_eq!(c.next(&m), Some(Ok((&2, &'B'))));
        m.delete(&4).unwrap();
        assert_eq!(c.next(&m), Some(Ok((&9, &'z'))));
        assert_eq!(c.next(&m), Some(Ok((&5, &'e'))));
        assert_eq!(c.next(&m), None);
        assert!(c.is_done());
    }

    #[test]
    fn clear_resets() {
        let mut m = b();
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.check_consistency(), Ok(()));
        assert_eq!(keys(&m), Vec::<&str>::new());
        assert!(!m.contains_key("foo"));
        m.set("again", "x");
        assert_eq!(keys(&m), vec!["again"]);
        assert_eq!(m.check_consistency(), Ok(()));
    }
}
