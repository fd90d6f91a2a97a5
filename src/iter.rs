//! Iterators over a `SliceMap`.
//!
//! Borrowing iterators walk the live ring lazily and hold a shared borrow of
//! the map, so the ring cannot change while they run. `Cursor` is the
//! detached counterpart for walks that interleave with mutation.

use crate::error::SliceError;
use crate::link_store::{LinkStore, Links, NodeId};
use crate::linked_index::Entry;
use crate::slice::Direction;
use crate::slice_map::SliceMap;

/// Entries of the whole map in order. Double ended.
pub struct Iter<'a, K, V> {
    store: &'a LinkStore<Entry<K, V>>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(store: &'a LinkStore<Entry<K, V>>) -> Self {
        Self {
            store,
            front: store.head(Direction::Forward),
            back: store.head(Direction::Backward),
            remaining: store.len(),
        }
    }

    fn pair(&self, id: NodeId) -> Option<(&'a K, &'a V)> {
        self.store.get(id).map(|e| (&e.key, &e.value))
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front;
        self.front = self.store.next(id);
        self.remaining -= 1;
        self.pair(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back;
        self.back = self.store.prev(id);
        self.remaining -= 1;
        self.pair(id)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Mutable entries in order. The order is captured when the iterator is
/// created.
pub struct IterMut<'a, K, V> {
    pub(crate) inner: std::vec::IntoIter<&'a mut Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| (&e.key, &mut e.value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

/// Owning iterator; pops entries off the ring front (or back) one by one.
pub struct IntoIter<K, V> {
    pub(crate) store: LinkStore<Entry<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    fn pop(&mut self, dir: Direction) -> Option<(K, V)> {
        let id = self.store.head(dir);
        self.store.remove(id).map(|e| (e.key, e.value))
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.pop(Direction::Forward)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.store.len(), Some(self.store.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.pop(Direction::Backward)
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// Entries of a key-bounded slice, produced lazily from the live ring.
pub struct Range<'a, K, V> {
    store: &'a LinkStore<Entry<K, V>>,
    links: Links<'a, Entry<K, V>>,
}

impl<'a, K, V> Range<'a, K, V> {
    pub(crate) fn new(
        store: &'a LinkStore<Entry<K, V>>,
        start: NodeId,
        stop: NodeId,
        dir: Direction,
    ) -> Self {
        Self {
            store,
            links: store.links(start, stop, dir),
        }
    }
}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            links: self.links.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.links.next()?;
        self.store.get(id).map(|e| (&e.key, &e.value))
    }
}

pub struct RangeKeys<'a, K, V> {
    pub(crate) inner: Range<'a, K, V>,
}

impl<'a, K, V> Iterator for RangeKeys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }
}

pub struct RangeValues<'a, K, V> {
    pub(crate) inner: Range<'a, K, V>,
}

impl<'a, K, V> Iterator for RangeValues<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A slice walk that does not borrow the map.
///
/// Each call to [`Cursor::next`] reads the ring as it is at that moment, so
/// the map may be mutated between steps. The outcome is defined but
/// positional consistency is not: a cursor keeps the handle of the node it
/// will visit next. If that node is removed the cursor reports
/// [`SliceError::Invalidated`] and stops; if its stop node is removed the
/// walk runs to the end of the map; entries moved or inserted ahead of the
/// cursor are visited where they now sit. A cursor must only be used with
/// the map that created it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Cursor {
    cur: NodeId,
    stop: NodeId,
    dir: Direction,
    done: bool,
}

impl Cursor {
    pub(crate) fn new(start: NodeId, stop: NodeId, dir: Direction) -> Self {
        Self {
            cur: start,
            stop,
            dir,
            done: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance the walk against the current state of `map`.
    #[allow(clippy::should_implement_trait)]
    pub fn next<'m, K, V, S>(
        &mut self,
        map: &'m SliceMap<K, V, S>,
    ) -> Option<Result<(&'m K, &'m V), SliceError>> {
        if self.done {
            return None;
        }
        let store = map.link_store();
        if self.cur == self.stop || self.cur == store.root() {
            self.done = true;
            return None;
        }
        match store.get(self.cur) {
            Some(e) => {
                self.cur = store.step(self.cur, self.dir);
                Some(Ok((&e.key, &e.value)))
            }
            None => {
                self.done = true;
                Some(Err(SliceError::Invalidated))
            }
        }
    }
}
