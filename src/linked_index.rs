//! LinkedIndex: key index and value store layered over the link ring.
//!
//! Each order-node's payload is an `Entry` holding the key, the value and the
//! key's precomputed `u64` hash. The key index is a `HashTable<NodeId>`
//! probed with that stored hash, so `K: Hash` only runs on lookups and first
//! insertion, never on rehash. A key is in the index iff exactly one live
//! node carries it, and that node's payload is its value.

use crate::link_store::{LinkStore, NodeId};
use crate::reentrancy::DebugReentrancy;
use crate::slice::Direction;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_table;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    hash: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Before,
    After,
}

/// Where `upsert` puts a key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Placement {
    /// New keys go to the end; existing keys keep their position.
    Append,
    /// New keys are created next to the anchor; existing keys move there.
    At(NodeId, Side),
}

pub(crate) struct LinkedIndex<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<NodeId>,
    links: LinkStore<Entry<K, V>>,
    reentrancy: DebugReentrancy,
}

impl<K, V, S> LinkedIndex<K, V, S> {
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            links: LinkStore::with_capacity(capacity),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.links.len() == 0
    }

    pub(crate) fn links(&self) -> &LinkStore<Entry<K, V>> {
        &self.links
    }

    pub(crate) fn links_mut(&mut self) -> &mut LinkStore<Entry<K, V>> {
        &mut self.links
    }

    pub(crate) fn into_links(self) -> LinkStore<Entry<K, V>> {
        self.links
    }

    pub(crate) fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        self.index.clear();
        self.links.clear();
    }

    /// Index and ring hold the same nodes: one index handle per live node,
    /// none pointing at a freed slot or the root.
    #[cfg(test)]
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        if self.index.len() != self.links.len() {
            return Err(format!(
                "index holds {} handles, ring holds {} nodes",
                self.index.len(),
                self.links.len()
            ));
        }
        for &id in self.index.iter() {
            if !self.links.contains(id) {
                return Err(format!("index handle {id:?} is not a live node"));
            }
        }
        Ok(())
    }
}

impl<K, V, S> LinkedIndex<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn find<Q>(&self, q: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(q);
        self.index
            .find(hash, |&id| {
                self.links
                    .get(id)
                    .map(|e| e.key.borrow() == q)
                    .unwrap_or(false)
            })
            .copied()
    }

    /// Set `key` to `value`, creating or relinking its node per `place`.
    /// Returns the key's node and the value it replaced, if any. A key that
    /// already exists keeps its original `K`.
    pub(crate) fn upsert(&mut self, key: K, value: V, place: Placement) -> (NodeId, Option<V>) {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(&key);
        let links = &self.links;
        let slot = self.index.entry(
            hash,
            |&id| links.get(id).map(|e| e.key == key).unwrap_or(false),
            |&id| links.get(id).map(|e| e.hash).unwrap_or(0),
        );
        match slot {
            hash_table::Entry::Occupied(o) => {
                let id = *o.get();
                match place {
                    Placement::Append => {}
                    Placement::At(anchor, Side::After) => self.links.move_after(anchor, id),
                    Placement::At(anchor, Side::Before) => self.links.move_before(anchor, id),
                }
                let old = self
                    .links
                    .get_mut(id)
                    .map(|e| core::mem::replace(&mut e.value, value));
                (id, old)
            }
            hash_table::Entry::Vacant(v) => {
                let entry = Entry { key, value, hash };
                let id = match place {
                    Placement::Append => self.links.push_back(entry),
                    Placement::At(anchor, Side::After) => self.links.insert_after(anchor, entry),
                    Placement::At(anchor, Side::Before) => self.links.insert_before(anchor, entry),
                };
                v.insert(id);
                (id, None)
            }
        }
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<(K, V)> {
        let _g = self.reentrancy.enter();
        let entry = self.links.remove(id)?;
        if let Ok(o) = self.index.find_entry(entry.hash, |&k| k == id) {
            o.remove();
        }
        Some((entry.key, entry.value))
    }

    /// Remove the run `links(start, stop, dir)` from ring and index alike.
    /// Returns the gap boundaries in link order and the number removed.
    pub(crate) fn remove_span(
        &mut self,
        start: NodeId,
        stop: NodeId,
        dir: Direction,
    ) -> (NodeId, NodeId, usize) {
        let _g = self.reentrancy.enter();
        let index = &mut self.index;
        let mut removed = 0;
        let (left, right) = self.links.remove_span(start, stop, dir, |id, entry| {
            if let Ok(o) = index.find_entry(entry.hash, |&k| k == id) {
                o.remove();
            }
            removed += 1;
        });
        (left, right, removed)
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for LinkedIndex<K, V, S> {
    fn clone(&self) -> Self {
        // Arena clones keep their handles, so the cloned index stays valid.
        Self {
            hasher: self.hasher.clone(),
            index: self.index.clone(),
            links: self.links.clone(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}
