//! LinkStore: the ring of order-nodes that defines iteration order.
//!
//! Nodes live in a `SlotMap` arena and refer to each other by generational
//! `NodeId` handles, never by reference. A reserved root node carries no
//! payload and closes the list into a ring: `root.next` is the first node,
//! `root.prev` the last, and an empty store is a root pointing at itself.
//! The root is allocated with the store and never freed, so no operation
//! needs a first/last/empty special case.

use crate::slice::Direction;
use slotmap::{new_key_type, SecondaryMap, SlotMap};

new_key_type! {
    /// Stable handle to one order-node. Handles are generational: once a
    /// node is freed its handle never resolves again, even if the slot is
    /// reused.
    pub struct NodeId;
}

#[derive(Debug, Clone)]
struct Node<T> {
    prev: NodeId,
    next: NodeId,
    payload: Option<T>,
}

#[derive(Debug, Clone)]
pub(crate) struct LinkStore<T> {
    nodes: SlotMap<NodeId, Node<T>>,
    root: NodeId,
}

impl<T> LinkStore<T> {
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = SlotMap::with_capacity_and_key(capacity + 1);
        let root = nodes.insert_with_key(|id| Node {
            prev: id,
            next: id,
            payload: None,
        });
        Self { nodes, root }
    }

    #[inline]
    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// True for live non-root nodes.
    #[cfg(test)]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id != self.root && self.nodes.contains_key(id)
    }

    #[inline]
    pub(crate) fn next(&self, id: NodeId) -> NodeId {
        self.nodes[id].next
    }

    #[inline]
    pub(crate) fn prev(&self, id: NodeId) -> NodeId {
        self.nodes[id].prev
    }

    #[inline]
    pub(crate) fn step(&self, id: NodeId, dir: Direction) -> NodeId {
        match dir {
            Direction::Forward => self.next(id),
            Direction::Backward => self.prev(id),
        }
    }

    /// First node in `dir`, or the root when empty.
    #[inline]
    pub(crate) fn head(&self, dir: Direction) -> NodeId {
        self.step(self.root, dir)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).and_then(|n| n.payload.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).and_then(|n| n.payload.as_mut())
    }

    fn link_after(&mut self, anchor: NodeId, id: NodeId) {
        let next = self.nodes[anchor].next;
        {
            let node = &mut self.nodes[id];
            node.prev = anchor;
            node.next = next;
        }
        self.nodes[anchor].next = id;
        self.nodes[next].prev = id;
    }

    fn unlink(&mut self, id: NodeId) {
        let (prev, next) = {
            let node = &self.nodes[id];
            (node.prev, node.next)
        };
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Allocate a node holding `payload` directly after `anchor`.
    pub(crate) fn insert_after(&mut self, anchor: NodeId, payload: T) -> NodeId {
        let id = self.nodes.insert(Node {
            prev: anchor,
            next: anchor,
            payload: Some(payload),
        });
        self.link_after(anchor, id);
        id
    }

    pub(crate) fn insert_before(&mut self, anchor: NodeId, payload: T) -> NodeId {
        let prev = self.prev(anchor);
        self.insert_after(prev, payload)
    }

    pub(crate) fn push_back(&mut self, payload: T) -> NodeId {
        self.insert_before(self.root, payload)
    }

    /// Relink an existing node directly after `anchor`. Moving a node onto
    /// its own slot (or onto itself) leaves the ring untouched.
    pub(crate) fn move_after(&mut self, anchor: NodeId, id: NodeId) {
        debug_assert!(id != self.root, "root node cannot move");
        if id == anchor || self.nodes[anchor].next == id {
            return;
        }
        self.unlink(id);
        self.link_after(anchor, id);
    }

    pub(crate) fn move_before(&mut self, anchor: NodeId, id: NodeId) {
        debug_assert!(id != self.root, "root node cannot move");
        if id == anchor || self.nodes[anchor].prev == id {
            return;
        }
        self.unlink(id);
        let prev = self.nodes[anchor].prev;
        self.link_after(prev, id);
    }

    /// Unlink and free a node, returning its payload. `None` for the root or
    /// a stale handle.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        if id == self.root || !self.nodes.contains_key(id) {
            return None;
        }
        self.unlink(id);
        self.nodes.remove(id).and_then(|n| n.payload)
    }

    /// Free every node except the root and close the ring on it.
    pub(crate) fn clear(&mut self) {
        let root = self.root;
        self.nodes.retain(|id, _| id == root);
        let node = &mut self.nodes[root];
        node.prev = root;
        node.next = root;
    }

    /// Lazy walk from `start` in `dir` that stops before `stop` or at the
    /// root, whichever comes first. Never yields the root.
    pub(crate) fn links(&self, start: NodeId, stop: NodeId, dir: Direction) -> Links<'_, T> {
        Links {
            store: self,
            cur: start,
            stop,
            dir,
        }
    }

    /// Free the run `links(start, stop, dir)` would yield, handing each
    /// payload to `on_remove` after its node is unlinked.
    ///
    /// Returns the nodes on either side of the closed gap in link order
    /// `(left, right)`, with `next(left) == right`. For an empty run the
    /// pair brackets the zero-length gap in front of `start` as seen in
    /// `dir`: `(prev(start), start)` forward and `(start, next(start))`
    /// backward.
    pub(crate) fn remove_span<F>(
        &mut self,
        start: NodeId,
        stop: NodeId,
        dir: Direction,
        mut on_remove: F,
    ) -> (NodeId, NodeId)
    where
        F: FnMut(NodeId, T),
    {
        let outer = self.step(start, dir.reverse());
        let mut cur = start;
        while cur != stop && cur != self.root {
            let after = self.step(cur, dir);
            if let Some(payload) = self.remove(cur) {
                on_remove(cur, payload);
            }
            cur = after;
        }
        // An empty run leaves `cur == start`, which is the insertion point.
        match dir {
            Direction::Forward => (outer, cur),
            Direction::Backward => (cur, outer),
        }
    }

    /// Mutable payloads in ring order. Collected up front: the arena hands
    /// out disjoint `&mut` only through its own unordered iterator.
    pub(crate) fn ordered_mut(&mut self) -> Vec<&mut T> {
        let order: Vec<NodeId> = self
            .links(self.head(Direction::Forward), self.root, Direction::Forward)
            .collect();
        let mut slots: SecondaryMap<NodeId, &mut T> = self
            .nodes
            .iter_mut()
            .filter_map(|(id, n)| n.payload.as_mut().map(|p| (id, p)))
            .collect();
        order.into_iter().filter_map(|id| slots.remove(id)).collect()
    }
}

/// Node handles between two bounds of a walk. Borrows the store, so the
/// ring cannot change underneath it.
pub(crate) struct Links<'a, T> {
    store: &'a LinkStore<T>,
    cur: NodeId,
    stop: NodeId,
    dir: Direction,
}

impl<T> Clone for Links<'_, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            cur: self.cur,
            stop: self.stop,
            dir: self.dir,
        }
    }
}

impl<T> Iterator for Links<'_, T> {
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<NodeId> {
        if self.cur == self.stop || self.cur == self.store.root {
            return None;
        }
        let id = self.cur;
        self.cur = self.store.step(id, self.dir);
        Some(id)
    }
}
