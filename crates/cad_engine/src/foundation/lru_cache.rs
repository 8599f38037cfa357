//! Bounded least-recently-used cache
//!
//! Entries live in a slot map arena and are threaded into a doubly linked
//! recency list, so lookup, promotion and eviction are all O(1).

use std::collections::HashMap;
use std::hash::Hash;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    struct NodeKey;
}

struct Node<K, V> {
    key: K,
    value: V,
    /// Neighbour closer to the most-recently-used end
    prev: Option<NodeKey>,
    /// Neighbour closer to the least-recently-used end
    next: Option<NodeKey>,
}

/// Fixed-capacity key/value cache with least-recently-used eviction
///
/// A capacity of zero disables the cache: nothing is stored and every lookup
/// misses.
pub struct LruCache<K, V> {
    capacity: usize,
    index: HashMap<K, NodeKey>,
    nodes: SlotMap<NodeKey, Node<K, V>>,
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            nodes: SlotMap::with_capacity_and_key(capacity),
            head: None,
            tail: None,
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a value and mark it most-recently-used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let node = *self.index.get(key)?;
        self.move_to_front(node);
        self.nodes.get(node).map(|n| &n.value)
    }

    /// Look up a value without touching the recency order
    pub fn peek(&self, key: &K) -> Option<&V> {
        let node = *self.index.get(key)?;
        self.nodes.get(node).map(|n| &n.value)
    }

    /// Check for a key without touching the recency order
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or overwrite an entry and mark it most-recently-used.
    ///
    /// Returns the entry pushed out to make room, if any. Overwriting an existing
    /// key never evicts.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&node) = self.index.get(&key) {
            if let Some(existing) = self.nodes.get_mut(node) {
                existing.value = value;
            }
            self.move_to_front(node);
            return None;
        }

        let evicted = if self.nodes.len() >= self.capacity {
            self.pop_back()
        } else {
            None
        };

        let node = self.nodes.insert(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.index.insert(key, node);
        self.push_front(node);

        evicted
    }

    /// Remove an entry, returning its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let node = self.index.remove(key)?;
        self.unlink(node);
        self.nodes.remove(node).map(|n| n.value)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterate from most- to least-recently-used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    fn pop_back(&mut self) -> Option<(K, V)> {
        let node = self.tail?;
        self.unlink(node);
        let removed = self.nodes.remove(node)?;
        self.index.remove(&removed.key);
        Some((removed.key, removed.value))
    }

    fn move_to_front(&mut self, node: NodeKey) {
        if self.head == Some(node) {
            return;
        }
        self.unlink(node);
        self.push_front(node);
    }

    fn push_front(&mut self, node: NodeKey) {
        let old_head = self.head;
        if let Some(n) = self.nodes.get_mut(node) {
            n.prev = None;
            n.next = old_head;
        }
        match old_head.and_then(|h| self.nodes.get_mut(h)) {
            Some(head) => head.prev = Some(node),
            None => self.tail = Some(node),
        }
        self.head = Some(node);
    }

    fn unlink(&mut self, node: NodeKey) {
        let Some((prev, next)) = self.nodes.get(node).map(|n| (n.prev, n.next)) else {
            return;
        };

        match prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }

        if let Some(n) = self.nodes.get_mut(node) {
            n.prev = None;
            n.next = None;
        }
    }
}

/// Iterator over cache entries in recency order
pub struct Iter<'a, K, V> {
    nodes: &'a SlotMap<NodeKey, Node<K, V>>,
    cursor: Option<NodeKey>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        Some((&node.key, &node.value))
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("keys", &self.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}
