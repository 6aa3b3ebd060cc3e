//! Byte-bounded LRU cache.
//!
//! Entries live in a slot arena and are linked by index, most recently used at
//! the head. A key index maps each key to its slot so lookups, promotions and
//! evictions are all O(1).
//!
//! ```text
//!   index: HashMap<String, usize>
//!
//!   head ─► [slot 2] ◄──► [slot 0] ◄──► [slot 1] ◄── tail
//!           (MRU)                        (LRU, evicted first)
//! ```
//!
//! The cache is not synchronized; see `SharedCache` for the locked wrapper.

use std::collections::HashMap;

/// Anything stored in the cache reports how many bytes it accounts for.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

/// Invoked with the key and value of every evicted entry, after it has been unlinked.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

pub struct LruCache<V> {
    /// Zero disables eviction.
    max_bytes: usize,
    /// Sum of `key.len() + value.byte_size()` over resident entries.
    used_bytes: usize,
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    index: HashMap<String, usize>,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: ByteSize> LruCache<V> {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            on_evicted: None,
        }
    }

    pub fn with_eviction_callback<F>(max_bytes: usize, callback: F) -> Self
    where
        F: FnMut(&str, &V) + Send + 'static,
    {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Box::new(callback));
        cache
    }

    /// Inserts or replaces `key`, promotes it to most recently used, then
    /// evicts from the tail until the byte budget holds again.
    ///
    /// A value larger than the whole budget is inserted and immediately evicted.
    pub fn add(&mut self, key: &str, value: V) {
        if let Some(&idx) = self.index.get(key) {
            if let Some(node) = self.slots[idx].as_mut() {
                let new_size = value.byte_size();
                let old = std::mem::replace(&mut node.value, value);
                self.used_bytes = self.used_bytes - old.byte_size() + new_size;
            }
            self.move_to_front(idx);
        } else {
            let size = key.len() + value.byte_size();
            let idx = self.alloc(Node {
                key: key.to_string(),
                value,
                prev: None,
                next: None,
            });
            self.attach_front(idx);
            self.index.insert(key.to_string(), idx);
            self.used_bytes += size;
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    /// Looks up `key` and promotes it on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    /// Looks up `key` without touching the recency order.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Evicts the least recently used entry, if any, and hands it back.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        self.detach(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        self.index.remove(&node.key);
        self.used_bytes -= node.key.len() + node.value.byte_size();

        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&node.key, &node.value);
        }

        Some((node.key, node.value))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.slots[cursor?].as_ref()?;
            cursor = node.next;
            Some(node.key.as_str())
        })
    }

    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.attach_front(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head
            && let Some(node) = self.slots[h].as_mut()
        {
            node.prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }
}
