//! d-ary heap with O(1) key lookup
//!
//! A complete d-ary tree stored in a flat vector, paired with a map from each
//! item's identity key to its current position. Every swap updates both
//! structures together, so an item can be found, re-prioritized and repaired
//! in place without handles or back-pointers.
//!
//! # Layout
//!
//! For arity `d`, the parent of position `i > 0` is `(i - 1) / d` and its
//! children occupy `i*d + 1 ..= i*d + d`, clipped to the current length.
//! `d = 1` degenerates to a fully ordered chain.
//!
//! # Time Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `len`, `peek`, `front`, `contains`, `get_position` | O(1) |
//! | `insert` | O(log_d n) |
//! | `pop` | O(d · log_d n) |
//! | `increase_priority` | O(log_d n) |
//! | `decrease_priority` | O(d · log_d n) |
//! | `update_priority` | O((d + 1) · log_d n) |
//! | `insert_many` into an empty heap | O(n) |
//! | `clear` | O(n) drop, storage is retained |
//!
//! # Example
//!
//! ```rust
//! use rust_dary_heap::compare::MinBy;
//! use rust_dary_heap::DaryHeap;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Task { id: u32, priority: u32 }
//!
//! let mut heap = DaryHeap::new(4, MinBy(|t: &Task| t.priority), |t: &Task| t.id).unwrap();
//! heap.insert(Task { id: 1, priority: 10 }).unwrap();
//! heap.insert(Task { id: 2, priority: 5 }).unwrap();
//! assert_eq!(heap.front().unwrap().id, 2);
//!
//! heap.increase_priority(Task { id: 1, priority: 1 }).unwrap();
//! assert_eq!(heap.front().unwrap().id, 1);
//! ```

use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{validate_arity, HeapConfig};
use crate::instrument::{Instrumentation, NoInstrumentation, Operation};
use crate::traits::{HeapError, KeyExtractor, Position, PriorityCompare};

/// Which traversals an in-place update runs
#[derive(Debug, Clone, Copy)]
enum Repair {
    Up,
    Down,
    Both,
}

impl Repair {
    fn operation(self) -> Operation {
        match self {
            Repair::Up => Operation::IncreasePriority,
            Repair::Down => Operation::DecreasePriority,
            Repair::Both => Operation::UpdatePriority,
        }
    }
}

/// A d-ary heap priority queue with identity-based lookup
///
/// # Type Parameters
/// - `T`: stored item, owned exclusively by the heap
/// - `K`: identity key derived from an item, unique among stored items
/// - `C`: ordering strategy, see [`PriorityCompare`]
/// - `E`: key extractor, see [`KeyExtractor`]
/// - `I`: instrumentation policy, [`NoInstrumentation`] unless chosen otherwise
///
/// The heap never checks that a key stays stable while its item is stored;
/// only the update operations may change a stored item.
#[derive(Clone)]
pub struct DaryHeap<T, K, C, E, I = NoInstrumentation> {
    /// Complete d-ary tree in level order
    data: Vec<T>,
    /// Key of every stored item -> its index in `data`
    positions: FxHashMap<K, Position>,
    arity: usize,
    comparator: C,
    extractor: E,
    instrumentation: I,
}

impl<T, K, C, E> DaryHeap<T, K, C, E, NoInstrumentation>
where
    K: Hash + Eq,
    C: PriorityCompare<T>,
    E: KeyExtractor<T, K>,
{
    /// Creates an empty heap with the given arity
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if `arity` is 0.
    pub fn new(arity: usize, comparator: C, extractor: E) -> Result<Self, HeapError> {
        Self::with_config(HeapConfig::new().arity(arity), comparator, extractor)
    }

    /// Creates an empty heap from a full configuration
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if `config.arity` is 0.
    pub fn with_config(config: HeapConfig, comparator: C, extractor: E) -> Result<Self, HeapError> {
        Self::with_instrumentation(config, comparator, extractor, NoInstrumentation)
    }

    /// Creates a heap holding a single item
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if `arity` is 0.
    pub fn with_first(arity: usize, comparator: C, extractor: E, item: T) -> Result<Self, HeapError> {
        let mut heap = Self::new(arity, comparator, extractor)?;
        heap.insert(item)?;
        Ok(heap)
    }
}

// Reads that need neither the ordering nor the keys
impl<T, K, C, E, I> DaryHeap<T, K, C, E, I> {
    /// Returns the number of stored items
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap holds no items
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the arity (children per node)
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Returns the highest-priority item
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap is empty. Use
    /// [`peek`](Self::peek) when emptiness is an expected case.
    pub fn front(&self) -> Result<&T, HeapError> {
        self.data.first().ok_or(HeapError::EmptyHeap)
    }

    /// Returns the highest-priority item, or `None` if the heap is empty
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Returns the stored items in array order (not priority order)
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates over the stored items in array order (not priority order)
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Consumes the heap, returning its items in array order
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the instrumentation policy, e.g. to read or reset counters
    pub fn instrumentation(&self) -> &I {
        &self.instrumentation
    }
}

impl<T: Clone, K, C, E, I> DaryHeap<T, K, C, E, I> {
    /// Copies the stored items in array order (not priority order)
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }
}

impl<T, K, C, E, I> DaryHeap<T, K, C, E, I>
where
    K: Hash + Eq,
    C: PriorityCompare<T>,
    E: KeyExtractor<T, K>,
    I: Instrumentation,
{
    /// Creates an empty heap that reports to the given instrumentation policy
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if `config.arity` is 0.
    pub fn with_instrumentation(
        config: HeapConfig,
        comparator: C,
        extractor: E,
        instrumentation: I,
    ) -> Result<Self, HeapError> {
        config.validate()?;
        debug!(
            "new d-ary heap: arity={}, capacity={}",
            config.arity, config.capacity
        );
        Ok(Self {
            data: Vec::with_capacity(config.capacity),
            positions: FxHashMap::with_capacity_and_hasher(config.capacity, Default::default()),
            arity: config.arity,
            comparator,
            extractor,
            instrumentation,
        })
    }

    /// Returns true if an item with the same key as `item` is stored
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.positions.contains_key(&self.extractor.key(item))
    }

    /// Returns true if `key` is stored
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// Returns the array position of the item sharing `item`'s key
    #[inline]
    pub fn get_position(&self, item: &T) -> Option<Position> {
        self.positions.get(&self.extractor.key(item)).copied()
    }

    /// Returns the array position of the item with `key`
    #[inline]
    pub fn get_position_by_key(&self, key: &K) -> Option<Position> {
        self.positions.get(key).copied()
    }

    /// Inserts an item
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateKey`] if an item with the same key is
    /// already stored; the heap is left unchanged.
    ///
    /// # Time Complexity
    /// O(log_d n)
    pub fn insert(&mut self, item: T) -> Result<(), HeapError> {
        let index = self.data.len();
        match self.positions.entry(self.extractor.key(&item)) {
            Entry::Occupied(_) => return Err(HeapError::DuplicateKey),
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
        self.data.push(item);

        self.instrumentation.start_operation(Operation::Insert);
        self.sift_up(index);
        self.instrumentation.end_operation();
        Ok(())
    }

    /// Inserts a batch of items
    ///
    /// Into an empty heap a batch of two or more items is arranged with Floyd's
    /// bottom-up construction in O(n); otherwise each new item is sifted up.
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateKey`] if any key is already stored or
    /// appears twice in the batch. The whole batch is rejected and the heap is
    /// left unchanged.
    pub fn insert_many(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), HeapError> {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Ok(());
        }

        let keys: Vec<K> = items.iter().map(|item| self.extractor.key(item)).collect();
        {
            let mut seen: FxHashSet<&K> =
                FxHashSet::with_capacity_and_hasher(keys.len(), Default::default());
            for key in &keys {
                if self.positions.contains_key(key) || !seen.insert(key) {
                    return Err(HeapError::DuplicateKey);
                }
            }
        }

        let start = self.data.len();
        self.data.reserve(items.len());
        self.positions.reserve(keys.len());
        for (offset, (item, key)) in items.into_iter().zip(keys).enumerate() {
            self.data.push(item);
            self.positions.insert(key, start + offset);
        }

        self.instrumentation.start_operation(Operation::Insert);
        if start == 0 && self.data.len() > 1 {
            trace!("insert_many: heapify {} items", self.data.len());
            self.heapify();
        } else {
            trace!("insert_many: sift up {} items", self.data.len() - start);
            for index in start..self.data.len() {
                self.sift_up(index);
            }
        }
        self.instrumentation.end_operation();
        Ok(())
    }

    /// Removes and returns the highest-priority item, or `None` if empty
    ///
    /// # Time Complexity
    /// O(d · log_d n)
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }

        // moves the last item into the root slot
        let top = self.data.swap_remove(0);
        self.positions.remove(&self.extractor.key(&top));

        if !self.data.is_empty() {
            self.reindex(0);
            self.instrumentation.start_operation(Operation::Pop);
            self.sift_down(0);
            self.instrumentation.end_operation();
        }
        Some(top)
    }

    /// Pops up to `count` items, in extraction order
    pub fn pop_many(&mut self, count: usize) -> Vec<T> {
        let take = count.min(self.data.len());
        trace!("pop_many: {} of {} items", take, self.data.len());
        (0..take).map_while(|_| self.pop()).collect()
    }

    /// Replaces the stored item sharing `updated`'s key and moves it toward the root
    ///
    /// The caller guarantees `updated` ranks at least as high as the item it
    /// replaces. Only sift-up runs: if the priority actually dropped, the heap
    /// property is not restored.
    ///
    /// # Errors
    /// Returns [`HeapError::KeyNotFound`] if the key is not stored.
    ///
    /// # Time Complexity
    /// O(log_d n)
    pub fn increase_priority(&mut self, updated: T) -> Result<(), HeapError> {
        let index = self.position_of(&updated)?;
        self.replace_at(index, updated, Repair::Up);
        Ok(())
    }

    /// Replaces the stored item sharing `updated`'s key and moves it toward the leaves
    ///
    /// The caller guarantees `updated` ranks no higher than the item it
    /// replaces. Only sift-down runs.
    ///
    /// # Errors
    /// Returns [`HeapError::KeyNotFound`] if the key is not stored.
    ///
    /// # Time Complexity
    /// O(d · log_d n)
    pub fn decrease_priority(&mut self, updated: T) -> Result<(), HeapError> {
        let index = self.position_of(&updated)?;
        self.replace_at(index, updated, Repair::Down);
        Ok(())
    }

    /// Replaces the stored item sharing `updated`'s key, whichever way its priority moved
    ///
    /// # Errors
    /// Returns [`HeapError::KeyNotFound`] if the key is not stored.
    ///
    /// # Time Complexity
    /// O((d + 1) · log_d n)
    pub fn update_priority(&mut self, updated: T) -> Result<(), HeapError> {
        let index = self.position_of(&updated)?;
        self.replace_at(index, updated, Repair::Both);
        Ok(())
    }

    /// [`increase_priority`](Self::increase_priority) addressed by position
    ///
    /// `updated` normally carries the key of the item at `index`. It may carry
    /// a new key instead, as long as no other stored item owns it.
    ///
    /// # Errors
    /// Returns [`HeapError::IndexOutOfBounds`] if `index >= len()`, or
    /// [`HeapError::DuplicateKey`] if `updated`'s key belongs to another item.
    pub fn increase_priority_by_index(&mut self, index: Position, updated: T) -> Result<(), HeapError> {
        self.rekey_at(index, &updated)?;
        self.replace_at(index, updated, Repair::Up);
        Ok(())
    }

    /// [`decrease_priority`](Self::decrease_priority) addressed by position
    ///
    /// # Errors
    /// Same as [`increase_priority_by_index`](Self::increase_priority_by_index).
    pub fn decrease_priority_by_index(&mut self, index: Position, updated: T) -> Result<(), HeapError> {
        self.rekey_at(index, &updated)?;
        self.replace_at(index, updated, Repair::Down);
        Ok(())
    }

    /// [`update_priority`](Self::update_priority) addressed by position
    ///
    /// # Errors
    /// Same as [`increase_priority_by_index`](Self::increase_priority_by_index).
    pub fn update_priority_by_index(&mut self, index: Position, updated: T) -> Result<(), HeapError> {
        self.rekey_at(index, &updated)?;
        self.replace_at(index, updated, Repair::Both);
        Ok(())
    }

    /// Removes every item, optionally switching to a new arity
    ///
    /// Allocated storage is kept for reuse.
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if `new_arity` is `Some(0)`; the heap
    /// is left untouched, items included.
    pub fn clear(&mut self, new_arity: Option<usize>) -> Result<(), HeapError> {
        if let Some(arity) = new_arity {
            validate_arity(arity)?;
            if arity != self.arity {
                debug!("clear: arity {} -> {}", self.arity, arity);
            }
            self.arity = arity;
        }
        self.data.clear();
        self.positions.clear();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn position_of(&self, item: &T) -> Result<Position, HeapError> {
        self.positions
            .get(&self.extractor.key(item))
            .copied()
            .ok_or(HeapError::KeyNotFound)
    }

    /// Validates a by-index replacement and, if it brings a new key, moves the
    /// index entry over to it. Nothing is touched unless validation passes.
    fn rekey_at(&mut self, index: Position, updated: &T) -> Result<(), HeapError> {
        let current = self.data.get(index).ok_or(HeapError::IndexOutOfBounds)?;
        let old_key = self.extractor.key(current);
        let new_key = self.extractor.key(updated);
        if old_key == new_key {
            return Ok(());
        }
        if self.positions.contains_key(&new_key) {
            return Err(HeapError::DuplicateKey);
        }
        self.positions.remove(&old_key);
        self.positions.insert(new_key, index);
        Ok(())
    }

    fn replace_at(&mut self, index: Position, updated: T, repair: Repair) {
        self.data[index] = updated;

        self.instrumentation.start_operation(repair.operation());
        match repair {
            Repair::Up => {
                self.sift_up(index);
            }
            Repair::Down => {
                self.sift_down(index);
            }
            Repair::Both => {
                let index = self.sift_up(index);
                self.sift_down(index);
            }
        }
        self.instrumentation.end_operation();
    }

    /// Floyd's construction: sift down every internal node, last one first
    fn heapify(&mut self) {
        let len = self.data.len();
        if len < 2 {
            return;
        }
        let last_parent = (len - 2) / self.arity;
        for index in (0..=last_parent).rev() {
            self.sift_down(index);
        }
    }

    /// Moves the item at `index` up until its parent outranks or ties it.
    /// Returns its final position.
    fn sift_up(&mut self, mut index: Position) -> Position {
        while index > 0 {
            let parent = self.parent_of(index);
            if !self.higher_priority(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index
    }

    /// Moves the item at `index` down until no child outranks it.
    /// Returns its final position.
    fn sift_down(&mut self, mut index: Position) -> Position {
        while let Some(best) = self.best_child(index) {
            if !self.higher_priority(best, index) {
                break;
            }
            self.swap(index, best);
            index = best;
        }
        index
    }

    /// Highest-ranked existing child of `index`; the leftmost wins ties
    fn best_child(&self, index: Position) -> Option<Position> {
        let len = self.data.len();
        let first = self.first_child_of(index);
        if first >= len {
            return None;
        }
        let last = first.saturating_add(self.arity - 1).min(len - 1);

        let mut best = first;
        for child in first + 1..=last {
            if self.higher_priority(child, best) {
                best = child;
            }
        }
        Some(best)
    }

    #[inline]
    fn higher_priority(&self, a: Position, b: Position) -> bool {
        self.instrumentation.record_comparison();
        self.comparator.higher_priority(&self.data[a], &self.data[b])
    }

    /// Swaps two slots and updates both index entries
    #[inline]
    fn swap(&mut self, a: Position, b: Position) {
        self.data.swap(a, b);
        self.reindex(a);
        self.reindex(b);
    }

    #[inline]
    fn reindex(&mut self, index: Position) {
        let key = self.extractor.key(&self.data[index]);
        self.positions.insert(key, index);
    }

    #[inline]
    fn parent_of(&self, index: Position) -> Position {
        debug_assert!(index > 0);
        (index - 1) / self.arity
    }

    #[inline]
    fn first_child_of(&self, index: Position) -> Position {
        index.saturating_mul(self.arity).saturating_add(1)
    }
}

impl<'a, T, K, C, E, I> IntoIterator for &'a DaryHeap<T, K, C, E, I> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: fmt::Display, K, C, E, I> fmt::Display for DaryHeap<T, K, C, E, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

impl<T: fmt::Debug, K, C, E, I> fmt::Debug for DaryHeap<T, K, C, E, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaryHeap")
            .field("arity", &self.arity)
            .field("len", &self.data.len())
            .field("items", &self.data)
            .finish()
    }
}
