//! Common traits for the d-ary heap
//!
//! This module provides the two capabilities a [`DaryHeap`](crate::DaryHeap) is
//! parameterized over, plus the crate's error type:
//!
//! - [`PriorityCompare`]: the ordering strategy, deciding which of two items
//!   must sit closer to the root
//! - [`KeyExtractor`]: derives the stable identity of an item, used for O(1)
//!   position lookup when priorities change
//!
//! Both traits are implemented for plain closures, so most callers never name
//! them explicitly.

use std::fmt;

/// Zero-based index into the heap's storage array.
pub type Position = usize;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapError {
    /// Strict top access (`front`) on an empty heap
    EmptyHeap,
    /// A priority update addressed a key that is not stored in the heap
    KeyNotFound,
    /// The arity (branching factor) must be at least 1
    InvalidArity,
    /// A by-index operation was given a position past the end of the heap
    IndexOutOfBounds,
    /// The item's key is already owned by another stored item
    DuplicateKey,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "operation requires a non-empty heap"),
            HeapError::KeyNotFound => write!(f, "key not found in heap"),
            HeapError::InvalidArity => write!(f, "heap arity (d) must be >= 1"),
            HeapError::IndexOutOfBounds => write!(f, "position is out of bounds"),
            HeapError::DuplicateKey => write!(f, "key is already present in heap"),
        }
    }
}

impl std::error::Error for HeapError {}

/// Ordering strategy for a heap
///
/// `higher_priority(a, b)` returns true iff `a` must rank closer to the root
/// than `b`. Implementations must be a strict weak ordering (irreflexive,
/// transitive, consistent); anything else yields an unspecified but memory-safe
/// heap shape.
///
/// The strategy must not observe or mutate the heap it orders.
///
/// # Example
///
/// ```rust
/// use rust_dary_heap::PriorityCompare;
///
/// let min = |a: &i32, b: &i32| a < b;
/// assert!(min.higher_priority(&1, &2));
/// assert!(!min.higher_priority(&2, &2));
/// ```
pub trait PriorityCompare<T> {
    /// Returns true if `a` has strictly higher priority than `b`
    fn higher_priority(&self, a: &T, b: &T) -> bool;
}

impl<T, F> PriorityCompare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Derives the identity key of an item
///
/// Keys must be unique among the items stored in one heap and must not change
/// while the item is stored. The heap never inspects an item except through
/// this trait and its [`PriorityCompare`].
pub trait KeyExtractor<T, K> {
    /// Returns the identity key of `item`
    fn key(&self, item: &T) -> K;
}

impl<T, K, F> KeyExtractor<T, K> for F
where
    F: Fn(&T) -> K,
{
    #[inline]
    fn key(&self, item: &T) -> K {
        self(item)
    }
}

/// Key extractor for items that are their own identity
///
/// Useful for heaps of plain values such as integers, where every value
/// appears at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T: Clone> KeyExtractor<T, T> for Identity {
    #[inline]
    fn key(&self, item: &T) -> T {
        item.clone()
    }
}
