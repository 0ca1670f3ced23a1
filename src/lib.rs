//! d-ary Heap Priority Queue for Rust
//!
//! This crate provides a generic d-ary heap with a configurable branching
//! factor, a pluggable ordering, and O(1) lookup of any stored item by its
//! identity key. The lookup makes in-place priority updates cheap, which is
//! what algorithms like Dijkstra's shortest path need.
//!
//! # Features
//!
//! - **Any arity**: `d >= 1` children per node, `d = 1` included
//! - **Pluggable ordering**: closures or the composable strategies in [`compare`]
//! - **Identity lookup**: a key extractor maps each item to a unique key; a key → position
//!   index is kept in lock-step with the storage array
//! - **Directional updates**: `increase_priority` (sift-up only, O(log_d n)),
//!   `decrease_priority` (sift-down only, O(d · log_d n)) and `update_priority` (both)
//! - **Linear-time bulk build**: `insert_many` into an empty heap uses Floyd's method
//! - **Zero-cost instrumentation**: comparison counting selected by type parameter,
//!   see [`instrument`]
//!
//! # Example
//!
//! ```rust
//! use rust_dary_heap::compare::MinBy;
//! use rust_dary_heap::{DaryHeap, HeapError};
//!
//! #[derive(Debug, Clone)]
//! struct Node { id: usize, distance: u64 }
//!
//! let mut frontier = DaryHeap::new(
//!     4,
//!     MinBy(|n: &Node| n.distance),
//!     |n: &Node| n.id,
//! )?;
//!
//! frontier.insert(Node { id: 0, distance: 7 })?;
//! frontier.insert(Node { id: 1, distance: 3 })?;
//! frontier.increase_priority(Node { id: 0, distance: 1 })?;
//!
//! assert_eq!(frontier.pop().map(|n| n.id), Some(0));
//! assert_eq!(frontier.pop().map(|n| n.id), Some(1));
//! assert_eq!(frontier.front().err(), Some(HeapError::EmptyHeap));
//! # Ok::<(), HeapError>(())
//! ```

pub mod compare;
pub mod config;
pub mod dary;
pub mod instrument;
pub mod traits;

// Re-export the main types for convenience
pub use config::HeapConfig;
pub use dary::DaryHeap;
pub use traits::{HeapError, Identity, KeyExtractor, Position, PriorityCompare};
