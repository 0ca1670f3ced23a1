//! Comparison counting with pluggable cost
//!
//! A heap carries an [`Instrumentation`] policy as a type parameter, chosen at
//! compile time:
//!
//! - [`NoInstrumentation`]: the default. Zero-sized, every hook is an empty
//!   inlined function, so the heap compiles to exactly the code it would have
//!   without the hooks.
//! - [`ComparisonCounter`]: counts every call into the ordering strategy,
//!   attributed to the public operation that caused it.
//!
//! The heap brackets each public operation with
//! [`start_operation`](Instrumentation::start_operation) /
//! [`end_operation`](Instrumentation::end_operation) and reports each
//! comparison through [`record_comparison`](Instrumentation::record_comparison).
//! A policy only observes; it never changes what a comparison returns.
//!
//! # Example
//!
//! ```rust
//! use rust_dary_heap::compare::MinOrder;
//! use rust_dary_heap::instrument::{ComparisonCounter, Operation};
//! use rust_dary_heap::{DaryHeap, HeapConfig, Identity};
//!
//! let mut heap = DaryHeap::with_instrumentation(
//!     HeapConfig::new().arity(2),
//!     MinOrder::new(),
//!     Identity,
//!     ComparisonCounter::new(),
//! )
//! .unwrap();
//!
//! heap.insert(5).unwrap();
//! heap.insert(3).unwrap();
//! assert_eq!(heap.instrumentation().count(Operation::Insert), 1);
//! assert_eq!(heap.instrumentation().count(Operation::Pop), 0);
//! ```

use std::cell::Cell;
use std::fmt;

/// Public heap operation a comparison is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `insert` and `insert_many`
    Insert,
    /// `pop` and `pop_many`
    Pop,
    /// `increase_priority` and its by-index form
    IncreasePriority,
    /// `decrease_priority` and its by-index form
    DecreasePriority,
    /// `update_priority` and its by-index form
    UpdatePriority,
}

impl Operation {
    /// Every operation, in counter order
    pub const ALL: [Operation; 5] = [
        Operation::Insert,
        Operation::Pop,
        Operation::IncreasePriority,
        Operation::DecreasePriority,
        Operation::UpdatePriority,
    ];

    #[inline]
    fn slot(self) -> usize {
        match self {
            Operation::Insert => 0,
            Operation::Pop => 1,
            Operation::IncreasePriority => 2,
            Operation::DecreasePriority => 3,
            Operation::UpdatePriority => 4,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Insert => "insert",
            Operation::Pop => "pop",
            Operation::IncreasePriority => "increase_priority",
            Operation::DecreasePriority => "decrease_priority",
            Operation::UpdatePriority => "update_priority",
        };
        f.write_str(name)
    }
}

/// Hooks a heap calls while it works
///
/// Hooks take `&self` because comparisons happen during read-only scans of the
/// storage array; counting policies use interior mutability.
pub trait Instrumentation {
    /// Tags subsequent comparisons with `op`
    fn start_operation(&self, op: Operation);

    /// Clears the active tag
    fn end_operation(&self);

    /// Called once per call into the ordering strategy
    fn record_comparison(&self);
}

/// The disabled policy
///
/// Zero-sized; every hook is a no-op the optimizer removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoInstrumentation;

impl Instrumentation for NoInstrumentation {
    #[inline(always)]
    fn start_operation(&self, _op: Operation) {}

    #[inline(always)]
    fn end_operation(&self) {}

    #[inline(always)]
    fn record_comparison(&self) {}
}

/// Totals read out of a [`ComparisonCounter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonCounts {
    pub insert: u64,
    pub pop: u64,
    pub increase_priority: u64,
    pub decrease_priority: u64,
    pub update_priority: u64,
}

impl ComparisonCounts {
    /// Sum over all operations
    pub fn total(&self) -> u64 {
        self.insert + self.pop + self.increase_priority + self.decrease_priority + self.update_priority
    }

    /// Count for a single operation
    pub fn get(&self, op: Operation) -> u64 {
        match op {
            Operation::Insert => self.insert,
            Operation::Pop => self.pop,
            Operation::IncreasePriority => self.increase_priority,
            Operation::DecreasePriority => self.decrease_priority,
            Operation::UpdatePriority => self.update_priority,
        }
    }
}

/// Counts comparisons per [`Operation`]
///
/// Comparisons made while no operation is active are not counted. Not `Sync`:
/// like the heap itself, a counter belongs to one thread of control.
#[derive(Debug, Clone, Default)]
pub struct ComparisonCounter {
    active: Cell<Option<Operation>>,
    counts: [Cell<u64>; 5],
}

impl ComparisonCounter {
    /// Creates a counter with all totals at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// The operation currently tagged, if any
    pub fn active(&self) -> Option<Operation> {
        self.active.get()
    }

    /// Comparisons recorded for `op` since creation or the last reset
    pub fn count(&self, op: Operation) -> u64 {
        self.counts[op.slot()].get()
    }

    /// Comparisons recorded for all operations
    pub fn total(&self) -> u64 {
        self.counts.iter().map(Cell::get).sum()
    }

    /// Snapshot of every total
    pub fn counts(&self) -> ComparisonCounts {
        ComparisonCounts {
            insert: self.count(Operation::Insert),
            pop: self.count(Operation::Pop),
            increase_priority: self.count(Operation::IncreasePriority),
            decrease_priority: self.count(Operation::DecreasePriority),
            update_priority: self.count(Operation::UpdatePriority),
        }
    }

    /// Zeroes every total. The active tag is left alone.
    pub fn reset(&self) {
        for count in &self.counts {
            count.set(0);
        }
    }
}

impl Instrumentation for ComparisonCounter {
    #[inline]
    fn start_operation(&self, op: Operation) {
        self.active.set(Some(op));
    }

    #[inline]
    fn end_operation(&self) {
        self.active.set(None);
    }

    #[inline]
    fn record_comparison(&self) {
        if let Some(op) = self.active.get() {
            let count = &self.counts[op.slot()];
            count.set(count.get() + 1);
        }
    }
}
