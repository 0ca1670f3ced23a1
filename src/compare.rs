//! Pre-built ordering strategies
//!
//! Composable factories for the common [`PriorityCompare`] shapes:
//!
//! | Strategy | Root holds |
//! |----------|------------|
//! | [`MinOrder`] | the smallest item by natural order |
//! | [`MaxOrder`] | the largest item by natural order |
//! | [`MinBy`] | the item with the smallest extracted sort key |
//! | [`MaxBy`] | the item with the largest extracted sort key |
//! | [`Reverse`] | whatever the wrapped strategy ranks lowest |
//! | [`Chain`] | lexicographic: first strategy decides, second breaks ties |
//!
//! # Example
//!
//! ```rust
//! use rust_dary_heap::compare::{CompareExt, MaxBy, MinBy};
//! use rust_dary_heap::PriorityCompare;
//!
//! #[derive(Clone)]
//! struct Job { urgency: u8, submitted: u64 }
//!
//! // Most urgent first, oldest submission breaks ties
//! let order = MaxBy(|j: &Job| j.urgency).then(MinBy(|j: &Job| j.submitted));
//!
//! let a = Job { urgency: 3, submitted: 20 };
//! let b = Job { urgency: 3, submitted: 10 };
//! assert!(order.higher_priority(&b, &a));
//! ```

use std::marker::PhantomData;

use crate::traits::PriorityCompare;

/// Min-heap ordering by natural order (`a < b`)
///
/// Uses `PartialOrd` so floating-point priorities work; NaN values break the
/// strict weak ordering and must not be stored.
#[derive(Debug)]
pub struct MinOrder<T>(PhantomData<fn(&T)>);

/// Max-heap ordering by natural order (`a > b`)
#[derive(Debug)]
pub struct MaxOrder<T>(PhantomData<fn(&T)>);

impl<T> MinOrder<T> {
    /// Creates the strategy
    pub fn new() -> Self {
        MinOrder(PhantomData)
    }
}

impl<T> MaxOrder<T> {
    /// Creates the strategy
    pub fn new() -> Self {
        MaxOrder(PhantomData)
    }
}

impl<T> Default for MinOrder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Default for MaxOrder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MinOrder<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MinOrder<T> {}

impl<T> Clone for MaxOrder<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MaxOrder<T> {}

impl<T: PartialOrd> PriorityCompare<T> for MinOrder<T> {
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

impl<T: PartialOrd> PriorityCompare<T> for MaxOrder<T> {
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

/// Min-heap ordering by an extracted sort key
///
/// The sort key is independent of the identity key the heap uses for lookup:
/// a task is usually identified by its id and ordered by its cost.
#[derive(Debug, Clone, Copy)]
pub struct MinBy<F>(pub F);

impl<T, F, P> PriorityCompare<T> for MinBy<F>
where
    F: Fn(&T) -> P,
    P: PartialOrd,
{
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        (self.0)(a) < (self.0)(b)
    }
}

/// Max-heap ordering by an extracted sort key
#[derive(Debug, Clone, Copy)]
pub struct MaxBy<F>(pub F);

impl<T, F, P> PriorityCompare<T> for MaxBy<F>
where
    F: Fn(&T) -> P,
    P: PartialOrd,
{
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        (self.0)(a) > (self.0)(b)
    }
}

/// Inverts a strategy: `b` outranks `a` wherever `a` outranked `b`
#[derive(Debug, Clone, Copy)]
pub struct Reverse<C>(pub C);

impl<T, C: PriorityCompare<T>> PriorityCompare<T> for Reverse<C> {
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        self.0.higher_priority(b, a)
    }
}

/// Lexicographic combination of two strategies
///
/// The first strategy decides; only when it ranks neither item above the other
/// does the second get consulted. Nest chains for more than two levels.
#[derive(Debug, Clone, Copy)]
pub struct Chain<A, B>(pub A, pub B);

impl<T, A, B> PriorityCompare<T> for Chain<A, B>
where
    A: PriorityCompare<T>,
    B: PriorityCompare<T>,
{
    #[inline]
    fn higher_priority(&self, a: &T, b: &T) -> bool {
        if self.0.higher_priority(a, b) {
            return true;
        }
        if self.0.higher_priority(b, a) {
            return false;
        }
        self.1.higher_priority(a, b)
    }
}

/// Combinators available on every sized [`PriorityCompare`]
pub trait CompareExt<T>: PriorityCompare<T> + Sized {
    /// Inverts this strategy
    fn reversed(self) -> Reverse<Self> {
        Reverse(self)
    }

    /// Breaks ties of this strategy with `next`
    fn then<N: PriorityCompare<T>>(self, next: N) -> Chain<Self, N> {
        Chain(self, next)
    }
}

impl<T, C: PriorityCompare<T>> CompareExt<T> for C {}
