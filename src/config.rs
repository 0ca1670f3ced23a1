//! Construction options for [`DaryHeap`](crate::DaryHeap)

use crate::traits::HeapError;

/// Arity used when none is configured: a binary heap.
pub const DEFAULT_ARITY: usize = 2;

/// Construction options for a heap
///
/// # Example
///
/// ```rust
/// use rust_dary_heap::HeapConfig;
///
/// let config = HeapConfig::new().arity(4).capacity(1024);
/// assert_eq!(config.arity, 4);
/// assert!(config.validate().is_ok());
///
/// assert!(HeapConfig::new().arity(0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    /// Number of children per node, `d >= 1`
    pub arity: usize,
    /// Number of items to pre-allocate room for. Only a performance hint.
    pub capacity: usize,
}

impl HeapConfig {
    /// Returns the default configuration: arity 2, no pre-allocation
    pub fn new() -> Self {
        Self {
            arity: DEFAULT_ARITY,
            capacity: 0,
        }
    }

    /// Sets the arity
    #[must_use]
    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Sets the pre-allocation hint
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Checks that the configuration describes a valid heap
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if the arity is 0.
    pub fn validate(&self) -> Result<(), HeapError> {
        validate_arity(self.arity)
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub(crate) fn validate_arity(arity: usize) -> Result<(), HeapError> {
    if arity == 0 {
        return Err(HeapError::InvalidArity);
    }
    Ok(())
}
