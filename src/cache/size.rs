//! Size Estimation Module
//!
//! Approximate byte footprint of cached payloads. Payload types opt in by
//! implementing [`EstimateSize`]; a cache can also be given a closure that
//! overrides the trait entirely.

use std::sync::Arc;

/// Footprint assumed for payloads with no better estimate.
pub const DEFAULT_ENTRY_SIZE: usize = 100;

/// Per-item estimate for sequences whose items have no exact size.
pub const SEQUENCE_ITEM_SIZE_ESTIMATE: usize = 1024;

/// Closure form of a size estimate, used when the payload type's own
/// estimate is not wanted.
pub type SizeProvider<V> = Arc<dyn Fn(&V) -> usize + Send + Sync>;

// == Estimate Size ==
/// Approximate number of bytes a payload occupies.
pub trait EstimateSize {
    fn estimated_size(&self) -> usize {
        DEFAULT_ENTRY_SIZE
    }
}

impl EstimateSize for str {
    fn estimated_size(&self) -> usize {
        self.len()
    }
}

impl EstimateSize for String {
    fn estimated_size(&self) -> usize {
        self.len()
    }
}

impl EstimateSize for [u8] {
    fn estimated_size(&self) -> usize {
        self.len()
    }
}

impl EstimateSize for Vec<u8> {
    fn estimated_size(&self) -> usize {
        self.len()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Arc<T> {
    fn estimated_size(&self) -> usize {
        (**self).estimated_size()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Box<T> {
    fn estimated_size(&self) -> usize {
        (**self).estimated_size()
    }
}

impl EstimateSize for u64 {}
impl EstimateSize for i64 {}
impl EstimateSize for bool {}

/// Estimate for a sequence of `len` items without individual sizes.
pub fn sequence_size(len: usize) -> usize {
    len.saturating_mul(SEQUENCE_ITEM_SIZE_ESTIMATE)
}

/// Size provider that defers to the payload's [`EstimateSize`] impl.
pub fn trait_size_provider<V: EstimateSize + 'static>() -> SizeProvider<V> {
    Arc::new(|value: &V| value.estimated_size())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_uses_utf8_length() {
        assert_eq!("abc".estimated_size(), 3);
        // "ü" is two bytes in UTF-8
        assert_eq!("über".to_string().estimated_size(), 5);
    }

    #[test]
    fn test_bytes_are_exact() {
        let data = vec![0u8; 4096];
        assert_eq!(data.estimated_size(), 4096);
        assert_eq!(Arc::new(data).estimated_size(), 4096);
    }

    #[test]
    fn test_fallback_default() {
        assert_eq!(42u64.estimated_size(), DEFAULT_ENTRY_SIZE);
        assert_eq!(true.estimated_size(), DEFAULT_ENTRY_SIZE);
    }

    #[test]
    fn test_sequence_estimate() {
        assert_eq!(sequence_size(0), 0);
        assert_eq!(sequence_size(3), 3 * SEQUENCE_ITEM_SIZE_ESTIMATE);
    }

    #[test]
    fn test_trait_size_provider() {
        let provider = trait_size_provider::<String>();
        assert_eq!(provider(&"hello".to_string()), 5);
    }
}
