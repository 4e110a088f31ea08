//! Opaque leaf values
//!
//! Objects the merge never decomposes (dates, patterns, arbitrary
//! instances). They travel through a merge by reference, so the winning
//! side's instance is the one that ends up in the result.

use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased leaf. Clones share the same instance.
#[derive(Clone)]
pub struct Opaque {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Opaque {
    /// Wrap `value` in a new shared instance.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an existing shared instance without copying it.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: any::type_name::<T>(),
        }
    }

    /// Rust type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Recover the shared instance as a typed `Arc`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// True when both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque<{}>({:p})", self.type_name, Arc::as_ptr(&self.inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Widget(u32);

    #[test]
    fn test_clone_shares_instance() {
        let a = Opaque::new(Widget(7));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_equal_payloads_are_distinct() {
        let a = Opaque::new(Widget(7));
        let b = Opaque::new(Widget(7));
        assert_ne!(a, b);
    }

    #[test]
    fn test_downcast() {
        let a = Opaque::new(Widget(3));
        assert!(a.is::<Widget>());
        assert_eq!(a.downcast_ref::<Widget>(), Some(&Widget(3)));
        assert!(a.downcast_ref::<String>().is_none());
        assert!(a.type_name().ends_with("Widget"));
    }

    #[test]
    fn test_from_arc_keeps_identity() {
        let shared = Arc::new(Widget(1));
        let a = Opaque::from_arc(Arc::clone(&shared));
        let back = a.downcast_arc::<Widget>().unwrap();
        assert!(Arc::ptr_eq(&shared, &back));
    }
}
