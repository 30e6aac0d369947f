//! likeness-equal - Capability-based equality dispatch.
//!
//! [`EqualityComparer`] answers "are these two values equal" for values whose
//! concrete type may only be known at runtime, by trying the equality and
//! ordering capabilities the values opt into, then any cross-type pairs
//! registered in a [`CrossTypeRegistry`], and finally default equality.
//!
//! There is intentionally no hashing counterpart: a comparer built here is not
//! suitable as the key comparer of a hash-based container.

mod comparer;
mod registry;

pub use comparer::EqualityComparer;
pub use registry::CrossTypeRegistry;

/// Compares two values with the default dispatch chain.
pub fn equals(x: &dyn likeness_value::Value, y: &dyn likeness_value::Value) -> bool {
    EqualityComparer::<dyn likeness_value::Value>::new().equals(Some(x), Some(y))
}
