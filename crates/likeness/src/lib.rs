//! likeness - Value comparison for assertion libraries.
//!
//! Two questions are answered about values whose concrete type is only known
//! at runtime:
//!
//! - [`equals`]: are they equal, according to the equality and ordering
//!   capabilities the values opt into;
//! - [`verify_equivalence`]: do they have the same structure, ignoring
//!   collection order and numeric representation, and if not, where do they
//!   differ.
//!
//! ```
//! use likeness::{equals, verify_equivalence, FailureKind};
//!
//! assert!(equals(Some(&5_i32), Some(&5_i32)));
//! assert!(!equals::<dyn likeness::Value>(Some(&5_i32), Some(&5_i64)));
//! assert!(verify_equivalence(Some(&5_i32), Some(&5_i64), true).is_ok());
//!
//! let failure = verify_equivalence(Some(&vec![1_i32, 2, 3]), Some(&vec![1_i32, 2]), false)
//!     .unwrap_err();
//! assert_eq!(failure.kind(), FailureKind::MissingCollectionValue);
//! ```
//!
//! [`Comparer`] bundles both engines with shared configuration.

mod comparer;

pub use comparer::{Comparer, ComparerBuilder};
pub use likeness_equal::{CrossTypeRegistry, EqualityComparer};
pub use likeness_equivalent::{
    DebugRender, Equivalence, EquivalenceBuilder, EquivalenceFailure, EquivalenceOptions,
    FailureKind, Render, Side,
};
pub use likeness_value::{
    capability, impl_composite, impl_scalar_enum, reflect, AsValue, Capabilities, CompareAny,
    CompareError, Kind, Member, Scalar, Value,
};

/// Default equality between two optional values of the same declared type.
pub fn equals<T: AsValue + ?Sized>(x: Option<&T>, y: Option<&T>) -> bool {
    EqualityComparer::<T>::new().equals(x, y)
}

/// Structural equivalence with the global accessor cache and `Debug`
/// rendering. `Ok` means equivalent.
pub fn verify_equivalence(
    expected: Option<&dyn Value>,
    actual: Option<&dyn Value>,
    strict: bool,
) -> Result<(), EquivalenceFailure> {
    Equivalence::new().verify(expected, actual, strict)
}
