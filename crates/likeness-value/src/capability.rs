//! Equality and ordering capabilities a value can opt into.
//!
//! A type advertises capabilities through [`Value::capabilities`]:
//!
//! - [`Equatable`]: equality against a value of the same concrete type
//!   (any `PartialEq` type qualifies).
//! - [`Orderable`]: three-way comparison against the same concrete type
//!   (any `PartialOrd` type qualifies).
//! - [`CompareAny`]: three-way comparison against an arbitrary value, which
//!   may fail.
//! - [`StructuralEquatable`]: element-wise equality for aggregates, with
//!   element comparison supplied by the caller.

use std::cmp::Ordering;
use std::fmt;

use crate::error::CompareError;
use crate::value::Value;

pub trait Equatable {
    /// `None` when `other` is not the same concrete type.
    fn equate(&self, other: &dyn Value) -> Option<bool>;
}

impl<T: PartialEq + 'static> Equatable for T {
    fn equate(&self, other: &dyn Value) -> Option<bool> {
        other
            .as_any()
            .downcast_ref::<T>()
            .map(|other| self == other)
    }
}

pub trait Orderable {
    /// `None` when `other` is not the same concrete type.
    fn order(&self, other: &dyn Value) -> Option<Result<Ordering, CompareError>>;
}

impl<T: PartialOrd + 'static> Orderable for T {
    fn order(&self, other: &dyn Value) -> Option<Result<Ordering, CompareError>> {
        let other = other.as_any().downcast_ref::<T>()?;
        Some(self.partial_cmp(other).ok_or(CompareError::Unordered {
            expected: std::any::type_name::<T>(),
            actual: std::any::type_name::<T>(),
        }))
    }
}

pub trait CompareAny {
    fn compare_any(&self, other: &dyn Value) -> Result<Ordering, CompareError>;
}

/// [`CompareAny`] body for types that only order against themselves.
pub fn compare_same_type<T: Ord + 'static>(
    this: &T,
    other: &dyn Value,
) -> Result<Ordering, CompareError> {
    match other.as_any().downcast_ref::<T>() {
        Some(other) => Ok(this.cmp(other)),
        None => Err(CompareError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            actual: other.type_name(),
        }),
    }
}

/// Element comparison handed to [`StructuralEquatable`] implementations.
pub trait ElementEquality {
    fn elements_equal(&self, x: &dyn Value, y: &dyn Value) -> bool;
}

pub trait StructuralEquatable {
    fn structural_eq(&self, other: &dyn Value, elements: &dyn ElementEquality) -> bool;
}

/// The capability views of one value.
#[derive(Clone, Copy, Default)]
pub struct Capabilities<'a> {
    equatable: Option<&'a dyn Equatable>,
    orderable: Option<&'a dyn Orderable>,
    comparable: Option<&'a dyn CompareAny>,
    structural: Option<&'a dyn StructuralEquatable>,
}

impl<'a> Capabilities<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_equatable<T: PartialEq + 'static>(mut self, value: &'a T) -> Self {
        self.equatable = Some(value);
        self
    }

    pub fn with_orderable<T: PartialOrd + 'static>(mut self, value: &'a T) -> Self {
        self.orderable = Some(value);
        self
    }

    pub fn with_compare_any<T: CompareAny>(mut self, value: &'a T) -> Self {
        self.comparable = Some(value);
        self
    }

    pub fn with_structural<T: StructuralEquatable>(mut self, value: &'a T) -> Self {
        self.structural = Some(value);
        self
    }

    pub fn equatable(&self) -> Option<&'a dyn Equatable> {
        self.equatable
    }

    pub fn orderable(&self) -> Option<&'a dyn Orderable> {
        self.orderable
    }

    pub fn comparable(&self) -> Option<&'a dyn CompareAny> {
        self.comparable
    }

    pub fn structural(&self) -> Option<&'a dyn StructuralEquatable> {
        self.structural
    }
}

impl fmt::Debug for Capabilities<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("equatable", &self.equatable.is_some())
            .field("orderable", &self.orderable.is_some())
            .field("comparable", &self.comparable.is_some())
            .field("structural", &self.structural.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equatable_requires_same_type() {
        assert_eq!(1_i32.equate(&1_i32), Some(true));
        assert_eq!(1_i32.equate(&2_i32), Some(false));
        assert_eq!(1_i32.equate(&1_i64), None);
    }

    #[test]
    fn orderable_reports_unordered_floats() {
        assert_eq!(1.0_f64.order(&2.0_f64), Some(Ok(Ordering::Less)));
        assert!(matches!(
            f64::NAN.order(&1.0_f64),
            Some(Err(CompareError::Unordered { .. }))
        ));
        assert_eq!(1.0_f64.order(&1_i32), None);
    }

    #[test]
    fn compare_same_type_rejects_foreign_values() {
        assert_eq!(compare_same_type(&3_u8, &3_u8), Ok(Ordering::Equal));
        assert!(matches!(
            compare_same_type(&3_u8, &"3"),
            Err(CompareError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn builder_records_views() {
        let value = 5_i32;
        let caps = Capabilities::none().with_equatable(&value);
        assert!(caps.equatable().is_some());
        assert!(caps.orderable().is_none());
        assert!(caps.structural().is_none());
    }
}
