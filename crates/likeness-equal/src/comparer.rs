//! The equality dispatch chain.
//!
//! Given two values, the chain tries in order:
//!
//! 1. null handling;
//! 2. [`Equatable`](likeness_value::capability::Equatable) on `x`, when `y` has
//!    the same concrete type;
//! 3. [`Orderable`](likeness_value::capability::Orderable) on `x`;
//! 4. [`CompareAny`](likeness_value::CompareAny) on `x`;
//! 5. [`StructuralEquatable`](likeness_value::StructuralEquatable) on `x`, with
//!    elements compared by this same chain;
//! 6. a registered cross-type equality for `(type of x, type of y)`;
//! 7. a registered cross-type ordering for that pair;
//! 8. default equality: scalar equality for scalars, reference identity
//!    otherwise.
//!
//! Ordering failures in steps 3, 4 and 7 are inconclusive: they are logged
//! and the chain moves on.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use likeness_value::{
    is_null, same_reference, type_id_of, AsValue, CompareError, ElementEquality, Kind, Value,
};

use crate::registry::CrossTypeRegistry;

enum Strategy<T: ?Sized> {
    Dispatch(Arc<CrossTypeRegistry>),
    Predicate(Arc<dyn Fn(&T, &T) -> bool + Send + Sync>),
}

/// Decides whether two values of declared type `T` are equal.
///
/// `T` is usually a concrete [`Value`] type or `dyn Value`. The comparer
/// deliberately offers no hashing operation: equal values are not guaranteed
/// to agree on any hash, so it must not back a hash-based container.
pub struct EqualityComparer<T: ?Sized> {
    strategy: Strategy<T>,
    _declared: PhantomData<fn(&T)>,
}

impl<T: ?Sized> EqualityComparer<T> {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(CrossTypeRegistry::new()))
    }

    /// Dispatching comparer that also consults `registry` for cross-type
    /// pairs.
    pub fn with_registry(registry: Arc<CrossTypeRegistry>) -> Self {
        Self {
            strategy: Strategy::Dispatch(registry),
            _declared: PhantomData,
        }
    }

    /// Comparer that replaces the dispatch chain with `predicate`. Nulls are
    /// still handled before the predicate sees the operands.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            strategy: Strategy::Predicate(Arc::new(predicate)),
            _declared: PhantomData,
        }
    }
}

impl<T: ?Sized + AsValue> EqualityComparer<T> {
    pub fn equals(&self, x: Option<&T>, y: Option<&T>) -> bool {
        let x = x.filter(|x| !is_null(x.as_value()));
        let y = y.filter(|y| !is_null(y.as_value()));
        match (x, y) {
            (None, None) => true,
            (None, Some(_)) | (Some(_), None) => false,
            (Some(x), Some(y)) => match &self.strategy {
                Strategy::Dispatch(registry) => {
                    let dispatch = Dispatch {
                        registry: registry.as_ref(),
                    };
                    dispatch.dispatch(x.as_value(), y.as_value())
                }
                Strategy::Predicate(predicate) => predicate(x, y),
            },
        }
    }
}

impl<T: ?Sized> Default for EqualityComparer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for EqualityComparer<T> {
    fn clone(&self) -> Self {
        let strategy = match &self.strategy {
            Strategy::Dispatch(registry) => Strategy::Dispatch(Arc::clone(registry)),
            Strategy::Predicate(predicate) => Strategy::Predicate(Arc::clone(predicate)),
        };
        Self {
            strategy,
            _declared: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for EqualityComparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.strategy {
            Strategy::Dispatch(registry) => f
                .debug_tuple("EqualityComparer::Dispatch")
                .field(registry)
                .finish(),
            Strategy::Predicate(_) => f.write_str("EqualityComparer::Predicate"),
        }
    }
}

/// One run of the dispatch chain over erased values.
///
/// Also serves as the element comparer handed to structural equality, so
/// nested elements go through the full chain for their own runtime types.
struct Dispatch<'r> {
    registry: &'r CrossTypeRegistry,
}

impl Dispatch<'_> {
    fn equals(&self, x: &dyn Value, y: &dyn Value) -> bool {
        match (is_null(x), is_null(y)) {
            (true, true) => true,
            (true, false) | (false, true) => false,
            (false, false) => self.dispatch(x, y),
        }
    }

    fn dispatch(&self, x: &dyn Value, y: &dyn Value) -> bool {
        let capabilities = x.capabilities();

        if let Some(equatable) = capabilities.equatable() {
            if let Some(equal) = equatable.equate(y) {
                return equal;
            }
        }

        if let Some(orderable) = capabilities.orderable() {
            if let Some(ordering) = orderable.order(y) {
                if let Some(equal) = decided(ordering, "ordering", x, y) {
                    return equal;
                }
            }
        }

        if let Some(comparable) = capabilities.comparable() {
            if let Some(equal) = decided(comparable.compare_any(y), "compare-any", x, y) {
                return equal;
            }
        }

        if let Some(structural) = capabilities.structural() {
            return structural.structural_eq(y, self);
        }

        let (x_type, y_type) = (type_id_of(x), type_id_of(y));
        if let Some(equality) = self.registry.equality(x_type, y_type) {
            return equality(x.as_any(), y.as_any());
        }
        if let Some(ordering) = self.registry.ordering(x_type, y_type) {
            let ordering = ordering(x.as_any(), y.as_any());
            if let Some(equal) = decided(ordering, "cross-type ordering", x, y) {
                return equal;
            }
        }

        default_equals(x, y)
    }
}

impl ElementEquality for Dispatch<'_> {
    fn elements_equal(&self, x: &dyn Value, y: &dyn Value) -> bool {
        self.equals(x, y)
    }
}

fn decided(
    ordering: Result<Ordering, CompareError>,
    strategy: &str,
    x: &dyn Value,
    y: &dyn Value,
) -> Option<bool> {
    match ordering {
        Ok(ordering) => Some(ordering == Ordering::Equal),
        Err(err) => {
            log::trace!(
                "{strategy} of {} against {} inconclusive: {err}",
                x.type_name(),
                y.type_name()
            );
            None
        }
    }
}

fn default_equals(x: &dyn Value, y: &dyn Value) -> bool {
    match (x.kind(), y.kind()) {
        (Kind::Scalar(x), Kind::Scalar(y)) => x == y,
        _ => same_reference(x, y),
    }
}
