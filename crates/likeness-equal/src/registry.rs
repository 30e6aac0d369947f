//! Cross-type equality and ordering, keyed by the runtime type pair.

use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use likeness_value::CompareError;

type EqualityFn = Arc<dyn Fn(&dyn Any, &dyn Any) -> bool + Send + Sync>;
type OrderingFn = Arc<dyn Fn(&dyn Any, &dyn Any) -> Result<Ordering, CompareError> + Send + Sync>;

/// Equality and ordering between two distinct concrete types.
///
/// Each registration builds a closure statically typed for its `(A, B)` pair
/// once; the dispatch looks it up by the runtime types of the operands.
#[derive(Clone, Default)]
pub struct CrossTypeRegistry {
    equality: HashMap<(TypeId, TypeId), EqualityFn>,
    ordering: HashMap<(TypeId, TypeId), OrderingFn>,
}

impl CrossTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `A: PartialEq<B>` for operands `(A, B)`.
    pub fn register_eq<A, B>(&mut self) -> &mut Self
    where
        A: PartialEq<B> + 'static,
        B: 'static,
    {
        self.register_eq_with::<A, B, _>(|a, b| a == b)
    }

    pub fn register_eq_with<A, B, F>(&mut self, eq: F) -> &mut Self
    where
        A: 'static,
        B: 'static,
        F: Fn(&A, &B) -> bool + Send + Sync + 'static,
    {
        let erased = move |x: &dyn Any, y: &dyn Any| {
            matches!(
                (x.downcast_ref::<A>(), y.downcast_ref::<B>()),
                (Some(x), Some(y)) if eq(x, y)
            )
        };
        self.equality
            .insert((TypeId::of::<A>(), TypeId::of::<B>()), Arc::new(erased));
        self
    }

    /// Registers `A: PartialOrd<B>` for operands `(A, B)`.
    ///
    /// Pairs without an ordering (`partial_cmp` returning `None`) report
    /// [`CompareError::Unordered`].
    pub fn register_ord<A, B>(&mut self) -> &mut Self
    where
        A: PartialOrd<B> + 'static,
        B: 'static,
    {
        self.register_ord_with::<A, B, _>(|a, b| {
            a.partial_cmp(b).ok_or(CompareError::Unordered {
                expected: type_name::<A>(),
                actual: type_name::<B>(),
            })
        })
    }

    pub fn register_ord_with<A, B, F>(&mut self, cmp: F) -> &mut Self
    where
        A: 'static,
        B: 'static,
        F: Fn(&A, &B) -> Result<Ordering, CompareError> + Send + Sync + 'static,
    {
        let erased = move |x: &dyn Any, y: &dyn Any| {
            match (x.downcast_ref::<A>(), y.downcast_ref::<B>()) {
                (Some(x), Some(y)) => cmp(x, y),
                _ => Err(CompareError::TypeMismatch {
                    expected: type_name::<A>(),
                    actual: type_name::<B>(),
                }),
            }
        };
        self.ordering
            .insert((TypeId::of::<A>(), TypeId::of::<B>()), Arc::new(erased));
        self
    }

    pub(crate) fn equality(&self, x: TypeId, y: TypeId) -> Option<&EqualityFn> {
        self.equality.get(&(x, y))
    }

    pub(crate) fn ordering(&self, x: TypeId, y: TypeId) -> Option<&OrderingFn> {
        self.ordering.get(&(x, y))
    }

    pub fn is_empty(&self) -> bool {
        self.equality.is_empty() && self.ordering.is_empty()
    }
}

impl fmt::Debug for CrossTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossTypeRegistry")
            .field("equality", &self.equality.len())
            .field("ordering", &self.ordering.len())
            .finish()
    }
}
