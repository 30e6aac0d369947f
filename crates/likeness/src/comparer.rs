use std::sync::Arc;

use likeness_equal::{CrossTypeRegistry, EqualityComparer};
use likeness_equivalent::{
    Equivalence, EquivalenceBuilder, EquivalenceFailure, EquivalenceOptions, Render,
};
use likeness_value::reflect::AccessorCache;
use likeness_value::{CompareError, Value};

/// Both comparison engines behind one configuration: the cross-type pairs
/// the equality dispatch consults, and the accessor cache and renderer the
/// equivalence check uses.
#[derive(Debug, Clone)]
pub struct Comparer {
    registry: Arc<CrossTypeRegistry>,
    equivalence: Equivalence,
}

impl Comparer {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ComparerBuilder {
        ComparerBuilder::default()
    }

    pub fn equals(&self, x: Option<&dyn Value>, y: Option<&dyn Value>) -> bool {
        self.comparer::<dyn Value>().equals(x, y)
    }

    /// Typed comparer sharing this comparer's registrations.
    pub fn comparer<T: ?Sized>(&self) -> EqualityComparer<T> {
        EqualityComparer::with_registry(Arc::clone(&self.registry))
    }

    pub fn verify(
        &self,
        expected: Option<&dyn Value>,
        actual: Option<&dyn Value>,
        options: EquivalenceOptions,
    ) -> Result<(), EquivalenceFailure> {
        self.equivalence.verify_with(expected, actual, options)
    }

    pub fn is_equivalent(
        &self,
        expected: Option<&dyn Value>,
        actual: Option<&dyn Value>,
        options: EquivalenceOptions,
    ) -> bool {
        self.verify(expected, actual, options).is_ok()
    }

    pub fn equivalence(&self) -> &Equivalence {
        &self.equivalence
    }
}

impl Default for Comparer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct ComparerBuilder {
    registry: CrossTypeRegistry,
    equivalence: EquivalenceBuilder,
}

impl ComparerBuilder {
    pub fn register_eq<A, B>(mut self) -> Self
    where
        A: PartialEq<B> + 'static,
        B: 'static,
    {
        self.registry.register_eq::<A, B>();
        self
    }

    pub fn register_eq_with<A, B>(
        mut self,
        eq: impl Fn(&A, &B) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        A: 'static,
        B: 'static,
    {
        self.registry.register_eq_with(eq);
        self
    }

    pub fn register_ord<A, B>(mut self) -> Self
    where
        A: PartialOrd<B> + 'static,
        B: 'static,
    {
        self.registry.register_ord::<A, B>();
        self
    }

    pub fn register_ord_with<A, B>(
        mut self,
        cmp: impl Fn(&A, &B) -> Result<std::cmp::Ordering, CompareError> + Send + Sync + 'static,
    ) -> Self
    where
        A: 'static,
        B: 'static,
    {
        self.registry.register_ord_with(cmp);
        self
    }

    pub fn cache(mut self, cache: Arc<AccessorCache>) -> Self {
        self.equivalence = self.equivalence.cache(cache);
        self
    }

    pub fn render(mut self, render: impl Render + 'static) -> Self {
        self.equivalence = self.equivalence.render(render);
        self
    }

    pub fn build(self) -> Comparer {
        log::debug!("comparer built with {:?}", self.registry);
        Comparer {
            registry: Arc::new(self.registry),
            equivalence: self.equivalence.build(),
        }
    }
}
