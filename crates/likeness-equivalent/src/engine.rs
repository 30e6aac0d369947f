//! The recursive equivalence walk.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use likeness_value::reflect::AccessorCache;
use likeness_value::{
    is_null, same_reference, CompareAny, CompareError, Elements, Identity, Kind, Member, Scalar,
    Value,
};

use crate::failure::{EquivalenceFailure, Side};
use crate::render::{DebugRender, Render};

/// Options for one equivalence check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquivalenceOptions {
    /// Also fail on extra collection elements and extra members of the
    /// actual value.
    pub strict: bool,
}

impl EquivalenceOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn loose() -> Self {
        Self { strict: false }
    }
}

/// Decides whether an actual value is equivalent to an expected one.
///
/// Equivalence is structural: collections match as multisets, composites
/// match member by member (by name, through the [`AccessorCache`]), numeric
/// scalars match across representations, and reference cycles are reported
/// instead of followed.
///
/// A collection is never equivalent to a value that is not a collection; the
/// pair fails as a value mismatch rather than being compared member-wise.
#[derive(Clone)]
pub struct Equivalence {
    cache: Arc<AccessorCache>,
    render: Arc<dyn Render>,
}

impl Equivalence {
    /// Engine using the global accessor cache and [`DebugRender`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EquivalenceBuilder {
        EquivalenceBuilder::default()
    }

    pub fn verify(
        &self,
        expected: Option<&dyn Value>,
        actual: Option<&dyn Value>,
        strict: bool,
    ) -> Result<(), EquivalenceFailure> {
        self.verify_with(expected, actual, EquivalenceOptions { strict })
    }

    pub fn verify_with(
        &self,
        expected: Option<&dyn Value>,
        actual: Option<&dyn Value>,
        options: EquivalenceOptions,
    ) -> Result<(), EquivalenceFailure> {
        let mut walk = Walk {
            cache: &self.cache,
            render: self.render.as_ref(),
            strict: options.strict,
            scanning: 0,
            expected_refs: HashSet::new(),
            actual_refs: HashSet::new(),
        };
        let result = walk.compare(expected, actual, "");
        if let Err(failure) = &result {
            log::debug!("{} at '{}'", failure.kind(), failure.prefix());
        }
        result
    }

    pub fn is_equivalent(
        &self,
        expected: Option<&dyn Value>,
        actual: Option<&dyn Value>,
        strict: bool,
    ) -> bool {
        self.verify(expected, actual, strict).is_ok()
    }

    pub fn cache(&self) -> &Arc<AccessorCache> {
        &self.cache
    }
}

impl Default for Equivalence {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Equivalence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equivalence")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct EquivalenceBuilder {
    cache: Option<Arc<AccessorCache>>,
    render: Option<Arc<dyn Render>>,
}

impl EquivalenceBuilder {
    /// Accessor cache to resolve composite members with; defaults to
    /// [`AccessorCache::global`].
    pub fn cache(mut self, cache: Arc<AccessorCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn render(mut self, render: impl Render + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn build(self) -> Equivalence {
        Equivalence {
            cache: self.cache.unwrap_or_else(AccessorCache::global),
            render: self
                .render
                .unwrap_or_else(|| Arc::new(DebugRender) as Arc<dyn Render>),
        }
    }
}

type Members<'v> = Vec<(Cow<'v, str>, Member<'v>)>;

/// State of one top-level check. The reference sets hold the identities of
/// the values currently on the recursion path, one set per side.
///
/// While `scanning` is non-zero the walk is matching collection candidates
/// whose failures are discarded, so operands are not rendered.
struct Walk<'e> {
    cache: &'e AccessorCache,
    render: &'e dyn Render,
    strict: bool,
    scanning: usize,
    expected_refs: HashSet<Identity>,
    actual_refs: HashSet<Identity>,
}

impl Walk<'_> {
    fn compare(
        &mut self,
        expected: Option<&dyn Value>,
        actual: Option<&dyn Value>,
        prefix: &str,
    ) -> Result<(), EquivalenceFailure> {
        let expected = expected.filter(|value| !is_null(*value));
        let actual = actual.filter(|value| !is_null(*value));
        let (expected, actual) = match (expected, actual) {
            (None, None) => return Ok(()),
            (Some(expected), Some(actual)) => (expected, actual),
            (expected, actual) => return Err(self.mismatch(prefix, expected, actual, None)),
        };

        if same_reference(expected, actual) {
            return Ok(());
        }

        let expected_id = Identity::of(expected);
        let actual_id = Identity::of(actual);
        if self.expected_refs.contains(&expected_id) {
            return Err(EquivalenceFailure::circular(Side::Expected, prefix));
        }
        if self.actual_refs.contains(&actual_id) {
            return Err(EquivalenceFailure::circular(Side::Actual, prefix));
        }

        self.expected_refs.insert(expected_id);
        self.actual_refs.insert(actual_id);
        let result = self.compare_values(expected, actual, prefix);
        self.expected_refs.remove(&expected_id);
        self.actual_refs.remove(&actual_id);
        result
    }

    fn compare_values(
        &mut self,
        expected: &dyn Value,
        actual: &dyn Value,
        prefix: &str,
    ) -> Result<(), EquivalenceFailure> {
        if let Kind::Scalar(scalar) = expected.kind() {
            return self.compare_scalars(scalar, expected, actual, prefix);
        }

        if let Some(comparable) = expected.capabilities().comparable() {
            return self.compare_ordered(comparable, expected, actual, prefix);
        }

        match (expected.kind(), actual.kind()) {
            (Kind::Sequence(expected), Kind::Sequence(actual)) => {
                self.compare_sequences(expected, actual, prefix)
            }
            (Kind::Sequence(_), _) | (_, Kind::Sequence(_)) => {
                Err(self.mismatch(prefix, Some(expected), Some(actual), None))
            }
            (expected_kind, actual_kind) => {
                let expected_members = self.members(expected, expected_kind);
                let actual_members = self.members(actual, actual_kind);
                self.compare_members(&expected_members, &actual_members, prefix)
            }
        }
    }

    fn compare_scalars(
        &self,
        scalar: Scalar<'_>,
        expected: &dyn Value,
        actual: &dyn Value,
        prefix: &str,
    ) -> Result<(), EquivalenceFailure> {
        let Kind::Scalar(other) = actual.kind() else {
            return Err(self.mismatch(prefix, Some(expected), Some(actual), None));
        };
        if scalar == other {
            return Ok(());
        }
        if let Some(target) = other.numeric_type() {
            if scalar.coerce(target).is_some_and(|coerced| coerced == other) {
                log::trace!("expected {scalar:?} matched {other:?} after coercion to {target:?}");
                return Ok(());
            }
        }
        if let Some(target) = scalar.numeric_type() {
            if other.coerce(target).is_some_and(|coerced| coerced == scalar) {
                log::trace!("actual {other:?} matched {scalar:?} after coercion to {target:?}");
                return Ok(());
            }
        }
        Err(self.mismatch(prefix, Some(expected), Some(actual), None))
    }

    /// Asks the expected value first, then gives the actual value a chance
    /// to recognize the expected one.
    fn compare_ordered(
        &self,
        comparable: &dyn CompareAny,
        expected: &dyn Value,
        actual: &dyn Value,
        prefix: &str,
    ) -> Result<(), EquivalenceFailure> {
        let reverse = match comparable.compare_any(actual) {
            Ok(Ordering::Equal) => return Ok(()),
            Ok(_) => actual.capabilities().comparable(),
            Err(cause) => return Err(self.mismatch_caused(prefix, expected, actual, cause)),
        };
        match reverse.map(|reverse| reverse.compare_any(expected)) {
            Some(Ok(Ordering::Equal)) => Ok(()),
            Some(Err(cause)) => Err(self.mismatch_caused(prefix, expected, actual, cause)),
            Some(Ok(_)) | None => Err(self.mismatch(prefix, Some(expected), Some(actual), None)),
        }
    }

    /// Pairs every expected element with the first unconsumed equivalent
    /// actual element.
    fn compare_sequences(
        &mut self,
        expected: Elements<'_>,
        actual: Elements<'_>,
        prefix: &str,
    ) -> Result<(), EquivalenceFailure> {
        let expected: Vec<Member<'_>> = expected.collect();
        let actual: Vec<Member<'_>> = actual.collect();
        let mut remaining: Vec<usize> = (0..actual.len()).collect();

        for item in &expected {
            self.scanning += 1;
            let found = remaining.iter().position(|&index| {
                self.compare(Some(item.get()), Some(actual[index].get()), "")
                    .is_ok()
            });
            self.scanning -= 1;
            match found {
                Some(position) => {
                    remaining.remove(position);
                }
                None => {
                    return Err(EquivalenceFailure::MissingCollectionValue {
                        prefix: prefix.to_owned(),
                        expected: self.describe(Some(item.get())),
                        actual: self.describe_sequence(&values(&actual), None),
                    });
                }
            }
        }

        if self.strict && !remaining.is_empty() {
            let extra: Vec<&dyn Value> =
                remaining.iter().map(|&index| actual[index].get()).collect();
            return Err(EquivalenceFailure::ExtraCollectionValue {
                prefix: prefix.to_owned(),
                expected: self.describe_sequence(&values(&expected), None),
                actual: self.describe_sequence(&values(&actual), remaining.first().copied()),
                extra: self.describe_sequence(&extra, None),
            });
        }
        Ok(())
    }

    fn members<'v>(&self, value: &'v dyn Value, kind: Kind<'v>) -> Members<'v> {
        if let Kind::Record(entries) = kind {
            return entries;
        }
        self.cache
            .accessors_for(value)
            .iter()
            .filter_map(|accessor| Some((Cow::Borrowed(accessor.name()), accessor.get(value)?)))
            .collect()
    }

    fn compare_members(
        &mut self,
        expected: &Members<'_>,
        actual: &Members<'_>,
        prefix: &str,
    ) -> Result<(), EquivalenceFailure> {
        if self.strict && expected.len() != actual.len() {
            return Err(member_list_mismatch(prefix, expected, actual));
        }
        for (name, member) in expected {
            let Some((_, other)) = actual.iter().find(|(candidate, _)| candidate == name) else {
                return Err(member_list_mismatch(prefix, expected, actual));
            };
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}.{name}")
            };
            self.compare(Some(member.get()), Some(other.get()), &path)?;
        }
        Ok(())
    }

    fn mismatch(
        &self,
        prefix: &str,
        expected: Option<&dyn Value>,
        actual: Option<&dyn Value>,
        cause: Option<CompareError>,
    ) -> EquivalenceFailure {
        EquivalenceFailure::MemberValueMismatch {
            prefix: prefix.to_owned(),
            expected: self.describe(expected),
            actual: self.describe(actual),
            cause,
        }
    }

    fn describe(&self, value: Option<&dyn Value>) -> String {
        if self.scanning > 0 {
            return String::new();
        }
        self.render.render(value)
    }

    fn describe_sequence(&self, items: &[&dyn Value], focus: Option<usize>) -> String {
        if self.scanning > 0 {
            return String::new();
        }
        self.render.render_sequence(items, focus)
    }

    fn mismatch_caused(
        &self,
        prefix: &str,
        expected: &dyn Value,
        actual: &dyn Value,
        cause: CompareError,
    ) -> EquivalenceFailure {
        log::trace!(
            "ordering of {} against {} failed: {cause}",
            expected.type_name(),
            actual.type_name()
        );
        self.mismatch(prefix, Some(expected), Some(actual), Some(cause))
    }
}

fn values<'m>(members: &'m [Member<'_>]) -> Vec<&'m dyn Value> {
    members.iter().map(|member| member.get()).collect()
}

fn member_list_mismatch(
    prefix: &str,
    expected: &Members<'_>,
    actual: &Members<'_>,
) -> EquivalenceFailure {
    EquivalenceFailure::MemberListMismatch {
        prefix: prefix.to_owned(),
        expected: member_names(expected),
        actual: member_names(actual),
    }
}

fn member_names(members: &Members<'_>) -> Vec<String> {
    members.iter().map(|(name, _)| name.to_string()).collect()
}
