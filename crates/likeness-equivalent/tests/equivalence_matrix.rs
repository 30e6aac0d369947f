//! Structural equivalence matrix covering collections as multisets, strict and
//! loose member lists, numeric coercion, ordering capabilities, cycles, and
//! JSON documents.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error as _;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use likeness_equivalent::{
    DebugRender, Equivalence, EquivalenceFailure, EquivalenceOptions, FailureKind, Render, Side,
};
use likeness_value::reflect::{AccessorCache, MemberDecls, MemberSource, Reflect};
use likeness_value::{impl_composite, Capabilities, CompareAny, CompareError, Kind, Member, Value};
use proptest::prelude::*;
use serde_json::json;

fn engine() -> Equivalence {
    Equivalence::builder()
        .cache(Arc::new(AccessorCache::new()))
        .build()
}

fn verify(
    expected: &dyn Value,
    actual: &dyn Value,
    strict: bool,
) -> Result<(), EquivalenceFailure> {
    engine().verify(Some(expected), Some(actual), strict)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Inner {
    value: i32,
}

impl_composite!(Inner { value });

#[derive(Debug)]
struct Outer {
    name: String,
    inner: Inner,
}

impl_composite!(Outer { name, inner });

#[derive(Debug)]
struct Basket {
    items: Vec<i32>,
}

impl_composite!(Basket { items });

#[derive(Debug)]
struct Diamond {
    left: Rc<Inner>,
    right: Rc<Inner>,
}

impl_composite!(Diamond { left, right });

/// Linked node whose `Next` may point back at itself.
#[derive(Debug)]
struct Node {
    name: String,
    next: OnceCell<Rc<Node>>,
}

impl Value for Node {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Composite
    }

    fn members(&self) -> Option<MemberSource> {
        Some(MemberSource::of::<Self>())
    }
}

impl Reflect for Node {
    fn reflect(members: &mut MemberDecls<Self>) {
        members
            .field("Name", |node| Member::borrowed(&node.name))
            .field("Next", |node| Member::borrowed(&node.next));
    }
}

fn node(name: &str) -> Rc<Node> {
    Rc::new(Node {
        name: name.to_owned(),
        next: OnceCell::new(),
    })
}

fn looped(name: &str) -> Rc<Node> {
    let node = node(name);
    let _ = node.next.set(Rc::clone(&node));
    node
}

#[derive(Debug)]
struct Version {
    major: u32,
    minor: u32,
}

impl Value for Version {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Composite
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_compare_any(self)
    }
}

impl CompareAny for Version {
    fn compare_any(&self, other: &dyn Value) -> Result<Ordering, CompareError> {
        match other.as_any().downcast_ref::<Version>() {
            Some(other) => Ok((self.major, self.minor).cmp(&(other.major, other.minor))),
            None => Err(CompareError::TypeMismatch {
                expected: "Version",
                actual: other.type_name(),
            }),
        }
    }
}

/// Only knows how to order against other tags.
#[derive(Debug)]
struct Tag(&'static str);

/// Orders against tags as well as labels.
#[derive(Debug)]
struct Label(String);

impl Value for Tag {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Composite
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_compare_any(self)
    }
}

impl CompareAny for Tag {
    fn compare_any(&self, other: &dyn Value) -> Result<Ordering, CompareError> {
        Ok(match other.as_any().downcast_ref::<Tag>() {
            Some(other) => self.0.cmp(other.0),
            None => Ordering::Less,
        })
    }
}

impl Value for Label {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Composite
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_compare_any(self)
    }
}

impl CompareAny for Label {
    fn compare_any(&self, other: &dyn Value) -> Result<Ordering, CompareError> {
        let any = other.as_any();
        if let Some(tag) = any.downcast_ref::<Tag>() {
            Ok(self.0.as_str().cmp(tag.0))
        } else if let Some(label) = any.downcast_ref::<Label>() {
            Ok(self.0.cmp(&label.0))
        } else {
            Err(CompareError::custom("labels only compare to tags and labels"))
        }
    }
}

// ---------------------------------------------------------------------------
// Nulls and identity
// ---------------------------------------------------------------------------

#[test]
fn both_absent_is_equivalent() {
    assert!(engine().verify(None, None, true).is_ok());
    assert!(engine()
        .verify(Some(&Option::<i32>::None), Some(&json!(null)), true)
        .is_ok());
}

#[test]
fn one_absent_is_a_value_mismatch() {
    let failure = engine().verify(Some(&1_i32), None, false).unwrap_err();
    assert_eq!(failure.kind(), FailureKind::MemberValueMismatch);
    assert_eq!(failure.to_string(), "Mismatched value\nExpected: 1\nActual:   null");
}

#[test]
fn same_reference_short_circuits() {
    let shared = looped("a");
    assert!(verify(&shared, &Rc::clone(&shared), true).is_ok());
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[test]
fn collections_match_as_multisets() {
    assert!(verify(&vec![1_i32, 2, 2], &vec![2_i32, 1, 2], true).is_ok());
    assert!(verify(&vec![1_i32, 2, 2], &vec![1_i32, 1, 2], false).is_err());
}

#[test]
fn extra_elements_fail_only_in_strict_mode() {
    let expected = vec![1_i32, 2];
    let actual = vec![1_i32, 2, 3];
    assert!(verify(&expected, &actual, false).is_ok());
    let failure = verify(&expected, &actual, true).unwrap_err();
    assert_eq!(
        failure,
        EquivalenceFailure::ExtraCollectionValue {
            prefix: String::new(),
            expected: "[1, 2]".into(),
            actual: "[1, 2, <3>]".into(),
            extra: "[3]".into(),
        }
    );
    assert_eq!(
        failure.to_string(),
        "Extra values found\nExpected: [1, 2]\nActual:   [3] left over from [1, 2, <3>]"
    );
}

#[test]
fn missing_element_names_the_element() {
    let failure = verify(&vec![1_i32, 2, 3], &vec![1_i32, 2], false).unwrap_err();
    assert_eq!(
        failure,
        EquivalenceFailure::MissingCollectionValue {
            prefix: String::new(),
            expected: "3".into(),
            actual: "[1, 2]".into(),
        }
    );
    assert_eq!(
        failure.to_string(),
        "Collection value not found\nExpected: 3\nIn:       [1, 2]"
    );
}

#[test]
fn collection_failures_carry_the_member_path() {
    let failure = verify(
        &Basket {
            items: vec![1, 4],
        },
        &Basket {
            items: vec![1, 2],
        },
        true,
    )
    .unwrap_err();
    assert_eq!(failure.kind(), FailureKind::MissingCollectionValue);
    assert_eq!(failure.prefix(), "items");
    assert!(failure
        .to_string()
        .starts_with("Collection value not found in member 'items'"));
}

#[test]
fn collection_kinds_are_interchangeable() {
    let set: HashSet<i64> = HashSet::from([3, 1, 2]);
    assert!(verify(&vec![1_i32, 2, 3], &set, true).is_ok());
    assert!(verify(&[2_u8, 1], &vec![1_i16, 2], true).is_ok());
}

#[test]
fn maps_match_by_entries() {
    let expected = BTreeMap::from([("a".to_owned(), 1_i32), ("b".to_owned(), 2)]);
    let actual = HashMap::from([("b".to_owned(), 2_i64), ("a".to_owned(), 1)]);
    assert!(verify(&expected, &actual, true).is_ok());
    let other = HashMap::from([("b".to_owned(), 1_i64), ("a".to_owned(), 2)]);
    assert!(verify(&expected, &other, true).is_err());
}

#[test]
fn nested_collections() {
    let expected = vec![vec![1_i32, 2], vec![3]];
    let actual = vec![vec![3_i32], vec![2, 1]];
    assert!(verify(&expected, &actual, true).is_ok());
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[test]
fn extra_members_fail_only_in_strict_mode() {
    let expected = json!({"A": 1, "B": 2});
    let actual = json!({"A": 1, "B": 2, "C": 3});
    assert!(verify(&expected, &actual, false).is_ok());
    let failure = verify(&expected, &actual, true).unwrap_err();
    assert_eq!(
        failure,
        EquivalenceFailure::MemberListMismatch {
            prefix: String::new(),
            expected: vec!["A".into(), "B".into()],
            actual: vec!["A".into(), "B".into(), "C".into()],
        }
    );
}

#[test]
fn missing_member_fails_in_loose_mode() {
    let failure = verify(&json!({"A": 1, "Z": 2}), &json!({"A": 1, "B": 2}), false).unwrap_err();
    assert_eq!(failure.kind(), FailureKind::MemberListMismatch);
}

#[test]
fn nested_member_paths_are_dotted() {
    let expected = json!({"Inner": {"Value": 1}});
    let actual = json!({"Inner": {"Value": 2}});
    let failure = verify(&expected, &actual, true).unwrap_err();
    assert_eq!(failure.prefix(), "Inner.Value");
    assert!(failure
        .to_string()
        .starts_with("Mismatched value on member 'Inner.Value'"));
}

#[test]
fn declared_members_are_compared_by_name() {
    let expected = Outer {
        name: "o".into(),
        inner: Inner { value: 1 },
    };
    let same = Outer {
        name: "o".into(),
        inner: Inner { value: 1 },
    };
    let different = Outer {
        name: "o".into(),
        inner: Inner { value: 7 },
    };
    assert!(verify(&expected, &same, true).is_ok());
    let failure = verify(&expected, &different, true).unwrap_err();
    assert_eq!(
        failure.to_string(),
        "Mismatched value on member 'inner.value'\nExpected: 1\nActual:   7"
    );
}

#[test]
fn records_and_declared_members_interoperate() {
    let expected = json!({"value": 3});
    assert!(verify(&expected, &Inner { value: 3 }, true).is_ok());
    assert!(verify(&Inner { value: 3 }, &expected, true).is_ok());
    assert!(verify(&expected, &Inner { value: 4 }, true).is_err());
}

#[test]
fn shared_references_are_not_cycles() {
    let shared = Rc::new(Inner { value: 5 });
    let expected = Diamond {
        left: Rc::clone(&shared),
        right: Rc::clone(&shared),
    };
    let actual = Diamond {
        left: Rc::new(Inner { value: 5 }),
        right: Rc::new(Inner { value: 5 }),
    };
    assert!(verify(&expected, &actual, true).is_ok());
    assert!(verify(&actual, &expected, true).is_ok());
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

#[test]
fn numeric_representations_are_equivalent() {
    assert!(verify(&5_i32, &5_i64, true).is_ok());
    assert!(verify(&5_i64, &5_i32, true).is_ok());
    assert!(verify(&json!(5), &5_u8, true).is_ok());
    assert!(verify(&1.0_f32, &1_i32, true).is_ok());
}

#[test]
fn out_of_range_numbers_are_not_equivalent() {
    assert!(verify(&-1_i32, &u32::MAX, true).is_err());
    assert!(verify(&256_u16, &0_u8, true).is_err());
}

#[test]
fn strings_and_numbers_do_not_mix() {
    let failure = verify(&"5", &5_i32, true).unwrap_err();
    assert_eq!(failure.kind(), FailureKind::MemberValueMismatch);
    assert!(failure.cause().is_none());
}

// ---------------------------------------------------------------------------
// Ordering capabilities
// ---------------------------------------------------------------------------

#[test]
fn compare_any_decides_equivalence() {
    let version = Version { major: 1, minor: 2 };
    assert!(verify(&version, &Version { major: 1, minor: 2 }, true).is_ok());
    let failure = verify(&version, &Version { major: 1, minor: 3 }, true).unwrap_err();
    assert_eq!(failure.kind(), FailureKind::MemberValueMismatch);
    assert!(failure.source().is_none());
}

#[test]
fn failing_compare_any_becomes_the_source() {
    let failure = verify(&Version { major: 1, minor: 2 }, &"1.2", true).unwrap_err();
    let source = failure.source().map(ToString::to_string);
    assert_eq!(
        source.as_deref(),
        Some("cannot compare a value of type Version with a value of type &str")
    );
    assert!(matches!(
        failure.cause(),
        Some(CompareError::TypeMismatch { .. })
    ));
}

#[test]
fn actual_gets_a_chance_to_recognize_expected() {
    assert!(verify(&Tag("x"), &Label("x".into()), true).is_ok());
    assert!(verify(&Tag("x"), &Label("y".into()), true).is_err());
    let failure = verify(&Tag("x"), &Version { major: 1, minor: 0 }, true).unwrap_err();
    assert!(matches!(
        failure.cause(),
        Some(CompareError::TypeMismatch { .. })
    ));
}

#[test]
fn ordered_std_types() {
    use std::time::Duration;
    assert!(verify(&Duration::from_secs(2), &Duration::from_millis(2000), true).is_ok());
    assert!(verify(&Duration::from_secs(2), &Duration::from_secs(3), true).is_err());
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

#[test]
fn self_references_are_reported() {
    let a = looped("a");
    let b = looped("a");
    let failure = verify(&a, &b, true).unwrap_err();
    assert_eq!(
        failure,
        EquivalenceFailure::CircularReference {
            side: Side::Expected,
            prefix: "expected.Next".into(),
        }
    );
    assert_eq!(failure.to_string(), "Circular reference found in 'expected.Next'");
}

#[test]
fn cycle_on_the_actual_side_only() {
    let expected = node("a");
    let _ = expected.next.set(node("a"));
    let tail = node("a");
    let _ = tail.next.set(looped("a"));
    let actual = node("a");
    let _ = actual.next.set(looped("a"));

    let failure = verify(&expected, &actual, false).unwrap_err();
    assert_eq!(failure.kind(), FailureKind::MemberValueMismatch);
    assert_eq!(failure.prefix(), "Next.Next");

    let deeper = looped("a");
    let failure = verify(&tail, &deeper, false).unwrap_err();
    assert_eq!(failure.kind(), FailureKind::CircularReference);
    assert!(matches!(
        failure,
        EquivalenceFailure::CircularReference {
            side: Side::Actual,
            ..
        }
    ));
}

#[test]
fn cycles_inside_collections_terminate() {
    let expected = vec![looped("a")];
    let actual = vec![looped("a")];
    let failure = verify(&expected, &actual, true).unwrap_err();
    assert_eq!(failure.kind(), FailureKind::MissingCollectionValue);
    let message = failure.to_string();
    assert!(message.contains("..."));
    assert!(message.len() < 4 * DebugRender::LIMIT);
}

#[test]
fn rejected_candidates_on_cyclic_graphs_do_not_fail_the_match() {
    let x = looped("x");
    let y = looped("y");
    let expected = vec![vec![Rc::clone(&x)], vec![Rc::clone(&y)]];
    let actual = vec![vec![Rc::clone(&y)], vec![Rc::clone(&x)]];
    assert!(verify(&expected, &actual, true).is_ok());
}

// ---------------------------------------------------------------------------
// JSON documents
// ---------------------------------------------------------------------------

#[test]
fn json_documents_ignore_order() {
    let expected = json!({"tags": ["a", "b"], "meta": {"x": 1, "y": [1, 2]}});
    let actual = json!({"meta": {"y": [2, 1], "x": 1}, "tags": ["b", "a"]});
    assert!(verify(&expected, &actual, true).is_ok());
}

#[test]
fn json_against_native_values() {
    let expected = json!([1, 2, 3]);
    assert!(verify(&expected, &vec![3_u8, 2, 1], true).is_ok());
    assert!(verify(&json!("x"), &String::from("x"), true).is_ok());
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

struct Quoted;

impl Render for Quoted {
    fn render(&self, value: Option<&dyn Value>) -> String {
        format!("`{}`", DebugRender.render(value))
    }
}

#[derive(Default)]
struct Counting {
    calls: Arc<AtomicUsize>,
}

impl Render for Counting {
    fn render(&self, value: Option<&dyn Value>) -> String {
        self.calls.fetch_add(1, AtomicOrdering::Relaxed);
        DebugRender.render(value)
    }
}

#[test]
fn successful_matches_render_nothing() {
    let render = Counting::default();
    let calls = Arc::clone(&render.calls);
    let engine = Equivalence::builder().render(render).build();
    let expected: Vec<i32> = (0..50).collect();
    let actual: Vec<i32> = expected.iter().rev().copied().collect();
    assert!(engine.verify(Some(&expected), Some(&actual), true).is_ok());
    assert_eq!(calls.load(AtomicOrdering::Relaxed), 0);

    assert!(engine.verify(Some(&expected), Some(&vec![0_i32]), true).is_err());
    assert_eq!(calls.load(AtomicOrdering::Relaxed), 2);
}

#[test]
fn custom_render_shapes_messages() {
    let engine = Equivalence::builder().render(Quoted).build();
    let failure = engine.verify(Some(&1_i32), Some(&2_i32), true).unwrap_err();
    assert_eq!(failure.to_string(), "Mismatched value\nExpected: `1`\nActual:   `2`");
}

#[test]
fn options_carry_strictness() {
    let engine = engine();
    let expected = vec![1_i32];
    let actual = vec![1_i32, 1];
    assert!(engine
        .verify_with(Some(&expected), Some(&actual), EquivalenceOptions::default())
        .is_ok());
    assert!(engine
        .verify_with(Some(&expected), Some(&actual), EquivalenceOptions::strict())
        .is_err());
    assert!(engine.is_equivalent(Some(&expected), Some(&actual), false));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn verify_is_reflexive(items in proptest::collection::vec(any::<i64>(), 0..16)) {
        let copy = items.clone();
        prop_assert!(verify(&items, &copy, true).is_ok());
    }

    #[test]
    fn permutations_are_equivalent(
        items in proptest::collection::vec(-5_i32..5, 0..12),
        seed in any::<u64>(),
    ) {
        let mut shuffled = items.clone();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }
        prop_assert!(verify(&items, &shuffled, true).is_ok());
    }
}
