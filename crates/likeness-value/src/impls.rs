//! [`Value`] for standard library types.

use std::any::Any;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::capability::{
    compare_same_type, Capabilities, CompareAny, ElementEquality, StructuralEquatable,
};
use crate::error::CompareError;
use crate::reflect::{MemberDecls, MemberSource, Reflect};
use crate::scalar::Scalar;
use crate::value::{Kind, Member, Value};

// ── scalars ──────────────────────────────────────────────────────────────

macro_rules! scalar_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Value for $ty {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn kind(&self) -> Kind<'_> {
                    Kind::Scalar(Scalar::$variant(*self))
                }

                fn capabilities(&self) -> Capabilities<'_> {
                    Capabilities::none().with_equatable(self).with_orderable(self)
                }
            }
        )+
    };
}

scalar_value! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    f32 => F32,
    f64 => F64,
}

// Pointer-sized integers compare as their 64-bit counterparts.
impl Value for isize {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::I64(*self as i64))
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_equatable(self).with_orderable(self)
    }
}

impl Value for usize {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::U64(*self as u64))
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_equatable(self).with_orderable(self)
    }
}

impl Value for String {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::Str(self))
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_equatable(self).with_orderable(self)
    }
}

impl Value for &'static str {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::Str(self))
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_equatable(self).with_orderable(self)
    }
}

impl Value for () {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Composite
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_equatable(self)
    }
}

// ── ordered value types ──────────────────────────────────────────────────

macro_rules! ordered_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Value for $ty {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn kind(&self) -> Kind<'_> {
                    Kind::Composite
                }

                fn capabilities(&self) -> Capabilities<'_> {
                    Capabilities::none()
                        .with_equatable(self)
                        .with_orderable(self)
                        .with_compare_any(self)
                }
            }

            impl CompareAny for $ty {
                fn compare_any(&self, other: &dyn Value) -> Result<Ordering, CompareError> {
                    compare_same_type(self, other)
                }
            }
        )+
    };
}

ordered_value!(Duration, SystemTime);

// ── wrappers ─────────────────────────────────────────────────────────────

macro_rules! pointer_value {
    ($($ptr:ident),+ $(,)?) => {
        $(
            impl<T: Value + ?Sized> Value for $ptr<T> {
                fn as_any(&self) -> &dyn Any {
                    (**self).as_any()
                }

                fn type_name(&self) -> &'static str {
                    (**self).type_name()
                }

                fn kind(&self) -> Kind<'_> {
                    (**self).kind()
                }

                fn capabilities(&self) -> Capabilities<'_> {
                    (**self).capabilities()
                }

                fn members(&self) -> Option<MemberSource> {
                    (**self).members()
                }
            }
        )+
    };
}

pointer_value!(Box, Rc, Arc);

macro_rules! optional_value {
    ($ty:ident, $get:ident) => {
        impl<T: Value> Value for $ty<T> {
            fn as_any(&self) -> &dyn Any {
                match self.$get() {
                    Some(value) => value.as_any(),
                    None => self,
                }
            }

            fn type_name(&self) -> &'static str {
                match self.$get() {
                    Some(value) => value.type_name(),
                    None => std::any::type_name::<Self>(),
                }
            }

            fn kind(&self) -> Kind<'_> {
                match self.$get() {
                    Some(value) => value.kind(),
                    None => Kind::Null,
                }
            }

            fn capabilities(&self) -> Capabilities<'_> {
                match self.$get() {
                    Some(value) => value.capabilities(),
                    None => Capabilities::none(),
                }
            }

            fn members(&self) -> Option<MemberSource> {
                self.$get().and_then(|value| value.members())
            }
        }
    };
}

optional_value!(Option, as_ref);
optional_value!(OnceCell, get);

// ── sequences ────────────────────────────────────────────────────────────

fn ordered_elements_equal<'a>(
    mut x: impl ExactSizeIterator<Item = &'a dyn Value>,
    mut y: impl ExactSizeIterator<Item = &'a dyn Value>,
    elements: &dyn ElementEquality,
) -> bool {
    x.len() == y.len() && x.all(|x| y.next().is_some_and(|y| elements.elements_equal(x, y)))
}

/// Every element of `x` pairs with a distinct equal element of `y`.
fn unordered_elements_equal<'a>(
    x: impl ExactSizeIterator<Item = &'a dyn Value>,
    y: impl ExactSizeIterator<Item = &'a dyn Value>,
    elements: &dyn ElementEquality,
) -> bool {
    if x.len() != y.len() {
        return false;
    }
    let mut remaining: Vec<&dyn Value> = y.collect();
    for item in x {
        match remaining
            .iter()
            .position(|candidate| elements.elements_equal(item, *candidate))
        {
            Some(index) => {
                remaining.swap_remove(index);
            }
            None => return false,
        }
    }
    true
}

macro_rules! sequence_value {
    ($($ty:ident<T $(, $extra:ident)*> => $equal:ident),+ $(,)?) => {
        $(
            impl<T: Value $(, $extra: 'static)*> Value for $ty<T $(, $extra)*> {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn kind(&self) -> Kind<'_> {
                    Kind::Sequence(Box::new(self.iter().map(Member::borrowed)))
                }

                fn capabilities(&self) -> Capabilities<'_> {
                    Capabilities::none().with_structural(self)
                }
            }

            impl<T: Value $(, $extra: 'static)*> StructuralEquatable for $ty<T $(, $extra)*> {
                fn structural_eq(&self, other: &dyn Value, elements: &dyn ElementEquality) -> bool {
                    match other.as_any().downcast_ref::<Self>() {
                        Some(other) => $equal(
                            self.iter().map(|v| v as &dyn Value),
                            other.iter().map(|v| v as &dyn Value),
                            elements,
                        ),
                        None => false,
                    }
                }
            }
        )+
    };
}

sequence_value! {
    Vec<T> => ordered_elements_equal,
    VecDeque<T> => ordered_elements_equal,
    BTreeSet<T> => ordered_elements_equal,
    HashSet<T, S> => unordered_elements_equal,
}

impl<T: Value, const N: usize> Value for [T; N] {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Sequence(Box::new(self.iter().map(Member::borrowed)))
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_structural(self)
    }
}

impl<T: Value, const N: usize> StructuralEquatable for [T; N] {
    fn structural_eq(&self, other: &dyn Value, elements: &dyn ElementEquality) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => ordered_elements_equal(
                self.iter().map(|v| v as &dyn Value),
                other.iter().map(|v| v as &dyn Value),
                elements,
            ),
            None => false,
        }
    }
}

// Maps are sequences of owned `(key, value)` pairs.
macro_rules! map_value {
    ($($ty:ident<K, V $(, $extra:ident)*>),+ $(,)?) => {
        $(
            impl<K, V $(, $extra: 'static)*> Value for $ty<K, V $(, $extra)*>
            where
                K: Value + Clone,
                V: Value + Clone,
            {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn kind(&self) -> Kind<'_> {
                    Kind::Sequence(Box::new(
                        self.iter().map(|(k, v)| Member::owned((k.clone(), v.clone()))),
                    ))
                }

                fn capabilities(&self) -> Capabilities<'_> {
                    Capabilities::none().with_structural(self)
                }
            }

            impl<K, V $(, $extra: 'static)*> StructuralEquatable for $ty<K, V $(, $extra)*>
            where
                K: Value + Clone,
                V: Value + Clone,
            {
                fn structural_eq(&self, other: &dyn Value, elements: &dyn ElementEquality) -> bool {
                    let Some(other) = other.as_any().downcast_ref::<Self>() else {
                        return false;
                    };
                    let pairs = |map: &Self| -> Vec<(K, V)> {
                        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
                    };
                    let (x, y) = (pairs(self), pairs(other));
                    unordered_elements_equal(
                        x.iter().map(|v| v as &dyn Value),
                        y.iter().map(|v| v as &dyn Value),
                        elements,
                    )
                }
            }
        )+
    };
}

map_value!(BTreeMap<K, V>, HashMap<K, V, S>);

// ── tuples ───────────────────────────────────────────────────────────────

macro_rules! tuple_value {
    ($(($($name:ident $index:tt),+))+) => {
        $(
            impl<$($name: Value),+> Value for ($($name,)+) {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn kind(&self) -> Kind<'_> {
                    Kind::Composite
                }

                fn capabilities(&self) -> Capabilities<'_> {
                    Capabilities::none().with_structural(self)
                }

                fn members(&self) -> Option<MemberSource> {
                    Some(MemberSource::of::<Self>())
                }
            }

            impl<$($name: Value),+> Reflect for ($($name,)+) {
                fn reflect(members: &mut MemberDecls<Self>) {
                    $(members.field(stringify!($index), |tuple| Member::borrowed(&tuple.$index));)+
                }
            }

            impl<$($name: Value),+> StructuralEquatable for ($($name,)+) {
                fn structural_eq(&self, other: &dyn Value, elements: &dyn ElementEquality) -> bool {
                    match other.as_any().downcast_ref::<Self>() {
                        Some(other) => true $(&& elements.elements_equal(&self.$index, &other.$index))+,
                        None => false,
                    }
                }
            }
        )+
    };
}

tuple_value! {
    (A 0)
    (A 0, B 1)
    (A 0, B 1, C 2)
    (A 0, B 1, C 2, D 3)
    (A 0, B 1, C 2, D 3, E 4)
    (A 0, B 1, C 2, D 3, E 4, F 5)
}
