//! The object-safe [`Value`] trait and the views it hands to the engines.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use crate::capability::Capabilities;
use crate::reflect::MemberSource;
use crate::scalar::Scalar;

/// Lazily produced elements of a sequence.
pub type Elements<'a> = Box<dyn Iterator<Item = Member<'a>> + 'a>;

/// Classification of a value as seen by the comparison engines.
pub enum Kind<'a> {
    /// Absent value (`None`, JSON `null`, an unset cell).
    Null,
    /// Primitive, unit enum variant, or string.
    Scalar(Scalar<'a>),
    /// Iterable collection.
    Sequence(Elements<'a>),
    /// Composite whose members come from its type's declarations.
    Composite,
    /// Composite whose members are only known per instance.
    Record(Vec<(Cow<'a, str>, Member<'a>)>),
}

impl fmt::Debug for Kind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Null => f.write_str("Null"),
            Kind::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Kind::Sequence(_) => f.write_str("Sequence(..)"),
            Kind::Composite => f.write_str("Composite"),
            Kind::Record(entries) => f
                .debug_list()
                .entries(entries.iter().map(|(name, _)| name))
                .finish(),
        }
    }
}

/// A runtime value whose concrete type is not known to the caller.
///
/// Wrappers (`Box`, `Rc`, `Arc`, `Option`, `OnceCell`) forward every method to
/// the wrapped value, including [`Value::as_any`], so identity, member lookup
/// and capabilities all resolve against the innermost concrete value.
pub trait Value: fmt::Debug + 'static {
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn kind(&self) -> Kind<'_>;

    /// Equality and ordering capabilities this value opts into.
    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none()
    }

    /// Member declarations for composite values.
    fn members(&self) -> Option<MemberSource> {
        None
    }
}

/// Views any value (sized or `dyn Value`) as a trait object.
pub trait AsValue {
    fn as_value(&self) -> &dyn Value;
}

impl<T: Value> AsValue for T {
    fn as_value(&self) -> &dyn Value {
        self
    }
}

impl AsValue for dyn Value {
    fn as_value(&self) -> &dyn Value {
        self
    }
}

/// Reference identity of a value: its concrete type plus its address.
///
/// The type takes part in the key so that a struct and its first field, which
/// share an address, are never confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    type_id: TypeId,
    address: usize,
}

impl Identity {
    pub fn of(value: &dyn Value) -> Self {
        let any = value.as_any();
        Self {
            type_id: Any::type_id(any),
            address: any as *const dyn Any as *const () as usize,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

/// Concrete type of the innermost value.
pub fn type_id_of(value: &dyn Value) -> TypeId {
    Any::type_id(value.as_any())
}

pub fn is_null(value: &dyn Value) -> bool {
    matches!(value.kind(), Kind::Null)
}

pub fn same_reference(a: &dyn Value, b: &dyn Value) -> bool {
    Identity::of(a) == Identity::of(b)
}

/// A member or element value, either borrowed from its owner or produced on
/// demand by a getter.
pub enum Member<'a> {
    Borrowed(&'a dyn Value),
    Owned(Box<dyn Value>),
}

impl<'a> Member<'a> {
    pub fn borrowed<V: Value>(value: &'a V) -> Self {
        Member::Borrowed(value)
    }

    pub fn owned<V: Value>(value: V) -> Self {
        Member::Owned(Box::new(value))
    }

    pub fn get(&self) -> &dyn Value {
        match self {
            Member::Borrowed(value) => *value,
            Member::Owned(value) => value.as_ref(),
        }
    }
}

impl Deref for Member<'_> {
    type Target = dyn Value;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}

impl fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.get(), f)
    }
}
