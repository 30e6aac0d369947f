use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::value::{Member, Value};

/// Reads one member out of its owner.
pub type Getter<T> = for<'a> fn(&'a T) -> Member<'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// Declaration of one member of `T`.
///
/// Declarations describe everything a type has, including members the
/// comparison engines never read (private, static, indexed, write-only).
pub struct MemberInfo<T> {
    name: &'static str,
    kind: MemberKind,
    visibility: Visibility,
    is_static: bool,
    parameters: usize,
    getter: Option<Getter<T>>,
}

impl<T> MemberInfo<T> {
    pub fn field(name: &'static str, getter: Getter<T>) -> Self {
        Self::public(name, MemberKind::Field, Some(getter))
    }

    pub fn property(name: &'static str, getter: Getter<T>) -> Self {
        Self::public(name, MemberKind::Property, Some(getter))
    }

    /// A property with a setter and no getter.
    pub fn write_only(name: &'static str) -> Self {
        Self::public(name, MemberKind::Property, None)
    }

    fn public(name: &'static str, kind: MemberKind, getter: Option<Getter<T>>) -> Self {
        Self {
            name,
            kind,
            visibility: Visibility::Public,
            is_static: false,
            parameters: 0,
            getter,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks the member as an indexer taking `parameters` arguments.
    pub fn indexed(mut self, parameters: usize) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Public, instance, readable, and without index parameters.
    pub fn is_accessible(&self) -> bool {
        self.visibility == Visibility::Public
            && !self.is_static
            && self.parameters == 0
            && self.getter.is_some()
    }
}

impl<T> fmt::Debug for MemberInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .field("parameters", &self.parameters)
            .field("readable", &self.getter.is_some())
            .finish()
    }
}

/// Member declarations collected for one type, in declaration order.
pub struct MemberDecls<T> {
    members: Vec<MemberInfo<T>>,
}

impl<T> MemberDecls<T> {
    fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Declares a public instance field.
    pub fn field(&mut self, name: &'static str, getter: Getter<T>) -> &mut Self {
        self.declare(MemberInfo::field(name, getter))
    }

    /// Declares a public instance property.
    pub fn property(&mut self, name: &'static str, getter: Getter<T>) -> &mut Self {
        self.declare(MemberInfo::property(name, getter))
    }

    pub fn declare(&mut self, member: MemberInfo<T>) -> &mut Self {
        self.members.push(member);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberInfo<T>> {
        self.members.iter()
    }
}

/// Types whose members can be enumerated.
pub trait Reflect: Value + Sized {
    fn reflect(members: &mut MemberDecls<Self>);
}

/// Collects the declarations of `T`.
pub fn declarations<T: Reflect>() -> MemberDecls<T> {
    let mut members = MemberDecls::new();
    T::reflect(&mut members);
    members
}

/// A getter with its owner type erased.
pub(crate) trait ErasedGetter: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Value) -> Option<Member<'a>>;
}

struct TypedGetter<T> {
    getter: Getter<T>,
    _owner: PhantomData<fn(&T)>,
}

impl<T: Value> ErasedGetter for TypedGetter<T> {
    fn get<'a>(&self, owner: &'a dyn Value) -> Option<Member<'a>> {
        owner
            .as_any()
            .downcast_ref::<T>()
            .map(|owner| (self.getter)(owner))
    }
}

/// One readable member, as stored in an accessor table.
#[derive(Clone)]
pub struct Accessor {
    name: &'static str,
    kind: MemberKind,
    getter: Arc<dyn ErasedGetter>,
}

impl Accessor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Reads the member from `owner`; `None` if `owner` is not of the type
    /// this accessor was built for.
    pub fn get<'a>(&self, owner: &'a dyn Value) -> Option<Member<'a>> {
        self.getter.get(owner)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Where the accessor cache finds a type's members.
#[derive(Clone, Copy)]
pub struct MemberSource {
    type_id: TypeId,
    type_name: &'static str,
    collect: fn() -> Vec<Accessor>,
}

impl MemberSource {
    pub fn of<T: Reflect>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            collect: accessible::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn accessors(&self) -> Vec<Accessor> {
        (self.collect)()
    }
}

impl fmt::Debug for MemberSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberSource")
            .field("type_name", &self.type_name)
            .finish()
    }
}

fn accessible<T: Reflect>() -> Vec<Accessor> {
    declarations::<T>()
        .members
        .into_iter()
        .filter(MemberInfo::is_accessible)
        .filter_map(|member| {
            let getter = member.getter?;
            Some(Accessor {
                name: member.name,
                kind: member.kind,
                getter: Arc::new(TypedGetter {
                    getter,
                    _owner: PhantomData,
                }),
            })
        })
        .collect()
}
