//! Member enumeration for composite values.
//!
//! Types list their members once through [`Reflect`]; the [`AccessorCache`]
//! turns those declarations into per-type [`AccessorTable`]s holding only the
//! members the equivalence engine reads (public, instance, readable, no index
//! parameters).

mod cache;
mod decl;

pub use cache::{AccessorCache, AccessorTable};
pub use decl::{
    declarations, Accessor, Getter, MemberDecls, MemberInfo, MemberKind, MemberSource, Reflect,
    Visibility,
};
