//! likeness-value - Runtime value model shared by the likeness comparison
//! engines.
//!
//! Values whose concrete type is unknown to the caller are handled as
//! `&dyn` [`Value`]. A value reports how it should be compared through:
//!
//! - [`Value::kind`]: null, scalar, sequence, or composite;
//! - [`Value::capabilities`]: the equality and ordering capabilities it opts
//!   into (see [`capability`]);
//! - [`Value::members`]: member declarations for composites, resolved through
//!   the [`reflect::AccessorCache`].
//!
//! Standard library scalars, strings, collections, tuples, smart pointers and
//! `serde_json::Value` implement [`Value`] out of the box. User types use
//! [`impl_composite!`] and [`impl_scalar_enum!`], or implement the traits by
//! hand.

pub mod capability;
mod error;
mod impls;
mod json;
mod macros;
pub mod reflect;
mod scalar;
mod value;

pub use capability::{Capabilities, CompareAny, ElementEquality, StructuralEquatable};
pub use error::CompareError;
pub use scalar::{NumericType, Scalar, Variant};
pub use value::{
    is_null, same_reference, type_id_of, AsValue, Elements, Identity, Kind, Member, Value,
};
