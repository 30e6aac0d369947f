//! [`Value`] for `serde_json` documents.
//!
//! Objects are records whose member names are their keys, arrays are
//! sequences, and numbers keep the narrowest of `i64`, `u64`, `f64` that
//! holds them so they coerce against native numerics.

use std::any::Any;
use std::borrow::Cow;

use serde_json::{Number, Value as Json};

use crate::capability::Capabilities;
use crate::scalar::Scalar;
use crate::value::{Kind, Member, Value};

fn number(value: &Number) -> Scalar<'static> {
    if let Some(value) = value.as_i64() {
        Scalar::I64(value)
    } else if let Some(value) = value.as_u64() {
        Scalar::U64(value)
    } else {
        Scalar::F64(value.as_f64().unwrap_or(f64::NAN))
    }
}

impl Value for Json {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        match self {
            Json::Null => Kind::Null,
            Json::Bool(value) => Kind::Scalar(Scalar::Bool(*value)),
            Json::Number(value) => Kind::Scalar(number(value)),
            Json::String(value) => Kind::Scalar(Scalar::Str(value)),
            Json::Array(items) => Kind::Sequence(Box::new(items.iter().map(Member::borrowed))),
            Json::Object(map) => Kind::Record(
                map.iter()
                    .map(|(key, value)| (Cow::Borrowed(key.as_str()), Member::borrowed(value)))
                    .collect(),
            ),
        }
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_equatable(self)
    }
}
